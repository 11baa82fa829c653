use thiserror::Error;

use crate::IndexPath;

pub type Result<T, E = Error> = core::result::Result<T, E>;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    /// A count-dependent query ran before a host data source was installed.
    ///
    /// Section and item counts are mandatory input: there is no degraded mode without them.
    #[error("a data source is required to report section and item counts")]
    MissingDataSource,

    #[error("index path {index_path:?} is out of range ({sections} sections)")]
    IndexPathOutOfRange {
        index_path: IndexPath,
        sections: usize,
    },
}
