//! Mapping between the inflated (virtual) index space and the caller's (real) one.
//!
//! These are pure functions: they hold no state and never fail. Degenerate inputs (zero real
//! sections, empty sections) clamp to index 0.

use crate::IndexPath;

/// Maps a virtual section to the real section it replicates.
///
/// Returns 0 when `real_section_count == 0`.
pub fn section_in_real(virtual_section: usize, real_section_count: usize) -> usize {
    if real_section_count == 0 {
        iwarn!(virtual_section, "section_in_real: no real sections, clamping to 0");
        return 0;
    }
    virtual_section % real_section_count
}

/// Maps a virtual index path to the real index path it replicates.
///
/// `real_item_count` is the item count of the *real* section the virtual section maps to.
/// When that section is empty the item clamps to 0.
pub fn to_real(
    virtual_index_path: IndexPath,
    real_section_count: usize,
    real_item_count: usize,
) -> IndexPath {
    let section = section_in_real(virtual_index_path.section, real_section_count);
    let item = if real_item_count == 0 {
        0
    } else {
        virtual_index_path.item % real_item_count
    };
    IndexPath { section, item }
}
