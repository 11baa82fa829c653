//! A headless engine for grids that appear to scroll forever along one axis.
//!
//! For the framework-neutral controller (delegate forwarding, tweens, selection across the
//! loop boundary), see the `infinite-grid-adapter` crate.
//!
//! The engine takes a finite collection and:
//! - inflates it by a replication multiplier so the view system sees enough items to scroll
//!   without seams ([`ReplicationPlan`]),
//! - lays the inflated content out as one *tile* and repeats that tile [`PAGE_SPAN`] times
//!   without materializing the copies ([`LoopingLayout`]),
//! - moves the scroll offset back to the middle tile when it drifts near either end
//!   ([`LoopingLayout::loop_if_needed`]),
//! - optionally snaps drags to the nearest cell ([`PagingController`]).
//!
//! Every index reported back to callers is mapped into the caller's finite *real* index space
//! (see [`index`]).
//!
//! It is UI-agnostic. A host view layer is expected to provide:
//! - viewport geometry (bounds, scroll offset, insets)
//! - the real section and item counts
//! - the screen size used for the replication thresholds
#![forbid(unsafe_code)]

extern crate alloc;

#[macro_use]
mod macros;

mod error;
mod flow;
pub mod index;
mod layout;
mod options;
mod paging;
mod replication;
mod state;
mod types;

#[cfg(test)]
mod tests;

pub use error::{Error, Result};
pub use flow::{FlowElement, FlowLayout, FlowMetrics};
pub use layout::{EDGE_PAGES, LoopingLayout, MIDDLE_PAGE, PAGE_SPAN};
pub use options::LayoutOptions;
pub use paging::PagingController;
pub use replication::{
    INTER_SECTION_GAP, ReplicationMetrics, ReplicationPlan, ScreenMetrics, inflated_item_count,
    inflated_section_count, multiplier,
};
pub use state::{LayoutSnapshot, Viewport};
pub use types::{Axis, ElementKind, IndexPath, LayoutRecord, ScrollDirection};
