use infinite_grid::{ElementKind, IndexPath};
use kurbo::{Point, Vec2};

/// Identifies one element the view system wants configured or displayed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellRequest {
    /// Index path in the inflated space, as known to the view system (use it for recycling).
    pub index_path: IndexPath,
    /// Index path in the host's own space (use it for content).
    pub real_index_path: IndexPath,
}

/// The host's data source.
///
/// Only real counts are ever asked for; inflation happens in the controller.
pub trait DataSource {
    fn number_of_sections(&self) -> usize {
        1
    }

    fn number_of_items(&self, section: usize) -> usize;

    fn configure_cell(&mut self, _request: CellRequest) {}

    fn configure_supplementary(&mut self, _kind: ElementKind, _request: CellRequest) {}
}

/// The host's scroll, focus and selection callbacks.
///
/// Every method has an empty default so hosts implement only what they observe. Index paths
/// handed to these methods are real.
pub trait Delegate {
    fn did_scroll(&mut self, _offset: Point) {}

    fn will_begin_dragging(&mut self) {}

    /// May adjust `target` after paging already did.
    fn will_end_dragging(&mut self, _velocity: Vec2, _target: &mut Point) {}

    fn did_end_dragging(&mut self, _will_decelerate: bool) {}

    fn did_end_decelerating(&mut self) {}

    fn did_update_focus(&mut self, _next: Option<IndexPath>) {}

    fn preferred_focus_index_path(&self) -> Option<IndexPath> {
        None
    }

    fn did_select_item(&mut self, _index_path: IndexPath) {}

    fn will_display(&mut self, _request: CellRequest) {}
}
