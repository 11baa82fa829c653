use kurbo::{Point, Size, Vec2};

use crate::{IndexPath, LoopingLayout};

/// Snap-to-item behavior on top of a [`LoopingLayout`].
///
/// Both entry points are pure with respect to the layout: they compute an offset and leave
/// applying it to the adapter.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PagingController {
    enabled: bool,
    velocity_multiplier: f64,
    preferred_index_path: IndexPath,
    last_content_size: Option<Size>,
}

impl Default for PagingController {
    fn default() -> Self {
        Self::new(false, 1.0)
    }
}

impl PagingController {
    pub fn new(enabled: bool, velocity_multiplier: f64) -> Self {
        Self {
            enabled,
            velocity_multiplier,
            preferred_index_path: IndexPath::default(),
            last_content_size: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn velocity_multiplier(&self) -> f64 {
        self.velocity_multiplier
    }

    pub fn set_velocity_multiplier(&mut self, velocity_multiplier: f64) {
        self.velocity_multiplier = velocity_multiplier;
    }

    /// Real index path [`Self::center_if_needed`] centers on when none is given.
    pub fn preferred_index_path(&self) -> IndexPath {
        self.preferred_index_path
    }

    pub fn set_preferred_index_path(&mut self, index_path: IndexPath) {
        self.preferred_index_path = index_path;
    }

    /// Forgets the last observed content size so the next [`Self::center_if_needed`] fires.
    pub fn reset(&mut self) {
        self.last_content_size = None;
    }

    /// Rewrites the target offset of a drag that is about to end so the viewport settles with
    /// a cell centered.
    ///
    /// Returns `target` unchanged when paging is disabled, the layout is not looping, or no
    /// visible cell qualifies.
    pub fn center_on_drag_end(&self, layout: &LoopingLayout, velocity: Vec2, target: Point) -> Point {
        if !self.enabled || !layout.has_valid_layout() {
            return target;
        }
        let axis = layout.axis();
        let current = layout.offset();
        let projected = axis.with_main(
            current,
            axis.main(current) + axis.main_of(velocity) * self.velocity_multiplier,
        );
        match layout.preferred_visible_record(Some(projected), velocity, Some(target), None) {
            Some(record) => {
                let centered = layout.centered_offset(record.frame);
                itrace!(
                    item = ?record.real_index_path,
                    from = axis.main(target),
                    to = axis.main(centered),
                    "center_on_drag_end"
                );
                centered
            }
            None => target,
        }
    }

    /// Centers on `preferred` (or [`Self::preferred_index_path`]) once per content size change.
    ///
    /// The preferred item only wins while one of its copies is visible; otherwise the visible
    /// cell nearest the center is used. Returns `None` when that cell is already centered.
    ///
    /// Does nothing while the user is dragging or the view is decelerating. Calling it again
    /// without a content size change returns `None`.
    pub fn center_if_needed(
        &mut self,
        layout: &LoopingLayout,
        is_tracking: bool,
        preferred: Option<IndexPath>,
    ) -> Option<Point> {
        if !self.enabled || is_tracking || !layout.has_valid_layout() {
            return None;
        }
        let size = layout.content_size();
        if self.last_content_size == Some(size) {
            return None;
        }
        self.last_content_size = Some(size);

        let index_path = preferred.unwrap_or(self.preferred_index_path);
        let record =
            layout.preferred_visible_record(None, Vec2::ZERO, None, Some(index_path))?;
        let centered = layout.centered_offset(record.frame);
        if centered == layout.offset() {
            return None;
        }
        itrace!(
            item = ?record.real_index_path,
            to = layout.axis().main(centered),
            "center_if_needed"
        );
        Some(centered)
    }
}
