use alloc::sync::Arc;

use infinite_grid::{IndexPath, LayoutOptions};

use crate::Easing;

/// A callback fired when the centered real index path changes.
pub type OnCenteredIndexChange = Arc<dyn Fn(Option<IndexPath>) + Send + Sync>;

/// Configuration for [`crate::Controller`].
///
/// Cloning is cheap: the callback is reference-counted.
#[derive(Clone)]
pub struct ControllerOptions {
    pub layout: LayoutOptions,

    /// Snap drags to the nearest cell and recenter when the content size changes.
    pub item_paging_enabled: bool,

    /// Gain applied to the drag velocity when projecting where a drag will stop.
    pub velocity_multiplier: f64,

    /// Real index path centered by default.
    pub preferred_centered_index_path: IndexPath,

    /// Duration of animated `move_to` and plain selection scrolls.
    pub scroll_animation_ms: u64,

    /// Duration of the pre-scroll across the loop boundary before a directional selection.
    pub selection_animation_ms: u64,

    pub easing: Easing,

    pub on_centered_index_change: Option<OnCenteredIndexChange>,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self::new(LayoutOptions::default())
    }
}

impl ControllerOptions {
    pub fn new(layout: LayoutOptions) -> Self {
        Self {
            layout,
            item_paging_enabled: false,
            velocity_multiplier: 1.0,
            preferred_centered_index_path: IndexPath::new(0, 0),
            scroll_animation_ms: 300,
            selection_animation_ms: 200,
            easing: Easing::default(),
            on_centered_index_change: None,
        }
    }

    pub fn with_layout(mut self, layout: LayoutOptions) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.layout.enabled = enabled;
        self
    }

    pub fn with_item_paging_enabled(mut self, enabled: bool) -> Self {
        self.item_paging_enabled = enabled;
        self
    }

    pub fn with_velocity_multiplier(mut self, velocity_multiplier: f64) -> Self {
        self.velocity_multiplier = velocity_multiplier;
        self
    }

    pub fn with_preferred_centered_index_path(mut self, index_path: IndexPath) -> Self {
        self.preferred_centered_index_path = index_path;
        self
    }

    pub fn with_scroll_animation_ms(mut self, duration_ms: u64) -> Self {
        self.scroll_animation_ms = duration_ms;
        self
    }

    pub fn with_selection_animation_ms(mut self, duration_ms: u64) -> Self {
        self.selection_animation_ms = duration_ms;
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn with_on_centered_index_change(
        mut self,
        on_change: Option<impl Fn(Option<IndexPath>) + Send + Sync + 'static>,
    ) -> Self {
        self.on_centered_index_change = on_change.map(|f| Arc::new(f) as _);
        self
    }
}

impl core::fmt::Debug for ControllerOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ControllerOptions")
            .field("layout", &self.layout)
            .field("item_paging_enabled", &self.item_paging_enabled)
            .field("velocity_multiplier", &self.velocity_multiplier)
            .field(
                "preferred_centered_index_path",
                &self.preferred_centered_index_path,
            )
            .field("scroll_animation_ms", &self.scroll_animation_ms)
            .field("selection_animation_ms", &self.selection_animation_ms)
            .field("easing", &self.easing)
            .finish_non_exhaustive()
    }
}
