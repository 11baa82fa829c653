use kurbo::{Insets, Size};

use crate::{Axis, FlowMetrics, ScreenMetrics};

/// Configuration for [`crate::LoopingLayout`].
///
/// Cheap to copy; adapters typically keep one around and hand a modified copy to
/// `LoopingLayout::set_options`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutOptions {
    /// Enables inflation and looping. When disabled the layout behaves like a plain flow grid.
    pub enabled: bool,
    pub metrics: FlowMetrics,
    pub screen: ScreenMetrics,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            metrics: FlowMetrics::default(),
            screen: ScreenMetrics::default(),
        }
    }
}

impl LayoutOptions {
    pub fn new(metrics: FlowMetrics, screen: ScreenMetrics) -> Self {
        Self {
            enabled: true,
            metrics,
            screen,
        }
    }

    pub fn axis(&self) -> Axis {
        self.metrics.axis
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_metrics(mut self, metrics: FlowMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn with_axis(mut self, axis: Axis) -> Self {
        self.metrics.axis = axis;
        self
    }

    pub fn with_item_size(mut self, item_size: Size) -> Self {
        self.metrics.item_size = item_size;
        self
    }

    pub fn with_spacing(mut self, line_spacing: f64, interitem_spacing: f64) -> Self {
        self.metrics.line_spacing = line_spacing;
        self.metrics.interitem_spacing = interitem_spacing;
        self
    }

    pub fn with_section_inset(mut self, section_inset: Insets) -> Self {
        self.metrics.section_inset = section_inset;
        self
    }

    pub fn with_header_size(mut self, header_size: Size) -> Self {
        self.metrics.header_size = header_size;
        self
    }

    pub fn with_footer_size(mut self, footer_size: Size) -> Self {
        self.metrics.footer_size = footer_size;
        self
    }

    /// Sets the screen size the minimum-extent thresholds derive from.
    pub fn with_screen_size(mut self, size: Size) -> Self {
        self.screen = ScreenMetrics::new(size);
        self
    }
}
