use kurbo::{Insets, Point, Rect, Size};

/// Geometry of the scroll view as last reported by the host.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Viewport {
    pub size: Size,
    pub offset: Point,
    pub content_inset: Insets,
    pub layout_margins: Insets,
}

impl Viewport {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    pub fn with_offset(mut self, offset: Point) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_content_inset(mut self, content_inset: Insets) -> Self {
        self.content_inset = content_inset;
        self
    }

    pub fn with_layout_margins(mut self, layout_margins: Insets) -> Self {
        self.layout_margins = layout_margins;
        self
    }

    /// Zero-area bounds cannot host a looping layout.
    pub fn is_degenerate(&self) -> bool {
        !(self.size.width > 0.0 && self.size.height > 0.0)
    }

    /// The visible area in view coordinates: bounds minus content inset and layout margins.
    pub fn visible_rect(&self) -> Rect {
        let i = self.content_inset;
        let m = self.layout_margins;
        let left = i.x0 + m.x0;
        let top = i.y0 + m.y0;
        let right = i.x1 + m.x1;
        let bottom = i.y1 + m.y1;
        Rect::new(
            left,
            top,
            (self.size.width - right).max(left),
            (self.size.height - bottom).max(top),
        )
    }

    /// [`Self::visible_rect`] in content coordinates.
    pub fn visible_content_rect(&self) -> Rect {
        self.visible_rect() + self.offset.to_vec2()
    }

    /// The bounds in content coordinates.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.offset, self.size)
    }
}

/// Geometry derived at the start of each layout pass.
///
/// The page/rect math reads tile extent and validity from here instead of recomputing them.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutSnapshot {
    /// Size of one tile: the flow content plus one line spacing along the scroll axis.
    pub tile: Size,
    pub has_valid_layout: bool,
    pub offset: Point,
}
