use kurbo::{Insets, Point, Rect, Size, Vec2};

/// The axis content scrolls (and loops) along.
///
/// Every geometric helper here speaks in terms of a *main* coordinate (along the scroll axis)
/// and a *cross* coordinate (perpendicular to it), so the engine can be written once for both
/// orientations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    #[default]
    Horizontal,
    Vertical,
}

impl Axis {
    pub fn main(self, p: Point) -> f64 {
        match self {
            Self::Horizontal => p.x,
            Self::Vertical => p.y,
        }
    }

    pub fn cross(self, p: Point) -> f64 {
        match self {
            Self::Horizontal => p.y,
            Self::Vertical => p.x,
        }
    }

    pub fn main_of(self, v: Vec2) -> f64 {
        match self {
            Self::Horizontal => v.x,
            Self::Vertical => v.y,
        }
    }

    /// Extent of `size` along the scroll axis.
    pub fn extent(self, size: Size) -> f64 {
        match self {
            Self::Horizontal => size.width,
            Self::Vertical => size.height,
        }
    }

    pub fn cross_extent(self, size: Size) -> f64 {
        match self {
            Self::Horizontal => size.height,
            Self::Vertical => size.width,
        }
    }

    pub fn point(self, main: f64, cross: f64) -> Point {
        match self {
            Self::Horizontal => Point::new(main, cross),
            Self::Vertical => Point::new(cross, main),
        }
    }

    pub fn size(self, main: f64, cross: f64) -> Size {
        match self {
            Self::Horizontal => Size::new(main, cross),
            Self::Vertical => Size::new(cross, main),
        }
    }

    pub fn rect(self, main: f64, cross: f64, main_extent: f64, cross_extent: f64) -> Rect {
        Rect::from_origin_size(
            self.point(main, cross),
            self.size(main_extent, cross_extent),
        )
    }

    pub fn with_main(self, p: Point, main: f64) -> Point {
        self.point(main, self.cross(p))
    }

    pub fn min(self, r: Rect) -> f64 {
        match self {
            Self::Horizontal => r.x0,
            Self::Vertical => r.y0,
        }
    }

    pub fn max(self, r: Rect) -> f64 {
        match self {
            Self::Horizontal => r.x1,
            Self::Vertical => r.y1,
        }
    }

    pub fn mid(self, r: Rect) -> f64 {
        (self.min(r) + self.max(r)) / 2.0
    }

    /// Moves `r` by `delta` along the scroll axis.
    pub fn translate(self, r: Rect, delta: f64) -> Rect {
        r + self.point(delta, 0.0).to_vec2()
    }

    /// Inset before content along the scroll axis (left or top).
    pub fn leading(self, insets: Insets) -> f64 {
        match self {
            Self::Horizontal => insets.x0,
            Self::Vertical => insets.y0,
        }
    }

    /// Inset after content along the scroll axis (right or bottom).
    pub fn trailing(self, insets: Insets) -> f64 {
        match self {
            Self::Horizontal => insets.x1,
            Self::Vertical => insets.y1,
        }
    }

    pub fn cross_leading(self, insets: Insets) -> f64 {
        self.flip().leading(insets)
    }

    pub fn cross_trailing(self, insets: Insets) -> f64 {
        self.flip().trailing(insets)
    }

    pub fn flip(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }
}

/// Direction of travel along the scroll axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollDirection {
    Forward,
    Backward,
}

/// A `(section, item)` pair.
///
/// The same shape is used for the caller's *real* index space and for the inflated *virtual*
/// index space reported to the view system; APIs name which one they expect.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndexPath {
    pub section: usize,
    pub item: usize,
}

impl IndexPath {
    pub const fn new(section: usize, item: usize) -> Self {
        Self { section, item }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ElementKind {
    #[default]
    Cell,
    Header,
    Footer,
}

/// A positioned element produced for one layout query.
///
/// Records are derived: they are recomputed per query and never stored by the engine.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutRecord {
    pub kind: ElementKind,
    /// Index path in the inflated space, as reported to the view system.
    pub index_path: IndexPath,
    /// Index path in the caller's space. For headers and footers `item` is always 0.
    pub real_index_path: IndexPath,
    /// Frame in content coordinates, already translated into `page`.
    pub frame: Rect,
    pub page: i64,
}

impl LayoutRecord {
    pub fn is_cell(&self) -> bool {
        self.kind == ElementKind::Cell
    }
}
