//! A plain (non-looping) grid flow layout.
//!
//! Sections are laid end to end along the scroll axis. Within a section, items fill *lines*
//! across the cross axis and lines stack along the scroll axis:
//!
//! ```text
//! | header | inset | line 0 | spacing | line 1 | ... | inset | footer | next section ...
//! ```
//!
//! Headers and footers span the whole cross extent of the bounds and only produce records when
//! their reference size along the scroll axis is non-zero.

use alloc::vec::Vec;

use kurbo::{Insets, Rect, Size};

use crate::{Axis, ElementKind, IndexPath};

/// Geometry inputs of the flow layout.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlowMetrics {
    pub axis: Axis,
    pub item_size: Size,
    /// Spacing between consecutive lines (along the scroll axis).
    pub line_spacing: f64,
    /// Spacing between items of one line (along the cross axis).
    pub interitem_spacing: f64,
    pub section_inset: Insets,
    pub header_size: Size,
    pub footer_size: Size,
}

impl Default for FlowMetrics {
    fn default() -> Self {
        Self {
            axis: Axis::Horizontal,
            item_size: Size::new(50.0, 50.0),
            line_spacing: 10.0,
            interitem_spacing: 10.0,
            section_inset: Insets::ZERO,
            header_size: Size::ZERO,
            footer_size: Size::ZERO,
        }
    }
}

/// An element of the flow layout, positioned in one copy of the content.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlowElement {
    pub kind: ElementKind,
    pub index_path: IndexPath,
    pub frame: Rect,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct SectionGeometry {
    start: f64,
    extent: f64,
    items: usize,
    per_line: usize,
    lines: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FlowLayout {
    metrics: FlowMetrics,
    bounds: Size,
    sections: Vec<SectionGeometry>,
    content_size: Size,
}

impl FlowLayout {
    pub fn new(metrics: FlowMetrics) -> Self {
        Self {
            metrics,
            bounds: Size::ZERO,
            sections: Vec::new(),
            content_size: Size::ZERO,
        }
    }

    pub fn metrics(&self) -> &FlowMetrics {
        &self.metrics
    }

    /// Replaces the metrics. Takes effect on the next [`Self::prepare`].
    pub fn set_metrics(&mut self, metrics: FlowMetrics) {
        self.metrics = metrics;
    }

    pub fn axis(&self) -> Axis {
        self.metrics.axis
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Recomputes section geometry for the given per-section item counts and view bounds.
    pub fn prepare(&mut self, item_counts: impl IntoIterator<Item = usize>, bounds: Size) {
        let m = self.metrics;
        let axis = m.axis;
        let item_main = axis.extent(m.item_size);
        let item_cross = axis.cross_extent(m.item_size);
        let cross_available = axis.cross_extent(bounds)
            - axis.cross_leading(m.section_inset)
            - axis.cross_trailing(m.section_inset);
        let per_line = if item_cross + m.interitem_spacing <= 0.0 {
            1
        } else {
            let fit = ((cross_available + m.interitem_spacing) / (item_cross + m.interitem_spacing))
                .floor();
            if fit.is_finite() && fit >= 1.0 {
                fit as usize
            } else {
                1
            }
        };

        self.bounds = bounds;
        self.sections.clear();
        let mut start = 0.0;
        for items in item_counts {
            let lines = items.div_ceil(per_line);
            let lines_extent = if lines == 0 {
                0.0
            } else {
                lines as f64 * item_main + (lines - 1) as f64 * m.line_spacing
            };
            let extent = axis.extent(m.header_size)
                + axis.leading(m.section_inset)
                + lines_extent
                + axis.trailing(m.section_inset)
                + axis.extent(m.footer_size);
            self.sections.push(SectionGeometry {
                start,
                extent,
                items,
                per_line,
                lines,
            });
            start += extent;
        }
        self.content_size = axis.size(start, axis.cross_extent(bounds));
    }

    /// Size of all sections laid end to end.
    pub fn content_size(&self) -> Size {
        self.content_size
    }

    /// Extent of the content along the scroll axis.
    pub fn content_extent(&self) -> f64 {
        self.axis().extent(self.content_size)
    }

    pub fn frame_for_item(&self, index_path: IndexPath) -> Option<Rect> {
        let section = self.sections.get(index_path.section)?;
        if index_path.item >= section.items {
            return None;
        }
        Some(self.item_frame(section, index_path.item))
    }

    pub fn frame_for_supplementary(&self, kind: ElementKind, section: usize) -> Option<Rect> {
        let geometry = self.sections.get(section)?;
        self.supplementary_frame(geometry, kind)
    }

    /// Cells, headers and footers whose frames intersect `rect`.
    pub fn elements_in_rect(&self, rect: Rect) -> Vec<FlowElement> {
        let mut out = Vec::new();
        self.for_each_element_in_rect(rect, |e| out.push(e));
        out
    }

    pub fn for_each_element_in_rect(&self, rect: Rect, mut f: impl FnMut(FlowElement)) {
        let axis = self.axis();
        let m = &self.metrics;
        let q_min = axis.min(rect);
        let q_max = axis.max(rect);
        let first = self
            .sections
            .partition_point(|s| s.start + s.extent <= q_min);

        for (section_index, section) in self.sections.iter().enumerate().skip(first) {
            if section.start >= q_max {
                break;
            }

            if let Some(frame) = self.supplementary_frame(section, ElementKind::Header) {
                if intersects(frame, rect) {
                    f(FlowElement {
                        kind: ElementKind::Header,
                        index_path: IndexPath::new(section_index, 0),
                        frame,
                    });
                }
            }

            let lines_start = self.lines_start(section);
            let stride = axis.extent(m.item_size) + m.line_spacing;
            let first_line = if stride > 0.0 {
                ((q_min - lines_start) / stride).floor().max(0.0) as usize
            } else {
                0
            };
            for line in first_line..section.lines {
                if lines_start + line as f64 * stride >= q_max {
                    break;
                }
                let first_item = line * section.per_line;
                let last_item = (first_item + section.per_line).min(section.items);
                for item in first_item..last_item {
                    let frame = self.item_frame(section, item);
                    if intersects(frame, rect) {
                        f(FlowElement {
                            kind: ElementKind::Cell,
                            index_path: IndexPath::new(section_index, item),
                            frame,
                        });
                    }
                }
            }

            if let Some(frame) = self.supplementary_frame(section, ElementKind::Footer) {
                if intersects(frame, rect) {
                    f(FlowElement {
                        kind: ElementKind::Footer,
                        index_path: IndexPath::new(section_index, 0),
                        frame,
                    });
                }
            }
        }
    }

    fn lines_start(&self, section: &SectionGeometry) -> f64 {
        let axis = self.axis();
        section.start
            + axis.extent(self.metrics.header_size)
            + axis.leading(self.metrics.section_inset)
    }

    fn item_frame(&self, section: &SectionGeometry, item: usize) -> Rect {
        let axis = self.axis();
        let m = &self.metrics;
        let item_main = axis.extent(m.item_size);
        let item_cross = axis.cross_extent(m.item_size);
        let line = item / section.per_line;
        let slot = item % section.per_line;
        let main = self.lines_start(section) + line as f64 * (item_main + m.line_spacing);
        let cross = axis.cross_leading(m.section_inset)
            + slot as f64 * (item_cross + m.interitem_spacing);
        axis.rect(main, cross, item_main, item_cross)
    }

    fn supplementary_frame(&self, section: &SectionGeometry, kind: ElementKind) -> Option<Rect> {
        let axis = self.axis();
        let cross = axis.cross_extent(self.bounds);
        match kind {
            ElementKind::Cell => None,
            ElementKind::Header => {
                let extent = axis.extent(self.metrics.header_size);
                (extent > 0.0).then(|| axis.rect(section.start, 0.0, extent, cross))
            }
            ElementKind::Footer => {
                let extent = axis.extent(self.metrics.footer_size);
                (extent > 0.0)
                    .then(|| axis.rect(section.start + section.extent - extent, 0.0, extent, cross))
            }
        }
    }
}

fn intersects(a: Rect, b: Rect) -> bool {
    a.x0 < b.x1 && a.x1 > b.x0 && a.y0 < b.y1 && a.y1 > b.y0
}
