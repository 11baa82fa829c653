use alloc::vec::Vec;

use kurbo::{Point, Rect, Size, Vec2};

use crate::flow::FlowElement;
use crate::index;
use crate::{
    Axis, ElementKind, FlowLayout, IndexPath, LayoutOptions, LayoutRecord, LayoutSnapshot,
    ReplicationPlan, Viewport,
};

/// Number of tiles laid end to end along the scroll axis.
pub const PAGE_SPAN: i64 = 500;

/// The tile the offset is moved back into when it drifts near either end of the span.
pub const MIDDLE_PAGE: i64 = PAGE_SPAN / 2;

/// How close (in tiles) the offset may get to either end of the span before recentering.
pub const EDGE_PAGES: i64 = 2;

/// A looping layout engine over a plain [`FlowLayout`].
///
/// One *tile* is the flow content (already inflated by the [`ReplicationPlan`]) plus one line
/// spacing. When the layout is valid, the engine reports a content size of [`PAGE_SPAN`] tiles
/// and answers rect queries by mapping them back into a single tile, so the inflated collection
/// is never materialized.
///
/// The engine is headless: it owns no view. Adapters drive it by calling [`Self::prepare`] on
/// each layout pass and [`Self::set_offset`] on scroll events, and apply any offset it returns.
#[derive(Clone, Debug)]
pub struct LoopingLayout {
    options: LayoutOptions,
    flow: FlowLayout,
    plan: ReplicationPlan,
    viewport: Viewport,
    snapshot: LayoutSnapshot,
    previous: Option<LayoutSnapshot>,
}

impl LoopingLayout {
    pub fn new(options: LayoutOptions) -> Self {
        idebug!(
            enabled = options.enabled,
            axis = ?options.metrics.axis,
            "LoopingLayout::new"
        );
        Self {
            flow: FlowLayout::new(options.metrics),
            options,
            plan: ReplicationPlan::default(),
            viewport: Viewport::default(),
            snapshot: LayoutSnapshot::default(),
            previous: None,
        }
    }

    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Replaces the options. Geometry is recomputed on the next [`Self::prepare`].
    pub fn set_options(&mut self, options: LayoutOptions) {
        self.options = options;
        self.flow.set_metrics(options.metrics);
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.options.enabled = enabled;
    }

    pub fn axis(&self) -> Axis {
        self.options.metrics.axis
    }

    pub fn flow(&self) -> &FlowLayout {
        &self.flow
    }

    pub fn plan(&self) -> &ReplicationPlan {
        &self.plan
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn snapshot(&self) -> LayoutSnapshot {
        self.snapshot
    }

    pub fn has_valid_layout(&self) -> bool {
        self.snapshot.has_valid_layout
    }

    pub fn offset(&self) -> Point {
        self.snapshot.offset
    }

    /// Extent of one tile along the scroll axis.
    pub fn tile_extent(&self) -> f64 {
        self.axis().extent(self.snapshot.tile)
    }

    /// Records a scroll offset reported by the host (or applied by the adapter).
    pub fn set_offset(&mut self, offset: Point) {
        self.viewport.offset = offset;
        self.snapshot.offset = offset;
    }

    /// Recomputes geometry for a layout pass.
    ///
    /// Returns a corrected scroll offset when the tile extent (or validity) changed since the
    /// previous pass: the offset keeps its page and its position inside the tile, so the user
    /// does not see a jump when item metrics change. The adapter must apply the returned
    /// offset to the view.
    pub fn prepare(&mut self, plan: ReplicationPlan, viewport: Viewport) -> Option<Point> {
        let axis = self.axis();
        self.flow.prepare(plan.item_counts(), viewport.size);
        let flow_size = self.flow.content_size();
        let tile = axis.size(
            axis.extent(flow_size) + self.options.metrics.line_spacing,
            axis.cross_extent(flow_size),
        );
        let tile_extent = axis.extent(tile);
        let has_valid_layout = self.options.enabled
            && !viewport.is_degenerate()
            && self.flow.content_extent() > 0.0
            && tile_extent >= self.options.screen.minimum_content_extent_for(axis);

        let mut offset = viewport.offset;
        let mut rewritten = None;
        match self.previous {
            Some(previous) if !viewport.is_degenerate() => {
                if previous.tile != tile || previous.has_valid_layout != has_valid_layout {
                    let preserved =
                        self.preserved_offset(previous, offset, tile_extent, has_valid_layout);
                    if preserved != offset {
                        itrace!(
                            from = axis.main(offset),
                            to = axis.main(preserved),
                            tile = tile_extent,
                            "prepare: tile changed, preserving position"
                        );
                        offset = preserved;
                        rewritten = Some(preserved);
                    }
                }
            }
            Some(_) => {}
            None => {}
        }

        self.plan = plan;
        self.viewport = viewport;
        self.viewport.offset = offset;
        self.snapshot = LayoutSnapshot {
            tile,
            has_valid_layout,
            offset,
        };
        if self.previous.is_none() || !viewport.is_degenerate() {
            self.previous = Some(self.snapshot);
        }
        rewritten
    }

    fn preserved_offset(
        &self,
        previous: LayoutSnapshot,
        offset: Point,
        tile_extent: f64,
        has_valid_layout: bool,
    ) -> Point {
        let axis = self.axis();
        let old = axis.extent(previous.tile);
        // Nothing was tiled before, so the offset already lives in flow space.
        if !previous.has_valid_layout || old <= 0.0 || tile_extent <= 0.0 {
            return offset;
        }
        let main = axis.main(offset);
        let page = (main / old).floor();
        let local = (main - page * old).min(tile_extent);
        let main = if has_valid_layout {
            page * tile_extent + local
        } else {
            local
        };
        axis.with_main(offset, main)
    }

    /// Content size reported to the view system.
    ///
    /// [`PAGE_SPAN`] tiles along the scroll axis when valid, the plain flow size otherwise.
    pub fn content_size(&self) -> Size {
        if !self.snapshot.has_valid_layout {
            return self.flow.content_size();
        }
        let axis = self.axis();
        axis.size(
            self.tile_extent() * PAGE_SPAN as f64,
            axis.cross_extent(self.snapshot.tile),
        )
    }

    /// The tile containing `point`.
    pub fn page_for(&self, point: Point) -> i64 {
        let tile = self.tile_extent();
        if tile <= 0.0 {
            return 0;
        }
        (self.axis().main(point) / tile).floor() as i64
    }

    pub fn current_page(&self) -> i64 {
        self.page_for(self.snapshot.offset)
    }

    /// Normalizes `rect` into the first tile (negative origins included), then moves it into
    /// `page`.
    pub fn rect_in_page(&self, rect: Rect, page: i64) -> Rect {
        let tile = self.tile_extent();
        if tile <= 0.0 {
            return rect;
        }
        let axis = self.axis();
        let min = axis.min(rect);
        let target = min.rem_euclid(tile) + page as f64 * tile;
        axis.translate(rect, target - min)
    }

    pub fn point_in_page(&self, point: Point, page: i64) -> Point {
        self.rect_in_page(Rect::from_origin_size(point, Size::ZERO), page)
            .origin()
    }

    /// The record of a virtual item placed in `page`.
    pub fn record_for_item(&self, index_path: IndexPath, page: i64) -> Option<LayoutRecord> {
        let frame = self.flow.frame_for_item(index_path)?;
        Some(self.make_record(FlowElement {
            kind: ElementKind::Cell,
            index_path,
            frame,
        }, page))
    }

    /// The record of a real item placed in `page`, using its first replica in the tile.
    pub fn record_for_real_item(
        &self,
        real_index_path: IndexPath,
        page: i64,
    ) -> Option<LayoutRecord> {
        if !self.plan.contains_real(real_index_path) {
            return None;
        }
        self.record_for_item(real_index_path, page)
    }

    /// The record of a virtual item in the tile `delta` pages away from the current one.
    pub fn record_for_item_at_page_offset(
        &self,
        index_path: IndexPath,
        delta: i64,
    ) -> Option<LayoutRecord> {
        self.record_for_item(index_path, self.current_page() + delta)
    }

    pub fn record_for_supplementary(
        &self,
        kind: ElementKind,
        section: usize,
        page: i64,
    ) -> Option<LayoutRecord> {
        let frame = self.flow.frame_for_supplementary(kind, section)?;
        Some(self.make_record(FlowElement {
            kind,
            index_path: IndexPath::new(section, 0),
            frame,
        }, page))
    }

    /// All records whose frames intersect `query`, in content coordinates.
    ///
    /// When valid, the query is mapped into one tile; the part that runs past the end of the
    /// tile is answered from the start of the next tile, and so on until the query is covered.
    pub fn records_in_rect(&self, query: Rect) -> Vec<LayoutRecord> {
        let mut out = Vec::new();
        if !self.snapshot.has_valid_layout {
            self.flow
                .for_each_element_in_rect(query, |e| out.push(self.make_record(e, 0)));
            return out;
        }

        let axis = self.axis();
        let tile = self.tile_extent();
        let cross_min = axis.flip().min(query);
        let cross_extent = axis.cross_extent(query.size());
        let mut page = self.page_for(query.origin());
        // Local coordinates must come from the same page `page_for` picked.
        let mut rect = axis.translate(query, -(page as f64) * tile);
        loop {
            let min = axis.min(rect);
            let overflow = axis.max(rect) - tile;
            let within = if overflow > 0.0 {
                axis.rect(min, cross_min, tile - min, cross_extent)
            } else {
                rect
            };
            self.flow
                .for_each_element_in_rect(within, |e| out.push(self.make_record(e, page)));
            if overflow <= 0.0 {
                break;
            }
            rect = axis.rect(0.0, cross_min, overflow, cross_extent);
            page += 1;
        }
        out
    }

    fn make_record(&self, element: FlowElement, page: i64) -> LayoutRecord {
        let real_index_path = match element.kind {
            ElementKind::Cell => self.plan.to_real(element.index_path),
            ElementKind::Header | ElementKind::Footer => IndexPath::new(
                index::section_in_real(element.index_path.section, self.plan.real_section_count()),
                0,
            ),
        };
        let (frame, page) = if self.snapshot.has_valid_layout {
            (self.rect_in_page(element.frame, page), page)
        } else {
            (element.frame, 0)
        };
        LayoutRecord {
            kind: element.kind,
            index_path: element.index_path,
            real_index_path,
            frame,
            page,
        }
    }

    /// The offset [`Self::loop_if_needed`] would move to, if any.
    pub fn loop_target(&self) -> Option<Point> {
        if !self.snapshot.has_valid_layout {
            return None;
        }
        let offset = self.snapshot.offset;
        let page = self.page_for(offset);
        let target = self.point_in_page(offset, MIDDLE_PAGE);
        let near_edge = page < EDGE_PAGES || page > PAGE_SPAN - EDGE_PAGES;
        (near_edge && target != offset).then_some(target)
    }

    /// Moves the offset back into the middle tile when it drifted within [`EDGE_PAGES`] of
    /// either end of the span.
    ///
    /// Returns the new offset; the adapter must apply it without animation and run a layout
    /// pass before answering further queries.
    pub fn loop_if_needed(&mut self) -> Option<Point> {
        let target = self.loop_target()?;
        itrace!(
            page = self.current_page(),
            from = self.axis().main(self.snapshot.offset),
            to = self.axis().main(target),
            "loop_if_needed"
        );
        self.set_offset(target);
        Some(target)
    }

    /// Visible cells at `at` (defaults to the current offset), nearest to the viewport center
    /// first.
    pub fn visible_records(&self, at: Option<Point>) -> Vec<LayoutRecord> {
        let axis = self.axis();
        let origin = at.unwrap_or(self.snapshot.offset);
        let current = axis.main(self.snapshot.offset);
        let mut records: Vec<LayoutRecord> = self
            .records_in_rect(Rect::from_origin_size(origin, self.viewport.size))
            .into_iter()
            .filter(LayoutRecord::is_cell)
            .collect();
        let distance = |r: &LayoutRecord| (current - axis.main(self.centered_offset(r.frame))).abs();
        records.sort_by(|a, b| distance(a).total_cmp(&distance(b)));
        records
    }

    /// Picks the visible cell the viewport should settle on.
    ///
    /// - With `index_path` (real) visible, that record wins.
    /// - Otherwise, the nearest record whose centered offset is ahead of the current offset
    ///   exactly when `target` is (any record when the velocity along the axis is zero). A
    ///   target equal to the current offset counts as not ahead.
    pub fn preferred_visible_record(
        &self,
        at: Option<Point>,
        velocity: Vec2,
        target: Option<Point>,
        index_path: Option<IndexPath>,
    ) -> Option<LayoutRecord> {
        let axis = self.axis();
        let current = axis.main(self.snapshot.offset);
        let ahead = |p: Point| axis.main(p) > current;
        let target_ahead = ahead(target.unwrap_or(self.snapshot.offset));
        let velocity = axis.main_of(velocity);

        let records = self.visible_records(at);
        if let Some(index_path) = index_path {
            if let Some(record) = records.iter().find(|r| r.real_index_path == index_path) {
                return Some(*record);
            }
        }
        records
            .into_iter()
            .find(|r| velocity == 0.0 || ahead(self.centered_offset(r.frame)) == target_ahead)
    }

    /// The offset at which `frame` sits centered in the visible (inset-adjusted) area.
    ///
    /// The cross coordinate keeps the current offset.
    pub fn centered_offset(&self, frame: Rect) -> Point {
        let axis = self.axis();
        let visible = self.viewport.visible_rect();
        let main = axis.mid(frame) - axis.min(visible) - axis.extent(visible.size()) / 2.0;
        axis.with_main(self.snapshot.offset, main)
    }

    /// The offset at which `frame` starts at the leading edge of the visible area.
    pub fn leading_offset(&self, frame: Rect) -> Point {
        let axis = self.axis();
        let visible = self.viewport.visible_rect();
        axis.with_main(self.snapshot.offset, axis.min(frame) - axis.min(visible))
    }
}
