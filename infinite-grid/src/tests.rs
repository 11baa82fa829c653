use crate::*;

use alloc::vec;
use alloc::vec::Vec;

use kurbo::{Insets, Point, Rect, Size, Vec2};

fn looping_options() -> LayoutOptions {
    LayoutOptions::default()
        .with_item_size(Size::new(100.0, 100.0))
        .with_spacing(0.0, 0.0)
        .with_screen_size(Size::new(400.0, 800.0))
}

fn viewport_at(x: f64) -> Viewport {
    Viewport::new(Size::new(300.0, 100.0)).with_offset(Point::new(x, 0.0))
}

fn prepared(options: LayoutOptions, counts: Vec<usize>, x: f64) -> LoopingLayout {
    let plan = ReplicationPlan::for_layout(counts, &options);
    let mut layout = LoopingLayout::new(options);
    layout.prepare(plan, viewport_at(x));
    layout
}

fn centered_real(layout: &LoopingLayout) -> Option<IndexPath> {
    layout
        .visible_records(None)
        .first()
        .map(|r| r.real_index_path)
}

#[test]
fn section_in_real_wraps_and_clamps() {
    assert_eq!(index::section_in_real(7, 3), 1);
    assert_eq!(index::section_in_real(2, 3), 2);
    assert_eq!(index::section_in_real(4, 0), 0);
}

#[test]
fn to_real_maps_item_modulo_section_count() {
    assert_eq!(
        index::to_real(IndexPath::new(5, 13), 3, 5),
        IndexPath::new(2, 3)
    );
    assert_eq!(
        index::to_real(IndexPath::new(1, 9), 2, 0),
        IndexPath::new(1, 0)
    );
}

#[test]
fn single_section_inflates_items() {
    let options = looping_options();
    let plan = ReplicationPlan::for_layout(vec![5], &options);
    assert_eq!(plan.multiplier(), 4);
    assert_eq!(plan.section_count(), 1);
    assert_eq!(plan.item_count(0), 20);
    assert_eq!(plan.to_real(IndexPath::new(0, 17)), IndexPath::new(0, 2));
}

#[test]
fn multiple_sections_inflate_sections() {
    let options = looping_options().with_item_size(Size::new(600.0, 100.0));
    let plan = ReplicationPlan::for_layout(vec![2, 2, 2], &options);
    // 6 * 600 + 2 * 240 = 4080 >= 3200 (4 * 800)
    assert_eq!(plan.multiplier(), 6);
    assert_eq!(plan.section_count(), 18);
    assert!(plan.item_counts().all(|n| n == 2));
    assert_eq!(plan.to_real(IndexPath::new(10, 1)), IndexPath::new(1, 1));
}

#[test]
fn multiplier_is_one_below_threshold_or_empty() {
    let metrics = ReplicationMetrics {
        item_extent: 100.0,
        ..ReplicationMetrics::default()
    };
    assert_eq!(multiplier(&metrics, 3, 1, 400.0), 1);
    assert_eq!(multiplier(&metrics, 0, 1, 400.0), 1);
    assert_eq!(multiplier(&metrics, 4, 1, 400.0), 4);
    assert_eq!(inflated_section_count(1, 4), 1);
    assert_eq!(inflated_item_count(5, 1, 4), 20);
    assert_eq!(inflated_section_count(3, 4), 12);
    assert_eq!(inflated_item_count(5, 3, 4), 5);
}

#[test]
fn disabled_layout_never_inflates() {
    let options = looping_options().with_enabled(false);
    let plan = ReplicationPlan::for_layout(vec![50], &options);
    assert_eq!(plan.multiplier(), 1);

    let layout = prepared(options, vec![50], 0.0);
    assert!(!layout.has_valid_layout());
    assert_eq!(layout.content_size(), Size::new(5000.0, 100.0));
}

#[test]
fn valid_layout_reports_page_span_tiles() {
    let layout = prepared(looping_options(), vec![5], 0.0);
    assert!(layout.has_valid_layout());
    assert_eq!(layout.snapshot().tile, Size::new(2000.0, 100.0));
    assert_eq!(
        layout.content_size(),
        Size::new(2000.0 * PAGE_SPAN as f64, 100.0)
    );
}

#[test]
fn content_below_threshold_behaves_like_plain_flow() {
    let options = looping_options();
    let mut layout = prepared(options, vec![3], 0.0);
    assert!(!layout.has_valid_layout());
    assert_eq!(layout.content_size(), Size::new(300.0, 100.0));
    assert_eq!(layout.content_size(), layout.flow().content_size());
    assert_eq!(layout.loop_if_needed(), None);

    let records = layout.records_in_rect(Rect::new(0.0, 0.0, 300.0, 100.0));
    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| r.page == 0));
}

#[test]
fn degenerate_bounds_are_not_valid() {
    let options = looping_options();
    let plan = ReplicationPlan::for_layout(vec![5], &options);
    let mut layout = LoopingLayout::new(options);
    layout.prepare(plan, Viewport::new(Size::ZERO));
    assert!(!layout.has_valid_layout());
}

#[test]
fn loop_from_first_page_moves_to_middle_page() {
    let mut layout = prepared(looping_options(), vec![5], 0.0);
    assert_eq!(layout.loop_if_needed(), Some(Point::new(500_000.0, 0.0)));
    assert_eq!(layout.current_page(), MIDDLE_PAGE);
    assert_eq!(centered_real(&layout), Some(IndexPath::new(0, 1)));
}

#[test]
fn loop_preserves_centered_index() {
    let mut layout = prepared(looping_options(), vec![5], 2200.0);
    assert_eq!(layout.current_page(), 1);
    assert_eq!(centered_real(&layout), Some(IndexPath::new(0, 3)));

    assert_eq!(layout.loop_if_needed(), Some(Point::new(500_200.0, 0.0)));
    assert_eq!(centered_real(&layout), Some(IndexPath::new(0, 3)));
}

#[test]
fn loop_is_idempotent() {
    let mut layout = prepared(looping_options(), vec![5], 2200.0);
    let first = layout.loop_if_needed();
    assert!(first.is_some());
    let offset = layout.offset();
    assert_eq!(layout.loop_if_needed(), None);
    assert_eq!(layout.offset(), offset);
}

#[test]
fn loop_leaves_middle_band_alone() {
    let mut layout = prepared(looping_options(), vec![5], 2000.0 * 3.0);
    assert_eq!(layout.loop_if_needed(), None);

    let mut layout = prepared(looping_options(), vec![5], 2000.0 * 498.5);
    assert_eq!(layout.loop_if_needed(), None);

    let mut layout = prepared(looping_options(), vec![5], 2000.0 * 499.0 + 50.0);
    assert_eq!(layout.loop_if_needed(), Some(Point::new(500_050.0, 0.0)));
}

#[test]
fn rect_in_page_normalizes_negative_origins() {
    let layout = prepared(looping_options(), vec![5], 500_000.0);
    let rect = layout.rect_in_page(Rect::new(-100.0, 0.0, 0.0, 100.0), MIDDLE_PAGE);
    assert_eq!(rect, Rect::new(501_900.0, 0.0, 502_000.0, 100.0));
}

#[test]
fn records_in_rect_spill_into_next_tile() {
    let layout = prepared(looping_options(), vec![5], 501_900.0);
    let records = layout.records_in_rect(Rect::new(501_900.0, 0.0, 502_200.0, 100.0));

    let virtual_items: Vec<usize> = records.iter().map(|r| r.index_path.item).collect();
    let real_items: Vec<usize> = records.iter().map(|r| r.real_index_path.item).collect();
    let pages: Vec<i64> = records.iter().map(|r| r.page).collect();
    let starts: Vec<f64> = records.iter().map(|r| r.frame.x0).collect();
    assert_eq!(virtual_items, vec![19, 0, 1]);
    assert_eq!(real_items, vec![4, 0, 1]);
    assert_eq!(pages, vec![250, 251, 251]);
    assert_eq!(starts, vec![501_900.0, 502_000.0, 502_100.0]);
}

#[test]
fn records_in_rect_cover_several_tiles() {
    let layout = prepared(looping_options(), vec![5], 500_000.0);
    let records = layout.records_in_rect(Rect::new(500_000.0, 0.0, 505_000.0, 100.0));
    assert_eq!(records.len(), 50);
    for pair in records.windows(2) {
        assert_eq!(pair[1].frame.x0 - pair[0].frame.x0, 100.0);
    }
}

#[test]
fn record_lookup_by_page_offset() {
    let layout = prepared(looping_options(), vec![5], 500_000.0);
    let record = layout
        .record_for_item_at_page_offset(IndexPath::new(0, 3), 1)
        .unwrap();
    assert_eq!(record.page, 251);
    assert_eq!(record.frame.x0, 502_300.0);

    let record = layout
        .record_for_real_item(IndexPath::new(0, 4), MIDDLE_PAGE)
        .unwrap();
    assert_eq!(record.frame.x0, 500_400.0);
    assert!(
        layout
            .record_for_real_item(IndexPath::new(0, 5), MIDDLE_PAGE)
            .is_none()
    );
}

#[test]
fn prepare_preserves_position_when_tile_changes() {
    let mut layout = prepared(looping_options(), vec![5], 500_200.0);
    assert_eq!(layout.tile_extent(), 2000.0);

    let options = looping_options().with_spacing(10.0, 0.0);
    layout.set_options(options);
    let plan = ReplicationPlan::for_layout(vec![5], &options);
    let rewritten = layout.prepare(plan, viewport_at(500_200.0));

    assert_eq!(layout.tile_extent(), 2200.0);
    assert_eq!(rewritten, Some(Point::new(550_200.0, 0.0)));
    assert_eq!(layout.offset(), Point::new(550_200.0, 0.0));
    assert_eq!(layout.current_page(), MIDDLE_PAGE);
}

#[test]
fn prepare_without_tile_change_keeps_offset() {
    let options = looping_options();
    let mut layout = prepared(options, vec![5], 500_200.0);
    let plan = ReplicationPlan::for_layout(vec![5], &options);
    assert_eq!(layout.prepare(plan, viewport_at(500_200.0)), None);
}

#[test]
fn prepare_returns_to_flow_space_when_looping_stops() {
    let mut layout = prepared(looping_options(), vec![5], 500_200.0);
    let options = looping_options().with_enabled(false);
    layout.set_options(options);
    let plan = ReplicationPlan::for_layout(vec![5], &options);
    let rewritten = layout.prepare(plan, viewport_at(500_200.0));
    assert!(!layout.has_valid_layout());
    assert_eq!(rewritten, Some(Point::new(200.0, 0.0)));
}

#[test]
fn centered_offset_accounts_for_insets() {
    let options = looping_options();
    let plan = ReplicationPlan::for_layout(vec![5], &options);
    let mut layout = LoopingLayout::new(options);
    let viewport = viewport_at(500_000.0).with_content_inset(Insets::new(20.0, 0.0, 0.0, 0.0));
    layout.prepare(plan, viewport);

    // visible area is 280 wide starting at 20: center lands at 20 + 140
    let frame = Rect::new(500_100.0, 0.0, 500_200.0, 100.0);
    assert_eq!(layout.centered_offset(frame), Point::new(499_990.0, 0.0));
    assert_eq!(layout.leading_offset(frame), Point::new(500_080.0, 0.0));
}

#[test]
fn drag_end_with_forward_velocity_settles_ahead() {
    let layout = prepared(looping_options(), vec![5], 500_000.0);
    let paging = PagingController::new(true, 1.0);
    let target = paging.center_on_drag_end(
        &layout,
        Vec2::new(120.0, 0.0),
        Point::new(500_400.0, 0.0),
    );
    assert_eq!(target, Point::new(500_100.0, 0.0));
}

#[test]
fn drag_end_with_backward_velocity_settles_behind() {
    let layout = prepared(looping_options(), vec![5], 500_050.0);
    let paging = PagingController::new(true, 1.0);
    let target = paging.center_on_drag_end(
        &layout,
        Vec2::new(-120.0, 0.0),
        Point::new(499_600.0, 0.0),
    );
    assert_eq!(target, Point::new(500_000.0, 0.0));
}

#[test]
fn drag_end_onto_current_offset_still_snaps() {
    // A target equal to the current offset is "not ahead": the nearest cell behind wins.
    let layout = prepared(looping_options(), vec![5], 500_050.0);
    let paging = PagingController::new(true, 1.0);
    let target = paging.center_on_drag_end(
        &layout,
        Vec2::new(120.0, 0.0),
        Point::new(500_050.0, 0.0),
    );
    assert_eq!(target, Point::new(500_000.0, 0.0));
}

#[test]
fn drag_end_without_velocity_settles_on_nearest() {
    let layout = prepared(looping_options(), vec![5], 500_000.0);
    let paging = PagingController::new(true, 1.0);
    let target = paging.center_on_drag_end(&layout, Vec2::ZERO, Point::new(500_000.0, 0.0));
    assert_eq!(target, Point::new(500_000.0, 0.0));
}

#[test]
fn drag_end_is_untouched_when_paging_disabled() {
    let layout = prepared(looping_options(), vec![5], 500_000.0);
    let paging = PagingController::new(false, 1.0);
    let target = Point::new(500_433.0, 0.0);
    assert_eq!(
        paging.center_on_drag_end(&layout, Vec2::new(120.0, 0.0), target),
        target
    );
}

#[test]
fn center_if_needed_fires_once_per_content_size() {
    let layout = prepared(looping_options(), vec![5], 500_000.0);
    let mut paging = PagingController::new(true, 1.0);

    assert_eq!(paging.center_if_needed(&layout, true, None), None);
    assert_eq!(
        paging.center_if_needed(&layout, false, None),
        Some(Point::new(499_900.0, 0.0))
    );
    assert_eq!(paging.center_if_needed(&layout, false, None), None);

    paging.reset();
    assert_eq!(
        paging.center_if_needed(&layout, false, Some(IndexPath::new(0, 2))),
        Some(Point::new(500_100.0, 0.0))
    );
}

#[test]
fn center_if_needed_keeps_the_visible_cell_when_preferred_is_off_screen() {
    // Items 1 through 4 are visible; no copy of the preferred item 0 is.
    let layout = prepared(looping_options(), vec![5], 500_180.0);
    let mut paging = PagingController::new(true, 1.0);
    assert_eq!(
        paging.center_if_needed(&layout, false, None),
        Some(Point::new(500_200.0, 0.0))
    );

    let layout = prepared(looping_options(), vec![5], 500_200.0);
    paging.reset();
    assert_eq!(paging.center_if_needed(&layout, false, None), None);
}

#[test]
fn single_item_below_threshold_is_a_plain_flow() {
    let options = looping_options();
    let plan = ReplicationPlan::for_layout(vec![1], &options);
    assert_eq!(plan.multiplier(), 1);

    let mut layout = prepared(options, vec![1], 0.0);
    assert!(!layout.has_valid_layout());
    assert_eq!(layout.content_size(), Size::new(100.0, 100.0));
    assert_eq!(layout.content_size(), layout.flow().content_size());
    assert_eq!(layout.loop_if_needed(), None);
}

#[test]
fn single_item_at_threshold_loops() {
    let options = looping_options().with_item_size(Size::new(400.0, 100.0));
    let plan = ReplicationPlan::for_layout(vec![1], &options);
    assert_eq!(plan.multiplier(), 1);
    assert_eq!(plan.item_count(0), 1);

    let mut layout = prepared(options, vec![1], 0.0);
    assert!(layout.has_valid_layout());
    assert_eq!(layout.content_size(), Size::new(200_000.0, 100.0));
    assert_eq!(layout.loop_if_needed(), Some(Point::new(100_000.0, 0.0)));
    assert_eq!(centered_real(&layout), Some(IndexPath::new(0, 0)));
}

#[test]
fn records_in_rect_at_an_exact_tile_boundary_stay_in_one_tile() {
    // 2000.5 / 400.1 rounds to exactly 5 while the euclidean remainder lands just below
    // 400.1; both must agree on the page.
    let options = looping_options().with_item_size(Size::new(400.1, 100.0));
    let layout = prepared(options, vec![1], 2000.5);
    assert!(layout.has_valid_layout());

    let records = layout.records_in_rect(Rect::new(2000.5, 0.0, 2100.5, 100.0));
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].page, 5);
    assert_eq!(records[0].frame.x0, 2000.5);
}

#[test]
fn flow_places_headers_items_and_footers() {
    let metrics = FlowMetrics {
        axis: Axis::Vertical,
        section_inset: Insets::uniform(5.0),
        header_size: Size::new(0.0, 20.0),
        footer_size: Size::new(0.0, 30.0),
        ..FlowMetrics::default()
    };
    let mut flow = FlowLayout::new(metrics);
    flow.prepare([5, 1], Size::new(180.0, 400.0));

    assert_eq!(flow.section_count(), 2);
    assert_eq!(flow.content_size(), Size::new(180.0, 280.0));
    assert_eq!(
        flow.frame_for_item(IndexPath::new(0, 4)),
        Some(Rect::new(65.0, 85.0, 115.0, 135.0))
    );
    assert_eq!(
        flow.frame_for_item(IndexPath::new(1, 0)),
        Some(Rect::new(5.0, 195.0, 55.0, 245.0))
    );
    assert_eq!(flow.frame_for_item(IndexPath::new(1, 1)), None);
    assert_eq!(
        flow.frame_for_supplementary(ElementKind::Header, 1),
        Some(Rect::new(0.0, 170.0, 180.0, 190.0))
    );
    assert_eq!(
        flow.frame_for_supplementary(ElementKind::Footer, 0),
        Some(Rect::new(0.0, 140.0, 180.0, 170.0))
    );
}

#[test]
fn flow_elements_in_rect_include_supplementary_views() {
    let metrics = FlowMetrics {
        axis: Axis::Vertical,
        section_inset: Insets::uniform(5.0),
        header_size: Size::new(0.0, 20.0),
        footer_size: Size::new(0.0, 30.0),
        ..FlowMetrics::default()
    };
    let mut flow = FlowLayout::new(metrics);
    flow.prepare([5, 1], Size::new(180.0, 400.0));

    let found: Vec<(ElementKind, IndexPath)> = flow
        .elements_in_rect(Rect::new(0.0, 130.0, 180.0, 200.0))
        .into_iter()
        .map(|e| (e.kind, e.index_path))
        .collect();
    assert_eq!(
        found,
        vec![
            (ElementKind::Cell, IndexPath::new(0, 3)),
            (ElementKind::Cell, IndexPath::new(0, 4)),
            (ElementKind::Footer, IndexPath::new(0, 0)),
            (ElementKind::Header, IndexPath::new(1, 0)),
            (ElementKind::Cell, IndexPath::new(1, 0)),
        ]
    );
}

#[test]
fn flow_without_supplementary_sizes_has_no_headers() {
    let mut flow = FlowLayout::new(FlowMetrics::default());
    flow.prepare([3], Size::new(50.0, 50.0));
    assert_eq!(flow.frame_for_supplementary(ElementKind::Header, 0), None);
    assert!(
        flow.elements_in_rect(Rect::new(0.0, 0.0, 500.0, 50.0))
            .iter()
            .all(|e| e.kind == ElementKind::Cell)
    );
}

#[test]
fn replicated_headers_map_to_real_sections() {
    let options = looping_options()
        .with_item_size(Size::new(600.0, 100.0))
        .with_header_size(Size::new(50.0, 0.0));
    let layout = prepared(options, vec![2, 2, 2], 500_000.0);
    assert!(layout.has_valid_layout());
    // 18 sections of 50 + 2 * 600
    assert_eq!(layout.tile_extent(), 22_500.0);

    let header = layout
        .record_for_supplementary(ElementKind::Header, 4, MIDDLE_PAGE)
        .unwrap();
    assert_eq!(header.index_path, IndexPath::new(4, 0));
    assert_eq!(header.real_index_path, IndexPath::new(1, 0));
    assert_eq!(header.frame.x0, 22_500.0 * 250.0 + 4.0 * 1250.0);
}

#[test]
fn visible_records_skip_supplementary_views() {
    let options = looping_options().with_header_size(Size::new(50.0, 0.0));
    let layout = prepared(options, vec![5], 500_000.0);
    assert!(
        layout
            .visible_records(None)
            .iter()
            .all(LayoutRecord::is_cell)
    );
}

#[test]
fn preferred_visible_record_honors_visible_index_path() {
    let layout = prepared(looping_options(), vec![5], 500_000.0);
    let record = layout
        .preferred_visible_record(None, Vec2::ZERO, None, Some(IndexPath::new(0, 2)))
        .unwrap();
    assert_eq!(record.real_index_path, IndexPath::new(0, 2));

    // not visible: falls back to the nearest cell
    let record = layout
        .preferred_visible_record(None, Vec2::ZERO, None, Some(IndexPath::new(0, 4)))
        .unwrap();
    assert_eq!(record.real_index_path, IndexPath::new(0, 1));
}

#[test]
fn vertical_axis_loops_along_y() {
    let options = looping_options().with_axis(Axis::Vertical);
    // single section threshold uses the screen height (800)
    assert_eq!(ReplicationPlan::for_layout(vec![5], &options).multiplier(), 1);
    let plan = ReplicationPlan::for_layout(vec![10], &options);
    assert_eq!(plan.multiplier(), 8);

    let mut layout = LoopingLayout::new(options);
    layout.prepare(plan, Viewport::new(Size::new(100.0, 300.0)));
    assert!(layout.has_valid_layout());
    assert_eq!(layout.tile_extent(), 8000.0);
    assert_eq!(
        layout.loop_if_needed(),
        Some(Point::new(0.0, 8000.0 * MIDDLE_PAGE as f64))
    );
}

#[test]
fn error_messages_name_the_problem() {
    let err = Error::IndexPathOutOfRange {
        index_path: IndexPath::new(3, 1),
        sections: 2,
    };
    assert!(alloc::format!("{err}").contains("2 sections"));
    assert!(alloc::format!("{}", Error::MissingDataSource).contains("data source"));
}
