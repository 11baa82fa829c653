// Example: one looping pass by hand, without a controller.
use infinite_grid::{LayoutOptions, LoopingLayout, ReplicationPlan, Viewport};
use kurbo::{Point, Rect, Size};

fn main() {
    let options = LayoutOptions::default()
        .with_item_size(Size::new(100.0, 100.0))
        .with_spacing(0.0, 0.0)
        .with_screen_size(Size::new(400.0, 800.0));

    let plan = ReplicationPlan::for_layout(vec![5], &options);
    println!(
        "multiplier={} sections={} items={}",
        plan.multiplier(),
        plan.section_count(),
        plan.item_count(0)
    );

    let mut layout = LoopingLayout::new(options);
    let viewport = Viewport::new(Size::new(300.0, 100.0)).with_offset(Point::ZERO);
    layout.prepare(plan.clone(), viewport);
    println!(
        "valid={} tile={} content_size={:?}",
        layout.has_valid_layout(),
        layout.tile_extent(),
        layout.content_size()
    );

    if let Some(offset) = layout.loop_if_needed() {
        println!("looped to {offset:?}");
        let viewport = *layout.viewport();
        layout.prepare(plan, viewport);
    }

    let visible = layout.visible_records(None);
    if let Some(centered) = visible.first() {
        println!(
            "centered: virtual={:?} real={:?} page={}",
            centered.index_path, centered.real_index_path, centered.page
        );
    }

    // A query straddling two tiles is answered from both.
    let query = Rect::new(501_850.0, 0.0, 502_150.0, 100.0);
    for record in layout.records_in_rect(query) {
        println!(
            "{:?} real={:?} page={} x0={}",
            record.index_path, record.real_index_path, record.page, record.frame.x0
        );
    }
}
