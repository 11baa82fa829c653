use infinite_grid::{IndexPath, LayoutOptions, ScrollDirection, Viewport};
use infinite_grid_adapter::{
    CellRequest, Controller, ControllerOptions, DataSource, Delegate, SelectionOutcome,
};
use kurbo::{Point, Size};

struct Photos(usize);

impl DataSource for Photos {
    fn number_of_items(&self, _section: usize) -> usize {
        self.0
    }

    fn configure_cell(&mut self, request: CellRequest) {
        println!(
            "configure {:?} with photo {}",
            request.index_path, request.real_index_path.item
        );
    }
}

struct Printer;

impl Delegate for Printer {
    fn did_select_item(&mut self, index_path: IndexPath) {
        println!("host: selected photo {}", index_path.item);
    }
}

fn main() {
    // Example: a remote-control style carousel. Moving right from the last photo continues on
    // the first one instead of jumping back.
    //
    // An adapter would:
    // - call layout_pass on each layout and apply the returned offset
    // - map arrow keys to select_item_in_direction
    // - call tick(now_ms) per frame while is_animating()
    let options = ControllerOptions::new(
        LayoutOptions::default()
            .with_item_size(Size::new(100.0, 100.0))
            .with_spacing(0.0, 0.0)
            .with_screen_size(Size::new(400.0, 800.0)),
    )
    .with_on_centered_index_change(Some(|ip: Option<IndexPath>| {
        println!("centered: {ip:?}");
    }));

    let mut c = Controller::new(options);
    c.set_data_source(Some(Box::new(Photos(5))));
    c.set_delegate(Some(Box::new(Printer)));

    let viewport = Viewport::new(Size::new(300.0, 100.0)).with_offset(Point::ZERO);
    match c.layout_pass(viewport) {
        Ok(Some(offset)) => println!("apply offset {offset:?}"),
        Ok(None) => {}
        Err(err) => {
            eprintln!("layout failed: {err}");
            return;
        }
    }
    c.configure_cell(IndexPath::new(0, 17));

    let mut now_ms = 0u64;
    let mut direction = None;
    for item in [3, 4, 0, 1] {
        let outcome = c.select_item_in_direction(IndexPath::new(0, item), direction, now_ms);
        direction = Some(ScrollDirection::Forward);
        match outcome {
            Ok(SelectionOutcome::Selected(selection)) => {
                println!("selected {:?} immediately", selection.index_path);
            }
            Ok(SelectionOutcome::Scheduled { selection, target }) => {
                println!(
                    "scrolling to {target:?} before selecting {:?}",
                    selection.index_path
                );
                while c.is_animating() {
                    now_ms += 16;
                    if let Some(offset) = c.tick(now_ms) {
                        if now_ms % 80 == 0 {
                            println!("t={now_ms} off={offset:?}");
                        }
                    }
                }
            }
            Err(err) => eprintln!("select failed: {err}"),
        }
    }

    println!(
        "done: off={:?} centered={:?}",
        c.layout().offset(),
        c.centered_index_path()
    );
}
