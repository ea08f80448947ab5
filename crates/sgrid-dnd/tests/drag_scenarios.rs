//! End-to-end drag scenarios driven through `SortableBoard`.
//!
//! 1. Cross-container transfer is exclusive at the frame it happens.
//! 2. List reorder commits the final index.
//! 3. A drag with no net change fires no move callback.
//! 4. Movement past the long-press tolerance turns the press into a click.
//! 5. Dropping outside every container returns the item to its slot.
//! 6. Transient misses are logged, not raised.
//! 7. Grid containers reorder across rows.
//! 8. Edge auto-scroll runs through board frames and stops at the extreme.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use sgrid_core::{InputEvent, ItemKey, Point, PointerPhase, Rect, SortableConfig};
use sgrid_dnd::{
    ContainerGeometry, MoveEvent, ScriptedPointerSource, SortableBoard, SortableContainer, SortableItem,
    SurfaceEvent,
};
use sgrid_layout::Stage;
use tracing::Subscriber;
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt};
use web_time::Instant;

// ── Helpers ─────────────────────────────────────────────────────────────

const ITEM_H: f64 = 20.0;
const FRAME: Duration = Duration::from_millis(16);
const LONG_PRESS: Duration = Duration::from_millis(100);

type Log<T> = Rc<RefCell<Vec<T>>>;

struct Harness {
    board: SortableBoard<String>,
    moves: Log<MoveEvent>,
    clicks: Log<ItemKey>,
    now: Instant,
}

fn k(s: &str) -> ItemKey {
    ItemKey::from(s)
}

fn keys(board: &SortableBoard<String>, id: &str) -> Vec<String> {
    board
        .container(id)
        .map(|c| c.keys().iter().map(|k| k.as_str().to_owned()).collect())
        .unwrap_or_default()
}

fn mouse(phase: PointerPhase, x: f64, y: f64) -> InputEvent {
    InputEvent::mouse(phase, x, y)
}

impl Harness {
    fn new() -> Self {
        Self {
            board: SortableBoard::new(),
            moves: Rc::default(),
            clicks: Rc::default(),
            now: Instant::now(),
        }
    }

    /// Add a container at page x-offset `x`, every item 100×20 and mounted.
    fn add(&mut self, id: &str, x: f64, config: SortableConfig, item_keys: &[&str]) {
        let geometry = ContainerGeometry::fixed(Rect::new(x, 0.0, 100.0, 300.0));
        self.add_in(id, geometry, config, item_keys);
    }

    fn add_in(&mut self, id: &str, geometry: ContainerGeometry, config: SortableConfig, item_keys: &[&str]) {
        let items = item_keys
            .iter()
            .map(|key| SortableItem::new(*key, format!("<{key}>")))
            .collect();
        let moves = Rc::clone(&self.moves);
        let clicks = Rc::clone(&self.clicks);
        let mut c = SortableContainer::new(id, config, items)
            .expect("valid container")
            .on_moved(move |e| moves.borrow_mut().push(e.clone()))
            .on_item_click(move |key| clicks.borrow_mut().push(key.clone()));
        c.set_geometry(self.now, geometry);
        for key in item_keys {
            c.confirm_item_size(&k(key), Stage::Measured, 100.0, ITEM_H);
            c.mount(k(key));
        }
        self.board.add(c).expect("unique id");
    }

    fn press(&mut self, container: &str, key: &str, x: f64, y: f64) {
        let ev = mouse(PointerPhase::Down, x, y);
        assert!(self.board.pointer_down(container, &k(key), &ev, self.now));
    }

    fn wait(&mut self, d: Duration) {
        self.now += d;
        self.board.tick(self.now);
    }

    /// Move, then run one frame.
    fn drag_to(&mut self, x: f64, y: f64) {
        self.board.pointer_move(&mouse(PointerPhase::Move, x, y));
        self.now += FRAME;
        self.board.frame(self.now);
    }

    fn release(&mut self) {
        self.board.pointer_up(&mouse(PointerPhase::Up, 0.0, 0.0), self.now);
    }

    /// Run frames until the clone is gone.
    fn settle(&mut self) {
        for _ in 0..200 {
            if self.board.drag_clone().is_none() {
                return;
            }
            self.now += FRAME;
            self.board.frame(self.now);
        }
        panic!("clone never settled");
    }

    fn moves(&self) -> Vec<MoveEvent> {
        self.moves.borrow().clone()
    }
}

fn grouped() -> SortableConfig {
    SortableConfig::list().with_group("board")
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Cross-container transfer
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn cross_container_transfer_is_exclusive() {
    let mut h = Harness::new();
    h.add("A", 0.0, grouped(), &["x", "y", "z"]);
    h.add("B", 200.0, grouped(), &["p", "q"]);

    h.press("A", "x", 10.0, 10.0);
    h.wait(LONG_PRESS);
    assert!(h.board.drag_clone().is_some());

    h.drag_to(20.0, 12.0);
    assert_eq!(keys(&h.board, "A"), ["x", "y", "z"]);

    // Over `q` (B index 1).
    h.drag_to(250.0, 30.0);
    assert_eq!(keys(&h.board, "A"), ["y", "z"]);
    assert_eq!(keys(&h.board, "B"), ["p", "x", "q"]);
    let clone = h.board.drag_clone().expect("clone");
    assert_eq!(clone.container_id, "B");
    assert_eq!(clone.origin_container, "A");
    assert!(!h.board.container("A").expect("A").drag_state().is_dragging());
    assert!(h.board.container("B").expect("B").drag_state().is_dragging_key(&k("x")));

    // The payload travelled with the clone.
    let b = h.board.container("B").expect("B");
    assert_eq!(b.items()[1].content, "<x>");

    h.release();
    h.settle();
    assert_eq!(
        h.moves(),
        vec![MoveEvent {
            key: k("x"),
            from_container: "A".into(),
            from_index: 0,
            to_container: "B".into(),
            to_index: 1,
        }]
    );
    assert!(h.clicks.borrow().is_empty());
    let b = h.board.container("B").expect("B");
    assert!(!b.drag_state().is_dragging());
    assert!(b.settling().is_none());
    assert!(b.render_plan().iter().all(|r| !r.hidden));
}

#[test]
fn ungrouped_containers_do_not_exchange() {
    let mut h = Harness::new();
    h.add("A", 0.0, SortableConfig::list(), &["x", "y"]);
    h.add("B", 200.0, SortableConfig::list(), &["p"]);
    h.press("A", "x", 10.0, 10.0);
    h.wait(LONG_PRESS);
    h.drag_to(20.0, 12.0);
    h.drag_to(250.0, 10.0);
    assert_eq!(keys(&h.board, "A"), ["x", "y"]);
    assert_eq!(keys(&h.board, "B"), ["p"]);
}

#[test]
fn drag_sources_restrict_adoption() {
    let mut h = Harness::new();
    h.add("A", 0.0, grouped(), &["x"]);
    // B lists only A, so it is a source-only member; C names itself.
    h.add("B", 200.0, grouped().with_drag_sources(["A"]), &["p"]);
    h.add("C", 400.0, grouped().with_drag_sources(["A", "C"]), &["c"]);

    h.press("A", "x", 10.0, 10.0);
    h.wait(LONG_PRESS);
    h.drag_to(20.0, 12.0);
    h.drag_to(250.0, 10.0);
    assert_eq!(keys(&h.board, "B"), ["p"]);
    assert_eq!(keys(&h.board, "A"), ["x"]);

    h.drag_to(450.0, 10.0);
    assert_eq!(keys(&h.board, "A"), Vec::<String>::new());
    assert_eq!(keys(&h.board, "C"), ["x", "c"]);
}

#[test]
fn item_can_return_to_origin_container() {
    let mut h = Harness::new();
    h.add("A", 0.0, grouped(), &["x", "y"]);
    h.add("B", 200.0, grouped(), &["p"]);
    h.press("A", "x", 10.0, 10.0);
    h.wait(LONG_PRESS);
    h.drag_to(20.0, 12.0);
    h.drag_to(250.0, 10.0);
    assert_eq!(keys(&h.board, "B"), ["x", "p"]);
    h.drag_to(20.0, 10.0);
    assert_eq!(keys(&h.board, "A"), ["x", "y"]);
    assert_eq!(keys(&h.board, "B"), ["p"]);
    h.release();
    h.settle();
    assert!(h.moves().is_empty());
}

// ═════════════════════════════════════════════════════════════════════════
// 2. List reorder
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn list_reorder_commits_final_index() {
    let mut h = Harness::new();
    h.add("L", 0.0, SortableConfig::list(), &["a", "b", "c"]);
    h.press("L", "a", 10.0, 10.0);
    h.wait(LONG_PRESS);
    h.drag_to(10.0, 50.0);
    assert_eq!(keys(&h.board, "L"), ["b", "c", "a"]);
    let state = h.board.container("L").expect("L").drag_state().clone();
    assert_eq!(state.drag_over_id, Some(k("c")));

    h.release();
    let l = h.board.container("L").expect("L");
    assert!(!l.drag_state().is_dragging());
    assert_eq!(l.settling(), Some(&k("a")));
    h.settle();
    assert_eq!(
        h.moves(),
        vec![MoveEvent {
            key: k("a"),
            from_container: "L".into(),
            from_index: 0,
            to_container: "L".into(),
            to_index: 2,
        }]
    );
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Commit idempotence
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn round_trip_drag_fires_no_callback() {
    let mut h = Harness::new();
    h.add("L", 0.0, SortableConfig::list(), &["a", "b", "c"]);
    h.press("L", "a", 10.0, 10.0);
    h.wait(LONG_PRESS);
    h.drag_to(10.0, 30.0);
    assert_eq!(keys(&h.board, "L"), ["b", "a", "c"]);
    h.drag_to(10.0, 50.0);
    assert_eq!(keys(&h.board, "L"), ["b", "c", "a"]);
    h.drag_to(10.0, 10.0);
    assert_eq!(keys(&h.board, "L"), ["a", "b", "c"]);
    h.release();
    h.settle();
    assert!(h.moves().is_empty());
}

#[test]
fn hovering_last_target_again_does_not_reorder() {
    let mut h = Harness::new();
    h.add("L", 0.0, SortableConfig::list(), &["a", "b", "c"]);
    h.press("L", "a", 10.0, 10.0);
    h.wait(LONG_PRESS);
    h.drag_to(10.0, 30.0);
    assert_eq!(keys(&h.board, "L"), ["b", "a", "c"]);
    // `b` now sits in the first slot, but it was the last reorder target.
    h.drag_to(10.0, 5.0);
    assert_eq!(keys(&h.board, "L"), ["b", "a", "c"]);
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Long-press tolerance
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn moving_past_tolerance_turns_press_into_click() {
    let mut h = Harness::new();
    h.add("L", 0.0, SortableConfig::list(), &["a", "b"]);
    h.press("L", "a", 10.0, 10.0);
    h.board.pointer_move(&mouse(PointerPhase::Move, 10.0, 10.0 + 51.0));
    h.wait(LONG_PRESS * 2);
    assert!(h.board.drag_clone().is_none());
    h.release();
    assert_eq!(h.clicks.borrow().as_slice(), &[k("a")]);
    assert!(h.moves().is_empty());
}

#[test]
fn moving_within_tolerance_still_drags() {
    let mut h = Harness::new();
    h.add("L", 0.0, SortableConfig::list(), &["a", "b"]);
    h.press("L", "a", 10.0, 10.0);
    h.board.pointer_move(&mouse(PointerPhase::Move, 10.0 + 50.0, 10.0));
    h.wait(LONG_PRESS);
    assert!(h.board.drag_clone().is_some());
    h.release();
    assert!(h.clicks.borrow().is_empty());
}

#[test]
fn quick_release_is_a_click() {
    let mut h = Harness::new();
    h.add("L", 0.0, SortableConfig::list(), &["a"]);
    h.press("L", "a", 10.0, 10.0);
    h.wait(Duration::from_millis(40));
    h.release();
    h.wait(LONG_PRESS);
    assert!(h.board.drag_clone().is_none());
    assert_eq!(h.clicks.borrow().as_slice(), &[k("a")]);
}

#[test]
fn non_sortable_container_only_clicks() {
    let mut h = Harness::new();
    h.add("L", 0.0, SortableConfig::list().with_sortable(false), &["a"]);
    h.press("L", "a", 10.0, 10.0);
    h.wait(LONG_PRESS * 3);
    assert!(h.board.drag_clone().is_none());
    h.release();
    assert_eq!(h.clicks.borrow().len(), 1);
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Drop outside
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn drop_outside_returns_item() {
    let mut h = Harness::new();
    h.add("L", 0.0, SortableConfig::list(), &["a", "b", "c"]);
    h.press("L", "b", 10.0, 30.0);
    h.wait(LONG_PRESS);
    h.drag_to(600.0, 900.0);
    let clone = h.board.drag_clone().expect("clone");
    assert_eq!(clone.position(), Point::new(590.0, 890.0));
    h.release();
    h.settle();
    assert_eq!(keys(&h.board, "L"), ["a", "b", "c"]);
    assert!(h.moves().is_empty());
    assert!(!h.board.container("L").expect("L").drag_state().is_dragging());
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Scripted source and logging
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn pump_routes_scripted_events() {
    let mut h = Harness::new();
    h.add("L", 0.0, SortableConfig::list(), &["a", "b", "c"]);
    let mut src: ScriptedPointerSource = [
        SurfaceEvent::ItemDown {
            container: "L".into(),
            key: k("c"),
            event: mouse(PointerPhase::Down, 10.0, 50.0),
        },
        SurfaceEvent::Move(mouse(PointerPhase::Move, 12.0, 52.0)),
    ]
    .into_iter()
    .collect();
    assert_eq!(h.board.pump(&mut src, h.now), 2);
    assert!(src.is_empty());

    h.now += LONG_PRESS;
    h.board.pump(&mut src, h.now);
    assert!(h.board.drag_clone().is_some_and(|c| c.key == k("c")));

    src.push(SurfaceEvent::Move(mouse(PointerPhase::Move, 10.0, 5.0)));
    h.board.pump(&mut src, h.now);
    h.now += FRAME;
    h.board.frame(h.now);
    assert_eq!(keys(&h.board, "L"), ["c", "a", "b"]);

    src.push(SurfaceEvent::Up(mouse(PointerPhase::Up, 10.0, 5.0)));
    h.board.pump(&mut src, h.now);
    h.settle();
    assert_eq!(h.moves().len(), 1);
    assert_eq!(h.moves()[0].to_index, 0);
}

#[derive(Default)]
struct Captured {
    messages: Vec<String>,
}

struct CaptureLayer {
    state: Arc<Mutex<Captured>>,
}

impl<S> Layer<S> for CaptureLayer
where
    S: Subscriber + for<'lookup> tracing_subscriber::registry::LookupSpan<'lookup>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        struct V {
            message: Option<String>,
        }
        impl tracing::field::Visit for V {
            fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
                if field.name() == "message" {
                    self.message = Some(value.to_owned());
                }
            }

            fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
                if field.name() == "message" {
                    self.message = Some(format!("{value:?}").trim_matches('"').to_owned());
                }
            }
        }
        if *event.metadata().level() > tracing::Level::WARN {
            return;
        }
        let mut v = V { message: None };
        event.record(&mut v);
        if let Some(message) = v.message {
            self.state.lock().expect("capture lock").messages.push(message);
        }
    }
}

#[test]
fn unmeasured_item_logs_and_aborts() {
    let state = Arc::new(Mutex::new(Captured::default()));
    let subscriber = tracing_subscriber::registry().with(CaptureLayer {
        state: Arc::clone(&state),
    });

    tracing::subscriber::with_default(subscriber, || {
        let mut board = SortableBoard::new();
        let items = vec![SortableItem::new("a", ()), SortableItem::new("b", ())];
        let mut c = SortableContainer::new("L", SortableConfig::list(), items).expect("valid");
        let now = Instant::now();
        c.set_geometry(now, ContainerGeometry::fixed(Rect::new(0.0, 0.0, 100.0, 100.0)));
        c.mount(k("a"));
        board.add(c).expect("add");

        let ev = InputEvent::mouse(PointerPhase::Down, 5.0, 5.0);
        board.pointer_down("L", &k("a"), &ev, now);
        board.tick(now + LONG_PRESS);
        assert!(board.drag_clone().is_none());

        board.pointer_down("L", &k("missing"), &ev, now);
    });

    let messages = state.lock().expect("capture lock").messages.clone();
    assert!(messages.iter().any(|m| m == "drag.start.unmeasured"), "{messages:?}");
    assert!(messages.iter().any(|m| m == "press.unknown_key"), "{messages:?}");
}

// ═════════════════════════════════════════════════════════════════════════
// 7. Grid mode
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn grid_reorder_moves_across_rows() {
    let mut h = Harness::new();
    // Three 100px columns: row 0 is a b c, row 1 is d e f.
    let geometry = ContainerGeometry::fixed(Rect::new(0.0, 0.0, 300.0, 300.0));
    h.add_in("G", geometry, SortableConfig::grid(), &["a", "b", "c", "d", "e", "f"]);
    let g = h.board.container("G").expect("G");
    assert_eq!(g.layout().column_count(), 3);
    assert_eq!(g.render_plan().len(), 6);

    h.press("G", "a", 10.0, 10.0);
    h.wait(LONG_PRESS);
    // Over `e`, second row, middle column.
    h.drag_to(150.0, 30.0);
    assert_eq!(keys(&h.board, "G"), ["b", "c", "d", "e", "a", "f"]);
    let a = h.board.container("G").expect("G").item_page_rect(&k("a")).expect("a placed");
    assert_eq!(a, Rect::new(100.0, 20.0, 100.0, 20.0));

    h.release();
    h.settle();
    assert_eq!(
        h.moves(),
        vec![MoveEvent {
            key: k("a"),
            from_container: "G".into(),
            from_index: 0,
            to_container: "G".into(),
            to_index: 4,
        }]
    );
}

// ═════════════════════════════════════════════════════════════════════════
// 8. Auto-scroll
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn autoscroll_runs_until_bottom_then_stops() {
    let mut h = Harness::new();
    let mut config = SortableConfig::list();
    config.options.scroll_threshold = 50.0;
    // 300px viewport over 400px of content: at most 100px of scroll.
    let geometry = ContainerGeometry::fixed(Rect::new(0.0, 0.0, 100.0, 300.0)).with_scroll(0.0, 400.0);
    h.add_in("L", geometry, config, &["a", "b", "c"]);

    h.press("L", "a", 10.0, 10.0);
    h.wait(LONG_PRESS);
    h.drag_to(10.0, 290.0);
    let l = h.board.container("L").expect("L");
    let first = l.geometry().scroll_top;
    assert!(first > 0.0 && first < 100.0, "scrolled {first}");
    assert!(l.is_auto_scrolling());

    // No pointer movement: the loop keeps going on its own.
    h.now += FRAME;
    h.board.frame(h.now);
    assert_eq!(h.board.container("L").expect("L").geometry().scroll_top, 100.0);

    h.now += FRAME;
    h.board.frame(h.now);
    let l = h.board.container("L").expect("L");
    assert!(!l.is_auto_scrolling());
    assert_eq!(l.geometry().scroll_top, 100.0);

    h.release();
    h.settle();
    assert_eq!(keys(&h.board, "L"), ["a", "b", "c"]);
    assert!(h.moves().is_empty());
}
