use fenceplot_core::SiteConfig;
use fenceplot_core::ids::MountId;
use fenceplot_render::board::{
    Board, BoardEngine, BoardOptions, BoardPhase, InteractiveBoardController, KeyOutcome,
    Viewport,
};
use fenceplot_render::scheduler::EventLoop;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

const INITIAL_BOX: [f64; 4] = [0.0, 10.0, 10.0, 0.0];

#[derive(Default)]
struct Tracker {
    live: Cell<usize>,
    max_live: Cell<usize>,
    created: Cell<usize>,
    freed: Cell<usize>,
    scripts: RefCell<Vec<String>>,
}

struct MockBoard {
    tracker: Rc<Tracker>,
    viewport: Viewport,
}

impl Board for MockBoard {
    fn parse_script(&mut self, script: &str) -> Result<(), String> {
        self.tracker.scripts.borrow_mut().push(script.to_string());
        if script.contains("oops") {
            return Err("Unexpected token `oops` at line 1".to_string());
        }
        Ok(())
    }

    fn bounding_box(&self) -> Viewport {
        self.viewport
    }

    fn set_bounding_box(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }
}

struct MockEngine {
    tracker: Rc<Tracker>,
    fail_init: bool,
}

impl BoardEngine for MockEngine {
    type Board = MockBoard;

    fn init_board(
        &mut self,
        mount_id: &MountId,
        options: &BoardOptions,
    ) -> Result<MockBoard, String> {
        assert!(!mount_id.as_str().contains(':'));
        assert!(options.pan.enabled);
        if self.fail_init {
            return Err(format!("no element with id {mount_id}"));
        }
        let t = &self.tracker;
        t.created.set(t.created.get() + 1);
        t.live.set(t.live.get() + 1);
        t.max_live.set(t.max_live.get().max(t.live.get()));
        Ok(MockBoard {
            tracker: t.clone(),
            viewport: Viewport::from_array(INITIAL_BOX),
        })
    }

    fn free_board(&mut self, board: MockBoard) {
        let t = &board.tracker;
        t.live.set(t.live.get() - 1);
        t.freed.set(t.freed.get() + 1);
    }
}

fn controller(
    event_loop: &EventLoop,
    fail_init: bool,
) -> (InteractiveBoardController<MockEngine>, Rc<Tracker>) {
    let tracker = Rc::new(Tracker::default());
    let engine = MockEngine {
        tracker: tracker.clone(),
        fail_init,
    };
    (
        InteractiveBoardController::new(engine, event_loop.scheduler(), &SiteConfig::default()),
        tracker,
    )
}

#[test]
fn rapid_script_changes_keep_one_live_board() {
    let mut event_loop = EventLoop::new();
    let (ctl, tracker) = controller(&event_loop, false);

    ctl.mount("point A");
    ctl.set_script("point B");
    ctl.set_script("point C");
    event_loop.run_turn();

    assert_eq!(tracker.max_live.get(), 1);
    assert_eq!(tracker.live.get(), 1);
    assert_eq!(tracker.created.get(), 3);
    assert_eq!(tracker.freed.get(), 2);
    assert_eq!(tracker.scripts.borrow().last().map(String::as_str), Some("point C"));
    assert_eq!(ctl.script().as_deref(), Some("point C"));
    assert_eq!(ctl.phase(), BoardPhase::Ready);
}

#[test]
fn same_script_does_not_rebuild() {
    let event_loop = EventLoop::new();
    let (ctl, tracker) = controller(&event_loop, false);

    ctl.mount("point A");
    ctl.set_script("point A");
    assert_eq!(tracker.created.get(), 1);
}

#[test]
fn keyboard_pan_composes_from_current_box() {
    let event_loop = EventLoop::new();
    let (ctl, _) = controller(&event_loop, false);
    ctl.mount("point A");

    assert_eq!(ctl.handle_key("ArrowRight"), KeyOutcome::Ignored, "needs focus");
    ctl.focus();

    assert_eq!(
        ctl.handle_key("ArrowRight"),
        KeyOutcome::Panned(Viewport::from_array([0.5, 10.0, 10.5, 0.0]))
    );
    assert_eq!(
        ctl.handle_key("l"),
        KeyOutcome::Panned(Viewport::from_array([1.0, 10.0, 11.0, 0.0]))
    );
    assert_eq!(ctl.handle_key("Enter"), KeyOutcome::Ignored);
    assert_eq!(
        ctl.viewport().map(Viewport::to_array),
        Some([1.0, 10.0, 11.0, 0.0])
    );

    ctl.blur();
    assert_eq!(ctl.handle_key("ArrowLeft"), KeyOutcome::Ignored);
}

#[test]
fn keyboard_pan_step_comes_from_site_config() {
    let event_loop = EventLoop::new();
    let tracker = Rc::new(Tracker::default());
    let engine = MockEngine {
        tracker: tracker.clone(),
        fail_init: false,
    };
    let mut config = SiteConfig::default();
    config.set_value("board.keyboardPanStep", serde_json::json!(0.1));
    let ctl = InteractiveBoardController::new(engine, event_loop.scheduler(), &config);
    ctl.mount("point A");
    ctl.focus();

    assert_eq!(
        ctl.handle_key("ArrowRight"),
        KeyOutcome::Panned(Viewport::from_array([1.0, 10.0, 11.0, 0.0]))
    );
}

#[test]
fn reset_is_a_fresh_initialization() {
    let event_loop = EventLoop::new();
    let (ctl, tracker) = controller(&event_loop, false);
    ctl.mount("point A");
    ctl.focus();
    ctl.handle_key("ArrowUp");
    ctl.handle_key("h");

    ctl.reset();
    let after_first = ctl.viewport();
    ctl.reset();
    let after_second = ctl.viewport();

    assert_eq!(after_first, Some(Viewport::from_array(INITIAL_BOX)));
    assert_eq!(after_first, after_second);
    assert_eq!(tracker.max_live.get(), 1);
    assert_eq!(ctl.script().as_deref(), Some("point A"));
}

#[test]
fn reset_without_board_is_a_no_op() {
    let event_loop = EventLoop::new();
    let (ctl, tracker) = controller(&event_loop, false);
    ctl.reset();
    assert_eq!(ctl.phase(), BoardPhase::Unmounted);
    assert_eq!(tracker.created.get(), 0);
}

#[test]
fn script_failure_is_reported_on_next_turn() {
    let mut event_loop = EventLoop::new();
    let (ctl, tracker) = controller(&event_loop, false);

    ctl.mount("oops");
    assert_eq!(ctl.phase(), BoardPhase::Initializing);
    assert_eq!(ctl.notice(), None);

    event_loop.run_turn();
    assert_eq!(ctl.phase(), BoardPhase::Failed);
    assert_eq!(
        ctl.notice().as_deref(),
        Some("JesseCode Error: Unexpected token `oops` at line 1")
    );
    // The board was constructed before the script failed and stays attached.
    assert!(ctl.is_alive());
    assert_eq!(tracker.live.get(), 1);

    ctl.focus();
    assert_eq!(ctl.handle_key("ArrowUp"), KeyOutcome::Ignored);
}

#[test]
fn initialization_failure_is_distinguishable() {
    let mut event_loop = EventLoop::new();
    let (ctl, tracker) = controller(&event_loop, true);

    ctl.mount("point A");
    event_loop.run_turn();

    assert_eq!(ctl.phase(), BoardPhase::Failed);
    let notice = ctl.notice().unwrap_or_default();
    assert!(notice.starts_with("Initialization Error: "), "{notice}");
    assert!(!ctl.is_alive());
    assert_eq!(tracker.created.get(), 0);
}

#[test]
fn newer_script_cancels_pending_failure() {
    let mut event_loop = EventLoop::new();
    let (ctl, _) = controller(&event_loop, false);

    ctl.mount("oops");
    ctl.set_script("point B");
    event_loop.run_turn();

    assert_eq!(ctl.phase(), BoardPhase::Ready);
    assert_eq!(ctl.failure(), None);
}

#[test]
fn unmount_cancels_report_and_frees_board() {
    let mut event_loop = EventLoop::new();
    let (ctl, tracker) = controller(&event_loop, false);

    ctl.mount("oops");
    ctl.unmount();
    event_loop.run_turn();

    assert_eq!(ctl.phase(), BoardPhase::Unmounted);
    assert_eq!(ctl.notice(), None);
    assert_eq!(tracker.live.get(), 0);
    assert!(!ctl.is_alive());
}

#[test]
fn dropping_the_controller_frees_the_board() {
    let mut event_loop = EventLoop::new();
    let (ctl, tracker) = controller(&event_loop, false);
    ctl.mount("oops");
    drop(ctl);
    event_loop.run_turn();
    assert_eq!(tracker.live.get(), 0);
    assert_eq!(tracker.freed.get(), 1);
}

#[test]
fn mount_ids_are_unique_per_controller() {
    let event_loop = EventLoop::new();
    let (a, _) = controller(&event_loop, false);
    let (b, _) = controller(&event_loop, false);
    assert_ne!(a.mount_id(), b.mount_id());
}
