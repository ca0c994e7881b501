//! Lifecycle of one script-driven interactive board.
//!
//! ```text
//! Unmounted -> Initializing -> Ready | Failed -> Destroying -> Unmounted
//! ```
//!
//! Every script change destroys the current board before a new one is created, so at most one
//! board is attached to a mount point at any time. Failures are caught synchronously and
//! committed on the next scheduler turn.

mod engine;
mod viewport;

pub use engine::{Board, BoardEngine, BoardOptions, PanOptions, ZoomOptions};
pub use viewport::{PanDirection, Viewport};

use crate::scheduler::{Deferred, Scheduler};
use fenceplot_core::ids::MountId;
use fenceplot_core::{Error, SiteConfig};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoardPhase {
    Unmounted,
    Initializing,
    Ready,
    Failed,
    Destroying,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyOutcome {
    /// The key was a pan key; the board now shows this box.
    Panned(Viewport),
    /// Not handled; the host should let the key through.
    Ignored,
}

struct ControllerState<E: BoardEngine> {
    engine: E,
    options: BoardOptions,
    pan_step: f64,
    mount_id: MountId,
    script: Option<String>,
    board: Option<E::Board>,
    phase: BoardPhase,
    failure: Option<Error>,
    pending_report: Option<Deferred>,
    focused: bool,
    generation: u64,
}

impl<E: BoardEngine> ControllerState<E> {
    fn cancel_report(&mut self) {
        if let Some(pending) = self.pending_report.take() {
            pending.cancel();
        }
    }

    /// Releases the current board, if any. The caller has already cancelled deferred work.
    fn destroy(&mut self) {
        if let Some(board) = self.board.take() {
            self.phase = BoardPhase::Destroying;
            self.engine.free_board(board);
            tracing::debug!(mount_id = %self.mount_id, "board destroyed");
        }
        self.phase = BoardPhase::Unmounted;
    }

    /// Creates a board and runs the script. Returns the failure to report, if any.
    fn initialize(&mut self, script: &str) -> Option<Error> {
        self.phase = BoardPhase::Initializing;
        let mut board = match self.engine.init_board(&self.mount_id, &self.options) {
            Ok(board) => board,
            Err(message) => return Some(Error::Initialization { message }),
        };
        tracing::debug!(mount_id = %self.mount_id, "board created");

        let outcome = board.parse_script(script);
        // A board whose script failed stays attached; it is freed on the next teardown.
        self.board = Some(board);
        match outcome {
            Ok(()) => {
                self.phase = BoardPhase::Ready;
                None
            }
            Err(message) => Some(Error::ScriptExecution { message }),
        }
    }
}

/// Owns the board bound to one mount point.
pub struct InteractiveBoardController<E: BoardEngine + 'static> {
    state: Rc<RefCell<ControllerState<E>>>,
    scheduler: Scheduler,
}

impl<E: BoardEngine + 'static> InteractiveBoardController<E> {
    pub fn new(engine: E, scheduler: Scheduler, config: &SiteConfig) -> Self {
        Self::with_mount_id(engine, scheduler, config, MountId::generate())
    }

    pub fn with_mount_id(
        engine: E,
        scheduler: Scheduler,
        config: &SiteConfig,
        mount_id: MountId,
    ) -> Self {
        let pan_step = config.keyboard_pan_step();
        Self {
            state: Rc::new(RefCell::new(ControllerState {
                engine,
                options: BoardOptions::from_config(config),
                pan_step,
                mount_id,
                script: None,
                board: None,
                phase: BoardPhase::Unmounted,
                failure: None,
                pending_report: None,
                focused: false,
                generation: 0,
            })),
            scheduler,
        }
    }

    /// First mount; same as [`Self::set_script`].
    pub fn mount(&self, script: &str) {
        self.set_script(script);
    }

    /// Rebuilds the board for `script`. A script identical to the mounted one is a no-op.
    pub fn set_script(&self, script: &str) {
        {
            let state = self.state.borrow();
            if state.phase != BoardPhase::Unmounted && state.script.as_deref() == Some(script) {
                return;
            }
        }
        self.rebuild(script.to_string());
    }

    /// Re-initializes from the current script, discarding pan and zoom. Without a board this
    /// only logs a warning.
    pub fn reset(&self) {
        let script = {
            let state = self.state.borrow();
            match (&state.board, &state.script) {
                (Some(_), Some(script)) => script.clone(),
                _ => {
                    tracing::warn!(mount_id = %state.mount_id, "reset requested for an uninitialized board");
                    return;
                }
            }
        };
        self.rebuild(script);
    }

    fn rebuild(&self, script: String) {
        let (failure, generation) = {
            let mut state = self.state.borrow_mut();
            state.cancel_report();
            state.generation += 1;
            state.failure = None;
            state.destroy();
            let failure = state.initialize(&script);
            state.script = Some(script);
            (failure, state.generation)
        };
        if let Some(err) = failure {
            self.report(err, generation);
        }
    }

    fn report(&self, err: Error, generation: u64) {
        tracing::warn!(error = %err, "board failed");
        let weak: Weak<RefCell<ControllerState<E>>> = Rc::downgrade(&self.state);
        let deferred = self.scheduler.defer(move || {
            let Some(state) = weak.upgrade() else {
                return;
            };
            let mut state = state.borrow_mut();
            if state.generation != generation {
                tracing::trace!("dropping stale board failure report");
                return;
            }
            state.pending_report = None;
            state.phase = BoardPhase::Failed;
            state.failure = Some(err);
        });
        self.state.borrow_mut().pending_report = Some(deferred);
    }

    /// Cancels the pending failure report, detaches keyboard input, then frees the board.
    pub fn unmount(&self) {
        let mut state = self.state.borrow_mut();
        state.cancel_report();
        state.focused = false;
        state.generation += 1;
        state.destroy();
        state.script = None;
        state.failure = None;
    }

    pub fn focus(&self) {
        self.state.borrow_mut().focused = true;
    }

    pub fn blur(&self) {
        self.state.borrow_mut().focused = false;
    }

    /// Keyboard navigation for a focused, ready board.
    pub fn handle_key(&self, key: &str) -> KeyOutcome {
        let mut state = self.state.borrow_mut();
        if !state.focused || state.phase != BoardPhase::Ready {
            tracing::trace!(key, "key ignored: board not focused or not ready");
            return KeyOutcome::Ignored;
        }
        let Some(direction) = PanDirection::from_key(key) else {
            tracing::trace!(key, "key ignored");
            return KeyOutcome::Ignored;
        };
        let step = state.pan_step;
        let Some(board) = state.board.as_mut() else {
            return KeyOutcome::Ignored;
        };
        let next = board.bounding_box().pan(direction, step);
        board.set_bounding_box(next);
        KeyOutcome::Panned(next)
    }

    pub fn phase(&self) -> BoardPhase {
        self.state.borrow().phase
    }

    /// The committed failure, if any.
    pub fn failure(&self) -> Option<Error> {
        self.state.borrow().failure.clone()
    }

    /// Message shown in place of the board, e.g. `JesseCode Error: ...`.
    pub fn notice(&self) -> Option<String> {
        self.state.borrow().failure.as_ref().map(Error::notice)
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.state.borrow().board.as_ref().map(Board::bounding_box)
    }

    pub fn mount_id(&self) -> MountId {
        self.state.borrow().mount_id.clone()
    }

    pub fn script(&self) -> Option<String> {
        self.state.borrow().script.clone()
    }

    pub fn options(&self) -> BoardOptions {
        self.state.borrow().options.clone()
    }

    /// Whether a board instance is currently attached.
    pub fn is_alive(&self) -> bool {
        self.state.borrow().board.is_some()
    }
}

impl<E: BoardEngine + 'static> Drop for InteractiveBoardController<E> {
    fn drop(&mut self) {
        self.unmount();
    }
}
