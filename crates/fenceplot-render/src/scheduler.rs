//! Single-threaded cooperative scheduling.
//!
//! Components never mutate presentation state from inside the call that triggered the change;
//! they [`Scheduler::defer`] a task instead, and the host drives [`EventLoop::run_turn`] once its
//! own pass is over. Deferred tasks can be cancelled until they run.

use futures::FutureExt as _;
use futures::executor::{LocalPool, LocalSpawner};
use futures::future::{AbortHandle, abortable};
use futures::task::LocalSpawnExt as _;

/// Owns the queue of deferred tasks. Not `Send`: everything runs on the thread that owns it.
pub struct EventLoop {
    pool: LocalPool,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLoop {
    pub fn new() -> Self {
        Self {
            pool: LocalPool::new(),
        }
    }

    pub fn scheduler(&self) -> Scheduler {
        Scheduler {
            spawner: self.pool.spawner(),
        }
    }

    /// Runs every queued task, including tasks queued by tasks in this turn.
    pub fn run_turn(&mut self) {
        self.pool.run_until_stalled();
    }
}

/// Cheap handle for queueing work on an [`EventLoop`].
#[derive(Clone)]
pub struct Scheduler {
    spawner: LocalSpawner,
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler").finish_non_exhaustive()
    }
}

impl Scheduler {
    /// Queues `task` for the next turn.
    pub fn defer<F>(&self, task: F) -> Deferred
    where
        F: FnOnce() + 'static,
    {
        let (future, handle) = abortable(async move { task() });
        if let Err(err) = self.spawner.spawn_local(future.map(|_| ())) {
            // The loop is gone; nothing will ever run, so report the task as cancelled.
            tracing::warn!(error = %err, "event loop shut down; dropping deferred task");
            handle.abort();
        }
        Deferred { handle }
    }
}

/// A queued task. Dropping the handle does not cancel the task.
#[derive(Debug)]
pub struct Deferred {
    handle: AbortHandle,
}

impl Deferred {
    pub fn cancel(&self) {
        self.handle.abort();
    }
}
