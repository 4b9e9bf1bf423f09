//! Shutdown coordination: the process cancellation signal.

use std::sync::atomic::{AtomicU8, Ordering};

use tokio::sync::Notify;

const RUNNING: u8 = 0;
const SHUTDOWN_REQUESTED: u8 = 1;
const STOPPED: u8 = 2;

/// Observable state of the cancellation signal. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ShutdownState {
    Running,
    ShutdownRequested,
    Stopped,
}

impl ShutdownState {
    fn from_raw(raw: u8) -> Self {
        match raw {
            RUNNING => ShutdownState::Running,
            SHUTDOWN_REQUESTED => ShutdownState::ShutdownRequested,
            _ => ShutdownState::Stopped,
        }
    }
}

/// One-shot cancellation signal shared by every long-running loop.
///
/// Owned by the lifecycle (supervisor or runner) and handed out as
/// `Arc<Shutdown>`. [`Shutdown::trigger`] is a single atomic
/// compare-exchange followed by a wake-up of current waiters; it never logs.
/// There is no reset.
#[derive(Debug)]
pub struct Shutdown {
    state: AtomicU8,
    notify: Notify,
}

impl Shutdown {
    /// Create a new signal in the `Running` state.
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(RUNNING),
            notify: Notify::new(),
        }
    }

    /// Request shutdown.
    ///
    /// Returns `true` only for the call that moved the signal out of
    /// `Running`; every later call is a no-op returning `false`.
    pub fn trigger(&self) -> bool {
        let transitioned = self
            .state
            .compare_exchange(RUNNING, SHUTDOWN_REQUESTED, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if transitioned {
            self.notify.notify_waiters();
        }
        transitioned
    }

    /// Non-blocking check, usable from any task or thread.
    pub fn is_triggered(&self) -> bool {
        self.state.load(Ordering::Acquire) != RUNNING
    }

    pub fn state(&self) -> ShutdownState {
        ShutdownState::from_raw(self.state.load(Ordering::Acquire))
    }

    /// Record that the owning lifecycle has fully stopped.
    pub fn mark_stopped(&self) {
        let previous = self.state.fetch_max(STOPPED, Ordering::AcqRel);
        if previous == RUNNING {
            self.notify.notify_waiters();
        }
    }

    /// Wait until shutdown has been requested.
    ///
    /// Resolves immediately if it already was. The waiter is registered
    /// before the state is re-checked, so a trigger racing this call is
    /// never missed.
    pub async fn cancelled(&self) {
        let notified = self.notify.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();

        if self.is_triggered() {
            return;
        }
        notified.await;
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
