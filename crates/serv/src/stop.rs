//! One-shot termination event shared between the orchestrator and its
//! triggers.

use std::fmt;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

/// What ended the `Waiting` phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopTrigger {
    /// [`Serv::force_stop`](crate::Serv::force_stop) was called.
    ForceStop,
    /// The process received the given termination signal.
    Signal(i32),
}

impl fmt::Display for StopTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ForceStop => f.write_str("force stop"),
            Self::Signal(signal) => write!(f, "signal {signal}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Open,
    Fired(StopTrigger),
    Closed(Option<StopTrigger>),
}

#[derive(Debug)]
struct Inner {
    state: Mutex<State>,
    changed: Condvar,
}

/// A one-shot event: it fires at most once and, once closed, never reopens.
///
/// Firing an event that already fired or was closed is a no-op, so racing
/// triggers (a signal arriving while another thread requests a stop) and
/// repeated stop requests are harmless. Clones share the same event.
#[derive(Debug, Clone)]
pub struct StopSignal {
    inner: Arc<Inner>,
}

impl StopSignal {
    /// Creates an open event.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(State::Open),
                changed: Condvar::new(),
            }),
        }
    }

    /// Fires the event with `trigger`.
    ///
    /// Returns `true` when this call fired the event and `false` when it had
    /// already fired or been closed.
    pub fn fire(&self, trigger: StopTrigger) -> bool {
        let mut state = self.lock();
        if *state != State::Open {
            return false;
        }
        *state = State::Fired(trigger);
        self.inner.changed.notify_all();
        true
    }

    /// Blocks until the event fires or is closed and returns the trigger.
    ///
    /// Returns `None` only when the event was closed without firing.
    pub fn wait(&self) -> Option<StopTrigger> {
        let mut state = self.lock();
        loop {
            match *state {
                State::Open => {
                    state = self
                        .inner
                        .changed
                        .wait(state)
                        .unwrap_or_else(PoisonError::into_inner);
                }
                State::Fired(trigger) => return Some(trigger),
                State::Closed(trigger) => return trigger,
            }
        }
    }

    /// Closes the event and wakes every waiter. Closing twice is a no-op.
    pub fn close(&self) {
        let mut state = self.lock();
        *state = match *state {
            State::Open => State::Closed(None),
            State::Fired(trigger) => State::Closed(Some(trigger)),
            closed @ State::Closed(_) => closed,
        };
        self.inner.changed.notify_all();
    }

    /// Trigger recorded by the first successful [`fire`](Self::fire).
    #[must_use]
    pub fn trigger(&self) -> Option<StopTrigger> {
        match *self.lock() {
            State::Open => None,
            State::Fired(trigger) => Some(trigger),
            State::Closed(trigger) => trigger,
        }
    }

    /// Whether the event has fired, whether or not it is closed.
    #[must_use]
    pub fn is_fired(&self) -> bool {
        self.trigger().is_some()
    }

    /// Whether the event has been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        matches!(*self.lock(), State::Closed(_))
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for StopSignal {
    fn default() -> Self {
        Self::new()
    }
}
