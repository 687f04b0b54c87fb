//! Signal sources that let tests deliver termination requests by hand.

use std::io;
use std::sync::{Arc, Mutex};

use crate::{SignalError, SignalSource, SignalSubscription, StopSignal, StopTrigger};

#[derive(Debug, Default)]
struct ManualState {
    stop: Option<StopSignal>,
    subscriptions: usize,
    releases: usize,
}

/// Signal source driven by [`ManualSignals::deliver`].
#[derive(Debug, Clone, Default)]
pub struct ManualSignals {
    state: Arc<Mutex<ManualState>>,
}

impl ManualSignals {
    /// Delivers `signal` to the live subscription, if any.
    pub fn deliver(&self, signal: i32) -> bool {
        let stop = self
            .state
            .lock()
            .expect("signal state poisoned")
            .stop
            .clone();
        stop.is_some_and(|stop| stop.fire(StopTrigger::Signal(signal)))
    }

    #[must_use]
    pub fn subscriptions(&self) -> usize {
        self.state.lock().expect("signal state poisoned").subscriptions
    }

    #[must_use]
    pub fn releases(&self) -> usize {
        self.state.lock().expect("signal state poisoned").releases
    }
}

impl SignalSource for ManualSignals {
    fn subscribe(&self, stop: StopSignal) -> Result<SignalSubscription, SignalError> {
        {
            let mut state = self.state.lock().expect("signal state poisoned");
            state.stop = Some(stop);
            state.subscriptions += 1;
        }
        let state = Arc::clone(&self.state);
        Ok(SignalSubscription::new(move || {
            let mut state = state.lock().expect("signal state poisoned");
            state.stop = None;
            state.releases += 1;
        }))
    }
}

/// Signal source whose subscription always fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingSignals;

impl SignalSource for FailingSignals {
    fn subscribe(&self, _stop: StopSignal) -> Result<SignalSubscription, SignalError> {
        Err(SignalError::Install {
            source: io::Error::other("signal handlers unavailable"),
        })
    }
}
