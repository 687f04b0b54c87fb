//! Subscription to OS termination signals.

use std::fmt;
use std::io;
use std::thread;

use serv_config::{Config, TerminationSignal, default_signals};
use signal_hook::consts::signal::{SIGHUP, SIGINT, SIGQUIT, SIGTERM};
use signal_hook::iterator::Signals;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::LIFECYCLE_TARGET;
use crate::stop::{StopSignal, StopTrigger};

const LISTENER_THREAD: &str = "serv-signals";

/// Abstraction over the delivery of external termination requests.
pub trait SignalSource: Send + Sync {
    /// Starts listening; the first delivered signal fires `stop`.
    ///
    /// The subscription lasts until the returned handle is released or
    /// dropped. Signals that arrive before the orchestrator starts waiting
    /// still fire `stop`, so the wait ends as soon as it begins.
    fn subscribe(&self, stop: StopSignal) -> Result<SignalSubscription, SignalError>;
}

/// Errors reported while subscribing to termination signals.
#[derive(Debug, Error)]
pub enum SignalError {
    /// Installing signal handlers failed.
    #[error("failed to install signal handlers: {source}")]
    Install {
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// Spawning the listener thread failed.
    #[error("failed to spawn signal listener: {source}")]
    Spawn {
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
}

type Release = Box<dyn FnOnce() + Send>;

/// Live signal subscription. Releasing it stops the listener.
#[must_use = "dropping the subscription stops listening for signals"]
pub struct SignalSubscription {
    release: Option<Release>,
}

impl SignalSubscription {
    /// Wraps the teardown routine of a subscription.
    pub fn new<F>(release: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// A subscription with nothing to tear down.
    #[must_use]
    pub const fn detached() -> Self {
        Self { release: None }
    }

    /// Stops listening and waits for the listener to wind down.
    pub fn release(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for SignalSubscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl fmt::Debug for SignalSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalSubscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}

/// Listens for real OS signals through `signal-hook`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemSignals {
    signals: Vec<TerminationSignal>,
}

impl SystemSignals {
    /// Listens for the given signals. An empty set leaves force stop as the
    /// only way to end a run.
    #[must_use]
    pub fn new<I>(signals: I) -> Self
    where
        I: IntoIterator<Item = TerminationSignal>,
    {
        Self {
            signals: signals.into_iter().collect(),
        }
    }

    /// Listens for the signals named in `config`.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.signals().iter().copied())
    }

    /// Signals this source subscribes to.
    #[must_use]
    pub fn signals(&self) -> &[TerminationSignal] {
        &self.signals
    }
}

impl Default for SystemSignals {
    fn default() -> Self {
        Self::new(default_signals())
    }
}

impl SignalSource for SystemSignals {
    fn subscribe(&self, stop: StopSignal) -> Result<SignalSubscription, SignalError> {
        if self.signals.is_empty() {
            debug!(
                target: LIFECYCLE_TARGET,
                "no termination signals configured; only force stop ends the run"
            );
            return Ok(SignalSubscription::detached());
        }
        let numbers: Vec<i32> = self.signals.iter().copied().map(signal_number).collect();
        let mut signals =
            Signals::new(&numbers).map_err(|source| SignalError::Install { source })?;
        let handle = signals.handle();
        let listener = thread::Builder::new()
            .name(LISTENER_THREAD.to_owned())
            .spawn(move || {
                if let Some(signal) = signals.forever().next() {
                    info!(
                        target: LIFECYCLE_TARGET,
                        signal,
                        "termination signal received"
                    );
                    stop.fire(StopTrigger::Signal(signal));
                }
            })
            .map_err(|source| {
                handle.close();
                SignalError::Spawn { source }
            })?;
        info!(
            target: LIFECYCLE_TARGET,
            signals = ?self.signals,
            "subscribed to termination signals"
        );
        Ok(SignalSubscription::new(move || {
            handle.close();
            if listener.join().is_err() {
                warn!(target: LIFECYCLE_TARGET, "signal listener thread panicked");
            }
        }))
    }
}

const fn signal_number(signal: TerminationSignal) -> i32 {
    match signal {
        TerminationSignal::Term => SIGTERM,
        TerminationSignal::Int => SIGINT,
        TerminationSignal::Quit => SIGQUIT,
        TerminationSignal::Hup => SIGHUP,
    }
}
