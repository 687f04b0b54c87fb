//! Error surface of the orchestrator.

use std::error::Error as StdError;

use thiserror::Error;

use crate::hooks::HookPoint;
use crate::phase::Phase;
use crate::signals::SignalError;

/// Boxed error returned by hooks and service lifecycle operations.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Outcome of a single hook or service lifecycle operation.
pub type StepResult = Result<(), BoxError>;

/// Failures recorded while running the lifecycle.
#[derive(Debug, Error)]
pub enum ServeError {
    /// A registered hook reported a failure.
    #[error("{point} hook #{index} failed: {source}")]
    Hook {
        /// Hook list the failing hook belongs to.
        point: HookPoint,
        /// Registration position within that list.
        index: usize,
        /// Error returned by the hook.
        #[source]
        source: BoxError,
    },
    /// A managed service reported a failure.
    #[error("service #{index} failed during {phase}: {source}")]
    Service {
        /// Phase whose operation failed.
        phase: Phase,
        /// Position of the service in the list passed to `serve`.
        index: usize,
        /// Error returned by the service.
        #[source]
        source: BoxError,
    },
    /// A hook or service panicked and the panic was contained.
    #[error("lifecycle step panicked: {message}")]
    Panic {
        /// Rendered panic payload.
        message: String,
    },
    /// Subscribing to termination signals failed.
    #[error("failed to subscribe to termination signals: {source}")]
    Signals {
        /// Underlying subscription error.
        #[source]
        source: SignalError,
    },
    /// The instance already completed a run and cannot be served again.
    #[error("orchestrator has already shut down and cannot serve again")]
    Finished,
}
