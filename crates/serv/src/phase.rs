//! Lifecycle phases an orchestrator moves through.

use strum::Display;

/// Stages of the lifecycle state machine, in the order they are entered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Phase {
    /// No run has started yet.
    #[default]
    Init,
    /// Pre-start hooks and each service's `before_serve`.
    BeforeServe,
    /// Each service's `serve`, one after another.
    Serve,
    /// Post-start hooks and each service's `after_serve`.
    AfterServe,
    /// Blocked until force-stop or a termination signal.
    Waiting,
    /// Pre-stop hooks and each service's `before_stop`.
    BeforeStop,
    /// The run has finished and the stop event is closed.
    Done,
}
