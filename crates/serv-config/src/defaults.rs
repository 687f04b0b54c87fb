//! Values an unconfigured orchestrator runs with.

use crate::options::{LogFormat, TerminationSignal};

/// Filter applied to events outside the lifecycle target.
///
/// The telemetry installer keeps lifecycle events at `info` or above whatever
/// this filter says.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Default log filter expression.
#[must_use]
pub const fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format.
#[must_use]
pub const fn default_log_format() -> LogFormat {
    LogFormat::Json
}

/// Interrupt, terminate and quit: the signals a service manager or terminal
/// sends when it wants the process gone.
#[must_use]
pub fn default_signals() -> Vec<TerminationSignal> {
    vec![
        TerminationSignal::Term,
        TerminationSignal::Int,
        TerminationSignal::Quit,
    ]
}
