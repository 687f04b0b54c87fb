//! Shared configuration for the `serv` lifecycle orchestrator.
//!
//! The orchestrator does not load configuration itself: the embedding process
//! entry point owns argument parsing and file discovery. This crate only
//! describes the settings the orchestrator and its telemetry understand, with
//! defaults that match the behaviour of an unconfigured instance.

mod defaults;
mod options;

use serde::{Deserialize, Serialize};

pub use defaults::{
    DEFAULT_LOG_FILTER, default_log_filter, default_log_filter_string, default_log_format,
    default_signals,
};
pub use options::{LogFormat, OptionParseError, TerminationSignal};

/// Settings recognised by the orchestrator and its telemetry installer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Filter expression handed to the tracing subscriber.
    pub log_filter: String,
    /// Output format for structured logs.
    pub log_format: LogFormat,
    /// Signals treated as a request to terminate the process.
    pub signals: Vec<TerminationSignal>,
}

impl Config {
    /// Filter expression used when installing telemetry.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Log output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Termination signals the orchestrator subscribes to while serving.
    #[must_use]
    pub fn signals(&self) -> &[TerminationSignal] {
        &self.signals
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            signals: default_signals(),
        }
    }
}
