//! Enumerated settings: how lifecycle telemetry is rendered and which OS
//! signals end a run.
//!
//! Both enums read the same way in configuration documents and on the
//! command line: `snake_case`, matched without regard to case.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Rendering of the lifecycle events written by the telemetry installer.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, Hash, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LogFormat {
    /// One JSON object per event with fields flattened to the top level.
    #[default]
    Json,
    /// Single-line text for people watching a terminal.
    Compact,
}

impl LogFormat {
    /// Whether events are emitted as machine-readable records.
    #[must_use]
    pub const fn is_structured(self) -> bool {
        matches!(self, Self::Json)
    }
}

/// An OS signal treated as "external termination requested".
///
/// Every configured signal has the same effect; the orchestrator records which
/// one arrived only for diagnostics.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Hash, EnumString, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TerminationSignal {
    /// `SIGTERM`, sent by service managers.
    Term,
    /// `SIGINT`, sent by an interactive terminal on Ctrl-C.
    Int,
    /// `SIGQUIT`, sent by an interactive terminal on Ctrl-\.
    Quit,
    /// `SIGHUP`, sent when the controlling terminal goes away.
    Hup,
}

/// Error returned when text names no [`LogFormat`] or [`TerminationSignal`].
pub type OptionParseError = strum::ParseError;
