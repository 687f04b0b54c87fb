//! Test doubles shared by the orchestrator suites.

mod capture;
mod journal;
mod logger;
mod service;
mod signals;
mod stopper;

pub use capture::CapturedOutput;
pub use journal::Journal;
pub use logger::RecordingLogger;
pub use service::{ScriptedService, Step, hook};
pub use signals::{FailingSignals, ManualSignals};
pub use stopper::{serve_then, when_waiting};
