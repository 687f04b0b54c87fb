//! In-process lifecycle orchestration for long-running services.
//!
//! A [`Serv`] runs a fixed phase sequence over an ordered list of
//! [`Service`] implementations and the process-wide hooks registered on it:
//!
//! ```text
//! Init → BeforeServe → Serve → AfterServe → Waiting → BeforeStop → Done
//! ```
//!
//! The first failing step of a phase is latched and stops the forward
//! sequence. `Waiting` blocks until either [`Serv::force_stop`] is called or
//! the process receives a termination signal. `BeforeStop` always runs, once,
//! however the run ended. Panics raised by hooks or services are contained at
//! the [`Serv::serve`] boundary and reported through the injected [`Logger`]
//! instead of unwinding into the caller.
//!
//! ```no_run
//! use serv::{EmptyService, Serv};
//!
//! let serv = Serv::new();
//! serv.register_before_serve(|| {
//!     tracing::info!("warming caches");
//!     Ok(())
//! });
//! let mut service = EmptyService;
//! // Blocks until SIGTERM, SIGINT or SIGQUIT arrives.
//! let _outcome = serv.serve(&mut [&mut service]);
//! ```
//!
//! The [`global`] module exposes a process-wide instance through free
//! functions for programs that prefer not to thread a handle around.

mod error;
pub mod global;
mod hooks;
mod logger;
mod orchestrator;
mod phase;
mod service;
mod signals;
mod stop;
pub mod telemetry;

pub use error::{BoxError, ServeError, StepResult};
pub use hooks::{Hook, HookPoint};
pub use logger::{Logger, StderrLogger, TracingLogger};
pub use orchestrator::{Serv, ServBuilder};
pub use phase::Phase;
pub use service::{EmptyService, Service};
pub use signals::{SignalError, SignalSource, SignalSubscription, SystemSignals};
pub use stop::{StopSignal, StopTrigger};
pub use telemetry::{TelemetryError, TelemetryHandle};

pub(crate) const LIFECYCLE_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::lifecycle");

#[cfg(test)]
mod tests;
