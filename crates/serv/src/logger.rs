//! Sink used by the orchestrator to report faults to operators.

use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;

use crate::LIFECYCLE_TARGET;

/// Reports formatted errors.
///
/// Implementations must not block indefinitely and must not panic: the
/// orchestrator calls the logger from inside its shutdown path.
pub trait Logger: Send + Sync {
    /// Reports one formatted error message.
    fn error(&self, args: fmt::Arguments<'_>);
}

impl<T> Logger for Arc<T>
where
    T: Logger + ?Sized,
{
    fn error(&self, args: fmt::Arguments<'_>) {
        (**self).error(args);
    }
}

/// Default logger writing one line per report to standard error.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrLogger;

impl StderrLogger {
    /// Builds a new logger.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Logger for StderrLogger {
    fn error(&self, args: fmt::Arguments<'_>) {
        if let Err(error) = write_report(&mut io::stderr().lock(), args) {
            tracing::debug!(
                target: LIFECYCLE_TARGET,
                error = %error,
                "failed to write error report to stderr"
            );
        }
    }
}

/// Writes one report as a single line.
fn write_report<W>(writer: &mut W, args: fmt::Arguments<'_>) -> io::Result<()>
where
    W: Write + ?Sized,
{
    writeln!(writer, "{args}")?;
    writer.flush()
}

/// Logger forwarding reports into the `tracing` pipeline as error events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl TracingLogger {
    /// Builds a new logger.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Logger for TracingLogger {
    fn error(&self, args: fmt::Arguments<'_>) {
        tracing::error!(target: LIFECYCLE_TARGET, "{args}");
    }
}
