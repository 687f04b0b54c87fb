//! Per-run record of the most recent lifecycle failure.

use tracing::warn;

use crate::LIFECYCLE_TARGET;
use crate::error::ServeError;

/// Marker returned when a step failed and the current phase must stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Halted;

/// Holds the most recent failure of a run. Successful steps never clear it.
#[derive(Debug, Default)]
pub(super) struct ErrorLatch {
    error: Option<ServeError>,
}

impl ErrorLatch {
    pub(super) fn latch(&mut self, error: ServeError) -> Halted {
        if let Some(previous) = self.error.as_ref() {
            warn!(
                target: LIFECYCLE_TARGET,
                superseded = %previous,
                "later failure replaces latched error"
            );
        }
        warn!(
            target: LIFECYCLE_TARGET,
            error = %error,
            "lifecycle step failed"
        );
        self.error = Some(error);
        Halted
    }

    pub(super) const fn is_set(&self) -> bool {
        self.error.is_some()
    }

    pub(super) const fn get(&self) -> Option<&ServeError> {
        self.error.as_ref()
    }

    pub(super) fn take(&mut self) -> Option<ServeError> {
        self.error.take()
    }
}
