//! Construction-time options for [`Serv`].

use std::fmt;
use std::sync::Arc;

use serv_config::Config;

use crate::logger::{Logger, StderrLogger};
use crate::signals::{SignalSource, SystemSignals};

use super::Serv;

/// Builder applying construction-time options to a [`Serv`].
///
/// Options that are never set keep their defaults: a [`StderrLogger`] and a
/// [`SystemSignals`] source for `SIGTERM`, `SIGINT` and `SIGQUIT`.
#[derive(Default)]
pub struct ServBuilder {
    logger: Option<Arc<dyn Logger>>,
    signals: Option<Box<dyn SignalSource>>,
}

impl ServBuilder {
    /// Starts from the defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the logger used to report faults.
    #[must_use]
    pub fn with_logger<L>(mut self, logger: L) -> Self
    where
        L: Logger + 'static,
    {
        self.logger = Some(Arc::new(logger));
        self
    }

    /// Replaces the source of external termination requests.
    #[must_use]
    pub fn with_signal_source<S>(mut self, source: S) -> Self
    where
        S: SignalSource + 'static,
    {
        self.signals = Some(Box::new(source));
        self
    }

    /// Applies the settings from `config` that concern the orchestrator.
    #[must_use]
    pub fn with_config(self, config: &Config) -> Self {
        self.with_signal_source(SystemSignals::from_config(config))
    }

    /// Finishes construction.
    #[must_use]
    pub fn build(self) -> Serv {
        let logger = self
            .logger
            .unwrap_or_else(|| Arc::new(StderrLogger::new()));
        let signals = self
            .signals
            .unwrap_or_else(|| Box::new(SystemSignals::default()));
        Serv::from_parts(logger, signals)
    }
}

impl fmt::Debug for ServBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServBuilder")
            .field("custom_logger", &self.logger.is_some())
            .field("custom_signals", &self.signals.is_some())
            .finish()
    }
}
