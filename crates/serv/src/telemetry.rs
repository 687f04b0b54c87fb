//! Process-wide tracing setup that keeps lifecycle events visible.
//!
//! The orchestrator reports phase transitions, latched failures, contained
//! panics and termination triggers under the `serv::lifecycle` target. The
//! installer here honours the configured filter for everything else but keeps
//! that target at `info` or above unless the filter mentions it explicitly,
//! so quiet processes still show when they start and stop.

use std::io::{self, IsTerminal};

use once_cell::sync::OnceCell;
use serv_config::{Config, LogFormat};
use tracing::Subscriber;
use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::filter::{Directive, EnvFilter, LevelFilter, ParseError};
use tracing_subscriber::fmt::{self, MakeWriter};

use crate::LIFECYCLE_TARGET;

static INSTALLED: OnceCell<TelemetryHandle> = OnceCell::new();

type BoxSubscriber = Box<dyn Subscriber + Send + Sync>;

/// Describes the subscriber installed by [`initialise`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryHandle {
    filter: String,
    format: LogFormat,
}

impl TelemetryHandle {
    /// Filter directives in force, including the lifecycle directive.
    #[must_use]
    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Output format of the installed subscriber.
    #[must_use]
    pub const fn format(&self) -> LogFormat {
        self.format
    }
}

/// Errors encountered while configuring telemetry.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The configured filter expression does not parse.
    #[error("invalid log filter `{filter}`: {source}")]
    Filter {
        /// Expression as configured.
        filter: String,
        /// Parser diagnostic.
        #[source]
        source: ParseError,
    },
    /// Some other subscriber already owns the global default.
    #[error("a global tracing subscriber is already installed: {source}")]
    AlreadyInstalled {
        /// Error reported by `tracing`.
        #[source]
        source: SetGlobalDefaultError,
    },
}

/// Installs the global subscriber on first use and describes it.
///
/// Events go to standard error, with colour only when standard error is a
/// terminal. Later calls leave global state alone and return the handle of
/// the first successful installation, whatever configuration they pass.
///
/// ```no_run
/// use serv::telemetry;
/// use serv_config::Config;
///
/// # fn main() -> Result<(), serv::TelemetryError> {
/// let handle = telemetry::initialise(&Config::default())?;
/// assert!(handle.filter().contains("serv::lifecycle"));
/// # Ok(())
/// # }
/// ```
pub fn initialise(config: &Config) -> Result<TelemetryHandle, TelemetryError> {
    INSTALLED
        .get_or_try_init(|| {
            let (subscriber, handle) =
                lifecycle_subscriber(config, io::stderr, io::stderr().is_terminal())?;
            tracing::subscriber::set_global_default(subscriber)
                .map_err(|source| TelemetryError::AlreadyInstalled { source })?;
            Ok(handle)
        })
        .cloned()
}

/// Builds the subscriber for `config` writing through `writer`.
fn lifecycle_subscriber<W>(
    config: &Config,
    writer: W,
    ansi: bool,
) -> Result<(BoxSubscriber, TelemetryHandle), TelemetryError>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let filter = lifecycle_filter(config.log_filter())?;
    let handle = TelemetryHandle {
        filter: filter.to_string(),
        format: config.log_format(),
    };

    let builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(true)
        .with_writer(writer)
        .with_ansi(ansi)
        .with_timer(fmt::time::UtcTime::rfc_3339());

    let subscriber: BoxSubscriber = if config.log_format().is_structured() {
        Box::new(builder.json().flatten_event(true).finish())
    } else {
        Box::new(builder.compact().finish())
    };
    Ok((subscriber, handle))
}

/// Parses `expression` and raises the lifecycle target to at least `info`.
///
/// An expression that already has a directive for the lifecycle target, or
/// for a parent of it such as `serv`, is used unchanged.
fn lifecycle_filter(expression: &str) -> Result<EnvFilter, TelemetryError> {
    let invalid = |source| TelemetryError::Filter {
        filter: expression.to_owned(),
        source,
    };
    let filter = EnvFilter::try_new(expression).map_err(invalid)?;
    if expression.split(',').any(covers_lifecycle_target) {
        return Ok(filter);
    }

    let level = filter
        .max_level_hint()
        .map_or(LevelFilter::INFO, |hint| hint.max(LevelFilter::INFO));
    let directive: Directive = format!("{LIFECYCLE_TARGET}={level}")
        .parse()
        .map_err(invalid)?;
    Ok(filter.add_directive(directive))
}

fn covers_lifecycle_target(directive: &str) -> bool {
    let target = directive
        .split(['[', '='])
        .next()
        .unwrap_or_default()
        .trim();
    !target.is_empty()
        && LIFECYCLE_TARGET
            .strip_prefix(target)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
}
