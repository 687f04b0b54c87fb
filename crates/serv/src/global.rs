//! Process-wide orchestrator reachable through free functions.
//!
//! Every function here delegates to one lazily created [`Serv`] built with
//! default options. Programs that need a custom logger or signal source
//! should construct their own instance instead.

use once_cell::sync::Lazy;

use crate::error::{ServeError, StepResult};
use crate::orchestrator::Serv;
use crate::service::Service;

static INSTANCE: Lazy<Serv> = Lazy::new(Serv::new);

/// The shared instance behind the free functions.
#[must_use]
pub fn instance() -> &'static Serv {
    &INSTANCE
}

/// Runs the lifecycle on the shared instance. See [`Serv::serve`].
pub fn serve(services: &mut [&mut dyn Service]) -> Result<(), ServeError> {
    INSTANCE.serve(services)
}

/// Registers a pre-start hook on the shared instance.
pub fn register_before_serve<F>(hook: F)
where
    F: Fn() -> StepResult + Send + Sync + 'static,
{
    INSTANCE.register_before_serve(hook);
}

/// Registers a post-start hook on the shared instance.
pub fn register_after_serve<F>(hook: F)
where
    F: Fn() -> StepResult + Send + Sync + 'static,
{
    INSTANCE.register_after_serve(hook);
}

/// Registers a pre-stop hook on the shared instance.
pub fn register_before_stop<F>(hook: F)
where
    F: Fn() -> StepResult + Send + Sync + 'static,
{
    INSTANCE.register_before_stop(hook);
}

/// Requests termination of the shared instance's current run.
pub fn force_stop() {
    INSTANCE.force_stop();
}
