//! The contract every managed service satisfies.

use crate::error::StepResult;

/// A unit whose lifecycle is driven by [`Serv`](crate::Serv).
///
/// Every operation defaults to a no-op, so implementors override only the
/// stages they care about.
///
/// [`serve`](Service::serve) is called synchronously, one service after
/// another, on the thread that called [`Serv::serve`](crate::Serv::serve). A
/// service that blocks in `serve` holds up the startup of every service after
/// it. Services meant to run concurrently should spawn their own threads in
/// `serve` and return promptly.
pub trait Service {
    /// Prepares the service; runs after the pre-start hooks.
    fn before_serve(&mut self) -> StepResult {
        Ok(())
    }

    /// Starts the service's main body.
    fn serve(&mut self) -> StepResult {
        Ok(())
    }

    /// Confirms startup; runs once every service's `serve` has been invoked.
    fn after_serve(&mut self) -> StepResult {
        Ok(())
    }

    /// Tears the service down during shutdown. Called exactly once per run.
    fn before_stop(&mut self) -> StepResult {
        Ok(())
    }
}

/// A service with no behaviour; useful as a placeholder.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyService;

impl Service for EmptyService {}

impl<S> Service for &mut S
where
    S: Service + ?Sized,
{
    fn before_serve(&mut self) -> StepResult {
        (**self).before_serve()
    }

    fn serve(&mut self) -> StepResult {
        (**self).serve()
    }

    fn after_serve(&mut self) -> StepResult {
        (**self).after_serve()
    }

    fn before_stop(&mut self) -> StepResult {
        (**self).before_stop()
    }
}

impl<S> Service for Box<S>
where
    S: Service + ?Sized,
{
    fn before_serve(&mut self) -> StepResult {
        (**self).before_serve()
    }

    fn serve(&mut self) -> StepResult {
        (**self).serve()
    }

    fn after_serve(&mut self) -> StepResult {
        (**self).after_serve()
    }

    fn before_stop(&mut self) -> StepResult {
        (**self).before_stop()
    }
}
