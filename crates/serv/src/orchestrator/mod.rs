//! The lifecycle state machine.
//!
//! A run walks the forward phases on the caller's thread, blocks in
//! `Waiting` until the stop event fires, and always finishes with the
//! shutdown phase. The forward phases and the wait sit inside a panic
//! boundary; the shutdown phase runs after that boundary has returned, inside
//! its own, so teardown happens however the forward path ended.

mod builder;
mod latch;

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use crate::LIFECYCLE_TARGET;
use crate::error::{BoxError, ServeError, StepResult};
use crate::hooks::{Hook, HookPoint, HookRegistry};
use crate::logger::Logger;
use crate::phase::Phase;
use crate::service::Service;
use crate::signals::{SignalSource, SignalSubscription};
use crate::stop::{StopSignal, StopTrigger};

pub use builder::ServBuilder;

use latch::{ErrorLatch, Halted};

type PanicPayload = Box<dyn Any + Send + 'static>;

/// Lifecycle orchestrator.
///
/// Hooks may be registered at any time through a shared reference;
/// [`force_stop`](Self::force_stop) may be called from any thread, so an
/// instance is usually wrapped in an [`Arc`] when another thread needs to
/// stop it. Each instance owns its hook lists and its stop event; nothing is
/// shared between instances.
pub struct Serv {
    hooks: Mutex<HookRegistry>,
    stop: StopSignal,
    signals: Box<dyn SignalSource>,
    logger: Arc<dyn Logger>,
    phase: Mutex<Phase>,
}

impl Serv {
    /// Builds an orchestrator with default options.
    #[must_use]
    pub fn new() -> Self {
        ServBuilder::new().build()
    }

    /// Starts a builder for customising construction-time options.
    #[must_use]
    pub fn builder() -> ServBuilder {
        ServBuilder::new()
    }

    fn from_parts(logger: Arc<dyn Logger>, signals: Box<dyn SignalSource>) -> Self {
        Self {
            hooks: Mutex::new(HookRegistry::default()),
            stop: StopSignal::new(),
            signals,
            logger,
            phase: Mutex::new(Phase::Init),
        }
    }

    /// Appends a hook that runs before any service's `before_serve`.
    pub fn register_before_serve<F>(&self, hook: F)
    where
        F: Fn() -> StepResult + Send + Sync + 'static,
    {
        self.register(HookPoint::BeforeServe, Arc::new(hook));
    }

    /// Appends a hook that runs before any service's `after_serve`.
    pub fn register_after_serve<F>(&self, hook: F)
    where
        F: Fn() -> StepResult + Send + Sync + 'static,
    {
        self.register(HookPoint::AfterServe, Arc::new(hook));
    }

    /// Appends a hook that runs before any service's `before_stop`.
    pub fn register_before_stop<F>(&self, hook: F)
    where
        F: Fn() -> StepResult + Send + Sync + 'static,
    {
        self.register(HookPoint::BeforeStop, Arc::new(hook));
    }

    /// Appends an already shared hook to the list for `point`.
    pub fn register(&self, point: HookPoint, hook: Hook) {
        let mut hooks = self.hooks();
        hooks.register(point, hook);
        debug!(
            target: LIFECYCLE_TARGET,
            point = %point,
            registered = hooks.len(point),
            "hook registered"
        );
    }

    /// Requests termination of the current run.
    ///
    /// The request takes effect when the run reaches `Waiting`; it cannot
    /// interrupt a service blocked in `serve`. Requests made after the event
    /// has fired or after the run finished are ignored.
    pub fn force_stop(&self) {
        if self.stop.fire(StopTrigger::ForceStop) {
            info!(target: LIFECYCLE_TARGET, "force stop requested");
        } else {
            debug!(
                target: LIFECYCLE_TARGET,
                "force stop ignored: stop event already fired or closed"
            );
        }
    }

    /// Phase the orchestrator is currently in.
    #[must_use]
    pub fn phase(&self) -> Phase {
        *self.lock_phase()
    }

    /// Whether a run has finished and closed the stop event.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.stop.is_closed()
    }

    /// Runs the full lifecycle over `services` and blocks until it ends.
    ///
    /// Services are driven in slice order. The call returns once the shutdown
    /// phase has completed, after a termination request, a failing step or a
    /// contained panic. Failures are reported once through the logger and
    /// also returned: a contained panic takes precedence over the latched
    /// step failure. An instance serves once; later calls return
    /// [`ServeError::Finished`] without running any phase.
    pub fn serve(&self, services: &mut [&mut dyn Service]) -> Result<(), ServeError> {
        if self.stop.is_closed() {
            let error = ServeError::Finished;
            self.logger.error(format_args!("serve error: {error}"));
            return Err(error);
        }
        info!(
            target: LIFECYCLE_TARGET,
            services = services.len(),
            "starting lifecycle"
        );

        let mut latch = ErrorLatch::default();
        let mut subscription = None;

        let forward = panic::catch_unwind(AssertUnwindSafe(|| {
            self.run_forward(services, &mut latch, &mut subscription)
        }));
        let forward_panic = match forward {
            Ok(Ok(())) => None,
            Ok(Err(Halted)) => {
                info!(
                    target: LIFECYCLE_TARGET,
                    "forward phases halted by a failure; shutting down"
                );
                None
            }
            Err(payload) => Some(self.contained(&payload)),
        };

        let shutdown = panic::catch_unwind(AssertUnwindSafe(|| {
            self.run_before_stop(services, &mut latch);
        }));
        let shutdown_panic = shutdown
            .err()
            .map(|payload| self.contained(&payload));

        if let Some(error) = latch.get() {
            self.logger.error(format_args!("serve error: {error}"));
        }
        self.stop.close();
        if let Some(active) = subscription {
            active.release();
        }
        self.enter(Phase::Done);

        let mut panics = forward_panic.into_iter().chain(shutdown_panic);
        if let Some(first) = panics.next() {
            self.logger.error(format_args!("panic: {first}"));
            for later in panics {
                self.logger.error(format_args!("panic: {later}"));
            }
            return Err(ServeError::Panic { message: first });
        }
        latch.take().map_or(Ok(()), Err)
    }

    fn run_forward(
        &self,
        services: &mut [&mut dyn Service],
        latch: &mut ErrorLatch,
        subscription: &mut Option<SignalSubscription>,
    ) -> Result<(), Halted> {
        match self.signals.subscribe(self.stop.clone()) {
            Ok(active) => *subscription = Some(active),
            Err(source) => return Err(latch.latch(ServeError::Signals { source })),
        }

        self.enter(Phase::BeforeServe);
        self.run_hooks(HookPoint::BeforeServe, latch)?;
        self.run_services(Phase::BeforeServe, services, latch)?;

        self.enter(Phase::Serve);
        self.run_services(Phase::Serve, services, latch)?;

        self.enter(Phase::AfterServe);
        self.run_hooks(HookPoint::AfterServe, latch)?;
        self.run_services(Phase::AfterServe, services, latch)?;

        self.enter(Phase::Waiting);
        match self.stop.wait() {
            Some(trigger) => info!(
                target: LIFECYCLE_TARGET,
                trigger = %trigger,
                "termination requested"
            ),
            None => warn!(
                target: LIFECYCLE_TARGET,
                "stop event closed while waiting"
            ),
        }
        Ok(())
    }

    fn run_before_stop(&self, services: &mut [&mut dyn Service], latch: &mut ErrorLatch) {
        self.enter(Phase::BeforeStop);
        let outcome = self
            .run_hooks(HookPoint::BeforeStop, latch)
            .and_then(|()| self.run_services(Phase::BeforeStop, services, latch));
        if outcome.is_err() {
            debug!(
                target: LIFECYCLE_TARGET,
                latched = latch.is_set(),
                "shutdown phase halted early"
            );
        }
    }

    fn run_hooks(&self, point: HookPoint, latch: &mut ErrorLatch) -> Result<(), Halted> {
        let hooks = self.hooks().snapshot(point);
        for (index, hook) in hooks.iter().enumerate() {
            hook().map_err(|source| {
                latch.latch(ServeError::Hook {
                    point,
                    index,
                    source,
                })
            })?;
        }
        Ok(())
    }

    fn run_services(
        &self,
        phase: Phase,
        services: &mut [&mut dyn Service],
        latch: &mut ErrorLatch,
    ) -> Result<(), Halted> {
        for (index, service) in services.iter_mut().enumerate() {
            invoke(phase, &mut **service).map_err(|source| {
                latch.latch(ServeError::Service {
                    phase,
                    index,
                    source,
                })
            })?;
        }
        Ok(())
    }

    fn contained(&self, payload: &PanicPayload) -> String {
        let message = panic_message(&**payload);
        warn!(
            target: LIFECYCLE_TARGET,
            phase = %self.phase(),
            message = %message,
            "contained panic from lifecycle step"
        );
        message
    }

    fn enter(&self, phase: Phase) {
        *self.lock_phase() = phase;
        debug!(target: LIFECYCLE_TARGET, phase = %phase, "entering phase");
    }

    fn hooks(&self) -> MutexGuard<'_, HookRegistry> {
        self.hooks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_phase(&self) -> MutexGuard<'_, Phase> {
        self.phase.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Serv {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Serv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Serv")
            .field("hooks", &*self.hooks())
            .field("stop", &self.stop)
            .field("phase", &self.phase())
            .finish_non_exhaustive()
    }
}

fn invoke<'s>(phase: Phase, service: &mut (dyn Service + 's)) -> StepResult {
    match phase {
        Phase::BeforeServe => service.before_serve(),
        Phase::Serve => service.serve(),
        Phase::AfterServe => service.after_serve(),
        Phase::BeforeStop => service.before_stop(),
        Phase::Init | Phase::Waiting | Phase::Done => Ok(()),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    rendered::<&str>(payload)
        .or_else(|| rendered::<String>(payload))
        .or_else(|| rendered::<BoxError>(payload))
        .or_else(|| rendered::<i32>(payload))
        .or_else(|| rendered::<i64>(payload))
        .or_else(|| rendered::<u32>(payload))
        .or_else(|| rendered::<u64>(payload))
        .or_else(|| rendered::<usize>(payload))
        .or_else(|| rendered::<isize>(payload))
        .or_else(|| rendered::<bool>(payload))
        .or_else(|| rendered::<char>(payload))
        .unwrap_or_else(|| format!("opaque panic payload ({:?})", payload.type_id()))
}

fn rendered<T>(payload: &(dyn Any + Send)) -> Option<String>
where
    T: fmt::Display + 'static,
{
    payload.downcast_ref::<T>().map(ToString::to_string)
}
