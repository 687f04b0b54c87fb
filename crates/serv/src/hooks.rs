//! Process-wide callbacks that run alongside the lifecycle phases.

use std::fmt;
use std::sync::Arc;

use strum::Display;

use crate::error::StepResult;

/// A registered hook.
///
/// Hooks are shared so that a phase can snapshot its list and run it without
/// holding the registry lock; a hook may therefore register further hooks for
/// phases that have not started yet.
pub type Hook = Arc<dyn Fn() -> StepResult + Send + Sync>;

/// The three hook lists, named after the phase that runs them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum HookPoint {
    /// Runs before any service's `before_serve`.
    BeforeServe,
    /// Runs before any service's `after_serve`.
    AfterServe,
    /// Runs before any service's `before_stop`.
    BeforeStop,
}

/// Ordered hook lists. Registration order is execution order.
#[derive(Default)]
pub(crate) struct HookRegistry {
    before_serve: Vec<Hook>,
    after_serve: Vec<Hook>,
    before_stop: Vec<Hook>,
}

impl HookRegistry {
    pub(crate) fn register(&mut self, point: HookPoint, hook: Hook) {
        self.list_mut(point).push(hook);
    }

    pub(crate) fn snapshot(&self, point: HookPoint) -> Vec<Hook> {
        self.list(point).clone()
    }

    pub(crate) fn len(&self, point: HookPoint) -> usize {
        self.list(point).len()
    }

    fn list(&self, point: HookPoint) -> &Vec<Hook> {
        match point {
            HookPoint::BeforeServe => &self.before_serve,
            HookPoint::AfterServe => &self.after_serve,
            HookPoint::BeforeStop => &self.before_stop,
        }
    }

    fn list_mut(&mut self, point: HookPoint) -> &mut Vec<Hook> {
        match point {
            HookPoint::BeforeServe => &mut self.before_serve,
            HookPoint::AfterServe => &mut self.after_serve,
            HookPoint::BeforeStop => &mut self.before_stop,
        }
    }
}

impl fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookRegistry")
            .field("before_serve", &self.before_serve.len())
            .field("after_serve", &self.after_serve.len())
            .field("before_stop", &self.before_stop.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use rstest::rstest;

    use super::*;

    fn recording_hook(log: &Arc<Mutex<Vec<&'static str>>>, name: &'static str) -> Hook {
        let log = Arc::clone(log);
        Arc::new(move || {
            log.lock().expect("hook log poisoned").push(name);
            Ok(())
        })
    }

    #[rstest]
    fn snapshots_preserve_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = HookRegistry::default();
        registry.register(HookPoint::BeforeServe, recording_hook(&log, "first"));
        registry.register(HookPoint::BeforeServe, recording_hook(&log, "second"));
        registry.register(HookPoint::BeforeServe, recording_hook(&log, "third"));

        for hook in registry.snapshot(HookPoint::BeforeServe) {
            hook().expect("hook should succeed");
        }

        assert_eq!(
            *log.lock().expect("hook log poisoned"),
            vec!["first", "second", "third"]
        );
    }

    #[rstest]
    fn lists_are_kept_apart() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = HookRegistry::default();
        registry.register(HookPoint::AfterServe, recording_hook(&log, "after"));
        registry.register(HookPoint::BeforeStop, recording_hook(&log, "stop"));

        assert_eq!(registry.len(HookPoint::BeforeServe), 0);
        assert_eq!(registry.len(HookPoint::AfterServe), 1);
        assert_eq!(registry.len(HookPoint::BeforeStop), 1);
    }

    #[rstest]
    fn the_same_hook_may_be_registered_twice() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let hook = recording_hook(&log, "twice");
        let mut registry = HookRegistry::default();
        registry.register(HookPoint::BeforeStop, Arc::clone(&hook));
        registry.register(HookPoint::BeforeStop, hook);

        assert_eq!(registry.len(HookPoint::BeforeStop), 2);
    }
}
