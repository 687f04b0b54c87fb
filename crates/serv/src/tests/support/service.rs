//! Services and hooks whose behaviour is scripted per lifecycle step.

use crate::{Phase, Service, StepResult};

use super::Journal;

/// What a scripted step does after recording itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Step {
    #[default]
    Succeed,
    Fail,
    Panic,
}

impl Step {
    fn perform(self, label: &str) -> StepResult {
        match self {
            Self::Succeed => Ok(()),
            Self::Fail => Err(format!("{label} failed").into()),
            Self::Panic => panic!("{label} exploded"),
        }
    }
}

/// Service that records `name.operation` into a journal on every call.
#[derive(Debug)]
pub struct ScriptedService {
    name: String,
    journal: Journal,
    before_serve: Step,
    serve: Step,
    after_serve: Step,
    before_stop: Step,
}

impl ScriptedService {
    pub fn new(name: impl Into<String>, journal: &Journal) -> Self {
        Self {
            name: name.into(),
            journal: journal.clone(),
            before_serve: Step::Succeed,
            serve: Step::Succeed,
            after_serve: Step::Succeed,
            before_stop: Step::Succeed,
        }
    }

    #[must_use]
    pub fn with_step(mut self, phase: Phase, step: Step) -> Self {
        match phase {
            Phase::BeforeServe => self.before_serve = step,
            Phase::Serve => self.serve = step,
            Phase::AfterServe => self.after_serve = step,
            Phase::BeforeStop => self.before_stop = step,
            Phase::Init | Phase::Waiting | Phase::Done => {
                panic!("services have no operation for {phase}")
            }
        }
        self
    }

    fn run(&self, operation: Phase, step: Step) -> StepResult {
        let label = format!("{}.{operation}", self.name);
        self.journal.record(label.as_str());
        step.perform(&label)
    }
}

impl Service for ScriptedService {
    fn before_serve(&mut self) -> StepResult {
        self.run(Phase::BeforeServe, self.before_serve)
    }

    fn serve(&mut self) -> StepResult {
        self.run(Phase::Serve, self.serve)
    }

    fn after_serve(&mut self) -> StepResult {
        self.run(Phase::AfterServe, self.after_serve)
    }

    fn before_stop(&mut self) -> StepResult {
        self.run(Phase::BeforeStop, self.before_stop)
    }
}

/// Hook that records `name` into the journal and then performs `step`.
pub fn hook(
    journal: &Journal,
    name: &'static str,
    step: Step,
) -> impl Fn() -> StepResult + Send + Sync + 'static {
    let journal = journal.clone();
    move || {
        journal.record(name);
        step.perform(name)
    }
}
