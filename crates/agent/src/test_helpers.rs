//! Shared test helpers for orchestration tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sandclaw_core::{AllowList, PlannerError, Tool, ToolError, ToolRegistry, ToolRequest};

use crate::planner::{PlanInput, Planner, Step};

pub struct EchoTool;

#[async_trait]
impl Tool for EchoTool {
    fn name(&self) -> &str {
        "echo"
    }
    fn description(&self) -> &str {
        "echo"
    }
    async fn execute(&self, request: &ToolRequest) -> Result<String, ToolError> {
        Ok(request.args.trim().to_string())
    }
}

/// Always fails with [`FailingTool::error`].
pub struct FailingTool;

impl FailingTool {
    pub fn error() -> ToolError {
        ToolError::failed("fail", "boom")
    }
}

#[async_trait]
impl Tool for FailingTool {
    fn name(&self) -> &str {
        "fail"
    }
    fn description(&self) -> &str {
        "always fails"
    }
    async fn execute(&self, _request: &ToolRequest) -> Result<String, ToolError> {
        Err(Self::error())
    }
}

/// Registry with `echo` and `fail` registered and `allowed` enabled.
pub fn registry(allowed: &[&str]) -> Arc<ToolRegistry> {
    let mut registry = ToolRegistry::new(AllowList::new(allowed.iter().copied()));
    registry.register(Box::new(EchoTool)).unwrap();
    registry.register(Box::new(FailingTool)).unwrap();
    Arc::new(registry)
}

/// A planner that returns a scripted sequence of steps and records what it saw.
///
/// Panics if asked for more steps than scripted.
pub struct ScriptedPlanner {
    steps: Mutex<Vec<Result<Step, PlannerError>>>,
    seen: Mutex<Vec<(Option<String>, Option<String>)>>,
}

impl ScriptedPlanner {
    pub fn new(steps: Vec<Result<Step, PlannerError>>) -> Self {
        let mut steps = steps;
        steps.reverse();
        Self {
            steps: Mutex::new(steps),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// `(previous output, context)` for every call, in order.
    pub fn seen(&self) -> Vec<(Option<String>, Option<String>)> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Planner for ScriptedPlanner {
    async fn next_step(&self, input: &PlanInput<'_>) -> Result<Step, PlannerError> {
        self.seen.lock().unwrap().push((
            input.previous.map(|o| o.output.clone()),
            input.context.map(str::to_string),
        ));
        self.steps
            .lock()
            .unwrap()
            .pop()
            .expect("ScriptedPlanner: no more steps")
    }
}

/// Calls `echo` forever.
pub struct AlwaysEchoPlanner;

#[async_trait]
impl Planner for AlwaysEchoPlanner {
    async fn next_step(&self, _input: &PlanInput<'_>) -> Result<Step, PlannerError> {
        Ok(Step::call("echo", "again"))
    }
}
