//! The planner seam — decides what the loop does next.
//!
//! A planner sees the task, the previous tool result (if any) and the
//! assembled memory context, and answers with one [`Step`]. Model-backed
//! planners live outside this crate; [`CommandPlanner`] is the built-in
//! deterministic one.

use async_trait::async_trait;
use sandclaw_core::{PlannerError, Task};

use crate::command::{Command, HELP_TEXT, USAGE_HINT, parse_command};

/// The next action chosen by a planner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Execute `tool` with `args`, then ask again.
    Call { tool: String, args: String },
    /// Finish the task with this reply.
    Reply(String),
}

impl Step {
    pub fn call(tool: impl Into<String>, args: impl Into<String>) -> Self {
        Self::Call {
            tool: tool.into(),
            args: args.into(),
        }
    }

    pub fn reply(text: impl Into<String>) -> Self {
        Self::Reply(text.into())
    }
}

/// Result of the most recent successful tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutcome {
    pub tool: String,
    pub output: String,
}

/// Everything a planner may look at when choosing a step.
#[derive(Debug, Clone, Copy)]
pub struct PlanInput<'a> {
    pub task: &'a Task,
    pub previous: Option<&'a ToolOutcome>,
    /// Assembled memory files, when context assembly is enabled
    pub context: Option<&'a str>,
    /// Zero-based step index
    pub step: u32,
}

#[async_trait]
pub trait Planner: Send + Sync {
    async fn next_step(&self, input: &PlanInput<'_>) -> Result<Step, PlannerError>;
}

/// Interprets the command grammar as a one-call plan.
///
/// First step: the parsed command (a tool call, help, or usage hint).
/// Second step: reply with the tool's output.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandPlanner;

#[async_trait]
impl Planner for CommandPlanner {
    async fn next_step(&self, input: &PlanInput<'_>) -> Result<Step, PlannerError> {
        if let Some(outcome) = input.previous {
            return Ok(Step::reply(outcome.output.clone()));
        }
        Ok(match parse_command(&input.task.text) {
            Command::Run { tool, args } => Step::Call { tool, args },
            Command::Help => Step::reply(HELP_TEXT),
            Command::Empty => Step::reply(""),
            Command::Unrecognized => Step::reply(USAGE_HINT),
        })
    }
}
