//! Orchestration for SandClaw — turning a task into one reply.
//!
//! Two strategies implement [`Orchestrator`]:
//!
//! 1. [`AgentLoop`]: asks a [`Planner`] for steps, runs tool calls through
//!    the registry, and stops on a reply, a tool failure, or the step budget
//! 2. [`CommandRouter`]: parses one `/run`-style command and executes at
//!    most one tool
//!
//! Both truncate every reply with the same function and record events in
//! the shared [`sandclaw_core::EventLog`].

pub mod command;
pub mod context;
pub mod loop_runner;
pub mod orchestrator;
pub mod planner;

#[cfg(test)]
mod test_helpers;

pub use command::{Command, HELP_TEXT, USAGE_HINT, parse_command};
pub use context::{AssemblyError, ContextAssembler, ContextLimits};
pub use loop_runner::{AgentLoop, budget_exceeded_reply};
pub use orchestrator::{CANCELLED_REPLY, CommandRouter, Orchestrator, build_orchestrator};
pub use planner::{CommandPlanner, PlanInput, Planner, Step, ToolOutcome};
