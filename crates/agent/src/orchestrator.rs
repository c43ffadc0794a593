//! The `Orchestrator` seam and the single-shot strategy.
//!
//! Both strategies take a [`Task`] and return one reply string; an empty
//! string means "send nothing". Which one runs is chosen by `agent.mode`.

use std::sync::Arc;

use async_trait::async_trait;
use sandclaw_config::{AppConfig, OrchestratorMode};
use sandclaw_core::{
    CancellationToken, Event, EventKind, EventLog, Task, ToolRegistry, ToolRequest, truncate_reply,
};
use sandclaw_security::Sandbox;
use tracing::{debug, warn};

use crate::command::{Command, HELP_TEXT, USAGE_HINT, parse_command};
use crate::context::{AssemblyError, ContextAssembler, ContextLimits};
use crate::loop_runner::AgentLoop;
use crate::planner::Planner;

/// Reply when the caller cancels the task.
pub const CANCELLED_REPLY: &str = "❌ cancelled";

#[async_trait]
pub trait Orchestrator: Send + Sync {
    /// Handle one task to completion. Never fails: errors become replies.
    async fn handle(&self, task: &Task, cancel: &CancellationToken) -> String;
}

/// Format a failure the way every strategy reports it.
pub(crate) fn error_reply(err: impl std::fmt::Display) -> String {
    format!("❌ {err}")
}

/// Executes at most one tool call, parsed from the task text.
pub struct CommandRouter {
    registry: Arc<ToolRegistry>,
    events: Arc<EventLog>,
    max_reply_bytes: usize,
}

impl CommandRouter {
    pub fn new(registry: Arc<ToolRegistry>, events: Arc<EventLog>) -> Self {
        Self {
            registry,
            events,
            max_reply_bytes: sandclaw_config::DEFAULT_MAX_REPLY_BYTES,
        }
    }

    pub fn with_max_reply_bytes(mut self, max: usize) -> Self {
        self.max_reply_bytes = max;
        self
    }

    fn reply(&self, task: &Task, text: &str) -> String {
        let text = truncate_reply(text, self.max_reply_bytes);
        self.events
            .record(Event::new(EventKind::Replied, task).with_message(format!("{} bytes", text.len())));
        text
    }
}

#[async_trait]
impl Orchestrator for CommandRouter {
    async fn handle(&self, task: &Task, cancel: &CancellationToken) -> String {
        self.events.record(Event::new(EventKind::TaskReceived, task));

        let (tool, args) = match parse_command(&task.text) {
            Command::Run { tool, args } => (tool, args),
            Command::Help => return self.reply(task, HELP_TEXT),
            Command::Empty => return String::new(),
            Command::Unrecognized => return self.reply(task, USAGE_HINT),
        };

        if cancel.is_cancelled() {
            return self.reply(task, CANCELLED_REPLY);
        }

        debug!(tool = %tool, agent = %task.agent(), "Single-shot tool call");
        let request = ToolRequest::new(args, task.clone()).with_cancel(cancel.clone());
        match self.registry.execute(&tool, &request).await {
            Ok(output) => {
                self.events.record(Event::new(EventKind::ToolSucceeded, task).with_tool(&tool));
                self.reply(task, &output)
            }
            Err(_) if cancel.is_cancelled() => self.reply(task, CANCELLED_REPLY),
            Err(e) => {
                warn!(tool = %tool, error = %e, "Tool failed");
                self.events.record(
                    Event::new(EventKind::ToolFailed, task)
                        .with_tool(&tool)
                        .with_message(e.to_string()),
                );
                self.reply(task, &error_reply(e))
            }
        }
    }
}

/// Build the orchestrator selected by `config.agent.mode`.
///
/// In loop mode with `context.enabled`, the memory root is validated
/// here; a rejected root is a startup error.
pub fn build_orchestrator(
    config: &AppConfig,
    registry: Arc<ToolRegistry>,
    events: Arc<EventLog>,
    planner: Arc<dyn Planner>,
    sandbox: &Sandbox,
) -> Result<Box<dyn Orchestrator>, AssemblyError> {
    let agent = &config.agent;
    match agent.mode {
        OrchestratorMode::Single => Ok(Box::new(
            CommandRouter::new(registry, events).with_max_reply_bytes(agent.max_reply_bytes),
        )),
        OrchestratorMode::Loop => {
            let mut runner = AgentLoop::new(planner, registry, events)
                .with_max_steps(agent.max_steps)
                .with_max_reply_bytes(agent.max_reply_bytes);
            if config.context.enabled
                && let Some(root) = config.context.effective_root(&config.sandbox)
            {
                let limits = ContextLimits::from(&config.context);
                runner = runner.with_context(ContextAssembler::new(sandbox, root, limits)?);
            }
            Ok(Box::new(runner))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{FailingTool, registry};

    fn router(allowed: &[&str]) -> (CommandRouter, Arc<EventLog>) {
        let events = Arc::new(EventLog::new(16));
        let router = CommandRouter::new(registry(allowed), events.clone());
        (router, events)
    }

    #[tokio::test]
    async fn runs_one_tool() {
        let (router, events) = router(&["echo"]);
        let reply = router
            .handle(&Task::new("/run echo hello world"), &CancellationToken::new())
            .await;
        assert_eq!(reply, "hello world");
        let kinds: Vec<_> = events.snapshot().into_iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![EventKind::TaskReceived, EventKind::ToolSucceeded, EventKind::Replied]
        );
    }

    #[tokio::test]
    async fn blank_task_gets_no_reply() {
        let (router, _) = router(&["echo"]);
        assert_eq!(router.handle(&Task::new("  "), &CancellationToken::new()).await, "");
    }

    #[tokio::test]
    async fn free_text_gets_usage() {
        let (router, _) = router(&["echo"]);
        let reply = router.handle(&Task::new("hi bot"), &CancellationToken::new()).await;
        assert_eq!(reply, USAGE_HINT);
    }

    #[tokio::test]
    async fn denied_tool_hints_at_listing() {
        let (router, events) = router(&["echo"]);
        let reply = router
            .handle(&Task::new("/run fail now"), &CancellationToken::new())
            .await;
        assert!(reply.starts_with("❌ "));
        assert!(reply.contains("tools.list"));
        assert!(events.snapshot().iter().any(|e| e.kind == EventKind::ToolFailed));
    }

    #[tokio::test]
    async fn tool_error_becomes_reply() {
        let (router, _) = router(&["fail"]);
        let reply = router
            .handle(&Task::new("/run fail"), &CancellationToken::new())
            .await;
        assert_eq!(reply, format!("❌ {}", FailingTool::error()));
    }

    #[tokio::test]
    async fn long_output_truncated() {
        let events = Arc::new(EventLog::new(16));
        let router = CommandRouter::new(registry(&["echo"]), events).with_max_reply_bytes(64);
        let text = format!("/run echo {}", "z".repeat(500));
        let reply = router.handle(&Task::new(text), &CancellationToken::new()).await;
        assert!(reply.len() <= 64);
        assert!(reply.ends_with(sandclaw_core::TRUNCATION_SUFFIX));
    }

    #[test]
    fn mode_selects_strategy() {
        let mut config = AppConfig::default();
        config.agent.mode = OrchestratorMode::Single;
        let built = build_orchestrator(
            &config,
            registry(&[]),
            Arc::new(EventLog::default()),
            Arc::new(crate::CommandPlanner),
            &Sandbox::unconfigured(),
        );
        assert!(built.is_ok());
    }

    #[test]
    fn enabled_context_outside_sandbox_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.context.enabled = true;
        config.context.root = Some("/".into());
        let result = build_orchestrator(
            &config,
            registry(&[]),
            Arc::new(EventLog::default()),
            Arc::new(crate::CommandPlanner),
            &Sandbox::new([dir.path()]),
        );
        assert!(result.is_err());
    }
}
