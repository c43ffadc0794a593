//! The step-bounded planner loop.
//!
//! Each step asks the [`Planner`] what to do next:
//!
//! 1. **Call** a tool: run it through the registry; on success feed the
//!    output into the next step, on failure stop and reply with the error
//! 2. **Reply**: stop and return the text
//!
//! Steps are strictly sequential. When the budget runs out the reply is
//! exactly `❌ step budget exceeded (N)`.

use std::sync::Arc;

use async_trait::async_trait;
use sandclaw_config::{DEFAULT_MAX_REPLY_BYTES, DEFAULT_MAX_STEPS};
use sandclaw_core::{
    CancellationToken, Event, EventKind, EventLog, PlannerError, Task, ToolRegistry, ToolRequest,
    truncate_reply,
};
use tracing::{debug, info, warn};

use crate::context::ContextAssembler;
use crate::orchestrator::{CANCELLED_REPLY, Orchestrator, error_reply};
use crate::planner::{PlanInput, Planner, Step, ToolOutcome};

/// The reply when the planner never produced a final answer.
pub fn budget_exceeded_reply(max_steps: u32) -> String {
    format!("❌ step budget exceeded ({max_steps})")
}

/// The core agent loop that alternates planner decisions and tool calls.
pub struct AgentLoop {
    /// Decides each step
    planner: Arc<dyn Planner>,

    /// Tool registry
    tools: Arc<ToolRegistry>,

    /// Event log shared with the rest of the runtime
    events: Arc<EventLog>,

    /// Optional memory context, assembled once per task
    context: Option<ContextAssembler>,

    /// Maximum planner calls per task
    max_steps: u32,

    max_reply_bytes: usize,
}

impl AgentLoop {
    pub fn new(planner: Arc<dyn Planner>, tools: Arc<ToolRegistry>, events: Arc<EventLog>) -> Self {
        Self {
            planner,
            tools,
            events,
            context: None,
            max_steps: DEFAULT_MAX_STEPS,
            max_reply_bytes: DEFAULT_MAX_REPLY_BYTES,
        }
    }

    /// Set the maximum number of steps (at least 1).
    pub fn with_max_steps(mut self, max: u32) -> Self {
        self.max_steps = max.max(1);
        self
    }

    pub fn with_max_reply_bytes(mut self, max: usize) -> Self {
        self.max_reply_bytes = max;
        self
    }

    /// Attach a memory context assembler.
    pub fn with_context(mut self, assembler: ContextAssembler) -> Self {
        self.context = Some(assembler);
        self
    }

    /// Assemble memory context. Failures are logged and the task proceeds without it.
    async fn load_context(&self) -> Option<String> {
        let assembler = self.context.clone()?;
        match tokio::task::spawn_blocking(move || assembler.assemble()).await {
            Ok(Ok(text)) if !text.is_empty() => {
                debug!(bytes = text.len(), "Assembled memory context");
                Some(text)
            }
            Ok(Ok(_)) => None,
            Ok(Err(e)) => {
                warn!(error = %e, "Context assembly failed, continuing without it");
                None
            }
            Err(e) => {
                warn!(error = %e, "Context assembly task failed");
                None
            }
        }
    }

    fn finish(&self, task: &Task, text: &str) -> String {
        let reply = truncate_reply(text, self.max_reply_bytes);
        self.events.record(
            Event::new(EventKind::Replied, task).with_message(format!("{} bytes", reply.len())),
        );
        reply
    }

    /// Run the loop for one task.
    pub async fn run(&self, task: &Task, cancel: &CancellationToken) -> String {
        info!(agent = %task.agent(), channel = %task.channel, "Processing task");
        self.events.record(Event::new(EventKind::TaskReceived, task));

        let context = self.load_context().await;
        let mut previous: Option<ToolOutcome> = None;

        for step in 0..self.max_steps {
            if cancel.is_cancelled() {
                return self.finish(task, CANCELLED_REPLY);
            }

            let input = PlanInput {
                task,
                previous: previous.as_ref(),
                context: context.as_deref(),
                step,
            };
            let planned = tokio::select! {
                planned = self.planner.next_step(&input) => planned,
                _ = cancel.cancelled() => return self.finish(task, CANCELLED_REPLY),
            };

            let (tool, args) = match planned {
                Ok(Step::Reply(text)) => return self.finish(task, &text),
                Ok(Step::Call { tool, .. }) if tool.trim().is_empty() => {
                    warn!(step, "Planner returned an empty tool name");
                    return self.finish(task, &error_reply(PlannerError::EmptyToolName));
                }
                Ok(Step::Call { tool, args }) => (tool, args),
                Err(e) => {
                    warn!(step, error = %e, "Planner failed");
                    return self.finish(task, &error_reply("planner failed"));
                }
            };

            debug!(step, tool = %tool, "Executing tool");
            let request = ToolRequest::new(args, task.clone()).with_cancel(cancel.clone());
            match self.tools.execute(&tool, &request).await {
                Ok(output) => {
                    self.events
                        .record(Event::new(EventKind::ToolSucceeded, task).with_tool(&tool));
                    previous = Some(ToolOutcome { tool, output });
                }
                Err(_) if cancel.is_cancelled() => return self.finish(task, CANCELLED_REPLY),
                Err(e) => {
                    warn!(step, tool = %tool, error = %e, "Tool failed");
                    self.events.record(
                        Event::new(EventKind::ToolFailed, task)
                            .with_tool(&tool)
                            .with_message(e.to_string()),
                    );
                    return self.finish(task, &error_reply(e));
                }
            }
        }

        warn!(agent = %task.agent(), max_steps = self.max_steps, "Step budget exhausted");
        self.events.record(
            Event::new(EventKind::BudgetExhausted, task)
                .with_message(format!("{} steps", self.max_steps)),
        );
        self.finish(task, &budget_exceeded_reply(self.max_steps))
    }
}

#[async_trait]
impl Orchestrator for AgentLoop {
    async fn handle(&self, task: &Task, cancel: &CancellationToken) -> String {
        self.run(task, cancel).await
    }
}
