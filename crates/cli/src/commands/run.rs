//! `sandclaw run` — Handle one task end to end.

use std::sync::Arc;

use anyhow::Context;
use sandclaw_agent::{CommandPlanner, Orchestrator, build_orchestrator};
use sandclaw_config::{AppConfig, OrchestratorMode};
use sandclaw_core::{CancellationToken, EventLog, Task};
use sandclaw_tools::{build_registry, sandbox_from_config};
use tokio::io::AsyncReadExt;
use tracing::debug;

pub struct RunArgs {
    pub message: Option<String>,
    pub agent: String,
    pub channel: String,
    pub mode: Option<OrchestratorMode>,
}

pub async fn run(mut config: AppConfig, args: RunArgs) -> anyhow::Result<()> {
    if let Some(mode) = args.mode {
        config.agent.mode = mode;
    }

    let text = match args.message {
        Some(message) => message,
        None => {
            let mut buf = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buf)
                .await
                .context("failed to read task from stdin")?;
            buf
        }
    };

    let registry = Arc::new(build_registry(&config).context("failed to build tool registry")?);
    let events = Arc::new(EventLog::new(config.agent.event_log_capacity));
    let sandbox = sandbox_from_config(&config);
    let orchestrator: Arc<dyn Orchestrator> = Arc::from(
        build_orchestrator(&config, registry, events.clone(), Arc::new(CommandPlanner), &sandbox)
            .context("failed to set up orchestrator")?,
    );

    let task = Task::new(text)
        .with_agent(args.agent)
        .with_channel(args.channel);

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let handle = tokio::spawn(async move { orchestrator.handle(&task, &cancel).await });
    let reply = handle.await.context("task panicked")?;

    debug!(events = events.len(), "Task finished");
    if !reply.is_empty() {
        println!("{reply}");
    }
    Ok(())
}
