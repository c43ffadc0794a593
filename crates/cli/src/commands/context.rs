//! `sandclaw context` — Print the memory context the planner would see.

use anyhow::{Context, bail};
use sandclaw_agent::{ContextAssembler, ContextLimits};
use sandclaw_config::AppConfig;
use sandclaw_tools::sandbox_from_config;

pub async fn run(config: &AppConfig) -> anyhow::Result<()> {
    let Some(root) = config.context.effective_root(&config.sandbox) else {
        bail!("no memory root: set context.root or sandbox.roots");
    };
    let sandbox = sandbox_from_config(config);
    let assembler = ContextAssembler::new(&sandbox, root, ContextLimits::from(&config.context))
        .context("memory root rejected")?;

    let text = tokio::task::spawn_blocking(move || assembler.assemble())
        .await
        .context("context assembly task failed")??;

    if text.is_empty() {
        println!("(no memory files)");
    } else {
        println!("{text}");
    }
    Ok(())
}
