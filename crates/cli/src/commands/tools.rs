//! `sandclaw tools` — Registered tools and their allow-list status.

use anyhow::Context;
use sandclaw_config::AppConfig;
use sandclaw_tools::build_registry;

pub fn run(config: &AppConfig) -> anyhow::Result<()> {
    let registry = build_registry(config).context("failed to build tool registry")?;

    if !registry.is_configured() {
        println!("  ⚠️  tools.allowed is empty: every tool call will be denied");
        println!();
    }

    for name in registry.names() {
        let marker = if registry.allowlist().allows(name) { "✅" } else { "  " };
        let description = registry.get(name).map(|t| t.description()).unwrap_or_default();
        println!("  {marker} {name:<18} {description}");
    }
    Ok(())
}
