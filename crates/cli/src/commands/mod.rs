pub mod config_cmd;
pub mod context;
pub mod run;
pub mod tools;

use std::path::Path;

use anyhow::Context;
use sandclaw_config::AppConfig;

/// Load configuration from `path` if given, else from the default location.
///
/// Environment overrides apply either way.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    let Some(path) = path else {
        return AppConfig::load().context("failed to load config");
    };
    let mut config = AppConfig::load_from(path)
        .with_context(|| format!("failed to load config from {}", path.display()))?;
    config
        .apply_overrides(|key| std::env::var(key).ok())
        .context("invalid environment override")?;
    config.validate().context("invalid configuration")?;
    Ok(config)
}
