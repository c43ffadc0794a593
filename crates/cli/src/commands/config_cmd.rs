//! `sandclaw config` — Configuration helpers.

use std::path::Path;

use sandclaw_config::AppConfig;

/// Print a starter config file.
pub fn starter() {
    println!("{}", AppConfig::default_toml());
}

/// Print the effective configuration after overrides.
pub fn show(config: &AppConfig) -> anyhow::Result<()> {
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

pub fn path(explicit: Option<&Path>) {
    let path = explicit.map(Path::to_path_buf).unwrap_or_else(|| {
        std::env::var_os("SANDCLAW_CONFIG")
            .map(Into::into)
            .unwrap_or_else(|| AppConfig::config_dir().join("config.toml"))
    });
    println!("{}", path.display());
}
