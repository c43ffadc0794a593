//! Configuration loading, validation, and management for SandClaw.
//!
//! Loads configuration from `~/.sandclaw/config.toml` (or the file named by
//! `SANDCLAW_CONFIG`) with environment variable overrides. Validates all
//! settings at startup; the rest of the runtime receives already-validated
//! values.
//!
//! Every allow-list defaults to empty, which denies everything.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default step budget for the planner loop.
pub const DEFAULT_MAX_STEPS: u32 = 8;
/// Default maximum reply size in bytes.
pub const DEFAULT_MAX_REPLY_BYTES: usize = 4000;
/// Default number of events kept by the in-memory event log.
pub const DEFAULT_EVENT_LOG_CAPACITY: usize = 256;
/// Default per-file cap for assembled memory context.
pub const DEFAULT_CONTEXT_FILE_MAX_BYTES: usize = 64 * 1024;
/// Default total cap for assembled memory context.
pub const DEFAULT_CONTEXT_TOTAL_MAX_BYTES: usize = 256 * 1024;
/// Default number of daily memory files included in context.
pub const DEFAULT_CONTEXT_DAILY_LIMIT: usize = 2;

/// Smallest reply cap accepted; must exceed the truncation suffix.
const MIN_REPLY_BYTES: usize = 64;

/// Smallest context cap accepted, for the same reason.
const MIN_CONTEXT_BYTES: usize = 64;

/// The root configuration structure.
///
/// Maps directly to `~/.sandclaw/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Filesystem confinement
    #[serde(default)]
    pub sandbox: SandboxConfig,

    /// Tool registry allow-list
    #[serde(default)]
    pub tools: ToolsConfig,

    /// Subprocess tool settings
    #[serde(default)]
    pub exec: ExecConfig,

    /// Orchestration settings
    #[serde(default)]
    pub agent: AgentConfig,

    /// Memory context assembly
    #[serde(default)]
    pub context: ContextConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SandboxConfig {
    /// Root directories. Empty = every file operation fails.
    #[serde(default)]
    pub roots: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Tool names that may be called. Empty = deny all.
    #[serde(default)]
    pub allowed: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecConfig {
    /// Program base names `subprocess.exec` may start. Empty = deny all.
    #[serde(default)]
    pub allowed_commands: Vec<String>,
}

/// Which orchestration strategy handles tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrchestratorMode {
    /// Step-bounded planner loop
    #[default]
    Loop,
    /// One command per task, parsed from the task text
    Single,
}

impl std::str::FromStr for OrchestratorMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "loop" => Ok(Self::Loop),
            "single" => Ok(Self::Single),
            other => Err(ConfigError::ValidationError(format!(
                "agent.mode must be 'loop' or 'single', got '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    #[serde(default)]
    pub mode: OrchestratorMode,

    #[serde(default = "default_max_steps")]
    pub max_steps: u32,

    #[serde(default = "default_max_reply_bytes")]
    pub max_reply_bytes: usize,

    #[serde(default = "default_event_log_capacity")]
    pub event_log_capacity: usize,
}

fn default_max_steps() -> u32 {
    DEFAULT_MAX_STEPS
}
fn default_max_reply_bytes() -> usize {
    DEFAULT_MAX_REPLY_BYTES
}
fn default_event_log_capacity() -> usize {
    DEFAULT_EVENT_LOG_CAPACITY
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            mode: OrchestratorMode::default(),
            max_steps: default_max_steps(),
            max_reply_bytes: default_max_reply_bytes(),
            event_log_capacity: default_event_log_capacity(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Memory directory. Defaults to the first sandbox root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,

    #[serde(default = "default_context_file_max")]
    pub per_file_max_bytes: usize,

    #[serde(default = "default_context_total_max")]
    pub total_max_bytes: usize,

    #[serde(default = "default_context_daily_limit")]
    pub daily_limit: usize,
}

fn default_context_file_max() -> usize {
    DEFAULT_CONTEXT_FILE_MAX_BYTES
}
fn default_context_total_max() -> usize {
    DEFAULT_CONTEXT_TOTAL_MAX_BYTES
}
fn default_context_daily_limit() -> usize {
    DEFAULT_CONTEXT_DAILY_LIMIT
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            root: None,
            per_file_max_bytes: default_context_file_max(),
            total_max_bytes: default_context_total_max(),
            daily_limit: default_context_daily_limit(),
        }
    }
}

impl ContextConfig {
    /// The configured memory root, falling back to the first sandbox root.
    pub fn effective_root<'a>(&'a self, sandbox: &'a SandboxConfig) -> Option<&'a str> {
        self.root
            .as_deref()
            .or_else(|| sandbox.roots.first().map(String::as_str))
    }
}

impl AppConfig {
    /// Load configuration from the default path.
    ///
    /// The path is `$SANDCLAW_CONFIG` if set, else `~/.sandclaw/config.toml`.
    /// Environment overrides are applied afterwards:
    /// - `SANDCLAW_SANDBOX_ROOTS` (platform path-list separator)
    /// - `SANDCLAW_ALLOWED_TOOLS` (comma separated)
    /// - `SANDCLAW_ALLOWED_COMMANDS` (comma separated)
    /// - `SANDCLAW_MODE` (`loop` or `single`)
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var_os("SANDCLAW_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|| Self::config_dir().join("config.toml"));
        let mut config = Self::load_from(&path)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::ParseError {
            path: PathBuf::from("<string>"),
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup (normally the process env).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(roots) = lookup("SANDCLAW_SANDBOX_ROOTS") {
            self.sandbox.roots = std::env::split_paths(&roots)
                .filter(|p| !p.as_os_str().is_empty())
                .map(|p| p.to_string_lossy().into_owned())
                .collect();
        }
        if let Some(tools) = lookup("SANDCLAW_ALLOWED_TOOLS") {
            self.tools.allowed = split_list(&tools);
        }
        if let Some(commands) = lookup("SANDCLAW_ALLOWED_COMMANDS") {
            self.exec.allowed_commands = split_list(&commands);
        }
        if let Some(mode) = lookup("SANDCLAW_MODE") {
            self.agent.mode = mode.parse()?;
        }
        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".sandclaw")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.agent.max_steps == 0 {
            return Err(ConfigError::ValidationError(
                "agent.max_steps must be at least 1".into(),
            ));
        }

        if self.agent.max_reply_bytes < MIN_REPLY_BYTES {
            return Err(ConfigError::ValidationError(format!(
                "agent.max_reply_bytes must be at least {MIN_REPLY_BYTES}"
            )));
        }

        if self.agent.event_log_capacity == 0 {
            return Err(ConfigError::ValidationError(
                "agent.event_log_capacity must be > 0".into(),
            ));
        }

        if self.sandbox.roots.iter().any(|r| r.trim().is_empty()) {
            return Err(ConfigError::ValidationError(
                "sandbox.roots must not contain blank entries".into(),
            ));
        }

        let ctx = &self.context;
        if ctx.per_file_max_bytes < MIN_CONTEXT_BYTES || ctx.total_max_bytes < MIN_CONTEXT_BYTES {
            return Err(ConfigError::ValidationError(format!(
                "context byte caps must be at least {MIN_CONTEXT_BYTES}"
            )));
        }
        if ctx.per_file_max_bytes > ctx.total_max_bytes {
            return Err(ConfigError::ValidationError(
                "context.per_file_max_bytes must not exceed context.total_max_bytes".into(),
            ));
        }
        if ctx.enabled && ctx.effective_root(&self.sandbox).is_none() {
            return Err(ConfigError::ValidationError(
                "context.enabled requires context.root or a sandbox root".into(),
            ));
        }

        Ok(())
    }

    /// Generate a starter config TOML string.
    pub fn default_toml() -> String {
        let config = Self {
            sandbox: SandboxConfig {
                roots: vec![Self::config_dir().join("workspace").display().to_string()],
            },
            tools: ToolsConfig {
                allowed: vec!["echo".into(), "version".into(), "tools.list".into()],
            },
            ..Self::default()
        };
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
