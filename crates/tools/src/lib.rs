//! Built-in tool implementations for SandClaw.
//!
//! Tools give the agent the ability to act on the host, always through
//! the sandbox:
//! - `echo`, `version`, `tools.list`
//! - `file.*`: read, write, edit, delete, list, tail, exists, stat, hash, grep
//! - `subprocess.exec`: allow-listed programs without a shell
//! - `browser.capture`: argument validation only
//!
//! [`build_registry`] registers every tool; the configured allow-list
//! decides which of them may actually be called.

pub mod browser;
pub mod common;
pub mod echo;
pub mod exec;
pub mod file_delete;
pub mod file_edit;
pub mod file_grep;
pub mod file_hash;
pub mod file_list;
pub mod file_read;
pub mod file_stat;
pub mod file_tail;
pub mod file_write;
pub mod tools_list;
pub mod version;

use sandclaw_config::AppConfig;
use sandclaw_core::{AllowList, RegistryError, TOOLS_LIST, ToolRegistry};
use sandclaw_security::{CommandAllowlist, Sandbox};

pub use tools_list::NO_CAPABILITIES;
pub use version::version_string;

/// The sandbox described by `config.sandbox.roots`.
pub fn sandbox_from_config(config: &AppConfig) -> Sandbox {
    Sandbox::new(config.sandbox.roots.iter().map(|r| r.trim()))
}

/// Create the tool registry for `config`.
///
/// Security defaults:
/// - Nothing is callable unless listed in `tools.allowed`
/// - File tools fail when no sandbox root is configured
/// - `subprocess.exec` also needs `exec.allowed_commands`
pub fn build_registry(config: &AppConfig) -> Result<ToolRegistry, RegistryError> {
    let sandbox = sandbox_from_config(config);
    let commands = CommandAllowlist::new(&config.exec.allowed_commands);
    let mut registry = ToolRegistry::new(AllowList::new(&config.tools.allowed));

    registry.register(Box::new(echo::EchoTool))?;
    registry.register(Box::new(version::VersionTool))?;
    registry.register(Box::new(file_read::FileReadTool::new(sandbox.clone())))?;
    registry.register(Box::new(file_write::FileWriteTool::new(sandbox.clone())))?;
    registry.register(Box::new(file_edit::FileEditTool::new(sandbox.clone())))?;
    registry.register(Box::new(file_delete::FileDeleteTool::new(sandbox.clone())))?;
    registry.register(Box::new(file_list::FileListTool::new(sandbox.clone())))?;
    registry.register(Box::new(file_tail::FileTailTool::new(sandbox.clone())))?;
    registry.register(Box::new(file_stat::FileExistsTool::new(sandbox.clone())))?;
    registry.register(Box::new(file_stat::FileStatTool::new(sandbox.clone())))?;
    registry.register(Box::new(file_hash::FileHashTool::new(sandbox.clone())))?;
    registry.register(Box::new(file_grep::FileGrepTool::new(sandbox.clone())))?;
    registry.register(Box::new(exec::ExecTool::new(
        commands,
        sandbox,
        config.agent.max_reply_bytes,
    )))?;
    registry.register(Box::new(browser::BrowserCaptureTool))?;

    // Registered last so it can list itself alongside everything else.
    let listed = registry
        .allowlist()
        .filter(registry.names().into_iter().chain([TOOLS_LIST]));
    registry.register(Box::new(tools_list::ToolsListTool::new(listed)))?;

    Ok(registry)
}
