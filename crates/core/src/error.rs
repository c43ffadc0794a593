//! Error types for the SandClaw domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! `ToolError` messages end up in chat replies, so every variant renders
//! text that is safe to show a user: no host paths, OS error strings or
//! command lines. Details go to the log instead.

use thiserror::Error;

/// Name of the tool that lists enabled tools; error messages point here.
pub const TOOLS_LIST: &str = "tools.list";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    #[error("unknown tool '{0}' (send `{TOOLS_LIST}` to see enabled tools)")]
    NotFound(String),

    #[error("tool '{0}' is not allowed (send `{TOOLS_LIST}` to see enabled tools)")]
    NotAllowed(String),

    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("{0}")]
    SandboxViolation(String),

    #[error("{tool_name}: permission denied: {reason}")]
    PermissionDenied { tool_name: String, reason: String },

    #[error("{tool_name}: not configured: {reason}")]
    NotConfigured { tool_name: String, reason: String },

    #[error("{tool_name}: {reason}")]
    ExecutionFailed { tool_name: String, reason: String },

    #[error("{tool_name}: command timed out")]
    Timeout { tool_name: String },

    #[error("{tool_name}: cancelled")]
    Cancelled { tool_name: String },
}

impl ToolError {
    /// Shorthand for a sanitized execution failure.
    pub fn failed(tool_name: &str, reason: impl Into<String>) -> Self {
        Self::ExecutionFailed {
            tool_name: tool_name.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("tool name must not be empty")]
    EmptyName,

    #[error("tool '{0}' is already registered")]
    Duplicate(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlannerError {
    #[error("planner failed: {0}")]
    Failed(String),

    #[error("planner returned an empty tool name")]
    EmptyToolName,
}
