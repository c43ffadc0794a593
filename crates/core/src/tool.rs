//! Tool trait — the abstraction over agent capabilities.
//!
//! Tools are what give the agent the ability to act on the host:
//! read/write files inside the sandbox, run allow-listed commands, etc.
//! Every tool takes a free-form argument string; the encoding is
//! tool-specific (a bare path, `path\npayload`, or embedded JSON).

use async_trait::async_trait;
use std::collections::HashMap;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::allowlist::{AllowList, normalize_name};
use crate::error::{RegistryError, ToolError};
use crate::task::Task;

/// A request to execute a tool.
#[derive(Debug, Clone)]
pub struct ToolRequest {
    /// Raw argument string; each tool defines its own grammar
    pub args: String,

    /// The task this call is made on behalf of
    pub task: Task,

    /// Cancelled when the caller gives up on the task
    pub cancel: CancellationToken,
}

impl ToolRequest {
    pub fn new(args: impl Into<String>, task: Task) -> Self {
        Self {
            args: args.into(),
            task,
            cancel: CancellationToken::new(),
        }
    }

    /// Attach the caller's cancellation token.
    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }
}

/// The core Tool trait.
///
/// Each tool (echo, file.read, subprocess.exec, ...) implements this trait.
/// Tools are registered in the [`ToolRegistry`], which decides whether a
/// call is permitted before the tool ever sees it.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool (e.g., "file.read").
    fn name(&self) -> &str;

    /// One-line description for listings and help output.
    fn description(&self) -> &str;

    /// Execute the tool. The returned text goes back to the planner or user.
    async fn execute(&self, request: &ToolRequest) -> Result<String, ToolError>;
}

/// The set of registered tools plus the allow-list that gates them.
///
/// Registration and permission are separate: a binary can register every
/// tool it ships while a deployment enables a small explicit subset.
/// An empty allow-list denies every call.
///
/// Built once at startup and shared read-only (behind an `Arc`) afterwards.
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
    allowlist: AllowList,
}

impl ToolRegistry {
    pub fn new(allowlist: AllowList) -> Self {
        Self {
            tools: HashMap::new(),
            allowlist,
        }
    }

    /// Register a tool. Empty and duplicate names are rejected.
    pub fn register(&mut self, tool: Box<dyn Tool>) -> Result<(), RegistryError> {
        let name = normalize_name(tool.name());
        if name.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if self.tools.contains_key(&name) {
            return Err(RegistryError::Duplicate(name));
        }
        self.tools.insert(name, tool);
        Ok(())
    }

    /// Get a tool by name, regardless of the allow-list.
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(&normalize_name(name)).map(|t| t.as_ref())
    }

    /// Whether any tool may be called at all.
    pub fn is_configured(&self) -> bool {
        self.allowlist.is_configured()
    }

    pub fn allowlist(&self) -> &AllowList {
        &self.allowlist
    }

    /// All registered tool names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Registered and allow-listed names, sorted and deduplicated.
    pub fn list_allowed(&self) -> Vec<String> {
        self.allowlist.filter(self.tools.keys().map(|s| s.as_str()))
    }

    /// Execute a tool by name after the allow-list check.
    pub async fn execute(&self, name: &str, request: &ToolRequest) -> Result<String, ToolError> {
        let key = normalize_name(name);
        let tool = self
            .tools
            .get(&key)
            .ok_or_else(|| ToolError::NotFound(name.trim().to_string()))?;

        if !self.allowlist.allows(&key) {
            debug!(tool = %key, configured = self.is_configured(), "Tool call denied by allowlist");
            return Err(ToolError::NotAllowed(key));
        }

        debug!(tool = %key, agent = %request.task.agent(), "Dispatching tool");
        tool.execute(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A simple test tool for unit tests.
    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }
        fn description(&self) -> &str {
            "Echoes back the input"
        }
        async fn execute(&self, request: &ToolRequest) -> Result<String, ToolError> {
            Ok(request.args.trim().to_string())
        }
    }

    struct NamedTool(&'static str);

    #[async_trait]
    impl Tool for NamedTool {
        fn name(&self) -> &str {
            self.0
        }
        fn description(&self) -> &str {
            "test"
        }
        async fn execute(&self, _request: &ToolRequest) -> Result<String, ToolError> {
            Ok(self.0.to_string())
        }
    }

    fn echo_registry(allowed: &[&str]) -> ToolRegistry {
        let mut registry = ToolRegistry::new(AllowList::new(allowed.iter().copied()));
        registry.register(Box::new(EchoTool)).unwrap();
        registry
    }

    #[test]
    fn registry_register_and_lookup() {
        let registry = echo_registry(&["echo"]);
        assert!(registry.get("echo").is_some());
        assert!(registry.get("nonexistent").is_none());
    }

    #[test]
    fn duplicate_registration_rejected() {
        let mut registry = echo_registry(&["echo"]);
        let err = registry.register(Box::new(EchoTool)).unwrap_err();
        assert_eq!(err, RegistryError::Duplicate("echo".into()));
    }

    #[test]
    fn empty_name_rejected() {
        let mut registry = ToolRegistry::new(AllowList::deny_all());
        let err = registry.register(Box::new(NamedTool("  "))).unwrap_err();
        assert_eq!(err, RegistryError::EmptyName);
    }

    #[tokio::test]
    async fn registry_execute_tool() {
        let registry = echo_registry(&["echo"]);
        let request = ToolRequest::new("hello world", Task::new("echo hello world"));
        let result = registry.execute("echo", &request).await.unwrap();
        assert_eq!(result, "hello world");
    }

    #[tokio::test]
    async fn registry_execute_missing_tool() {
        let registry = echo_registry(&["echo"]);
        let request = ToolRequest::new("", Task::default());
        let err = registry.execute("missing", &request).await.unwrap_err();
        assert!(matches!(err, ToolError::NotFound(_)));
        let text = err.to_string();
        assert!(text.contains("unknown"));
        assert!(text.contains("tools.list"));
    }

    #[tokio::test]
    async fn empty_allowlist_denies_registered_tool() {
        let registry = echo_registry(&[]);
        assert!(!registry.is_configured());
        let request = ToolRequest::new("hi", Task::default());
        let err = registry.execute("echo", &request).await.unwrap_err();
        assert!(matches!(err, ToolError::NotAllowed(_)));
        assert!(err.to_string().contains("tools.list"));
    }

    #[tokio::test]
    async fn registered_but_not_listed_is_denied() {
        let mut registry = echo_registry(&["echo"]);
        registry.register(Box::new(NamedTool("version"))).unwrap();
        let request = ToolRequest::new("", Task::default());
        assert!(matches!(
            registry.execute("version", &request).await,
            Err(ToolError::NotAllowed(_))
        ));
    }

    #[test]
    fn list_allowed_is_intersection() {
        let mut registry = echo_registry(&["version", "echo", "ECHO", "file.read"]);
        registry.register(Box::new(NamedTool("version"))).unwrap();
        registry.register(Box::new(NamedTool("tools.list"))).unwrap();
        assert_eq!(registry.list_allowed(), vec!["echo", "version"]);
        assert_eq!(registry.names(), vec!["echo", "tools.list", "version"]);
    }

    #[test]
    fn list_allowed_empty_without_allowlist() {
        let registry = echo_registry(&[]);
        assert!(registry.list_allowed().is_empty());
    }
}
