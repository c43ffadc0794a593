//! Capability listing — what the current deployment may call.

use async_trait::async_trait;
use sandclaw_core::{TOOLS_LIST, Tool, ToolError, ToolRequest};

/// Reply when the allow-list enables nothing.
pub const NO_CAPABILITIES: &str = "no capabilities enabled";

/// Lists allowed tool names, one per line.
///
/// The registry is immutable after startup, so the list is computed once
/// by [`crate::build_registry`] and handed in.
pub struct ToolsListTool {
    names: Vec<String>,
}

impl ToolsListTool {
    pub fn new(mut names: Vec<String>) -> Self {
        names.sort();
        names.dedup();
        Self { names }
    }
}

#[async_trait]
impl Tool for ToolsListTool {
    fn name(&self) -> &str {
        TOOLS_LIST
    }

    fn description(&self) -> &str {
        "List the tools this agent is allowed to call."
    }

    async fn execute(&self, _request: &ToolRequest) -> Result<String, ToolError> {
        if self.names.is_empty() {
            return Ok(NO_CAPABILITIES.to_string());
        }
        Ok(self.names.join("\n"))
    }
}
