//! Echo tool — returns its arguments, trimmed.

use async_trait::async_trait;
use sandclaw_core::{Tool, ToolError, ToolRequest};

pub struct EchoTool;

#[async_trait]
impl Tool for EchoTool {
    fn name(&self) -> &str {
        "echo"
    }

    fn description(&self) -> &str {
        "Return the arguments unchanged (trimmed)."
    }

    async fn execute(&self, request: &ToolRequest) -> Result<String, ToolError> {
        Ok(request.args.trim().to_string())
    }
}
