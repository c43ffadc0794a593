//! Version tool — reports the running build.

use async_trait::async_trait;
use sandclaw_core::{Tool, ToolError, ToolRequest};

/// `sandclaw <crate version>`.
pub fn version_string() -> String {
    format!("sandclaw {}", env!("CARGO_PKG_VERSION"))
}

pub struct VersionTool;

#[async_trait]
impl Tool for VersionTool {
    fn name(&self) -> &str {
        "version"
    }

    fn description(&self) -> &str {
        "Report the SandClaw version. Arguments are ignored."
    }

    async fn execute(&self, _request: &ToolRequest) -> Result<String, ToolError> {
        Ok(version_string())
    }
}
