//! Existence and metadata probes.

use async_trait::async_trait;
use sandclaw_core::{Tool, ToolError, ToolRequest};
use sandclaw_security::Sandbox;

use crate::common::{require_path, resolve};

/// `true` / `false` for a sandboxed path.
pub struct FileExistsTool {
    sandbox: Sandbox,
}

impl FileExistsTool {
    pub fn new(sandbox: Sandbox) -> Self {
        Self { sandbox }
    }
}

#[async_trait]
impl Tool for FileExistsTool {
    fn name(&self) -> &str {
        "file.exists"
    }

    fn description(&self) -> &str {
        "Report whether a path exists: true or false."
    }

    async fn execute(&self, request: &ToolRequest) -> Result<String, ToolError> {
        let path = resolve(self.name(), &self.sandbox, require_path(&request.args)?)?;
        let exists = tokio::fs::try_exists(&path).await.unwrap_or(false);
        Ok(exists.to_string())
    }
}

/// JSON `{"exists","isDir","size"}` for a sandboxed path.
pub struct FileStatTool {
    sandbox: Sandbox,
}

impl FileStatTool {
    pub fn new(sandbox: Sandbox) -> Self {
        Self { sandbox }
    }
}

#[async_trait]
impl Tool for FileStatTool {
    fn name(&self) -> &str {
        "file.stat"
    }

    fn description(&self) -> &str {
        "Describe a path as JSON: exists, isDir, size."
    }

    async fn execute(&self, request: &ToolRequest) -> Result<String, ToolError> {
        let path = resolve(self.name(), &self.sandbox, require_path(&request.args)?)?;
        let stat = match tokio::fs::metadata(&path).await {
            Ok(meta) => serde_json::json!({
                "exists": true,
                "isDir": meta.is_dir(),
                "size": meta.len(),
            }),
            Err(_) => serde_json::json!({ "exists": false, "isDir": false, "size": 0 }),
        };
        Ok(stat.to_string())
    }
}
