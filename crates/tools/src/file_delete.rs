//! File delete tool — remove a single file.

use async_trait::async_trait;
use sandclaw_core::{Tool, ToolError, ToolRequest};
use sandclaw_security::Sandbox;
use tracing::warn;

use crate::common::{require_path, resolve};

const NAME: &str = "file.delete";

pub struct FileDeleteTool {
    sandbox: Sandbox,
}

impl FileDeleteTool {
    pub fn new(sandbox: Sandbox) -> Self {
        Self { sandbox }
    }
}

#[async_trait]
impl Tool for FileDeleteTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Delete a file. Directories are refused. Argument: path."
    }

    async fn execute(&self, request: &ToolRequest) -> Result<String, ToolError> {
        let path = resolve(NAME, &self.sandbox, require_path(&request.args)?)?;
        let meta = tokio::fs::metadata(&path)
            .await
            .map_err(|_| ToolError::failed(NAME, "file not found"))?;
        if meta.is_dir() {
            return Err(ToolError::failed(NAME, "path is a directory"));
        }
        tokio::fs::remove_file(&path).await.map_err(|e| {
            warn!(path = %path.display(), error = %e, "Delete failed");
            ToolError::failed(NAME, "failed to delete file")
        })?;
        Ok("ok".into())
    }
}
