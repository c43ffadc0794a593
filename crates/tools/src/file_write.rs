//! File write tool — create or replace files inside the sandbox.
//!
//! Arguments are `path`, a newline, then the content. Everything after the
//! first newline is written verbatim, including further newlines.

use async_trait::async_trait;
use sandclaw_core::{Tool, ToolError, ToolRequest};
use sandclaw_security::Sandbox;
use tracing::debug;

use crate::common::{MAX_FILE_BYTES, resolve, split_path_line, write_atomic};

const NAME: &str = "file.write";

pub struct FileWriteTool {
    sandbox: Sandbox,
}

impl FileWriteTool {
    pub fn new(sandbox: Sandbox) -> Self {
        Self { sandbox }
    }
}

#[async_trait]
impl Tool for FileWriteTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Write a file atomically, creating parent directories. Arguments: path, newline, content."
    }

    async fn execute(&self, request: &ToolRequest) -> Result<String, ToolError> {
        let (raw_path, content) = split_path_line(NAME, &request.args)?;
        if content.len() as u64 > MAX_FILE_BYTES {
            return Err(ToolError::InvalidArguments(format!(
                "content exceeds {MAX_FILE_BYTES} bytes"
            )));
        }

        let path = resolve(NAME, &self.sandbox, raw_path)?;
        if tokio::fs::metadata(&path).await.is_ok_and(|m| m.is_dir()) {
            return Err(ToolError::failed(NAME, "path is a directory"));
        }

        write_atomic(NAME, &path, content.as_bytes()).await?;
        debug!(bytes = content.len(), path = %path.display(), "File written");
        Ok("ok".into())
    }
}
