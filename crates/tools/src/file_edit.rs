//! File edit tool — replace the first occurrence of a snippet.
//!
//! Arguments: `path`, newline, then a JSON object
//! `{"oldText": "...", "newText": "..."}`. The file is left untouched
//! when `oldText` does not occur.

use async_trait::async_trait;
use sandclaw_core::{Tool, ToolError, ToolRequest};
use sandclaw_security::Sandbox;
use serde::Deserialize;

use crate::common::{MAX_FILE_BYTES, read_text, resolve, split_path_line, write_atomic};

const NAME: &str = "file.edit";

#[derive(Debug, Deserialize)]
struct EditArgs {
    #[serde(rename = "oldText")]
    old_text: String,
    #[serde(rename = "newText", default)]
    new_text: String,
}

pub struct FileEditTool {
    sandbox: Sandbox,
}

impl FileEditTool {
    pub fn new(sandbox: Sandbox) -> Self {
        Self { sandbox }
    }
}

#[async_trait]
impl Tool for FileEditTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Replace the first occurrence of oldText with newText. Arguments: path, newline, JSON."
    }

    async fn execute(&self, request: &ToolRequest) -> Result<String, ToolError> {
        let (raw_path, payload) = split_path_line(NAME, &request.args)?;
        let edit: EditArgs = serde_json::from_str(payload.trim())
            .map_err(|e| ToolError::InvalidArguments(format!("expected {{\"oldText\",\"newText\"}}: {e}")))?;
        if edit.old_text.is_empty() {
            return Err(ToolError::InvalidArguments("oldText must not be empty".into()));
        }

        let path = resolve(NAME, &self.sandbox, raw_path)?;
        let content = read_text(NAME, &path, MAX_FILE_BYTES).await?;
        if !content.contains(&edit.old_text) {
            return Err(ToolError::failed(NAME, "oldText not found"));
        }

        let updated = content.replacen(&edit.old_text, &edit.new_text, 1);
        if updated.len() as u64 > MAX_FILE_BYTES {
            return Err(ToolError::failed(NAME, format!("result exceeds {MAX_FILE_BYTES} bytes")));
        }
        write_atomic(NAME, &path, updated.as_bytes()).await?;
        Ok("ok".into())
    }
}
