//! SHA-256 of a sandboxed file.

use async_trait::async_trait;
use sandclaw_core::{Tool, ToolError, ToolRequest};
use sandclaw_security::Sandbox;
use sha2::{Digest, Sha256};
use tracing::warn;

use crate::common::{check_regular_file, require_path, resolve};

const NAME: &str = "file.hash";
const MAX_HASH_BYTES: u64 = 512 * 1024;

pub struct FileHashTool {
    sandbox: Sandbox,
}

impl FileHashTool {
    pub fn new(sandbox: Sandbox) -> Self {
        Self { sandbox }
    }
}

#[async_trait]
impl Tool for FileHashTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Lowercase hex SHA-256 of a file (up to 512 KB). Argument: path."
    }

    async fn execute(&self, request: &ToolRequest) -> Result<String, ToolError> {
        let path = resolve(NAME, &self.sandbox, require_path(&request.args)?)?;
        check_regular_file(NAME, &path, MAX_HASH_BYTES).await?;
        let bytes = tokio::fs::read(&path).await.map_err(|e| {
            warn!(path = %path.display(), error = %e, "Read failed");
            ToolError::failed(NAME, "failed to read file")
        })?;
        Ok(hex::encode(Sha256::digest(&bytes)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sandclaw_core::Task;

    #[tokio::test]
    async fn known_digest() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("abc"), "abc").unwrap();
        let tool = FileHashTool::new(Sandbox::new([dir.path()]));
        let out = tool
            .execute(&ToolRequest::new("abc", Task::new("t")))
            .await
            .unwrap();
        assert_eq!(
            out,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[tokio::test]
    async fn oversized_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("big"), vec![0u8; MAX_HASH_BYTES as usize + 1]).unwrap();
        let tool = FileHashTool::new(Sandbox::new([dir.path()]));
        let result = tool.execute(&ToolRequest::new("big", Task::new("t"))).await;
        assert!(result.is_err());
    }
}
