//! File read tool — read file contents inside the sandbox.

use async_trait::async_trait;
use sandclaw_core::{Tool, ToolError, ToolRequest};
use sandclaw_security::Sandbox;

use crate::common::{MAX_FILE_BYTES, read_text, require_path, resolve};

const NAME: &str = "file.read";

pub struct FileReadTool {
    sandbox: Sandbox,
}

impl FileReadTool {
    pub fn new(sandbox: Sandbox) -> Self {
        Self { sandbox }
    }
}

#[async_trait]
impl Tool for FileReadTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Read a UTF-8 text file (up to 256 KB). Argument: path."
    }

    async fn execute(&self, request: &ToolRequest) -> Result<String, ToolError> {
        let path = resolve(NAME, &self.sandbox, require_path(&request.args)?)?;
        read_text(NAME, &path, MAX_FILE_BYTES).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sandclaw_core::Task;

    fn request(args: &str) -> ToolRequest {
        ToolRequest::new(args, Task::new("t"))
    }

    #[tokio::test]
    async fn read_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("test.txt"), "Hello, world!\n").unwrap();

        let tool = FileReadTool::new(Sandbox::new([dir.path()]));
        let out = tool.execute(&request("test.txt")).await.unwrap();
        assert_eq!(out, "Hello, world!\n");
    }

    #[tokio::test]
    async fn read_nonexistent_file() {
        let dir = tempfile::tempdir().unwrap();
        let tool = FileReadTool::new(Sandbox::new([dir.path()]));
        let err = tool.execute(&request("missing.txt")).await.unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[tokio::test]
    async fn directory_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let tool = FileReadTool::new(Sandbox::new([dir.path()]));
        assert!(tool.execute(&request("sub")).await.is_err());
    }

    #[tokio::test]
    async fn oversized_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("big"), vec![b'a'; MAX_FILE_BYTES as usize + 1]).unwrap();
        let tool = FileReadTool::new(Sandbox::new([dir.path()]));
        let err = tool.execute(&request("big")).await.unwrap_err();
        assert!(err.to_string().contains("exceeds"));
    }

    #[tokio::test]
    async fn missing_path_argument() {
        let dir = tempfile::tempdir().unwrap();
        let tool = FileReadTool::new(Sandbox::new([dir.path()]));
        let result = tool.execute(&request("  ")).await;
        assert!(matches!(result, Err(ToolError::InvalidArguments(_))));
    }

    #[tokio::test]
    async fn path_traversal_blocked() {
        let dir = tempfile::tempdir().unwrap();
        let tool = FileReadTool::new(Sandbox::new([dir.path()]));
        let result = tool.execute(&request("../../../etc/passwd")).await;
        assert!(matches!(result, Err(ToolError::SandboxViolation(_))));
    }

    #[tokio::test]
    async fn unconfigured_sandbox_fails_closed() {
        let tool = FileReadTool::new(Sandbox::unconfigured());
        let err = tool.execute(&request("/etc/hostname")).await.unwrap_err();
        assert_eq!(err.to_string(), "sandbox not configured");
    }
}
