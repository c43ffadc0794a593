//! Directory listing tool.

use async_trait::async_trait;
use sandclaw_core::{Tool, ToolError, ToolRequest};
use sandclaw_security::Sandbox;
use tracing::warn;

use crate::common::resolve_dir;

const NAME: &str = "file.list";

/// Entries shown before the listing is cut short.
pub const MAX_LIST_ENTRIES: usize = 200;

pub struct FileListTool {
    sandbox: Sandbox,
}

impl FileListTool {
    pub fn new(sandbox: Sandbox) -> Self {
        Self { sandbox }
    }
}

#[async_trait]
impl Tool for FileListTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "List a directory, sorted, directories suffixed with '/'. Blank path lists the first sandbox root."
    }

    async fn execute(&self, request: &ToolRequest) -> Result<String, ToolError> {
        let dir = resolve_dir(NAME, &self.sandbox, &request.args)?;
        let mut reader = tokio::fs::read_dir(&dir).await.map_err(|e| {
            warn!(dir = %dir.display(), error = %e, "read_dir failed");
            ToolError::failed(NAME, "failed to list directory")
        })?;

        let mut entries = Vec::new();
        loop {
            match reader.next_entry().await {
                Ok(Some(entry)) => {
                    let mut name = entry.file_name().to_string_lossy().into_owned();
                    if entry.file_type().await.is_ok_and(|t| t.is_dir()) {
                        name.push('/');
                    }
                    entries.push(name);
                }
                Ok(None) => break,
                Err(e) => {
                    warn!(dir = %dir.display(), error = %e, "Directory entry unreadable");
                    return Err(ToolError::failed(NAME, "failed to list directory"));
                }
            }
        }

        if entries.is_empty() {
            return Ok("(empty)".into());
        }
        entries.sort();

        let total = entries.len();
        let mut out = entries
            .into_iter()
            .take(MAX_LIST_ENTRIES)
            .collect::<Vec<_>>()
            .join("\n");
        if total > MAX_LIST_ENTRIES {
            out.push_str(&format!("\n…({} more entries)", total - MAX_LIST_ENTRIES));
        }
        Ok(out)
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
    async fn lists_sorted_with_dir_suffix() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.txt"), "").unwrap();
        std::fs::write(dir.path().join("a.txt"), "").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();

        let tool = FileListTool::new(Sandbox::new([dir.path()]));
        let out = tool.execute(&request("")).await.unwrap();
        assert_eq!(out, "a.txt\nb.txt\nsub/");
    }

    #[tokio::test]
    async fn lists_subdirectory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub/inner.md"), "").unwrap();
        let tool = FileListTool::new(Sandbox::new([dir.path()]));
        assert_eq!(tool.execute(&request("sub")).await.unwrap(), "inner.md");
    }

    #[tokio::test]
    async fn caps_entry_count() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..(MAX_LIST_ENTRIES + 5) {
            std::fs::write(dir.path().join(format!("f{i:04}")), "").unwrap();
        }
        let tool = FileListTool::new(Sandbox::new([dir.path()]));
        let out = tool.execute(&request("")).await.unwrap();
        assert_eq!(out.lines().count(), MAX_LIST_ENTRIES + 1);
        assert!(out.ends_with("…(5 more entries)"));
    }

    #[tokio::test]
    async fn file_is_not_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("f"), "").unwrap();
        let tool = FileListTool::new(Sandbox::new([dir.path()]));
        assert!(tool.execute(&request("f")).await.is_err());
    }

    #[tokio::test]
    async fn empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let tool = FileListTool::new(Sandbox::new([dir.path()]));
        assert_eq!(tool.execute(&request("")).await.unwrap(), "(empty)");
    }
}
