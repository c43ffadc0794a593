//! Helpers shared by the filesystem tools.

use std::path::{Path, PathBuf};

use sandclaw_core::ToolError;
use sandclaw_security::Sandbox;
use tracing::warn;

/// Largest file `file.read`, `file.write` and `file.edit` will handle.
pub const MAX_FILE_BYTES: u64 = 256 * 1024;

/// Resolve `raw` inside the sandbox, logging the offending path on failure.
pub fn resolve(tool: &str, sandbox: &Sandbox, raw: &str) -> Result<PathBuf, ToolError> {
    sandbox.validate(raw.trim()).map_err(|e| {
        warn!(tool, path = %raw.trim(), error = %e, "Path rejected by sandbox");
        ToolError::SandboxViolation(e.to_string())
    })
}

/// Like [`resolve`], but the target must be an existing directory.
pub fn resolve_dir(tool: &str, sandbox: &Sandbox, raw: &str) -> Result<PathBuf, ToolError> {
    let result = if raw.trim().is_empty() {
        sandbox.first_root()
    } else {
        sandbox.validate_dir(raw.trim())
    };
    result.map_err(|e| {
        warn!(tool, path = %raw.trim(), error = %e, "Directory rejected by sandbox");
        ToolError::SandboxViolation(e.to_string())
    })
}

/// Split `path\npayload`. The path line is trimmed; the payload is kept as is.
pub fn split_path_line<'a>(tool: &str, args: &'a str) -> Result<(&'a str, &'a str), ToolError> {
    let (path, rest) = args.split_once('\n').ok_or_else(|| {
        ToolError::InvalidArguments(format!("{tool} expects `path` then a newline then the payload"))
    })?;
    let path = path.trim();
    if path.is_empty() {
        return Err(ToolError::InvalidArguments("Missing 'path' argument".into()));
    }
    Ok((path, rest))
}

/// Require a non-blank single path argument.
pub fn require_path<'a>(args: &'a str) -> Result<&'a str, ToolError> {
    let path = args.trim();
    if path.is_empty() {
        return Err(ToolError::InvalidArguments("Missing 'path' argument".into()));
    }
    Ok(path)
}

/// Fail if `path` is larger than `max` bytes or is not a regular file.
pub async fn check_regular_file(tool: &str, path: &Path, max: u64) -> Result<(), ToolError> {
    let meta = tokio::fs::metadata(path).await.map_err(|e| {
        warn!(tool, path = %path.display(), error = %e, "Stat failed");
        ToolError::failed(tool, "file not found")
    })?;
    if meta.is_dir() {
        return Err(ToolError::failed(tool, "path is a directory"));
    }
    if meta.len() > max {
        return Err(ToolError::failed(tool, format!("file exceeds {max} bytes")));
    }
    Ok(())
}

/// Read a UTF-8 file after the size and type checks.
pub async fn read_text(tool: &str, path: &Path, max: u64) -> Result<String, ToolError> {
    check_regular_file(tool, path, max).await?;
    tokio::fs::read_to_string(path).await.map_err(|e| {
        warn!(tool, path = %path.display(), error = %e, "Read failed");
        ToolError::failed(tool, "failed to read file")
    })
}

/// Replace `path` with `content` via a sibling temp file and a rename.
///
/// Parent directories are created first. The temp file is removed if the
/// rename fails, so a crash never leaves a half-written target.
pub async fn write_atomic(tool: &str, path: &Path, content: &[u8]) -> Result<(), ToolError> {
    let parent = path
        .parent()
        .ok_or_else(|| ToolError::failed(tool, "path has no parent directory"))?;
    let name = path
        .file_name()
        .ok_or_else(|| ToolError::failed(tool, "path has no file name"))?
        .to_string_lossy();

    tokio::fs::create_dir_all(parent).await.map_err(|e| {
        warn!(tool, dir = %parent.display(), error = %e, "Create dir failed");
        ToolError::failed(tool, "failed to create directory")
    })?;

    let tmp = parent.join(format!(".{name}.tmp-{}", uuid::Uuid::new_v4()));
    if let Err(e) = tokio::fs::write(&tmp, content).await {
        warn!(tool, path = %tmp.display(), error = %e, "Temp write failed");
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(ToolError::failed(tool, "failed to write file"));
    }
    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        warn!(tool, path = %path.display(), error = %e, "Rename failed");
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(ToolError::failed(tool, "failed to write file"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_keeps_payload_newlines() {
        let (path, rest) = split_path_line("file.write", " a.txt \nline1\nline2\n").unwrap();
        assert_eq!(path, "a.txt");
        assert_eq!(rest, "line1\nline2\n");
    }

    #[test]
    fn split_requires_newline_and_path() {
        assert!(split_path_line("file.write", "a.txt").is_err());
        assert!(split_path_line("file.write", "  \ncontent").is_err());
    }

    #[tokio::test]
    async fn atomic_write_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested").join("out.txt");
        write_atomic("file.write", &target, b"data").await.unwrap();
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "data");

        let names: Vec<_> = std::fs::read_dir(target.parent().unwrap())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names.len(), 1);
    }

    #[tokio::test]
    async fn directories_are_not_regular_files() {
        let dir = tempfile::tempdir().unwrap();
        let err = check_regular_file("file.read", dir.path(), MAX_FILE_BYTES)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("directory"));
    }
}
