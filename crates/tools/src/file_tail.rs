//! File tail tool — the last lines of a (possibly large) file.
//!
//! Only the final 64 KB are read, so huge logs are cheap to inspect.

use std::io::SeekFrom;

use async_trait::async_trait;
use sandclaw_core::{Tool, ToolError, ToolRequest};
use sandclaw_security::Sandbox;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tracing::warn;

use crate::common::resolve;

const NAME: &str = "file.tail";

pub const DEFAULT_TAIL_LINES: usize = 20;
pub const MAX_TAIL_LINES: usize = 200;
const TAIL_WINDOW_BYTES: u64 = 64 * 1024;

pub struct FileTailTool {
    sandbox: Sandbox,
}

impl FileTailTool {
    pub fn new(sandbox: Sandbox) -> Self {
        Self { sandbox }
    }
}

/// Parse `path\n[lineCount]`; the count line is optional.
fn parse_args(args: &str) -> Result<(&str, usize), ToolError> {
    let (path, count) = match args.split_once('\n') {
        Some((path, count)) => (path.trim(), count.trim()),
        None => (args.trim(), ""),
    };
    if path.is_empty() {
        return Err(ToolError::InvalidArguments("Missing 'path' argument".into()));
    }
    let lines = if count.is_empty() {
        DEFAULT_TAIL_LINES
    } else {
        count
            .parse::<usize>()
            .map_err(|_| ToolError::InvalidArguments(format!("lineCount must be a positive integer, got '{count}'")))?
    };
    if lines == 0 {
        return Err(ToolError::InvalidArguments("lineCount must be at least 1".into()));
    }
    Ok((path, lines.min(MAX_TAIL_LINES)))
}

#[async_trait]
impl Tool for FileTailTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Show the last lines of a file. Arguments: path, optional newline and line count (default 20, max 200)."
    }

    async fn execute(&self, request: &ToolRequest) -> Result<String, ToolError> {
        let (raw_path, count) = parse_args(&request.args)?;
        let path = resolve(NAME, &self.sandbox, raw_path)?;

        let io_err = |e: std::io::Error| {
            warn!(path = %path.display(), error = %e, "Tail failed");
            ToolError::failed(NAME, "failed to read file")
        };
        let mut file = tokio::fs::File::open(&path).await.map_err(io_err)?;
        let meta = file.metadata().await.map_err(io_err)?;
        if meta.is_dir() {
            return Err(ToolError::failed(NAME, "path is a directory"));
        }

        // One byte before the window tells whether its first line is whole.
        let start = meta.len().saturating_sub(TAIL_WINDOW_BYTES);
        let lead = start.min(1);
        file.seek(SeekFrom::Start(start - lead)).await.map_err(io_err)?;
        let mut buf = Vec::new();
        file.take(TAIL_WINDOW_BYTES + lead)
            .read_to_end(&mut buf)
            .await
            .map_err(io_err)?;

        let body = if lead == 0 {
            &buf[..]
        } else {
            match buf.iter().position(|&b| b == b'\n') {
                Some(i) => &buf[i + 1..],
                None => &[][..],
            }
        };
        let text = String::from_utf8_lossy(body);
        let lines: Vec<&str> = text.lines().collect();
        let keep = lines.len().saturating_sub(count);
        Ok(lines[keep..].join("\n"))
    }
}
