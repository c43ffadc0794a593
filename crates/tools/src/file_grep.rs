//! Recursive regex search inside the sandbox.
//!
//! Arguments: `pattern path`. The pattern is the first whitespace-separated
//! token; the rest is the file or directory to search (blank means the
//! first sandbox root). Output lines are `relpath:line: text`.
//!
//! Limits:
//! - 50 matches, then a marker
//! - 200 files scanned
//! - files over 512 KB, non-UTF-8 files and symlinks are skipped
//! - each matched line is clipped to 200 bytes

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use regex_lite::Regex;
use sandclaw_core::text::clip_bytes;
use sandclaw_core::{Tool, ToolError, ToolRequest};
use sandclaw_security::Sandbox;
use tracing::{debug, warn};

use crate::common::{resolve, resolve_dir};

const NAME: &str = "file.grep";

const MAX_MATCHES: usize = 50;
const MAX_FILES: usize = 200;
const MAX_GREP_FILE_BYTES: u64 = 512 * 1024;
const MAX_LINE_BYTES: usize = 200;

pub struct FileGrepTool {
    sandbox: Sandbox,
}

impl FileGrepTool {
    pub fn new(sandbox: Sandbox) -> Self {
        Self { sandbox }
    }
}

#[async_trait]
impl Tool for FileGrepTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Search files for a regex. Arguments: pattern, space, path (blank = first sandbox root)."
    }

    async fn execute(&self, request: &ToolRequest) -> Result<String, ToolError> {
        let args = request.args.trim();
        let (pattern, raw_path) = match args.split_once(char::is_whitespace) {
            Some((pattern, rest)) => (pattern, rest.trim()),
            None => (args, ""),
        };
        if pattern.is_empty() {
            return Err(ToolError::InvalidArguments("Missing 'pattern' argument".into()));
        }
        let regex = Regex::new(pattern)
            .map_err(|e| ToolError::InvalidArguments(format!("invalid pattern: {e}")))?;

        let target = if raw_path.is_empty() {
            resolve_dir(NAME, &self.sandbox, "")?
        } else {
            resolve(NAME, &self.sandbox, raw_path)?
        };

        let handle = tokio::task::spawn_blocking(move || search(&regex, &target));
        let matches = handle.await.map_err(|e| {
            warn!(error = %e, "Search task failed");
            ToolError::failed(NAME, "search failed")
        })??;

        if matches.lines.is_empty() {
            return Ok("no matches".into());
        }
        let mut out = matches.lines.join("\n");
        if matches.truncated {
            out.push_str(&format!("\n…(stopped after {MAX_MATCHES} matches)"));
        }
        Ok(out)
    }
}

#[derive(Debug, Default)]
struct Matches {
    lines: Vec<String>,
    truncated: bool,
}

fn search(regex: &Regex, target: &Path) -> Result<Matches, ToolError> {
    let meta = std::fs::symlink_metadata(target)
        .map_err(|_| ToolError::failed(NAME, "path not found"))?;

    let (base, files) = if meta.is_dir() {
        (target.to_path_buf(), collect_files(target))
    } else {
        let base = target.parent().map(Path::to_path_buf).unwrap_or_default();
        (base, vec![target.to_path_buf()])
    };

    let mut matches = Matches::default();
    for file in files {
        let Ok(meta) = std::fs::metadata(&file) else { continue };
        if meta.len() > MAX_GREP_FILE_BYTES {
            debug!(file = %file.display(), "Skipping large file");
            continue;
        }
        let Ok(content) = std::fs::read_to_string(&file) else { continue };
        let rel = file.strip_prefix(&base).unwrap_or(&file).display().to_string();

        for (idx, line) in content.lines().enumerate() {
            if !regex.is_match(line) {
                continue;
            }
            if matches.lines.len() == MAX_MATCHES {
                matches.truncated = true;
                return Ok(matches);
            }
            let (text, _) = clip_bytes(line.trim_end(), MAX_LINE_BYTES);
            matches.lines.push(format!("{rel}:{}: {text}", idx + 1));
        }
    }
    Ok(matches)
}

/// Regular files under `root` in sorted walk order, at most [`MAX_FILES`].
fn collect_files(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let mut stack = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        let Ok(reader) = std::fs::read_dir(&dir) else { continue };
        let mut entries: Vec<PathBuf> = reader.filter_map(|e| e.ok().map(|e| e.path())).collect();
        entries.sort();

        let mut subdirs = Vec::new();
        for path in entries {
            let Ok(meta) = std::fs::symlink_metadata(&path) else { continue };
            if meta.file_type().is_symlink() {
                continue;
            }
            if meta.is_dir() {
                subdirs.push(path);
            } else if meta.is_file() {
                files.push(path);
                if files.len() == MAX_FILES {
                    return files;
                }
            }
        }
        // Reverse so the stack pops subdirectories in sorted order.
        stack.extend(subdirs.into_iter().rev());
    }
    files
}
