//! Context assembler — well-known files, then recent daily notes.
//!
//! # Determinism
//!
//! For a fixed directory state the output is identical across runs:
//! well-known files come in a fixed order and daily notes are ordered by
//! modification time, then path, both descending.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use sandclaw_config::ContextConfig;
use sandclaw_core::text::clip_bytes;
use sandclaw_core::{TRUNCATION_SUFFIX, truncate_reply};
use sandclaw_security::{PathValidationError, Sandbox};
use tracing::{debug, warn};

// ── Types ─────────────────────────────────────────────────────────────────

/// Top-level memory files, highest priority first.
pub const WELL_KNOWN_FILES: [&str; 6] = [
    "AGENTS.md",
    "SOUL.md",
    "IDENTITY.md",
    "USER.md",
    "TOOLS.md",
    "MEMORY.md",
];

/// Directory holding dated notes.
const DAILY_DIR: &str = "memory";

/// Byte and count caps for one assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextLimits {
    pub per_file_max_bytes: usize,
    pub total_max_bytes: usize,
    pub daily_limit: usize,
}

impl Default for ContextLimits {
    fn default() -> Self {
        Self::from(&ContextConfig::default())
    }
}

impl From<&ContextConfig> for ContextLimits {
    fn from(config: &ContextConfig) -> Self {
        Self {
            per_file_max_bytes: config.per_file_max_bytes,
            total_max_bytes: config.total_max_bytes,
            daily_limit: config.daily_limit,
        }
    }
}

/// Errors that stop assembly entirely.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssemblyError {
    #[error("memory root rejected: {0}")]
    Sandbox(#[from] PathValidationError),

    #[error("memory root is not a directory")]
    NotADirectory,
}

// ── Assembler ─────────────────────────────────────────────────────────────

/// Reads memory files below a sandbox-validated root.
#[derive(Debug, Clone)]
pub struct ContextAssembler {
    root: PathBuf,
    limits: ContextLimits,
}

impl ContextAssembler {
    /// Validate `root` against the sandbox. Fails closed.
    pub fn new(sandbox: &Sandbox, root: &str, limits: ContextLimits) -> Result<Self, AssemblyError> {
        let root = sandbox.validate_dir(root).map_err(|e| {
            warn!(root, error = %e, "Memory root rejected");
            match e {
                PathValidationError::NotADirectory => AssemblyError::NotADirectory,
                other => AssemblyError::Sandbox(other),
            }
        })?;
        Ok(Self { root, limits })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn limits(&self) -> ContextLimits {
        self.limits
    }

    /// Build the context block. Empty when no memory files exist.
    ///
    /// Each file becomes a `## relpath` heading followed by its content.
    pub fn assemble(&self) -> Result<String, AssemblyError> {
        if !self.root.is_dir() {
            return Err(AssemblyError::NotADirectory);
        }

        let mut sources: Vec<(String, PathBuf)> = WELL_KNOWN_FILES
            .iter()
            .map(|name| (name.to_string(), self.root.join(name)))
            .filter(|(_, path)| is_plain_file(path))
            .collect();
        sources.extend(self.daily_files());

        let total = self.limits.total_max_bytes;
        let mut out = String::new();
        for (rel, path) in sources {
            let Some(content) = self.read_capped(&path) else { continue };
            out.push_str(&format!("## {rel}\n{content}\n\n"));
            if out.trim_end().len() > total {
                debug!(file = %rel, "Context total cap reached");
                break;
            }
        }

        Ok(truncate_reply(&out, total))
    }

    /// Newest `daily_limit` markdown files under `memory/`, symlinks skipped.
    fn daily_files(&self) -> Vec<(String, PathBuf)> {
        if self.limits.daily_limit == 0 {
            return Vec::new();
        }
        let dir = self.root.join(DAILY_DIR);
        let is_real_dir = std::fs::symlink_metadata(&dir)
            .is_ok_and(|m| m.is_dir() && !m.file_type().is_symlink());
        if !is_real_dir {
            return Vec::new();
        }
        let Ok(reader) = std::fs::read_dir(&dir) else {
            return Vec::new();
        };

        let mut notes: Vec<(SystemTime, PathBuf)> = reader
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "md"))
            .filter_map(|path| {
                let meta = std::fs::symlink_metadata(&path).ok()?;
                if !meta.file_type().is_file() {
                    return None;
                }
                let modified = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);
                Some((modified, path))
            })
            .collect();

        notes.sort_by(|a, b| b.cmp(a));
        notes
            .into_iter()
            .take(self.limits.daily_limit)
            .filter_map(|(_, path)| {
                let name = path.file_name()?.to_string_lossy().into_owned();
                Some((format!("{DAILY_DIR}/{name}"), path))
            })
            .collect()
    }

    /// Read at most `per_file_max_bytes`, marking cut files.
    fn read_capped(&self, path: &Path) -> Option<String> {
        let cap = self.limits.per_file_max_bytes;
        let file = File::open(path).ok()?;
        let mut bytes = Vec::new();
        if let Err(e) = file.take(cap as u64 + 1).read_to_end(&mut bytes) {
            warn!(path = %path.display(), error = %e, "Skipping unreadable memory file");
            return None;
        }

        let text = String::from_utf8_lossy(&bytes);
        let (kept, cut) = clip_bytes(&text, cap);
        let mut content = kept.trim_end().to_string();
        if cut {
            content.push('\n');
            content.push_str(TRUNCATION_SUFFIX);
        }
        Some(content)
    }
}

/// A regular file that is not a symlink.
fn is_plain_file(path: &Path) -> bool {
    std::fs::symlink_metadata(path).is_ok_and(|m| m.file_type().is_file())
}
