//! Subprocess tool — run an allow-listed program inside the sandbox.
//!
//! Arguments are JSON: `{"command": ["prog", "arg"...], "cwd"?: "...", "timeoutMs"?: N}`.
//! No shell is involved; argv goes straight to the OS.
//!
//! Preconditions, checked in order:
//! 1. non-empty argv with a non-blank program
//! 2. a non-empty command allowlist
//! 3. the program's base name is in that allowlist
//! 4. at least one sandbox root
//!
//! Replies never contain OS error text, exit codes or argv; those are logged.

use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use async_trait::async_trait;
use sandclaw_core::{Tool, ToolError, ToolRequest};
use sandclaw_security::{CommandAllowlist, CommandCheck, Sandbox};
use serde::Deserialize;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tracing::{debug, warn};

use crate::common::resolve_dir;

const NAME: &str = "subprocess.exec";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const MAX_TIMEOUT: Duration = Duration::from_secs(60);

/// Appended when stdout or stderr exceeded the capture cap.
pub const OUTPUT_TRUNCATED: &str = "…(output truncated)";

#[derive(Debug, Deserialize)]
struct ExecArgs {
    command: Vec<String>,
    #[serde(default)]
    cwd: Option<String>,
    #[serde(rename = "timeoutMs", default)]
    timeout_ms: Option<u64>,
}

/// Execute programs with allowlist, sandbox and timeout constraints.
pub struct ExecTool {
    commands: CommandAllowlist,
    sandbox: Sandbox,
    /// Per-stream capture cap in bytes
    max_output_bytes: usize,
}

impl ExecTool {
    pub fn new(commands: CommandAllowlist, sandbox: Sandbox, max_output_bytes: usize) -> Self {
        Self {
            commands,
            sandbox,
            max_output_bytes,
        }
    }

    fn check_program(&self, program: &str) -> Result<(), ToolError> {
        match self.commands.check(program) {
            CommandCheck::Allowed => Ok(()),
            CommandCheck::NotConfigured => Err(ToolError::NotConfigured {
                tool_name: NAME.into(),
                reason: "no commands are allowed".into(),
            }),
            CommandCheck::Denied { program } => Err(ToolError::PermissionDenied {
                tool_name: NAME.into(),
                reason: format!("command '{program}' not in allowlist"),
            }),
        }
    }
}

fn effective_timeout(requested_ms: Option<u64>) -> Duration {
    match requested_ms {
        None | Some(0) => DEFAULT_TIMEOUT,
        Some(ms) => Duration::from_millis(ms).min(MAX_TIMEOUT),
    }
}

/// Drain `reader` to EOF, keeping at most `cap` bytes.
///
/// Reading continues past the cap so the child never blocks on a full pipe.
async fn read_capped<R: AsyncRead + Unpin>(mut reader: R, cap: usize) -> (Vec<u8>, bool) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 8 * 1024];
    let mut truncated = false;
    loop {
        match reader.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                let room = cap.saturating_sub(buf.len());
                if n > room {
                    truncated = true;
                }
                buf.extend_from_slice(&chunk[..n.min(room)]);
            }
        }
    }
    (buf, truncated)
}

enum Outcome {
    Finished {
        status: std::io::Result<ExitStatus>,
        stdout: (Vec<u8>, bool),
        stderr: (Vec<u8>, bool),
    },
    TimedOut,
    Cancelled,
}

fn render_output(stdout: &[u8], stderr: &[u8], truncated: bool) -> String {
    let stdout = String::from_utf8_lossy(stdout);
    let stderr = String::from_utf8_lossy(stderr);
    let text = match (stdout.trim(), stderr.trim()) {
        ("", "") => "ok",
        ("", err) => err,
        (out, _) => out,
    };
    if truncated {
        format!("{text}\n{OUTPUT_TRUNCATED}")
    } else {
        text.to_string()
    }
}

#[async_trait]
impl Tool for ExecTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Run an allow-listed program without a shell. Arguments: JSON {\"command\":[...],\"cwd\"?,\"timeoutMs\"?}."
    }

    async fn execute(&self, request: &ToolRequest) -> Result<String, ToolError> {
        let args: ExecArgs = serde_json::from_str(request.args.trim()).map_err(|e| {
            ToolError::InvalidArguments(format!("expected {{\"command\":[...]}}: {e}"))
        })?;

        let Some((program, rest)) = args.command.split_first() else {
            return Err(ToolError::InvalidArguments("command must not be empty".into()));
        };
        if program.trim().is_empty() {
            return Err(ToolError::InvalidArguments("program must not be blank".into()));
        }
        self.check_program(program)?;
        if !self.sandbox.is_configured() {
            return Err(ToolError::NotConfigured {
                tool_name: NAME.into(),
                reason: "sandbox not configured".into(),
            });
        }

        let cwd = resolve_dir(NAME, &self.sandbox, args.cwd.as_deref().unwrap_or(""))?;
        let timeout = effective_timeout(args.timeout_ms);

        debug!(program = %program, cwd = %cwd.display(), timeout_ms = timeout.as_millis() as u64, "Executing command");

        let mut cmd = Command::new(program.trim());
        cmd.args(rest)
            .current_dir(&cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|e| {
            warn!(program = %program, error = %e, "Spawn failed");
            ToolError::failed(NAME, "command failed")
        })?;

        let (Some(stdout), Some(stderr)) = (child.stdout.take(), child.stderr.take()) else {
            let _ = child.start_kill();
            return Err(ToolError::failed(NAME, "command failed"));
        };

        let cap = self.max_output_bytes;
        let outcome = {
            let run = async {
                tokio::join!(read_capped(stdout, cap), read_capped(stderr, cap), child.wait())
            };
            tokio::select! {
                result = tokio::time::timeout(timeout, run) => match result {
                    Ok((stdout, stderr, status)) => Outcome::Finished { status, stdout, stderr },
                    Err(_) => Outcome::TimedOut,
                },
                _ = request.cancel.cancelled() => Outcome::Cancelled,
            }
        };

        match outcome {
            Outcome::Finished { status, stdout, stderr } => {
                let status = status.map_err(|e| {
                    warn!(program = %program, error = %e, "Wait failed");
                    ToolError::failed(NAME, "command failed")
                })?;
                if !status.success() {
                    warn!(program = %program, exit_code = status.code().unwrap_or(-1), "Command failed");
                    return Err(ToolError::failed(NAME, "command failed"));
                }
                Ok(render_output(&stdout.0, &stderr.0, stdout.1 || stderr.1))
            }
            Outcome::TimedOut => {
                warn!(program = %program, timeout_ms = timeout.as_millis() as u64, "Command timed out");
                let _ = child.start_kill();
                let _ = child.wait().await;
                Err(ToolError::Timeout { tool_name: NAME.into() })
            }
            Outcome::Cancelled => {
                debug!(program = %program, "Command cancelled");
                let _ = child.start_kill();
                let _ = child.wait().await;
                Err(ToolError::Cancelled { tool_name: NAME.into() })
            }
        }
    }
}
