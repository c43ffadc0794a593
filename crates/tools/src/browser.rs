//! Browser capture tool.
//!
//! Headless capture is not bundled. The tool still validates its payload
//! so callers get the same argument errors they would from a real backend,
//! then replies with a fixed message naming the requested host.

use async_trait::async_trait;
use sandclaw_core::{Tool, ToolError, ToolRequest};
use serde::Deserialize;

const NAME: &str = "browser.capture";

const DEFAULT_WIDTH: u32 = 1280;
const DEFAULT_HEIGHT: u32 = 720;
const MAX_DIMENSION: u32 = 8192;

#[derive(Debug, Deserialize)]
struct CaptureArgs {
    url: String,
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
}

pub struct BrowserCaptureTool;

/// Host of an `http`/`https` URL, without userinfo or port.
fn url_host(url: &str) -> Result<&str, ToolError> {
    let url = url.trim();
    let (scheme, rest) = url
        .split_once("://")
        .ok_or_else(|| ToolError::InvalidArguments("url must start with http:// or https://".into()))?;
    if !scheme.eq_ignore_ascii_case("http") && !scheme.eq_ignore_ascii_case("https") {
        return Err(ToolError::InvalidArguments("url must start with http:// or https://".into()));
    }

    let authority = rest.split(['/', '?', '#']).next().unwrap_or("");
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, h)| h);
    let host = if let Some(bracketed) = host_port.strip_prefix('[') {
        bracketed.split(']').next().unwrap_or("")
    } else {
        host_port.split(':').next().unwrap_or("")
    };

    if host.is_empty() {
        return Err(ToolError::InvalidArguments("url host must not be empty".into()));
    }
    Ok(host)
}

fn dimension(value: Option<u32>, default: u32, field: &str) -> Result<u32, ToolError> {
    match value {
        None => Ok(default),
        Some(v) if (1..=MAX_DIMENSION).contains(&v) => Ok(v),
        Some(_) => Err(ToolError::InvalidArguments(format!(
            "{field} must be between 1 and {MAX_DIMENSION}"
        ))),
    }
}

#[async_trait]
impl Tool for BrowserCaptureTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Capture a web page (unsupported in this build). Arguments: JSON {\"url\",\"width\"?,\"height\"?}."
    }

    async fn execute(&self, request: &ToolRequest) -> Result<String, ToolError> {
        let args: CaptureArgs = serde_json::from_str(request.args.trim())
            .map_err(|e| ToolError::InvalidArguments(format!("expected {{\"url\":...}}: {e}")))?;
        let host = url_host(&args.url)?;
        let width = dimension(args.width, DEFAULT_WIDTH, "width")?;
        let height = dimension(args.height, DEFAULT_HEIGHT, "height")?;

        Ok(format!(
            "browser capture is not supported in this build (requested {host} at {width}x{height})"
        ))
    }
}
