//! Task — one inbound request handed to the runtime by a channel adapter.
//!
//! Channel adapters (Telegram, Slack, CLI, ...) parse their own wire
//! formats and produce a `Task`. The runtime never sees platform payloads.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Agent id used when the adapter does not supply one.
pub const DEFAULT_AGENT_ID: &str = "default";

/// A single unit of work: one inbound message plus where it came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Target agent. Empty means [`DEFAULT_AGENT_ID`].
    #[serde(default)]
    pub agent_id: String,

    /// The free-form text of the request
    pub text: String,

    /// Name of the originating channel (e.g. "telegram", "cli")
    #[serde(default)]
    pub channel: String,

    /// Adapter-specific metadata (chat id, sender, ...)
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, String>,
}

impl Task {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_agent(mut self, agent_id: impl Into<String>) -> Self {
        self.agent_id = agent_id.into();
        self
    }

    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = channel.into();
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// The effective agent id, falling back to [`DEFAULT_AGENT_ID`].
    pub fn agent(&self) -> &str {
        let id = self.agent_id.trim();
        if id.is_empty() { DEFAULT_AGENT_ID } else { id }
    }
}
