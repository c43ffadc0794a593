//! Observability events recorded while a task is processed.
//!
//! The [`EventLog`] keeps a bounded ring of recent events (oldest evicted
//! first) and fans each event out on a broadcast channel so external sinks
//! can consume the full stream without the log growing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;

use crate::task::Task;

/// Default number of events retained in memory.
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    TaskReceived,
    ToolSucceeded,
    ToolFailed,
    Replied,
    BudgetExhausted,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::TaskReceived => "task_received",
            Self::ToolSucceeded => "tool_succeeded",
            Self::ToolFailed => "tool_failed",
            Self::Replied => "replied",
            Self::BudgetExhausted => "budget_exhausted",
        };
        f.write_str(s)
    }
}

/// A single timestamped record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub timestamp: DateTime<Utc>,
    pub kind: EventKind,
    pub agent: String,
    /// Tool involved, empty when not applicable
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tool: String,
    pub channel: String,
    pub message: String,
}

impl Event {
    pub fn new(kind: EventKind, task: &Task) -> Self {
        Self {
            timestamp: Utc::now(),
            kind,
            agent: task.agent().to_string(),
            tool: String::new(),
            channel: task.channel.clone(),
            message: String::new(),
        }
    }

    pub fn with_tool(mut self, tool: impl Into<String>) -> Self {
        self.tool = tool.into();
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

/// Bounded, lock-protected event log with a broadcast tap.
pub struct EventLog {
    capacity: usize,
    entries: Mutex<VecDeque<Event>>,
    sender: broadcast::Sender<Arc<Event>>,
}

impl EventLog {
    /// Create a log retaining at most `capacity` events (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (sender, _) = broadcast::channel(capacity);
        Self {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
            sender,
        }
    }

    /// Append an event, evicting the oldest one when full.
    pub fn record(&self, event: Event) {
        tracing::info!(
            kind = %event.kind,
            agent = %event.agent,
            tool = %event.tool,
            channel = %event.channel,
            "{}",
            event.message
        );

        {
            let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
            if entries.len() == self.capacity {
                entries.pop_front();
            }
            entries.push_back(event.clone());
        }

        // No subscribers is fine
        let _ = self.sender.send(Arc::new(event));
    }

    /// Subscribe to every future event.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<Event>> {
        self.sender.subscribe()
    }

    /// Copy of the retained events, oldest first.
    pub fn snapshot(&self) -> Vec<Event> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}
