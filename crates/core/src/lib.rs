//! # SandClaw Core
//!
//! Domain types, traits, and error definitions for the SandClaw tool runtime.
//! This crate defines the domain model that all other crates implement
//! against: the [`Task`] that enters the runtime, the [`Tool`] contract,
//! the allow-list gated [`ToolRegistry`], and the bounded [`EventLog`].
//!
//! ## Design Philosophy
//!
//! Every seam is a trait or a plain value here. Implementations live in
//! their respective crates, so tests can swap in stubs and the dependency
//! graph points inward on core.

pub mod allowlist;
pub mod error;
pub mod event;
pub mod task;
pub mod text;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use allowlist::AllowList;
pub use error::{PlannerError, RegistryError, TOOLS_LIST, ToolError};
pub use event::{Event, EventKind, EventLog};
pub use task::Task;
pub use text::{TRUNCATION_SUFFIX, truncate_reply};
pub use tool::{Tool, ToolRegistry, ToolRequest};

// Re-exported so downstream crates share one cancellation type.
pub use tokio_util::sync::CancellationToken;
