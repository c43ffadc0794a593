//! Security module for SandClaw — path confinement and command allowlists.
//!
//! Provides:
//! - **Path validation**: canonicalizing confinement of file access to sandbox roots
//! - **Command allowlist**: which programs the subprocess tool may start
//!
//! Confinement is purely path- and list-based. There is no syscall
//! filtering or OS-level isolation here.

pub mod allowlist;
pub mod path;

pub use allowlist::{CommandAllowlist, CommandCheck, program_basename};
pub use path::{PathValidationError, Sandbox, validate_path};
