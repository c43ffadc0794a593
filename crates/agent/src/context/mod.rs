//! Memory context assembly.
//!
//! Gathers the agent's markdown memory files into one block the planner
//! can read:
//!
//! | Source | Order | Cap |
//! |--------|-------|-----|
//! | Well-known files (`AGENTS.md`, `SOUL.md`, ...) | fixed priority | per file |
//! | `memory/*.md` daily notes | newest first | count, per file |
//! | Whole block | — | total bytes |

pub mod assembler;

pub use assembler::{AssemblyError, ContextAssembler, ContextLimits, WELL_KNOWN_FILES};
