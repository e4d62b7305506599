//! Stable exit codes for runcheck CLI commands.

/// Artifact passed validation, or a derivation was printed.
pub const OK: i32 = 0;
/// Artifact unreadable, malformed, or failed validation; or invalid arguments/config.
pub const INVALID: i32 = 1;
