//! Consistency checker for multi-task run artifacts.
//!
//! A run artifact is a JSON document describing one planning + execution run:
//! task graph, execution log, branch deliveries, validation gates, and the
//! implementation report. The checker verifies that these sections agree with
//! each other and that every completed task was delivered on its own branch
//! with a conventional commit, a passing gate, and a logged push.
//!
//! - **[`core`]**: Pure, deterministic logic (grammar, structural and
//!   cross-reference validation, name derivation). No I/O.
//! - **[`io`]**: Artifact loading and the TOML config file.
//!
//! [`validate`] and [`report`] coordinate the two to implement the CLI.

pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod report;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod validate;
