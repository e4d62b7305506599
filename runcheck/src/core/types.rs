//! Shared result types for a validation pass.
//!
//! Error lists keep insertion order: the order in which checks ran. Nothing here
//! is sorted after the fact so repeated runs produce identical output.

use serde::Serialize;

/// Summary counters reported alongside the error list.
///
/// All counters are zero when validation aborted early.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ValidationStats {
    /// Number of task objects in the task graph.
    pub tasks: usize,
    /// Number of distinct task ids with `state == "done"`.
    pub done_tasks: usize,
    /// Number of entries in `escalations`.
    pub escalations: usize,
}

/// Outcome of validating one run artifact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub stats: ValidationStats,
}

impl ValidationReport {
    pub fn passed(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Options that change what counts as a violation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidateOptions {
    /// Permit a non-empty `escalations` section.
    pub allow_escalations: bool,
}
