//! Rendering of validation results for the terminal.

use std::fmt::Write as _;

use crate::core::types::ValidationReport;
use crate::exit_codes;

pub const FAILED_HEADER: &str = "VALIDATION FAILED";

/// Render the report as printed by `runcheck validate`.
///
/// Failure: a header line, then one `- <error>` line per violation in check order.
/// Success: a single summary line with the counters.
pub fn render(report: &ValidationReport) -> String {
    let mut out = String::new();
    if report.passed() {
        let stats = report.stats;
        let _ = writeln!(
            out,
            "VALIDATION PASSED (tasks={}, done={}, escalations={})",
            stats.tasks, stats.done_tasks, stats.escalations
        );
        return out;
    }

    out.push_str(FAILED_HEADER);
    out.push('\n');
    for error in &report.errors {
        let _ = writeln!(out, "- {error}");
    }
    out
}

/// Render an abort-level failure (unreadable or malformed artifact).
pub fn render_abort(err: &dyn std::fmt::Display) -> String {
    format!("ERROR: {err}\n")
}

pub fn exit_code(report: &ValidationReport) -> i32 {
    if report.passed() {
        exit_codes::OK
    } else {
        exit_codes::INVALID
    }
}
