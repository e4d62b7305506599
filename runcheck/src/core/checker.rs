//! Full validation pass over a parsed run artifact.

use crate::core::cross_ref::check_cross_references;
use crate::core::structure::{check_sections, check_top_level};
use crate::core::types::{ValidateOptions, ValidationReport, ValidationStats};
use crate::core::value::Object;

/// Validate `artifact` and collect every violation in check order.
///
/// Missing top-level keys and a malformed `task_graph` end the pass early with
/// zeroed stats; everything else accumulates.
pub fn validate_artifact(artifact: &Object, options: ValidateOptions) -> ValidationReport {
    let mut errors = Vec::new();

    if !check_top_level(artifact, &mut errors) {
        return ValidationReport {
            errors,
            stats: ValidationStats::default(),
        };
    }

    let Some(sections) = check_sections(artifact, &mut errors) else {
        return ValidationReport {
            errors,
            stats: ValidationStats::default(),
        };
    };

    if !options.allow_escalations && !sections.escalations.is_empty() {
        errors.push(
            "Escalations are present; rerun with --allow-escalations to permit".to_string(),
        );
    }

    let done_tasks = check_cross_references(&sections, &mut errors);

    ValidationReport {
        errors,
        stats: ValidationStats {
            tasks: sections.tasks.len(),
            done_tasks,
            escalations: sections.escalations.len(),
        },
    }
}
