//! `runcheck validate`: load an artifact from disk and run the full check.

use std::path::Path;

use tracing::{debug, info, instrument};

use crate::core::checker::validate_artifact;
use crate::core::types::{ValidateOptions, ValidationReport};
use crate::io::loader::{LoadError, load_artifact};

/// Load and validate the artifact at `path`.
///
/// `Err` means the artifact could not be validated at all; violations are
/// returned inside the report.
#[instrument(
    skip_all,
    fields(path = %path.display(), allow_escalations = options.allow_escalations)
)]
pub fn validate_path(path: &Path, options: ValidateOptions) -> Result<ValidationReport, LoadError> {
    let artifact = load_artifact(path)?;
    let report = validate_artifact(&artifact, options);
    debug!(errors = report.errors.len(), "validation pass finished");
    info!(
        tasks = report.stats.tasks,
        done_tasks = report.stats.done_tasks,
        escalations = report.stats.escalations,
        passed = report.passed(),
        "artifact validated"
    );
    Ok(report)
}
