//! Run artifact loading: read text, parse JSON, require an object.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::core::value::Object;

/// Abort-level failures. Any of these ends the run before validation starts.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Unable to read file: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{0}")]
    Structure(String),
}

/// Read and parse the artifact at `path`. No defaulting or trimming happens here.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_artifact(path: &Path) -> Result<Object, LoadError> {
    let raw = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(bytes = raw.len(), "artifact read");
    let artifact = parse_artifact(&raw)?;
    debug!(sections = artifact.len(), "artifact parsed");
    Ok(artifact)
}

/// Parse artifact text; the top-level value must be an object.
pub fn parse_artifact(raw: &str) -> Result<Object, LoadError> {
    match serde_json::from_str::<Value>(raw)? {
        Value::Object(artifact) => Ok(artifact),
        _ => Err(LoadError::Structure(
            "Top-level JSON value must be an object".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ArtifactDir, valid_artifact};

    #[test]
    fn loads_object_artifact() {
        let dir = ArtifactDir::new().expect("dir");
        let path = dir.write_json("run.json", &valid_artifact()).expect("write");
        let artifact = load_artifact(&path).expect("load");
        assert!(artifact.contains_key("task_graph"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = ArtifactDir::new().expect("dir");
        let err = load_artifact(&dir.path().join("absent.json")).expect_err("missing");
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().starts_with("Unable to read file: "));
    }

    #[test]
    fn malformed_json_reports_location() {
        let dir = ArtifactDir::new().expect("dir");
        let path = dir.write_raw("run.json", "{\n  \"run_summary\": ,\n}").expect("write");
        let err = load_artifact(&path).expect_err("malformed");
        assert!(matches!(err, LoadError::Parse(_)));
        let message = err.to_string();
        assert!(message.starts_with("Invalid JSON: "), "{message}");
        assert!(message.contains("line 2"), "{message}");
    }

    #[test]
    fn non_object_top_level_is_structure_error() {
        let err = parse_artifact("[1, 2]").expect_err("array");
        assert!(matches!(err, LoadError::Structure(_)));
        assert_eq!(err.to_string(), "Top-level JSON value must be an object");
    }
}
