//! Diagnostic tracing for runcheck.
//!
//! stdout is the product: the `VALIDATION ...` report, `ERROR:` lines, or the
//! `derive` JSON, and callers compare it byte for byte. Tracing therefore goes
//! to stderr only. Validation findings are never emitted as events; they
//! appear in the report and nowhere else.
//!
//! Targets worth enabling:
//! - `runcheck::io::loader`: bytes read and section count per artifact.
//! - `runcheck::validate`: error count and stats for each pass.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "warn";

/// Install the stderr subscriber. Call once, before any command runs.
///
/// # Example
/// ```bash
/// RUST_LOG=runcheck=debug runcheck validate run.json
/// ```
pub fn init() {
    let filter = env_filter(std::env::var("RUST_LOG").ok().as_deref());

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}

/// A bad `RUST_LOG` falls back to [`DEFAULT_FILTER`] instead of failing the run.
fn env_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_warn() {
        assert_eq!(env_filter(None).to_string(), DEFAULT_FILTER);
    }

    #[test]
    fn honours_target_directives() {
        assert_eq!(env_filter(Some("runcheck=debug")).to_string(), "runcheck=debug");
    }

    #[test]
    fn unparsable_directives_fall_back() {
        assert_eq!(
            env_filter(Some("runcheck=loudest")).to_string(),
            env_filter(None).to_string()
        );
    }
}
