//! Test-only helpers for constructing run artifacts.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::{Value, json};
use tempfile::TempDir;

/// A done task with the given branch and no dependencies.
pub fn done_task(id: &str, branch_name: &str) -> Value {
    json!({
        "id": id,
        "title": format!("{id} title"),
        "state": "done",
        "depends_on": [],
        "branch_name": branch_name,
    })
}

/// A two-task artifact that passes validation.
///
/// `T1` is done with a matching delivery, passing gate, pushed log entry, and
/// implementation detail. `T2` is still open and appears nowhere else.
pub fn valid_artifact() -> Value {
    json!({
        "run_summary": {"objective": "Add login", "mode": "execute", "status": "complete"},
        "planning_report": {
            "scope": "auth service",
            "constraints": ["no new services"],
            "assumptions": [],
            "options_considered": ["session cookies", "jwt"],
            "selected_design": "session cookies",
            "rationale": "existing middleware",
            "risks": [],
        },
        "blocking_questions": [],
        "decisions_required": [],
        "project_profile": {"language": "rust"},
        "task_graph": {
            "tasks": [
                done_task("T1", "feat/login"),
                {
                    "id": "T2",
                    "title": "Session timeout",
                    "state": "todo",
                    "depends_on": ["T1"],
                    "branch_name": "fix/session-timeout",
                },
            ]
        },
        "execution_log": [
            {"task_id": "T1", "status": "started"},
            {
                "task_id": "T1",
                "status": "done",
                "push_status": "ok",
                "commit_message": "feat(auth): add login flow",
            },
        ],
        "implementation_report": {
            "what_done": ["login endpoint"],
            "how_done": ["axum handler"],
            "why_done_this_way": ["matches existing routes"],
            "task_details": [{
                "task_id": "T1",
                "branch_name": "feat/login",
                "files_changed": ["src/auth.rs"],
                "key_changes": ["POST /login"],
                "patterns_used": ["extractor"],
            }],
        },
        "test_report": {
            "business_rules": [{
                "id": "BR-1",
                "rule": "valid credentials log in",
                "tests": ["auth::login_ok"],
                "status": "covered",
            }],
            "gaps": [],
        },
        "validation_report": {
            "task_gate": [
                {"task_id": "T1", "cmd": "cargo test", "exit_code": 1},
                {"task_id": "T1", "cmd": "cargo test", "exit_code": 0},
            ],
            "global_gate": [{"cmd": "cargo clippy", "exit_code": 0}],
        },
        "configuration_steps": [],
        "branch_deliveries": [{
            "task_id": "T1",
            "branch_name": "feat/login",
            "commit_sha": "a1b2c3d",
            "commit_message": "feat(auth): add login flow",
            "remote_branch": "origin/feat/login",
        }],
        "sources": [{
            "title": "Conventional Commits",
            "url": "https://www.conventionalcommits.org/en/v1.0.0/",
            "accessed_at": "2026-01-05",
        }],
        "final_status": "complete",
        "escalations": [],
    })
}

/// Temporary directory holding artifact files.
pub struct ArtifactDir {
    temp: TempDir,
}

impl ArtifactDir {
    pub fn new() -> Result<Self> {
        let temp = tempfile::tempdir().context("create tempdir")?;
        Ok(Self { temp })
    }

    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    /// Write `value` as pretty JSON and return the file path.
    pub fn write_json(&self, name: &str, value: &Value) -> Result<PathBuf> {
        let payload = serde_json::to_string_pretty(value).context("serialize artifact")?;
        self.write_raw(name, &payload)
    }

    /// Write raw text (possibly malformed JSON) and return the file path.
    pub fn write_raw(&self, name: &str, contents: &str) -> Result<PathBuf> {
        let path = self.temp.path().join(name);
        std::fs::write(&path, contents).with_context(|| format!("write {}", path.display()))?;
        Ok(path)
    }
}
