//! Conventional-commit and branch-name grammar.
//!
//! The commit-type vocabulary is defined once here and shared by the task-graph
//! branch check, the delivery branch check, the execution-log commit check, and
//! the name derivation in [`crate::core::naming`].

use std::sync::LazyLock;

use regex::Regex;

/// Allowed conventional-commit types, in canonical order.
pub const COMMIT_TYPES: [&str; 11] = [
    "feat", "fix", "refactor", "perf", "test", "docs", "chore", "build", "ci", "revert", "style",
];

/// Maximum length of a task branch name, in characters.
pub const MAX_BRANCH_NAME_LENGTH: usize = 40;

/// Scopes must name a feature or component, never a task id.
pub const FORBIDDEN_SCOPE_PREFIX: &str = "task-";

/// Shape of a commit message: `<type>(<scope>): <summary>`.
///
/// `type` is matched loosely so an unknown type gets its own message.
static COMMIT_MESSAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<type>[a-z]+)\((?P<scope>[a-z0-9][a-z0-9-]*)\): (?P<summary>.+)$").unwrap()
});

static BRANCH_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^(?:{})/[a-z0-9][a-z0-9-]*$", COMMIT_TYPES.join("|"))).unwrap()
});

/// True if `commit_type` is part of the fixed vocabulary.
pub fn is_commit_type(commit_type: &str) -> bool {
    COMMIT_TYPES.contains(&commit_type)
}

/// Vocabulary sorted lexicographically and joined for error messages.
pub fn allowed_commit_types() -> String {
    let mut types = COMMIT_TYPES.to_vec();
    types.sort_unstable();
    types.join(", ")
}

/// True if `branch_name` has the `<type>/<slug>` shape. Length is checked separately.
pub fn matches_branch_pattern(branch_name: &str) -> bool {
    BRANCH_NAME_RE.is_match(branch_name)
}

/// True if `branch_name` exceeds [`MAX_BRANCH_NAME_LENGTH`] characters.
pub fn exceeds_branch_length(branch_name: &str) -> bool {
    branch_name.chars().count() > MAX_BRANCH_NAME_LENGTH
}

/// Validate a commit message for `task_id`.
///
/// Returns `None` when the message is acceptable, otherwise one error line naming
/// the task and the offending part.
pub fn validate_commit_message(message: &str, task_id: &str) -> Option<String> {
    let Some(caps) = COMMIT_MESSAGE_RE.captures(message) else {
        return Some(format!(
            "Task {task_id}: commit_message '{message}' does not match required format \
             '<type>(<scope>): <summary>'"
        ));
    };

    let commit_type = &caps["type"];
    if !is_commit_type(commit_type) {
        return Some(format!(
            "Task {task_id}: commit type '{commit_type}' is not allowed (allowed: {})",
            allowed_commit_types()
        ));
    }

    let scope = &caps["scope"];
    if scope.starts_with(FORBIDDEN_SCOPE_PREFIX) {
        return Some(format!(
            "Task {task_id}: commit scope '{scope}' cannot be task-based; use a \
             feature/component scope (for example 'feature' or 'auth')"
        ));
    }

    None
}
