//! Deterministic branch names and commit messages for a task.
//!
//! Derivations use the same vocabulary as [`crate::core::grammar`], so anything
//! produced here with the default prefix and a length limit of at most
//! [`MAX_BRANCH_NAME_LENGTH`] is accepted by the artifact checker.

use std::sync::LazyLock;

use anyhow::{Result, anyhow, bail};
use regex::Regex;
use serde::Serialize;

use crate::core::grammar::{
    FORBIDDEN_SCOPE_PREFIX, MAX_BRANCH_NAME_LENGTH, allowed_commit_types, is_commit_type,
};

/// Default branch length limit; matches what the checker enforces.
pub const DEFAULT_MAX_BRANCH_LENGTH: usize = MAX_BRANCH_NAME_LENGTH;
/// Smallest accepted branch length limit.
pub const MIN_BRANCH_LENGTH_LIMIT: usize = 16;
/// Shortest slug a prefix may leave room for.
const MIN_SLUG_ROOM: usize = 6;
/// Prefix value that means "use the commit type".
pub const AUTO: &str = "auto";

static NON_SLUG_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// Inputs for one derivation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeriveRequest {
    pub task_id: String,
    pub title: String,
    pub commit_summary: Option<String>,
    pub commit_type: String,
    pub commit_scope: Option<String>,
    pub branch_prefix: String,
    pub max_branch_length: usize,
}

/// Derived names for a task, serialized as the `derive` command output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Derivation {
    pub task_id: String,
    pub normalized_task_id: String,
    pub branch_name: String,
    pub commit_type: String,
    pub commit_scope: String,
    pub max_branch_length: usize,
    pub commit_message: String,
}

/// Derive branch name, scope, and commit message for a task.
///
/// The commit summary defaults to the title.
pub fn derive(request: &DeriveRequest) -> Result<Derivation> {
    let summary = request
        .commit_summary
        .as_deref()
        .filter(|summary| !summary.is_empty())
        .unwrap_or(request.title.as_str());
    let branch_name = build_branch_name(
        &request.title,
        &request.commit_type,
        &request.branch_prefix,
        Some(summary),
        request.max_branch_length,
    )?;
    let commit_scope =
        normalize_commit_scope(request.commit_scope.as_deref(), &request.commit_type)?;
    let commit_message = build_commit_message(summary, &request.commit_type, Some(&commit_scope))?;

    Ok(Derivation {
        task_id: request.task_id.clone(),
        normalized_task_id: normalize_task_id(&request.task_id)?,
        branch_name,
        commit_type: request.commit_type.clone(),
        commit_scope,
        max_branch_length: request.max_branch_length,
        commit_message,
    })
}

/// Lowercase and collapse non-alphanumeric runs to `-`. Empty result is an error.
pub fn normalize_task_id(task_id: &str) -> Result<String> {
    let normalized = collapse(task_id);
    if normalized.is_empty() {
        bail!("Invalid task id: {task_id:?}");
    }
    Ok(normalized)
}

/// Same normalization as task ids, falling back to `task` when nothing is left.
pub fn slugify(text: &str) -> String {
    let slug = collapse(text);
    if slug.is_empty() {
        return "task".to_string();
    }
    slug
}

pub fn normalize_commit_type(commit_type: &str) -> Result<String> {
    let normalized = commit_type.trim().to_lowercase();
    if !is_commit_type(&normalized) {
        bail!(
            "Invalid commit type '{commit_type}'. Allowed: {}",
            allowed_commit_types()
        );
    }
    Ok(normalized)
}

/// Default scope used when none (or `auto`) is given.
pub fn default_scope(commit_type: &str) -> &'static str {
    match commit_type {
        "feat" => "feature",
        "fix" => "bugfix",
        "refactor" => "refactor",
        "perf" => "performance",
        "test" => "tests",
        "docs" => "docs",
        "chore" => "chore",
        "build" => "build",
        "ci" => "ci",
        "revert" => "revert",
        "style" => "style",
        _ => "change",
    }
}

pub fn normalize_commit_scope(commit_scope: Option<&str>, commit_type: &str) -> Result<String> {
    let commit_type = normalize_commit_type(commit_type)?;
    let source = commit_scope.map(str::trim).unwrap_or_default();
    let source = if source.is_empty() || source.eq_ignore_ascii_case(AUTO) {
        default_scope(&commit_type)
    } else {
        source
    };

    let scope = slugify(source);
    if scope.starts_with(FORBIDDEN_SCOPE_PREFIX) {
        bail!(
            "commit scope must describe a feature/component (for example 'feature' or 'auth'), \
             not a task id"
        );
    }
    Ok(scope)
}

/// Build `<prefix>/<slug>` within `max_branch_length` characters.
///
/// The slug comes from `commit_summary` when given, otherwise from `title`.
pub fn build_branch_name(
    title: &str,
    commit_type: &str,
    branch_prefix: &str,
    commit_summary: Option<&str>,
    max_branch_length: usize,
) -> Result<String> {
    if max_branch_length < MIN_BRANCH_LENGTH_LIMIT {
        bail!("max_branch_length must be at least {MIN_BRANCH_LENGTH_LIMIT}");
    }

    let mut prefix = branch_prefix.trim().trim_matches('/').to_string();
    if prefix.eq_ignore_ascii_case(AUTO) {
        prefix = normalize_commit_type(commit_type)?;
    }
    if prefix.is_empty() {
        bail!("branch_prefix must be non-empty");
    }

    let remaining = max_branch_length
        .checked_sub(prefix.chars().count() + 1)
        .filter(|remaining| *remaining >= MIN_SLUG_ROOM)
        .ok_or_else(|| {
            anyhow!(
                "branch_prefix '{prefix}' is too long for max_branch_length={max_branch_length}"
            )
        })?;

    let source = commit_summary.map(str::trim).unwrap_or(title);
    let slug: String = slugify(source).chars().take(remaining).collect();
    Ok(format!("{prefix}/{slug}"))
}

pub fn build_commit_message(
    summary: &str,
    commit_type: &str,
    commit_scope: Option<&str>,
) -> Result<String> {
    let commit_type = normalize_commit_type(commit_type)?;
    let scope = normalize_commit_scope(commit_scope, &commit_type)?;
    let summary = summary.trim();
    if summary.is_empty() {
        bail!("commit summary must be non-empty");
    }
    Ok(format!("{commit_type}({scope}): {summary}"))
}

fn collapse(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    NON_SLUG_RUN
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}
