//! Cross-reference validation across task graph, gates, deliveries, log, and
//! implementation details.
//!
//! Runs in two phases. Indexing walks each section once, reports per-entry
//! defects, and builds id-keyed lookups (first occurrence wins). Checking then
//! walks the done tasks in id order and applies the delivery invariants against
//! the complete indices, so forward references between tasks are legal.

use std::collections::{BTreeSet, HashMap};

use serde_json::Value;

use crate::core::grammar::{
    MAX_BRANCH_NAME_LENGTH, exceeds_branch_length, matches_branch_pattern, validate_commit_message,
};
use crate::core::structure::Sections;
use crate::core::value::{Object, display, is_integer, literal, missing_keys, non_blank_str};

const TASK_KEYS: [&str; 4] = ["id", "state", "depends_on", "branch_name"];
const DELIVERY_KEYS: [&str; 5] = [
    "task_id",
    "branch_name",
    "commit_sha",
    "commit_message",
    "remote_branch",
];
const SUCCESS_STATUSES: [&str; 2] = ["passed", "done"];

/// Lookups over the task graph.
#[derive(Debug, Default)]
struct TaskIndex<'a> {
    task_by_id: HashMap<&'a str, &'a Object>,
    /// Trimmed branch name per task id.
    branch_by_task: HashMap<&'a str, &'a str>,
    task_by_branch: HashMap<&'a str, &'a str>,
    done: BTreeSet<&'a str>,
}

/// Lookups over the sections that reference tasks by `task_id`.
#[derive(Debug, Default)]
struct EntryIndex<'a> {
    gates_by_task: HashMap<&'a str, Vec<&'a Object>>,
    detail_by_task: HashMap<&'a str, &'a Object>,
    delivery_by_task: HashMap<&'a str, &'a Object>,
    log_by_task: HashMap<&'a str, Vec<&'a Object>>,
}

/// Validate references and done-task invariants. Returns the number of done tasks.
pub fn check_cross_references(sections: &Sections<'_>, errors: &mut Vec<String>) -> usize {
    let tasks = index_tasks(&sections.tasks, errors);
    check_dependencies(&sections.tasks, &tasks, errors);

    let gates_by_task = index_task_gates(sections.task_gate, errors);
    if let Some(global_gate) = sections.global_gate {
        check_global_gate(global_gate, errors);
    }
    let entries = EntryIndex {
        gates_by_task,
        detail_by_task: index_task_details(sections.task_details, errors),
        delivery_by_task: index_deliveries(sections.branch_deliveries, errors),
        log_by_task: index_execution_log(sections.execution_log, errors),
    };

    for &task_id in &tasks.done {
        let branch = tasks.branch_by_task.get(task_id).copied();
        check_task_detail(task_id, branch, &entries, errors);
        check_task_gate(task_id, &entries, errors);
        check_delivery(task_id, branch, &entries, errors);
        check_execution_log(task_id, &entries, errors);
    }

    tasks.done.len()
}

fn index_tasks<'a>(tasks: &[&'a Object], errors: &mut Vec<String>) -> TaskIndex<'a> {
    let mut index = TaskIndex::default();

    for &task in tasks {
        let id_value = task.get("id");
        let label = display(id_value, "<missing-id>");
        for key in missing_keys(task, &TASK_KEYS) {
            errors.push(format!("Task {label}: missing key '{key}'"));
        }

        let Some(task_id) = non_blank_str(id_value) else {
            errors.push(format!("Task has invalid id: {}", literal(id_value, "<missing-id>")));
            continue;
        };

        if index.task_by_id.contains_key(task_id) {
            errors.push(format!("Duplicate task id: {task_id}"));
        } else {
            index.task_by_id.insert(task_id, task);
        }

        match task.get("depends_on") {
            Some(Value::Array(deps)) => {
                for dep in deps {
                    if non_blank_str(Some(dep)).is_none() {
                        let dep = literal(Some(dep), "");
                        errors.push(format!("Task {task_id}: invalid dependency id {dep}"));
                    }
                }
            }
            _ => errors.push(format!("Task {task_id}: depends_on must be a list")),
        }

        index_task_branch(task_id, task.get("branch_name"), &mut index, errors);

        if task.get("state").and_then(Value::as_str) == Some("done") {
            index.done.insert(task_id);
        }
    }

    index
}

fn index_task_branch<'a>(
    task_id: &'a str,
    branch_value: Option<&'a Value>,
    index: &mut TaskIndex<'a>,
    errors: &mut Vec<String>,
) {
    let Some(branch) = non_blank_str(branch_value).map(str::trim) else {
        errors.push(format!("Task {task_id}: branch_name must be a non-empty string"));
        return;
    };

    if !matches_branch_pattern(branch) {
        errors.push(format!(
            "Task {task_id}: branch_name '{branch}' must match '<type>/<slug>'"
        ));
    }
    if exceeds_branch_length(branch) {
        errors.push(format!(
            "Task {task_id}: branch_name '{branch}' exceeds {MAX_BRANCH_NAME_LENGTH} characters"
        ));
    }

    index.branch_by_task.entry(task_id).or_insert(branch);
    match index.task_by_branch.get(branch) {
        Some(&owner) if owner != task_id => errors.push(format!(
            "Task {task_id}: branch_name '{branch}' is reused by task {owner}"
        )),
        Some(_) => {}
        None => {
            index.task_by_branch.insert(branch, task_id);
        }
    }
}

/// Unknown dependencies can only be judged once every id is known.
///
/// Self-dependencies are not rejected; only ids absent from the graph are.
fn check_dependencies(tasks: &[&Object], index: &TaskIndex<'_>, errors: &mut Vec<String>) {
    for &task in tasks {
        let Some(task_id) = task.get("id").and_then(Value::as_str) else {
            continue;
        };
        let Some(Value::Array(deps)) = task.get("depends_on") else {
            continue;
        };
        for dep in deps.iter().filter_map(Value::as_str) {
            if !index.task_by_id.contains_key(dep) {
                errors.push(format!("Task {task_id}: unknown dependency '{dep}'"));
            }
        }
    }
}

fn index_task_gates<'a>(
    entries: &'a [Value],
    errors: &mut Vec<String>,
) -> HashMap<&'a str, Vec<&'a Object>> {
    let mut by_task: HashMap<&str, Vec<&Object>> = HashMap::new();

    for (idx, entry) in entries.iter().enumerate() {
        let location = format!("validation_report.task_gate[{idx}]");
        let Some(entry) = entry.as_object() else {
            errors.push(format!("{location} must be an object"));
            continue;
        };
        let Some(task_id) = non_blank_str(entry.get("task_id")) else {
            errors.push(format!("{location} missing/invalid task_id"));
            continue;
        };
        if non_blank_str(entry.get("cmd")).is_none() {
            errors.push(format!("{location} missing/invalid cmd for task {task_id}"));
        }
        if !is_integer(entry.get("exit_code")) {
            errors.push(format!("{location} missing/invalid exit_code for task {task_id}"));
        }
        by_task.entry(task_id).or_default().push(entry);
    }

    by_task
}

fn check_global_gate(entries: &[Value], errors: &mut Vec<String>) {
    for (idx, entry) in entries.iter().enumerate() {
        let location = format!("validation_report.global_gate[{idx}]");
        let Some(entry) = entry.as_object() else {
            errors.push(format!("{location} must be an object"));
            continue;
        };
        if non_blank_str(entry.get("cmd")).is_none() {
            errors.push(format!("{location} missing/invalid cmd"));
        }
        if !is_integer(entry.get("exit_code")) {
            errors.push(format!("{location} missing/invalid exit_code"));
        }
    }
    if entries.is_empty() {
        errors.push("validation_report.global_gate must contain at least one check".to_string());
    }
}

/// Shape errors for task details were reported by the structural pass.
fn index_task_details<'a>(
    details: &'a [Value],
    errors: &mut Vec<String>,
) -> HashMap<&'a str, &'a Object> {
    let mut by_task = HashMap::new();
    for detail in details.iter().filter_map(Value::as_object) {
        let Some(task_id) = non_blank_str(detail.get("task_id")) else {
            continue;
        };
        if by_task.contains_key(task_id) {
            errors.push(format!("Duplicate implementation task_details entry for task {task_id}"));
        } else {
            by_task.insert(task_id, detail);
        }
    }
    by_task
}

fn index_deliveries<'a>(
    deliveries: &'a [Value],
    errors: &mut Vec<String>,
) -> HashMap<&'a str, &'a Object> {
    let mut by_task = HashMap::new();

    for (idx, delivery) in deliveries.iter().enumerate() {
        let Some(delivery) = delivery.as_object() else {
            errors.push(format!("branch_deliveries[{idx}] must be an object"));
            continue;
        };

        let task_id_value = delivery.get("task_id");
        let label = display(task_id_value, &format!("<missing-task-id@{idx}>"));
        for key in missing_keys(delivery, &DELIVERY_KEYS) {
            errors.push(format!("Delivery {label}: missing key '{key}'"));
        }

        let Some(task_id) = non_blank_str(task_id_value) else {
            continue;
        };
        if by_task.contains_key(task_id) {
            errors.push(format!("Duplicate branch delivery for task {task_id}"));
        } else {
            by_task.insert(task_id, delivery);
        }
    }

    by_task
}

fn index_execution_log<'a>(
    log: &'a [Value],
    errors: &mut Vec<String>,
) -> HashMap<&'a str, Vec<&'a Object>> {
    let mut by_task: HashMap<&str, Vec<&Object>> = HashMap::new();
    for (idx, entry) in log.iter().enumerate() {
        let Some(entry) = entry.as_object() else {
            errors.push(format!("execution_log[{idx}] must be an object"));
            continue;
        };
        if let Some(task_id) = non_blank_str(entry.get("task_id")) {
            by_task.entry(task_id).or_default().push(entry);
        }
    }
    by_task
}

fn check_task_detail(
    task_id: &str,
    branch: Option<&str>,
    entries: &EntryIndex<'_>,
    errors: &mut Vec<String>,
) {
    let Some(detail) = entries.detail_by_task.get(task_id) else {
        errors.push(format!(
            "Done task {task_id} is missing implementation_report.task_details entry"
        ));
        return;
    };
    let detail_branch = detail.get("branch_name").and_then(Value::as_str);
    match (branch, detail_branch) {
        (Some(expected), Some(actual)) if actual != expected => errors.push(format!(
            "Task {task_id}: task_details branch '{actual}' does not match task branch '{expected}'"
        )),
        _ => {}
    }
}

fn check_task_gate(task_id: &str, entries: &EntryIndex<'_>, errors: &mut Vec<String>) {
    let gates = entries
        .gates_by_task
        .get(task_id)
        .map(Vec::as_slice)
        .unwrap_or_default();
    if gates.is_empty() {
        errors.push(format!("Done task {task_id} has no validation_report.task_gate entries"));
        return;
    }
    let passed = gates
        .iter()
        .any(|gate| gate.get("exit_code").and_then(Value::as_i64) == Some(0));
    if !passed {
        errors.push(format!(
            "Done task {task_id} has no passing validation_report.task_gate entry"
        ));
    }
}

fn check_delivery(
    task_id: &str,
    branch: Option<&str>,
    entries: &EntryIndex<'_>,
    errors: &mut Vec<String>,
) {
    let Some(delivery) = entries.delivery_by_task.get(task_id) else {
        errors.push(format!("Done task {task_id} is missing branch delivery"));
        return;
    };

    let actual = delivery.get("branch_name");
    let mismatched = branch.filter(|expected| actual.and_then(Value::as_str) != Some(*expected));
    if let Some(expected) = mismatched {
        errors.push(format!(
            "Task {task_id}: delivery branch '{}' does not match task branch '{expected}'",
            display(actual, "null")
        ));
    }
    if let Some(actual) = non_blank_str(actual) {
        if !matches_branch_pattern(actual.trim()) {
            errors.push(format!(
                "Task {task_id}: delivery branch '{actual}' must match '<type>/<slug>'"
            ));
        }
        if exceeds_branch_length(actual.trim()) {
            errors.push(format!(
                "Task {task_id}: delivery branch '{actual}' exceeds {MAX_BRANCH_NAME_LENGTH} characters"
            ));
        }
    }

    match non_blank_str(delivery.get("commit_message")) {
        Some(message) => errors.extend(validate_commit_message(message.trim(), task_id)),
        None => errors.push(format!("Task {task_id}: delivery commit_message must be non-empty")),
    }
}

fn check_execution_log(task_id: &str, entries: &EntryIndex<'_>, errors: &mut Vec<String>) {
    let log = entries
        .log_by_task
        .get(task_id)
        .map(Vec::as_slice)
        .unwrap_or_default();
    if log.is_empty() {
        errors.push(format!("Done task {task_id} has no execution_log entries"));
        return;
    }

    // Status and push result must come from the same entry.
    let pushed = log.iter().any(|entry| {
        let status = entry.get("status").and_then(Value::as_str);
        status.is_some_and(|status| SUCCESS_STATUSES.contains(&status))
            && entry.get("push_status").and_then(Value::as_str) == Some("ok")
    });
    if !pushed {
        errors.push(format!(
            "Done task {task_id} lacks a successful execution_log entry with push_status='ok'"
        ));
    }

    for message in log
        .iter()
        .filter_map(|entry| non_blank_str(entry.get("commit_message")))
    {
        errors.extend(validate_commit_message(message.trim(), task_id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::structure::check_sections;
    use crate::test_support::{done_task, valid_artifact};
    use serde_json::json;

    fn cross_ref(artifact: &Value) -> (Vec<String>, usize) {
        let object = artifact.as_object().expect("object");
        let mut errors = Vec::new();
        let sections = check_sections(object, &mut errors).expect("sections");
        assert!(errors.is_empty(), "structural errors: {errors:?}");
        let done = check_cross_references(&sections, &mut errors);
        (errors, done)
    }

    #[test]
    fn valid_artifact_has_no_errors() {
        let (errors, done) = cross_ref(&valid_artifact());
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(done, 1);
    }

    #[test]
    fn missing_delivery_is_reported_once() {
        let mut artifact = valid_artifact();
        artifact["branch_deliveries"] = json!([]);
        let (errors, _) = cross_ref(&artifact);
        assert_eq!(errors, vec!["Done task T1 is missing branch delivery".to_string()]);
    }

    #[test]
    fn missing_delivery_independent_of_gate_and_log() {
        let mut artifact = valid_artifact();
        artifact["branch_deliveries"] = json!([]);
        artifact["execution_log"] = json!([]);
        artifact["validation_report"]["task_gate"] = json!([]);
        let (errors, _) = cross_ref(&artifact);
        assert_eq!(
            errors,
            vec![
                "Done task T1 has no validation_report.task_gate entries".to_string(),
                "Done task T1 is missing branch delivery".to_string(),
                "Done task T1 has no execution_log entries".to_string(),
            ]
        );
    }

    #[test]
    fn reused_branch_names_the_later_task() {
        let mut artifact = valid_artifact();
        artifact["task_graph"]["tasks"][1]["branch_name"] = json!("feat/login");
        let (errors, _) = cross_ref(&artifact);
        assert_eq!(
            errors,
            vec!["Task T2: branch_name 'feat/login' is reused by task T1".to_string()]
        );
    }

    #[test]
    fn duplicate_task_id_keeps_first_entry() {
        let mut artifact = valid_artifact();
        artifact["task_graph"]["tasks"][1]["id"] = json!("T1");
        let (errors, done) = cross_ref(&artifact);
        assert_eq!(errors, vec!["Duplicate task id: T1".to_string()]);
        assert_eq!(done, 1);
    }

    #[test]
    fn forward_dependencies_are_legal_and_unknown_ones_reported() {
        let mut artifact = valid_artifact();
        artifact["task_graph"]["tasks"][0]["depends_on"] = json!(["T2", "T1", "T9", "", 4]);
        let (errors, _) = cross_ref(&artifact);
        assert_eq!(
            errors,
            vec![
                "Task T1: invalid dependency id ''".to_string(),
                "Task T1: invalid dependency id 4".to_string(),
                "Task T1: unknown dependency 'T9'".to_string(),
                "Task T1: unknown dependency ''".to_string(),
            ]
        );
    }

    #[test]
    fn invalid_task_ids_skip_further_task_checks() {
        let mut artifact = valid_artifact();
        artifact["task_graph"]["tasks"] = json!([
            {"state": "open", "depends_on": [], "branch_name": "feat/a"},
            {"id": "  ", "state": "open", "depends_on": [], "branch_name": "feat/b"},
        ]);
        artifact["branch_deliveries"] = json!([]);
        let (errors, done) = cross_ref(&artifact);
        assert_eq!(
            errors,
            vec![
                "Task <missing-id>: missing key 'id'".to_string(),
                "Task has invalid id: <missing-id>".to_string(),
                "Task has invalid id: '  '".to_string(),
            ]
        );
        assert_eq!(done, 0);
    }

    #[test]
    fn task_branch_grammar_and_length() {
        let mut artifact = valid_artifact();
        let long = format!("feat/{}", "a".repeat(36));
        artifact["task_graph"]["tasks"][1]["branch_name"] = json!(long);
        artifact["task_graph"]["tasks"].as_array_mut().expect("tasks").push(json!({
            "id": "T3", "state": "todo", "depends_on": [], "branch_name": "task-123/x"
        }));
        artifact["task_graph"]["tasks"].as_array_mut().expect("tasks").push(json!({
            "id": "T4", "state": "todo", "depends_on": []
        }));
        let (errors, _) = cross_ref(&artifact);
        assert_eq!(
            errors,
            vec![
                format!("Task T2: branch_name '{long}' exceeds 40 characters"),
                "Task T3: branch_name 'task-123/x' must match '<type>/<slug>'".to_string(),
                "Task T4: missing key 'branch_name'".to_string(),
                "Task T4: branch_name must be a non-empty string".to_string(),
            ]
        );
    }

    #[test]
    fn gate_requires_a_zero_exit_code() {
        let mut artifact = valid_artifact();
        artifact["validation_report"]["task_gate"] = json!([
            {"task_id": "T1", "cmd": "cargo test", "exit_code": 101},
            {"task_id": "T1", "cmd": "", "exit_code": "0"},
            {"cmd": "cargo fmt", "exit_code": 0},
            "oops",
        ]);
        let (errors, _) = cross_ref(&artifact);
        assert_eq!(
            errors,
            vec![
                "validation_report.task_gate[1] missing/invalid cmd for task T1".to_string(),
                "validation_report.task_gate[1] missing/invalid exit_code for task T1".to_string(),
                "validation_report.task_gate[2] missing/invalid task_id".to_string(),
                "validation_report.task_gate[3] must be an object".to_string(),
                "Done task T1 has no passing validation_report.task_gate entry".to_string(),
            ]
        );
    }

    #[test]
    fn global_gate_must_be_non_empty_and_well_formed() {
        let mut artifact = valid_artifact();
        artifact["validation_report"]["global_gate"] = json!([]);
        let (errors, _) = cross_ref(&artifact);
        assert_eq!(
            errors,
            vec!["validation_report.global_gate must contain at least one check".to_string()]
        );

        artifact["validation_report"]["global_gate"] = json!([{"cmd": " ", "exit_code": 1.5}]);
        let (errors, _) = cross_ref(&artifact);
        assert_eq!(
            errors,
            vec![
                "validation_report.global_gate[0] missing/invalid cmd".to_string(),
                "validation_report.global_gate[0] missing/invalid exit_code".to_string(),
            ]
        );
    }

    #[test]
    fn global_gate_is_reported_before_later_sections() {
        let mut artifact = valid_artifact();
        artifact["validation_report"]["global_gate"] = json!([]);
        artifact["execution_log"].as_array_mut().expect("log").push(json!("x"));
        let detail = artifact["implementation_report"]["task_details"][0].clone();
        artifact["implementation_report"]["task_details"]
            .as_array_mut()
            .expect("details")
            .push(detail);
        let (errors, _) = cross_ref(&artifact);
        assert_eq!(
            errors,
            vec![
                "validation_report.global_gate must contain at least one check".to_string(),
                "Duplicate implementation task_details entry for task T1".to_string(),
                "execution_log[2] must be an object".to_string(),
            ]
        );
    }

    #[test]
    fn delivery_branch_length_is_checked() {
        let mut artifact = valid_artifact();
        let long = format!("feat/{}", "a".repeat(36));
        artifact["task_graph"]["tasks"][0]["branch_name"] = json!(long);
        artifact["implementation_report"]["task_details"][0]["branch_name"] = json!(long);
        artifact["branch_deliveries"][0]["branch_name"] = json!(long);
        let (errors, _) = cross_ref(&artifact);
        assert_eq!(
            errors,
            vec![
                format!("Task T1: branch_name '{long}' exceeds 40 characters"),
                format!("Task T1: delivery branch '{long}' exceeds 40 characters"),
            ]
        );
    }

    #[test]
    fn delivery_must_agree_with_task() {
        let mut artifact = valid_artifact();
        artifact["branch_deliveries"][0]["branch_name"] = json!("Feature/Login");
        artifact["branch_deliveries"][0]["commit_message"] = json!("feat(task-1): add login");
        let (errors, _) = cross_ref(&artifact);
        assert_eq!(
            errors,
            vec![
                "Task T1: delivery branch 'Feature/Login' does not match task branch 'feat/login'"
                    .to_string(),
                "Task T1: delivery branch 'Feature/Login' must match '<type>/<slug>'".to_string(),
                "Task T1: commit scope 'task-1' cannot be task-based; use a feature/component \
                 scope (for example 'feature' or 'auth')"
                    .to_string(),
            ]
        );
    }

    #[test]
    fn delivery_entries_are_indexed_with_defects() {
        let mut artifact = valid_artifact();
        let deliveries = artifact["branch_deliveries"].as_array_mut().expect("deliveries");
        deliveries.push(json!({"task_id": "T1", "branch_name": "feat/login"}));
        deliveries.push(json!({"branch_name": "feat/x"}));
        deliveries.push(json!(7));
        let (errors, _) = cross_ref(&artifact);
        assert_eq!(
            errors,
            vec![
                "Delivery T1: missing key 'commit_message'".to_string(),
                "Delivery T1: missing key 'commit_sha'".to_string(),
                "Delivery T1: missing key 'remote_branch'".to_string(),
                "Duplicate branch delivery for task T1".to_string(),
                "Delivery <missing-task-id@2>: missing key 'commit_message'".to_string(),
                "Delivery <missing-task-id@2>: missing key 'commit_sha'".to_string(),
                "Delivery <missing-task-id@2>: missing key 'remote_branch'".to_string(),
                "Delivery <missing-task-id@2>: missing key 'task_id'".to_string(),
                "branch_deliveries[3] must be an object".to_string(),
            ]
        );
    }

    #[test]
    fn delivery_without_commit_message() {
        let mut artifact = valid_artifact();
        artifact["branch_deliveries"][0]["commit_message"] = json!("  ");
        let (errors, _) = cross_ref(&artifact);
        assert_eq!(
            errors,
            vec!["Task T1: delivery commit_message must be non-empty".to_string()]
        );
    }

    #[test]
    fn log_success_requires_status_and_push_on_same_entry() {
        let mut artifact = valid_artifact();
        artifact["execution_log"] = json!([
            {"task_id": "T1", "status": "done", "push_status": "failed"},
            {"task_id": "T1", "status": "running", "push_status": "ok"},
        ]);
        let (errors, _) = cross_ref(&artifact);
        assert_eq!(
            errors,
            vec![
                "Done task T1 lacks a successful execution_log entry with push_status='ok'"
                    .to_string()
            ]
        );
    }

    #[test]
    fn every_logged_commit_message_is_checked() {
        let mut artifact = valid_artifact();
        artifact["execution_log"] = json!([
            {"task_id": "T1", "status": "passed", "push_status": "ok",
             "commit_message": "feat(auth): add login flow"},
            {"task_id": "T1", "status": "started", "commit_message": "wip"},
            {"task_id": "T1", "status": "started", "commit_message": ""},
            "not-an-entry",
        ]);
        let (errors, _) = cross_ref(&artifact);
        assert_eq!(
            errors,
            vec![
                "execution_log[3] must be an object".to_string(),
                "Task T1: commit_message 'wip' does not match required format \
                 '<type>(<scope>): <summary>'"
                    .to_string(),
            ]
        );
    }

    #[test]
    fn detail_branch_must_match_task() {
        let mut artifact = valid_artifact();
        artifact["implementation_report"]["task_details"][0]["branch_name"] = json!("fix/login");
        let (errors, _) = cross_ref(&artifact);
        assert_eq!(
            errors,
            vec![
                "Task T1: task_details branch 'fix/login' does not match task branch 'feat/login'"
                    .to_string()
            ]
        );
    }

    #[test]
    fn duplicate_task_detail_is_reported() {
        let mut artifact = valid_artifact();
        let detail = artifact["implementation_report"]["task_details"][0].clone();
        artifact["implementation_report"]["task_details"]
            .as_array_mut()
            .expect("details")
            .push(detail);
        let (errors, _) = cross_ref(&artifact);
        assert_eq!(
            errors,
            vec!["Duplicate implementation task_details entry for task T1".to_string()]
        );
    }

    #[test]
    fn done_tasks_are_checked_in_id_order() {
        let mut artifact = valid_artifact();
        let tasks = artifact["task_graph"]["tasks"].as_array_mut().expect("tasks");
        tasks.insert(0, done_task("T0", "docs/readme"));
        let (errors, done) = cross_ref(&artifact);
        assert_eq!(done, 2);
        assert_eq!(
            errors,
            vec![
                "Done task T0 is missing implementation_report.task_details entry".to_string(),
                "Done task T0 has no validation_report.task_gate entries".to_string(),
                "Done task T0 is missing branch delivery".to_string(),
                "Done task T0 has no execution_log entries".to_string(),
            ]
        );
    }

    #[test]
    fn self_dependency_is_not_rejected() {
        let mut artifact = valid_artifact();
        artifact["task_graph"]["tasks"][0]["depends_on"] = json!(["T1"]);
        let (errors, _) = cross_ref(&artifact);
        assert!(errors.is_empty(), "{errors:?}");
    }
}
