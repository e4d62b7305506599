//! Structural validation: presence and type of every required section and key.
//!
//! Produces borrowed [`Sections`] for the cross-reference pass. The two abort
//! conditions (missing top-level keys, malformed `task_graph`) return `None`.

use serde_json::Value;

use crate::core::value::{Object, missing_keys};

/// Required top-level keys, sorted.
pub const REQUIRED_TOP_LEVEL_KEYS: [&str; 15] = [
    "blocking_questions",
    "branch_deliveries",
    "configuration_steps",
    "decisions_required",
    "escalations",
    "execution_log",
    "final_status",
    "implementation_report",
    "planning_report",
    "project_profile",
    "run_summary",
    "sources",
    "task_graph",
    "test_report",
    "validation_report",
];

const RUN_SUMMARY_KEYS: [&str; 3] = ["objective", "mode", "status"];
const PLANNING_REPORT_KEYS: [&str; 7] = [
    "scope",
    "constraints",
    "assumptions",
    "options_considered",
    "selected_design",
    "rationale",
    "risks",
];
const PLANNING_REPORT_LISTS: [&str; 4] =
    ["constraints", "assumptions", "options_considered", "risks"];
const IMPLEMENTATION_REPORT_KEYS: [&str; 4] =
    ["what_done", "how_done", "why_done_this_way", "task_details"];
const IMPLEMENTATION_REPORT_LISTS: [&str; 3] = ["what_done", "how_done", "why_done_this_way"];
pub const TASK_DETAIL_KEYS: [&str; 5] = [
    "task_id",
    "branch_name",
    "files_changed",
    "key_changes",
    "patterns_used",
];
const TEST_REPORT_KEYS: [&str; 2] = ["business_rules", "gaps"];
const BUSINESS_RULE_KEYS: [&str; 4] = ["id", "rule", "tests", "status"];
const VALIDATION_REPORT_KEYS: [&str; 2] = ["task_gate", "global_gate"];
const SOURCE_KEYS: [&str; 3] = ["title", "url", "accessed_at"];

/// Borrowed views into a structurally sound artifact.
///
/// Sections with the wrong type have already been reported and appear empty.
#[derive(Debug, Clone)]
pub struct Sections<'a> {
    pub tasks: Vec<&'a Object>,
    pub task_details: &'a [Value],
    pub task_gate: &'a [Value],
    /// `None` when `global_gate` is not a list. A missing key reads as empty.
    pub global_gate: Option<&'a [Value]>,
    pub execution_log: &'a [Value],
    pub branch_deliveries: &'a [Value],
    pub escalations: &'a [Value],
}

/// Report every missing top-level key. Returns false if any are missing.
pub fn check_top_level(artifact: &Object, errors: &mut Vec<String>) -> bool {
    let missing = missing_keys(artifact, &REQUIRED_TOP_LEVEL_KEYS);
    for key in &missing {
        errors.push(format!("Missing top-level key: {key}"));
    }
    missing.is_empty()
}

/// Check section shapes and return the views the cross-reference pass needs.
///
/// Assumes [`check_top_level`] passed; absent sections are treated as `null`.
pub fn check_sections<'a>(artifact: &'a Object, errors: &mut Vec<String>) -> Option<Sections<'a>> {
    check_run_summary(section(artifact, "run_summary"), errors);
    check_planning_report(section(artifact, "planning_report"), errors);
    expect_list("blocking_questions", section(artifact, "blocking_questions"), errors);
    expect_list("decisions_required", section(artifact, "decisions_required"), errors);
    let task_details =
        check_implementation_report(section(artifact, "implementation_report"), errors);
    check_test_report(section(artifact, "test_report"), errors);
    let validation_report = check_validation_report(section(artifact, "validation_report"), errors);
    expect_list("configuration_steps", section(artifact, "configuration_steps"), errors);
    check_sources(section(artifact, "sources"), errors);

    let task_gate = match validation_report.and_then(|report| report.get("task_gate")) {
        None => &[][..],
        Some(Value::Array(items)) => items.as_slice(),
        Some(_) => {
            errors.push("validation_report.task_gate must be a list".to_string());
            &[][..]
        }
    };
    let global_gate = match validation_report.and_then(|report| report.get("global_gate")) {
        None => Some(&[][..]),
        Some(Value::Array(items)) => Some(items.as_slice()),
        Some(_) => {
            errors.push("validation_report.global_gate must be a list".to_string());
            None
        }
    };

    let tasks = match extract_tasks(section(artifact, "task_graph")) {
        Ok(tasks) => tasks,
        Err(err) => {
            errors.push(err);
            return None;
        }
    };

    let execution_log = list_or_report("execution_log", section(artifact, "execution_log"), errors);
    let branch_deliveries = list_or_report(
        "branch_deliveries",
        section(artifact, "branch_deliveries"),
        errors,
    );
    let escalations = list_or_report("escalations", section(artifact, "escalations"), errors);

    Some(Sections {
        tasks,
        task_details,
        task_gate,
        global_gate,
        execution_log,
        branch_deliveries,
        escalations,
    })
}

fn section<'a>(artifact: &'a Object, name: &str) -> &'a Value {
    static NULL: Value = Value::Null;
    artifact.get(name).unwrap_or(&NULL)
}

/// Accept either a task list or `{ "tasks": [...] }`; every task must be an object.
pub fn extract_tasks(task_graph: &Value) -> Result<Vec<&Object>, String> {
    let tasks = match task_graph {
        Value::Array(items) => Some(items),
        Value::Object(graph) => graph.get("tasks").and_then(Value::as_array),
        _ => None,
    };
    let Some(tasks) = tasks else {
        return Err("task_graph must be either a list or an object with a 'tasks' list".to_string());
    };

    tasks
        .iter()
        .enumerate()
        .map(|(idx, task)| {
            task.as_object()
                .ok_or_else(|| format!("task_graph.tasks[{idx}] must be an object"))
        })
        .collect()
}

fn check_run_summary(value: &Value, errors: &mut Vec<String>) {
    let Some(summary) = expect_object("run_summary", value, errors) else {
        return;
    };
    report_missing("run_summary", summary, &RUN_SUMMARY_KEYS, errors);
}

fn check_planning_report(value: &Value, errors: &mut Vec<String>) {
    let Some(report) = expect_object("planning_report", value, errors) else {
        return;
    };
    report_missing("planning_report", report, &PLANNING_REPORT_KEYS, errors);
    for key in PLANNING_REPORT_LISTS {
        if !matches!(report.get(key), Some(Value::Array(_))) {
            errors.push(format!("planning_report.{key} must be a list"));
        }
    }
}

/// Returns the `task_details` entries (empty when absent or malformed).
fn check_implementation_report<'a>(value: &'a Value, errors: &mut Vec<String>) -> &'a [Value] {
    let Some(report) = expect_object("implementation_report", value, errors) else {
        return &[];
    };
    report_missing("implementation_report", report, &IMPLEMENTATION_REPORT_KEYS, errors);
    for key in IMPLEMENTATION_REPORT_LISTS {
        if !matches!(report.get(key), Some(Value::Array(_))) {
            errors.push(format!("implementation_report.{key} must be a list"));
        }
    }

    let details = match report.get("task_details") {
        None => return &[],
        Some(Value::Array(items)) => items,
        Some(_) => {
            errors.push("implementation_report.task_details must be a list".to_string());
            return &[];
        }
    };
    for (idx, detail) in details.iter().enumerate() {
        let location = format!("implementation_report.task_details[{idx}]");
        let Some(detail) = expect_object(&location, detail, errors) else {
            continue;
        };
        report_missing(&location, detail, &TASK_DETAIL_KEYS, errors);
    }
    details
}

fn check_test_report(value: &Value, errors: &mut Vec<String>) {
    let Some(report) = expect_object("test_report", value, errors) else {
        return;
    };
    report_missing("test_report", report, &TEST_REPORT_KEYS, errors);

    match report.get("business_rules") {
        None => {}
        Some(Value::Array(rules)) => {
            for (idx, rule) in rules.iter().enumerate() {
                let location = format!("test_report.business_rules[{idx}]");
                let Some(rule) = expect_object(&location, rule, errors) else {
                    continue;
                };
                // Listed in declaration order, not sorted.
                for key in BUSINESS_RULE_KEYS {
                    if !rule.contains_key(key) {
                        errors.push(format!("{location} missing key: {key}"));
                    }
                }
                if !matches!(rule.get("tests"), Some(Value::Array(_))) {
                    errors.push(format!("{location}.tests must be a list"));
                }
            }
        }
        Some(_) => errors.push("test_report.business_rules must be a list".to_string()),
    }

    if let Some(gaps) = report.get("gaps") {
        expect_list("test_report.gaps", gaps, errors);
    }
}

fn check_validation_report<'a>(value: &'a Value, errors: &mut Vec<String>) -> Option<&'a Object> {
    let report = expect_object("validation_report", value, errors)?;
    report_missing("validation_report", report, &VALIDATION_REPORT_KEYS, errors);
    Some(report)
}

fn check_sources(value: &Value, errors: &mut Vec<String>) {
    let Value::Array(sources) = value else {
        errors.push("sources must be a list".to_string());
        return;
    };
    if sources.is_empty() {
        errors.push(
            "sources must include at least one entry for implementation guidance".to_string(),
        );
        return;
    }
    for (idx, source) in sources.iter().enumerate() {
        let location = format!("sources[{idx}]");
        let Some(source) = expect_object(&location, source, errors) else {
            continue;
        };
        report_missing(&location, source, &SOURCE_KEYS, errors);
    }
}

fn expect_object<'a>(
    location: &str,
    value: &'a Value,
    errors: &mut Vec<String>,
) -> Option<&'a Object> {
    let object = value.as_object();
    if object.is_none() {
        errors.push(format!("{location} must be an object"));
    }
    object
}

fn expect_list(location: &str, value: &Value, errors: &mut Vec<String>) {
    if !value.is_array() {
        errors.push(format!("{location} must be a list"));
    }
}

fn list_or_report<'a>(location: &str, value: &'a Value, errors: &mut Vec<String>) -> &'a [Value] {
    match value {
        Value::Array(items) => items.as_slice(),
        _ => {
            errors.push(format!("{location} must be a list"));
            &[]
        }
    }
}

fn report_missing(location: &str, object: &Object, required: &[&str], errors: &mut Vec<String>) {
    for key in missing_keys(object, required) {
        errors.push(format!("{location} missing key: {key}"));
    }
}
