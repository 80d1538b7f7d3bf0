use crate::models::{Assignee, ColumnMapping, Project, RawRow, UNNAMED_TASK};
use crate::timeparse::parse_time_to_hours;

/// Status substrings that mark a task as completed. Matching is substring,
/// not exact, over the lowercased status cell; everything else counts as open.
const COMPLETION_KEYWORDS: [&str; 6] = [
    "complete",
    "concluído",
    "done",
    "fechado",
    "closed",
    "accepted",
];

/// Everything the aggregator needs from one raw row.
#[derive(Debug, Clone)]
pub struct ClassifiedRow {
    pub assignee: Assignee,
    pub hours: f64,
    pub estimated_hours: f64,
    pub status: String,
    pub is_completed: bool,
    pub project: Project,
    pub task_name: String,
    pub date: Option<String>,
}

/// Derives the semantic fields of one row under the given mapping. Total:
/// missing columns and empty cells fall back to defaults and sentinels, so
/// every row classifies to exactly one task.
pub fn classify_row(row: &RawRow, mapping: &ColumnMapping) -> ClassifiedRow {
    let status = cell(row, &mapping.status)
        .unwrap_or("")
        .trim()
        .to_lowercase();
    let is_completed = is_completed_status(&status);

    ClassifiedRow {
        assignee: derive_assignee(row, mapping),
        hours: parse_time_to_hours(cell(row, &mapping.hours).unwrap_or("")),
        estimated_hours: parse_time_to_hours(cell(row, &mapping.estimated_hours).unwrap_or("")),
        status,
        is_completed,
        project: derive_project(row, mapping),
        task_name: derive_task_name(row, mapping),
        date: cell(row, &mapping.date).map(str::to_string),
    }
}

pub fn is_completed_status(status: &str) -> bool {
    COMPLETION_KEYWORDS
        .iter()
        .any(|keyword| status.contains(keyword))
}

fn cell<'a>(row: &'a RawRow, column: &Option<String>) -> Option<&'a str> {
    column
        .as_deref()
        .and_then(|name| row.get(name))
        .map(String::as_str)
}

fn derive_assignee(row: &RawRow, mapping: &ColumnMapping) -> Assignee {
    let raw = match cell(row, &mapping.assignee) {
        // No mapped column, or the cell is truly empty.
        None | Some("") => return Assignee::Unassigned,
        Some(value) => value.trim(),
    };

    // Some trackers export assignee lists as `[name]`; strip one bracket pair.
    let stripped = raw.strip_prefix('[').unwrap_or(raw);
    let stripped = stripped.strip_suffix(']').unwrap_or(stripped);
    let name = stripped.trim();

    if name.is_empty() || name == "[]" {
        Assignee::Ownerless
    } else {
        Assignee::Named(name.to_string())
    }
}

fn derive_project(row: &RawRow, mapping: &ColumnMapping) -> Project {
    let source = if mapping.project.is_some() {
        cell(row, &mapping.project)
    } else if mapping.tags.is_some() {
        cell(row, &mapping.tags)
    } else {
        return Project::Unlabeled;
    };

    // First entry of a comma-separated list names the project.
    let first = source
        .unwrap_or("")
        .split(',')
        .next()
        .unwrap_or("")
        .trim();

    if first.is_empty() {
        Project::Unlabeled
    } else {
        Project::Named(first.to_string())
    }
}

fn derive_task_name(row: &RawRow, mapping: &ColumnMapping) -> String {
    let name = cell(row, &mapping.task_name).unwrap_or("").trim();
    if name.is_empty() {
        UNNAMED_TASK.to_string()
    } else {
        name.to_string()
    }
}
