use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// One CSV data line, keyed by header name. Column order is irrelevant.
pub type RawRow = HashMap<String, String>;

#[derive(Debug, Clone)]
pub struct CsvData {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

/// Names the CSV column that supplies each semantic field. Every field is
/// optional; the classifier substitutes defaults for anything absent.
/// Field names stay camelCase on the wire so saved mapping files load as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColumnMapping {
    pub assignee: Option<String>,
    pub hours: Option<String>,
    pub estimated_hours: Option<String>,
    pub status: Option<String>,
    pub project: Option<String>,
    pub tags: Option<String>,
    pub date: Option<String>,
    pub task_name: Option<String>,
}

pub const UNASSIGNED: &str = "unassigned";
pub const OWNERLESS: &str = "ownerless task";
pub const NO_PROJECT: &str = "no project";
pub const UNNAMED_TASK: &str = "unnamed";

/// Who a task is credited to. The sentinel variants carry fixed labels that
/// consumers index by verbatim, so `label` must round-trip exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assignee {
    Named(String),
    /// The assignee column was never mapped, or the cell was empty.
    Unassigned,
    /// The cell held only export artifacts like `[]` or whitespace.
    Ownerless,
}

impl Assignee {
    pub fn label(&self) -> &str {
        match self {
            Assignee::Named(name) => name,
            Assignee::Unassigned => UNASSIGNED,
            Assignee::Ownerless => OWNERLESS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Project {
    Named(String),
    Unlabeled,
}

impl Project {
    pub fn label(&self) -> &str {
        match self {
            Project::Named(name) => name,
            Project::Unlabeled => NO_PROJECT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub name: String,
    pub estimated_hours: f64,
    pub actual_hours: f64,
    pub status: String,
    pub is_completed: bool,
    pub project: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonStats {
    pub name: String,
    pub total_hours: f64,
    pub estimated_hours: f64,
    pub tasks_completed: usize,
    pub tasks_open: usize,
    pub total_tasks: usize,
    /// Percentage of sprint capacity consumed. Not clamped; values over 100
    /// flow through to rendering.
    pub capacity_usage: f64,
    pub is_intern: bool,
    /// In row order, one entry per CSV line credited to this person.
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStats {
    pub name: String,
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub open_tasks: usize,
    pub completion_percentage: f64,
    pub estimated_hours: f64,
    pub actual_hours: f64,
}

/// Lightweight per-task record for the project cross-reference index, so
/// consumers can list a project's tasks without walking every person.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSummary {
    pub name: String,
    pub assignee: String,
    pub hours: f64,
    pub estimated_hours: f64,
    pub is_completed: bool,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    /// Sorted descending by total hours, ties in first-encountered order.
    pub person_stats: Vec<PersonStats>,
    /// Sorted descending by completion percentage, ties in first-encountered order.
    pub project_stats: Vec<ProjectStats>,
    pub total_hours: f64,
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub open_tasks: usize,
    /// Keyed by the exact project label, sentinel values included.
    pub tasks_by_project: BTreeMap<String, Vec<TaskSummary>>,
}
