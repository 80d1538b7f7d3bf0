use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::classify::classify_row;
use crate::models::{
    ColumnMapping, DashboardData, PersonStats, ProjectStats, RawRow, Task, TaskSummary,
};

pub const DEFAULT_SPRINT_DAYS: u32 = 15;

const REGULAR_CAPACITY_HOURS: f64 = 80.0;
const INTERN_CAPACITY_HOURS: f64 = 40.0;
const REFERENCE_SPRINT_DAYS: f64 = 15.0;

#[derive(Default)]
struct PersonAcc {
    order: usize,
    total_hours: f64,
    estimated_hours: f64,
    tasks_completed: usize,
    tasks_open: usize,
    tasks: Vec<Task>,
}

#[derive(Default)]
struct ProjectAcc {
    order: usize,
    total_tasks: usize,
    completed_tasks: usize,
    open_tasks: usize,
    estimated_hours: f64,
    actual_hours: f64,
}

/// Expected loggable hours for the configured sprint, normalized from the
/// 15-day reference: 80h full-time, 40h for interns.
pub fn sprint_capacity(is_intern: bool, sprint_days: u32) -> f64 {
    let base = if is_intern {
        INTERN_CAPACITY_HOURS
    } else {
        REGULAR_CAPACITY_HOURS
    };
    base / REFERENCE_SPRINT_DAYS * sprint_days as f64
}

/// Builds the full dashboard from raw rows in one linear pass. Pure and
/// stateless: recomputes everything from scratch on every call, so changing
/// the intern set just means calling again. No row is ever skipped; a row
/// with nothing mapped still contributes one zeroed task.
pub fn aggregate(
    rows: &[RawRow],
    mapping: &ColumnMapping,
    sprint_days: u32,
    intern_names: &HashSet<String>,
) -> DashboardData {
    let mut people: HashMap<String, PersonAcc> = HashMap::new();
    let mut projects: HashMap<String, ProjectAcc> = HashMap::new();
    let mut tasks_by_project: BTreeMap<String, Vec<TaskSummary>> = BTreeMap::new();

    let mut total_hours = 0.0;
    let mut total_tasks = 0;
    let mut completed_tasks = 0;
    let mut open_tasks = 0;

    for row in rows {
        let classified = classify_row(row, mapping);
        let assignee = classified.assignee.label().to_string();
        let project = classified.project.label().to_string();

        let task = Task {
            name: classified.task_name.clone(),
            estimated_hours: classified.estimated_hours,
            actual_hours: classified.hours,
            status: classified.status.clone(),
            is_completed: classified.is_completed,
            project: project.clone(),
            date: classified.date.clone(),
        };

        let next_order = people.len();
        let person = people.entry(assignee.clone()).or_insert_with(|| PersonAcc {
            order: next_order,
            ..PersonAcc::default()
        });
        person.total_hours += classified.hours;
        person.estimated_hours += classified.estimated_hours;
        if classified.is_completed {
            person.tasks_completed += 1;
        } else {
            person.tasks_open += 1;
        }
        person.tasks.push(task);

        let next_order = projects.len();
        let project_acc = projects.entry(project.clone()).or_insert_with(|| ProjectAcc {
            order: next_order,
            ..ProjectAcc::default()
        });
        project_acc.total_tasks += 1;
        project_acc.estimated_hours += classified.estimated_hours;
        project_acc.actual_hours += classified.hours;
        if classified.is_completed {
            project_acc.completed_tasks += 1;
        } else {
            project_acc.open_tasks += 1;
        }

        tasks_by_project
            .entry(project)
            .or_default()
            .push(TaskSummary {
                name: classified.task_name,
                assignee,
                hours: classified.hours,
                estimated_hours: classified.estimated_hours,
                is_completed: classified.is_completed,
                status: classified.status,
            });

        total_hours += classified.hours;
        total_tasks += 1;
        if classified.is_completed {
            completed_tasks += 1;
        } else {
            open_tasks += 1;
        }
    }

    DashboardData {
        person_stats: finalize_people(people, sprint_days, intern_names),
        project_stats: finalize_projects(projects),
        total_hours,
        total_tasks,
        completed_tasks,
        open_tasks,
        tasks_by_project,
    }
}

fn finalize_people(
    people: HashMap<String, PersonAcc>,
    sprint_days: u32,
    intern_names: &HashSet<String>,
) -> Vec<PersonStats> {
    let mut entries: Vec<(String, PersonAcc)> = people.into_iter().collect();
    // First-encountered order before the stable sort, so ties keep it.
    entries.sort_by_key(|(_, acc)| acc.order);

    let mut stats: Vec<PersonStats> = entries
        .into_iter()
        .map(|(name, acc)| {
            let is_intern = intern_names.contains(&name);
            let capacity = sprint_capacity(is_intern, sprint_days);
            PersonStats {
                total_hours: acc.total_hours,
                estimated_hours: acc.estimated_hours,
                tasks_completed: acc.tasks_completed,
                tasks_open: acc.tasks_open,
                total_tasks: acc.tasks_completed + acc.tasks_open,
                capacity_usage: acc.total_hours / capacity * 100.0,
                is_intern,
                tasks: acc.tasks,
                name,
            }
        })
        .collect();

    stats.sort_by(|a, b| {
        b.total_hours
            .partial_cmp(&a.total_hours)
            .unwrap_or(Ordering::Equal)
    });
    stats
}

fn finalize_projects(projects: HashMap<String, ProjectAcc>) -> Vec<ProjectStats> {
    let mut entries: Vec<(String, ProjectAcc)> = projects.into_iter().collect();
    entries.sort_by_key(|(_, acc)| acc.order);

    let mut stats: Vec<ProjectStats> = entries
        .into_iter()
        .map(|(name, acc)| ProjectStats {
            completion_percentage: if acc.total_tasks > 0 {
                acc.completed_tasks as f64 / acc.total_tasks as f64 * 100.0
            } else {
                0.0
            },
            total_tasks: acc.total_tasks,
            completed_tasks: acc.completed_tasks,
            open_tasks: acc.open_tasks,
            estimated_hours: acc.estimated_hours,
            actual_hours: acc.actual_hours,
            name,
        })
        .collect();

    stats.sort_by(|a, b| {
        b.completion_percentage
            .partial_cmp(&a.completion_percentage)
            .unwrap_or(Ordering::Equal)
    });
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NO_PROJECT, UNASSIGNED};

    fn row(cells: &[(&str, &str)]) -> RawRow {
        cells
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn mapping() -> ColumnMapping {
        ColumnMapping {
            assignee: Some("Owner".to_string()),
            hours: Some("Spent".to_string()),
            estimated_hours: Some("Estimate".to_string()),
            status: Some("State".to_string()),
            project: Some("Project".to_string()),
            tags: None,
            date: None,
            task_name: Some("Summary".to_string()),
        }
    }

    fn sample_rows() -> Vec<RawRow> {
        vec![
            row(&[
                ("Owner", "Ana"),
                ("Spent", "4h"),
                ("Estimate", "6"),
                ("State", "Done"),
                ("Project", "Alpha"),
                ("Summary", "Login fix"),
            ]),
            row(&[
                ("Owner", "Bruno"),
                ("Spent", "2:30"),
                ("Estimate", "2"),
                ("State", "In Progress"),
                ("Project", "Alpha"),
                ("Summary", "Search index"),
            ]),
            row(&[
                ("Owner", "Ana"),
                ("Spent", "1,5"),
                ("Estimate", "1"),
                ("State", "to-do"),
                ("Project", "Beta"),
                ("Summary", "Docs pass"),
            ]),
        ]
    }

    #[test]
    fn single_completed_row_scenario() {
        let rows = vec![row(&[
            ("Owner", "Ana"),
            ("Spent", "4h"),
            ("State", "Done"),
            ("Project", "Alpha"),
        ])];
        let data = aggregate(&rows, &mapping(), 15, &HashSet::new());

        assert_eq!(data.person_stats.len(), 1);
        let ana = &data.person_stats[0];
        assert_eq!(ana.name, "Ana");
        assert!((ana.total_hours - 4.0).abs() < 1e-9);
        assert_eq!(ana.total_tasks, 1);
        assert_eq!(ana.tasks_completed, 1);
        assert_eq!(ana.tasks_open, 0);

        assert_eq!(data.project_stats.len(), 1);
        let alpha = &data.project_stats[0];
        assert_eq!(alpha.name, "Alpha");
        assert_eq!(alpha.total_tasks, 1);
        assert_eq!(alpha.completed_tasks, 1);
        assert!((alpha.completion_percentage - 100.0).abs() < 1e-9);
    }

    #[test]
    fn person_and_project_invariants_hold() {
        let data = aggregate(&sample_rows(), &mapping(), 15, &HashSet::new());

        for person in &data.person_stats {
            assert_eq!(person.total_tasks, person.tasks_completed + person.tasks_open);
            assert_eq!(person.tasks.len(), person.total_tasks);
        }
        for project in &data.project_stats {
            assert_eq!(project.total_tasks, project.completed_tasks + project.open_tasks);
        }

        let hours_sum: f64 = data.person_stats.iter().map(|p| p.total_hours).sum();
        assert!((hours_sum - data.total_hours).abs() < 1e-9);
        let tasks_sum: usize = data.person_stats.iter().map(|p| p.total_tasks).sum();
        assert_eq!(tasks_sum, data.total_tasks);
        assert_eq!(data.total_tasks, data.completed_tasks + data.open_tasks);
    }

    #[test]
    fn people_sorted_by_hours_projects_by_completion() {
        let data = aggregate(&sample_rows(), &mapping(), 15, &HashSet::new());

        let names: Vec<&str> = data.person_stats.iter().map(|p| p.name.as_str()).collect();
        // Ana logged 5.5h, Bruno 2.5h.
        assert_eq!(names, vec!["Ana", "Bruno"]);

        let projects: Vec<&str> = data.project_stats.iter().map(|p| p.name.as_str()).collect();
        // Alpha is 50% complete, Beta 0%.
        assert_eq!(projects, vec!["Alpha", "Beta"]);
    }

    #[test]
    fn tie_on_sort_key_keeps_first_encountered_order() {
        let rows = vec![
            row(&[("Owner", "Bruno"), ("Spent", "3"), ("State", "open")]),
            row(&[("Owner", "Ana"), ("Spent", "3"), ("State", "open")]),
        ];
        let data = aggregate(&rows, &mapping(), 15, &HashSet::new());
        let names: Vec<&str> = data.person_stats.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Bruno", "Ana"]);
    }

    #[test]
    fn capacity_usage_accounts_for_interns() {
        let rows = vec![
            row(&[("Owner", "Ana"), ("Spent", "40"), ("State", "open")]),
            row(&[("Owner", "Bruno"), ("Spent", "40"), ("State", "open")]),
        ];
        let interns: HashSet<String> = ["Ana".to_string()].into_iter().collect();
        let data = aggregate(&rows, &mapping(), 15, &interns);

        let ana = data.person_stats.iter().find(|p| p.name == "Ana").unwrap();
        let bruno = data.person_stats.iter().find(|p| p.name == "Bruno").unwrap();
        assert!(ana.is_intern);
        assert!((ana.capacity_usage - 100.0).abs() < 1e-9);
        assert!(!bruno.is_intern);
        assert!((bruno.capacity_usage - 50.0).abs() < 1e-9);
    }

    #[test]
    fn capacity_scales_with_sprint_days() {
        assert!((sprint_capacity(false, 15) - 80.0).abs() < 1e-9);
        assert!((sprint_capacity(true, 15) - 40.0).abs() < 1e-9);
        assert!((sprint_capacity(false, 30) - 160.0).abs() < 1e-9);
        assert!((sprint_capacity(true, 5) - (40.0 / 15.0 * 5.0)).abs() < 1e-9);
    }

    #[test]
    fn aggregation_is_idempotent() {
        let rows = sample_rows();
        let interns: HashSet<String> = ["Ana".to_string()].into_iter().collect();
        let first = aggregate(&rows, &mapping(), 10, &interns);
        let second = aggregate(&rows, &mapping(), 10, &interns);
        assert_eq!(first, second);
    }

    #[test]
    fn rows_with_nothing_mapped_are_never_dropped() {
        let rows = vec![row(&[("Unrelated", "x")]), RawRow::new()];
        let data = aggregate(&rows, &ColumnMapping::default(), 15, &HashSet::new());

        assert_eq!(data.total_tasks, 2);
        assert_eq!(data.person_stats.len(), 1);
        assert_eq!(data.person_stats[0].name, UNASSIGNED);
        assert_eq!(data.person_stats[0].total_tasks, 2);
        assert_eq!(data.person_stats[0].total_hours, 0.0);
        assert_eq!(data.project_stats[0].name, NO_PROJECT);
    }

    #[test]
    fn tasks_by_project_carries_summaries_in_row_order() {
        let data = aggregate(&sample_rows(), &mapping(), 15, &HashSet::new());

        let alpha = &data.tasks_by_project["Alpha"];
        assert_eq!(alpha.len(), 2);
        assert_eq!(alpha[0].name, "Login fix");
        assert_eq!(alpha[0].assignee, "Ana");
        assert!(alpha[0].is_completed);
        assert_eq!(alpha[1].name, "Search index");
        assert_eq!(alpha[1].assignee, "Bruno");
        assert!(!alpha[1].is_completed);

        let beta = &data.tasks_by_project["Beta"];
        assert_eq!(beta.len(), 1);
        assert!((beta[0].hours - 1.5).abs() < 1e-9);
    }

    #[test]
    fn person_task_list_preserves_row_order_across_projects() {
        let data = aggregate(&sample_rows(), &mapping(), 15, &HashSet::new());
        let ana = data.person_stats.iter().find(|p| p.name == "Ana").unwrap();
        let task_names: Vec<&str> = ana.tasks.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(task_names, vec!["Login fix", "Docs pass"]);
    }
}
