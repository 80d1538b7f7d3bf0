use std::fmt::Write;

use chrono::NaiveDate;

use crate::models::DashboardData;
use crate::rank;

const PERFORMER_LIST_LEN: usize = 5;

pub fn build_report(data: &DashboardData, sprint_days: u32, generated_on: NaiveDate) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Sprint Dashboard Report");
    let _ = writeln!(
        output,
        "Generated on {} for a {}-day sprint",
        generated_on, sprint_days
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Totals");
    let _ = writeln!(output, "- Hours logged: {:.1}", data.total_hours);
    let _ = writeln!(
        output,
        "- Tasks: {} ({} completed, {} open)",
        data.total_tasks, data.completed_tasks, data.open_tasks
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## People");

    if data.person_stats.is_empty() {
        let _ = writeln!(output, "No people found in this export.");
    } else {
        for person in &data.person_stats {
            let intern_tag = if person.is_intern { " [intern]" } else { "" };
            let _ = writeln!(
                output,
                "- {}{}: {:.1}h logged ({:.0}% of capacity), {}/{} tasks completed",
                person.name,
                intern_tag,
                person.total_hours,
                person.capacity_usage,
                person.tasks_completed,
                person.total_tasks
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Projects");

    if data.project_stats.is_empty() {
        let _ = writeln!(output, "No projects found in this export.");
    } else {
        for project in &data.project_stats {
            let _ = writeln!(
                output,
                "- {}: {:.0}% complete ({}/{} tasks, {:.1}h logged vs {:.1}h estimated)",
                project.name,
                project.completion_percentage,
                project.completed_tasks,
                project.total_tasks,
                project.actual_hours,
                project.estimated_hours
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Top Performers");
    for person in rank::top_performers(&data.person_stats, PERFORMER_LIST_LEN) {
        let _ = writeln!(
            output,
            "- {}: {} tasks completed, {:.1}h logged",
            person.name, person.tasks_completed, person.total_hours
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Low Performers");
    for person in rank::low_performers(&data.person_stats, PERFORMER_LIST_LEN) {
        let _ = writeln!(
            output,
            "- {}: {:.1}h logged, {} tasks completed",
            person.name, person.total_hours, person.tasks_completed
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Tasks by Project");
    for (project, tasks) in &data.tasks_by_project {
        let _ = writeln!(output, "- {}: {} tasks", project, tasks.len());
    }

    output
}
