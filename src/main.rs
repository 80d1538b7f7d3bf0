use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};

mod aggregate;
mod classify;
mod ingest;
mod models;
mod rank;
mod report;
mod timeparse;

use models::{ColumnMapping, DashboardData};

#[derive(Parser)]
#[command(name = "sprint-dashboard")]
#[command(about = "Productivity dashboard builder for task-tracking CSV exports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct InputArgs {
    /// CSV export to ingest
    #[arg(long)]
    csv: PathBuf,
    /// JSON file with a saved column mapping; individual flags override it
    #[arg(long)]
    mapping: Option<PathBuf>,
    #[arg(long)]
    assignee_column: Option<String>,
    #[arg(long)]
    hours_column: Option<String>,
    #[arg(long)]
    estimated_column: Option<String>,
    #[arg(long)]
    status_column: Option<String>,
    #[arg(long)]
    project_column: Option<String>,
    #[arg(long)]
    tags_column: Option<String>,
    #[arg(long)]
    date_column: Option<String>,
    #[arg(long)]
    task_name_column: Option<String>,
    /// Sprint length in days, used for capacity
    #[arg(long, default_value_t = aggregate::DEFAULT_SPRINT_DAYS)]
    sprint_days: u32,
    /// Person with intern capacity (40h per sprint); repeat per name
    #[arg(long = "intern")]
    interns: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate the export and print the dashboard
    Dashboard {
        #[command(flatten)]
        input: InputArgs,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Write a markdown report
    Report {
        #[command(flatten)]
        input: InputArgs,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
    /// List the strongest or weakest contributors
    #[command(group(
        ArgGroup::new("direction")
            .args(["top", "low"])
            .required(true)
            .multiple(false)
    ))]
    Performers {
        #[command(flatten)]
        input: InputArgs,
        /// Show the N people with the most completed tasks
        #[arg(long)]
        top: Option<usize>,
        /// Show the N people with the fewest logged hours
        #[arg(long)]
        low: Option<usize>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Dashboard { input, format } => {
            let data = build_dashboard(&input)?;
            match format {
                OutputFormat::Text => print_dashboard(&data),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&data)?),
            }
        }
        Commands::Report { input, out } => {
            let data = build_dashboard(&input)?;
            let report = report::build_report(
                &data,
                input.sprint_days,
                chrono::Utc::now().date_naive(),
            );
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
        Commands::Performers { input, top, low } => {
            let data = build_dashboard(&input)?;
            if let Some(count) = top {
                println!("Top performers by completed tasks:");
                for person in rank::top_performers(&data.person_stats, count) {
                    println!(
                        "- {}: {} completed, {:.1}h logged",
                        person.name, person.tasks_completed, person.total_hours
                    );
                }
            } else if let Some(count) = low {
                println!("Low performers by logged hours:");
                for person in rank::low_performers(&data.person_stats, count) {
                    println!(
                        "- {}: {:.1}h logged, {} completed",
                        person.name, person.total_hours, person.tasks_completed
                    );
                }
            }
        }
    }

    Ok(())
}

fn build_dashboard(input: &InputArgs) -> anyhow::Result<DashboardData> {
    let csv_data = ingest::load_csv(&input.csv)?;
    let mapping = resolve_mapping(input)?;
    let intern_names: HashSet<String> = input.interns.iter().cloned().collect();
    Ok(aggregate::aggregate(
        &csv_data.rows,
        &mapping,
        input.sprint_days,
        &intern_names,
    ))
}

fn resolve_mapping(input: &InputArgs) -> anyhow::Result<ColumnMapping> {
    let mut mapping = match &input.mapping {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("invalid column mapping in {}", path.display()))?
        }
        None => ColumnMapping::default(),
    };

    if input.assignee_column.is_some() {
        mapping.assignee = input.assignee_column.clone();
    }
    if input.hours_column.is_some() {
        mapping.hours = input.hours_column.clone();
    }
    if input.estimated_column.is_some() {
        mapping.estimated_hours = input.estimated_column.clone();
    }
    if input.status_column.is_some() {
        mapping.status = input.status_column.clone();
    }
    if input.project_column.is_some() {
        mapping.project = input.project_column.clone();
    }
    if input.tags_column.is_some() {
        mapping.tags = input.tags_column.clone();
    }
    if input.date_column.is_some() {
        mapping.date = input.date_column.clone();
    }
    if input.task_name_column.is_some() {
        mapping.task_name = input.task_name_column.clone();
    }

    Ok(mapping)
}

fn print_dashboard(data: &DashboardData) {
    println!(
        "Totals: {:.1}h logged across {} tasks ({} completed, {} open)",
        data.total_hours, data.total_tasks, data.completed_tasks, data.open_tasks
    );

    println!();
    println!("People by hours logged:");
    for person in &data.person_stats {
        let intern_tag = if person.is_intern { " [intern]" } else { "" };
        println!(
            "- {}{}: {:.1}h ({:.0}% of capacity), {}/{} tasks completed",
            person.name,
            intern_tag,
            person.total_hours,
            person.capacity_usage,
            person.tasks_completed,
            person.total_tasks
        );
    }

    println!();
    println!("Projects by completion:");
    for project in &data.project_stats {
        println!(
            "- {}: {:.0}% ({}/{} tasks, {:.1}h logged vs {:.1}h estimated)",
            project.name,
            project.completion_percentage,
            project.completed_tasks,
            project.total_tasks,
            project.actual_hours,
            project.estimated_hours
        );
    }
}
