//! Task management commands for CLI.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use clap::Subcommand;
use screentime_core::{sample_drafts, SortOption, Task, TaskCategory, TaskDraft};

use super::{format_secs, Output};
use crate::context::AppContext;

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a new task
    Add {
        /// Task title
        title: String,
        /// academic, fitness, household, wellness or custom
        #[arg(long, default_value = "custom")]
        category: String,
        /// Task description
        #[arg(long, default_value = "")]
        description: String,
        /// Minutes of screen time earned on completion
        #[arg(long, default_value = "30")]
        minutes: u64,
        /// Points shown in the feed
        #[arg(long, default_value = "10")]
        points: u32,
        /// Due date (RFC 3339 or YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
    },
    /// List tasks
    List {
        /// due, category or points
        #[arg(long, default_value = "due")]
        sort: String,
        /// Only show this category
        #[arg(long)]
        category: Option<String>,
        /// Only show pending tasks
        #[arg(long, conflicts_with = "completed")]
        pending: bool,
        /// Only show completed tasks
        #[arg(long)]
        completed: bool,
    },
    /// Complete a task and earn its screen time
    Complete {
        /// Task ID
        id: String,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },
    /// Add a few starter tasks
    Seed,
}

fn parse_due(raw: &str, offset: FixedOffset) -> Result<DateTime<Utc>, Box<dyn std::error::Error>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Ok(at.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| format!("invalid due date '{raw}': expected RFC 3339 or YYYY-MM-DD"))?;
    let at = date
        .and_hms_opt(0, 0, 0)
        .and_then(|naive| naive.and_local_timezone(offset).single())
        .ok_or_else(|| format!("invalid due date '{raw}'"))?;
    Ok(at.with_timezone(&Utc))
}

fn task_line(task: &Task) -> String {
    let mark = if task.is_completed { "x" } else { " " };
    let due = task
        .due_date
        .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "[{mark}] {}  {} {:<9} {:>4}m {:>4}pt  due {due}  {}",
        task.id,
        task.category.icon(),
        task.category.name(),
        task.duration_minutes(),
        task.points,
        task.title
    )
}

pub fn run(action: TaskAction, out: Output) -> Result<(), Box<dyn std::error::Error>> {
    let mut ctx = AppContext::open()?;

    match action {
        TaskAction::Add {
            title,
            category,
            description,
            minutes,
            points,
            due,
        } => {
            if title.trim().is_empty() {
                return Err("task title must not be empty".into());
            }
            let category: TaskCategory = category.parse()?;
            let mut draft = TaskDraft::new(title.trim(), category)
                .description(description)
                .duration_secs(minutes.saturating_mul(60))
                .points(points);
            if let Some(raw) = due {
                let offset = ctx.manager.settings().utc_offset;
                draft = draft.due(parse_due(&raw, offset)?);
            }
            let task = ctx.manager.add_task(draft);
            ctx.save()?;
            out.emit(&task, || format!("Task created: {}", task.id))?;
        }
        TaskAction::List {
            sort,
            category,
            pending,
            completed,
        } => {
            let sort: SortOption = sort.parse()?;
            let filter = category
                .map(|c| c.parse::<TaskCategory>())
                .transpose()?;
            let tasks: Vec<Task> = ctx
                .manager
                .sorted_view(sort, filter)
                .into_iter()
                .filter(|t| !pending || !t.is_completed)
                .filter(|t| !completed || t.is_completed)
                .collect();
            out.emit(&tasks, || {
                if tasks.is_empty() {
                    "no tasks".to_string()
                } else {
                    tasks.iter().map(task_line).collect::<Vec<_>>().join("\n")
                }
            })?;
        }
        TaskAction::Complete { id } => {
            let outcome = ctx
                .manager
                .complete_task(&id)?
                .ok_or_else(|| format!("task not found: {id}"))?;
            ctx.save()?;
            out.emit(&outcome, || {
                let mut text = format!(
                    "Completed '{}': +{} screen time, allowance {}",
                    outcome.task.title,
                    format_secs(outcome.task.duration_secs as f64),
                    format_secs(outcome.allowance_secs)
                );
                if outcome.streak_incremented {
                    text.push_str(&format!("\nStreak up! Weekly streak: {}", outcome.weekly_streak));
                }
                text
            })?;
        }
        TaskAction::Delete { id } => {
            let task = ctx
                .manager
                .delete_task(&id)
                .ok_or_else(|| format!("task not found: {id}"))?;
            ctx.save()?;
            out.emit(&task, || format!("Task deleted: {}", task.id))?;
        }
        TaskAction::Seed => {
            let now = ctx.manager.now();
            let created: Vec<Task> = sample_drafts(now)
                .into_iter()
                .map(|draft| ctx.manager.add_task(draft))
                .collect();
            ctx.save()?;
            out.emit(&created, || format!("Added {} sample tasks", created.len()))?;
        }
    }
    Ok(())
}
