//! Task types, the in-memory task store and its sorted/filtered view.

mod sort;
mod store;

pub use sort::{sorted_view, SortOption};
pub use store::TaskStore;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Category of a task.
///
/// Closed set; each category carries an icon and color for display, which
/// play no part in reward or streak computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskCategory {
    Academic,
    Fitness,
    Household,
    Wellness,
    Custom,
}

impl TaskCategory {
    pub const ALL: [TaskCategory; 5] = [
        TaskCategory::Academic,
        TaskCategory::Fitness,
        TaskCategory::Household,
        TaskCategory::Wellness,
        TaskCategory::Custom,
    ];

    /// Stable name, also the key used when sorting by category.
    pub fn name(&self) -> &'static str {
        match self {
            TaskCategory::Academic => "academic",
            TaskCategory::Fitness => "fitness",
            TaskCategory::Household => "household",
            TaskCategory::Wellness => "wellness",
            TaskCategory::Custom => "custom",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            TaskCategory::Academic => "book.fill",
            TaskCategory::Fitness => "figure.run",
            TaskCategory::Household => "house.fill",
            TaskCategory::Wellness => "heart.fill",
            TaskCategory::Custom => "star.fill",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            TaskCategory::Academic => "#3b82f6",
            TaskCategory::Fitness => "#22c55e",
            TaskCategory::Household => "#f97316",
            TaskCategory::Wellness => "#a855f7",
            TaskCategory::Custom => "#6b7280",
        }
    }
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TaskCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        TaskCategory::ALL
            .into_iter()
            .find(|category| category.name() == wanted)
            .ok_or_else(|| {
                ValidationError::invalid(
                    "category",
                    format!(
                        "'{s}' is not one of academic, fitness, household, wellness, custom"
                    ),
                )
            })
    }
}

/// A unit of work that earns screen time when completed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier, assigned at creation
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: TaskCategory,
    /// Reward duration in seconds, credited to the ledger on completion
    pub duration_secs: u64,
    /// Reward weight
    pub points: u32,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    /// Set at creation, never mutated
    pub created_date: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn from_draft(draft: TaskDraft, id: String, created_date: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            category: draft.category,
            duration_secs: draft.duration_secs,
            points: draft.points,
            is_completed: false,
            due_date: draft.due_date,
            created_date,
            completed_at: None,
        }
    }

    /// Whole minutes of reward, truncated.
    pub fn duration_minutes(&self) -> u64 {
        self.duration_secs / 60
    }

    /// Whether the task was created on `day` as seen from `offset`.
    pub fn created_on(&self, day: NaiveDate, offset: FixedOffset) -> bool {
        self.created_date.with_timezone(&offset).date_naive() == day
    }
}

/// Caller-supplied fields for a new task.
///
/// A non-empty title is the caller's responsibility.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub category: TaskCategory,
    pub duration_secs: u64,
    pub points: u32,
    pub due_date: Option<DateTime<Utc>>,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>, category: TaskCategory) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            category,
            duration_secs: 0,
            points: 0,
            due_date: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn duration_secs(mut self, secs: u64) -> Self {
        self.duration_secs = secs;
        self
    }

    pub fn points(mut self, points: u32) -> Self {
        self.points = points;
        self
    }

    pub fn due(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

/// Starter tasks for a fresh install.
pub fn sample_drafts(now: DateTime<Utc>) -> Vec<TaskDraft> {
    vec![
        TaskDraft::new("Finish math homework", TaskCategory::Academic)
            .description("Chapter 5 problem set")
            .duration_secs(60 * 60)
            .points(50)
            .due(now + Duration::days(1)),
        TaskDraft::new("Morning run", TaskCategory::Fitness)
            .description("30 minutes around the park")
            .duration_secs(30 * 60)
            .points(30),
        TaskDraft::new("Clean the kitchen", TaskCategory::Household)
            .duration_secs(20 * 60)
            .points(20)
            .due(now + Duration::hours(6)),
        TaskDraft::new("Meditate", TaskCategory::Wellness)
            .description("Ten quiet minutes")
            .duration_secs(10 * 60)
            .points(15),
    ]
}
