use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{GoalCompletion, GoalType};
use crate::session::Actor;
use crate::task::Task;

/// Converts a task into a fresh feed record.
///
/// A non-blank `comment` replaces the task description. Automatic sharing on
/// completion and explicit sharing both go through here.
pub fn project(
    task: &Task,
    actor: &Actor,
    comment: Option<&str>,
    now: DateTime<Utc>,
) -> GoalCompletion {
    let description = match comment.map(str::trim) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => task.description.clone(),
    };

    GoalCompletion {
        id: Uuid::new_v4().to_string(),
        user_id: actor.user_id.clone(),
        username: actor.username.clone(),
        goal_title: task.title.clone(),
        description,
        duration: task.duration_minutes(),
        points: task.points,
        completed_at: now,
        goal_type: GoalType::from(task.category),
        likes: 0,
        comments: Vec::new(),
    }
}
