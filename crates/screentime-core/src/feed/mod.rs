//! Achievement feed: shareable completion records, likes and comments.
//!
//! A [`GoalCompletion`] is a copy of task data taken at completion time; it
//! never points back at its task and outlives it. The feed is ordered most
//! recent first.

mod projector;

pub use projector::project;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::session::Actor;
use crate::task::TaskCategory;

/// Kind of achievement shown in the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalType {
    Workout,
    Meditation,
    Study,
    Focus,
}

impl From<TaskCategory> for GoalType {
    fn from(category: TaskCategory) -> Self {
        match category {
            TaskCategory::Academic => GoalType::Study,
            TaskCategory::Fitness => GoalType::Workout,
            TaskCategory::Wellness => GoalType::Meditation,
            TaskCategory::Household | TaskCategory::Custom => GoalType::Focus,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalComment {
    pub id: String,
    pub user_id: String,
    pub username: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl GoalComment {
    pub fn new(actor: &Actor, content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: actor.user_id.clone(),
            username: actor.username.clone(),
            content: content.into(),
            timestamp,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalCompletion {
    pub id: String,
    pub user_id: String,
    pub username: String,
    pub goal_title: String,
    pub description: String,
    /// Whole minutes
    pub duration: u64,
    pub points: u32,
    pub completed_at: DateTime<Utc>,
    pub goal_type: GoalType,
    #[serde(default)]
    pub likes: u32,
    #[serde(default)]
    pub comments: Vec<GoalComment>,
}

/// Most-recent-first collection of completions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Feed {
    entries: Vec<GoalCompletion>,
}

impl Feed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps entries that are already ordered most recent first.
    pub fn with_entries(entries: Vec<GoalCompletion>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[GoalCompletion] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&GoalCompletion> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn prepend(&mut self, completion: GoalCompletion) {
        self.entries.insert(0, completion);
    }

    /// Returns the new like count, or `None` for an unknown id.
    pub fn like(&mut self, id: &str) -> Option<u32> {
        let entry = self.entries.iter_mut().find(|entry| entry.id == id)?;
        entry.likes = entry.likes.saturating_add(1);
        Some(entry.likes)
    }

    /// Appends `comment`, or returns `None` for an unknown id.
    pub fn add_comment(&mut self, id: &str, comment: GoalComment) -> Option<GoalComment> {
        let entry = self.entries.iter_mut().find(|entry| entry.id == id)?;
        entry.comments.push(comment.clone());
        Some(comment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{Task, TaskDraft};

    fn completion(title: &str) -> GoalCompletion {
        let task = Task::from_draft(
            TaskDraft::new(title, TaskCategory::Fitness).duration_secs(600),
            format!("task-{title}"),
            Utc::now(),
        );
        project(&task, &Actor::new("u-1", "Sam"), None, Utc::now())
    }

    #[test]
    fn category_mapping_is_total() {
        assert_eq!(GoalType::from(TaskCategory::Academic), GoalType::Study);
        assert_eq!(GoalType::from(TaskCategory::Fitness), GoalType::Workout);
        assert_eq!(GoalType::from(TaskCategory::Wellness), GoalType::Meditation);
        assert_eq!(GoalType::from(TaskCategory::Household), GoalType::Focus);
        assert_eq!(GoalType::from(TaskCategory::Custom), GoalType::Focus);
    }

    #[test]
    fn prepend_keeps_most_recent_first() {
        let mut feed = Feed::new();
        feed.prepend(completion("first"));
        feed.prepend(completion("second"));

        assert_eq!(feed.entries()[0].goal_title, "second");
        assert_eq!(feed.entries()[1].goal_title, "first");
    }

    #[test]
    fn like_increments_and_ignores_unknown() {
        let mut feed = Feed::new();
        let entry = completion("run");
        let id = entry.id.clone();
        feed.prepend(entry);

        assert_eq!(feed.like(&id), Some(1));
        assert_eq!(feed.like(&id), Some(2));
        assert_eq!(feed.like("missing"), None);
    }

    #[test]
    fn comments_append_in_order() {
        let mut feed = Feed::new();
        let entry = completion("run");
        let id = entry.id.clone();
        feed.prepend(entry);
        let actor = Actor::new("u-2", "Alex");

        feed.add_comment(&id, GoalComment::new(&actor, "nice", Utc::now()));
        feed.add_comment(&id, GoalComment::new(&actor, "keep going", Utc::now()));

        let comments = &feed.get(&id).unwrap().comments;
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].content, "nice");
        assert_eq!(comments[1].username, "Alex");
        assert!(feed
            .add_comment("missing", GoalComment::new(&actor, "x", Utc::now()))
            .is_none());
    }

    #[test]
    fn feed_serializes_as_array() {
        let mut feed = Feed::new();
        feed.prepend(completion("run"));
        let json = serde_json::to_value(&feed).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["goal_type"], "workout");
    }
}
