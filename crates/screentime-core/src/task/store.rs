use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{Task, TaskDraft};
use crate::error::{CoreError, Result};

/// Owns the task set.
///
/// Storage order is insertion order; display ordering comes from
/// [`sorted_view`](super::sorted_view). Tasks are handed out by reference or
/// clone only, so a completed task's reward fields cannot change afterwards.
#[derive(Debug, Clone, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn add(&mut self, draft: TaskDraft, now: DateTime<Utc>) -> Task {
        let task = Task::from_draft(draft, Uuid::new_v4().to_string(), now);
        self.tasks.push(task.clone());
        task
    }

    /// Removes the task. Unknown ids are a no-op.
    pub fn delete(&mut self, id: &str) -> Option<Task> {
        let index = self.tasks.iter().position(|task| task.id == id)?;
        Some(self.tasks.remove(index))
    }

    /// Marks the task completed.
    ///
    /// Returns `Ok(None)` for an unknown id and `AlreadyCompleted` if the
    /// task was completed before.
    pub fn complete(&mut self, id: &str, now: DateTime<Utc>) -> Result<Option<Task>> {
        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            return Ok(None);
        };
        if task.is_completed {
            return Err(CoreError::AlreadyCompleted { id: id.to_string() });
        }
        task.is_completed = true;
        task.completed_at = Some(now);
        Ok(Some(task.clone()))
    }

    pub fn completed_tasks(&self) -> Vec<Task> {
        self.tasks.iter().filter(|t| t.is_completed).cloned().collect()
    }

    pub fn pending_tasks(&self) -> Vec<Task> {
        self.tasks.iter().filter(|t| !t.is_completed).cloned().collect()
    }
}
