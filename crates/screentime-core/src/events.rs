use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::feed::GoalType;
use crate::task::TaskCategory;

/// Every state change in the manager produces an Event.
/// The presentation layer subscribes to them instead of observing fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TaskAdded {
        task_id: String,
        title: String,
        category: TaskCategory,
        at: DateTime<Utc>,
    },
    TaskDeleted {
        task_id: String,
        at: DateTime<Utc>,
    },
    TaskCompleted {
        task_id: String,
        duration_secs: u64,
        points: u32,
        at: DateTime<Utc>,
    },
    AllowanceCredited {
        amount_secs: f64,
        allowance_secs: f64,
        at: DateTime<Utc>,
    },
    /// Emitted only when the tick actually drained something.
    AllowanceTicked {
        deducted_secs: f64,
        allowance_secs: f64,
        used_secs: f64,
        at: DateTime<Utc>,
    },
    StreakIncremented {
        weekly_streak: u32,
        completed_today: u32,
        at: DateTime<Utc>,
    },
    AchievementShared {
        completion_id: String,
        task_id: String,
        goal_type: GoalType,
        at: DateTime<Utc>,
    },
    CompletionLiked {
        completion_id: String,
        likes: u32,
        at: DateTime<Utc>,
    },
    CommentAdded {
        completion_id: String,
        comment_id: String,
        at: DateTime<Utc>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_type_tag() {
        let event = Event::TaskDeleted {
            task_id: "t-1".into(),
            at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "TaskDeleted");
        assert_eq!(json["task_id"], "t-1");

        let decoded: Event = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, event);
    }
}
