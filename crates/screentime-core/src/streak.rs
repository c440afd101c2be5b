//! Daily goal tracking and the weekly streak counter.
//!
//! "Completed today" counts completed tasks whose *creation* date falls on
//! the current calendar day, not their completion date. When that count
//! reaches the daily goal the weekly streak goes up by one, capped.

use chrono::{FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ValidationError;
use crate::task::Task;

/// When a met daily goal is allowed to bump the streak.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakPolicy {
    /// At most one increment per calendar day
    #[default]
    OncePerDay,
    /// Every completion at or past the goal increments again
    EveryCompletion,
}

impl FromStr for StreakPolicy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "once_per_day" => Ok(StreakPolicy::OncePerDay),
            "every_completion" => Ok(StreakPolicy::EveryCompletion),
            other => Err(ValidationError::invalid(
                "policy",
                format!("'{other}' is not one of once_per_day, every_completion"),
            )),
        }
    }
}

/// Configuration for streak behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreakConfig {
    pub daily_goal: u32,
    pub max_streak: u32,
    pub policy: StreakPolicy,
}

impl Default for StreakConfig {
    fn default() -> Self {
        Self {
            daily_goal: 3,
            max_streak: 7,
            policy: StreakPolicy::OncePerDay,
        }
    }
}

/// Persisted streak counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakState {
    pub weekly_streak: u32,
    /// Calendar day of the last increment, used by `OncePerDay`
    #[serde(default)]
    pub last_increment_day: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyProgress {
    pub completed_today: u32,
    pub daily_goal: u32,
}

impl DailyProgress {
    pub fn goal_met(&self) -> bool {
        self.completed_today >= self.daily_goal
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StreakTracker {
    config: StreakConfig,
    state: StreakState,
}

impl StreakTracker {
    pub fn new(config: StreakConfig) -> Self {
        Self::with_state(config, StreakState::default())
    }

    pub fn with_state(config: StreakConfig, mut state: StreakState) -> Self {
        state.weekly_streak = state.weekly_streak.min(config.max_streak);
        Self { config, state }
    }

    pub fn weekly_streak(&self) -> u32 {
        self.state.weekly_streak
    }

    pub fn config(&self) -> &StreakConfig {
        &self.config
    }

    pub fn state(&self) -> &StreakState {
        &self.state
    }

    /// Completed tasks created on `day`.
    pub fn completed_on(tasks: &[Task], day: NaiveDate, offset: FixedOffset) -> u32 {
        let count = tasks
            .iter()
            .filter(|task| task.is_completed && task.created_on(day, offset))
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    pub fn progress(&self, tasks: &[Task], day: NaiveDate, offset: FixedOffset) -> DailyProgress {
        DailyProgress {
            completed_today: Self::completed_on(tasks, day, offset),
            daily_goal: self.config.daily_goal,
        }
    }

    /// Re-evaluates the daily goal after a completion.
    ///
    /// Returns the new streak when it was incremented.
    pub fn on_task_completed(
        &mut self,
        tasks: &[Task],
        day: NaiveDate,
        offset: FixedOffset,
    ) -> Option<u32> {
        if !self.progress(tasks, day, offset).goal_met() {
            return None;
        }
        if self.config.policy == StreakPolicy::OncePerDay
            && self.state.last_increment_day == Some(day)
        {
            return None;
        }

        self.state.last_increment_day = Some(day);
        let next = (self.state.weekly_streak + 1).min(self.config.max_streak);
        if next == self.state.weekly_streak {
            return None;
        }
        self.state.weekly_streak = next;
        Some(next)
    }
}

impl Default for StreakTracker {
    fn default() -> Self {
        Self::new(StreakConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{TaskCategory, TaskDraft};
    use chrono::{TimeZone, Utc};

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn completed_tasks_on(d: u32, count: usize) -> Vec<Task> {
        let created = Utc.with_ymd_and_hms(2025, 3, d, 9, 0, 0).unwrap();
        (0..count)
            .map(|i| {
                let mut task = Task::from_draft(
                    TaskDraft::new(format!("t{i}"), TaskCategory::Custom),
                    format!("{d}-{i}"),
                    created,
                );
                task.is_completed = true;
                task
            })
            .collect()
    }

    #[test]
    fn below_goal_does_not_increment() {
        let mut tracker = StreakTracker::default();
        let tasks = completed_tasks_on(1, 2);
        assert_eq!(tracker.on_task_completed(&tasks, day(1), utc()), None);
        assert_eq!(tracker.weekly_streak(), 0);
    }

    #[test]
    fn reaching_goal_increments() {
        let mut tracker = StreakTracker::default();
        let tasks = completed_tasks_on(1, 3);
        assert_eq!(tracker.on_task_completed(&tasks, day(1), utc()), Some(1));
        assert_eq!(tracker.state().last_increment_day, Some(day(1)));
    }

    #[test]
    fn once_per_day_gates_repeat_increments() {
        let mut tracker = StreakTracker::default();
        let tasks = completed_tasks_on(1, 4);
        assert_eq!(tracker.on_task_completed(&tasks[..3], day(1), utc()), Some(1));
        assert_eq!(tracker.on_task_completed(&tasks, day(1), utc()), None);
        assert_eq!(tracker.weekly_streak(), 1);
    }

    #[test]
    fn every_completion_increments_each_time() {
        let mut tracker = StreakTracker::new(StreakConfig {
            policy: StreakPolicy::EveryCompletion,
            ..StreakConfig::default()
        });
        let tasks = completed_tasks_on(1, 4);
        assert_eq!(tracker.on_task_completed(&tasks[..3], day(1), utc()), Some(1));
        assert_eq!(tracker.on_task_completed(&tasks, day(1), utc()), Some(2));
    }

    #[test]
    fn streak_caps_at_max() {
        let mut tracker = StreakTracker::default();
        for d in 1..=9 {
            let tasks = completed_tasks_on(d, 3);
            tracker.on_task_completed(&tasks, day(d), utc());
        }
        assert_eq!(tracker.weekly_streak(), 7);
    }

    #[test]
    fn counts_by_creation_day_not_completion_day() {
        // Created yesterday, completed today: does not count towards today.
        let tasks = completed_tasks_on(1, 3);
        let mut tracker = StreakTracker::default();
        assert_eq!(tracker.on_task_completed(&tasks, day(2), utc()), None);
        assert_eq!(tracker.progress(&tasks, day(2), utc()).completed_today, 0);
    }

    #[test]
    fn pending_tasks_are_not_counted() {
        let mut tasks = completed_tasks_on(1, 3);
        tasks[0].is_completed = false;
        let tracker = StreakTracker::default();
        let progress = tracker.progress(&tasks, day(1), utc());
        assert_eq!(progress.completed_today, 2);
        assert!(!progress.goal_met());
    }

    #[test]
    fn restored_state_is_capped() {
        let tracker = StreakTracker::with_state(
            StreakConfig::default(),
            StreakState {
                weekly_streak: 12,
                last_increment_day: None,
            },
        );
        assert_eq!(tracker.weekly_streak(), 7);
    }

    #[test]
    fn policy_parses() {
        assert_eq!("once-per-day".parse::<StreakPolicy>(), Ok(StreakPolicy::OncePerDay));
        assert_eq!(
            "EVERY_COMPLETION".parse::<StreakPolicy>(),
            Ok(StreakPolicy::EveryCompletion)
        );
        assert!("weekly".parse::<StreakPolicy>().is_err());
    }
}
