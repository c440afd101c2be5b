//! The task manager: one state container for tasks, rewards, streak and feed.
//!
//! Commands run synchronously on the owner's thread and notify subscribers
//! with one [`Event`] per state change. A completion flows through
//!
//! ```text
//! TaskStore -> RewardLedger -> StreakTracker -> project() -> Feed
//! ```
//!
//! Time comes from the injected [`Clock`]; the recurring allowance tick is a
//! caller-driven [`Ticker`] advanced by [`TaskManager::run_due_ticks`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::error::{Result, ValidationError};
use crate::events::Event;
use crate::feed::{project, Feed, GoalComment, GoalCompletion};
use crate::ledger::RewardLedger;
use crate::session::{Actor, Session, Settings};
use crate::streak::{DailyProgress, StreakState, StreakTracker};
use crate::task::{sorted_view, SortOption, Task, TaskCategory, TaskDraft, TaskStore};
use crate::timer::Ticker;

pub type SubscriptionId = u64;

type Listener = Box<dyn FnMut(&Event) + Send>;

/// Everything needed to rebuild a manager later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub tasks: Vec<Task>,
    pub feed: Vec<GoalCompletion>,
    pub ledger: RewardLedger,
    pub streak: StreakState,
    #[serde(default)]
    pub last_tick_at: Option<DateTime<Utc>>,
}

/// Result of a successful completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionOutcome {
    pub task: Task,
    pub allowance_secs: f64,
    pub weekly_streak: u32,
    pub streak_incremented: bool,
    pub completion: GoalCompletion,
}

pub struct TaskManager {
    session: Session,
    clock: Box<dyn Clock>,
    store: TaskStore,
    ledger: RewardLedger,
    streak: StreakTracker,
    feed: Feed,
    ticker: Ticker,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: SubscriptionId,
}

impl TaskManager {
    /// Starts a fresh session over the given tasks and feed (most recent
    /// first). The ledger starts at the configured allowance.
    pub fn new(
        session: Session,
        clock: Box<dyn Clock>,
        initial_tasks: Vec<Task>,
        initial_feed: Vec<GoalCompletion>,
    ) -> Self {
        let settings = session.settings().clone();
        let mut ticker = Ticker::new(settings.tick_interval_secs);
        ticker.start(clock.now());

        Self {
            ledger: RewardLedger::new(settings.initial_allowance_secs),
            streak: StreakTracker::new(settings.streak),
            store: TaskStore::with_tasks(initial_tasks),
            feed: Feed::with_entries(initial_feed),
            ticker,
            session,
            clock,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Rebuilds a manager from a snapshot. The tick schedule continues from
    /// the snapshot's last tick, so time spent away is charged on the next
    /// [`run_due_ticks`](Self::run_due_ticks).
    pub fn restore(session: Session, clock: Box<dyn Clock>, snapshot: StateSnapshot) -> Self {
        let settings = session.settings().clone();
        let last_tick = snapshot.last_tick_at.unwrap_or_else(|| clock.now());

        Self {
            ledger: snapshot.ledger,
            streak: StreakTracker::with_state(settings.streak, snapshot.streak),
            store: TaskStore::with_tasks(snapshot.tasks),
            feed: Feed::with_entries(snapshot.feed),
            ticker: Ticker::resume(settings.tick_interval_secs, last_tick),
            session,
            clock,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn tasks(&self) -> &[Task] {
        self.store.tasks()
    }

    pub fn get_task(&self, id: &str) -> Option<&Task> {
        self.store.get(id)
    }

    pub fn sorted_view(&self, sort: SortOption, filter: Option<TaskCategory>) -> Vec<Task> {
        sorted_view(self.store.tasks(), sort, filter)
    }

    pub fn completed_tasks(&self) -> Vec<Task> {
        self.store.completed_tasks()
    }

    pub fn pending_tasks(&self) -> Vec<Task> {
        self.store.pending_tasks()
    }

    pub fn ledger(&self) -> &RewardLedger {
        &self.ledger
    }

    pub fn allowance_secs(&self) -> f64 {
        self.ledger.allowance_secs()
    }

    pub fn used_secs(&self) -> f64 {
        self.ledger.used_secs()
    }

    pub fn weekly_streak(&self) -> u32 {
        self.streak.weekly_streak()
    }

    pub fn daily_progress(&self) -> DailyProgress {
        let offset = self.session.settings().utc_offset;
        self.streak.progress(self.store.tasks(), self.today(), offset)
    }

    pub fn feed(&self) -> &[GoalCompletion] {
        self.feed.entries()
    }

    pub fn actor(&self) -> Actor {
        self.session.actor()
    }

    pub fn settings(&self) -> &Settings {
        self.session.settings()
    }

    pub fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn add_task(&mut self, draft: TaskDraft) -> Task {
        let now = self.clock.now();
        let task = self.store.add(draft, now);
        tracing::debug!(task_id = %task.id, category = %task.category, "task added");
        self.emit(Event::TaskAdded {
            task_id: task.id.clone(),
            title: task.title.clone(),
            category: task.category,
            at: now,
        });
        task
    }

    /// Unknown ids are a no-op.
    pub fn delete_task(&mut self, id: &str) -> Option<Task> {
        let removed = self.store.delete(id)?;
        tracing::debug!(task_id = %removed.id, "task deleted");
        self.emit(Event::TaskDeleted {
            task_id: removed.id.clone(),
            at: self.clock.now(),
        });
        Some(removed)
    }

    /// Completes a task, credits its duration, re-evaluates the streak and
    /// shares the achievement to the feed.
    ///
    /// Unknown ids yield `Ok(None)`; a second completion of the same task is
    /// rejected with `AlreadyCompleted` and changes nothing.
    pub fn complete_task(&mut self, id: &str) -> Result<Option<CompletionOutcome>> {
        let now = self.clock.now();
        let task = match self.store.complete(id, now) {
            Ok(Some(task)) => task,
            Ok(None) => return Ok(None),
            Err(err) => {
                tracing::warn!(task_id = %id, "rejected completion: {err}");
                return Err(err);
            }
        };
        tracing::info!(task_id = %task.id, duration_secs = task.duration_secs, "task completed");
        self.emit(Event::TaskCompleted {
            task_id: task.id.clone(),
            duration_secs: task.duration_secs,
            points: task.points,
            at: now,
        });

        let allowance_secs = self.credit(task.duration_secs as f64);

        let offset = self.session.settings().utc_offset;
        let today = self.today();
        let incremented = self
            .streak
            .on_task_completed(self.store.tasks(), today, offset);
        if let Some(weekly_streak) = incremented {
            let completed_today = StreakTracker::completed_on(self.store.tasks(), today, offset);
            tracing::info!(weekly_streak, completed_today, "streak incremented");
            self.emit(Event::StreakIncremented {
                weekly_streak,
                completed_today,
                at: now,
            });
        }

        let completion = self.publish(&task, None, now);

        Ok(Some(CompletionOutcome {
            task,
            allowance_secs,
            weekly_streak: self.streak.weekly_streak(),
            streak_incremented: incremented.is_some(),
            completion,
        }))
    }

    /// Shares a task to the feed with an optional comment, independent of
    /// completion. Unknown ids are a no-op.
    pub fn share_achievement(&mut self, task_id: &str, comment: &str) -> Option<GoalCompletion> {
        let task = self.store.get(task_id)?.clone();
        let now = self.clock.now();
        Some(self.publish(&task, Some(comment), now))
    }

    /// Unknown ids are a no-op.
    pub fn like_completion(&mut self, completion_id: &str) -> Option<u32> {
        let likes = self.feed.like(completion_id)?;
        self.emit(Event::CompletionLiked {
            completion_id: completion_id.to_string(),
            likes,
            at: self.clock.now(),
        });
        Some(likes)
    }

    /// Appends a comment by the current user. Blank content is rejected;
    /// unknown ids are a no-op.
    pub fn add_comment(
        &mut self,
        completion_id: &str,
        content: &str,
    ) -> Result<Option<GoalComment>> {
        let content = content.trim();
        if content.is_empty() {
            return Err(ValidationError::empty("content").into());
        }
        let now = self.clock.now();
        let comment = GoalComment::new(&self.session.actor(), content, now);
        let Some(comment) = self.feed.add_comment(completion_id, comment) else {
            return Ok(None);
        };
        self.emit(Event::CommentAdded {
            completion_id: completion_id.to_string(),
            comment_id: comment.id.clone(),
            at: now,
        });
        Ok(Some(comment))
    }

    /// Adds screen time. Returns the new allowance.
    pub fn credit(&mut self, duration_secs: f64) -> f64 {
        let allowance_secs = self.ledger.credit(duration_secs);
        self.emit(Event::AllowanceCredited {
            amount_secs: duration_secs.max(0.0),
            allowance_secs,
            at: self.clock.now(),
        });
        allowance_secs
    }

    /// Drains one interval from the allowance. Returns the seconds deducted.
    pub fn tick(&mut self, interval_secs: f64) -> f64 {
        let deducted = self.ledger.tick(interval_secs);
        if deducted > 0.0 {
            tracing::debug!(deducted, allowance = self.ledger.allowance_secs(), "allowance tick");
            self.emit(Event::AllowanceTicked {
                deducted_secs: deducted,
                allowance_secs: self.ledger.allowance_secs(),
                used_secs: self.ledger.used_secs(),
                at: self.clock.now(),
            });
        }
        deducted
    }

    /// Applies every tick interval that has elapsed on the clock since the
    /// last one. Returns the number of intervals consumed.
    pub fn run_due_ticks(&mut self) -> u32 {
        let due = self.ticker.poll(self.clock.now());
        let interval = self.ticker.interval_secs() as f64;
        for _ in 0..due {
            if self.ledger.is_exhausted() {
                break;
            }
            self.tick(interval);
        }
        due
    }

    /// Stops the recurring tick; later polls never fire.
    pub fn stop_ticker(&mut self) {
        self.ticker.stop();
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&Event) + Send + 'static) -> SubscriptionId {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            tasks: self.store.tasks().to_vec(),
            feed: self.feed.entries().to_vec(),
            ledger: self.ledger.clone(),
            streak: self.streak.state().clone(),
            last_tick_at: self.ticker.last_fire(),
        }
    }

    /// Ends the session: stops the ticker, drops subscribers and hands back
    /// the final state for persistence.
    pub fn sign_out(mut self) -> StateSnapshot {
        self.stop_ticker();
        self.listeners.clear();
        tracing::info!(user_id = %self.session.actor().user_id, "session signed out");
        self.snapshot()
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn publish(&mut self, task: &Task, comment: Option<&str>, now: DateTime<Utc>) -> GoalCompletion {
        let completion = project(task, &self.session.actor(), comment, now);
        self.feed.prepend(completion.clone());
        self.emit(Event::AchievementShared {
            completion_id: completion.id.clone(),
            task_id: task.id.clone(),
            goal_type: completion.goal_type,
            at: now,
        });
        completion
    }

    fn today(&self) -> NaiveDate {
        self.clock
            .now()
            .with_timezone(&self.session.settings().utc_offset)
            .date_naive()
    }

    fn emit(&mut self, event: Event) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(&event);
        }
    }
}
