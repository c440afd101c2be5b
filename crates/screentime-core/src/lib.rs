//! # Screentime Core Library
//!
//! This library provides the core business logic for Screentime: completing
//! real-world tasks earns screen time, a daily goal feeds a weekly streak,
//! and every completion is shared to an achievement feed. The CLI binary is
//! a thin layer over the same core library.
//!
//! ## Architecture
//!
//! - **Task Manager**: A single state container; every mutation goes through
//!   it and is announced to subscribers as an [`Event`]
//! - **Ticker**: A wall-clock-based schedule that requires the caller to
//!   periodically invoke `run_due_ticks()` to drain the allowance
//! - **Storage**: JSON state snapshots and TOML-based configuration
//!
//! ## Key Components
//!
//! - [`TaskManager`]: Tasks, ledger, streak and feed behind one API
//! - [`RewardLedger`]: Screen-time allowance accounting
//! - [`StreakTracker`]: Daily goal and weekly streak
//! - [`project`]: Converts a task into a feed record
//! - [`Config`]: Application configuration management

pub mod clock;
pub mod error;
pub mod events;
pub mod feed;
pub mod ledger;
pub mod manager;
pub mod session;
pub mod storage;
pub mod streak;
pub mod task;
pub mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ConfigError, CoreError, StorageError, ValidationError};
pub use events::Event;
pub use feed::{project, Feed, GoalComment, GoalCompletion, GoalType};
pub use ledger::RewardLedger;
pub use manager::{CompletionOutcome, StateSnapshot, SubscriptionId, TaskManager};
pub use session::{Actor, IdentityProvider, Session, Settings, StaticIdentity};
pub use storage::Config;
pub use streak::{DailyProgress, StreakConfig, StreakPolicy, StreakState, StreakTracker};
pub use task::{sample_drafts, sorted_view, SortOption, Task, TaskCategory, TaskDraft, TaskStore};
pub use timer::{Ticker, TickerState};
