//! Recurring allowance tick schedule.
//!
//! The ticker is a wall-clock-based schedule with no internal threads: the
//! owner polls it with the current time and applies however many whole
//! intervals have elapsed. Partial intervals carry over to the next poll.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> Stopped
//! ```
//!
//! `Stopped` is terminal, so a discarded owner can never be ticked again.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TickerState {
    Idle,
    Running,
    Stopped,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticker {
    interval_secs: u64,
    state: TickerState,
    /// Instant of the last whole interval that was reported.
    #[serde(default)]
    last_fire: Option<DateTime<Utc>>,
}

impl Ticker {
    /// Intervals shorter than a second are rounded up to one second.
    pub fn new(interval_secs: u64) -> Self {
        Self {
            interval_secs: interval_secs.max(1),
            state: TickerState::Idle,
            last_fire: None,
        }
    }

    /// A running ticker that continues a schedule whose last reported
    /// interval ended at `last_fire`.
    pub fn resume(interval_secs: u64, last_fire: DateTime<Utc>) -> Self {
        Self {
            interval_secs: interval_secs.max(1),
            state: TickerState::Running,
            last_fire: Some(last_fire),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn interval_secs(&self) -> u64 {
        self.interval_secs
    }

    pub fn state(&self) -> TickerState {
        self.state
    }

    pub fn last_fire(&self) -> Option<DateTime<Utc>> {
        self.last_fire
    }

    pub fn next_fire_at(&self) -> Option<DateTime<Utc>> {
        if self.state != TickerState::Running {
            return None;
        }
        self.last_fire
            .map(|last| last + Duration::seconds(self.interval_as_i64()))
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Returns false if the ticker was already running or is stopped.
    pub fn start(&mut self, now: DateTime<Utc>) -> bool {
        if self.state != TickerState::Idle {
            return false;
        }
        self.state = TickerState::Running;
        self.last_fire = Some(now);
        true
    }

    pub fn stop(&mut self) {
        self.state = TickerState::Stopped;
    }

    /// Number of whole intervals elapsed since the last reported one.
    pub fn poll(&mut self, now: DateTime<Utc>) -> u32 {
        if self.state != TickerState::Running {
            return 0;
        }
        let Some(last) = self.last_fire else {
            return 0;
        };
        let elapsed = (now - last).num_seconds();
        if elapsed <= 0 {
            return 0;
        }

        let due = elapsed as u64 / self.interval_secs;
        if due == 0 {
            return 0;
        }
        let covered = (due * self.interval_secs) as i64;
        self.last_fire = Some(last + Duration::seconds(covered));
        u32::try_from(due).unwrap_or(u32::MAX)
    }

    fn interval_as_i64(&self) -> i64 {
        i64::try_from(self.interval_secs).unwrap_or(i64::MAX)
    }
}
