//! Async interval driver.
//!
//! Runs on a tokio runtime and only *signals*; it never touches manager
//! state. The owner receives [`TickSignal`]s on its own task and applies them
//! there, which keeps every mutation on one logical thread.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSignal {
    /// 1-based count of signals sent by this driver
    pub sequence: u64,
    pub interval_secs: u64,
}

/// Keeps the driver alive. Stopping or dropping the handle aborts it.
#[derive(Debug)]
pub struct TickerHandle {
    task: JoinHandle<()>,
}

impl TickerHandle {
    pub fn stop(&self) {
        self.task.abort();
    }
}

impl Drop for TickerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Spawns a driver that sends one signal per `interval`, first one after a
/// full interval. Must be called from within a tokio runtime.
pub fn spawn_interval(interval: Duration) -> (TickerHandle, mpsc::UnboundedReceiver<TickSignal>) {
    let interval = interval.max(Duration::from_secs(1));
    let interval_secs = interval.as_secs();
    let (tx, rx) = mpsc::unbounded_channel();

    let task = tokio::spawn(async move {
        let mut timer = interval_at(Instant::now() + interval, interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut sequence = 0u64;
        loop {
            timer.tick().await;
            sequence += 1;
            if tx.send(TickSignal { sequence, interval_secs }).is_err() {
                tracing::debug!("tick receiver dropped, stopping driver");
                break;
            }
        }
    });

    (TickerHandle { task }, rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn sends_one_signal_per_interval() {
        let (_handle, mut rx) = spawn_interval(Duration::from_secs(60));

        let start = Instant::now();
        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();

        assert_eq!(first.sequence, 1);
        assert_eq!(second.sequence, 2);
        assert_eq!(second.interval_secs, 60);
        assert_eq!(start.elapsed(), Duration::from_secs(120));
    }

    #[tokio::test(start_paused = true)]
    async fn stop_closes_the_channel() {
        let (handle, mut rx) = spawn_interval(Duration::from_secs(60));
        assert!(rx.recv().await.is_some());

        handle.stop();
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_handle_stops_driver() {
        let (handle, mut rx) = spawn_interval(Duration::from_secs(5));
        drop(handle);
        assert!(rx.recv().await.is_none());
    }
}
