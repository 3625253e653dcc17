//! Recurring one-second tick scheduling.
//!
//! The controller owns exactly one scheduler and calls `cancel()` on every
//! path that stops the countdown. Each `schedule()` call stamps its ticks with
//! a fresh generation, so a tick that was already queued when the schedule was
//! cancelled is recognisable as stale and dropped by the controller.

use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Interval between ticks.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// A tick delivered by a scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub generation: u64,
}

pub trait TickScheduler {
    /// Begin delivering ticks stamped with `generation`, replacing any
    /// schedule already active.
    fn schedule(&mut self, generation: u64);

    /// Stop delivering ticks. Safe to call when nothing is scheduled.
    fn cancel(&mut self);

    fn is_scheduled(&self) -> bool;
}

/// Scheduler backed by a tokio interval task.
///
/// Ticks are pushed into an unbounded channel; the host drains the receiver
/// on the same task that owns the controller. Requires a running tokio
/// runtime when `schedule()` is called.
pub struct TokioTicker {
    sender: UnboundedSender<Tick>,
    task: Option<JoinHandle<()>>,
}

impl TokioTicker {
    pub fn new() -> (Self, UnboundedReceiver<Tick>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender, task: None }, receiver)
    }
}

impl TickScheduler for TokioTicker {
    fn schedule(&mut self, generation: u64) {
        self.cancel();
        let sender = self.sender.clone();
        self.task = Some(tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + TICK_INTERVAL, TICK_INTERVAL);
            // A suspended host gets one late tick on resume, not a burst.
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if sender.send(Tick { generation }).is_err() {
                    break;
                }
            }
        }));
        tracing::debug!(generation, "tick scheduled");
    }

    fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            tracing::debug!("tick cancelled");
        }
    }

    fn is_scheduled(&self) -> bool {
        self.task.is_some()
    }
}

impl Drop for TokioTicker {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Scheduler that only records what it was asked to do.
///
/// For hosts that drive `tick()` themselves, and for tests.
#[derive(Debug, Default, Clone)]
pub struct ManualTicker {
    current: Option<u64>,
    schedules: usize,
    cancels: usize,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generation of the active schedule, if any.
    pub fn current(&self) -> Option<u64> {
        self.current
    }

    pub fn schedule_count(&self) -> usize {
        self.schedules
    }

    pub fn cancel_count(&self) -> usize {
        self.cancels
    }
}

impl TickScheduler for ManualTicker {
    fn schedule(&mut self, generation: u64) {
        self.current = Some(generation);
        self.schedules += 1;
    }

    fn cancel(&mut self) {
        if self.current.take().is_some() {
            self.cancels += 1;
        }
    }

    fn is_scheduled(&self) -> bool {
        self.current.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_ticker_tracks_schedule_and_cancel() {
        let mut ticker = ManualTicker::new();
        assert!(!ticker.is_scheduled());
        ticker.schedule(3);
        assert_eq!(ticker.current(), Some(3));
        ticker.cancel();
        ticker.cancel();
        assert_eq!(ticker.current(), None);
        assert_eq!(ticker.schedule_count(), 1);
        assert_eq!(ticker.cancel_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_ticker_delivers_stamped_ticks() {
        let (mut ticker, mut rx) = TokioTicker::new();
        ticker.schedule(7);
        let tick = rx.recv().await;
        assert_eq!(tick, Some(Tick { generation: 7 }));
        ticker.cancel();
        assert!(!ticker.is_scheduled());
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_ticker_reschedule_replaces_generation() {
        let (mut ticker, mut rx) = TokioTicker::new();
        ticker.schedule(1);
        ticker.schedule(2);
        let tick = rx.recv().await;
        assert_eq!(tick, Some(Tick { generation: 2 }));
    }
}
