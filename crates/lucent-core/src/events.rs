use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::quotes::Quote;
use crate::streak::StreakUpdate;
use crate::timer::{SessionPhase, TimerState};

/// How long the streak celebration stays up before it hides itself.
pub const CELEBRATION_DISMISS_AFTER: Duration = Duration::from_secs(5);

/// Every state change the controller makes produces an Event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        phase: SessionPhase,
        remaining_seconds: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        phase: SessionPhase,
        remaining_seconds: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        phase: SessionPhase,
        at: DateTime<Utc>,
    },
    TimerTicked {
        state: TimerState,
    },
    PhaseCompleted {
        finished: SessionPhase,
        next: SessionPhase,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        streak: Option<StreakUpdate>,
        at: DateTime<Utc>,
    },
    PhaseChanged {
        phase: SessionPhase,
    },
    StreakIncreased {
        count: u32,
    },
    FocusLockToggled {
        enabled: bool,
    },
    FocusLocked {
        at: DateTime<Utc>,
    },
    ExitConfirmationRequested {
        quote: Quote,
    },
    ExitCancelled,
    FocusUnlocked {
        at: DateTime<Utc>,
    },
    BackNavigationBlocked,
}

/// Callbacks into the presentation layer. Every method defaults to a no-op.
pub trait SessionListener {
    /// Every observed tick while running.
    fn on_tick(&mut self, _state: &TimerState) {}

    /// A completed Work phase started or extended the streak.
    fn on_streak_increased(&mut self, _count: u32) {}

    /// The countdown moved to `phase`.
    fn on_phase_change(&mut self, _phase: SessionPhase) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopListener;

impl SessionListener for NoopListener {}

/// Listener that turns callbacks into events on a shared log.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    events: Arc<Mutex<Vec<Event>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    /// Drain everything logged so far.
    pub fn take(&self) -> Vec<Event> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(|p| p.into_inner()))
    }

    fn push(&self, event: Event) {
        self.events
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(event);
    }
}

impl SessionListener for EventLog {
    fn on_tick(&mut self, state: &TimerState) {
        self.push(Event::TimerTicked { state: *state });
    }

    fn on_streak_increased(&mut self, count: u32) {
        self.push(Event::StreakIncreased { count });
    }

    fn on_phase_change(&mut self, phase: SessionPhase) {
        self.push(Event::PhaseChanged { phase });
    }
}
