//! # Lucent Core Library
//!
//! The focus session logic behind the Lucent study hub: a repeating
//! work/break countdown, a daily streak counter kept in a key-value store,
//! and an optional focus lock that makes leaving a running session a
//! two-step decision.
//!
//! ## Architecture
//!
//! - **Countdown Engine**: a tick-driven two-phase state machine; the caller
//!   delivers one `tick()` per elapsed second
//! - **Streak Tracker**: calendar-day streak bookkeeping over a pluggable store
//! - **Focus Lock**: Unlocked / Locked / ConfirmingExit state machine with a
//!   back-navigation guard
//! - **Controller**: composes the above with a tick scheduler, clock and
//!   presentation callbacks
//!
//! ## Key Components
//!
//! - [`FocusSessionController`]: what a mounted session screen talks to
//! - [`CountdownEngine`]: the countdown itself
//! - [`StreakTracker`]: `load_and_reconcile` / `record_completion`
//! - [`KeyValueStore`]: persistence seam, with [`SqliteStore`] and [`MemoryStore`]
//! - [`Config`]: TOML configuration

pub mod clock;
pub mod controller;
pub mod error;
pub mod events;
pub mod focus_lock;
pub mod quotes;
pub mod storage;
pub mod streak;
pub mod timer;

pub use clock::{Clock, FixedClock, SystemClock};
pub use controller::{BackNavigation, FocusSessionController, SessionSettings};
pub use error::{ConfigError, CoreError, StoreError};
pub use events::{Event, EventLog, NoopListener, SessionListener, CELEBRATION_DISMISS_AFTER};
pub use focus_lock::{ExitRequest, FocusLock, LockState, NavigationGuard, NoopGuard};
pub use quotes::Quote;
pub use storage::{Config, KeyValueStore, MemoryStore, SqliteStore};
pub use streak::{StreakRecord, StreakTracker, StreakUpdate, STREAK_KEY};
pub use timer::{
    CountdownEngine, ManualTicker, PhaseDurations, SessionPhase, Tick, TickOutcome,
    TickScheduler, TimerState, TokioTicker,
};
