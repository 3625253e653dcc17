//! Focus session controller.
//!
//! Owns everything a mounted session screen needs: the countdown, the streak
//! tracker, the focus lock and the handle of the one recurring tick. All
//! transitions run on the caller's thread through `&mut self`, so a tick can
//! never observe a half-applied reset.
//!
//! Every path that stops the countdown cancels the tick schedule before it
//! touches state, and ticks carry the generation they were scheduled under,
//! so one that was already queued when its schedule was cancelled is dropped.

use chrono::Utc;
use tracing::{debug, info};

use crate::clock::{Clock, SystemClock};
use crate::events::{Event, NoopListener, SessionListener};
use crate::focus_lock::{ExitRequest, FocusLock, LockState, NavigationGuard, NoopGuard};
use crate::quotes::{random_quote, Quote};
use crate::storage::{Config, KeyValueStore};
use crate::streak::StreakTracker;
use crate::timer::{
    CountdownEngine, PhaseDurations, SessionPhase, Tick, TickOutcome, TickScheduler, TimerState,
};

/// Answer to a back-navigation gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackNavigation {
    /// The lock is up; the guard put the current view back.
    Blocked,
    /// Nothing is locked; the host may navigate.
    Allowed,
}

impl BackNavigation {
    /// Events to report for this answer.
    pub fn events(self) -> Vec<Event> {
        match self {
            BackNavigation::Blocked => vec![Event::BackNavigationBlocked],
            BackNavigation::Allowed => Vec::new(),
        }
    }
}

/// Settings a controller is created with.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionSettings {
    pub durations: PhaseDurations,
    pub focus_lock_enabled: bool,
}

impl From<&Config> for SessionSettings {
    fn from(config: &Config) -> Self {
        Self {
            durations: config.durations(),
            focus_lock_enabled: config.focus_lock.enabled_by_default,
        }
    }
}

pub struct FocusSessionController<S, T: TickScheduler> {
    engine: CountdownEngine,
    tracker: StreakTracker<S>,
    lock: FocusLock,
    scheduler: T,
    generation: u64,
    streak: u32,
    exit_quote: Option<Quote>,
    clock: Box<dyn Clock>,
    guard: Box<dyn NavigationGuard>,
    guard_installed: bool,
    listener: Box<dyn SessionListener>,
}

impl<S: KeyValueStore, T: TickScheduler> FocusSessionController<S, T> {
    pub fn new(store: S, scheduler: T, settings: SessionSettings) -> Self {
        Self {
            engine: CountdownEngine::new(settings.durations),
            tracker: StreakTracker::new(store),
            lock: FocusLock::new(settings.focus_lock_enabled),
            scheduler,
            generation: 0,
            streak: 0,
            exit_quote: None,
            clock: Box::new(SystemClock),
            guard: Box::new(NoopGuard),
            guard_installed: false,
            listener: Box::new(NoopListener),
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_listener(mut self, listener: impl SessionListener + 'static) -> Self {
        self.listener = Box::new(listener);
        self
    }

    pub fn with_guard(mut self, guard: impl NavigationGuard + 'static) -> Self {
        self.guard = Box::new(guard);
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn timer_state(&self) -> TimerState {
        self.engine.state()
    }

    pub fn lock_state(&self) -> LockState {
        self.lock.state()
    }

    pub fn focus_lock_enabled(&self) -> bool {
        self.lock.enabled()
    }

    pub fn is_locked(&self) -> bool {
        self.lock.is_locked()
    }

    pub fn pending_exit_confirmation(&self) -> bool {
        self.lock.pending_exit_confirmation()
    }

    /// Streak count currently on display.
    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn progress(&self) -> f64 {
        self.engine.progress()
    }

    pub fn time_string(&self) -> String {
        self.engine.time_string()
    }

    /// Quote for the confirmation dialog, while one is pending.
    pub fn exit_quote(&self) -> Option<&Quote> {
        self.exit_quote.as_ref()
    }

    pub fn tracker(&self) -> &StreakTracker<S> {
        &self.tracker
    }

    pub fn scheduler(&self) -> &T {
        &self.scheduler
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Seed the streak display from the store, clearing a broken streak.
    pub fn mount(&mut self) -> u32 {
        self.streak = self.tracker.load_and_reconcile(&self.clock.now());
        debug!(streak = self.streak, "session mounted");
        self.streak
    }

    pub fn unmount(&mut self) {
        self.cancel_ticks();
        self.engine.pause();
        self.lock.reset();
        self.exit_quote = None;
        self.sync_guard();
        debug!("session unmounted");
    }

    // ── Timer commands ───────────────────────────────────────────────

    pub fn start(&mut self) -> Vec<Event> {
        if !self.engine.start() {
            return Vec::new();
        }
        self.schedule_ticks();

        let state = self.engine.state();
        let mut events = vec![Event::TimerStarted {
            phase: state.phase,
            remaining_seconds: state.remaining_seconds,
            at: self.now_utc(),
        }];
        if self.lock.engage() {
            self.sync_guard();
            events.push(Event::FocusLocked { at: self.now_utc() });
        }
        debug!(phase = ?state.phase, remaining = state.remaining_seconds, "timer started");
        events
    }

    /// Stop ticking. The lock stays up; only the exit flow takes it down.
    pub fn pause(&mut self) -> Vec<Event> {
        self.cancel_ticks();
        if !self.engine.pause() {
            return Vec::new();
        }
        let state = self.engine.state();
        debug!(remaining = state.remaining_seconds, "timer paused");
        vec![Event::TimerPaused {
            phase: state.phase,
            remaining_seconds: state.remaining_seconds,
            at: self.now_utc(),
        }]
    }

    /// The single play/pause button.
    pub fn toggle(&mut self) -> Vec<Event> {
        if self.engine.is_running() {
            self.pause()
        } else {
            self.start()
        }
    }

    pub fn reset(&mut self, to_phase: SessionPhase) -> Vec<Event> {
        self.cancel_ticks();
        self.engine.reset(to_phase);
        let mut events = vec![Event::TimerReset {
            phase: to_phase,
            at: self.now_utc(),
        }];
        events.extend(self.release_lock());
        debug!(phase = ?to_phase, "timer reset");
        events
    }

    /// The reset button: rewind the phase that is showing.
    pub fn reset_current(&mut self) -> Vec<Event> {
        self.reset(self.engine.phase())
    }

    /// Entry point for ticks coming from the scheduler.
    pub fn handle_tick(&mut self, tick: Tick) -> Vec<Event> {
        if tick.generation != self.generation || !self.scheduler.is_scheduled() {
            debug!(
                tick = tick.generation,
                current = self.generation,
                "dropping stale tick"
            );
            return Vec::new();
        }
        self.tick()
    }

    /// Apply one elapsed second.
    pub fn tick(&mut self) -> Vec<Event> {
        match self.engine.tick() {
            TickOutcome::Idle => Vec::new(),
            TickOutcome::Ticked => {
                self.listener.on_tick(&self.engine.state());
                Vec::new()
            }
            TickOutcome::Completed { finished } => self.complete_phase(finished),
        }
    }

    // ── Focus lock commands ──────────────────────────────────────────

    pub fn set_focus_lock_enabled(&mut self, enabled: bool) -> Vec<Event> {
        self.lock.set_enabled(enabled);
        vec![Event::FocusLockToggled { enabled }]
    }

    pub fn toggle_focus_lock(&mut self) -> Vec<Event> {
        let enabled = self.lock.toggle_enabled();
        vec![Event::FocusLockToggled { enabled }]
    }

    pub fn request_exit(&mut self) -> Vec<Event> {
        match self.lock.request_exit(self.engine.is_running()) {
            ExitRequest::ConfirmationRequired => {
                let quote = self.exit_quote.get_or_insert_with(random_quote).clone();
                debug!("exit confirmation requested");
                vec![Event::ExitConfirmationRequested { quote }]
            }
            ExitRequest::Unlocked => {
                self.sync_guard();
                vec![Event::FocusUnlocked { at: self.now_utc() }]
            }
            ExitRequest::Ignored => Vec::new(),
        }
    }

    /// Leave the session: stops the timer and drops the lock.
    pub fn confirm_exit(&mut self) -> Vec<Event> {
        if !self.lock.pending_exit_confirmation() {
            return Vec::new();
        }
        let mut events = self.pause();
        self.lock.confirm_exit();
        self.exit_quote = None;
        self.sync_guard();
        events.push(Event::FocusUnlocked { at: self.now_utc() });
        events
    }

    /// Stay in the session. The countdown is untouched.
    pub fn cancel_exit(&mut self) -> Vec<Event> {
        if !self.lock.cancel_exit() {
            return Vec::new();
        }
        self.exit_quote = None;
        vec![Event::ExitCancelled]
    }

    pub fn handle_back_navigation(&mut self) -> BackNavigation {
        if self.lock.is_locked() {
            self.guard.reassert();
            debug!("back navigation blocked");
            BackNavigation::Blocked
        } else {
            BackNavigation::Allowed
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn complete_phase(&mut self, finished: SessionPhase) -> Vec<Event> {
        self.cancel_ticks();
        let now = self.clock.now();

        let streak = match finished {
            SessionPhase::Work => {
                let update = self.tracker.record_completion(&now);
                self.streak = update.count;
                Some(update)
            }
            SessionPhase::Break => None,
        };

        let next = self.engine.phase();
        info!(finished = ?finished, next = ?next, "phase completed");

        let mut events = vec![Event::PhaseCompleted {
            finished,
            next,
            streak,
            at: now.with_timezone(&Utc),
        }];
        events.extend(self.release_lock());

        let state = self.engine.state();
        self.listener.on_tick(&state);
        if let Some(update) = streak.filter(|u| u.increased) {
            self.listener.on_streak_increased(update.count);
            events.push(Event::StreakIncreased {
                count: update.count,
            });
        }
        self.listener.on_phase_change(next);
        events
    }

    fn release_lock(&mut self) -> Option<Event> {
        self.exit_quote = None;
        let was_locked = self.lock.reset();
        self.sync_guard();
        was_locked.then(|| Event::FocusUnlocked { at: self.now_utc() })
    }

    fn schedule_ticks(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.scheduler.schedule(self.generation);
    }

    fn cancel_ticks(&mut self) {
        self.scheduler.cancel();
    }

    /// Keep the navigation guard installed exactly while locked.
    fn sync_guard(&mut self) {
        let locked = self.lock.is_locked();
        if locked && !self.guard_installed {
            self.guard.install();
            self.guard_installed = true;
        } else if !locked && self.guard_installed {
            self.guard.teardown();
            self.guard_installed = false;
        }
    }

    fn now_utc(&self) -> chrono::DateTime<Utc> {
        self.clock.now().with_timezone(&Utc)
    }
}

impl<S, T: TickScheduler> Drop for FocusSessionController<S, T> {
    fn drop(&mut self) {
        self.scheduler.cancel();
        if self.guard_installed {
            self.guard.teardown();
        }
    }
}
