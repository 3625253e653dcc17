//! Countdown engine.
//!
//! A tick-driven two-phase state machine. It owns no thread and reads no
//! clock: the caller invokes `tick()` once per elapsed second, and the engine
//! only reacts to ticks it actually observes. Time lost while the host was
//! suspended is not caught up.
//!
//! ## State Transitions
//!
//! ```text
//! Work(running) --tick to 0--> Break(stopped) --start--> Break(running)
//! Break(running) --tick to 0--> Work(stopped)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = CountdownEngine::new(PhaseDurations::default());
//! engine.start();
//! // Once per second:
//! if let TickOutcome::Completed { finished } = engine.tick() { /* ... */ }
//! ```

use serde::{Deserialize, Serialize};

use super::phase::{PhaseDurations, SessionPhase, TimerState};

/// What a single tick did to the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The engine was not running; nothing changed.
    Idle,
    /// One second was taken off the current phase.
    Ticked,
    /// The current phase reached zero and the engine moved to the next one.
    Completed { finished: SessionPhase },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountdownEngine {
    durations: PhaseDurations,
    phase: SessionPhase,
    remaining_seconds: u64,
    is_running: bool,
}

impl CountdownEngine {
    /// Create an engine at the start of a stopped Work phase.
    pub fn new(durations: PhaseDurations) -> Self {
        Self {
            durations,
            phase: SessionPhase::Work,
            remaining_seconds: durations.seconds(SessionPhase::Work),
            is_running: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_seconds
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn durations(&self) -> PhaseDurations {
        self.durations
    }

    pub fn total_seconds(&self) -> u64 {
        self.durations.seconds(self.phase)
    }

    pub fn state(&self) -> TimerState {
        TimerState {
            phase: self.phase,
            remaining_seconds: self.remaining_seconds,
            is_running: self.is_running,
        }
    }

    /// 0.0 .. 1.0 progress within the current phase.
    pub fn progress(&self) -> f64 {
        let total = self.total_seconds();
        if total == 0 {
            return 0.0;
        }
        let elapsed = total.saturating_sub(self.remaining_seconds);
        (elapsed as f64 / total as f64).clamp(0.0, 1.0)
    }

    pub fn time_string(&self) -> String {
        self.state().time_string()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Returns `false` if the engine was already running.
    pub fn start(&mut self) -> bool {
        if self.is_running {
            return false;
        }
        self.is_running = true;
        true
    }

    /// Returns `false` if the engine was already stopped.
    pub fn pause(&mut self) -> bool {
        if !self.is_running {
            return false;
        }
        self.is_running = false;
        true
    }

    /// Stop and rewind to the full length of `to_phase`.
    pub fn reset(&mut self, to_phase: SessionPhase) {
        self.is_running = false;
        self.phase = to_phase;
        self.remaining_seconds = self.durations.seconds(to_phase);
    }

    /// Advance by one observed second.
    ///
    /// The tick that brings the countdown to zero also completes the phase, so
    /// a fresh Work phase completes on exactly its 1500th tick. Completion
    /// stops the engine, which makes any further tick a no-op until the next
    /// `start()`.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.is_running {
            return TickOutcome::Idle;
        }
        if self.remaining_seconds > 0 {
            self.remaining_seconds -= 1;
        }
        if self.remaining_seconds > 0 {
            return TickOutcome::Ticked;
        }
        let finished = self.phase;
        self.reset(finished.opposite());
        TickOutcome::Completed { finished }
    }
}

impl Default for CountdownEngine {
    fn default() -> Self {
        Self::new(PhaseDurations::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn run_ticks(engine: &mut CountdownEngine, n: u64) -> Vec<TickOutcome> {
        (0..n).map(|_| engine.tick()).collect()
    }

    #[test]
    fn new_engine_is_stopped_work() {
        let engine = CountdownEngine::default();
        assert_eq!(engine.phase(), SessionPhase::Work);
        assert_eq!(engine.remaining_seconds(), 1500);
        assert!(!engine.is_running());
    }

    #[test]
    fn start_twice_is_noop() {
        let mut engine = CountdownEngine::default();
        assert!(engine.start());
        assert!(!engine.start());
        assert!(engine.is_running());
    }

    #[test]
    fn pause_keeps_phase_and_remaining() {
        let mut engine = CountdownEngine::default();
        engine.start();
        run_ticks(&mut engine, 10);
        assert!(engine.pause());
        assert_eq!(engine.phase(), SessionPhase::Work);
        assert_eq!(engine.remaining_seconds(), 1490);
    }

    #[test]
    fn tick_while_paused_is_noop() {
        let mut engine = CountdownEngine::default();
        assert_eq!(engine.tick(), TickOutcome::Idle);
        assert_eq!(engine.remaining_seconds(), 1500);
    }

    #[test]
    fn work_completes_on_exactly_the_1500th_tick() {
        let mut engine = CountdownEngine::default();
        engine.start();
        let outcomes = run_ticks(&mut engine, 1500);
        let completions: Vec<_> = outcomes
            .iter()
            .enumerate()
            .filter(|(_, o)| matches!(o, TickOutcome::Completed { .. }))
            .collect();
        assert_eq!(completions.len(), 1);
        assert_eq!(completions[0].0, 1499);
        assert_eq!(
            *completions[0].1,
            TickOutcome::Completed {
                finished: SessionPhase::Work
            }
        );
        assert_eq!(engine.phase(), SessionPhase::Break);
        assert_eq!(engine.remaining_seconds(), 300);
        assert!(!engine.is_running());
    }

    #[test]
    fn extra_ticks_after_completion_do_not_double_complete() {
        let mut engine = CountdownEngine::default();
        engine.start();
        run_ticks(&mut engine, 1500);
        assert_eq!(engine.tick(), TickOutcome::Idle);
        assert_eq!(engine.phase(), SessionPhase::Break);
        assert_eq!(engine.remaining_seconds(), 300);
    }

    #[test]
    fn break_completion_returns_to_work() {
        let mut engine = CountdownEngine::default();
        engine.reset(SessionPhase::Break);
        engine.start();
        let outcomes = run_ticks(&mut engine, 300);
        assert_eq!(
            outcomes.last(),
            Some(&TickOutcome::Completed {
                finished: SessionPhase::Break
            })
        );
        assert_eq!(engine.phase(), SessionPhase::Work);
        assert_eq!(engine.remaining_seconds(), 1500);
    }

    #[test]
    fn zero_length_phase_completes_on_first_tick() {
        let mut engine = CountdownEngine::new(PhaseDurations::new(0, 5));
        engine.start();
        assert_eq!(
            engine.tick(),
            TickOutcome::Completed {
                finished: SessionPhase::Work
            }
        );
        assert_eq!(engine.progress(), 0.0);
    }

    #[test]
    fn progress_is_fraction_of_elapsed_time() {
        let mut engine = CountdownEngine::default();
        assert_eq!(engine.progress(), 0.0);
        engine.start();
        run_ticks(&mut engine, 750);
        assert!((engine.progress() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn time_string_tracks_countdown() {
        let mut engine = CountdownEngine::default();
        assert_eq!(engine.time_string(), "25:00");
        engine.start();
        engine.tick();
        assert_eq!(engine.time_string(), "24:59");
    }

    proptest! {
        #[test]
        fn reset_sets_full_duration(work in 0u64..240, brk in 0u64..120, to_break in any::<bool>()) {
            let durations = PhaseDurations::new(work, brk);
            let mut engine = CountdownEngine::new(durations);
            engine.start();
            engine.tick();
            let phase = if to_break { SessionPhase::Break } else { SessionPhase::Work };
            engine.reset(phase);
            prop_assert_eq!(engine.remaining_seconds(), durations.seconds(phase));
            prop_assert_eq!(engine.phase(), phase);
            prop_assert!(!engine.is_running());
        }

        #[test]
        fn remaining_never_exceeds_duration(ticks in 0u64..2000) {
            let mut engine = CountdownEngine::default();
            for _ in 0..ticks {
                engine.start();
                engine.tick();
                prop_assert!(engine.remaining_seconds() <= engine.total_seconds());
                prop_assert!((0.0..=1.0).contains(&engine.progress()));
            }
        }
    }
}
