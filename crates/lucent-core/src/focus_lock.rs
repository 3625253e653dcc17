//! Focus lock: an optional mode that makes leaving an active session take two
//! deliberate steps.
//!
//! ## State Transitions
//!
//! ```text
//! Unlocked --start (enabled)--> Locked
//! Locked --exit (running)--> ConfirmingExit --confirm--> Unlocked
//!                                           --cancel--> Locked
//! Locked --exit (paused)--> Unlocked
//! any --reset--> Unlocked
//! ```
//!
//! While locked, the host's back gesture is swallowed by a [`NavigationGuard`].

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockState {
    Unlocked,
    Locked,
    ConfirmingExit,
}

/// What an exit request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitRequest {
    /// The timer is running; the user has to confirm.
    ConfirmationRequired,
    /// The timer was paused, so the lock was dropped straight away.
    Unlocked,
    /// Nothing to exit from.
    Ignored,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FocusLock {
    enabled: bool,
    state: LockState,
}

impl FocusLock {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            state: LockState::Unlocked,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// The user preference. Only read when a session starts.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn state(&self) -> LockState {
        self.state
    }

    /// True while the overlay is showing, including during confirmation.
    pub fn is_locked(&self) -> bool {
        self.state != LockState::Unlocked
    }

    pub fn pending_exit_confirmation(&self) -> bool {
        self.state == LockState::ConfirmingExit
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn toggle_enabled(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.enabled
    }

    /// Lock on session start. Returns true if this call locked.
    pub fn engage(&mut self) -> bool {
        if self.enabled && self.state == LockState::Unlocked {
            self.state = LockState::Locked;
            return true;
        }
        false
    }

    pub fn request_exit(&mut self, is_running: bool) -> ExitRequest {
        match self.state {
            LockState::Locked if is_running => {
                self.state = LockState::ConfirmingExit;
                ExitRequest::ConfirmationRequired
            }
            LockState::Locked => {
                self.state = LockState::Unlocked;
                ExitRequest::Unlocked
            }
            LockState::ConfirmingExit => ExitRequest::ConfirmationRequired,
            LockState::Unlocked => ExitRequest::Ignored,
        }
    }

    /// Returns true if a pending confirmation was accepted.
    pub fn confirm_exit(&mut self) -> bool {
        if self.state != LockState::ConfirmingExit {
            return false;
        }
        self.state = LockState::Unlocked;
        true
    }

    /// Returns true if a pending confirmation was withdrawn.
    pub fn cancel_exit(&mut self) -> bool {
        if self.state != LockState::ConfirmingExit {
            return false;
        }
        self.state = LockState::Locked;
        true
    }

    /// Drop any lock. Returns true if something was locked.
    pub fn reset(&mut self) -> bool {
        let was_locked = self.is_locked();
        self.state = LockState::Unlocked;
        was_locked
    }
}

/// Hook into the host's back-navigation gesture.
///
/// Installed when the lock engages and torn down as soon as it releases.
pub trait NavigationGuard {
    fn install(&mut self);

    fn teardown(&mut self);

    /// Called for each back gesture while installed; pushes the current view
    /// back so the gesture goes nowhere.
    fn reassert(&mut self) {}
}

/// Guard for hosts with no back gesture.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopGuard;

impl NavigationGuard for NoopGuard {
    fn install(&mut self) {}

    fn teardown(&mut self) {}
}
