use serde::{Deserialize, Serialize};

/// Default length of a work phase in minutes.
pub const WORK_MINUTES: u64 = 25;
/// Default length of a break phase in minutes.
pub const BREAK_MINUTES: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    Work,
    Break,
}

impl SessionPhase {
    /// The phase that follows this one. Work and Break alternate forever.
    pub fn opposite(self) -> Self {
        match self {
            SessionPhase::Work => SessionPhase::Break,
            SessionPhase::Break => SessionPhase::Work,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SessionPhase::Work => "Focus",
            SessionPhase::Break => "Break",
        }
    }
}

/// Fixed durations for the two phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseDurations {
    pub work_minutes: u64,
    pub break_minutes: u64,
}

impl PhaseDurations {
    pub fn new(work_minutes: u64, break_minutes: u64) -> Self {
        Self {
            work_minutes,
            break_minutes,
        }
    }

    /// Duration of `phase` in seconds.
    ///
    /// Uses saturating arithmetic so oversized config values cannot overflow.
    pub fn seconds(&self, phase: SessionPhase) -> u64 {
        let minutes = match phase {
            SessionPhase::Work => self.work_minutes,
            SessionPhase::Break => self.break_minutes,
        };
        minutes.saturating_mul(60)
    }
}

impl Default for PhaseDurations {
    fn default() -> Self {
        Self::new(WORK_MINUTES, BREAK_MINUTES)
    }
}

/// Snapshot of the countdown handed to the presentation layer every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub phase: SessionPhase,
    pub remaining_seconds: u64,
    pub is_running: bool,
}

impl TimerState {
    /// Whole minutes left, as shown on the dial.
    pub fn minutes(&self) -> u64 {
        self.remaining_seconds / 60
    }

    /// Seconds component of the remaining time.
    pub fn seconds(&self) -> u64 {
        self.remaining_seconds % 60
    }

    /// `MM:SS`, zero padded.
    pub fn time_string(&self) -> String {
        format!("{:02}:{:02}", self.minutes(), self.seconds())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_durations_are_25_and_5_minutes() {
        let d = PhaseDurations::default();
        assert_eq!(d.seconds(SessionPhase::Work), 1500);
        assert_eq!(d.seconds(SessionPhase::Break), 300);
    }

    #[test]
    fn opposite_alternates() {
        assert_eq!(SessionPhase::Work.opposite(), SessionPhase::Break);
        assert_eq!(SessionPhase::Break.opposite(), SessionPhase::Work);
    }

    #[test]
    fn huge_durations_saturate() {
        let d = PhaseDurations::new(u64::MAX, 1);
        assert_eq!(d.seconds(SessionPhase::Work), u64::MAX);
    }

    #[test]
    fn time_string_pads_minutes_and_seconds() {
        let state = TimerState {
            phase: SessionPhase::Break,
            remaining_seconds: 65,
            is_running: false,
        };
        assert_eq!(state.time_string(), "01:05");
    }

    #[test]
    fn phase_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&SessionPhase::Work).unwrap(), "\"work\"");
    }
}
