mod engine;
mod phase;
mod ticker;

pub use engine::{CountdownEngine, TickOutcome};
pub use phase::{PhaseDurations, SessionPhase, TimerState, BREAK_MINUTES, WORK_MINUTES};
pub use ticker::{ManualTicker, Tick, TickScheduler, TokioTicker, TICK_INTERVAL};
