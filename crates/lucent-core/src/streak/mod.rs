mod record;
mod tracker;

pub use record::{day_relation, DayRelation, StreakRecord};
pub use tracker::{StreakTracker, StreakUpdate, STREAK_KEY};
