use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Persisted streak: `{"count": n, "date": "<RFC 3339>" | null}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakRecord {
    #[serde(default)]
    pub count: u32,
    /// Moment of the last streak-extending Work completion.
    #[serde(default, rename = "date")]
    pub last_completed: Option<DateTime<Utc>>,
}

/// Where a stored completion falls relative to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayRelation {
    Today,
    Yesterday,
    /// Two or more days ago, or in the future.
    Stale,
}

impl StreakRecord {
    /// Parse stored JSON. `None` means the content was malformed.
    pub fn parse(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }

    pub fn to_json(&self) -> String {
        // Two plain fields; serialization cannot fail.
        serde_json::to_string(self).unwrap_or_else(|_| r#"{"count":0,"date":null}"#.to_string())
    }

    /// Relation of the last completion to `now`, or `None` when there is none.
    pub fn relation_to<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Option<DayRelation> {
        self.last_completed.map(|last| day_relation(&last, now))
    }
}

/// Compare calendar days in the time zone of `now`.
///
/// Only (year, month, day) matter: 23:59 and 00:01 the next morning are one
/// day apart.
pub fn day_relation<Tz: TimeZone>(last: &DateTime<Utc>, now: &DateTime<Tz>) -> DayRelation {
    let last_day = last.with_timezone(&now.timezone()).date_naive();
    match (now.date_naive() - last_day).num_days() {
        0 => DayRelation::Today,
        1 => DayRelation::Yesterday,
        _ => DayRelation::Stale,
    }
}
