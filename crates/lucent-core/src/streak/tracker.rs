//! Daily streak bookkeeping over a key-value store.
//!
//! All day arithmetic lives in `load_and_reconcile` and `record_completion`.
//! Store failures never reach the caller: reads fail open to a zero record
//! and writes are logged and dropped, leaving the in-memory value in charge.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::record::{DayRelation, StreakRecord};
use crate::storage::KeyValueStore;

/// Key the record is stored under.
pub const STREAK_KEY: &str = "pomodoroStreak";

/// Result of recording a completed Work phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakUpdate {
    pub count: u32,
    /// True when this completion started or extended the streak.
    pub increased: bool,
}

/// Streak bookkeeping for one session.
///
/// The store is read once, on first use. After that the in-memory record is
/// authoritative and every change is written through on a best-effort basis.
pub struct StreakTracker<S> {
    store: S,
    record: Option<StreakRecord>,
}

impl<S: KeyValueStore> StreakTracker<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            record: None,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The session's record, or the stored one if nothing has been loaded yet.
    pub fn current(&self) -> StreakRecord {
        match self.record {
            Some(record) => record,
            None => self.read_stored(),
        }
    }

    /// Load the record and clear it if the streak was broken by a missed day.
    ///
    /// Writes only when a reset happened. Returns the count to display.
    pub fn load_and_reconcile<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) -> u32 {
        let stored = self.read_stored();
        let record = match stored.relation_to(now) {
            Some(DayRelation::Stale) => {
                info!(previous = stored.count, "streak broken by a missed day");
                let cleared = StreakRecord::default();
                self.persist(&cleared);
                cleared
            }
            _ => stored,
        };
        self.record = Some(record);
        record.count
    }

    /// Count a completed Work phase at `now`.
    ///
    /// A second completion on the same day leaves the streak alone. The
    /// record is written back in every case.
    pub fn record_completion<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) -> StreakUpdate {
        let mut record = self.loaded();
        let (count, increased) = match record.relation_to(now) {
            None => (1, true),
            Some(DayRelation::Yesterday) => (record.count.saturating_add(1), true),
            Some(DayRelation::Today) => (record.count, false),
            Some(DayRelation::Stale) => (1, true),
        };

        record.count = count;
        if increased {
            record.last_completed = Some(now.with_timezone(&Utc));
            info!(count, "streak extended");
        } else {
            debug!(count, "streak already counted today");
        }
        self.record = Some(record);
        self.persist(&record);

        StreakUpdate { count, increased }
    }

    /// Clear the streak.
    pub fn reset(&mut self) {
        let cleared = StreakRecord::default();
        self.record = Some(cleared);
        self.persist(&cleared);
    }

    fn loaded(&mut self) -> StreakRecord {
        match self.record {
            Some(record) => record,
            None => {
                let record = self.read_stored();
                self.record = Some(record);
                record
            }
        }
    }

    fn read_stored(&self) -> StreakRecord {
        match self.store.get(STREAK_KEY) {
            Ok(Some(raw)) => StreakRecord::parse(&raw).unwrap_or_else(|| {
                warn!(raw = %raw, "malformed streak record, treating as empty");
                StreakRecord::default()
            }),
            Ok(None) => StreakRecord::default(),
            Err(e) => {
                warn!(error = %e, "failed to read streak record");
                StreakRecord::default()
            }
        }
    }

    fn persist(&self, record: &StreakRecord) {
        if let Err(e) = self.store.set(STREAK_KEY, &record.to_json()) {
            warn!(error = %e, "failed to persist streak record");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use chrono::Duration;

    fn day(d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, d, h, 0, 0).unwrap()
    }

    fn tracker_with(raw: &str) -> StreakTracker<MemoryStore> {
        StreakTracker::new(MemoryStore::new().with_entry(STREAK_KEY, raw))
    }

    fn stored(tracker: &StreakTracker<MemoryStore>) -> StreakRecord {
        StreakRecord::parse(&tracker.store().get(STREAK_KEY).unwrap().unwrap()).unwrap()
    }

    #[test]
    fn load_without_record_is_zero_and_writes_nothing() {
        let mut tracker = StreakTracker::new(MemoryStore::new());
        assert_eq!(tracker.load_and_reconcile(&day(10, 9)), 0);
        assert!(tracker.store().get(STREAK_KEY).unwrap().is_none());
    }

    #[test]
    fn load_keeps_count_without_date() {
        let mut tracker = tracker_with(r#"{"count":4,"date":null}"#);
        assert_eq!(tracker.load_and_reconcile(&day(10, 9)), 4);
    }

    #[test]
    fn load_keeps_fresh_streak() {
        let raw = StreakRecord {
            count: 5,
            last_completed: Some(day(9, 22)),
        }
        .to_json();
        let mut tracker = tracker_with(&raw);
        assert_eq!(tracker.load_and_reconcile(&day(10, 9)), 5);
        assert_eq!(stored(&tracker).count, 5);
    }

    #[test]
    fn load_resets_stale_streak_and_persists() {
        let now = day(10, 9);
        let raw = StreakRecord {
            count: 5,
            last_completed: Some(now - Duration::days(3)),
        }
        .to_json();
        let mut tracker = tracker_with(&raw);
        assert_eq!(tracker.load_and_reconcile(&now), 0);
        assert_eq!(stored(&tracker), StreakRecord::default());
    }

    #[test]
    fn load_treats_malformed_as_zero() {
        let mut tracker = tracker_with("{{{");
        assert_eq!(tracker.load_and_reconcile(&day(10, 9)), 0);
    }

    #[test]
    fn first_completion_starts_streak() {
        let mut tracker = StreakTracker::new(MemoryStore::new());
        let update = tracker.record_completion(&day(10, 9));
        assert_eq!(update, StreakUpdate { count: 1, increased: true });
        assert_eq!(stored(&tracker).last_completed, Some(day(10, 9)));
    }

    #[test]
    fn same_day_completion_counts_once() {
        let mut tracker = StreakTracker::new(MemoryStore::new());
        assert!(tracker.record_completion(&day(10, 9)).increased);
        let second = tracker.record_completion(&day(10, 17));
        assert_eq!(second, StreakUpdate { count: 1, increased: false });
        assert_eq!(stored(&tracker).count, 1);
    }

    #[test]
    fn consecutive_days_extend() {
        let mut tracker = StreakTracker::new(MemoryStore::new());
        tracker.record_completion(&day(10, 23));
        let update = tracker.record_completion(&day(11, 0));
        assert_eq!(update, StreakUpdate { count: 2, increased: true });
    }

    #[test]
    fn skipped_day_restarts_at_one() {
        let mut tracker = StreakTracker::new(MemoryStore::new());
        tracker.record_completion(&day(10, 9));
        tracker.record_completion(&day(11, 9));
        let update = tracker.record_completion(&day(13, 9));
        assert_eq!(update, StreakUpdate { count: 1, increased: true });
        assert_eq!(stored(&tracker).last_completed, Some(day(13, 9)));
    }

    #[test]
    fn write_failure_keeps_session_record() {
        let mut tracker = StreakTracker::new(MemoryStore::read_only());
        let first = tracker.record_completion(&day(10, 9));
        assert_eq!(first, StreakUpdate { count: 1, increased: true });

        let again = tracker.record_completion(&day(10, 11));
        assert_eq!(again, StreakUpdate { count: 1, increased: false });

        let next_day = tracker.record_completion(&day(11, 9));
        assert_eq!(next_day, StreakUpdate { count: 2, increased: true });
        assert_eq!(tracker.current().last_completed, Some(day(11, 9)));
        assert!(tracker.store().get(STREAK_KEY).unwrap().is_none());
    }

    #[test]
    fn stale_reset_survives_write_failure() {
        let raw = StreakRecord {
            count: 5,
            last_completed: Some(day(1, 9)),
        }
        .to_json();
        let store = MemoryStore::read_only().with_entry(STREAK_KEY, &raw);
        let mut tracker = StreakTracker::new(store);
        assert_eq!(tracker.load_and_reconcile(&day(10, 9)), 0);
        assert_eq!(tracker.current(), StreakRecord::default());
        assert_eq!(tracker.record_completion(&day(10, 10)).count, 1);
    }

    #[test]
    fn store_is_read_once_per_session() {
        let mut tracker = StreakTracker::new(MemoryStore::new());
        tracker.record_completion(&day(10, 9));
        tracker
            .store()
            .set(STREAK_KEY, r#"{"count":9,"date":null}"#)
            .unwrap();
        assert_eq!(tracker.current().count, 1);
        assert!(!tracker.record_completion(&day(10, 12)).increased);
    }

    #[test]
    fn reset_writes_zero_record() {
        let mut tracker = StreakTracker::new(MemoryStore::new());
        tracker.record_completion(&day(10, 9));
        tracker.reset();
        assert_eq!(stored(&tracker), StreakRecord::default());
    }
}
