use chrono::Local;
use clap::Subcommand;
use lucent_core::error::Result;
use lucent_core::{Config, StreakRecord, StreakTracker};
use serde::Serialize;

use super::open_store;

#[derive(Subcommand)]
pub enum StreakAction {
    /// Print the current streak, clearing it first if a day was missed
    Show,
    /// Count a completed work phase now
    Record,
    /// Clear the streak
    Reset,
}

#[derive(Serialize)]
struct StreakView {
    #[serde(flatten)]
    record: StreakRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    increased: Option<bool>,
}

pub fn run(action: StreakAction) -> Result<()> {
    let config = Config::load_or_default();
    let mut tracker = StreakTracker::new(open_store(&config)?);
    let now = Local::now();

    let view = match action {
        StreakAction::Show => {
            tracker.load_and_reconcile(&now);
            StreakView {
                record: tracker.current(),
                increased: None,
            }
        }
        StreakAction::Record => {
            let update = tracker.record_completion(&now);
            StreakView {
                record: tracker.current(),
                increased: Some(update.increased),
            }
        }
        StreakAction::Reset => {
            tracker.reset();
            StreakView {
                record: tracker.current(),
                increased: None,
            }
        }
    };

    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}
