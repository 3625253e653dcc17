mod config;
mod memory;
mod sqlite;

pub use config::{Config, FocusLockConfig, StorageConfig, TimerConfig};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use std::path::PathBuf;

use crate::error::StoreError;

/// String key-value persistence, the shape of browser local storage.
///
/// Implementations take `&self` and handle their own interior mutability.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Returns the data directory, creating it if needed.
///
/// `LUCENT_DATA_DIR` wins when set. Otherwise `~/.config/lucent`, or
/// `~/.config/lucent-dev` when `LUCENT_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StoreError> {
    let dir = match std::env::var_os("LUCENT_DATA_DIR") {
        Some(custom) => PathBuf::from(custom),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("LUCENT_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("lucent-dev")
            } else {
                base_dir.join("lucent")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
