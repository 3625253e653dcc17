pub mod config;
pub mod session;
pub mod streak;

use lucent_core::{Config, SqliteStore, StoreError};

/// Open the streak store named in the config.
pub fn open_store(config: &Config) -> Result<SqliteStore, StoreError> {
    SqliteStore::open_default(&config.storage.database_file)
}
