mod config;
pub mod database;
pub mod gateway;

pub use config::{Config, LogConfig, StorageConfig};
pub use database::Database;
pub use gateway::{
    Aggregates, KvGateway, KvStore, LoadReport, MemoryKv, PersistenceGateway, GAME_STATE_KEY,
    SCHEMA_VERSION, SESSIONS_KEY, STATISTICS_KEY, TASKS_KEY,
};

use std::path::PathBuf;

use crate::error::StorageError;

/// Returns the data directory, creating it if needed.
///
/// `CLUCKPLAN_DATA_DIR` wins when set. Otherwise `~/.config/cluckplan`, or
/// `~/.config/cluckplan-dev` with `CLUCKPLAN_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = match std::env::var_os("CLUCKPLAN_DATA_DIR") {
        Some(explicit) => PathBuf::from(explicit),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("CLUCKPLAN_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("cluckplan-dev")
            } else {
                base_dir.join("cluckplan")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| StorageError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
