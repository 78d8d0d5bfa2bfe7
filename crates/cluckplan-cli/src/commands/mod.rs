pub mod config;
pub mod focus;
pub mod game;
pub mod stats;
pub mod task;

use cluckplan_core::{AppStore, Config, Database, KvGateway, SystemClock};

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Open the store backed by the configured database file.
pub fn open_store(config: &Config) -> Result<AppStore, Box<dyn std::error::Error>> {
    let db = Database::open(&config.storage.db_file)?;
    let store = AppStore::open(KvGateway::new(db), SystemClock)?;
    for warning in store.load_warnings() {
        eprintln!("warning: {warning}; using defaults");
    }
    Ok(store)
}

/// Print a value as pretty JSON, followed by any save warning.
pub fn print_json<T: serde::Serialize>(store: &AppStore, value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    if let Some(warning) = store.persistence_warning() {
        eprintln!("warning: changes not saved: {warning}");
    }
    Ok(())
}
