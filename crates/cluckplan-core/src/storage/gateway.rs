//! Persistence of the four root aggregates.
//!
//! Each aggregate lives under its own key as a versioned JSON envelope:
//!
//! ```text
//! tasks          -> {"version": 1, "data": [Task, ...]}
//! focusSessions  -> {"version": 1, "data": [FocusSession, ...]}
//! statistics     -> {"version": 1, "data": Statistics}
//! gameState      -> {"version": 1, "data": GameState}
//! ```
//!
//! Entries are loaded independently: one unreadable entry falls back to its
//! default without discarding the others. A bare aggregate with no envelope
//! is read as version 0.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::Database;
use crate::error::StorageError;
use crate::focus::FocusSession;
use crate::game::GameState;
use crate::stats::Statistics;
use crate::task::Task;

pub const TASKS_KEY: &str = "tasks";
pub const SESSIONS_KEY: &str = "focusSessions";
pub const STATISTICS_KEY: &str = "statistics";
pub const GAME_STATE_KEY: &str = "gameState";

/// Newest envelope version this build writes and understands.
pub const SCHEMA_VERSION: u32 = 1;

/// Everything the app persists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Aggregates {
    pub tasks: Vec<Task>,
    pub focus_sessions: Vec<FocusSession>,
    pub statistics: Statistics,
    pub game_state: GameState,
}

/// Result of a load: whatever could be read, plus the entries that could not.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub state: Aggregates,
    pub skipped: Vec<StorageError>,
}

/// Flat string key-value backend.
pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl KvStore for Database {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.kv_get(key)?)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        Ok(self.kv_set(key, value)?)
    }
}

/// In-process map. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryKv {
    entries: Rc<RefCell<HashMap<String, String>>>,
    fail_writes: Rc<Cell<bool>>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every write fail until switched back, to exercise the
    /// persistence-warning path.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    pub fn insert_raw(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }
}

impl KvStore for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.raw(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes.get() {
            return Err(StorageError::QueryFailed(format!("write to '{key}' rejected")));
        }
        self.insert_raw(key, value);
        Ok(())
    }
}

/// Loads and saves [`Aggregates`].
pub trait PersistenceGateway {
    /// Read every aggregate. Only a backend failure is an error; undecodable
    /// entries are reported in [`LoadReport::skipped`].
    fn load(&self) -> Result<LoadReport, StorageError>;

    /// Write every aggregate. All entries are attempted; the first failure is
    /// returned.
    fn save(&self, state: &Aggregates) -> Result<(), StorageError>;
}

/// [`PersistenceGateway`] over any [`KvStore`].
#[derive(Debug, Clone)]
pub struct KvGateway<S> {
    store: S,
}

impl<S: KvStore> KvGateway<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn load_entry<T: DeserializeOwned + Default>(
        &self,
        key: &str,
        skipped: &mut Vec<StorageError>,
    ) -> Result<T, StorageError> {
        let Some(raw) = self.store.get(key)? else {
            return Ok(T::default());
        };
        match decode(key, &raw) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "skipping unreadable entry");
                skipped.push(e);
                Ok(T::default())
            }
        }
    }
}

impl<S: KvStore> PersistenceGateway for KvGateway<S> {
    fn load(&self) -> Result<LoadReport, StorageError> {
        let mut skipped = Vec::new();
        let state = Aggregates {
            tasks: self.load_entry(TASKS_KEY, &mut skipped)?,
            focus_sessions: self.load_entry(SESSIONS_KEY, &mut skipped)?,
            statistics: self.load_entry(STATISTICS_KEY, &mut skipped)?,
            game_state: self.load_entry(GAME_STATE_KEY, &mut skipped)?,
        };
        Ok(LoadReport { state, skipped })
    }

    fn save(&self, state: &Aggregates) -> Result<(), StorageError> {
        let entries = [
            (TASKS_KEY, encode(TASKS_KEY, &state.tasks)),
            (SESSIONS_KEY, encode(SESSIONS_KEY, &state.focus_sessions)),
            (STATISTICS_KEY, encode(STATISTICS_KEY, &state.statistics)),
            (GAME_STATE_KEY, encode(GAME_STATE_KEY, &state.game_state)),
        ];

        let mut first_error = None;
        for (key, encoded) in entries {
            let result = encoded.and_then(|value| self.store.set(key, &value));
            if let Err(e) = result {
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    version: u32,
    data: &'a T,
}

fn encode<T: Serialize>(key: &str, value: &T) -> Result<String, StorageError> {
    serde_json::to_string(&EnvelopeRef {
        version: SCHEMA_VERSION,
        data: value,
    })
    .map_err(|e| StorageError::Encode {
        key: key.to_string(),
        message: e.to_string(),
    })
}

fn decode<T: DeserializeOwned>(key: &str, raw: &str) -> Result<T, StorageError> {
    let decode_err = |e: serde_json::Error| StorageError::Decode {
        key: key.to_string(),
        message: e.to_string(),
    };

    let value: serde_json::Value = serde_json::from_str(raw).map_err(decode_err)?;
    let (version, data) = match value {
        serde_json::Value::Object(mut obj)
            if obj.contains_key("version") && obj.contains_key("data") =>
        {
            let version = obj
                .get("version")
                .and_then(serde_json::Value::as_u64)
                .ok_or_else(|| StorageError::Decode {
                    key: key.to_string(),
                    message: "version is not an unsigned integer".to_string(),
                })?;
            let data = obj.remove("data").unwrap_or_default();
            (version, data)
        }
        bare => (0, bare),
    };

    if version > u64::from(SCHEMA_VERSION) {
        return Err(StorageError::UnsupportedVersion {
            key: key.to_string(),
            found: u32::try_from(version).unwrap_or(u32::MAX),
            supported: SCHEMA_VERSION,
        });
    }
    serde_json::from_value(data).map_err(decode_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskCategory;
    use chrono::Utc;

    fn sample() -> Aggregates {
        let mut state = Aggregates::default();
        state
            .tasks
            .push(Task::new("Lay eggs", TaskCategory::Work, None, Utc::now()));
        state.statistics.feathers_earned = 42;
        state
    }

    #[test]
    fn save_then_load() {
        let gateway = KvGateway::new(MemoryKv::new());
        let state = sample();
        gateway.save(&state).unwrap();
        let report = gateway.load().unwrap();
        assert!(report.skipped.is_empty());
        assert_eq!(report.state, state);
    }

    #[test]
    fn entries_carry_version_tag() {
        let kv = MemoryKv::new();
        KvGateway::new(kv.clone()).save(&sample()).unwrap();
        let raw: serde_json::Value = serde_json::from_str(&kv.raw(STATISTICS_KEY).unwrap()).unwrap();
        assert_eq!(raw["version"], SCHEMA_VERSION);
        assert_eq!(raw["data"]["feathers_earned"], 42);
    }

    #[test]
    fn bare_legacy_entry_is_accepted() {
        let kv = MemoryKv::new();
        kv.insert_raw(STATISTICS_KEY, r#"{"feathers_earned": 7, "streak_days": 2}"#);
        let report = KvGateway::new(kv).load().unwrap();
        assert_eq!(report.state.statistics.feathers_earned, 7);
        assert_eq!(report.state.statistics.streak_days, 2);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let kv = MemoryKv::new();
        kv.insert_raw(
            STATISTICS_KEY,
            r#"{"version": 1, "data": {"feathers_earned": 3, "shiny_new_counter": 9}}"#,
        );
        let report = KvGateway::new(kv).load().unwrap();
        assert!(report.skipped.is_empty());
        assert_eq!(report.state.statistics.feathers_earned, 3);
    }

    #[test]
    fn bad_entry_is_skipped_alone() {
        let kv = MemoryKv::new();
        let gateway = KvGateway::new(kv.clone());
        gateway.save(&sample()).unwrap();
        kv.insert_raw(GAME_STATE_KEY, "{not json");
        kv.insert_raw(SESSIONS_KEY, r#"{"version": 99, "data": []}"#);

        let report = gateway.load().unwrap();
        assert_eq!(report.skipped.len(), 2);
        assert!(report
            .skipped
            .iter()
            .any(|e| matches!(e, StorageError::UnsupportedVersion { found: 99, .. })));
        assert_eq!(report.state.tasks.len(), 1);
        assert_eq!(report.state.game_state, GameState::default());
    }

    #[test]
    fn failed_write_is_reported() {
        let kv = MemoryKv::new();
        kv.set_fail_writes(true);
        let err = KvGateway::new(kv).save(&sample()).unwrap_err();
        assert!(matches!(err, StorageError::QueryFailed(_)));
    }

    #[test]
    fn sqlite_backend_round_trip() {
        let gateway = KvGateway::new(Database::open_memory().unwrap());
        gateway.save(&sample()).unwrap();
        let report = gateway.load().unwrap();
        assert_eq!(report.state.statistics.feathers_earned, 42);
        assert_eq!(
            gateway.store().kv_keys().unwrap(),
            vec![
                "focusSessions".to_string(),
                "gameState".to_string(),
                "statistics".to_string(),
                "tasks".to_string()
            ]
        );
    }
}
