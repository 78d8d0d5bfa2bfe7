//! Core error types for cluckplan-core.
//!
//! Nothing in the core is fatal. Persistence problems are reported as
//! warnings by the store; the variants here cover caller mistakes
//! (unknown ids, invalid transitions) and infrastructure failures surfaced
//! by the storage and config layers.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for cluckplan-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Mutation by identity did not match any record
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// A different focus session is already running
    #[error("Focus session {active_id} is already active")]
    SessionAlreadyActive { active_id: String },

    /// The record exists but cannot make the requested transition
    #[error("Invalid transition for {id}: {reason}")]
    InvalidTransition { id: String, reason: String },
}

impl CoreError {
    pub(crate) fn not_found(kind: &'static str, id: &str) -> Self {
        CoreError::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

/// Storage-specific errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),

    /// Aggregate could not be encoded
    #[error("Failed to encode '{key}': {message}")]
    Encode { key: String, message: String },

    /// Stored entry could not be decoded
    #[error("Failed to decode '{key}': {message}")]
    Decode { key: String, message: String },

    /// Stored entry was written by a newer schema
    #[error("Unsupported schema version {found} for '{key}' (max {supported})")]
    UnsupportedVersion {
        key: String,
        found: u32,
        supported: u32,
    },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) => {
                if e.code == rusqlite::ErrorCode::DatabaseLocked
                    || e.code == rusqlite::ErrorCode::DatabaseBusy
                {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
