//! Core error types for habitkit-core.
//!
//! Validation and not-found errors are raised before any state is touched.
//! Persistence errors are usually caught by the engines and downgraded to
//! warnings (see [`crate::habit::HabitStore::take_warnings`]), but the raw
//! type is still exposed for callers talking to a store directly.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for habitkit-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Bad user input
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Operation referenced an id that is not in the collection
    #[error("Habit {id} not found")]
    NotFound { id: i64 },

    /// Underlying key-value store failed
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required text field was empty after trimming
    #[error("'{field}' must not be empty")]
    EmptyField { field: String },

    /// Goal must be a positive integer
    #[error("goal must be at least 1 (got {goal})")]
    NonPositiveGoal { goal: i64 },

    /// Two habits in one collection share an id
    #[error("duplicate habit id {id}")]
    DuplicateId { id: i64 },

    /// Date key is not a valid `YYYY-MM-DD` calendar day
    #[error("invalid date key '{0}': expected YYYY-MM-DD")]
    InvalidDateKey(String),

    /// Backup document is missing its version field
    #[error("backup document has no version field")]
    MissingVersion,

    /// Backup document was written by an incompatible format
    #[error("unsupported backup version '{0}'")]
    UnsupportedVersion(String),

    /// Backup document could not be parsed
    #[error("malformed backup document: {0}")]
    MalformedDocument(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Key-value store errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// Store could not be opened
    #[error("Failed to open store at {path}: {message}")]
    OpenFailed { path: PathBuf, message: String },

    /// Read failed
    #[error("Failed to read '{key}': {message}")]
    ReadFailed { key: String, message: String },

    /// Write or delete failed
    #[error("Failed to write '{key}': {message}")]
    WriteFailed { key: String, message: String },

    /// Store is locked by another writer
    #[error("Store is locked")]
    Locked,

    /// Stored blob exists but cannot be decoded
    #[error("Corrupt value under '{key}': {message}")]
    Corrupt { key: String, message: String },
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

    /// Unknown dot-path key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

impl PersistenceError {
    pub(crate) fn from_sqlite(key: &str, err: rusqlite::Error, write: bool) -> Self {
        if let rusqlite::Error::SqliteFailure(inner, _) = &err {
            if matches!(
                inner.code,
                rusqlite::ErrorCode::DatabaseLocked | rusqlite::ErrorCode::DatabaseBusy
            ) {
                return PersistenceError::Locked;
            }
        }
        if write {
            PersistenceError::WriteFailed {
                key: key.to_string(),
                message: err.to_string(),
            }
        } else {
            PersistenceError::ReadFailed {
                key: key.to_string(),
                message: err.to_string(),
            }
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_id() {
        let err = CoreError::NotFound { id: 42 };
        assert_eq!(err.to_string(), "Habit 42 not found");
    }

    #[test]
    fn validation_converts_into_core_error() {
        let err: CoreError = ValidationError::NonPositiveGoal { goal: 0 }.into();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::NonPositiveGoal { goal: 0 })
        ));
    }

    #[test]
    fn sqlite_busy_maps_to_locked() {
        let err = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_BUSY),
            None,
        );
        assert_eq!(
            PersistenceError::from_sqlite("habits", err, true),
            PersistenceError::Locked
        );
    }
}
