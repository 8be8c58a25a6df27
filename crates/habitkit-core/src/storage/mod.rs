mod config;
pub mod database;
pub mod keys;
mod memory;

pub use config::{Config, HabitDefaults, LoggingConfig, StorageConfig, TimerConfig};
pub use database::Database;
pub use memory::MemoryStore;

use std::path::PathBuf;

use crate::error::PersistenceError;

/// Named-blob persistence shared by both engines.
///
/// Implementations are accessed from a single thread of control; they use
/// interior mutability so that several engines can hold `&S` at once.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;
    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError>;
    fn remove(&self, key: &str) -> Result<(), PersistenceError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        (**self).remove(key)
    }
}

/// Returns the HabitKit data directory, creating it if needed.
///
/// `HABITKIT_HOME` overrides the location. Otherwise `~/.config/habitkit`,
/// or `~/.config/habitkit-dev` when `HABITKIT_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let dir = match std::env::var_os("HABITKIT_HOME") {
        Some(home) => PathBuf::from(home),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("HABITKIT_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("habitkit-dev")
            } else {
                base_dir.join("habitkit")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
