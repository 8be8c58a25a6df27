//! # HabitKit Core Library
//!
//! Business logic for a personal productivity hub: a habit tracker with
//! streak and calendar metrics, and a pomodoro timer whose running state
//! survives process restarts. Front ends (the `habitkit` CLI, or anything
//! else) are thin adapters over this crate.
//!
//! ## Architecture
//!
//! - **Habit Store**: owns the habit collection; every mutation validates,
//!   updates memory, then persists the whole collection
//! - **Metrics**: pure functions over a single habit (streaks, weekly
//!   progress, year grid)
//! - **Timer Session**: a wall-clock-based state machine; the remaining time
//!   is always derived from an absolute end timestamp
//! - **Storage**: a string key-value interface with SQLite and in-memory
//!   implementations, plus TOML-based configuration
//!
//! ## Key Components
//!
//! - [`HabitStore`]: habit CRUD, completion toggling and metric queries
//! - [`TimerSession`]: pomodoro state machine
//! - [`KeyValueStore`]: persistence seam shared by both engines
//! - [`Database`]: SQLite-backed store
//! - [`Config`]: application configuration management

pub mod backup;
pub mod clock;
pub mod error;
pub mod events;
pub mod habit;
pub mod onboarding;
pub mod preferences;
pub mod storage;
pub mod timer;

pub use backup::{BackupDocument, ImportSummary};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ConfigError, CoreError, PersistenceError, Result, ValidationError};
pub use events::Event;
pub use habit::{DateKey, Habit, HabitDraft, HabitStore, PersistenceWarning};
pub use preferences::Theme;
pub use storage::{Config, Database, KeyValueStore, MemoryStore};
pub use timer::{
    IntervalTicker, ManualTicker, Ticker, TimerMode, TimerSession, TimerSettings, TimerSnapshot,
};
