use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{PersistenceError, ValidationError};
use crate::storage::{keys, KeyValueStore};

/// Phase of the pomodoro cycle. Serialized with the browser app's names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimerMode {
    #[serde(rename = "pomodoro")]
    Focus,
    #[serde(rename = "short")]
    ShortBreak,
    #[serde(rename = "long")]
    LongBreak,
}

impl TimerMode {
    pub fn as_str(self) -> &'static str {
        match self {
            TimerMode::Focus => "pomodoro",
            TimerMode::ShortBreak => "short",
            TimerMode::LongBreak => "long",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimerMode::Focus => "POMODORO",
            TimerMode::ShortBreak => "SHORT BREAK",
            TimerMode::LongBreak => "LONG BREAK",
        }
    }

    pub fn is_break(self) -> bool {
        !matches!(self, TimerMode::Focus)
    }
}

impl Default for TimerMode {
    fn default() -> Self {
        TimerMode::Focus
    }
}

impl fmt::Display for TimerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimerMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pomodoro" | "focus" => Ok(TimerMode::Focus),
            "short" | "short-break" => Ok(TimerMode::ShortBreak),
            "long" | "long-break" => Ok(TimerMode::LongBreak),
            other => Err(ValidationError::InvalidValue {
                field: "mode".into(),
                message: format!("unknown timer mode '{other}'"),
            }),
        }
    }
}

/// User-editable timer preferences, in minutes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSettings {
    #[serde(default = "default_focus")]
    pub pomodoro_time: u32,
    #[serde(default = "default_short_break")]
    pub short_break_time: u32,
    #[serde(default = "default_long_break")]
    pub long_break_time: u32,
    #[serde(default)]
    pub auto_start_breaks: bool,
    #[serde(default = "default_true")]
    pub sound_enabled: bool,
}

fn default_focus() -> u32 {
    25
}
fn default_short_break() -> u32 {
    5
}
fn default_long_break() -> u32 {
    15
}
fn default_true() -> bool {
    true
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            pomodoro_time: default_focus(),
            short_break_time: default_short_break(),
            long_break_time: default_long_break(),
            auto_start_breaks: false,
            sound_enabled: true,
        }
    }
}

impl TimerSettings {
    pub fn minutes_for(&self, mode: TimerMode) -> u32 {
        match mode {
            TimerMode::Focus => self.pomodoro_time,
            TimerMode::ShortBreak => self.short_break_time,
            TimerMode::LongBreak => self.long_break_time,
        }
    }

    pub fn duration_secs(&self, mode: TimerMode) -> u64 {
        u64::from(self.minutes_for(mode)).saturating_mul(60)
    }

    /// # Errors
    /// `InvalidValue` for any zero-minute duration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, minutes) in [
            ("pomodoroTime", self.pomodoro_time),
            ("shortBreakTime", self.short_break_time),
            ("longBreakTime", self.long_break_time),
        ] {
            if minutes == 0 {
                return Err(ValidationError::InvalidValue {
                    field: field.into(),
                    message: "must be at least 1 minute".into(),
                });
            }
        }
        Ok(())
    }

    /// Read from the store; missing, unreadable or invalid settings fall
    /// back to defaults.
    pub fn load<S: KeyValueStore>(store: &S) -> Self {
        let raw = match store.get(keys::TIMER_SETTINGS) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Self::default(),
            Err(e) => {
                warn!(error = %e, "timer settings unreadable, using defaults");
                return Self::default();
            }
        };
        match serde_json::from_str::<Self>(&raw) {
            Ok(settings) if settings.validate().is_ok() => settings,
            Ok(_) | Err(_) => {
                warn!("timer settings malformed, using defaults");
                Self::default()
            }
        }
    }

    /// # Errors
    /// Returns the store's error if the write fails.
    pub fn save<S: KeyValueStore>(&self, store: &S) -> Result<(), PersistenceError> {
        let json = serde_json::to_string(self).map_err(|e| PersistenceError::WriteFailed {
            key: keys::TIMER_SETTINGS.into(),
            message: e.to_string(),
        })?;
        store.set(keys::TIMER_SETTINGS, &json)
    }
}
