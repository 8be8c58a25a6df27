//! Display preferences stored alongside the data.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{PersistenceError, ValidationError};
use crate::storage::{keys, KeyValueStore};

/// Colour theme, stored under `app-theme` as the CSS class name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Theme {
    #[default]
    #[serde(rename = "theme-dark")]
    Dark,
    #[serde(rename = "theme-light")]
    Light,
    #[serde(rename = "theme-catppuccin")]
    Catppuccin,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::Dark, Theme::Light, Theme::Catppuccin];

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "theme-dark",
            Theme::Light => "theme-light",
            Theme::Catppuccin => "theme-catppuccin",
        }
    }

    /// Read the stored theme. Unknown or unreadable values give the default.
    pub fn load<S: KeyValueStore>(store: &S) -> Self {
        match store.get(keys::THEME) {
            Ok(Some(raw)) => raw.parse().unwrap_or_else(|e| {
                warn!(error = %e, "ignoring stored theme");
                Theme::default()
            }),
            Ok(None) => Theme::default(),
            Err(e) => {
                warn!(error = %e, "theme unreadable, using default");
                Theme::default()
            }
        }
    }

    /// # Errors
    /// Returns the store's error if the write fails.
    pub fn save<S: KeyValueStore>(self, store: &S) -> Result<(), PersistenceError> {
        store.set(keys::THEME, self.as_str())
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ValidationError;

    /// Accepts the stored class name or the bare name (`dark`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        let name = name.strip_prefix("theme-").unwrap_or(name);
        match name {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            "catppuccin" => Ok(Theme::Catppuccin),
            _ => Err(ValidationError::InvalidValue {
                field: "theme".into(),
                message: format!("unknown theme '{s}'"),
            }),
        }
    }
}
