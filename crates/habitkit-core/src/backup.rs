//! Whole-application backup: export every key into one JSON document,
//! import such a document back, or wipe the store.
//!
//! The document shape matches the browser app's backups, so files move
//! freely between the two.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, info};

use crate::clock::Clock;
use crate::error::{PersistenceError, Result, ValidationError};
use crate::habit::{validate_collection, Habit};
use crate::preferences::Theme;
use crate::storage::{keys, KeyValueStore};
use crate::timer::TimerSettings;

/// Format version written by [`export`].
pub const FORMAT_VERSION: &str = "1.0";

/// Major version [`import`] understands.
const SUPPORTED_MAJOR: &str = "1";

/// Backup document. On import every field is optional; absent fields leave
/// their key untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub habits: Option<Vec<Habit>>,
    /// Opaque to this crate; carried through unchanged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tasks: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pomodoro_settings: Option<TimerSettings>,
    /// Stored as a string by the browser app; numbers are accepted too.
    #[serde(
        default,
        deserialize_with = "lenient_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub pomodoro_sessions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Which keys an import overwrote.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub applied: Vec<&'static str>,
    pub habit_count: Option<usize>,
}

/// Collect every key into a document stamped with the current time.
///
/// # Errors
/// `Persistence` if the store cannot be read or holds corrupt JSON.
pub fn export<S: KeyValueStore, C: Clock>(store: &S, clock: &C) -> Result<BackupDocument> {
    let habits: Vec<Habit> = read_json(store, keys::HABITS)?.unwrap_or_default();
    let tasks = read_json(store, keys::TASKS)?
        .unwrap_or_else(|| serde_json::Value::Array(Vec::new()));
    let theme = store
        .get(keys::THEME)?
        .unwrap_or_else(|| Theme::default().as_str().to_string());
    let sessions = store
        .get(keys::SESSION_COUNT)?
        .unwrap_or_else(|| "0".to_string());

    debug!(habits = habits.len(), "exporting backup");
    Ok(BackupDocument {
        habits: Some(habits),
        tasks: Some(tasks),
        theme: Some(theme),
        pomodoro_settings: Some(TimerSettings::load(store)),
        pomodoro_sessions: Some(sessions),
        export_date: Some(clock.now()),
        version: Some(FORMAT_VERSION.to_string()),
    })
}

/// [`export`] rendered as pretty JSON.
///
/// # Errors
/// As [`export`].
pub fn export_json<S: KeyValueStore, C: Clock>(store: &S, clock: &C) -> Result<String> {
    let doc = export(store, clock)?;
    Ok(serde_json::to_string_pretty(&doc)?)
}

/// Parse and apply a backup document.
///
/// The whole document is checked before the first write, so a rejected
/// document leaves the store untouched.
///
/// # Errors
/// `Validation` for malformed JSON, a missing or unsupported version, or
/// invalid field contents; `Persistence` if a write fails.
pub fn import<S: KeyValueStore>(store: &S, json: &str) -> Result<ImportSummary> {
    let doc = parse_document(json)?;
    apply(store, &doc)
}

/// Parse a document and check its version without touching any store.
///
/// # Errors
/// `Validation` as described on [`import`].
pub fn parse_document(json: &str) -> Result<BackupDocument, ValidationError> {
    let mut raw: serde_json::Value = serde_json::from_str(json)
        .map_err(|e| ValidationError::MalformedDocument(e.to_string()))?;
    let serde_json::Value::Object(fields) = &mut raw else {
        return Err(ValidationError::MalformedDocument(
            "expected a JSON object".into(),
        ));
    };

    let version = match fields.remove("version") {
        None | Some(serde_json::Value::Null) => return Err(ValidationError::MissingVersion),
        Some(serde_json::Value::String(s)) => s,
        Some(serde_json::Value::Number(n)) => n.to_string(),
        Some(other) => return Err(ValidationError::UnsupportedVersion(other.to_string())),
    };
    check_version(&version)?;

    let mut doc: BackupDocument = serde_json::from_value(raw)
        .map_err(|e| ValidationError::MalformedDocument(e.to_string()))?;
    doc.version = Some(version);

    if let Some(habits) = &doc.habits {
        validate_collection(habits)?;
    }
    if let Some(theme) = &doc.theme {
        theme.parse::<Theme>()?;
    }
    if let Some(settings) = &doc.pomodoro_settings {
        settings.validate()?;
    }
    if let Some(count) = &doc.pomodoro_sessions {
        count
            .trim()
            .parse::<u64>()
            .map_err(|_| ValidationError::InvalidValue {
                field: "pomodoroSessions".into(),
                message: format!("'{count}' is not a session count"),
            })?;
    }
    Ok(doc)
}

/// Write the fields present in `doc`. The document must already be
/// validated by [`parse_document`].
///
/// # Errors
/// `Persistence` if a write fails; earlier writes are not rolled back.
pub fn apply<S: KeyValueStore>(store: &S, doc: &BackupDocument) -> Result<ImportSummary> {
    let mut summary = ImportSummary::default();

    if let Some(habits) = &doc.habits {
        store.set(keys::HABITS, &serde_json::to_string(habits)?)?;
        summary.applied.push(keys::HABITS);
        summary.habit_count = Some(habits.len());
    }
    if let Some(tasks) = &doc.tasks {
        store.set(keys::TASKS, &serde_json::to_string(tasks)?)?;
        summary.applied.push(keys::TASKS);
    }
    if let Some(theme) = &doc.theme {
        store.set(keys::THEME, theme)?;
        summary.applied.push(keys::THEME);
    }
    if let Some(settings) = &doc.pomodoro_settings {
        settings.save(store)?;
        summary.applied.push(keys::TIMER_SETTINGS);
    }
    if let Some(count) = &doc.pomodoro_sessions {
        store.set(keys::SESSION_COUNT, count.trim())?;
        summary.applied.push(keys::SESSION_COUNT);
    }

    info!(keys = ?summary.applied, "backup imported");
    Ok(summary)
}

/// Remove habits, tasks, timer settings, the session count and any running
/// or paused timer. The theme and the onboarding flag are kept.
///
/// # Errors
/// The first failed removal.
pub fn clear_all<S: KeyValueStore>(store: &S) -> Result<(), PersistenceError> {
    for key in keys::DATA {
        store.remove(key)?;
    }
    info!("habit and timer data cleared");
    Ok(())
}

/// `productivity-hub-backup-YYYY-MM-DD.json`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("productivity-hub-backup-{}.json", date.format("%Y-%m-%d"))
}

fn check_version(version: &str) -> Result<(), ValidationError> {
    let major = version.trim().split('.').next().unwrap_or_default();
    if major == SUPPORTED_MAJOR {
        Ok(())
    } else {
        Err(ValidationError::UnsupportedVersion(version.to_string()))
    }
}

fn read_json<S, T>(store: &S, key: &str) -> Result<Option<T>, PersistenceError>
where
    S: KeyValueStore,
    T: serde::de::DeserializeOwned,
{
    match store.get(key)? {
        None => Ok(None),
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| PersistenceError::Corrupt {
                key: key.to_string(),
                message: e.to_string(),
            }),
    }
}

fn lenient_count<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Count {
        Text(String),
        Number(u64),
    }

    Ok(Option::<Count>::deserialize(deserializer)?.map(|c| match c {
        Count::Text(s) => s,
        Count::Number(n) => n.to_string(),
    }))
}
