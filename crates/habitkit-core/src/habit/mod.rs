//! Habit records, their completion history, and the derived metrics.
//!
//! A habit counts completions per calendar day; a day is "completed" once
//! its count reaches the habit's goal.

mod date_key;
pub mod metrics;
mod store;

pub use date_key::{days_in_year, is_leap_year, DateKey};
pub use metrics::{GridDay, WeekDay, WeeklyProgress, YearGrid};
pub use store::{HabitStore, PersistenceWarning};

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Pseudo-category that matches every habit when filtering.
pub const ALL_CATEGORIES: &str = "all";

/// A single tracked routine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: String,
    pub goal: u32,
    /// Completion count per day. Counts never exceed `goal` through toggling.
    #[serde(default)]
    pub completions: BTreeMap<DateKey, u32>,
    pub created_at: DateTime<Utc>,
}

impl Habit {
    /// Count recorded on `date`, zero when absent.
    pub fn count_on(&self, date: DateKey) -> u32 {
        self.completions.get(&date).copied().unwrap_or(0)
    }

    pub fn in_category(&self, category: &str) -> bool {
        category == ALL_CATEGORIES || self.category == category
    }
}

/// Descriptive fields supplied when adding or editing a habit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: String,
    pub goal: i64,
}

impl HabitDraft {
    /// Draft with the browser app's form defaults.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            category: "fitness".into(),
            icon: "📚".into(),
            color: "#ef4444".into(),
            goal: 1,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn goal(mut self, goal: i64) -> Self {
        self.goal = goal;
        self
    }

    /// Check the draft and return trimmed text fields plus the goal.
    ///
    /// # Errors
    /// `EmptyField` for a blank name, `NonPositiveGoal` for `goal < 1`.
    pub(crate) fn validate(&self) -> Result<ValidDraft, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyField {
                field: "name".into(),
            });
        }
        let goal = u32::try_from(self.goal)
            .ok()
            .filter(|g| *g >= 1)
            .ok_or(ValidationError::NonPositiveGoal { goal: self.goal })?;
        Ok(ValidDraft {
            name: name.to_string(),
            description: self.description.trim().to_string(),
            category: self.category.clone(),
            icon: self.icon.clone(),
            color: self.color.clone(),
            goal,
        })
    }
}

pub(crate) struct ValidDraft {
    pub name: String,
    pub description: String,
    pub category: String,
    pub icon: String,
    pub color: String,
    pub goal: u32,
}

impl ValidDraft {
    pub(crate) fn apply_to(self, habit: &mut Habit) {
        habit.name = self.name;
        habit.description = self.description;
        habit.category = self.category;
        habit.icon = self.icon;
        habit.color = self.color;
        habit.goal = self.goal;
    }
}

/// Check a whole collection from outside the store (a backup, a seed):
/// names present, goals of at least 1, ids unique.
///
/// # Errors
/// The first offending habit.
pub fn validate_collection(habits: &[Habit]) -> Result<(), ValidationError> {
    let mut seen = HashSet::with_capacity(habits.len());
    for habit in habits {
        if habit.name.trim().is_empty() {
            return Err(ValidationError::EmptyField {
                field: "name".into(),
            });
        }
        if habit.goal < 1 {
            return Err(ValidationError::NonPositiveGoal {
                goal: i64::from(habit.goal),
            });
        }
        if !seen.insert(habit.id) {
            return Err(ValidationError::DuplicateId { id: habit.id });
        }
    }
    Ok(())
}

/// Parse a goal typed by a user, the way a form field would be read.
///
/// # Errors
/// `InvalidValue` when the text is not an integer.
pub fn parse_goal(raw: &str) -> Result<i64, ValidationError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::InvalidValue {
            field: "goal".into(),
            message: format!("'{raw}' is not an integer"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_trims_name_and_description() {
        let valid = HabitDraft::new("  Read  ").description(" a book ").validate().unwrap();
        assert_eq!(valid.name, "Read");
        assert_eq!(valid.description, "a book");
        assert_eq!(valid.goal, 1);
    }

    #[test]
    fn draft_rejects_blank_name() {
        let err = HabitDraft::new("   ").validate().err().unwrap();
        assert_eq!(
            err,
            ValidationError::EmptyField {
                field: "name".into()
            }
        );
    }

    #[test]
    fn draft_rejects_non_positive_goal() {
        for goal in [0, -3] {
            let err = HabitDraft::new("Run").goal(goal).validate().err().unwrap();
            assert_eq!(err, ValidationError::NonPositiveGoal { goal });
        }
    }

    #[test]
    fn parse_goal_accepts_padded_integers() {
        assert_eq!(parse_goal(" 3 ").unwrap(), 3);
        assert!(parse_goal("three").is_err());
    }

    #[test]
    fn habit_json_matches_browser_shape() {
        let raw = r##"{
            "id": 1700000000000,
            "createdAt": "2023-11-14T22:13:20.000Z",
            "name": "Read",
            "description": "",
            "category": "personal",
            "icon": "📚",
            "color": "#a855f7",
            "goal": 2,
            "completions": {"2023-11-14": 2, "2023-11-13": 0}
        }"##;
        let habit: Habit = serde_json::from_str(raw).unwrap();
        assert_eq!(habit.goal, 2);
        assert_eq!(habit.count_on("2023-11-14".parse().unwrap()), 2);
        assert_eq!(habit.count_on("2023-11-12".parse().unwrap()), 0);

        let json = serde_json::to_value(&habit).unwrap();
        assert!(json.get("createdAt").is_some());
        assert_eq!(json["completions"]["2023-11-13"], 0);
    }

    #[test]
    fn habit_without_completions_deserializes_empty() {
        let raw = r#"{"id": 1, "createdAt": "2024-01-01T00:00:00Z", "name": "x", "goal": 1}"#;
        let habit: Habit = serde_json::from_str(raw).unwrap();
        assert!(habit.completions.is_empty());
        assert!(habit.in_category(ALL_CATEGORIES));
        assert!(!habit.in_category("work"));
    }

    fn stored(id: i64, name: &str, goal: u32) -> Habit {
        let raw = format!(
            r#"{{"id": {id}, "createdAt": "2024-01-01T00:00:00Z", "name": "{name}", "goal": {goal}}}"#
        );
        serde_json::from_str(&raw).unwrap()
    }

    #[test]
    fn collection_checks_goal_name_and_ids() {
        assert!(validate_collection(&[stored(1, "Read", 1), stored(2, "Run", 3)]).is_ok());
        assert_eq!(
            validate_collection(&[stored(1, "Read", 0)]),
            Err(ValidationError::NonPositiveGoal { goal: 0 })
        );
        assert_eq!(
            validate_collection(&[stored(7, "Read", 1), stored(7, "Run", 1)]),
            Err(ValidationError::DuplicateId { id: 7 })
        );
        assert!(matches!(
            validate_collection(&[stored(1, "  ", 1)]),
            Err(ValidationError::EmptyField { .. })
        ));
    }
}
