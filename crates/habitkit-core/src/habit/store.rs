use serde::Serialize;
use tracing::{debug, warn};

use super::metrics::{self, WeeklyProgress, YearGrid};
use super::{validate_collection, DateKey, Habit, HabitDraft};
use crate::clock::{Clock, SystemClock};
use crate::error::{CoreError, PersistenceError, Result};
use crate::storage::{keys, KeyValueStore};

/// A write that failed after the in-memory state was already updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersistenceWarning {
    pub operation: &'static str,
    pub error: String,
}

/// Owner of the habit collection.
///
/// Every mutation validates first, then changes the in-memory collection,
/// then rewrites the whole collection under the `habits` key. A failed write
/// leaves the in-memory state as the source of truth for the rest of the
/// session and queues a [`PersistenceWarning`].
///
/// If the stored collection could not be read, the store is degraded: it
/// works in memory for the rest of the session and never writes, so the
/// unreadable blob stays as it was.
pub struct HabitStore<S, C = SystemClock> {
    store: S,
    clock: C,
    habits: Vec<Habit>,
    last_id: i64,
    degraded: bool,
    warnings: Vec<PersistenceWarning>,
}

impl<S: KeyValueStore, C: Clock> HabitStore<S, C> {
    /// Load the collection from `store`. Unreadable or corrupt data yields an
    /// empty, degraded collection and a warning.
    pub fn load(store: S, clock: C) -> Self {
        let mut this = Self {
            store,
            clock,
            habits: Vec::new(),
            last_id: 0,
            degraded: false,
            warnings: Vec::new(),
        };
        this.reload();
        this
    }

    /// Re-read the collection, discarding in-memory state.
    pub fn reload(&mut self) {
        self.degraded = false;
        self.habits = match self.read_collection() {
            Ok(habits) => habits,
            Err(e) => {
                warn!(error = %e, "habit collection unavailable, starting empty in memory");
                self.degraded = true;
                self.warnings.push(PersistenceWarning {
                    operation: "load",
                    error: e.to_string(),
                });
                Vec::new()
            }
        };
        self.last_id = self.habits.iter().map(|h| h.id).max().unwrap_or(0);
        debug!(count = self.habits.len(), "habits loaded");
    }

    fn read_collection(&self) -> Result<Vec<Habit>, PersistenceError> {
        match self.store.get(keys::HABITS)? {
            None => Ok(Vec::new()),
            Some(raw) => {
                let corrupt = |message: String| PersistenceError::Corrupt {
                    key: keys::HABITS.to_string(),
                    message,
                };
                let habits: Vec<Habit> =
                    serde_json::from_str(&raw).map_err(|e| corrupt(e.to_string()))?;
                validate_collection(&habits).map_err(|e| corrupt(e.to_string()))?;
                Ok(habits)
            }
        }
    }

    fn persist(&mut self, operation: &'static str) {
        if self.degraded {
            warn!(operation, "stored habits unreadable; change kept in memory only");
            self.warnings.push(PersistenceWarning {
                operation,
                error: "stored habit data is unreadable; not overwriting it".into(),
            });
            return;
        }
        let result = serde_json::to_string(&self.habits)
            .map_err(|e| PersistenceError::WriteFailed {
                key: keys::HABITS.to_string(),
                message: e.to_string(),
            })
            .and_then(|json| self.store.set(keys::HABITS, &json));
        if let Err(e) = result {
            warn!(operation, error = %e, "habit collection not persisted; keeping in-memory state");
            self.warnings.push(PersistenceWarning {
                operation,
                error: e.to_string(),
            });
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    pub fn len(&self) -> usize {
        self.habits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.habits.is_empty()
    }

    /// Today's key under the clock's calendar.
    pub fn today(&self) -> DateKey {
        DateKey::new(self.clock.today())
    }

    /// # Errors
    /// `NotFound` if no habit has this id.
    pub fn get(&self, id: i64) -> Result<&Habit> {
        self.habits
            .iter()
            .find(|h| h.id == id)
            .ok_or(CoreError::NotFound { id })
    }

    /// Habits in `category`, or all of them for `"all"`.
    pub fn by_category(&self, category: &str) -> Vec<&Habit> {
        self.habits
            .iter()
            .filter(|h| h.in_category(category))
            .collect()
    }

    pub fn is_completed_on_date(&self, id: i64, date: DateKey) -> Result<bool> {
        Ok(metrics::is_completed_on_date(self.get(id)?, date))
    }

    pub fn is_completed_today(&self, id: i64) -> Result<bool> {
        self.is_completed_on_date(id, self.today())
    }

    pub fn streak(&self, id: i64, end: Option<DateKey>) -> Result<u32> {
        let end = end.unwrap_or_else(|| self.today());
        Ok(metrics::streak(self.get(id)?, end))
    }

    pub fn longest_streak(&self, id: i64) -> Result<u32> {
        Ok(metrics::longest_streak(self.get(id)?))
    }

    pub fn weekly_progress(&self, id: i64, end: Option<DateKey>) -> Result<WeeklyProgress> {
        let end = end.unwrap_or_else(|| self.today());
        Ok(metrics::weekly_progress(self.get(id)?, end))
    }

    pub fn year_grid(&self, id: i64, reference: Option<DateKey>) -> Result<YearGrid> {
        let reference = reference.unwrap_or_else(|| self.today());
        Ok(metrics::year_grid(self.get(id)?, reference))
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Add a habit and return its id.
    ///
    /// # Errors
    /// `Validation` for an empty name or a goal below 1; nothing is stored.
    pub fn add(&mut self, draft: &HabitDraft) -> Result<i64> {
        let valid = draft.validate()?;
        let id = self.next_id();
        let mut habit = Habit {
            id,
            name: String::new(),
            description: String::new(),
            category: String::new(),
            icon: String::new(),
            color: String::new(),
            goal: 1,
            completions: Default::default(),
            created_at: self.clock.now(),
        };
        valid.apply_to(&mut habit);
        debug!(id, name = %habit.name, "habit added");
        self.habits.push(habit);
        self.persist("add");
        Ok(id)
    }

    /// Replace the descriptive fields of an existing habit. Completions, id
    /// and creation time are kept.
    ///
    /// # Errors
    /// `NotFound` for an unknown id, `Validation` for a bad draft.
    pub fn update(&mut self, id: i64, draft: &HabitDraft) -> Result<()> {
        let index = self.index_of(id)?;
        let valid = draft.validate()?;
        valid.apply_to(&mut self.habits[index]);
        debug!(id, "habit updated");
        self.persist("update");
        Ok(())
    }

    /// Remove a habit. Deleting an unknown id is not an error; returns
    /// whether anything was removed.
    pub fn delete(&mut self, id: i64) -> bool {
        let before = self.habits.len();
        self.habits.retain(|h| h.id != id);
        let removed = self.habits.len() != before;
        debug!(id, removed, "habit deleted");
        self.persist("delete");
        removed
    }

    /// Advance the completion count on `date` (default today), wrapping back
    /// to 0 once it would exceed the goal. Returns the new count.
    ///
    /// # Errors
    /// `NotFound` for an unknown id.
    pub fn toggle_completion(&mut self, id: i64, date: Option<DateKey>) -> Result<u32> {
        let index = self.index_of(id)?;
        let date = date.unwrap_or_else(|| self.today());
        let habit = &mut self.habits[index];
        let next = habit.count_on(date).saturating_add(1);
        let next = if next > habit.goal { 0 } else { next };
        habit.completions.insert(date, next);
        debug!(id, date = %date, count = next, "completion toggled");
        self.persist("toggle");
        Ok(next)
    }

    /// Replace the whole collection, e.g. with a seeded or imported one.
    ///
    /// # Errors
    /// `Validation` if a habit has a blank name or a goal below 1, or two
    /// habits share an id; nothing is changed.
    pub fn replace_all(&mut self, habits: Vec<Habit>) -> Result<()> {
        validate_collection(&habits)?;
        self.last_id = self.last_id.max(habits.iter().map(|h| h.id).max().unwrap_or(0));
        self.habits = habits;
        self.persist("replace");
        Ok(())
    }

    /// Whether the stored collection was unreadable at load time. A degraded
    /// store keeps changes in memory and does not write.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Drain warnings raised by failed writes since the last call.
    pub fn take_warnings(&mut self) -> Vec<PersistenceWarning> {
        std::mem::take(&mut self.warnings)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn index_of(&self, id: i64) -> Result<usize> {
        self.habits
            .iter()
            .position(|h| h.id == id)
            .ok_or(CoreError::NotFound { id })
    }

    /// Timestamp-derived id, bumped past the newest id to stay unique.
    fn next_id(&mut self) -> i64 {
        let now = self.clock.now_ms();
        let id = if now > self.last_id {
            now
        } else {
            self.last_id + 1
        };
        self.last_id = id;
        id
    }
}

impl<S: KeyValueStore> HabitStore<S, SystemClock> {
    pub fn open(store: S) -> Self {
        Self::load(store, SystemClock)
    }
}
