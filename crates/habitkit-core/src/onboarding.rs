//! First-run seeding of the habit list.

use std::collections::BTreeMap;

use tracing::{info, warn};

use crate::clock::Clock;
use crate::habit::{DateKey, Habit, HabitStore};
use crate::storage::{keys, KeyValueStore};

/// Day offsets (relative to today) pre-filled on the demo habit: a
/// four-day streak and a gap, so every metric has something to show.
const DEMO_OFFSETS: [i64; 5] = [0, -1, -2, -3, -5];

/// Whether the first-run seed has already happened.
pub fn is_onboarded<S: KeyValueStore>(store: &S) -> bool {
    match store.get(keys::ONBOARDED) {
        Ok(value) => value.as_deref() == Some("true"),
        Err(e) => {
            warn!(error = %e, "onboarding flag unreadable");
            // Never seed over data we could not inspect.
            true
        }
    }
}

/// Seed one demo habit when the user has never been onboarded and has no
/// habits. A degraded store (its collection could not be read) is never
/// seeded. Returns whether a habit was seeded. Failures are logged only.
pub fn ensure_first_run<S: KeyValueStore, C: Clock>(habits: &mut HabitStore<S, C>) -> bool {
    if habits.is_degraded() || is_onboarded(habits.store()) || !habits.is_empty() {
        return false;
    }

    let demo = demo_habit(habits.clock());
    if let Err(e) = habits.replace_all(vec![demo]) {
        warn!(error = %e, "demo habit rejected");
        return false;
    }
    if let Err(e) = habits.store().set(keys::ONBOARDED, "true") {
        warn!(error = %e, "onboarding flag not saved");
    }
    info!("seeded demo habit for first run");
    true
}

/// The "Practice a skill" starter habit, completed on a few recent days.
pub fn demo_habit<C: Clock>(clock: &C) -> Habit {
    let today = DateKey::new(clock.today());
    let completions: BTreeMap<DateKey, u32> = DEMO_OFFSETS
        .iter()
        .map(|offset| (today.add_days(*offset), 1))
        .collect();

    Habit {
        id: clock.now_ms(),
        name: "Practice a skill".into(),
        description: "Start small: 10 minutes on the skill you want to improve.".into(),
        category: "personal".into(),
        icon: "🎯".into(),
        color: "#a855f7".into(),
        goal: 1,
        completions,
        created_at: clock.now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::habit::HabitDraft;
    use crate::storage::MemoryStore;
    use chrono::NaiveDate;

    fn clock() -> ManualClock {
        ManualClock::at_date(NaiveDate::from_ymd_opt(2024, 5, 10).unwrap())
    }

    #[test]
    fn seeds_once() {
        let store = MemoryStore::new();
        let clock = clock();
        let mut habits = HabitStore::load(&store, &clock);
        assert!(ensure_first_run(&mut habits));
        assert_eq!(habits.len(), 1);
        assert!(is_onboarded(&store));

        let id = habits.habits()[0].id;
        assert_eq!(habits.streak(id, None).unwrap(), 4);
        assert_eq!(habits.weekly_progress(id, None).unwrap().completed_days, 5);

        habits.delete(id);
        assert!(!ensure_first_run(&mut habits));
        assert!(habits.is_empty());
    }

    #[test]
    fn existing_habits_are_left_alone() {
        let store = MemoryStore::new();
        let clock = clock();
        let mut habits = HabitStore::load(&store, &clock);
        habits.add(&HabitDraft::new("Run")).unwrap();
        assert!(!ensure_first_run(&mut habits));
        assert_eq!(habits.len(), 1);
        assert!(!is_onboarded(&store));
    }

    #[test]
    fn unreadable_collection_is_not_seeded() {
        let store = MemoryStore::new();
        store.set(keys::HABITS, "[{broken").unwrap();
        let clock = clock();
        let mut habits = HabitStore::load(&store, &clock);
        assert!(!ensure_first_run(&mut habits));
        assert!(habits.is_empty());
        assert!(!is_onboarded(&store));
        assert_eq!(store.get(keys::HABITS).unwrap().as_deref(), Some("[{broken"));
    }
}
