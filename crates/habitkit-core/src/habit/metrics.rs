//! Derived metrics over a habit's completion history.
//!
//! Every function here is pure: it takes the habit and an explicit
//! reference day. [`super::HabitStore`] supplies "today" from its clock.

use serde::{Deserialize, Serialize};

use super::date_key::days_in_year;
use super::{DateKey, Habit};

/// Number of days in the weekly progress window.
pub const WEEK_DAYS: u32 = 7;

/// A day counts once the recorded count reaches the goal.
pub fn is_completed_on_date(habit: &Habit, date: DateKey) -> bool {
    habit.count_on(date) >= habit.goal
}

/// Consecutive completed days ending at and including `end`.
///
/// Returns 0 when `end` itself is not completed, even if the days before it
/// form a run.
pub fn streak(habit: &Habit, end: DateKey) -> u32 {
    let mut count = 0;
    let mut cursor = end;
    while is_completed_on_date(habit, cursor) {
        count += 1;
        let prev = cursor.pred();
        if prev == cursor {
            break;
        }
        cursor = prev;
    }
    count
}

/// Longest run of consecutive completed days anywhere in the history.
pub fn longest_streak(habit: &Habit) -> u32 {
    let mut best = 0;
    let mut run = 0;
    let mut last: Option<DateKey> = None;
    for (&date, _) in habit
        .completions
        .iter()
        .filter(|(_, count)| **count >= habit.goal)
    {
        run = match last {
            Some(prev) if prev.add_days(1) == date => run + 1,
            _ => 1,
        };
        best = best.max(run);
        last = Some(date);
    }
    best
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekDay {
    pub date_key: DateKey,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyProgress {
    /// Oldest day first; the last entry is the reference day.
    pub days: Vec<WeekDay>,
    pub completed_days: u32,
    pub total_days: u32,
    pub percent: u32,
}

/// The 7-day window ending at `end`, inclusive.
pub fn weekly_progress(habit: &Habit, end: DateKey) -> WeeklyProgress {
    let days: Vec<WeekDay> = (0..WEEK_DAYS as i64)
        .rev()
        .map(|back| {
            let date_key = end.add_days(-back);
            WeekDay {
                date_key,
                completed: is_completed_on_date(habit, date_key),
            }
        })
        .collect();
    let completed_days = days.iter().filter(|d| d.completed).count() as u32;
    WeeklyProgress {
        days,
        completed_days,
        total_days: WEEK_DAYS,
        percent: round_percent(completed_days, WEEK_DAYS),
    }
}

/// `round(part / whole * 100)` with halves rounded up.
fn round_percent(part: u32, whole: u32) -> u32 {
    if whole == 0 {
        return 0;
    }
    (part * 200 + whole) / (whole * 2)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridDay {
    pub date_key: DateKey,
    /// Day of the year, starting at 1.
    pub day: u32,
    pub completed: bool,
    pub future: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearGrid {
    pub year: i32,
    pub days_in_year: u32,
    pub days: Vec<GridDay>,
}

impl YearGrid {
    pub fn completed_count(&self) -> usize {
        self.days.iter().filter(|d| d.completed).count()
    }
}

/// One entry per day of the year containing `reference`.
///
/// Days after `reference` are marked future and never completed, whatever
/// the stored counts say.
pub fn year_grid(habit: &Habit, reference: DateKey) -> YearGrid {
    let year = reference.year();
    let total = days_in_year(year);
    let days = match DateKey::from_ymd(year, 1, 1) {
        Some(first) => (0..total)
            .map(|offset| {
                let date_key = first.add_days(i64::from(offset));
                let future = date_key > reference;
                GridDay {
                    date_key,
                    day: offset + 1,
                    completed: !future && is_completed_on_date(habit, date_key),
                    future,
                }
            })
            .collect(),
        None => Vec::new(),
    };
    YearGrid {
        year,
        days_in_year: total,
        days,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::Utc;

    use super::*;

    fn key(s: &str) -> DateKey {
        s.parse().unwrap()
    }

    fn habit(goal: u32, done: &[(&str, u32)]) -> Habit {
        Habit {
            id: 1,
            name: "Read".into(),
            description: String::new(),
            category: "personal".into(),
            icon: String::new(),
            color: String::new(),
            goal,
            completions: done.iter().map(|(d, c)| (key(d), *c)).collect::<BTreeMap<_, _>>(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn completed_requires_goal() {
        let h = habit(2, &[("2024-05-01", 1), ("2024-05-02", 2), ("2024-05-03", 3)]);
        assert!(!is_completed_on_date(&h, key("2024-05-01")));
        assert!(is_completed_on_date(&h, key("2024-05-02")));
        assert!(is_completed_on_date(&h, key("2024-05-03")));
        assert!(!is_completed_on_date(&h, key("2024-05-04")));
    }

    #[test]
    fn streak_is_zero_when_reference_day_missed() {
        let h = habit(1, &[("2024-05-01", 1), ("2024-05-02", 1), ("2024-05-03", 1)]);
        assert_eq!(streak(&h, key("2024-05-04")), 0);
    }

    #[test]
    fn streak_counts_back_to_first_gap() {
        let h = habit(
            1,
            &[
                ("2024-04-28", 1),
                ("2024-04-30", 1),
                ("2024-05-01", 1),
                ("2024-05-02", 1),
            ],
        );
        assert_eq!(streak(&h, key("2024-05-02")), 3);
    }

    #[test]
    fn streak_crosses_year_boundary() {
        let h = habit(1, &[("2023-12-30", 1), ("2023-12-31", 1), ("2024-01-01", 1)]);
        assert_eq!(streak(&h, key("2024-01-01")), 3);
    }

    #[test]
    fn streak_stops_at_partial_day() {
        let h = habit(2, &[("2024-05-01", 2), ("2024-05-02", 1), ("2024-05-03", 2)]);
        assert_eq!(streak(&h, key("2024-05-03")), 1);
    }

    #[test]
    fn longest_streak_finds_best_run() {
        let h = habit(
            1,
            &[
                ("2024-02-27", 1),
                ("2024-02-28", 1),
                ("2024-02-29", 1),
                ("2024-03-01", 1),
                ("2024-03-03", 1),
                ("2024-03-04", 0),
            ],
        );
        assert_eq!(longest_streak(&h), 4);
        assert_eq!(longest_streak(&habit(1, &[])), 0);
    }

    #[test]
    fn weekly_progress_window_and_percent() {
        let h = habit(1, &[("2024-05-01", 1), ("2024-05-04", 1), ("2024-05-07", 1), ("2024-04-30", 1)]);
        let week = weekly_progress(&h, key("2024-05-07"));
        assert_eq!(week.days.len(), 7);
        assert_eq!(week.days[0].date_key, key("2024-05-01"));
        assert_eq!(week.days[6].date_key, key("2024-05-07"));
        assert_eq!(week.completed_days, 3);
        assert_eq!(week.total_days, 7);
        assert_eq!(week.percent, 43);
    }

    #[test]
    fn percent_rounding_matches_math_round() {
        let expected = [0, 14, 29, 43, 57, 71, 86, 100];
        for (done, want) in expected.iter().enumerate() {
            assert_eq!(round_percent(done as u32, 7), *want);
        }
        assert_eq!(round_percent(1, 8), 13);
    }

    #[test]
    fn year_grid_sizes() {
        let h = habit(1, &[]);
        assert_eq!(year_grid(&h, key("2024-06-01")).days.len(), 366);
        assert_eq!(year_grid(&h, key("2023-06-01")).days.len(), 365);
        let grid = year_grid(&h, key("2023-06-01"));
        assert_eq!(grid.days[0].date_key, key("2023-01-01"));
        assert_eq!(grid.days[364].date_key, key("2023-12-31"));
        assert_eq!(grid.days[364].day, 365);
    }

    #[test]
    fn year_grid_hides_future_completions() {
        let h = habit(1, &[("2024-03-09", 1), ("2024-03-10", 1), ("2024-03-11", 1)]);
        let grid = year_grid(&h, key("2024-03-10"));
        let by_key = |k: &str| *grid.days.iter().find(|d| d.date_key == key(k)).unwrap();
        assert!(by_key("2024-03-09").completed);
        assert!(by_key("2024-03-10").completed);
        assert!(!by_key("2024-03-10").future);
        assert!(!by_key("2024-03-11").completed);
        assert!(by_key("2024-03-11").future);
        assert_eq!(grid.completed_count(), 2);
        assert_eq!(h.count_on(key("2024-03-11")), 1);
    }
}
