use clap::Subcommand;
use habitkit_core::habit::{parse_goal, WeeklyProgress, YearGrid, ALL_CATEGORIES};
use habitkit_core::{onboarding, Config, Database, DateKey, Habit, HabitDraft, HabitStore};
use serde::Serialize;

use super::{open_database, print_json, report_warnings, CliResult};

#[derive(Subcommand)]
pub enum HabitAction {
    /// Add a new habit
    Add {
        /// Habit name
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Category (defaults to habits.default_category)
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        icon: Option<String>,
        /// Hex colour, e.g. "#ef4444"
        #[arg(long)]
        color: Option<String>,
        /// Completions per day (defaults to habits.default_goal)
        #[arg(long)]
        goal: Option<String>,
    },
    /// Edit an existing habit; unspecified fields keep their value
    Edit {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        icon: Option<String>,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        goal: Option<String>,
    },
    /// Delete a habit (no error if it does not exist)
    Delete { id: i64 },
    /// Advance the completion count for a day, wrapping after the goal
    Toggle {
        id: i64,
        /// Day as YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<String>,
    },
    /// List habits with today's status
    List {
        /// Only habits in this category ("all" for every habit)
        #[arg(long, default_value = ALL_CATEGORIES)]
        category: String,
    },
    /// Show one habit with its streaks, week and year
    Show {
        id: i64,
        /// Reference day as YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<String>,
        /// Include the full year grid
        #[arg(long)]
        grid: bool,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HabitSummary<'a> {
    id: i64,
    name: &'a str,
    category: &'a str,
    icon: &'a str,
    goal: u32,
    today_count: u32,
    completed_today: bool,
    streak: u32,
    week_percent: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HabitDetail<'a> {
    habit: &'a Habit,
    completed: bool,
    streak: u32,
    longest_streak: u32,
    week: WeeklyProgress,
    #[serde(skip_serializing_if = "Option::is_none")]
    year: Option<YearGrid>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ToggleResult {
    id: i64,
    date: DateKey,
    count: u32,
    goal: u32,
    completed: bool,
}

fn parse_date(raw: Option<String>) -> CliResult<Option<DateKey>> {
    Ok(raw.map(|d| d.parse::<DateKey>()).transpose()?)
}

fn parse_goal_arg(raw: Option<String>) -> CliResult<Option<i64>> {
    Ok(raw.map(|g| parse_goal(&g)).transpose()?)
}

pub fn run(action: HabitAction, config: &Config) -> CliResult {
    let db = open_database(config)?;
    let mut habits = HabitStore::open(&db);
    onboarding::ensure_first_run(&mut habits);

    let result = execute(action, config, &mut habits);
    report_warnings(&habits.take_warnings());
    result
}

fn execute(action: HabitAction, config: &Config, habits: &mut HabitStore<&Database>) -> CliResult {
    match action {
        HabitAction::Add {
            name,
            description,
            category,
            icon,
            color,
            goal,
        } => {
            let mut draft = HabitDraft::new(name)
                .description(description)
                .category(category.unwrap_or_else(|| config.habits.default_category.clone()))
                .goal(parse_goal_arg(goal)?.unwrap_or(i64::from(config.habits.default_goal)));
            if let Some(icon) = icon {
                draft = draft.icon(icon);
            }
            if let Some(color) = color {
                draft = draft.color(color);
            }
            let id = habits.add(&draft)?;
            print_json(habits.get(id)?)?;
        }
        HabitAction::Edit {
            id,
            name,
            description,
            category,
            icon,
            color,
            goal,
        } => {
            let current = habits.get(id)?;
            let draft = HabitDraft {
                name: name.unwrap_or_else(|| current.name.clone()),
                description: description.unwrap_or_else(|| current.description.clone()),
                category: category.unwrap_or_else(|| current.category.clone()),
                icon: icon.unwrap_or_else(|| current.icon.clone()),
                color: color.unwrap_or_else(|| current.color.clone()),
                goal: parse_goal_arg(goal)?.unwrap_or(i64::from(current.goal)),
            };
            habits.update(id, &draft)?;
            print_json(habits.get(id)?)?;
        }
        HabitAction::Delete { id } => {
            let removed = habits.delete(id);
            print_json(&serde_json::json!({ "id": id, "removed": removed }))?;
        }
        HabitAction::Toggle { id, date } => {
            let date = parse_date(date)?.unwrap_or_else(|| habits.today());
            let count = habits.toggle_completion(id, Some(date))?;
            let goal = habits.get(id)?.goal;
            print_json(&ToggleResult {
                id,
                date,
                count,
                goal,
                completed: count >= goal,
            })?;
        }
        HabitAction::List { category } => {
            let today = habits.today();
            let mut rows = Vec::new();
            for habit in habits.by_category(&category) {
                rows.push(HabitSummary {
                    id: habit.id,
                    name: &habit.name,
                    category: &habit.category,
                    icon: &habit.icon,
                    goal: habit.goal,
                    today_count: habit.count_on(today),
                    completed_today: habits.is_completed_on_date(habit.id, today)?,
                    streak: habits.streak(habit.id, Some(today))?,
                    week_percent: habits.weekly_progress(habit.id, Some(today))?.percent,
                });
            }
            print_json(&rows)?;
        }
        HabitAction::Show { id, date, grid } => {
            let date = parse_date(date)?.unwrap_or_else(|| habits.today());
            let detail = HabitDetail {
                habit: habits.get(id)?,
                completed: habits.is_completed_on_date(id, date)?,
                streak: habits.streak(id, Some(date))?,
                longest_streak: habits.longest_streak(id)?,
                week: habits.weekly_progress(id, Some(date))?,
                year: if grid {
                    Some(habits.year_grid(id, Some(date))?)
                } else {
                    None
                },
            };
            print_json(&detail)?;
        }
    }
    Ok(())
}
