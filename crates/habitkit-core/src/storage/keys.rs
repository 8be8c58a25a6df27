//! Storage keys. Names match the browser app so its backups import as-is.

pub const HABITS: &str = "habits";
pub const TASKS: &str = "tasks";
pub const THEME: &str = "app-theme";
pub const ONBOARDED: &str = "habitkit-habits-onboarded";

pub const TIMER_SETTINGS: &str = "pomodoroSettings";
pub const SESSION_COUNT: &str = "pomodoroSessions";
pub const TIMER_END: &str = "pomodoroEndTime";
pub const TIMER_RUNNING: &str = "pomodoroRunning";
pub const TIMER_MODE: &str = "pomodoroMode";
pub const TIMER_TOTAL: &str = "pomodoroTotalTime";
pub const TIMER_REMAINING: &str = "pomodoroRemaining";

/// Keys removed by a clear-all, in order. The theme and the onboarding flag
/// are preferences and survive.
pub const DATA: [&str; 9] = [
    HABITS,
    TASKS,
    TIMER_SETTINGS,
    SESSION_COUNT,
    TIMER_END,
    TIMER_RUNNING,
    TIMER_MODE,
    TIMER_TOTAL,
    TIMER_REMAINING,
];
