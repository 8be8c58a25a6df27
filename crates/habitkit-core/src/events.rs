use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::TimerMode;

/// Every timer state change produces an Event.
/// The presentation layer renders them; it never reaches into the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerStarted {
        mode: TimerMode,
        duration_secs: u64,
        end_timestamp_ms: i64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        mode: TimerMode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        mode: TimerMode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    ModeSwitched {
        mode: TimerMode,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    /// Periodic recomputation while running.
    TimerTick {
        mode: TimerMode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// An interval ended, either by running out or by being skipped.
    TimerCompleted {
        completed_mode: TimerMode,
        next_mode: TimerMode,
        session_count: u64,
        skipped: bool,
        auto_started: bool,
        play_sound: bool,
        at: DateTime<Utc>,
    },
    /// A run persisted by an earlier process was picked up again.
    TimerRecovered {
        mode: TimerMode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn at(&self) -> DateTime<Utc> {
        match self {
            Event::TimerStarted { at, .. }
            | Event::TimerPaused { at, .. }
            | Event::TimerReset { at, .. }
            | Event::ModeSwitched { at, .. }
            | Event::TimerTick { at, .. }
            | Event::TimerCompleted { at, .. }
            | Event::TimerRecovered { at, .. } => *at,
        }
    }

    pub fn is_completion(&self) -> bool {
        matches!(self, Event::TimerCompleted { .. })
    }
}
