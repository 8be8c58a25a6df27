//! Pomodoro session engine.
//!
//! The engine is a wall-clock-based state machine. While running, the only
//! source of truth is the absolute end timestamp; the remaining time is
//! recomputed from it on every read and never decremented, so suspension
//! and reloads cannot make it drift.
//!
//! ## State Transitions
//!
//! ```text
//! Stopped --start/resume--> Running --pause--> Stopped
//! Running --tick reaches 0 / skip--> Stopped (next mode loaded)
//!                                    or Running (auto-started break)
//! ```
//!
//! ## Persistence
//!
//! While running, `pomodoroEndTime`, `pomodoroRunning`, `pomodoroMode` and
//! `pomodoroTotalTime` are stored so that a fresh process can call
//! [`TimerSession::recover_on_load`]. A paused run keeps its frozen remaining
//! time under `pomodoroRemaining`.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::settings::{TimerMode, TimerSettings};
use super::ticker::Ticker;
use crate::clock::Clock;
use crate::error::{PersistenceError, Result, ValidationError};
use crate::events::Event;
use crate::habit::PersistenceWarning;
use crate::storage::{keys, KeyValueStore};

/// Focus completions between long breaks unless configured otherwise.
pub const DEFAULT_LONG_BREAK_INTERVAL: u32 = 4;

/// Plain-data view of the timer for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSnapshot {
    pub mode: TimerMode,
    pub label: String,
    pub running: bool,
    pub remaining_secs: u64,
    pub total_secs: u64,
    /// 0.0 at the start of the interval, 1.0 at the end.
    pub progress: f64,
    /// `MM:SS`
    pub display: String,
    pub session_count: u64,
    pub end_timestamp_ms: Option<i64>,
}

/// The single active pomodoro run.
pub struct TimerSession<S, C, T> {
    store: S,
    clock: C,
    ticker: T,
    settings: TimerSettings,
    long_break_interval: u32,
    tick_period: Duration,
    mode: TimerMode,
    total_secs: u64,
    /// Frozen value while stopped; ignored while running.
    remaining_secs: u64,
    /// Present exactly when running.
    end_timestamp_ms: Option<i64>,
    session_count: u64,
    warnings: Vec<PersistenceWarning>,
}

impl<S: KeyValueStore, C: Clock, T: Ticker> TimerSession<S, C, T> {
    /// Build the engine from persisted settings, session count and any
    /// stopped-state mode/remaining time. A persisted *running* state is left
    /// alone until [`Self::recover_on_load`] is called.
    pub fn new(store: S, clock: C, ticker: T) -> Self {
        let settings = TimerSettings::load(&store);
        let session_count = read_parsed::<u64, _>(&store, keys::SESSION_COUNT).unwrap_or(0);
        let mode = read_raw(&store, keys::TIMER_MODE)
            .and_then(|m| m.parse().ok())
            .unwrap_or_default();
        let total_secs = read_parsed::<u64, _>(&store, keys::TIMER_TOTAL)
            .filter(|t| *t > 0)
            .unwrap_or_else(|| settings.duration_secs(mode));
        let remaining_secs = read_parsed::<u64, _>(&store, keys::TIMER_REMAINING)
            .map(|r| r.min(total_secs))
            .unwrap_or(total_secs);

        Self {
            store,
            clock,
            ticker,
            settings,
            long_break_interval: DEFAULT_LONG_BREAK_INTERVAL,
            tick_period: Duration::from_secs(1),
            mode,
            total_secs,
            remaining_secs,
            end_timestamp_ms: None,
            session_count,
            warnings: Vec::new(),
        }
    }

    pub fn with_long_break_interval(mut self, interval: u32) -> Self {
        self.long_break_interval = interval.max(1);
        self
    }

    pub fn with_tick_period(mut self, period: Duration) -> Self {
        if !period.is_zero() {
            self.tick_period = period;
        }
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn is_running(&self) -> bool {
        self.end_timestamp_ms.is_some()
    }

    pub fn end_timestamp_ms(&self) -> Option<i64> {
        self.end_timestamp_ms
    }

    pub fn total_secs(&self) -> u64 {
        self.total_secs
    }

    /// Remaining whole seconds, rounded up; recomputed from the end
    /// timestamp while running.
    pub fn remaining_secs(&self) -> u64 {
        match self.end_timestamp_ms {
            Some(end) => remaining_until(end, self.clock.now_ms()),
            None => self.remaining_secs,
        }
    }

    pub fn session_count(&self) -> u64 {
        self.session_count
    }

    pub fn settings(&self) -> &TimerSettings {
        &self.settings
    }

    pub fn ticker(&self) -> &T {
        &self.ticker
    }

    pub fn ticker_mut(&mut self) -> &mut T {
        &mut self.ticker
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        let remaining = self.remaining_secs();
        let progress = if self.total_secs == 0 {
            0.0
        } else {
            (1.0 - remaining as f64 / self.total_secs as f64).clamp(0.0, 1.0)
        };
        TimerSnapshot {
            mode: self.mode,
            label: format!("{} {} MIN", self.mode.label(), self.total_secs / 60),
            running: self.is_running(),
            remaining_secs: remaining,
            total_secs: self.total_secs,
            progress,
            display: format_clock(remaining),
            session_count: self.session_count,
            end_timestamp_ms: self.end_timestamp_ms,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start `mode` for `duration_secs` from now.
    ///
    /// # Errors
    /// `Validation` for a zero duration.
    pub fn start(&mut self, mode: TimerMode, duration_secs: u64) -> Result<Event> {
        if duration_secs == 0 {
            return Err(ValidationError::InvalidValue {
                field: "duration".into(),
                message: "must be greater than zero".into(),
            }
            .into());
        }
        self.halt();
        self.mode = mode;
        self.total_secs = duration_secs;
        self.remaining_secs = duration_secs;
        Ok(self.run_for(duration_secs))
    }

    /// Continue the current mode from its frozen remaining time, or from the
    /// full configured duration if nothing is left. No-op while running.
    pub fn resume(&mut self) -> Option<Event> {
        if self.is_running() {
            return None;
        }
        if self.remaining_secs == 0 {
            self.total_secs = self.settings.duration_secs(self.mode);
            self.remaining_secs = self.total_secs;
        }
        let remaining = self.remaining_secs;
        Some(self.run_for(remaining))
    }

    /// Pause if running, otherwise resume.
    pub fn toggle(&mut self) -> Option<Event> {
        if self.is_running() {
            self.pause()
        } else {
            self.resume()
        }
    }

    /// Freeze the remaining time and stop ticking. Returns `None` if the
    /// timer was not running.
    pub fn pause(&mut self) -> Option<Event> {
        if !self.is_running() {
            self.ticker.cancel();
            return None;
        }
        let remaining = self.remaining_secs();
        self.halt();
        self.remaining_secs = remaining;
        self.write(keys::TIMER_REMAINING, &remaining.to_string(), "pause");
        debug!(mode = %self.mode, remaining, "timer paused");
        Some(Event::TimerPaused {
            mode: self.mode,
            remaining_secs: remaining,
            at: self.clock.now(),
        })
    }

    /// Stop and restore the configured duration of the current mode.
    pub fn reset(&mut self) -> Event {
        self.halt();
        self.load_mode(self.mode);
        Event::TimerReset {
            mode: self.mode,
            remaining_secs: self.remaining_secs,
            at: self.clock.now(),
        }
    }

    /// Stop and load another mode with its configured duration.
    pub fn switch_mode(&mut self, mode: TimerMode) -> Event {
        self.halt();
        self.load_mode(mode);
        Event::ModeSwitched {
            mode,
            duration_secs: self.total_secs,
            at: self.clock.now(),
        }
    }

    /// End the current interval early. Counts exactly like a natural finish.
    pub fn skip(&mut self) -> Event {
        self.finish(true)
    }

    /// End the current interval: count focus completions, pick the next
    /// mode and optionally auto-start a break.
    pub fn complete(&mut self) -> Event {
        self.finish(false)
    }

    /// Periodic recomputation. Returns `None` when not running, the
    /// completion event when time is up, a tick event otherwise.
    pub fn tick(&mut self) -> Option<Event> {
        let Some(end) = self.end_timestamp_ms else {
            self.ticker.cancel();
            return None;
        };
        let remaining = remaining_until(end, self.clock.now_ms());
        if remaining == 0 {
            return Some(self.complete());
        }
        Some(Event::TimerTick {
            mode: self.mode,
            remaining_secs: remaining,
            at: self.clock.now(),
        })
    }

    /// Resume a run persisted by an earlier process.
    ///
    /// If the stored end is still ahead the run continues; if it has passed,
    /// exactly one completion fires no matter how long ago it was.
    pub fn recover_on_load(&mut self) -> Option<Event> {
        let running = read_raw(&self.store, keys::TIMER_RUNNING).as_deref() == Some("true");
        let end = read_parsed::<i64, _>(&self.store, keys::TIMER_END);
        let end = match (running, end) {
            (true, Some(end)) => end,
            (true, None) | (false, Some(_)) => {
                // Half-written state: treat as stopped.
                self.remove(keys::TIMER_RUNNING, "recover");
                self.remove(keys::TIMER_END, "recover");
                return None;
            }
            (false, None) => return None,
        };

        let now = self.clock.now_ms();
        let remaining = remaining_until(end, now);
        if remaining > 0 {
            self.end_timestamp_ms = Some(end);
            self.remaining_secs = remaining;
            self.ticker.schedule(self.tick_period);
            info!(mode = %self.mode, remaining, "resumed running timer");
            Some(Event::TimerRecovered {
                mode: self.mode,
                remaining_secs: remaining,
                at: self.clock.now(),
            })
        } else {
            info!(mode = %self.mode, overdue_ms = now - end, "timer expired while away");
            self.end_timestamp_ms = Some(end);
            Some(self.complete())
        }
    }

    /// Replace the settings and persist them. A stopped timer picks up the
    /// new duration for its mode.
    ///
    /// # Errors
    /// `Validation` for zero-minute durations; nothing is changed.
    pub fn update_settings(&mut self, settings: TimerSettings) -> Result<()> {
        settings.validate()?;
        if let Err(e) = settings.save(&self.store) {
            self.record(e, "settings");
        }
        self.settings = settings;
        if !self.is_running() {
            self.load_mode(self.mode);
        }
        Ok(())
    }

    /// Drain warnings raised by failed writes since the last call.
    pub fn take_warnings(&mut self) -> Vec<PersistenceWarning> {
        std::mem::take(&mut self.warnings)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn run_for(&mut self, secs: u64) -> Event {
        let now = self.clock.now_ms();
        let end = now.saturating_add(i64::try_from(secs.saturating_mul(1000)).unwrap_or(i64::MAX));
        self.end_timestamp_ms = Some(end);
        self.write(keys::TIMER_END, &end.to_string(), "start");
        self.write(keys::TIMER_RUNNING, "true", "start");
        self.write(keys::TIMER_MODE, self.mode.as_str(), "start");
        self.write(keys::TIMER_TOTAL, &self.total_secs.to_string(), "start");
        self.remove(keys::TIMER_REMAINING, "start");
        self.ticker.schedule(self.tick_period);
        debug!(mode = %self.mode, secs, end, "timer started");
        Event::TimerStarted {
            mode: self.mode,
            duration_secs: secs,
            end_timestamp_ms: end,
            at: self.clock.now(),
        }
    }

    /// Stop ticking and drop the running state. Idempotent.
    fn halt(&mut self) {
        self.ticker.cancel();
        if self.end_timestamp_ms.take().is_some() {
            self.remaining_secs = 0;
        }
        self.remove(keys::TIMER_END, "stop");
        self.remove(keys::TIMER_RUNNING, "stop");
    }

    fn load_mode(&mut self, mode: TimerMode) {
        self.mode = mode;
        self.total_secs = self.settings.duration_secs(mode);
        self.remaining_secs = self.total_secs;
        self.write(keys::TIMER_MODE, mode.as_str(), "mode");
        self.write(keys::TIMER_TOTAL, &self.total_secs.to_string(), "mode");
        self.remove(keys::TIMER_REMAINING, "mode");
    }

    fn finish(&mut self, skipped: bool) -> Event {
        self.halt();
        let completed_mode = self.mode;
        let next_mode = if completed_mode == TimerMode::Focus {
            self.session_count += 1;
            self.write(keys::SESSION_COUNT, &self.session_count.to_string(), "complete");
            if self.session_count % u64::from(self.long_break_interval) == 0 {
                TimerMode::LongBreak
            } else {
                TimerMode::ShortBreak
            }
        } else {
            TimerMode::Focus
        };
        self.load_mode(next_mode);

        let auto_started = next_mode.is_break() && self.settings.auto_start_breaks;
        if auto_started {
            let secs = self.total_secs;
            self.run_for(secs);
        }
        info!(
            completed = %completed_mode,
            next = %next_mode,
            sessions = self.session_count,
            skipped,
            "interval completed"
        );
        Event::TimerCompleted {
            completed_mode,
            next_mode,
            session_count: self.session_count,
            skipped,
            auto_started,
            play_sound: self.settings.sound_enabled,
            at: self.clock.now(),
        }
    }

    fn write(&mut self, key: &str, value: &str, operation: &'static str) {
        if let Err(e) = self.store.set(key, value) {
            self.record(e, operation);
        }
    }

    fn remove(&mut self, key: &str, operation: &'static str) {
        if let Err(e) = self.store.remove(key) {
            self.record(e, operation);
        }
    }

    fn record(&mut self, error: PersistenceError, operation: &'static str) {
        warn!(operation, error = %error, "timer state not persisted; continuing in memory");
        self.warnings.push(PersistenceWarning {
            operation,
            error: error.to_string(),
        });
    }
}

fn read_raw<S: KeyValueStore>(store: &S, key: &str) -> Option<String> {
    match store.get(key) {
        Ok(value) => value,
        Err(e) => {
            warn!(key, error = %e, "timer state unreadable");
            None
        }
    }
}

fn read_parsed<V: std::str::FromStr, S: KeyValueStore>(store: &S, key: &str) -> Option<V> {
    read_raw(store, key).and_then(|raw| raw.trim().parse().ok())
}

/// `ceil((end - now) / 1000)`, never negative.
fn remaining_until(end_ms: i64, now_ms: i64) -> u64 {
    let left = end_ms.saturating_sub(now_ms).max(0) as u64;
    left.div_ceil(1000)
}

/// `MM:SS`, minutes unbounded.
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::storage::MemoryStore;
    use crate::timer::ManualTicker;

    const T0: i64 = 1_700_000_000_000;

    fn engine<'a>(
        store: &'a MemoryStore,
        clock: &'a ManualClock,
    ) -> TimerSession<&'a MemoryStore, &'a ManualClock, ManualTicker> {
        TimerSession::new(store, clock, ManualTicker::new())
    }

    #[test]
    fn remaining_rounds_up() {
        assert_eq!(remaining_until(T0 + 10_000, T0), 10);
        assert_eq!(remaining_until(T0 + 9_001, T0), 10);
        assert_eq!(remaining_until(T0 + 1, T0), 1);
        assert_eq!(remaining_until(T0, T0), 0);
        assert_eq!(remaining_until(T0 - 5_000, T0), 0);
    }

    #[test]
    fn format_clock_pads() {
        assert_eq!(format_clock(1500), "25:00");
        assert_eq!(format_clock(61), "01:01");
        assert_eq!(format_clock(0), "00:00");
    }

    #[test]
    fn fresh_engine_defaults() {
        let store = MemoryStore::new();
        let clock = ManualClock::new(T0);
        let timer = engine(&store, &clock);
        assert_eq!(timer.mode(), TimerMode::Focus);
        assert!(!timer.is_running());
        assert_eq!(timer.remaining_secs(), 1500);
        assert_eq!(timer.snapshot().label, "POMODORO 25 MIN");
    }

    #[test]
    fn start_persists_end_timestamp() {
        let store = MemoryStore::new();
        let clock = ManualClock::new(T0);
        let mut timer = engine(&store, &clock);
        let event = timer.start(TimerMode::Focus, 60).unwrap();
        assert!(matches!(event, Event::TimerStarted { end_timestamp_ms, .. } if end_timestamp_ms == T0 + 60_000));
        assert!(timer.is_running());
        assert!(timer.ticker().is_active());
        assert_eq!(store.get(keys::TIMER_END).unwrap(), Some((T0 + 60_000).to_string()));
        assert_eq!(store.get(keys::TIMER_RUNNING).unwrap().as_deref(), Some("true"));
        assert_eq!(store.get(keys::TIMER_MODE).unwrap().as_deref(), Some("pomodoro"));
        assert_eq!(store.get(keys::TIMER_TOTAL).unwrap().as_deref(), Some("60"));
    }

    #[test]
    fn start_rejects_zero_duration() {
        let store = MemoryStore::new();
        let clock = ManualClock::new(T0);
        let mut timer = engine(&store, &clock);
        assert!(timer.start(TimerMode::Focus, 0).is_err());
        assert!(!timer.is_running());
        assert!(store.get(keys::TIMER_RUNNING).unwrap().is_none());
    }

    #[test]
    fn remaining_follows_wall_clock_not_ticks() {
        let store = MemoryStore::new();
        let clock = ManualClock::new(T0);
        let mut timer = engine(&store, &clock);
        timer.start(TimerMode::Focus, 60).unwrap();
        // No ticks delivered while "suspended".
        clock.advance_secs(45);
        assert_eq!(timer.remaining_secs(), 15);
        assert!(matches!(timer.tick(), Some(Event::TimerTick { remaining_secs: 15, .. })));
    }

    #[test]
    fn pause_freezes_and_clears_running_keys() {
        let store = MemoryStore::new();
        let clock = ManualClock::new(T0);
        let mut timer = engine(&store, &clock);
        timer.start(TimerMode::Focus, 60).unwrap();
        clock.advance_secs(20);
        let event = timer.pause().unwrap();
        assert!(matches!(event, Event::TimerPaused { remaining_secs: 40, .. }));
        clock.advance_secs(100);
        assert_eq!(timer.remaining_secs(), 40);
        assert!(timer.end_timestamp_ms().is_none());
        assert!(!timer.ticker().is_active());
        assert!(store.get(keys::TIMER_END).unwrap().is_none());
        assert!(store.get(keys::TIMER_RUNNING).unwrap().is_none());
        assert_eq!(store.get(keys::TIMER_REMAINING).unwrap().as_deref(), Some("40"));

        assert!(timer.pause().is_none());
        assert!(timer.tick().is_none());
    }

    #[test]
    fn paused_state_survives_restart_and_resumes() {
        let store = MemoryStore::new();
        let clock = ManualClock::new(T0);
        {
            let mut timer = engine(&store, &clock);
            timer.switch_mode(TimerMode::ShortBreak);
            timer.resume().unwrap();
            clock.advance_secs(100);
            timer.pause().unwrap();
        }
        let mut timer = engine(&store, &clock);
        assert!(timer.recover_on_load().is_none());
        assert_eq!(timer.mode(), TimerMode::ShortBreak);
        assert_eq!(timer.remaining_secs(), 200);
        let event = timer.resume().unwrap();
        assert!(matches!(event, Event::TimerStarted { duration_secs: 200, .. }));
        assert_eq!(timer.total_secs(), 300);
    }

    #[test]
    fn reset_restores_configured_duration() {
        let store = MemoryStore::new();
        let clock = ManualClock::new(T0);
        let mut timer = engine(&store, &clock);
        timer.start(TimerMode::Focus, 90).unwrap();
        clock.advance_secs(30);
        let event = timer.reset();
        assert!(matches!(event, Event::TimerReset { remaining_secs: 1500, .. }));
        assert!(!timer.is_running());
        assert_eq!(timer.total_secs(), 1500);
    }

    #[test]
    fn toggle_alternates() {
        let store = MemoryStore::new();
        let clock = ManualClock::new(T0);
        let mut timer = engine(&store, &clock);
        assert!(matches!(timer.toggle(), Some(Event::TimerStarted { .. })));
        assert!(matches!(timer.toggle(), Some(Event::TimerPaused { .. })));
        assert!(matches!(timer.toggle(), Some(Event::TimerStarted { .. })));
    }

    #[test]
    fn completion_cycles_short_and_long_breaks() {
        let store = MemoryStore::new();
        let clock = ManualClock::new(T0);
        let mut timer = engine(&store, &clock);
        let mut next_modes = Vec::new();
        for _ in 0..4 {
            match timer.complete() {
                Event::TimerCompleted { next_mode, .. } => next_modes.push(next_mode),
                other => panic!("unexpected {other:?}"),
            }
            // Finish the break to get back to focus.
            assert!(matches!(
                timer.complete(),
                Event::TimerCompleted { next_mode: TimerMode::Focus, .. }
            ));
        }
        assert_eq!(
            next_modes,
            vec![
                TimerMode::ShortBreak,
                TimerMode::ShortBreak,
                TimerMode::ShortBreak,
                TimerMode::LongBreak
            ]
        );
        assert_eq!(timer.session_count(), 4);
        assert_eq!(store.get(keys::SESSION_COUNT).unwrap().as_deref(), Some("4"));
    }

    #[test]
    fn long_break_interval_is_configurable() {
        let store = MemoryStore::new();
        let clock = ManualClock::new(T0);
        let mut timer = engine(&store, &clock).with_long_break_interval(2);
        timer.complete();
        timer.complete();
        assert!(matches!(
            timer.complete(),
            Event::TimerCompleted { next_mode: TimerMode::LongBreak, session_count: 2, .. }
        ));
    }

    #[test]
    fn tick_to_zero_completes_once() {
        let store = MemoryStore::new();
        let clock = ManualClock::new(T0);
        let mut timer = engine(&store, &clock);
        timer.start(TimerMode::Focus, 5).unwrap();
        clock.advance_secs(5);
        let event = timer.tick().unwrap();
        assert!(matches!(
            event,
            Event::TimerCompleted { completed_mode: TimerMode::Focus, skipped: false, auto_started: false, .. }
        ));
        assert!(timer.tick().is_none());
        assert_eq!(timer.session_count(), 1);
        assert_eq!(timer.mode(), TimerMode::ShortBreak);
        assert_eq!(timer.remaining_secs(), 300);
    }

    #[test]
    fn skip_counts_as_completion() {
        let store = MemoryStore::new();
        let clock = ManualClock::new(T0);
        let mut timer = engine(&store, &clock);
        timer.start(TimerMode::Focus, 1500).unwrap();
        assert!(matches!(timer.skip(), Event::TimerCompleted { skipped: true, session_count: 1, .. }));
        assert!(!timer.ticker().is_active());
    }

    #[test]
    fn auto_start_breaks_runs_next_break() {
        let store = MemoryStore::new();
        TimerSettings {
            auto_start_breaks: true,
            ..TimerSettings::default()
        }
        .save(&store)
        .unwrap();
        let clock = ManualClock::new(T0);
        let mut timer = engine(&store, &clock);
        timer.start(TimerMode::Focus, 10).unwrap();
        clock.advance_secs(10);
        assert!(matches!(timer.tick(), Some(Event::TimerCompleted { auto_started: true, .. })));
        assert!(timer.is_running());
        assert_eq!(timer.mode(), TimerMode::ShortBreak);
        assert_eq!(timer.remaining_secs(), 300);

        // Finishing the break does not auto-start focus.
        clock.advance_secs(300);
        assert!(matches!(timer.tick(), Some(Event::TimerCompleted { auto_started: false, .. })));
        assert!(!timer.is_running());
    }

    #[test]
    fn session_count_never_decreases() {
        let store = MemoryStore::new();
        let clock = ManualClock::new(T0);
        let mut timer = engine(&store, &clock);
        let mut last = timer.session_count();
        for _ in 0..6 {
            timer.reset();
            timer.skip();
            timer.switch_mode(TimerMode::LongBreak);
            assert!(timer.session_count() >= last);
            last = timer.session_count();
        }
    }

    #[test]
    fn update_settings_applies_when_stopped() {
        let store = MemoryStore::new();
        let clock = ManualClock::new(T0);
        let mut timer = engine(&store, &clock);
        let settings = TimerSettings {
            pomodoro_time: 50,
            ..TimerSettings::default()
        };
        timer.update_settings(settings.clone()).unwrap();
        assert_eq!(timer.remaining_secs(), 3000);
        assert_eq!(TimerSettings::load(&store), settings);

        let bad = TimerSettings {
            short_break_time: 0,
            ..TimerSettings::default()
        };
        assert!(timer.update_settings(bad).is_err());
        assert_eq!(timer.settings().pomodoro_time, 50);
    }
}
