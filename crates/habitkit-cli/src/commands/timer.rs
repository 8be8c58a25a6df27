use std::time::Duration;

use clap::Subcommand;
use habitkit_core::{
    Config, Database, Event, IntervalTicker, ManualTicker, SystemClock, Ticker, TimerMode,
    TimerSession, TimerSettings,
};

use super::{open_database, print_json, report_warnings, CliResult};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start a timer (defaults to the current mode and its configured length)
    Start {
        /// pomodoro, short or long
        #[arg(long)]
        mode: Option<TimerMode>,
        /// Override the length in minutes
        #[arg(long)]
        minutes: Option<u64>,
    },
    /// Pause and keep the remaining time
    Pause,
    /// Continue from the remaining time
    Resume,
    /// Pause if running, otherwise resume
    Toggle,
    /// Stop and restore the full length of the current mode
    Reset,
    /// End the current interval now
    Skip,
    /// Stop and switch to another mode
    Mode { mode: TimerMode },
    /// Print the current timer state as JSON
    Status,
    /// Follow a running timer, printing one JSON line per tick
    Watch,
    /// Show or change timer settings
    Settings {
        /// Focus length in minutes
        #[arg(long)]
        focus: Option<u32>,
        /// Short break length in minutes
        #[arg(long)]
        short: Option<u32>,
        /// Long break length in minutes
        #[arg(long)]
        long: Option<u32>,
        #[arg(long)]
        auto_start_breaks: Option<bool>,
        #[arg(long)]
        sound: Option<bool>,
    },
}

type Session<'a, T> = TimerSession<&'a Database, SystemClock, T>;

fn open_session<'a, T: Ticker>(db: &'a Database, config: &Config, ticker: T) -> Session<'a, T> {
    TimerSession::new(db, SystemClock, ticker)
        .with_long_break_interval(config.timer.long_break_interval)
        .with_tick_period(Duration::from_millis(config.timer.tick_interval_ms))
}

fn print_event(event: &Event) -> CliResult {
    print_json(event)
}

pub fn run(action: TimerAction, config: &Config) -> CliResult {
    let db = open_database(config)?;
    if let TimerAction::Watch = action {
        return watch(&db, config);
    }

    let mut session = open_session(&db, config, ManualTicker::new());
    if let Some(event) = session.recover_on_load() {
        if event.is_completion() {
            print_event(&event)?;
        }
    }

    let result = execute(action, &mut session);
    report_warnings(&session.take_warnings());
    result
}

fn execute(action: TimerAction, session: &mut Session<'_, ManualTicker>) -> CliResult {
    match action {
        TimerAction::Start { mode, minutes } => {
            let mode = mode.unwrap_or_else(|| session.mode());
            let secs = match minutes {
                Some(m) => m.saturating_mul(60),
                None => session.settings().duration_secs(mode),
            };
            print_event(&session.start(mode, secs)?)?;
        }
        TimerAction::Pause => match session.pause() {
            Some(event) => print_event(&event)?,
            None => print_json(&session.snapshot())?,
        },
        TimerAction::Resume => match session.resume() {
            Some(event) => print_event(&event)?,
            None => print_json(&session.snapshot())?,
        },
        TimerAction::Toggle => match session.toggle() {
            Some(event) => print_event(&event)?,
            None => print_json(&session.snapshot())?,
        },
        TimerAction::Reset => print_event(&session.reset())?,
        TimerAction::Skip => print_event(&session.skip())?,
        TimerAction::Mode { mode } => print_event(&session.switch_mode(mode))?,
        // Watch needs an async runtime and is dispatched before this point;
        // reaching here only reports the state.
        TimerAction::Status | TimerAction::Watch => {
            if let Some(event) = session.tick() {
                if event.is_completion() {
                    print_event(&event)?;
                }
            }
            print_json(&session.snapshot())?;
        }
        TimerAction::Settings {
            focus,
            short,
            long,
            auto_start_breaks,
            sound,
        } => {
            let current = session.settings();
            let settings = TimerSettings {
                pomodoro_time: focus.unwrap_or(current.pomodoro_time),
                short_break_time: short.unwrap_or(current.short_break_time),
                long_break_time: long.unwrap_or(current.long_break_time),
                auto_start_breaks: auto_start_breaks.unwrap_or(current.auto_start_breaks),
                sound_enabled: sound.unwrap_or(current.sound_enabled),
            };
            if &settings != session.settings() {
                session.update_settings(settings)?;
            }
            print_json(session.settings())?;
        }
    }
    Ok(())
}

/// Drive the timer from a tokio interval until it stops or Ctrl-C.
/// Leaving with Ctrl-C keeps the timer running in the store.
fn watch(db: &Database, config: &Config) -> CliResult {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(follow(db, config))
}

async fn follow(db: &Database, config: &Config) -> CliResult {
    let (ticker, mut beats) = IntervalTicker::channel();
    let mut session = open_session(db, config, ticker);

    if let Some(event) = session.recover_on_load() {
        println!("{}", serde_json::to_string(&event)?);
    }
    if !session.is_running() {
        println!("{}", serde_json::to_string(&session.snapshot())?);
        eprintln!("timer is not running");
        report_warnings(&session.take_warnings());
        return Ok(());
    }

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            Some(()) = beats.recv() => {
                if let Some(event) = session.tick() {
                    println!("{}", serde_json::to_string(&event)?);
                    if event.is_completion() && !session.is_running() {
                        break;
                    }
                }
            }
            _ = &mut ctrl_c => {
                tracing::debug!("watch interrupted");
                break;
            }
            else => break,
        }
    }

    report_warnings(&session.take_warnings());
    Ok(())
}
