mod session;
mod settings;
pub mod ticker;

pub use session::{format_clock, TimerSession, TimerSnapshot, DEFAULT_LONG_BREAK_INTERVAL};
pub use settings::{TimerMode, TimerSettings};
pub use ticker::{IntervalTicker, ManualTicker, Ticker};
