//! Recurring tick sources for the session engine.
//!
//! The engine only asks a ticker to start or stop; whoever owns the
//! receiving end calls [`super::TimerSession::tick`] on each beat.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::warn;

/// A cancellable periodic callback.
///
/// `cancel` must be safe to call when nothing is scheduled.
pub trait Ticker {
    fn schedule(&mut self, period: Duration);
    fn cancel(&mut self);
    fn is_active(&self) -> bool;
}

/// Ticker that only records what was asked of it. The caller drives ticks
/// by hand (tests, one-shot CLI commands).
#[derive(Debug, Default, Clone)]
pub struct ManualTicker {
    period: Option<Duration>,
    pub schedules: u32,
    pub cancels: u32,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn period(&self) -> Option<Duration> {
        self.period
    }
}

impl Ticker for ManualTicker {
    fn schedule(&mut self, period: Duration) {
        self.period = Some(period);
        self.schedules += 1;
    }

    fn cancel(&mut self) {
        if self.period.take().is_some() {
            self.cancels += 1;
        }
    }

    fn is_active(&self) -> bool {
        self.period.is_some()
    }
}

/// Tokio interval task that sends a unit message per period.
///
/// Missed beats (a suspended process) are skipped rather than replayed;
/// the engine recomputes from the wall clock anyway.
pub struct IntervalTicker {
    tx: mpsc::UnboundedSender<()>,
    handle: Option<JoinHandle<()>>,
}

impl IntervalTicker {
    /// Ticker plus the receiver its beats arrive on.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx, handle: None }, rx)
    }
}

impl Ticker for IntervalTicker {
    fn schedule(&mut self, period: Duration) {
        self.cancel();

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                warn!(error = %e, "no async runtime; ticks must be driven manually");
                return;
            }
        };

        let tx = self.tx.clone();
        self.handle = Some(runtime.spawn(async move {
            let mut interval = time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                if tx.send(()).is_err() {
                    break;
                }
            }
        }));
    }

    fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for IntervalTicker {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_cancel_is_idempotent() {
        let mut ticker = ManualTicker::new();
        ticker.cancel();
        assert_eq!(ticker.cancels, 0);
        ticker.schedule(Duration::from_secs(1));
        assert!(ticker.is_active());
        ticker.cancel();
        ticker.cancel();
        assert!(!ticker.is_active());
        assert_eq!(ticker.cancels, 1);
    }

    #[tokio::test]
    async fn interval_ticker_beats_until_cancelled() {
        let (mut ticker, mut rx) = IntervalTicker::channel();
        ticker.schedule(Duration::from_millis(10));
        assert!(ticker.is_active());

        let beat = time::timeout(Duration::from_secs(2), rx.recv()).await;
        assert_eq!(beat.unwrap(), Some(()));

        ticker.cancel();
        ticker.cancel();
        assert!(!ticker.is_active());
        while rx.try_recv().is_ok() {}
        let after = time::timeout(Duration::from_millis(50), rx.recv()).await;
        assert!(after.is_err(), "no beats after cancel");
    }

    #[test]
    fn interval_ticker_without_runtime_stays_idle() {
        let (mut ticker, _rx) = IntervalTicker::channel();
        ticker.schedule(Duration::from_millis(10));
        assert!(!ticker.is_active());
        ticker.cancel();
    }
}
