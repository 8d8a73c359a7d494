//! Periodic tasks
//!
//! A ticker runs a callback on a fixed period until its handle is cancelled
//! or dropped. The first tick fires one period after spawning.

use std::sync::Arc;
use std::time::Duration;

use timesheet_util::{Clock, format_clock_time};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;

use crate::TimesheetStore;

/// Cancellation handle for a running ticker. Dropping it stops the ticker.
#[derive(Debug)]
pub struct TickerHandle {
    name: &'static str,
    shutdown: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl TickerHandle {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Stop the ticker; no callback runs after the current one returns
    pub fn cancel(&self) {
        let _ = self.shutdown.send(true);
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Cancel and wait for the task to exit
    pub async fn stop(mut self) {
        self.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for TickerHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

pub struct Ticker;

impl Ticker {
    /// Spawn `on_tick` every `period` on the current tokio runtime
    pub fn spawn<F>(name: &'static str, period: Duration, mut on_tick: F) -> TickerHandle
    where
        F: FnMut() + Send + 'static,
    {
        let (shutdown, mut shutdown_rx) = watch::channel(false);

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = interval.tick() => on_tick(),
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            debug!(ticker = name, "Ticker shutting down");
                            break;
                        }
                    }
                }
            }
        });

        debug!(ticker = name, period_ms = period.as_millis() as u64, "Ticker started");

        TickerHandle {
            name,
            shutdown,
            task: Some(task),
        }
    }
}

/// Re-derive the store's current class every `period`
pub fn spawn_current_class_refresh(
    store: Arc<TimesheetStore>,
    period: Duration,
) -> TickerHandle {
    Ticker::spawn("current-class", period, move || {
        store.refresh_current_class();
    })
}

/// Publish the formatted wall-clock time every `period`
pub fn spawn_clock(
    clock: Arc<dyn Clock>,
    period: Duration,
) -> (TickerHandle, watch::Receiver<String>) {
    let (tx, rx) = watch::channel(format_clock_time(&clock.now()));

    let handle = Ticker::spawn("clock", period, move || {
        let formatted = format_clock_time(&clock.now());
        tx.send_if_modified(|current| {
            if *current == formatted {
                return false;
            }
            *current = formatted;
            true
        });
    });

    (handle, rx)
}
