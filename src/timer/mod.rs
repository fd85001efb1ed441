//! Elapsed recording time
//!
//! `ElapsedTimer` counts whole seconds with a single owned tick task. Every
//! transition aborts that task and bumps an epoch under the counter lock, so
//! a tick scheduled before a pause or stop can never land afterwards.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task::JoinHandle;
use tokio::time::{self, Duration, Instant, MissedTickBehavior};
use tracing::debug;

/// Cadence of the elapsed-time clock
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Snapshot of the timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub elapsed_seconds: u64,
    pub running: bool,
}

#[derive(Debug, Default)]
struct Counter {
    epoch: u64,
    elapsed: u64,
}

/// Cooperative one-second clock driven by a tokio task
///
/// Must be used from within a tokio runtime.
pub struct ElapsedTimer {
    counter: Arc<Mutex<Counter>>,
    ticker: Option<JoinHandle<()>>,
}

impl ElapsedTimer {
    pub fn new() -> Self {
        Self {
            counter: Arc::new(Mutex::new(Counter::default())),
            ticker: None,
        }
    }

    /// Reset to zero and start ticking
    pub fn start(&mut self) {
        self.halt();
        self.counter().elapsed = 0;
        self.spawn_ticker();
    }

    /// Stop ticking, keeping the count
    pub fn pause(&mut self) {
        if !self.is_running() {
            debug!("Timer pause ignored: not running");
            return;
        }
        self.halt();
    }

    /// Continue ticking from the current count
    pub fn resume(&mut self) {
        if self.is_running() {
            debug!("Timer resume ignored: already running");
            return;
        }
        self.spawn_ticker();
    }

    /// Stop ticking and reset to zero
    pub fn stop(&mut self) {
        self.halt();
        self.counter().elapsed = 0;
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.counter().elapsed
    }

    pub fn is_running(&self) -> bool {
        self.ticker.is_some()
    }

    pub fn state(&self) -> TimerState {
        TimerState {
            elapsed_seconds: self.elapsed_seconds(),
            running: self.is_running(),
        }
    }

    fn counter(&self) -> MutexGuard<'_, Counter> {
        self.counter.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn halt(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
        self.counter().epoch += 1;
    }

    fn spawn_ticker(&mut self) {
        let epoch = self.counter().epoch;
        let counter = Arc::clone(&self.counter);

        self.ticker = Some(tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + TICK_INTERVAL, TICK_INTERVAL);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;

                let mut guard = counter.lock().unwrap_or_else(PoisonError::into_inner);
                if guard.epoch != epoch {
                    break;
                }
                guard.elapsed += 1;
                debug!("Tick: {}s", guard.elapsed);
            }
        }));
    }
}

impl Default for ElapsedTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ElapsedTimer {
    fn drop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }
}
