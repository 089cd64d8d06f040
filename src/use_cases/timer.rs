// Fixed-rate tick clock running on its own tokio task.

use std::ops::ControlFlow;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Notify;
use tokio::task::{JoinError, JoinHandle};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{error, info, warn};

const NANOS_PER_SECOND: u64 = 1_000_000_000;

#[derive(Debug, Error)]
pub enum TimerError {
    #[error("tick rate must be between 1 and 1000000000 per second, got {0}")]
    InvalidRate(u32),
    /// The timer task panicked or its runtime went away.
    #[error("timer task lost: {0}")]
    ContextLost(#[from] JoinError),
}

/// Ticks released by one accumulator step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickBatch {
    pub due: u32,
    /// Ticks owed beyond the catch-up limit, discarded.
    pub dropped: u64,
}

/// Converts wall-clock time into whole ticks, carrying the remainder forward
/// so rounding never accumulates into drift.
#[derive(Debug, Clone)]
pub struct TickAccumulator {
    interval: Duration,
    max_catch_up: u32,
    carry: Duration,
}

impl TickAccumulator {
    pub fn new(interval: Duration, max_catch_up: u32) -> Self {
        Self {
            interval: interval.max(Duration::from_nanos(1)),
            max_catch_up: max_catch_up.max(1),
            carry: Duration::ZERO,
        }
    }

    pub fn advance(&mut self, elapsed: Duration) -> TickBatch {
        let total = (self.carry + elapsed).as_nanos();
        let interval = self.interval.as_nanos();
        let whole = total / interval;
        self.carry = Duration::from_nanos((total % interval) as u64);

        let due = whole.min(u128::from(self.max_catch_up)) as u32;
        TickBatch {
            due,
            dropped: (whole - u128::from(due)) as u64,
        }
    }

    /// Time banked toward the next tick.
    pub fn carry(&self) -> Duration {
        self.carry
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Timer {
    interval: Duration,
    max_catch_up: u32,
}

impl Timer {
    /// A timer firing `rate_hz` times per second.
    pub fn new(rate_hz: u32) -> Result<Self, TimerError> {
        if rate_hz == 0 || u64::from(rate_hz) > NANOS_PER_SECOND {
            return Err(TimerError::InvalidRate(rate_hz));
        }
        Ok(Self {
            interval: Duration::from_nanos(NANOS_PER_SECOND / u64::from(rate_hz)),
            max_catch_up: 8,
        })
    }

    /// Caps how many late ticks one wake-up may replay.
    pub fn with_max_catch_up(mut self, ticks: u32) -> Self {
        self.max_catch_up = ticks.max(1);
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Spawns the tick task. `on_tick` receives the 1-based tick count and
    /// may return `Break` to stop the timer from inside.
    pub fn start<F>(&self, on_tick: F) -> TimerHandle
    where
        F: FnMut(u64) -> ControlFlow<()> + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let wake = Arc::new(Notify::new());
        let task = tokio::spawn(run(
            self.interval,
            self.max_catch_up,
            stop.clone(),
            wake.clone(),
            on_tick,
        ));
        info!(
            interval_us = self.interval.as_micros() as u64,
            max_catch_up = self.max_catch_up,
            "timer started"
        );
        TimerHandle { stop, wake, task }
    }
}

async fn run<F>(
    interval: Duration,
    max_catch_up: u32,
    stop: Arc<AtomicBool>,
    wake: Arc<Notify>,
    mut on_tick: F,
) -> u64
where
    F: FnMut(u64) -> ControlFlow<()>,
{
    // Deadlines are absolute, so a slow wake-up does not shift later ones.
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut accumulator = TickAccumulator::new(interval, max_catch_up);
    let mut last = Instant::now();
    let mut fired: u64 = 0;

    loop {
        tokio::select! {
            _ = wake.notified() => {}
            _ = ticker.tick() => {}
        }
        if stop.load(Ordering::Acquire) {
            break;
        }

        let now = Instant::now();
        let batch = accumulator.advance(now - last);
        last = now;
        if batch.dropped > 0 {
            warn!(dropped = batch.dropped, "timer fell behind; dropping ticks");
        }

        for _ in 0..batch.due {
            if stop.load(Ordering::Acquire) {
                return fired;
            }
            fired += 1;
            if on_tick(fired).is_break() {
                info!(ticks = fired, "timer stopped by callback");
                return fired;
            }
        }
    }

    info!(ticks = fired, "timer stopped");
    fired
}

/// Owner side of a running timer.
#[derive(Debug)]
pub struct TimerHandle {
    stop: Arc<AtomicBool>,
    wake: Arc<Notify>,
    task: JoinHandle<u64>,
}

impl TimerHandle {
    /// Stops the timer and waits for the task. No callback runs after this returns.
    ///
    /// Returns the number of ticks fired.
    pub async fn stop(self) -> Result<u64, TimerError> {
        self.stop.store(true, Ordering::Release);
        self.wake.notify_one();
        self.join().await
    }

    /// Waits until the callback breaks out of the loop.
    pub async fn join(self) -> Result<u64, TimerError> {
        self.task.await.map_err(|e| {
            error!(error = %e, "timer task lost");
            TimerError::ContextLost(e)
        })
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
