//! Simulated analysis progress.
//!
//! The percentage advances on a timer, independent of how long the real
//! work takes. [`ProgressSimulator`] is the lazy sequence itself;
//! [`ProgressTask`] drives it on a tokio interval and can be cancelled.

use std::time::Duration;

use rand::Rng;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, trace};

pub const STEP_LABELS: [&str; 6] = [
    "Extracting text from document...",
    "Analyzing document structure...",
    "Evaluating section completeness...",
    "Assessing quality metrics...",
    "Predicting project risks...",
    "Finalizing analysis...",
];

/// Smallest and (exclusive) largest increment per tick.
const STEP_MIN: u8 = 5;
const STEP_MAX: u8 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub percentage: u8,
    pub step_index: usize,
    pub step_label: &'static str,
}

impl ProgressUpdate {
    fn at(percentage: u8) -> Self {
        let step_index = step_index(percentage, STEP_LABELS.len());
        Self {
            percentage,
            step_index,
            step_label: STEP_LABELS[step_index],
        }
    }
}

/// `floor(percentage / 100 * steps)`, held at the last step once complete.
pub fn step_index(percentage: u8, steps: usize) -> usize {
    let index = usize::from(percentage.min(100)) * steps / 100;
    index.min(steps.saturating_sub(1))
}

/// Finite, non-restartable sequence of progress updates.
///
/// Each call to `next` is one tick. The last item always has
/// `percentage == 100`; after it the iterator is exhausted for good.
pub struct ProgressSimulator<R> {
    rng: R,
    percentage: u8,
    finished: bool,
}

impl<R: Rng> ProgressSimulator<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            percentage: 0,
            finished: false,
        }
    }

    /// The state before the first tick.
    pub fn initial(&self) -> ProgressUpdate {
        ProgressUpdate::at(0)
    }
}

impl<R: Rng> Iterator for ProgressSimulator<R> {
    type Item = ProgressUpdate;

    fn next(&mut self) -> Option<ProgressUpdate> {
        if self.finished {
            return None;
        }
        let increment = self.rng.gen_range(STEP_MIN..STEP_MAX);
        self.percentage = self.percentage.saturating_add(increment).min(100);
        if self.percentage == 100 {
            self.finished = true;
        }
        Some(ProgressUpdate::at(self.percentage))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressTiming {
    /// Interval between ticks
    pub tick: Duration,
    /// Pause between reaching 100% and signalling completion
    pub settle: Duration,
}

impl Default for ProgressTiming {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(200),
            settle: Duration::from_millis(800),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressOutcome {
    /// Reached 100% and waited out the settle delay
    Completed,
    /// Stopped before completion
    Cancelled,
}

/// A running progress loop. Updates are pushed into the channel given to
/// [`ProgressTask::spawn`]; nothing is sent once the task is cancelled.
pub struct ProgressTask {
    handle: JoinHandle<ProgressOutcome>,
}

impl ProgressTask {
    pub fn spawn<R>(
        simulator: ProgressSimulator<R>,
        timing: ProgressTiming,
        updates: UnboundedSender<ProgressUpdate>,
    ) -> Self
    where
        R: Rng + Send + 'static,
    {
        Self {
            handle: tokio::spawn(drive(simulator, timing, updates)),
        }
    }

    /// Wait for the loop to end on its own.
    ///
    /// Must not be polled again once it has returned.
    pub async fn wait(&mut self) -> ProgressOutcome {
        match (&mut self.handle).await {
            Ok(outcome) => outcome,
            Err(_) => ProgressOutcome::Cancelled,
        }
    }

    /// Stop ticking. Returns `Completed` if the loop had already finished.
    pub async fn cancel(self) -> ProgressOutcome {
        self.handle.abort();
        let outcome = match self.handle.await {
            Ok(outcome) => outcome,
            Err(_) => ProgressOutcome::Cancelled,
        };
        debug!(?outcome, "progress task stopped");
        outcome
    }
}

async fn drive<R: Rng>(
    simulator: ProgressSimulator<R>,
    timing: ProgressTiming,
    updates: UnboundedSender<ProgressUpdate>,
) -> ProgressOutcome {
    let mut ticker = tokio::time::interval(timing.tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // first tick fires immediately
    ticker.tick().await;

    if updates.send(simulator.initial()).is_err() {
        return ProgressOutcome::Cancelled;
    }

    for update in simulator {
        ticker.tick().await;
        trace!(percentage = update.percentage, step = update.step_label, "progress tick");
        if updates.send(update).is_err() {
            // nobody is listening any more
            return ProgressOutcome::Cancelled;
        }
    }

    tokio::time::sleep(timing.settle).await;
    ProgressOutcome::Completed
}
