//! Simulated progress for operations whose real completion fraction is unknown.
//!
//! A simulator climbs by `step` every `period` up to `ceiling` and only reaches
//! 100 when told the real work completed. Every transition goes through the
//! simulator's watch channel and bumps an epoch, so a tick scheduled before
//! `complete()`/`reset()` can never be applied after it.

use std::{
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use tracing::trace;

pub const COMPLETE: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressConfig {
    pub step: u8,
    pub period: Duration,
    pub ceiling: u8,
    /// How long a completed simulator keeps showing 100 before resetting.
    pub completion_hold: Duration,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            step: 10,
            period: Duration::from_millis(500),
            ceiling: 90,
            completion_hold: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProgressPhase {
    #[default]
    Idle,
    Running,
    Completed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressFrame {
    pub value: u8,
    pub phase: ProgressPhase,
    epoch: u64,
}

impl ProgressFrame {
    pub fn new(value: u8, phase: ProgressPhase) -> Self {
        Self {
            value,
            phase,
            epoch: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.phase != ProgressPhase::Idle
    }
}

pub struct ProgressSimulator {
    config: ProgressConfig,
    frames: Arc<watch::Sender<ProgressFrame>>,
    ticker: Mutex<Option<JoinHandle<()>>>,
}

impl ProgressSimulator {
    pub fn new(config: ProgressConfig) -> Self {
        let (frames, _) = watch::channel(ProgressFrame::default());
        Self {
            config,
            frames: Arc::new(frames),
            ticker: Mutex::new(None),
        }
    }

    pub fn config(&self) -> ProgressConfig {
        self.config
    }

    pub fn frame(&self) -> ProgressFrame {
        *self.frames.borrow()
    }

    pub fn value(&self) -> u8 {
        self.frames.borrow().value
    }

    pub fn is_running(&self) -> bool {
        self.frames.borrow().phase == ProgressPhase::Running
    }

    pub fn subscribe(&self) -> watch::Receiver<ProgressFrame> {
        self.frames.subscribe()
    }

    /// Starts ticking from 0. A simulator that is already running keeps its
    /// current value and ticker. Must be called from within a tokio runtime.
    pub fn start(&self) {
        let mut ticker = self.lock_ticker();
        let mut epoch = 0;
        let started = self.frames.send_if_modified(|frame| {
            if frame.phase == ProgressPhase::Running {
                return false;
            }
            frame.epoch += 1;
            frame.value = 0;
            frame.phase = ProgressPhase::Running;
            epoch = frame.epoch;
            true
        });
        if !started {
            trace!("progress simulator already running");
            return;
        }

        if let Some(previous) = ticker.take() {
            previous.abort();
        }
        // First increment is due one period after start, not after the task is polled.
        let first_tick = Instant::now() + self.config.period;
        *ticker = Some(tokio::spawn(run_ticker(
            Arc::clone(&self.frames),
            self.config,
            epoch,
            first_tick,
        )));
    }

    /// Jumps to 100 and cancels pending increments.
    pub fn complete(&self) {
        self.finish();
    }

    /// Jumps to 100, then returns to 0 after `hold` unless the simulator was
    /// restarted or reset in the meantime.
    pub fn complete_and_release(&self, hold: Duration) {
        let epoch = self.finish();
        let frames = Arc::clone(&self.frames);
        tokio::spawn(async move {
            time::sleep(hold).await;
            frames.send_if_modified(|frame| {
                if frame.epoch != epoch {
                    return false;
                }
                frame.epoch += 1;
                frame.value = 0;
                frame.phase = ProgressPhase::Idle;
                true
            });
        });
    }

    /// Cancels pending increments and returns to 0.
    pub fn reset(&self) {
        self.cancel_ticker();
        self.frames.send_if_modified(|frame| {
            let changed = frame.value != 0 || frame.phase != ProgressPhase::Idle;
            frame.epoch += 1;
            frame.value = 0;
            frame.phase = ProgressPhase::Idle;
            changed
        });
    }

    pub fn stop(&self) {
        self.reset();
    }

    fn finish(&self) -> u64 {
        self.cancel_ticker();
        let mut epoch = 0;
        self.frames.send_modify(|frame| {
            frame.epoch += 1;
            frame.value = COMPLETE;
            frame.phase = ProgressPhase::Completed;
            epoch = frame.epoch;
        });
        epoch
    }

    fn cancel_ticker(&self) {
        if let Some(handle) = self.lock_ticker().take() {
            handle.abort();
        }
    }

    fn lock_ticker(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        self.ticker.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for ProgressSimulator {
    fn drop(&mut self) {
        self.cancel_ticker();
    }
}

async fn run_ticker(
    frames: Arc<watch::Sender<ProgressFrame>>,
    config: ProgressConfig,
    epoch: u64,
    first_tick: Instant,
) {
    let mut interval = time::interval_at(first_tick, config.period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        let mut done = false;
        frames.send_if_modified(|frame| {
            if frame.epoch != epoch || frame.phase != ProgressPhase::Running {
                done = true;
                return false;
            }
            let next = frame.value.saturating_add(config.step).min(config.ceiling);
            done = next >= config.ceiling;
            if next == frame.value {
                return false;
            }
            frame.value = next;
            true
        });

        if done {
            trace!(epoch, "progress ticker finished");
            break;
        }
    }
}

#[cfg(test)]
#[path = "tests/progress_tests.rs"]
mod tests;
