//! Simulated upload progress
//!
//! The upload call reports no progress of its own, so a periodic tick moves
//! a synthetic percentage forward while it is in flight:
//!
//! ```text
//! Idle -> Uploading -> Completing -> Idle
//!             |                       ^
//!             +------- failure -------+
//! ```
//!
//! The tick task belongs to an [`UploadRun`] and is cancelled whenever the
//! run ends, including when the run is dropped mid-flight.

use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::config::UploadConfig;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum UploadPhase {
    #[default]
    Idle,
    Uploading,
    Completing,
}

/// Snapshot of the upload indicator
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadState {
    pub phase: UploadPhase,
    /// Synthetic progress, 0..=100. Not a measure of bytes transferred.
    pub progress: u8,
    /// Name of the file being uploaded; cleared when the run ends so the
    /// same file can be selected again.
    pub file_name: Option<String>,
}

impl UploadState {
    pub fn busy(&self) -> bool {
        self.phase != UploadPhase::Idle
    }
}

pub struct UploadSimulator {
    config: UploadConfig,
    state: Arc<Mutex<UploadState>>,
}

impl UploadSimulator {
    /// Out-of-range timings are clamped rather than rejected: the tick
    /// interval is at least 1ms, the increment at least 1 and the cap at
    /// most 99 so that only a successful upload reaches 100%.
    pub fn new(config: UploadConfig) -> Self {
        let config = clamp_config(config);
        Self {
            config,
            state: Arc::new(Mutex::new(UploadState::default())),
        }
    }

    pub fn snapshot(&self) -> UploadState {
        lock(&self.state).clone()
    }

    /// Move from `Idle` to `Uploading` and start ticking.
    ///
    /// Returns `None` if an upload is already running.
    pub fn begin(&self, file_name: &str) -> Option<UploadRun<'_>> {
        {
            let mut state = lock(&self.state);
            if state.busy() {
                return None;
            }
            *state = UploadState {
                phase: UploadPhase::Uploading,
                progress: 0,
                file_name: Some(file_name.to_string()),
            };
        }
        debug!(file = file_name, "Upload started");

        Some(UploadRun {
            simulator: self,
            ticker: Some(self.spawn_ticker()),
            finished: false,
        })
    }

    fn spawn_ticker(&self) -> TickHandle {
        let token = CancellationToken::new();
        let cancelled = token.clone();
        let state = Arc::clone(&self.state);
        let period = self.config.tick_interval();
        let increment = self.config.tick_increment;
        let cap = self.config.progress_cap;

        let handle = tokio::spawn(async move {
            let mut ticks = interval_at(Instant::now() + period, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = cancelled.cancelled() => break,
                    _ = ticks.tick() => advance(&state, increment, cap),
                }
            }
        });

        TickHandle {
            token,
            handle: Some(handle),
        }
    }

    fn reset(&self) {
        *lock(&self.state) = UploadState::default();
    }
}

fn clamp_config(mut config: UploadConfig) -> UploadConfig {
    if let Err(e) = config.validate() {
        warn!("Clamping upload timings: {}", e);
    }
    config.tick_interval_ms = config.tick_interval_ms.max(1);
    config.tick_increment = config.tick_increment.max(1);
    config.progress_cap = config.progress_cap.min(99);
    config
}

/// One tick: move forward by `increment`, never past `cap`, and only while
/// still uploading. A tick that lands after the run ended is a no-op.
fn advance(state: &Mutex<UploadState>, increment: u8, cap: u8) {
    let mut state = lock(state);
    if state.phase != UploadPhase::Uploading || state.progress >= cap {
        return;
    }
    state.progress = state.progress.saturating_add(increment).min(cap);
    trace!(progress = state.progress, "Upload progress tick");
}

fn lock(state: &Mutex<UploadState>) -> MutexGuard<'_, UploadState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Cancels the tick task when dropped
struct TickHandle {
    token: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl Drop for TickHandle {
    fn drop(&mut self) {
        self.token.cancel();
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// An upload in the `Uploading` phase
pub struct UploadRun<'a> {
    simulator: &'a UploadSimulator,
    ticker: Option<TickHandle>,
    finished: bool,
}

impl<'a> UploadRun<'a> {
    /// The upload call succeeded: stop ticking and show 100%.
    pub fn succeed(mut self) -> Completion<'a> {
        self.ticker.take();
        self.finished = true;
        {
            let mut state = lock(&self.simulator.state);
            state.phase = UploadPhase::Completing;
            state.progress = 100;
        }
        debug!("Upload completed");
        Completion {
            simulator: self.simulator,
            done: false,
        }
    }

    /// The upload call failed: stop ticking and go straight back to idle.
    pub fn fail(mut self) {
        self.ticker.take();
        self.finished = true;
        self.simulator.reset();
        debug!("Upload aborted");
    }
}

impl Drop for UploadRun<'_> {
    fn drop(&mut self) {
        self.ticker.take();
        if !self.finished {
            // Dropped mid-flight, e.g. the caller's future was cancelled.
            self.simulator.reset();
        }
    }
}

/// An upload in the `Completing` phase, holding 100% until [`finish`](Self::finish).
pub struct Completion<'a> {
    simulator: &'a UploadSimulator,
    done: bool,
}

impl Completion<'_> {
    /// Keep 100% visible for the configured delay, then return to idle.
    pub async fn finish(mut self) {
        tokio::time::sleep(self.simulator.config.completion_delay()).await;
        self.simulator.reset();
        self.done = true;
    }
}

impl Drop for Completion<'_> {
    fn drop(&mut self) {
        if !self.done {
            self.simulator.reset();
        }
    }
}
