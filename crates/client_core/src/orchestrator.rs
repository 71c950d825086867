//! Request orchestration for the two dashboard operations.
//!
//! Dashboard state lives in one watch channel and every transition is a single
//! `send_modify`, so observers never see a half-applied update. Each trigger
//! bumps the operation's generation; a completion whose generation is no
//! longer current is dropped instead of overwriting newer state.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use shared::domain::{InsightRecord, Operation, Tab};
use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, info, warn};

use crate::{
    error::OperationError,
    progress::{ProgressConfig, ProgressFrame, ProgressSimulator},
    transport::InsightsApi,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    InFlight,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OperationState<T> {
    phase: Phase,
    result: Option<T>,
    error: Option<OperationError>,
    // Input rejected before any request; leaves the last outcome in place.
    rejection: Option<OperationError>,
    generation: u64,
    target_url: Option<String>,
    completed_at: Option<DateTime<Utc>>,
}

impl<T> Default for OperationState<T> {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            result: None,
            error: None,
            rejection: None,
            generation: 0,
            target_url: None,
            completed_at: None,
        }
    }
}

impl<T> OperationState<T> {
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn result(&self) -> Option<&T> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&OperationError> {
        self.error.as_ref()
    }

    /// Validation failure of the latest trigger attempt, cleared by the next
    /// accepted trigger.
    pub fn rejection(&self) -> Option<&OperationError> {
        self.rejection.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn target_url(&self) -> Option<&str> {
        self.target_url.as_deref()
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn is_in_flight(&self) -> bool {
        self.phase == Phase::InFlight
    }

    pub fn is_succeeded(&self) -> bool {
        self.phase == Phase::Succeeded
    }

    pub(crate) fn begin(&mut self, url: &str) -> u64 {
        self.generation += 1;
        self.phase = Phase::InFlight;
        self.result = None;
        self.error = None;
        self.rejection = None;
        self.target_url = Some(url.to_string());
        self.generation
    }

    pub(crate) fn reject(&mut self, error: OperationError) {
        self.rejection = Some(error);
    }

    pub(crate) fn resolve(&mut self, generation: u64, outcome: Result<T, OperationError>) -> bool {
        if generation != self.generation || self.phase != Phase::InFlight {
            return false;
        }
        match outcome {
            Ok(value) => {
                self.phase = Phase::Succeeded;
                self.result = Some(value);
            }
            Err(error) => {
                self.phase = Phase::Failed;
                self.error = Some(error);
            }
        }
        self.completed_at = Some(Utc::now());
        true
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    pub analysis: OperationState<InsightRecord>,
    pub competitors: OperationState<Vec<InsightRecord>>,
    pub active_tab: Tab,
}

impl DashboardState {
    pub fn phase(&self, operation: Operation) -> Phase {
        match operation {
            Operation::Analysis => self.analysis.phase(),
            Operation::Competitors => self.competitors.phase(),
        }
    }

    /// The message shown next to `operation`'s control: a rejected trigger
    /// takes precedence over the last request failure.
    pub fn error(&self, operation: Operation) -> Option<&OperationError> {
        match operation {
            Operation::Analysis => self.analysis.rejection().or(self.analysis.error()),
            Operation::Competitors => self.competitors.rejection().or(self.competitors.error()),
        }
    }

    pub fn any_in_flight(&self) -> bool {
        self.analysis.is_in_flight() || self.competitors.is_in_flight()
    }
}

/// Point-in-time view of everything the dashboard renders.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSnapshot {
    pub state: DashboardState,
    pub analysis_progress: ProgressFrame,
    pub competitors_progress: ProgressFrame,
}

impl DashboardSnapshot {
    /// Overlay progress: the furthest of the per-operation simulators.
    pub fn progress(&self) -> u8 {
        self.analysis_progress
            .value
            .max(self.competitors_progress.value)
    }

    /// True while an operation is in flight or a completed one still holds
    /// its 100 frame.
    pub fn progress_active(&self) -> bool {
        self.state.any_in_flight()
            || self.analysis_progress.is_active()
            || self.competitors_progress.is_active()
    }
}

pub struct Orchestrator {
    api: Arc<dyn InsightsApi>,
    state: watch::Sender<DashboardState>,
    analysis_progress: ProgressSimulator,
    competitors_progress: ProgressSimulator,
    // Serializes state transitions with their progress side effects.
    transitions: Mutex<()>,
}

impl Orchestrator {
    pub fn new(api: Arc<dyn InsightsApi>, progress: ProgressConfig) -> Arc<Self> {
        let (state, _) = watch::channel(DashboardState::default());
        Arc::new(Self {
            api,
            state,
            analysis_progress: ProgressSimulator::new(progress),
            competitors_progress: ProgressSimulator::new(progress),
            transitions: Mutex::new(()),
        })
    }

    pub fn api(&self) -> &Arc<dyn InsightsApi> {
        &self.api
    }

    pub fn state(&self) -> DashboardState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.state.subscribe()
    }

    pub fn progress_frames(&self, operation: Operation) -> watch::Receiver<ProgressFrame> {
        self.simulator(operation).subscribe()
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        let _guard = self.lock_transitions();
        DashboardSnapshot {
            state: self.state.borrow().clone(),
            analysis_progress: self.analysis_progress.frame(),
            competitors_progress: self.competitors_progress.frame(),
        }
    }

    pub fn progress(&self) -> u8 {
        self.snapshot().progress()
    }

    pub fn select_tab(&self, tab: Tab) {
        self.state.send_if_modified(|state| {
            if state.active_tab == tab {
                return false;
            }
            state.active_tab = tab;
            true
        });
    }

    /// Moves the analysis to `InFlight` before returning and spawns the
    /// request. Must be called from within a tokio runtime.
    pub fn trigger_analysis(self: &Arc<Self>, url: &str) -> Result<JoinHandle<()>, OperationError> {
        let (url, generation) = self.begin(Operation::Analysis, url)?;
        let this = Arc::clone(self);
        Ok(tokio::spawn(async move {
            let outcome = this.api.fetch_insights(&url).await;
            this.finish_analysis(generation, outcome);
        }))
    }

    /// Same lifecycle as [`Orchestrator::trigger_analysis`]; a success also
    /// switches the dashboard to the competitors tab.
    pub fn trigger_competitors(
        self: &Arc<Self>,
        url: &str,
    ) -> Result<JoinHandle<()>, OperationError> {
        let (url, generation) = self.begin(Operation::Competitors, url)?;
        let this = Arc::clone(self);
        Ok(tokio::spawn(async move {
            let outcome = this
                .api
                .fetch_competitors(&url)
                .await
                .map(|response| response.competitors);
            this.finish_competitors(generation, outcome);
        }))
    }

    pub fn trigger(
        self: &Arc<Self>,
        operation: Operation,
        url: &str,
    ) -> Result<JoinHandle<()>, OperationError> {
        match operation {
            Operation::Analysis => self.trigger_analysis(url),
            Operation::Competitors => self.trigger_competitors(url),
        }
    }

    fn begin(&self, operation: Operation, url: &str) -> Result<(String, u64), OperationError> {
        let _guard = self.lock_transitions();
        let url = url.trim();

        if url.is_empty() {
            let error = OperationError::missing_url(operation);
            self.state.send_modify(|state| match operation {
                Operation::Analysis => state.analysis.reject(error.clone()),
                Operation::Competitors => state.competitors.reject(error.clone()),
            });
            warn!(operation = operation.as_str(), "rejected trigger without a store url");
            return Err(error);
        }

        let mut generation = 0;
        self.state.send_modify(|state| {
            generation = match operation {
                Operation::Analysis => state.analysis.begin(url),
                Operation::Competitors => state.competitors.begin(url),
            };
        });
        self.simulator(operation).start();
        info!(operation = operation.as_str(), generation, url, "operation started");
        Ok((url.to_string(), generation))
    }

    fn finish_analysis(&self, generation: u64, outcome: Result<InsightRecord, OperationError>) {
        let _guard = self.lock_transitions();
        let succeeded = outcome.is_ok();
        let applied = self
            .state
            .send_if_modified(|state| state.analysis.resolve(generation, outcome));
        self.settle(Operation::Analysis, generation, applied, succeeded);
    }

    fn finish_competitors(
        &self,
        generation: u64,
        outcome: Result<Vec<InsightRecord>, OperationError>,
    ) {
        let _guard = self.lock_transitions();
        let succeeded = outcome.is_ok();
        let applied = self.state.send_if_modified(|state| {
            let applied = state.competitors.resolve(generation, outcome);
            if applied && succeeded {
                state.active_tab = Tab::Competitors;
            }
            applied
        });
        self.settle(Operation::Competitors, generation, applied, succeeded);
    }

    fn settle(&self, operation: Operation, generation: u64, applied: bool, succeeded: bool) {
        if !applied {
            debug!(
                operation = operation.as_str(),
                generation, "discarding completion of superseded request"
            );
            return;
        }

        let simulator = self.simulator(operation);
        if succeeded {
            simulator.complete_and_release(simulator.config().completion_hold);
            info!(operation = operation.as_str(), generation, "operation succeeded");
        } else {
            simulator.reset();
            let state = self.state.borrow();
            let failure = match operation {
                Operation::Analysis => state.analysis.error(),
                Operation::Competitors => state.competitors.error(),
            };
            let message = failure.map(ToString::to_string).unwrap_or_default();
            warn!(operation = operation.as_str(), generation, error = %message, "operation failed");
        }
    }

    fn simulator(&self, operation: Operation) -> &ProgressSimulator {
        match operation {
            Operation::Analysis => &self.analysis_progress,
            Operation::Competitors => &self.competitors_progress,
        }
    }

    fn lock_transitions(&self) -> std::sync::MutexGuard<'_, ()> {
        self.transitions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[path = "tests/orchestrator_tests.rs"]
mod tests;
