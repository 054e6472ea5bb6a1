//! Analytics view state: the submission flow and the history it feeds.
//!
//! A submission moves `Idle -> Submitting -> ResultShown`. Every transition is published on a
//! [`tokio::sync::watch`] channel, so callers that fire a submission and move on can still wait
//! for its completion event (the move into `ResultShown`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{RwLock, watch};
use tracing::{debug, info};

use crate::{
    claim::ClaimInput,
    error::{ClaimWiseError, Result},
    history::{HistorySummary, PredictionHistory, PredictionHistoryEntry},
    prediction::{PredictionResult, PredictionService},
};

/// Simulated latency between submit and result.
pub const DEFAULT_PREDICTION_DELAY: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SubmissionState {
    Idle,
    Submitting { started_at: DateTime<Utc> },
    ResultShown { result: PredictionResult },
}

impl SubmissionState {
    pub fn is_submitting(&self) -> bool {
        matches!(self, SubmissionState::Submitting { .. })
    }
}

/// State object owned by the analytics view.
pub struct ClaimAnalyzer {
    service: Arc<dyn PredictionService>,
    delay: Duration,
    history: Arc<RwLock<PredictionHistory>>,
    state: Arc<watch::Sender<SubmissionState>>,
}

impl ClaimAnalyzer {
    pub fn new(service: Arc<dyn PredictionService>) -> Self {
        let (state, _) = watch::channel(SubmissionState::Idle);
        Self {
            service,
            delay: DEFAULT_PREDICTION_DELAY,
            history: Arc::new(RwLock::new(PredictionHistory::new())),
            state: Arc::new(state),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn state(&self) -> SubmissionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SubmissionState> {
        self.state.subscribe()
    }

    /// Run one submission to completion.
    ///
    /// The delay and prediction run on a spawned task, so dropping the returned future does not
    /// cancel them: the flow still reaches `ResultShown` (or `Idle` on failure).
    ///
    /// Fails with [`ClaimWiseError::SubmissionInProgress`] while another submission is pending.
    pub async fn submit(&self, input: ClaimInput) -> Result<PredictionResult> {
        let started_at = Utc::now();
        let accepted = self.state.send_if_modified(|state| {
            if state.is_submitting() {
                return false;
            }
            *state = SubmissionState::Submitting { started_at };
            true
        });
        if !accepted {
            return Err(ClaimWiseError::SubmissionInProgress);
        }
        debug!(delay_ms = self.delay.as_millis() as u64, "submission started");

        let flow = SubmissionFlow {
            service: self.service.clone(),
            delay: self.delay,
            history: self.history.clone(),
            state: self.state.clone(),
        };
        match tokio::spawn(flow.run(input)).await {
            Ok(result) => result,
            Err(e) => {
                self.state.send_replace(SubmissionState::Idle);
                Err(ClaimWiseError::PredictionFailed(e.to_string()))
            }
        }
    }

    /// Newest first.
    pub async fn history(&self) -> Vec<PredictionHistoryEntry> {
        self.history.read().await.entries()
    }

    pub async fn summary(&self) -> HistorySummary {
        self.history.read().await.summary()
    }
}

/// Owned half of a submission, detached from the caller.
struct SubmissionFlow {
    service: Arc<dyn PredictionService>,
    delay: Duration,
    history: Arc<RwLock<PredictionHistory>>,
    state: Arc<watch::Sender<SubmissionState>>,
}

impl SubmissionFlow {
    async fn run(self, input: ClaimInput) -> Result<PredictionResult> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let result = match self.service.predict(&input).await {
            Ok(result) => result,
            Err(e) => {
                self.state.send_replace(SubmissionState::Idle);
                return Err(e);
            }
        };

        self.history.write().await.record(result.clone(), input);
        info!(
            claim_id = %result.claim_id,
            service = %self.service.name(),
            cluster = %result.cluster,
            fraud_probability = %result.fraud_probability,
            risk_factors = result.risk_factors.len(),
            "prediction generated"
        );

        self.state.send_replace(SubmissionState::ResultShown {
            result: result.clone(),
        });
        Ok(result)
    }
}
