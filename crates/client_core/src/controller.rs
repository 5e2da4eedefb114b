//! Lifecycle of prediction submissions: idle -> pending -> succeeded | failed.
//!
//! Submissions are sequence-numbered. Only the response carrying the most recent
//! sequence number is ever applied; anything older is dropped on arrival, which is
//! how a superseded request gets "cancelled" without touching the transport.

use shared::{
    domain::CustomerProfile,
    protocol::{PredictionRequest, PredictionResponse},
};
use tracing::{debug, info, warn};

use crate::service::{PredictionService, RequestFailure};

#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub churn_probability: f64,
    pub label: String,
}

impl From<PredictionResponse> for Prediction {
    fn from(value: PredictionResponse) -> Self {
        Self {
            churn_probability: value.churn_probability,
            label: value.prediction,
        }
    }
}

/// Result of one finished submission, as shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictionOutcome {
    Success(Prediction),
    Failure { error_message: String },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Pending {
        seq: u64,
    },
    Succeeded(Prediction),
    Failed(RequestFailure),
}

/// A submission that has been started but not yet sent.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRequest {
    pub seq: u64,
    pub payload: PredictionRequest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Applied,
    Discarded,
}

#[derive(Debug, Default)]
pub struct RequestController {
    latest_seq: u64,
    state: RequestState,
}

impl RequestController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    pub fn latest_seq(&self) -> u64 {
        self.latest_seq
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, RequestState::Pending { .. })
    }

    pub fn outcome(&self) -> Option<PredictionOutcome> {
        match &self.state {
            RequestState::Succeeded(prediction) => {
                Some(PredictionOutcome::Success(prediction.clone()))
            }
            RequestState::Failed(failure) => Some(PredictionOutcome::Failure {
                error_message: failure.user_message().to_string(),
            }),
            RequestState::Idle | RequestState::Pending { .. } => None,
        }
    }

    /// Starts a submission: bumps the sequence number and drops any previous outcome
    /// before the caller performs I/O. The payload is built from `snapshot` right here,
    /// so later form edits cannot leak into it.
    pub fn begin(&mut self, snapshot: &CustomerProfile) -> PendingRequest {
        self.latest_seq += 1;
        let seq = self.latest_seq;
        self.state = RequestState::Pending { seq };
        info!(seq, "submitting customer profile for scoring");
        PendingRequest {
            seq,
            payload: snapshot.to_request_payload(),
        }
    }

    /// Applies the result of submission `seq` if it is still the latest one.
    pub fn resolve(
        &mut self,
        seq: u64,
        result: Result<PredictionResponse, RequestFailure>,
    ) -> Resolution {
        let awaiting = matches!(self.state, RequestState::Pending { seq: pending } if pending == seq);
        if seq != self.latest_seq || !awaiting {
            debug!(seq, latest = self.latest_seq, "discarding superseded prediction response");
            return Resolution::Discarded;
        }

        self.state = match result {
            Ok(response) => {
                info!(
                    seq,
                    churn_probability = response.churn_probability,
                    label = %response.prediction,
                    "prediction received"
                );
                RequestState::Succeeded(response.into())
            }
            Err(failure) => {
                warn!(seq, "prediction request failed: {failure}");
                RequestState::Failed(failure)
            }
        };
        Resolution::Applied
    }

    /// Runs one submission to completion against `service`.
    pub async fn submit<S>(&mut self, service: &S, snapshot: &CustomerProfile) -> &RequestState
    where
        S: PredictionService + ?Sized,
    {
        let pending = self.begin(snapshot);
        let result = service.predict(&pending.payload).await;
        self.resolve(pending.seq, result);
        &self.state
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
