//! Events flowing from the backend worker into the UI loop.

use client_core::RequestFailure;
use shared::protocol::PredictionResponse;

pub enum UiEvent {
    BackendReady,
    BackendFailed(String),
    PredictionFinished {
        seq: u64,
        result: Result<PredictionResponse, RequestFailure>,
    },
}
