//! Backend commands queued from UI to backend worker.

use shared::protocol::PredictionRequest;

pub enum BackendCommand {
    Predict {
        seq: u64,
        payload: PredictionRequest,
    },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::Predict { .. } => "predict",
        }
    }

    pub fn seq(&self) -> u64 {
        match self {
            BackendCommand::Predict { seq, .. } => *seq,
        }
    }
}
