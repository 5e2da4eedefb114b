use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use shared::protocol::{PredictionRequest, PredictionResponse, ServiceErrorBody};
use thiserror::Error;
use tracing::warn;

use crate::config::ClientSettings;

/// The only failure text a user ever sees.
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to fetch prediction. Check backend logs.";

/// Why a submission did not produce a prediction. Kept for operators; users get
/// [`RequestFailure::user_message`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RequestFailure {
    #[error("prediction service returned HTTP {0}")]
    Status(u16),
    #[error("prediction service unreachable: {0}")]
    Transport(String),
    #[error("prediction request timed out after {0:?}")]
    Timeout(Duration),
    #[error("malformed prediction response: {0}")]
    MalformedResponse(String),
    #[error("prediction service reported an error: {0}")]
    Service(String),
}

impl RequestFailure {
    pub fn user_message(&self) -> &'static str {
        GENERIC_FAILURE_MESSAGE
    }
}

#[async_trait]
pub trait PredictionService: Send + Sync {
    async fn predict(
        &self,
        payload: &PredictionRequest,
    ) -> Result<PredictionResponse, RequestFailure>;
}

/// `POST {base}/predict` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpPredictionService {
    http: Client,
    predict_url: String,
    timeout: Duration,
}

impl HttpPredictionService {
    pub fn new(settings: &ClientSettings) -> reqwest::Result<Self> {
        let http = Client::builder().timeout(settings.request_timeout).build()?;
        Ok(Self {
            http,
            predict_url: settings.predict_url(),
            timeout: settings.request_timeout,
        })
    }

    pub fn predict_url(&self) -> &str {
        &self.predict_url
    }

    fn transport_failure(&self, err: reqwest::Error) -> RequestFailure {
        if err.is_timeout() {
            RequestFailure::Timeout(self.timeout)
        } else {
            RequestFailure::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl PredictionService for HttpPredictionService {
    async fn predict(
        &self,
        payload: &PredictionRequest,
    ) -> Result<PredictionResponse, RequestFailure> {
        let response = self
            .http
            .post(&self.predict_url)
            .json(payload)
            .send()
            .await
            .map_err(|err| self.transport_failure(err))?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                status = status.as_u16(),
                url = %self.predict_url,
                "prediction service rejected request"
            );
            return Err(RequestFailure::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| self.transport_failure(err))?;
        decode_prediction(&body)
    }
}

/// Parses a 2xx body into a prediction.
pub fn decode_prediction(body: &[u8]) -> Result<PredictionResponse, RequestFailure> {
    match serde_json::from_slice::<PredictionResponse>(body) {
        Ok(response) if (0.0..=1.0).contains(&response.churn_probability) => Ok(response),
        Ok(response) => Err(RequestFailure::MalformedResponse(format!(
            "churn_probability {} outside [0, 1]",
            response.churn_probability
        ))),
        Err(err) => match serde_json::from_slice::<ServiceErrorBody>(body) {
            Ok(service_error) => Err(RequestFailure::Service(service_error.error)),
            Err(_) => Err(RequestFailure::MalformedResponse(err.to_string())),
        },
    }
}

#[cfg(test)]
#[path = "tests/service_tests.rs"]
mod tests;
