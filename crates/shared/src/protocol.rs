use serde::{Deserialize, Serialize};

/// Body of `POST {base}/predict`.
///
/// Keys serialize to the names the prediction service validates against, so most
/// members follow PascalCase with a few historical exceptions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PredictionRequest {
    #[serde(rename = "gender")]
    pub gender: String,
    pub senior_citizen: u8,
    pub partner: String,
    pub dependents: String,
    #[serde(rename = "tenure")]
    pub tenure: u32,
    pub phone_service: String,
    pub multiple_lines: String,
    pub internet_service: String,
    pub online_security: String,
    pub online_backup: String,
    pub device_protection: String,
    pub tech_support: String,
    #[serde(rename = "StreamingTV")]
    pub streaming_tv: String,
    pub streaming_movies: String,
    pub contract: String,
    pub paperless_billing: String,
    pub payment_method: String,
    pub monthly_charges: f64,
    pub total_charges: f64,
}

/// Successful scoring result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub churn_probability: f64,
    pub prediction: String,
}

/// Shape the service uses when scoring blows up internally; it is sent with a 2xx status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceErrorBody {
    pub error: String,
}
