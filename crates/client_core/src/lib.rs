//! Client core for the churn scoring front ends: the editable customer form, the
//! prediction request lifecycle, the HTTP service binding, and the view models the
//! UIs render.

pub mod config;
pub mod controller;
pub mod form;
pub mod service;
pub mod view;

pub use config::{load_settings, resolve_settings, ClientSettings, ConfigError, SettingsOverrides};
pub use controller::{
    PendingRequest, Prediction, PredictionOutcome, RequestController, RequestState, Resolution,
};
pub use form::{FieldUpdate, FormModel};
pub use service::{
    HttpPredictionService, PredictionService, RequestFailure, GENERIC_FAILURE_MESSAGE,
};
pub use view::{form_controls, ControlKind, FieldControl, OutcomeView, SelectOption};
