//! In-memory form state for one customer profile.

use std::sync::Arc;

use shared::{
    domain::{CustomerProfile, Field, RawValue},
    error::UnknownFieldError,
    protocol::PredictionRequest,
};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldUpdate {
    Applied,
    /// Input could not be coerced; the previous value was kept.
    Ignored,
}

/// Authoritative copy of the profile being edited.
///
/// Every accepted edit swaps in a freshly built profile, so an `Arc` handed out by
/// [`FormModel::snapshot`] keeps seeing the values it was taken with.
#[derive(Debug, Clone, Default)]
pub struct FormModel {
    profile: Arc<CustomerProfile>,
}

impl FormModel {
    pub fn initialize() -> Self {
        Self::default()
    }

    pub fn from_profile(profile: CustomerProfile) -> Self {
        Self {
            profile: Arc::new(profile),
        }
    }

    pub fn profile(&self) -> &CustomerProfile {
        &self.profile
    }

    pub fn snapshot(&self) -> Arc<CustomerProfile> {
        Arc::clone(&self.profile)
    }

    /// Single dispatch point for control edits, keyed by wire or attribute name.
    pub fn set_field(
        &mut self,
        name: &str,
        raw: impl Into<RawValue>,
    ) -> Result<FieldUpdate, UnknownFieldError> {
        let field = name.parse::<Field>()?;
        Ok(self.set(field, raw))
    }

    pub fn set(&mut self, field: Field, raw: impl Into<RawValue>) -> FieldUpdate {
        match self.profile.with_field(field, raw) {
            Ok(next) => {
                self.profile = Arc::new(next);
                FieldUpdate::Applied
            }
            Err(err) => {
                debug!(field = field.wire_name(), "keeping previous value: {err}");
                FieldUpdate::Ignored
            }
        }
    }

    pub fn to_request_payload(&self) -> PredictionRequest {
        self.profile.to_request_payload()
    }
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
