use thiserror::Error;

use crate::domain::Field;

/// A field name that is not part of the customer schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown customer field `{0}`")]
pub struct UnknownFieldError(pub String);

/// Raw input that could not be coerced into a field's type.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("cannot store {raw:?} in {field}: {reason}")]
pub struct CoercionError {
    pub field: Field,
    pub raw: String,
    pub reason: &'static str,
}

impl CoercionError {
    pub fn new(field: Field, raw: impl Into<String>, reason: &'static str) -> Self {
        Self {
            field,
            raw: raw.into(),
            reason,
        }
    }
}
