//! Presentation-ready view models: what each input control shows and how the
//! current request state is rendered. Front ends draw these verbatim.

use shared::domain::{CustomerProfile, Field, FieldKind, FIELD_SCHEMA};

use crate::controller::RequestState;

const FLAG_OPTIONS: &[SelectOption] = &[
    SelectOption {
        value: "0",
        label: "No",
    },
    SelectOption {
        value: "1",
        label: "Yes",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectOption {
    /// Raw value handed to `FormModel::set_field` when picked.
    pub value: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ControlKind {
    Select { options: Vec<SelectOption> },
    Number { step: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldControl {
    pub field: Field,
    pub label: &'static str,
    pub value: String,
    pub kind: ControlKind,
}

impl FieldControl {
    /// Label of the option matching the current value, falling back to the raw value.
    pub fn selected_label(&self) -> &str {
        match &self.kind {
            ControlKind::Select { options } => options
                .iter()
                .find(|option| option.value == self.value)
                .map_or(self.value.as_str(), |option| option.label),
            ControlKind::Number { .. } => &self.value,
        }
    }
}

/// One control per schema field, in schema order.
pub fn form_controls(profile: &CustomerProfile) -> Vec<FieldControl> {
    FIELD_SCHEMA
        .iter()
        .map(|spec| FieldControl {
            field: spec.field,
            label: spec.field.label(),
            value: profile.display_value(spec.field),
            kind: control_kind(spec.kind),
        })
        .collect()
}

fn control_kind(kind: FieldKind) -> ControlKind {
    match kind {
        FieldKind::Choice(options) => ControlKind::Select {
            options: options
                .iter()
                .map(|&option| SelectOption {
                    value: option,
                    label: option,
                })
                .collect(),
        },
        FieldKind::Flag => ControlKind::Select {
            options: FLAG_OPTIONS.to_vec(),
        },
        FieldKind::Count => ControlKind::Number { step: 1.0 },
        FieldKind::Amount => ControlKind::Number { step: 0.01 },
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeView {
    Empty,
    Loading,
    Result {
        probability_line: String,
        prediction_line: String,
    },
    Error {
        message: String,
    },
}

impl OutcomeView {
    pub fn from_state(state: &RequestState) -> Self {
        match state {
            RequestState::Idle => OutcomeView::Empty,
            RequestState::Pending { .. } => OutcomeView::Loading,
            RequestState::Succeeded(prediction) => OutcomeView::Result {
                probability_line: format!(
                    "Churn Probability: {}",
                    format_probability(prediction.churn_probability)
                ),
                prediction_line: format!("Prediction: {}", prediction.label),
            },
            RequestState::Failed(failure) => OutcomeView::Error {
                message: failure.user_message().to_string(),
            },
        }
    }
}

/// `0.81` -> `"81.00%"`.
pub fn format_probability(probability: f64) -> String {
    format!("{:.2}%", probability * 100.0)
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
