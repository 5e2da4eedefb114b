use std::{fmt, str::FromStr};

use crate::{
    error::{CoercionError, UnknownFieldError},
    protocol::PredictionRequest,
};

pub const GENDER_OPTIONS: &[&str] = &["Female", "Male"];
pub const YES_NO_OPTIONS: &[&str] = &["Yes", "No"];
pub const NO_YES_OPTIONS: &[&str] = &["No", "Yes"];
pub const MULTIPLE_LINES_OPTIONS: &[&str] = &["No", "Yes", "No phone service"];
pub const INTERNET_SERVICE_OPTIONS: &[&str] = &["DSL", "Fiber optic", "No"];
pub const INTERNET_ADDON_OPTIONS: &[&str] = &["No", "Yes", "No internet service"];
pub const CONTRACT_OPTIONS: &[&str] = &["Month-to-month", "One year", "Two year"];
pub const PAYMENT_METHOD_OPTIONS: &[&str] = &[
    "Electronic check",
    "Mailed check",
    "Bank transfer (automatic)",
    "Credit card (automatic)",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// String enum; the listed options are what an input control offers.
    Choice(&'static [&'static str]),
    /// Boolean carried on the wire as 0/1.
    Flag,
    /// Non-negative whole number.
    Count,
    /// Non-negative decimal kept at two places.
    Amount,
}

impl FieldKind {
    pub fn is_numeric(self) -> bool {
        !matches!(self, FieldKind::Choice(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub field: Field,
    pub kind: FieldKind,
}

macro_rules! customer_fields {
    ($($variant:ident => $wire:literal, $attribute:literal, $label:literal, $kind:expr;)+) => {
        /// Every attribute of a [`CustomerProfile`], in wire order.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Field {
            $($variant,)+
        }

        impl Field {
            pub const ALL: &'static [Field] = &[$(Field::$variant,)+];

            /// Key used in the prediction request body.
            pub fn wire_name(self) -> &'static str {
                match self {
                    $(Field::$variant => $wire,)+
                }
            }

            pub fn attribute_name(self) -> &'static str {
                match self {
                    $(Field::$variant => $attribute,)+
                }
            }

            pub fn label(self) -> &'static str {
                match self {
                    $(Field::$variant => $label,)+
                }
            }
        }

        /// Static name -> type -> domain table driving coercion and form rendering.
        pub static FIELD_SCHEMA: &[FieldSpec] = &[
            $(FieldSpec { field: Field::$variant, kind: $kind },)+
        ];
    };
}

customer_fields! {
    Gender => "gender", "gender", "Gender", FieldKind::Choice(GENDER_OPTIONS);
    SeniorCitizen => "SeniorCitizen", "seniorCitizen", "Senior Citizen", FieldKind::Flag;
    Partner => "Partner", "partner", "Partner", FieldKind::Choice(YES_NO_OPTIONS);
    Dependents => "Dependents", "dependents", "Dependents", FieldKind::Choice(NO_YES_OPTIONS);
    Tenure => "tenure", "tenureMonths", "Tenure", FieldKind::Count;
    PhoneService => "PhoneService", "phoneService", "Phone Service", FieldKind::Choice(YES_NO_OPTIONS);
    MultipleLines => "MultipleLines", "multipleLines", "Multiple Lines", FieldKind::Choice(MULTIPLE_LINES_OPTIONS);
    InternetService => "InternetService", "internetService", "Internet Service", FieldKind::Choice(INTERNET_SERVICE_OPTIONS);
    OnlineSecurity => "OnlineSecurity", "onlineSecurity", "Online Security", FieldKind::Choice(INTERNET_ADDON_OPTIONS);
    OnlineBackup => "OnlineBackup", "onlineBackup", "Online Backup", FieldKind::Choice(INTERNET_ADDON_OPTIONS);
    DeviceProtection => "DeviceProtection", "deviceProtection", "Device Protection", FieldKind::Choice(INTERNET_ADDON_OPTIONS);
    TechSupport => "TechSupport", "techSupport", "Tech Support", FieldKind::Choice(INTERNET_ADDON_OPTIONS);
    StreamingTv => "StreamingTV", "streamingTV", "Streaming TV", FieldKind::Choice(INTERNET_ADDON_OPTIONS);
    StreamingMovies => "StreamingMovies", "streamingMovies", "Streaming Movies", FieldKind::Choice(INTERNET_ADDON_OPTIONS);
    Contract => "Contract", "contract", "Contract", FieldKind::Choice(CONTRACT_OPTIONS);
    PaperlessBilling => "PaperlessBilling", "paperlessBilling", "Paperless Billing", FieldKind::Choice(YES_NO_OPTIONS);
    PaymentMethod => "PaymentMethod", "paymentMethod", "Payment Method", FieldKind::Choice(PAYMENT_METHOD_OPTIONS);
    MonthlyCharges => "MonthlyCharges", "monthlyCharges", "Monthly Charges", FieldKind::Amount;
    TotalCharges => "TotalCharges", "totalCharges", "Total Charges", FieldKind::Amount;
}

impl Field {
    pub fn spec(self) -> &'static FieldSpec {
        // Variants and schema rows are generated in the same order.
        &FIELD_SCHEMA[self as usize]
    }

    pub fn kind(self) -> FieldKind {
        self.spec().kind
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for Field {
    type Err = UnknownFieldError;

    /// Accepts the wire key (`"SeniorCitizen"`) or the attribute name (`"seniorCitizen"`).
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .iter()
            .copied()
            .find(|field| field.wire_name() == name || field.attribute_name() == name)
            .ok_or_else(|| UnknownFieldError(name.to_string()))
    }
}

/// Value handed over by an input control.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Text(String),
    Number(f64),
}

impl RawValue {
    fn describe(&self) -> String {
        match self {
            RawValue::Text(text) => text.clone(),
            RawValue::Number(number) => number.to_string(),
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Number(value as f64)
    }
}

impl From<u32> for RawValue {
    fn from(value: u32) -> Self {
        RawValue::Number(f64::from(value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Choice(&'a str),
    Flag(bool),
    Count(u32),
    Amount(f64),
}

impl fmt::Display for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Choice(value) => f.write_str(value),
            FieldValue::Flag(value) => f.write_str(if *value { "1" } else { "0" }),
            FieldValue::Count(value) => write!(f, "{value}"),
            FieldValue::Amount(value) => write!(f, "{value}"),
        }
    }
}

/// The attributes describing one customer.
///
/// Choice members hold whatever string the control produced; they are not checked
/// against [`FieldKind::Choice`] options. Numeric members are always finite and
/// non-negative because [`CustomerProfile::with_field`] rejects anything else.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerProfile {
    pub gender: String,
    pub senior_citizen: bool,
    pub partner: String,
    pub dependents: String,
    pub tenure_months: u32,
    pub phone_service: String,
    pub multiple_lines: String,
    pub internet_service: String,
    pub online_security: String,
    pub online_backup: String,
    pub device_protection: String,
    pub tech_support: String,
    pub streaming_tv: String,
    pub streaming_movies: String,
    pub contract: String,
    pub paperless_billing: String,
    pub payment_method: String,
    pub monthly_charges: f64,
    pub total_charges: f64,
}

impl Default for CustomerProfile {
    fn default() -> Self {
        Self {
            gender: "Male".into(),
            senior_citizen: true,
            partner: "Yes".into(),
            dependents: "No".into(),
            tenure_months: 43,
            phone_service: "Yes".into(),
            multiple_lines: "Yes".into(),
            internet_service: "Fiber optic".into(),
            online_security: "No".into(),
            online_backup: "Yes".into(),
            device_protection: "Yes".into(),
            tech_support: "No".into(),
            streaming_tv: "Yes".into(),
            streaming_movies: "Yes".into(),
            contract: "Month-to-month".into(),
            paperless_billing: "Yes".into(),
            payment_method: "Electronic check".into(),
            monthly_charges: 103.0,
            total_charges: 4414.3,
        }
    }
}

impl CustomerProfile {
    pub fn value_of(&self, field: Field) -> FieldValue<'_> {
        match field {
            Field::SeniorCitizen => FieldValue::Flag(self.senior_citizen),
            Field::Tenure => FieldValue::Count(self.tenure_months),
            Field::MonthlyCharges => FieldValue::Amount(self.monthly_charges),
            Field::TotalCharges => FieldValue::Amount(self.total_charges),
            choice => FieldValue::Choice(self.choice(choice).map(String::as_str).unwrap_or("")),
        }
    }

    /// Text an input control shows for `field`.
    pub fn display_value(&self, field: Field) -> String {
        self.value_of(field).to_string()
    }

    /// Returns a copy with `field` replaced by the coerced `raw` value.
    pub fn with_field(
        &self,
        field: Field,
        raw: impl Into<RawValue>,
    ) -> Result<CustomerProfile, CoercionError> {
        let raw = raw.into();
        let mut next = self.clone();
        match field.kind() {
            FieldKind::Choice(_) => {
                if let Some(slot) = next.choice_mut(field) {
                    *slot = match raw {
                        RawValue::Text(text) => text,
                        RawValue::Number(number) => number.to_string(),
                    };
                }
            }
            FieldKind::Flag => next.senior_citizen = coerce_flag(field, &raw)?,
            FieldKind::Count => next.tenure_months = coerce_count(field, &raw)?,
            FieldKind::Amount => {
                let amount = coerce_amount(field, &raw)?;
                if field == Field::MonthlyCharges {
                    next.monthly_charges = amount;
                } else {
                    next.total_charges = amount;
                }
            }
        }
        Ok(next)
    }

    pub fn to_request_payload(&self) -> PredictionRequest {
        PredictionRequest {
            gender: self.gender.clone(),
            senior_citizen: u8::from(self.senior_citizen),
            partner: self.partner.clone(),
            dependents: self.dependents.clone(),
            tenure: self.tenure_months,
            phone_service: self.phone_service.clone(),
            multiple_lines: self.multiple_lines.clone(),
            internet_service: self.internet_service.clone(),
            online_security: self.online_security.clone(),
            online_backup: self.online_backup.clone(),
            device_protection: self.device_protection.clone(),
            tech_support: self.tech_support.clone(),
            streaming_tv: self.streaming_tv.clone(),
            streaming_movies: self.streaming_movies.clone(),
            contract: self.contract.clone(),
            paperless_billing: self.paperless_billing.clone(),
            payment_method: self.payment_method.clone(),
            monthly_charges: self.monthly_charges,
            total_charges: self.total_charges,
        }
    }

    fn choice(&self, field: Field) -> Option<&String> {
        let slot = match field {
            Field::Gender => &self.gender,
            Field::Partner => &self.partner,
            Field::Dependents => &self.dependents,
            Field::PhoneService => &self.phone_service,
            Field::MultipleLines => &self.multiple_lines,
            Field::InternetService => &self.internet_service,
            Field::OnlineSecurity => &self.online_security,
            Field::OnlineBackup => &self.online_backup,
            Field::DeviceProtection => &self.device_protection,
            Field::TechSupport => &self.tech_support,
            Field::StreamingTv => &self.streaming_tv,
            Field::StreamingMovies => &self.streaming_movies,
            Field::Contract => &self.contract,
            Field::PaperlessBilling => &self.paperless_billing,
            Field::PaymentMethod => &self.payment_method,
            Field::SeniorCitizen | Field::Tenure | Field::MonthlyCharges | Field::TotalCharges => {
                return None
            }
        };
        Some(slot)
    }

    fn choice_mut(&mut self, field: Field) -> Option<&mut String> {
        let slot = match field {
            Field::Gender => &mut self.gender,
            Field::Partner => &mut self.partner,
            Field::Dependents => &mut self.dependents,
            Field::PhoneService => &mut self.phone_service,
            Field::MultipleLines => &mut self.multiple_lines,
            Field::InternetService => &mut self.internet_service,
            Field::OnlineSecurity => &mut self.online_security,
            Field::OnlineBackup => &mut self.online_backup,
            Field::DeviceProtection => &mut self.device_protection,
            Field::TechSupport => &mut self.tech_support,
            Field::StreamingTv => &mut self.streaming_tv,
            Field::StreamingMovies => &mut self.streaming_movies,
            Field::Contract => &mut self.contract,
            Field::PaperlessBilling => &mut self.paperless_billing,
            Field::PaymentMethod => &mut self.payment_method,
            Field::SeniorCitizen | Field::Tenure | Field::MonthlyCharges | Field::TotalCharges => {
                return None
            }
        };
        Some(slot)
    }
}

fn parse_number(field: Field, raw: &RawValue) -> Result<f64, CoercionError> {
    let number = match raw {
        RawValue::Number(number) => *number,
        RawValue::Text(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| CoercionError::new(field, text.as_str(), "not a number"))?,
    };
    if !number.is_finite() {
        return Err(CoercionError::new(field, raw.describe(), "not a finite number"));
    }
    if number < 0.0 {
        return Err(CoercionError::new(field, raw.describe(), "must not be negative"));
    }
    // Folds -0.0 into 0.0.
    Ok(number + 0.0)
}

fn coerce_flag(field: Field, raw: &RawValue) -> Result<bool, CoercionError> {
    if let RawValue::Text(text) = raw {
        match text.trim() {
            "Yes" | "true" => return Ok(true),
            "No" | "false" => return Ok(false),
            _ => {}
        }
    }
    let number = parse_number(field, raw)?;
    if number == 0.0 {
        Ok(false)
    } else if number == 1.0 {
        Ok(true)
    } else {
        Err(CoercionError::new(field, raw.describe(), "expected 0 or 1"))
    }
}

fn coerce_count(field: Field, raw: &RawValue) -> Result<u32, CoercionError> {
    let number = parse_number(field, raw)?;
    if number.fract() != 0.0 {
        return Err(CoercionError::new(field, raw.describe(), "expected a whole number"));
    }
    if number > f64::from(u32::MAX) {
        return Err(CoercionError::new(field, raw.describe(), "too large"));
    }
    Ok(number as u32)
}

fn coerce_amount(field: Field, raw: &RawValue) -> Result<f64, CoercionError> {
    let number = parse_number(field, raw)?;
    let rounded = (number * 100.0).round() / 100.0;
    if !rounded.is_finite() {
        return Err(CoercionError::new(field, raw.describe(), "too large"));
    }
    Ok(rounded)
}
