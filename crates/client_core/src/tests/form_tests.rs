use super::*;
use serde_json::{json, Map, Value};
use shared::domain::{FieldKind, FIELD_SCHEMA};

fn payload_json(model: &FormModel) -> Map<String, Value> {
    match serde_json::to_value(model.to_request_payload()).expect("serialize payload") {
        Value::Object(map) => map,
        other => panic!("payload must be a JSON object, got {other}"),
    }
}

fn changed_keys(before: &Map<String, Value>, after: &Map<String, Value>) -> Vec<String> {
    before
        .iter()
        .filter(|(key, value)| after.get(key.as_str()) != Some(*value))
        .map(|(key, _)| key.clone())
        .collect()
}

#[test]
fn initialized_payload_carries_every_wire_key_with_numeric_types() {
    let model = FormModel::initialize();
    let payload = payload_json(&model);

    let mut keys: Vec<&str> = payload.keys().map(String::as_str).collect();
    let mut expected: Vec<&str> = Field::ALL.iter().map(|field| field.wire_name()).collect();
    keys.sort_unstable();
    expected.sort_unstable();
    assert_eq!(keys, expected);

    assert_eq!(payload["gender"], json!("Male"));
    assert_eq!(payload["SeniorCitizen"], json!(1));
    assert_eq!(payload["tenure"], json!(43));
    assert_eq!(payload["Contract"], json!("Month-to-month"));
    assert_eq!(payload["MonthlyCharges"].as_f64(), Some(103.0));
    assert_eq!(payload["TotalCharges"].as_f64(), Some(4414.3));
    assert_eq!(payload["StreamingTV"], json!("Yes"));
}

#[test]
fn choice_edit_touches_only_its_wire_key() {
    for spec in FIELD_SCHEMA {
        let FieldKind::Choice(options) = spec.kind else {
            continue;
        };
        let mut model = FormModel::initialize();
        let before = payload_json(&model);
        let current = model.profile().display_value(spec.field);
        let next = options
            .iter()
            .find(|option| **option != current)
            .expect("every choice has an alternative");

        let update = model
            .set_field(spec.field.wire_name(), *next)
            .expect("known field");
        assert_eq!(update, FieldUpdate::Applied);

        let after = payload_json(&model);
        assert_eq!(after[spec.field.wire_name()], json!(next));
        assert_eq!(changed_keys(&before, &after), vec![spec.field.wire_name()]);
    }
}

#[test]
fn numeric_edits_are_emitted_as_numbers() {
    let mut model = FormModel::initialize();
    let before = payload_json(&model);

    model.set_field("tenure", "12").expect("tenure");
    model.set_field("MonthlyCharges", "70.35").expect("monthly");
    model.set_field("SeniorCitizen", "0").expect("senior");

    let after = payload_json(&model);
    assert_eq!(after["tenure"], json!(12));
    assert_eq!(after["MonthlyCharges"].as_f64(), Some(70.35));
    assert_eq!(after["SeniorCitizen"], json!(0));

    let mut changed = changed_keys(&before, &after);
    changed.sort_unstable();
    assert_eq!(changed, vec!["MonthlyCharges", "SeniorCitizen", "tenure"]);
}

#[test]
fn invalid_numeric_input_keeps_previous_value() {
    let mut model = FormModel::initialize();
    model.set_field("tenure", 20u32).expect("tenure");
    let before = payload_json(&model);

    for field in Field::ALL.iter().filter(|field| field.kind().is_numeric()) {
        for raw in ["abc", "", "-3", "1e999", "1.7e308"] {
            let update = model.set_field(field.wire_name(), raw).expect("known field");
            assert_eq!(update, FieldUpdate::Ignored, "{field} accepted {raw:?}");
        }
    }

    assert_eq!(payload_json(&model), before);
    assert_eq!(model.profile().tenure_months, 20);
}

#[test]
fn unknown_field_is_rejected_without_touching_state() {
    let mut model = FormModel::initialize();
    let before = model.profile().clone();

    let err = model
        .set_field("favouriteColour", "teal")
        .expect_err("not in schema");
    assert_eq!(err.0, "favouriteColour");
    assert_eq!(model.profile(), &before);
}

#[test]
fn attribute_names_dispatch_like_wire_names() {
    let mut model = FormModel::initialize();
    model.set_field("tenureMonths", 5u32).expect("tenureMonths");
    model.set_field("paymentMethod", "Mailed check").expect("paymentMethod");

    assert_eq!(model.profile().tenure_months, 5);
    assert_eq!(model.profile().payment_method, "Mailed check");
}

#[test]
fn snapshot_is_unaffected_by_later_edits() {
    let mut model = FormModel::initialize();
    let snapshot = model.snapshot();

    model.set_field("Contract", "Two year").expect("contract");
    model.set_field("TotalCharges", "10").expect("total");

    assert_eq!(snapshot.contract, "Month-to-month");
    assert_eq!(snapshot.total_charges, 4414.3);
    assert_eq!(model.profile().contract, "Two year");
    assert_eq!(model.profile().total_charges, 10.0);
}

#[test]
fn ignored_edit_does_not_replace_snapshot() {
    let mut model = FormModel::initialize();
    let snapshot = model.snapshot();

    model.set_field("tenure", "abc").expect("tenure");

    assert!(std::sync::Arc::ptr_eq(&snapshot, &model.snapshot()));
}
