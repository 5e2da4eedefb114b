use super::*;
use async_trait::async_trait;
use std::sync::Mutex;
use tokio::sync::{mpsc, oneshot};

use crate::{form::FormModel, service::GENERIC_FAILURE_MESSAGE};

fn response(churn_probability: f64, prediction: &str) -> PredictionResponse {
    PredictionResponse {
        churn_probability,
        prediction: prediction.to_string(),
    }
}

struct ScriptedService {
    result: Result<PredictionResponse, RequestFailure>,
    seen: Mutex<Vec<PredictionRequest>>,
}

impl ScriptedService {
    fn new(result: Result<PredictionResponse, RequestFailure>) -> Self {
        Self {
            result,
            seen: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl PredictionService for ScriptedService {
    async fn predict(
        &self,
        payload: &PredictionRequest,
    ) -> Result<PredictionResponse, RequestFailure> {
        self.seen.lock().expect("lock").push(payload.clone());
        self.result.clone()
    }
}

#[test]
fn starts_idle_without_outcome() {
    let controller = RequestController::new();
    assert_eq!(controller.state(), &RequestState::Idle);
    assert_eq!(controller.latest_seq(), 0);
    assert!(controller.outcome().is_none());
}

#[test]
fn begin_clears_previous_outcome_before_any_io() {
    let mut controller = RequestController::new();
    let profile = CustomerProfile::default();

    let first = controller.begin(&profile);
    controller.resolve(first.seq, Ok(response(0.4, "No")));
    assert!(controller.outcome().is_some());

    let second = controller.begin(&profile);
    assert_eq!(controller.state(), &RequestState::Pending { seq: second.seq });
    assert!(controller.outcome().is_none());

    controller.resolve(second.seq, Err(RequestFailure::Status(502)));
    let third = controller.begin(&profile);
    assert_eq!(controller.state(), &RequestState::Pending { seq: third.seq });
    assert!(third.seq > second.seq && second.seq > first.seq);
}

#[test]
fn newer_response_wins_when_it_arrives_first() {
    let mut controller = RequestController::new();
    let profile = CustomerProfile::default();

    let a = controller.begin(&profile);
    let b = controller.begin(&profile);

    assert_eq!(
        controller.resolve(b.seq, Ok(response(0.2, "No"))),
        Resolution::Applied
    );
    assert_eq!(
        controller.resolve(a.seq, Ok(response(0.9, "Yes"))),
        Resolution::Discarded
    );

    assert_eq!(
        controller.state(),
        &RequestState::Succeeded(Prediction {
            churn_probability: 0.2,
            label: "No".to_string(),
        })
    );
}

#[test]
fn superseded_response_does_not_end_pending_state() {
    let mut controller = RequestController::new();
    let profile = CustomerProfile::default();

    let a = controller.begin(&profile);
    let b = controller.begin(&profile);

    assert_eq!(
        controller.resolve(a.seq, Err(RequestFailure::Transport("refused".into()))),
        Resolution::Discarded
    );
    assert!(controller.is_pending());

    assert_eq!(
        controller.resolve(b.seq, Ok(response(0.6, "Yes"))),
        Resolution::Applied
    );
    assert!(!controller.is_pending());
}

#[test]
fn duplicate_resolution_is_ignored() {
    let mut controller = RequestController::new();
    let pending = controller.begin(&CustomerProfile::default());

    controller.resolve(pending.seq, Ok(response(0.3, "No")));
    assert_eq!(
        controller.resolve(pending.seq, Err(RequestFailure::Status(500))),
        Resolution::Discarded
    );
    assert!(matches!(controller.state(), RequestState::Succeeded(_)));
}

#[test]
fn failures_surface_only_the_generic_message() {
    let failures = [
        RequestFailure::Status(500),
        RequestFailure::Transport("connection refused".into()),
        RequestFailure::Timeout(std::time::Duration::from_secs(30)),
        RequestFailure::MalformedResponse("missing field `prediction`".into()),
        RequestFailure::Service("shape mismatch".into()),
    ];

    for failure in failures {
        let mut controller = RequestController::new();
        let pending = controller.begin(&CustomerProfile::default());
        controller.resolve(pending.seq, Err(failure));

        assert_eq!(
            controller.outcome(),
            Some(PredictionOutcome::Failure {
                error_message: GENERIC_FAILURE_MESSAGE.to_string(),
            })
        );
    }
}

#[test]
fn payload_is_frozen_when_submission_begins() {
    let mut form = FormModel::initialize();
    let mut controller = RequestController::new();

    let pending = controller.begin(&form.snapshot());
    form.set_field("tenure", "1").expect("tenure");
    form.set_field("Contract", "Two year").expect("contract");

    assert_eq!(pending.payload.tenure, 43);
    assert_eq!(pending.payload.contract, "Month-to-month");
}

#[tokio::test]
async fn submit_runs_request_to_completion() {
    let service = ScriptedService::new(Ok(response(0.81, "Yes")));
    let mut form = FormModel::initialize();
    form.set_field("PaymentMethod", "Mailed check")
        .expect("payment method");
    let mut controller = RequestController::new();

    let state = controller.submit(&service, &form.snapshot()).await.clone();

    assert_eq!(
        state,
        RequestState::Succeeded(Prediction {
            churn_probability: 0.81,
            label: "Yes".to_string(),
        })
    );
    let seen = service.seen.lock().expect("lock");
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0], form.to_request_payload());
}

#[tokio::test]
async fn form_stays_resubmittable_after_failure() {
    let failing = ScriptedService::new(Err(RequestFailure::Status(503)));
    let healthy = ScriptedService::new(Ok(response(0.1, "No")));
    let form = FormModel::initialize();
    let mut controller = RequestController::new();

    controller.submit(&failing, form.profile()).await;
    assert!(matches!(
        controller.state(),
        RequestState::Failed(RequestFailure::Status(503))
    ));

    controller.submit(&healthy, form.profile()).await;
    assert!(matches!(controller.state(), RequestState::Succeeded(_)));
}

#[tokio::test]
async fn late_response_from_earlier_submission_is_discarded() {
    let mut controller = RequestController::new();
    let profile = CustomerProfile::default();
    let (done_tx, mut done_rx) =
        mpsc::channel::<(u64, Result<PredictionResponse, RequestFailure>)>(4);

    let mut gates = Vec::new();
    for (probability, label) in [(0.9, "Yes"), (0.2, "No")] {
        let pending = controller.begin(&profile);
        let (gate_tx, gate_rx) = oneshot::channel::<()>();
        gates.push(gate_tx);
        let done_tx = done_tx.clone();
        tokio::spawn(async move {
            let _ = gate_rx.await;
            let _ = done_tx
                .send((pending.seq, Ok(response(probability, label))))
                .await;
        });
    }

    // Release B before A.
    let gate_b = gates.pop().expect("gate b");
    let gate_a = gates.pop().expect("gate a");
    gate_b.send(()).expect("release b");
    let (seq, result) = done_rx.recv().await.expect("b resolves");
    assert_eq!(controller.resolve(seq, result), Resolution::Applied);

    gate_a.send(()).expect("release a");
    let (seq, result) = done_rx.recv().await.expect("a resolves");
    assert_eq!(controller.resolve(seq, result), Resolution::Discarded);

    assert_eq!(
        controller.state(),
        &RequestState::Succeeded(Prediction {
            churn_probability: 0.2,
            label: "No".to_string(),
        })
    );
}
