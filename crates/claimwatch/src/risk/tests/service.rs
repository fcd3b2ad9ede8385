use std::io::Cursor;

use serde_json::json;

use super::common::*;
use crate::feedback::{FeedbackRequest, Verdict};
use crate::risk::{
    BulkOutcome, ClaimInput, ClaimType, PredictionError, PredictionServiceError, TabularFeature,
};

#[test]
fn predict_delegates_to_router() {
    let (service, _) = build_service(100);

    let result = service
        .predict(&ClaimInput::job_posting("Wire transfer the deposit"))
        .expect("prediction succeeds");

    assert_eq!(result.fraud_type, ClaimType::JobFraud);
    assert!(service.router().supports(ClaimType::Insurance));
}

#[test]
fn predict_propagates_prediction_errors() {
    let (service, _) = build_service(100);
    let mut claim = ClaimInput::insurance(1.0, 1.0, 0.0, 30.0);
    claim.claim_amount = Some(f64::INFINITY);

    let error = service.predict(&claim).expect_err("non-numeric amount");

    assert!(matches!(
        error,
        PredictionServiceError::Prediction(PredictionError::Input(_))
    ));
    assert_eq!(error.to_string(), "claim_amount must be a finite number");
}

#[test]
fn bulk_prediction_zero_fills_missing_columns() {
    let (service, _) = build_service(100);
    let csv = "Claim Amount,Customer Age\n$4,500,29\n";
    let csv = csv.replace("$4,500", "\"$4,500\"");

    let batch = service
        .predict_bulk(Cursor::new(csv))
        .expect("bulk succeeds");

    assert_eq!(batch.scored(), 1);
    assert_eq!(
        batch.missing_features,
        vec![TabularFeature::PolicyTenureDays, TabularFeature::NumPriorClaims]
    );
    match &batch.rows[0].outcome {
        BulkOutcome::Scored { prediction } => {
            assert_eq!(prediction.fraud_type, ClaimType::Insurance);
        }
        other => panic!("expected scored row, got {other:?}"),
    }
}

#[test]
fn bulk_prediction_of_header_only_file_is_empty() {
    let (service, _) = build_service(100);

    let batch = service
        .predict_bulk(Cursor::new("claim_amount,policy_tenure_days\n"))
        .expect("bulk succeeds");

    assert!(batch.rows.is_empty());
    assert_eq!(batch.scored(), 0);
}

#[test]
fn feedback_signals_retrain_at_threshold() {
    let (service, sink) = build_service(2);
    let request = FeedbackRequest {
        fraud_type: ClaimType::Insurance,
        input_payload: json!({ "claim_amount": 4200.0 }),
        predicted_label: "Low Risk \u{2013} Normal Behavior".to_string(),
        predicted_probability: 0.12,
        user_feedback: Verdict::Yes,
        timestamp: None,
    };

    let first = service
        .submit_feedback(request.clone())
        .expect("first verdict");
    let second = service.submit_feedback(request).expect("second verdict");

    assert_eq!(first.status, "ok");
    assert!(!first.retrain_triggered);
    assert!(second.retrain_triggered);
    let records = sink.records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].user_feedback, Verdict::Yes);
    assert!(!records[0].timestamp.is_empty());
}
