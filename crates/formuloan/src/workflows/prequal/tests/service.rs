use std::sync::Arc;
use std::time::Duration;

use super::common::*;
use crate::workflows::prequal::classifier::{Classifier, LogisticEnsemble};
use crate::workflows::prequal::service::{PrequalError, PrequalificationService};

#[test]
fn approved_submission_skips_alternative_search() {
    let service = service_with(ScriptedClassifier::approve_all());

    let assessment = service.assess(&submission()).expect("assessment");

    assert!(assessment.approved);
    assert!(assessment.alternatives.is_none());
    assert_eq!(service.classifier().calls(), 1);
}

#[test]
fn rejected_submission_carries_alternatives() {
    let service = service_with(ScriptedClassifier::approving(|terms| {
        terms.amount == 9_500 && terms.term == 36 && terms.yield_is(0.19)
    }));

    let assessment = service.assess(&submission()).expect("assessment");

    assert!(!assessment.approved);
    assert_eq!(assessment.probability, 0.22);
    assert_eq!(assessment.confidence_pct, 22.0);
    let alternatives = assessment.alternatives.expect("alternatives searched");
    assert_eq!(alternatives.len(), 1);
    assert_eq!(alternatives[0].amount, 9_500);
    assert_eq!(assessment.base.amount, 10_000);
    assert_eq!(assessment.base.term, 36);
}

#[test]
fn rejected_submission_without_options_reports_empty_list() {
    let service = service_with(ScriptedClassifier::reject_all());

    let assessment = service.assess(&submission()).expect("assessment");

    assert_eq!(assessment.alternatives, Some(Vec::new()));
}

#[test]
fn classifier_failure_on_submission_is_an_error() {
    let service = service_with(OfflineClassifier);

    let err = service.assess(&submission()).expect_err("base failure surfaces");

    assert!(matches!(err, PrequalError::Classifier(_)));
    assert!(err.to_string().contains("model endpoint offline"));
}

#[test]
fn confidence_is_rounded_to_one_decimal() {
    let service = service_with(ScriptedClassifier::new(|_| Ok(approve(0.81666))));

    let assessment = service.assess(&submission()).expect("assessment");

    assert_eq!(assessment.confidence_pct, 81.7);
}

#[test]
fn view_reports_deltas_against_submission() {
    let service = service_with(ScriptedClassifier::approving(|terms| {
        terms.term == 60 && terms.amount == 8_000
    }));

    let view = service.assess(&submission()).expect("assessment").view();

    let alternatives = view.alternatives.expect("alternatives present");
    assert_eq!(alternatives.len(), 2);
    let first = &alternatives[0];
    assert_eq!(first.amount_delta, -2_000);
    assert_eq!(first.term_delta, 24);
    assert!(first.yield_delta.abs() < 1e-12);
    assert!((alternatives[1].yield_delta - 0.01).abs() < 1e-9);
}

#[test]
fn extreme_submitted_term_keeps_view_deltas_in_range() {
    let service = service_with(ScriptedClassifier::approving(|terms| terms.term == 36));
    let raw = submission()
        .with("term", "-1e300")
        .with("loan_amount", "5000");

    let assessment = service.assess(&raw).expect("assessment");
    assert_eq!(assessment.base.term, i64::MIN);

    let view = assessment.view();
    let alternatives = view.alternatives.expect("alternatives searched");
    assert!(!alternatives.is_empty());
    assert!(alternatives.iter().all(|alt| alt.term == 36));
    assert!(alternatives.iter().all(|alt| alt.term_delta == i64::MAX));
    assert!(serde_json::to_string(&alternatives).is_ok());
}

#[test]
fn service_accepts_trait_objects() {
    let classifier: Arc<dyn Classifier> = Arc::new(LogisticEnsemble::baseline());
    let service = PrequalificationService::new(classifier)
        .with_simulated_latency(Duration::from_millis(5));

    assert_eq!(service.simulated_latency(), Duration::from_millis(5));
    assert!(service.assess(&submission()).is_ok());
}

#[test]
fn baseline_model_separates_strong_and_weak_borrowers() {
    let service = service_with(LogisticEnsemble::baseline());

    let strong = submission()
        .with("credit_score_lower", "760")
        .with("credit_score_upper", "779")
        .with("monthly_income", "8000")
        .with("monthly_payment", "330")
        .with("lender_yield", "0.12")
        .with("debt_to_income", "0.15")
        .with("delinquencies_7y", "0")
        .with("inquiries_6m", "0")
        .with("trades_never_delinquent", "100");
    let weak = submission()
        .with("employment_status", "Not employed")
        .with("credit_score_lower", "540")
        .with("credit_score_upper", "559")
        .with("monthly_income", "1500")
        .with("loan_amount", "25000")
        .with("monthly_payment", "1000")
        .with("delinquencies_7y", "4")
        .with("inquiries_6m", "5")
        .with("public_records", "1")
        .with("trades_never_delinquent", "60")
        .with("is_homeowner", false)
        .with("income_verifiable", false);

    let strong = service.assess(&strong).expect("strong assessment");
    let weak = service.assess(&weak).expect("weak assessment");

    assert!(strong.approved, "strong borrower probability {}", strong.probability);
    assert!(!weak.approved, "weak borrower probability {}", weak.probability);
    assert!(strong.probability > weak.probability);
    assert!(weak.alternatives.is_some());
}
