use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::workflows::prequal::classifier::{Classifier, ClassifierError};
use crate::workflows::prequal::domain::{FeatureVector, Prediction, RawInput};
use crate::workflows::prequal::service::PrequalificationService;

/// Loan terms as the classifier sees them.
#[derive(Debug, Clone, Copy)]
pub(super) struct Terms {
    pub amount: i64,
    pub term: i64,
    pub yield_rate: f64,
}

impl Terms {
    fn from_features(features: &FeatureVector) -> Self {
        Self {
            amount: features.value("loan_amount") as i64,
            term: features.value("term") as i64,
            yield_rate: features.value("lender_yield"),
        }
    }

    pub fn yield_is(&self, expected: f64) -> bool {
        (self.yield_rate - expected).abs() < 1e-9
    }
}

type Rule = dyn Fn(Terms) -> Result<Prediction, ClassifierError> + Send + Sync;

/// Classifier whose verdict is a function of the loan terms only; counts its calls.
pub(super) struct ScriptedClassifier {
    rule: Box<Rule>,
    calls: AtomicUsize,
}

impl ScriptedClassifier {
    pub(super) fn new(
        rule: impl Fn(Terms) -> Result<Prediction, ClassifierError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            rule: Box::new(rule),
            calls: AtomicUsize::new(0),
        }
    }

    pub(super) fn approving(predicate: impl Fn(Terms) -> bool + Send + Sync + 'static) -> Self {
        Self::new(move |terms| {
            Ok(if predicate(terms) {
                approve(0.81)
            } else {
                reject(0.22)
            })
        })
    }

    pub(super) fn approve_all() -> Self {
        Self::approving(|_| true)
    }

    pub(super) fn reject_all() -> Self {
        Self::approving(|_| false)
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl Classifier for ScriptedClassifier {
    fn predict(&self, features: &FeatureVector) -> Result<Prediction, ClassifierError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        (self.rule)(Terms::from_features(features))
    }
}

/// Always fails, as an unreachable remote model would.
pub(super) struct OfflineClassifier;

impl Classifier for OfflineClassifier {
    fn predict(&self, _features: &FeatureVector) -> Result<Prediction, ClassifierError> {
        Err(ClassifierError::Unavailable("model endpoint offline".to_string()))
    }
}

pub(super) fn approve(probability: f64) -> Prediction {
    Prediction {
        approved: true,
        probability,
    }
}

pub(super) fn reject(probability: f64) -> Prediction {
    Prediction {
        approved: false,
        probability,
    }
}

/// Mid-range borrower asking for 10,000 over 36 months at 20%.
pub(super) fn submission() -> RawInput {
    RawInput::new()
        .with("employment_status", "Full-time")
        .with("employment_duration", "48")
        .with("income_range", "$50,000-74,999")
        .with("monthly_income", "5200")
        .with("is_homeowner", true)
        .with("state", "IA")
        .with("in_group", false)
        .with("credit_score_lower", "680")
        .with("credit_score_upper", "699")
        .with("debt_to_income", "0.24")
        .with("current_credit_lines", "9")
        .with("revolving_balance", "8400")
        .with("bankcard_utilization", "0.41")
        .with("delinquencies_7y", "1")
        .with("amount_delinquent", "0")
        .with("public_records", "0")
        .with("loan_amount", "10000")
        .with("term", "36")
        .with("listing_category", "1")
        .with("lender_yield", "0.20")
        .with("monthly_payment", "372.00")
        .with("total_inquiries", "6")
        .with("inquiries_6m", "2")
        .with("total_trades", "21")
        .with("trades_never_delinquent", "92")
        .with("available_credit", "6100")
        .with("investors", "120")
        .with("investment_friends_amount", "0")
        .with("recommendations", "0")
        .with("income_verifiable", true)
}

pub(super) fn submission_with_terms(amount: i64, term: i64, yield_rate: f64) -> RawInput {
    submission()
        .with("loan_amount", amount)
        .with("term", term)
        .with("lender_yield", yield_rate)
}

pub(super) fn service_with<C: Classifier + 'static>(classifier: C) -> PrequalificationService<C> {
    PrequalificationService::new(Arc::new(classifier))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
