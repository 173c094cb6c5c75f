//! Brute-force search for nearby loan terms the classifier would approve.
//!
//! Candidates are visited term first, then amount, then yield. The limits below are
//! fixed product constants.

use tracing::debug;

use super::classifier::{Classifier, ClassifierError};
use super::domain::{Alternative, BaseScenario, Prediction, RawInput};
use super::features::engineer;

/// Most alternatives returned for one submission.
pub const MAX_ALTERNATIVES: usize = 3;
/// Approvals collected for a single (term, amount) pair before moving to the next amount.
pub const MAX_APPROVALS_PER_PAIR: usize = 2;
/// Hard cap on (term, amount, yield) combinations visited.
pub const MAX_ITERATIONS: usize = 600;

/// Decrement between consecutive amount candidates.
pub const AMOUNT_STEP: i64 = 500;
/// Amount candidates stay strictly above this value.
pub const AMOUNT_FLOOR: i64 = 900;

/// Standard terms, in months.
pub const SHORT_TERM: i64 = 36;
pub const LONG_TERM: i64 = 60;

/// Offsets applied to the submitted yield, in visiting order.
pub const YIELD_OFFSETS: [f64; 6] = [0.0, 0.01, 0.02, 0.03, -0.01, -0.02];
/// Inclusive bounds for yield candidates.
pub const MIN_YIELD: f64 = 0.001;
pub const MAX_YIELD: f64 = 0.36;
/// Yields closer than this to the submitted one count as the submitted yield.
pub const BASE_YIELD_TOLERANCE: f64 = 0.001;

const YIELD_SCALE: f64 = 10_000.0;

/// Result of evaluating one candidate scenario.
#[derive(Debug, Clone, PartialEq)]
pub enum CandidateOutcome {
    Approved(Prediction),
    Rejected(Prediction),
    Failed(ClassifierError),
}

impl CandidateOutcome {
    pub fn is_approved(&self) -> bool {
        matches!(self, CandidateOutcome::Approved(_))
    }
}

/// Alternatives found plus counters describing how much work the search did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchReport {
    pub alternatives: Vec<Alternative>,
    /// Combinations counted against [`MAX_ITERATIONS`], including the skipped base.
    pub visited: usize,
    /// Combinations actually sent to the classifier.
    pub evaluated: usize,
    pub failures: usize,
    pub hit_iteration_cap: bool,
}

/// Descending amounts from `base_amount` in steps of [`AMOUNT_STEP`], all above the floor.
///
/// Lazy: a huge submitted amount only costs the combinations the search visits.
pub fn amount_candidates(base_amount: i64) -> impl Iterator<Item = i64> + Clone {
    std::iter::successors(Some(base_amount), |amount| amount.checked_sub(AMOUNT_STEP))
        .take_while(|amount| *amount > AMOUNT_FLOOR)
}

/// The other standard term first, then the submitted one.
pub fn term_candidates(base_term: i64) -> [i64; 2] {
    let other = if base_term == SHORT_TERM {
        LONG_TERM
    } else {
        SHORT_TERM
    };
    [other, base_term]
}

/// Submitted yield and its offsets, rounded to four decimals, deduplicated and bounded.
pub fn yield_candidates(base_yield: f64) -> Vec<f64> {
    let min_key = (MIN_YIELD * YIELD_SCALE).round() as i64;
    let max_key = (MAX_YIELD * YIELD_SCALE).round() as i64;

    let mut keys: Vec<i64> = Vec::with_capacity(YIELD_OFFSETS.len());
    for offset in YIELD_OFFSETS {
        let candidate = ((base_yield + offset) * YIELD_SCALE).round();
        if !candidate.is_finite() {
            continue;
        }
        let key = candidate as i64;
        if (min_key..=max_key).contains(&key) && !keys.contains(&key) {
            keys.push(key);
        }
    }

    keys.into_iter().map(|key| key as f64 / YIELD_SCALE).collect()
}

impl BaseScenario {
    pub fn is_same_terms(&self, term: i64, amount: i64, yield_rate: f64) -> bool {
        term == self.term
            && amount == self.amount
            && (yield_rate - self.yield_rate).abs() < BASE_YIELD_TOLERANCE
    }

    /// Linear rescale of the submitted payment; not a re-amortization.
    pub fn scaled_payment(&self, amount: i64, term: i64, yield_rate: f64) -> f64 {
        let amount_ratio = if self.amount > 0 {
            amount as f64 / self.amount as f64
        } else {
            1.0
        };
        let term_factor = if term > 0 {
            self.term as f64 / term as f64
        } else {
            1.0
        };
        let rate_factor = if self.yield_rate > 0.0 {
            yield_rate / self.yield_rate
        } else {
            1.0
        };
        self.monthly_payment * amount_ratio * term_factor * rate_factor
    }
}

/// Copy of the submission with the loan terms replaced.
pub fn scenario(
    raw: &RawInput,
    amount: i64,
    term: i64,
    yield_rate: f64,
    monthly_payment: f64,
) -> RawInput {
    let mut scenario = raw.clone();
    scenario.set("loan_amount", amount);
    scenario.set("term", term);
    scenario.set("lender_yield", yield_rate);
    scenario.set("monthly_payment", monthly_payment);
    scenario
}

pub fn evaluate_candidate<C>(scenario: &RawInput, classifier: &C) -> CandidateOutcome
where
    C: Classifier + ?Sized,
{
    let features = engineer(scenario);
    match classifier.predict(&features) {
        Ok(prediction) if prediction.approved => CandidateOutcome::Approved(prediction),
        Ok(prediction) => CandidateOutcome::Rejected(prediction),
        Err(err) => CandidateOutcome::Failed(err),
    }
}

/// Approved alternatives for a rejected submission, in discovery order.
pub fn find_alternatives<C>(raw: &RawInput, classifier: &C) -> Vec<Alternative>
where
    C: Classifier + ?Sized,
{
    search(raw, classifier).alternatives
}

pub fn search<C>(raw: &RawInput, classifier: &C) -> SearchReport
where
    C: Classifier + ?Sized,
{
    let base = BaseScenario::from_input(raw);
    let terms = term_candidates(base.term);
    let yields = yield_candidates(base.yield_rate);

    let mut report = SearchReport::default();

    'terms: for term in terms {
        for amount in amount_candidates(base.amount) {
            let mut pair_approvals = 0;

            for &yield_rate in &yields {
                if report.visited == MAX_ITERATIONS {
                    report.hit_iteration_cap = true;
                    break 'terms;
                }
                report.visited += 1;

                if base.is_same_terms(term, amount, yield_rate) {
                    continue;
                }

                let monthly_payment = base.scaled_payment(amount, term, yield_rate);
                let candidate = scenario(raw, amount, term, yield_rate, monthly_payment);
                report.evaluated += 1;

                match evaluate_candidate(&candidate, classifier) {
                    CandidateOutcome::Approved(prediction) => {
                        report.alternatives.push(Alternative {
                            amount,
                            term,
                            yield_rate,
                            probability: prediction.probability,
                            monthly_payment,
                        });
                        if report.alternatives.len() >= MAX_ALTERNATIVES {
                            return report;
                        }
                        pair_approvals += 1;
                        if pair_approvals >= MAX_APPROVALS_PER_PAIR {
                            break;
                        }
                    }
                    CandidateOutcome::Rejected(_) => {}
                    CandidateOutcome::Failed(err) => {
                        report.failures += 1;
                        debug!(amount, term, yield_rate, error = %err, "candidate evaluation failed");
                    }
                }
            }
        }
    }

    report
}
