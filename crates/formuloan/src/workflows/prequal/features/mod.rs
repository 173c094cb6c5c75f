//! Feature engineering: turns loosely-typed form fields into the numeric vector the
//! classifier scores.

mod tables;

pub use tables::{EmploymentStatus, StateCluster};

use super::domain::{parse_number, FeatureVector, FieldValue, RawInput};

/// Fields the form submits as numbers, always present in the output (0 when missing).
pub const NUMERIC_FIELDS: [&str; 24] = [
    "employment_duration",
    "monthly_income",
    "credit_score_lower",
    "credit_score_upper",
    "debt_to_income",
    "current_credit_lines",
    "revolving_balance",
    "bankcard_utilization",
    "delinquencies_7y",
    "amount_delinquent",
    "public_records",
    "loan_amount",
    "term",
    "listing_category",
    "lender_yield",
    "monthly_payment",
    "total_inquiries",
    "inquiries_6m",
    "total_trades",
    "trades_never_delinquent",
    "available_credit",
    "investors",
    "investment_friends_amount",
    "recommendations",
];

/// Checkbox fields, encoded as 0/1.
pub const CHECKBOX_FIELDS: [&str; 3] = ["is_homeowner", "in_group", "income_verifiable"];

/// Floor applied to monthly income before it is used as a divisor.
pub const MIN_MONTHLY_INCOME: f64 = 0.01;

/// Stand-in for the per-group lender yield aggregates.
pub const PLACEHOLDER_GROUP_YIELD: f64 = 0.15;

/// Column prefixes owned by the one-hot encodings; submitted fields never land there.
const ENCODED_PREFIXES: [&str; 2] = ["EmploymentStatus_", "StateCluster_"];

/// Derive the model feature vector from a submission. Never fails.
pub fn engineer(raw: &RawInput) -> FeatureVector {
    let mut features = FeatureVector::default();

    for (name, value) in raw.iter() {
        if ENCODED_PREFIXES.iter().any(|prefix| name.starts_with(prefix)) {
            continue;
        }
        match value {
            FieldValue::Text(text) => match parse_number(text) {
                Some(number) if !text.trim().is_empty() => features.insert(name, number),
                _ => features.insert_categorical(name, text.trim()),
            },
            FieldValue::Null => {}
            other => features.insert(name, other.as_number()),
        }
    }

    for name in NUMERIC_FIELDS {
        features.insert(name, raw.number(name));
    }
    for name in CHECKBOX_FIELDS {
        features.insert(name, indicator(raw.is_checked(name)));
    }

    features.insert("IsBorrowerHomeowner", indicator(raw.is_checked("is_homeowner")));
    features.insert("CurrentlyInGroup", indicator(raw.is_checked("in_group")));
    features.insert("Term", raw.number("term"));
    features.insert("LenderYield", raw.number("lender_yield"));

    features.insert(
        "CreditScoreMean",
        (raw.number("credit_score_lower") + raw.number("credit_score_upper")) / 2.0,
    );

    let monthly_income = raw.number("monthly_income").max(MIN_MONTHLY_INCOME);
    features.insert("LoanToIncome", raw.number("loan_amount") / monthly_income);
    features.insert(
        "PaymentToIncome",
        raw.number("monthly_payment") / monthly_income,
    );

    let never_delinquent = raw.number("trades_never_delinquent");
    if never_delinquent > 1.0 {
        features.insert("trades_never_delinquent", never_delinquent / 100.0);
    }

    let employment = EmploymentStatus::from_label(raw.text("employment_status").unwrap_or(""));
    for status in EmploymentStatus::ALL {
        features.insert(status.column(), indicator(status == employment));
    }

    let cluster = raw
        .text("state")
        .map(StateCluster::for_code)
        .unwrap_or(StateCluster::DEFAULT);
    for id in 1..=StateCluster::COUNT {
        features.insert(StateCluster::column(id), indicator(id == cluster.id()));
    }

    features.insert("LenderYield_mean_by_ListingCategory", PLACEHOLDER_GROUP_YIELD);
    features.insert("LenderYield_mean_by_Term", PLACEHOLDER_GROUP_YIELD);

    features
}

fn indicator(flag: bool) -> f64 {
    if flag {
        1.0
    } else {
        0.0
    }
}
