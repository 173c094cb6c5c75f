use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Single form field as submitted: checkbox, numeric input or free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Number(f64),
    Text(String),
    Null,
}

impl FieldValue {
    /// Loose numeric reading of the field. Anything unparsable or non-finite reads as 0.
    pub fn as_number(&self) -> f64 {
        match self {
            FieldValue::Bool(true) => 1.0,
            FieldValue::Bool(false) | FieldValue::Null => 0.0,
            FieldValue::Number(value) if value.is_finite() => *value,
            FieldValue::Number(_) => 0.0,
            FieldValue::Text(text) => parse_number(text).unwrap_or(0.0),
        }
    }

    /// Checkbox reading of the field.
    pub fn is_checked(&self) -> bool {
        match self {
            FieldValue::Bool(flag) => *flag,
            FieldValue::Number(value) => value.is_finite() && *value != 0.0,
            FieldValue::Text(text) => {
                let text = text.trim();
                !text.is_empty()
                    && !["false", "0", "off", "no"]
                        .iter()
                        .any(|falsy| text.eq_ignore_ascii_case(falsy))
            }
            FieldValue::Null => false,
        }
    }
}

pub(crate) fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return Some(0.0);
    }
    text.parse::<f64>().ok().filter(|value| value.is_finite())
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value as f64)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

/// Borrower and loan attributes keyed by form field name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawInput {
    fields: BTreeMap<String, FieldValue>,
}

impl RawInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Builder-style variant of [`RawInput::set`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn number(&self, name: &str) -> f64 {
        self.get(name).map(FieldValue::as_number).unwrap_or(0.0)
    }

    pub fn is_checked(&self, name: &str) -> bool {
        self.get(name).map(FieldValue::is_checked).unwrap_or(false)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(FieldValue::Text(text)) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RawInput
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

/// Numeric model input derived from a [`RawInput`].
///
/// Text fields that carry no number are kept in `categorical` so nothing submitted is lost.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub values: BTreeMap<String, f64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub categorical: BTreeMap<String, String>,
}

impl FeatureVector {
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Value of a feature, 0 when the vector does not carry it.
    pub fn value(&self, name: &str) -> f64 {
        self.get(name).unwrap_or(0.0)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        let name = name.into();
        self.categorical.remove(&name);
        self.values.insert(name, value);
    }

    pub fn insert_categorical(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.values.remove(&name);
        self.categorical.insert(name, value.into());
    }

    pub fn categorical(&self, name: &str) -> Option<&str> {
        self.categorical.get(name).map(String::as_str)
    }

    /// Sum of every numeric feature whose name starts with `prefix`.
    pub fn group_sum(&self, prefix: &str) -> f64 {
        self.values
            .iter()
            .filter(|(name, _)| name.starts_with(prefix))
            .map(|(_, value)| value)
            .sum()
    }
}

/// Classifier verdict for one scenario.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub approved: bool,
    pub probability: f64,
}

impl Prediction {
    /// Probability as a percentage rounded to one decimal place.
    pub fn confidence_pct(&self) -> f64 {
        (self.probability * 1000.0).round() / 10.0
    }
}

/// Nearby scenario the classifier approved.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Alternative {
    pub amount: i64,
    pub term: i64,
    #[serde(rename = "yield")]
    pub yield_rate: f64,
    pub probability: f64,
    pub monthly_payment: f64,
}

/// The loan terms a submission asked for, read leniently from the form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaseScenario {
    pub amount: i64,
    pub term: i64,
    #[serde(rename = "yield")]
    pub yield_rate: f64,
    pub monthly_payment: f64,
}

impl BaseScenario {
    pub fn from_input(raw: &RawInput) -> Self {
        Self {
            amount: raw.number("loan_amount").trunc() as i64,
            term: raw.number("term").trunc() as i64,
            yield_rate: raw.number("lender_yield"),
            monthly_payment: raw.number("monthly_payment"),
        }
    }
}

/// Outcome of a pre-qualification request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub base: BaseScenario,
    pub approved: bool,
    pub probability: f64,
    pub confidence_pct: f64,
    /// Only populated when the submitted scenario was rejected.
    pub alternatives: Option<Vec<Alternative>>,
}

impl Assessment {
    pub fn view(&self) -> AssessmentView {
        AssessmentView {
            approved: self.approved,
            probability: self.probability,
            confidence_pct: self.confidence_pct,
            alternatives: self.alternatives.as_ref().map(|alternatives| {
                alternatives
                    .iter()
                    .map(|alternative| AlternativeView::against(&self.base, alternative))
                    .collect()
            }),
        }
    }
}

/// Presentation shape of an [`Assessment`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentView {
    pub approved: bool,
    pub probability: f64,
    pub confidence_pct: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternatives: Option<Vec<AlternativeView>>,
}

/// Alternative plus its differences from what was submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativeView {
    pub amount: i64,
    pub term: i64,
    #[serde(rename = "yield")]
    pub yield_rate: f64,
    pub probability: f64,
    pub monthly_payment: f64,
    pub amount_delta: i64,
    pub term_delta: i64,
    pub yield_delta: f64,
}

impl AlternativeView {
    pub fn against(base: &BaseScenario, alternative: &Alternative) -> Self {
        Self {
            amount: alternative.amount,
            term: alternative.term,
            yield_rate: alternative.yield_rate,
            probability: alternative.probability,
            monthly_payment: alternative.monthly_payment,
            amount_delta: alternative.amount.saturating_sub(base.amount),
            term_delta: alternative.term.saturating_sub(base.term),
            yield_delta: alternative.yield_rate - base.yield_rate,
        }
    }
}
