use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::domain::{FeatureVector, Prediction};

/// Scores a feature vector. Implementations must be immutable once built so they can be
/// shared across requests.
pub trait Classifier: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> Result<Prediction, ClassifierError>;
}

/// Failure while scoring a single feature vector.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClassifierError {
    #[error("ensemble has no members")]
    EmptyEnsemble,
    #[error("ensemble member weights must sum to a positive value (got {total})")]
    InvalidWeights { total: f64 },
    #[error("classifier produced a non-finite probability")]
    NonFiniteProbability,
    #[error("classifier unavailable: {0}")]
    Unavailable(String),
}

/// Failure while loading a serialized ensemble.
#[derive(Debug, thiserror::Error)]
pub enum ModelLoadError {
    #[error("failed to read model file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid model definition: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("model rejected: {0}")]
    Invalid(String),
}

/// One logistic-regression member of the ensemble.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticMember {
    pub name: String,
    #[serde(default = "default_member_weight")]
    pub weight: f64,
    pub intercept: f64,
    pub coefficients: BTreeMap<String, f64>,
}

fn default_member_weight() -> f64 {
    1.0
}

impl LogisticMember {
    /// Features the vector does not carry contribute nothing.
    pub fn probability(&self, features: &FeatureVector) -> f64 {
        let logit = self
            .coefficients
            .iter()
            .fold(self.intercept, |acc, (name, weight)| {
                acc + weight * features.value(name)
            });
        sigmoid(logit)
    }
}

/// Weighted average of logistic members with a decision threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticEnsemble {
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    pub members: Vec<LogisticMember>,
}

fn default_threshold() -> f64 {
    0.5
}

impl LogisticEnsemble {
    pub fn new(threshold: f64, members: Vec<LogisticMember>) -> Self {
        Self { threshold, members }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ModelLoadError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ModelLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ModelLoadError> {
        let ensemble: Self = serde_json::from_reader(reader)?;
        ensemble.validate()?;
        Ok(ensemble)
    }

    fn validate(&self) -> Result<(), ModelLoadError> {
        if self.members.is_empty() {
            return Err(ModelLoadError::Invalid("ensemble has no members".to_string()));
        }
        if self.threshold.is_nan() || self.threshold <= 0.0 || self.threshold >= 1.0 {
            return Err(ModelLoadError::Invalid(format!(
                "threshold {} outside (0, 1)",
                self.threshold
            )));
        }
        if let Some(member) = self
            .members
            .iter()
            .find(|member| !member.weight.is_finite() || member.weight < 0.0)
        {
            return Err(ModelLoadError::Invalid(format!(
                "member '{}' has invalid weight {}",
                member.name, member.weight
            )));
        }
        Ok(())
    }

    /// Built-in heuristic model: a credit-history member and an affordability member.
    pub fn baseline() -> Self {
        let credit = LogisticMember {
            name: "credit_history".to_string(),
            weight: 1.0,
            intercept: -13.5,
            coefficients: coefficients(&[
                ("CreditScoreMean", 0.02),
                ("trades_never_delinquent", 1.5),
                ("delinquencies_7y", -0.25),
                ("inquiries_6m", -0.2),
                ("public_records", -0.6),
                ("IsBorrowerHomeowner", 0.3),
                ("income_verifiable", 0.4),
                ("EmploymentStatus_Not employed", -1.5),
            ]),
        };
        let affordability = LogisticMember {
            name: "affordability".to_string(),
            weight: 1.0,
            intercept: 3.2,
            coefficients: coefficients(&[
                ("PaymentToIncome", -10.0),
                ("LoanToIncome", -0.35),
                ("debt_to_income", -2.0),
                ("LenderYield", -9.0),
                ("Term", -0.012),
            ]),
        };

        Self::new(default_threshold(), vec![credit, affordability])
    }
}

impl Classifier for LogisticEnsemble {
    fn predict(&self, features: &FeatureVector) -> Result<Prediction, ClassifierError> {
        if self.members.is_empty() {
            return Err(ClassifierError::EmptyEnsemble);
        }

        let total_weight: f64 = self.members.iter().map(|member| member.weight).sum();
        if !total_weight.is_finite() || total_weight <= 0.0 {
            return Err(ClassifierError::InvalidWeights {
                total: total_weight,
            });
        }

        let probability = self
            .members
            .iter()
            .map(|member| member.weight * member.probability(features))
            .sum::<f64>()
            / total_weight;

        if !probability.is_finite() {
            return Err(ClassifierError::NonFiniteProbability);
        }

        Ok(Prediction {
            approved: probability >= self.threshold,
            probability,
        })
    }
}

fn coefficients(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
    pairs
        .iter()
        .map(|(name, weight)| (name.to_string(), *weight))
        .collect()
}

fn sigmoid(logit: f64) -> f64 {
    1.0 / (1.0 + (-logit).exp())
}
