//! Loan pre-qualification: feature engineering, classification and the search for
//! approvable alternatives when a submission is rejected.

pub mod classifier;
pub mod domain;
pub mod features;
pub mod router;
pub mod search;
pub mod service;

#[cfg(test)]
mod tests;

pub use classifier::{Classifier, ClassifierError, LogisticEnsemble, LogisticMember, ModelLoadError};
pub use domain::{
    Alternative, AlternativeView, Assessment, AssessmentView, BaseScenario, FeatureVector,
    FieldValue, Prediction, RawInput,
};
pub use features::{engineer, EmploymentStatus, StateCluster};
pub use router::prequal_router;
pub use search::{find_alternatives, CandidateOutcome, SearchReport};
pub use service::{PrequalError, PrequalificationService};
