use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use super::classifier::{Classifier, ClassifierError};
use super::domain::{Assessment, BaseScenario, FeatureVector, RawInput};
use super::features::engineer;
use super::search;

/// Service composing feature engineering, the classifier and the alternative search.
pub struct PrequalificationService<C: ?Sized> {
    simulated_latency: Duration,
    classifier: Arc<C>,
}

impl<C> PrequalificationService<C>
where
    C: Classifier + ?Sized + 'static,
{
    pub fn new(classifier: Arc<C>) -> Self {
        Self {
            simulated_latency: Duration::ZERO,
            classifier,
        }
    }

    /// Delay the HTTP layer waits before answering, for demo pacing.
    pub fn with_simulated_latency(mut self, latency: Duration) -> Self {
        self.simulated_latency = latency;
        self
    }

    pub fn simulated_latency(&self) -> Duration {
        self.simulated_latency
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    pub fn features(&self, raw: &RawInput) -> FeatureVector {
        engineer(raw)
    }

    /// Score the submitted scenario and, when it is rejected, look for approvable
    /// alternatives. Only a failure on the submitted scenario itself is an error.
    pub fn assess(&self, raw: &RawInput) -> Result<Assessment, PrequalError> {
        let base = BaseScenario::from_input(raw);
        let prediction = self.classifier.predict(&engineer(raw))?;

        let alternatives = if prediction.approved {
            None
        } else {
            let report = search::search(raw, self.classifier.as_ref());
            info!(
                visited = report.visited,
                evaluated = report.evaluated,
                failures = report.failures,
                capped = report.hit_iteration_cap,
                found = report.alternatives.len(),
                "alternative search finished"
            );
            Some(report.alternatives)
        };

        info!(
            approved = prediction.approved,
            probability = prediction.probability,
            amount = base.amount,
            term = base.term,
            "pre-qualification assessed"
        );

        Ok(Assessment {
            base,
            approved: prediction.approved,
            probability: prediction.probability,
            confidence_pct: prediction.confidence_pct(),
            alternatives,
        })
    }
}

/// Error raised by the pre-qualification service.
#[derive(Debug, thiserror::Error)]
pub enum PrequalError {
    #[error("could not score the submitted scenario: {0}")]
    Classifier(#[from] ClassifierError),
}
