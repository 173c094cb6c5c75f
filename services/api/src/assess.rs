use crate::infra::{load_classifier, read_submission};
use clap::Args;
use formuloan::config::AppConfig;
use formuloan::error::AppError;
use formuloan::workflows::prequal::{Assessment, AssessmentView, PrequalificationService};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct AssessArgs {
    /// Submission JSON file (flat object of form fields); `-` reads stdin
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Ensemble model JSON overriding FORMULOAN_MODEL_PATH
    #[arg(long)]
    pub(crate) model: Option<PathBuf>,
    /// Print the assessment as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_assess(args: AssessArgs) -> Result<(), AppError> {
    let AssessArgs { input, model, json } = args;

    let config = AppConfig::load()?;
    let classifier = load_classifier(&config.prequal, model.as_deref())?;
    let service = PrequalificationService::new(Arc::new(classifier));

    let raw = read_submission(&input)?;
    let assessment = service.assess(&raw)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&assessment.view())?);
    } else {
        print!("{}", AssessmentReport(&assessment));
    }

    Ok(())
}

/// Text report of an assessment, one line per alternative.
pub(crate) struct AssessmentReport<'a>(pub(crate) &'a Assessment);

impl fmt::Display for AssessmentReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let assessment = self.0;
        let AssessmentView {
            approved,
            confidence_pct,
            alternatives,
            ..
        } = assessment.view();
        let base = &assessment.base;

        writeln!(
            f,
            "Requested: ${} over {} months at {:.1}%",
            base.amount,
            base.term,
            base.yield_rate * 100.0
        )?;
        if approved {
            return writeln!(f, "LOAN APPROVED ({confidence_pct}% confidence in completion)");
        }

        writeln!(f, "LOAN REJECTED ({confidence_pct}% confidence in completion)")?;

        match alternatives {
            Some(alternatives) if !alternatives.is_empty() => {
                writeln!(f, "\nThis loan could be approved with:")?;
                for (index, alt) in alternatives.iter().enumerate() {
                    writeln!(
                        f,
                        "- Alternative {}: ${} ({:+}) | {} months ({:+}) | {:.1}% ({:+.1}%) | ~${:.2}/month | {:.1}% confidence",
                        index + 1,
                        alt.amount,
                        alt.amount_delta,
                        alt.term,
                        alt.term_delta,
                        alt.yield_rate * 100.0,
                        alt.yield_delta * 100.0,
                        alt.monthly_payment,
                        alt.probability * 100.0
                    )?;
                }
                Ok(())
            }
            _ => writeln!(
                f,
                "\nNo alternatives found. Consider improving credit score or reducing debt-to-income ratio."
            ),
        }
    }
}
