use formuloan::config::PrequalConfig;
use formuloan::error::AppError;
use formuloan::workflows::prequal::{LogisticEnsemble, RawInput};
use metrics_exporter_prometheus::PrometheusHandle;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Load the configured ensemble, falling back to the built-in baseline.
pub(crate) fn load_classifier(
    config: &PrequalConfig,
    override_path: Option<&Path>,
) -> Result<LogisticEnsemble, AppError> {
    match override_path.or(config.model_path.as_deref()) {
        Some(path) => {
            let model = LogisticEnsemble::from_path(path)?;
            info!(path = %path.display(), members = model.members.len(), "loaded classifier model");
            Ok(model)
        }
        None => {
            info!("using built-in baseline classifier");
            Ok(LogisticEnsemble::baseline())
        }
    }
}

/// Read a submission from a JSON file, or from stdin when the path is `-`.
pub(crate) fn read_submission(path: &Path) -> Result<RawInput, AppError> {
    let raw = if path == Path::new("-") {
        serde_json::from_reader(io::stdin().lock())?
    } else {
        serde_json::from_reader(BufReader::new(File::open(path)?))?
    };
    Ok(raw)
}
