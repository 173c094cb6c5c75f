use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::json;

use super::classifier::Classifier;
use super::domain::RawInput;
use super::service::{PrequalError, PrequalificationService};

/// Router builder exposing the assessment and feature endpoints.
pub fn prequal_router<C>(service: Arc<PrequalificationService<C>>) -> Router
where
    C: Classifier + ?Sized + 'static,
{
    Router::new()
        .route("/api/v1/prequal/assessments", post(assess_handler::<C>))
        .route("/api/v1/prequal/features", post(features_handler::<C>))
        .with_state(service)
}

pub(crate) async fn assess_handler<C>(
    State(service): State<Arc<PrequalificationService<C>>>,
    axum::Json(raw): axum::Json<RawInput>,
) -> Response
where
    C: Classifier + ?Sized + 'static,
{
    let latency = service.simulated_latency();
    if !latency.is_zero() {
        tokio::time::sleep(latency).await;
    }

    match service.assess(&raw) {
        Ok(assessment) => (StatusCode::OK, axum::Json(assessment.view())).into_response(),
        Err(PrequalError::Classifier(error)) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn features_handler<C>(
    State(service): State<Arc<PrequalificationService<C>>>,
    axum::Json(raw): axum::Json<RawInput>,
) -> Response
where
    C: Classifier + ?Sized + 'static,
{
    let features = service.features(&raw);
    (StatusCode::OK, axum::Json(features)).into_response()
}
