use crate::cli::ServeArgs;
use crate::infra::{load_classifier, AppState};
use crate::routes::with_prequal_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use formuloan::config::AppConfig;
use formuloan::error::AppError;
use formuloan::telemetry;
use formuloan::workflows::prequal::PrequalificationService;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let classifier = load_classifier(&config.prequal, None)?;
    let service = Arc::new(
        PrequalificationService::new(Arc::new(classifier))
            .with_simulated_latency(config.prequal.simulated_latency()),
    );

    let app = with_prequal_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "pre-qualification service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
