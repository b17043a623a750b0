use crate::cli::ServeArgs;
use crate::infra::{matching_service, AppState, OracleStatus};
use crate::routes::with_matching_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use contractor_match::config::AppConfig;
use contractor_match::error::AppError;
use contractor_match::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

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
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        oracle: OracleStatus::from_config(&config.oracle),
    };

    let service = Arc::new(matching_service(&config.oracle)?);
    if !service.is_configured() {
        warn!("OPENAI_API_KEY is not set; scoring requests will fail until it is configured");
    }

    let app = with_matching_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, model = %config.oracle.model, "contractor matching service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
