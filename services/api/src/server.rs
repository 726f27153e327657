use crate::cli::ServeArgs;
use crate::infra::{build_service, match_engine, AppState, ChannelNotificationSender};
use crate::routes::with_triage_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use talent_triage::config::{AppConfig, AppEnvironment};
use talent_triage::error::AppError;
use talent_triage::telemetry;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry, config.environment)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let engine = match_engine(config.matching.vocabulary_path.as_deref())?;
    let seed_demo_data = config.environment == AppEnvironment::Development;
    if seed_demo_data {
        info!("seeding in-memory stores with the demo job");
    }
    let (triage_service, _) = build_service(
        engine,
        ChannelNotificationSender::spawn_delivery(),
        seed_demo_data,
    );

    let app = with_triage_routes(Arc::new(triage_service))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "talent triage service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
