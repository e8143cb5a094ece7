use crate::cli::ServeArgs;
use crate::infra::{
    load_projects, sample_counterparties, sample_projects, AppState, InMemoryDealProvider,
    LoggingMatchNotifier,
};
use crate::routes::with_deal_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use deal_engine::config::AppConfig;
use deal_engine::deals::DealService;
use deal_engine::error::AppError;
use deal_engine::telemetry;
use std::sync::atomic::Ordering;
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
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let projects = match args.projects.take() {
        Some(path) => load_projects(&path)?,
        None => sample_projects(),
    };
    let provider = Arc::new(InMemoryDealProvider::new(projects, sample_counterparties()));
    let notifier = Arc::new(LoggingMatchNotifier::default());
    let deal_service = Arc::new(DealService::new(provider, notifier, config.matching));

    let app = with_deal_routes(deal_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        display_cap = config.matching.display_cap,
        min_score = config.matching.min_score,
        "deal engine ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
