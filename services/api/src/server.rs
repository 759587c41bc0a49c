use crate::cli::ServeArgs;
use crate::infra::{AppState, ConfiguredStore, InMemoryPoolStore, JsonFilePoolStore};
use crate::routes::with_scoring_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use baby_pool::config::AppConfig;
use baby_pool::error::AppError;
use baby_pool::scoring::{ScoringRules, ScoringService};
use baby_pool::telemetry;
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
    if let Some(data) = args.data.take() {
        config.store.data_path = Some(data);
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = match &config.store.data_path {
        Some(path) => {
            info!(path = %path.display(), "serving pool snapshot file");
            ConfiguredStore::File(JsonFilePoolStore::new(path))
        }
        None => {
            info!("no pool snapshot configured; using an empty in-memory pool");
            ConfiguredStore::Memory(InMemoryPoolStore::default())
        }
    };
    let scoring_service = Arc::new(ScoringService::new(
        Arc::new(store),
        ScoringRules::default(),
    ));

    let app = with_scoring_routes(scoring_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "baby pool scorer ready");

    axum::serve(listener, app).await?;
    Ok(())
}
