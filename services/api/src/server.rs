use crate::cli::ServeArgs;
use crate::controller::DashboardShell;
use crate::infra::{AppState, DashboardState};
use crate::routes::with_dashboard_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use jobs_intel::config::{AppConfig, BackendConfig};
use jobs_intel::dashboard::DataClient;
use jobs_intel::error::AppError;
use jobs_intel::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs, api_base: Option<String>) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(api_base) = api_base {
        config.backend = BackendConfig::new(api_base)?;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let client = DataClient::new(&config.backend.api_base)?;
    let (shell, initial) = DashboardShell::start(args.route.as_deref());
    info!(route = %initial.route, "initial view activated");

    let app = with_dashboard_routes(DashboardState::new(client, shell))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        api_base = %config.backend.api_base,
        "jobs intelligence dashboard ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
