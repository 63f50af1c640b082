use crate::cli::ServeArgs;
use crate::infra::{seed_snapshot, AppState};
use crate::routes::with_workforce_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use chrono::Utc;
use std::path::Path;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};
use workforce_ai::config::AppConfig;
use workforce_ai::error::AppError;
use workforce_ai::telemetry;
use workforce_ai::workflows::workforce::{
    GeminiRiskPredictor, WorkforceApi, WorkforceSnapshot, WorkforceStore,
};

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

    let snapshot = match args.snapshot.as_deref() {
        Some(path) => load_snapshot_file(path)?,
        None => seed_snapshot()?,
    };
    let mut store =
        WorkforceStore::from_snapshot(snapshot).with_deadline_window(config.alerts.deadline_window());
    let alerts = store.run_deadline_scan(Utc::now());

    if !config.attrition.is_configured() {
        warn!("attrition model credentials missing; per-employee predictions are disabled");
    }
    let predictor = Arc::new(GeminiRiskPredictor::new(config.attrition.clone()));
    let api = Arc::new(WorkforceApi::new(store, predictor));

    let app = with_workforce_routes(api)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, alerts, "workforce service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn load_snapshot_file(path: &Path) -> Result<WorkforceSnapshot, AppError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_snapshot_file_is_an_io_error() {
        let err = load_snapshot_file(Path::new("./no-such-snapshot.json")).expect_err("missing");
        assert!(matches!(err, AppError::Io(_)));
    }
}
