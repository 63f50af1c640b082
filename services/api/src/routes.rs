use crate::infra::{deserialize_optional_date, AppState};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;
use workforce_ai::error::AppError;
use workforce_ai::workflows::import::RosterImporter;
use workforce_ai::workflows::workforce::{
    workforce_router, BulkRiskAnalyzer, DashboardSummary, Employee, HeuristicRiskPredictor,
    RiskHistogram, RiskPredictor, WorkforceApi,
};

#[derive(Debug, Deserialize)]
pub(crate) struct RosterPreviewRequest {
    pub(crate) csv: String,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) today: Option<NaiveDate>,
    #[serde(default)]
    pub(crate) include_employees: bool,
}

/// Dashboard and offline risk tiers for an uploaded export, without touching the live store.
#[derive(Debug, Serialize)]
pub(crate) struct RosterPreviewResponse {
    pub(crate) today: NaiveDate,
    pub(crate) dashboard: DashboardSummary,
    pub(crate) risk: RiskHistogram,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) employees: Option<Vec<Employee>>,
}

pub(crate) fn with_workforce_routes<P>(api: Arc<WorkforceApi<P>>) -> axum::Router
where
    P: RiskPredictor + ?Sized + 'static,
{
    workforce_router(api)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/roster/preview",
            axum::routing::post(roster_preview_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn roster_preview_endpoint(
    Json(payload): Json<RosterPreviewRequest>,
) -> Result<Json<RosterPreviewResponse>, AppError> {
    let RosterPreviewRequest {
        csv,
        today,
        include_employees,
    } = payload;

    let employees = RosterImporter::employees_from_reader(Cursor::new(csv.into_bytes()))?;
    let today = today.unwrap_or_else(|| Utc::now().date_naive());
    let dashboard = DashboardSummary::build(&employees, today);
    let risk = BulkRiskAnalyzer::new(Arc::new(HeuristicRiskPredictor))
        .analyze(&employees)
        .await?;

    Ok(Json(RosterPreviewResponse {
        today,
        dashboard,
        risk,
        employees: include_employees.then_some(employees),
    }))
}
