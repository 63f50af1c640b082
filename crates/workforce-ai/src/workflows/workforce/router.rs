use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::Mutex;
use tracing::warn;

use super::attrition::{predict_for_detail, BulkAnalysisError, BulkRiskAnalyzer, RiskPredictor};
use super::domain::{Department, Employee, EmployeeStatus};
use super::roster::{EmployeeSortKey, Filter, RosterQuery, SortDirection, SortState};
use super::store::{StoreError, WorkforceStore};
use super::validation::EmployeeForm;

/// Shared state behind the workforce endpoints.
pub struct WorkforceApi<P: ?Sized> {
    store: Mutex<WorkforceStore>,
    analyzer: BulkRiskAnalyzer<P>,
}

impl<P> WorkforceApi<P>
where
    P: RiskPredictor + ?Sized + 'static,
{
    pub fn new(store: WorkforceStore, predictor: Arc<P>) -> Self {
        Self {
            store: Mutex::new(store),
            analyzer: BulkRiskAnalyzer::new(predictor),
        }
    }

    pub fn store(&self) -> &Mutex<WorkforceStore> {
        &self.store
    }

    pub fn analyzer(&self) -> &BulkRiskAnalyzer<P> {
        &self.analyzer
    }
}

/// Router builder exposing the roster, attrition, leave, notification and
/// dashboard endpoints.
pub fn workforce_router<P>(api: Arc<WorkforceApi<P>>) -> Router
where
    P: RiskPredictor + ?Sized + 'static,
{
    Router::new()
        .route(
            "/api/v1/employees",
            get(list_employees_handler::<P>).post(add_employee_handler::<P>),
        )
        .route("/api/v1/employees/analyze", post(analyze_handler::<P>))
        .route(
            "/api/v1/employees/:employee_id/attrition",
            get(attrition_handler::<P>),
        )
        .route(
            "/api/v1/leave-requests/:request_id/approve",
            post(approve_leave_handler::<P>),
        )
        .route(
            "/api/v1/leave-requests/:request_id/reject",
            post(reject_leave_handler::<P>),
        )
        .route("/api/v1/notifications", get(notifications_handler::<P>))
        .route(
            "/api/v1/notifications/read",
            post(mark_read_handler::<P>),
        )
        .route("/api/v1/dashboard", get(dashboard_handler::<P>))
        .with_state(api)
}

/// Query string accepted by the roster endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct RosterParams {
    pub search: Option<String>,
    pub department: Option<String>,
    pub status: Option<String>,
    pub sort: Option<String>,
    pub direction: Option<String>,
}

impl RosterParams {
    /// Blank values and `all` mean "no filter".
    pub fn into_query(self) -> Result<RosterQuery, String> {
        let department = match selected(self.department) {
            Some(raw) => Filter::Only(
                Department::parse(&raw).ok_or_else(|| format!("unknown department '{raw}'"))?,
            ),
            None => Filter::All,
        };
        let status = match selected(self.status) {
            Some(raw) => Filter::Only(
                EmployeeStatus::parse(&raw).ok_or_else(|| format!("unknown status '{raw}'"))?,
            ),
            None => Filter::All,
        };
        let sort = match selected(self.sort) {
            Some(raw) => {
                let key = EmployeeSortKey::parse(&raw)
                    .ok_or_else(|| format!("unknown sort key '{raw}'"))?;
                let direction = match selected(self.direction) {
                    Some(raw) => SortDirection::parse(&raw)
                        .ok_or_else(|| format!("unknown sort direction '{raw}'"))?,
                    None => SortDirection::Asc,
                };
                SortState::by(key, direction)
            }
            None => SortState::unsorted(),
        };

        Ok(RosterQuery {
            search: self.search.unwrap_or_default(),
            department,
            status,
            sort,
        })
    }
}

fn selected(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty() && !raw.eq_ignore_ascii_case("all"))
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let payload = json!({ "error": message.into() });
    (status, axum::Json(payload)).into_response()
}

fn store_error_response(error: StoreError) -> Response {
    match error {
        StoreError::Invalid(rejected) => {
            let payload = json!({
                "error": rejected.to_string(),
                "fields": rejected.0,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        StoreError::NotFound { .. } => error_response(StatusCode::NOT_FOUND, error.to_string()),
        StoreError::Leave(_) | StoreError::StageRegression { .. } => {
            error_response(StatusCode::CONFLICT, error.to_string())
        }
    }
}

async fn filtered_roster<P>(
    api: &WorkforceApi<P>,
    params: RosterParams,
) -> Result<Vec<Employee>, Response>
where
    P: RiskPredictor + ?Sized + 'static,
{
    let query = params
        .into_query()
        .map_err(|message| error_response(StatusCode::BAD_REQUEST, message))?;
    let store = api.store.lock().await;
    Ok(store.roster(&query).into_iter().cloned().collect())
}

pub(crate) async fn list_employees_handler<P>(
    State(api): State<Arc<WorkforceApi<P>>>,
    Query(params): Query<RosterParams>,
) -> Response
where
    P: RiskPredictor + ?Sized + 'static,
{
    match filtered_roster(&api, params).await {
        Ok(employees) => (StatusCode::OK, axum::Json(employees)).into_response(),
        Err(response) => response,
    }
}

pub(crate) async fn add_employee_handler<P>(
    State(api): State<Arc<WorkforceApi<P>>>,
    axum::Json(form): axum::Json<EmployeeForm>,
) -> Response
where
    P: RiskPredictor + ?Sized + 'static,
{
    let mut store = api.store.lock().await;
    match store.add_employee(form, Utc::now().date_naive()) {
        Ok(employee) => (StatusCode::CREATED, axum::Json(employee.clone())).into_response(),
        Err(error) => store_error_response(error),
    }
}

/// Bulk analysis over the roster view selected by the query string.
pub(crate) async fn analyze_handler<P>(
    State(api): State<Arc<WorkforceApi<P>>>,
    Query(params): Query<RosterParams>,
) -> Response
where
    P: RiskPredictor + ?Sized + 'static,
{
    let employees = match filtered_roster(&api, params).await {
        Ok(employees) => employees,
        Err(response) => return response,
    };

    match api.analyzer.analyze(&employees).await {
        Ok(histogram) => {
            let payload = json!({
                "analyzed": employees.len(),
                "classified": histogram.total(),
                "histogram": histogram,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(BulkAnalysisError::AlreadyRunning) => error_response(
            StatusCode::CONFLICT,
            BulkAnalysisError::AlreadyRunning.to_string(),
        ),
        Err(error @ BulkAnalysisError::Join(_)) => {
            warn!(error = %error, "bulk attrition analysis failed");
            error_response(StatusCode::BAD_GATEWAY, error.to_string())
        }
    }
}

pub(crate) async fn attrition_handler<P>(
    State(api): State<Arc<WorkforceApi<P>>>,
    Path(employee_id): Path<u64>,
) -> Response
where
    P: RiskPredictor + ?Sized + 'static,
{
    let employee = {
        let store = api.store.lock().await;
        store.employee(employee_id).cloned()
    };
    let Some(employee) = employee else {
        return store_error_response(StoreError::not_found("employee", employee_id));
    };

    match predict_for_detail(api.analyzer.predictor().as_ref(), &employee).await {
        Some(prediction) => {
            let payload = json!({
                "employee_id": employee.id,
                "heuristic_risk": employee.heuristic_risk(),
                "risk": prediction.risk,
                "reason": prediction.reason,
                "recommendations": prediction.recommendation_items(),
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        None => error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            "attrition prediction is not configured",
        ),
    }
}

pub(crate) async fn approve_leave_handler<P>(
    State(api): State<Arc<WorkforceApi<P>>>,
    Path(request_id): Path<u64>,
) -> Response
where
    P: RiskPredictor + ?Sized + 'static,
{
    let mut store = api.store.lock().await;
    match store.approve_leave(request_id) {
        Ok(request) => (StatusCode::OK, axum::Json(request.clone())).into_response(),
        Err(error) => store_error_response(error),
    }
}

pub(crate) async fn reject_leave_handler<P>(
    State(api): State<Arc<WorkforceApi<P>>>,
    Path(request_id): Path<u64>,
) -> Response
where
    P: RiskPredictor + ?Sized + 'static,
{
    let mut store = api.store.lock().await;
    match store.reject_leave(request_id) {
        Ok(request) => (StatusCode::OK, axum::Json(request.clone())).into_response(),
        Err(error) => store_error_response(error),
    }
}

pub(crate) async fn notifications_handler<P>(State(api): State<Arc<WorkforceApi<P>>>) -> Response
where
    P: RiskPredictor + ?Sized + 'static,
{
    let store = api.store.lock().await;
    let center = store.notifications();
    let payload = json!({
        "unread": center.unread_count(),
        "items": center.items(),
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn mark_read_handler<P>(State(api): State<Arc<WorkforceApi<P>>>) -> Response
where
    P: RiskPredictor + ?Sized + 'static,
{
    let marked = api.store.lock().await.mark_all_notifications_read();
    (StatusCode::OK, axum::Json(json!({ "marked": marked }))).into_response()
}

pub(crate) async fn dashboard_handler<P>(State(api): State<Arc<WorkforceApi<P>>>) -> Response
where
    P: RiskPredictor + ?Sized + 'static,
{
    let summary = api.store.lock().await.dashboard(Utc::now().date_naive());
    (StatusCode::OK, axum::Json(summary)).into_response()
}
