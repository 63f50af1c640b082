use super::common::*;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::workflows::workforce::attrition::{HeuristicRiskPredictor, RiskPredictor};
use crate::workflows::workforce::router::{workforce_router, RosterParams, WorkforceApi};
use crate::workflows::workforce::store::WorkforceStore;

fn router_with<P>(store: WorkforceStore, predictor: Arc<P>) -> Router
where
    P: RiskPredictor + ?Sized + 'static,
{
    workforce_router(Arc::new(WorkforceApi::new(store, predictor)))
}

fn heuristic_router() -> Router {
    let predictor: Arc<dyn RiskPredictor> = Arc::new(HeuristicRiskPredictor);
    router_with(store(), predictor)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

fn post(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn ids(body: &Value) -> Vec<u64> {
    body.as_array()
        .expect("array body")
        .iter()
        .filter_map(|employee| employee["id"].as_u64())
        .collect()
}

#[tokio::test]
async fn roster_endpoint_applies_filters_and_sort() {
    let response = heuristic_router()
        .oneshot(get(
            "/api/v1/employees?department=engineering&sort=salary&direction=desc",
        ))
        .await
        .expect("response");
    let (status, body) = json_body(response).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![1, 4]);
}

#[tokio::test]
async fn roster_endpoint_treats_all_as_no_filter() {
    let response = heuristic_router()
        .oneshot(get("/api/v1/employees?department=all&status=&search=an"))
        .await
        .expect("response");
    let (status, body) = json_body(response).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![3, 4, 5]);
}

#[tokio::test]
async fn unknown_filter_value_is_a_bad_request() {
    let response = heuristic_router()
        .oneshot(get("/api/v1/employees?department=Legal"))
        .await
        .expect("response");
    let (status, body) = json_body(response).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .is_some_and(|message| message.contains("Legal")));
}

#[test]
fn sort_direction_without_key_is_ignored() {
    let params = RosterParams {
        direction: Some("desc".to_string()),
        ..RosterParams::default()
    };
    let query = params.into_query().expect("valid params");
    assert_eq!(query.sort.key, None);
}

#[tokio::test]
async fn adding_an_employee_returns_created() {
    let response = heuristic_router()
        .oneshot(post_json(
            "/api/v1/employees",
            json!({
                "name": "Grace Hopper",
                "email": "grace@example.com",
                "role": "Staff Engineer",
                "department": "Engineering",
                "salary": 150000,
                "start_date": "2024-07-01"
            }),
        ))
        .await
        .expect("response");
    let (status, body) = json_body(response).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 6);
    assert_eq!(body["status"], "Active");
    assert_eq!(body["leave_balance"], 20);
}

#[tokio::test]
async fn invalid_employee_lists_failing_fields() {
    let response = heuristic_router()
        .oneshot(post_json(
            "/api/v1/employees",
            json!({
                "name": "",
                "email": "grace",
                "role": "Staff Engineer",
                "department": "Engineering",
                "salary": 150000,
                "start_date": "2024-07-01"
            }),
        ))
        .await
        .expect("response");
    let (status, body) = json_body(response).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let fields: Vec<&str> = body["fields"]
        .as_array()
        .expect("field list")
        .iter()
        .filter_map(|field| field["field"].as_str())
        .collect();
    assert_eq!(fields, vec!["name", "email"]);
}

#[tokio::test]
async fn analyze_counts_the_filtered_view() {
    let predictor = Arc::new(ScriptedPredictor::failing([5]));
    let router = router_with(store(), Arc::clone(&predictor));

    let response = router
        .oneshot(post("/api/v1/employees/analyze?status=active"))
        .await
        .expect("response");
    let (status, body) = json_body(response).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["analyzed"], 4);
    assert_eq!(body["classified"], 3);
    assert_eq!(body["histogram"]["low"], 3);
    assert_eq!(predictor.calls(), 4);
}

#[tokio::test]
async fn analyze_reports_a_crashed_prediction_as_bad_gateway() {
    let router = router_with(store(), Arc::new(ScriptedPredictor::panicking([2])));

    let response = router
        .oneshot(post("/api/v1/employees/analyze"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn attrition_detail_uses_the_predictor() {
    let response = heuristic_router()
        .oneshot(get("/api/v1/employees/2/attrition"))
        .await
        .expect("response");
    let (status, body) = json_body(response).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["employee_id"], 2);
    assert_eq!(body["risk"], "Low");
    assert_eq!(body["heuristic_risk"], "Low");
    assert_eq!(body["recommendations"].as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn attrition_detail_without_predictor_is_unavailable() {
    let router = router_with(store(), Arc::new(ScriptedPredictor::unconfigured()));

    let response = router
        .oneshot(get("/api/v1/employees/1/attrition"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn attrition_detail_falls_back_when_prediction_fails() {
    let router = router_with(store(), Arc::new(ScriptedPredictor::failing([1])));

    let response = router
        .oneshot(get("/api/v1/employees/1/attrition"))
        .await
        .expect("response");
    let (status, body) = json_body(response).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["risk"], "High");
    assert_eq!(body["heuristic_risk"], "Low");
}

#[tokio::test]
async fn attrition_for_unknown_employee_is_not_found() {
    let response = heuristic_router()
        .oneshot(get("/api/v1/employees/99/attrition"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn leave_is_approved_once() {
    let router = heuristic_router();

    let response = router
        .clone()
        .oneshot(post("/api/v1/leave-requests/1/approve"))
        .await
        .expect("response");
    let (status, body) = json_body(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Approved");

    let again = router
        .clone()
        .oneshot(post("/api/v1/leave-requests/1/approve"))
        .await
        .expect("response");
    assert_eq!(again.status(), StatusCode::CONFLICT);

    let roster = router
        .oneshot(get("/api/v1/employees?search=alice"))
        .await
        .expect("response");
    let (_, body) = json_body(roster).await;
    assert_eq!(body[0]["leave_balance"], 10);
}

#[tokio::test]
async fn rejecting_unknown_leave_is_not_found() {
    let response = heuristic_router()
        .oneshot(post("/api/v1/leave-requests/42/reject"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn notifications_can_be_marked_read() {
    let mut seeded = store();
    seeded.run_deadline_scan(instant(2024, 6, 1, 8));
    let predictor: Arc<dyn RiskPredictor> = Arc::new(HeuristicRiskPredictor);
    let router = router_with(seeded, predictor);

    let (status, body) = json_body(
        router
            .clone()
            .oneshot(get("/api/v1/notifications"))
            .await
            .expect("response"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["unread"], 1);
    assert_eq!(body["items"][0]["kind"], "alert");

    let (_, body) = json_body(
        router
            .clone()
            .oneshot(post("/api/v1/notifications/read"))
            .await
            .expect("response"),
    )
    .await;
    assert_eq!(body["marked"], 1);

    let (_, body) = json_body(
        router
            .oneshot(get("/api/v1/notifications"))
            .await
            .expect("response"),
    )
    .await;
    assert_eq!(body["unread"], 0);
}

#[tokio::test]
async fn dashboard_reports_headcount() {
    let (status, body) = json_body(
        heuristic_router()
            .oneshot(get("/api/v1/dashboard"))
            .await
            .expect("response"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_employees"], 5);
    assert_eq!(body["active_employees"], 4);
}
