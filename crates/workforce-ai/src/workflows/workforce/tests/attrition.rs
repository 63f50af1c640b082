use super::common::*;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

use crate::workflows::workforce::attrition::{
    predict_for_detail, AttritionPrediction, AttritionRisk, BulkAnalysisError, BulkRiskAnalyzer,
    HeuristicRiskPredictor, RiskPredictor,
};

fn five_employees() -> Vec<crate::workflows::workforce::domain::Employee> {
    vec![
        employee(1, "Ada", 3, 5),
        employee(2, "Ben", 6, 4),
        employee(3, "Cy", 9, 5),
        employee(4, "Dee", 8, 2),
        employee(5, "Eli", 7, 3),
    ]
}

#[tokio::test]
async fn failed_prediction_is_left_out_of_the_histogram() {
    let predictor = Arc::new(ScriptedPredictor::failing([3]));
    let analyzer = BulkRiskAnalyzer::new(Arc::clone(&predictor));

    let histogram = analyzer
        .analyze(&five_employees())
        .await
        .expect("partial failures do not fail the run");

    assert_eq!(histogram.total(), 4);
    assert_eq!(histogram.high, 2);
    assert_eq!(histogram.medium, 2);
    assert_eq!(histogram.low, 0);
    assert_eq!(predictor.calls(), 5);
    assert!(!analyzer.is_running());
}

#[tokio::test]
async fn histogram_matches_classifier_when_every_call_succeeds() {
    let employees = five_employees();
    let analyzer = BulkRiskAnalyzer::new(Arc::new(ScriptedPredictor::default()));

    let histogram = analyzer.analyze(&employees).await.expect("analysis runs");

    let (high, medium, low) = tiers(&employees);
    assert_eq!((histogram.high, histogram.medium, histogram.low), (high, medium, low));
}

#[tokio::test]
async fn empty_input_skips_the_predictor() {
    let predictor = Arc::new(ScriptedPredictor::default());
    let analyzer = BulkRiskAnalyzer::new(Arc::clone(&predictor));

    let histogram = analyzer.analyze(&[]).await.expect("empty run");

    assert_eq!(histogram.total(), 0);
    assert_eq!(predictor.calls(), 0);
}

#[tokio::test]
async fn panicking_prediction_fails_the_whole_run() {
    let analyzer = BulkRiskAnalyzer::new(Arc::new(ScriptedPredictor::panicking([2])));

    let err = analyzer
        .analyze(&five_employees())
        .await
        .expect_err("join failure aborts");

    assert!(matches!(err, BulkAnalysisError::Join(_)));
    assert!(!analyzer.is_running(), "guard released after failure");
}

#[tokio::test]
async fn second_run_is_rejected_while_one_is_in_flight() {
    let gate = Arc::new(Notify::new());
    let predictor = Arc::new(ScriptedPredictor::gated(Arc::clone(&gate)));
    let analyzer = Arc::new(BulkRiskAnalyzer::new(Arc::clone(&predictor)));
    let employees = vec![employee(1, "Ada", 8, 4)];

    let running = {
        let analyzer = Arc::clone(&analyzer);
        let employees = employees.clone();
        tokio::spawn(async move { analyzer.analyze(&employees).await })
    };

    while predictor.calls() == 0 {
        tokio::task::yield_now().await;
    }
    assert!(analyzer.is_running());

    let err = analyzer
        .analyze(&employees)
        .await
        .expect_err("re-entry rejected");
    assert!(matches!(err, BulkAnalysisError::AlreadyRunning));
    assert_eq!(predictor.calls(), 1);

    gate.notify_one();
    let histogram = running
        .await
        .expect("task joins")
        .expect("first run completes");
    assert_eq!(histogram.total(), 1);
    assert!(!analyzer.is_running());
}

#[tokio::test]
async fn abandoned_run_keeps_the_guard_until_predictions_settle() {
    let gate = Arc::new(Notify::new());
    let predictor = Arc::new(ScriptedPredictor::gated(Arc::clone(&gate)));
    let analyzer = BulkRiskAnalyzer::new(Arc::clone(&predictor));
    let employees = vec![employee(1, "Ada", 8, 4), employee(2, "Ben", 3, 2)];

    let abandoned =
        tokio::time::timeout(Duration::from_millis(50), analyzer.analyze(&employees)).await;
    assert!(abandoned.is_err(), "caller gave up before the predictions finished");
    assert_eq!(predictor.calls(), 2);
    assert!(analyzer.is_running());

    let err = analyzer
        .analyze(&employees)
        .await
        .expect_err("outstanding predictions still hold the guard");
    assert!(matches!(err, BulkAnalysisError::AlreadyRunning));
    assert_eq!(predictor.calls(), 2);

    gate.notify_waiters();
    while analyzer.is_running() {
        tokio::task::yield_now().await;
    }
    assert_eq!(predictor.calls(), 2, "no second fan-out was started");
}

#[tokio::test]
async fn detail_view_distinguishes_unconfigured_from_failure() {
    let employee = employee(7, "Gus", 5, 4);

    let unconfigured = ScriptedPredictor::unconfigured();
    assert_eq!(predict_for_detail(&unconfigured, &employee).await, None);

    let failing = ScriptedPredictor::failing([7]);
    let fallback = predict_for_detail(&failing, &employee)
        .await
        .expect("fallback surfaced");
    assert_eq!(fallback, AttritionPrediction::analysis_failed());
    assert_eq!(fallback.risk, AttritionRisk::High);
}

#[tokio::test]
async fn heuristic_predictor_follows_the_classifier() {
    let predictor = HeuristicRiskPredictor;
    for (satisfaction, performance) in [(4, 5), (7, 3), (10, 5), (1, 1)] {
        let employee = employee(1, "Ada", satisfaction, performance);
        let prediction = predictor.predict(&employee).await.expect("offline prediction");
        assert_eq!(prediction.risk, employee.heuristic_risk());
        assert_eq!(prediction.recommendation_items().len(), 3);
    }
}
