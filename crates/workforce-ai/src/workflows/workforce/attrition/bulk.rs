use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::classifier::AttritionRisk;
use super::predictor::RiskPredictor;
use crate::workflows::workforce::domain::Employee;

/// Employee count per predicted tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskHistogram {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl RiskHistogram {
    pub fn record(&mut self, risk: AttritionRisk) {
        match risk {
            AttritionRisk::High => self.high += 1,
            AttritionRisk::Medium => self.medium += 1,
            AttritionRisk::Low => self.low += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.high + self.medium + self.low
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BulkAnalysisError {
    #[error("a bulk attrition analysis is already running")]
    AlreadyRunning,
    #[error("bulk attrition analysis aborted: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Fans one prediction per employee out to the collaborator and folds the
/// answers into a [`RiskHistogram`].
pub struct BulkRiskAnalyzer<P: ?Sized> {
    predictor: Arc<P>,
    in_flight: Arc<AtomicBool>,
}

impl<P> BulkRiskAnalyzer<P>
where
    P: RiskPredictor + ?Sized + 'static,
{
    pub fn new(predictor: Arc<P>) -> Self {
        Self {
            predictor,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn predictor(&self) -> &Arc<P> {
        &self.predictor
    }

    pub fn is_running(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Employees whose prediction fails are left out of the histogram. The
    /// whole run fails only when a spawned prediction cannot be joined.
    ///
    /// The run lives in its own task: dropping the returned future does not
    /// cancel it, and the analyzer stays busy until every prediction settles.
    pub async fn analyze(&self, employees: &[Employee]) -> Result<RiskHistogram, BulkAnalysisError> {
        let permit = InFlightPermit::acquire(&self.in_flight)?;

        if employees.is_empty() {
            return Ok(RiskHistogram::default());
        }

        info!(employees = employees.len(), "starting bulk attrition analysis");

        let predictor = Arc::clone(&self.predictor);
        let snapshot = employees.to_vec();
        let supervisor = tokio::spawn(async move {
            let _permit = permit;
            fan_out(predictor, snapshot).await
        });

        supervisor.await?
    }
}

async fn fan_out<P>(predictor: Arc<P>, employees: Vec<Employee>) -> Result<RiskHistogram, BulkAnalysisError>
where
    P: RiskPredictor + ?Sized + 'static,
{
    let handles = employees.into_iter().map(|employee| {
        let predictor = Arc::clone(&predictor);
        tokio::spawn(async move {
            let outcome = predictor.predict(&employee).await;
            (employee.id, outcome)
        })
    });

    let mut histogram = RiskHistogram::default();
    for joined in join_all(handles).await {
        let (employee_id, outcome) = joined?;
        match outcome {
            Ok(prediction) => histogram.record(prediction.risk),
            Err(err) => {
                warn!(employee_id, error = %err, "excluding employee from risk histogram")
            }
        }
    }

    info!(
        high = histogram.high,
        medium = histogram.medium,
        low = histogram.low,
        "bulk attrition analysis finished"
    );
    Ok(histogram)
}

struct InFlightPermit {
    flag: Arc<AtomicBool>,
}

impl InFlightPermit {
    fn acquire(flag: &Arc<AtomicBool>) -> Result<Self, BulkAnalysisError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| BulkAnalysisError::AlreadyRunning)?;
        Ok(Self {
            flag: Arc::clone(flag),
        })
    }
}

impl Drop for InFlightPermit {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
