//! HR administration core: roster, attrition risk, deadline alerts, leave,
//! recruitment, performance reviews and the in-memory store tying them
//! together.

pub mod attrition;
pub mod dashboard;
pub mod domain;
mod ids;
pub mod leave;
pub mod notifications;
pub mod performance;
pub mod recruitment;
pub mod roster;
pub mod router;
pub mod store;
pub mod validation;

#[cfg(test)]
pub(crate) mod tests;

pub use attrition::{
    classify, predict_for_detail, AttritionPrediction, AttritionRisk, BulkAnalysisError,
    BulkRiskAnalyzer, GeminiRiskPredictor, HeuristicRiskPredictor, PredictionError,
    RiskHistogram, RiskPredictor,
};
pub use dashboard::DashboardSummary;
pub use domain::{
    Announcement, AnnouncementCategory, Candidate, CandidateStage, Department, Employee,
    EmployeeStatus, Goal, GoalStatus, JobOpening, JobStatus, LeaveRequest, LeaveStatus, LeaveType,
    Notification, NotificationKind, PerformanceSnapshot, Review, ReviewCycle, ReviewStatus, Task,
    TaskPriority, TaskStatus,
};
pub use ids::IdSequence;
pub use leave::{inclusive_day_count, DateRange, LeaveError, LeaveLedger, LeaveReport};
pub use notifications::{upcoming_deadlines, DeadlineScanner, NotificationCenter, NotificationDraft};
pub use performance::{cycle_progress, cycle_reviews, ReviewEntry};
pub use recruitment::{pipeline_board, PipelineColumn};
pub use roster::{
    roster_view, task_view, EmployeeSortKey, Filter, RosterQuery, SortDirection, SortState,
    TaskQuery, TaskSortKey,
};
pub use router::{workforce_router, RosterParams, WorkforceApi};
pub use store::{StoreError, WorkforceSnapshot, WorkforceStore};
pub use validation::{
    AnnouncementForm, CandidateForm, EmployeeForm, FieldError, FormRejected, GoalForm,
    JobOpeningForm, LeaveForm, ReviewForm, TaskForm, Validate,
};
