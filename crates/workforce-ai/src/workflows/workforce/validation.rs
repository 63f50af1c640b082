use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::domain::{
    AnnouncementCategory, CandidateStage, Department, EmployeeStatus, GoalStatus, JobStatus,
    LeaveType, ReviewStatus, TaskPriority, TaskStatus,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl FieldError {
    pub const fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every failing field of a submitted form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("form rejected: {}", summarize(.0))]
pub struct FormRejected(pub Vec<FieldError>);

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl FormRejected {
    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().map(|error| error.field)
    }
}

pub trait Validate {
    fn field_errors(&self) -> Vec<FieldError>;

    fn validate(&self) -> Result<(), FormRejected> {
        let errors = self.field_errors();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(FormRejected(errors))
        }
    }
}

/// `local@domain.tld` with no whitespace and a dot after the `@`.
pub fn looks_like_email(raw: &str) -> bool {
    if raw.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = raw.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

fn require_text(errors: &mut Vec<FieldError>, field: &'static str, value: &str) {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, "is required"));
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EmployeeForm {
    pub name: String,
    pub email: String,
    pub role: String,
    pub department: Department,
    pub salary: u32,
    #[serde(default = "active")]
    pub status: EmployeeStatus,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub avatar: Option<String>,
}

fn active() -> EmployeeStatus {
    EmployeeStatus::Active
}

impl Validate for EmployeeForm {
    fn field_errors(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        require_text(&mut errors, "name", &self.name);
        require_text(&mut errors, "role", &self.role);
        if !looks_like_email(self.email.trim()) {
            errors.push(FieldError::new("email", "must be a valid email address"));
        }
        if self.salary == 0 {
            errors.push(FieldError::new("salary", "must be greater than zero"));
        }
        errors
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TaskForm {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub assigned_to_id: u64,
    pub due_date: NaiveDate,
    pub priority: TaskPriority,
    #[serde(default = "to_do")]
    pub status: TaskStatus,
}

fn to_do() -> TaskStatus {
    TaskStatus::ToDo
}

impl Validate for TaskForm {
    fn field_errors(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        require_text(&mut errors, "title", &self.title);
        if self.assigned_to_id == 0 {
            errors.push(FieldError::new("assigned_to_id", "an assignee is required"));
        }
        errors
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LeaveForm {
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
}

impl Validate for LeaveForm {
    fn field_errors(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        require_text(&mut errors, "reason", &self.reason);
        errors
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GoalForm {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub target_date: NaiveDate,
    pub status: GoalStatus,
}

impl Validate for GoalForm {
    fn field_errors(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        require_text(&mut errors, "title", &self.title);
        errors
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AnnouncementForm {
    pub title: String,
    pub content: String,
    pub category: AnnouncementCategory,
}

impl Validate for AnnouncementForm {
    fn field_errors(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        require_text(&mut errors, "title", &self.title);
        errors
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct JobOpeningForm {
    pub title: String,
    pub department: Department,
    pub location: String,
    pub status: JobStatus,
    #[serde(default)]
    pub description: String,
}

impl Validate for JobOpeningForm {
    fn field_errors(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        require_text(&mut errors, "title", &self.title);
        errors
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CandidateForm {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub job_opening_id: u64,
    pub stage: CandidateStage,
    #[serde(default)]
    pub resume_url: String,
}

impl Validate for CandidateForm {
    fn field_errors(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        require_text(&mut errors, "name", &self.name);
        errors
    }
}

/// Upsert payload for a review, keyed by `(review_cycle_id, employee_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReviewForm {
    pub review_cycle_id: u64,
    pub employee_id: u64,
    pub status: ReviewStatus,
    #[serde(default)]
    pub manager_feedback: String,
    #[serde(default)]
    pub employee_self_assessment: String,
    #[serde(default)]
    pub final_rating: u8,
    #[serde(default)]
    pub completed_at: Option<NaiveDate>,
}

impl Validate for ReviewForm {
    fn field_errors(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        let completed = self.status == ReviewStatus::Completed;
        match (completed, self.completed_at.is_some()) {
            (true, false) => errors.push(FieldError::new(
                "completed_at",
                "is required for a completed review",
            )),
            (false, true) => errors.push(FieldError::new(
                "completed_at",
                "must be empty until the review is completed",
            )),
            _ => {}
        }
        if completed && !(1..=5).contains(&self.final_rating) {
            errors.push(FieldError::new("final_rating", "must be between 1 and 5"));
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employee_form() -> EmployeeForm {
        EmployeeForm {
            name: "Grace Hopper".to_string(),
            email: "grace@example.com".to_string(),
            role: "Engineer".to_string(),
            department: Department::Engineering,
            salary: 120_000,
            status: EmployeeStatus::Active,
            start_date: NaiveDate::from_ymd_opt(2022, 1, 10).expect("valid date"),
            avatar: None,
        }
    }

    #[test]
    fn email_shape() {
        assert!(looks_like_email("a@b.co"));
        assert!(!looks_like_email("a@b"));
        assert!(!looks_like_email("@b.co"));
        assert!(!looks_like_email("a b@c.io"));
        assert!(!looks_like_email("a@b@c.io"));
        assert!(!looks_like_email("a@.io"));
    }

    #[test]
    fn reports_every_failing_field() {
        let form = EmployeeForm {
            name: "  ".to_string(),
            email: "nope".to_string(),
            salary: 0,
            ..employee_form()
        };
        let err = form.validate().expect_err("invalid form");
        let fields: Vec<_> = err.fields().collect();
        assert_eq!(fields, vec!["name", "email", "salary"]);
        assert!(err.to_string().contains("salary: must be greater than zero"));
    }

    #[test]
    fn valid_employee_passes() {
        assert!(employee_form().validate().is_ok());
    }

    #[test]
    fn completed_review_needs_date_and_rating() {
        let form = ReviewForm {
            review_cycle_id: 1,
            employee_id: 1,
            status: ReviewStatus::Completed,
            manager_feedback: String::new(),
            employee_self_assessment: String::new(),
            final_rating: 0,
            completed_at: None,
        };
        let fields: Vec<_> = form.validate().expect_err("rejected").fields().collect();
        assert_eq!(fields, vec!["completed_at", "final_rating"]);

        let pending_with_date = ReviewForm {
            status: ReviewStatus::Pending,
            completed_at: NaiveDate::from_ymd_opt(2024, 6, 1),
            ..form
        };
        assert!(pending_with_date.validate().is_err());
    }
}
