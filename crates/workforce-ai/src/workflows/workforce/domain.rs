use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::attrition::{classify, AttritionRisk};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Department {
    Engineering,
    #[serde(rename = "Human Resources")]
    HumanResources,
    Marketing,
    Sales,
    Finance,
    Design,
}

impl Department {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::Engineering,
            Self::HumanResources,
            Self::Marketing,
            Self::Sales,
            Self::Finance,
            Self::Design,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Engineering => "Engineering",
            Self::HumanResources => "Human Resources",
            Self::Marketing => "Marketing",
            Self::Sales => "Sales",
            Self::Finance => "Finance",
            Self::Design => "Design",
        }
    }

    /// Accepts either the display label or a compact identifier (`hr`, `human_resources`).
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_lowercase().replace(['_', '-'], " ");
        Self::ordered().into_iter().find(|department| {
            department.label().eq_ignore_ascii_case(&normalized)
                || (normalized == "hr" && *department == Self::HumanResources)
        })
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmployeeStatus {
    Active,
    Inactive,
}

impl EmployeeStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "active" => Some(Self::Active),
            "inactive" => Some(Self::Inactive),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GoalStatus {
    #[serde(rename = "On Track")]
    OnTrack,
    #[serde(rename = "At Risk")]
    AtRisk,
    Completed,
    Paused,
}

impl GoalStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::OnTrack => "On Track",
            Self::AtRisk => "At Risk",
            Self::Completed => "Completed",
            Self::Paused => "Paused",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub target_date: NaiveDate,
    pub status: GoalStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceSnapshot {
    pub date: NaiveDate,
    pub rating: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub avatar: String,
    pub role: String,
    pub department: Department,
    pub salary: u32,
    pub status: EmployeeStatus,
    pub start_date: NaiveDate,
    /// 1 to 5.
    pub performance_rating: u8,
    /// 1 to 10.
    pub satisfaction_score: u8,
    pub projects_completed: u32,
    pub last_review_date: NaiveDate,
    pub performance_history: Vec<PerformanceSnapshot>,
    /// Days; approvals may push it below zero.
    pub leave_balance: i32,
    pub goals: Vec<Goal>,
}

impl Employee {
    pub fn heuristic_risk(&self) -> AttritionRisk {
        classify(self.satisfaction_score, self.performance_rating)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    #[serde(rename = "To Do")]
    ToDo,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

impl TaskStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::ToDo => "To Do",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().replace(['_', '-'], " ").as_str() {
            "to do" | "todo" => Some(Self::ToDo),
            "in progress" => Some(Self::InProgress),
            "completed" | "done" => Some(Self::Completed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskPriority {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    /// Urgency used when ordering task lists.
    pub const fn rank(self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub assigned_to_id: u64,
    pub assigned_by_id: u64,
    pub due_date: NaiveDate,
    pub status: TaskStatus,
    pub priority: TaskPriority,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Alert,
    Update,
    Message,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: u64,
    pub kind: NotificationKind,
    pub title: String,
    /// Also serves as the deduplication key for generated alerts.
    pub description: String,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LeaveType {
    Vacation,
    #[serde(rename = "Sick Leave")]
    SickLeave,
    #[serde(rename = "Personal Day")]
    Personal,
    #[serde(rename = "Unpaid Leave")]
    Unpaid,
}

impl LeaveType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Vacation => "Vacation",
            Self::SickLeave => "Sick Leave",
            Self::Personal => "Personal Day",
            Self::Unpaid => "Unpaid Leave",
        }
    }

    pub const fn deducts_balance(self) -> bool {
        !matches!(self, Self::Unpaid)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

impl LeaveStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequest {
    pub id: u64,
    pub employee_id: u64,
    pub employee_name: String,
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
    pub status: LeaveStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnnouncementCategory {
    #[serde(rename = "Company News")]
    CompanyNews,
    #[serde(rename = "Policy Update")]
    PolicyUpdate,
    Event,
    General,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    pub id: u64,
    pub title: String,
    pub content: String,
    pub category: AnnouncementCategory,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    Open,
    Closed,
    #[serde(rename = "On Hold")]
    OnHold,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobOpening {
    pub id: u64,
    pub title: String,
    pub department: Department,
    pub location: String,
    pub status: JobStatus,
    pub description: String,
    pub posted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CandidateStage {
    Applied,
    Screening,
    Interview,
    Offer,
    Hired,
    Rejected,
}

impl CandidateStage {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::Applied,
            Self::Screening,
            Self::Interview,
            Self::Offer,
            Self::Hired,
            Self::Rejected,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Applied => "Applied",
            Self::Screening => "Screening",
            Self::Interview => "Interview",
            Self::Offer => "Offer",
            Self::Hired => "Hired",
            Self::Rejected => "Rejected",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Hired | Self::Rejected)
    }

    /// Candidates only move forward through the funnel; any open stage may
    /// drop to `Rejected`, and terminal stages stay put.
    pub fn can_advance_to(self, next: Self) -> bool {
        if self == next {
            return true;
        }
        if self.is_terminal() {
            return false;
        }
        match next {
            Self::Rejected => true,
            _ => next > self,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub job_opening_id: u64,
    pub stage: CandidateStage,
    pub resume_url: String,
    pub applied_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewCycle {
    pub id: u64,
    pub title: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewStatus {
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

impl ReviewStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: u64,
    pub review_cycle_id: u64,
    pub employee_id: u64,
    pub status: ReviewStatus,
    pub manager_feedback: String,
    pub employee_self_assessment: String,
    /// 1 to 5 once completed; 0 while unrated.
    pub final_rating: u8,
    pub completed_at: Option<NaiveDate>,
}
