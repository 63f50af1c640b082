use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use axum::response::Response;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::Value;
use tokio::sync::Notify;

use crate::workflows::workforce::attrition::{
    AttritionPrediction, AttritionRisk, PredictionError, RiskPredictor,
};
use crate::workflows::workforce::domain::{
    Department, Employee, EmployeeStatus, LeaveRequest, LeaveStatus, LeaveType,
    PerformanceSnapshot, ReviewCycle, Task, TaskPriority, TaskStatus,
};
use crate::workflows::workforce::store::{WorkforceSnapshot, WorkforceStore};

pub(crate) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(crate) fn instant(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0)
        .single()
        .expect("valid instant")
}

pub(crate) fn employee(id: u64, name: &str, satisfaction: u8, performance: u8) -> Employee {
    Employee {
        id,
        name: name.to_string(),
        email: format!("{}@example.com", name.to_ascii_lowercase().replace(' ', ".")),
        avatar: format!("https://picsum.photos/seed/{id}/200"),
        role: "Engineer".to_string(),
        department: Department::Engineering,
        salary: 90_000,
        status: EmployeeStatus::Active,
        start_date: date(2021, 3, 1),
        performance_rating: performance,
        satisfaction_score: satisfaction,
        projects_completed: 4,
        last_review_date: date(2024, 1, 15),
        performance_history: vec![PerformanceSnapshot {
            date: date(2024, 1, 15),
            rating: performance,
        }],
        leave_balance: 20,
        goals: Vec::new(),
    }
}

pub(crate) fn staffed(
    id: u64,
    name: &str,
    role: &str,
    department: Department,
    status: EmployeeStatus,
    salary: u32,
) -> Employee {
    Employee {
        role: role.to_string(),
        department,
        status,
        salary,
        ..employee(id, name, 8, 4)
    }
}

/// Mixed roster: two departments, one inactive employee, a salary tie.
pub(crate) fn roster() -> Vec<Employee> {
    vec![
        staffed(1, "Alice Johnson", "Software Engineer", Department::Engineering, EmployeeStatus::Active, 120_000),
        staffed(2, "Bob Smith", "Product Designer", Department::Design, EmployeeStatus::Active, 95_000),
        staffed(3, "Charlie Brown", "HR Generalist", Department::HumanResources, EmployeeStatus::Inactive, 70_000),
        staffed(4, "Diana Prince", "Engineering Manager", Department::Engineering, EmployeeStatus::Active, 95_000),
        staffed(5, "Evan Wright", "Account Executive", Department::Sales, EmployeeStatus::Active, 80_000),
    ]
}

pub(crate) fn task(id: u64, title: &str, assignee: u64, due: NaiveDate, status: TaskStatus) -> Task {
    Task {
        id,
        title: title.to_string(),
        description: String::new(),
        assigned_to_id: assignee,
        assigned_by_id: 4,
        due_date: due,
        status,
        priority: TaskPriority::Medium,
    }
}

pub(crate) fn leave_request(
    id: u64,
    employee_id: u64,
    leave_type: LeaveType,
    start: NaiveDate,
    end: NaiveDate,
) -> LeaveRequest {
    LeaveRequest {
        id,
        employee_id,
        employee_name: format!("Employee {employee_id}"),
        leave_type,
        start_date: start,
        end_date: end,
        reason: "Family trip".to_string(),
        status: LeaveStatus::Pending,
    }
}

pub(crate) fn review_cycle(id: u64, active: bool) -> ReviewCycle {
    ReviewCycle {
        id,
        title: format!("Cycle {id}"),
        start_date: date(2024, 1, 1),
        end_date: date(2024, 6, 30),
        is_active: active,
    }
}

pub(crate) fn store() -> WorkforceStore {
    WorkforceStore::from_snapshot(WorkforceSnapshot {
        employees: roster(),
        tasks: vec![
            task(1, "Quarterly report", 1, date(2024, 6, 2), TaskStatus::InProgress),
            task(2, "Design review", 2, date(2024, 6, 20), TaskStatus::ToDo),
        ],
        leave_requests: vec![
            leave_request(1, 1, LeaveType::Vacation, date(2024, 8, 1), date(2024, 8, 10)),
            leave_request(2, 2, LeaveType::Unpaid, date(2024, 9, 2), date(2024, 9, 6)),
        ],
        review_cycles: vec![review_cycle(1, true), review_cycle(2, false)],
        ..WorkforceSnapshot::default()
    })
}

/// Predictor whose answers are derived from the classifier, with scripted
/// failures and panics per employee id.
#[derive(Default)]
pub(crate) struct ScriptedPredictor {
    pub(crate) failing: HashSet<u64>,
    pub(crate) panicking: HashSet<u64>,
    pub(crate) not_configured: bool,
    pub(crate) gate: Option<Arc<Notify>>,
    pub(crate) calls: AtomicUsize,
}

impl ScriptedPredictor {
    pub(crate) fn failing(ids: impl IntoIterator<Item = u64>) -> Self {
        Self {
            failing: ids.into_iter().collect(),
            ..Self::default()
        }
    }

    pub(crate) fn panicking(ids: impl IntoIterator<Item = u64>) -> Self {
        Self {
            panicking: ids.into_iter().collect(),
            ..Self::default()
        }
    }

    pub(crate) fn gated(gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::default()
        }
    }

    pub(crate) fn unconfigured() -> Self {
        Self {
            not_configured: true,
            ..Self::default()
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RiskPredictor for ScriptedPredictor {
    async fn predict(&self, employee: &Employee) -> Result<AttritionPrediction, PredictionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if self.not_configured {
            return Err(PredictionError::NotConfigured);
        }
        if self.panicking.contains(&employee.id) {
            panic!("predictor crashed for employee {}", employee.id);
        }
        if self.failing.contains(&employee.id) {
            return Err(PredictionError::Transport("connection reset".to_string()));
        }
        Ok(AttritionPrediction {
            risk: employee.heuristic_risk(),
            reason: format!("scripted answer for {}", employee.name),
            recommendations: "- Keep in touch".to_string(),
        })
    }
}

pub(crate) fn tiers(employees: &[Employee]) -> (usize, usize, usize) {
    employees.iter().fold((0, 0, 0), |(high, medium, low), employee| {
        match employee.heuristic_risk() {
            AttritionRisk::High => (high + 1, medium, low),
            AttritionRisk::Medium => (high, medium + 1, low),
            AttritionRisk::Low => (high, medium, low + 1),
        }
    })
}

pub(crate) async fn json_body(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}
