use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::sort::{Filter, SortState};
use crate::workflows::workforce::domain::{Department, Employee, EmployeeStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeSortKey {
    Id,
    Name,
    Role,
    Department,
    Salary,
    Status,
    StartDate,
    PerformanceRating,
    SatisfactionScore,
    LeaveBalance,
}

impl EmployeeSortKey {
    pub fn parse(raw: &str) -> Option<Self> {
        let key = match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "id" => Self::Id,
            "name" => Self::Name,
            "role" => Self::Role,
            "department" => Self::Department,
            "salary" => Self::Salary,
            "status" => Self::Status,
            "start_date" | "startdate" => Self::StartDate,
            "performance_rating" | "performancerating" => Self::PerformanceRating,
            "satisfaction_score" | "satisfactionscore" => Self::SatisfactionScore,
            "leave_balance" | "leavebalance" => Self::LeaveBalance,
            _ => return None,
        };
        Some(key)
    }

    /// Natural ordering of the field: numeric for numbers, lexical for text.
    pub fn compare(self, a: &Employee, b: &Employee) -> Ordering {
        match self {
            Self::Id => a.id.cmp(&b.id),
            Self::Name => a.name.cmp(&b.name),
            Self::Role => a.role.cmp(&b.role),
            Self::Department => a.department.label().cmp(b.department.label()),
            Self::Salary => a.salary.cmp(&b.salary),
            Self::Status => a.status.label().cmp(b.status.label()),
            Self::StartDate => a.start_date.cmp(&b.start_date),
            Self::PerformanceRating => a.performance_rating.cmp(&b.performance_rating),
            Self::SatisfactionScore => a.satisfaction_score.cmp(&b.satisfaction_score),
            Self::LeaveBalance => a.leave_balance.cmp(&b.leave_balance),
        }
    }
}

/// Inputs to the employee table: search text, equality filters, and sort state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterQuery {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub department: Filter<Department>,
    #[serde(default)]
    pub status: Filter<EmployeeStatus>,
    #[serde(default)]
    pub sort: SortState<EmployeeSortKey>,
}

impl RosterQuery {
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_department(mut self, department: Department) -> Self {
        self.department = Filter::Only(department);
        self
    }

    pub fn with_status(mut self, status: EmployeeStatus) -> Self {
        self.status = Filter::Only(status);
        self
    }

    pub fn with_sort(mut self, sort: SortState<EmployeeSortKey>) -> Self {
        self.sort = sort;
        self
    }

    /// Case-insensitive substring match on name, role, and department.
    /// A blank query matches every employee.
    pub fn matches_search(&self, employee: &Employee) -> bool {
        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }

        employee.name.to_lowercase().contains(&needle)
            || employee.role.to_lowercase().contains(&needle)
            || employee.department.label().to_lowercase().contains(&needle)
    }

    pub fn matches(&self, employee: &Employee) -> bool {
        self.matches_search(employee)
            && self.department.matches(&employee.department)
            && self.status.matches(&employee.status)
    }
}

/// Search, then filter, then (optionally) sort. Recomputed from scratch on
/// every call; the input order survives whenever the view is unsorted.
pub fn roster_view<'a>(employees: &'a [Employee], query: &RosterQuery) -> Vec<&'a Employee> {
    let mut view: Vec<&Employee> = employees
        .iter()
        .filter(|employee| query.matches(employee))
        .collect();

    query
        .sort
        .sort_by(&mut view, |key, a, b| key.compare(a, b));

    view
}
