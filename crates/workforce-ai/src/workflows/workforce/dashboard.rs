use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::domain::{Department, Employee, EmployeeStatus};
use super::store::WorkforceStore;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DepartmentCount {
    pub department: Department,
    pub employees: usize,
}

/// Mean snapshot rating per department for one calendar quarter.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct QuarterTrend {
    pub quarter: String,
    pub averages: BTreeMap<&'static str, f64>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DashboardSummary {
    pub total_employees: usize,
    pub active_employees: usize,
    /// Years, one decimal place.
    pub average_tenure_years: f64,
    pub departments: Vec<DepartmentCount>,
    pub performance_trend: Vec<QuarterTrend>,
}

impl DashboardSummary {
    pub fn build(employees: &[Employee], today: NaiveDate) -> Self {
        Self {
            total_employees: employees.len(),
            active_employees: employees
                .iter()
                .filter(|employee| employee.status == EmployeeStatus::Active)
                .count(),
            average_tenure_years: average_tenure_years(employees, today),
            departments: department_distribution(employees),
            performance_trend: performance_trend(employees),
        }
    }
}

/// Whole calendar months between the two dates, ignoring day of month.
/// Start dates in the future count as zero.
pub fn tenure_months(start: NaiveDate, today: NaiveDate) -> u32 {
    let months = (today.year() - start.year()) * 12 + today.month() as i32 - start.month() as i32;
    u32::try_from(months).unwrap_or(0)
}

pub fn average_tenure_years(employees: &[Employee], today: NaiveDate) -> f64 {
    if employees.is_empty() {
        return 0.0;
    }
    let total: u32 = employees
        .iter()
        .map(|employee| tenure_months(employee.start_date, today))
        .sum();
    let years = f64::from(total) / employees.len() as f64 / 12.0;
    (years * 10.0).round() / 10.0
}

/// Headcount per department in display order; empty departments are omitted.
pub fn department_distribution(employees: &[Employee]) -> Vec<DepartmentCount> {
    Department::ordered()
        .into_iter()
        .map(|department| DepartmentCount {
            department,
            employees: employees
                .iter()
                .filter(|employee| employee.department == department)
                .count(),
        })
        .filter(|count| count.employees > 0)
        .collect()
}

pub fn performance_trend(employees: &[Employee]) -> Vec<QuarterTrend> {
    let mut buckets: BTreeMap<(i32, u32), BTreeMap<&'static str, (u32, u32)>> = BTreeMap::new();
    for employee in employees {
        for snapshot in &employee.performance_history {
            let quarter = (snapshot.date.year(), snapshot.date.month0() / 3 + 1);
            let (total, count) = buckets
                .entry(quarter)
                .or_default()
                .entry(employee.department.label())
                .or_insert((0, 0));
            *total += u32::from(snapshot.rating);
            *count += 1;
        }
    }

    buckets
        .into_iter()
        .map(|((year, quarter), departments)| QuarterTrend {
            quarter: format!("{year} Q{quarter}"),
            averages: departments
                .into_iter()
                .map(|(department, (total, count))| {
                    let mean = f64::from(total) / f64::from(count);
                    (department, (mean * 100.0).round() / 100.0)
                })
                .collect(),
        })
        .collect()
}

impl WorkforceStore {
    pub fn dashboard(&self, today: NaiveDate) -> DashboardSummary {
        DashboardSummary::build(&self.employees, today)
    }
}
