use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::domain::{Employee, LeaveRequest, LeaveStatus, LeaveType};

/// Days covered by a leave span, counting both endpoints.
pub fn inclusive_day_count(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days().abs() + 1
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LeaveError {
    #[error("leave request {id} is already {}", .status.label())]
    AlreadyResolved { id: u64, status: LeaveStatus },
}

/// Balance and status transitions tied to leave approval.
pub struct LeaveLedger;

impl LeaveLedger {
    /// Days an approval removes from the balance (zero for unpaid leave).
    pub fn days_charged(request: &LeaveRequest) -> i64 {
        if request.leave_type.deducts_balance() {
            inclusive_day_count(request.start_date, request.end_date)
        } else {
            0
        }
    }

    pub fn balance_after_approval(request: &LeaveRequest, employee: &Employee) -> Employee {
        let charged = i32::try_from(Self::days_charged(request)).unwrap_or(i32::MAX);
        Employee {
            leave_balance: employee.leave_balance.saturating_sub(charged),
            ..employee.clone()
        }
    }

    /// Moves a pending request to `Approved`; returns the days to charge.
    pub fn approve(request: &mut LeaveRequest) -> Result<i64, LeaveError> {
        Self::ensure_pending(request)?;
        request.status = LeaveStatus::Approved;
        Ok(Self::days_charged(request))
    }

    pub fn reject(request: &mut LeaveRequest) -> Result<(), LeaveError> {
        Self::ensure_pending(request)?;
        request.status = LeaveStatus::Rejected;
        Ok(())
    }

    fn ensure_pending(request: &LeaveRequest) -> Result<(), LeaveError> {
        match request.status {
            LeaveStatus::Pending => Ok(()),
            status => Err(LeaveError::AlreadyResolved {
                id: request.id,
                status,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |start| date >= start) && self.end.map_or(true, |end| date <= end)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MonthlyLeaveCount {
    pub month: &'static str,
    pub requests: usize,
}

/// Aggregates for the leave reporting screen.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LeaveReport {
    pub total_requests: usize,
    pub by_type: BTreeMap<&'static str, usize>,
    pub monthly: Vec<MonthlyLeaveCount>,
    pub approved_days: i64,
    /// Rounded percentage of requests in range that were approved.
    pub approval_rate: u8,
}

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

impl LeaveReport {
    /// Requests are selected by their start date.
    pub fn build(requests: &[LeaveRequest], range: DateRange) -> Self {
        let selected: Vec<&LeaveRequest> = requests
            .iter()
            .filter(|request| range.contains(request.start_date))
            .collect();

        let mut by_type = BTreeMap::new();
        let mut monthly: Vec<MonthlyLeaveCount> = MONTHS
            .iter()
            .map(|&month| MonthlyLeaveCount {
                month,
                requests: 0,
            })
            .collect();

        for request in &selected {
            *by_type.entry(request.leave_type.label()).or_insert(0) += 1;
            monthly[request.start_date.month0() as usize].requests += 1;
        }

        let approved: Vec<&&LeaveRequest> = selected
            .iter()
            .filter(|request| request.status == LeaveStatus::Approved)
            .collect();
        let approved_days = approved
            .iter()
            .map(|request| inclusive_day_count(request.start_date, request.end_date))
            .sum();
        let approval_rate = if selected.is_empty() {
            0
        } else {
            ((approved.len() as f64 / selected.len() as f64) * 100.0).round() as u8
        };

        Self {
            total_requests: selected.len(),
            by_type,
            monthly,
            approved_days,
            approval_rate,
        }
    }

    pub fn count_for(&self, leave_type: LeaveType) -> usize {
        self.by_type.get(leave_type.label()).copied().unwrap_or(0)
    }
}
