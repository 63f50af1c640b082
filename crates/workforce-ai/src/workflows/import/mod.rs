//! CSV roster and task imports.
//!
//! Employee exports carry `Name, Email, Role, Department, Salary, Start Date`
//! and optionally `Id, Status, Performance Rating, Satisfaction Score,
//! Projects Completed, Last Review Date, Leave Balance, Avatar`. Task exports
//! carry `Title, Assigned To, Due Date` and optionally `Id, Description,
//! Assigned By, Status, Priority`. Rows without an `Id` are numbered after the
//! largest explicit id in the file.

mod parser;

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use tracing::info;

use crate::workflows::workforce::{
    Department, Employee, EmployeeStatus, IdSequence, PerformanceSnapshot, Task, TaskPriority,
    TaskStatus,
};
use parser::{parse_amount, parse_date, parse_rows, EmployeeRow, TaskRow};

const DEFAULT_PERFORMANCE: u8 = 3;
const DEFAULT_SATISFACTION: u8 = 7;
const DEFAULT_LEAVE_DAYS: i32 = 20;

#[derive(Debug)]
pub enum RosterImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidValue {
        row: usize,
        column: &'static str,
        value: String,
    },
    DuplicateId {
        row: usize,
        id: u64,
    },
}

impl std::fmt::Display for RosterImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterImportError::Io(err) => write!(f, "failed to read roster export: {}", err),
            RosterImportError::Csv(err) => write!(f, "invalid roster CSV data: {}", err),
            RosterImportError::InvalidValue { row, column, value } => write!(
                f,
                "row {}: '{}' is not a valid value for column '{}'",
                row, value, column
            ),
            RosterImportError::DuplicateId { row, id } => {
                write!(f, "row {}: id {} is already used by an earlier row", row, id)
            }
        }
    }
}

impl std::error::Error for RosterImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RosterImportError::Io(err) => Some(err),
            RosterImportError::Csv(err) => Some(err),
            RosterImportError::InvalidValue { .. } | RosterImportError::DuplicateId { .. } => None,
        }
    }
}

impl From<std::io::Error> for RosterImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for RosterImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Row-scoped field parsing; `row` is 1-based and excludes the header.
struct Field {
    row: usize,
}

impl Field {
    fn required<T>(
        &self,
        column: &'static str,
        raw: &str,
        parse: impl FnOnce(&str) -> Option<T>,
    ) -> Result<T, RosterImportError> {
        parse(raw).ok_or_else(|| RosterImportError::InvalidValue {
            row: self.row,
            column,
            value: raw.to_string(),
        })
    }

    fn optional<T>(
        &self,
        column: &'static str,
        raw: Option<&str>,
        parse: impl FnOnce(&str) -> Option<T>,
    ) -> Result<Option<T>, RosterImportError> {
        raw.map(|raw| self.required(column, raw, parse)).transpose()
    }

    fn unique_id(&self, seen: &mut HashSet<u64>, id: u64) -> Result<(), RosterImportError> {
        if seen.insert(id) {
            Ok(())
        } else {
            Err(RosterImportError::DuplicateId { row: self.row, id })
        }
    }

    fn text(&self, column: &'static str, raw: &str) -> Result<String, RosterImportError> {
        self.required(column, raw, |raw| {
            let trimmed = raw.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
    }
}

fn in_range(min: u8, max: u8) -> impl Fn(&str) -> Option<u8> {
    move |raw: &str| raw.parse::<u8>().ok().filter(|value| (min..=max).contains(value))
}

fn explicit_ids<'a>(ids: impl Iterator<Item = Option<&'a str>>) -> Vec<u64> {
    ids.flatten().filter_map(|raw| raw.parse().ok()).collect()
}

pub struct RosterImporter;

impl RosterImporter {
    pub fn employees_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Employee>, RosterImportError> {
        let file = std::fs::File::open(path)?;
        Self::employees_from_reader(file)
    }

    pub fn employees_from_reader<R: Read>(reader: R) -> Result<Vec<Employee>, RosterImportError> {
        let rows: Vec<EmployeeRow> = parse_rows(reader)?;
        let ids = IdSequence::starting_after(explicit_ids(rows.iter().map(|r| r.id.as_deref())));

        let mut seen = HashSet::new();
        let mut employees = Vec::with_capacity(rows.len());
        for (index, row) in rows.into_iter().enumerate() {
            let field = Field { row: index + 1 };
            let id = match field.optional("Id", row.id.as_deref(), |raw| raw.parse::<u64>().ok())? {
                Some(id) => id,
                None => ids.next_id(),
            };
            field.unique_id(&mut seen, id)?;
            let start_date: NaiveDate = field.required("Start Date", &row.start_date, parse_date)?;
            let performance_rating = field
                .optional(
                    "Performance Rating",
                    row.performance_rating.as_deref(),
                    in_range(1, 5),
                )?
                .unwrap_or(DEFAULT_PERFORMANCE);
            let last_review_date = field
                .optional("Last Review Date", row.last_review_date.as_deref(), parse_date)?
                .unwrap_or(start_date);
            let email = field.text("Email", &row.email)?;

            employees.push(Employee {
                id,
                name: field.text("Name", &row.name)?,
                avatar: row
                    .avatar
                    .unwrap_or_else(|| format!("https://picsum.photos/seed/{email}/200")),
                email,
                role: field.text("Role", &row.role)?,
                department: field.required("Department", &row.department, Department::parse)?,
                salary: field.required("Salary", &row.salary, parse_amount)?,
                status: field
                    .optional("Status", row.status.as_deref(), EmployeeStatus::parse)?
                    .unwrap_or(EmployeeStatus::Active),
                start_date,
                performance_rating,
                satisfaction_score: field
                    .optional(
                        "Satisfaction Score",
                        row.satisfaction_score.as_deref(),
                        in_range(1, 10),
                    )?
                    .unwrap_or(DEFAULT_SATISFACTION),
                projects_completed: field
                    .optional(
                        "Projects Completed",
                        row.projects_completed.as_deref(),
                        |raw| raw.parse().ok(),
                    )?
                    .unwrap_or(0),
                last_review_date,
                performance_history: vec![PerformanceSnapshot {
                    date: last_review_date,
                    rating: performance_rating,
                }],
                leave_balance: field
                    .optional("Leave Balance", row.leave_balance.as_deref(), |raw| {
                        raw.parse().ok()
                    })?
                    .unwrap_or(DEFAULT_LEAVE_DAYS),
                goals: Vec::new(),
            });
        }

        info!(employees = employees.len(), "roster imported");
        Ok(employees)
    }

    pub fn tasks_from_reader<R: Read>(reader: R) -> Result<Vec<Task>, RosterImportError> {
        let rows: Vec<TaskRow> = parse_rows(reader)?;
        let ids = IdSequence::starting_after(explicit_ids(rows.iter().map(|r| r.id.as_deref())));

        let mut seen = HashSet::new();
        let mut tasks = Vec::with_capacity(rows.len());
        for (index, row) in rows.into_iter().enumerate() {
            let field = Field { row: index + 1 };
            let id = match field.optional("Id", row.id.as_deref(), |raw| raw.parse::<u64>().ok())? {
                Some(id) => id,
                None => ids.next_id(),
            };
            field.unique_id(&mut seen, id)?;
            let assigned_to_id =
                field.required("Assigned To", &row.assigned_to, |raw| raw.parse().ok())?;

            tasks.push(Task {
                id,
                title: field.text("Title", &row.title)?,
                description: row.description,
                assigned_to_id,
                assigned_by_id: field
                    .optional("Assigned By", row.assigned_by.as_deref(), |raw| {
                        raw.parse().ok()
                    })?
                    .unwrap_or(0),
                due_date: field.required("Due Date", &row.due_date, parse_date)?,
                status: field
                    .optional("Status", row.status.as_deref(), TaskStatus::parse)?
                    .unwrap_or(TaskStatus::ToDo),
                priority: field
                    .optional("Priority", row.priority.as_deref(), TaskPriority::parse)?
                    .unwrap_or(TaskPriority::Medium),
            });
        }

        info!(tasks = tasks.len(), "tasks imported");
        Ok(tasks)
    }
}
