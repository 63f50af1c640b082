use chrono::{DateTime, NaiveDate};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use std::io::Read;

#[derive(Debug, Deserialize)]
pub(crate) struct EmployeeRow {
    #[serde(rename = "Id", default, deserialize_with = "empty_string_as_none")]
    pub(crate) id: Option<String>,
    #[serde(rename = "Name")]
    pub(crate) name: String,
    #[serde(rename = "Email")]
    pub(crate) email: String,
    #[serde(rename = "Role")]
    pub(crate) role: String,
    #[serde(rename = "Department")]
    pub(crate) department: String,
    #[serde(rename = "Salary")]
    pub(crate) salary: String,
    #[serde(rename = "Status", default, deserialize_with = "empty_string_as_none")]
    pub(crate) status: Option<String>,
    #[serde(rename = "Start Date")]
    pub(crate) start_date: String,
    #[serde(
        rename = "Performance Rating",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub(crate) performance_rating: Option<String>,
    #[serde(
        rename = "Satisfaction Score",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub(crate) satisfaction_score: Option<String>,
    #[serde(
        rename = "Projects Completed",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub(crate) projects_completed: Option<String>,
    #[serde(
        rename = "Last Review Date",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub(crate) last_review_date: Option<String>,
    #[serde(
        rename = "Leave Balance",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub(crate) leave_balance: Option<String>,
    #[serde(rename = "Avatar", default, deserialize_with = "empty_string_as_none")]
    pub(crate) avatar: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TaskRow {
    #[serde(rename = "Id", default, deserialize_with = "empty_string_as_none")]
    pub(crate) id: Option<String>,
    #[serde(rename = "Title")]
    pub(crate) title: String,
    #[serde(rename = "Description", default)]
    pub(crate) description: String,
    #[serde(rename = "Assigned To")]
    pub(crate) assigned_to: String,
    #[serde(
        rename = "Assigned By",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub(crate) assigned_by: Option<String>,
    #[serde(rename = "Due Date")]
    pub(crate) due_date: String,
    #[serde(rename = "Status", default, deserialize_with = "empty_string_as_none")]
    pub(crate) status: Option<String>,
    #[serde(rename = "Priority", default, deserialize_with = "empty_string_as_none")]
    pub(crate) priority: Option<String>,
}

pub(crate) fn parse_rows<R, T>(reader: R) -> Result<Vec<T>, csv::Error>
where
    R: Read,
    T: DeserializeOwned,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    csv_reader.deserialize::<T>().collect()
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp (its UTC date is kept).
pub(crate) fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }

    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|dt| dt.naive_utc().date())
}

/// Strips currency symbols and thousands separators before parsing.
pub(crate) fn parse_amount(value: &str) -> Option<u32> {
    let digits: String = value
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    digits.parse().ok()
}
