use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use workforce_ai::workflows::workforce::{
    Department, EmployeeSortKey, EmployeeStatus, SortDirection, WorkforceSnapshot,
};

const SEED_SNAPSHOT: &str = include_str!("../seed/workforce.json");

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Demo data set bundled with the binary.
pub(crate) fn seed_snapshot() -> Result<WorkforceSnapshot, serde_json::Error> {
    serde_json::from_str(SEED_SNAPSHOT)
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_department(raw: &str) -> Result<Department, String> {
    Department::parse(raw).ok_or_else(|| format!("unknown department '{raw}'"))
}

pub(crate) fn parse_status(raw: &str) -> Result<EmployeeStatus, String> {
    EmployeeStatus::parse(raw).ok_or_else(|| format!("unknown status '{raw}'"))
}

pub(crate) fn parse_sort_key(raw: &str) -> Result<EmployeeSortKey, String> {
    EmployeeSortKey::parse(raw).ok_or_else(|| format!("unknown sort column '{raw}'"))
}

pub(crate) fn parse_direction(raw: &str) -> Result<SortDirection, String> {
    SortDirection::parse(raw).ok_or_else(|| format!("unknown sort direction '{raw}'"))
}

pub(crate) fn deserialize_optional_date<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.map(|value| parse_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_seed_parses() {
        let snapshot = seed_snapshot().expect("seed is valid json");
        assert_eq!(snapshot.employees.len(), 8);
        assert_eq!(snapshot.review_cycles.iter().filter(|c| c.is_active).count(), 1);
        assert!(snapshot
            .candidates
            .iter()
            .all(|candidate| snapshot
                .job_openings
                .iter()
                .any(|job| job.id == candidate.job_opening_id)));
    }

    #[test]
    fn cli_value_parsers_report_the_bad_input() {
        assert_eq!(parse_department("hr"), Ok(Department::HumanResources));
        assert!(parse_department("legal")
            .expect_err("unknown")
            .contains("legal"));
        assert!(parse_date("2024-13-01").is_err());
        assert_eq!(parse_direction("DESC"), Ok(SortDirection::Desc));
    }
}
