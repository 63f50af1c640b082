use crate::infra::{
    parse_date, parse_department, parse_direction, parse_sort_key, parse_status, seed_snapshot,
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use workforce_ai::error::AppError;
use workforce_ai::workflows::import::RosterImporter;
use workforce_ai::workflows::workforce::{
    BulkRiskAnalyzer, DateRange, Department, Employee, EmployeeSortKey, EmployeeStatus,
    HeuristicRiskPredictor, LeaveStatus, RiskHistogram, RosterQuery, SortDirection, SortState,
    WorkforceSnapshot, WorkforceStore,
};

#[derive(Args, Debug, Default)]
pub(crate) struct RosterArgs {
    /// Employee CSV export; defaults to the bundled roster.
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
    /// Case-insensitive match on name, role or department
    #[arg(long)]
    pub(crate) search: Option<String>,
    #[arg(long, value_parser = parse_department)]
    pub(crate) department: Option<Department>,
    #[arg(long, value_parser = parse_status)]
    pub(crate) status: Option<EmployeeStatus>,
    /// Column to sort by (name, salary, start_date, ...)
    #[arg(long, value_parser = parse_sort_key)]
    pub(crate) sort: Option<EmployeeSortKey>,
    #[arg(long, value_parser = parse_direction, default_value = "asc")]
    pub(crate) direction: SortDirection,
    /// Run the offline attrition classifier over the listed employees.
    #[arg(long)]
    pub(crate) analyze: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Pretend the demo runs at 00:00 UTC on this date (YYYY-MM-DD). Defaults to now.
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Replace the bundled employees with a CSV export.
    #[arg(long)]
    pub(crate) roster_csv: Option<PathBuf>,
    /// Skip the bulk attrition pass.
    #[arg(long)]
    pub(crate) skip_analysis: bool,
}

impl RosterArgs {
    fn query(&self) -> RosterQuery {
        RosterQuery {
            search: self.search.clone().unwrap_or_default(),
            department: self.department.into(),
            status: self.status.into(),
            sort: match self.sort {
                Some(key) => SortState::by(key, self.direction),
                None => SortState::unsorted(),
            },
        }
    }
}

pub(crate) fn load_snapshot(roster_csv: Option<PathBuf>) -> Result<WorkforceSnapshot, AppError> {
    let mut snapshot = seed_snapshot()?;
    if let Some(path) = roster_csv {
        snapshot.employees = RosterImporter::employees_from_path(path)?;
    }
    Ok(snapshot)
}

pub(crate) async fn run_roster(args: RosterArgs) -> Result<(), AppError> {
    let query = args.query();
    let snapshot = load_snapshot(args.csv)?;
    let store = WorkforceStore::from_snapshot(snapshot);

    let view = store.roster(&query);
    println!("{} of {} employees", view.len(), store.employees().len());
    render_roster(&view);

    if args.analyze {
        let selected: Vec<Employee> = view.into_iter().cloned().collect();
        let histogram = analyze_offline(&selected).await?;
        render_histogram(&histogram);
    }
    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        today,
        roster_csv,
        skip_analysis,
    } = args;

    let now: DateTime<Utc> = match today {
        Some(day) => day.and_time(NaiveTime::MIN).and_utc(),
        None => Utc::now(),
    };
    let today = now.date_naive();
    let mut store = WorkforceStore::from_snapshot(load_snapshot(roster_csv)?);

    println!("Workforce demo for {today}");

    let alerts = store.run_deadline_scan(now);
    println!("\nDeadline scan raised {alerts} alert(s)");
    for notification in store.notifications().unread() {
        println!("  - [{}] {}", notification.title, notification.description);
    }

    let summary = store.dashboard(today);
    println!(
        "\nHeadcount {} ({} active) | average tenure {:.1} years",
        summary.total_employees, summary.active_employees, summary.average_tenure_years
    );
    for count in &summary.departments {
        println!("  - {}: {}", count.department, count.employees);
    }

    let pending = store
        .leave_requests()
        .iter()
        .find(|request| request.status == LeaveStatus::Pending)
        .map(|request| (request.id, request.employee_id));
    if let Some((request_id, employee_id)) = pending {
        let before = store.employee(employee_id).map(|e| e.leave_balance);
        let request = store.approve_leave(request_id)?;
        println!(
            "\nApproved {} for {} ({} to {})",
            request.leave_type.label(),
            request.employee_name,
            request.start_date,
            request.end_date
        );
        let after = store.employee(employee_id).map(|e| e.leave_balance);
        if let (Some(before), Some(after)) = (before, after) {
            println!("  Leave balance {before} -> {after} days");
        }
    }
    let report = store.leave_report(DateRange::default());
    println!(
        "  {} requests on file | {} approved days | {}% approval rate",
        report.total_requests, report.approved_days, report.approval_rate
    );

    if !skip_analysis {
        let active = RosterQuery::default().with_status(EmployeeStatus::Active);
        let selected: Vec<Employee> = store.roster(&active).into_iter().cloned().collect();
        println!("\nAttrition risk across {} active employees", selected.len());
        render_histogram(&analyze_offline(&selected).await?);
    }

    if let Some(cycle_id) = store.default_review_cycle() {
        println!(
            "\nReview cycle {cycle_id}: {}% complete",
            store.cycle_progress(cycle_id)?
        );
    }

    if let Some(job) = store.job_openings().first() {
        println!("\nHiring pipeline for {}", job.title);
        for column in store.pipeline_board(job.id)? {
            println!("  - {}: {}", column.stage.label(), column.candidates.len());
        }
    }

    println!(
        "\n{} unread notification(s)",
        store.notifications().unread_count()
    );
    Ok(())
}

async fn analyze_offline(employees: &[Employee]) -> Result<RiskHistogram, AppError> {
    let analyzer = BulkRiskAnalyzer::new(Arc::new(HeuristicRiskPredictor));
    Ok(analyzer.analyze(employees).await?)
}

fn render_roster(view: &[&Employee]) {
    for employee in view {
        println!(
            "  #{:<3} {:<22} {:<26} {:<16} ${:>8} {:<8} risk {}",
            employee.id,
            employee.name,
            employee.role,
            employee.department.label(),
            employee.salary,
            employee.status.label(),
            employee.heuristic_risk().label()
        );
    }
}

fn render_histogram(histogram: &RiskHistogram) {
    println!(
        "  High {} | Medium {} | Low {}",
        histogram.high, histogram.medium, histogram.low
    );
}
