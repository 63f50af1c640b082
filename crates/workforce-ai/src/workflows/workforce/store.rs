use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::domain::{
    Announcement, Candidate, CandidateStage, Employee, Goal, JobOpening, LeaveRequest,
    LeaveStatus, Notification, PerformanceSnapshot, Review, ReviewCycle, Task, TaskStatus,
};
use super::ids::IdSequence;
use super::leave::{DateRange, LeaveError, LeaveLedger, LeaveReport};
use super::notifications::{DeadlineScanner, NotificationCenter, NotificationDraft};
use super::roster::{roster_view, task_view, RosterQuery, TaskQuery};
use super::validation::{
    AnnouncementForm, EmployeeForm, FormRejected, GoalForm, LeaveForm, TaskForm, Validate,
};

pub const NEW_EMPLOYEE_PERFORMANCE: u8 = 3;
pub const NEW_EMPLOYEE_SATISFACTION: u8 = 7;
pub const NEW_EMPLOYEE_LEAVE_DAYS: i32 = 20;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Invalid(#[from] FormRejected),
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: u64 },
    #[error(transparent)]
    Leave(#[from] LeaveError),
    #[error("candidate {id} cannot move from {} to {}", .from.label(), .to.label())]
    StageRegression {
        id: u64,
        from: CandidateStage,
        to: CandidateStage,
    },
}

impl StoreError {
    pub(crate) fn not_found(entity: &'static str, id: u64) -> Self {
        Self::NotFound { entity, id }
    }
}

/// Initial collections handed to [`WorkforceStore::from_snapshot`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WorkforceSnapshot {
    pub employees: Vec<Employee>,
    pub tasks: Vec<Task>,
    pub notifications: Vec<Notification>,
    pub leave_requests: Vec<LeaveRequest>,
    pub announcements: Vec<Announcement>,
    pub job_openings: Vec<JobOpening>,
    pub candidates: Vec<Candidate>,
    pub review_cycles: Vec<ReviewCycle>,
    pub reviews: Vec<Review>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct StoreIds {
    pub(crate) employees: IdSequence,
    pub(crate) goals: IdSequence,
    pub(crate) tasks: IdSequence,
    pub(crate) leave: IdSequence,
    pub(crate) announcements: IdSequence,
    pub(crate) jobs: IdSequence,
    pub(crate) candidates: IdSequence,
    pub(crate) reviews: IdSequence,
}

/// In-memory application state: every collection plus the actions that
/// mutate them. Nothing here is persisted.
#[derive(Debug, Clone)]
pub struct WorkforceStore {
    pub(crate) employees: Vec<Employee>,
    pub(crate) tasks: Vec<Task>,
    pub(crate) leave_requests: Vec<LeaveRequest>,
    pub(crate) announcements: Vec<Announcement>,
    pub(crate) job_openings: Vec<JobOpening>,
    pub(crate) candidates: Vec<Candidate>,
    pub(crate) review_cycles: Vec<ReviewCycle>,
    pub(crate) reviews: Vec<Review>,
    pub(crate) notifications: NotificationCenter,
    pub(crate) scanner: DeadlineScanner,
    pub(crate) ids: StoreIds,
}

impl Default for WorkforceStore {
    fn default() -> Self {
        Self::from_snapshot(WorkforceSnapshot::default())
    }
}

impl WorkforceStore {
    pub fn from_snapshot(snapshot: WorkforceSnapshot) -> Self {
        let ids = StoreIds {
            employees: IdSequence::starting_after(snapshot.employees.iter().map(|e| e.id)),
            goals: IdSequence::starting_after(
                snapshot
                    .employees
                    .iter()
                    .flat_map(|e| e.goals.iter().map(|goal| goal.id)),
            ),
            tasks: IdSequence::starting_after(snapshot.tasks.iter().map(|t| t.id)),
            leave: IdSequence::starting_after(snapshot.leave_requests.iter().map(|r| r.id)),
            announcements: IdSequence::starting_after(
                snapshot.announcements.iter().map(|a| a.id),
            ),
            jobs: IdSequence::starting_after(snapshot.job_openings.iter().map(|j| j.id)),
            candidates: IdSequence::starting_after(snapshot.candidates.iter().map(|c| c.id)),
            reviews: IdSequence::starting_after(snapshot.reviews.iter().map(|r| r.id)),
        };

        Self {
            employees: snapshot.employees,
            tasks: snapshot.tasks,
            leave_requests: snapshot.leave_requests,
            announcements: snapshot.announcements,
            job_openings: snapshot.job_openings,
            candidates: snapshot.candidates,
            review_cycles: snapshot.review_cycles,
            reviews: snapshot.reviews,
            notifications: NotificationCenter::new(snapshot.notifications),
            scanner: DeadlineScanner::default(),
            ids,
        }
    }

    pub fn with_deadline_window(mut self, window: Duration) -> Self {
        self.scanner = DeadlineScanner::new(window);
        self
    }

    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    pub fn employee(&self, id: u64) -> Option<&Employee> {
        self.employees.iter().find(|employee| employee.id == id)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn leave_requests(&self) -> &[LeaveRequest] {
        &self.leave_requests
    }

    pub fn announcements(&self) -> &[Announcement] {
        &self.announcements
    }

    pub fn job_openings(&self) -> &[JobOpening] {
        &self.job_openings
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn review_cycles(&self) -> &[ReviewCycle] {
        &self.review_cycles
    }

    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    pub fn roster(&self, query: &RosterQuery) -> Vec<&Employee> {
        roster_view(&self.employees, query)
    }

    pub fn task_list(&self, query: &TaskQuery) -> Vec<&Task> {
        task_view(&self.tasks, query)
    }

    fn employee_mut(&mut self, id: u64) -> Result<&mut Employee, StoreError> {
        self.employees
            .iter_mut()
            .find(|employee| employee.id == id)
            .ok_or_else(|| StoreError::not_found("employee", id))
    }

    // Employees

    /// Appends a new employee with starting metrics and a single history
    /// entry dated `today`.
    pub fn add_employee(
        &mut self,
        form: EmployeeForm,
        today: NaiveDate,
    ) -> Result<&Employee, StoreError> {
        form.validate()?;

        let email = form.email.trim().to_string();
        let avatar = form
            .avatar
            .filter(|avatar| !avatar.trim().is_empty())
            .unwrap_or_else(|| format!("https://picsum.photos/seed/{email}/200"));
        let employee = Employee {
            id: self.ids.employees.next_id(),
            name: form.name.trim().to_string(),
            email,
            avatar,
            role: form.role.trim().to_string(),
            department: form.department,
            salary: form.salary,
            status: form.status,
            start_date: form.start_date,
            performance_rating: NEW_EMPLOYEE_PERFORMANCE,
            satisfaction_score: NEW_EMPLOYEE_SATISFACTION,
            projects_completed: 0,
            last_review_date: today,
            performance_history: vec![PerformanceSnapshot {
                date: today,
                rating: NEW_EMPLOYEE_PERFORMANCE,
            }],
            leave_balance: NEW_EMPLOYEE_LEAVE_DAYS,
            goals: Vec::new(),
        };

        info!(employee_id = employee.id, department = %employee.department, "employee added");
        self.employees.push(employee);
        let index = self.employees.len() - 1;
        Ok(&self.employees[index])
    }

    /// Overwrites the editable fields; metrics, history and goals are kept.
    pub fn update_employee(&mut self, id: u64, form: EmployeeForm) -> Result<&Employee, StoreError> {
        form.validate()?;
        let employee = self.employee_mut(id)?;
        employee.name = form.name.trim().to_string();
        employee.email = form.email.trim().to_string();
        employee.role = form.role.trim().to_string();
        employee.department = form.department;
        employee.salary = form.salary;
        employee.status = form.status;
        employee.start_date = form.start_date;
        if let Some(avatar) = form.avatar.filter(|avatar| !avatar.trim().is_empty()) {
            employee.avatar = avatar;
        }
        debug!(employee_id = id, "employee updated");
        Ok(employee)
    }

    // Goals

    pub fn add_goal(&mut self, employee_id: u64, form: GoalForm) -> Result<&Goal, StoreError> {
        form.validate()?;
        let id = self.ids.goals.next_id();
        let employee = self.employee_mut(employee_id)?;
        employee.goals.push(Goal {
            id,
            title: form.title.trim().to_string(),
            description: form.description,
            target_date: form.target_date,
            status: form.status,
        });
        let index = employee.goals.len() - 1;
        Ok(&employee.goals[index])
    }

    pub fn update_goal(
        &mut self,
        employee_id: u64,
        goal_id: u64,
        form: GoalForm,
    ) -> Result<&Goal, StoreError> {
        form.validate()?;
        let employee = self.employee_mut(employee_id)?;
        let goal = employee
            .goals
            .iter_mut()
            .find(|goal| goal.id == goal_id)
            .ok_or_else(|| StoreError::not_found("goal", goal_id))?;
        goal.title = form.title.trim().to_string();
        goal.description = form.description;
        goal.target_date = form.target_date;
        goal.status = form.status;
        Ok(goal)
    }

    // Leave

    /// Files a pending request for `employee_id`; newest requests come first.
    pub fn submit_leave(
        &mut self,
        employee_id: u64,
        form: LeaveForm,
    ) -> Result<&LeaveRequest, StoreError> {
        form.validate()?;
        let employee_name = self
            .employee(employee_id)
            .map(|employee| employee.name.clone())
            .ok_or_else(|| StoreError::not_found("employee", employee_id))?;

        let request = LeaveRequest {
            id: self.ids.leave.next_id(),
            employee_id,
            employee_name,
            leave_type: form.leave_type,
            start_date: form.start_date,
            end_date: form.end_date,
            reason: form.reason.trim().to_string(),
            status: LeaveStatus::Pending,
        };
        info!(
            request_id = request.id,
            employee_id,
            leave_type = request.leave_type.label(),
            "leave requested"
        );
        self.leave_requests.insert(0, request);
        Ok(&self.leave_requests[0])
    }

    fn leave_index(&self, id: u64) -> Result<usize, StoreError> {
        self.leave_requests
            .iter()
            .position(|request| request.id == id)
            .ok_or_else(|| StoreError::not_found("leave request", id))
    }

    /// Approves a pending request and charges the employee's balance. An
    /// employee that no longer resolves leaves the approval uncharged.
    pub fn approve_leave(&mut self, id: u64) -> Result<&LeaveRequest, StoreError> {
        let index = self.leave_index(id)?;
        let charged = LeaveLedger::approve(&mut self.leave_requests[index])?;

        let request = &self.leave_requests[index];
        match self
            .employees
            .iter_mut()
            .find(|employee| employee.id == request.employee_id)
        {
            Some(employee) => {
                *employee = LeaveLedger::balance_after_approval(request, employee);
                info!(
                    request_id = id,
                    employee_id = employee.id,
                    charged,
                    balance = employee.leave_balance,
                    "leave approved"
                );
            }
            None => warn!(
                request_id = id,
                employee_id = request.employee_id,
                "leave approved for unknown employee; balance unchanged"
            ),
        }

        Ok(&self.leave_requests[index])
    }

    pub fn reject_leave(&mut self, id: u64) -> Result<&LeaveRequest, StoreError> {
        let index = self.leave_index(id)?;
        LeaveLedger::reject(&mut self.leave_requests[index])?;
        info!(request_id = id, "leave rejected");
        Ok(&self.leave_requests[index])
    }

    pub fn leave_report(&self, range: DateRange) -> LeaveReport {
        LeaveReport::build(&self.leave_requests, range)
    }

    // Tasks

    /// Prepends the task and, when the assignee resolves, a `New Task
    /// Assigned` update.
    pub fn create_task(
        &mut self,
        form: TaskForm,
        assigned_by_id: u64,
        now: DateTime<Utc>,
    ) -> Result<&Task, StoreError> {
        form.validate()?;
        let task = Task {
            id: self.ids.tasks.next_id(),
            title: form.title.trim().to_string(),
            description: form.description,
            assigned_to_id: form.assigned_to_id,
            assigned_by_id,
            due_date: form.due_date,
            status: form.status,
            priority: form.priority,
        };

        match self.employee(task.assigned_to_id) {
            Some(assignee) => {
                let draft = NotificationDraft::task_assigned(&task, assignee, now);
                self.notifications.push(draft);
            }
            None => debug!(task_id = task.id, "task assignee not on roster; no notification"),
        }

        info!(task_id = task.id, assignee = task.assigned_to_id, "task created");
        self.tasks.insert(0, task);
        Ok(&self.tasks[0])
    }

    pub fn update_task(&mut self, id: u64, form: TaskForm) -> Result<&Task, StoreError> {
        form.validate()?;
        let task = self
            .tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or_else(|| StoreError::not_found("task", id))?;
        task.title = form.title.trim().to_string();
        task.description = form.description;
        task.assigned_to_id = form.assigned_to_id;
        task.due_date = form.due_date;
        task.priority = form.priority;
        task.status = form.status;
        Ok(task)
    }

    /// Returns how many tasks changed; unknown ids are ignored.
    pub fn bulk_update_task_status(&mut self, ids: &[u64], status: TaskStatus) -> usize {
        let mut updated = 0;
        for task in self.tasks.iter_mut().filter(|task| ids.contains(&task.id)) {
            task.status = status;
            updated += 1;
        }
        info!(updated, status = status.label(), "task status updated");
        updated
    }

    pub fn delete_tasks(&mut self, ids: &[u64]) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|task| !ids.contains(&task.id));
        let removed = before - self.tasks.len();
        info!(removed, "tasks deleted");
        removed
    }

    // Notifications

    pub fn unread_notifications(&self) -> Vec<&Notification> {
        self.notifications.unread().collect()
    }

    pub fn mark_all_notifications_read(&mut self) -> usize {
        self.notifications.mark_all_read()
    }

    /// Runs the one-shot deadline pass; later calls are no-ops.
    pub fn run_deadline_scan(&mut self, now: DateTime<Utc>) -> usize {
        self.scanner
            .run_once(&self.tasks, &self.employees, &mut self.notifications, now)
    }

    // Announcements

    pub fn create_announcement(
        &mut self,
        form: AnnouncementForm,
        now: DateTime<Utc>,
    ) -> Result<&Announcement, StoreError> {
        form.validate()?;
        let announcement = Announcement {
            id: self.ids.announcements.next_id(),
            title: form.title.trim().to_string(),
            content: form.content,
            category: form.category,
            created_at: now,
        };
        self.announcements.insert(0, announcement);
        Ok(&self.announcements[0])
    }

    pub fn update_announcement(
        &mut self,
        id: u64,
        form: AnnouncementForm,
    ) -> Result<&Announcement, StoreError> {
        form.validate()?;
        let announcement = self
            .announcements
            .iter_mut()
            .find(|announcement| announcement.id == id)
            .ok_or_else(|| StoreError::not_found("announcement", id))?;
        announcement.title = form.title.trim().to_string();
        announcement.content = form.content;
        announcement.category = form.category;
        Ok(announcement)
    }

    pub fn delete_announcement(&mut self, id: u64) -> Result<Announcement, StoreError> {
        let index = self
            .announcements
            .iter()
            .position(|announcement| announcement.id == id)
            .ok_or_else(|| StoreError::not_found("announcement", id))?;
        Ok(self.announcements.remove(index))
    }
}
