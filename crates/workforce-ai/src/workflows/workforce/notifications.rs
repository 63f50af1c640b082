use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

use super::domain::{Employee, Notification, NotificationKind, Task, TaskStatus};
use super::ids::IdSequence;

pub const DEADLINE_ALERT_TITLE: &str = "Task Deadline Approaching";
pub const TASK_ASSIGNED_TITLE: &str = "New Task Assigned";

/// A notification that has not been given an id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationDraft {
    pub kind: NotificationKind,
    pub title: String,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}

impl NotificationDraft {
    pub fn task_assigned(task: &Task, assignee: &Employee, now: DateTime<Utc>) -> Self {
        Self {
            kind: NotificationKind::Update,
            title: TASK_ASSIGNED_TITLE.to_string(),
            description: format!("You assigned \"{}\" to {}.", task.title, assignee.name),
            timestamp: now,
        }
    }
}

/// Newest-first notification feed.
#[derive(Debug, Clone, Default)]
pub struct NotificationCenter {
    items: Vec<Notification>,
    ids: IdSequence,
}

impl NotificationCenter {
    pub fn new(existing: Vec<Notification>) -> Self {
        let ids = IdSequence::starting_after(existing.iter().map(|item| item.id));
        Self {
            items: existing,
            ids,
        }
    }

    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    pub fn unread(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter().filter(|item| !item.read)
    }

    pub fn unread_count(&self) -> usize {
        self.unread().count()
    }

    pub fn push(&mut self, draft: NotificationDraft) -> &Notification {
        let notification = self.materialize(draft);
        self.items.insert(0, notification);
        &self.items[0]
    }

    /// Drops drafts whose description already exists, then prepends the rest
    /// in their original order. Returns how many were inserted.
    pub fn prepend_unique(&mut self, drafts: Vec<NotificationDraft>) -> usize {
        let existing: HashSet<&str> = self
            .items
            .iter()
            .map(|item| item.description.as_str())
            .collect();
        let fresh: Vec<NotificationDraft> = drafts
            .into_iter()
            .filter(|draft| !existing.contains(draft.description.as_str()))
            .collect();

        let inserted = fresh.len();
        let mut batch: Vec<Notification> = fresh
            .into_iter()
            .map(|draft| self.materialize(draft))
            .collect();
        batch.append(&mut self.items);
        self.items = batch;
        inserted
    }

    pub fn mark_all_read(&mut self) -> usize {
        let mut flipped = 0;
        for item in self.items.iter_mut().filter(|item| !item.read) {
            item.read = true;
            flipped += 1;
        }
        flipped
    }

    fn materialize(&self, draft: NotificationDraft) -> Notification {
        Notification {
            id: self.ids.next_id(),
            kind: draft.kind,
            title: draft.title,
            description: draft.description,
            timestamp: draft.timestamp,
            read: false,
        }
    }
}

/// Open tasks due in `(now, now + window]` whose assignee resolves.
///
/// A due date is taken to fall at 00:00 UTC of that day.
pub fn upcoming_deadlines(
    tasks: &[Task],
    employees: &[Employee],
    now: DateTime<Utc>,
    window: Duration,
) -> Vec<NotificationDraft> {
    let by_id: HashMap<u64, &Employee> = employees.iter().map(|e| (e.id, e)).collect();
    let horizon = now + window;

    tasks
        .iter()
        .filter(|task| task.status != TaskStatus::Completed)
        .filter_map(|task| {
            let due = task.due_date.and_hms_opt(0, 0, 0)?.and_utc();
            if due <= now || due > horizon {
                return None;
            }
            let assignee = by_id.get(&task.assigned_to_id)?;
            Some(NotificationDraft {
                kind: NotificationKind::Alert,
                title: DEADLINE_ALERT_TITLE.to_string(),
                description: format!(
                    "Deadline for \"{}\" ({}) is within 24 hours.",
                    task.title, assignee.name
                ),
                timestamp: now,
            })
        })
        .collect()
}

/// One-shot deadline pass run after the initial data load.
#[derive(Debug, Clone)]
pub struct DeadlineScanner {
    has_run: bool,
    window: Duration,
}

impl Default for DeadlineScanner {
    fn default() -> Self {
        Self::new(Duration::hours(24))
    }
}

impl DeadlineScanner {
    pub fn new(window: Duration) -> Self {
        Self {
            has_run: false,
            window,
        }
    }

    pub fn has_run(&self) -> bool {
        self.has_run
    }

    /// Waits (without latching) until both tasks and employees are loaded,
    /// then scans exactly once per scanner lifetime.
    pub fn run_once(
        &mut self,
        tasks: &[Task],
        employees: &[Employee],
        center: &mut NotificationCenter,
        now: DateTime<Utc>,
    ) -> usize {
        if self.has_run {
            debug!("deadline scan already performed");
            return 0;
        }
        if tasks.is_empty() || employees.is_empty() {
            debug!("deadline scan deferred until tasks and employees are loaded");
            return 0;
        }
        self.has_run = true;

        let drafts = upcoming_deadlines(tasks, employees, now, self.window);
        let candidates = drafts.len();
        let inserted = center.prepend_unique(drafts);
        info!(candidates, inserted, "deadline scan complete");
        inserted
    }
}
