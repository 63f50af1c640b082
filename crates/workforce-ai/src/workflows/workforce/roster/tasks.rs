use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::sort::{Filter, SortState};
use crate::workflows::workforce::domain::{Task, TaskPriority, TaskStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskSortKey {
    Title,
    DueDate,
    Priority,
    Status,
}

impl TaskSortKey {
    pub fn compare(self, a: &Task, b: &Task) -> Ordering {
        match self {
            Self::Title => a.title.cmp(&b.title),
            Self::DueDate => a.due_date.cmp(&b.due_date),
            Self::Priority => a.priority.rank().cmp(&b.priority.rank()),
            Self::Status => a.status.label().cmp(b.status.label()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskQuery {
    #[serde(default)]
    pub status: Filter<TaskStatus>,
    #[serde(default)]
    pub priority: Filter<TaskPriority>,
    #[serde(default)]
    pub assignee: Filter<u64>,
    #[serde(default)]
    pub sort: SortState<TaskSortKey>,
}

impl TaskQuery {
    pub fn matches(&self, task: &Task) -> bool {
        self.status.matches(&task.status)
            && self.priority.matches(&task.priority)
            && self.assignee.matches(&task.assigned_to_id)
    }
}

pub fn task_view<'a>(tasks: &'a [Task], query: &TaskQuery) -> Vec<&'a Task> {
    let mut view: Vec<&Task> = tasks.iter().filter(|task| query.matches(task)).collect();
    query.sort.sort_by(&mut view, |key, a, b| key.compare(a, b));
    view
}
