//! Derived table views over the roster and the task list.

mod query;
mod sort;
mod tasks;

pub use query::{roster_view, EmployeeSortKey, RosterQuery};
pub use sort::{Filter, SortDirection, SortState};
pub use tasks::{task_view, TaskQuery, TaskSortKey};
