use super::common::*;

use crate::workflows::workforce::domain::{Department, EmployeeStatus, TaskPriority, TaskStatus};
use crate::workflows::workforce::roster::{
    roster_view, task_view, EmployeeSortKey, Filter, RosterQuery, SortDirection, SortState,
    TaskQuery, TaskSortKey,
};

fn ids(view: &[&crate::workflows::workforce::domain::Employee]) -> Vec<u64> {
    view.iter().map(|employee| employee.id).collect()
}

#[test]
fn blank_query_returns_everyone_in_input_order() {
    let employees = roster();
    let view = roster_view(&employees, &RosterQuery::default());
    assert_eq!(ids(&view), vec![1, 2, 3, 4, 5]);

    let whitespace = RosterQuery::default().with_search("   ");
    assert_eq!(ids(&roster_view(&employees, &whitespace)), vec![1, 2, 3, 4, 5]);
}

#[test]
fn search_is_case_insensitive_across_name_role_and_department() {
    let employees = roster();

    let by_name = RosterQuery::default().with_search("ALICE");
    assert_eq!(ids(&roster_view(&employees, &by_name)), vec![1]);

    let by_role = RosterQuery::default().with_search("manager");
    assert_eq!(ids(&roster_view(&employees, &by_role)), vec![4]);

    let by_department = RosterQuery::default().with_search("human res");
    assert_eq!(ids(&roster_view(&employees, &by_department)), vec![3]);

    let shared = RosterQuery::default().with_search("engineer");
    assert_eq!(ids(&roster_view(&employees, &shared)), vec![1, 4]);
}

#[test]
fn filters_combine_with_search() {
    let employees = roster();

    let engineering = RosterQuery::default().with_department(Department::Engineering);
    assert_eq!(ids(&roster_view(&employees, &engineering)), vec![1, 4]);

    let inactive = RosterQuery::default().with_status(EmployeeStatus::Inactive);
    assert_eq!(ids(&roster_view(&employees, &inactive)), vec![3]);

    let narrowed = RosterQuery::default()
        .with_search("a")
        .with_department(Department::Engineering)
        .with_status(EmployeeStatus::Active);
    assert_eq!(ids(&roster_view(&employees, &narrowed)), vec![1, 4]);

    let nobody = RosterQuery::default()
        .with_department(Department::Finance)
        .with_search("alice");
    assert!(roster_view(&employees, &nobody).is_empty());
}

#[test]
fn view_is_a_subset_of_the_input() {
    let employees = roster();
    let query = RosterQuery::default()
        .with_search("o")
        .with_sort(SortState::by(EmployeeSortKey::Name, SortDirection::Desc));

    let view = roster_view(&employees, &query);
    assert!(view.len() <= employees.len());
    for employee in &view {
        assert!(query.matches(employee));
        assert!(employees.iter().any(|candidate| candidate.id == employee.id));
    }
}

#[test]
fn recomputing_the_view_is_idempotent() {
    let employees = roster();
    let query = RosterQuery::default()
        .with_status(EmployeeStatus::Active)
        .with_sort(SortState::by(EmployeeSortKey::Salary, SortDirection::Asc));

    let first = ids(&roster_view(&employees, &query));
    let second = ids(&roster_view(&employees, &query));
    assert_eq!(first, second);
}

#[test]
fn salary_ties_keep_input_order_in_both_directions() {
    let employees = roster();

    let asc = RosterQuery::default()
        .with_sort(SortState::by(EmployeeSortKey::Salary, SortDirection::Asc));
    assert_eq!(ids(&roster_view(&employees, &asc)), vec![3, 5, 2, 4, 1]);

    let desc = RosterQuery::default()
        .with_sort(SortState::by(EmployeeSortKey::Salary, SortDirection::Desc));
    assert_eq!(ids(&roster_view(&employees, &desc)), vec![1, 2, 4, 5, 3]);
}

#[test]
fn toggling_a_column_three_times_restores_input_order() {
    let employees = roster();
    let mut query = RosterQuery::default();

    query.sort.toggle(EmployeeSortKey::Name);
    assert_eq!(ids(&roster_view(&employees, &query)), vec![1, 2, 3, 4, 5]);

    query.sort.toggle(EmployeeSortKey::Name);
    assert_eq!(ids(&roster_view(&employees, &query)), vec![5, 4, 3, 2, 1]);

    query.sort.toggle(EmployeeSortKey::Name);
    assert_eq!(query.sort, SortState::unsorted());
    assert_eq!(ids(&roster_view(&employees, &query)), vec![1, 2, 3, 4, 5]);
}

#[test]
fn text_columns_sort_lexically() {
    let employees = roster();
    let query = RosterQuery::default()
        .with_sort(SortState::by(EmployeeSortKey::Department, SortDirection::Asc));
    // Design, Engineering x2, Human Resources, Sales
    assert_eq!(ids(&roster_view(&employees, &query)), vec![2, 1, 4, 3, 5]);
}

#[test]
fn sort_keys_parse_from_query_strings() {
    assert_eq!(EmployeeSortKey::parse("start-date"), Some(EmployeeSortKey::StartDate));
    assert_eq!(EmployeeSortKey::parse(" Salary "), Some(EmployeeSortKey::Salary));
    assert_eq!(EmployeeSortKey::parse("shoe_size"), None);
}

#[test]
fn task_view_filters_and_orders_by_priority_rank() {
    let mut tasks = vec![
        task(1, "Quarterly report", 1, date(2024, 6, 2), TaskStatus::InProgress),
        task(2, "Design review", 2, date(2024, 6, 20), TaskStatus::ToDo),
        task(3, "Onboarding deck", 1, date(2024, 6, 9), TaskStatus::ToDo),
    ];
    tasks[0].priority = TaskPriority::Low;
    tasks[1].priority = TaskPriority::High;

    let by_priority = TaskQuery {
        sort: SortState::by(TaskSortKey::Priority, SortDirection::Desc),
        ..TaskQuery::default()
    };
    let order: Vec<u64> = task_view(&tasks, &by_priority).iter().map(|t| t.id).collect();
    assert_eq!(order, vec![2, 3, 1]);

    let mine = TaskQuery {
        assignee: Filter::Only(1),
        status: Filter::Only(TaskStatus::ToDo),
        sort: SortState::by(TaskSortKey::DueDate, SortDirection::Asc),
        ..TaskQuery::default()
    };
    let order: Vec<u64> = task_view(&tasks, &mine).iter().map(|t| t.id).collect();
    assert_eq!(order, vec![3]);
}
