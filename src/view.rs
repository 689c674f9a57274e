//! Derived, display-ready views over the task collection.
//!
//! Everything here is a pure function of its inputs. Each takes any iterator
//! of task references and returns a new `Vec<&Task>`, so filters compose in
//! any order and never touch the store's canonical ordering.

use std::cmp::Ordering;

use serde::Serialize;

use crate::fields::{PriorityFilter, SortKey, StatusFilter};
use crate::task::Task;

/// Aggregate counts over a set of tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Statistics {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

impl Statistics {
    /// Completed share of the total, 0 when there are no tasks.
    pub fn completion_percent(&self) -> u16 {
        if self.total == 0 {
            0
        } else {
            (self.completed * 100 / self.total) as u16
        }
    }
}

/// The UI-selected view parameters with their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewParams {
    pub status: StatusFilter,
    pub priority: PriorityFilter,
    pub search: String,
    pub sort: SortKey,
}

pub fn filter_by_status<'a, I>(tasks: I, status: StatusFilter) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    tasks.into_iter().filter(|t| status.matches(t.status)).collect()
}

pub fn filter_by_priority<'a, I>(tasks: I, priority: PriorityFilter) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    tasks.into_iter().filter(|t| priority.matches(t.priority)).collect()
}

/// Case-insensitive substring match on the title. An empty term keeps all.
pub fn filter_by_title<'a, I>(tasks: I, term: &str) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    let term = term.to_lowercase();
    tasks
        .into_iter()
        .filter(|t| term.is_empty() || t.title.to_lowercase().contains(&term))
        .collect()
}

/// Stable sort by `key`.
///
/// Tasks without a parseable due date sort after all dated tasks for both
/// date directions.
pub fn sort_tasks<'a, I>(tasks: I, key: SortKey) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut sorted: Vec<&Task> = tasks.into_iter().collect();
    match key {
        SortKey::DueDateAsc => sorted.sort_by(|a, b| by_due(a, b, false)),
        SortKey::DueDateDesc => sorted.sort_by(|a, b| by_due(a, b, true)),
        SortKey::PriorityAsc => sorted.sort_by_key(|t| t.priority.rank()),
        SortKey::PriorityDesc => sorted.sort_by_key(|t| std::cmp::Reverse(t.priority.rank())),
        SortKey::None => {}
    }
    sorted
}

fn by_due(a: &Task, b: &Task, descending: bool) -> Ordering {
    match (a.due(), b.due()) {
        (Some(x), Some(y)) if descending => y.cmp(&x),
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub fn compute_statistics<'a, I>(tasks: I) -> Statistics
where
    I: IntoIterator<Item = &'a Task>,
{
    tasks.into_iter().fold(Statistics::default(), |mut stats, t| {
        stats.total += 1;
        if t.is_completed() {
            stats.completed += 1;
        } else {
            stats.pending += 1;
        }
        stats
    })
}

/// Dashboard composition: status filter, then priority filter.
pub fn dashboard_view<'a, I>(tasks: I, status: StatusFilter, priority: PriorityFilter) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    filter_by_priority(filter_by_status(tasks, status), priority)
}

/// Task list composition: title search, then sort.
pub fn list_view<'a, I>(tasks: I, term: &str, sort: SortKey) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    sort_tasks(filter_by_title(tasks, term), sort)
}

impl ViewParams {
    /// Every filter in `self`, then the sort.
    pub fn apply<'a, I>(&self, tasks: I) -> Vec<&'a Task>
    where
        I: IntoIterator<Item = &'a Task>,
    {
        let filtered = filter_by_title(dashboard_view(tasks, self.status, self.priority), &self.search);
        sort_tasks(filtered, self.sort)
    }
}
