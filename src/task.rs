//! Task data structure and related functionality.
//!
//! This module defines the `Task` record exactly as it is persisted, and the
//! `TaskDraft` a caller fills in to create one. The store assigns ids; a draft
//! never carries one.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dates::parse_iso_date;
use crate::fields::{Priority, Status};

/// A single trackable work item.
///
/// Field names serialize in camelCase (`dueDate`). Missing optional fields in
/// stored data fall back to their defaults so older records stay readable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// ISO `YYYY-MM-DD`, or empty when no due date is set.
    #[serde(default)]
    pub due_date: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: Status,
}

impl Task {
    /// Build a task from a draft with a store-assigned id.
    pub fn from_draft(id: String, draft: TaskDraft) -> Self {
        Task {
            id,
            title: draft.title,
            description: draft.description,
            due_date: draft.due_date,
            priority: draft.priority,
            status: draft.status.unwrap_or_default(),
        }
    }

    /// The parsed due date, or `None` when unset or not a valid ISO date.
    pub fn due(&self) -> Option<NaiveDate> {
        parse_iso_date(&self.due_date)
    }

    pub fn is_completed(&self) -> bool {
        self.status == Status::Completed
    }
}

/// Caller-supplied fields for a new task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub due_date: String,
    pub priority: Priority,
    /// Defaults to pending when `None`.
    pub status: Option<Status>,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        TaskDraft {
            title: title.into(),
            ..TaskDraft::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn due_date(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = due_date.into();
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }
}

/// Whether a title is acceptable: non-empty after trimming.
pub fn is_valid_title(title: &str) -> bool {
    !title.trim().is_empty()
}
