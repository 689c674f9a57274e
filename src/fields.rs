//! Enumerations and field types for task management.
//!
//! This module defines the enumerated task fields (priority and status) and the
//! view parameters the presentation layer passes to the derivation functions
//! (status filter, priority filter and sort key). Every type prints as the key
//! the stored data and the dashboard use (`"High"`, `"pending"`, `"dueDateAsc"`)
//! and parses from that key or its kebab-case CLI spelling.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::TaskError;

/// Priority classification for task importance.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash)]
pub enum Priority {
    #[serde(alias = "high")]
    High,
    #[default]
    #[serde(alias = "medium")]
    Medium,
    #[serde(alias = "low")]
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    /// Fixed ordering rank: Low < Medium < High.
    pub fn rank(self) -> u8 {
        match self {
            Priority::Low => 1,
            Priority::Medium => 2,
            Priority::High => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

/// Task completion status.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    #[serde(alias = "Pending")]
    Pending,
    #[serde(alias = "Completed")]
    Completed,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::Completed => "completed",
        }
    }

    /// The opposite status, used by the completion toggle.
    pub fn toggled(self) -> Status {
        match self {
            Status::Pending => Status::Completed,
            Status::Completed => Status::Pending,
        }
    }
}

/// Status selector for dashboard filtering.
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Completed,
}

impl StatusFilter {
    pub const ALL: [StatusFilter; 3] = [StatusFilter::All, StatusFilter::Pending, StatusFilter::Completed];

    pub fn matches(self, status: Status) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Pending => status == Status::Pending,
            StatusFilter::Completed => status == Status::Completed,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Pending => "pending",
            StatusFilter::Completed => "completed",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatusFilter::All => "All Statuses",
            StatusFilter::Pending => "Pending",
            StatusFilter::Completed => "Completed",
        }
    }
}

impl From<Status> for StatusFilter {
    fn from(status: Status) -> Self {
        match status {
            Status::Pending => StatusFilter::Pending,
            Status::Completed => StatusFilter::Completed,
        }
    }
}

/// Priority selector for dashboard filtering.
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum PriorityFilter {
    #[default]
    All,
    High,
    Medium,
    Low,
}

impl PriorityFilter {
    pub const ALL: [PriorityFilter; 4] = [
        PriorityFilter::All,
        PriorityFilter::High,
        PriorityFilter::Medium,
        PriorityFilter::Low,
    ];

    pub fn matches(self, priority: Priority) -> bool {
        match self {
            PriorityFilter::All => true,
            PriorityFilter::High => priority == Priority::High,
            PriorityFilter::Medium => priority == Priority::Medium,
            PriorityFilter::Low => priority == Priority::Low,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PriorityFilter::All => "all",
            PriorityFilter::High => "High",
            PriorityFilter::Medium => "Medium",
            PriorityFilter::Low => "Low",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PriorityFilter::All => "All Priorities",
            other => other.as_str(),
        }
    }
}

impl From<Priority> for PriorityFilter {
    fn from(priority: Priority) -> Self {
        match priority {
            Priority::High => PriorityFilter::High,
            Priority::Medium => PriorityFilter::Medium,
            Priority::Low => PriorityFilter::Low,
        }
    }
}

/// Available sorting options for task lists.
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    DueDateAsc,
    DueDateDesc,
    PriorityAsc,
    PriorityDesc,
    None,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::DueDateAsc,
        SortKey::DueDateDesc,
        SortKey::PriorityAsc,
        SortKey::PriorityDesc,
        SortKey::None,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::DueDateAsc => "dueDateAsc",
            SortKey::DueDateDesc => "dueDateDesc",
            SortKey::PriorityAsc => "priorityAsc",
            SortKey::PriorityDesc => "priorityDesc",
            SortKey::None => "none",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortKey::DueDateAsc => "Due Date ↑",
            SortKey::DueDateDesc => "Due Date ↓",
            SortKey::PriorityAsc => "Priority ↑",
            SortKey::PriorityDesc => "Priority ↓",
            SortKey::None => "Unsorted",
        }
    }
}

/// Lowercase and drop separators so `dueDateAsc`, `due-date-asc` and
/// `due_date_asc` all compare equal.
fn normalise_key(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

macro_rules! key_parsing {
    ($ty:ty, $what:literal) => {
        impl FromStr for $ty {
            type Err = TaskError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = normalise_key(s);
                <$ty>::value_variants()
                    .iter()
                    .copied()
                    .find(|v| normalise_key(v.as_str()) == wanted)
                    .ok_or_else(|| TaskError::Validation(format!("unknown {} '{}'", $what, s)))
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

key_parsing!(Priority, "priority");
key_parsing!(Status, "status");
key_parsing!(StatusFilter, "status filter");
key_parsing!(PriorityFilter, "priority filter");
key_parsing!(SortKey, "sort key");
