//! # taskboard
//!
//! A single-user task tracker: create, edit, delete, filter, sort and count
//! tasks, with every change written straight through to local storage.
//!
//! ## Layers
//!
//! - [`storage`] - loads and saves the whole collection under one fixed key
//!   (a JSON file, or an in-memory map).
//! - [`store`] - [`TaskStore`], the single owner of the ordered collection and
//!   its create/update/delete/status operations.
//! - [`view`] - pure filter, sort and statistics functions that build what
//!   the dashboard and task list display.
//! - [`cmd`] and [`tui`] - the `tb` command line and terminal dashboard that
//!   drive the store.
//!
//! ## Quick start
//!
//! ```
//! use taskboard::{compute_statistics, MemoryStorage, Priority, TaskDraft, TaskStore};
//!
//! let mut store = TaskStore::initialize(MemoryStorage::new());
//! let task = store.add(TaskDraft::new("Ship it").priority(Priority::High)).unwrap();
//! store.toggle_status(&task.id).unwrap();
//!
//! let stats = compute_statistics(store.tasks());
//! assert_eq!((stats.total, stats.completed, stats.pending), (1, 1, 0));
//! ```

pub mod cli;
pub mod cmd;
pub mod config;
pub mod dates;
pub mod error;
pub mod fields;
pub mod logging;
pub mod storage;
pub mod store;
pub mod task;
pub mod view;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod enums;
    pub mod input;
    pub mod run;
    pub mod task_form;
    pub mod utils;
}

pub use error::{PersistenceError, Result, TaskError};
pub use fields::{Priority, PriorityFilter, SortKey, Status, StatusFilter};
pub use storage::{JsonFileStorage, MemoryStorage, TaskStorage, STORAGE_KEY};
pub use store::TaskStore;
pub use task::{Task, TaskDraft};
pub use view::{
    compute_statistics, dashboard_view, filter_by_priority, filter_by_status, filter_by_title,
    list_view, sort_tasks, Statistics, ViewParams,
};
