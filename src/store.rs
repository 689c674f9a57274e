//! The task store: owner of the canonical task collection.
//!
//! Every mutation validates, applies, and writes the full collection through
//! the storage backend before returning. A failed write never fails the
//! mutation: it is logged, kept for the caller to inspect, and the in-memory
//! collection stays authoritative for the rest of the session.

use std::collections::HashSet;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::error::{PersistenceError, Result, TaskError};
use crate::fields::Status;
use crate::storage::TaskStorage;
use crate::task::{is_valid_title, Task, TaskDraft};

/// Issues timestamp-derived ids that strictly increase within a store.
///
/// Ids are decimal millisecond timestamps. Two creates inside the same
/// millisecond get consecutive values instead of colliding, and values
/// already present in the collection are skipped.
#[derive(Debug, Default)]
struct IdGenerator {
    last: i64,
}

impl IdGenerator {
    fn next(&mut self, taken: impl Fn(&str) -> bool) -> String {
        let mut candidate = Utc::now().timestamp_millis().max(self.last + 1);
        while taken(&candidate.to_string()) {
            candidate += 1;
        }
        self.last = candidate;
        candidate.to_string()
    }
}

/// Single source of truth for the task collection.
pub struct TaskStore {
    tasks: Vec<Task>,
    storage: Box<dyn TaskStorage>,
    ids: IdGenerator,
    persistence_error: Option<PersistenceError>,
}

impl TaskStore {
    /// Load the prior collection from `storage`, or start empty.
    ///
    /// Absent, unreadable or malformed state is treated as no prior state.
    /// Loaded records with a blank title or a repeated id are dropped.
    pub fn initialize(storage: impl TaskStorage + 'static) -> Self {
        let tasks = match storage.load() {
            Ok(Some(tasks)) => sanitize(tasks),
            Ok(None) => {
                debug!("no stored tasks, starting empty");
                Vec::new()
            }
            Err(e) => {
                warn!(error = %e, "could not load stored tasks, starting empty");
                Vec::new()
            }
        };
        info!(count = tasks.len(), "task store initialized");
        TaskStore {
            tasks,
            storage: Box::new(storage),
            ids: IdGenerator::default(),
            persistence_error: None,
        }
    }

    /// The collection in canonical (insertion) order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Create a task from `draft` and append it.
    pub fn add(&mut self, draft: TaskDraft) -> Result<Task> {
        ensure_title(&draft.title)?;
        let tasks = &self.tasks;
        let id = self.ids.next(|candidate| tasks.iter().any(|t| t.id == candidate));
        let task = Task::from_draft(id, draft);
        self.tasks.push(task.clone());
        info!(task_id = %task.id, "task added");
        self.persist();
        Ok(task)
    }

    /// Replace the stored task carrying `task.id` with `task`.
    pub fn update(&mut self, task: Task) -> Result<Task> {
        let idx = self.position(&task.id)?;
        ensure_title(&task.title)?;
        self.tasks[idx] = task.clone();
        info!(task_id = %task.id, "task updated");
        self.persist();
        Ok(task)
    }

    /// Remove the task with `id`. Returns whether anything was removed;
    /// a missing id is not an error.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        let removed = self.tasks.len() != before;
        if removed {
            info!(task_id = %id, "task removed");
        } else {
            debug!(task_id = %id, "remove of unknown task ignored");
        }
        self.persist();
        removed
    }

    /// Change only the status of the task with `id`.
    pub fn set_status(&mut self, id: &str, status: Status) -> Result<Task> {
        let idx = self.position(id)?;
        self.tasks[idx].status = status;
        info!(task_id = %id, status = %status, "task status set");
        self.persist();
        Ok(self.tasks[idx].clone())
    }

    /// Flip the task with `id` between pending and completed.
    pub fn toggle_status(&mut self, id: &str) -> Result<Task> {
        let idx = self.position(id)?;
        let status = self.tasks[idx].status.toggled();
        self.set_status(id, status)
    }

    /// Swap in an entirely new collection.
    ///
    /// Every title must be valid and ids must be unique; otherwise nothing
    /// changes.
    pub fn replace(&mut self, tasks: Vec<Task>) -> Result<()> {
        {
            let mut seen = HashSet::new();
            for task in &tasks {
                ensure_title(&task.title)?;
                if !seen.insert(task.id.as_str()) {
                    return Err(TaskError::Validation(format!("duplicate task id '{}'", task.id)));
                }
            }
        }
        self.tasks = tasks;
        info!(count = self.tasks.len(), "task collection replaced");
        self.persist();
        Ok(())
    }

    /// Whether the most recent write reached storage.
    pub fn is_persisting(&self) -> bool {
        self.persistence_error.is_none()
    }

    /// Take the error from the most recent failed write, if it failed.
    pub fn take_persistence_error(&mut self) -> Option<PersistenceError> {
        self.persistence_error.take()
    }

    fn position(&self, id: &str) -> Result<usize> {
        self.tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| TaskError::NotFound(id.to_string()))
    }

    fn persist(&mut self) {
        match self.storage.save(&self.tasks) {
            Ok(()) => self.persistence_error = None,
            Err(e) => {
                warn!(error = %e, "failed to persist tasks, continuing in memory");
                self.persistence_error = Some(e);
            }
        }
    }
}

fn ensure_title(title: &str) -> Result<()> {
    if is_valid_title(title) {
        Ok(())
    } else {
        Err(TaskError::Validation("title must not be empty".into()))
    }
}

/// Drop loaded records that would break the collection invariants.
fn sanitize(tasks: Vec<Task>) -> Vec<Task> {
    let mut seen = HashSet::new();
    let total = tasks.len();
    let kept: Vec<Task> = tasks
        .into_iter()
        .filter(|t| is_valid_title(&t.title) && seen.insert(t.id.clone()))
        .collect();
    if kept.len() != total {
        warn!(dropped = total - kept.len(), "dropped invalid stored tasks");
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::Priority;
    use crate::storage::{encode, MemoryStorage};

    fn seeded(tasks: &[Task]) -> TaskStore {
        TaskStore::initialize(MemoryStorage::with_raw(encode(tasks).unwrap()))
    }

    fn task(id: &str, title: &str) -> Task {
        Task::from_draft(id.into(), TaskDraft::new(title))
    }

    /// Storage that shares its text with the test so writes can be observed.
    #[derive(Clone, Default)]
    struct SharedStorage {
        inner: std::rc::Rc<std::cell::RefCell<MemoryStorage>>,
        writes: std::rc::Rc<std::cell::Cell<usize>>,
    }

    impl TaskStorage for SharedStorage {
        fn load(&self) -> std::result::Result<Option<Vec<Task>>, PersistenceError> {
            self.inner.borrow().load()
        }

        fn save(&mut self, tasks: &[Task]) -> std::result::Result<(), PersistenceError> {
            self.writes.set(self.writes.get() + 1);
            self.inner.borrow_mut().save(tasks)
        }
    }

    #[test]
    fn initialize_empty_without_prior_state() {
        let store = TaskStore::initialize(MemoryStorage::new());
        assert!(store.is_empty());
    }

    #[test]
    fn initialize_swallows_malformed_state() {
        let store = TaskStore::initialize(MemoryStorage::with_raw("definitely not json"));
        assert!(store.is_empty());
    }

    #[test]
    fn initialize_drops_blank_titles_and_duplicate_ids() {
        let raw = r#"[
            {"id":"1","title":"keep"},
            {"id":"2","title":"   "},
            {"id":"1","title":"dup"},
            {"id":"3","title":"also keep"}
        ]"#;
        let store = TaskStore::initialize(MemoryStorage::with_raw(raw));
        let titles: Vec<_> = store.tasks().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["keep", "also keep"]);
    }

    #[test]
    fn add_assigns_unique_ids_under_rapid_creation() {
        let mut store = TaskStore::initialize(MemoryStorage::new());
        let ids: HashSet<String> = (0..50)
            .map(|i| store.add(TaskDraft::new(format!("t{i}"))).unwrap().id)
            .collect();
        assert_eq!(ids.len(), 50);
        assert_eq!(store.len(), 50);
    }

    #[test]
    fn add_skips_ids_already_in_collection() {
        let future = (Utc::now().timestamp_millis() + 60_000).to_string();
        let mut store = seeded(&[task(&future, "from the future")]);
        store.ids.last = future.parse::<i64>().unwrap() - 1;
        let created = store.add(TaskDraft::new("next")).unwrap();
        assert_ne!(created.id, future);
    }

    #[test]
    fn add_rejects_blank_titles_without_writing() {
        let storage = SharedStorage::default();
        let mut store = TaskStore::initialize(storage.clone());
        for title in ["", "   ", "\n\t"] {
            let err = store.add(TaskDraft::new(title)).unwrap_err();
            assert!(matches!(err, TaskError::Validation(_)));
        }
        assert!(store.is_empty());
        assert_eq!(storage.writes.get(), 0);
    }

    #[test]
    fn add_honours_draft_status_and_appends() {
        let mut store = seeded(&[task("1", "first")]);
        let created = store
            .add(TaskDraft::new("done already").status(Status::Completed))
            .unwrap();
        assert_eq!(created.status, Status::Completed);
        assert_eq!(store.tasks().last().unwrap().id, created.id);
    }

    #[test]
    fn every_mutation_writes_once_and_reads_back() {
        let storage = SharedStorage::default();
        let mut store = TaskStore::initialize(storage.clone());

        let created = store.add(TaskDraft::new("a")).unwrap();
        assert_eq!(storage.writes.get(), 1);

        let mut edited = created.clone();
        edited.priority = Priority::High;
        store.update(edited).unwrap();
        assert_eq!(storage.writes.get(), 2);

        store.set_status(&created.id, Status::Completed).unwrap();
        assert_eq!(storage.writes.get(), 3);

        store.remove(&created.id);
        assert_eq!(storage.writes.get(), 4);

        assert_eq!(storage.inner.borrow().load().unwrap(), Some(Vec::new()));
    }

    #[test]
    fn update_replaces_whole_task() {
        let mut store = seeded(&[task("1", "old")]);
        let replacement = Task {
            id: "1".into(),
            title: "new".into(),
            description: "details".into(),
            due_date: "2024-03-01".into(),
            priority: Priority::Low,
            status: Status::Completed,
        };
        let updated = store.update(replacement.clone()).unwrap();
        assert_eq!(updated, replacement);
        assert_eq!(store.get("1"), Some(&replacement));
    }

    #[test]
    fn update_unknown_id_is_not_found_and_unchanged() {
        let mut store = seeded(&[task("1", "a")]);
        let before = store.tasks().to_vec();
        let err = store.update(task("9", "ghost")).unwrap_err();
        assert!(matches!(err, TaskError::NotFound(id) if id == "9"));
        assert_eq!(store.tasks(), before.as_slice());
    }

    #[test]
    fn update_rejects_blank_title() {
        let mut store = seeded(&[task("1", "a")]);
        let err = store.update(task("1", "  ")).unwrap_err();
        assert!(matches!(err, TaskError::Validation(_)));
        assert_eq!(store.get("1").unwrap().title, "a");
    }

    #[test]
    fn remove_unknown_id_is_a_silent_no_op() {
        let mut store = seeded(&[task("1", "a"), task("2", "b")]);
        let before = encode(store.tasks()).unwrap();
        assert!(!store.remove("nope"));
        assert_eq!(encode(store.tasks()).unwrap(), before);
        assert!(store.remove("1"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn set_status_preserves_other_fields() {
        let mut stored = task("1", "a");
        stored.description = "keep me".into();
        stored.priority = Priority::High;
        let mut store = seeded(&[stored.clone()]);

        let changed = store.set_status("1", Status::Completed).unwrap();
        assert_eq!(changed.status, Status::Completed);
        assert_eq!(changed.description, "keep me");
        assert_eq!(changed.priority, Priority::High);

        assert!(matches!(store.set_status("2", Status::Pending), Err(TaskError::NotFound(_))));
    }

    #[test]
    fn toggle_flips_status_both_ways() {
        let mut store = seeded(&[task("1", "a")]);
        assert_eq!(store.toggle_status("1").unwrap().status, Status::Completed);
        assert_eq!(store.toggle_status("1").unwrap().status, Status::Pending);
        assert!(store.toggle_status("x").is_err());
    }

    #[test]
    fn replace_validates_before_swapping() {
        let mut store = seeded(&[task("1", "a")]);
        let err = store.replace(vec![task("2", "b"), task("2", "c")]).unwrap_err();
        assert!(matches!(err, TaskError::Validation(_)));
        let err = store.replace(vec![task("3", "")]).unwrap_err();
        assert!(matches!(err, TaskError::Validation(_)));
        assert_eq!(store.len(), 1);

        store.replace(vec![task("4", "d"), task("5", "e")]).unwrap();
        let ids: Vec<_> = store.tasks().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["4", "5"]);
    }

    #[test]
    fn failed_writes_keep_memory_authoritative() {
        let mut store = TaskStore::initialize(MemoryStorage::with_quota(8));
        let created = store.add(TaskDraft::new("too big to store")).unwrap();
        assert!(!store.is_persisting());
        assert_eq!(store.get(&created.id).unwrap().title, "too big to store");
        assert!(matches!(
            store.take_persistence_error(),
            Some(PersistenceError::QuotaExceeded { .. })
        ));
        assert!(store.is_persisting());
    }
}
