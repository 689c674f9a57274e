use taskboard::{
    compute_statistics, dashboard_view, filter_by_status, list_view, sort_tasks, JsonFileStorage,
    MemoryStorage, Priority, PriorityFilter, SortKey, Status, StatusFilter, Task, TaskDraft,
    TaskError, TaskStore,
};

fn task(id: &str, title: &str, due: &str, priority: Priority, status: Status) -> Task {
    Task {
        id: id.into(),
        title: title.into(),
        description: String::new(),
        due_date: due.into(),
        priority,
        status,
    }
}

fn two_task_store() -> TaskStore {
    let mut store = TaskStore::initialize(MemoryStorage::new());
    store
        .replace(vec![
            task("1", "A", "2024-01-10", Priority::Low, Status::Pending),
            task("2", "B", "2024-01-05", Priority::High, Status::Completed),
        ])
        .unwrap();
    store
}

fn ids(tasks: &[&Task]) -> Vec<String> {
    tasks.iter().map(|t| t.id.clone()).collect()
}

#[test]
fn two_task_statistics_and_sorts() {
    let store = two_task_store();

    let stats = compute_statistics(store.tasks());
    assert_eq!((stats.total, stats.completed, stats.pending), (2, 1, 1));

    assert_eq!(ids(&sort_tasks(store.tasks(), SortKey::DueDateAsc)), ["2", "1"]);
    assert_eq!(ids(&sort_tasks(store.tasks(), SortKey::PriorityDesc)), ["2", "1"]);
    assert_eq!(ids(&sort_tasks(store.tasks(), SortKey::PriorityAsc)), ["1", "2"]);
    assert_eq!(ids(&sort_tasks(store.tasks(), SortKey::None)), ["1", "2"]);
}

#[test]
fn adding_and_completing_updates_statistics() {
    let mut store = two_task_store();

    let added = store.add(TaskDraft::new("New")).unwrap();
    assert_eq!(store.len(), 3);
    assert_eq!(added.status, Status::Pending);
    assert_eq!(added.priority, Priority::Medium);
    assert!(added.id != "1" && added.id != "2");

    let mut store = two_task_store();
    store.set_status("1", Status::Completed).unwrap();
    let stats = compute_statistics(store.tasks());
    assert_eq!((stats.total, stats.completed, stats.pending), (2, 2, 0));
}

#[test]
fn rejected_operations_leave_collection_unchanged() {
    let mut store = two_task_store();
    let before = store.tasks().to_vec();

    assert!(matches!(store.add(TaskDraft::new("")), Err(TaskError::Validation(_))));
    assert!(matches!(store.add(TaskDraft::new(" \t ")), Err(TaskError::Validation(_))));
    assert!(matches!(
        store.update(task("99", "Ghost", "", Priority::Low, Status::Pending)),
        Err(TaskError::NotFound(_))
    ));
    assert!(!store.remove("99"));

    assert_eq!(store.tasks(), before.as_slice());
}

#[test]
fn ids_stay_unique_across_rapid_adds() {
    let mut store = TaskStore::initialize(MemoryStorage::new());
    let mut seen = std::collections::HashSet::new();
    for i in 0..50 {
        let task = store.add(TaskDraft::new(format!("Task {i}"))).unwrap();
        assert!(seen.insert(task.id));
        assert_eq!(store.len(), i + 1);
    }
}

#[test]
fn file_storage_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.json");

    let saved = {
        let mut store = TaskStore::initialize(JsonFileStorage::new(&path));
        store
            .add(TaskDraft::new("Persist me").due_date("2024-02-01").priority(Priority::High))
            .unwrap();
        let second = store.add(TaskDraft::new("Then finish")).unwrap();
        store.toggle_status(&second.id).unwrap();
        assert!(store.is_persisting());
        store.tasks().to_vec()
    };

    let reopened = TaskStore::initialize(JsonFileStorage::new(&path));
    assert_eq!(reopened.tasks(), saved.as_slice());
}

#[test]
fn views_compose_without_touching_store_order() {
    let mut store = two_task_store();
    store
        .add(TaskDraft::new("Another A").priority(Priority::Low))
        .unwrap();

    let all = filter_by_status(store.tasks(), StatusFilter::All);
    assert_eq!(all.len(), store.len());
    let completed = filter_by_status(store.tasks(), StatusFilter::Completed);
    assert_eq!(ids(&completed), ["2"]);

    let low_pending = dashboard_view(store.tasks(), StatusFilter::Pending, PriorityFilter::Low);
    assert_eq!(low_pending.len(), 2);

    let listed = list_view(store.tasks(), "a", SortKey::DueDateAsc);
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, "1");

    assert_eq!(store.tasks()[0].id, "1");
    assert_eq!(store.tasks()[1].id, "2");
}
