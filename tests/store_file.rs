use chrono::NaiveDate;
use smarttask::id::{SequentialIdGenerator, UlidIdGenerator};
use smarttask::persist::{KeyValueSnapshots, KeyValueStore, PersistenceAdapter};
use smarttask::storage::FileKeyValueStore;
use smarttask::suggest::FALLBACK_SUGGESTION;
use smarttask::{NewTask, Priority, StatusFilter, TaskStatus, TaskStore};
use tempfile::TempDir;

fn file_adapter(dir: &TempDir) -> KeyValueSnapshots<FileKeyValueStore> {
    KeyValueSnapshots::new(FileKeyValueStore::new(dir.path()))
}

#[test]
fn file_snapshot_survives_reopen() {
    let dir = TempDir::new().expect("tempdir");
    let mut store = TaskStore::open(file_adapter(&dir), UlidIdGenerator::new()).value;

    let meeting = store
        .create(NewTask {
            title: "Quarterly meeting".to_string(),
            description: "Review the roadmap with everyone on the team, then agree on owners".to_string(),
            priority: Priority::High,
            category: "Work".to_string(),
            due_date: NaiveDate::from_ymd_opt(2030, 2, 1),
        })
        .into_value()
        .expect("created");
    let chore = store
        .create(NewTask::titled("Random task"))
        .into_value()
        .expect("created");
    let gone = store
        .create(NewTask::titled("Delete me"))
        .into_value()
        .expect("created");
    store.update_status(&chore.id, TaskStatus::Completed).into_value();
    store.delete(&gone.id).into_value();

    assert_eq!(meeting.ai_suggestions.len(), 3);
    assert_eq!(chore.ai_suggestions, vec![FALLBACK_SUGGESTION]);

    let expected = store.tasks().to_vec();
    let reopened = TaskStore::open(file_adapter(&dir), UlidIdGenerator::new());
    assert!(reopened.persist_error.is_none());
    assert_eq!(reopened.value.tasks(), expected.as_slice());
}

#[test]
fn fresh_directory_starts_empty() {
    let dir = TempDir::new().expect("tempdir");
    let opened = TaskStore::open(
        file_adapter(&dir),
        SequentialIdGenerator::new("t"),
    );
    assert!(opened.persist_error.is_none());
    assert!(opened.value.is_empty());
    assert!(!dir.path().join("smartTasks.json").exists());
}

#[test]
fn corrupt_file_reports_and_starts_empty() {
    let dir = TempDir::new().expect("tempdir");
    let mut raw = FileKeyValueStore::new(dir.path());
    raw.set("smartTasks", "[{\"id\":").expect("write");

    let opened = TaskStore::open(file_adapter(&dir), SequentialIdGenerator::new("t"));
    assert!(opened.persist_error.is_some());
    assert!(opened.value.is_empty());
}

#[test]
fn rapid_creates_get_distinct_ids() {
    let dir = TempDir::new().expect("tempdir");
    let mut store = TaskStore::open(file_adapter(&dir), UlidIdGenerator::new()).value;
    for n in 0..50 {
        store
            .create(NewTask::titled(format!("task {n}")))
            .into_value()
            .expect("created");
    }
    let mut ids: Vec<&str> = store.tasks().iter().map(|task| task.id.as_str()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 50);
}

#[test]
fn query_after_reload_matches_in_memory_query() {
    let dir = TempDir::new().expect("tempdir");
    let mut store = TaskStore::open(file_adapter(&dir), SequentialIdGenerator::new("t")).value;
    for title in ["Project alpha", "Email vendor", "Project beta"] {
        store.create(NewTask::titled(title)).into_value();
    }
    store.update_status("t-3", TaskStatus::InProgress).into_value();

    let before: Vec<String> = store
        .query_tasks(StatusFilter::All, "project")
        .into_iter()
        .map(|task| task.id.clone())
        .collect();
    assert_eq!(before, vec!["t-1", "t-3"]);

    let reloaded = file_adapter(&dir).load_snapshot().expect("load");
    let after: Vec<String> = smarttask::query::filter_tasks(
        &reloaded,
        StatusFilter::Only(TaskStatus::InProgress),
        "PROJECT",
    )
    .into_iter()
    .map(|task| task.id.clone())
    .collect();
    assert_eq!(after, vec!["t-3"]);
}

#[test]
fn two_stores_on_one_directory_keep_both_tasks() {
    let dir = TempDir::new().expect("tempdir");
    let mut first = TaskStore::open(file_adapter(&dir), UlidIdGenerator::new()).value;
    let mut second = TaskStore::open(file_adapter(&dir), UlidIdGenerator::new()).value;

    let from_first = first
        .create(NewTask::titled("from first"))
        .into_value()
        .expect("created");
    let from_second = second
        .create(NewTask::titled("from second"))
        .into_value()
        .expect("created");

    let saved: Vec<String> = file_adapter(&dir)
        .load_snapshot()
        .expect("load")
        .into_iter()
        .map(|task| task.title)
        .collect();
    assert_eq!(saved, vec!["from first", "from second"]);

    // A status change from the first store keeps the second store's task.
    let outcome = first.update_status(&from_first.id, TaskStatus::Completed);
    assert!(outcome.persist_error.is_none());
    assert_eq!(first.len(), 2);
    assert_eq!(first.get(&from_second.id), Some(&from_second));

    let reopened = TaskStore::open(file_adapter(&dir), UlidIdGenerator::new()).value;
    assert_eq!(reopened.tasks(), first.tasks());
}

#[test]
fn interleaved_processes_lose_no_tasks() {
    let dir = TempDir::new().expect("tempdir");
    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let root = dir.path().to_path_buf();
            std::thread::spawn(move || {
                let adapter = KeyValueSnapshots::new(FileKeyValueStore::new(root));
                let mut store = TaskStore::open(adapter, UlidIdGenerator::new()).value;
                for n in 0..5 {
                    let outcome = store.create(NewTask::titled(format!("worker {worker} task {n}")));
                    assert!(outcome.persist_error.is_none());
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("worker");
    }

    let saved = file_adapter(&dir).load_snapshot().expect("load");
    assert_eq!(saved.len(), 20);
}
