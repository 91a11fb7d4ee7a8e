//! End-to-end store behaviour against real task files.

use std::fs;

use tempfile::TempDir;

use task_tracker::cmd::{cmd_add, cmd_delete, cmd_list, cmd_mark_done, cmd_update};
use task_tracker::{Error, FileStorage, Status, Task, TaskStore};

fn open(dir: &TempDir) -> TaskStore<FileStorage> {
    TaskStore::load(FileStorage::new(dir.path().join("tasks.json"))).unwrap()
}

fn summary(tasks: &[Task]) -> Vec<(u64, String, Status)> {
    tasks.iter().map(|t| (t.id, t.description.clone(), t.status)).collect()
}

#[test]
fn test_add_mark_delete_scenario() {
    let dir = TempDir::new().unwrap();

    // Each step is a separate invocation: load, one command, save.
    cmd_add(&open(&dir), "buy milk".into()).unwrap();
    assert_eq!(summary(&open(&dir).tasks()), vec![(1, "buy milk".into(), Status::NotStarted)]);

    cmd_mark_done(&open(&dir), "1").unwrap();
    assert_eq!(open(&dir).tasks()[0].status, Status::Done);

    cmd_add(&open(&dir), "walk dog".into()).unwrap();
    assert_eq!(open(&dir).tasks()[1].id, 2);

    cmd_delete(&open(&dir), "1").unwrap();
    let store = open(&dir);
    assert_eq!(summary(&store.tasks()), vec![(2, "walk dog".into(), Status::NotStarted)]);
    assert!(store.list(Some(Status::Done)).is_empty());
    cmd_list(&store, Some("done")).unwrap();
}

#[test]
fn test_round_trip_preserves_everything() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir);
    store.add("first").unwrap();
    store.add("").unwrap();
    store.add("third, with \"quotes\" and ünïcode").unwrap();
    store.mark_in_progress(1);
    store.mark_done(3);
    store.save().unwrap();

    assert_eq!(open(&dir).tasks(), store.tasks());
}

#[test]
fn test_file_format() {
    let dir = TempDir::new().unwrap();
    cmd_add(&open(&dir), "buy milk".into()).unwrap();

    let raw = fs::read_to_string(dir.path().join("tasks.json")).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let obj = doc.as_object().unwrap();
    assert_eq!(obj.len(), 1);
    let task = &obj["tasks"][0];
    assert_eq!(task["id"], 1);
    assert_eq!(task["description"], "buy milk");
    assert_eq!(task["status"], "not started");
    let created = task["created_at"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(created).is_ok());
    assert!(raw.contains("\n  \"tasks\": [\n    {\n      \"id\": 1,"));
}

#[test]
fn test_reads_file_written_elsewhere() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("tasks.json"),
        r#"{
  "tasks": [
    {"id": 4, "description": "a", "status": "in progress", "created_at": "2024-02-03T10:00:00.123456789+02:00"},
    {"id": 9, "description": "b", "status": "done", "created_at": "2024-02-04T10:00:00Z"}
  ]
}"#,
    )
    .unwrap();

    let store = open(&dir);
    assert_eq!(summary(&store.tasks()), vec![
        (4, "a".into(), Status::InProgress),
        (9, "b".into(), Status::Done),
    ]);
    assert_eq!(store.add("c").unwrap(), 10);
}

#[test]
fn test_update_with_empty_fields_still_saves() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tasks.json");
    cmd_add(&open(&dir), "keep me".into()).unwrap();

    let store = open(&dir);
    fs::remove_file(&path).unwrap();
    cmd_update(&store, "1", "", None).unwrap();

    assert!(path.exists());
    assert_eq!(open(&dir).tasks(), store.tasks());
}

#[test]
fn test_malformed_file_is_format_error() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("tasks.json"), "[1, 2, 3]").unwrap();
    let result = TaskStore::load(FileStorage::new(dir.path().join("tasks.json")));
    assert!(matches!(result, Err(Error::Format(_))));

    fs::write(dir.path().join("tasks.json"), r#"{"tasks": [{"id": 1, "description": "x", "status": "finished", "created_at": "2024-01-01T00:00:00Z"}]}"#).unwrap();
    let result = TaskStore::load(FileStorage::new(dir.path().join("tasks.json")));
    assert!(matches!(result, Err(Error::Format(_))));
}

#[test]
fn test_unreadable_path_is_storage_error() {
    let dir = TempDir::new().unwrap();
    let result = TaskStore::load(FileStorage::new(dir.path()));
    assert!(matches!(result, Err(Error::Storage { .. })));
}

#[test]
fn test_failed_save_keeps_in_memory_change() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("gone").join("tasks.json");
    let store = TaskStore::load(FileStorage::new(&path)).unwrap();

    let err = cmd_add(&store, "unsaved".into()).unwrap_err();
    assert!(matches!(err, Error::Storage { .. }));
    assert_eq!(store.tasks().len(), 1);

    fs::create_dir(dir.path().join("gone")).unwrap();
    store.save().unwrap();
    let reloaded = TaskStore::load(FileStorage::new(&path)).unwrap();
    assert_eq!(reloaded.tasks(), store.tasks());
}

#[test]
fn test_failed_save_leaves_previous_file_intact() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tasks.json");
    cmd_add(&open(&dir), "original".into()).unwrap();
    let before = fs::read_to_string(&path).unwrap();

    // A directory squatting on the temp path makes the write fail before the rename.
    fs::create_dir(dir.path().join("tasks.json.tmp")).unwrap();
    let store = open(&dir);
    store.add("second").unwrap();
    assert!(store.save().is_err());

    assert_eq!(fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn test_empty_collection_written_as_null_loads() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("tasks.json"), "{\n  \"tasks\": null\n}").unwrap();

    cmd_add(&open(&dir), "after null".into()).unwrap();
    assert_eq!(summary(&open(&dir).tasks()), vec![(1, "after null".into(), Status::NotStarted)]);
}
