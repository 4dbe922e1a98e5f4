//! Cache store location checks and writer behaviour

use confcache::cache::{signature, CacheRecord, CACHE_FORMAT_VERSION};
use confcache::{CacheLocationPolicy, CacheStatus, CacheStore, ConfigError, ConfigTree};
use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

fn tree(value: Value) -> ConfigTree {
    match value {
        Value::Object(map) => map,
        _ => panic!("expected an object"),
    }
}

#[test]
fn test_default_policy_rejects_temp_dir_before_io() {
    let dir = std::env::temp_dir().join("confcache-never-created");
    let err = CacheStore::new(dir.join("config.cache.json"), 0).unwrap_err();

    assert!(matches!(err, ConfigError::InvalidCacheLocation { .. }), "unexpected error: {err}");
    assert!(!dir.exists());
}

#[test]
fn test_web_root_is_rejected() {
    let docroot = TempDir::new().unwrap();
    let policy = CacheLocationPolicy::empty().forbid_web_root(docroot.path().to_path_buf());

    let err = CacheStore::with_policy(docroot.path().join("storage/cache.json"), 0, &policy)
        .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidCacheLocation { .. }));
    assert!(!docroot.path().join("storage").exists());
}

#[test]
fn test_stale_signature_is_deleted_on_get() {
    let tmp = TempDir::new().unwrap();
    let tracked = tmp.path().join("app.json");
    fs::write(&tracked, "{}").unwrap();
    let files = vec![tracked.clone()];

    let store = CacheStore::with_policy(
        tmp.path().join("cache/config.cache.json"),
        0,
        &CacheLocationPolicy::empty(),
    )
    .unwrap();
    store.put(&files, &tree(json!({"app": {}}))).unwrap();
    assert!(matches!(store.status(&files), CacheStatus::Valid { .. }));

    fs::write(&tracked, "{\"name\": \"changed\"}").unwrap();
    assert!(store.get(&files).is_none());
    assert!(!store.path().exists());
}

#[test]
fn test_record_layout() {
    let tmp = TempDir::new().unwrap();
    let store = CacheStore::with_policy(
        tmp.path().join("config.cache.json"),
        0,
        &CacheLocationPolicy::empty(),
    )
    .unwrap();
    let files: Vec<PathBuf> = vec![tmp.path().join("missing.json")];
    store.put(&files, &tree(json!({"db": {"host": "x"}}))).unwrap();

    let record: CacheRecord = serde_json::from_slice(&fs::read(store.path()).unwrap()).unwrap();
    assert_eq!(record.version, CACHE_FORMAT_VERSION);
    assert_eq!(record.signature, signature(&files));
    assert_eq!(Value::Object(record.data), json!({"db": {"host": "x"}}));
}

#[test]
fn test_unwritable_parent_is_cache_write_failure() {
    let tmp = TempDir::new().unwrap();
    let blocker = tmp.path().join("blocker");
    fs::write(&blocker, "a file, not a directory").unwrap();

    let store =
        CacheStore::with_policy(blocker.join("cache.json"), 0, &CacheLocationPolicy::empty())
            .unwrap();
    let err = store.put(&[], &ConfigTree::new()).unwrap_err();
    assert!(matches!(err, ConfigError::CacheWriteFailure { .. }), "unexpected error: {err}");
}

#[test]
fn test_concurrent_writers_leave_a_complete_record() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("config.cache.json");

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let path = path.clone();
            thread::spawn(move || {
                let store =
                    CacheStore::with_policy(&path, 0, &CacheLocationPolicy::empty()).unwrap();
                let big = "x".repeat(4096 * (i + 1));
                store.put(&[], &tree(json!({"writer": i, "padding": big}))).unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let store = CacheStore::with_policy(&path, 0, &CacheLocationPolicy::empty()).unwrap();
    let data = store.get(&[]).expect("a complete record survives");
    let writer = data["writer"].as_u64().unwrap() as usize;
    assert_eq!(data["padding"].as_str().unwrap().len(), 4096 * (writer + 1));
}

#[test]
fn test_reader_never_sees_a_partial_record() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("config.cache.json");
    let store = CacheStore::with_policy(&path, 0, &CacheLocationPolicy::empty()).unwrap();
    store.put(&[], &tree(json!({"round": 0, "padding": ""}))).unwrap();

    let done = Arc::new(AtomicBool::new(false));
    let reader = {
        let done = Arc::clone(&done);
        let path = path.clone();
        thread::spawn(move || {
            let store = CacheStore::with_policy(&path, 0, &CacheLocationPolicy::empty()).unwrap();
            let mut hits = 0;
            while !done.load(Ordering::SeqCst) {
                if let Some(data) = store.get(&[]) {
                    let round = data["round"].as_u64().unwrap() as usize;
                    assert_eq!(data["padding"].as_str().unwrap().len(), round * 65536);
                    hits += 1;
                }
            }
            hits
        })
    };

    for round in 1..=30usize {
        let padding = "x".repeat(round * 65536);
        store.put(&[], &tree(json!({"round": round, "padding": padding}))).unwrap();
    }
    done.store(true, Ordering::SeqCst);
    reader.join().unwrap();

    let data = store.get(&[]).expect("last record is intact");
    assert_eq!(data["round"], json!(30));
    assert!(!tmp.path().join("config.cache.json.tmp").exists());
}
