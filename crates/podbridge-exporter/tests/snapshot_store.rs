#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use podbridge_exporter::snapshot::SnapshotStore;

#[tokio::test]
async fn absent_is_distinct_from_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = SnapshotStore::new(dir.path().join("metrics.prom"));

    assert_eq!(store.load().await.unwrap(), None);
    assert!(!store.exists().await);

    store.publish("").await.unwrap();
    assert_eq!(store.load().await.unwrap(), Some(String::new()));
}

#[tokio::test]
async fn publish_replaces_wholesale() {
    let dir = tempfile::tempdir().unwrap();
    let store = SnapshotStore::new(dir.path().join("metrics.prom"));

    store.publish("first\nsnapshot with more lines").await.unwrap();
    store.publish("second").await.unwrap();
    assert_eq!(store.load().await.unwrap().as_deref(), Some("second"));

    // no temp file left behind
    let names: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(names.len(), 1);
}

#[tokio::test]
async fn failed_publish_keeps_previous_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let store = SnapshotStore::new(dir.path().join("metrics.prom"));
    store.publish("good").await.unwrap();

    // a directory squatting on the temp path makes the write fail
    std::fs::create_dir(dir.path().join(".metrics.prom.tmp")).unwrap();
    let err = store.publish("bad").await.unwrap_err();
    assert_eq!(err.stage().as_str(), "snapshot");

    assert_eq!(store.load().await.unwrap().as_deref(), Some("good"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn readers_never_see_partial_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let store = SnapshotStore::new(dir.path().join("metrics.prom"));

    let a: Arc<str> = "a".repeat(1 << 20).into();
    let b: Arc<str> = "b".repeat(3 << 19).into();
    store.publish(&a).await.unwrap();

    let done = Arc::new(AtomicBool::new(false));
    let mut readers = Vec::new();
    for _ in 0..3 {
        let (store, a, b, done) = (store.clone(), a.clone(), b.clone(), done.clone());
        readers.push(tokio::spawn(async move {
            let mut reads = 0usize;
            loop {
                let text = store.load().await.unwrap().expect("snapshot present");
                assert!(text == *a || text == *b, "partial read of {} bytes", text.len());
                reads += 1;
                if done.load(Ordering::Relaxed) {
                    break;
                }
            }
            reads
        }));
    }

    for i in 0..40 {
        let text = if i % 2 == 0 { &b } else { &a };
        store.publish(text).await.unwrap();
    }
    done.store(true, Ordering::Relaxed);

    for r in readers {
        assert!(r.await.unwrap() > 0);
    }
}

#[tokio::test]
async fn reading_a_directory_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = SnapshotStore::new(dir.path());
    assert!(store.load().await.is_err());
}
