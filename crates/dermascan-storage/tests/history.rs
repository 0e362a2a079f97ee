mod common;

use dermascan_core::models::metrics::{Metric, ParsedMetrics};
use dermascan_core::storage_keys;
use dermascan_storage::error::StorageError;
use dermascan_storage::{AppendOutcome, HistoryStore, KeyValueStore, MemoryStore};
use uuid::Uuid;

use common::record;

fn texts(records: &[dermascan_core::models::history::HistoryRecord]) -> Vec<String> {
    records.iter().map(|r| r.response.text.clone()).collect()
}

#[test]
fn list_is_newest_first() {
    let mut store = MemoryStore::new();
    let mut history = HistoryStore::new(&mut store);

    history.append(record(20), 10).expect("append");
    history.append(record(10), 10).expect("append");
    history.append(record(30), 10).expect("append");

    assert_eq!(
        texts(&history.list().expect("list")),
        vec!["report 30", "report 20", "report 10"]
    );
}

#[test]
fn appending_past_the_cap_evicts_the_oldest() {
    let mut store = MemoryStore::new();
    let mut history = HistoryStore::new(&mut store);

    for second in 1..=3 {
        assert_eq!(
            history.append(record(second), 3).expect("append"),
            AppendOutcome::Stored { evicted: 0 }
        );
    }
    assert_eq!(
        history.append(record(4), 3).expect("append"),
        AppendOutcome::Stored { evicted: 1 }
    );

    assert_eq!(
        texts(&history.list().expect("list")),
        vec!["report 4", "report 3", "report 2"]
    );
}

#[test]
fn over_quota_keeps_only_the_newest_record() {
    // Room for two records but not three.
    let single = serde_json::to_string(&vec![record(1)]).expect("serialize").len() as u64;
    let mut store = MemoryStore::with_quota(single * 2);
    let mut history = HistoryStore::new(&mut store);

    history.append(record(1), 20).expect("append");
    assert_eq!(
        history.append(record(2), 20).expect("append"),
        AppendOutcome::Stored { evicted: 0 }
    );
    assert_eq!(
        history.append(record(3), 20).expect("append"),
        AppendOutcome::KeptNewestOnly { dropped: 2 }
    );

    assert_eq!(texts(&history.list().expect("list")), vec!["report 3"]);
}

#[test]
fn record_larger_than_quota_is_an_error() {
    let mut store = MemoryStore::with_quota(16);
    let mut history = HistoryStore::new(&mut store);

    let err = history.append(record(1), 20).expect_err("cannot fit");
    assert!(err.is_quota_exceeded());
    assert!(history.list().expect("list").is_empty());
}

#[test]
fn corrupted_history_loads_as_empty_and_is_overwritten() {
    let mut store = MemoryStore::new();
    store
        .set(storage_keys::HISTORY, "{not json")
        .expect("seed corrupt value");

    let mut history = HistoryStore::new(&mut store);
    assert!(history.list().expect("list").is_empty());

    history.append(record(5), 20).expect("append");
    assert_eq!(history.list().expect("list").len(), 1);
}

#[test]
fn delete_and_clear() {
    let mut store = MemoryStore::new();
    let mut history = HistoryStore::new(&mut store);
    let first = record(1);
    let first_id = first.id;
    history.append(first, 20).expect("append");
    history.append(record(2), 20).expect("append");

    assert!(history.delete(first_id).expect("delete"));
    assert!(!history.delete(first_id).expect("delete again"));
    assert!(history.get(first_id).expect("get").is_none());
    assert_eq!(history.list().expect("list").len(), 1);

    history.clear().expect("clear");
    assert!(history.list().expect("list").is_empty());
}

#[test]
fn lesion_assignment_and_metric_cache() {
    let mut store = MemoryStore::new();
    let mut history = HistoryStore::new(&mut store);
    let lesion = Uuid::new_v4();

    let a = record(1);
    let b = record(2);
    let (a_id, b_id) = (a.id, b.id);
    history.append(a, 20).expect("append");
    history.append(b, 20).expect("append");
    history.append(record(3), 20).expect("append");

    history.assign_lesion(a_id, Some(lesion)).expect("assign");
    history.assign_lesion(b_id, Some(lesion)).expect("assign");

    let linked = history.for_lesion(lesion).expect("for lesion");
    assert_eq!(linked.iter().map(|r| r.id).collect::<Vec<_>>(), vec![b_id, a_id]);

    history.assign_lesion(a_id, None).expect("unassign");
    assert_eq!(history.for_lesion(lesion).expect("for lesion").len(), 1);

    let metrics = ParsedMetrics {
        isic_risk: Metric::Present(4),
        ..ParsedMetrics::default()
    };
    history.cache_metrics(b_id, metrics.clone()).expect("cache");
    assert_eq!(history.get(b_id).expect("get").and_then(|r| r.metrics), Some(metrics));

    let missing = history.assign_lesion(Uuid::new_v4(), Some(lesion));
    assert!(matches!(missing, Err(StorageError::NotFound { .. })));
}
