//! Query cache integration tests against the in-memory notification service

mod common;

use common::{notification, sample_feed, FakeNotificationService};
use notification_feed::{FetchError, QueryCache, QueryStatus};
use serde_json::json;

#[tokio::test]
async fn test_resolved_list_matches_server_order() {
    let service = FakeNotificationService::with_notifications(sample_feed());
    let cache = QueryCache::new(service.client());

    let snapshot = cache.read().await;

    assert_eq!(snapshot.status, QueryStatus::Resolved);
    let ids: Vec<String> = snapshot
        .notifications()
        .unwrap()
        .iter()
        .map(|n| n.id.to_string())
        .collect();
    assert_eq!(ids, service.notification_ids());
    assert_eq!(service.list_calls(), 1);
}

#[tokio::test]
async fn test_concurrent_reads_share_one_fetch() {
    let service = FakeNotificationService::with_notifications(sample_feed());
    service.hold_lists();
    let cache = QueryCache::new(service.client());

    // The last future runs after the three reads have parked on the fetch
    let (a, b, c, _) = tokio::join!(cache.read(), cache.read(), cache.read(), async {
        service.release_lists(1)
    });

    assert_eq!(service.list_calls(), 1);
    for snapshot in [&a, &b, &c] {
        assert_eq!(snapshot.status, QueryStatus::Resolved);
        assert_eq!(snapshot.notifications().unwrap().len(), 3);
    }
    assert_eq!(cache.stats().fetches_started, 1);
}

#[tokio::test]
async fn test_settled_entry_is_not_refetched() {
    let service = FakeNotificationService::with_notifications(sample_feed());
    let cache = QueryCache::new(service.client());

    cache.read().await;
    service.set_notifications(vec![]);
    let snapshot = cache.read().await;

    assert_eq!(snapshot.notifications().unwrap().len(), 3);
    assert_eq!(service.list_calls(), 1);
}

#[tokio::test]
async fn test_double_invalidation_refetches_once() {
    let service = FakeNotificationService::with_notifications(sample_feed());
    let cache = QueryCache::new(service.client());
    cache.read().await;

    cache.invalidate();
    cache.invalidate();
    cache.read().await;
    cache.read().await;

    assert_eq!(service.list_calls(), 2);
    let stats = cache.stats();
    assert_eq!(stats.invalidations, 2);
    assert_eq!(stats.fetches_started, 2);
}

#[tokio::test]
async fn test_list_failure_is_stored_as_errored_state() {
    let service = FakeNotificationService::with_notifications(vec![]);
    service.fail_lists(500, json!({"error": "db down"}));
    let cache = QueryCache::new(service.client());

    let snapshot = cache.read().await;

    assert_eq!(snapshot.status, QueryStatus::Errored);
    assert!(snapshot.data.is_none());
    assert_eq!(
        snapshot.error,
        Some(FetchError::RequestFailed {
            status: 500,
            message: "db down".to_string()
        })
    );
    assert_eq!(cache.stats().fetches_failed, 1);

    // Errored entries are settled too
    cache.read().await;
    assert_eq!(service.list_calls(), 1);
}

#[tokio::test]
async fn test_failed_refetch_keeps_previous_data() {
    let service = FakeNotificationService::with_notifications(sample_feed());
    let cache = QueryCache::new(service.client());
    cache.read().await;

    service.fail_lists(503, json!({}));
    cache.invalidate();
    let snapshot = cache.read().await;

    assert_eq!(snapshot.status, QueryStatus::Errored);
    assert_eq!(snapshot.notifications().unwrap().len(), 3);
    assert_eq!(
        snapshot.error.as_ref().map(FetchError::message),
        Some("Something went wrong")
    );
}

#[tokio::test]
async fn test_fetch_started_before_invalidation_is_discarded() {
    let service = FakeNotificationService::with_notifications(sample_feed());
    service.hold_lists();
    let cache = QueryCache::new(service.client());

    let (snapshot, _) = tokio::join!(cache.read(), async {
        // First fetch was answered with all three rows and is parked on the gate
        service.set_notifications(vec![notification("n3", "like", "carol")]);
        cache.invalidate();
        service.release_lists(2);
    });

    assert_eq!(service.list_calls(), 2);
    assert_eq!(snapshot.status, QueryStatus::Resolved);
    let ids: Vec<String> = snapshot
        .notifications()
        .unwrap()
        .iter()
        .map(|n| n.id.to_string())
        .collect();
    assert_eq!(ids, vec!["n3".to_string()]);
}

#[tokio::test]
async fn test_duplicate_ids_in_response_are_collapsed() {
    let service = FakeNotificationService::with_notifications(vec![
        notification("n1", "like", "bob"),
        notification("n1", "like", "bob"),
        notification("n2", "follow", "amy"),
    ]);
    let cache = QueryCache::new(service.client());

    let snapshot = cache.read().await;

    assert_eq!(snapshot.notifications().unwrap().len(), 2);
}
