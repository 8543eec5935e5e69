//! Tests for BroadcastRouter

use super::*;
use logurt_protocol::FilterRequest;

fn filter(request: FilterRequest) -> FilterSpec {
    FilterSpec::try_from(request).unwrap()
}

fn record(namespace: &str, pod: &str, log: &str) -> LogRecord {
    LogRecord::new(namespace, pod, "app", log).with_label("app", "web")
}

fn drain(rx: &mut mpsc::Receiver<Bytes>) -> Vec<Bytes> {
    let mut lines = Vec::new();
    while let Ok(line) = rx.try_recv() {
        lines.push(line);
    }
    lines
}

// ============================================================================
// Basic operations
// ============================================================================

#[test]
fn test_new_router_has_no_subscribers() {
    let router = BroadcastRouter::new();
    assert!(!router.has_subscribers());
    assert_eq!(router.subscriber_count(), 0);
}

#[tokio::test]
async fn test_subscribe_and_unsubscribe() {
    let router = BroadcastRouter::new();

    let (id, _rx) = router.subscribe(filter(FilterRequest::new("prod")));
    assert!(router.has_subscribers());

    assert!(router.unsubscribe(id));
    assert!(!router.unsubscribe(id));
    assert!(!router.has_subscribers());
}

#[test]
fn test_with_config_rejects_zero_capacity() {
    let result = BroadcastRouter::with_config(RouterConfig {
        channel_capacity: 0,
    });
    assert!(matches!(result, Err(TapError::InvalidConfig(_))));
}

#[test]
fn test_with_config_sets_capacity() {
    let router = BroadcastRouter::with_config(RouterConfig {
        channel_capacity: 8,
    })
    .unwrap();
    assert_eq!(router.registry().channel_capacity(), 8);
}

// ============================================================================
// Ingest
// ============================================================================

#[test]
fn test_ingest_with_no_subscribers() {
    let router = BroadcastRouter::new();
    let report = router.ingest(&[record("prod", "web-1", "a"), record("prod", "web-1", "b")]);

    assert_eq!(report.records().len(), 2);
    assert_eq!(report.subscribers(), 0);
    assert_eq!(report.total_matched(), 0);
    assert!(report.is_complete());

    let stats = router.stats();
    assert_eq!(stats.record_count, 2);
    assert_eq!(stats.delivered_count, 0);
}

#[test]
fn test_ingest_empty_batch() {
    let router = BroadcastRouter::new();
    let (_id, _rx) = router.subscribe(filter(FilterRequest::new("prod")));

    let report = router.ingest(&[]);
    assert!(report.records().is_empty());
    assert_eq!(report.total_delivered(), 0);
}

#[tokio::test]
async fn test_ingest_delivers_only_matching_lines() {
    let router = BroadcastRouter::new();
    let (_id, mut rx) = router.subscribe(filter(FilterRequest::new("prod").with_pod("web-1")));

    let report = router.ingest(&[
        record("prod", "web-1", "hello"),
        record("prod", "web-2", "other pod"),
        record("staging", "web-1", "other namespace"),
    ]);

    assert_eq!(report.records()[0].matched, 1);
    assert_eq!(report.records()[1].matched, 0);
    assert_eq!(report.records()[2].matched, 0);
    assert_eq!(drain(&mut rx), vec![Bytes::from_static(b"hello")]);
}

#[tokio::test]
async fn test_ingest_pushes_raw_log_line() {
    let router = BroadcastRouter::new();
    let (_id, mut rx) = router.subscribe(filter(FilterRequest::new("prod")));

    router.ingest(&[record("prod", "web-1", "{\"level\":\"info\"}").with_timestamp("t0")]);

    assert_eq!(
        drain(&mut rx),
        vec![Bytes::from_static(b"{\"level\":\"info\"}")]
    );
}

#[tokio::test]
async fn test_ingest_preserves_order_per_subscriber() {
    let router = BroadcastRouter::new();
    let (_id, mut rx) = router.subscribe(filter(FilterRequest::new("prod")));

    let records: Vec<_> = (0..10)
        .map(|i| record("prod", "web-1", &format!("line-{}", i)))
        .collect();
    router.ingest(&records);

    let lines = drain(&mut rx);
    let expected: Vec<_> = (0..10)
        .map(|i| Bytes::from(format!("line-{}", i)))
        .collect();
    assert_eq!(lines, expected);
}

#[tokio::test]
async fn test_ingest_fans_out_to_identical_filters() {
    let router = BroadcastRouter::new();
    let (_a, mut rx_a) = router.subscribe(filter(FilterRequest::new("prod")));
    let (_b, mut rx_b) = router.subscribe(filter(FilterRequest::new("prod")));

    let report = router.ingest(&[record("prod", "web-1", "both")]);

    assert_eq!(report.records()[0].matched, 2);
    assert_eq!(report.records()[0].delivered, 2);
    assert_eq!(drain(&mut rx_a).len(), 1);
    assert_eq!(drain(&mut rx_b).len(), 1);
}

#[tokio::test]
async fn test_ingest_label_filter() {
    let router = BroadcastRouter::new();
    let (_id, mut rx) = router.subscribe(filter(FilterRequest::new("prod").with_label("app", "web")));

    router.ingest(&[
        record("prod", "web-1", "web"),
        LogRecord::new("prod", "db-1", "pg", "db").with_label("app", "db"),
        LogRecord::new("prod", "job-1", "run", "unlabeled"),
    ]);

    assert_eq!(drain(&mut rx), vec![Bytes::from_static(b"web")]);
}

// ============================================================================
// Failure isolation
// ============================================================================

#[tokio::test]
async fn test_disconnected_subscriber_does_not_affect_others() {
    let router = BroadcastRouter::new();
    let (gone, rx_gone) = router.subscribe(filter(FilterRequest::new("prod")));
    let (_live, mut rx_live) = router.subscribe(filter(FilterRequest::new("prod")));

    drop(rx_gone);

    let report = router.ingest(&[record("prod", "web-1", "a"), record("prod", "web-1", "b")]);

    for dispatch in report.records() {
        assert_eq!(dispatch.matched, 2);
        assert_eq!(dispatch.delivered, 1);
        assert_eq!(
            dispatch.failures,
            vec![DispatchFailure {
                subscription: gone,
                reason: FailureReason::Disconnected,
            }]
        );
    }

    assert_eq!(drain(&mut rx_live).len(), 2);
    assert_eq!(router.stats().failure_count, 2);
}

#[tokio::test]
async fn test_full_subscriber_drops_lines_without_blocking() {
    let router = BroadcastRouter::with_config(RouterConfig {
        channel_capacity: 1,
    })
    .unwrap();
    let (slow, _rx_slow) = router.subscribe(filter(FilterRequest::new("prod")));
    let (_fast, mut rx_fast) = router.subscribe(filter(FilterRequest::new("prod")));

    let report = router.ingest(&[record("prod", "web-1", "a")]);
    assert!(report.is_complete());
    assert_eq!(drain(&mut rx_fast).len(), 1);

    // Slow viewer never reads; its buffer is now full
    let report = router.ingest(&[record("prod", "web-1", "b"), record("prod", "web-1", "c")]);

    let failures: Vec<_> = report.failures().collect();
    assert_eq!(failures.len(), 2);
    assert!(failures.iter().all(|(_, f)| f.subscription == slow));
    assert!(
        failures
            .iter()
            .all(|(_, f)| f.reason == FailureReason::BufferFull)
    );
    assert_eq!(failures[0].0, 0);
    assert_eq!(failures[1].0, 1);

    assert_eq!(
        drain(&mut rx_fast),
        vec![Bytes::from_static(b"b"), Bytes::from_static(b"c")]
    );
}

#[tokio::test]
async fn test_unsubscribed_viewer_receives_nothing() {
    let router = BroadcastRouter::new();
    let (id, mut rx) = router.subscribe(filter(FilterRequest::new("prod")));

    router.unsubscribe(id);
    let report = router.ingest(&[record("prod", "web-1", "after")]);

    assert_eq!(report.total_matched(), 0);
    assert!(drain(&mut rx).is_empty());
}

// ============================================================================
// Live streams
// ============================================================================

#[tokio::test]
async fn test_connect_receives_lines() {
    let router = BroadcastRouter::new();
    let mut stream = router.connect(filter(FilterRequest::new("prod")));
    assert_eq!(stream.filter().namespace(), "prod");

    router.ingest(&[record("prod", "web-1", "hello")]);

    assert_eq!(stream.recv().await, Some(Bytes::from_static(b"hello")));
    assert_eq!(stream.try_recv(), None);
}

#[tokio::test]
async fn test_dropping_stream_unsubscribes() {
    let router = BroadcastRouter::new();
    let stream = router.connect(filter(FilterRequest::new("prod")));
    let id = stream.id();
    assert!(router.registry().contains(id));

    drop(stream);

    assert!(!router.registry().contains(id));
    assert!(!router.has_subscribers());
}

#[tokio::test]
async fn test_stream_drop_after_unsubscribe_is_harmless() {
    let router = BroadcastRouter::new();
    let stream = router.connect(filter(FilterRequest::new("prod")));
    let other = router.connect(filter(FilterRequest::new("prod")));

    assert!(router.unsubscribe(stream.id()));
    drop(stream);

    assert!(router.registry().contains(other.id()));
}

// ============================================================================
// Stats and maintenance
// ============================================================================

#[tokio::test]
async fn test_stats_accumulate() {
    let router = BroadcastRouter::new();
    let (_id, _rx) = router.subscribe(filter(FilterRequest::new("prod")));

    router.ingest(&[record("prod", "web-1", "a"), record("staging", "web-1", "b")]);
    router.ingest(&[record("prod", "web-2", "c")]);

    assert_eq!(
        router.stats(),
        RouterStats {
            record_count: 3,
            delivered_count: 2,
            failure_count: 0,
            subscriber_count: 1,
        }
    );
}

#[tokio::test]
async fn test_cleanup_removes_disconnected() {
    let router = BroadcastRouter::new();
    let (_id1, rx1) = router.subscribe(filter(FilterRequest::new("prod")));
    let (_id2, _rx2) = router.subscribe(filter(FilterRequest::new("prod")));

    drop(rx1);

    assert_eq!(router.cleanup(), 1);
    assert_eq!(router.subscriber_count(), 1);
}

#[tokio::test]
async fn test_spawn_maintenance_rejects_zero_interval() {
    let router = Arc::new(BroadcastRouter::new());
    let result = router.spawn_maintenance(Duration::ZERO);
    assert!(matches!(result, Err(TapError::InvalidConfig(_))));
}

#[tokio::test(start_paused = true)]
async fn test_maintenance_cleans_up() {
    let router = Arc::new(BroadcastRouter::new());
    let (_id, rx) = router.subscribe(filter(FilterRequest::new("prod")));
    drop(rx);

    let handle = router
        .spawn_maintenance(Duration::from_millis(100))
        .unwrap();

    tokio::time::sleep(Duration::from_millis(250)).await;
    assert_eq!(router.subscriber_count(), 0);

    handle.abort();
}
