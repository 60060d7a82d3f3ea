//! Unit tests for QueueRegistry semantics

use super::*;
use crate::domain::{cancel_pair, DomainError};
use crate::port::time_provider::mocks::FixedTimeProvider;
use crate::port::time_provider::SystemTimeProvider;
use std::collections::HashSet;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio_test::{assert_pending, assert_ready_ok, task};

fn registry() -> QueueRegistry {
    QueueRegistry::new(RegistryConfig::default(), Arc::new(SystemTimeProvider)).unwrap()
}

fn registry_with(config: RegistryConfig) -> QueueRegistry {
    QueueRegistry::new(config, Arc::new(SystemTimeProvider)).unwrap()
}

fn short_wait() -> WaitPolicy {
    WaitPolicy::timeout(Duration::from_millis(20))
}

#[tokio::test]
async fn test_orders_scenario_fifo() {
    let registry = registry();

    registry.put("orders", b"A".to_vec(), WaitPolicy::forever()).await.unwrap();
    registry.put("orders", b"B".to_vec(), WaitPolicy::forever()).await.unwrap();

    assert_eq!(registry.pop("orders", WaitPolicy::forever()).await.unwrap(), b"A");
    assert_eq!(registry.pop("orders", WaitPolicy::forever()).await.unwrap(), b"B");
}

#[tokio::test]
async fn test_fifo_for_many_messages() {
    let registry = registry();
    for i in 0..50u32 {
        registry
            .put("seq", i.to_be_bytes().to_vec(), WaitPolicy::forever())
            .await
            .unwrap();
    }
    for i in 0..50u32 {
        let payload = registry.pop("seq", WaitPolicy::forever()).await.unwrap();
        assert_eq!(payload, i.to_be_bytes().to_vec());
    }
}

#[tokio::test]
async fn test_cross_name_isolation() {
    let registry = registry();
    registry.put("A", b"x".to_vec(), WaitPolicy::forever()).await.unwrap();

    let err = registry.pop("B", short_wait()).await.unwrap_err();
    assert!(matches!(err, AppError::DeadlineExceeded { .. }));

    assert_eq!(registry.pop("A", WaitPolicy::forever()).await.unwrap(), b"x");
}

#[tokio::test]
async fn test_backpressure_after_capacity() {
    let registry = registry();
    for i in 0..64u8 {
        registry.put("bp", vec![i], WaitPolicy::forever()).await.unwrap();
    }
    assert_eq!(registry.get("bp").unwrap().depth(), 64);

    let mut blocked = task::spawn(registry.put("bp", vec![64], WaitPolicy::forever()));
    assert_pending!(blocked.poll());

    assert_eq!(registry.pop("bp", WaitPolicy::forever()).await.unwrap(), vec![0]);
    assert!(blocked.is_woken());
    assert_ready_ok!(blocked.poll());
    drop(blocked);

    for i in 1..=64u8 {
        assert_eq!(registry.pop("bp", WaitPolicy::forever()).await.unwrap(), vec![i]);
    }
}

#[tokio::test]
async fn test_pop_blocks_until_put() {
    let registry = Arc::new(registry());

    let consumer = {
        let registry = Arc::clone(&registry);
        tokio::spawn(async move { registry.pop("empty", WaitPolicy::forever()).await })
    };

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!consumer.is_finished());

    registry.put("empty", b"X".to_vec(), WaitPolicy::forever()).await.unwrap();
    assert_eq!(consumer.await.unwrap().unwrap(), b"X");
}

#[tokio::test]
async fn test_pop_returns_first_subsequent_put() {
    let registry = registry();

    let mut waiting = task::spawn(registry.pop("fresh", WaitPolicy::forever()));
    assert_pending!(waiting.poll());
    assert_eq!(registry.queue_count(), 1);

    registry.put("fresh", b"first".to_vec(), WaitPolicy::forever()).await.unwrap();
    registry.put("fresh", b"second".to_vec(), WaitPolicy::forever()).await.unwrap();

    assert!(waiting.is_woken());
    assert_eq!(assert_ready_ok!(waiting.poll()), b"first");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_single_delivery_with_competing_consumers() {
    let registry = Arc::new(registry());
    const MESSAGES: u32 = 400;
    const CONSUMERS: u32 = 8;

    let mut consumers = JoinSet::new();
    for _ in 0..CONSUMERS {
        let registry = Arc::clone(&registry);
        consumers.spawn(async move {
            let mut received = Vec::new();
            for _ in 0..MESSAGES / CONSUMERS {
                let payload = registry.pop("work", WaitPolicy::forever()).await.unwrap();
                received.push(u32::from_be_bytes(payload.try_into().unwrap()));
            }
            received
        });
    }

    for i in 0..MESSAGES {
        registry
            .put("work", i.to_be_bytes().to_vec(), WaitPolicy::forever())
            .await
            .unwrap();
    }

    let mut all = Vec::new();
    while let Some(result) = consumers.join_next().await {
        all.extend(result.unwrap());
    }

    assert_eq!(all.len(), MESSAGES as usize);
    let unique: HashSet<u32> = all.into_iter().collect();
    assert_eq!(unique.len(), MESSAGES as usize, "a message was delivered twice");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_first_access_creates_one_queue() {
    let registry = Arc::new(registry());

    let mut tasks = JoinSet::new();
    for i in 0..64 {
        let registry = Arc::clone(&registry);
        tasks.spawn(async move {
            if i % 2 == 0 {
                registry
                    .put("lazy", vec![i as u8], WaitPolicy::forever())
                    .await
                    .unwrap();
            }
            registry.ensure_queue("lazy").unwrap()
        });
    }

    let mut handles = Vec::new();
    while let Some(result) = tasks.join_next().await {
        handles.push(result.unwrap());
    }

    assert_eq!(registry.queue_count(), 1);
    assert_eq!(registry.snapshot().len(), 1);
    assert!(handles.iter().all(|q| Arc::ptr_eq(q, &handles[0])));
    assert_eq!(handles[0].depth(), 32);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_first_puts_and_pops_share_one_queue() {
    let registry = Arc::new(registry());
    const PAIRS: u8 = 16;

    let mut consumers = JoinSet::new();
    for _ in 0..PAIRS {
        let registry = Arc::clone(&registry);
        consumers.spawn(async move {
            let payload = registry.pop("mixed", WaitPolicy::forever()).await.unwrap();
            (payload, registry.ensure_queue("mixed").unwrap())
        });
    }

    let mut producers = JoinSet::new();
    for i in 0..PAIRS {
        let registry = Arc::clone(&registry);
        producers.spawn(async move {
            registry
                .put("mixed", vec![i], WaitPolicy::forever())
                .await
                .unwrap();
            registry.ensure_queue("mixed").unwrap()
        });
    }

    let mut handles = Vec::new();
    while let Some(result) = producers.join_next().await {
        handles.push(result.unwrap());
    }
    let mut popped = HashSet::new();
    while let Some(result) = consumers.join_next().await {
        let (payload, queue) = result.unwrap();
        assert!(popped.insert(payload), "a message was delivered twice");
        handles.push(queue);
    }

    assert_eq!(popped.len(), PAIRS as usize);
    assert_eq!(registry.queue_count(), 1);
    assert!(handles.iter().all(|q| Arc::ptr_eq(q, &handles[0])));
    assert_eq!(handles[0].depth(), 0);
}

#[tokio::test]
async fn test_blocked_producers_served_in_arrival_order() {
    let registry = registry_with(RegistryConfig {
        queue_capacity: 1,
        ..Default::default()
    });
    registry.put("order", b"0".to_vec(), WaitPolicy::forever()).await.unwrap();

    let mut first = task::spawn(registry.put("order", b"1".to_vec(), WaitPolicy::forever()));
    let mut second = task::spawn(registry.put("order", b"2".to_vec(), WaitPolicy::forever()));
    assert_pending!(first.poll());
    assert_pending!(second.poll());

    assert_eq!(registry.pop("order", WaitPolicy::forever()).await.unwrap(), b"0");
    assert!(first.is_woken());
    assert_ready_ok!(first.poll());
    assert_pending!(second.poll());

    assert_eq!(registry.pop("order", WaitPolicy::forever()).await.unwrap(), b"1");
    assert_ready_ok!(second.poll());
    assert_eq!(registry.pop("order", WaitPolicy::forever()).await.unwrap(), b"2");
}

#[test]
fn test_oversized_capacity_rejected_at_construction() {
    let result = QueueRegistry::new(
        RegistryConfig {
            queue_capacity: usize::MAX / 2,
            ..Default::default()
        },
        Arc::new(SystemTimeProvider),
    );
    assert!(matches!(result, Err(AppError::Config(_))));
}

#[tokio::test]
async fn test_invalid_name_rejected() {
    let registry = registry();
    let err = registry
        .put("", b"x".to_vec(), WaitPolicy::forever())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Domain(DomainError::InvalidQueueName(_))));
    assert_eq!(registry.queue_count(), 0);
}

#[tokio::test]
async fn test_payload_limit_rejects_without_creating_queue() {
    let registry = registry_with(RegistryConfig {
        max_payload_bytes: 8,
        ..Default::default()
    });

    let err = registry
        .put("big", vec![0; 9], WaitPolicy::forever())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Domain(DomainError::PayloadTooLarge { size: 9, limit: 8 })
    ));
    assert!(registry.get("big").is_none());

    registry.put("big", vec![0; 8], WaitPolicy::forever()).await.unwrap();
}

#[tokio::test]
async fn test_queue_limit() {
    let registry = registry_with(RegistryConfig {
        max_queues: 2,
        ..Default::default()
    });

    registry.ensure_queue("one").unwrap();
    registry.ensure_queue("two").unwrap();
    let err = registry.ensure_queue("three").unwrap_err();
    assert!(matches!(err, AppError::QueueLimitReached { max: 2 }));

    // Existing queues stay usable at the limit
    registry.put("one", b"ok".to_vec(), WaitPolicy::forever()).await.unwrap();
    assert_eq!(registry.queue_count(), 2);
}

#[tokio::test]
async fn test_auto_create_disabled() {
    let registry = registry_with(RegistryConfig {
        auto_create: false,
        ..Default::default()
    });

    let err = registry.pop("unknown", WaitPolicy::forever()).await.unwrap_err();
    assert!(matches!(err, AppError::QueueNotFound(ref name) if name == "unknown"));

    assert!(registry.declare("known").unwrap());
    assert!(!registry.declare("known").unwrap());

    registry.put("known", b"v".to_vec(), WaitPolicy::forever()).await.unwrap();
    assert_eq!(registry.pop("known", WaitPolicy::forever()).await.unwrap(), b"v");
}

#[tokio::test]
async fn test_cancel_interrupts_pop_without_losing_messages() {
    let registry = Arc::new(registry());
    let (source, token) = cancel_pair();

    let consumer = {
        let registry = Arc::clone(&registry);
        tokio::spawn(async move {
            registry
                .pop("cancel", WaitPolicy::forever().with_cancel(token))
                .await
        })
    };

    tokio::time::sleep(Duration::from_millis(10)).await;
    source.cancel();

    let err = consumer.await.unwrap().unwrap_err();
    assert!(matches!(err, AppError::Cancelled(ref q) if q == "cancel"));

    registry.put("cancel", b"after".to_vec(), WaitPolicy::forever()).await.unwrap();
    assert_eq!(registry.pop("cancel", WaitPolicy::forever()).await.unwrap(), b"after");
}

#[tokio::test]
async fn test_cancelled_token_fails_fast() {
    let registry = registry();
    registry.put("ready", b"data".to_vec(), WaitPolicy::forever()).await.unwrap();

    let (source, token) = cancel_pair();
    source.cancel();

    let err = registry
        .pop("ready", WaitPolicy::forever().with_cancel(token))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Cancelled(_)));
    assert_eq!(registry.get("ready").unwrap().depth(), 1);
}

#[tokio::test]
async fn test_put_deadline_on_full_queue() {
    let registry = registry_with(RegistryConfig {
        queue_capacity: 1,
        ..Default::default()
    });
    registry.put("full", b"1".to_vec(), WaitPolicy::forever()).await.unwrap();

    let err = registry.put("full", b"2".to_vec(), short_wait()).await.unwrap_err();
    assert!(matches!(err, AppError::DeadlineExceeded { timeout_ms: 20, .. }));

    let queue = registry.get("full").unwrap();
    assert_eq!(queue.depth(), 1);
    assert_eq!(registry.pop("full", WaitPolicy::forever()).await.unwrap(), b"1");
}

#[tokio::test]
async fn test_zero_timeout_is_non_blocking() {
    let registry = registry();
    let try_now = WaitPolicy::timeout(Duration::ZERO);

    let err = registry.pop("try", try_now.clone()).await.unwrap_err();
    assert!(matches!(err, AppError::DeadlineExceeded { .. }));

    registry.put("try", b"here".to_vec(), try_now.clone()).await.unwrap();
    assert_eq!(registry.pop("try", try_now).await.unwrap(), b"here");
}

#[tokio::test]
async fn test_snapshot_reports_counters() {
    let clock = Arc::new(FixedTimeProvider::new(1_000));
    let registry = QueueRegistry::new(RegistryConfig::default(), clock.clone()).unwrap();

    registry.put("b", b"1".to_vec(), WaitPolicy::forever()).await.unwrap();
    clock.advance(500);
    registry.put("a", b"1".to_vec(), WaitPolicy::forever()).await.unwrap();
    registry.put("a", b"2".to_vec(), WaitPolicy::forever()).await.unwrap();
    registry.pop("a", WaitPolicy::forever()).await.unwrap();

    let snapshot = registry.snapshot();
    assert_eq!(snapshot.len(), 2);

    let a = &snapshot[0];
    assert_eq!(a.name.as_str(), "a");
    assert_eq!(a.capacity, 64);
    assert_eq!(a.depth, 1);
    assert_eq!(a.enqueued_total, 2);
    assert_eq!(a.dequeued_total, 1);
    assert_eq!(a.created_at, 1_500);

    assert_eq!(snapshot[1].name.as_str(), "b");
    assert_eq!(snapshot[1].created_at, 1_000);
}

#[tokio::test]
async fn test_usable_as_trait_object() {
    let broker: Arc<dyn MessageBroker> = Arc::new(registry());

    broker.put("dyn", b"v".to_vec(), WaitPolicy::forever()).await.unwrap();
    assert!(!broker.declare("dyn").await.unwrap());
    assert_eq!(broker.pop("dyn", WaitPolicy::forever()).await.unwrap(), b"v");
    assert_eq!(broker.snapshot().await.len(), 1);
}
