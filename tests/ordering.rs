//! Dequeue-order scenarios for the priority queue.

use spotlight::queue::{PriorityQueue, PriorityTier, QueueItem};
use spotlight::QueueError;
use tokio_test::{assert_err, assert_ok};

use PriorityTier::*;

async fn fill(queue: &PriorityQueue<String>, script: &[(PriorityTier, &str)]) {
    for &(tier, label) in script {
        assert_ok!(
            queue
                .enqueue(QueueItem::new(tier, format!("{}:{}", tier, label)))
                .await
        );
    }
}

async fn drain(queue: &PriorityQueue<String>) -> Vec<String> {
    let mut out = Vec::new();
    while let Some(item) = queue.dequeue().await {
        out.push(item.into_payload());
    }
    out
}

#[tokio::test]
async fn test_mixed_tier_scenario() {
    let queue = PriorityQueue::new(10);
    fill(
        &queue,
        &[
            (Deferred, "A"),
            (Low, "1"),
            (Normal, "1"),
            (High, "1"),
            (Critical, "1"),
            (Low, "2"),
            (Normal, "2"),
            (High, "2"),
            (Immediate, "1"),
            (Deferred, "B"),
        ],
    )
    .await;

    assert_eq!(
        drain(&queue).await,
        vec![
            "immediate:1",
            "critical:1",
            "high:1",
            "high:2",
            "normal:1",
            "normal:2",
            "low:1",
            "low:2",
            "deferred:B",
            "deferred:A",
        ]
    );
}

#[tokio::test]
async fn test_capacity_scenario() {
    let queue = PriorityQueue::new(3);
    let mut results = Vec::new();
    for i in 0..4 {
        let item = QueueItem::new(Normal, format!("item-{}", i));
        results.push(queue.enqueue(item).await.is_ok());
    }

    assert_eq!(results, vec![true, true, true, false]);
    assert_eq!(queue.len().await, 3);
    assert_err!(queue.enqueue(QueueItem::new(Immediate, "late".into())).await);
}

#[tokio::test]
async fn test_queue_never_exceeds_capacity() {
    let queue = PriorityQueue::new(5);
    for (i, tier) in PriorityTier::ALL.iter().cycle().take(20).enumerate() {
        let result = queue.enqueue(QueueItem::new(*tier, i.to_string())).await;
        if i >= 5 {
            assert_eq!(result, Err(QueueError::CapacityExceeded { capacity: 5 }));
        }
        assert!(queue.len().await <= 5);
    }
}

#[tokio::test]
async fn test_higher_tier_always_first() {
    // Every pair of distinct tiers, in both submission orders.
    for &a in PriorityTier::ALL.iter() {
        for &b in PriorityTier::ALL.iter() {
            if a == b {
                continue;
            }
            let queue = PriorityQueue::new(10);
            fill(&queue, &[(a, "x"), (b, "y")]).await;
            let first = queue.peek().await.unwrap().tier;
            assert_eq!(first, a.max(b), "submitted {} then {}", a, b);
        }
    }
}

#[tokio::test]
async fn test_deferred_waits_behind_later_submissions() {
    let queue = PriorityQueue::new(10);
    fill(&queue, &[(Deferred, "old")]).await;
    fill(&queue, &[(Low, "1"), (Low, "2"), (Normal, "1")]).await;
    fill(&queue, &[(Deferred, "new")]).await;
    fill(&queue, &[(Low, "3")]).await;

    let order = drain(&queue).await;
    assert_eq!(
        &order[order.len() - 2..],
        &["deferred:new".to_string(), "deferred:old".to_string()]
    );
}

#[tokio::test]
async fn test_immediate_fifo_ahead_of_everything() {
    let queue = PriorityQueue::new(10);
    fill(
        &queue,
        &[
            (Critical, "1"),
            (Immediate, "1"),
            (High, "1"),
            (Immediate, "2"),
            (Immediate, "3"),
        ],
    )
    .await;

    assert_eq!(
        drain(&queue).await,
        vec![
            "immediate:1",
            "immediate:2",
            "immediate:3",
            "critical:1",
            "high:1"
        ]
    );
}

#[tokio::test]
async fn test_statistics_track_contents() {
    let queue = PriorityQueue::new(4);
    fill(&queue, &[(High, "1"), (High, "2"), (Deferred, "A")]).await;

    let stats = queue.statistics().await;
    assert_eq!(stats.total, 3);
    assert_eq!(stats.count(High), 2);
    assert_eq!(stats.count(Deferred), 1);
    assert!(!stats.at_capacity);

    fill(&queue, &[(Low, "1")]).await;
    assert!(queue.statistics().await.at_capacity);
}
