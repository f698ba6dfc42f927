//! The pending-item list and its insertion rules.
//!
//! Items are kept in next-to-show order, so `dequeue` is always a pop from
//! the front. Each insertion is one linear scan; queues are expected to stay
//! in the single digits to low tens.

use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::{ItemId, ItemInfo, PriorityTier, QueueItem};
use crate::error::QueueError;
use crate::stats::QueueStats;

/// Capacity used when none is configured.
pub const DEFAULT_CAPACITY: usize = 10;

/// Position at which an item of `tier` goes into `items`.
///
/// 1. `Deferred` goes directly before the first existing `Deferred` item
///    (LIFO within the tier).
/// 2. `Immediate` goes directly after the leading run of `Immediate` items
///    (FIFO within the tier).
/// 3. Otherwise, and as the fallback for both of the above, it goes before
///    the first item of strictly lower rank, or at the end.
pub fn insertion_index<P>(items: &[QueueItem<P>], tier: PriorityTier) -> usize {
    match tier {
        PriorityTier::Deferred => {
            if let Some(pos) = items.iter().position(|i| i.tier() == PriorityTier::Deferred) {
                return pos;
            }
        }
        PriorityTier::Immediate => {
            let run = items
                .iter()
                .take_while(|i| i.tier() == PriorityTier::Immediate)
                .count();
            if run > 0 {
                return run;
            }
        }
        _ => {}
    }

    items
        .iter()
        .position(|i| i.tier().rank() < tier.rank())
        .unwrap_or(items.len())
}

/// Capacity-bounded, thread-safe priority queue.
///
/// Every operation runs under a single lock, so each one is atomic with
/// respect to concurrent callers.
pub struct PriorityQueue<P> {
    items: Mutex<Vec<QueueItem<P>>>,
    capacity: usize,
}

impl<P> PriorityQueue<P> {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Mutex::new(Vec::with_capacity(capacity)),
            capacity,
        }
    }

    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Insert `item` at its computed position.
    ///
    /// Fails without mutating the queue when it is already full; the item is
    /// dropped along with its completion.
    pub async fn enqueue(&self, item: QueueItem<P>) -> Result<(), QueueError> {
        let mut items = self.items.lock().await;
        if items.len() >= self.capacity {
            warn!(
                id = %item.id(),
                tier = %item.tier(),
                capacity = self.capacity,
                "queue full, rejecting item"
            );
            return Err(QueueError::CapacityExceeded {
                capacity: self.capacity,
            });
        }

        let pos = insertion_index(&items, item.tier());
        debug!(
            id = %item.id(),
            tier = %item.tier(),
            position = pos,
            pending = items.len() + 1,
            "item enqueued"
        );
        items.insert(pos, item);
        Ok(())
    }

    /// Remove and return the next item to show.
    pub async fn dequeue(&self) -> Option<QueueItem<P>> {
        let mut items = self.items.lock().await;
        if items.is_empty() {
            return None;
        }
        Some(items.remove(0))
    }

    pub async fn peek(&self) -> Option<ItemInfo> {
        self.items.lock().await.first().map(QueueItem::info)
    }

    /// Remove a pending item wherever it sits. A miss is not an error.
    pub async fn remove_by_id(&self, id: ItemId) -> Option<QueueItem<P>> {
        let mut items = self.items.lock().await;
        let pos = items.iter().position(|i| i.id() == id)?;
        debug!(id = %id, position = pos, "pending item removed");
        Some(items.remove(pos))
    }

    /// Discard every pending item. Completions are dropped, not fired.
    pub async fn clear(&self) -> usize {
        let mut items = self.items.lock().await;
        let discarded = items.len();
        items.clear();
        discarded
    }

    pub async fn contains(&self, id: ItemId) -> bool {
        self.items.lock().await.iter().any(|i| i.id() == id)
    }

    /// Pending items of one tier, in next-to-show order.
    pub async fn items_with_priority(&self, tier: PriorityTier) -> Vec<ItemInfo> {
        self.items
            .lock()
            .await
            .iter()
            .filter(|i| i.tier() == tier)
            .map(QueueItem::info)
            .collect()
    }

    /// All pending items in next-to-show order.
    pub async fn snapshot(&self) -> Vec<ItemInfo> {
        self.items.lock().await.iter().map(QueueItem::info).collect()
    }

    pub async fn len(&self) -> usize {
        self.items.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.lock().await.is_empty()
    }

    pub async fn is_full(&self) -> bool {
        self.items.lock().await.len() >= self.capacity
    }

    pub async fn statistics(&self) -> QueueStats {
        let items = self.items.lock().await;
        QueueStats::collect(&items, self.capacity)
    }
}

impl<P> Default for PriorityQueue<P> {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
