//! On-demand statistics over the pending queue.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::queue::{PriorityTier, QueueItem};

/// Snapshot of the queue's contents. Holds no state of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueueStats {
    pub total: usize,
    pub capacity: usize,
    pub at_capacity: bool,
    /// Pending count per tier; every tier is present, zero if empty.
    pub by_tier: BTreeMap<PriorityTier, usize>,
    /// Submission time of the longest-waiting pending item.
    pub oldest_enqueued_at: Option<DateTime<Utc>>,
}

impl QueueStats {
    pub fn collect<P>(items: &[QueueItem<P>], capacity: usize) -> Self {
        let mut by_tier: BTreeMap<PriorityTier, usize> =
            PriorityTier::ALL.iter().map(|&t| (t, 0)).collect();
        for item in items {
            *by_tier.entry(item.tier()).or_insert(0) += 1;
        }

        Self {
            total: items.len(),
            capacity,
            at_capacity: items.len() >= capacity,
            by_tier,
            oldest_enqueued_at: items.iter().map(QueueItem::enqueued_at).min(),
        }
    }

    pub fn count(&self, tier: PriorityTier) -> usize {
        self.by_tier.get(&tier).copied().unwrap_or(0)
    }
}
