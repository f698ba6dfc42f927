//! Pending presentation requests.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::oneshot;
use uuid::Uuid;

use super::PriorityTier;

/// Process-unique identifier for a submitted item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ItemId(Uuid);

impl ItemId {
    pub fn new() -> Self {
        ItemId(Uuid::new_v4())
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Why an active presentation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DismissReason {
    /// The renderer reported the dismissal.
    Renderer,
    /// Ended through `dismiss_active`.
    Dismissed,
    /// Ended through `cancel` while it was the active item.
    Cancelled,
}

impl fmt::Display for DismissReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DismissReason::Renderer => "renderer",
            DismissReason::Dismissed => "dismissed",
            DismissReason::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// Sender half of an item's completion notification.
pub type Completion = oneshot::Sender<DismissReason>;

/// Submission counter. Strictly increasing per process.
static NEXT_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// One pending request: a tier, an opaque payload, and an optional completion.
///
/// The queue never looks at `payload`.
pub struct QueueItem<P> {
    id: ItemId,
    tier: PriorityTier,
    payload: P,
    sequence: u64,
    enqueued_at: DateTime<Utc>,
    completion: Option<Completion>,
}

impl<P> QueueItem<P> {
    pub fn new(tier: PriorityTier, payload: P) -> Self {
        Self {
            id: ItemId::new(),
            tier,
            payload,
            sequence: NEXT_SEQUENCE.fetch_add(1, Ordering::Relaxed),
            enqueued_at: Utc::now(),
            completion: None,
        }
    }

    /// Attach a completion notification, fired once when the presentation ends.
    pub fn with_completion(mut self, completion: Completion) -> Self {
        self.completion = Some(completion);
        self
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn tier(&self) -> PriorityTier {
        self.tier
    }

    pub fn payload(&self) -> &P {
        &self.payload
    }

    pub fn into_payload(self) -> P {
        self.payload
    }

    /// Submission order. Informational only: the queue orders by insertion
    /// position, which already keeps FIFO within a tier.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn enqueued_at(&self) -> DateTime<Utc> {
        self.enqueued_at
    }

    pub fn info(&self) -> ItemInfo {
        ItemInfo {
            id: self.id,
            tier: self.tier,
            sequence: self.sequence,
            enqueued_at: self.enqueued_at,
        }
    }

    /// Fire the completion notification. Consumes the item, so it can only
    /// happen once. A dropped receiver is not an error.
    pub fn complete(mut self, reason: DismissReason) {
        if let Some(tx) = self.completion.take() {
            let _ = tx.send(reason);
        }
    }
}

impl<P> fmt::Debug for QueueItem<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueItem")
            .field("id", &self.id)
            .field("tier", &self.tier)
            .field("sequence", &self.sequence)
            .field("has_completion", &self.completion.is_some())
            .finish_non_exhaustive()
    }
}

/// Read-only view of a pending or active item, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ItemInfo {
    pub id: ItemId,
    pub tier: PriorityTier,
    pub sequence: u64,
    pub enqueued_at: DateTime<Utc>,
}
