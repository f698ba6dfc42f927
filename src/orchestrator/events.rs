//! State-transition notifications published by the orchestrator.

use serde::Serialize;

use crate::queue::{DismissReason, ItemId, PriorityTier};

/// Buffered events per subscriber before the slowest one starts lagging.
pub const EVENT_BUFFER: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum OrchestratorEvent {
    /// A submission was accepted into the queue.
    Queued {
        id: ItemId,
        tier: PriorityTier,
        pending: usize,
    },
    /// A submission was refused because the queue was full.
    Rejected { tier: PriorityTier, capacity: usize },
    /// An item moved into the active slot and was handed to the renderer.
    Presented { id: ItemId, tier: PriorityTier },
    /// The active item ended.
    Dismissed { id: ItemId, reason: DismissReason },
    /// A pending item was withdrawn before it was shown.
    Cancelled { id: ItemId },
    /// Nothing active and nothing pending.
    Drained,
    /// `dismiss_all` discarded the active item and every pending one.
    Reset { discarded: usize },
}
