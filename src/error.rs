//! Error types for queue and orchestrator operations.
//!
//! Both variants are non-fatal: a rejected submission never reaches the
//! queue, and a miss on cancel/dismiss leaves all state unchanged.

use thiserror::Error;

use crate::queue::ItemId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    /// The queue already holds `capacity` pending items.
    #[error("queue is at capacity ({capacity} pending items)")]
    CapacityExceeded { capacity: usize },

    /// No pending or active item carries this id.
    #[error("item {0} is not pending or active")]
    NotFound(ItemId),
}
