//! Capacity-bounded priority queue of pending presentation requests.
//!
//! Order: descending tier rank, FIFO within a tier, except `Deferred` which
//! is LIFO among its own members and always last.

pub mod item;
pub mod priority;
pub mod tier;

pub use self::item::{Completion, DismissReason, ItemId, ItemInfo, QueueItem};
pub use self::priority::{insertion_index, PriorityQueue, DEFAULT_CAPACITY};
pub use self::tier::PriorityTier;
