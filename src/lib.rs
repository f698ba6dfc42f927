//! spotlight -- priority-ordered presentation queue with a serialized,
//! single-active orchestrator.
//!
//! Callers submit "show this now" requests at a [`PriorityTier`]. The
//! [`Orchestrator`] keeps at most one of them on screen at a time, handing
//! payloads to an external [`Renderer`] and activating the next one a short
//! settle delay after each dismissal.

pub mod config;
pub mod demo;
pub mod error;
pub mod orchestrator;
pub mod queue;
pub mod stats;

pub use config::{OrchestratorConfig, SpotlightConfig};
pub use error::QueueError;
pub use orchestrator::{
    ChannelRenderer, Orchestrator, OrchestratorEvent, RenderCommand, Renderer, Ticket,
};
pub use queue::{DismissReason, ItemId, ItemInfo, PriorityQueue, PriorityTier, QueueItem};
pub use stats::QueueStats;
