//! The presentation renderer contract.
//!
//! The orchestrator never draws anything. It tells a [`Renderer`] what to
//! present, and the renderer later reports the dismissal back through
//! [`Orchestrator::notify_dismissed`](super::Orchestrator::notify_dismissed),
//! exactly once per activation.

use tokio::sync::mpsc;
use tracing::debug;

use crate::queue::{ItemId, PriorityTier};

/// External collaborator that shows payloads to the user.
///
/// Both methods are called while the orchestrator's state is locked. They
/// must return promptly and must not wait on the orchestrator.
pub trait Renderer<P>: Send + Sync + 'static {
    /// Start presenting `payload`.
    fn present(&self, id: ItemId, tier: PriorityTier, payload: &P);

    /// Stop presenting `id`. Called when the orchestrator ends a presentation
    /// on its own (dismiss, cancel, reset); never after the renderer itself
    /// reported the dismissal.
    fn withdraw(&self, id: ItemId) {
        let _ = id;
    }
}

/// Instruction sent by a [`ChannelRenderer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderCommand<P> {
    Present {
        id: ItemId,
        tier: PriorityTier,
        payload: P,
    },
    Withdraw {
        id: ItemId,
    },
}

/// Renderer that forwards every instruction over an unbounded channel, for
/// UI loops that own their own event handling.
pub struct ChannelRenderer<P> {
    tx: mpsc::UnboundedSender<RenderCommand<P>>,
}

impl<P> ChannelRenderer<P> {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<RenderCommand<P>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl<P> Renderer<P> for ChannelRenderer<P>
where
    P: Clone + Send + Sync + 'static,
{
    fn present(&self, id: ItemId, tier: PriorityTier, payload: &P) {
        let cmd = RenderCommand::Present {
            id,
            tier,
            payload: payload.clone(),
        };
        if self.tx.send(cmd).is_err() {
            debug!(id = %id, "render channel closed, present dropped");
        }
    }

    fn withdraw(&self, id: ItemId) {
        if self.tx.send(RenderCommand::Withdraw { id }).is_err() {
            debug!(id = %id, "render channel closed, withdraw dropped");
        }
    }
}
