//! Serialized presentation orchestrator.
//!
//! Guarantees at most one active presentation. Submissions go through the
//! [`PriorityQueue`]; when the active slot is empty the head of the queue is
//! moved into it and handed to the [`Renderer`]. When the active item ends,
//! the next activation is scheduled after a settle delay so the renderer's
//! exit transition can finish first.
//!
//! Lock order is always stage → queue.

pub mod events;
pub mod renderer;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, oneshot, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::OrchestratorConfig;
use crate::error::QueueError;
use crate::queue::{DismissReason, ItemId, ItemInfo, PriorityQueue, PriorityTier, QueueItem};
use crate::stats::QueueStats;

pub use self::events::{OrchestratorEvent, EVENT_BUFFER};
pub use self::renderer::{ChannelRenderer, RenderCommand, Renderer};

// ---------------------------------------------------------------------------
// Ticket
// ---------------------------------------------------------------------------

/// Handle returned for an accepted submission.
#[derive(Debug)]
pub struct Ticket {
    id: ItemId,
    tier: PriorityTier,
    done: oneshot::Receiver<DismissReason>,
}

impl Ticket {
    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn tier(&self) -> PriorityTier {
        self.tier
    }

    /// Wait for the item's presentation to end.
    ///
    /// Returns `None` if the item was never presented to completion: it was
    /// cancelled while pending or discarded by `dismiss_all`.
    pub async fn finished(self) -> Option<DismissReason> {
        self.done.await.ok()
    }
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// What the orchestrator is doing right now.
struct Stage<P> {
    /// The item being presented, if any.
    active: Option<QueueItem<P>>,
    /// Pending delayed activation, if a dismissal scheduled one.
    advance: Option<CancellationToken>,
}

struct Shared<P> {
    queue: PriorityQueue<P>,
    stage: Mutex<Stage<P>>,
    renderer: Box<dyn Renderer<P>>,
    events: broadcast::Sender<OrchestratorEvent>,
    settle_delay: Duration,
}

/// Cheaply cloneable handle to one orchestrator instance.
///
/// Construct it once at the composition root and pass clones to whoever
/// needs to submit or cancel. Requires a tokio runtime.
pub struct Orchestrator<P> {
    shared: Arc<Shared<P>>,
}

impl<P> Clone for Orchestrator<P> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<P: Send + 'static> Orchestrator<P> {
    pub fn new<R: Renderer<P>>(config: &OrchestratorConfig, renderer: R) -> Self {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        Self {
            shared: Arc::new(Shared {
                queue: PriorityQueue::new(config.capacity),
                stage: Mutex::new(Stage {
                    active: None,
                    advance: None,
                }),
                renderer: Box::new(renderer),
                events,
                settle_delay: config.settle_delay(),
            }),
        }
    }

    /// Queue `payload` at `tier`, presenting it straight away if idle.
    pub async fn submit(&self, tier: PriorityTier, payload: P) -> Result<Ticket, QueueError> {
        let (tx, rx) = oneshot::channel();
        let item = QueueItem::new(tier, payload).with_completion(tx);
        let id = item.id();

        let mut stage = self.shared.stage.lock().await;
        if let Err(e) = self.shared.queue.enqueue(item).await {
            self.emit(OrchestratorEvent::Rejected {
                tier,
                capacity: self.shared.queue.capacity(),
            });
            return Err(e);
        }

        let pending = self.shared.queue.len().await;
        self.emit(OrchestratorEvent::Queued { id, tier, pending });

        if stage.active.is_none() {
            self.activate_next(&mut stage).await;
        }

        Ok(Ticket { id, tier, done: rx })
    }

    /// Show `payload` ahead of everything pending.
    pub async fn submit_immediate(&self, payload: P) -> Result<Ticket, QueueError> {
        self.submit(PriorityTier::Immediate, payload).await
    }

    /// Show `payload` after everything else, including after any deferred
    /// item submitted earlier.
    pub async fn submit_deferred(&self, payload: P) -> Result<Ticket, QueueError> {
        self.submit(PriorityTier::Deferred, payload).await
    }

    /// Renderer callback: the presentation of `id` has ended.
    ///
    /// Only the currently active id is accepted; anything else (stale or
    /// duplicate notification) returns `NotFound` and changes nothing.
    pub async fn notify_dismissed(&self, id: ItemId) -> Result<(), QueueError> {
        let mut stage = self.shared.stage.lock().await;
        if !stage.active.as_ref().is_some_and(|item| item.id() == id) {
            warn!(id = %id, "dismissal reported for an item that is not active");
            return Err(QueueError::NotFound(id));
        }
        self.finish_active(&mut stage, DismissReason::Renderer);
        Ok(())
    }

    /// End the current presentation now. Returns `false` if nothing was active.
    pub async fn dismiss_active(&self) -> bool {
        let mut stage = self.shared.stage.lock().await;
        self.finish_active(&mut stage, DismissReason::Dismissed)
            .is_some()
    }

    /// Cancel `id`, whether it is the active item or still pending.
    ///
    /// Cancelling a pending item drops it without firing its completion.
    /// Returns `false` if `id` is unknown or already finished.
    pub async fn cancel(&self, id: ItemId) -> bool {
        let mut stage = self.shared.stage.lock().await;
        if stage.active.as_ref().is_some_and(|item| item.id() == id) {
            self.finish_active(&mut stage, DismissReason::Cancelled);
            return true;
        }

        match self.shared.queue.remove_by_id(id).await {
            Some(_) => {
                debug!(id = %id, "pending item cancelled");
                self.emit(OrchestratorEvent::Cancelled { id });
                true
            }
            None => {
                debug!(id = %id, "cancel had no effect");
                false
            }
        }
    }

    /// Drop everything: pending items, the active item, and any scheduled
    /// activation. No completions fire.
    pub async fn dismiss_all(&self) {
        let mut stage = self.shared.stage.lock().await;
        if let Some(token) = stage.advance.take() {
            token.cancel();
        }

        let mut discarded = self.shared.queue.clear().await;
        if let Some(item) = stage.active.take() {
            self.shared.renderer.withdraw(item.id());
            discarded += 1;
        }

        info!(discarded, "orchestrator reset");
        self.emit(OrchestratorEvent::Reset { discarded });
    }

    /// True when nothing is pending and nothing is being presented.
    pub async fn is_empty(&self) -> bool {
        let stage = self.shared.stage.lock().await;
        stage.active.is_none() && self.shared.queue.is_empty().await
    }

    pub async fn is_presenting(&self) -> bool {
        self.shared.stage.lock().await.active.is_some()
    }

    pub async fn active(&self) -> Option<ItemInfo> {
        self.shared
            .stage
            .lock()
            .await
            .active
            .as_ref()
            .map(QueueItem::info)
    }

    pub async fn pending_count(&self) -> usize {
        self.shared.queue.len().await
    }

    /// Pending items in the order they will be shown.
    pub async fn pending(&self) -> Vec<ItemInfo> {
        self.shared.queue.snapshot().await
    }

    pub async fn statistics(&self) -> QueueStats {
        self.shared.queue.statistics().await
    }

    /// Receive state-transition events from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<OrchestratorEvent> {
        self.shared.events.subscribe()
    }

    // -----------------------------------------------------------------------
    // Transitions (stage lock held by the caller)
    // -----------------------------------------------------------------------

    /// Idle → Presenting, if the queue has anything. No-op while presenting.
    async fn activate_next(&self, stage: &mut Stage<P>) {
        if stage.active.is_some() {
            return;
        }
        // Activating by any path supersedes a scheduled activation.
        if let Some(token) = stage.advance.take() {
            token.cancel();
        }

        let Some(item) = self.shared.queue.dequeue().await else {
            debug!("queue drained, orchestrator idle");
            self.emit(OrchestratorEvent::Drained);
            return;
        };

        let (id, tier) = (item.id(), item.tier());
        debug!(id = %id, tier = %tier, "presenting item");
        self.shared.renderer.present(id, tier, item.payload());
        stage.active = Some(item);
        self.emit(OrchestratorEvent::Presented { id, tier });
    }

    /// Presenting → Idle. Fires the completion and schedules the next
    /// activation.
    fn finish_active(&self, stage: &mut Stage<P>, reason: DismissReason) -> Option<ItemId> {
        let item = stage.active.take()?;
        let id = item.id();
        if reason != DismissReason::Renderer {
            self.shared.renderer.withdraw(id);
        }

        debug!(id = %id, reason = %reason, "presentation ended");
        item.complete(reason);
        self.emit(OrchestratorEvent::Dismissed { id, reason });
        self.schedule_advance(stage);
        Some(id)
    }

    fn schedule_advance(&self, stage: &mut Stage<P>) {
        let token = CancellationToken::new();
        if let Some(previous) = stage.advance.replace(token.clone()) {
            previous.cancel();
        }

        let this = self.clone();
        let delay = self.shared.settle_delay;
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    debug!("scheduled activation cancelled");
                }
                _ = tokio::time::sleep(delay) => {
                    this.advance(&token).await;
                }
            }
        });
    }

    async fn advance(&self, token: &CancellationToken) {
        let mut stage = self.shared.stage.lock().await;
        // Cancelled between the timer firing and the lock being acquired.
        if token.is_cancelled() {
            return;
        }
        stage.advance = None;
        self.activate_next(&mut stage).await;
    }

    fn emit(&self, event: OrchestratorEvent) {
        // No subscribers is fine.
        let _ = self.shared.events.send(event);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
