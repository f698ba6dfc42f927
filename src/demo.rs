//! Scripted runs used by the CLI.
//!
//! [`order`] shows how a fresh queue ranks a list of submissions.
//! [`run`] drives a full orchestrator against a channel renderer that holds
//! each presentation for a fixed time before reporting the dismissal.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::OrchestratorConfig;
use crate::orchestrator::{ChannelRenderer, Orchestrator, RenderCommand};
use crate::queue::{PriorityQueue, PriorityTier, QueueItem};
use crate::stats::QueueStats;

/// One scripted submission, written `tier:label` on the command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptEntry {
    pub tier: PriorityTier,
    pub label: String,
}

impl ScriptEntry {
    pub fn new(tier: PriorityTier, label: impl Into<String>) -> Self {
        Self {
            tier,
            label: label.into(),
        }
    }
}

impl fmt::Display for ScriptEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.tier, self.label)
    }
}

impl FromStr for ScriptEntry {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (tier, label) = s
            .split_once(':')
            .ok_or_else(|| format!("expected 'tier:label', got '{}'", s))?;
        if label.is_empty() {
            return Err(format!("missing label in '{}'", s));
        }
        Ok(Self::new(tier.parse()?, label))
    }
}

/// The mixed-tier script used when none is given.
pub fn default_script() -> Vec<ScriptEntry> {
    use PriorityTier::*;
    [
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
    ]
    .into_iter()
    .map(|(tier, label)| ScriptEntry::new(tier, label))
    .collect()
}

// ---------------------------------------------------------------------------
// Queue ordering
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct OrderReport {
    /// Submissions refused because the queue was full.
    pub rejected: Vec<ScriptEntry>,
    /// Accepted submissions in dequeue order.
    pub order: Vec<ScriptEntry>,
    pub stats: QueueStats,
}

/// Enqueue `entries` into a fresh queue and drain it.
pub async fn order(entries: &[ScriptEntry], capacity: usize) -> OrderReport {
    let queue = PriorityQueue::new(capacity);
    let mut rejected = Vec::new();
    for entry in entries {
        if queue
            .enqueue(QueueItem::new(entry.tier, entry.clone()))
            .await
            .is_err()
        {
            rejected.push(entry.clone());
        }
    }

    let stats = queue.statistics().await;
    let mut order = Vec::with_capacity(stats.total);
    while let Some(item) = queue.dequeue().await {
        order.push(item.into_payload());
    }

    OrderReport {
        rejected,
        order,
        stats,
    }
}

// ---------------------------------------------------------------------------
// Orchestrated run
// ---------------------------------------------------------------------------

/// Label of the lead-in item that occupies the active slot while the script
/// is submitted.
pub const INTRO_LABEL: &str = "intro";

#[derive(Debug, Serialize)]
pub struct DemoReport {
    /// Everything the renderer was asked to present, in order.
    pub presented: Vec<ScriptEntry>,
    pub rejected: Vec<ScriptEntry>,
    /// Queue contents once the whole script was submitted.
    pub peak: QueueStats,
}

/// Submit an intro item followed by `entries`, then play every presentation
/// for `hold` until nothing is left.
pub async fn run(
    config: &OrchestratorConfig,
    entries: &[ScriptEntry],
    hold: Duration,
) -> Result<DemoReport> {
    let (renderer, mut commands) = ChannelRenderer::new();
    let orchestrator = Orchestrator::new(config, renderer);

    orchestrator
        .submit_immediate(ScriptEntry::new(PriorityTier::Immediate, INTRO_LABEL))
        .await
        .context("failed to submit intro item")?;

    let mut rejected = Vec::new();
    for entry in entries {
        if let Err(e) = orchestrator.submit(entry.tier, entry.clone()).await {
            warn!(entry = %entry, error = %e, "submission rejected");
            rejected.push(entry.clone());
        }
    }
    let peak = orchestrator.statistics().await;

    let mut presented = Vec::new();
    while let Some(cmd) = commands.recv().await {
        match cmd {
            RenderCommand::Present { id, payload, .. } => {
                info!(id = %id, entry = %payload, "presenting");
                presented.push(payload);
                tokio::time::sleep(hold).await;
                orchestrator
                    .notify_dismissed(id)
                    .await
                    .context("renderer dismissal was refused")?;
            }
            RenderCommand::Withdraw { id } => {
                info!(id = %id, "withdrawn");
            }
        }

        if orchestrator.is_empty().await {
            break;
        }
    }

    Ok(DemoReport {
        presented,
        rejected,
        peak,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_script_entry() {
        let entry: ScriptEntry = "high:upload done".parse().unwrap();
        assert_eq!(entry, ScriptEntry::new(PriorityTier::High, "upload done"));
        assert_eq!(entry.to_string(), "high:upload done");
    }

    #[test]
    fn test_parse_script_entry_errors() {
        assert!("high".parse::<ScriptEntry>().is_err());
        assert!("high:".parse::<ScriptEntry>().is_err());
        assert!("urgent:x".parse::<ScriptEntry>().is_err());
    }

    #[tokio::test]
    async fn test_order_reports_rejections() {
        let entries: Vec<ScriptEntry> = ["low:a", "high:b", "normal:c", "immediate:d"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        let report = order(&entries, 3).await;

        assert_eq!(report.rejected, vec![entries[3].clone()]);
        let labels: Vec<&str> = report.order.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["b", "c", "a"]);
        assert!(report.stats.at_capacity);
    }
}
