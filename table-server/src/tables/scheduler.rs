//! Auto-advance scheduler
//!
//! The manager arms one fire-once deadline per entry into a timed status by
//! sending an [`ArmRequest`] down a channel. The scheduler sleeps until the
//! deadline and hands the request back to [`TableManager::auto_advance`],
//! which only acts if the table still holds the exact state the timer was
//! armed for. Timers are never cancelled; stale ones fire into a no-op.

use std::sync::Arc;

use shared::models::TableStatus;
use shared::types::Timestamp;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::manager::TableManager;
use super::store::Revision;

/// One armed deadline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArmRequest {
    pub table_id: String,
    /// Status the table entered
    pub status: TableStatus,
    /// Entry stamp of that status
    pub entered_at: Timestamp,
    /// Record revision right after the transition
    pub revision: Revision,
    pub deadline: Instant,
}

pub type ArmReceiver = mpsc::UnboundedReceiver<ArmRequest>;

/// Sending half held by the manager
#[derive(Debug, Clone)]
pub struct SchedulerHandle {
    tx: mpsc::UnboundedSender<ArmRequest>,
}

impl SchedulerHandle {
    pub fn arm(&self, request: ArmRequest) {
        tracing::debug!(
            table_id = %request.table_id,
            status = %request.status,
            revision = request.revision,
            "Arming auto-advance timer"
        );
        if self.tx.send(request).is_err() {
            tracing::warn!("Auto-advance scheduler is not running, timer dropped");
        }
    }
}

pub fn channel() -> (SchedulerHandle, ArmReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (SchedulerHandle { tx }, rx)
}

/// Background worker that owns every pending timer
pub struct AutoAdvanceScheduler {
    manager: Arc<TableManager>,
    rx: ArmReceiver,
    shutdown: CancellationToken,
}

impl AutoAdvanceScheduler {
    pub fn new(manager: Arc<TableManager>, rx: ArmReceiver, shutdown: CancellationToken) -> Self {
        Self {
            manager,
            rx,
            shutdown,
        }
    }

    pub async fn run(mut self) {
        tracing::info!("Auto-advance scheduler started");
        let mut timers = JoinSet::new();

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    tracing::info!(pending = timers.len(), "Auto-advance scheduler shutting down");
                    break;
                }
                request = self.rx.recv() => {
                    let Some(request) = request else {
                        tracing::info!("Arm channel closed, scheduler stopping");
                        break;
                    };
                    let manager = self.manager.clone();
                    timers.spawn(async move {
                        tokio::time::sleep_until(request.deadline).await;
                        manager.auto_advance(&request);
                    });
                }
                Some(joined) = timers.join_next(), if !timers.is_empty() => {
                    if let Err(e) = joined
                        && e.is_panic()
                    {
                        tracing::error!(error = ?e, "Auto-advance timer panicked");
                    }
                }
            }
        }

        timers.abort_all();
    }
}
