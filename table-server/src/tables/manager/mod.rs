//! TableManager - 桌台生命周期管理
//!
//! Single entry point for every table operation. Commands run through the
//! store's `modify`, which gives per-record linearizability; the pure state
//! machine in [`lifecycle`](super::lifecycle) decides the outcome.
//!
//! # Transition Flow
//!
//! ```text
//! reserve_table / occupy_table / ... (Manual)      auto_advance (Timer)
//!     ├─ 1. Lookup record (NotFound)                   ├─ 1. Compare status + revision
//!     ├─ 2. Validate input (MissingInput)              │     (stale → skip)
//!     ├─ 3. Guard current status (InvalidTransition)   └─ 2. Same as 3..6
//!     ├─ 4. Commit under record lock
//!     ├─ 5. Arm timer for timed statuses
//!     └─ 6. Broadcast TableEvent
//! ```

#[cfg(test)]
mod tests;

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use shared::models::{Table, TableStats, TableStatus, TableView};
use shared::types::Timestamp;
use tokio::sync::broadcast;

use super::clock::Clock;
use super::error::{TableError, TableResult};
use super::lifecycle::{self, Command, LifecycleEvent, LifecycleTimings};
use super::scheduler::{self, ArmReceiver, ArmRequest, SchedulerHandle};
use super::store::{Modified, Revision, TableLayout, TableStore};

/// Event broadcast channel capacity
const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// What caused a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trigger {
    Manual,
    Timer,
}

impl Trigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trigger::Manual => "manual",
            Trigger::Timer => "timer",
        }
    }
}

/// Committed transition, published to subscribers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableEvent {
    pub table_id: String,
    pub number: u32,
    pub event: LifecycleEvent,
    pub from: TableStatus,
    pub to: TableStatus,
    pub at: Timestamp,
    pub trigger: Trigger,
}

/// Manager construction options
#[derive(Debug, Clone)]
pub struct ManagerOptions {
    pub layout: TableLayout,
    pub timings: LifecycleTimings,
    /// Reservation and dining windows advance the table on expiry.
    /// Cleaning always does.
    pub enforce_windows: bool,
}

impl Default for ManagerOptions {
    fn default() -> Self {
        Self {
            layout: TableLayout::standard(12),
            timings: LifecycleTimings::default(),
            enforce_windows: true,
        }
    }
}

/// Table lifecycle manager
///
/// The `epoch` is generated on each startup so clients can detect a restart
/// (all state is volatile) and refetch.
pub struct TableManager {
    store: TableStore,
    clock: Arc<dyn Clock>,
    timings: LifecycleTimings,
    enforce_windows: bool,
    scheduler: SchedulerHandle,
    event_tx: broadcast::Sender<TableEvent>,
    epoch: String,
}

impl std::fmt::Debug for TableManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableManager")
            .field("tables", &self.store.len())
            .field("timings", &self.timings)
            .field("enforce_windows", &self.enforce_windows)
            .field("epoch", &self.epoch)
            .finish()
    }
}

impl TableManager {
    /// Create the manager and the receiving end of its timer channel.
    ///
    /// The receiver must be handed to an
    /// [`AutoAdvanceScheduler`](super::scheduler::AutoAdvanceScheduler) for
    /// timers to fire.
    pub fn new(options: ManagerOptions, clock: Arc<dyn Clock>) -> (Self, ArmReceiver) {
        let (scheduler, rx) = scheduler::channel();
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let epoch = uuid::Uuid::new_v4().to_string();
        let store = TableStore::new(options.layout);
        tracing::info!(
            epoch = %epoch,
            tables = store.len(),
            enforce_windows = options.enforce_windows,
            "TableManager started with new epoch"
        );
        let manager = Self {
            store,
            clock,
            timings: options.timings,
            enforce_windows: options.enforce_windows,
            scheduler,
            event_tx,
            epoch,
        };
        (manager, rx)
    }

    /// Get the server epoch (unique instance ID)
    pub fn epoch(&self) -> &str {
        &self.epoch
    }

    pub fn timings(&self) -> &LifecycleTimings {
        &self.timings
    }

    pub fn enforce_windows(&self) -> bool {
        self.enforce_windows
    }

    /// Current time on the manager's clock
    pub fn now_millis(&self) -> Timestamp {
        self.clock.now_millis()
    }

    /// Subscribe to committed transitions
    pub fn subscribe(&self) -> broadcast::Receiver<TableEvent> {
        self.event_tx.subscribe()
    }

    // ========== Queries ==========

    pub fn view(&self, table: &Table) -> TableView {
        lifecycle::view(table, &self.timings, self.clock.now_millis())
    }

    pub fn list_tables(&self) -> Vec<TableView> {
        let now = self.clock.now_millis();
        self.store
            .get_all()
            .iter()
            .map(|t| lifecycle::view(t, &self.timings, now))
            .collect()
    }

    pub fn get_table(&self, id: &str) -> TableResult<TableView> {
        self.store
            .get_by_id(id)
            .map(|t| self.view(&t))
            .ok_or_else(|| TableError::NotFound(id.to_string()))
    }

    pub fn get_table_by_number(&self, number: u32) -> TableResult<TableView> {
        self.store
            .get_by_number(number)
            .map(|t| self.view(&t))
            .ok_or_else(|| TableError::NotFound(number.to_string()))
    }

    pub fn tables_by_status(&self, status: TableStatus) -> Vec<TableView> {
        let now = self.clock.now_millis();
        self.store
            .get_by_status(status)
            .iter()
            .map(|t| lifecycle::view(t, &self.timings, now))
            .collect()
    }

    pub fn stats(&self) -> TableStats {
        TableStats::from_tables(&self.store.get_all())
    }

    // ========== Commands ==========

    /// available → reserved
    pub fn reserve_table(&self, id: &str, customer_name: Option<&str>) -> TableResult<Table> {
        let command = Command::Reserve {
            customer_name: customer_name.map(str::to_string),
        };
        self.execute(id, &command, Trigger::Manual)
    }

    /// reserved → occupied
    pub fn occupy_table(&self, id: &str) -> TableResult<Table> {
        self.execute(id, &Command::Occupy, Trigger::Manual)
    }

    /// occupied → needs-cleaning
    pub fn finish_table(&self, id: &str) -> TableResult<Table> {
        self.execute(id, &Command::Finish, Trigger::Manual)
    }

    /// needs-cleaning → cleaning, arms the cleaning timer
    pub fn start_cleaning(&self, id: &str) -> TableResult<Table> {
        self.execute(id, &Command::StartCleaning, Trigger::Manual)
    }

    /// cleaning → available
    ///
    /// Idempotent: a table that is not cleaning is returned unchanged.
    pub fn complete_cleaning(&self, id: &str) -> TableResult<Table> {
        match self.execute(id, &Command::CompleteCleaning, Trigger::Manual) {
            Err(TableError::InvalidTransition { status, .. }) => {
                tracing::debug!(table_id = %id, status = %status, "Table not cleaning, nothing to complete");
                self.store
                    .get_by_id(id)
                    .ok_or_else(|| TableError::NotFound(id.to_string()))
            }
            other => other,
        }
    }

    /// Fire an expired timer.
    ///
    /// Acts only if the table is still in the status and revision the timer
    /// was armed for. Returns the new table when it advanced.
    pub fn auto_advance(&self, request: &ArmRequest) -> Option<Table> {
        let Some(command) = LifecycleEvent::on_expiry(request.status).and_then(Command::for_event)
        else {
            tracing::warn!(status = %request.status, "Timer armed for untimed status");
            return None;
        };

        let now = self.clock.now_millis();
        let result = self.store.modify(&request.table_id, |table, revision| {
            if !is_current(table, revision, request) {
                return Ok(None);
            }
            let from = table.status;
            *table = lifecycle::apply(table, &command, now)?;
            Ok(Some(from))
        });

        match result {
            Ok(Modified {
                table,
                revision,
                output: Some(from),
            }) => {
                self.after_commit(&table, revision, from, command.event(), Trigger::Timer);
                Some(table)
            }
            Ok(_) => {
                tracing::debug!(
                    table_id = %request.table_id,
                    status = %request.status,
                    revision = request.revision,
                    "Stale timer skipped"
                );
                None
            }
            Err(e) => {
                tracing::error!(table_id = %request.table_id, error = %e, "Auto-advance failed");
                None
            }
        }
    }

    fn execute(&self, id: &str, command: &Command, trigger: Trigger) -> TableResult<Table> {
        let now = self.clock.now_millis();
        let result = self.store.modify(id, |table, _| {
            let from = table.status;
            *table = lifecycle::apply(table, command, now)?;
            Ok(from)
        });

        match result {
            Ok(Modified {
                table,
                revision,
                output: from,
            }) => {
                self.after_commit(&table, revision, from, command.event(), trigger);
                Ok(table)
            }
            Err(e) => {
                tracing::debug!(table_id = %id, event = %command.event(), error = %e, "Transition rejected");
                Err(e)
            }
        }
    }

    fn after_commit(
        &self,
        table: &Table,
        revision: Revision,
        from: TableStatus,
        event: LifecycleEvent,
        trigger: Trigger,
    ) {
        if let Some(window) = self.timer_window(table.status)
            && let Some(entered_at) = table.entered_at()
        {
            match tokio::time::Instant::now().checked_add(window) {
                Some(deadline) => self.scheduler.arm(ArmRequest {
                    table_id: table.id.clone(),
                    status: table.status,
                    entered_at,
                    revision,
                    deadline,
                }),
                None => tracing::warn!(
                    table_id = %table.id,
                    status = %table.status,
                    window_secs = window.as_secs(),
                    "Timer window out of range, not armed"
                ),
            }
        }

        let event = TableEvent {
            table_id: table.id.clone(),
            number: table.number,
            event,
            from,
            to: table.status,
            at: table.entered_at().unwrap_or_else(|| self.clock.now_millis()),
            trigger,
        };
        // No subscribers is fine
        let _ = self.event_tx.send(event);
    }

    /// Window to arm on entry to `status`, if that status is timed
    fn timer_window(&self, status: TableStatus) -> Option<Duration> {
        match status {
            TableStatus::Cleaning => self.timings.window_for(status),
            TableStatus::Reserved | TableStatus::Occupied if self.enforce_windows => {
                self.timings.window_for(status)
            }
            _ => None,
        }
    }
}

fn is_current(table: &Table, revision: Revision, request: &ArmRequest) -> bool {
    revision == request.revision
        && table.status == request.status
        && table.entered_at() == Some(request.entered_at)
}
