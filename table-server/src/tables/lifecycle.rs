//! Table lifecycle state machine
//!
//! | From | Event | To |
//! |------|-------|----|
//! | available | reserve | reserved |
//! | reserved | occupy | occupied |
//! | occupied | finish | needs-cleaning |
//! | needs-cleaning | start-cleaning | cleaning |
//! | cleaning | complete-cleaning | available |
//!
//! Everything here is pure: functions take a record and a timestamp and
//! either return the next record or an error, never a half-applied change.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use shared::models::{Table, TableStatus, TableView};
use shared::types::{Millis, Timestamp};

use super::error::{TableError, TableResult};

/// Longest customer name accepted on reserve
pub const MAX_CUSTOMER_NAME_CHARS: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LifecycleEvent {
    Reserve,
    Occupy,
    Finish,
    StartCleaning,
    CompleteCleaning,
}

impl LifecycleEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleEvent::Reserve => "reserve",
            LifecycleEvent::Occupy => "occupy",
            LifecycleEvent::Finish => "finish",
            LifecycleEvent::StartCleaning => "start-cleaning",
            LifecycleEvent::CompleteCleaning => "complete-cleaning",
        }
    }

    /// The only status this event is legal from
    pub fn source(&self) -> TableStatus {
        match self {
            LifecycleEvent::Reserve => TableStatus::Available,
            LifecycleEvent::Occupy => TableStatus::Reserved,
            LifecycleEvent::Finish => TableStatus::Occupied,
            LifecycleEvent::StartCleaning => TableStatus::NeedsCleaning,
            LifecycleEvent::CompleteCleaning => TableStatus::Cleaning,
        }
    }

    pub fn target(&self) -> TableStatus {
        match self {
            LifecycleEvent::Reserve => TableStatus::Reserved,
            LifecycleEvent::Occupy => TableStatus::Occupied,
            LifecycleEvent::Finish => TableStatus::NeedsCleaning,
            LifecycleEvent::StartCleaning => TableStatus::Cleaning,
            LifecycleEvent::CompleteCleaning => TableStatus::Available,
        }
    }

    /// Event fired when the timed window of `status` runs out
    pub fn on_expiry(status: TableStatus) -> Option<LifecycleEvent> {
        match status {
            TableStatus::Reserved => Some(LifecycleEvent::Occupy),
            TableStatus::Occupied => Some(LifecycleEvent::Finish),
            TableStatus::Cleaning => Some(LifecycleEvent::CompleteCleaning),
            TableStatus::Available | TableStatus::NeedsCleaning => None,
        }
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A requested transition with its input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Reserve { customer_name: Option<String> },
    Occupy,
    Finish,
    StartCleaning,
    CompleteCleaning,
}

impl Command {
    pub fn event(&self) -> LifecycleEvent {
        match self {
            Command::Reserve { .. } => LifecycleEvent::Reserve,
            Command::Occupy => LifecycleEvent::Occupy,
            Command::Finish => LifecycleEvent::Finish,
            Command::StartCleaning => LifecycleEvent::StartCleaning,
            Command::CompleteCleaning => LifecycleEvent::CompleteCleaning,
        }
    }

    pub fn for_event(event: LifecycleEvent) -> Option<Self> {
        match event {
            LifecycleEvent::Reserve => None,
            LifecycleEvent::Occupy => Some(Command::Occupy),
            LifecycleEvent::Finish => Some(Command::Finish),
            LifecycleEvent::StartCleaning => Some(Command::StartCleaning),
            LifecycleEvent::CompleteCleaning => Some(Command::CompleteCleaning),
        }
    }
}

/// Window lengths for the timed statuses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecycleTimings {
    /// Time a customer has to reach a reserved table
    pub reservation_window: Duration,
    /// Time a seated party has to dine
    pub dining_window: Duration,
    /// Time a table spends in cleaning before it is released
    pub cleaning_duration: Duration,
}

impl Default for LifecycleTimings {
    fn default() -> Self {
        Self {
            reservation_window: Duration::from_secs(10 * 60),
            dining_window: Duration::from_secs(30 * 60),
            cleaning_duration: Duration::from_secs(5 * 60),
        }
    }
}

impl LifecycleTimings {
    pub fn window_for(&self, status: TableStatus) -> Option<Duration> {
        match status {
            TableStatus::Reserved => Some(self.reservation_window),
            TableStatus::Occupied => Some(self.dining_window),
            TableStatus::Cleaning => Some(self.cleaning_duration),
            TableStatus::Available | TableStatus::NeedsCleaning => None,
        }
    }
}

/// Trimmed, non-empty customer name
pub fn validate_customer_name(name: Option<&str>) -> TableResult<String> {
    let name = name.map(str::trim).unwrap_or_default();
    if name.is_empty() {
        return Err(TableError::MissingInput("customerName"));
    }
    if name.chars().count() > MAX_CUSTOMER_NAME_CHARS {
        return Err(TableError::InvalidInput(format!(
            "customerName must be at most {} characters",
            MAX_CUSTOMER_NAME_CHARS
        )));
    }
    Ok(name.to_string())
}

/// Stamp for a new transition, never earlier than what the record already holds
pub fn next_stamp(table: &Table, now: Timestamp) -> Timestamp {
    table.latest_stamp().map_or(now, |latest| latest.max(now))
}

/// Apply `command` to `table`, returning the next record.
///
/// Input is validated before the guard, so a reserve without a name reports
/// `MissingInput` whatever the table status.
pub fn apply(table: &Table, command: &Command, now: Timestamp) -> TableResult<Table> {
    let customer_name = match command {
        Command::Reserve { customer_name } => Some(validate_customer_name(customer_name.as_deref())?),
        _ => None,
    };

    let event = command.event();
    if table.status != event.source() {
        return Err(TableError::InvalidTransition {
            status: table.status,
            event,
        });
    }

    let at = next_stamp(table, now);
    let mut next = table.clone();
    next.status = event.target();
    match event {
        LifecycleEvent::Reserve => {
            next.customer_name = customer_name;
            next.reserved_at = Some(at);
        }
        LifecycleEvent::Occupy => {
            next.reserved_at = None;
            next.occupied_at = Some(at);
        }
        LifecycleEvent::Finish => {
            next.occupied_at = None;
            next.customer_name = None;
            next.needs_cleaning_at = Some(at);
        }
        LifecycleEvent::StartCleaning => {
            next.cleaning_started_at = Some(at);
        }
        LifecycleEvent::CompleteCleaning => next.reset(),
    }
    Ok(next)
}

/// Read model with countdowns computed against `now`
pub fn view(table: &Table, timings: &LifecycleTimings, now: Timestamp) -> TableView {
    let entered_at = table.entered_at();
    let elapsed: Option<Millis> = entered_at.map(|at| (now - at).max(0));
    let time_remaining = match (timings.window_for(table.status), elapsed) {
        (Some(window), Some(elapsed)) => {
            let window = Millis::try_from(window.as_millis()).unwrap_or(Millis::MAX);
            Some((window - elapsed).max(0))
        }
        _ => None,
    };

    TableView {
        table: table.clone(),
        time_remaining,
        elapsed,
    }
}
