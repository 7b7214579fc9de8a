//! Dining Table Model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::types::{Millis, Timestamp};

/// Table lifecycle status (桌台状态)
///
/// `available → reserved → occupied → needs-cleaning → cleaning → available`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TableStatus {
    /// 空闲且干净
    Available,
    /// 已预订，顾客在路上
    Reserved,
    /// 顾客已入座用餐
    Occupied,
    /// 用餐结束，等待清洁
    NeedsCleaning,
    /// 清洁中
    Cleaning,
}

impl TableStatus {
    pub const ALL: [TableStatus; 5] = [
        TableStatus::Available,
        TableStatus::Reserved,
        TableStatus::Occupied,
        TableStatus::NeedsCleaning,
        TableStatus::Cleaning,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TableStatus::Available => "available",
            TableStatus::Reserved => "reserved",
            TableStatus::Occupied => "occupied",
            TableStatus::NeedsCleaning => "needs-cleaning",
            TableStatus::Cleaning => "cleaning",
        }
    }

    /// Statuses that carry a customer name.
    pub fn has_customer(&self) -> bool {
        matches!(self, TableStatus::Reserved | TableStatus::Occupied)
    }
}

impl fmt::Display for TableStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TableStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TableStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown table status: {}", s))
    }
}

/// Dining table entity (桌台)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub id: String,
    pub number: u32,
    pub capacity: u32,
    pub status: TableStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reserved_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupied_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub needs_cleaning_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cleaning_started_at: Option<Timestamp>,
}

impl Table {
    /// A fresh, available table
    pub fn new(id: impl Into<String>, number: u32, capacity: u32) -> Self {
        Self {
            id: id.into(),
            number,
            capacity,
            status: TableStatus::Available,
            customer_name: None,
            reserved_at: None,
            occupied_at: None,
            needs_cleaning_at: None,
            cleaning_started_at: None,
        }
    }

    /// Timestamp at which the table entered its current status.
    ///
    /// `None` for `available`, which carries no stamp.
    pub fn entered_at(&self) -> Option<Timestamp> {
        match self.status {
            TableStatus::Available => None,
            TableStatus::Reserved => self.reserved_at,
            TableStatus::Occupied => self.occupied_at,
            TableStatus::NeedsCleaning => self.needs_cleaning_at,
            TableStatus::Cleaning => self.cleaning_started_at,
        }
    }

    /// Latest stamp on the record, used to keep new stamps non-decreasing.
    pub fn latest_stamp(&self) -> Option<Timestamp> {
        [
            self.reserved_at,
            self.occupied_at,
            self.needs_cleaning_at,
            self.cleaning_started_at,
        ]
        .into_iter()
        .flatten()
        .max()
    }

    /// Drop everything tied to the current cycle and return to `available`.
    pub fn reset(&mut self) {
        self.status = TableStatus::Available;
        self.customer_name = None;
        self.reserved_at = None;
        self.occupied_at = None;
        self.needs_cleaning_at = None;
        self.cleaning_started_at = None;
    }
}

/// Partial table update, merged by the store.
///
/// Outer `None` leaves a field untouched, `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TablePatch {
    pub status: Option<TableStatus>,
    pub customer_name: Option<Option<String>>,
    pub reserved_at: Option<Option<Timestamp>>,
    pub occupied_at: Option<Option<Timestamp>>,
    pub needs_cleaning_at: Option<Option<Timestamp>>,
    pub cleaning_started_at: Option<Option<Timestamp>>,
}

impl TablePatch {
    pub fn apply_to(&self, table: &mut Table) {
        if let Some(status) = self.status {
            table.status = status;
        }
        if let Some(name) = &self.customer_name {
            table.customer_name = name.clone();
        }
        if let Some(at) = self.reserved_at {
            table.reserved_at = at;
        }
        if let Some(at) = self.occupied_at {
            table.occupied_at = at;
        }
        if let Some(at) = self.needs_cleaning_at {
            table.needs_cleaning_at = at;
        }
        if let Some(at) = self.cleaning_started_at {
            table.cleaning_started_at = at;
        }
    }
}

/// Table with values derived against "now" on read (never stored)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableView {
    #[serde(flatten)]
    pub table: Table,
    /// Milliseconds left in the current timed window, floored at zero
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_remaining: Option<Millis>,
    /// Milliseconds since the table entered its current status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elapsed: Option<Millis>,
}

/// Per-status table counts for the dashboard
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableStats {
    pub total: usize,
    pub available: usize,
    pub reserved: usize,
    pub occupied: usize,
    pub needs_cleaning: usize,
    pub cleaning: usize,
}

impl TableStats {
    pub fn from_tables<'a>(tables: impl IntoIterator<Item = &'a Table>) -> Self {
        let mut stats = Self::default();
        for table in tables {
            stats.total += 1;
            match table.status {
                TableStatus::Available => stats.available += 1,
                TableStatus::Reserved => stats.reserved += 1,
                TableStatus::Occupied => stats.occupied += 1,
                TableStatus::NeedsCleaning => stats.needs_cleaning += 1,
                TableStatus::Cleaning => stats.cleaning += 1,
            }
        }
        stats
    }
}

/// Reserve request body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReserveTableRequest {
    #[serde(default)]
    pub customer_name: Option<String>,
}
