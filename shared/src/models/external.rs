//! External order API records
//!
//! Shapes returned by the upstream order-management service. They are read-only
//! inputs: the server maps them onto [`TableStatus`] but never stores them.

use serde::{Deserialize, Serialize};

use super::dining_table::{TableStatus, TableView};
use crate::types::Timestamp;

/// `{ "success": true, "data": [...] }` envelope used by every upstream list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamEnvelope<T> {
    pub success: bool,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Table record as published by the upstream API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalTable {
    pub id: i64,
    pub stand_id: i64,
    pub table_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    pub is_available: bool,
}

/// Upstream order status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Preparing,
    Ready,
    Completed,
    Cancelled,
    /// Anything the upstream adds later
    #[serde(other)]
    Other,
}

impl TransactionStatus {
    /// Orders that keep a table busy
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            TransactionStatus::Pending | TransactionStatus::Preparing | TransactionStatus::Ready
        )
    }
}

/// Table reference embedded in a transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionTableRef {
    pub table_number: String,
}

/// Order record as published by the upstream API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalTransaction {
    pub id: i64,
    pub stand_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    pub status: TransactionStatus,
    #[serde(default)]
    pub total_amount: f64,
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    pub tables: TransactionTableRef,
}

impl ExternalTransaction {
    /// When a completed order finished, falling back to `updated_at`
    pub fn finished_at(&self) -> Option<Timestamp> {
        self.completed_at
            .as_deref()
            .and_then(crate::util::parse_rfc3339_millis)
            .or_else(|| crate::util::parse_rfc3339_millis(&self.updated_at))
    }
}

/// Occupancy of one table as inferred from the upstream feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalTableState {
    pub number: u32,
    pub stand_id: i64,
    pub status: TableStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupied_at: Option<Timestamp>,
    pub active_transactions: usize,
    /// Finish time of the latest completed order (`completed_at`, else `updated_at`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_completed_at: Option<Timestamp>,
}

/// Local view paired with the upstream occupancy for the same table number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncedTable {
    #[serde(flatten)]
    pub view: TableView,
    pub effective_status: TableStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external: Option<ExternalTableState>,
}

/// Availability of one stand (vendor grouping of upstream tables)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandSummary {
    pub stand_id: i64,
    pub total: usize,
    pub available: usize,
    pub occupied: usize,
}

/// Upstream order counts and revenue
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionStats {
    pub total: usize,
    pub pending: usize,
    pub preparing: usize,
    pub ready: usize,
    pub completed: usize,
    pub cancelled: usize,
    pub total_revenue: f64,
    pub pending_revenue: f64,
}
