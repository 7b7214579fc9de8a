//! Upstream → local mapping
//!
//! The upstream feed knows nothing about the local lifecycle. Occupancy is
//! inferred per table:
//!
//! | Upstream | Mapped status |
//! |----------|---------------|
//! | latest active order is `ready` | reserved |
//! | any other active order (`pending`, `preparing`) | occupied |
//! | no active order, latest `completed` order finished within the cleaning window | needs-cleaning |
//! | no active order, `is_available == false` | occupied |
//! | otherwise | available |
//!
//! Records whose table number is not a positive integer are dropped here so
//! the rest of the server only ever sees numeric table numbers.

use std::collections::HashMap;
use std::time::Duration;

use shared::models::{
    ExternalTable, ExternalTableState, ExternalTransaction, SyncedTable, TableStatus, TableView,
    TransactionStatus,
};
use shared::types::Timestamp;
use shared::util::parse_rfc3339_millis;

/// Time-dependent inputs of the mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappingRules {
    pub now: Timestamp,
    /// A table whose last order completed less than this long ago needs cleaning
    pub cleaning_window: Duration,
}

impl MappingRules {
    fn needs_cleaning(&self, finished_at: Timestamp) -> bool {
        let window = i64::try_from(self.cleaning_window.as_millis()).unwrap_or(i64::MAX);
        self.now.saturating_sub(finished_at) < window
    }
}

#[derive(Default)]
struct TableOrders<'a> {
    active: Vec<&'a ExternalTransaction>,
    last_completed_at: Option<Timestamp>,
}

/// Positive integer table number, `None` otherwise
pub fn parse_table_number(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok().filter(|n| *n > 0)
}

/// Infer the occupancy of every upstream table
pub fn map_external_states(
    tables: &[ExternalTable],
    transactions: &[ExternalTransaction],
    rules: &MappingRules,
) -> Vec<ExternalTableState> {
    let mut orders: HashMap<(i64, u32), TableOrders> = HashMap::new();
    for txn in transactions
        .iter()
        .filter(|t| t.status.is_active() || t.status == TransactionStatus::Completed)
    {
        let Some(number) = parse_table_number(&txn.tables.table_number) else {
            tracing::warn!(
                transaction_id = txn.id,
                table_number = %txn.tables.table_number,
                "Skipping upstream transaction with invalid table number"
            );
            continue;
        };
        let entry = orders.entry((txn.stand_id, number)).or_default();
        if txn.status.is_active() {
            entry.active.push(txn);
        } else if let Some(finished_at) = txn.finished_at() {
            entry.last_completed_at = entry.last_completed_at.max(Some(finished_at));
        }
    }

    tables
        .iter()
        .filter_map(|table| {
            let Some(number) = parse_table_number(&table.table_number) else {
                tracing::warn!(
                    table_id = table.id,
                    table_number = %table.table_number,
                    "Skipping upstream table with invalid table number"
                );
                return None;
            };
            let empty = TableOrders::default();
            let table_orders = orders.get(&(table.stand_id, number)).unwrap_or(&empty);
            Some(map_table(table, number, table_orders, rules))
        })
        .collect()
}

fn map_table(
    table: &ExternalTable,
    number: u32,
    orders: &TableOrders,
    rules: &MappingRules,
) -> ExternalTableState {
    let mut state = ExternalTableState {
        number,
        stand_id: table.stand_id,
        status: TableStatus::Available,
        customer_name: None,
        occupied_at: None,
        active_transactions: orders.active.len(),
        last_completed_at: orders.last_completed_at,
    };

    let latest = orders
        .active
        .iter()
        .copied()
        .max_by(|a, b| created_at_key(a).cmp(&created_at_key(b)));
    if let Some(latest) = latest {
        state.status = if latest.status == TransactionStatus::Ready {
            TableStatus::Reserved
        } else {
            TableStatus::Occupied
        };
        state.customer_name = latest.customer_name.clone();
        state.occupied_at = parse_rfc3339_millis(&latest.created_at);
    } else if orders
        .last_completed_at
        .is_some_and(|at| rules.needs_cleaning(at))
    {
        state.status = TableStatus::NeedsCleaning;
    } else if !table.is_available {
        state.status = TableStatus::Occupied;
    }

    state
}

/// Order by parsed timestamp, unparseable stamps sort first
fn created_at_key(txn: &ExternalTransaction) -> (Option<i64>, i64) {
    (parse_rfc3339_millis(&txn.created_at), txn.id)
}

fn busyness(status: TableStatus) -> u8 {
    match status {
        TableStatus::Occupied => 3,
        TableStatus::Reserved => 2,
        TableStatus::NeedsCleaning => 1,
        _ => 0,
    }
}

/// Pair local views with upstream occupancy by table number.
///
/// With `stand_id` set only that stand's tables are considered. When several
/// upstream tables share a number, the busiest one wins. Local records are
/// never written from here.
pub fn merge_synced(
    views: Vec<TableView>,
    states: &[ExternalTableState],
    stand_id: Option<i64>,
) -> Vec<SyncedTable> {
    let mut by_number: HashMap<u32, &ExternalTableState> = HashMap::new();
    for state in states
        .iter()
        .filter(|s| stand_id.is_none_or(|id| s.stand_id == id))
    {
        by_number
            .entry(state.number)
            .and_modify(|current| {
                if busyness(state.status) > busyness(current.status) {
                    *current = state;
                }
            })
            .or_insert(state);
    }

    views
        .into_iter()
        .map(|view| {
            let external = by_number.get(&view.table.number).map(|s| (*s).clone());
            let effective_status = effective_status(view.table.status, external.as_ref());
            SyncedTable {
                view,
                effective_status,
                external,
            }
        })
        .collect()
}

/// Local status, unless the table is free locally and busy upstream
pub fn effective_status(local: TableStatus, external: Option<&ExternalTableState>) -> TableStatus {
    match external {
        Some(ext) if local == TableStatus::Available && ext.status != TableStatus::Available => {
            ext.status
        }
        _ => local,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{Table, TransactionTableRef};

    fn ext_table(stand_id: i64, number: &str, is_available: bool) -> ExternalTable {
        ExternalTable {
            id: stand_id * 100 + number.parse::<i64>().unwrap_or(0),
            stand_id,
            table_number: number.to_string(),
            table_name: None,
            is_available,
        }
    }

    fn txn(id: i64, stand_id: i64, number: &str, status: TransactionStatus, created_at: &str) -> ExternalTransaction {
        ExternalTransaction {
            id,
            stand_id,
            customer_name: Some(format!("customer-{id}")),
            status,
            total_amount: 10_000.0,
            created_at: created_at.to_string(),
            updated_at: created_at.to_string(),
            completed_at: None,
            tables: TransactionTableRef {
                table_number: number.to_string(),
            },
        }
    }

    /// 2025-01-01 12:00:00 UTC, 30 minute cleaning window
    fn rules() -> MappingRules {
        MappingRules {
            now: 1_735_732_800_000,
            cleaning_window: Duration::from_secs(30 * 60),
        }
    }

    fn completed(id: i64, number: &str, completed_at: Option<&str>, updated_at: &str) -> ExternalTransaction {
        ExternalTransaction {
            completed_at: completed_at.map(str::to_string),
            updated_at: updated_at.to_string(),
            ..txn(id, 1, number, TransactionStatus::Completed, "2025-01-01T11:00:00Z")
        }
    }

    fn local(number: u32, status: TableStatus) -> TableView {
        let mut table = Table::new(format!("table-{number}"), number, 4);
        table.status = status;
        TableView {
            table,
            time_remaining: None,
            elapsed: None,
        }
    }

    #[test]
    fn test_parse_table_number() {
        assert_eq!(parse_table_number("7"), Some(7));
        assert_eq!(parse_table_number(" 12 "), Some(12));
        assert_eq!(parse_table_number("0"), None);
        assert_eq!(parse_table_number("-3"), None);
        assert_eq!(parse_table_number("A1"), None);
        assert_eq!(parse_table_number(""), None);
    }

    #[test]
    fn test_active_transaction_occupies_table() {
        let tables = vec![ext_table(1, "3", true)];
        let txns = vec![txn(1, 1, "3", TransactionStatus::Preparing, "2025-01-01T10:00:00Z")];

        let states = map_external_states(&tables, &txns, &rules());
        assert_eq!(states.len(), 1);
        let state = &states[0];
        assert_eq!(state.status, TableStatus::Occupied);
        assert_eq!(state.customer_name.as_deref(), Some("customer-1"));
        assert_eq!(state.occupied_at, Some(1_735_725_600_000));
        assert_eq!(state.active_transactions, 1);
    }

    #[test]
    fn test_latest_ready_transaction_maps_to_reserved() {
        let tables = vec![ext_table(1, "3", true)];
        let txns = vec![
            txn(1, 1, "3", TransactionStatus::Pending, "2025-01-01T10:00:00Z"),
            txn(2, 1, "3", TransactionStatus::Ready, "2025-01-01T11:00:00Z"),
        ];
        let state = &map_external_states(&tables, &txns, &rules())[0];
        assert_eq!(state.status, TableStatus::Reserved);
        assert_eq!(state.customer_name.as_deref(), Some("customer-2"));
        assert_eq!(state.active_transactions, 2);
    }

    #[test]
    fn test_inactive_transactions_ignored() {
        let tables = vec![ext_table(1, "3", true), ext_table(1, "4", false)];
        let txns = vec![
            txn(1, 1, "3", TransactionStatus::Completed, "2025-01-01T10:00:00Z"),
            txn(2, 1, "3", TransactionStatus::Cancelled, "2025-01-01T10:00:00Z"),
        ];
        let states = map_external_states(&tables, &txns, &rules());
        assert_eq!(states[0].status, TableStatus::Available);
        assert_eq!(states[0].active_transactions, 0);
        // No orders but flagged unavailable upstream
        assert_eq!(states[1].status, TableStatus::Occupied);
        assert_eq!(states[1].customer_name, None);
    }

    #[test]
    fn test_recent_completion_needs_cleaning() {
        let tables = vec![
            ext_table(1, "1", true),
            ext_table(1, "2", true),
            ext_table(1, "3", false),
            ext_table(1, "4", true),
        ];
        let txns = vec![
            // 10 minutes ago
            completed(1, "1", Some("2025-01-01T11:50:00Z"), "2025-01-01T11:55:00Z"),
            // 40 minutes ago by completed_at, even though updated_at is recent
            completed(2, "2", Some("2025-01-01T11:20:00Z"), "2025-01-01T11:58:00Z"),
            // completed_at missing, updated_at 5 minutes ago
            completed(3, "3", None, "2025-01-01T11:55:00Z"),
            // older completion plus a live order
            completed(4, "4", Some("2025-01-01T11:59:00Z"), "2025-01-01T11:59:00Z"),
            txn(5, 1, "4", TransactionStatus::Pending, "2025-01-01T11:59:30Z"),
        ];

        let states = map_external_states(&tables, &txns, &rules());
        assert_eq!(states[0].status, TableStatus::NeedsCleaning);
        assert_eq!(states[0].last_completed_at, Some(1_735_732_200_000));
        assert_eq!(states[0].active_transactions, 0);
        assert_eq!(states[1].status, TableStatus::Available);
        assert_eq!(states[2].status, TableStatus::NeedsCleaning);
        // Active orders win over a recent completion
        assert_eq!(states[3].status, TableStatus::Occupied);
    }

    #[test]
    fn test_latest_completion_decides_cleaning() {
        let tables = vec![ext_table(1, "6", true)];
        let txns = vec![
            completed(1, "6", Some("2025-01-01T09:00:00Z"), "2025-01-01T09:00:00Z"),
            completed(2, "6", Some("2025-01-01T11:45:00Z"), "2025-01-01T11:45:00Z"),
        ];
        let state = &map_external_states(&tables, &txns, &rules())[0];
        assert_eq!(state.status, TableStatus::NeedsCleaning);

        let narrow = MappingRules {
            cleaning_window: Duration::from_secs(10 * 60),
            ..rules()
        };
        let state = &map_external_states(&tables, &txns, &narrow)[0];
        assert_eq!(state.status, TableStatus::Available);
        assert_eq!(state.last_completed_at, Some(1_735_731_900_000));
    }

    #[test]
    fn test_transactions_match_on_stand_and_number() {
        let tables = vec![ext_table(1, "3", true), ext_table(2, "3", true)];
        let txns = vec![txn(1, 2, "03", TransactionStatus::Pending, "2025-01-01T10:00:00Z")];
        let states = map_external_states(&tables, &txns, &rules());
        assert_eq!(states[0].status, TableStatus::Available);
        assert_eq!(states[1].status, TableStatus::Occupied);
    }

    #[test]
    fn test_invalid_numbers_skipped() {
        let tables = vec![ext_table(1, "VIP", true), ext_table(1, "2", true)];
        let txns = vec![txn(1, 1, "bar", TransactionStatus::Pending, "2025-01-01T10:00:00Z")];
        let states = map_external_states(&tables, &txns, &rules());
        assert_eq!(states.len(), 1);
        assert_eq!(states[0].number, 2);
        assert_eq!(states[0].status, TableStatus::Available);
    }

    #[test]
    fn test_merge_prefers_busy_upstream_for_free_local_table() {
        let tables = vec![ext_table(1, "1", true), ext_table(1, "2", false), ext_table(1, "3", false)];
        let states = map_external_states(&tables, &[], &rules());
        let views = vec![
            local(1, TableStatus::Available),
            local(2, TableStatus::Available),
            local(3, TableStatus::Cleaning),
            local(4, TableStatus::Available),
        ];

        let synced = merge_synced(views, &states, None);
        assert_eq!(synced.len(), 4);
        assert_eq!(synced[0].effective_status, TableStatus::Available);
        assert_eq!(synced[1].effective_status, TableStatus::Occupied);
        // Local lifecycle wins once the table is in use locally
        assert_eq!(synced[2].effective_status, TableStatus::Cleaning);
        assert_eq!(synced[2].view.table.status, TableStatus::Cleaning);
        assert!(synced[3].external.is_none());
        assert_eq!(synced[3].effective_status, TableStatus::Available);
    }

    #[test]
    fn test_merge_busiest_stand_wins_without_filter() {
        let tables = vec![ext_table(1, "5", true), ext_table(2, "5", false)];
        let states = map_external_states(&tables, &[], &rules());
        let views = vec![local(5, TableStatus::Available)];

        let synced = merge_synced(views.clone(), &states, None);
        assert_eq!(synced[0].external.as_ref().unwrap().stand_id, 2);
        assert_eq!(synced[0].effective_status, TableStatus::Occupied);

        let synced = merge_synced(views, &states, Some(1));
        assert_eq!(synced[0].external.as_ref().unwrap().stand_id, 1);
        assert_eq!(synced[0].effective_status, TableStatus::Available);
    }
}
