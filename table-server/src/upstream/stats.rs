//! Upstream dashboard aggregates

use std::collections::BTreeMap;

use shared::models::{ExternalTableState, ExternalTransaction, StandSummary, TransactionStats, TransactionStatus};

/// Per-stand availability, sorted by stand id.
///
/// A table counts as occupied when it has at least one active order.
pub fn stand_summaries(states: &[ExternalTableState]) -> Vec<StandSummary> {
    let mut stands: BTreeMap<i64, StandSummary> = BTreeMap::new();
    for state in states {
        let summary = stands.entry(state.stand_id).or_insert_with(|| StandSummary {
            stand_id: state.stand_id,
            total: 0,
            available: 0,
            occupied: 0,
        });
        summary.total += 1;
        if state.active_transactions > 0 {
            summary.occupied += 1;
        }
    }

    stands
        .into_values()
        .map(|mut s| {
            s.available = s.total - s.occupied;
            s
        })
        .collect()
}

/// Order counts by status plus revenue.
///
/// `total_revenue` sums completed orders; `pending_revenue` sums everything
/// neither completed nor cancelled.
pub fn transaction_stats(transactions: &[ExternalTransaction]) -> TransactionStats {
    let mut stats = TransactionStats {
        total: transactions.len(),
        ..Default::default()
    };

    for txn in transactions {
        match txn.status {
            TransactionStatus::Pending => stats.pending += 1,
            TransactionStatus::Preparing => stats.preparing += 1,
            TransactionStatus::Ready => stats.ready += 1,
            TransactionStatus::Completed => stats.completed += 1,
            TransactionStatus::Cancelled => stats.cancelled += 1,
            TransactionStatus::Other => {}
        }
        match txn.status {
            TransactionStatus::Completed => stats.total_revenue += txn.total_amount,
            TransactionStatus::Cancelled => {}
            _ => stats.pending_revenue += txn.total_amount,
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{TableStatus, TransactionTableRef};

    fn state(stand_id: i64, number: u32, active: usize) -> ExternalTableState {
        ExternalTableState {
            number,
            stand_id,
            status: if active > 0 {
                TableStatus::Occupied
            } else {
                TableStatus::Available
            },
            customer_name: None,
            occupied_at: None,
            active_transactions: active,
            last_completed_at: None,
        }
    }

    fn txn(status: TransactionStatus, amount: f64) -> ExternalTransaction {
        ExternalTransaction {
            id: 1,
            stand_id: 1,
            customer_name: None,
            status,
            total_amount: amount,
            created_at: "2025-01-01T10:00:00Z".into(),
            updated_at: String::new(),
            completed_at: None,
            tables: TransactionTableRef {
                table_number: "1".into(),
            },
        }
    }

    #[test]
    fn test_stand_summaries_sorted() {
        let states = vec![state(3, 1, 0), state(1, 1, 2), state(1, 2, 0), state(3, 2, 1)];
        let summaries = stand_summaries(&states);

        assert_eq!(
            summaries,
            vec![
                StandSummary {
                    stand_id: 1,
                    total: 2,
                    available: 1,
                    occupied: 1,
                },
                StandSummary {
                    stand_id: 3,
                    total: 2,
                    available: 1,
                    occupied: 1,
                },
            ]
        );
    }

    #[test]
    fn test_transaction_stats() {
        let txns = vec![
            txn(TransactionStatus::Pending, 10.0),
            txn(TransactionStatus::Preparing, 20.0),
            txn(TransactionStatus::Ready, 5.0),
            txn(TransactionStatus::Completed, 100.0),
            txn(TransactionStatus::Completed, 50.0),
            txn(TransactionStatus::Cancelled, 999.0),
        ];
        let stats = transaction_stats(&txns);

        assert_eq!(stats.total, 6);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.preparing, 1);
        assert_eq!(stats.ready, 1);
        assert_eq!(stats.completed, 2);
        assert_eq!(stats.cancelled, 1);
        assert_eq!(stats.total_revenue, 150.0);
        assert_eq!(stats.pending_revenue, 35.0);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(stand_summaries(&[]).is_empty());
        assert_eq!(transaction_stats(&[]), TransactionStats::default());
    }
}
