//! External order API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use serde_json::Value;
use shared::error::AppResult;
use shared::models::{ExternalTableState, StandSummary, SyncedTable, TransactionStats};

use crate::core::ServerState;
use crate::upstream::{FeedResource, mapping, stats as upstream_stats};

/// GET /api/external/tables - 原样转发 (含 `{ success, data }` 外壳)
pub async fn tables(State(state): State<ServerState>) -> AppResult<Json<Value>> {
    let body = state.order_feed()?.fetch_raw(FeedResource::Tables).await?;
    Ok(Json(body))
}

/// GET /api/external/transactions - 原样转发
pub async fn transactions(State(state): State<ServerState>) -> AppResult<Json<Value>> {
    let body = state.order_feed()?.fetch_raw(FeedResource::Transactions).await?;
    Ok(Json(body))
}

/// Fetch both lists and infer per-table occupancy
async fn external_states(state: &ServerState) -> AppResult<Vec<ExternalTableState>> {
    let feed = state.order_feed()?;
    let (tables, transactions) = tokio::try_join!(feed.fetch_tables(), feed.fetch_transactions())?;
    let rules = mapping::MappingRules {
        now: state.tables.now_millis(),
        cleaning_window: state.config.upstream_cleaning_window(),
    };
    Ok(mapping::map_external_states(&tables, &transactions, &rules))
}

/// GET /api/external/stands
pub async fn stands(State(state): State<ServerState>) -> AppResult<Json<Vec<StandSummary>>> {
    let states = external_states(&state).await?;
    Ok(Json(upstream_stats::stand_summaries(&states)))
}

/// GET /api/external/stats
pub async fn stats(State(state): State<ServerState>) -> AppResult<Json<TransactionStats>> {
    let transactions = state.order_feed()?.fetch_transactions().await?;
    Ok(Json(upstream_stats::transaction_stats(&transactions)))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncedQuery {
    pub stand_id: Option<i64>,
}

/// GET /api/synced/tables - 本地桌台 + 外部占用
///
/// `standId` 覆盖 `UPSTREAM_STAND_ID`。只读，不修改本地状态。
pub async fn synced_tables(
    State(state): State<ServerState>,
    Query(query): Query<SyncedQuery>,
) -> AppResult<Json<Vec<SyncedTable>>> {
    let states = external_states(&state).await?;

    let stand_id = query.stand_id.or(state.config.upstream_stand_id);
    let synced = mapping::merge_synced(state.tables.list_tables(), &states, stand_id);
    tracing::debug!(
        tables = synced.len(),
        upstream = states.len(),
        stand_id = ?stand_id,
        "Merged synced tables"
    );
    Ok(Json(synced))
}
