//! Table lifecycle API Handlers
//!
//! Lifecycle endpoints answer with the updated table, including its fresh
//! countdown.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
};
use serde::Deserialize;
use shared::error::{AppError, AppResult};
use shared::models::{ReserveTableRequest, TableStats, TableStatus, TableView};

use crate::core::ServerState;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
}

/// GET /api/tables - 获取所有桌台
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<TableView>>> {
    let tables = match query.status.as_deref() {
        Some(raw) => {
            let status: TableStatus = raw.parse().map_err(AppError::validation)?;
            state.tables.tables_by_status(status)
        }
        None => state.tables.list_tables(),
    };
    Ok(Json(tables))
}

/// GET /api/tables/stats - 各状态桌台数量
pub async fn stats(State(state): State<ServerState>) -> Json<TableStats> {
    Json(state.tables.stats())
}

/// GET /api/tables/{id} - 获取单个桌台
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<TableView>> {
    Ok(Json(state.tables.get_table(&id)?))
}

/// GET /api/tables/number/{number} - 按桌号获取
pub async fn get_by_number(
    State(state): State<ServerState>,
    Path(number): Path<String>,
) -> AppResult<Json<TableView>> {
    let number: u32 = number
        .parse()
        .map_err(|_| AppError::validation(format!("Invalid table number: {}", number)))?;
    Ok(Json(state.tables.get_table_by_number(number)?))
}

/// POST /api/tables/{id}/reserve - 预订
///
/// An empty body is treated as a missing customer name.
pub async fn reserve(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    body: Result<Json<ReserveTableRequest>, JsonRejection>,
) -> AppResult<Json<TableView>> {
    let request = match body {
        Ok(Json(request)) => request,
        Err(JsonRejection::MissingJsonContentType(_)) => ReserveTableRequest::default(),
        Err(e) => return Err(AppError::invalid_request(e.body_text())),
    };
    let table = state
        .tables
        .reserve_table(&id, request.customer_name.as_deref())?;
    Ok(Json(state.tables.view(&table)))
}

/// POST /api/tables/{id}/occupy - 入座
pub async fn occupy(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<TableView>> {
    let table = state.tables.occupy_table(&id)?;
    Ok(Json(state.tables.view(&table)))
}

/// POST /api/tables/{id}/finish - 用餐结束
pub async fn finish(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<TableView>> {
    let table = state.tables.finish_table(&id)?;
    Ok(Json(state.tables.view(&table)))
}

/// POST /api/tables/{id}/clean - 开始清洁
pub async fn start_cleaning(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<TableView>> {
    let table = state.tables.start_cleaning(&id)?;
    Ok(Json(state.tables.view(&table)))
}

/// POST /api/tables/{id}/clean/complete - 完成清洁
pub async fn complete_cleaning(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<TableView>> {
    let table = state.tables.complete_cleaning(&id)?;
    Ok(Json(state.tables.view(&table)))
}
