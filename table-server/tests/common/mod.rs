//! Shared helpers for HTTP integration tests
#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use shared::models::{
    ExternalTable, ExternalTransaction, TransactionStatus, TransactionTableRef,
};
use table_server::upstream::UpstreamResult;
use table_server::{Config, FeedResource, ManualClock, OrderFeed, ServerState, UpstreamError};

/// 2025-01-01T12:00:00Z
pub const T0: i64 = 1_735_732_800_000;

pub fn test_state() -> (ServerState, Arc<ManualClock>) {
    state_with_feed(None)
}

pub fn state_with_feed(feed: Option<Arc<dyn OrderFeed>>) -> (ServerState, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(T0));
    let state = ServerState::from_parts(Config::default(), clock.clone(), feed);
    (state, clock)
}

/// Send a request through the router and decode the JSON body
pub async fn send(state: &ServerState, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = state.https.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

pub async fn get(state: &ServerState, uri: &str) -> (StatusCode, Value) {
    send(state, "GET", uri, None).await
}

pub async fn post(state: &ServerState, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    send(state, "POST", uri, body).await
}

/// Feed answering with fixed upstream bodies
#[derive(Debug, Clone)]
pub struct StaticFeed {
    pub tables: Value,
    pub transactions: Value,
}

impl StaticFeed {
    /// Wrap typed records in a successful envelope
    pub fn new(tables: Vec<ExternalTable>, transactions: Vec<ExternalTransaction>) -> Self {
        Self {
            tables: json!({ "success": true, "data": tables }),
            transactions: json!({ "success": true, "data": transactions }),
        }
    }
}

#[async_trait]
impl OrderFeed for StaticFeed {
    async fn fetch_raw(&self, resource: FeedResource) -> UpstreamResult<Value> {
        Ok(match resource {
            FeedResource::Tables => self.tables.clone(),
            FeedResource::Transactions => self.transactions.clone(),
        })
    }
}

/// Feed whose upstream is broken: tables fail with HTTP 500, transactions
/// answer with an unsuccessful envelope
#[derive(Debug, Clone, Copy)]
pub struct FailingFeed;

#[async_trait]
impl OrderFeed for FailingFeed {
    async fn fetch_raw(&self, resource: FeedResource) -> UpstreamResult<Value> {
        match resource {
            FeedResource::Tables => Err(UpstreamError::Status(500)),
            FeedResource::Transactions => Ok(json!({ "success": false, "message": "maintenance" })),
        }
    }
}

pub fn external_table(id: i64, stand_id: i64, number: &str, is_available: bool) -> ExternalTable {
    ExternalTable {
        id,
        stand_id,
        table_number: number.to_string(),
        table_name: Some(format!("Meja {}", number)),
        is_available,
    }
}

pub fn transaction(
    id: i64,
    stand_id: i64,
    number: &str,
    status: TransactionStatus,
    total_amount: f64,
    created_at: &str,
) -> ExternalTransaction {
    ExternalTransaction {
        id,
        stand_id,
        customer_name: Some(format!("Guest {}", id)),
        status,
        total_amount,
        created_at: created_at.to_string(),
        updated_at: created_at.to_string(),
        completed_at: None,
        tables: TransactionTableRef {
            table_number: number.to_string(),
        },
    }
}
