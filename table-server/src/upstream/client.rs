//! Upstream order API client
//!
//! ```text
//! GET {base}/tables        → { success, data: [ExternalTable] }
//! GET {base}/transactions  → { success, data: [ExternalTransaction] }
//! ```
//!
//! The proxy routes forward [`OrderFeed::fetch_raw`] untouched; only the
//! mapping and aggregate routes go through the typed records.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::models::{ExternalTable, ExternalTransaction, UpstreamEnvelope};

use super::error::{UpstreamError, UpstreamResult};

/// Upstream list endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedResource {
    Tables,
    Transactions,
}

impl FeedResource {
    pub fn path(&self) -> &'static str {
        match self {
            FeedResource::Tables => "tables",
            FeedResource::Transactions => "transactions",
        }
    }
}

impl fmt::Display for FeedResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Read-only source of upstream tables and orders
#[async_trait]
pub trait OrderFeed: Send + Sync {
    /// Upstream JSON body as received, envelope included
    async fn fetch_raw(&self, resource: FeedResource) -> UpstreamResult<Value>;

    async fn fetch_tables(&self) -> UpstreamResult<Vec<ExternalTable>> {
        decode_list(self.fetch_raw(FeedResource::Tables).await?)
    }

    async fn fetch_transactions(&self) -> UpstreamResult<Vec<ExternalTransaction>> {
        decode_list(self.fetch_raw(FeedResource::Transactions).await?)
    }
}

/// Unwrap a `{ success, data }` envelope into typed records
pub fn decode_list<T: DeserializeOwned>(body: Value) -> UpstreamResult<Vec<T>> {
    let envelope: UpstreamEnvelope<T> =
        serde_json::from_value(body).map_err(|e| UpstreamError::Decode(e.to_string()))?;
    if !envelope.success {
        return Err(UpstreamError::Unsuccessful(envelope.message));
    }
    Ok(envelope.data)
}

/// HTTP implementation of [`OrderFeed`]
#[derive(Debug, Clone)]
pub struct HttpOrderFeed {
    client: Client,
    base_url: String,
}

impl HttpOrderFeed {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> UpstreamResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl OrderFeed for HttpOrderFeed {
    async fn fetch_raw(&self, resource: FeedResource) -> UpstreamResult<Value> {
        let url = format!("{}/{}", self.base_url, resource.path());
        tracing::debug!(url = %url, "Fetching upstream records");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %url, status = status.as_u16(), "Upstream returned error status");
            return Err(UpstreamError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| UpstreamError::Decode(e.to_string()))
    }
}
