//! External order API (synced mode)
//!
//! Read-only: upstream records are fetched, mapped and merged into responses,
//! but never written into the table store.

pub mod client;
pub mod error;
pub mod mapping;
pub mod stats;

pub use client::{FeedResource, HttpOrderFeed, OrderFeed};
pub use error::{UpstreamError, UpstreamResult};
