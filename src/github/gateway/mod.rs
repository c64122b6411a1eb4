//! Gateways for reading repository data through Octocrab.
//!
//! The trait keeps the ingestion pipeline testable with mocks while the
//! Octocrab implementation handles real HTTP requests. Records are returned
//! as raw JSON, keeping GitHub's field order, so the cache holds the
//! payload rather than a typed projection of it.

mod client;
mod error_mapping;
mod octocrab_gateway;

pub use octocrab_gateway::OctocrabGateway;

use async_trait::async_trait;
use serde_json::Value;

use crate::github::error::FetchError;
use crate::github::pagination::ListEndpoint;

/// Gateway that can list paginated collections and fetch single records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GitHubGateway: Send + Sync {
    /// Fetch every page of `endpoint` and concatenate the records in API
    /// order. Fails as a whole if any page fails.
    async fn list_all(&self, endpoint: &ListEndpoint) -> Result<Vec<Value>, FetchError>;

    /// Fetch the single record served at `path`.
    async fn record(&self, path: &str) -> Result<Value, FetchError>;
}
