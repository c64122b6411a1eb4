//! Octocrab implementation of [`GitHubGateway`].

use async_trait::async_trait;
use octocrab::{Octocrab, Page};
use serde_json::Value;

use crate::github::error::FetchError;
use crate::github::locator::{PersonalAccessToken, RepositoryLocator};
use crate::github::pagination::ListEndpoint;

use super::GitHubGateway;
use super::client::build_octocrab_client;
use super::error_mapping::map_octocrab_error;

/// Octocrab-backed gateway.
pub struct OctocrabGateway {
    client: Octocrab,
}

impl OctocrabGateway {
    /// Creates a new gateway from an Octocrab client.
    #[must_use]
    pub const fn new(client: Octocrab) -> Self {
        Self { client }
    }

    /// Builds an Octocrab client for the locator's API host, authenticated
    /// when a token is supplied.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::InvalidUrl` when the base URI cannot be parsed or
    /// `FetchError::Api` when Octocrab fails to construct a client.
    pub fn for_token(
        token: Option<&PersonalAccessToken>,
        locator: &RepositoryLocator,
    ) -> Result<Self, FetchError> {
        let octocrab = build_octocrab_client(token, locator.api_base().as_str())?;
        Ok(Self::new(octocrab))
    }
}

#[async_trait]
impl GitHubGateway for OctocrabGateway {
    async fn list_all(&self, endpoint: &ListEndpoint) -> Result<Vec<Value>, FetchError> {
        let operation = endpoint.path();
        let query = endpoint.query_pairs();

        let first_page: Page<Value> = self
            .client
            .get(endpoint.path(), Some(&query))
            .await
            .map_err(|error| map_octocrab_error(operation, &error))?;

        tracing::debug!(
            "{operation}: first page has {} records, next page {}",
            first_page.items.len(),
            if first_page.next.is_some() {
                "advertised"
            } else {
                "absent"
            }
        );

        self.client
            .all_pages(first_page)
            .await
            .map_err(|error| map_octocrab_error(operation, &error))
    }

    async fn record(&self, path: &str) -> Result<Value, FetchError> {
        self.client
            .get::<Value, _, _>(path, None::<&()>)
            .await
            .map_err(|error| map_octocrab_error(path, &error))
    }
}
