//! Error types exposed by the GitHub ingestion layer.

use thiserror::Error;

use crate::cache::{CacheError, ResourceKind};

/// Errors surfaced while configuring the run, talking to GitHub, or touching
/// the local cache.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// The API base URL could not be parsed.
    #[error("API base URL is invalid: {0}")]
    InvalidUrl(String),

    /// A repository owner or name was blank.
    #[error("repository {field} must not be empty")]
    MissingRepositoryField {
        /// Which field was blank (`owner` or `repo`).
        field: &'static str,
    },

    /// The authentication token was rejected by GitHub.
    #[error("GitHub rejected the token: {message}")]
    Authentication {
        /// GitHub error message returned with the 401/403 response.
        message: String,
    },

    /// GitHub returned a non-authentication API error.
    #[error("GitHub API error: {message}")]
    Api {
        /// Response body from GitHub describing the failure.
        message: String,
    },

    /// Networking failed while calling GitHub.
    #[error("network error talking to GitHub: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// The API returned a rate limit response.
    #[error("GitHub API rate limit exceeded: {message}")]
    RateLimitExceeded {
        /// Error message from GitHub.
        message: String,
    },

    /// Invalid pagination parameters.
    #[error("invalid pagination: {message}")]
    InvalidPagination {
        /// Description of the invalid parameter.
        message: String,
    },

    /// Reading or writing the local cache failed.
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// One or more per-item fetches failed after the whole batch ran.
    #[error("{failed} of {total} {kind} fetches failed; first failure: {first}")]
    Batch {
        /// Resource kind the batch was fetching.
        kind: ResourceKind,
        /// Number of failed items.
        failed: usize,
        /// Number of items attempted.
        total: usize,
        /// Rendered message of the first failure in input order.
        first: String,
    },

    /// Local I/O operation failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },

    /// Configuration could not be loaded.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },
}
