//! GitHub REST access for repository ingestion.
//!
//! This module wraps Octocrab behind a small gateway trait that lists
//! paginated collections and fetches single records as raw JSON. Errors are
//! mapped into [`FetchError`] variants so callers can report precise
//! failures without exposing Octocrab internals.

pub mod error;
pub mod gateway;
pub mod locator;
pub mod models;
pub mod pagination;

pub use error::FetchError;
pub use gateway::{GitHubGateway, OctocrabGateway};
pub use locator::{PersonalAccessToken, RepositoryLocator, RepositoryName, RepositoryOwner};
pub use models::{Comment, CommitSummary, Issue, Label, UserProfile, UserRef};
pub use pagination::{ListEndpoint, PageSize};

#[cfg(test)]
pub use gateway::MockGitHubGateway;
