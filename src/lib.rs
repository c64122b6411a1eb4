//! Contributor acknowledgements for specification repositories.
//!
//! The library mirrors a repository's issues, commits, comments and
//! commenter profiles from the GitHub REST API into a write-once file
//! cache, scores every commenter by how much they wrote, and resolves the
//! display names used in a specification's acknowledgements section.

pub mod acknowledgements;
pub mod cache;
pub mod commentary;
pub mod config;
pub mod disposition;
pub mod github;
pub mod ingest;
pub mod telemetry;

pub use cache::{BlobCache, CacheError, CacheKey, DiskCache, ResourceKind};
pub use commentary::{Commentary, RankedEntry, SilentCommenters};
pub use config::SpecContribConfig;
pub use github::{
    FetchError, GitHubGateway, OctocrabGateway, PersonalAccessToken, RepositoryLocator,
};
pub use ingest::{IngestionOptions, IngestionPipeline, IngestionReport};
pub use telemetry::{
    NoopTelemetrySink, StderrJsonlTelemetrySink, TelemetryEvent, TelemetrySink,
};
