//! Cache-first ingestion of repository data.
//!
//! Every resource follows the same contract: if the cache already holds the
//! key, the network is never touched; otherwise the resource is fetched
//! through the gateway and written to the cache as pretty JSON. Downstream
//! stages always read back from the cache.
//!
//! Issues, commits and comments are guarded per collection. Commit details
//! and user profiles are guarded per item; those items are fetched with
//! bounded concurrency and each `ensure_*` call returns only once every item
//! has finished, so no later stage can observe a half-populated cache.

use std::collections::BTreeSet;
use std::num::NonZeroUsize;

use futures::stream::{self, StreamExt};
use serde::de::DeserializeOwned;

use crate::cache::{BlobCache, CacheKey, ResourceKind};
use crate::github::error::FetchError;
use crate::github::gateway::GitHubGateway;
use crate::github::locator::RepositoryLocator;
use crate::github::models::{Comment, CommitSummary, Issue, UserProfile};
use crate::github::pagination::{ListEndpoint, PageSize};
use crate::telemetry::{TelemetryEvent, TelemetrySink};

/// Default number of per-item requests in flight.
pub const DEFAULT_FETCH_CONCURRENCY: NonZeroUsize = NonZeroUsize::MIN.saturating_add(7);

/// Result of ensuring a single key is cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// The key was already cached; nothing was requested.
    CacheHit,
    /// The resource was fetched and written.
    Fetched {
        /// Number of records stored under the key.
        records: usize,
    },
}

/// Hit and fetch counts for one pipeline stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageSummary {
    /// Keys satisfied from the cache.
    pub hits: usize,
    /// Keys fetched from GitHub.
    pub fetched: usize,
}

impl StageSummary {
    fn count(&mut self, outcome: IngestOutcome) {
        match outcome {
            IngestOutcome::CacheHit => self.hits += 1,
            IngestOutcome::Fetched { .. } => self.fetched += 1,
        }
    }
}

impl From<IngestOutcome> for StageSummary {
    fn from(outcome: IngestOutcome) -> Self {
        let mut summary = Self::default();
        summary.count(outcome);
        summary
    }
}

/// Per-stage summaries of a repository ingestion run, in stage order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestionReport {
    /// Completed stages.
    pub stages: Vec<(ResourceKind, StageSummary)>,
}

impl IngestionReport {
    /// Total number of keys fetched across all stages.
    #[must_use]
    pub fn total_fetched(&self) -> usize {
        self.stages.iter().map(|(_, summary)| summary.fetched).sum()
    }

    /// Summary for `kind`, if that stage ran.
    #[must_use]
    pub fn stage(&self, kind: ResourceKind) -> Option<StageSummary> {
        self.stages
            .iter()
            .find(|(stage_kind, _)| *stage_kind == kind)
            .map(|(_, summary)| *summary)
    }
}

/// Tuning knobs for the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestionOptions {
    /// Records requested per page for list endpoints.
    pub per_page: PageSize,
    /// Maximum per-item requests in flight.
    pub concurrency: NonZeroUsize,
    /// Skips the per-commit detail stage.
    pub skip_commit_details: bool,
}

impl Default for IngestionOptions {
    fn default() -> Self {
        Self {
            per_page: PageSize::default(),
            concurrency: DEFAULT_FETCH_CONCURRENCY,
            skip_commit_details: false,
        }
    }
}

/// Orchestrates cache checks, fetches and writes for one repository.
pub struct IngestionPipeline<'run, Gateway, Cache>
where
    Gateway: GitHubGateway,
    Cache: BlobCache,
{
    gateway: &'run Gateway,
    cache: &'run Cache,
    locator: &'run RepositoryLocator,
    telemetry: &'run dyn TelemetrySink,
    options: IngestionOptions,
}

impl<'run, Gateway, Cache> IngestionPipeline<'run, Gateway, Cache>
where
    Gateway: GitHubGateway,
    Cache: BlobCache,
{
    /// Creates a pipeline over the given gateway and cache.
    #[must_use]
    pub fn new(
        gateway: &'run Gateway,
        cache: &'run Cache,
        locator: &'run RepositoryLocator,
        telemetry: &'run dyn TelemetrySink,
        options: IngestionOptions,
    ) -> Self {
        Self {
            gateway,
            cache,
            locator,
            telemetry,
            options,
        }
    }

    /// Ensures issues, commits, commit details (unless skipped) and comments
    /// are cached, in that order.
    ///
    /// # Errors
    ///
    /// Returns the first stage failure; stages after it do not run.
    pub async fn ingest_repository(&self) -> Result<IngestionReport, FetchError> {
        let mut report = IngestionReport::default();

        let issues = self.ensure_issues().await?;
        self.complete_stage(&mut report, ResourceKind::Issues, issues.into());

        let commits = self.ensure_commits().await?;
        self.complete_stage(&mut report, ResourceKind::Commits, commits.into());

        if !self.options.skip_commit_details {
            let shas: Vec<String> = self
                .load_commits()?
                .into_iter()
                .map(|commit| commit.sha)
                .collect();
            let details = self.ensure_commit_details(&shas).await?;
            self.complete_stage(&mut report, ResourceKind::CommitDetail, details);
        }

        let comments = self.ensure_comments().await?;
        self.complete_stage(&mut report, ResourceKind::Comments, comments.into());

        Ok(report)
    }

    /// Ensures every issue of the repository is cached.
    ///
    /// # Errors
    ///
    /// Returns cache failures and any page fetch failure.
    pub async fn ensure_issues(&self) -> Result<IngestOutcome, FetchError> {
        let endpoint = self.locator.issues_endpoint(self.options.per_page);
        self.ensure_collection(ResourceKind::Issues, &endpoint).await
    }

    /// Ensures the commit listing is cached.
    ///
    /// # Errors
    ///
    /// Returns cache failures and any page fetch failure.
    pub async fn ensure_commits(&self) -> Result<IngestOutcome, FetchError> {
        let endpoint = self.locator.commits_endpoint(self.options.per_page);
        self.ensure_collection(ResourceKind::Commits, &endpoint).await
    }

    /// Ensures every issue comment of the repository is cached.
    ///
    /// # Errors
    ///
    /// Returns cache failures and any page fetch failure.
    pub async fn ensure_comments(&self) -> Result<IngestOutcome, FetchError> {
        let endpoint = self.locator.comments_endpoint(self.options.per_page);
        self.ensure_collection(ResourceKind::Comments, &endpoint).await
    }

    /// Ensures a git commit object is cached for every SHA.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Batch`] when any item failed, after all other
    /// items finished.
    pub async fn ensure_commit_details(&self, shas: &[String]) -> Result<StageSummary, FetchError> {
        self.ensure_records(ResourceKind::CommitDetail, shas, RepositoryLocator::commit_path)
            .await
    }

    /// Ensures a profile is cached for every login.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Batch`] when any item failed, after all other
    /// items finished.
    pub async fn ensure_user_profiles(&self, logins: &[String]) -> Result<StageSummary, FetchError> {
        self.ensure_records(ResourceKind::UserProfile, logins, RepositoryLocator::user_path)
            .await
    }

    /// Reads the cached issues.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Cache`] when the blob is missing or malformed.
    pub fn load_issues(&self) -> Result<Vec<Issue>, FetchError> {
        self.load(ResourceKind::Issues, self.repository_identifier())
    }

    /// Reads the cached commit listing.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Cache`] when the blob is missing or malformed.
    pub fn load_commits(&self) -> Result<Vec<CommitSummary>, FetchError> {
        self.load(ResourceKind::Commits, self.repository_identifier())
    }

    /// Reads the cached comments.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Cache`] when the blob is missing or malformed.
    pub fn load_comments(&self) -> Result<Vec<Comment>, FetchError> {
        self.load(ResourceKind::Comments, self.repository_identifier())
    }

    /// Reads a cached user profile.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Cache`] when the blob is missing or malformed.
    pub fn load_user_profile(&self, login: &str) -> Result<UserProfile, FetchError> {
        self.load(ResourceKind::UserProfile, login)
    }

    fn repository_identifier(&self) -> &str {
        self.locator.repository().as_str()
    }

    fn load<T: DeserializeOwned>(
        &self,
        kind: ResourceKind,
        identifier: &str,
    ) -> Result<T, FetchError> {
        let key = CacheKey::new(kind, identifier)?;
        Ok(self.cache.read_json(&key)?)
    }

    async fn ensure_collection(
        &self,
        kind: ResourceKind,
        endpoint: &ListEndpoint,
    ) -> Result<IngestOutcome, FetchError> {
        let identifier = self.repository_identifier();
        let key = CacheKey::new(kind, identifier)?;
        if self.cache_hit(&key)? {
            return Ok(IngestOutcome::CacheHit);
        }

        tracing::info!("fetching all {kind} for {identifier}");
        let records = self.gateway.list_all(endpoint).await?;
        self.cache.write_json(&key, &records)?;
        Ok(self.fetched(&key, records.len()))
    }

    async fn ensure_records(
        &self,
        kind: ResourceKind,
        identifiers: &[String],
        path_for: fn(&RepositoryLocator, &str) -> String,
    ) -> Result<StageSummary, FetchError> {
        let unique: BTreeSet<&str> = identifiers.iter().map(String::as_str).collect();
        let total = unique.len();
        let pipeline = self;

        let outcomes: Vec<Result<IngestOutcome, FetchError>> = stream::iter(unique)
            .map(move |identifier| {
                let path = path_for(pipeline.locator, identifier);
                pipeline.ensure_record(kind, identifier, path)
            })
            .buffered(self.options.concurrency.get())
            .collect()
            .await;

        let mut summary = StageSummary::default();
        let mut failures = Vec::new();
        for outcome in outcomes {
            match outcome {
                Ok(item) => summary.count(item),
                Err(error) => failures.push(error),
            }
        }

        match failures.first() {
            None => Ok(summary),
            Some(first) => Err(FetchError::Batch {
                kind,
                failed: failures.len(),
                total,
                first: first.to_string(),
            }),
        }
    }

    async fn ensure_record(
        &self,
        kind: ResourceKind,
        identifier: &str,
        path: String,
    ) -> Result<IngestOutcome, FetchError> {
        let key = CacheKey::new(kind, identifier)?;
        if self.cache_hit(&key)? {
            return Ok(IngestOutcome::CacheHit);
        }

        tracing::info!("fetching {kind} {identifier}");
        let record = self.gateway.record(&path).await?;
        self.cache.write_json(&key, &record)?;
        Ok(self.fetched(&key, 1))
    }

    fn cache_hit(&self, key: &CacheKey) -> Result<bool, FetchError> {
        let hit = self.cache.exists(key)?;
        if hit {
            self.telemetry.record(TelemetryEvent::CacheHit {
                kind: key.kind(),
                identifier: key.identifier().to_owned(),
            });
        }
        Ok(hit)
    }

    fn fetched(&self, key: &CacheKey, records: usize) -> IngestOutcome {
        self.telemetry.record(TelemetryEvent::Fetched {
            kind: key.kind(),
            identifier: key.identifier().to_owned(),
            records,
        });
        IngestOutcome::Fetched { records }
    }

    fn complete_stage(
        &self,
        report: &mut IngestionReport,
        kind: ResourceKind,
        summary: StageSummary,
    ) {
        self.telemetry.record(TelemetryEvent::StageCompleted {
            kind,
            hits: summary.hits,
            fetched: summary.fetched,
        });
        report.stages.push((kind, summary));
    }
}

#[cfg(test)]
mod tests;
