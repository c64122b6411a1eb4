//! Repository ingestion and reporting.

use std::io::{self, Write};

use spec_contrib::acknowledgements;
use spec_contrib::disposition::review_comments;
use spec_contrib::{
    Commentary, DiskCache, FetchError, GitHubGateway, IngestionPipeline, NoopTelemetrySink,
    OctocrabGateway, RepositoryLocator, SpecContribConfig, StderrJsonlTelemetrySink,
    TelemetryEvent, TelemetrySink,
};

use super::output::{
    write_acknowledgements, write_disposition_csv, write_ranking_dump, write_ranking_table,
};

/// Ingests the configured repository through Octocrab and writes the
/// reports to stdout.
///
/// # Errors
///
/// Returns [`FetchError::Configuration`] if owner or repo is missing, and
/// any fetch, cache or output failure from [`report`].
pub async fn run(config: &SpecContribConfig) -> Result<(), FetchError> {
    let (owner, repo) = config.require_repository_info()?;
    let locator = RepositoryLocator::new(&config.api_base, owner, repo)?;
    let token = config.resolve_token();
    let gateway = OctocrabGateway::for_token(token.as_ref(), &locator)?;

    let telemetry = telemetry_sink(config.telemetry);
    if token.is_none() {
        telemetry.record(TelemetryEvent::Unauthenticated);
    }

    let mut stdout = io::stdout();
    report(config, &locator, &gateway, telemetry.as_ref(), &mut stdout).await
}

fn telemetry_sink(enabled: bool) -> Box<dyn TelemetrySink> {
    if enabled {
        Box::new(StderrJsonlTelemetrySink)
    } else {
        Box::new(NoopTelemetrySink)
    }
}

/// Fills the cache for `locator`, then writes the disposition report (when
/// enabled), the ranking table, the ranking dump and the acknowledgements.
///
/// # Errors
///
/// Returns the first ingestion, cache or output failure. Nothing is written
/// to `writer` unless every fetch and cache read succeeded.
pub async fn report<Gateway, W>(
    config: &SpecContribConfig,
    locator: &RepositoryLocator,
    gateway: &Gateway,
    telemetry: &dyn TelemetrySink,
    writer: &mut W,
) -> Result<(), FetchError>
where
    Gateway: GitHubGateway,
    W: Write,
{
    let cache = DiskCache::open(&config.cache_root(locator.repository().as_str()))?;
    let pipeline = IngestionPipeline::new(
        gateway,
        &cache,
        locator,
        telemetry,
        config.ingestion_options()?,
    );

    let ingested = pipeline.ingest_repository().await?;
    tracing::info!("ingestion fetched {} resources", ingested.total_fetched());

    let dispositions = if config.disposition_report {
        Some(review_comments(&pipeline.load_issues()?))
    } else {
        None
    };

    let comments = pipeline.load_comments()?;
    let commentary = Commentary::tally(comments.iter(), config.silent_commenters());
    let ranking = commentary.ranked();
    let names = acknowledgements::resolve(&pipeline, &commentary).await?;

    if let Some(rows) = dispositions {
        write_disposition_csv(writer, &rows)?;
    }
    write_ranking_table(writer, &ranking)?;
    write_ranking_dump(writer, &ranking)?;
    write_acknowledgements(writer, &names)
}
