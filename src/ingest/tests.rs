//! Tests for the cache-first ingestion pipeline.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use mockall::predicate::{always, eq};
use serde_json::{Value, json};

use super::{IngestionOptions, IngestionPipeline, StageSummary};
use crate::cache::{BlobCache, CacheKey, MemoryCache, ResourceKind};
use crate::github::error::FetchError;
use crate::github::gateway::{GitHubGateway, MockGitHubGateway};
use crate::github::locator::RepositoryLocator;
use crate::github::pagination::ListEndpoint;
use crate::telemetry::{NoopTelemetrySink, RecordingSink, TelemetryEvent};

fn locator() -> RepositoryLocator {
    RepositoryLocator::new("https://api.github.com", "w3c", "spec").expect("valid locator")
}

fn key(kind: ResourceKind, identifier: &str) -> CacheKey {
    CacheKey::new(kind, identifier).expect("valid identifier")
}

fn expect_collections(gateway: &mut MockGitHubGateway) {
    gateway
        .expect_list_all()
        .withf(|endpoint| endpoint.path() == "/repos/w3c/spec/issues")
        .times(1)
        .returning(|_| Ok(vec![json!({ "number": 1, "labels": [] })]));
    gateway
        .expect_list_all()
        .withf(|endpoint| endpoint.path() == "/repos/w3c/spec/commits")
        .times(1)
        .returning(|_| Ok(vec![json!({ "sha": "aaa" }), json!({ "sha": "bbb" })]));
    gateway
        .expect_list_all()
        .withf(|endpoint| endpoint.path() == "/repos/w3c/spec/issues/comments")
        .times(1)
        .returning(|_| Ok(vec![json!({ "user": { "login": "a" }, "body": "hi" })]));
}

#[tokio::test]
async fn empty_cache_fetches_every_resource_once() {
    let mut gateway = MockGitHubGateway::new();
    expect_collections(&mut gateway);
    gateway
        .expect_record()
        .with(eq("/repos/w3c/spec/git/commits/aaa"))
        .times(1)
        .returning(|_| Ok(json!({ "sha": "aaa" })));
    gateway
        .expect_record()
        .with(eq("/repos/w3c/spec/git/commits/bbb"))
        .times(1)
        .returning(|_| Ok(json!({ "sha": "bbb" })));

    let cache = MemoryCache::new();
    let locator = locator();
    let pipeline = IngestionPipeline::new(
        &gateway,
        &cache,
        &locator,
        &NoopTelemetrySink,
        IngestionOptions::default(),
    );

    let report = pipeline
        .ingest_repository()
        .await
        .expect("ingestion should succeed");

    assert_eq!(report.total_fetched(), 5);
    assert_eq!(
        report.stage(ResourceKind::CommitDetail),
        Some(StageSummary { hits: 0, fetched: 2 })
    );
    for cached in [
        key(ResourceKind::Issues, "spec"),
        key(ResourceKind::Commits, "spec"),
        key(ResourceKind::Comments, "spec"),
        key(ResourceKind::CommitDetail, "aaa"),
        key(ResourceKind::CommitDetail, "bbb"),
    ] {
        assert!(
            cache.exists(&cached).expect("exists should succeed"),
            "{cached} should be cached"
        );
    }
}

#[tokio::test]
async fn populated_cache_performs_no_requests() {
    let cache = MemoryCache::new();
    cache
        .write_json(&key(ResourceKind::Issues, "spec"), &json!([]))
        .expect("seed issues");
    cache
        .write_json(&key(ResourceKind::Commits, "spec"), &json!([{ "sha": "aaa" }]))
        .expect("seed commits");
    cache
        .write_json(&key(ResourceKind::CommitDetail, "aaa"), &json!({ "sha": "aaa" }))
        .expect("seed commit detail");
    cache
        .write_json(&key(ResourceKind::Comments, "spec"), &json!([]))
        .expect("seed comments");

    // No expectations: any gateway call panics.
    let gateway = MockGitHubGateway::new();
    let locator = locator();
    let pipeline = IngestionPipeline::new(
        &gateway,
        &cache,
        &locator,
        &NoopTelemetrySink,
        IngestionOptions::default(),
    );

    let report = pipeline
        .ingest_repository()
        .await
        .expect("ingestion should succeed");

    assert_eq!(report.total_fetched(), 0);
    assert_eq!(
        report.stage(ResourceKind::Comments),
        Some(StageSummary { hits: 1, fetched: 0 })
    );
}

#[tokio::test]
async fn skip_commit_details_leaves_detail_stage_out() {
    let mut gateway = MockGitHubGateway::new();
    expect_collections(&mut gateway);
    gateway.expect_record().never();

    let cache = MemoryCache::new();
    let locator = locator();
    let options = IngestionOptions {
        skip_commit_details: true,
        ..IngestionOptions::default()
    };
    let pipeline =
        IngestionPipeline::new(&gateway, &cache, &locator, &NoopTelemetrySink, options);

    let report = pipeline
        .ingest_repository()
        .await
        .expect("ingestion should succeed");

    assert_eq!(report.stage(ResourceKind::CommitDetail), None);
    assert_eq!(report.stages.len(), 3);
}

#[tokio::test]
async fn user_profiles_are_deduplicated_and_cache_guarded() {
    let cache = MemoryCache::new();
    cache
        .write_json(
            &key(ResourceKind::UserProfile, "cached"),
            &json!({ "login": "cached" }),
        )
        .expect("seed profile");

    let mut gateway = MockGitHubGateway::new();
    gateway
        .expect_record()
        .with(eq("/users/fresh"))
        .times(1)
        .returning(|_| Ok(json!({ "login": "fresh", "name": "Fresh Person" })));

    let locator = locator();
    let sink = RecordingSink::default();
    let pipeline =
        IngestionPipeline::new(&gateway, &cache, &locator, &sink, IngestionOptions::default());

    let logins = vec!["fresh".to_owned(), "cached".to_owned(), "fresh".to_owned()];
    let summary = pipeline
        .ensure_user_profiles(&logins)
        .await
        .expect("profiles should be ensured");

    assert_eq!(summary, StageSummary { hits: 1, fetched: 1 });
    let profile = pipeline
        .load_user_profile("fresh")
        .expect("profile should be readable");
    assert_eq!(profile.name.as_deref(), Some("Fresh Person"));
    assert_eq!(
        sink.take(),
        vec![
            TelemetryEvent::CacheHit {
                kind: ResourceKind::UserProfile,
                identifier: "cached".to_owned(),
            },
            TelemetryEvent::Fetched {
                kind: ResourceKind::UserProfile,
                identifier: "fresh".to_owned(),
                records: 1,
            },
        ]
    );
}

#[tokio::test]
async fn failed_items_are_reported_after_the_batch_completes() {
    let mut gateway = MockGitHubGateway::new();
    gateway
        .expect_record()
        .with(eq("/users/broken"))
        .times(1)
        .returning(|_| {
            Err(FetchError::Api {
                message: "/users/broken failed with status 404 Not Found: Not Found".to_owned(),
            })
        });
    gateway
        .expect_record()
        .with(eq("/users/ok"))
        .times(1)
        .returning(|_| Ok(json!({ "login": "ok" })));

    let cache = MemoryCache::new();
    let locator = locator();
    let pipeline = IngestionPipeline::new(
        &gateway,
        &cache,
        &locator,
        &NoopTelemetrySink,
        IngestionOptions::default(),
    );

    let error = pipeline
        .ensure_user_profiles(&["broken".to_owned(), "ok".to_owned()])
        .await
        .expect_err("batch should fail");

    match error {
        FetchError::Batch {
            kind,
            failed,
            total,
            first,
        } => {
            assert_eq!(kind, ResourceKind::UserProfile);
            assert_eq!((failed, total), (1, 2));
            assert!(first.contains("404"), "unexpected first failure: {first}");
        }
        other => panic!("expected Batch, got {other:?}"),
    }
    assert!(
        cache
            .exists(&key(ResourceKind::UserProfile, "ok"))
            .expect("exists should succeed"),
        "successful items should still be cached"
    );
}

#[tokio::test]
async fn collection_fetch_failure_writes_nothing() {
    let mut gateway = MockGitHubGateway::new();
    gateway
        .expect_list_all()
        .with(always())
        .times(1)
        .returning(|_| {
            Err(FetchError::Network {
                message: "connection reset".to_owned(),
            })
        });

    let cache = MemoryCache::new();
    let locator = locator();
    let pipeline = IngestionPipeline::new(
        &gateway,
        &cache,
        &locator,
        &NoopTelemetrySink,
        IngestionOptions::default(),
    );

    let error = pipeline
        .ensure_comments()
        .await
        .expect_err("fetch should fail");

    assert!(matches!(error, FetchError::Network { .. }));
    assert!(cache.keys().expect("keys should succeed").is_empty());
}

#[tokio::test]
async fn repeated_profile_ensure_hits_cache() {
    let mut gateway = MockGitHubGateway::new();
    gateway
        .expect_record()
        .with(eq("/users/octocat"))
        .times(1)
        .returning(|_| Ok(json!({ "login": "octocat" })));

    let cache = MemoryCache::new();
    let locator = locator();
    let pipeline = IngestionPipeline::new(
        &gateway,
        &cache,
        &locator,
        &NoopTelemetrySink,
        IngestionOptions::default(),
    );
    let logins = vec!["octocat".to_owned()];

    let first = pipeline
        .ensure_user_profiles(&logins)
        .await
        .expect("first ensure should fetch");
    let second = pipeline
        .ensure_user_profiles(&logins)
        .await
        .expect("second ensure should hit");

    assert_eq!(first, StageSummary { hits: 0, fetched: 1 });
    assert_eq!(second, StageSummary { hits: 1, fetched: 0 });
}

#[tokio::test]
async fn invalid_login_is_rejected_before_any_request() {
    let mut gateway = MockGitHubGateway::new();
    gateway.expect_record().never();

    let cache = MemoryCache::new();
    let locator = locator();
    let pipeline = IngestionPipeline::new(
        &gateway,
        &cache,
        &locator,
        &NoopTelemetrySink,
        IngestionOptions::default(),
    );

    let error = pipeline
        .ensure_user_profiles(&["../escape".to_owned()])
        .await
        .expect_err("invalid login should fail");

    assert!(
        matches!(
            &error,
            FetchError::Batch { kind: ResourceKind::UserProfile, failed: 1, total: 1, first }
                if first.contains("../escape")
        ),
        "expected rejected key in batch error, got {error:?}"
    );
    assert!(cache.keys().expect("keys should succeed").is_empty());
}

/// Gateway that tracks how many record fetches are in flight at once.
#[derive(Default)]
struct CountingGateway {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

#[async_trait]
impl GitHubGateway for CountingGateway {
    async fn list_all(&self, _endpoint: &ListEndpoint) -> Result<Vec<Value>, FetchError> {
        Ok(Vec::new())
    }

    async fn record(&self, path: &str) -> Result<Value, FetchError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(5)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(json!({ "login": path.trim_start_matches("/users/") }))
    }
}

#[tokio::test]
async fn per_item_fetches_never_exceed_concurrency() {
    let gateway = CountingGateway::default();
    let cache = MemoryCache::new();
    let locator = locator();
    let options = IngestionOptions {
        concurrency: NonZeroUsize::new(3).expect("non-zero"),
        ..IngestionOptions::default()
    };
    let pipeline = IngestionPipeline::new(&gateway, &cache, &locator, &NoopTelemetrySink, options);
    let logins: Vec<String> = (0..20).map(|index| format!("user{index}")).collect();

    let summary = pipeline
        .ensure_user_profiles(&logins)
        .await
        .expect("profiles should be fetched");

    assert_eq!(summary, StageSummary { hits: 0, fetched: 20 });
    assert_eq!(gateway.peak.load(Ordering::SeqCst), 3);
    assert_eq!(gateway.in_flight.load(Ordering::SeqCst), 0);
}
