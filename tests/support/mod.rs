//! Shared test utilities.

use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a temporary directory for cache tests.
///
/// # Panics
///
/// Panics if the temporary directory cannot be created.
pub fn create_temp_dir() -> TempDir {
    TempDir::new().unwrap_or_else(|error| panic!("failed to create temporary directory: {error}"))
}

/// Mounts a GET route that must be hit exactly `times` times.
pub async fn mount_json(server: &MockServer, route: &str, body: Value, times: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(times)
        .mount(server)
        .await;
}

/// Mounts a small `w3c/spec` repository: one issue, one commit, three
/// comments (one of them a transcript) and two commenter profiles.
pub async fn mount_repository(server: &MockServer, times: u64) {
    mount_json(
        server,
        "/repos/w3c/spec/issues",
        json!([{
            "url": "https://api.github.com/repos/w3c/spec/issues/1",
            "number": 1,
            "title": "Scope",
            "user": { "login": "jdoe" },
            "state": "open",
            "labels": [{ "name": "cr-comment" }],
            "comments": 3,
            "created_at": "2024-01-01T00:00:00Z",
            "closed_at": null
        }]),
        times,
    )
    .await;
    mount_json(server, "/repos/w3c/spec/commits", json!([{ "sha": "abc123" }]), times).await;
    mount_json(
        server,
        "/repos/w3c/spec/git/commits/abc123",
        json!({ "sha": "abc123", "message": "Initial draft" }),
        times,
    )
    .await;
    mount_json(
        server,
        "/repos/w3c/spec/issues/comments",
        json!([
            { "user": { "login": "jdoe" }, "body": "x".repeat(2048) },
            { "user": { "login": "back" }, "body": "looks good" },
            { "user": { "login": "scribe" }, "body": "View the transcript" }
        ]),
        times,
    )
    .await;
    mount_json(
        server,
        "/users/jdoe",
        json!({ "login": "jdoe", "name": "Jane Doe" }),
        times,
    )
    .await;
    mount_json(
        server,
        "/users/back",
        json!({ "login": "back", "name": "Bob Ackerman" }),
        times,
    )
    .await;
}
