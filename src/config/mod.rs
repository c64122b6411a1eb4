//! Application configuration loaded from CLI, environment, and files.
//!
//! This module provides a unified configuration struct that merges values
//! from command-line arguments, environment variables, and configuration
//! files using ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in application defaults
//! 2. **Configuration file** – `.spec-contrib.toml` in current directory, home
//!    directory, or XDG config directory
//! 3. **Environment variables** – `SPEC_CONTRIB_OWNER`, `SPEC_CONTRIB_TOKEN`,
//!    or legacy `GITHUB_TOKEN`
//! 4. **Command-line arguments** – `--owner`/`-o`, `--repo`/`-r`,
//!    `--token`/`-t`, ...
//!
//! # Configuration File
//!
//! ```toml
//! owner = "w3c"
//! repo = "vc-data-model"
//! token = "ghp_example"
//! cache_dir = "tmp/spec-contrib"
//! fetch_concurrency = 8
//! disposition_report = true
//! ```

use std::env;
use std::num::NonZeroUsize;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::commentary::SilentCommenters;
use crate::github::error::FetchError;
use crate::github::locator::{DEFAULT_API_BASE, PersonalAccessToken};
use crate::github::pagination::{MAX_PER_PAGE, PageSize};
use crate::ingest::{DEFAULT_FETCH_CONCURRENCY, IngestionOptions};

/// Default cache root; the repository name is appended.
pub const DEFAULT_CACHE_DIR: &str = "tmp/spec-contrib";

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Environment Variables
///
/// - `SPEC_CONTRIB_OWNER` or `--owner`: Repository owner
/// - `SPEC_CONTRIB_REPO` or `--repo`: Repository name
/// - `SPEC_CONTRIB_TOKEN`, `GITHUB_TOKEN`, or `--token`: Authentication token
/// - `SPEC_CONTRIB_API_BASE` or `--api-base`: GitHub API base URL
/// - `SPEC_CONTRIB_CACHE_DIR` or `--cache-dir`: Cache root directory
///
/// # Example
///
/// ```no_run
/// use ortho_config::OrthoConfig;
/// use spec_contrib::SpecContribConfig;
///
/// let config = SpecContribConfig::load().expect("failed to load configuration");
/// let (owner, repo) = config.require_repository_info().expect("repository required");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "SPEC_CONTRIB",
    discovery(
        dotfile_name = ".spec-contrib.toml",
        config_file_name = "spec-contrib.toml",
        app_name = "spec-contrib"
    )
)]
pub struct SpecContribConfig {
    /// Repository owner (e.g., "w3c").
    ///
    /// Can be provided via:
    /// - CLI: `--owner <OWNER>` or `-o <OWNER>`
    /// - Environment: `SPEC_CONTRIB_OWNER`
    /// - Config file: `owner = "..."`
    #[ortho_config(cli_short = 'o')]
    pub owner: Option<String>,

    /// Repository name (e.g., "vc-data-model").
    ///
    /// Can be provided via:
    /// - CLI: `--repo <REPO>` or `-r <REPO>`
    /// - Environment: `SPEC_CONTRIB_REPO`
    /// - Config file: `repo = "..."`
    #[ortho_config(cli_short = 'r')]
    pub repo: Option<String>,

    /// Personal access token for GitHub API authentication.
    ///
    /// Optional: without a token requests go out unauthenticated and are
    /// subject to much stricter rate limits.
    ///
    /// Can be provided via:
    /// - CLI: `--token <TOKEN>` or `-t <TOKEN>`
    /// - Environment: `SPEC_CONTRIB_TOKEN` or `GITHUB_TOKEN` (legacy)
    /// - Config file: `token = "..."`
    #[ortho_config(cli_short = 't')]
    pub token: Option<String>,

    /// GitHub REST API base URL. Defaults to `https://api.github.com`.
    #[ortho_config()]
    pub api_base: String,

    /// Directory holding one cache directory per repository.
    #[ortho_config()]
    pub cache_dir: String,

    /// Records requested per page for list endpoints (1..=100).
    #[ortho_config()]
    pub per_page: u8,

    /// Maximum per-commit or per-user requests in flight. Zero is treated
    /// as one.
    #[ortho_config()]
    pub fetch_concurrency: usize,

    /// Skips fetching git commit objects for each listed commit.
    ///
    /// Note: boolean flags are not read from the environment by
    /// `ortho_config`; use the CLI or a configuration file.
    #[ortho_config()]
    pub skip_commit_details: bool,

    /// Keeps users whose every comment was a meeting transcript in the
    /// ranking and acknowledgements, with zero counts.
    #[ortho_config()]
    pub include_silent_commenters: bool,

    /// Prints a CSV disposition report for `cr-comment` issues.
    #[ortho_config(cli_short = 'd')]
    pub disposition_report: bool,

    /// Writes progress events to stderr as JSON lines.
    #[ortho_config()]
    pub telemetry: bool,
}

impl Default for SpecContribConfig {
    fn default() -> Self {
        Self {
            owner: None,
            repo: None,
            token: None,
            api_base: DEFAULT_API_BASE.to_owned(),
            cache_dir: DEFAULT_CACHE_DIR.to_owned(),
            per_page: MAX_PER_PAGE,
            fetch_concurrency: DEFAULT_FETCH_CONCURRENCY.get(),
            skip_commit_details: false,
            include_silent_commenters: false,
            disposition_report: false,
            telemetry: false,
        }
    }
}

impl SpecContribConfig {
    /// Returns owner and repo if both are configured.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Configuration`] when owner or repo is missing.
    pub fn require_repository_info(&self) -> Result<(&str, &str), FetchError> {
        match (&self.owner, &self.repo) {
            (Some(owner), Some(repo)) => Ok((owner.as_str(), repo.as_str())),
            (None, _) => Err(FetchError::Configuration {
                message: "repository owner is required (use --owner or -o)".to_owned(),
            }),
            (_, None) => Err(FetchError::Configuration {
                message: "repository name is required (use --repo or -r)".to_owned(),
            }),
        }
    }

    /// Resolves the token from configuration or the legacy `GITHUB_TOKEN`
    /// environment variable. Returns `None` when neither provides a
    /// non-blank value.
    #[must_use]
    pub fn resolve_token(&self) -> Option<PersonalAccessToken> {
        self.resolve_token_with_fallback(env::var("GITHUB_TOKEN").ok())
    }

    /// Resolves the token, using `fallback` when no configured token is set.
    ///
    /// This keeps the legacy environment lookup testable without mutating
    /// the process environment.
    #[must_use]
    pub fn resolve_token_with_fallback(
        &self,
        fallback: Option<String>,
    ) -> Option<PersonalAccessToken> {
        self.token
            .as_deref()
            .and_then(PersonalAccessToken::new)
            .or_else(|| fallback.and_then(PersonalAccessToken::new))
    }

    /// Cache directory for `repo`.
    #[must_use]
    pub fn cache_root(&self, repo: &str) -> Utf8PathBuf {
        Utf8PathBuf::from(&self.cache_dir).join(repo)
    }

    /// Pipeline options derived from the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidPagination`] when `per_page` is out of
    /// range.
    pub fn ingestion_options(&self) -> Result<IngestionOptions, FetchError> {
        Ok(IngestionOptions {
            per_page: PageSize::new(self.per_page)?,
            concurrency: NonZeroUsize::new(self.fetch_concurrency).unwrap_or(NonZeroUsize::MIN),
            skip_commit_details: self.skip_commit_details,
        })
    }

    /// How transcript-only commenters are treated.
    #[must_use]
    pub const fn silent_commenters(&self) -> SilentCommenters {
        if self.include_silent_commenters {
            SilentCommenters::Include
        } else {
            SilentCommenters::Exclude
        }
    }
}

#[cfg(test)]
mod tests;
