//! Repository identity wrappers and API route construction.

use url::Url;

use super::error::FetchError;
use super::pagination::{ListEndpoint, PageSize};

/// Default GitHub REST API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Repository owner wrapper to avoid stringly typed parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryOwner(String);

impl RepositoryOwner {
    /// Validates that the owner is non-blank.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::MissingRepositoryField`] for a blank value.
    pub fn new(value: &str) -> Result<Self, FetchError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(FetchError::MissingRepositoryField { field: "owner" });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the owner value.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Repository name wrapper to prevent parameter mix-ups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryName(String);

impl RepositoryName {
    /// Validates that the name is non-blank.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::MissingRepositoryField`] for a blank value.
    pub fn new(value: &str) -> Result<Self, FetchError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(FetchError::MissingRepositoryField { field: "repo" });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the repository name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Personal access token; blank values are treated as absent.
#[derive(Clone, PartialEq, Eq)]
pub struct PersonalAccessToken(String);

impl PersonalAccessToken {
    /// Wraps a token, returning `None` when it is blank after trimming.
    #[must_use]
    pub fn new(token: impl AsRef<str>) -> Option<Self> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PersonalAccessToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

impl std::fmt::Debug for PersonalAccessToken {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("PersonalAccessToken(***)")
    }
}

/// Target repository and the API host serving it.
///
/// # Example
///
/// ```
/// use spec_contrib::github::RepositoryLocator;
///
/// let locator = RepositoryLocator::new("https://api.github.com", "w3c", "vc-data-model")
///     .expect("should build locator");
/// assert_eq!(locator.owner().as_str(), "w3c");
/// assert_eq!(locator.user_path("octocat"), "/users/octocat");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryLocator {
    api_base: Url,
    owner: RepositoryOwner,
    repository: RepositoryName,
}

impl RepositoryLocator {
    /// Builds a locator from an API base URL and owner/repository names.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidUrl`] when `api_base` does not parse or
    /// is not HTTP(S), and [`FetchError::MissingRepositoryField`] when owner
    /// or repository is blank.
    pub fn new(api_base: &str, owner: &str, repository: &str) -> Result<Self, FetchError> {
        let api_base =
            Url::parse(api_base).map_err(|error| FetchError::InvalidUrl(error.to_string()))?;
        if !matches!(api_base.scheme(), "http" | "https") {
            return Err(FetchError::InvalidUrl(format!(
                "unsupported scheme '{}'",
                api_base.scheme()
            )));
        }

        Ok(Self {
            api_base,
            owner: RepositoryOwner::new(owner)?,
            repository: RepositoryName::new(repository)?,
        })
    }

    /// API base URL.
    #[must_use]
    pub const fn api_base(&self) -> &Url {
        &self.api_base
    }

    /// Repository owner.
    #[must_use]
    pub const fn owner(&self) -> &RepositoryOwner {
        &self.owner
    }

    /// Repository name.
    #[must_use]
    pub const fn repository(&self) -> &RepositoryName {
        &self.repository
    }

    fn repo_path(&self, suffix: &str) -> String {
        format!(
            "/repos/{}/{}/{suffix}",
            self.owner.as_str(),
            self.repository.as_str()
        )
    }

    /// Every issue and pull request, open or closed.
    #[must_use]
    pub fn issues_endpoint(&self, per_page: PageSize) -> ListEndpoint {
        ListEndpoint::new(self.repo_path("issues"), per_page).with_query("state", "all")
    }

    /// Commit listing of the default branch.
    #[must_use]
    pub fn commits_endpoint(&self, per_page: PageSize) -> ListEndpoint {
        ListEndpoint::new(self.repo_path("commits"), per_page)
    }

    /// Issue comments across the whole repository.
    #[must_use]
    pub fn comments_endpoint(&self, per_page: PageSize) -> ListEndpoint {
        ListEndpoint::new(self.repo_path("issues/comments"), per_page)
    }

    /// Git commit object for one SHA.
    #[must_use]
    pub fn commit_path(&self, sha: &str) -> String {
        self.repo_path(&format!("git/commits/{sha}"))
    }

    /// Public profile of one user.
    #[must_use]
    pub fn user_path(&self, login: &str) -> String {
        format!("/users/{login}")
    }
}
