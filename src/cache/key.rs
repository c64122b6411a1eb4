//! Cache keys and the file layout they map to.

use std::fmt;

use camino::Utf8PathBuf;
use serde::Serialize;

use super::CacheError;

/// Category of data fetched from GitHub and cached locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Every issue (and pull request) of the repository.
    Issues,
    /// The repository commit listing.
    Commits,
    /// One git commit object, keyed by SHA.
    CommitDetail,
    /// Every issue comment of the repository.
    Comments,
    /// One user profile, keyed by login.
    UserProfile,
}

impl ResourceKind {
    /// Returns a stable, human readable label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Issues => "issues",
            Self::Commits => "commits",
            Self::CommitDetail => "commit-detail",
            Self::Comments => "comments",
            Self::UserProfile => "user-profile",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Identifies one cached blob.
///
/// Collection kinds are keyed by repository name, commit details by SHA and
/// user profiles by login. The identifier always lands in a single path
/// segment, so anything that could escape the cache directory is rejected.
///
/// ```
/// use spec_contrib::cache::{CacheKey, ResourceKind};
///
/// let key = CacheKey::new(ResourceKind::UserProfile, "octocat")
///     .expect("login should be a valid identifier");
/// assert_eq!(key.relative_path().as_str(), "users/octocat");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey {
    kind: ResourceKind,
    identifier: String,
}

impl CacheKey {
    /// Builds a key after validating the identifier.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::InvalidKey`] when the identifier is empty, starts
    /// with `.`, or contains a path separator or NUL byte. Dot-prefixed names
    /// are reserved for staged writes.
    pub fn new(kind: ResourceKind, identifier: impl Into<String>) -> Result<Self, CacheError> {
        let identifier = identifier.into();
        if !is_single_segment(&identifier) {
            return Err(CacheError::InvalidKey { identifier });
        }
        Ok(Self { kind, identifier })
    }

    /// Resource kind of the key.
    #[must_use]
    pub const fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Identifier of the key.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Path of the blob relative to the repository cache root.
    #[must_use]
    pub fn relative_path(&self) -> Utf8PathBuf {
        let (directory, file_name) = match self.kind {
            ResourceKind::Issues => ("issues", "issues.json"),
            ResourceKind::Commits => ("commits", "commits.json"),
            ResourceKind::Comments => ("comments", "comments.json"),
            ResourceKind::CommitDetail => ("commits", self.identifier.as_str()),
            ResourceKind::UserProfile => ("users", self.identifier.as_str()),
        };
        Utf8PathBuf::from(directory).join(file_name)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}:{}", self.kind, self.identifier)
    }
}

fn is_single_segment(identifier: &str) -> bool {
    !identifier.is_empty()
        && !identifier.starts_with('.')
        && !identifier.contains(['/', '\\', '\0'])
}
