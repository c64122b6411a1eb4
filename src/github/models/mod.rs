//! Typed views over the raw records cached from GitHub.
//!
//! The cache stores payloads verbatim; these structs pick out only the fields
//! the reports read and ignore the rest.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Account reference embedded in issues and comments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UserRef {
    /// Account login.
    pub login: Option<String>,
}

/// An issue comment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Comment {
    /// Author; `null` for deleted accounts.
    pub user: Option<UserRef>,
    /// Markdown body; `null` for empty comments.
    pub body: Option<String>,
}

impl Comment {
    /// Author login, when GitHub still knows the account.
    #[must_use]
    pub fn author(&self) -> Option<&str> {
        self.user.as_ref().and_then(|user| user.login.as_deref())
    }

    /// Body text, empty when absent.
    #[must_use]
    pub fn body_text(&self) -> &str {
        self.body.as_deref().unwrap_or_default()
    }
}

/// Entry of the repository commit listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommitSummary {
    /// Commit SHA.
    pub sha: String,
}

/// Public user profile.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserProfile {
    /// Account login.
    pub login: String,
    /// Display name, if the user set one.
    #[serde(default)]
    pub name: Option<String>,
}

/// Issue label.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Label {
    /// Label name.
    pub name: String,
}

/// Issue (or pull request) record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Issue {
    /// API URL of the issue.
    #[serde(default)]
    pub url: Option<String>,
    /// Issue number.
    pub number: u64,
    /// Title.
    #[serde(default)]
    pub title: Option<String>,
    /// Author.
    #[serde(default)]
    pub user: Option<UserRef>,
    /// `open` or `closed`.
    #[serde(default)]
    pub state: Option<String>,
    /// Attached labels.
    #[serde(default)]
    pub labels: Vec<Label>,
    /// Comment count reported by GitHub.
    #[serde(default)]
    pub comments: u64,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Closing time, if closed.
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
}

impl Issue {
    /// Author login, when present.
    #[must_use]
    pub fn author(&self) -> Option<&str> {
        self.user.as_ref().and_then(|user| user.login.as_deref())
    }

    /// Returns true when a label named exactly `name` is attached.
    #[must_use]
    pub fn has_label(&self, name: &str) -> bool {
        self.labels.iter().any(|label| label.name == name)
    }
}
