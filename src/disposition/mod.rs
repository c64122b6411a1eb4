//! Disposition of formal review comments.
//!
//! Review comments are issues labelled `cr-comment`; the working group
//! records the outcome with a second label such as `cr-comment-accepted`.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::github::models::Issue;

/// Label marking an issue as a review comment.
pub const REVIEW_COMMENT_LABEL: &str = "cr-comment";

/// Prefix of labels recording a review comment's disposition.
pub const DISPOSITION_LABEL_PREFIX: &str = "cr-comment-";

/// Disposition used when no disposition label is attached.
pub const UNKNOWN_DISPOSITION: &str = "UNKNOWN";

/// CSV header row.
pub const CSV_HEADER: &str =
    "url,number,title,commenter,disposition,state,comments,created_at,closed_at";

/// One review comment and its disposition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispositionRow {
    /// API URL of the issue.
    pub url: String,
    /// Issue number.
    pub number: u64,
    /// Issue title.
    pub title: String,
    /// Login of the commenter.
    pub commenter: String,
    /// Disposition label, or [`UNKNOWN_DISPOSITION`].
    pub disposition: String,
    /// Issue state.
    pub state: String,
    /// Number of discussion comments.
    pub comments: u64,
    /// Creation time.
    pub created_at: Option<DateTime<Utc>>,
    /// Closing time.
    pub closed_at: Option<DateTime<Utc>>,
}

impl DispositionRow {
    fn from_issue(issue: &Issue) -> Self {
        let disposition = issue
            .labels
            .iter()
            .rev()
            .find(|label| label.name.starts_with(DISPOSITION_LABEL_PREFIX))
            .map_or(UNKNOWN_DISPOSITION, |label| label.name.as_str());

        Self {
            url: issue.url.clone().unwrap_or_default(),
            number: issue.number,
            title: issue.title.clone().unwrap_or_default(),
            commenter: issue.author().unwrap_or_default().to_owned(),
            disposition: disposition.to_owned(),
            state: issue.state.clone().unwrap_or_default(),
            comments: issue.comments,
            created_at: issue.created_at,
            closed_at: issue.closed_at,
        }
    }

    /// Renders the row as a CSV line, escaping commas in the title as `\,`.
    #[must_use]
    pub fn to_csv(&self) -> String {
        format!(
            "{url},{number},{title},{commenter},{disposition},{state},{comments},{created},{closed}",
            url = self.url,
            number = self.number,
            title = self.title.replace(',', "\\,"),
            commenter = self.commenter,
            disposition = self.disposition,
            state = self.state,
            comments = self.comments,
            created = format_timestamp(self.created_at),
            closed = format_timestamp(self.closed_at),
        )
    }
}

fn format_timestamp(timestamp: Option<DateTime<Utc>>) -> String {
    timestamp
        .map(|at| at.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_default()
}

/// Rows for every issue labelled [`REVIEW_COMMENT_LABEL`], in input order.
#[must_use]
pub fn review_comments(issues: &[Issue]) -> Vec<DispositionRow> {
    issues
        .iter()
        .filter(|issue| issue.has_label(REVIEW_COMMENT_LABEL))
        .map(DispositionRow::from_issue)
        .collect()
}
