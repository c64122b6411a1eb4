//! Per-user commentary statistics and ranking.
//!
//! Comment volume is measured in UTF-8 bytes (`str::len`), not characters.
//! Comments whose body contains [`TRANSCRIPT_MARKER`] are meeting transcripts
//! posted by bots on behalf of a group and never count towards anyone.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::github::models::Comment;

/// Text identifying a meeting transcript comment.
pub const TRANSCRIPT_MARKER: &str = "View the transcript";

/// Bytes of commentary worth one extra point.
pub const BYTES_PER_POINT: u64 = 1024;

/// Counts for one user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentaryStat {
    /// Number of counted comments.
    pub comments: u64,
    /// Total body bytes of counted comments.
    pub comment_bytes: u64,
}

impl CommentaryStat {
    /// `comments + floor(comment_bytes / 1024)`.
    #[must_use]
    pub const fn score(&self) -> u64 {
        self.comments
            .saturating_add(self.comment_bytes.div_euclid(BYTES_PER_POINT))
    }

    fn add(&mut self, body: &str) {
        self.comments = self.comments.saturating_add(1);
        self.comment_bytes = self
            .comment_bytes
            .saturating_add(u64::try_from(body.len()).unwrap_or(u64::MAX));
    }
}

/// One row of the ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedEntry {
    /// Login of the commenter.
    pub user: String,
    /// Number of counted comments.
    pub comments: u64,
    /// Total body bytes of counted comments.
    pub comment_bytes: u64,
    /// Derived score.
    pub score: u64,
}

/// How comments from users who only posted transcripts are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SilentCommenters {
    /// Users with no counted comment are left out entirely.
    #[default]
    Exclude,
    /// Users appear with zero counts as soon as they post anything.
    Include,
}

/// Commentary statistics keyed by login, in login order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Commentary {
    stats: BTreeMap<String, CommentaryStat>,
}

impl Commentary {
    /// Tallies `comments` in order.
    ///
    /// Comments without an author (deleted accounts) are ignored. Transcript
    /// comments never contribute counts; whether their authors still get an
    /// entry is decided by `silent`.
    #[must_use]
    pub fn tally<'comment, I>(comments: I, silent: SilentCommenters) -> Self
    where
        I: IntoIterator<Item = &'comment Comment>,
    {
        let mut stats: BTreeMap<String, CommentaryStat> = BTreeMap::new();

        for comment in comments {
            let Some(author) = comment.author() else {
                tracing::debug!("skipping comment without an author");
                continue;
            };
            let body = comment.body_text();

            if body.contains(TRANSCRIPT_MARKER) {
                if silent == SilentCommenters::Include {
                    stats.entry(author.to_owned()).or_default();
                }
                continue;
            }

            stats.entry(author.to_owned()).or_default().add(body);
        }

        Self { stats }
    }

    /// Statistics for `login`, if present.
    #[must_use]
    pub fn get(&self, login: &str) -> Option<&CommentaryStat> {
        self.stats.get(login)
    }

    /// Logins with an entry, ascending.
    pub fn logins(&self) -> impl Iterator<Item = &str> {
        self.stats.keys().map(String::as_str)
    }

    /// Number of users with an entry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stats.len()
    }

    /// Returns true when no user has an entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    /// Ranks users by descending score; equal scores keep ascending login
    /// order.
    #[must_use]
    pub fn ranked(&self) -> Vec<RankedEntry> {
        let mut entries: Vec<RankedEntry> = self
            .stats
            .iter()
            .map(|(user, stat)| RankedEntry {
                user: user.clone(),
                comments: stat.comments,
                comment_bytes: stat.comment_bytes,
                score: stat.score(),
            })
            .collect();
        entries.sort_by(|left, right| {
            right
                .score
                .cmp(&left.score)
                .then_with(|| left.user.cmp(&right.user))
        });
        entries
    }
}
