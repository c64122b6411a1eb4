//! Contributor names for a specification's acknowledgements section.

use crate::cache::BlobCache;
use crate::commentary::Commentary;
use crate::github::error::FetchError;
use crate::github::gateway::GitHubGateway;
use crate::github::models::UserProfile;
use crate::ingest::IngestionPipeline;

/// Separator used when printing the acknowledgement list.
pub const NAME_SEPARATOR: &str = ",\n";

/// The profile's display name, or its login when the name is absent or
/// empty. A whitespace-only name is kept as is.
#[must_use]
pub fn display_name(profile: &UserProfile) -> &str {
    profile
        .name
        .as_deref()
        .filter(|name| !name.is_empty())
        .unwrap_or(&profile.login)
}

/// Final whitespace-delimited token of `name`.
#[must_use]
pub fn last_name(name: &str) -> &str {
    name.split_whitespace().next_back().unwrap_or(name)
}

/// Sorts by last name using plain byte-wise comparison. The sort is stable,
/// so names sharing a last name keep their relative order.
pub fn sort_by_last_name(names: &mut [String]) {
    names.sort_by(|left, right| last_name(left).cmp(last_name(right)));
}

/// Resolves every user with a commentary entry to a display name, fetching
/// missing profiles first, and returns the names sorted by last name.
///
/// All profile fetches finish before any profile is read.
///
/// # Errors
///
/// Returns [`FetchError::Batch`] when any profile fetch failed and
/// [`FetchError::Cache`] when a cached profile cannot be read.
pub async fn resolve<Gateway, Cache>(
    pipeline: &IngestionPipeline<'_, Gateway, Cache>,
    commentary: &Commentary,
) -> Result<Vec<String>, FetchError>
where
    Gateway: GitHubGateway,
    Cache: BlobCache,
{
    let logins: Vec<String> = commentary.logins().map(ToOwned::to_owned).collect();
    pipeline.ensure_user_profiles(&logins).await?;

    let mut names = logins
        .iter()
        .map(|login| {
            pipeline
                .load_user_profile(login)
                .map(|profile| display_name(&profile).to_owned())
        })
        .collect::<Result<Vec<_>, _>>()?;
    sort_by_last_name(&mut names);
    Ok(names)
}
