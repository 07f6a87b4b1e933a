//! Merged pull request sources
//!
//! A [`ContributionSource`] delivers the merged contributions of one
//! repository, already filtered to:
//! - PRs that were merged (not merely closed)
//! - `merged_at >= since`
//! - authors on the roster whitelist (case-insensitive)
//!
//! Two sources exist: [`GithubClient`] talks to the GitHub REST API over sync
//! HTTP, [`FileSource`] replays a JSON dump of contributions (offline runs,
//! tests).
//!
//! # Environment Variables
//!
//! - `GITHUB_TOKEN`: optional, raises the API rate limit

mod client;
mod file_source;

pub use client::{GithubClient, PER_PAGE};
pub use file_source::FileSource;

use crate::config::Roster;
use crate::models::Contribution;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur while fetching contributions
#[derive(Error, Debug)]
pub enum GithubError {
    #[error("Invalid repository '{0}' (expected owner/name)")]
    InvalidRepo(String),

    #[error("Request failed: {0}")]
    Request(String),

    #[error("GitHub API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type GithubResult<T> = Result<T, GithubError>;

/// Something that can list merged contributions for a repository
pub trait ContributionSource {
    fn merged_since(
        &self,
        repo: &str,
        since: DateTime<Utc>,
        roster: &Roster,
    ) -> GithubResult<Vec<Contribution>>;
}

/// Split `owner/name`
pub fn split_repo(repo: &str) -> GithubResult<(&str, &str)> {
    match repo.trim().split_once('/') {
        Some((owner, name))
            if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
        {
            Ok((owner, name))
        }
        _ => Err(GithubError::InvalidRepo(repo.to_string())),
    }
}

/// Shared boundary filter: merged on or after `since`, by a whitelisted author
pub fn accepts(contribution: &Contribution, since: DateTime<Utc>, roster: &Roster) -> bool {
    contribution.merged_at >= since && roster.is_eligible(&contribution.author)
}
