//! GitHub REST API client
//!
//! Sync HTTP over ureq; no async runtime needed.

use super::{accepts, split_repo, ContributionSource, GithubError, GithubResult};
use crate::config::Roster;
use crate::models::Contribution;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::env;
use tracing::{debug, info, warn};

/// Maximum page size accepted by the pulls endpoint
pub const PER_PAGE: usize = 100;

const USER_AGENT: &str = concat!("contrib-leaderboard/", env!("CARGO_PKG_VERSION"));

/// Sync GitHub client for listing merged pull requests
pub struct GithubClient {
    agent: ureq::Agent,
    api_url: String,
    token: Option<String>,
    fetch_details: bool,
    per_page: usize,
}

fn make_agent() -> ureq::Agent {
    ureq::config::Config::builder()
        .http_status_as_error(false) // Status codes are mapped to GithubError::Api
        .timeout_global(Some(std::time::Duration::from_secs(30)))
        .build()
        .new_agent()
}

impl GithubClient {
    pub fn new(api_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            agent: make_agent(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.trim().is_empty()),
            fetch_details: true,
            per_page: PER_PAGE,
        }
    }

    /// Client authenticated with `GITHUB_TOKEN` when it is set
    pub fn from_env(api_url: impl Into<String>) -> Self {
        Self::new(api_url, env::var("GITHUB_TOKEN").ok())
    }

    /// Fetch each merged PR individually to fill in file and line counts
    pub fn with_fetch_details(mut self, fetch_details: bool) -> Self {
        self.fetch_details = fetch_details;
        self
    }

    pub fn with_per_page(mut self, per_page: usize) -> Self {
        self.per_page = per_page.clamp(1, PER_PAGE);
        self
    }

    pub fn with_agent(mut self, agent: ureq::Agent) -> Self {
        self.agent = agent;
        self
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> GithubResult<T> {
        debug!("GET {}", url);
        let mut req = self
            .agent
            .get(url)
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", USER_AGENT)
            .header("X-GitHub-Api-Version", "2022-11-28");

        if let Some(token) = &self.token {
            req = req.header("Authorization", &format!("Bearer {}", token));
        }

        let response = req
            .call()
            .map_err(|e| GithubError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        if status >= 400 {
            let body = response.into_body().read_to_string().unwrap_or_default();
            return Err(GithubError::Api {
                status,
                message: api_message(&body),
            });
        }

        response
            .into_body()
            .read_json()
            .map_err(|e| GithubError::Parse(e.to_string()))
    }

    fn pulls_page_url(&self, owner: &str, name: &str, page: usize) -> String {
        format!(
            "{}/repos/{}/{}/pulls?state=closed&sort=updated&direction=desc&per_page={}&page={}",
            self.api_url, owner, name, self.per_page, page
        )
    }

    fn fill_details(&self, owner: &str, name: &str, contribution: &mut Contribution) -> GithubResult<()> {
        let url = format!(
            "{}/repos/{}/{}/pulls/{}",
            self.api_url, owner, name, contribution.id
        );
        let detail: PullRequest = self.get_json(&url)?;
        contribution.files_changed = detail.changed_files.unwrap_or(0);
        contribution.additions = detail.additions.unwrap_or(0);
        contribution.deletions = detail.deletions.unwrap_or(0);
        Ok(())
    }
}

impl ContributionSource for GithubClient {
    fn merged_since(
        &self,
        repo: &str,
        since: DateTime<Utc>,
        roster: &Roster,
    ) -> GithubResult<Vec<Contribution>> {
        let (owner, name) = split_repo(repo)?;
        let full_name = format!("{}/{}", owner, name);
        info!("Fetching PRs from {}...", full_name);

        let mut contributions = Vec::new();
        let mut page = 1;
        loop {
            let batch: Vec<PullRequest> = match self.get_json(&self.pulls_page_url(owner, name, page)) {
                Ok(batch) => batch,
                Err(e) if page == 1 => return Err(e),
                Err(e) => {
                    warn!("Stopped paginating {} at page {}: {}", full_name, page, e);
                    break;
                }
            };

            let count = batch.len();
            contributions.extend(
                batch
                    .into_iter()
                    .filter_map(|pr| pr.into_contribution(&full_name))
                    .filter(|c| accepts(c, since, roster)),
            );

            // A short page is the last one
            if count < self.per_page {
                break;
            }
            page += 1;
        }

        if self.fetch_details {
            for contribution in &mut contributions {
                if let Err(e) = self.fill_details(owner, name, contribution) {
                    warn!(
                        "Could not fetch size of {}#{}: {}",
                        full_name, contribution.id, e
                    );
                }
            }
        }

        info!(
            "Found {} merged PRs from whitelisted members in {}",
            contributions.len(),
            full_name
        );
        Ok(contributions)
    }
}

/// Pull `message` out of a GitHub error body, or fall back to the raw text
fn api_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ApiErrorBody {
        message: String,
    }

    serde_json::from_str::<ApiErrorBody>(body)
        .map(|e| e.message)
        .unwrap_or_else(|_| body.chars().take(200).collect())
}

// GitHub API types
#[derive(Debug, Deserialize)]
struct PullRequest {
    number: u64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    html_url: String,
    merged_at: Option<DateTime<Utc>>,
    user: Option<GithubUser>,
    #[serde(default)]
    labels: Vec<GithubLabel>,
    // Only present on the single-PR endpoint
    #[serde(default)]
    changed_files: Option<u32>,
    #[serde(default)]
    additions: Option<u32>,
    #[serde(default)]
    deletions: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct GithubUser {
    login: String,
}

#[derive(Debug, Deserialize)]
struct GithubLabel {
    name: String,
}

impl PullRequest {
    /// None for unmerged PRs and PRs from deleted accounts
    fn into_contribution(self, repo: &str) -> Option<Contribution> {
        let merged_at = self.merged_at?;
        let author = self.user?.login;
        Some(Contribution {
            id: self.number,
            author,
            labels: self.labels.into_iter().map(|l| l.name).collect(),
            merged_at,
            files_changed: self.changed_files.unwrap_or(0),
            additions: self.additions.unwrap_or(0),
            deletions: self.deletions.unwrap_or(0),
            repo: repo.to_string(),
            title: self.title,
            url: self.html_url,
        })
    }
}
