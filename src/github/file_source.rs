//! Offline contribution source
//!
//! Replays a JSON array of contributions, e.g. a dump captured from an earlier
//! run. Applies the same filters as the API client.

use super::{accepts, split_repo, ContributionSource, GithubError, GithubResult};
use crate::config::Roster;
use crate::models::Contribution;
use chrono::{DateTime, Utc};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct FileSource {
    contributions: Vec<Contribution>,
}

impl FileSource {
    pub fn new(contributions: Vec<Contribution>) -> Self {
        Self { contributions }
    }

    pub fn from_json(content: &str) -> GithubResult<Self> {
        serde_json::from_str(content)
            .map(Self::new)
            .map_err(|e| GithubError::Parse(e.to_string()))
    }

    pub fn load(path: &Path) -> GithubResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let source = Self::from_json(&content)?;
        debug!(
            "Loaded {} contributions from {}",
            source.contributions.len(),
            path.display()
        );
        Ok(source)
    }

    pub fn len(&self) -> usize {
        self.contributions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contributions.is_empty()
    }
}

impl ContributionSource for FileSource {
    fn merged_since(
        &self,
        repo: &str,
        since: DateTime<Utc>,
        roster: &Roster,
    ) -> GithubResult<Vec<Contribution>> {
        let (owner, name) = split_repo(repo)?;
        let full_name = format!("{}/{}", owner, name);
        Ok(self
            .contributions
            .iter()
            .filter(|c| c.repo.eq_ignore_ascii_case(&full_name))
            .filter(|c| accepts(c, since, roster))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MemberStatus, Participant};

    const DUMP: &str = r#"[
        { "id": 1, "author": "alice", "mergedAt": "2026-10-02T09:00:00Z", "repo": "acme/widgets", "labels": ["bug"] },
        { "id": 2, "author": "carol", "mergedAt": "2026-10-03T09:00:00Z", "repo": "acme/widgets" },
        { "id": 3, "author": "Alice", "mergedAt": "2026-09-03T09:00:00Z", "repo": "ACME/Widgets" },
        { "id": 4, "author": "alice", "mergedAt": "2026-10-04T09:00:00Z", "repo": "acme/gadgets" }
    ]"#;

    fn roster() -> Roster {
        Roster::new(vec![
            Participant::new("alice", None),
            Participant::new("carol", Some(MemberStatus::Alumni)),
        ])
    }

    #[test]
    fn test_filters_by_repo_window_and_roster() {
        let source = FileSource::from_json(DUMP).unwrap();
        assert_eq!(source.len(), 4);

        let since: DateTime<Utc> = "2026-09-01T00:00:00Z".parse().unwrap();
        let ids: Vec<u64> = source
            .merged_since("acme/widgets", since, &roster())
            .unwrap()
            .iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec![1, 3]);

        let since: DateTime<Utc> = "2026-10-01T00:00:00Z".parse().unwrap();
        let prs = source.merged_since("acme/widgets", since, &roster()).unwrap();
        assert_eq!(prs.len(), 1);
    }

    #[test]
    fn test_bad_dump_is_parse_error() {
        assert!(matches!(
            FileSource::from_json("{}"),
            Err(GithubError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            FileSource::load(&dir.path().join("nope.json")),
            Err(GithubError::Io(_))
        ));
    }
}
