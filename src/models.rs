//! Core data models for the leaderboard
//!
//! These models flow through the whole pipeline: contributions come in from
//! a source, get a [`ScoreResult`], are folded into [`ContributorStanding`]s
//! and finally land in a [`LeaderboardSnapshot`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

/// Membership status of a participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    #[default]
    Active,
    Inactive,
    Alumni,
}

impl std::fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MemberStatus::Active => write!(f, "active"),
            MemberStatus::Inactive => write!(f, "inactive"),
            MemberStatus::Alumni => write!(f, "alumni"),
        }
    }
}

/// A configured participant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// GitHub handle (compared case-insensitively)
    pub github: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Absent or unrecognized means active
    #[serde(
        default,
        deserialize_with = "lenient_status",
        skip_serializing_if = "Option::is_none"
    )]
    pub status: Option<MemberStatus>,
}

/// Unknown status strings keep the member eligible instead of failing the roster
fn lenient_status<'de, D>(deserializer: D) -> Result<Option<MemberStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let status = match raw.trim().to_lowercase().as_str() {
        "active" => MemberStatus::Active,
        "inactive" => MemberStatus::Inactive,
        "alumni" => MemberStatus::Alumni,
        _ => {
            warn!("Unknown member status '{}', treating as active", raw);
            MemberStatus::Active
        }
    };
    Ok(Some(status))
}

impl Participant {
    pub fn new(github: impl Into<String>, status: Option<MemberStatus>) -> Self {
        Self {
            github: github.into(),
            name: None,
            status,
        }
    }

    pub fn status(&self) -> MemberStatus {
        self.status.unwrap_or_default()
    }

    /// Alumni are not eligible; everyone else is
    pub fn is_eligible(&self) -> bool {
        self.status() != MemberStatus::Alumni
    }
}

/// A single merged pull request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contribution {
    /// PR number, unique within `repo`
    pub id: u64,
    pub author: String,
    #[serde(default)]
    pub labels: Vec<String>,
    pub merged_at: DateTime<Utc>,
    #[serde(default)]
    pub files_changed: u32,
    #[serde(default)]
    pub additions: u32,
    #[serde(default)]
    pub deletions: u32,
    /// Repository in `owner/name` form
    pub repo: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
}

impl Contribution {
    /// Additions plus deletions
    pub fn lines_changed(&self) -> u32 {
        self.additions.saturating_add(self.deletions)
    }

    /// Repository name without the owner
    pub fn repo_name(&self) -> &str {
        self.repo
            .split_once('/')
            .map(|(_, name)| name)
            .unwrap_or(&self.repo)
    }

    /// `owner/name#id`
    pub fn qualified_id(&self) -> String {
        format!("{}#{}", self.repo, self.id)
    }
}

/// How the points of a contribution were derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreMethod {
    Manual,
    Calculated,
}

impl std::fmt::Display for ScoreMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoreMethod::Manual => write!(f, "manual"),
            ScoreMethod::Calculated => write!(f, "calculated"),
        }
    }
}

/// A label that matched the points policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelMatch {
    pub label: String,
    pub points: u32,
}

/// Points awarded to one contribution, with an audit trail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    pub points: u32,
    pub method: ScoreMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_points: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiplier: Option<f64>,
    #[serde(default)]
    pub labels: Vec<LabelMatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files_changed: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lines_changed: Option<u32>,
}

impl ScoreResult {
    pub fn manual(points: u32) -> Self {
        Self {
            points,
            method: ScoreMethod::Manual,
            base_points: None,
            multiplier: None,
            labels: Vec::new(),
            files_changed: None,
            lines_changed: None,
        }
    }
}

/// A contribution together with its score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredContribution {
    #[serde(flatten)]
    pub contribution: Contribution,
    pub points: u32,
    pub points_detail: ScoreResult,
}

impl ScoredContribution {
    pub fn new(contribution: Contribution, score: ScoreResult) -> Self {
        Self {
            contribution,
            points: score.points,
            points_detail: score,
        }
    }
}

/// Accumulation window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    /// Resets at the start of every month
    CurrentPeriod,
    AllTime,
}

/// Points and PR count within one window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WindowTotals {
    pub points: u64,
    pub prs: u32,
}

/// One current-period contribution in a contributor's audit trail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionDetail {
    pub pr: u64,
    pub repo: String,
    pub points: u32,
    pub method: ScoreMethod,
}

/// A contributor's totals in both windows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributorStanding {
    pub username: String,
    pub current_period: WindowTotals,
    pub all_time: WindowTotals,
    pub contributions: Vec<ContributionDetail>,
}

impl ContributorStanding {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            current_period: WindowTotals::default(),
            all_time: WindowTotals::default(),
            contributions: Vec::new(),
        }
    }

    pub fn totals(&self, window: Window) -> &WindowTotals {
        match window {
            Window::CurrentPeriod => &self.current_period,
            Window::AllTime => &self.all_time,
        }
    }

    pub fn totals_mut(&mut self, window: Window) -> &mut WindowTotals {
        match window {
            Window::CurrentPeriod => &mut self.current_period,
            Window::AllTime => &mut self.all_time,
        }
    }
}

/// Per-run bookkeeping
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStats {
    pub repos_processed: usize,
    pub repos_failed: Vec<String>,
    pub current_period_prs: usize,
    pub all_time_prs: usize,
}

/// Final state of a run, persisted as `leaderboard-data.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardSnapshot {
    pub generated: DateTime<Utc>,
    /// Human label of the current period, e.g. "October 2026"
    pub month: String,
    pub period_start: DateTime<Utc>,
    /// Ranked by current-period points
    pub contributors: Vec<ContributorStanding>,
    /// Ranked by all-time points
    pub all_time: Vec<ContributorStanding>,
    pub recent_activity: Vec<ScoredContribution>,
    pub repos: Vec<String>,
    #[serde(default)]
    pub stats: RunStats,
}

impl LeaderboardSnapshot {
    /// Contributors with at least one PR this period
    pub fn active_this_period(&self) -> usize {
        self.contributors
            .iter()
            .filter(|c| c.current_period.prs > 0)
            .count()
    }
}
