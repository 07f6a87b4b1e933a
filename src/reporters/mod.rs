//! Output reporters for leaderboard snapshots
//!
//! Supports multiple output formats:
//! - `markdown` - GitHub-flavored Markdown (the published `LEADERBOARD.md`)
//! - `json` - Machine-readable JSON (the persisted data file)
//! - `text` - Terminal output with colors

mod json;
mod markdown;
mod text;

pub use json::render_compact as render_json_compact;

use crate::config::{ConfigResult, LeaderboardConfig, PrizeConfig};
use crate::models::LeaderboardSnapshot;
use anyhow::{anyhow, Result};
use chrono::FixedOffset;
use std::path::PathBuf;
use std::str::FromStr;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Markdown,
    Json,
    Text,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "json" => Ok(OutputFormat::Json),
            "text" | "txt" | "terminal" => Ok(OutputFormat::Text),
            _ => Err(anyhow!(
                "Unknown format '{}'. Valid formats: markdown, json, text",
                s
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Markdown => write!(f, "markdown"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Text => write!(f, "text"),
        }
    }
}

/// Presentation settings shared by the human-readable reporters
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub title: String,
    pub description: String,
    /// Offset timestamps and merge dates are shown in
    pub offset: FixedOffset,
    pub timezone_label: String,
    /// Rows per leaderboard table
    pub top: usize,
    pub prizes: PrizeConfig,
    /// Linked from the point system section
    pub points_file: PathBuf,
}

impl ReportOptions {
    pub fn from_config(config: &LeaderboardConfig) -> ConfigResult<Self> {
        Ok(Self {
            title: config.title.clone(),
            description: config.description.clone(),
            offset: config.offset()?,
            timezone_label: config.timezone_label.clone(),
            top: config.top,
            prizes: config.prizes.clone(),
            points_file: config.points_file.clone(),
        })
    }
}

/// Render a snapshot in the specified format
pub fn report(snapshot: &LeaderboardSnapshot, format: &str, options: &ReportOptions) -> Result<String> {
    let fmt = OutputFormat::from_str(format)?;
    report_with_format(snapshot, fmt, options)
}

/// Render a snapshot using an OutputFormat enum
pub fn report_with_format(
    snapshot: &LeaderboardSnapshot,
    format: OutputFormat,
    options: &ReportOptions,
) -> Result<String> {
    match format {
        OutputFormat::Markdown => markdown::render(snapshot, options),
        OutputFormat::Json => json::render(snapshot),
        OutputFormat::Text => text::render(snapshot, options),
    }
}

/// Get the recommended file extension for a format
pub fn file_extension(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Markdown => "md",
        OutputFormat::Json => "json",
        OutputFormat::Text => "txt",
    }
}

/// Cut `s` to `max` characters, ending in "..." when shortened
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        s.to_string()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::aggregate::{recent_activity, Leaderboard, RECENT_ACTIVITY_LIMIT};
    use crate::models::{Contribution, RunStats, ScoreResult, ScoredContribution, Window};

    /// Create a small snapshot for testing: alice leads, bob has only
    /// all-time work, one long title in recent activity
    pub(crate) fn test_snapshot() -> LeaderboardSnapshot {
        let prs = vec![
            ScoredContribution::new(
                Contribution {
                    id: 12,
                    author: "alice".into(),
                    labels: vec!["feature".into()],
                    merged_at: "2026-10-05T14:00:00Z".parse().unwrap(),
                    files_changed: 6,
                    additions: 80,
                    deletions: 10,
                    repo: "acme/widgets".into(),
                    title: "Add a configurable retry policy to the webhook dispatcher".into(),
                    url: "https://github.com/acme/widgets/pull/12".into(),
                },
                ScoreResult::manual(6),
            ),
            ScoredContribution::new(
                Contribution {
                    id: 3,
                    author: "alice".into(),
                    labels: vec!["bug".into()],
                    merged_at: "2026-10-02T09:00:00Z".parse().unwrap(),
                    files_changed: 1,
                    additions: 3,
                    deletions: 1,
                    repo: "acme/widgets".into(),
                    title: "Fix typo".into(),
                    url: "https://github.com/acme/widgets/pull/3".into(),
                },
                ScoreResult::manual(3),
            ),
        ];

        let mut board = Leaderboard::new();
        for pr in &prs {
            board.record(pr, Window::CurrentPeriod);
        }
        for pr in &prs {
            board.record(pr, Window::AllTime);
        }
        board.record_contribution(
            "bob",
            Window::AllTime,
            20,
            "acme/widgets",
            1,
            crate::models::ScoreMethod::Calculated,
        );

        LeaderboardSnapshot {
            generated: "2026-10-19T12:00:00Z".parse().unwrap(),
            month: "October 2026".into(),
            period_start: "2026-09-30T23:00:00Z".parse().unwrap(),
            contributors: board.rank(Window::CurrentPeriod),
            all_time: board.rank(Window::AllTime),
            recent_activity: recent_activity(&prs, RECENT_ACTIVITY_LIMIT),
            repos: vec!["acme/widgets".into()],
            stats: RunStats {
                repos_processed: 1,
                repos_failed: vec![],
                current_period_prs: 2,
                all_time_prs: 3,
            },
        }
    }

    pub(crate) fn test_options() -> ReportOptions {
        ReportOptions::from_config(&LeaderboardConfig::default()).unwrap()
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!(OutputFormat::from_str("md").unwrap(), OutputFormat::Markdown);
        assert_eq!(OutputFormat::from_str("JSON").unwrap(), OutputFormat::Json);
        assert_eq!(OutputFormat::from_str("terminal").unwrap(), OutputFormat::Text);
        assert!(OutputFormat::from_str("html").is_err());
        assert_eq!(OutputFormat::Markdown.to_string(), "markdown");
        assert_eq!(file_extension(OutputFormat::Json), "json");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 50), "short");
        let long = "x".repeat(51);
        let cut = truncate(&long, 50);
        assert_eq!(cut.chars().count(), 50);
        assert!(cut.ends_with("..."));
        assert_eq!(truncate(&"y".repeat(50), 50), "y".repeat(50));
        // Multi-byte characters are not split
        assert_eq!(truncate("ééééé", 4), "é...");
    }

    #[test]
    fn test_options_from_config() {
        let options = ReportOptions::from_config(&LeaderboardConfig::default()).unwrap();
        assert_eq!(options.offset.local_minus_utc(), 3600);
        assert_eq!(options.prizes.total(), 150);

        let mut config = LeaderboardConfig::default();
        config.utc_offset = "lagos".into();
        assert!(ReportOptions::from_config(&config).is_err());
    }
}
