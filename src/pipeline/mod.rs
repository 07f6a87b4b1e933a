//! Leaderboard generation pipeline
//!
//! For each tracked repository (in configured order):
//! 1. Fetch merged PRs once, since the earlier of the period start and the
//!    all-time lower bound
//! 2. Score every PR
//! 3. Record the current-period PRs, then the all-time PRs
//!
//! A repository that fails to fetch is logged and skipped; the run carries on
//! with the rest.

use crate::aggregate::{recent_activity, Leaderboard, RECENT_ACTIVITY_LIMIT};
use crate::config::{ConfigResult, LeaderboardConfig, PointsPolicy, Roster};
use crate::github::ContributionSource;
use crate::models::{LeaderboardSnapshot, RunStats, ScoredContribution, Window};
use crate::scoring::score;
use chrono::{DateTime, Datelike, FixedOffset, TimeZone, Utc};
use indicatif::ProgressBar;
use tracing::{error, info};

/// Inputs of a run that are not the roster or the policy
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub repos: Vec<String>,
    pub all_time_since: DateTime<Utc>,
    /// Offset the month boundary is computed in
    pub offset: FixedOffset,
}

impl RunSettings {
    pub fn from_config(config: &LeaderboardConfig) -> ConfigResult<Self> {
        Ok(Self {
            repos: config.repos.clone(),
            all_time_since: config.all_time_since,
            offset: config.offset()?,
        })
    }
}

/// First instant of the month containing `now`, in `offset`
pub fn month_start(now: DateTime<Utc>, offset: FixedOffset) -> DateTime<Utc> {
    let local = now.with_timezone(&offset);
    local
        .date_naive()
        .with_day(1)
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .and_then(|midnight| offset.from_local_datetime(&midnight).single())
        .map(|start| start.with_timezone(&Utc))
        .unwrap_or(now)
}

/// "October 2026"
pub fn period_label(now: DateTime<Utc>, offset: FixedOffset) -> String {
    now.with_timezone(&offset).format("%B %Y").to_string()
}

/// Run the whole pipeline and return the ranked snapshot
pub fn generate(
    source: &dyn ContributionSource,
    settings: &RunSettings,
    roster: &Roster,
    policy: &PointsPolicy,
    now: DateTime<Utc>,
    progress: &ProgressBar,
) -> LeaderboardSnapshot {
    let period_start = month_start(now, settings.offset);
    let fetch_since = period_start.min(settings.all_time_since);
    let month = period_label(now, settings.offset);

    info!("Generating leaderboard for {}...", month);
    info!("Tracking {} members", roster.whitelist().len());
    info!("Tracking repositories: {}", settings.repos.join(", "));

    let mut board = Leaderboard::new();
    let mut current: Vec<ScoredContribution> = Vec::new();
    let mut stats = RunStats::default();

    for repo in &settings.repos {
        progress.set_message(format!("Fetching {}...", repo));

        let fetched = match source.merged_since(repo, fetch_since, roster) {
            Ok(prs) => prs,
            Err(e) => {
                error!("Error processing {}: {}", repo, e);
                stats.repos_failed.push(repo.clone());
                progress.inc(1);
                continue;
            }
        };

        let scored: Vec<ScoredContribution> = fetched
            .into_iter()
            .filter(|c| roster.is_eligible(&c.author))
            .map(|c| {
                let result = score(&c, policy);
                ScoredContribution::new(c, result)
            })
            .collect();

        for pr in scored
            .iter()
            .filter(|s| s.contribution.merged_at >= period_start)
        {
            info!(
                "PR #{} by @{}: {} points ({})",
                pr.contribution.id, pr.contribution.author, pr.points, pr.points_detail.method
            );
            board.record(pr, Window::CurrentPeriod);
            current.push(pr.clone());
            stats.current_period_prs += 1;
        }

        for pr in scored
            .iter()
            .filter(|s| s.contribution.merged_at >= settings.all_time_since)
        {
            board.record(pr, Window::AllTime);
            stats.all_time_prs += 1;
        }

        stats.repos_processed += 1;
        progress.inc(1);
    }

    let snapshot = LeaderboardSnapshot {
        generated: now,
        month,
        period_start,
        contributors: board.rank(Window::CurrentPeriod),
        all_time: board.rank(Window::AllTime),
        recent_activity: recent_activity(&current, RECENT_ACTIVITY_LIMIT),
        repos: settings.repos.clone(),
        stats,
    };

    info!(
        "Total contributors this month: {}",
        snapshot.active_this_period()
    );
    snapshot
}
