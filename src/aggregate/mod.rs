//! Leaderboard aggregation
//!
//! Folds scored contributions into per-contributor standings for two
//! independent windows (current period and all time) and produces ranked views.
//!
//! Standings are keyed by lowercased handle and kept in first-recorded order,
//! which is what ties fall back to when ranking.

use crate::models::{
    ContributionDetail, ContributorStanding, ScoreMethod, ScoredContribution, Window,
};
use indexmap::IndexMap;
use tracing::trace;

/// Default number of entries in the recent activity list
pub const RECENT_ACTIVITY_LIMIT: usize = 10;

/// Per-contributor accumulator
#[derive(Debug, Clone, Default)]
pub struct Leaderboard {
    standings: IndexMap<String, ContributorStanding>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the standing for `handle`, creating a zeroed one on first sight
    pub fn standing_mut(&mut self, handle: &str) -> &mut ContributorStanding {
        self.standings
            .entry(handle.to_lowercase())
            .or_insert_with(|| ContributorStanding::new(handle))
    }

    /// Add one contribution to a window.
    ///
    /// Only current-period contributions are appended to the audit trail.
    pub fn record_contribution(
        &mut self,
        handle: &str,
        window: Window,
        points: u32,
        repo: &str,
        pr_id: u64,
        method: ScoreMethod,
    ) {
        let standing = self.standing_mut(handle);
        let totals = standing.totals_mut(window);
        totals.points += u64::from(points);
        totals.prs += 1;

        if window == Window::CurrentPeriod {
            standing.contributions.push(ContributionDetail {
                pr: pr_id,
                repo: repo.to_string(),
                points,
                method,
            });
        }
        trace!(
            "Recorded {}#{} for @{} in {:?}: {} points",
            repo,
            pr_id,
            handle,
            window,
            points
        );
    }

    /// Record a scored contribution under its author
    pub fn record(&mut self, scored: &ScoredContribution, window: Window) {
        let c = &scored.contribution;
        self.record_contribution(
            &c.author,
            window,
            scored.points,
            &c.repo,
            c.id,
            scored.points_detail.method,
        );
    }

    pub fn get(&self, handle: &str) -> Option<&ContributorStanding> {
        self.standings.get(&handle.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.standings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.standings.is_empty()
    }

    /// Standings in first-recorded order
    pub fn standings(&self) -> impl Iterator<Item = &ContributorStanding> {
        self.standings.values()
    }

    /// Standings sorted by the window's points, highest first.
    ///
    /// The sort is stable: equal totals keep first-recorded order.
    pub fn rank(&self, window: Window) -> Vec<ContributorStanding> {
        let mut ranked: Vec<ContributorStanding> = self.standings.values().cloned().collect();
        ranked.sort_by(|a, b| b.totals(window).points.cmp(&a.totals(window).points));
        ranked
    }
}

/// The `limit` most recently merged contributions, newest first.
///
/// Equal merge times keep their input order.
pub fn recent_activity(scored: &[ScoredContribution], limit: usize) -> Vec<ScoredContribution> {
    let mut recent: Vec<&ScoredContribution> = scored.iter().collect();
    recent.sort_by(|a, b| b.contribution.merged_at.cmp(&a.contribution.merged_at));
    recent.into_iter().take(limit).cloned().collect()
}
