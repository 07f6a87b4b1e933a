//! Text (terminal) reporter with colors and formatting

use super::{truncate, ReportOptions};
use crate::models::{ContributorStanding, LeaderboardSnapshot, Window};
use anyhow::Result;

/// Reset ANSI color
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";

/// Podium colors
fn rank_color(index: usize) -> &'static str {
    match index {
        0 => "\x1b[33m", // Gold-ish yellow
        1 => "\x1b[37m", // Silver-ish white
        2 => "\x1b[91m", // Bronze-ish light red
        _ => RESET,
    }
}

/// Render snapshot as formatted terminal output
pub fn render(snapshot: &LeaderboardSnapshot, options: &ReportOptions) -> Result<String> {
    let mut out = String::new();

    // Header
    out.push_str(&format!("\n{BOLD}{}{RESET}\n", options.title));
    out.push_str(&format!(
        "{DIM}──────────────────────────────────────{RESET}\n"
    ));
    out.push_str(&format!(
        "Period: {BOLD}{}{RESET}  Active: {}  Repos: {}  Generated: {} {}\n\n",
        snapshot.month,
        snapshot.active_this_period(),
        snapshot.stats.repos_processed,
        snapshot
            .generated
            .with_timezone(&options.offset)
            .format("%Y-%m-%d %H:%M"),
        options.timezone_label
    ));

    out.push_str(&format!("{BOLD}THIS MONTH{RESET}\n"));
    out.push_str(&render_table(&snapshot.contributors, Window::CurrentPeriod, options.top));

    out.push_str(&format!("{BOLD}ALL TIME{RESET}\n"));
    out.push_str(&render_table(&snapshot.all_time, Window::AllTime, options.top));

    out.push_str(&format!("{BOLD}RECENT ACTIVITY{RESET}\n"));
    if snapshot.recent_activity.is_empty() {
        out.push_str(&format!("  {DIM}No merged PRs this month{RESET}\n"));
    }
    for pr in &snapshot.recent_activity {
        let c = &pr.contribution;
        out.push_str(&format!(
            "  {DIM}{}{RESET}  @{:<16} {:<40} {GREEN}+{}{RESET}\n",
            c.merged_at.with_timezone(&options.offset).format("%b %e"),
            c.author,
            truncate(&format!("{}#{} {}", c.repo_name(), c.id, c.title), 40),
            pr.points
        ));
    }

    if !snapshot.stats.repos_failed.is_empty() {
        out.push_str(&format!(
            "\n{RED}Failed repositories:{RESET} {}\n",
            snapshot.stats.repos_failed.join(", ")
        ));
    }
    out.push('\n');

    Ok(out)
}

fn render_table(standings: &[ContributorStanding], window: Window, top: usize) -> String {
    let ranked: Vec<(usize, &ContributorStanding)> = standings
        .iter()
        .take(top)
        .enumerate()
        .filter(|(_, s)| s.totals(window).prs > 0)
        .collect();

    if ranked.is_empty() {
        return format!("  {DIM}No contributions yet{RESET}\n\n");
    }

    let mut out = format!("{DIM}  #   CONTRIBUTOR          POINTS   PRS{RESET}\n");
    for (index, standing) in ranked {
        let totals = standing.totals(window);
        out.push_str(&format!(
            "  {}{:<3}{RESET} @{:<19} {YELLOW}{:>6}{RESET} {:>5}\n",
            rank_color(index),
            index + 1,
            standing.username,
            totals.points,
            totals.prs
        ));
    }
    out.push('\n');
    out
}
