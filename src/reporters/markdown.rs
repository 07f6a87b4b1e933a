//! Markdown reporter for the published leaderboard
//!
//! Generates the `LEADERBOARD.md` page: monthly table, prize pool, all-time
//! table, recent activity, and the static rules sections.

use super::{truncate, ReportOptions};
use crate::models::{ContributorStanding, LeaderboardSnapshot, Window};
use anyhow::Result;

const MEDALS: [&str; 3] = ["🥇", "🥈", "🥉"];

/// Titles longer than this are cut in the recent activity table
const MAX_TITLE_CHARS: usize = 50;

/// Render snapshot as GitHub-flavored Markdown
pub fn render(snapshot: &LeaderboardSnapshot, options: &ReportOptions) -> Result<String> {
    let mut md = String::new();

    md.push_str(&render_header(snapshot, options));
    md.push_str(&render_monthly(snapshot, options));
    md.push_str(&render_prizes(options));
    md.push_str(&render_all_time(snapshot, options));
    md.push_str(&render_recent_activity(snapshot, options));
    md.push_str(&render_point_system(options));
    md.push_str(&render_repos(snapshot));
    md.push_str(&render_rules());
    md.push_str(&render_footer());

    Ok(md)
}

fn render_header(snapshot: &LeaderboardSnapshot, options: &ReportOptions) -> String {
    // e.g. "Monday, October 19, 2026 at 1:00 PM"
    let timestamp = snapshot
        .generated
        .with_timezone(&options.offset)
        .format("%A, %B %-d, %Y at %-I:%M %p");

    format!(
        "# {}\n\n{}\n\n**Last Updated**: {} {}\n\n",
        options.title, options.description, timestamp, options.timezone_label
    )
}

fn profile_link(username: &str) -> String {
    format!("[@{}](https://github.com/{})", username, username)
}

fn rank_label(index: usize) -> String {
    match MEDALS.get(index) {
        Some(medal) => format!("{} {}", medal, index + 1),
        None => (index + 1).to_string(),
    }
}

/// Table rows for a window; contributors with no PRs in it render as dashes
fn standing_rows(standings: &[ContributorStanding], window: Window, top: usize, medals: bool) -> String {
    let mut rows = String::new();
    for (index, standing) in standings.iter().take(top).enumerate() {
        let totals = standing.totals(window);
        if totals.prs == 0 {
            rows.push_str(&format!("| {} | - | - | - |\n", index + 1));
            continue;
        }
        let rank = if medals {
            rank_label(index)
        } else {
            (index + 1).to_string()
        };
        rows.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            rank,
            profile_link(&standing.username),
            totals.points,
            totals.prs
        ));
    }
    rows
}

fn render_monthly(snapshot: &LeaderboardSnapshot, options: &ReportOptions) -> String {
    let mut md = format!("## Monthly Leaderboard ({})\n\n", snapshot.month);
    md.push_str("| Rank | Contributor | Points | PRs |\n");
    md.push_str("|------|-------------|--------|-----|\n");
    md.push_str(&standing_rows(
        &snapshot.contributors,
        Window::CurrentPeriod,
        options.top,
        true,
    ));
    md
}

fn ordinal(n: usize) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}

fn render_prizes(options: &ReportOptions) -> String {
    let prizes = &options.prizes;
    if prizes.places.is_empty() {
        return "\n".to_string();
    }

    let mut md = format!(
        "\n**Prize Pool Distribution ({}{})**\n",
        prizes.currency,
        prizes.total()
    );
    for (index, amount) in prizes.places.iter().enumerate() {
        let medal = MEDALS.get(index).copied().unwrap_or("🏅");
        md.push_str(&format!(
            "- {} {} place: {}{}\n",
            medal,
            ordinal(index + 1),
            prizes.currency,
            amount
        ));
    }
    md.push('\n');
    md
}

fn render_all_time(snapshot: &LeaderboardSnapshot, options: &ReportOptions) -> String {
    let mut md = String::from("## All-Time Leaderboard\n\n");
    md.push_str("| Rank | Contributor | Total Points | Total PRs |\n");
    md.push_str("|------|-------------|--------------|-----------|\n");
    md.push_str(&standing_rows(
        &snapshot.all_time,
        Window::AllTime,
        options.top,
        false,
    ));
    md
}

fn render_recent_activity(snapshot: &LeaderboardSnapshot, options: &ReportOptions) -> String {
    let mut md = String::from("\n## Recent Activity\n\n");
    md.push_str(&format!(
        "Last {} merged PRs:\n\n",
        crate::aggregate::RECENT_ACTIVITY_LIMIT
    ));
    md.push_str("| Date | Contributor | Repository | Title | Points |\n");
    md.push_str("|------|-------------|------------|-------|--------|\n");

    for pr in &snapshot.recent_activity {
        let c = &pr.contribution;
        let date = c.merged_at.with_timezone(&options.offset).format("%b %-d");
        let title = truncate(&c.title, MAX_TITLE_CHARS).replace('|', "\\|");
        let url = if c.url.is_empty() {
            format!("https://github.com/{}/pull/{}", c.repo, c.id)
        } else {
            c.url.clone()
        };
        md.push_str(&format!(
            "| {} | {} | [{}](https://github.com/{}) | [{}]({}) | {} |\n",
            date,
            profile_link(&c.author),
            c.repo_name(),
            c.repo,
            title,
            url,
            pr.points
        ));
    }

    if snapshot.recent_activity.is_empty() {
        md.push_str("| - | - | - | - | - |\n");
    }
    md
}

fn render_point_system(options: &ReportOptions) -> String {
    let points_file = options.points_file.display().to_string().replace('\\', "/");
    format!(
        r#"
## Point System

Points are calculated using:
- **Label-based scoring**: Different contribution types earn different base points
- **Size multipliers**: Larger contributions get bonus multipliers
- **Manual overrides**: Team can assign custom points for exceptional work

See [`{0}`](./{0}) for full point values.

"#,
        points_file
    )
}

fn render_repos(snapshot: &LeaderboardSnapshot) -> String {
    let mut md = String::from("## Tracked Repositories\n\n");
    for repo in &snapshot.repos {
        md.push_str(&format!("- [{}](https://github.com/{})\n", repo, repo));
    }
    md
}

fn render_rules() -> String {
    r#"
## Leaderboard Rules

- Only whitelisted builders circle members are tracked
- Only merged PRs count toward points
- Points calculated from labels, PR size, and manual overrides
- Monthly leaderboard resets on the 1st of each month
- All-time stats persist across months

"#
    .to_string()
}

fn render_footer() -> String {
    "---\n\n*This leaderboard is automatically generated by GitHub Actions. Manual edits will be overwritten.*\n"
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::{test_options, test_snapshot};

    #[test]
    fn test_markdown_header_uses_offset() {
        let md = render(&test_snapshot(), &test_options()).unwrap();
        assert!(md.starts_with("# Contributor Leaderboard\n"));
        // 12:00 UTC is 1:00 PM at +01:00
        assert!(md.contains("**Last Updated**: Monday, October 19, 2026 at 1:00 PM WAT"));
        assert!(md.contains("## Monthly Leaderboard (October 2026)"));
    }

    #[test]
    fn test_monthly_table_medals_and_dashes() {
        let md = render(&test_snapshot(), &test_options()).unwrap();
        assert!(md.contains("| 🥇 1 | [@alice](https://github.com/alice) | 9 | 2 |"));
        // bob has no PRs this month
        assert!(md.contains("| 2 | - | - | - |"));
    }

    #[test]
    fn test_all_time_table() {
        let md = render(&test_snapshot(), &test_options()).unwrap();
        assert!(md.contains("| 1 | [@bob](https://github.com/bob) | 20 | 1 |"));
        assert!(md.contains("| 2 | [@alice](https://github.com/alice) | 9 | 2 |"));
    }

    #[test]
    fn test_prize_pool() {
        let md = render(&test_snapshot(), &test_options()).unwrap();
        assert!(md.contains("**Prize Pool Distribution ($150)**"));
        assert!(md.contains("- 🥇 1st place: $75"));
        assert!(md.contains("- 🥈 2nd place: $50"));
        assert!(md.contains("- 🥉 3rd place: $25"));
    }

    #[test]
    fn test_recent_activity_rows() {
        let md = render(&test_snapshot(), &test_options()).unwrap();
        let long_row = "| Oct 5 | [@alice](https://github.com/alice) | [widgets](https://github.com/acme/widgets) | [Add a configurable retry policy to the webhook ...](https://github.com/acme/widgets/pull/12) | 6 |";
        assert!(md.contains(long_row));
        assert!(md.contains("[Fix typo](https://github.com/acme/widgets/pull/3) | 3 |"));
        // Newest first
        assert!(md.find("Oct 5").unwrap() < md.find("Oct 2").unwrap());
    }

    #[test]
    fn test_empty_recent_activity_placeholder() {
        let mut snapshot = test_snapshot();
        snapshot.recent_activity.clear();
        let md = render(&snapshot, &test_options()).unwrap();
        assert!(md.contains("| - | - | - | - | - |"));
    }

    #[test]
    fn test_static_sections() {
        let md = render(&test_snapshot(), &test_options()).unwrap();
        assert!(md.contains("## Point System"));
        assert!(md.contains("See [`config/points.json`](./config/points.json)"));
        assert!(md.contains("- [acme/widgets](https://github.com/acme/widgets)"));
        assert!(md.contains("## Leaderboard Rules"));
        assert!(md.ends_with("Manual edits will be overwritten.*\n"));
    }

    #[test]
    fn test_top_limits_rows() {
        let mut options = test_options();
        options.top = 1;
        let md = render(&test_snapshot(), &options).unwrap();
        assert!(!md.contains("| 2 | - | - | - |"));
    }

    #[test]
    fn test_ordinal() {
        assert_eq!(ordinal(1), "1st");
        assert_eq!(ordinal(4), "4th");
        assert_eq!(ordinal(12), "12th");
        assert_eq!(ordinal(22), "22nd");
    }
}
