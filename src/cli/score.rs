//! Score command - explain the points a single PR would earn

use super::Project;
use crate::models::{Contribution, ScoreMethod, ScoreResult};
use crate::scoring;
use anyhow::Result;
use chrono::Utc;
use console::style;
use std::path::Path;

#[derive(Debug)]
pub struct ScoreArgs {
    pub id: u64,
    pub repo: Option<String>,
    pub labels: Vec<String>,
    pub files: u32,
    pub additions: u32,
    pub deletions: u32,
    pub json: bool,
}

/// Run the score command
pub fn run(path: &Path, args: ScoreArgs) -> Result<()> {
    let project = Project::open(path)?;
    let policy = project.policy()?;

    let repo = args
        .repo
        .or_else(|| project.config.repos.first().cloned())
        .unwrap_or_default();
    let contribution = Contribution {
        id: args.id,
        author: String::new(),
        labels: args
            .labels
            .into_iter()
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .collect(),
        merged_at: Utc::now(),
        files_changed: args.files,
        additions: args.additions,
        deletions: args.deletions,
        repo,
        title: String::new(),
        url: String::new(),
    };

    let result = scoring::score(&contribution, &policy);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", render_breakdown(&result));
    }
    Ok(())
}

fn render_breakdown(result: &ScoreResult) -> String {
    let mut out = format!(
        "{} {} points ({})\n",
        style("●").cyan(),
        style(result.points).bold(),
        result.method
    );
    if result.method == ScoreMethod::Manual {
        out.push_str("  Manual override from the points policy\n");
        return out;
    }

    let labels = if result.labels.is_empty() {
        "none recognized".to_string()
    } else {
        result
            .labels
            .iter()
            .map(|l| format!("{}={}", l.label, l.points))
            .collect::<Vec<_>>()
            .join(", ")
    };
    out.push_str(&format!(
        "  Base points:  {} (labels: {})\n",
        result.base_points.unwrap_or_default(),
        labels
    ));
    out.push_str(&format!(
        "  Multiplier:   x{} (files: {}, lines: {})\n",
        result.multiplier.unwrap_or(1.0),
        result.files_changed.unwrap_or_default(),
        result.lines_changed.unwrap_or_default()
    ));
    out
}
