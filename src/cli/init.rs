//! Init command - write example configuration files

use crate::config::CONFIG_FILE_NAME;
use anyhow::{Context, Result};
use console::style;
use std::path::Path;

const EXAMPLE_CONFIG: &str = r#"# Contributor leaderboard configuration
# Every key is optional; these are the defaults.

title = "Contributor Leaderboard"
description = "Tracking contributions from builders circle members across the ecosystem."

# Repositories to track (owner/name). TRACKED_REPOS overrides this list.
repos = ["stellar-wa/stellar-oss-issues"]

members_file = "config/members.json"
points_file = "config/points.json"
output_file = "LEADERBOARD.md"
data_file = "leaderboard-data.json"

# Lower bound of the all-time leaderboard
all_time_since = "2020-01-01T00:00:00Z"

# Month boundaries and timestamps use this offset
utc_offset = "+01:00"
timezone_label = "WAT"

# Fetch each merged PR to get file and line counts (one extra request per PR)
fetch_details = true

# Rows per leaderboard table
top = 10

[prizes]
currency = "$"
places = [75, 50, 25]
"#;

const EXAMPLE_MEMBERS: &str = r#"{
  "members": [
    { "github": "octocat", "name": "The Octocat", "status": "active" },
    { "github": "hubot", "status": "inactive" },
    { "github": "monalisa", "status": "alumni" }
  ]
}
"#;

const EXAMPLE_POINTS: &str = r#"{
  "labelPoints": {
    "bug": 3,
    "feature": 5,
    "enhancement": 4,
    "documentation": 2,
    "good first issue": 2
  },
  "multipliers": {
    "filesChanged": { "4-10": 1.2, "11-20": 1.5, "21+": 2.0 },
    "linesChanged": { "51-200": 1.2, "201-500": 1.5, "501+": 2.0 }
  },
  "manualOverrides": {}
}
"#;

/// Run the init command
pub fn run(path: &Path) -> Result<()> {
    let root = path
        .canonicalize()
        .with_context(|| format!("Path does not exist: {}", path.display()))?;

    if !root.is_dir() {
        anyhow::bail!("Path is not a directory: {}", root.display());
    }

    println!("\n{} Initializing leaderboard\n", style("🏆").bold());

    let config_dir = root.join("config");
    std::fs::create_dir_all(&config_dir)
        .with_context(|| format!("Failed to create {}", config_dir.display()))?;

    write_example(&root, CONFIG_FILE_NAME, EXAMPLE_CONFIG)?;
    write_example(&root, "config/members.json", EXAMPLE_MEMBERS)?;
    write_example(&root, "config/points.json", EXAMPLE_POINTS)?;

    println!("\n{} Project initialized!", style("✨").bold());
    println!("\nNext steps:");
    println!("  {} Add your members", style("edit config/members.json").cyan());
    println!("  {} Check the point values", style("leaderboard score --label feature").cyan());
    println!("  {} Generate the leaderboard", style("leaderboard generate").cyan());

    Ok(())
}

/// Write `content` to `root/relative` unless the file already exists
fn write_example(root: &Path, relative: &str, content: &str) -> Result<()> {
    let path = root.join(relative);
    if path.exists() {
        println!(
            "{} Keeping existing {}",
            style("•").dim(),
            style(relative).cyan()
        );
        return Ok(());
    }
    std::fs::write(&path, content).with_context(|| format!("Failed to create {}", path.display()))?;
    println!("{} Created {}", style("✓").green(), style(relative).cyan());
    Ok(())
}
