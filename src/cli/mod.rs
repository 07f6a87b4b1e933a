//! CLI command definitions and handlers

mod generate;
mod init;
mod members;
mod score;

use crate::config::{
    load_members, load_points_policy, load_project_config, LeaderboardConfig, PointsPolicy, Roster,
};
use crate::reporters::OutputFormat;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Parse an RFC 3339 timestamp for `--as-of`
fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| format!("'{}' is not an RFC 3339 timestamp: {}", s, e))
}

/// Contributor leaderboard - monthly and all-time rankings from merged PRs
#[derive(Parser, Debug)]
#[command(name = "leaderboard")]
#[command(
    version,
    about = "Monthly and all-time contributor leaderboard built from merged pull requests",
    long_about = "Scores merged pull requests by whitelisted members across the tracked \
repositories, then ranks contributors for the current month and for all time.\n\n\
Run without a subcommand to generate the leaderboard for the current directory:\n  \
leaderboard .",
    after_help = "\
Examples:
  leaderboard init                              Write example config files
  leaderboard                                   Generate LEADERBOARD.md and leaderboard-data.json
  leaderboard generate --stdout --format text   Print a terminal summary instead
  leaderboard generate --source-file prs.json   Replay a saved dump (no network)
  leaderboard score --label feature --files 15 --additions 60 --deletions 20
  leaderboard members                           List tracked members"
)]
pub struct Cli {
    /// Path to the project (default: current directory)
    #[arg(global = true, default_value = ".")]
    pub path: PathBuf,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write example leaderboard.toml, config/members.json and config/points.json
    Init,

    /// Fetch merged PRs, score them and write the leaderboard (default)
    #[command(after_help = "\
Examples:
  leaderboard generate                                  Write LEADERBOARD.md and leaderboard-data.json
  leaderboard generate --repos acme/widgets,acme/gadgets
  leaderboard generate --stdout --format json           Print the snapshot
  leaderboard generate --source-file prs.json --as-of 2026-10-19T12:00:00Z")]
    Generate {
        /// Replay contributions from a JSON file instead of calling GitHub
        #[arg(long)]
        source_file: Option<PathBuf>,

        /// Treat this RFC 3339 instant as "now"
        #[arg(long, value_parser = parse_timestamp)]
        as_of: Option<DateTime<Utc>>,

        /// Report format: markdown (or md), json, text
        #[arg(long, short = 'f', default_value = "markdown", value_parser = ["markdown", "md", "json", "text"])]
        format: String,

        /// Print the report instead of writing files
        #[arg(long)]
        stdout: bool,

        /// Tracked repositories (owner/name, comma-separated)
        #[arg(long, env = "TRACKED_REPOS", value_delimiter = ',')]
        repos: Vec<String>,

        /// GitHub token
        #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
        token: Option<String>,

        /// Skip per-PR requests for file and line counts
        #[arg(long)]
        no_details: bool,
    },

    /// Score a single contribution against the points policy
    #[command(after_help = "\
Examples:
  leaderboard score --label feature --files 15 --additions 60 --deletions 20
  leaderboard score --id 42 --repo acme/widgets --json")]
    Score {
        /// PR number (used for manual overrides)
        #[arg(long, default_value = "0")]
        id: u64,

        /// Repository (owner/name, used for qualified overrides)
        #[arg(long)]
        repo: Option<String>,

        /// Labels on the PR (repeatable or comma-separated)
        #[arg(long, short = 'l', value_delimiter = ',')]
        label: Vec<String>,

        /// Files changed
        #[arg(long, default_value = "0")]
        files: u32,

        /// Lines added
        #[arg(long, default_value = "0")]
        additions: u32,

        /// Lines deleted
        #[arg(long, default_value = "0")]
        deletions: u32,

        /// Print the breakdown as JSON
        #[arg(long)]
        json: bool,
    },

    /// List configured members and whether they are tracked
    Members,

    /// Show version
    Version,
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Init) => init::run(&cli.path),

        Some(Commands::Generate {
            source_file,
            as_of,
            format,
            stdout,
            repos,
            token,
            no_details,
        }) => generate::run(
            &cli.path,
            generate::GenerateOptions {
                source_file,
                as_of,
                format: OutputFormat::from_str(&format)?,
                stdout,
                repos,
                token,
                no_details,
            },
        ),

        Some(Commands::Score {
            id,
            repo,
            label,
            files,
            additions,
            deletions,
            json,
        }) => score::run(
            &cli.path,
            score::ScoreArgs {
                id,
                repo,
                labels: label,
                files,
                additions,
                deletions,
                json,
            },
        ),

        Some(Commands::Members) => members::run(&cli.path),

        Some(Commands::Version) => {
            println!("leaderboard {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }

        None => generate::run(
            &cli.path,
            generate::GenerateOptions {
                repos: std::env::var("TRACKED_REPOS")
                    .map(|v| v.split(',').map(str::to_string).collect())
                    .unwrap_or_default(),
                token: std::env::var("GITHUB_TOKEN").ok(),
                ..Default::default()
            },
        ),
    }
}

/// Project root plus its settings
struct Project {
    root: PathBuf,
    config: LeaderboardConfig,
}

impl Project {
    fn open(path: &Path) -> Result<Self> {
        let root = path
            .canonicalize()
            .with_context(|| format!("Path does not exist: {}", path.display()))?;
        if !root.is_dir() {
            anyhow::bail!("Path is not a directory: {}", root.display());
        }
        let config = load_project_config(&root);
        Ok(Self { root, config })
    }

    fn roster(&self) -> Result<Roster> {
        let path = self.config.members_path(&self.root);
        load_members(&path).with_context(|| {
            format!(
                "Failed to load members from {} (run `leaderboard init` to create one)",
                path.display()
            )
        })
    }

    fn policy(&self) -> Result<PointsPolicy> {
        let path = self.config.points_path(&self.root);
        load_points_policy(&path).with_context(|| {
            format!(
                "Failed to load points policy from {} (run `leaderboard init` to create one)",
                path.display()
            )
        })
    }
}
