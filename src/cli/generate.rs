//! Generate command - build the leaderboard and write the report files

use super::Project;
use crate::github::{ContributionSource, FileSource, GithubClient};
use crate::pipeline::{self, RunSettings};
use crate::reporters::{self, OutputFormat, ReportOptions};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug)]
pub struct GenerateOptions {
    pub source_file: Option<PathBuf>,
    pub as_of: Option<DateTime<Utc>>,
    pub format: OutputFormat,
    pub stdout: bool,
    /// Overrides the configured repositories when non-empty
    pub repos: Vec<String>,
    pub token: Option<String>,
    pub no_details: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            source_file: None,
            as_of: None,
            format: OutputFormat::Markdown,
            stdout: false,
            repos: Vec::new(),
            token: None,
            no_details: false,
        }
    }
}

/// Create spinner progress style
fn create_spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
        .template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

/// Run the generate command
pub fn run(path: &Path, opts: GenerateOptions) -> Result<()> {
    let mut project = Project::open(path)?;
    if opts.repos.iter().any(|r| !r.trim().is_empty()) {
        project.config.set_repos(opts.repos.clone());
    }

    let roster = project.roster()?;
    let policy = project.policy()?;
    let settings = RunSettings::from_config(&project.config)
        .context("Invalid utc_offset in leaderboard.toml")?;
    let report_options = ReportOptions::from_config(&project.config)
        .context("Invalid utc_offset in leaderboard.toml")?;

    let source: Box<dyn ContributionSource> = match &opts.source_file {
        Some(file) => {
            let source = FileSource::load(file)
                .with_context(|| format!("Failed to load contributions from {}", file.display()))?;
            info!("Replaying {} contributions from {}", source.len(), file.display());
            Box::new(source)
        }
        None => {
            let client = GithubClient::new(&project.config.api_url, opts.token.clone())
                .with_fetch_details(project.config.fetch_details && !opts.no_details);
            if !client.has_token() {
                warn!("GITHUB_TOKEN is not set; unauthenticated requests are heavily rate limited");
            }
            Box::new(client)
        }
    };

    let now = opts.as_of.unwrap_or_else(Utc::now);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(create_spinner_style());
    spinner.enable_steady_tick(Duration::from_millis(100));
    let snapshot = pipeline::generate(
        source.as_ref(),
        &settings,
        &roster,
        &policy,
        now,
        &spinner,
    );
    spinner.finish_and_clear();

    if !snapshot.stats.repos_failed.is_empty() {
        warn!(
            "{} of {} repositories failed: {}",
            snapshot.stats.repos_failed.len(),
            settings.repos.len(),
            snapshot.stats.repos_failed.join(", ")
        );
    }

    let rendered = reporters::report_with_format(&snapshot, opts.format, &report_options)?;
    if opts.stdout {
        print!("{}", rendered);
        return Ok(());
    }

    let mut output_path = project.config.output_path(&project.root);
    if opts.format != OutputFormat::Markdown {
        output_path.set_extension(reporters::file_extension(opts.format));
    }
    write_file(&output_path, &rendered)?;

    let data_path = project.config.data_path(&project.root);
    let data = reporters::report_with_format(&snapshot, OutputFormat::Json, &report_options)?;
    write_file(&data_path, &data)?;

    println!(
        "{} Leaderboard generated at {}",
        style("✓").green(),
        style(output_path.display()).cyan()
    );
    println!(
        "{} Data saved to {}",
        style("✓").green(),
        style(data_path.display()).cyan()
    );
    println!(
        "  Total contributors this month: {}",
        style(snapshot.active_this_period()).bold()
    );

    Ok(())
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}
