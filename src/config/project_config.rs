//! Project-level settings
//!
//! Loaded from `leaderboard.toml` in the project root. Every key is optional.
//!
//! ```toml
//! title = "Contributor Leaderboard"
//! repos = ["stellar-wa/stellar-oss-issues"]
//! members_file = "config/members.json"
//! points_file = "config/points.json"
//! output_file = "LEADERBOARD.md"
//! data_file = "leaderboard-data.json"
//! all_time_since = "2020-01-01T00:00:00Z"
//! utc_offset = "+01:00"
//! timezone_label = "WAT"
//!
//! [prizes]
//! currency = "$"
//! places = [75, 50, 25]
//! ```

use super::{read_config_file, ConfigError, ConfigResult};
use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const CONFIG_FILE_NAME: &str = "leaderboard.toml";

/// Leaderboard run settings
#[derive(Debug, Clone, Deserialize)]
pub struct LeaderboardConfig {
    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default = "default_description")]
    pub description: String,

    /// Tracked repositories in `owner/name` form
    #[serde(default = "default_repos")]
    pub repos: Vec<String>,

    #[serde(default = "default_members_file")]
    pub members_file: PathBuf,

    #[serde(default = "default_points_file")]
    pub points_file: PathBuf,

    #[serde(default = "default_output_file")]
    pub output_file: PathBuf,

    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    /// Lower bound of the all-time window
    #[serde(default = "default_all_time_since")]
    pub all_time_since: DateTime<Utc>,

    /// Offset used for month boundaries and displayed timestamps
    #[serde(default = "default_utc_offset")]
    pub utc_offset: String,

    #[serde(default = "default_timezone_label")]
    pub timezone_label: String,

    /// Fetch each PR individually to get file and line counts
    #[serde(default = "default_true")]
    pub fetch_details: bool,

    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Rows shown per leaderboard table
    #[serde(default = "default_top")]
    pub top: usize,

    #[serde(default)]
    pub prizes: PrizeConfig,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            description: default_description(),
            repos: default_repos(),
            members_file: default_members_file(),
            points_file: default_points_file(),
            output_file: default_output_file(),
            data_file: default_data_file(),
            all_time_since: default_all_time_since(),
            utc_offset: default_utc_offset(),
            timezone_label: default_timezone_label(),
            fetch_details: true,
            api_url: default_api_url(),
            top: default_top(),
            prizes: PrizeConfig::default(),
        }
    }
}

/// Monthly prize pool shown in the report (display only)
#[derive(Debug, Clone, Deserialize)]
pub struct PrizeConfig {
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Prize per place, first place first
    #[serde(default = "default_places")]
    pub places: Vec<u32>,
}

impl Default for PrizeConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            places: default_places(),
        }
    }
}

impl PrizeConfig {
    pub fn total(&self) -> u32 {
        self.places.iter().sum()
    }
}

fn default_title() -> String {
    "Contributor Leaderboard".to_string()
}
fn default_description() -> String {
    "Tracking contributions from builders circle members across the ecosystem.".to_string()
}
fn default_repos() -> Vec<String> {
    vec!["stellar-wa/stellar-oss-issues".to_string()]
}
fn default_members_file() -> PathBuf {
    PathBuf::from("config/members.json")
}
fn default_points_file() -> PathBuf {
    PathBuf::from("config/points.json")
}
fn default_output_file() -> PathBuf {
    PathBuf::from("LEADERBOARD.md")
}
fn default_data_file() -> PathBuf {
    PathBuf::from("leaderboard-data.json")
}
fn default_all_time_since() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_default()
}
fn default_utc_offset() -> String {
    "+01:00".to_string()
}
fn default_timezone_label() -> String {
    "WAT".to_string()
}
fn default_true() -> bool {
    true
}
fn default_api_url() -> String {
    "https://api.github.com".to_string()
}
fn default_top() -> usize {
    10
}
fn default_currency() -> String {
    "$".to_string()
}
fn default_places() -> Vec<u32> {
    vec![75, 50, 25]
}

impl LeaderboardConfig {
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        let mut config: LeaderboardConfig = toml::from_str(content)?;
        config.repos = normalize_repos(config.repos);
        Ok(config)
    }

    /// Parsed `utc_offset`
    pub fn offset(&self) -> ConfigResult<FixedOffset> {
        parse_utc_offset(&self.utc_offset)
    }

    /// Replace the tracked repositories (e.g. from `TRACKED_REPOS`)
    pub fn set_repos(&mut self, repos: Vec<String>) {
        self.repos = normalize_repos(repos);
    }

    pub fn members_path(&self, root: &Path) -> PathBuf {
        root.join(&self.members_file)
    }

    pub fn points_path(&self, root: &Path) -> PathBuf {
        root.join(&self.points_file)
    }

    pub fn output_path(&self, root: &Path) -> PathBuf {
        root.join(&self.output_file)
    }

    pub fn data_path(&self, root: &Path) -> PathBuf {
        root.join(&self.data_file)
    }
}

/// Trim entries and drop empty ones and duplicates
fn normalize_repos(repos: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for repo in repos {
        let repo = repo.trim();
        if !repo.is_empty() && !out.iter().any(|r| r.eq_ignore_ascii_case(repo)) {
            out.push(repo.to_string());
        }
    }
    out
}

/// Parse `+01:00`, `-0530`, `+1`, `Z` or `UTC`
pub fn parse_utc_offset(s: &str) -> ConfigResult<FixedOffset> {
    let invalid = || ConfigError::InvalidOffset(s.to_string());
    let trimmed = s.trim();
    if trimmed.eq_ignore_ascii_case("z") || trimmed.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0).ok_or_else(invalid);
    }

    let (sign, rest) = match trimmed.chars().next() {
        Some('+') => (1, &trimmed[1..]),
        Some('-') => (-1, &trimmed[1..]),
        _ => return Err(invalid()),
    };
    let (hours, minutes) = match rest.split_once(':') {
        Some((h, m)) => (h, m),
        None if rest.len() == 4 && rest.bytes().all(|b| b.is_ascii_digit()) => rest.split_at(2),
        None => (rest, "0"),
    };
    let hours: i32 = hours.parse().map_err(|_| invalid())?;
    let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
    if !(0..=14).contains(&hours) || !(0..60).contains(&minutes) {
        return Err(invalid());
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

/// Load settings from `leaderboard.toml` in `root`.
///
/// Returns defaults if the file is missing or unreadable.
pub fn load_project_config(root: &Path) -> LeaderboardConfig {
    let path = root.join(CONFIG_FILE_NAME);
    if !path.exists() {
        debug!("No {} found, using defaults", CONFIG_FILE_NAME);
        return LeaderboardConfig::default();
    }
    match load_toml_config(&path) {
        Ok(config) => {
            debug!("Loaded project config from {}", path.display());
            config
        }
        Err(e) => {
            warn!("{}; using defaults", e);
            LeaderboardConfig::default()
        }
    }
}

fn load_toml_config(path: &Path) -> ConfigResult<LeaderboardConfig> {
    let content = read_config_file(path)?;
    LeaderboardConfig::from_toml(&content).map_err(|source| ConfigError::Toml {
        path: path.to_path_buf(),
        source,
    })
}
