//! Configuration module for the leaderboard
//!
//! This module handles:
//! - Project-level settings (`leaderboard.toml`)
//! - The participant roster (`config/members.json`)
//! - The points policy (`config/points.json`)

mod members;
mod points;
mod project_config;

pub use members::{load_members, Roster};
pub use points::{
    load_points_policy, parse_bucket_key, MultiplierBucket, MultiplierSteps, PointsPolicy,
    DEFAULT_BASE_POINTS,
};
pub use project_config::{
    load_project_config, parse_utc_offset, LeaderboardConfig, PrizeConfig, CONFIG_FILE_NAME,
};

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading configuration files
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid TOML in {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid UTC offset '{0}' (expected e.g. +01:00)")]
    InvalidOffset(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Read a file to a string, tagging errors with the path
fn read_config_file(path: &std::path::Path) -> ConfigResult<String> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}
