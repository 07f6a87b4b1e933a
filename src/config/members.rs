//! Participant roster
//!
//! Loaded from `config/members.json`:
//!
//! ```json
//! { "members": [ { "github": "alice" }, { "github": "bob", "status": "alumni" } ] }
//! ```

use super::{read_config_file, ConfigError, ConfigResult};
use crate::models::Participant;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct MembersFile {
    #[serde(default)]
    members: Vec<Participant>,
}

/// The configured participants and the derived whitelist
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    participants: Vec<Participant>,
    /// Lowercased handles of eligible participants, in config order
    whitelist: Vec<String>,
}

impl Roster {
    pub fn new(participants: Vec<Participant>) -> Self {
        let mut whitelist: Vec<String> = Vec::new();
        for p in participants.iter().filter(|p| p.is_eligible()) {
            let handle = p.github.trim().to_lowercase();
            if !handle.is_empty() && !whitelist.contains(&handle) {
                whitelist.push(handle);
            }
        }
        Self {
            participants,
            whitelist,
        }
    }

    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str::<MembersFile>(content).map(|f| Self::new(f.members))
    }

    /// Case-insensitive whitelist check
    pub fn is_eligible(&self, handle: &str) -> bool {
        let handle = handle.trim().to_lowercase();
        self.whitelist.iter().any(|h| *h == handle)
    }

    pub fn whitelist(&self) -> &[String] {
        &self.whitelist
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn eligible(&self) -> impl Iterator<Item = &Participant> {
        self.participants.iter().filter(|p| p.is_eligible())
    }
}

/// Load the roster from a JSON file
pub fn load_members(path: &Path) -> ConfigResult<Roster> {
    let content = read_config_file(path)?;
    let roster = Roster::from_json(&content).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(
        "Loaded {} members ({} eligible) from {}",
        roster.participants.len(),
        roster.whitelist.len(),
        path.display()
    );
    Ok(roster)
}
