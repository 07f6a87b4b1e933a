//! Points policy
//!
//! Loaded from `config/points.json`:
//!
//! ```json
//! {
//!   "labelPoints": { "bug": 3, "feature": 5 },
//!   "multipliers": {
//!     "filesChanged": { "4-10": 1.2, "11-20": 1.5, "21+": 2.0 },
//!     "linesChanged": { "51-200": 1.2, "201-500": 1.5, "501+": 2.0 }
//!   },
//!   "manualOverrides": { "42": 100, "owner/repo#7": 12 }
//! }
//! ```
//!
//! Bucket keys are `"min-max"` (inclusive) or `"min+"` (open-ended). A list of
//! `{ "min": 4, "max": 10, "multiplier": 1.2 }` objects is accepted as well.

use super::{read_config_file, ConfigError, ConfigResult};
use crate::models::Contribution;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

/// Base points for a contribution with no recognized label
pub const DEFAULT_BASE_POINTS: u32 = 2;

/// One step of a size multiplier function
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MultiplierBucket {
    /// Inclusive lower bound
    pub min: u32,
    /// Inclusive upper bound (None = unbounded)
    #[serde(default)]
    pub max: Option<u32>,
    pub multiplier: f64,
}

impl MultiplierBucket {
    pub fn new(min: u32, max: Option<u32>, multiplier: f64) -> Self {
        Self {
            min,
            max,
            multiplier,
        }
    }

    pub fn contains(&self, count: u32) -> bool {
        count >= self.min && self.max.map_or(true, |max| count <= max)
    }
}

/// Step function from a size count to a multiplier.
///
/// Buckets are kept sorted by ascending lower bound.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct MultiplierSteps {
    buckets: Vec<MultiplierBucket>,
}

impl MultiplierSteps {
    pub fn new(mut buckets: Vec<MultiplierBucket>) -> Self {
        buckets.sort_by_key(|b| b.min);
        Self { buckets }
    }

    pub fn buckets(&self) -> &[MultiplierBucket] {
        &self.buckets
    }

    /// Multiplier of the highest-threshold bucket that contains `count`
    pub fn lookup(&self, count: u32) -> Option<f64> {
        self.buckets
            .iter()
            .rev()
            .find(|b| b.contains(count))
            .map(|b| b.multiplier)
    }

    /// Files changed: 4-10 → 1.2, 11-20 → 1.5, 21+ → 2.0
    pub fn default_files() -> Self {
        Self::new(vec![
            MultiplierBucket::new(4, Some(10), 1.2),
            MultiplierBucket::new(11, Some(20), 1.5),
            MultiplierBucket::new(21, None, 2.0),
        ])
    }

    /// Lines changed: 51-200 → 1.2, 201-500 → 1.5, 501+ → 2.0
    pub fn default_lines() -> Self {
        Self::new(vec![
            MultiplierBucket::new(51, Some(200), 1.2),
            MultiplierBucket::new(201, Some(500), 1.5),
            MultiplierBucket::new(501, None, 2.0),
        ])
    }
}

/// Parse a bucket key such as `"4-10"`, `"21+"` or `"7"`
pub fn parse_bucket_key(key: &str) -> Option<(u32, Option<u32>)> {
    let key = key.trim();
    if let Some(min) = key.strip_suffix('+') {
        return min.trim().parse().ok().map(|min| (min, None));
    }
    if let Some((min, max)) = key.split_once('-') {
        let min: u32 = min.trim().parse().ok()?;
        let max: u32 = max.trim().parse().ok()?;
        return (min <= max).then_some((min, Some(max)));
    }
    key.parse().ok().map(|n| (n, Some(n)))
}

/// On-disk shapes accepted for a multiplier step function
#[derive(Deserialize)]
#[serde(untagged)]
enum RawSteps {
    List(Vec<MultiplierBucket>),
    Keyed(HashMap<String, serde_json::Value>),
}

impl From<RawSteps> for MultiplierSteps {
    fn from(raw: RawSteps) -> Self {
        let buckets = match raw {
            RawSteps::List(list) => list
                .into_iter()
                .filter(|b| {
                    let valid = b.multiplier.is_finite() && b.max.map_or(true, |max| b.min <= max);
                    if !valid {
                        warn!("Ignoring malformed multiplier bucket {:?}", b);
                    }
                    valid
                })
                .collect(),
            RawSteps::Keyed(map) => map
                .into_iter()
                .filter_map(|(key, value)| {
                    let bounds = parse_bucket_key(&key);
                    let multiplier = value.as_f64().filter(|m| m.is_finite());
                    match (bounds, multiplier) {
                        (Some((min, max)), Some(multiplier)) => {
                            Some(MultiplierBucket::new(min, max, multiplier))
                        }
                        _ => {
                            warn!("Ignoring malformed multiplier bucket '{}': {}", key, value);
                            None
                        }
                    }
                })
                .collect(),
        };
        MultiplierSteps::new(buckets)
    }
}

impl<'de> Deserialize<'de> for MultiplierSteps {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        RawSteps::deserialize(deserializer).map(Into::into)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMultipliers {
    #[serde(default = "MultiplierSteps::default_files")]
    files_changed: MultiplierSteps,
    #[serde(default = "MultiplierSteps::default_lines")]
    lines_changed: MultiplierSteps,
}

impl Default for RawMultipliers {
    fn default() -> Self {
        Self {
            files_changed: MultiplierSteps::default_files(),
            lines_changed: MultiplierSteps::default_lines(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PointsFile {
    #[serde(default)]
    label_points: HashMap<String, serde_json::Value>,
    #[serde(default)]
    multipliers: RawMultipliers,
    #[serde(default)]
    manual_overrides: HashMap<String, serde_json::Value>,
}

/// Keep entries with a non-negative point value; fractional values are
/// rounded half up, anything else is logged and dropped
fn lenient_points(section: &str, raw: HashMap<String, serde_json::Value>) -> HashMap<String, u32> {
    raw.into_iter()
        .filter_map(|(key, value)| {
            let points = value
                .as_u64()
                .and_then(|p| u32::try_from(p).ok())
                .or_else(|| {
                    value
                        .as_f64()
                        .filter(|p| p.is_finite() && *p >= 0.0 && *p <= f64::from(u32::MAX))
                        .map(|p| (p + 0.5).floor() as u32)
                });
            if points.is_none() {
                warn!("Ignoring malformed {} entry '{}': {}", section, key, value);
            }
            points.map(|p| (key, p))
        })
        .collect()
}

/// Point-award rules. Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct PointsPolicy {
    label_points: HashMap<String, u32>,
    files_changed: MultiplierSteps,
    lines_changed: MultiplierSteps,
    manual_overrides: HashMap<String, u32>,
}

impl Default for PointsPolicy {
    fn default() -> Self {
        Self::new(
            HashMap::new(),
            MultiplierSteps::default_files(),
            MultiplierSteps::default_lines(),
            HashMap::new(),
        )
    }
}

impl From<PointsFile> for PointsPolicy {
    fn from(file: PointsFile) -> Self {
        Self::new(
            lenient_points("labelPoints", file.label_points),
            file.multipliers.files_changed,
            file.multipliers.lines_changed,
            lenient_points("manualOverrides", file.manual_overrides),
        )
    }
}

impl PointsPolicy {
    /// Build a policy; label names and qualified override keys are lowercased
    pub fn new(
        label_points: HashMap<String, u32>,
        files_changed: MultiplierSteps,
        lines_changed: MultiplierSteps,
        manual_overrides: HashMap<String, u32>,
    ) -> Self {
        let label_points = label_points
            .into_iter()
            .map(|(label, points)| (label.trim().to_lowercase(), points))
            .collect();
        let manual_overrides = manual_overrides
            .into_iter()
            .map(|(key, points)| (key.trim().to_lowercase(), points))
            .collect();
        Self {
            label_points,
            files_changed,
            lines_changed,
            manual_overrides,
        }
    }

    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str::<PointsFile>(content).map(Into::into)
    }

    pub fn with_label(mut self, label: &str, points: u32) -> Self {
        self.label_points.insert(label.trim().to_lowercase(), points);
        self
    }

    pub fn with_override(mut self, key: &str, points: u32) -> Self {
        self.manual_overrides
            .insert(key.trim().to_lowercase(), points);
        self
    }

    /// Points for a label (case-insensitive)
    pub fn label_points(&self, label: &str) -> Option<u32> {
        self.label_points.get(&label.to_lowercase()).copied()
    }

    /// All labels, sorted by points descending then name
    pub fn labels(&self) -> Vec<(&str, u32)> {
        let mut labels: Vec<(&str, u32)> = self
            .label_points
            .iter()
            .map(|(label, points)| (label.as_str(), *points))
            .collect();
        labels.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        labels
    }

    pub fn files_changed(&self) -> &MultiplierSteps {
        &self.files_changed
    }

    pub fn lines_changed(&self) -> &MultiplierSteps {
        &self.lines_changed
    }

    /// Manual override for a contribution.
    /// `owner/repo#id` takes precedence over the bare PR number.
    pub fn manual_override(&self, contribution: &Contribution) -> Option<u32> {
        let qualified = contribution.qualified_id().to_lowercase();
        self.manual_overrides
            .get(&qualified)
            .or_else(|| self.manual_overrides.get(&contribution.id.to_string()))
            .copied()
    }

    pub fn override_count(&self) -> usize {
        self.manual_overrides.len()
    }
}

/// Load the points policy from a JSON file
pub fn load_points_policy(path: &Path) -> ConfigResult<PointsPolicy> {
    let content = read_config_file(path)?;
    let policy = PointsPolicy::from_json(&content).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(
        "Loaded points policy from {} ({} labels, {} overrides)",
        path.display(),
        policy.label_points.len(),
        policy.override_count()
    );
    Ok(policy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bucket_key() {
        assert_eq!(parse_bucket_key("4-10"), Some((4, Some(10))));
        assert_eq!(parse_bucket_key(" 21+ "), Some((21, None)));
        assert_eq!(parse_bucket_key("7"), Some((7, Some(7))));
        assert_eq!(parse_bucket_key("10-4"), None);
        assert_eq!(parse_bucket_key("lots"), None);
        assert_eq!(parse_bucket_key("+"), None);
    }

    #[test]
    fn test_lookup_picks_single_highest_bucket() {
        let steps = MultiplierSteps::default_files();
        assert_eq!(steps.lookup(3), None);
        assert_eq!(steps.lookup(4), Some(1.2));
        assert_eq!(steps.lookup(10), Some(1.2));
        assert_eq!(steps.lookup(11), Some(1.5));
        assert_eq!(steps.lookup(20), Some(1.5));
        assert_eq!(steps.lookup(21), Some(2.0));
        assert_eq!(steps.lookup(10_000), Some(2.0));
    }

    #[test]
    fn test_missing_bucket_is_no_match() {
        let steps = MultiplierSteps::new(vec![
            MultiplierBucket::new(4, Some(10), 1.2),
            MultiplierBucket::new(11, Some(20), 1.5),
        ]);
        assert_eq!(steps.lookup(25), None);
    }

    #[test]
    fn test_policy_from_keyed_json() {
        let policy = PointsPolicy::from_json(
            r#"{
                "labelPoints": { "Bug": 3, "feature": 5 },
                "multipliers": {
                    "filesChanged": { "21+": 2.0, "4-10": 1.2, "11-20": 1.5 },
                    "linesChanged": { "51-200": 1.2, "weird": 9.0, "201-500": "x" }
                },
                "manualOverrides": { "42": 100, "Owner/Repo#7": 12 }
            }"#,
        )
        .unwrap();

        assert_eq!(policy.label_points("bug"), Some(3));
        assert_eq!(policy.label_points("FEATURE"), Some(5));
        let mins: Vec<u32> = policy.files_changed().buckets().iter().map(|b| b.min).collect();
        assert_eq!(mins, vec![4, 11, 21]);
        // Malformed entries are dropped, the rest survive
        assert_eq!(policy.lines_changed().buckets().len(), 1);
        assert_eq!(policy.override_count(), 2);
    }

    #[test]
    fn test_malformed_points_entries_are_dropped() {
        let policy = PointsPolicy::from_json(
            r#"{
                "labelPoints": { "bug": 3, "feature": "five", "docs": 2.5, "chore": -1 },
                "manualOverrides": { "42": 7.5, "7": "lots", "8": 12 }
            }"#,
        )
        .unwrap();

        // Good entries survive their bad neighbours
        assert_eq!(policy.label_points("bug"), Some(3));
        assert_eq!(policy.label_points("feature"), None);
        assert_eq!(policy.label_points("chore"), None);
        // Fractions round half up
        assert_eq!(policy.label_points("docs"), Some(3));
        assert_eq!(policy.override_count(), 2);
        assert_eq!(policy.labels(), vec![("bug", 3), ("docs", 3)]);
    }

    #[test]
    fn test_policy_from_list_json() {
        let policy = PointsPolicy::from_json(
            r#"{
                "multipliers": {
                    "filesChanged": [
                        { "min": 11, "max": 20, "multiplier": 1.5 },
                        { "min": 4, "max": 10, "multiplier": 1.2 }
                    ]
                }
            }"#,
        )
        .unwrap();
        assert_eq!(policy.files_changed().buckets()[0].min, 4);
        // Omitted axis falls back to defaults
        assert_eq!(policy.lines_changed(), &MultiplierSteps::default_lines());
    }

    #[test]
    fn test_empty_policy_uses_default_buckets() {
        let policy = PointsPolicy::from_json("{}").unwrap();
        assert_eq!(policy, PointsPolicy::default());
    }

    #[test]
    fn test_qualified_override_wins() {
        let policy = PointsPolicy::default()
            .with_override("42", 100)
            .with_override("acme/widgets#42", 7);
        let mut c = crate::models::Contribution {
            id: 42,
            author: "a".into(),
            labels: vec![],
            merged_at: chrono::Utc::now(),
            files_changed: 0,
            additions: 0,
            deletions: 0,
            repo: "Acme/Widgets".into(),
            title: String::new(),
            url: String::new(),
        };
        assert_eq!(policy.manual_override(&c), Some(7));
        c.repo = "acme/other".into();
        assert_eq!(policy.manual_override(&c), Some(100));
        c.id = 43;
        assert_eq!(policy.manual_override(&c), None);
    }

    #[test]
    fn test_load_points_policy_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("points.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = load_points_policy(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Json { .. }));
        assert!(err.to_string().contains("points.json"));

        let missing = load_points_policy(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(missing, ConfigError::Io { .. }));
    }
}
