//! JSON reporter
//!
//! Outputs the full snapshot as pretty-printed JSON. This is also the format
//! of the persisted data file.

use crate::models::LeaderboardSnapshot;
use anyhow::Result;

/// Render snapshot as JSON
pub fn render(snapshot: &LeaderboardSnapshot) -> Result<String> {
    Ok(serde_json::to_string_pretty(snapshot)?)
}

/// Render snapshot as compact JSON (single line)
pub fn render_compact(snapshot: &LeaderboardSnapshot) -> Result<String> {
    Ok(serde_json::to_string(snapshot)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::test_snapshot;

    #[test]
    fn test_json_render_keys() {
        let json_str = render(&test_snapshot()).expect("render JSON");
        let parsed: serde_json::Value = serde_json::from_str(&json_str).expect("parse JSON");
        assert_eq!(parsed["month"], "October 2026");
        assert_eq!(parsed["generated"], "2026-10-19T12:00:00Z");
        assert_eq!(parsed["contributors"][0]["username"], "alice");
        assert_eq!(parsed["contributors"][0]["currentPeriod"]["points"], 9);
        assert_eq!(parsed["allTime"][0]["username"], "bob");
        assert_eq!(parsed["recentActivity"][0]["id"], 12);
        assert_eq!(parsed["recentActivity"][0]["pointsDetail"]["method"], "manual");
        assert_eq!(parsed["stats"]["reposProcessed"], 1);
    }

    #[test]
    fn test_json_render_compact() {
        let json_str = render_compact(&test_snapshot()).expect("render compact JSON");
        assert!(!json_str.contains('\n'));
        let back: LeaderboardSnapshot = serde_json::from_str(&json_str).expect("parse compact JSON");
        assert_eq!(back, test_snapshot());
    }
}
