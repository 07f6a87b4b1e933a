//! Points calculator

use crate::config::{PointsPolicy, DEFAULT_BASE_POINTS};
use crate::models::{Contribution, LabelMatch, ScoreMethod, ScoreResult};

/// Score a single contribution against the policy.
///
/// Pure and total: unknown labels and missing buckets are treated as no match.
pub fn score(contribution: &Contribution, policy: &PointsPolicy) -> ScoreResult {
    if let Some(points) = policy.manual_override(contribution) {
        return ScoreResult::manual(points);
    }

    let labels: Vec<LabelMatch> = contribution
        .labels
        .iter()
        .filter_map(|label| {
            let label = label.to_lowercase();
            policy
                .label_points(&label)
                .map(|points| LabelMatch { label, points })
        })
        .collect();

    let base_points = labels
        .iter()
        .map(|l| l.points)
        .max()
        .unwrap_or(DEFAULT_BASE_POINTS);

    let files_changed = contribution.files_changed;
    let lines_changed = contribution.lines_changed();
    let multiplier = size_multiplier(policy, files_changed, lines_changed);

    ScoreResult {
        points: round_half_up(f64::from(base_points) * multiplier),
        method: ScoreMethod::Calculated,
        base_points: Some(base_points),
        multiplier: Some(multiplier),
        labels,
        files_changed: Some(files_changed),
        lines_changed: Some(lines_changed),
    }
}

/// max(1.0, files bucket, lines bucket)
pub fn size_multiplier(policy: &PointsPolicy, files_changed: u32, lines_changed: u32) -> f64 {
    [
        policy.files_changed().lookup(files_changed),
        policy.lines_changed().lookup(lines_changed),
    ]
    .into_iter()
    .flatten()
    .fold(1.0, f64::max)
}

fn round_half_up(value: f64) -> u32 {
    let rounded = (value + 0.5).floor();
    rounded.clamp(0.0, f64::from(u32::MAX)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MultiplierBucket, MultiplierSteps};
    use std::collections::HashMap;

    fn policy() -> PointsPolicy {
        PointsPolicy::default()
            .with_label("bug", 3)
            .with_label("feature", 5)
    }

    fn pr(id: u64, labels: &[&str], files: u32, additions: u32, deletions: u32) -> Contribution {
        Contribution {
            id,
            author: "alice".into(),
            labels: labels.iter().map(|l| l.to_string()).collect(),
            merged_at: "2026-10-10T10:00:00Z".parse().unwrap(),
            files_changed: files,
            additions,
            deletions,
            repo: "acme/widgets".into(),
            title: "Some change".into(),
            url: String::new(),
        }
    }

    #[test]
    fn test_feature_with_size_bonus() {
        let result = score(&pr(1, &["feature"], 15, 60, 20), &policy());
        assert_eq!(result.method, ScoreMethod::Calculated);
        assert_eq!(result.base_points, Some(5));
        assert_eq!(result.multiplier, Some(1.5));
        assert_eq!(result.points, 8);
        assert_eq!(result.files_changed, Some(15));
        assert_eq!(result.lines_changed, Some(80));
        assert_eq!(
            result.labels,
            vec![LabelMatch {
                label: "feature".into(),
                points: 5
            }]
        );
    }

    #[test]
    fn test_manual_override_wins() {
        let policy = policy().with_override("42", 100);
        let result = score(&pr(42, &["bug"], 30, 900, 0), &policy);
        assert_eq!(result, ScoreResult::manual(100));
    }

    #[test]
    fn test_zero_override_is_still_an_override() {
        let policy = policy().with_override("9", 0);
        let result = score(&pr(9, &["feature"], 1, 1, 1), &policy);
        assert_eq!(result.points, 0);
        assert_eq!(result.method, ScoreMethod::Manual);
    }

    #[test]
    fn test_unlabeled_gets_default_base() {
        let result = score(&pr(2, &["question", "wontfix"], 1, 10, 0), &policy());
        assert_eq!(result.base_points, Some(DEFAULT_BASE_POINTS));
        assert_eq!(result.points, 2);
        assert!(result.labels.is_empty());
    }

    #[test]
    fn test_base_is_max_of_matched_labels() {
        let result = score(&pr(3, &["BUG", "Feature"], 0, 0, 0), &policy());
        assert_eq!(result.base_points, Some(5));
        assert_eq!(result.labels.len(), 2);
        assert_eq!(result.labels[0].label, "bug");
    }

    #[test]
    fn test_rounding_is_half_up() {
        // 2 × 1.5 = 3.0
        let result = score(&pr(4, &[], 11, 0, 0), &policy());
        assert_eq!(result.points, 3);

        // 3 × 1.25 = 3.75 → 4
        let custom = PointsPolicy::new(
            HashMap::from([("bug".to_string(), 3)]),
            MultiplierSteps::new(vec![MultiplierBucket::new(4, None, 1.25)]),
            MultiplierSteps::default(),
            HashMap::new(),
        );
        assert_eq!(score(&pr(5, &["bug"], 4, 0, 0), &custom).points, 4);

        // 5 × 1.5 = 7.5 → 8, 3 × 1.5 = 4.5 → 5
        assert_eq!(score(&pr(6, &["feature"], 12, 0, 0), &policy()).points, 8);
        assert_eq!(score(&pr(7, &["bug"], 12, 0, 0), &policy()).points, 5);
    }

    #[test]
    fn test_axes_combine_by_max_not_product() {
        let p = policy();
        assert_eq!(size_multiplier(&p, 25, 600), 2.0);
        assert_eq!(size_multiplier(&p, 5, 300), 1.5);
        assert_eq!(size_multiplier(&p, 12, 60), 1.5);
        assert_eq!(size_multiplier(&p, 0, 0), 1.0);
        assert_eq!(size_multiplier(&p, 3, 50), 1.0);
    }

    #[test]
    fn test_multiplier_never_below_one() {
        let shrinking = PointsPolicy::new(
            HashMap::new(),
            MultiplierSteps::new(vec![MultiplierBucket::new(0, None, 0.5)]),
            MultiplierSteps::new(vec![MultiplierBucket::new(0, None, 0.1)]),
            HashMap::new(),
        );
        assert_eq!(size_multiplier(&shrinking, 100, 100), 1.0);
        assert_eq!(score(&pr(8, &[], 100, 100, 0), &shrinking).points, 2);
    }

    #[test]
    fn test_multiplier_monotonic_in_each_axis() {
        let p = policy();
        let mut last = 0.0;
        for files in 0..40 {
            let m = size_multiplier(&p, files, 100);
            assert!(m >= last, "files={} dropped multiplier", files);
            last = m;
        }
        let mut last = 0.0;
        for lines in (0..1200).step_by(7) {
            let m = size_multiplier(&p, 5, lines);
            assert!(m >= last, "lines={} dropped multiplier", lines);
            last = m;
        }
    }

    #[test]
    fn test_missing_top_bucket_leaves_multiplier_alone() {
        let p = PointsPolicy::new(
            HashMap::new(),
            MultiplierSteps::new(vec![
                MultiplierBucket::new(4, Some(10), 1.2),
                MultiplierBucket::new(11, Some(20), 1.5),
            ]),
            MultiplierSteps::default(),
            HashMap::new(),
        );
        assert_eq!(size_multiplier(&p, 30, 0), 1.0);
    }

    #[test]
    fn test_lines_changed_saturates() {
        let result = score(&pr(10, &[], 0, u32::MAX, 10), &policy());
        assert_eq!(result.lines_changed, Some(u32::MAX));
        assert_eq!(result.multiplier, Some(2.0));
    }
}
