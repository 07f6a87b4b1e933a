//! Contribution scoring
//!
//! Maps one merged contribution to a point value and an explanation of how
//! that value was derived.
//!
//! # Scoring Formula
//!
//! ```text
//! manual override present  → points = override              (method = manual)
//! otherwise:
//!   base       = max(points of matched labels), or 2 if none matched
//!   multiplier = max(1.0, files_bucket, lines_bucket)
//!   points     = round_half_up(base × multiplier)            (method = calculated)
//! ```
//!
//! Each size axis contributes the multiplier of the single highest bucket the
//! count falls into. The two axes are combined by taking the larger value,
//! never by multiplying them together.
//!
//! # Example
//!
//! Labels `["feature"]` (5 points), 15 files changed (1.5), 80 lines changed (1.2):
//! base = 5, multiplier = max(1.0, 1.5, 1.2) = 1.5, points = round(7.5) = 8.

mod calculator;

pub use calculator::{score, size_multiplier};
