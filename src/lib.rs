//! Contributor leaderboard
//!
//! Scores merged pull requests from a set of tracked repositories and ranks
//! contributors for the current month and for all time.
//!
//! The pipeline is linear: a [`github::ContributionSource`] yields merged
//! contributions, [`scoring::score`] awards points, [`aggregate::Leaderboard`]
//! folds them into per-contributor standings, and [`reporters`] render the
//! ranked snapshot.

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod github;
pub mod models;
pub mod pipeline;
pub mod reporters;
pub mod scoring;
