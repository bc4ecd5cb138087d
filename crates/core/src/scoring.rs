//! Scoring module - points derived from match geometry
//!
//! A match is worth `len * score_per_tile`. A resolution is worth the sum over
//! its matches, so the shared tile of a cross-shaped match is counted once per
//! axis. Cascade rounds add up the same way; there is no chain multiplier.

use serde::{Deserialize, Serialize};

use crate::matching::Match;

/// Score for a single run
pub fn match_score(len: usize, score_per_tile: u32) -> u32 {
    u32::try_from(len)
        .unwrap_or(u32::MAX)
        .saturating_mul(score_per_tile)
}

/// Sum of match scores
pub fn total_score(matches: &[Match]) -> u32 {
    matches
        .iter()
        .fold(0u32, |acc, m| acc.saturating_add(m.score))
}

/// Score breakdown for a batch of matches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Number of matches scored
    pub matches: usize,
    /// Tiles counted, once per match they belong to
    pub tiles_scored: usize,
    pub total: u32,
}

/// Calculate the complete score for one resolution.
pub fn calculate_score(matches: &[Match]) -> ScoreResult {
    ScoreResult {
        matches: matches.len(),
        tiles_scored: matches.iter().map(Match::len).sum(),
        total: total_score(matches),
    }
}
