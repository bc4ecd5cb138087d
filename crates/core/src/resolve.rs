//! Resolution - removal, gravity collapse and refill
//!
//! Given matches from the current board state, [`Board::resolve`] removes every
//! matched tile once, compacts each column toward the bottom, and spawns new
//! tiles into the cells left empty at the top. Nothing is mutated unless every
//! match still describes the board.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::board::{Board, Tile};
use crate::error::InvariantViolation;
use crate::matching::Match;
use crate::rng::RandomSource;
use crate::types::{Position, TileId};

/// A surviving tile that fell during collapse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovedTile {
    pub id: TileId,
    pub from: Position,
    pub to: Position,
}

/// Everything that changed in one resolution, for presentation playback.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResolutionResult {
    /// Destroyed tiles with their last position, each once, in match order
    pub removed: Vec<Tile>,
    /// Survivors whose row changed, by column then bottom to top
    pub moved: Vec<MovedTile>,
    /// Refill tiles, by column then bottom to top
    pub spawned: Vec<Tile>,
}

impl ResolutionResult {
    pub fn removed_tile_ids(&self) -> BTreeSet<TileId> {
        self.removed.iter().map(|t| t.id).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.removed.is_empty()
    }
}

impl<R: RandomSource> Board<R> {
    /// Remove matched tiles, collapse columns and refill.
    ///
    /// `resolve(&[])` is a no-op. A match whose tile is no longer at its recorded
    /// position is rejected with [`InvariantViolation::StaleTile`] and the board is
    /// left untouched; only pass matches from the latest [`Board::detect_matches`].
    pub fn resolve(&mut self, matches: &[Match]) -> Result<ResolutionResult, InvariantViolation> {
        if matches.is_empty() {
            return Ok(ResolutionResult::default());
        }

        let removed = self.collect_targets(matches)?;
        let n = self.size();

        for tile in &removed {
            if let Some(i) = self.index(tile.position) {
                self.cells_mut()[i] = None;
            }
        }

        let mut moved = Vec::new();
        let mut spawned = Vec::with_capacity(removed.len());

        for col in 0..n {
            // Next free row from the bottom; survivors are packed below it.
            let mut write = n;
            for row in (0..n).rev() {
                let Some(mut tile) = self.cells_mut()[row * n + col].take() else {
                    continue;
                };
                write -= 1;
                let to = Position::new(write, col);
                if write != row {
                    moved.push(MovedTile {
                        id: tile.id,
                        from: tile.position,
                        to,
                    });
                }
                tile.position = to;
                self.cells_mut()[write * n + col] = Some(tile);
            }

            for row in (0..write).rev() {
                let kind = self.draw_refill_kind();
                let tile = self.new_tile(kind, Position::new(row, col));
                self.cells_mut()[row * n + col] = Some(tile);
                spawned.push(tile);
            }
        }

        debug!(
            matches = matches.len(),
            removed = removed.len(),
            moved = moved.len(),
            spawned = spawned.len(),
            "resolved matches"
        );
        debug_assert!(self.check_invariants().is_ok());

        Ok(ResolutionResult {
            removed,
            moved,
            spawned,
        })
    }

    /// Validate every match tile against the board and dedupe by identity.
    fn collect_targets(&self, matches: &[Match]) -> Result<Vec<Tile>, InvariantViolation> {
        let mut seen = HashSet::new();
        let mut targets = Vec::new();

        for tile in matches.iter().flat_map(|m| m.tiles.iter()) {
            match self.get(tile.position) {
                Some(current) if current.id == tile.id => {
                    if seen.insert(current.id) {
                        targets.push(*current);
                    }
                }
                _ => {
                    return Err(InvariantViolation::StaleTile {
                        id: tile.id,
                        position: tile.position,
                    })
                }
            }
        }
        Ok(targets)
    }
}
