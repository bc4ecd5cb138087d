use serde::{Deserialize, Serialize};

use crate::config::{CascadePolicy, SwapPolicy};
use crate::types::{Position, TileKind};

/// Read-only view of a game for presentation layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub size: usize,
    /// Row-major kinds, `size * size` entries
    pub tiles: Vec<TileKind>,
    pub cursor: Position,
    pub selected: Option<Position>,
    pub score: u32,
    pub moves: u32,
    pub last_gain: u32,
    pub episode_id: u32,
    pub seed: u32,
    pub cascade: CascadePolicy,
    pub swap_policy: SwapPolicy,
}

impl GameSnapshot {
    pub fn kind_at(&self, pos: Position) -> Option<TileKind> {
        if !pos.in_bounds(self.size) {
            return None;
        }
        self.tiles.get(pos.row * self.size + pos.col).copied()
    }

    /// Kinds of one row, left to right
    pub fn row(&self, row: usize) -> &[TileKind] {
        let start = (row * self.size).min(self.tiles.len());
        let end = (start + self.size).min(self.tiles.len());
        &self.tiles[start..end]
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            size: 0,
            tiles: Vec::new(),
            cursor: Position::new(0, 0),
            selected: None,
            score: 0,
            moves: 0,
            last_gain: 0,
            episode_id: 0,
            seed: 0,
            cascade: CascadePolicy::default(),
            swap_policy: SwapPolicy::default(),
        }
    }
}
