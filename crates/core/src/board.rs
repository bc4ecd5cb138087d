//! Board module - owns the grid of tiles
//!
//! The board is an `N x N` grid stored as a flat row-major buffer
//! (`row * N + col`). Every cell holds a [`Tile`] between public operations;
//! empty cells only exist transiently inside [`Board::resolve`].
//!
//! Coordinates: `(row, col)`, row 0 is the top. Gravity pulls toward row `N - 1`.

use std::collections::HashSet;

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::BoardConfig;
use crate::error::{ConfigError, InvariantViolation, SwapError};
use crate::rng::{RandomSource, SimpleRng};
use crate::types::{Position, TileId, TileKind};

/// A single occupant of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    pub kind: TileKind,
    /// Always equal to the tile's location in the board that owns it.
    pub position: Position,
}

/// Grid cell: `None` only while a resolution is in progress.
pub type Cell = Option<Tile>;

/// The match-3 board engine.
///
/// Generic over the random source used for the initial fill and for refills.
#[derive(Debug, Clone)]
pub struct Board<R = SimpleRng> {
    config: BoardConfig,
    cells: Vec<Cell>,
    next_id: u64,
    rng: R,
}

impl<R: RandomSource> Board<R> {
    /// Build a fully populated board of `size x size` with no pre-existing match.
    pub fn initialize(size: usize, palette_size: usize, rng: R) -> Result<Self, ConfigError> {
        Self::with_config(BoardConfig::new(size, palette_size), rng)
    }

    /// Build a match-free board from an explicit configuration.
    ///
    /// Cells are filled row-major. Each cell only looks back (left and up), which
    /// is enough: every run is checked when its last member is placed.
    pub fn with_config(config: BoardConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;

        let n = config.size;
        let mut board = Self {
            config,
            cells: vec![None; n * n],
            next_id: 0,
            rng,
        };

        let mut redraws = 0u32;
        for row in 0..n {
            for col in 0..n {
                let pos = Position::new(row, col);
                let (kind, redrawn) = board.draw_initial_kind(pos);
                if redrawn {
                    redraws += 1;
                }
                let tile = board.new_tile(kind, pos);
                board.cells[row * n + col] = Some(tile);
            }
        }

        debug!(size = n, palette = config.palette_size, redraws, "board initialized");
        debug_assert!(board.check_invariants().is_ok());
        Ok(board)
    }

    /// Build a board from an explicit layout (`rows[row][col]`).
    ///
    /// The layout may contain matches; this is how puzzles and fixtures set up a
    /// known position. Refills still draw from `rng`.
    pub fn from_kinds(
        config: BoardConfig,
        rows: &[Vec<TileKind>],
        rng: R,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let n = config.size;
        if rows.len() != n {
            return Err(ConfigError::LayoutRowCount {
                expected: n,
                found: rows.len(),
            });
        }

        let palette = config.palette();
        let mut board = Self {
            config,
            cells: Vec::with_capacity(n * n),
            next_id: 0,
            rng,
        };

        for (row, kinds) in rows.iter().enumerate() {
            if kinds.len() != n {
                return Err(ConfigError::LayoutMismatch {
                    row,
                    expected: n,
                    found: kinds.len(),
                });
            }
            for (col, &kind) in kinds.iter().enumerate() {
                if !palette.contains(&kind) {
                    return Err(ConfigError::KindOutsidePalette {
                        kind: kind.as_str(),
                        palette_size: config.palette_size,
                    });
                }
                let tile = board.new_tile(kind, Position::new(row, col));
                board.cells.push(Some(tile));
            }
        }

        Ok(board)
    }

    /// Pick a kind for `pos` that does not complete a run with the cells already
    /// placed to its left or above it.
    ///
    /// Returns the kind and whether the first draw had to be replaced.
    fn draw_initial_kind(&mut self, pos: Position) -> (TileKind, bool) {
        let palette = self.config.palette();
        let blocked = self.blocked_kinds(pos);

        let first = palette[self.rng.next_index(palette.len())];
        if !blocked.contains(&first) {
            return (first, false);
        }

        // At most two kinds are blocked and the palette has at least three, so
        // `allowed` is never empty.
        let allowed: ArrayVec<TileKind, 6> = palette
            .iter()
            .copied()
            .filter(|k| !blocked.contains(k))
            .collect();
        (allowed[self.rng.next_index(allowed.len())], true)
    }

    /// Kinds that would complete a run ending at `pos` (horizontal, then vertical).
    fn blocked_kinds(&self, pos: Position) -> ArrayVec<TileKind, 2> {
        let reach = self.config.match_min_length - 1;
        let mut blocked = ArrayVec::new();

        let left = (pos.col >= reach)
            .then(|| self.uniform_run((1..=reach).map(|d| Position::new(pos.row, pos.col - d))))
            .flatten();
        let up = (pos.row >= reach)
            .then(|| self.uniform_run((1..=reach).map(|d| Position::new(pos.row - d, pos.col))))
            .flatten();

        for kind in [left, up].into_iter().flatten() {
            if !blocked.contains(&kind) {
                blocked.push(kind);
            }
        }
        blocked
    }

    /// The shared kind of all cells in `positions`, if they are occupied and equal.
    fn uniform_run(&self, positions: impl Iterator<Item = Position>) -> Option<TileKind> {
        let mut kind = None;
        for pos in positions {
            let k = self.kind_at(pos)?;
            match kind {
                None => kind = Some(k),
                Some(prev) if prev == k => {}
                Some(_) => return None,
            }
        }
        kind
    }

    /// Draw an unconstrained kind for a refill.
    pub(crate) fn draw_refill_kind(&mut self) -> TileKind {
        let palette = self.config.palette();
        palette[self.rng.next_index(palette.len())]
    }
}

impl<R> Board<R> {
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Side length of the board
    pub fn size(&self) -> usize {
        self.config.size
    }

    /// Kinds in play on this board
    pub fn palette(&self) -> &'static [TileKind] {
        self.config.palette()
    }

    /// Calculate flat index from a position
    #[inline(always)]
    pub(crate) fn index(&self, pos: Position) -> Option<usize> {
        let n = self.config.size;
        pos.in_bounds(n).then(|| pos.row * n + pos.col)
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.in_bounds(self.config.size)
    }

    /// Tile at `pos`, `None` if out of bounds
    pub fn get(&self, pos: Position) -> Option<&Tile> {
        self.index(pos).and_then(|i| self.cells[i].as_ref())
    }

    pub fn kind_at(&self, pos: Position) -> Option<TileKind> {
        self.get(pos).map(|t| t.kind)
    }

    /// Find a tile by identity
    pub fn find(&self, id: TileId) -> Option<&Tile> {
        self.tiles().find(|t| t.id == id)
    }

    /// All tiles in row-major order
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> + '_ {
        self.cells.iter().flatten()
    }

    /// Kinds in row-major order
    pub fn kinds(&self) -> Vec<TileKind> {
        self.tiles().map(|t| t.kind).collect()
    }

    /// Kinds as `rows[row][col]`, the same shape [`Board::from_kinds`] accepts
    pub fn rows(&self) -> Vec<Vec<TileKind>> {
        let n = self.config.size;
        (0..n)
            .map(|row| {
                (0..n)
                    .filter_map(|col| self.kind_at(Position::new(row, col)))
                    .collect()
            })
            .collect()
    }

    /// Random source used for refills
    pub fn rng(&self) -> &R {
        &self.rng
    }

    /// True iff the two positions share an edge.
    pub fn are_adjacent(a: Position, b: Position) -> bool {
        a.is_adjacent_to(b)
    }

    /// Exchange two adjacent tiles and update their stored positions.
    ///
    /// Does not look for matches. Calling it again with the same positions undoes it.
    pub fn swap(&mut self, a: Position, b: Position) -> Result<(), SwapError> {
        let size = self.config.size;
        let ia = self
            .index(a)
            .ok_or(SwapError::OutOfBounds { position: a, size })?;
        let ib = self
            .index(b)
            .ok_or(SwapError::OutOfBounds { position: b, size })?;
        if !Self::are_adjacent(a, b) {
            return Err(SwapError::NotAdjacent { a, b });
        }

        self.cells.swap(ia, ib);
        if let Some(tile) = self.cells[ia].as_mut() {
            tile.position = a;
        }
        if let Some(tile) = self.cells[ib].as_mut() {
            tile.position = b;
        }

        debug!(%a, %b, "swapped tiles");
        Ok(())
    }

    /// Verify the board invariants: every cell occupied, stored positions match
    /// grid coordinates, identities unique, kinds inside the palette.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let n = self.config.size;
        let palette = self.config.palette();
        let mut seen = HashSet::with_capacity(self.cells.len());

        for (i, cell) in self.cells.iter().enumerate() {
            let actual = Position::new(i / n, i % n);
            let tile = cell
                .as_ref()
                .ok_or(InvariantViolation::EmptyCell { position: actual })?;
            if tile.position != actual {
                return Err(InvariantViolation::PositionMismatch {
                    id: tile.id,
                    recorded: tile.position,
                    actual,
                });
            }
            if !seen.insert(tile.id) {
                return Err(InvariantViolation::DuplicateTile { id: tile.id });
            }
            if !palette.contains(&tile.kind) {
                return Err(InvariantViolation::KindOutsidePalette { id: tile.id });
            }
        }
        Ok(())
    }

    /// Mint a tile with a fresh identity. Does not place it.
    pub(crate) fn new_tile(&mut self, kind: TileKind, position: Position) -> Tile {
        let id = TileId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        Tile { id, kind, position }
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}
