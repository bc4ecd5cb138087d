//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are plain data with no behavior beyond parsing and geometry, making
//! them usable in any context (board engine, terminal rendering, tooling output).
//!
//! # Board Geometry
//!
//! - **Size**: square `N x N` grid, default 8
//! - **Coordinates**: `(row, col)`, row 0 is the top row, col 0 the left column
//! - **Gravity**: tiles fall toward row `N - 1`
//!
//! # Rule Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_BOARD_SIZE` | 8 | Side length of the default board |
//! | `MIN_BOARD_SIZE` | 3 | Smallest board that can hold a match |
//! | `MAX_BOARD_SIZE` | 256 | Largest supported board side length |
//! | `DEFAULT_PALETTE_SIZE` | 6 | Number of tile kinds in play |
//! | `MIN_PALETTE_SIZE` | 3 | Fewest kinds that guarantee a match-free fill |
//! | `MATCH_MIN_LENGTH` | 3 | Shortest run that counts as a match |
//! | `SCORE_PER_TILE` | 100 | Points per tile in a match |
//!
//! # Animation Timing
//!
//! Used only by presentation layers (milliseconds):
//!
//! - `SWAP_ANIMATION_MS`: 200
//! - `REMOVE_ANIMATION_MS`: 300
//! - `FALL_ANIMATION_MS`: 300
//! - `FRAME_MS`: 16 (terminal frame interval)
//!
//! # Examples
//!
//! ```
//! use match3_types::{GameAction, Position, TileKind};
//!
//! let kind = TileKind::from_str("Purple").unwrap();
//! assert_eq!(kind, TileKind::Purple);
//!
//! let a = Position::new(2, 3);
//! assert!(a.is_adjacent_to(Position::new(2, 4)));
//! assert!(!a.is_adjacent_to(Position::new(3, 4)));
//!
//! assert_eq!(GameAction::from_str("select"), Some(GameAction::Select));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default board side length (8x8)
pub const DEFAULT_BOARD_SIZE: usize = 8;

/// Smallest supported board side length
pub const MIN_BOARD_SIZE: usize = 3;

/// Largest supported board side length
pub const MAX_BOARD_SIZE: usize = 256;

/// Default number of tile kinds drawn from the palette
pub const DEFAULT_PALETTE_SIZE: usize = 6;

/// Fewest tile kinds for which a match-free initial fill always exists
pub const MIN_PALETTE_SIZE: usize = 3;

/// Minimum run length that counts as a match
pub const MATCH_MIN_LENGTH: usize = 3;

/// Points awarded per tile in a match
pub const SCORE_PER_TILE: u32 = 100;

/// Duration of the swap animation
pub const SWAP_ANIMATION_MS: u32 = 200;

/// Duration of the fade-out for removed tiles
pub const REMOVE_ANIMATION_MS: u32 = 300;

/// Duration of the gravity fall after a removal
pub const FALL_ANIMATION_MS: u32 = 300;

/// Frame interval of the terminal loop (~60 FPS)
pub const FRAME_MS: u32 = 16;

/// Upper bound on resolve rounds for a single cascading turn
pub const DEFAULT_MAX_CASCADE_ROUNDS: u32 = 64;

/// A cell coordinate on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Manhattan distance between two cells, saturating at `usize::MAX`
    pub fn manhattan(self, other: Position) -> usize {
        self.row
            .abs_diff(other.row)
            .saturating_add(self.col.abs_diff(other.col))
    }

    /// True iff the cells share an edge (distance exactly 1).
    ///
    /// Diagonal neighbours and identical positions are not adjacent.
    pub fn is_adjacent_to(self, other: Position) -> bool {
        matches!(
            (self.row.abs_diff(other.row), self.col.abs_diff(other.col)),
            (0, 1) | (1, 0)
        )
    }

    /// Check whether the position lies inside an `size x size` board
    pub fn in_bounds(self, size: usize) -> bool {
        self.row < size && self.col < size
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Tile colors. A board plays with the first `palette_size` entries of [`TileKind::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileKind {
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
    Orange,
}

impl TileKind {
    /// Full palette in draw order
    pub const ALL: [TileKind; 6] = [
        TileKind::Red,
        TileKind::Blue,
        TileKind::Green,
        TileKind::Yellow,
        TileKind::Purple,
        TileKind::Orange,
    ];

    /// Palette entry at `index`, if any
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Position of this kind within [`TileKind::ALL`]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Parse tile kind from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "red" | "r" => Some(TileKind::Red),
            "blue" | "b" => Some(TileKind::Blue),
            "green" | "g" => Some(TileKind::Green),
            "yellow" | "y" => Some(TileKind::Yellow),
            "purple" | "p" => Some(TileKind::Purple),
            "orange" | "o" => Some(TileKind::Orange),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TileKind::Red => "red",
            TileKind::Blue => "blue",
            TileKind::Green => "green",
            TileKind::Yellow => "yellow",
            TileKind::Purple => "purple",
            TileKind::Orange => "orange",
        }
    }

    /// Single uppercase letter, handy for fixtures and debug output
    pub fn letter(self) -> char {
        match self {
            TileKind::Red => 'R',
            TileKind::Blue => 'B',
            TileKind::Green => 'G',
            TileKind::Yellow => 'Y',
            TileKind::Purple => 'P',
            TileKind::Orange => 'O',
        }
    }
}

/// Opaque tile handle, unique for the lifetime of a board.
///
/// Ids are minted from a 64-bit counter; a board would have to spawn 2^64
/// tiles before one repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileId(pub u64);

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tile-{}", self.0)
    }
}

/// Axis of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Player-facing actions (keyboard driven)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GameAction {
    CursorUp,
    CursorDown,
    CursorLeft,
    CursorRight,
    /// Select the tile under the cursor, or swap with the current selection
    Select,
    Deselect,
    Restart,
}

impl GameAction {
    /// Parse action from string (case-insensitive, camelCase accepted)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "cursorup" | "up" => Some(GameAction::CursorUp),
            "cursordown" | "down" => Some(GameAction::CursorDown),
            "cursorleft" | "left" => Some(GameAction::CursorLeft),
            "cursorright" | "right" => Some(GameAction::CursorRight),
            "select" => Some(GameAction::Select),
            "deselect" => Some(GameAction::Deselect),
            "restart" => Some(GameAction::Restart),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::CursorUp => "cursorUp",
            GameAction::CursorDown => "cursorDown",
            GameAction::CursorLeft => "cursorLeft",
            GameAction::CursorRight => "cursorRight",
            GameAction::Select => "select",
            GameAction::Deselect => "deselect",
            GameAction::Restart => "restart",
        }
    }
}
