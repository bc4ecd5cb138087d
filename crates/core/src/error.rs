//! Error types for board operations.
//!
//! Every public board operation is atomic: when one of these errors is returned
//! the board is exactly as it was before the call.

use match3_types::{Position, TileId};

/// Invalid initialization parameters. The board is not created.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("board size {size} is below the minimum of {min}")]
    BoardTooSmall { size: usize, min: usize },

    #[error("board size {size} exceeds the maximum of {max}")]
    BoardTooLarge { size: usize, max: usize },

    #[error("palette size {palette_size} is below the minimum of {min}")]
    PaletteTooSmall { palette_size: usize, min: usize },

    #[error("palette size {palette_size} exceeds the {max} available tile kinds")]
    PaletteTooLarge { palette_size: usize, max: usize },

    #[error("match length {length} must be between {min} and the board size {size}")]
    MatchLengthOutOfRange {
        length: usize,
        min: usize,
        size: usize,
    },

    #[error("score per tile must be > 0")]
    ZeroScorePerTile,

    #[error("layout has {found} rows, expected {expected}")]
    LayoutRowCount { expected: usize, found: usize },

    #[error("layout row {row} has {found} cells, expected {expected}")]
    LayoutMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("layout uses {kind} which is outside the first {palette_size} palette kinds")]
    KindOutsidePalette { kind: &'static str, palette_size: usize },
}

/// Rejected swap request. The board is unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SwapError {
    #[error("position {position} is outside the {size}x{size} board")]
    OutOfBounds { position: Position, size: usize },

    #[error("positions {a} and {b} are not adjacent")]
    NotAdjacent { a: Position, b: Position },
}

/// A broken engine contract, e.g. resolving a match that no longer describes the
/// board. Treated as a programming defect; the operation is aborted untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
    #[error("stale match: {id} is no longer at {position}")]
    StaleTile { id: TileId, position: Position },

    #[error("cell {position} is empty between operations")]
    EmptyCell { position: Position },

    #[error("{id} records position {recorded} but sits at {actual}")]
    PositionMismatch {
        id: TileId,
        recorded: Position,
        actual: Position,
    },

    #[error("{id} appears more than once on the board")]
    DuplicateTile { id: TileId },

    #[error("{id} has a kind outside the active palette")]
    KindOutsidePalette { id: TileId },
}

/// Umbrella error for callers that drive several board operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid swap: {0}")]
    InvalidSwap(#[from] SwapError),

    #[error("invariant violation: {0}")]
    InvariantViolation(#[from] InvariantViolation),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::PaletteTooSmall {
            palette_size: 2,
            min: 3,
        };
        assert_eq!(err.to_string(), "palette size 2 is below the minimum of 3");
    }

    #[test]
    fn test_swap_error_display() {
        let err = SwapError::NotAdjacent {
            a: Position::new(0, 0),
            b: Position::new(1, 1),
        };
        assert_eq!(err.to_string(), "positions (0, 0) and (1, 1) are not adjacent");
    }

    #[test]
    fn test_board_error_wraps_sources() {
        let err: BoardError = InvariantViolation::StaleTile {
            id: TileId(12),
            position: Position::new(2, 5),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "invariant violation: stale match: tile-12 is no longer at (2, 5)"
        );
    }
}
