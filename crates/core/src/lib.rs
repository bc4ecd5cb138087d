//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains the match-3 board engine and the turn controller built
//! on top of it. It has **no dependencies** on terminal, input, or I/O, making it:
//!
//! - **Deterministic**: Same seed produces identical boards and refills
//! - **Testable**: Every rule is checked by unit tests
//! - **Portable**: Runs in the terminal game, the headless simulator, or benches
//!
//! # Module Structure
//!
//! - [`board`]: `N x N` grid of identified tiles, initial fill, swap
//! - [`matching`]: Horizontal and vertical run detection
//! - [`resolve`]: Removal, column collapse and refill
//! - [`scoring`]: Points per match and per resolution
//! - [`game_state`]: Selection, swap/cascade policies, running score
//! - [`rng`]: Injectable random source and the default LCG
//! - [`config`]: Board and game configuration, env overrides
//! - [`error`]: Configuration, swap and invariant errors
//!
//! # Game Rules
//!
//! - **Initial fill**: No run of three exists on a freshly built board
//! - **Swap**: Only orthogonally adjacent cells, no legality check
//! - **Match**: A maximal straight run of `>= 3` equal kinds
//! - **Resolve**: Each matched tile is removed once, survivors fall, the gaps at
//!   the top of each column are refilled
//! - **Score**: `len * 100` per match
//!
//! # Example
//!
//! ```
//! use match3_core::{Board, SimpleRng};
//!
//! let mut board = Board::initialize(8, 6, SimpleRng::new(12345)).unwrap();
//! assert!(board.detect_matches().is_empty());
//!
//! // Nothing to resolve on a fresh board
//! let result = board.resolve(&[]).unwrap();
//! assert!(result.is_empty());
//! ```

pub mod board;
pub mod config;
pub mod error;
pub mod game_state;
pub mod matching;
pub mod resolve;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use match3_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, Cell, Tile};
pub use config::{BoardConfig, CascadePolicy, GameConfig, SwapPolicy};
pub use error::{BoardError, ConfigError, InvariantViolation, SwapError};
pub use game_state::{CascadeStep, GameState, Selection, TurnOutcome};
pub use matching::Match;
pub use resolve::{MovedTile, ResolutionResult};
pub use rng::{RandomSource, SequenceRng, SimpleRng};
pub use scoring::{calculate_score, match_score, total_score, ScoreResult};
pub use snapshot::GameSnapshot;
