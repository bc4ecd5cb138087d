//! Game state module - drives one board through player turns
//!
//! This module ties the board, RNG, scoring and configuration together. It owns
//! the selection/cursor model, applies the swap and cascade policies, and keeps
//! the running score. All calls are synchronous; a presentation layer replays
//! the returned [`TurnOutcome`] and must not issue the next turn until done.

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::board::Board;
use crate::config::{CascadePolicy, GameConfig, SwapPolicy};
use crate::error::{BoardError, ConfigError};
use crate::matching::Match;
use crate::resolve::ResolutionResult;
use crate::rng::SimpleRng;
use crate::scoring::{calculate_score, ScoreResult};
use crate::snapshot::GameSnapshot;
use crate::types::{GameAction, Position};

/// One detect + resolve round of a turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeStep {
    pub matches: Vec<Match>,
    pub resolution: ResolutionResult,
    pub score: ScoreResult,
}

/// Result of a swap attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnOutcome {
    pub a: Position,
    pub b: Position,
    /// Empty when the swap matched nothing
    pub steps: Vec<CascadeStep>,
    /// The swap was undone because it matched nothing
    pub reverted: bool,
    pub score_gained: u32,
}

impl TurnOutcome {
    pub fn matched(&self) -> bool {
        !self.steps.is_empty()
    }

    /// Number of resolve rounds (1 without cascades)
    pub fn depth(&self) -> usize {
        self.steps.len()
    }

    pub fn tiles_removed(&self) -> usize {
        self.steps.iter().map(|s| s.resolution.removed.len()).sum()
    }
}

/// What a selection click did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Selected(Position),
    Deselected,
    /// Selection moved to a non-adjacent tile
    Moved(Position),
    Swapped(TurnOutcome),
    /// Position outside the board
    Ignored,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    config: GameConfig,
    board: Board<SimpleRng>,
    /// Seed the current board was built from.
    seed: u32,
    /// Monotonic episode id (increments on restart).
    episode_id: u32,
    cursor: Position,
    selected: Option<Position>,
    score: u32,
    /// Swaps that stayed on the board.
    moves: u32,
    last_gain: u32,
    /// Swaps that produced at least one match.
    turns_with_match: u32,
    /// Last turn, consumed by the presentation layer.
    last_outcome: Option<TurnOutcome>,
}

impl GameState {
    /// Create a new game from a validated configuration
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        let board = Board::with_config(config.board, SimpleRng::new(config.seed))?;
        Ok(Self {
            config,
            board,
            seed: config.seed,
            episode_id: 0,
            cursor: Position::new(0, 0),
            selected: None,
            score: 0,
            moves: 0,
            last_gain: 0,
            turns_with_match: 0,
            last_outcome: None,
        })
    }

    /// Start from a prepared board (puzzles, fixtures). The board's own
    /// configuration replaces `config.board`.
    pub fn from_board(config: GameConfig, board: Board<SimpleRng>) -> Self {
        Self {
            config: GameConfig {
                board: *board.config(),
                ..config
            },
            seed: config.seed,
            board,
            episode_id: 0,
            cursor: Position::new(0, 0),
            selected: None,
            score: 0,
            moves: 0,
            last_gain: 0,
            turns_with_match: 0,
            last_outcome: None,
        }
    }

    /// Default rules with the given seed
    pub fn with_seed(seed: u32) -> Result<Self, ConfigError> {
        Self::new(GameConfig {
            seed,
            ..GameConfig::default()
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board<SimpleRng> {
        &self.board
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn last_gain(&self) -> u32 {
        self.last_gain
    }

    pub fn turns_with_match(&self) -> u32 {
        self.turns_with_match
    }

    pub fn cursor(&self) -> Position {
        self.cursor
    }

    pub fn selected(&self) -> Option<Position> {
        self.selected
    }

    pub fn take_last_outcome(&mut self) -> Option<TurnOutcome> {
        self.last_outcome.take()
    }

    /// Start a fresh board, continuing the random sequence of the current one.
    pub fn restart(&mut self) -> Result<(), ConfigError> {
        let seed = self.board.rng().state();
        let board = Board::with_config(self.config.board, SimpleRng::new(seed))?;

        self.board = board;
        self.seed = seed;
        self.episode_id = self.episode_id.wrapping_add(1);
        self.selected = None;
        self.score = 0;
        self.moves = 0;
        self.last_gain = 0;
        self.turns_with_match = 0;
        self.last_outcome = None;

        info!(episode = self.episode_id, seed, "game restarted");
        Ok(())
    }

    /// Swap two tiles and resolve whatever the swap produced.
    ///
    /// With [`CascadePolicy::Single`] one resolution runs, matches created by the
    /// refill stay on the board. With [`CascadePolicy::UntilStable`] rounds repeat
    /// until the board is stable or `max_cascade_rounds` is reached. A swap that
    /// matches nothing is undone under [`SwapPolicy::RevertUnmatched`].
    #[instrument(skip(self), fields(episode = self.episode_id))]
    pub fn try_swap(&mut self, a: Position, b: Position) -> Result<TurnOutcome, BoardError> {
        self.board.swap(a, b)?;

        let mut matches = self.board.detect_matches();
        if matches.is_empty() {
            let reverted = self.config.swap_policy == SwapPolicy::RevertUnmatched;
            if reverted {
                self.board.swap(a, b)?;
            } else {
                self.moves += 1;
            }
            self.last_gain = 0;
            return Ok(TurnOutcome {
                a,
                b,
                steps: Vec::new(),
                reverted,
                score_gained: 0,
            });
        }

        let max_rounds = match self.config.cascade {
            CascadePolicy::Single => 1,
            CascadePolicy::UntilStable => self.config.max_cascade_rounds.max(1) as usize,
        };

        let mut steps = Vec::new();
        let mut gained = 0u32;
        loop {
            let score = calculate_score(&matches);
            let resolution = self.board.resolve(&matches)?;
            gained = gained.saturating_add(score.total);
            steps.push(CascadeStep {
                matches,
                resolution,
                score,
            });

            if steps.len() >= max_rounds {
                break;
            }
            matches = self.board.detect_matches();
            if matches.is_empty() {
                break;
            }
        }

        if self.config.cascade == CascadePolicy::UntilStable && self.board.has_matches() {
            warn!(rounds = steps.len(), "cascade round cap reached with matches left");
        }

        self.moves += 1;
        self.turns_with_match += 1;
        self.score = self.score.saturating_add(gained);
        self.last_gain = gained;

        Ok(TurnOutcome {
            a,
            b,
            steps,
            reverted: false,
            score_gained: gained,
        })
    }

    /// Click semantics: select, deselect, move the selection, or swap with it.
    pub fn select(&mut self, pos: Position) -> Result<Selection, BoardError> {
        if !self.board.in_bounds(pos) {
            return Ok(Selection::Ignored);
        }

        let Some(current) = self.selected else {
            self.selected = Some(pos);
            return Ok(Selection::Selected(pos));
        };

        if current == pos {
            self.selected = None;
            return Ok(Selection::Deselected);
        }

        if Board::<SimpleRng>::are_adjacent(current, pos) {
            self.selected = None;
            let outcome = self.try_swap(current, pos)?;
            return Ok(Selection::Swapped(outcome));
        }

        self.selected = Some(pos);
        Ok(Selection::Moved(pos))
    }

    /// Apply a player action. Returns true if the state changed.
    ///
    /// A completed swap is stored for [`GameState::take_last_outcome`].
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::CursorUp => self.move_cursor(-1, 0),
            GameAction::CursorDown => self.move_cursor(1, 0),
            GameAction::CursorLeft => self.move_cursor(0, -1),
            GameAction::CursorRight => self.move_cursor(0, 1),
            GameAction::Select => match self.select(self.cursor) {
                Ok(Selection::Swapped(outcome)) => {
                    self.last_outcome = Some(outcome);
                    true
                }
                Ok(Selection::Ignored) => false,
                Ok(_) => true,
                Err(err) => {
                    warn!(%err, "selection rejected");
                    false
                }
            },
            GameAction::Deselect => self.selected.take().is_some(),
            GameAction::Restart => match self.restart() {
                Ok(()) => true,
                Err(err) => {
                    warn!(%err, "restart failed");
                    false
                }
            },
        }
    }

    fn move_cursor(&mut self, d_row: isize, d_col: isize) -> bool {
        let max = self.board.size() - 1;
        let row = self.cursor.row.saturating_add_signed(d_row).min(max);
        let col = self.cursor.col.saturating_add_signed(d_col).min(max);
        let next = Position::new(row, col);
        let changed = next != self.cursor;
        self.cursor = next;
        changed
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.size = self.board.size();
        out.tiles.clear();
        out.tiles.extend(self.board.tiles().map(|t| t.kind));
        out.cursor = self.cursor;
        out.selected = self.selected;
        out.score = self.score;
        out.moves = self.moves;
        out.last_gain = self.last_gain;
        out.episode_id = self.episode_id;
        out.seed = self.seed;
        out.cascade = self.config.cascade;
        out.swap_policy = self.config.swap_policy;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}
