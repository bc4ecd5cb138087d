//! Board and game configuration.
//!
//! Defaults reproduce the classic rules: an 8x8 board, six colors, runs of
//! three, 100 points per matched tile, one resolution per swap.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{
    TileKind, DEFAULT_BOARD_SIZE, DEFAULT_MAX_CASCADE_ROUNDS, DEFAULT_PALETTE_SIZE,
    MATCH_MIN_LENGTH, MAX_BOARD_SIZE, MIN_BOARD_SIZE, MIN_PALETTE_SIZE, SCORE_PER_TILE,
};

/// Rules for a single board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub size: usize,
    pub palette_size: usize,
    pub match_min_length: usize,
    pub score_per_tile: u32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_BOARD_SIZE,
            palette_size: DEFAULT_PALETTE_SIZE,
            match_min_length: MATCH_MIN_LENGTH,
            score_per_tile: SCORE_PER_TILE,
        }
    }
}

impl BoardConfig {
    pub fn new(size: usize, palette_size: usize) -> Self {
        Self {
            size,
            palette_size,
            ..Self::default()
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.size < MIN_BOARD_SIZE {
            return Err(ConfigError::BoardTooSmall {
                size: self.size,
                min: MIN_BOARD_SIZE,
            });
        }
        if self.size > MAX_BOARD_SIZE {
            return Err(ConfigError::BoardTooLarge {
                size: self.size,
                max: MAX_BOARD_SIZE,
            });
        }
        if self.palette_size < MIN_PALETTE_SIZE {
            return Err(ConfigError::PaletteTooSmall {
                palette_size: self.palette_size,
                min: MIN_PALETTE_SIZE,
            });
        }
        if self.palette_size > TileKind::ALL.len() {
            return Err(ConfigError::PaletteTooLarge {
                palette_size: self.palette_size,
                max: TileKind::ALL.len(),
            });
        }
        if self.match_min_length < MATCH_MIN_LENGTH || self.match_min_length > self.size {
            return Err(ConfigError::MatchLengthOutOfRange {
                length: self.match_min_length,
                min: MATCH_MIN_LENGTH,
                size: self.size,
            });
        }
        if self.score_per_tile == 0 {
            return Err(ConfigError::ZeroScorePerTile);
        }
        Ok(())
    }

    /// Kinds in play for this board
    pub fn palette(&self) -> &'static [TileKind] {
        &TileKind::ALL[..self.palette_size.min(TileKind::ALL.len())]
    }
}

/// What a turn does after the first resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CascadePolicy {
    /// Resolve once per swap; matches formed by refill stay on the board.
    #[default]
    Single,
    /// Detect and resolve again until the board is stable.
    UntilStable,
}

/// What a turn does when the swap produced no match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SwapPolicy {
    /// Leave the swapped tiles in place.
    #[default]
    KeepUnmatched,
    /// Swap back, the move does not count.
    RevertUnmatched,
}

/// Top-level game configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub board: BoardConfig,
    pub seed: u32,
    pub cascade: CascadePolicy,
    pub swap_policy: SwapPolicy,
    pub max_cascade_rounds: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board: BoardConfig::default(),
            seed: 1,
            cascade: CascadePolicy::default(),
            swap_policy: SwapPolicy::default(),
            max_cascade_rounds: DEFAULT_MAX_CASCADE_ROUNDS,
        }
    }
}

impl GameConfig {
    /// Create from environment variables.
    ///
    /// - `MATCH3_SEED`: RNG seed (default 1)
    /// - `MATCH3_BOARD_SIZE`: side length (default 8)
    /// - `MATCH3_PALETTE_SIZE`: number of colors (default 6)
    /// - `MATCH3_CASCADE`: `1`/`true` resolves until stable
    /// - `MATCH3_REVERT`: `1`/`true` reverts swaps that match nothing
    ///
    /// Unparsable values fall back to defaults; call [`GameConfig::validate`] afterwards.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`GameConfig::from_env`] with an injectable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let parse = |key: &str| lookup(key).and_then(|s| s.trim().parse::<usize>().ok());
        let flag = |key: &str| {
            lookup(key)
                .map(|s| {
                    let s = s.trim();
                    s == "1" || s.eq_ignore_ascii_case("true")
                })
                .unwrap_or(false)
        };

        let seed = lookup("MATCH3_SEED")
            .and_then(|s| s.trim().parse::<u32>().ok())
            .unwrap_or(defaults.seed);
        let size = parse("MATCH3_BOARD_SIZE").unwrap_or(defaults.board.size);
        let palette_size = parse("MATCH3_PALETTE_SIZE").unwrap_or(defaults.board.palette_size);

        Self {
            board: BoardConfig {
                size,
                palette_size,
                ..defaults.board
            },
            seed,
            cascade: if flag("MATCH3_CASCADE") {
                CascadePolicy::UntilStable
            } else {
                CascadePolicy::Single
            },
            swap_policy: if flag("MATCH3_REVERT") {
                SwapPolicy::RevertUnmatched
            } else {
                SwapPolicy::KeepUnmatched
            },
            max_cascade_rounds: defaults.max_cascade_rounds,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.board.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(BoardConfig::default().validate().is_ok());
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_small_board_and_palette() {
        assert_eq!(
            BoardConfig::new(2, 6).validate(),
            Err(ConfigError::BoardTooSmall { size: 2, min: 3 })
        );
        assert_eq!(
            BoardConfig::new(8, 2).validate(),
            Err(ConfigError::PaletteTooSmall {
                palette_size: 2,
                min: 3
            })
        );
        assert_eq!(
            BoardConfig::new(8, 7).validate(),
            Err(ConfigError::PaletteTooLarge {
                palette_size: 7,
                max: 6
            })
        );
    }

    #[test]
    fn rejects_board_larger_than_max() {
        assert!(BoardConfig::new(MAX_BOARD_SIZE, 6).validate().is_ok());
        assert_eq!(
            BoardConfig::new(MAX_BOARD_SIZE + 1, 6).validate(),
            Err(ConfigError::BoardTooLarge {
                size: MAX_BOARD_SIZE + 1,
                max: MAX_BOARD_SIZE
            })
        );
        // Side length whose square does not fit in usize
        assert!(matches!(
            BoardConfig::new(1usize << 33, 3).validate(),
            Err(ConfigError::BoardTooLarge { .. })
        ));
    }

    #[test]
    fn from_lookup_oversized_board_fails_validation() {
        let cfg = GameConfig::from_lookup(|k| match k {
            "MATCH3_BOARD_SIZE" => Some("100000".into()),
            _ => None,
        });
        assert_eq!(cfg.board.size, 100_000);
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::BoardTooLarge { size: 100_000, .. })
        ));
    }

    #[test]
    fn rejects_match_length_longer_than_board() {
        let cfg = BoardConfig {
            match_min_length: 4,
            ..BoardConfig::new(3, 3)
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::MatchLengthOutOfRange { length: 4, .. })
        ));
    }

    #[test]
    fn palette_is_prefix_of_all_kinds() {
        let cfg = BoardConfig::new(8, 4);
        assert_eq!(
            cfg.palette(),
            &[TileKind::Red, TileKind::Blue, TileKind::Green, TileKind::Yellow]
        );
    }

    #[test]
    fn from_lookup_reads_overrides() {
        let cfg = GameConfig::from_lookup(|k| match k {
            "MATCH3_SEED" => Some("42".into()),
            "MATCH3_BOARD_SIZE" => Some("10".into()),
            "MATCH3_PALETTE_SIZE" => Some(" 5 ".into()),
            "MATCH3_CASCADE" => Some("TRUE".into()),
            "MATCH3_REVERT" => Some("1".into()),
            _ => None,
        });
        assert_eq!(cfg.seed, 42);
        assert_eq!(cfg.board.size, 10);
        assert_eq!(cfg.board.palette_size, 5);
        assert_eq!(cfg.cascade, CascadePolicy::UntilStable);
        assert_eq!(cfg.swap_policy, SwapPolicy::RevertUnmatched);
    }

    #[test]
    fn from_lookup_falls_back_on_garbage() {
        let cfg = GameConfig::from_lookup(|k| match k {
            "MATCH3_SEED" => Some("abc".into()),
            "MATCH3_BOARD_SIZE" => Some("-3".into()),
            "MATCH3_CASCADE" => Some("nope".into()),
            _ => None,
        });
        assert_eq!(cfg, GameConfig::default());
    }
}
