//! Headless simulator: plays random adjacent swaps and prints one JSON line per turn.
//!
//! ```text
//! match3-sim --seed 7 --turns 200 --cascade > turns.jsonl
//! ```

use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use match3::core::{
    BoardConfig, CascadePolicy, GameConfig, GameState, RandomSource, SimpleRng, SwapPolicy,
};
use match3::types::{
    Position, DEFAULT_BOARD_SIZE, DEFAULT_MAX_CASCADE_ROUNDS, DEFAULT_PALETTE_SIZE,
};

#[derive(Parser, Debug)]
#[command(name = "match3-sim", about = "Play random swaps on a match-3 board")]
struct Args {
    /// Seed for the board (initial fill and refills)
    #[arg(long, default_value_t = 1)]
    seed: u32,

    /// Seed for choosing swaps; defaults to the board seed
    #[arg(long)]
    swap_seed: Option<u32>,

    /// Number of swaps to play
    #[arg(long, default_value_t = 100)]
    turns: u32,

    /// Board side length
    #[arg(long, default_value_t = DEFAULT_BOARD_SIZE)]
    size: usize,

    /// Number of tile kinds in play
    #[arg(long, default_value_t = DEFAULT_PALETTE_SIZE)]
    palette: usize,

    /// Resolve until the board is stable instead of once per swap
    #[arg(long)]
    cascade: bool,

    /// Swap back when a swap matches nothing
    #[arg(long)]
    revert: bool,

    /// Cap on resolve rounds per turn with --cascade
    #[arg(long, default_value_t = DEFAULT_MAX_CASCADE_ROUNDS)]
    max_rounds: u32,

    /// Log filter (tracing EnvFilter syntax), written to stderr
    #[arg(long, default_value = "warn")]
    log: String,
}

impl Args {
    fn game_config(&self) -> GameConfig {
        GameConfig {
            board: BoardConfig::new(self.size, self.palette),
            seed: self.seed,
            cascade: if self.cascade {
                CascadePolicy::UntilStable
            } else {
                CascadePolicy::Single
            },
            swap_policy: if self.revert {
                SwapPolicy::RevertUnmatched
            } else {
                SwapPolicy::KeepUnmatched
            },
            max_cascade_rounds: self.max_rounds,
        }
    }
}

/// A random cell and one of its right/down neighbours.
fn random_swap(rng: &mut impl RandomSource, size: usize) -> (Position, Position) {
    let a = Position::new(rng.next_index(size), rng.next_index(size));
    let b = match (rng.next_index(2), a.col + 1 < size, a.row + 1 < size) {
        (0, true, _) | (_, true, false) => Position::new(a.row, a.col + 1),
        _ => Position::new(a.row + 1, a.col),
    };
    // Bottom-right corner has no right/down neighbour.
    if b.in_bounds(size) {
        (a, b)
    } else {
        (Position::new(a.row, a.col - 1), a)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_new(&args.log).context("invalid --log filter")?)
        .with(fmt::layer().with_writer(io::stderr))
        .init();

    let config = args.game_config();
    config.validate().context("invalid board configuration")?;

    let mut game = GameState::new(config)?;
    let mut picker = SimpleRng::new(args.swap_seed.unwrap_or(args.seed));
    let mut out = BufWriter::new(io::stdout().lock());

    for turn in 0..args.turns {
        let (a, b) = random_swap(&mut picker, config.board.size);
        let outcome = game.try_swap(a, b)?;
        debug!(turn, depth = outcome.depth(), gained = outcome.score_gained, "turn");

        serde_json::to_writer(&mut out, &outcome)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;

    info!(
        turns = args.turns,
        score = game.score(),
        moves = game.moves(),
        turns_with_match = game.turns_with_match(),
        "simulation finished"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_swaps_are_adjacent_and_in_bounds() {
        let mut rng = SimpleRng::new(99);
        for _ in 0..500 {
            let (a, b) = random_swap(&mut rng, 4);
            assert!(a.in_bounds(4) && b.in_bounds(4));
            assert!(a.is_adjacent_to(b), "{a} {b}");
        }
    }

    #[test]
    fn cli_flags_map_to_policies() {
        let args = Args::parse_from(["match3-sim", "--cascade", "--revert", "--size", "5"]);
        let config = args.game_config();
        assert_eq!(config.cascade, CascadePolicy::UntilStable);
        assert_eq!(config.swap_policy, SwapPolicy::RevertUnmatched);
        assert_eq!(config.board.size, 5);
        assert!(config.validate().is_ok());
    }
}
