//! Playback: replays a [`TurnOutcome`] as timed animation frames.
//!
//! The controller applies a whole turn synchronously; by the time the view sees
//! it the board already shows the final grid. Playback rebuilds the intermediate
//! grids by rewinding the final grid through each step's [`ResolutionResult`]
//! (newest first), then walks a list of phases:
//!
//! - swap (two tiles trade places)
//! - per cascade step: remove (matched tiles flash), then fall (survivors and
//!   refills slide down to their final rows)
//!
//! A reverted swap plays the swap twice, forward then back.

use crate::core::{ResolutionResult, TurnOutcome};
use crate::types::{
    Position, TileKind, FALL_ANIMATION_MS, REMOVE_ANIMATION_MS, SWAP_ANIMATION_MS,
};

/// Flash period of removed tiles during the remove phase.
const FLASH_MS: u32 = 75;

type Grid = Vec<TileKind>;

/// A tile sliding down during a fall phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fall {
    kind: TileKind,
    col: usize,
    /// Negative for refills entering from above the board.
    from_row: isize,
    to_row: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Phase {
    Swap {
        from: usize,
        to: usize,
        a: Position,
        b: Position,
    },
    Remove {
        grid: usize,
        removed: Vec<Position>,
    },
    Fall {
        grid: usize,
        falls: Vec<Fall>,
    },
}

impl Phase {
    fn duration_ms(&self) -> u32 {
        match self {
            Phase::Swap { .. } => SWAP_ANIMATION_MS,
            Phase::Remove { .. } => REMOVE_ANIMATION_MS,
            Phase::Fall { .. } => FALL_ANIMATION_MS,
        }
    }
}

/// What the view should draw for the current instant of a playback.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaybackFrame {
    pub size: usize,
    /// Row-major, `None` where nothing is drawn
    pub cells: Vec<Option<TileKind>>,
    /// Cells taking part in the current phase
    pub marked: Vec<bool>,
}

impl PlaybackFrame {
    pub fn kind_at(&self, pos: Position) -> Option<TileKind> {
        if !pos.in_bounds(self.size) {
            return None;
        }
        self.cells.get(pos.row * self.size + pos.col).copied().flatten()
    }

    pub fn is_marked(&self, pos: Position) -> bool {
        pos.in_bounds(self.size) && self.marked[pos.row * self.size + pos.col]
    }

    fn reset(&mut self, size: usize) {
        self.size = size;
        self.cells.clear();
        self.cells.resize(size * size, None);
        self.marked.clear();
        self.marked.resize(size * size, false);
    }
}

#[derive(Debug, Clone)]
pub struct Playback {
    size: usize,
    /// Grids referenced by phases; index 0 is the board before the swap.
    grids: Vec<Grid>,
    phases: Vec<Phase>,
    current: usize,
    elapsed_ms: u32,
}

impl Playback {
    /// Build a playback for `outcome`, where `final_tiles` is the row-major
    /// grid after the turn (for example `GameSnapshot::tiles`).
    pub fn new(outcome: &TurnOutcome, final_tiles: &[TileKind], size: usize) -> Self {
        let final_grid: Grid = final_tiles.to_vec();

        // Grid before each step, newest step first while rewinding.
        let mut befores = Vec::with_capacity(outcome.steps.len());
        let mut grid = final_grid.clone();
        for step in outcome.steps.iter().rev() {
            grid = rewind(&grid, &step.resolution, size);
            befores.push(grid.clone());
        }
        befores.reverse();

        let swapped = match befores.first() {
            Some(g) => g.clone(),
            None if outcome.reverted => swap_cells(&final_grid, outcome.a, outcome.b, size),
            None => final_grid.clone(),
        };
        let original = swap_cells(&swapped, outcome.a, outcome.b, size);

        let mut grids = vec![original, swapped];
        let mut phases = vec![Phase::Swap {
            from: 0,
            to: 1,
            a: outcome.a,
            b: outcome.b,
        }];

        if outcome.reverted {
            phases.push(Phase::Swap {
                from: 1,
                to: 0,
                a: outcome.a,
                b: outcome.b,
            });
        }

        for (i, step) in outcome.steps.iter().enumerate() {
            let after = match befores.get(i + 1) {
                Some(g) => g.clone(),
                None => final_grid.clone(),
            };
            let before_idx = if i == 0 { 1 } else { grids.len() - 1 };

            phases.push(Phase::Remove {
                grid: before_idx,
                removed: step.resolution.removed.iter().map(|t| t.position).collect(),
            });

            grids.push(after);
            phases.push(Phase::Fall {
                grid: grids.len() - 1,
                falls: falls(&grids[grids.len() - 1], &step.resolution, size),
            });
        }

        Self {
            size,
            grids,
            phases,
            current: 0,
            elapsed_ms: 0,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.current >= self.phases.len()
    }

    pub fn phase_count(&self) -> usize {
        self.phases.len()
    }

    /// Total length of the animation.
    pub fn duration_ms(&self) -> u32 {
        self.phases.iter().map(Phase::duration_ms).sum()
    }

    /// Board as it was before the swap.
    pub fn start_grid(&self) -> &[TileKind] {
        &self.grids[0]
    }

    /// Advance by `dt_ms`. Returns true while still playing.
    pub fn tick(&mut self, dt_ms: u32) -> bool {
        self.elapsed_ms = self.elapsed_ms.saturating_add(dt_ms);
        while let Some(phase) = self.phases.get(self.current) {
            let d = phase.duration_ms();
            if self.elapsed_ms < d {
                break;
            }
            self.elapsed_ms -= d;
            self.current += 1;
        }
        if self.is_finished() {
            self.elapsed_ms = 0;
        }
        !self.is_finished()
    }

    /// Jump to the end.
    pub fn finish(&mut self) {
        self.current = self.phases.len();
        self.elapsed_ms = 0;
    }

    pub fn frame(&self) -> PlaybackFrame {
        let mut frame = PlaybackFrame::default();
        self.frame_into(&mut frame);
        frame
    }

    /// Fill `out` with the current frame. A finished playback shows the final grid.
    pub fn frame_into(&self, out: &mut PlaybackFrame) {
        out.reset(self.size);
        let n = self.size;

        let Some(phase) = self.phases.get(self.current) else {
            if let Some(last) = self.grids.last() {
                fill(out, last);
            }
            return;
        };

        let progress = self.elapsed_ms as f32 / phase.duration_ms().max(1) as f32;
        match phase {
            Phase::Swap { from, to, a, b } => {
                let grid = if progress < 0.5 { from } else { to };
                fill(out, &self.grids[*grid]);
                for p in [a, b] {
                    if p.in_bounds(n) {
                        out.marked[p.row * n + p.col] = true;
                    }
                }
            }
            Phase::Remove { grid, removed } => {
                fill(out, &self.grids[*grid]);
                let visible = (self.elapsed_ms / FLASH_MS) % 2 == 0;
                for p in removed.iter().filter(|p| p.in_bounds(n)) {
                    let i = p.row * n + p.col;
                    out.marked[i] = true;
                    if !visible {
                        out.cells[i] = None;
                    }
                }
            }
            Phase::Fall { grid, falls } => {
                fill(out, &self.grids[*grid]);
                for f in falls {
                    out.cells[f.to_row * n + f.col] = None;
                }
                let remaining = 1.0 - progress.clamp(0.0, 1.0);
                for f in falls {
                    let dist = f.to_row as f32 - f.from_row as f32;
                    let row = (f.to_row as f32 - dist * remaining).round();
                    if row < 0.0 {
                        continue;
                    }
                    let i = row as usize * n + f.col;
                    out.cells[i] = Some(f.kind);
                    out.marked[i] = true;
                }
            }
        }
    }
}

fn fill(out: &mut PlaybackFrame, grid: &[TileKind]) {
    for (cell, kind) in out.cells.iter_mut().zip(grid) {
        *cell = Some(*kind);
    }
}

fn swap_cells(grid: &[TileKind], a: Position, b: Position, size: usize) -> Grid {
    let mut out = grid.to_vec();
    if a.in_bounds(size) && b.in_bounds(size) {
        out.swap(a.row * size + a.col, b.row * size + b.col);
    }
    out
}

/// Undo one resolution: lift moved tiles back to their source rows and put
/// removed tiles back in place. Refill cells end up covered by one of the two.
fn rewind(after: &[TileKind], resolution: &ResolutionResult, size: usize) -> Grid {
    let mut before = after.to_vec();
    let lifted: Vec<(Position, TileKind)> = resolution
        .moved
        .iter()
        .filter(|m| m.to.in_bounds(size))
        .map(|m| (m.from, after[m.to.row * size + m.to.col]))
        .collect();

    for (from, kind) in lifted {
        if from.in_bounds(size) {
            before[from.row * size + from.col] = kind;
        }
    }
    for tile in &resolution.removed {
        let p = tile.position;
        if p.in_bounds(size) {
            before[p.row * size + p.col] = tile.kind;
        }
    }
    before
}

/// Slides for one fall phase: moved survivors plus refills dropping in from
/// above, stacked in the order they land.
fn falls(after: &[TileKind], resolution: &ResolutionResult, size: usize) -> Vec<Fall> {
    let mut out: Vec<Fall> = resolution
        .moved
        .iter()
        .filter(|m| m.to.in_bounds(size))
        .map(|m| Fall {
            kind: after[m.to.row * size + m.to.col],
            col: m.to.col,
            from_row: m.from.row as isize,
            to_row: m.to.row,
        })
        .collect();

    let mut spawned = vec![0isize; size];
    for t in &resolution.spawned {
        if t.position.col < size {
            spawned[t.position.col] += 1;
        }
    }
    for t in resolution.spawned.iter().filter(|t| t.position.in_bounds(size)) {
        out.push(Fall {
            kind: t.kind,
            col: t.position.col,
            from_row: t.position.row as isize - spawned[t.position.col],
            to_row: t.position.row,
        });
    }
    out
}
