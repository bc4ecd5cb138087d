//! Match detection - run-length segmentation of rows and columns
//!
//! Every call scans the whole board. Rows are scanned first (top to bottom,
//! each left to right), then columns (left to right, each top to bottom). A
//! maximal run of at least `match_min_length` equal kinds is emitted exactly
//! once. Horizontal and vertical scans are independent, so a tile at the
//! crossing of an L or T shape appears in two matches.

use serde::{Deserialize, Serialize};

use crate::board::{Board, Tile};
use crate::scoring::match_score;
use crate::types::{Orientation, Position, TileKind};

/// A maximal straight run of same-kind tiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    /// Tiles in scan order (left to right, or top to bottom)
    pub tiles: Vec<Tile>,
    pub orientation: Orientation,
    /// `tiles.len() * score_per_tile` of the board that produced it
    pub score: u32,
}

impl Match {
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Kind shared by every tile of the run
    pub fn kind(&self) -> Option<TileKind> {
        self.tiles.first().map(|t| t.kind)
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.tiles.iter().map(|t| t.position)
    }

    /// First and last cell of the run
    pub fn span(&self) -> Option<(Position, Position)> {
        Some((self.tiles.first()?.position, self.tiles.last()?.position))
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.positions().any(|p| p == pos)
    }
}

/// Cell `i` of line `line` along `orientation`
#[inline(always)]
fn line_cell(orientation: Orientation, line: usize, i: usize) -> Position {
    match orientation {
        Orientation::Horizontal => Position::new(line, i),
        Orientation::Vertical => Position::new(i, line),
    }
}

impl<R> Board<R> {
    /// All matches on the current board, in scan order. Pure query.
    pub fn detect_matches(&self) -> Vec<Match> {
        let mut out = Vec::new();
        for orientation in [Orientation::Horizontal, Orientation::Vertical] {
            for line in 0..self.size() {
                self.scan_line(orientation, line, &mut out);
            }
        }
        out
    }

    /// True if at least one match exists. Stops at the first run found.
    pub fn has_matches(&self) -> bool {
        let n = self.size();
        let min = self.config().match_min_length;
        [Orientation::Horizontal, Orientation::Vertical]
            .into_iter()
            .any(|o| (0..n).any(|line| self.runs(o, line).any(|(start, end)| end - start >= min)))
    }

    fn scan_line(&self, orientation: Orientation, line: usize, out: &mut Vec<Match>) {
        let min = self.config().match_min_length;
        let per_tile = self.config().score_per_tile;

        for (start, end) in self.runs(orientation, line) {
            if end - start < min {
                continue;
            }
            let tiles: Vec<Tile> = (start..end)
                .filter_map(|i| self.get(line_cell(orientation, line, i)).copied())
                .collect();
            if tiles.len() != end - start {
                // Only reachable with an empty cell, which public callers never see.
                continue;
            }
            let score = match_score(tiles.len(), per_tile);
            out.push(Match {
                tiles,
                orientation,
                score,
            });
        }
    }

    /// Maximal same-kind segments `[start, end)` along one line.
    fn runs(&self, orientation: Orientation, line: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        let n = self.size();
        let kind = move |i: usize| self.kind_at(line_cell(orientation, line, i));

        let mut start = 0;
        (1..=n).filter_map(move |i| {
            // A run ends at the end of the line or where the kind changes.
            if i == n || kind(i) != kind(start) {
                let run = (start, i);
                start = i;
                Some(run)
            } else {
                None
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BoardConfig;
    use crate::rng::SimpleRng;

    fn board(rows: &[&str]) -> Board {
        let n = rows.len();
        let rows: Vec<Vec<TileKind>> = rows
            .iter()
            .map(|r| {
                r.chars()
                    .map(|c| TileKind::from_str(&c.to_string()).unwrap())
                    .collect()
            })
            .collect();
        Board::from_kinds(BoardConfig::new(n, 6), &rows, SimpleRng::new(1)).unwrap()
    }

    #[test]
    fn test_runs_segment_a_line() {
        let b = board(&["RRGGGB", "BGRBYO", "GRBYOR", "RBYORG", "BYORGB", "YORGBY"]);
        let runs: Vec<_> = b.runs(Orientation::Horizontal, 0).collect();
        assert_eq!(runs, vec![(0, 2), (2, 5), (5, 6)]);
    }

    #[test]
    fn test_run_at_end_of_line_is_emitted() {
        let b = board(&["BGRRRR", "GBYOYB", "YOBGOY", "OYGBYO", "BGOYGB", "GBYOBG"]);
        let m = b.detect_matches();
        assert_eq!(m.len(), 1);
        assert_eq!(m[0].len(), 4);
        assert_eq!(
            m[0].span(),
            Some((Position::new(0, 2), Position::new(0, 5)))
        );
        assert_eq!(m[0].score, 400);
    }

    #[test]
    fn test_whole_line_is_a_single_match() {
        let b = board(&["GGGGGG", "BRYOBR", "RBOYRB", "BRYOBR", "RBOYRB", "BRYOBR"]);
        let m = b.detect_matches();
        assert_eq!(m.len(), 1);
        assert_eq!(m[0].len(), 6);
        assert_eq!(m[0].orientation, Orientation::Horizontal);
    }

    #[test]
    fn test_two_runs_on_one_line_stay_separate() {
        let b = board(&["RRRBBB", "BGYOGY", "GYOBYO", "YOBGOB", "OBGYBG", "BGYOGY"]);
        let m = b.detect_matches();
        assert_eq!(m.len(), 2);
        assert_eq!(m[0].kind(), Some(TileKind::Red));
        assert_eq!(m[1].kind(), Some(TileKind::Blue));
    }

    #[test]
    fn test_has_matches_agrees_with_detect() {
        let with = board(&["RRRB", "BGYO", "GYOB", "YOBG"]);
        let without = board(&["RRBG", "BGYO", "GYOB", "YOBG"]);
        assert!(with.has_matches());
        assert!(!without.has_matches());
        assert!(without.detect_matches().is_empty());
    }

    #[test]
    fn test_match_tiles_are_board_records() {
        let b = board(&["RRRB", "BGYO", "GYOB", "YOBG"]);
        let m = &b.detect_matches()[0];
        for t in &m.tiles {
            assert_eq!(b.get(t.position), Some(t));
        }
        assert!(m.contains(Position::new(0, 1)));
        assert!(!m.contains(Position::new(0, 3)));
    }

    #[test]
    fn test_longer_minimum_length() {
        let rows: Vec<Vec<TileKind>> = ["RRRB", "BGYO", "GYOB", "YOBG"]
            .iter()
            .map(|r| r.chars().map(|c| TileKind::from_str(&c.to_string()).unwrap()).collect())
            .collect();
        let cfg = BoardConfig {
            match_min_length: 4,
            ..BoardConfig::new(4, 6)
        };
        let b: Board = Board::from_kinds(cfg, &rows, SimpleRng::new(1)).unwrap();
        assert!(b.detect_matches().is_empty());
    }
}
