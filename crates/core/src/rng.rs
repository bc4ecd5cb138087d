//! RNG module - injectable random sources
//!
//! The board never reaches for ambient randomness. Every draw (initial fill and
//! refill) goes through a [`RandomSource`], so a seeded source makes a whole game
//! reproducible.
//!
//! Also provides a simple LCG for deterministic play and a scripted source for
//! tests that need exact refill kinds.

use match3_types::TileKind;

/// A source of uniformly distributed floats in `[0, 1)`.
pub trait RandomSource {
    /// Next value in `[0, 1)`
    fn next_f64(&mut self) -> f64;

    /// Uniform index in `[0, len)`. `len` must be non-zero.
    fn next_index(&mut self, len: usize) -> usize {
        let i = (self.next_f64() * len as f64) as usize;
        // Guard against sources that return values at or above 1.0.
        i.min(len - 1)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }
}

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod 2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Current internal state (reseeding from it continues the sequence)
    pub fn state(&self) -> u32 {
        self.state
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}

impl RandomSource for SimpleRng {
    fn next_f64(&mut self) -> f64 {
        // The low bits of an LCG are weak; the float uses all 32 bits scaled down.
        self.next_u32() as f64 / (u32::MAX as f64 + 1.0)
    }
}

/// Replays a fixed list of values, cycling when exhausted.
///
/// Handy for fixtures: [`SequenceRng::kinds`] yields exactly the given tile kinds
/// from a full six-kind palette.
#[derive(Debug, Clone)]
pub struct SequenceRng {
    values: Vec<f64>,
    cursor: usize,
}

impl SequenceRng {
    /// Values outside `[0, 1)` are clamped into range.
    pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
        let values: Vec<f64> = values
            .into_iter()
            .map(|v| v.clamp(0.0, 1.0 - f64::EPSILON))
            .collect();
        Self { values, cursor: 0 }
    }

    /// Source whose draws map to `kinds` when the palette is `palette_size` wide.
    pub fn kinds(kinds: &[TileKind], palette_size: usize) -> Self {
        let width = palette_size.max(1) as f64;
        Self::new(kinds.iter().map(|k| (k.index() as f64 + 0.5) / width))
    }

    /// Number of values drawn so far
    pub fn drawn(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for SequenceRng {
    fn next_f64(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let v = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(12345);

        for _ in 0..100 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_rng_different_seeds() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(54321);

        assert_ne!(rng1.next_u32(), rng2.next_u32());
    }

    #[test]
    fn test_zero_seed_is_remapped() {
        assert_eq!(SimpleRng::new(0), SimpleRng::new(1));
    }

    #[test]
    fn test_floats_stay_in_unit_interval() {
        let mut rng = SimpleRng::new(7);
        for _ in 0..10_000 {
            let v = rng.next_f64();
            assert!((0.0..1.0).contains(&v), "out of range: {v}");
        }
    }

    #[test]
    fn test_next_index_covers_range() {
        let mut rng = SimpleRng::new(99);
        let mut seen = [false; 6];
        for _ in 0..1_000 {
            seen[rng.next_index(6)] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_sequence_rng_maps_to_kinds() {
        let kinds = [TileKind::Green, TileKind::Orange, TileKind::Red];
        let mut rng = SequenceRng::kinds(&kinds, 6);
        for k in kinds {
            assert_eq!(rng.next_index(6), k.index());
        }
        // Cycles.
        assert_eq!(rng.next_index(6), TileKind::Green.index());
        assert_eq!(rng.drawn(), 4);
    }

    #[test]
    fn test_next_index_clamps_out_of_range_values() {
        struct One;
        impl RandomSource for One {
            fn next_f64(&mut self) -> f64 {
                1.0
            }
        }
        assert_eq!(One.next_index(4), 3);
    }

    #[test]
    fn test_mut_ref_forwards() {
        fn draw<R: RandomSource>(mut rng: R) -> f64 {
            rng.next_f64()
        }

        let mut a = SimpleRng::new(5);
        let mut b = SimpleRng::new(5);
        assert_eq!(draw(&mut a), b.next_f64());
        // The borrowed source advanced.
        assert_eq!(a, b);
    }
}
