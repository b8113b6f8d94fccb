//! Piece generators
//!
//! The game draws kinds uniformly at random with no 7-bag, so droughts are
//! possible. Generators are injected into the game so tests and replays can
//! supply a fixed sequence instead.

use crate::tetromino::{TetrominoType, random_kind};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Source of the next piece kind
pub trait PieceGenerator {
    fn next_kind(&mut self) -> TetrominoType;
}

/// Uniform random kinds from a seedable RNG
#[derive(Debug, Clone)]
pub struct RandomPieces {
    rng: ChaCha8Rng,
}

impl Default for RandomPieces {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomPieces {
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl PieceGenerator for RandomPieces {
    fn next_kind(&mut self) -> TetrominoType {
        random_kind(&mut self.rng)
    }
}

/// Repeats a fixed list of kinds forever
#[derive(Debug, Clone)]
pub struct FixedSequence {
    kinds: Vec<TetrominoType>,
    index: usize,
}

impl FixedSequence {
    /// Returns None for an empty list
    pub fn new(kinds: Vec<TetrominoType>) -> Option<Self> {
        if kinds.is_empty() {
            return None;
        }
        Some(Self { kinds, index: 0 })
    }
}

impl PieceGenerator for FixedSequence {
    fn next_kind(&mut self) -> TetrominoType {
        let kind = self.kinds[self.index];
        self.index = (self.index + 1) % self.kinds.len();
        kind
    }
}
