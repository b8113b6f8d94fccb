//! Tetromino definitions and shapes
//!
//! All 7 tetrominoes with their orientation matrices. Matrices are listed
//! top row first; a `1` marks an occupied cell. Orientation 0 is the spawn
//! orientation and each following entry is one clockwise turn.

use crate::piece::Piece;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// An orientation matrix: rows of 0/1 occupancy, top row first
pub type Matrix = &'static [&'static [u8]];

/// The 7 tetromino types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TetrominoType {
    I, // long bar
    O, // square
    T, // T-shape
    S, // S-shape
    Z, // Z-shape
    J, // J-shape
    L, // L-shape
}

const I_SHAPES: &[Matrix] = &[
    &[&[1, 1, 1, 1]],
    &[&[1], &[1], &[1], &[1]],
];

const O_SHAPES: &[Matrix] = &[&[&[1, 1], &[1, 1]]];

// .T.   T.   TTT   .T
// TTT   TT   .T.   TT
//       T.         .T
const T_SHAPES: &[Matrix] = &[
    &[&[0, 1, 0], &[1, 1, 1]],
    &[&[1, 0], &[1, 1], &[1, 0]],
    &[&[1, 1, 1], &[0, 1, 0]],
    &[&[0, 1], &[1, 1], &[0, 1]],
];

// .SS   S.
// SS.   SS
//       .S
const S_SHAPES: &[Matrix] = &[
    &[&[0, 1, 1], &[1, 1, 0]],
    &[&[1, 0], &[1, 1], &[0, 1]],
];

// ZZ.   .Z
// .ZZ   ZZ
//       Z.
const Z_SHAPES: &[Matrix] = &[
    &[&[1, 1, 0], &[0, 1, 1]],
    &[&[0, 1], &[1, 1], &[1, 0]],
];

const J_SHAPES: &[Matrix] = &[
    &[&[1, 0, 0], &[1, 1, 1]],
    &[&[1, 1], &[1, 0], &[1, 0]],
    &[&[1, 1, 1], &[0, 0, 1]],
    &[&[0, 1], &[0, 1], &[1, 1]],
];

const L_SHAPES: &[Matrix] = &[
    &[&[0, 0, 1], &[1, 1, 1]],
    &[&[1, 0], &[1, 0], &[1, 1]],
    &[&[1, 1, 1], &[1, 0, 0]],
    &[&[1, 1], &[0, 1], &[0, 1]],
];

impl TetrominoType {
    /// Get all tetromino types
    pub fn all() -> [TetrominoType; 7] {
        [
            TetrominoType::I,
            TetrominoType::O,
            TetrominoType::T,
            TetrominoType::S,
            TetrominoType::Z,
            TetrominoType::J,
            TetrominoType::L,
        ]
    }

    /// Ordered orientation matrices, spawn orientation first
    pub fn orientations(&self) -> &'static [Matrix] {
        match self {
            TetrominoType::I => I_SHAPES,
            TetrominoType::O => O_SHAPES,
            TetrominoType::T => T_SHAPES,
            TetrominoType::S => S_SHAPES,
            TetrominoType::Z => Z_SHAPES,
            TetrominoType::J => J_SHAPES,
            TetrominoType::L => L_SHAPES,
        }
    }

    /// Number of distinct orientations (1 for O, 2 for I/S/Z, 4 for T/J/L)
    pub fn orientation_count(&self) -> usize {
        self.orientations().len()
    }

    /// Matrix for an orientation index, wrapping around the orientation count
    pub fn shape(&self, orientation: usize) -> Matrix {
        let shapes = self.orientations();
        shapes[orientation % shapes.len()]
    }

    /// Single-letter tag used in board snapshots
    pub fn letter(&self) -> char {
        match self {
            TetrominoType::I => 'I',
            TetrominoType::O => 'O',
            TetrominoType::T => 'T',
            TetrominoType::S => 'S',
            TetrominoType::Z => 'Z',
            TetrominoType::J => 'J',
            TetrominoType::L => 'L',
        }
    }

    pub fn from_letter(letter: &str) -> Option<TetrominoType> {
        TetrominoType::all()
            .into_iter()
            .find(|kind| letter.len() == 1 && letter.starts_with(kind.letter()))
    }

    /// Create a piece of this type at the spawn position
    pub fn spawn(&self, board_width: usize) -> Piece {
        spawn(*self, board_width)
    }
}

/// Occupied (col, row) offsets of a matrix, relative to its top-left corner
pub fn cells(matrix: Matrix) -> impl Iterator<Item = (i32, i32)> {
    matrix.iter().enumerate().flat_map(|(row, line)| {
        line.iter()
            .enumerate()
            .filter(|&(_, &filled)| filled != 0)
            .map(move |(col, _)| (col as i32, row as i32))
    })
}

/// Width of a matrix in columns
pub fn matrix_width(matrix: Matrix) -> usize {
    matrix.iter().map(|row| row.len()).max().unwrap_or(0)
}

/// Spawn a piece horizontally centered on the top row, orientation 0
pub fn spawn(kind: TetrominoType, board_width: usize) -> Piece {
    let cols = matrix_width(kind.shape(0));
    let x = board_width.saturating_sub(cols) / 2;
    Piece::new(kind, 0, x as i32, 0)
}

/// Draw a kind uniformly at random. There is deliberately no bag here.
pub fn random_kind<R: Rng + ?Sized>(rng: &mut R) -> TetrominoType {
    TetrominoType::all()[rng.gen_range(0..7)]
}
