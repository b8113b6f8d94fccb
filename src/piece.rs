//! Active falling piece value
//!
//! A `Piece` is never mutated in place. Every move or rotation produces a
//! new value and the caller keeps the old one until the new one is legal.

use crate::tetromino::{self, Matrix, TetrominoType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    /// The type of tetromino
    pub kind: TetrominoType,
    /// Index into the kind's orientation list
    pub orientation: usize,
    /// Board column of the matrix's left edge
    pub x: i32,
    /// Board row of the matrix's top edge, row 0 is the top of the board
    pub y: i32,
}

impl Piece {
    pub fn new(kind: TetrominoType, orientation: usize, x: i32, y: i32) -> Self {
        Self {
            kind,
            orientation: orientation % kind.orientation_count(),
            x,
            y,
        }
    }

    /// Matrix of the current orientation
    pub fn matrix(&self) -> Matrix {
        self.kind.shape(self.orientation)
    }

    /// Absolute (col, row) board positions of the 4 blocks
    pub fn block_positions(&self) -> [(i32, i32); 4] {
        let mut out = [(0, 0); 4];
        for (slot, (dx, dy)) in out.iter_mut().zip(tetromino::cells(self.matrix())) {
            *slot = (self.x + dx, self.y + dy);
        }
        out
    }

    /// Same piece shifted by (dx, dy)
    pub fn translated(&self, dx: i32, dy: i32) -> Piece {
        Piece {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Same piece at another orientation, wrapping around
    pub fn with_orientation(&self, orientation: usize) -> Piece {
        Piece {
            orientation: orientation % self.kind.orientation_count(),
            ..*self
        }
    }
}
