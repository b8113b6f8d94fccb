//! Rotation with a simplified wall kick
//!
//! If the rotated piece collides in place, a fixed list of horizontal
//! offsets is tried in order. There are no vertical kicks and no
//! per-orientation kick tables.

use crate::board::Board;
use crate::collision::collides;
use crate::piece::Piece;
use serde::{Deserialize, Serialize};

/// Horizontal offsets tried after the in-place rotation fails, in order
pub const KICK_OFFSETS: [i32; 4] = [-1, 1, -2, 2];

/// Direction for rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

/// Orientation index after one turn, wrapping around `count`
pub fn next_orientation(orientation: usize, count: usize, direction: RotationDirection) -> usize {
    match direction {
        RotationDirection::Clockwise => (orientation + 1) % count,
        RotationDirection::CounterClockwise => (orientation + count - 1) % count,
    }
}

/// Try to rotate, returning the rotated (and possibly kicked) piece
pub fn try_rotate(piece: &Piece, board: &Board, direction: RotationDirection) -> Option<Piece> {
    let count = piece.kind.orientation_count();
    let candidate = piece.with_orientation(next_orientation(piece.orientation, count, direction));

    if !collides(&candidate, board, 0, 0) {
        return Some(candidate);
    }

    KICK_OFFSETS
        .iter()
        .find(|&&dx| !collides(&candidate, board, dx, 0))
        .map(|&dx| candidate.translated(dx, 0))
}
