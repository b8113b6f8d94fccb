//! Collision rules
//!
//! Every spawn, move, rotation and placement decision goes through
//! [`collides`]. It only reads the board.

use crate::board::Board;
use crate::piece::Piece;

/// True if the piece shifted by (dx, dy) would leave the board or overlap a
/// filled cell.
pub fn collides(piece: &Piece, board: &Board, dx: i32, dy: i32) -> bool {
    piece
        .block_positions()
        .iter()
        .any(|&(x, y)| !board.is_cell_free(x + dx, y + dy))
}

/// Lowest legal resting position for the piece, found by probing downward
pub fn drop_distance(piece: &Piece, board: &Board) -> i32 {
    let mut distance = 0;
    while !collides(piece, board, 0, distance + 1) {
        distance += 1;
    }
    distance
}
