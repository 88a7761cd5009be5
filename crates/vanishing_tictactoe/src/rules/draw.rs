//! Draw detection.
//!
//! With both sides capped at three live pieces, at most six squares are ever
//! occupied through normal play, so a draw cannot arise organically. The
//! check is kept general so preset boards still resolve correctly.

use super::win::check_winner;
use crate::Board;

/// A full board with no completed line.
pub fn is_draw(board: &Board) -> bool {
    board.is_full() && check_winner(board).is_none()
}
