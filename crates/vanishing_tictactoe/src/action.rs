//! First-class action types for vanishing tic-tac-toe.
//!
//! Moves are domain events, not side effects. Each one records the piece
//! it forced off the board, so a history fully explains the current layout.

use super::{Mark, Position};
use serde::{Deserialize, Serialize};

/// A placed piece and the piece it evicted, if the mover was already at the cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// The mark that moved.
    pub player: Mark,
    /// Where the new piece went.
    pub position: Position,
    /// The mover's oldest piece, removed by this placement.
    pub evicted: Option<Position>,
}

impl Move {
    /// Creates a new move record.
    pub fn new(player: Mark, position: Position, evicted: Option<Position>) -> Self {
        Self {
            player,
            position,
            evicted,
        }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.evicted {
            Some(old) => write!(
                f,
                "{} -> {} ({} vanished)",
                self.player,
                self.position.label(),
                old.label()
            ),
            None => write!(f, "{} -> {}", self.player, self.position.label()),
        }
    }
}

/// An illegal move. Rejected moves never mutate the game.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// The coordinates are outside the 3x3 board.
    #[display("Cell ({}, {}) is off the board", row, col)]
    OutOfRange {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
    },

    /// The square at the position is already occupied.
    #[display("Square {} is already occupied", _0)]
    SquareOccupied(Position),

    /// The game is already over.
    #[display("Game is already over")]
    GameOver,

    /// A preset board layout breaks the piece rules.
    #[display("Invalid setup: {}", _0)]
    InvalidSetup(String),
}

impl std::error::Error for MoveError {}
