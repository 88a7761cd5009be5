//! Oldest-first queue of a mark's live pieces.

use super::Position;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Live pieces each mark may hold at once.
pub const MAX_LIVE_PIECES: usize = 3;

/// Positions currently holding one mark, oldest first.
///
/// The queue always mirrors the board: it contains exactly the squares
/// occupied by its mark and never more than [`MAX_LIVE_PIECES`] of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceQueue {
    positions: VecDeque<Position>,
}

impl PieceQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live pieces.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// True when the mark has no live pieces.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// True when the next placement must evict.
    pub fn is_full(&self) -> bool {
        self.positions.len() >= MAX_LIVE_PIECES
    }

    /// The oldest live piece.
    pub fn oldest(&self) -> Option<Position> {
        self.positions.front().copied()
    }

    /// The piece that will vanish on this mark's next placement.
    pub fn fading(&self) -> Option<Position> {
        if self.is_full() { self.oldest() } else { None }
    }

    /// Checks whether `pos` holds one of these pieces.
    pub fn contains(&self, pos: Position) -> bool {
        self.positions.contains(&pos)
    }

    /// Iterates oldest first.
    pub fn iter(&self) -> impl Iterator<Item = Position> + '_ {
        self.positions.iter().copied()
    }

    /// Copies the positions out, oldest first.
    pub fn to_vec(&self) -> Vec<Position> {
        self.iter().collect()
    }

    pub(crate) fn push(&mut self, pos: Position) {
        self.positions.push_back(pos);
    }

    pub(crate) fn pop_oldest(&mut self) -> Option<Position> {
        self.positions.pop_front()
    }
}
