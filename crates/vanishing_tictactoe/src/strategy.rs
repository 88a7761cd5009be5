//! Opponent move selection.

use super::{Game, Mark, Position};
use tracing::{debug, instrument};

/// Something that picks a cell for `mark` to play.
///
/// Selectors get the whole [`Game`] rather than just the board because the
/// piece queues decide which square vanishes on a placement, and that changes
/// which lines a move can complete.
pub trait MoveSelector {
    /// Picks an empty cell for `mark`, or `None` if there is nowhere to play.
    fn select_move(&self, game: &Game, mark: Mark) -> Option<Position>;

    /// Returns the selector's display name.
    fn name(&self) -> &str;
}

/// Deterministic rule-of-thumb opponent.
///
/// Priority order:
/// 1. a square that completes a line for `mark`
/// 2. a square that would complete a line for the opponent (block)
/// 3. the center
/// 4. the first empty corner: top-left, top-right, bottom-left, bottom-right
/// 5. the first empty square in row-major order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeuristicStrategy;

impl HeuristicStrategy {
    /// Creates the heuristic.
    pub fn new() -> Self {
        Self
    }
}

impl MoveSelector for HeuristicStrategy {
    #[instrument(skip(self, game), fields(to_move = %mark))]
    fn select_move(&self, game: &Game, mark: Mark) -> Option<Position> {
        let empty = game.board().empty_positions();

        if let Some(pos) = empty.iter().copied().find(|pos| game.would_win(*pos, mark)) {
            debug!(position = %pos, "Taking winning square");
            return Some(pos);
        }

        let opponent = mark.opponent();
        if let Some(pos) = empty
            .iter()
            .copied()
            .find(|pos| game.would_win(*pos, opponent))
        {
            debug!(position = %pos, "Blocking opponent line");
            return Some(pos);
        }

        let choice = if game.board().is_empty(Position::Center) {
            Some(Position::Center)
        } else {
            Position::CORNERS
                .iter()
                .copied()
                .find(|pos| game.board().is_empty(*pos))
                .or_else(|| empty.first().copied())
        };
        debug!(position = ?choice, "Positional choice");
        choice
    }

    fn name(&self) -> &str {
        "Heuristic"
    }
}
