//! Rule engine for vanishing tic-tac-toe.
//!
//! Each side keeps at most [`MAX_LIVE_PIECES`] on the board. Placing one
//! more first removes that side's oldest piece, then places the new one,
//! then scans for a completed line.

use super::action::{Move, MoveError};
use super::pieces::{MAX_LIVE_PIECES, PieceQueue};
use super::rules;
use super::{Board, GameStatus, Mark, Position, Square};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// A single game: board, both piece queues, turn, and status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    board: Board,
    x_pieces: PieceQueue,
    o_pieces: PieceQueue,
    to_move: Mark,
    status: GameStatus,
    history: Vec<Move>,
}

impl Game {
    /// Creates a new game with X to move.
    #[instrument]
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            x_pieces: PieceQueue::new(),
            o_pieces: PieceQueue::new(),
            to_move: Mark::X,
            status: GameStatus::InProgress,
            history: Vec::new(),
        }
    }

    /// Builds an in-progress game from a board layout.
    ///
    /// Piece age is not recorded on a bare board, so each queue is filled in
    /// row-major order: the first occupied square scanned is the oldest.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::InvalidSetup`] if either mark holds more than
    /// [`MAX_LIVE_PIECES`] squares or the layout already contains a line.
    #[instrument(skip(board))]
    pub fn from_board(board: Board, to_move: Mark) -> Result<Self, MoveError> {
        for mark in [Mark::X, Mark::O] {
            let count = board.count(mark);
            if count > MAX_LIVE_PIECES {
                return Err(MoveError::InvalidSetup(format!(
                    "{} holds {} squares, limit is {}",
                    mark, count, MAX_LIVE_PIECES
                )));
            }
        }
        if let Some(winner) = rules::check_winner(&board) {
            return Err(MoveError::InvalidSetup(format!(
                "{} already has three in a row",
                winner
            )));
        }

        let mut x_pieces = PieceQueue::new();
        let mut o_pieces = PieceQueue::new();
        for pos in Position::ALL {
            match board.get(pos) {
                Square::Occupied(Mark::X) => x_pieces.push(pos),
                Square::Occupied(Mark::O) => o_pieces.push(pos),
                Square::Empty => {}
            }
        }

        // At most six pieces fit under the cap, so the board cannot be full.
        Ok(Self {
            board,
            x_pieces,
            o_pieces,
            to_move,
            status: GameStatus::InProgress,
            history: Vec::new(),
        })
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the mark whose turn it is.
    ///
    /// After a game ends this stays on the mark that made the final move.
    pub fn to_move(&self) -> Mark {
        self.to_move
    }

    /// Returns the game status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Returns true once the game has ended.
    pub fn is_over(&self) -> bool {
        self.status.is_over()
    }

    /// Returns the move history.
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Returns the live pieces of `mark`, oldest first.
    pub fn pieces(&self, mark: Mark) -> &PieceQueue {
        match mark {
            Mark::X => &self.x_pieces,
            Mark::O => &self.o_pieces,
        }
    }

    fn pieces_mut(&mut self, mark: Mark) -> &mut PieceQueue {
        match mark {
            Mark::X => &mut self.x_pieces,
            Mark::O => &mut self.o_pieces,
        }
    }

    /// Empty squares in row-major order.
    pub fn valid_moves(&self) -> Vec<Position> {
        if self.is_over() {
            return Vec::new();
        }
        self.board.empty_positions()
    }

    /// The completed line, if the game was won.
    pub fn winning_line(&self) -> Option<[Position; 3]> {
        rules::winning_line(&self.board).map(|(_, line)| line)
    }

    /// Plays the side to move at raw board coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::OutOfRange`] for coordinates outside `0..3`, and
    /// otherwise the errors of [`Game::place`].
    #[instrument(skip(self), fields(to_move = %self.to_move))]
    pub fn play(&mut self, row: usize, col: usize) -> Result<GameStatus, MoveError> {
        if self.is_over() {
            return Err(MoveError::GameOver);
        }
        let pos = Position::from_row_col(row, col).ok_or(MoveError::OutOfRange { row, col })?;
        self.place(pos)
    }

    /// Places the side to move's mark at `pos`.
    ///
    /// If the mover already holds three pieces, the oldest is cleared first.
    /// The eviction is unconditional even when the freed square reopens a
    /// line the opponent had been blocked from.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::GameOver`] once the game has ended and
    /// [`MoveError::SquareOccupied`] if `pos` holds a piece. Neither
    /// mutates the game.
    #[instrument(skip(self), fields(to_move = %self.to_move))]
    pub fn place(&mut self, pos: Position) -> Result<GameStatus, MoveError> {
        if self.is_over() {
            return Err(MoveError::GameOver);
        }
        if !self.board.is_empty(pos) {
            return Err(MoveError::SquareOccupied(pos));
        }

        let mark = self.to_move;
        let evicted = if self.pieces(mark).is_full() {
            let old = self.pieces_mut(mark).pop_oldest();
            if let Some(old) = old {
                debug!(mark = %mark, evicted = %old, "Oldest piece vanishes");
                self.board.clear(old);
            }
            old
        } else {
            None
        };

        self.board.place(pos, mark)?;
        self.pieces_mut(mark).push(pos);
        let action = Move::new(mark, pos, evicted);
        self.history.push(action);
        debug!(action = %action, "Move applied");

        self.status = if let Some(winner) = rules::check_winner(&self.board) {
            info!(winner = %winner, moves = self.history.len(), "Game won");
            GameStatus::Won(winner)
        } else if rules::is_draw(&self.board) {
            info!(moves = self.history.len(), "Game drawn");
            GameStatus::Draw
        } else {
            self.to_move = mark.opponent();
            GameStatus::InProgress
        };

        Ok(self.status)
    }

    /// Checks whether `mark` placing at `pos` right now would complete a line.
    ///
    /// The probe applies `mark`'s eviction on a scratch board, so a line that
    /// relies on the piece about to vanish does not count. The game itself
    /// is never touched.
    pub fn would_win(&self, pos: Position, mark: Mark) -> bool {
        if !self.board.is_empty(pos) {
            return false;
        }
        let mut scratch = self.board.clone();
        let mut pieces = self.pieces(mark).clone();
        if pieces.is_full() {
            if let Some(old) = pieces.pop_oldest() {
                scratch.clear(old);
            }
        }
        scratch.set(pos, Square::Occupied(mark));
        rules::check_winner(&scratch) == Some(mark)
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
