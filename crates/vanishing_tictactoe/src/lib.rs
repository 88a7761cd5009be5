//! Vanishing tic-tac-toe: pure game logic.
//!
//! Tic-tac-toe where each side keeps at most three pieces on the board.
//! Placing a fourth removes that side's oldest piece first.
//!
//! # Architecture
//!
//! - **Board model**: [`Board`], [`Square`], [`Position`], [`PieceQueue`]
//! - **Rule engine**: [`Game`] applies moves with eviction and detects lines
//! - **Session**: [`Session`] drives menu / playing / end-screen phases
//! - **Strategy**: [`MoveSelector`] and the deterministic [`HeuristicStrategy`]
//!
//! This crate performs no I/O. Hosts own a [`Session`], translate their
//! input into [`SessionEvent`]s, and render [`Snapshot`]s.
//!
//! # Example
//!
//! ```
//! use vanishing_tictactoe::{HeuristicStrategy, Mode, Session, SessionEvent};
//!
//! let mut session = Session::new();
//! let heuristic = HeuristicStrategy::new();
//! session.handle(SessionEvent::SelectMode(Mode::PvOpponent)).unwrap();
//! session
//!     .handle_with(SessionEvent::CellChosen { row: 0, col: 0 }, &heuristic)
//!     .unwrap();
//! // The heuristic answered in the center.
//! assert_eq!(session.game().history().len(), 2);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod game;
mod pieces;
mod position;
pub mod rules;
mod session;
mod strategy;
mod types;

pub use action::{Move, MoveError};
pub use game::Game;
pub use pieces::{MAX_LIVE_PIECES, PieceQueue};
pub use position::Position;
pub use session::{Mode, OPPONENT_MARK, Phase, Session, SessionEvent, Snapshot, Transition};
pub use strategy::{HeuristicStrategy, MoveSelector};
pub use types::{Board, GameStatus, Mark, Square};
