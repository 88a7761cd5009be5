//! Owner of one session and its computer opponent.

use crate::opponent::OpponentStrategy;
use tracing::{debug, info, instrument, warn};
use vanishing_tictactoe::{MoveError, Phase, Session, SessionEvent, Snapshot, Transition};

/// Drives a [`Session`], playing the opponent's turns between human inputs.
///
/// Every method takes `&mut self`, so moves are applied one at a time.
#[derive(Debug)]
pub struct GameController {
    session: Session,
    opponent: OpponentStrategy,
}

impl GameController {
    /// Creates a controller on the menu.
    #[instrument(skip(opponent), fields(opponent = %opponent.label()))]
    pub fn new(opponent: OpponentStrategy) -> Self {
        info!("Creating game controller");
        Self {
            session: Session::new(),
            opponent,
        }
    }

    /// The session being driven.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The computer opponent.
    pub fn opponent(&self) -> &OpponentStrategy {
        &self.opponent
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.session.phase()
    }

    /// True while the computer owes a move.
    pub fn awaiting_opponent(&self) -> bool {
        self.session.opponent_to_move()
    }

    /// Applies a human event without running the opponent.
    ///
    /// # Errors
    ///
    /// Returns the [`MoveError`] for a rejected cell; nothing changes.
    pub fn handle(&mut self, event: SessionEvent) -> Result<Transition, MoveError> {
        self.session.handle(event)
    }

    /// Plays every pending computer turn.
    ///
    /// Returns the last transition, or `None` if the computer had nothing to do.
    ///
    /// # Errors
    ///
    /// Propagates a [`MoveError`] if a chosen cell is rejected.
    #[instrument(skip(self), fields(opponent = %self.opponent.label()))]
    pub async fn respond(&mut self) -> Result<Option<Transition>, MoveError> {
        let mut last = None;
        while self.session.opponent_to_move() {
            let game = self.session.game();
            let mark = game.to_move();
            let Some(pos) = self.opponent.select_move(game, mark).await else {
                warn!(mark = %mark, "Opponent found no move");
                break;
            };
            debug!(position = %pos, "Opponent chose");
            last = Some(self.session.apply_opponent_move(pos)?);
        }
        Ok(last)
    }

    /// Applies a human event, then lets the computer answer.
    ///
    /// # Errors
    ///
    /// See [`GameController::handle`] and [`GameController::respond`].
    pub async fn dispatch(&mut self, event: SessionEvent) -> Result<Transition, MoveError> {
        let transition = self.handle(event)?;
        Ok(self.respond().await?.unwrap_or(transition))
    }

    /// Renderer view of the session.
    pub fn snapshot(&self) -> Snapshot {
        self.session.snapshot()
    }
}
