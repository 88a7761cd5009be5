//! Computer opponent: the heuristic, or an advisor that falls back to it.

use crate::advisor::{AdvisorError, MoveAdvisor, RULES};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use vanishing_tictactoe::{Game, HeuristicStrategy, Mark, MoveSelector, Position};

/// How the computer picks its moves.
#[derive(Clone)]
pub enum OpponentStrategy {
    /// Deterministic rule of thumb, no I/O.
    Heuristic(HeuristicStrategy),
    /// Asks an external advisor, falling back to the heuristic on failure.
    Advisor(AdvisorStrategy),
}

impl OpponentStrategy {
    /// The offline opponent.
    pub fn heuristic() -> Self {
        Self::Heuristic(HeuristicStrategy::new())
    }

    /// An advisor-backed opponent with a reply deadline.
    pub fn advised(advisor: Arc<dyn MoveAdvisor>, timeout: Duration) -> Self {
        Self::Advisor(AdvisorStrategy::new(advisor, timeout))
    }

    /// Name shown to the player.
    pub fn label(&self) -> &str {
        match self {
            Self::Heuristic(heuristic) => heuristic.name(),
            Self::Advisor(advisor) => advisor.advisor.name(),
        }
    }

    /// True when moves may come from an external service.
    pub fn is_advised(&self) -> bool {
        matches!(self, Self::Advisor(_))
    }

    /// Picks a cell for `mark`; `None` only if the board has no empty cell.
    #[instrument(skip(self, game), fields(opponent = %self.label()))]
    pub async fn select_move(&self, game: &Game, mark: Mark) -> Option<Position> {
        match self {
            Self::Heuristic(heuristic) => heuristic.select_move(game, mark),
            Self::Advisor(advisor) => advisor.select_move(game, mark).await,
        }
    }
}

impl std::fmt::Debug for OpponentStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("OpponentStrategy").field(&self.label()).finish()
    }
}

/// Advisor with a deadline and a heuristic safety net.
#[derive(Clone)]
pub struct AdvisorStrategy {
    advisor: Arc<dyn MoveAdvisor>,
    timeout: Duration,
    fallback: HeuristicStrategy,
}

impl AdvisorStrategy {
    /// Wraps `advisor`, giving each request at most `timeout`.
    pub fn new(advisor: Arc<dyn MoveAdvisor>, timeout: Duration) -> Self {
        info!(advisor = advisor.name(), ?timeout, "Creating advisor strategy");
        Self {
            advisor,
            timeout,
            fallback: HeuristicStrategy::new(),
        }
    }

    /// Asks the advisor and checks its answer against the game.
    ///
    /// # Errors
    ///
    /// Any [`AdvisorError`]: the request failed, ran past the deadline,
    /// produced no readable cell, or named a cell that is not empty.
    #[instrument(skip(self, game), fields(advisor = self.advisor.name()))]
    pub async fn consult(&self, game: &Game, mark: Mark) -> Result<Position, AdvisorError> {
        let request = self.advisor.request_move(game.board(), mark, RULES);
        let cell = tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| AdvisorError::Timeout(self.timeout))??;

        let pos = cell
            .position()
            .filter(|pos| game.board().is_empty(*pos))
            .ok_or(AdvisorError::IllegalCell {
                row: cell.row,
                col: cell.col,
            })?;
        debug!(position = %pos, "Advisor move accepted");
        Ok(pos)
    }

    /// Advisor move, or the heuristic's if the advisor fails.
    pub async fn select_move(&self, game: &Game, mark: Mark) -> Option<Position> {
        match self.consult(game, mark).await {
            Ok(pos) => Some(pos),
            Err(e) => {
                warn!(error = %e, "Advisor failed, falling back to heuristic");
                self.fallback.select_move(game, mark)
            }
        }
    }
}
