//! External move advisor backed by an LLM.
//!
//! The advisor receives the board as text plus a rules prompt and answers
//! with a JSON cell such as `{"row": 0, "col": 2}`. Replies are free text;
//! the first `{...}` object in them is taken as the answer.

use crate::llm_client::{CompletionRequest, LlmClient};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use vanishing_tictactoe::{Board, Mark, Position, Square};

/// Rules prompt sent with every request.
pub const RULES: &str = "\
You are playing a special Tic Tac Toe variant.

Important rules:
1. Each player can only have 3 pieces on the board at once.
2. When a player places a 4th piece, their oldest piece is removed.
3. You MUST choose an EMPTY space (marked with _).
4. Do NOT choose spaces that already contain X or O.

Your task:
- Return the best move as JSON: { \"row\": <0-2>, \"col\": <0-2> }
- Only return the JSON. No extra explanation.
- If you see a winning move, take it.
- If you can't win immediately, block the opponent's winning move.
- If neither is possible, prefer the center, then corners, then edges.
- Always check that your chosen space is empty before returning.";

/// A cell suggested by the advisor, not yet validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisedCell {
    /// Suggested row.
    pub row: i64,
    /// Suggested column.
    pub col: i64,
}

impl AdvisedCell {
    /// The board position, if the cell is on the board.
    pub fn position(&self) -> Option<Position> {
        let row = usize::try_from(self.row).ok()?;
        let col = usize::try_from(self.col).ok()?;
        Position::from_row_col(row, col)
    }
}

/// Why an advisor suggestion could not be used.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum AdvisorError {
    /// The service could not be reached or refused the request.
    #[display("Advisor unavailable: {}", _0)]
    Unavailable(String),
    /// No reply arrived before the deadline.
    #[display("Advisor timed out after {:?}", _0)]
    Timeout(Duration),
    /// The reply held no usable `{"row", "col"}` object.
    #[display("Malformed advisor reply: {}", _0)]
    MalformedResponse(String),
    /// The suggested cell is off the board or not empty.
    #[display("Advisor chose illegal cell ({}, {})", row, col)]
    IllegalCell {
        /// Suggested row.
        row: i64,
        /// Suggested column.
        col: i64,
    },
}

impl std::error::Error for AdvisorError {}

/// Something that can suggest a move for `mark`.
#[async_trait::async_trait]
pub trait MoveAdvisor: Send + Sync {
    /// Asks for a move on `board` given the `rules` prompt.
    async fn request_move(
        &self,
        board: &Board,
        mark: Mark,
        rules: &str,
    ) -> Result<AdvisedCell, AdvisorError>;

    /// Display name used in logs and the status line.
    fn name(&self) -> &str;
}

/// Renders the board as three rows of `X`, `O` or `_`.
pub fn board_grid(board: &Board) -> String {
    board
        .squares()
        .chunks(3)
        .map(|row| {
            row.iter()
                .map(|square| match square {
                    Square::Empty => "_".to_string(),
                    Square::Occupied(mark) => mark.to_string(),
                })
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Extracts the first `{...}` object from a free-text reply.
#[instrument(skip(text), fields(len = text.len()))]
pub fn parse_reply(text: &str) -> Result<AdvisedCell, AdvisorError> {
    let start = text
        .find('{')
        .ok_or_else(|| AdvisorError::MalformedResponse("no JSON object in reply".to_string()))?;
    let end = text[start..]
        .find('}')
        .map(|offset| start + offset)
        .ok_or_else(|| AdvisorError::MalformedResponse("unterminated JSON object".to_string()))?;

    let object = &text[start..=end];
    debug!(object, "Parsing advisor JSON");
    serde_json::from_str(object).map_err(|e| AdvisorError::MalformedResponse(e.to_string()))
}

/// Advisor that asks an LLM for moves.
#[derive(Debug, Clone)]
pub struct LlmAdvisor {
    name: String,
    client: LlmClient,
}

impl LlmAdvisor {
    /// Wraps an LLM client.
    pub fn new(client: LlmClient) -> Self {
        let name = format!("{} ({})", client.config().model(), client.config().provider());
        info!(advisor = %name, "Creating LLM advisor");
        Self { name, client }
    }
}

#[async_trait::async_trait]
impl MoveAdvisor for LlmAdvisor {
    #[instrument(skip(self, board, rules), fields(advisor = %self.name))]
    async fn request_move(
        &self,
        board: &Board,
        mark: Mark,
        rules: &str,
    ) -> Result<AdvisedCell, AdvisorError> {
        let prompt = format!(
            "Here is the current Tic Tac Toe board (X, O, or _ for empty):\n{}\n\n\
             You are '{}'. It's your turn.\n\n\
             Remember: Only select positions marked with _ in the board representation.",
            board_grid(board),
            mark
        );

        let request = CompletionRequest::new(rules, prompt);
        let reply = self.client.complete(&request).await.map_err(|e| {
            warn!(error = %e, "LLM request failed");
            AdvisorError::Unavailable(e.message)
        })?;
        debug!(reply = %reply, "Advisor replied");
        parse_reply(&reply)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
