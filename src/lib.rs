//! Vanishing Games - host for vanishing-piece tic-tac-toe
//!
//! Wraps the pure [`vanishing_tictactoe`] engine with a computer opponent,
//! an optional LLM advisor, and a terminal UI.
//!
//! # Architecture
//!
//! - **Advisor**: [`MoveAdvisor`] seam with an LLM-backed [`LlmAdvisor`]
//! - **Opponent**: [`OpponentStrategy`], heuristic or advisor with fallback
//! - **Controller**: [`GameController`] owns the session and plays the opponent
//! - **Config**: [`AdvisorConfig`] from TOML plus environment API keys
//! - **TUI**: [`tui::run_tui`] renders snapshots with ratatui
//!
//! # Example
//!
//! ```no_run
//! use vanishing_games::{GameController, OpponentStrategy};
//! use vanishing_tictactoe::{Mode, SessionEvent};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let mut controller = GameController::new(OpponentStrategy::heuristic());
//! controller.dispatch(SessionEvent::SelectMode(Mode::PvOpponent)).await?;
//! controller
//!     .dispatch(SessionEvent::CellChosen { row: 0, col: 0 })
//!     .await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod advisor;
mod advisor_config;
mod controller;
mod llm_client;
mod opponent;
pub mod tui;

// Crate-level exports - Advisor
pub use advisor::{AdvisedCell, AdvisorError, LlmAdvisor, MoveAdvisor, RULES, board_grid, parse_reply};

// Crate-level exports - Configuration
pub use advisor_config::{ANTHROPIC_KEY_VAR, AdvisorConfig, ConfigError, OPENAI_KEY_VAR};

// Crate-level exports - Controller
pub use controller::GameController;

// Crate-level exports - LLM client
pub use llm_client::{CompletionRequest, LlmClient, LlmConfig, LlmError, LlmProvider};

// Crate-level exports - Opponent
pub use opponent::{AdvisorStrategy, OpponentStrategy};
