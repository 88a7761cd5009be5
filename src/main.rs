//! Vanishing Games - terminal front end.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;
use vanishing_games::{AdvisorConfig, GameController, LlmAdvisor, LlmClient, OpponentStrategy};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Play {
            config,
            offline,
            log_file,
        } => run_play(&config, offline, &log_file).await,
    }
}

/// Runs the terminal game.
async fn run_play(config_path: &Path, offline: bool, log_file: &Path) -> Result<()> {
    initialize_file_tracing(log_file)?;

    let opponent = build_opponent(config_path, offline)?;
    info!(opponent = %opponent.label(), "Opponent ready");

    vanishing_games::tui::run_tui(GameController::new(opponent)).await
}

/// Picks the advisor-backed opponent when possible, the heuristic otherwise.
#[instrument(skip(config_path), fields(config_path = %config_path.display()))]
fn build_opponent(config_path: &Path, offline: bool) -> Result<OpponentStrategy> {
    if offline {
        info!("Offline mode, using heuristic opponent");
        return Ok(OpponentStrategy::heuristic());
    }

    let config = AdvisorConfig::load_or_default(config_path)?;
    if !*config.enabled() {
        info!("Advisor disabled in config");
        return Ok(OpponentStrategy::heuristic());
    }

    match config.create_llm_config() {
        Ok(llm_config) => {
            let advisor = LlmAdvisor::new(LlmClient::new(llm_config));
            Ok(OpponentStrategy::advised(Arc::new(advisor), config.timeout()))
        }
        Err(e) => {
            warn!(error = %e, "Advisor unavailable, using heuristic opponent");
            Ok(OpponentStrategy::heuristic())
        }
    }
}

/// Logs to a file so output never lands on the UI.
fn initialize_file_tracing(log_file: &Path) -> Result<()> {
    let file = std::fs::File::create(log_file)?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .try_init();
    Ok(())
}
