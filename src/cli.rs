//! Command-line interface for vanishing_games.

use clap::{Parser, Subcommand};

/// Vanishing Games - tic-tac-toe where the oldest piece vanishes
#[derive(Parser, Debug)]
#[command(name = "vanishing_games")]
#[command(about = "Vanishing-piece tic-tac-toe in the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play in the terminal UI
    Play {
        /// Path to advisor config (defaults are used if missing)
        #[arg(short, long, default_value = "advisor.toml")]
        config: std::path::PathBuf,

        /// Never contact an LLM; the opponent uses the heuristic only
        #[arg(long)]
        offline: bool,

        /// Log file (the terminal is owned by the UI)
        #[arg(long, default_value = "vanishing_games.log")]
        log_file: std::path::PathBuf,
    },
}
