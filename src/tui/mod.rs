//! Terminal UI for vanishing tic-tac-toe.

mod app;
mod input;
mod ui;

pub use app::App;
pub use input::{Action, EndItem, InputState, MenuItem, move_cursor};
pub use ui::{result_label, turn_label};

use crate::controller::GameController;
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use input::is_quit_key;
use std::io;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Runs the terminal UI until the user quits.
pub async fn run_tui(controller: GameController) -> Result<()> {
    info!("Starting vanishing tic-tac-toe TUI");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(controller);
    let res = run_app(&mut terminal, &mut app).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = ?err, "TUI loop error");
    }
    info!("TUI exited");
    res
}

#[instrument(skip_all)]
async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::draw(frame, app))?;

        if app.controller().awaiting_opponent() {
            // "AI is thinking..." is on screen while the opponent decides.
            app.tick_until(wait_for_quit_key()).await;
            if app.should_quit() {
                return Ok(());
            }
            continue;
        }

        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    debug!(code = ?key.code, "Key pressed");
                    app.on_key(key.code);
                }
            }
        }

        if app.should_quit() {
            return Ok(());
        }
    }
}

/// Resolves once a quit key is pressed; other keys are dropped.
async fn wait_for_quit_key() {
    loop {
        match poll_quit_key() {
            Ok(true) => return,
            Ok(false) => tokio::time::sleep(POLL_INTERVAL).await,
            Err(e) => {
                warn!(error = %e, "Terminal input unavailable while opponent is thinking");
                return std::future::pending().await;
            }
        }
    }
}

fn poll_quit_key() -> io::Result<bool> {
    if !event::poll(Duration::ZERO)? {
        return Ok(false);
    }
    Ok(match event::read()? {
        Event::Key(key) => key.kind == KeyEventKind::Press && is_quit_key(key.code),
        _ => false,
    })
}
