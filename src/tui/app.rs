//! Application state and logic.

use super::input::{Action, InputState};
use crate::controller::GameController;
use crossterm::event::KeyCode;
use std::future::Future;
use tracing::{debug, info, warn};
use vanishing_tictactoe::{Phase, Transition};

/// Main application state.
#[derive(Debug)]
pub struct App {
    controller: GameController,
    input: InputState,
    notice: Option<String>,
    should_quit: bool,
}

impl App {
    /// Creates a new application.
    pub fn new(controller: GameController) -> Self {
        Self {
            controller,
            input: InputState::default(),
            notice: None,
            should_quit: false,
        }
    }

    /// The controller being displayed.
    pub fn controller(&self) -> &GameController {
        &self.controller
    }

    /// Current highlight state.
    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Short message about the last rejected input, if any.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// True once the user asked to leave.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Handles one key press.
    pub fn on_key(&mut self, key: KeyCode) {
        match self.input.on_key(self.controller.phase(), key) {
            Action::Event(event) => {
                self.notice = None;
                match self.controller.handle(event) {
                    Ok(Transition::Exit) => {
                        info!("Exit selected from menu");
                        self.should_quit = true;
                    }
                    Ok(Transition::Entered(Phase::Playing)) => {
                        self.input = InputState {
                            menu_index: self.input.menu_index,
                            ..InputState::default()
                        };
                    }
                    Ok(transition) => debug!(?transition, "Event applied"),
                    Err(e) => {
                        debug!(error = %e, "Move rejected");
                        self.notice = Some(e.to_string());
                    }
                }
            }
            Action::Quit => {
                info!("Quit requested");
                self.should_quit = true;
            }
            Action::Navigate | Action::None => {}
        }
    }

    /// Lets the computer take its pending turns.
    pub async fn tick(&mut self) {
        if !self.controller.awaiting_opponent() {
            return;
        }
        if let Err(e) = self.controller.respond().await {
            warn!(error = %e, "Opponent move rejected");
            self.notice = Some(format!("Opponent error: {}", e));
        }
    }

    /// Like [`App::tick`], but gives up as soon as `quit` resolves.
    ///
    /// A cancelled turn stays pending.
    pub async fn tick_until<F>(&mut self, quit: F)
    where
        F: Future<Output = ()>,
    {
        let quit_first = tokio::select! {
            () = self.tick() => false,
            () = quit => true,
        };
        if quit_first {
            info!("Quit requested while opponent was thinking");
            self.should_quit = true;
        }
    }
}
