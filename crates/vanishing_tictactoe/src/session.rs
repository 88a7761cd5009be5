//! Session state machine: menu, playing, end screen.
//!
//! A [`Session`] is an ordinary owned value. The host feeds it
//! [`SessionEvent`]s one at a time; events that make no sense in the current
//! phase are ignored rather than rejected.

use super::action::{Move, MoveError};
use super::strategy::MoveSelector;
use super::{Board, Game, GameStatus, Mark, Position};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Which screen the session is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum Phase {
    /// Mode selection.
    Menu,
    /// A game is being played.
    Playing,
    /// A game has finished; offers replay or return to menu.
    EndScreen,
}

/// Who controls the O side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, strum::Display)]
pub enum Mode {
    /// Two humans share the board.
    #[default]
    #[strum(to_string = "Player vs Player")]
    PvP,
    /// The human plays X against a computer opponent playing O.
    #[strum(to_string = "Player vs AI")]
    PvOpponent,
}

/// Input already translated by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// A mode button was chosen on the menu.
    SelectMode(Mode),
    /// A board cell was chosen.
    CellChosen {
        /// Row, expected in `0..3`.
        row: usize,
        /// Column, expected in `0..3`.
        col: usize,
    },
    /// "Play again" on the end screen.
    PlayAgain,
    /// "Main menu" on the end screen.
    ToMenu,
    /// "Exit" on the menu.
    Exit,
}

/// What handling an event did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The event does not apply to the current phase.
    Ignored,
    /// The session moved to a new phase.
    Entered(Phase),
    /// A piece was placed; carries the resulting status.
    Moved(GameStatus),
    /// The host should terminate.
    Exit,
}

/// Mark played by the computer opponent in [`Mode::PvOpponent`].
pub const OPPONENT_MARK: Mark = Mark::O;

/// One player's (or two players') run of games.
#[derive(Debug, Clone)]
pub struct Session {
    phase: Phase,
    mode: Mode,
    game: Game,
}

impl Session {
    /// Creates a session on the menu with an empty board.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating session");
        Self {
            phase: Phase::Menu,
            mode: Mode::default(),
            game: Game::new(),
        }
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Mode of the current or most recent game.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The current game.
    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Returns true if `mark` is played by the computer in the current mode.
    pub fn is_opponent(&self, mark: Mark) -> bool {
        self.mode == Mode::PvOpponent && mark == OPPONENT_MARK
    }

    /// True when the computer must move before any human input applies.
    pub fn opponent_to_move(&self) -> bool {
        self.phase == Phase::Playing
            && !self.game.is_over()
            && self.is_opponent(self.game.to_move())
    }

    /// Applies one event.
    ///
    /// # Errors
    ///
    /// Returns a [`MoveError`] only for a rejected cell choice while
    /// playing; the session is left unchanged.
    #[instrument(skip(self), fields(phase = %self.phase))]
    pub fn handle(&mut self, event: SessionEvent) -> Result<Transition, MoveError> {
        match (self.phase, event) {
            (Phase::Menu, SessionEvent::SelectMode(mode)) => {
                self.start(mode);
                Ok(Transition::Entered(Phase::Playing))
            }
            (Phase::Menu, SessionEvent::Exit) => {
                info!("Exit requested");
                Ok(Transition::Exit)
            }
            (Phase::Playing, SessionEvent::CellChosen { row, col }) => {
                if self.opponent_to_move() {
                    debug!(row, col, "Ignoring cell choice during opponent turn");
                    return Ok(Transition::Ignored);
                }
                let status = self.game.play(row, col)?;
                Ok(self.settle(status))
            }
            (Phase::EndScreen, SessionEvent::PlayAgain) => {
                self.start(self.mode);
                Ok(Transition::Entered(Phase::Playing))
            }
            (Phase::EndScreen, SessionEvent::ToMenu) => {
                info!("Returning to menu");
                self.phase = Phase::Menu;
                self.game = Game::new();
                Ok(Transition::Entered(Phase::Menu))
            }
            (phase, event) => {
                debug!(%phase, ?event, "Event ignored in this phase");
                Ok(Transition::Ignored)
            }
        }
    }

    /// Plays the computer's chosen cell.
    ///
    /// Ignored unless [`Session::opponent_to_move`] holds.
    ///
    /// # Errors
    ///
    /// Returns a [`MoveError`] if the cell is illegal; nothing changes.
    #[instrument(skip(self))]
    pub fn apply_opponent_move(&mut self, pos: Position) -> Result<Transition, MoveError> {
        if !self.opponent_to_move() {
            debug!("No opponent move expected");
            return Ok(Transition::Ignored);
        }
        let status = self.game.place(pos)?;
        Ok(self.settle(status))
    }

    /// Post-move hook: lets `selector` play every pending computer turn.
    ///
    /// Returns the last transition produced, or `None` if the computer had
    /// nothing to do.
    ///
    /// # Errors
    ///
    /// Propagates a [`MoveError`] if the selector picks an illegal cell.
    #[instrument(skip(self, selector), fields(selector = selector.name()))]
    pub fn respond<S: MoveSelector + ?Sized>(
        &mut self,
        selector: &S,
    ) -> Result<Option<Transition>, MoveError> {
        let mut last = None;
        while self.opponent_to_move() {
            let mark = self.game.to_move();
            let Some(pos) = selector.select_move(&self.game, mark) else {
                warn!(mark = %mark, "Selector found no move");
                break;
            };
            last = Some(self.apply_opponent_move(pos)?);
        }
        Ok(last)
    }

    /// Handles `event`, then runs the post-move hook with `selector`.
    ///
    /// # Errors
    ///
    /// See [`Session::handle`] and [`Session::respond`].
    pub fn handle_with<S: MoveSelector + ?Sized>(
        &mut self,
        event: SessionEvent,
        selector: &S,
    ) -> Result<Transition, MoveError> {
        let transition = self.handle(event)?;
        Ok(self.respond(selector)?.unwrap_or(transition))
    }

    /// Read-only copy of everything a renderer needs.
    pub fn snapshot(&self) -> Snapshot {
        let x_pieces = self.game.pieces(Mark::X).to_vec();
        let o_pieces = self.game.pieces(Mark::O).to_vec();
        let fading = [Mark::X, Mark::O]
            .into_iter()
            .filter_map(|mark| self.game.pieces(mark).fading())
            .collect();
        Snapshot {
            phase: self.phase,
            mode: self.mode,
            board: self.game.board().clone(),
            x_pieces,
            o_pieces,
            fading,
            to_move: self.game.to_move(),
            status: self.game.status(),
            winning_line: self.game.winning_line(),
            opponent_to_move: self.opponent_to_move(),
            last_move: self.game.history().last().copied(),
        }
    }

    fn start(&mut self, mode: Mode) {
        info!(%mode, "Starting game");
        self.mode = mode;
        self.game = Game::new();
        self.phase = Phase::Playing;
    }

    fn settle(&mut self, status: GameStatus) -> Transition {
        if status.is_over() {
            info!(?status, "Game finished");
            self.phase = Phase::EndScreen;
        }
        Transition::Moved(status)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Renderer-facing view of a [`Session`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Current phase.
    pub phase: Phase,
    /// Current mode.
    pub mode: Mode,
    /// The nine squares.
    pub board: Board,
    /// X's live pieces, oldest first.
    pub x_pieces: Vec<Position>,
    /// O's live pieces, oldest first.
    pub o_pieces: Vec<Position>,
    /// Pieces that vanish on their owner's next placement.
    pub fading: Vec<Position>,
    /// Side to move (the final mover once the game is over).
    pub to_move: Mark,
    /// Game status.
    pub status: GameStatus,
    /// Completed line, if any.
    pub winning_line: Option<[Position; 3]>,
    /// True while the computer is expected to move.
    pub opponent_to_move: bool,
    /// The most recent move.
    pub last_move: Option<Move>,
}

impl Snapshot {
    /// Live pieces of `mark`, oldest first.
    pub fn pieces(&self, mark: Mark) -> &[Position] {
        match mark {
            Mark::X => &self.x_pieces,
            Mark::O => &self.o_pieces,
        }
    }

    /// True if the piece at `pos` is about to vanish.
    pub fn is_fading(&self, pos: Position) -> bool {
        self.fading.contains(&pos)
    }

    /// True if `pos` lies on the completed line.
    pub fn on_winning_line(&self, pos: Position) -> bool {
        self.winning_line
            .is_some_and(|line| line.contains(&pos))
    }
}
