//! Keyboard translation: raw keys to session events.

use crossterm::event::KeyCode;
use tracing::debug;
use vanishing_tictactoe::{Mode, Phase, Position, SessionEvent};

/// Menu buttons, top to bottom.
pub const MENU_ITEMS: [MenuItem; 3] = [
    MenuItem::Mode(Mode::PvP),
    MenuItem::Mode(Mode::PvOpponent),
    MenuItem::Exit,
];

/// End-screen buttons, left to right.
pub const END_ITEMS: [EndItem; 2] = [EndItem::PlayAgain, EndItem::MainMenu];

/// A menu button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    /// Start a game in this mode.
    Mode(Mode),
    /// Leave the program.
    Exit,
}

impl MenuItem {
    /// Button caption.
    pub fn label(&self) -> String {
        match self {
            MenuItem::Mode(mode) => mode.to_string(),
            MenuItem::Exit => "Exit".to_string(),
        }
    }

    fn event(self) -> SessionEvent {
        match self {
            MenuItem::Mode(mode) => SessionEvent::SelectMode(mode),
            MenuItem::Exit => SessionEvent::Exit,
        }
    }
}

/// An end-screen button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum EndItem {
    /// Replay in the same mode.
    #[strum(to_string = "Play Again")]
    PlayAgain,
    /// Back to mode selection.
    #[strum(to_string = "Main Menu")]
    MainMenu,
}

impl EndItem {
    fn event(self) -> SessionEvent {
        match self {
            EndItem::PlayAgain => SessionEvent::PlayAgain,
            EndItem::MainMenu => SessionEvent::ToMenu,
        }
    }
}

/// What a key press asks the host to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Forward to the session.
    Event(SessionEvent),
    /// Only the highlight moved; redraw.
    Navigate,
    /// Leave immediately.
    Quit,
    /// Key has no meaning here.
    None,
}

/// Keys that leave the program from any screen.
pub fn is_quit_key(key: KeyCode) -> bool {
    matches!(key, KeyCode::Char('q') | KeyCode::Esc)
}

/// Highlight state for each screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputState {
    /// Highlighted board cell.
    pub cursor: Position,
    /// Highlighted menu button.
    pub menu_index: usize,
    /// Highlighted end-screen button.
    pub end_index: usize,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            cursor: Position::Center,
            menu_index: 0,
            end_index: 0,
        }
    }
}

impl InputState {
    /// Translates `key` for the screen currently shown.
    pub fn on_key(&mut self, phase: Phase, key: KeyCode) -> Action {
        if is_quit_key(key) {
            return Action::Quit;
        }
        let action = match phase {
            Phase::Menu => self.menu_key(key),
            Phase::Playing => self.board_key(key),
            Phase::EndScreen => self.end_key(key),
        };
        debug!(%phase, ?key, ?action, "Key translated");
        action
    }

    fn menu_key(&mut self, key: KeyCode) -> Action {
        match key {
            KeyCode::Up => {
                self.menu_index = self.menu_index.saturating_sub(1);
                Action::Navigate
            }
            KeyCode::Down => {
                self.menu_index = (self.menu_index + 1).min(MENU_ITEMS.len() - 1);
                Action::Navigate
            }
            KeyCode::Enter | KeyCode::Char(' ') => Action::Event(MENU_ITEMS[self.menu_index].event()),
            KeyCode::Char(c) => match c.to_digit(10) {
                Some(n @ 1..=3) => Action::Event(MENU_ITEMS[n as usize - 1].event()),
                _ => Action::None,
            },
            _ => Action::None,
        }
    }

    fn board_key(&mut self, key: KeyCode) -> Action {
        match key {
            KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right => {
                self.cursor = move_cursor(self.cursor, key);
                Action::Navigate
            }
            KeyCode::Enter | KeyCode::Char(' ') => cell_event(self.cursor),
            KeyCode::Char(c) => match c.to_digit(10) {
                Some(n @ 1..=9) => match Position::from_index(n as usize - 1) {
                    Some(pos) => {
                        self.cursor = pos;
                        cell_event(pos)
                    }
                    None => Action::None,
                },
                _ => Action::None,
            },
            _ => Action::None,
        }
    }

    fn end_key(&mut self, key: KeyCode) -> Action {
        match key {
            KeyCode::Left | KeyCode::Up => {
                self.end_index = self.end_index.saturating_sub(1);
                Action::Navigate
            }
            KeyCode::Right | KeyCode::Down => {
                self.end_index = (self.end_index + 1).min(END_ITEMS.len() - 1);
                Action::Navigate
            }
            KeyCode::Enter | KeyCode::Char(' ') => Action::Event(END_ITEMS[self.end_index].event()),
            KeyCode::Char('r') => Action::Event(SessionEvent::PlayAgain),
            KeyCode::Char('m') => Action::Event(SessionEvent::ToMenu),
            _ => Action::None,
        }
    }
}

fn cell_event(pos: Position) -> Action {
    Action::Event(SessionEvent::CellChosen {
        row: pos.row(),
        col: pos.col(),
    })
}

/// Moves cursor based on arrow keys; stops at the board edge.
pub fn move_cursor(cursor: Position, key: KeyCode) -> Position {
    let (row, col) = cursor.row_col();
    let (row, col) = match key {
        KeyCode::Up => (row.saturating_sub(1), col),
        KeyCode::Down => ((row + 1).min(2), col),
        KeyCode::Left => (row, col.saturating_sub(1)),
        KeyCode::Right => (row, (col + 1).min(2)),
        _ => (row, col),
    };
    Position::from_row_col(row, col).unwrap_or(cursor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_stops_at_edges() {
        assert_eq!(move_cursor(Position::TopLeft, KeyCode::Up), Position::TopLeft);
        assert_eq!(move_cursor(Position::TopLeft, KeyCode::Left), Position::TopLeft);
        assert_eq!(move_cursor(Position::TopLeft, KeyCode::Right), Position::TopCenter);
        assert_eq!(move_cursor(Position::Center, KeyCode::Down), Position::BottomCenter);
        assert_eq!(
            move_cursor(Position::BottomRight, KeyCode::Down),
            Position::BottomRight
        );
    }

    #[test]
    fn test_menu_navigation_and_selection() {
        let mut input = InputState::default();
        assert_eq!(input.on_key(Phase::Menu, KeyCode::Down), Action::Navigate);
        assert_eq!(
            input.on_key(Phase::Menu, KeyCode::Enter),
            Action::Event(SessionEvent::SelectMode(Mode::PvOpponent))
        );
        input.on_key(Phase::Menu, KeyCode::Down);
        input.on_key(Phase::Menu, KeyCode::Down);
        assert_eq!(input.menu_index, 2);
        assert_eq!(
            input.on_key(Phase::Menu, KeyCode::Enter),
            Action::Event(SessionEvent::Exit)
        );
        assert_eq!(
            input.on_key(Phase::Menu, KeyCode::Char('1')),
            Action::Event(SessionEvent::SelectMode(Mode::PvP))
        );
    }

    #[test]
    fn test_digits_choose_cells_row_major() {
        let mut input = InputState::default();
        assert_eq!(
            input.on_key(Phase::Playing, KeyCode::Char('3')),
            Action::Event(SessionEvent::CellChosen { row: 0, col: 2 })
        );
        assert_eq!(input.cursor, Position::TopRight);
        assert_eq!(input.on_key(Phase::Playing, KeyCode::Char('0')), Action::None);
    }

    #[test]
    fn test_enter_places_at_cursor() {
        let mut input = InputState::default();
        input.on_key(Phase::Playing, KeyCode::Left);
        assert_eq!(
            input.on_key(Phase::Playing, KeyCode::Enter),
            Action::Event(SessionEvent::CellChosen { row: 1, col: 0 })
        );
    }

    #[test]
    fn test_end_screen_buttons() {
        let mut input = InputState::default();
        assert_eq!(
            input.on_key(Phase::EndScreen, KeyCode::Enter),
            Action::Event(SessionEvent::PlayAgain)
        );
        input.on_key(Phase::EndScreen, KeyCode::Right);
        assert_eq!(
            input.on_key(Phase::EndScreen, KeyCode::Enter),
            Action::Event(SessionEvent::ToMenu)
        );
    }

    #[test]
    fn test_quit_from_any_screen() {
        let mut input = InputState::default();
        for phase in [Phase::Menu, Phase::Playing, Phase::EndScreen] {
            assert_eq!(input.on_key(phase, KeyCode::Char('q')), Action::Quit);
        }
    }
}
