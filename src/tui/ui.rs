//! Stateless UI rendering from a session snapshot.

use super::app::App;
use super::input::{END_ITEMS, InputState, MENU_ITEMS};
use crate::opponent::OpponentStrategy;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use vanishing_tictactoe::{GameStatus, Mark, Mode, Phase, Position, Snapshot, Square};

/// Draws the whole screen.
pub fn draw(frame: &mut Frame, app: &App) {
    let snapshot = app.controller().snapshot();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(9),    // Body
            Constraint::Length(3), // Status
            Constraint::Length(3), // Help
        ])
        .split(frame.area());

    let title = Paragraph::new("Vanishing Tic Tac Toe")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, chunks[0]);

    match snapshot.phase {
        Phase::Menu => {
            let opponent = opponent_label(app.controller().opponent());
            draw_menu(frame, chunks[1], app.input(), &opponent)
        }
        Phase::Playing | Phase::EndScreen => {
            draw_board(frame, chunks[1], &snapshot, app.input().cursor)
        }
    }

    let status = match (app.notice(), snapshot.phase) {
        (Some(notice), _) => Line::from(Span::styled(
            notice.to_string(),
            Style::default().fg(Color::Red),
        )),
        (None, Phase::Menu) => Line::from("Choose a mode"),
        (None, Phase::Playing) => Line::from(turn_label(&snapshot)),
        (None, Phase::EndScreen) => end_line(&snapshot, app.input()),
    };
    let status = Paragraph::new(status)
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Status"));
    frame.render_widget(status, chunks[2]);

    let help = Paragraph::new(help_text(snapshot.phase))
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(help, chunks[3]);
}

/// Whose turn it is, as shown during play.
pub fn turn_label(snapshot: &Snapshot) -> String {
    if snapshot.opponent_to_move {
        "AI is thinking...".to_string()
    } else {
        format!("{}'s Turn", player_name(snapshot.mode, snapshot.to_move))
    }
}

/// Outcome text for the end screen.
pub fn result_label(snapshot: &Snapshot) -> String {
    match snapshot.status {
        GameStatus::Won(mark) => format!("{} Won!", player_name(snapshot.mode, mark)),
        GameStatus::Draw => "Draw!".to_string(),
        GameStatus::InProgress => String::new(),
    }
}

/// Opponent line shown under the menu.
pub fn opponent_label(opponent: &OpponentStrategy) -> String {
    if opponent.is_advised() {
        format!("Opponent: {} (heuristic fallback)", opponent.label())
    } else {
        format!("Opponent: {}", opponent.label())
    }
}

fn player_name(mode: Mode, mark: Mark) -> &'static str {
    match (mode, mark) {
        (_, Mark::X) => "Player 1",
        (Mode::PvOpponent, Mark::O) => "AI",
        (Mode::PvP, Mark::O) => "Player 2",
    }
}

fn help_text(phase: Phase) -> &'static str {
    match phase {
        Phase::Menu => "Up/Down: Select | Enter: Start | 1-3: Shortcut | Q: Quit",
        Phase::Playing => "Arrows: Move | Enter: Place | 1-9: Cell | Q: Quit",
        Phase::EndScreen => "Left/Right: Select | Enter: Confirm | R: Again | M: Menu | Q: Quit",
    }
}

fn end_line(snapshot: &Snapshot, input: &InputState) -> Line<'static> {
    let mut spans = vec![Span::styled(
        format!("{}   ", result_label(snapshot)),
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
    )];
    for (index, item) in END_ITEMS.iter().enumerate() {
        spans.push(button(item.to_string(), index == input.end_index));
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}

fn button(label: String, selected: bool) -> Span<'static> {
    let style = if selected {
        Style::default().bg(Color::White).fg(Color::Black)
    } else {
        Style::default().fg(Color::Gray)
    };
    Span::styled(format!("[ {} ]", label), style)
}

fn draw_menu(frame: &mut Frame, area: Rect, input: &InputState, opponent: &str) {
    let menu_area = center_rect(area, 40, (MENU_ITEMS.len() * 2 + 1) as u16);
    let mut lines = Vec::new();
    for (index, item) in MENU_ITEMS.iter().enumerate() {
        lines.push(Line::from(button(item.label(), index == input.menu_index)));
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(
        opponent.to_string(),
        Style::default().fg(Color::DarkGray),
    )));
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), menu_area);
}

fn draw_board(frame: &mut Frame, area: Rect, snapshot: &Snapshot, cursor: Position) {
    let board_area = center_rect(area, 40, 11);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .split(board_area);

    for row in 0..3 {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(12),
                Constraint::Length(1),
                Constraint::Length(12),
                Constraint::Length(1),
                Constraint::Length(12),
            ])
            .split(rows[row * 2]);
        for col in 0..3 {
            if let Some(pos) = Position::from_row_col(row, col) {
                draw_cell(frame, cols[col * 2], snapshot, pos, cursor);
            }
            if col < 2 {
                frame.render_widget(
                    Paragraph::new("│\n│\n│").style(Style::default().fg(Color::DarkGray)),
                    cols[col * 2 + 1],
                );
            }
        }
        if row < 2 {
            frame.render_widget(
                Paragraph::new("─".repeat(board_area.width as usize))
                    .style(Style::default().fg(Color::DarkGray)),
                rows[row * 2 + 1],
            );
        }
    }
}

fn draw_cell(frame: &mut Frame, area: Rect, snapshot: &Snapshot, pos: Position, cursor: Position) {
    let (symbol, mut style) = match snapshot.board.get(pos) {
        Square::Empty => (" ", Style::default().fg(Color::DarkGray)),
        Square::Occupied(Mark::X) => ("X", Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD)),
        Square::Occupied(Mark::O) => ("O", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
    };

    if snapshot.on_winning_line(pos) {
        style = style.fg(Color::Red);
    } else if snapshot.is_fading(pos) {
        style = style.add_modifier(Modifier::DIM).remove_modifier(Modifier::BOLD);
    }
    if snapshot.phase == Phase::Playing && pos == cursor {
        style = style.bg(Color::White);
        if snapshot.board.get(pos) == Square::Empty {
            style = style.fg(Color::Black);
        }
    }

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(format!("    {}    ", symbol), style)),
    ];
    frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), area);
}

fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(area.height.saturating_sub(height) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(area.width.saturating_sub(width) / 2),
            Constraint::Length(width),
            Constraint::Min(0),
        ])
        .split(vert[1])[1]
}
