//! Tests for the menu / playing / end-screen state machine.

use vanishing_tictactoe::{
    Game, GameStatus, HeuristicStrategy, Mark, Mode, MoveError, MoveSelector, Phase, Position,
    Session, SessionEvent, Transition,
};

fn cell(row: usize, col: usize) -> SessionEvent {
    SessionEvent::CellChosen { row, col }
}

fn playing(mode: Mode) -> Session {
    let mut session = Session::new();
    assert_eq!(
        session.handle(SessionEvent::SelectMode(mode)),
        Ok(Transition::Entered(Phase::Playing))
    );
    session
}

/// Always answers with the same cell.
struct Fixed(Position);

impl MoveSelector for Fixed {
    fn select_move(&self, _game: &Game, _mark: Mark) -> Option<Position> {
        Some(self.0)
    }

    fn name(&self) -> &str {
        "Fixed"
    }
}

#[test]
fn test_new_session_starts_on_menu() {
    let session = Session::new();
    assert_eq!(session.phase(), Phase::Menu);
    assert_eq!(session.game().board().empty_positions().len(), 9);
}

#[test]
fn test_board_click_on_menu_is_ignored() {
    let mut session = Session::new();
    assert_eq!(session.handle(cell(1, 1)), Ok(Transition::Ignored));
    assert_eq!(session.phase(), Phase::Menu);
    assert!(session.game().history().is_empty());
}

#[test]
fn test_top_row_win_reaches_end_screen() {
    let mut session = playing(Mode::PvP);
    for event in [cell(0, 0), cell(1, 0), cell(0, 1), cell(1, 1)] {
        assert_eq!(
            session.handle(event),
            Ok(Transition::Moved(GameStatus::InProgress))
        );
    }
    assert_eq!(
        session.handle(cell(0, 2)),
        Ok(Transition::Moved(GameStatus::Won(Mark::X)))
    );
    assert_eq!(session.phase(), Phase::EndScreen);

    // Board is frozen on the end screen.
    assert_eq!(session.handle(cell(2, 2)), Ok(Transition::Ignored));
    assert_eq!(session.game().history().len(), 5);
}

#[test]
fn test_play_again_resets_with_same_mode() {
    let mut session = playing(Mode::PvOpponent);
    let heuristic = HeuristicStrategy::new();
    // A human who always takes the first empty cell loses within a few turns.
    let mut guard = 0;
    while session.phase() == Phase::Playing && guard < 50 {
        let empty = session.game().valid_moves();
        let target = empty[0];
        session
            .handle_with(cell(target.row(), target.col()), &heuristic)
            .expect("First empty cell is legal");
        guard += 1;
    }
    assert_eq!(session.phase(), Phase::EndScreen);

    assert_eq!(
        session.handle(SessionEvent::PlayAgain),
        Ok(Transition::Entered(Phase::Playing))
    );
    assert_eq!(session.mode(), Mode::PvOpponent);
    assert!(session.game().history().is_empty());
    assert_eq!(session.game().to_move(), Mark::X);
    assert!(session.game().pieces(Mark::X).is_empty());
}

#[test]
fn test_to_menu_and_exit() {
    let mut session = playing(Mode::PvP);
    // Exit only applies on the menu.
    assert_eq!(session.handle(SessionEvent::Exit), Ok(Transition::Ignored));
    assert_eq!(session.handle(SessionEvent::ToMenu), Ok(Transition::Ignored));

    for event in [cell(0, 0), cell(1, 0), cell(0, 1), cell(1, 1), cell(0, 2)] {
        session.handle(event).unwrap();
    }
    assert_eq!(
        session.handle(SessionEvent::ToMenu),
        Ok(Transition::Entered(Phase::Menu))
    );
    assert!(session.game().history().is_empty());
    assert_eq!(session.handle(SessionEvent::Exit), Ok(Transition::Exit));
}

#[test]
fn test_illegal_cell_leaves_session_unchanged() {
    let mut session = playing(Mode::PvP);
    session.handle(cell(1, 1)).unwrap();
    let before = session.snapshot();

    assert_eq!(
        session.handle(cell(1, 1)),
        Err(MoveError::SquareOccupied(Position::Center))
    );
    assert_eq!(
        session.handle(cell(5, 0)),
        Err(MoveError::OutOfRange { row: 5, col: 0 })
    );
    assert_eq!(session.snapshot(), before);
}

#[test]
fn test_opponent_replies_after_human_move() {
    let mut session = playing(Mode::PvOpponent);
    let heuristic = HeuristicStrategy::new();

    let transition = session
        .handle_with(cell(0, 0), &heuristic)
        .expect("Legal move");
    assert_eq!(transition, Transition::Moved(GameStatus::InProgress));
    assert_eq!(session.game().history().len(), 2);
    assert_eq!(
        session.game().board().get(Position::Center),
        vanishing_tictactoe::Square::Occupied(Mark::O)
    );
    assert_eq!(session.game().to_move(), Mark::X);
    assert!(!session.opponent_to_move());
}

#[test]
fn test_human_input_ignored_while_opponent_pending() {
    let mut session = playing(Mode::PvOpponent);
    session.handle(cell(0, 0)).unwrap();
    assert!(session.opponent_to_move());

    assert_eq!(session.handle(cell(2, 2)), Ok(Transition::Ignored));
    assert_eq!(session.game().history().len(), 1);
}

#[test]
fn test_opponent_win_ends_game() {
    let mut session = playing(Mode::PvOpponent);
    // X: (0,0) (0,1) (2,1); O answers Fixed cells, completing the middle row.
    session.handle(cell(0, 0)).unwrap();
    session.apply_opponent_move(Position::MiddleLeft).unwrap();
    session.handle(cell(0, 1)).unwrap();
    session.apply_opponent_move(Position::Center).unwrap();
    session.handle(cell(2, 1)).unwrap();

    let last = session.respond(&Fixed(Position::MiddleRight)).unwrap();
    assert_eq!(last, Some(Transition::Moved(GameStatus::Won(Mark::O))));
    assert_eq!(session.phase(), Phase::EndScreen);
}

#[test]
fn test_illegal_selector_choice_is_rejected() {
    let mut session = playing(Mode::PvOpponent);
    session.handle(cell(1, 1)).unwrap();
    let before = session.snapshot();

    assert_eq!(
        session.respond(&Fixed(Position::Center)),
        Err(MoveError::SquareOccupied(Position::Center))
    );
    assert_eq!(session.snapshot(), before);
}

#[test]
fn test_pvp_never_invokes_selector() {
    let mut session = playing(Mode::PvP);
    session.handle(cell(0, 0)).unwrap();
    assert!(!session.opponent_to_move());
    assert_eq!(session.respond(&Fixed(Position::Center)), Ok(None));
    assert_eq!(session.game().to_move(), Mark::O);
}

#[test]
fn test_snapshot_marks_fading_piece() {
    let mut session = playing(Mode::PvP);
    // X: (0,0) (1,1) (2,0); O: (1,0) (1,2)
    for event in [cell(0, 0), cell(1, 0), cell(1, 1), cell(1, 2), cell(2, 0)] {
        session.handle(event).unwrap();
    }
    let snapshot = session.snapshot();
    assert_eq!(
        snapshot.pieces(Mark::X),
        &[Position::TopLeft, Position::Center, Position::BottomLeft]
    );
    assert!(snapshot.is_fading(Position::TopLeft));
    assert!(!snapshot.is_fading(Position::MiddleLeft));
    assert_eq!(snapshot.to_move, Mark::O);
    assert_eq!(snapshot.phase, Phase::Playing);
}

#[test]
fn test_snapshot_serializes_for_renderers() {
    let session = playing(Mode::PvOpponent);
    let json = serde_json::to_value(session.snapshot()).expect("Serializable");
    assert_eq!(json["phase"], "Playing");
    assert_eq!(json["mode"], "PvOpponent");
}
