//! Controller and opponent tests with scripted advisors.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use vanishing_games::{
    AdvisedCell, AdvisorError, AdvisorStrategy, GameController, LlmAdvisor, LlmClient, LlmConfig,
    LlmProvider, MoveAdvisor, OpponentStrategy, RULES,
};
use vanishing_tictactoe::{
    Board, Game, GameStatus, HeuristicStrategy, Mark, Mode, MoveSelector, Phase, Position,
    SessionEvent, Square, Transition,
};

/// What the scripted advisor does on every request.
#[derive(Debug, Clone)]
enum Script {
    Answer(i64, i64),
    Fail(AdvisorError),
    Stall,
}

#[derive(Debug)]
struct ScriptedAdvisor {
    script: Script,
    calls: AtomicUsize,
}

impl ScriptedAdvisor {
    fn new(script: Script) -> Arc<Self> {
        Arc::new(Self {
            script,
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl MoveAdvisor for ScriptedAdvisor {
    async fn request_move(
        &self,
        _board: &Board,
        _mark: Mark,
        _rules: &str,
    ) -> Result<AdvisedCell, AdvisorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.script {
            Script::Answer(row, col) => Ok(AdvisedCell {
                row: *row,
                col: *col,
            }),
            Script::Fail(e) => Err(e.clone()),
            Script::Stall => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(AdvisorError::Unavailable("unreachable".to_string()))
            }
        }
    }

    fn name(&self) -> &str {
        "Scripted"
    }
}

const DEADLINE: Duration = Duration::from_millis(50);

/// X at (0,0); the heuristic answers with the center here.
fn opened_game() -> Game {
    let mut game = Game::new();
    game.play(0, 0).expect("Legal move");
    game
}

fn heuristic_pick(game: &Game) -> Option<Position> {
    HeuristicStrategy::new().select_move(game, Mark::O)
}

#[tokio::test]
async fn test_advisor_move_is_used() {
    let advisor = ScriptedAdvisor::new(Script::Answer(2, 2));
    let strategy = AdvisorStrategy::new(advisor.clone(), DEADLINE);
    let game = opened_game();

    assert_eq!(strategy.consult(&game, Mark::O).await, Ok(Position::BottomRight));
    assert_eq!(
        strategy.select_move(&game, Mark::O).await,
        Some(Position::BottomRight)
    );
    assert_eq!(advisor.calls(), 2);
}

#[tokio::test]
async fn test_occupied_cell_falls_back() {
    let strategy = AdvisorStrategy::new(ScriptedAdvisor::new(Script::Answer(0, 0)), DEADLINE);
    let game = opened_game();

    assert_eq!(
        strategy.consult(&game, Mark::O).await,
        Err(AdvisorError::IllegalCell { row: 0, col: 0 })
    );
    assert_eq!(strategy.select_move(&game, Mark::O).await, heuristic_pick(&game));
}

#[tokio::test]
async fn test_off_board_cell_falls_back() {
    let strategy = AdvisorStrategy::new(ScriptedAdvisor::new(Script::Answer(3, -1)), DEADLINE);
    let game = opened_game();

    assert!(matches!(
        strategy.consult(&game, Mark::O).await,
        Err(AdvisorError::IllegalCell { .. })
    ));
    assert_eq!(strategy.select_move(&game, Mark::O).await, Some(Position::Center));
}

#[tokio::test]
async fn test_malformed_reply_falls_back() {
    let malformed = AdvisorError::MalformedResponse("no JSON object in reply".to_string());
    let strategy = AdvisorStrategy::new(ScriptedAdvisor::new(Script::Fail(malformed)), DEADLINE);
    let game = opened_game();

    assert_eq!(strategy.select_move(&game, Mark::O).await, heuristic_pick(&game));
}

#[tokio::test]
async fn test_unavailable_advisor_falls_back() {
    let down = AdvisorError::Unavailable("connection refused".to_string());
    let strategy = AdvisorStrategy::new(ScriptedAdvisor::new(Script::Fail(down)), DEADLINE);
    let game = opened_game();

    assert_eq!(strategy.select_move(&game, Mark::O).await, heuristic_pick(&game));
}

#[tokio::test]
async fn test_slow_advisor_times_out_and_falls_back() {
    let strategy = AdvisorStrategy::new(ScriptedAdvisor::new(Script::Stall), DEADLINE);
    let game = opened_game();

    assert_eq!(
        strategy.consult(&game, Mark::O).await,
        Err(AdvisorError::Timeout(DEADLINE))
    );
    assert_eq!(strategy.select_move(&game, Mark::O).await, heuristic_pick(&game));
}

#[tokio::test]
async fn test_dispatch_plays_opponent_reply() {
    let mut controller = GameController::new(OpponentStrategy::heuristic());
    assert_eq!(
        controller
            .dispatch(SessionEvent::SelectMode(Mode::PvOpponent))
            .await,
        Ok(Transition::Entered(Phase::Playing))
    );

    let transition = controller
        .dispatch(SessionEvent::CellChosen { row: 0, col: 0 })
        .await
        .expect("Legal move");
    assert_eq!(transition, Transition::Moved(GameStatus::InProgress));

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.board.get(Position::Center), Square::Occupied(Mark::O));
    assert_eq!(snapshot.to_move, Mark::X);
    assert!(!controller.awaiting_opponent());
}

#[tokio::test]
async fn test_handle_leaves_opponent_pending_until_respond() {
    let advisor = ScriptedAdvisor::new(Script::Answer(2, 2));
    let mut controller =
        GameController::new(OpponentStrategy::advised(advisor.clone(), DEADLINE));
    controller
        .handle(SessionEvent::SelectMode(Mode::PvOpponent))
        .expect("Menu accepts mode");
    controller
        .handle(SessionEvent::CellChosen { row: 1, col: 1 })
        .expect("Legal move");
    assert!(controller.awaiting_opponent());
    assert_eq!(advisor.calls(), 0);

    let last = controller.respond().await.expect("Advisor move is legal");
    assert_eq!(last, Some(Transition::Moved(GameStatus::InProgress)));
    assert_eq!(
        controller.snapshot().board.get(Position::BottomRight),
        Square::Occupied(Mark::O)
    );
    assert_eq!(advisor.calls(), 1);

    // Nothing pending now.
    assert_eq!(controller.respond().await, Ok(None));
}

#[tokio::test]
async fn test_pvp_never_consults_advisor() {
    let advisor = ScriptedAdvisor::new(Script::Answer(2, 2));
    let mut controller =
        GameController::new(OpponentStrategy::advised(advisor.clone(), DEADLINE));
    controller
        .dispatch(SessionEvent::SelectMode(Mode::PvP))
        .await
        .expect("Menu accepts mode");
    controller
        .dispatch(SessionEvent::CellChosen { row: 0, col: 0 })
        .await
        .expect("Legal move");

    assert_eq!(controller.snapshot().to_move, Mark::O);
    assert_eq!(advisor.calls(), 0);
}

#[tokio::test]
async fn test_illegal_human_move_reports_error_without_reply() {
    let mut controller = GameController::new(OpponentStrategy::heuristic());
    controller
        .dispatch(SessionEvent::SelectMode(Mode::PvOpponent))
        .await
        .expect("Menu accepts mode");
    controller
        .dispatch(SessionEvent::CellChosen { row: 0, col: 0 })
        .await
        .expect("Legal move");
    let before = controller.snapshot();

    assert!(
        controller
            .dispatch(SessionEvent::CellChosen { row: 1, col: 1 })
            .await
            .is_err()
    );
    assert_eq!(controller.snapshot(), before);
}

#[tokio::test]
async fn test_failing_advisor_still_finishes_games() {
    let down = AdvisorError::Unavailable("offline".to_string());
    let mut controller = GameController::new(OpponentStrategy::advised(
        ScriptedAdvisor::new(Script::Fail(down)),
        DEADLINE,
    ));
    controller
        .dispatch(SessionEvent::SelectMode(Mode::PvOpponent))
        .await
        .expect("Menu accepts mode");

    let mut turns = 0;
    while controller.phase() == Phase::Playing && turns < 50 {
        let target = controller.session().game().valid_moves()[0];
        controller
            .dispatch(SessionEvent::CellChosen {
                row: target.row(),
                col: target.col(),
            })
            .await
            .expect("First empty cell is legal");
        turns += 1;
    }
    assert_eq!(controller.phase(), Phase::EndScreen);
    assert_eq!(controller.snapshot().status, GameStatus::Won(Mark::O));
}

/// Nothing listens on port 1, so every request fails to connect.
const UNREACHABLE: &str = "http://127.0.0.1:1/v1";

fn unreachable_advisor(provider: LlmProvider, model: &str) -> LlmAdvisor {
    let config = LlmConfig::new(provider, "test-key".to_string(), model.to_string(), 50)
        .with_api_base(UNREACHABLE);
    LlmAdvisor::new(LlmClient::new(config))
}

#[tokio::test]
async fn test_unreachable_llm_is_unavailable() {
    let game = opened_game();
    for advisor in [
        unreachable_advisor(LlmProvider::OpenAI, "gpt-4o-mini"),
        unreachable_advisor(LlmProvider::Anthropic, "claude-3-5-haiku-20241022"),
    ] {
        let result = advisor.request_move(game.board(), Mark::O, RULES).await;
        assert!(
            matches!(result, Err(AdvisorError::Unavailable(_))),
            "{}: {:?}",
            advisor.name(),
            result
        );
    }
}

#[tokio::test]
async fn test_unreachable_llm_opponent_plays_heuristic_move() {
    let game = opened_game();
    for advisor in [
        unreachable_advisor(LlmProvider::OpenAI, "gpt-4o-mini"),
        unreachable_advisor(LlmProvider::Anthropic, "claude-3-5-haiku-20241022"),
    ] {
        let opponent = OpponentStrategy::advised(Arc::new(advisor), Duration::from_secs(5));
        assert_eq!(
            opponent.select_move(&game, Mark::O).await,
            Some(Position::Center)
        );
    }
}
