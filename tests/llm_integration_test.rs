//! Live advisor tests against real LLM APIs.
//!
//! Run with `--features api`; they spend tokens.

use std::sync::Arc;
use std::time::Duration;
use vanishing_games::{
    AdvisorStrategy, LlmAdvisor, LlmClient, LlmConfig, LlmProvider, MoveAdvisor, RULES,
};
use vanishing_tictactoe::{Game, Mark};

fn advisor(provider: LlmProvider, var: &str, model: &str) -> LlmAdvisor {
    dotenvy::dotenv().ok();
    let api_key = std::env::var(var).unwrap_or_else(|_| panic!("{var} not set"));
    LlmAdvisor::new(LlmClient::new(LlmConfig::new(
        provider,
        api_key,
        model.to_string(),
        100,
    )))
}

async fn assert_plays_empty_cell(advisor: LlmAdvisor) {
    let mut game = Game::new();
    game.play(1, 1).expect("Legal move");

    let cell = advisor
        .request_move(game.board(), Mark::O, RULES)
        .await
        .expect("Advisor replied");
    eprintln!("Advisor chose {:?}", cell);

    let strategy = AdvisorStrategy::new(Arc::new(advisor), Duration::from_secs(30));
    let pos = strategy
        .select_move(&game, Mark::O)
        .await
        .expect("Board has empty cells");
    assert!(game.board().is_empty(pos));
}

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
async fn test_anthropic_advisor() {
    let advisor = advisor(
        LlmProvider::Anthropic,
        "ANTHROPIC_API_KEY",
        "claude-3-5-haiku-20241022",
    );
    assert_plays_empty_cell(advisor).await;
}

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
async fn test_openai_advisor() {
    let advisor = advisor(LlmProvider::OpenAI, "OPENAI_API_KEY", "gpt-4o-mini");
    assert_plays_empty_cell(advisor).await;
}
