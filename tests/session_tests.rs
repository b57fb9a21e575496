//! Session integration tests: timed bot turns and mark expiry.

use std::time::Duration;

use rust_gridgame::core::{Difficulty, GameConfig, GameMode, Player, Ruleset, SolverConfig, TimingConfig};
use rust_gridgame::rules::circles::CircleSize;
use rust_gridgame::{EngineError, GameSession, Move, SessionEvent};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn bot_session(ruleset: Ruleset, difficulty: Difficulty) -> GameSession {
    let config = GameConfig::new(GameMode::Bot, 3, 3)
        .with_ruleset(ruleset)
        .with_difficulty(difficulty)
        .with_seed(42);
    GameSession::new(config).unwrap()
}

// =============================================================================
// Bot Turns
// =============================================================================

#[test]
fn test_full_bot_game_alternates_lock() {
    let mut session = bot_session(Ruleset::Classic, Difficulty::Easy);
    let mut moves = 0;
    while !session.state().is_terminal() && moves < 9 {
        let cell = session
            .state()
            .board()
            .iter()
            .position(Option::is_none)
            .unwrap();
        session.attempt_move(Move::Cell(cell)).unwrap();
        moves += 1;
        if session.state().is_terminal() {
            break;
        }
        assert!(session.is_input_locked());
        let events = session.advance(ms(500));
        assert!(matches!(events.as_slice(), [SessionEvent::BotMoved(_)]));
        assert!(!session.is_input_locked());
    }
    assert!(session.state().is_terminal());
}

#[test]
fn test_only_one_bot_turn_pending() {
    let mut session = bot_session(Ruleset::Classic, Difficulty::Normal);
    session.attempt_move(Move::Cell(0)).unwrap();
    // Think task plus failsafe.
    assert_eq!(session.pending_tasks(), 2);
    assert_eq!(session.attempt_move(Move::Cell(1)), Err(EngineError::InputLocked));
    assert_eq!(session.pending_tasks(), 2);
}

#[test]
fn test_human_may_move_for_bot_after_failsafe() {
    let timing = TimingConfig {
        bot_think_ms: 10_000,
        bot_failsafe_ms: 2_000,
        ..TimingConfig::default()
    };
    let config = GameConfig::new(GameMode::Bot, 3, 3).with_timing(timing);
    let mut session = GameSession::new(config).unwrap();
    session.attempt_move(Move::Cell(0)).unwrap();

    assert_eq!(session.advance(ms(2_000)), vec![SessionEvent::BotTimedOut]);
    assert_eq!(session.state().current_player(), Player::O);
    session.attempt_move(Move::Cell(8)).unwrap();
    assert_eq!(session.state().board()[8], Some(Player::O));
}

#[test]
fn test_hard_circles_bot_turn() {
    let config = GameConfig::new(GameMode::Bot, 3, 3)
        .with_ruleset(Ruleset::Circles)
        .with_difficulty(Difficulty::Hard)
        .with_solver(SolverConfig::default().with_max_depth(4));
    let mut session = GameSession::new(config).unwrap();
    session.select_size(CircleSize::Large).unwrap();
    session.attempt_move(Move::Cell(4)).unwrap();

    let events = session.advance(ms(500));
    assert!(matches!(events.as_slice(), [SessionEvent::BotMoved(Move::Circle(_))]));
    assert_eq!(session.state().current_player(), Player::X);
}

// =============================================================================
// Expiry
// =============================================================================

#[test]
fn test_bot_sees_board_after_expiry() {
    let config = GameConfig::new(GameMode::Bot, 3, 3)
        .with_ruleset(Ruleset::Decay)
        .with_decay_turns(2)
        .with_seed(7);
    let mut session = GameSession::new(config).unwrap();

    session.attempt_move(Move::Cell(0)).unwrap();
    session.advance(ms(500));
    let bot_cell = session
        .state()
        .board()
        .iter()
        .position(|cell| *cell == Some(Player::O))
        .unwrap();

    // X's second move ages out its first mark.
    let free = (1..9).find(|&c| c != bot_cell).unwrap();
    session.attempt_move(Move::Cell(free)).unwrap();
    assert_eq!(session.state().expiring_cells(), vec![0]);

    // Expiry (200 ms) lands before the bot (500 ms) thinks.
    let events = session.advance(ms(500));
    assert_eq!(events.len(), 2);
    assert_eq!(events[0], SessionEvent::MarksExpired { cells: vec![0] });
    assert!(matches!(events[1], SessionEvent::BotMoved(_)));
}

#[test]
fn test_reset_drops_pending_expiry() {
    let config = GameConfig::default()
        .with_ruleset(Ruleset::Decay)
        .with_decay_turns(2);
    let mut session = GameSession::new(config).unwrap();
    for cell in [0, 1, 2] {
        session.attempt_move(Move::Cell(cell)).unwrap();
    }
    assert_eq!(session.pending_tasks(), 1);

    session.reset().unwrap();
    assert_eq!(session.pending_tasks(), 0);
    assert!(session.advance(ms(1_000)).is_empty());
    assert!(session.state().board().iter().all(Option::is_none));
}
