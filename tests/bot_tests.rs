//! Bot integration tests: difficulty cascades and full games.

use rust_gridgame::core::{
    Difficulty, GameConfig, GameMode, GameRng, GameState, Player, Ruleset, SolverConfig,
};
use rust_gridgame::rules::circles::{CircleMove, CircleSize};
use rust_gridgame::{attempt_move, compute_bot_move, create_game, Move};

fn bot_config(ruleset: Ruleset, difficulty: Difficulty) -> GameConfig {
    GameConfig::new(GameMode::Bot, 3, 3)
        .with_ruleset(ruleset)
        .with_difficulty(difficulty)
}

fn play(config: &GameConfig, moves: &[Move]) -> GameState {
    let state = create_game(config).unwrap();
    moves
        .iter()
        .fold(state, |s, &mv| attempt_move(&s, config, mv).unwrap())
}

/// Play out a game where `x` and `o` choose moves for their side.
fn self_play(x: &GameConfig, o: &GameConfig, rng: &mut GameRng) -> GameState {
    let mut state = create_game(x).unwrap();
    for _ in 0..64 {
        if state.is_terminal() {
            break;
        }
        let config = match state.current_player() {
            Player::X => x,
            Player::O => o,
        };
        let mv = compute_bot_move(&state, config, rng).unwrap().unwrap();
        state = attempt_move(&state, config, mv).unwrap();
    }
    state
}

// =============================================================================
// Classic Cascade
// =============================================================================

#[test]
fn test_normal_bot_blocks_on_larger_board() {
    let config = GameConfig::new(GameMode::Bot, 4, 3).with_difficulty(Difficulty::Normal);
    // X holds 5 and 10; the diagonal continues at 0 and 15.
    let state = play(&config, &[Move::Cell(5), Move::Cell(3), Move::Cell(10)]);
    let mv = compute_bot_move(&state, &config, &mut GameRng::new(0)).unwrap();
    assert_eq!(mv, Some(Move::Cell(0)));
}

#[test]
fn test_difficulty_defaults_to_normal() {
    let config = GameConfig::new(GameMode::Bot, 3, 3);
    assert_eq!(config.difficulty, None);
    let state = play(&config, &[Move::Cell(0)]);
    // Normal takes the centre; Easy would be random.
    for seed in 0..5 {
        let mv = compute_bot_move(&state, &config, &mut GameRng::new(seed)).unwrap();
        assert_eq!(mv, Some(Move::Cell(4)));
    }
}

#[test]
fn test_decay_bot_blocks_live_marks() {
    let config = bot_config(Ruleset::Decay, Difficulty::Normal).with_decay_turns(3);
    let state = play(&config, &[Move::Cell(0), Move::Cell(4), Move::Cell(1)]);
    // X threatens 2 through the still-live marks at 0 and 1.
    let mv = compute_bot_move(&state, &config, &mut GameRng::new(0)).unwrap();
    assert_eq!(mv, Some(Move::Cell(2)));
}

#[test]
fn test_anti_fork_edge_prevents_double_threat() {
    use rust_gridgame::rules::win::winning_cells_for;

    let hard = bot_config(Ruleset::Classic, Difficulty::Hard);
    let normal = bot_config(Ruleset::Classic, Difficulty::Normal);
    let mut rng = GameRng::new(4);

    let opening = play(&hard, &[Move::Cell(0)]);
    assert_eq!(compute_bot_move(&opening, &hard, &mut rng).unwrap(), Some(Move::Cell(4)));

    let state = play(&hard, &[Move::Cell(0), Move::Cell(4), Move::Cell(8)]);
    assert_eq!(compute_bot_move(&state, &hard, &mut rng).unwrap(), Some(Move::Cell(1)));

    // A corner here lets X fork: O 2 forces X to 6, which threatens 3 and 7.
    let Some(Move::Cell(corner)) = compute_bot_move(&state, &normal, &mut rng).unwrap() else {
        panic!("expected a cell move");
    };
    assert!(corner == 2 || corner == 6);
    let line: Vec<Move> = [0, 4, 8, 2, 6].into_iter().map(Move::Cell).collect();
    let forked = play(&normal, &line);
    assert_eq!(winning_cells_for(forked.board(), Player::X, 3, 3), vec![3, 7]);
}

// =============================================================================
// Circles Bots
// =============================================================================

#[test]
fn test_easy_circles_is_deterministic_per_seed() {
    let config = bot_config(Ruleset::Circles, Difficulty::Easy);
    let state = create_game(&config).unwrap();

    let a = compute_bot_move(&state, &config, &mut GameRng::new(99)).unwrap();
    let b = compute_bot_move(&state, &config, &mut GameRng::new(99)).unwrap();
    assert_eq!(a, b);
    assert!(matches!(a, Some(Move::Circle(_))));
}

#[test]
fn test_normal_circles_reinforces_threatened_cell() {
    use CircleSize::*;

    let config = bot_config(Ruleset::Circles, Difficulty::Normal);
    // X: small 0, small 1. O small on 2 blocks the row, X threatens to take it.
    let state = play(
        &config,
        &[
            Move::Circle(CircleMove::new(0, Small)),
            Move::Circle(CircleMove::new(2, Small)),
            Move::Circle(CircleMove::new(1, Small)),
        ],
    );
    let mv = compute_bot_move(&state, &config, &mut GameRng::new(0)).unwrap();
    // X can win by capturing 2 with a medium or large; O covers 2 with a large.
    assert_eq!(mv, Some(Move::Circle(CircleMove::new(2, Large))));
}

#[test]
fn test_circles_games_finish() {
    let normal = bot_config(Ruleset::Circles, Difficulty::Normal);
    let easy = bot_config(Ruleset::Circles, Difficulty::Easy);
    for seed in 0..10 {
        let state = self_play(&normal, &easy, &mut GameRng::new(seed));
        assert!(state.is_terminal(), "seed {seed}");
    }
}

#[test]
fn test_hard_circles_beats_easy_with_shallow_search() {
    let hard = bot_config(Ruleset::Circles, Difficulty::Hard)
        .with_solver(SolverConfig::default().with_max_depth(4));
    let easy = bot_config(Ruleset::Circles, Difficulty::Easy);

    let hard_wins = (0..6)
        .map(|seed| self_play(&hard, &easy, &mut GameRng::new(seed)))
        .filter(|state| state.outcome().winner() == Some(Player::X))
        .count();
    assert!(hard_wins > 0);
}
