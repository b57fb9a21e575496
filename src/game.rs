//! Stateless entry points for callers that own the game state themselves.
//!
//! Every function takes the current state by reference and returns a new
//! one; nothing here holds state between calls. [`crate::session`] wraps
//! these with input locking and timed bot/expiry tasks.

use tracing::instrument;

use crate::core::{ConfigError, EngineError, GameConfig, GameMode, GameRng, GameState};
use crate::rules::{rules_for, Move};

pub use crate::bot::compute_bot_move;
pub use crate::rules::{apply_expiry, select_size};

/// Validate `config` and build the starting state.
#[instrument(skip_all, fields(ruleset = config.ruleset.name(), grid = config.grid_size))]
pub fn create_game(config: &GameConfig) -> Result<GameState, ConfigError> {
    config.validate()?;
    if config.mode == GameMode::Online {
        tracing::warn!("online play has no transport; running as a local game");
    }
    tracing::info!(
        mode = ?config.mode,
        win_length = config.win_length,
        difficulty = ?config.bot().map(|_| config.effective_difficulty()),
        "game created"
    );
    Ok(GameState::new(config))
}

/// Fresh starting state for the same configuration.
pub fn reset_game(config: &GameConfig) -> Result<GameState, ConfigError> {
    create_game(config)
}

/// Apply `mv` for the player to move.
///
/// On error the input state is untouched and still valid.
pub fn attempt_move(
    state: &GameState,
    config: &GameConfig,
    mv: Move,
) -> Result<GameState, EngineError> {
    rules_for(config).apply_move(state, mv)
}

/// Legal moves for the player to move under `config`'s rules.
pub fn legal_moves(state: &GameState, config: &GameConfig) -> Result<Vec<Move>, EngineError> {
    rules_for(config).legal_moves(state)
}

/// Convenience for a one-off bot move with a seeded or entropy RNG.
pub fn suggest_move(state: &GameState, config: &GameConfig) -> Result<Option<Move>, EngineError> {
    let mut rng = GameRng::from_seed(config.seed);
    compute_bot_move(state, config, &mut rng)
}
