//! Computer opponent.
//!
//! - `classic`: win/block/positional cascade for classic and decay
//! - `circles`: random and heuristic bots for circles
//! - `solver`: exhaustive minimax for Hard circles
//!
//! [`compute_bot_move`] picks the right one from the game configuration.
//! It never mutates the state; apply the returned move through the rules.

pub mod circles;
pub mod classic;
pub mod solver;
pub mod stats;
pub mod tt;

pub use circles::{score_move, CircleView};
pub use solver::{compute_best_move, Solver};
pub use stats::SolverStats;
pub use tt::{EntryType, TranspositionTable};

use tracing::instrument;

use crate::core::{Difficulty, EngineError, GameConfig, GameRng, GameState, Ruleset};
use crate::rules::Move;

/// Move the bot would play for the side to move, or `None` if there is no
/// legal move (or the game is over).
///
/// Errors only when the state does not belong to the configured ruleset.
#[instrument(skip_all, fields(ruleset = config.ruleset.name(), player = %state.current_player()))]
pub fn compute_bot_move(
    state: &GameState,
    config: &GameConfig,
    rng: &mut GameRng,
) -> Result<Option<Move>, EngineError> {
    let difficulty = config.effective_difficulty();
    let player = state.current_player();
    let grid_size = config.grid_size;
    let win_length = config.win_length;

    let mv = match config.ruleset {
        Ruleset::Classic | Ruleset::Decay => {
            if config.ruleset == Ruleset::Decay {
                state.decay()?;
            }
            if state.is_terminal() {
                return Ok(None);
            }
            classic::choose_cell(state.board(), player, difficulty, grid_size, win_length, rng)
                .map(Move::Cell)
        }
        Ruleset::Circles => {
            let circles = state.circles()?;
            if state.is_terminal() {
                return Ok(None);
            }
            let view = CircleView {
                stacks: &circles.stacks,
                inventories: &circles.inventories,
                grid_size,
                win_length,
            };
            let mv = match difficulty {
                Difficulty::Easy => circles::random_move(&view, player, rng),
                Difficulty::Normal => circles::normal_move(&view, player),
                Difficulty::Hard => {
                    let mut solver = Solver::new(grid_size, win_length, &config.solver);
                    solver.best_move(&circles.stacks, &circles.inventories, player)
                }
            };
            mv.map(Move::Circle)
        }
    };

    tracing::debug!(?difficulty, mv = ?mv, "bot move chosen");
    Ok(mv)
}
