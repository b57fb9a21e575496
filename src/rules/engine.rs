//! Rules engine trait for the rule variants.
//!
//! Each ruleset implements `RulesEngine` to define:
//! - What moves are legal
//! - How a move produces the next state
//! - When the game is over
//!
//! Transitions never mutate their input. They clone the snapshot, apply the
//! move, and hand back the new state only when every check passed.

use serde::{Deserialize, Serialize};

use crate::core::{Cell, EngineError, GameConfig, GameState, Outcome, Ruleset};

use super::circles::CircleMove;
use super::classic::ClassicRules;
use super::decay::DecayRules;
use super::stacking::CircleRules;
use super::win::check_winner;

/// A move request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    /// Mark a cell. In the circles ruleset this places the selected size.
    Cell(usize),
    /// Place a circle of an explicit size.
    Circle(CircleMove),
}

impl Move {
    /// Target cell.
    #[must_use]
    pub const fn cell(&self) -> usize {
        match self {
            Move::Cell(cell) => *cell,
            Move::Circle(mv) => mv.cell,
        }
    }
}

impl From<CircleMove> for Move {
    fn from(mv: CircleMove) -> Self {
        Move::Circle(mv)
    }
}

/// Rules engine trait.
///
/// ## Implementation Notes
///
/// - `legal_moves`: empty once the game is over
/// - `apply_move`: must leave `state` unchanged and return an error for any
///   rejected move
pub trait RulesEngine {
    /// Get the game configuration.
    fn config(&self) -> &GameConfig;

    /// Legal moves for the player to move.
    fn legal_moves(&self, state: &GameState) -> Result<Vec<Move>, EngineError>;

    /// Apply a move for the player to move.
    fn apply_move(&self, state: &GameState, mv: Move) -> Result<GameState, EngineError>;

    /// Final outcome, or `None` while the game continues.
    fn is_terminal<'s>(&self, state: &'s GameState) -> Option<&'s Outcome> {
        state.outcome().is_terminal().then(|| state.outcome())
    }
}

/// Rules engine for a configuration's ruleset.
#[must_use]
pub fn rules_for(config: &GameConfig) -> Box<dyn RulesEngine + '_> {
    match config.ruleset {
        Ruleset::Classic => Box::new(ClassicRules::new(config)),
        Ruleset::Decay => Box::new(DecayRules::new(config)),
        Ruleset::Circles => Box::new(CircleRules::new(config)),
    }
}

/// Reject moves on finished games and cells off the board.
pub(crate) fn guard_cell(state: &GameState, cell: usize) -> Result<(), EngineError> {
    if state.is_terminal() {
        return Err(EngineError::GameOver);
    }
    let cells = state.board.len();
    if cell >= cells {
        return Err(EngineError::CellOutOfRange { cell, cells });
    }
    Ok(())
}

/// Evaluate the move just applied to `next`.
///
/// `win_board` is the board the win check runs on and `is_draw` the
/// ruleset's draw predicate. On a non-terminal result the turn passes to
/// `next_player` and the turn counter advances.
pub(crate) fn settle(
    next: &mut GameState,
    config: &GameConfig,
    win_board: &[Cell],
    is_draw: impl FnOnce() -> bool,
    next_player: crate::core::Player,
) {
    if let Some(win) = check_winner(win_board, config.grid_size, config.win_length) {
        tracing::debug!(winner = %win.winner, line = ?win.line, "game won");
        next.outcome = Outcome::Won {
            winner: win.winner,
            line: win.line,
        };
    } else if is_draw() {
        tracing::debug!(turn = next.turn, "game drawn");
        next.outcome = Outcome::Draw;
    } else {
        next.current_player = next_player;
        next.turn += 1;
    }
}
