//! Classic N-in-a-row rules.

use tracing::instrument;

use crate::core::{EngineError, GameConfig, GameState, RulesetState};

use super::engine::{guard_cell, settle, Move, RulesEngine};
use super::win::check_draw;

/// Classic rules: marks are permanent, a full board without a line draws.
#[derive(Clone, Copy, Debug)]
pub struct ClassicRules<'a> {
    config: &'a GameConfig,
}

impl<'a> ClassicRules<'a> {
    #[must_use]
    pub fn new(config: &'a GameConfig) -> Self {
        Self { config }
    }
}

impl RulesEngine for ClassicRules<'_> {
    fn config(&self) -> &GameConfig {
        self.config
    }

    fn legal_moves(&self, state: &GameState) -> Result<Vec<Move>, EngineError> {
        if state.is_terminal() {
            return Ok(Vec::new());
        }
        Ok(state
            .board()
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_none())
            .map(|(i, _)| Move::Cell(i))
            .collect())
    }

    #[instrument(skip(self, state), fields(player = %state.current_player(), turn = state.turn()))]
    fn apply_move(&self, state: &GameState, mv: Move) -> Result<GameState, EngineError> {
        if !matches!(state.payload(), RulesetState::Classic) {
            return Err(EngineError::StateNotInitialized { expected: "classic" });
        }
        let Move::Cell(cell) = mv else {
            return Err(EngineError::WrongMoveKind { expected: "cell" });
        };
        guard_cell(state, cell)?;
        if state.board[cell].is_some() {
            return Err(EngineError::CellOccupied(cell));
        }

        let player = state.current_player();
        let mut next = state.clone();
        next.board[cell] = Some(player);

        let board = next.board.clone();
        settle(&mut next, self.config, &board, || check_draw(&board), player.other());
        Ok(next)
    }
}
