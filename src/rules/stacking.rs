//! Turn state machine for the stacking-circles ruleset.
//!
//! Wraps the pure placement rules in [`super::circles`] with turn order,
//! win/draw evaluation and size preselection. A player with no legal
//! placement while the opponent still has one passes; the game is drawn only
//! when both are stuck.

use tracing::instrument;

use crate::core::{CircleState, EngineError, GameConfig, GameState, RulesetState};

use super::circles::{
    check_circles_draw, derive_board, has_legal_move, legal_circle_moves, place_circle,
    reselect_size, CircleMove, CircleSize,
};
use super::engine::{guard_cell, settle, Move, RulesEngine};

/// Circles rules.
#[derive(Clone, Copy, Debug)]
pub struct CircleRules<'a> {
    config: &'a GameConfig,
}

impl<'a> CircleRules<'a> {
    #[must_use]
    pub fn new(config: &'a GameConfig) -> Self {
        Self { config }
    }
}

impl RulesEngine for CircleRules<'_> {
    fn config(&self) -> &GameConfig {
        self.config
    }

    fn legal_moves(&self, state: &GameState) -> Result<Vec<Move>, EngineError> {
        let circles = state.circles()?;
        if state.is_terminal() {
            return Ok(Vec::new());
        }
        let inventory = &circles.inventories[state.current_player()];
        Ok(legal_circle_moves(&circles.stacks, inventory)
            .into_iter()
            .map(Move::Circle)
            .collect())
    }

    #[instrument(skip(self, state), fields(player = %state.current_player(), turn = state.turn()))]
    fn apply_move(&self, state: &GameState, mv: Move) -> Result<GameState, EngineError> {
        let circles = state.circles()?;
        let CircleMove { cell, size } = match mv {
            Move::Circle(mv) => mv,
            Move::Cell(cell) => CircleMove {
                cell,
                size: circles.selected_size.ok_or(EngineError::NoLegalMove)?,
            },
        };
        guard_cell(state, cell)?;

        let player = state.current_player();
        let placed = place_circle(
            &circles.stacks,
            &circles.inventories[player],
            cell,
            size,
            player,
            circles.next_circle_id,
        )?;
        if let Some(captured) = placed.captured {
            tracing::debug!(cell, size = %size, captured_size = %captured.size, captured_owner = %captured.owner, "circle captured");
        }

        let mut inventories = circles.inventories.clone();
        inventories[player] = placed.inventory;

        let opponent = player.other();
        let next_player = if has_legal_move(&placed.stacks, &inventories[opponent])
            || !has_legal_move(&placed.stacks, &inventories[player])
        {
            opponent
        } else {
            tracing::debug!(%opponent, "no legal placement, turn passes");
            player
        };

        let board = derive_board(&placed.stacks);
        let mut next = state.clone();
        next.board = board.clone();
        let stacks = placed.stacks;
        settle(
            &mut next,
            self.config,
            &board,
            || check_circles_draw(&stacks, &inventories),
            next_player,
        );

        let selected_size = reselect_size(circles.selected_size, &inventories[next.current_player()]);
        next.payload = RulesetState::Circles(CircleState {
            stacks,
            inventories,
            selected_size,
            next_circle_id: circles.next_circle_id + 1,
        });
        Ok(next)
    }
}

/// Change the preselected size for the player to move.
///
/// The size must still be in that player's inventory.
pub fn select_size(state: &GameState, size: CircleSize) -> Result<GameState, EngineError> {
    let circles = state.circles()?;
    if !circles.inventories[state.current_player()].has(size) {
        return Err(EngineError::InventoryExhausted { size });
    }
    let mut next = state.clone();
    next.payload = RulesetState::Circles(CircleState {
        selected_size: Some(size),
        ..circles.clone()
    });
    Ok(next)
}
