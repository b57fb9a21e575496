//! Decaying-marks rules.
//!
//! Every mark remembers the turn it was placed on. When a move is made at
//! turn `t`, each mark with `t - turn_placed >= decay.turns` becomes
//! *expiring*: it stays on the board (so it can fade out) until
//! [`apply_expiry`] removes the whole batch.
//!
//! Whether expiring marks still count toward that same move's win and draw
//! checks is decided by `DecayConfig::count_expiring_marks`.

use im::OrdSet;
use tracing::instrument;

use crate::core::{DecayState, EngineError, GameConfig, GameState, Placement, RulesetState};

use super::engine::{guard_cell, settle, Move, RulesEngine};

/// Decay rules.
#[derive(Clone, Copy, Debug)]
pub struct DecayRules<'a> {
    config: &'a GameConfig,
}

impl<'a> DecayRules<'a> {
    #[must_use]
    pub fn new(config: &'a GameConfig) -> Self {
        Self { config }
    }
}

impl RulesEngine for DecayRules<'_> {
    fn config(&self) -> &GameConfig {
        self.config
    }

    fn legal_moves(&self, state: &GameState) -> Result<Vec<Move>, EngineError> {
        state.decay()?;
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
        let decay = state.decay()?;
        let Move::Cell(cell) = mv else {
            return Err(EngineError::WrongMoveKind { expected: "cell" });
        };
        guard_cell(state, cell)?;
        // Expiring marks still occupy their cell until removed.
        if state.board[cell].is_some() {
            return Err(EngineError::CellOccupied(cell));
        }

        let player = state.current_player();
        let turn = state.turn();
        let threshold = self.config.decay.turns;

        let mut placements = decay.placements.clone();
        placements.push_back(Placement {
            cell,
            player,
            turn_placed: turn,
        });

        let expiring: OrdSet<usize> = placements
            .iter()
            .filter(|p| turn.saturating_sub(p.turn_placed) >= threshold)
            .map(|p| p.cell)
            .collect();
        let expiry_batch = if expiring.is_empty() {
            decay.expiry_batch
        } else {
            tracing::debug!(cells = ?expiring, batch = decay.expiry_batch + 1, "marks expiring");
            decay.expiry_batch + 1
        };

        let next_decay = DecayState {
            placements,
            expiring,
            expiry_batch,
        };
        let cells = self.config.cell_count();
        let shown = next_decay.board(cells, true);
        let settled = next_decay.board(cells, false);
        // Win and draw are both judged on this board.
        let judged = if self.config.decay.count_expiring_marks {
            shown.clone()
        } else {
            settled
        };

        let mut next = state.clone();
        next.board = shown;
        next.payload = RulesetState::Decay(next_decay);
        settle(
            &mut next,
            self.config,
            &judged,
            || judged.iter().all(Option::is_some),
            player.other(),
        );
        Ok(next)
    }
}

/// Remove the marks of expiry batch `batch`.
///
/// A no-op when `batch` is stale (a later move started a new batch), when
/// nothing is expiring, or when the game is already over, so calling it twice
/// is harmless.
#[instrument(skip(state), fields(turn = state.turn()))]
pub fn apply_expiry(state: &GameState, batch: u64) -> Result<GameState, EngineError> {
    let decay = state.decay()?;
    if batch != decay.expiry_batch || decay.expiring.is_empty() || state.is_terminal() {
        return Ok(state.clone());
    }

    let placements = decay
        .placements
        .iter()
        .filter(|p| !decay.expiring.contains(&p.cell))
        .copied()
        .collect();
    let next_decay = DecayState {
        placements,
        expiring: OrdSet::new(),
        expiry_batch: decay.expiry_batch,
    };
    tracing::debug!(removed = decay.expiring.len(), "expired marks removed");

    let mut next = state.clone();
    next.board = next_decay.board(state.board.len(), true);
    next.payload = RulesetState::Decay(next_decay);
    Ok(next)
}
