//! Game state snapshots.
//!
//! ## GameState
//!
//! One immutable snapshot per transition:
//! - Derived flat board (what the presentation layer draws)
//! - Current player and turn counter
//! - Outcome (in progress, won with its line, or drawn)
//! - Ruleset payload (decay placements or circle stacks and inventories)
//!
//! In the decay and circles rulesets the board is a projection of the
//! payload and is rebuilt on every transition; the payload is the source of
//! truth.
//!
//! Uses `im` persistent collections so snapshots clone in O(1).

use im::{OrdSet, Vector};
use serde::{Deserialize, Serialize};

use super::config::{GameConfig, Ruleset};
use super::error::EngineError;
use super::player::{Player, PlayerMap};
use crate::rules::circles::{self, CellStack, CircleSize, Inventory};

/// Contents of one board cell.
pub type Cell = Option<Player>;

/// Game outcome. At most one terminal condition can hold.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    #[default]
    InProgress,
    /// A player completed `line` (cell indices in scan direction).
    Won { winner: Player, line: Vec<usize> },
    Draw,
}

impl Outcome {
    /// Whether the game has ended.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::InProgress)
    }

    /// The winner, if any.
    #[must_use]
    pub fn winner(&self) -> Option<Player> {
        match self {
            Outcome::Won { winner, .. } => Some(*winner),
            _ => None,
        }
    }

    /// The completed line, if any.
    #[must_use]
    pub fn winning_line(&self) -> Option<&[usize]> {
        match self {
            Outcome::Won { line, .. } => Some(line),
            _ => None,
        }
    }

    /// Whether the game ended in a draw.
    #[must_use]
    pub fn is_draw(&self) -> bool {
        matches!(self, Outcome::Draw)
    }
}

/// A decay-ruleset mark.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placement {
    pub cell: usize,
    pub player: Player,
    /// Turn counter value when the mark was placed.
    pub turn_placed: u32,
}

/// Decay ruleset payload.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecayState {
    /// Live marks in placement order.
    pub placements: Vector<Placement>,

    /// Cells whose marks have expired but are still shown while fading out.
    pub expiring: OrdSet<usize>,

    /// Bumped by every move that marks cells as expiring. A deferred removal
    /// only applies to the batch it was scheduled for.
    pub expiry_batch: u64,
}

impl DecayState {
    /// Project placements onto a flat board.
    #[must_use]
    pub fn board(&self, cells: usize, include_expiring: bool) -> Vec<Cell> {
        let mut board = vec![None; cells];
        for placement in self.placements.iter() {
            if include_expiring || !self.expiring.contains(&placement.cell) {
                board[placement.cell] = Some(placement.player);
            }
        }
        board
    }
}

/// Circles ruleset payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircleState {
    /// One stack per cell; last element is the visible circle.
    pub stacks: Vector<CellStack>,

    /// Remaining circles per player.
    pub inventories: PlayerMap<Inventory>,

    /// Size the current player will place when none is given explicitly.
    pub selected_size: Option<CircleSize>,

    /// Identity for the next circle placed.
    pub next_circle_id: u32,
}

impl CircleState {
    /// Empty board with full starting inventories.
    #[must_use]
    pub fn new(cells: usize) -> Self {
        Self {
            stacks: (0..cells).map(|_| CellStack::new()).collect(),
            inventories: PlayerMap::with_value(Inventory::full()),
            selected_size: Some(CircleSize::Small),
            next_circle_id: 0,
        }
    }

    /// Project stacks onto a flat board of top-circle owners.
    #[must_use]
    pub fn board(&self) -> Vec<Cell> {
        circles::derive_board(&self.stacks)
    }
}

/// Ruleset-specific part of the state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RulesetState {
    Classic,
    Decay(DecayState),
    Circles(CircleState),
}

/// Complete game state snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub(crate) grid_size: usize,
    pub(crate) board: Vec<Cell>,
    pub(crate) current_player: Player,
    pub(crate) turn: u32,
    pub(crate) outcome: Outcome,
    pub(crate) payload: RulesetState,
}

impl GameState {
    /// Fresh state for a configuration: empty board, `X` to move, turn 0.
    #[must_use]
    pub fn new(config: &GameConfig) -> Self {
        let cells = config.cell_count();
        let payload = match config.ruleset {
            Ruleset::Classic => RulesetState::Classic,
            Ruleset::Decay => RulesetState::Decay(DecayState::default()),
            Ruleset::Circles => RulesetState::Circles(CircleState::new(cells)),
        };

        Self {
            grid_size: config.grid_size,
            board: vec![None; cells],
            current_player: Player::X,
            turn: 0,
            outcome: Outcome::InProgress,
            payload,
        }
    }

    /// Board side length.
    #[must_use]
    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    /// Derived flat board, row-major.
    #[must_use]
    pub fn board(&self) -> &[Cell] {
        &self.board
    }

    /// Player to move.
    #[must_use]
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Turn counter (number of completed, non-terminal moves).
    #[must_use]
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Current outcome.
    #[must_use]
    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    /// Whether the game has ended.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.outcome.is_terminal()
    }

    /// Ruleset payload.
    #[must_use]
    pub fn payload(&self) -> &RulesetState {
        &self.payload
    }

    /// Decay payload, or `StateNotInitialized` for other rulesets.
    pub fn decay(&self) -> Result<&DecayState, EngineError> {
        match &self.payload {
            RulesetState::Decay(decay) => Ok(decay),
            _ => Err(EngineError::StateNotInitialized { expected: "decay" }),
        }
    }

    /// Circles payload, or `StateNotInitialized` for other rulesets.
    pub fn circles(&self) -> Result<&CircleState, EngineError> {
        match &self.payload {
            RulesetState::Circles(circles) => Ok(circles),
            _ => Err(EngineError::StateNotInitialized { expected: "circles" }),
        }
    }

    /// Cells marked as expiring (empty outside the decay ruleset).
    #[must_use]
    pub fn expiring_cells(&self) -> Vec<usize> {
        match &self.payload {
            RulesetState::Decay(decay) => decay.expiring.iter().copied().collect(),
            _ => Vec::new(),
        }
    }
}
