//! Structured error types for moves, bot computation and configuration.

use crate::rules::circles::CircleSize;

/// Errors raised by move transitions and bot computation.
///
/// Every transition builds a fresh state and only returns it on success, so
/// an `Err` always means the caller's state is untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("cannot place a {size} circle on cell {cell}")]
    InvalidPlacement { cell: usize, size: CircleSize },

    #[error("no {size} circles left in inventory")]
    InventoryExhausted { size: CircleSize },

    #[error("no legal move available")]
    NoLegalMove,

    #[error("{expected} state is not initialized for this game")]
    StateNotInitialized { expected: &'static str },

    #[error("this ruleset takes {expected} moves")]
    WrongMoveKind { expected: &'static str },

    #[error("cell {cell} is outside a board of {cells} cells")]
    CellOutOfRange { cell: usize, cells: usize },

    #[error("cell {0} is already occupied")]
    CellOccupied(usize),

    #[error("game is already over")]
    GameOver,

    #[error("input is locked while the bot is thinking")]
    InputLocked,

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors that can occur when validating a game configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("config validation error: {0}")]
    Validation(String),
}
