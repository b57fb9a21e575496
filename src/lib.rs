//! # rust-gridgame
//!
//! A turn-based N-in-a-row engine with three rule variants and a computer
//! opponent.
//!
//! ## Design Principles
//!
//! 1. **Pure Transitions**: Every move produces a new `GameState`; a
//!    rejected move leaves the old one untouched.
//!
//! 2. **Any Board Size**: Win detection is generalized over grid size and
//!    win length and shared by the rules, the heuristics and the solver.
//!
//! 3. **Configuration Over Convention**: A `GameConfig` chosen at creation
//!    fixes the ruleset, board and bot for the whole game.
//!
//! ## Architecture
//!
//! - **Rulesets**: classic marks, decaying marks that expire after a fixed
//!   number of turns, and sized circles where larger circles capture
//!   smaller ones.
//!
//! - **Bots**: random (Easy), tactical cascades (Normal), and for circles an
//!   exhaustive minimax solver with alpha-beta pruning and a transposition
//!   table (Hard).
//!
//! - **Persistent Data Structures**: Decay placements and circle stacks use
//!   `im` so state snapshots share structure.
//!
//! ## Modules
//!
//! - `core`: players, configuration, state, errors, RNG
//! - `rules`: win detection and the three rule variants
//! - `bot`: bot move selection and the circles solver
//! - `game`: stateless entry points
//! - `session`: timed bot turns and mark expiry on a logical clock

pub mod bot;
pub mod core;
pub mod game;
pub mod rules;
pub mod session;

// Re-export commonly used types
pub use crate::core::{
    ConfigError, DecayConfig, Difficulty, EngineError, GameConfig, GameMode, GameRng, GameState,
    Outcome, Player, PlayerMap, Ruleset, SolverConfig, TimingConfig,
};

pub use crate::rules::{
    check_draw, check_winner, Circle, CircleMove, CircleSize, Inventory, Move, RulesEngine, WinLine,
};

pub use crate::bot::{compute_best_move, Solver, SolverStats};

pub use crate::game::{
    apply_expiry, attempt_move, compute_bot_move, create_game, legal_moves, reset_game,
    select_size, suggest_move,
};

pub use crate::session::{GameSession, SessionEvent};
