//! Core engine types: players, configuration, state, errors, RNG.
//!
//! Everything here is ruleset-agnostic; the rules modules interpret the
//! ruleset payload carried by `GameState`.

pub mod config;
pub mod error;
pub mod player;
pub mod rng;
pub mod state;

pub use config::{DecayConfig, Difficulty, GameConfig, GameMode, Ruleset, SolverConfig, TimingConfig};
pub use error::{ConfigError, EngineError};
pub use player::{Player, PlayerMap};
pub use rng::GameRng;
pub use state::{Cell, CircleState, DecayState, GameState, Outcome, Placement, RulesetState};
