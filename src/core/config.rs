//! Game configuration types.
//!
//! The presentation layer supplies a `GameConfig` once when a game is
//! created. It is never mutated mid-game; a new game needs a new config (or a
//! clone of the old one).
//!
//! ```
//! use rust_gridgame::core::{Difficulty, GameConfig, GameMode, Ruleset};
//!
//! let config = GameConfig::new(GameMode::Bot, 3, 3)
//!     .with_ruleset(Ruleset::Circles)
//!     .with_difficulty(Difficulty::Hard);
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use super::player::Player;

/// Who is on the other side of the board.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    /// Two humans sharing one device.
    #[default]
    Local,
    /// Human against the computer.
    Bot,
    /// Remote opponent. Not implemented; played like `Local`.
    Online,
}

/// Bot strength.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

/// Rule variant governing placement, expiry and capture.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ruleset {
    /// Plain N-in-a-row.
    #[default]
    Classic,
    /// Marks vanish after a fixed number of turns.
    Decay,
    /// Sized circles; larger ones capture smaller ones.
    Circles,
}

impl Ruleset {
    /// Lowercase name used in logs and errors.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Ruleset::Classic => "classic",
            Ruleset::Decay => "decay",
            Ruleset::Circles => "circles",
        }
    }
}

/// Decay ruleset parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecayConfig {
    /// A mark expires once it is this many turns old.
    pub turns: u32,

    /// Whether marks that expire on a move still count toward that move's
    /// win and draw checks.
    pub count_expiring_marks: bool,
}

impl Default for DecayConfig {
    fn default() -> Self {
        Self {
            turns: 7,
            count_expiring_marks: true,
        }
    }
}

/// Delays used by the session scheduler, in milliseconds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Delay between a decay move and the removal of its expiring marks.
    pub expiry_delay_ms: u64,

    /// Delay before the bot plays, while input is locked.
    pub bot_think_ms: u64,

    /// Input is force-unlocked if the bot has not delivered by then.
    pub bot_failsafe_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            expiry_delay_ms: 200,
            bot_think_ms: 500,
            bot_failsafe_ms: 2000,
        }
    }
}

/// Hard bot search parameters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Maximum search depth in plies (`None` = search to game end).
    ///
    /// Unset on boards larger than 3×3 means `DEFAULT_LARGE_BOARD_DEPTH`.
    pub max_depth: Option<u32>,
}

impl SolverConfig {
    /// Depth cap applied on boards larger than 3×3 when none is configured.
    pub const DEFAULT_LARGE_BOARD_DEPTH: u32 = 4;

    /// Search to the end of the game.
    #[must_use]
    pub fn unbounded() -> Self {
        Self { max_depth: None }
    }

    /// Limit the search to `depth` plies.
    #[must_use]
    pub fn with_max_depth(mut self, depth: u32) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Effective depth limit for a board of the given size.
    #[must_use]
    pub fn depth_for_grid(&self, grid_size: usize) -> Option<u32> {
        match self.max_depth {
            Some(depth) => Some(depth),
            None if grid_size > 3 => Some(Self::DEFAULT_LARGE_BOARD_DEPTH),
            None => None,
        }
    }
}

/// Complete per-game configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Local, bot or (stub) online play.
    pub mode: GameMode,

    /// Board side length; the board has `grid_size²` cells.
    pub grid_size: usize,

    /// Run length needed to win.
    pub win_length: usize,

    /// Bot strength; `None` means `Normal` in bot mode.
    #[serde(default)]
    pub difficulty: Option<Difficulty>,

    /// Rule variant.
    #[serde(default)]
    pub ruleset: Ruleset,

    /// Decay ruleset parameters.
    #[serde(default)]
    pub decay: DecayConfig,

    /// Scheduler delays.
    #[serde(default)]
    pub timing: TimingConfig,

    /// Hard bot search limits.
    #[serde(default)]
    pub solver: SolverConfig,

    /// Side played by the bot in bot mode.
    #[serde(default = "default_bot_player")]
    pub bot_player: Player,

    /// Seed for bot randomness; `None` seeds from entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_bot_player() -> Player {
    Player::O
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new(GameMode::Local, 3, 3)
    }
}

impl GameConfig {
    /// Create a classic configuration with default parameters.
    #[must_use]
    pub fn new(mode: GameMode, grid_size: usize, win_length: usize) -> Self {
        Self {
            mode,
            grid_size,
            win_length,
            difficulty: None,
            ruleset: Ruleset::Classic,
            decay: DecayConfig::default(),
            timing: TimingConfig::default(),
            solver: SolverConfig::default(),
            bot_player: default_bot_player(),
            seed: None,
        }
    }

    /// Set the rule variant.
    #[must_use]
    pub fn with_ruleset(mut self, ruleset: Ruleset) -> Self {
        self.ruleset = ruleset;
        self
    }

    /// Set the bot difficulty.
    #[must_use]
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    /// Set the decay threshold in turns.
    #[must_use]
    pub fn with_decay_turns(mut self, turns: u32) -> Self {
        self.decay.turns = turns;
        self
    }

    /// Choose whether expiring marks count toward the same move's win check.
    #[must_use]
    pub fn with_count_expiring_marks(mut self, count: bool) -> Self {
        self.decay.count_expiring_marks = count;
        self
    }

    /// Set the scheduler delays.
    #[must_use]
    pub fn with_timing(mut self, timing: TimingConfig) -> Self {
        self.timing = timing;
        self
    }

    /// Set the hard bot search limits.
    #[must_use]
    pub fn with_solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }

    /// Set the side the bot plays.
    #[must_use]
    pub fn with_bot_player(mut self, player: Player) -> Self {
        self.bot_player = player;
        self
    }

    /// Set the RNG seed for reproducible bot play.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of cells on the board.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.grid_size * self.grid_size
    }

    /// Bot difficulty with the default applied.
    #[must_use]
    pub fn effective_difficulty(&self) -> Difficulty {
        self.difficulty.unwrap_or_default()
    }

    /// The side the bot plays, if this game has a bot.
    #[must_use]
    pub fn bot(&self) -> Option<Player> {
        match self.mode {
            GameMode::Bot => Some(self.bot_player),
            GameMode::Local | GameMode::Online => None,
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size < 3 {
            return Err(ConfigError::Validation("grid_size must be >= 3".into()));
        }
        if self.win_length < 3 || self.win_length > self.grid_size {
            return Err(ConfigError::Validation(format!(
                "win_length must be in 3..={}",
                self.grid_size
            )));
        }
        if self.ruleset == Ruleset::Decay && self.decay.turns == 0 {
            return Err(ConfigError::Validation("decay.turns must be > 0".into()));
        }
        if self.solver.max_depth == Some(0) {
            return Err(ConfigError::Validation(
                "solver.max_depth must be > 0".into(),
            ));
        }
        if self.timing.bot_failsafe_ms == 0 {
            return Err(ConfigError::Validation(
                "timing.bot_failsafe_ms must be > 0".into(),
            ));
        }
        Ok(())
    }
}
