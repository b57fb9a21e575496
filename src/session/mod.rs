//! Single-threaded game session with timed bot and expiry tasks.
//!
//! A [`GameSession`] owns the authoritative state and serializes every
//! transition through it. Time is logical: the host calls
//! [`GameSession::advance`] with the elapsed time and due tasks run in
//! order.
//!
//! - A bot turn locks human input and schedules the bot's move after
//!   `bot_think_ms`, plus a failsafe after `bot_failsafe_ms` that unlocks
//!   input if the move never lands. At most one bot turn is pending.
//! - A decay move with expiring marks schedules their removal after
//!   `expiry_delay_ms`. A later move or a reset supersedes it.
//!
//! ```
//! use std::time::Duration;
//! use rust_gridgame::core::{GameConfig, GameMode};
//! use rust_gridgame::rules::Move;
//! use rust_gridgame::session::GameSession;
//!
//! let config = GameConfig::new(GameMode::Bot, 3, 3).with_seed(1);
//! let mut session = GameSession::new(config).unwrap();
//! session.attempt_move(Move::Cell(4)).unwrap();
//! assert!(session.is_input_locked());
//!
//! session.advance(Duration::from_millis(500));
//! assert!(!session.is_input_locked());
//! assert_eq!(session.state().turn(), 2);
//! ```

pub mod task;

pub use task::{ScheduledTask, TaskId, TaskKind, TaskQueue};

use std::time::Duration;

use crate::bot::compute_bot_move;
use crate::core::{ConfigError, EngineError, GameConfig, GameRng, GameState};
use crate::game::{apply_expiry, attempt_move, create_game, reset_game, select_size};
use crate::rules::{CircleSize, Move};

/// Something that happened while running scheduled tasks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// The bot played a move.
    BotMoved(Move),
    /// The bot produced no playable move; input was unlocked.
    BotGaveUp,
    /// The failsafe fired before the bot moved; input was unlocked.
    BotTimedOut,
    /// Expiring marks were removed.
    MarksExpired { cells: Vec<usize> },
}

/// Tasks belonging to the bot turn in flight.
#[derive(Clone, Copy, Debug)]
struct PendingBot {
    think: TaskId,
    failsafe: TaskId,
}

/// Authoritative game state plus its scheduled work.
#[derive(Debug)]
pub struct GameSession {
    config: GameConfig,
    state: GameState,
    rng: GameRng,
    tasks: TaskQueue,
    now: Duration,
    input_locked: bool,
    pending_bot: Option<PendingBot>,
    pending_expiry: Option<TaskId>,
}

impl GameSession {
    /// Start a session. If the bot moves first its turn is scheduled.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        let state = create_game(&config)?;
        let rng = GameRng::from_seed(config.seed);
        let mut session = Self {
            config,
            state,
            rng,
            tasks: TaskQueue::new(),
            now: Duration::ZERO,
            input_locked: false,
            pending_bot: None,
            pending_expiry: None,
        };
        session.schedule_bot();
        Ok(session)
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Session time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Whether human moves are currently refused.
    #[must_use]
    pub fn is_input_locked(&self) -> bool {
        self.input_locked
    }

    /// Whether a bot turn is scheduled and has not resolved.
    #[must_use]
    pub fn is_bot_pending(&self) -> bool {
        self.pending_bot.is_some()
    }

    /// Number of scheduled tasks.
    #[must_use]
    pub fn pending_tasks(&self) -> usize {
        self.tasks.len()
    }

    /// Play a human move.
    pub fn attempt_move(&mut self, mv: Move) -> Result<&GameState, EngineError> {
        if self.input_locked {
            return Err(EngineError::InputLocked);
        }
        let next = attempt_move(&self.state, &self.config, mv)?;
        self.commit(next);
        Ok(&self.state)
    }

    /// Preselect a circle size for the player to move.
    pub fn select_size(&mut self, size: CircleSize) -> Result<&GameState, EngineError> {
        if self.input_locked {
            return Err(EngineError::InputLocked);
        }
        self.state = select_size(&self.state, size)?;
        Ok(&self.state)
    }

    /// Start over with the same configuration, dropping all pending tasks.
    pub fn reset(&mut self) -> Result<&GameState, ConfigError> {
        self.tasks.clear();
        self.pending_bot = None;
        self.pending_expiry = None;
        self.input_locked = false;
        self.state = reset_game(&self.config)?;
        tracing::info!("session reset");
        self.schedule_bot();
        Ok(&self.state)
    }

    /// Move the clock forward and run every task that falls due.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<SessionEvent> {
        let target = self.now + elapsed;
        let mut events = Vec::new();
        while let Some(task) = self.tasks.pop_due(target) {
            self.now = self.now.max(task.due);
            if let Some(event) = self.run(task) {
                events.push(event);
            }
        }
        self.now = target;
        events
    }

    fn run(&mut self, task: ScheduledTask) -> Option<SessionEvent> {
        tracing::trace!(id = %task.id, kind = ?task.kind, "task fired");
        match task.kind {
            TaskKind::BotMove => self.run_bot(),
            TaskKind::BotFailsafe => {
                let pending = self.pending_bot.take()?;
                self.tasks.cancel(pending.think);
                self.input_locked = false;
                tracing::warn!(turn = self.state.turn(), "bot move timed out; input unlocked");
                Some(SessionEvent::BotTimedOut)
            }
            TaskKind::Expiry { batch } => {
                self.pending_expiry = None;
                let cells = self.state.expiring_cells();
                match apply_expiry(&self.state, batch) {
                    Ok(next) if next != self.state => {
                        self.state = next;
                        Some(SessionEvent::MarksExpired { cells })
                    }
                    Ok(_) => None,
                    Err(err) => {
                        tracing::warn!(%err, batch, "expiry failed");
                        None
                    }
                }
            }
        }
    }

    fn run_bot(&mut self) -> Option<SessionEvent> {
        let pending = self.pending_bot.take()?;
        self.tasks.cancel(pending.failsafe);
        self.input_locked = false;

        let mut rng = self.rng.fork();
        let chosen = compute_bot_move(&self.state, &self.config, &mut rng)
            .and_then(|mv| match mv {
                Some(mv) => attempt_move(&self.state, &self.config, mv).map(|next| Some((mv, next))),
                None => Ok(None),
            });

        match chosen {
            Ok(Some((mv, next))) => {
                self.commit(next);
                Some(SessionEvent::BotMoved(mv))
            }
            Ok(None) => {
                tracing::warn!(turn = self.state.turn(), "bot found no move; input unlocked");
                Some(SessionEvent::BotGaveUp)
            }
            Err(err) => {
                tracing::warn!(%err, "bot move failed; input unlocked");
                Some(SessionEvent::BotGaveUp)
            }
        }
    }

    /// Install a new state and schedule what it calls for.
    fn commit(&mut self, next: GameState) {
        self.state = next;

        if let Some(id) = self.pending_expiry.take() {
            self.tasks.cancel(id);
        }
        if let Ok(decay) = self.state.decay() {
            if !decay.expiring.is_empty() && !self.state.is_terminal() {
                let due = self.now + Duration::from_millis(self.config.timing.expiry_delay_ms);
                let batch = decay.expiry_batch;
                self.pending_expiry = Some(self.tasks.schedule(TaskKind::Expiry { batch }, due));
                tracing::debug!(batch, ?due, "expiry scheduled");
            }
        }

        self.schedule_bot();
    }

    /// Lock input and schedule the bot if it is the bot's turn.
    fn schedule_bot(&mut self) {
        if self.pending_bot.is_some() || self.state.is_terminal() {
            return;
        }
        if self.config.bot() != Some(self.state.current_player()) {
            return;
        }

        let timing = &self.config.timing;
        let think = self.now + Duration::from_millis(timing.bot_think_ms);
        let failsafe = self.now + Duration::from_millis(timing.bot_failsafe_ms);
        self.pending_bot = Some(PendingBot {
            think: self.tasks.schedule(TaskKind::BotMove, think),
            failsafe: self.tasks.schedule(TaskKind::BotFailsafe, failsafe),
        });
        self.input_locked = true;
        tracing::debug!(player = %self.state.current_player(), ?think, "bot turn scheduled");
    }
}
