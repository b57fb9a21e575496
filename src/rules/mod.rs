//! Rule variants.
//!
//! - `win`: shared win-line and draw detection
//! - `classic`: permanent marks
//! - `decay`: marks that expire after a fixed number of turns
//! - `circles`: pure placement/capture rules for sized circles
//! - `stacking`: turn state machine for the circles ruleset
//!
//! Each variant implements `RulesEngine`; `rules_for` picks one from a
//! `GameConfig`.

pub mod circles;
pub mod classic;
pub mod decay;
pub mod engine;
pub mod stacking;
pub mod win;

pub use circles::{Circle, CircleMove, CircleSize, Inventory};
pub use classic::ClassicRules;
pub use decay::{apply_expiry, DecayRules};
pub use engine::{rules_for, Move, RulesEngine};
pub use stacking::{select_size, CircleRules};
pub use win::{check_draw, check_winner, WinLine};
