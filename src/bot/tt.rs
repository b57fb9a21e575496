//! Transposition table for the circles solver.
//!
//! Positions are keyed by an exact packed encoding rather than a hash, so
//! two entries never collide. Win/loss scores are stored relative to the
//! node they were computed at and re-anchored on probe, which keeps them
//! valid when the same position is reached at a different ply.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Packed canonical encoding of a position (see `Solver::key`). Boards up
/// to 6×6 fit inline.
pub type PositionKey = SmallVec<[u64; 3]>;

/// Scores above this magnitude are decided results, not heuristics.
pub const DECIDED_BOUND: i32 = 500;

/// How a stored score relates to the true value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryType {
    /// Exact score: the window contained the true value
    Exact,
    /// Lower bound: true value >= stored (beta cutoff)
    LowerBound,
    /// Upper bound: true value <= stored (failed low)
    UpperBound,
}

#[derive(Debug, Clone, Copy)]
struct TtEntry {
    /// Plies searched below this node (`u32::MAX` = to game end).
    remaining: u32,
    score: i32,
    entry_type: EntryType,
}

/// Memo of searched positions.
#[derive(Debug, Default)]
pub struct TranspositionTable {
    entries: FxHashMap<PositionKey, TtEntry>,
}

impl TranspositionTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Look up a usable score for a node at `ply` with the given window.
    ///
    /// Entries searched shallower than `remaining` are ignored, as are bound
    /// entries that do not settle the window.
    #[must_use]
    pub fn probe(
        &self,
        key: &PositionKey,
        remaining: u32,
        ply: u32,
        alpha: i32,
        beta: i32,
    ) -> Option<i32> {
        let entry = self.entries.get(key)?;
        if entry.remaining < remaining {
            return None;
        }

        let score = from_tt(entry.score, ply);
        match entry.entry_type {
            EntryType::Exact => Some(score),
            EntryType::LowerBound if score >= beta => Some(score),
            EntryType::UpperBound if score <= alpha => Some(score),
            _ => None,
        }
    }

    /// Store a result, keeping the deeper of two searches of one position.
    pub fn store(
        &mut self,
        key: PositionKey,
        remaining: u32,
        ply: u32,
        score: i32,
        entry_type: EntryType,
    ) {
        let entry = TtEntry {
            remaining,
            score: to_tt(score, ply),
            entry_type,
        };
        self.entries
            .entry(key)
            .and_modify(|existing| {
                if remaining >= existing.remaining {
                    *existing = entry;
                }
            })
            .or_insert(entry);
    }
}

/// Make a decided score relative to the storing node.
fn to_tt(score: i32, ply: u32) -> i32 {
    let ply = ply as i32;
    if score > DECIDED_BOUND {
        score + ply
    } else if score < -DECIDED_BOUND {
        score - ply
    } else {
        score
    }
}

/// Re-anchor a stored decided score at the probing node's ply.
fn from_tt(score: i32, ply: u32) -> i32 {
    let ply = ply as i32;
    if score > DECIDED_BOUND {
        score - ply
    } else if score < -DECIDED_BOUND {
        score + ply
    } else {
        score
    }
}
