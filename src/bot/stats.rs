//! Solver statistics for diagnostics and tuning.

use serde::{Deserialize, Serialize};

/// Statistics collected during one solver call.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverStats {
    /// Nodes visited (including terminal and pass nodes).
    pub nodes: u64,

    /// Nodes answered from the transposition table.
    pub tt_hits: u64,

    /// Alpha-beta cutoffs.
    pub cutoffs: u64,

    /// Deepest ply reached.
    pub max_ply: u32,

    /// Total time spent searching (microseconds).
    pub time_us: u64,
}

impl SolverStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Nodes per second.
    #[must_use]
    pub fn nodes_per_second(&self) -> f64 {
        if self.time_us == 0 {
            0.0
        } else {
            self.nodes as f64 / (self.time_us as f64 / 1_000_000.0)
        }
    }

    /// Fraction of nodes answered from the table.
    #[must_use]
    pub fn tt_hit_rate(&self) -> f64 {
        if self.nodes == 0 {
            0.0
        } else {
            self.tt_hits as f64 / self.nodes as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_default() {
        let stats = SolverStats::new();
        assert_eq!(stats.nodes, 0);
        assert_eq!(stats.tt_hit_rate(), 0.0);
    }

    #[test]
    fn test_nodes_per_second() {
        let mut stats = SolverStats::new();
        stats.nodes = 5000;
        stats.time_us = 500_000;

        assert_eq!(stats.nodes_per_second(), 10_000.0);
    }

    #[test]
    fn test_stats_reset() {
        let mut stats = SolverStats::new();
        stats.nodes = 100;
        stats.cutoffs = 7;

        stats.reset();

        assert_eq!(stats, SolverStats::default());
    }

    #[test]
    fn test_stats_serialization() {
        let mut stats = SolverStats::new();
        stats.tt_hits = 42;

        let json = serde_json::to_string(&stats).unwrap();
        let deserialized: SolverStats = serde_json::from_str(&json).unwrap();

        assert_eq!(stats, deserialized);
    }
}
