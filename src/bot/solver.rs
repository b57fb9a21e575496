//! Exhaustive minimax solver for the circles ruleset.
//!
//! Minimax with alpha-beta pruning, maximizing for the side to move at the
//! root. Decided positions score `±(1000 - ply)` so faster wins and slower
//! losses are preferred. Positions already searched are memoized in a
//! [`TranspositionTable`] for the duration of one call, with the eight
//! rotations and reflections of a position sharing one entry.
//!
//! The search runs on a flat board of top circles. A capture removes the
//! covered circle from play, so nothing below the top of a stack can matter
//! again. Win checks after a move only look at the lines through the
//! played cell. Move lists live on the stack for boards up to 3×3.
//!
//! With two circles of each size per side a 3×3 game lasts at most twelve
//! plies, so the default is to search to the end. Larger boards get a depth
//! cap (see [`SolverConfig::depth_for_grid`]) and a static evaluation at the
//! horizon.
//!
//! ```
//! use im::Vector;
//! use rust_gridgame::bot::solver::compute_best_move;
//! use rust_gridgame::core::{Player, SolverConfig};
//! use rust_gridgame::rules::circles::{CellStack, Inventory};
//!
//! let stacks: Vector<CellStack> = (0..9).map(|_| CellStack::new()).collect();
//! let full = Inventory::full();
//! let shallow = SolverConfig::default().with_max_depth(2);
//! let mv = compute_best_move(&stacks, &full, &full, Player::X, 3, 3, &shallow);
//! assert!(mv.is_some());
//! ```

use std::time::Instant;

use im::Vector;
use smallvec::SmallVec;
use tracing::instrument;

use crate::core::{EngineError, Player, PlayerMap, SolverConfig};
use crate::rules::circles::{top, CellStack, CircleMove, CircleSize, Inventory};
use crate::rules::win::win_lines;

use super::stats::SolverStats;
use super::tt::{EntryType, PositionKey, TranspositionTable};

/// Score of a win on the root ply; each further ply costs one point.
pub const WIN_SCORE: i32 = 1000;

const INF: i32 = WIN_SCORE * 10;

const INVENTORY_WEIGHT: i32 = 10;
const CONTROL_WEIGHT: i32 = 5;
const CENTER_WEIGHT: i32 = 3;

/// Bits per cell in a position key.
const CELL_BITS: u32 = 3;

/// Visible circle on a cell.
type Slot = Option<(Player, CircleSize)>;

/// Moves of one node. Three sizes on nine cells fit inline.
type MoveList = SmallVec<[CircleMove; 27]>;

/// Best move for `current`, or `None` if it has no legal move.
#[allow(clippy::too_many_arguments)]
#[must_use]
pub fn compute_best_move(
    stacks: &Vector<CellStack>,
    inv_x: &Inventory,
    inv_o: &Inventory,
    current: Player,
    grid_size: usize,
    win_length: usize,
    config: &SolverConfig,
) -> Option<CircleMove> {
    let inventories = PlayerMap::new(|player| match player {
        Player::X => *inv_x,
        Player::O => *inv_o,
    });
    Solver::new(grid_size, win_length, config).best_move(stacks, &inventories, current)
}

/// Mutable search position.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Position {
    cells: Vec<Slot>,
    inventories: PlayerMap<Inventory>,
}

/// What `make` changed, for `unmake`.
#[derive(Clone, Copy, Debug)]
struct Undo {
    cell: usize,
    previous: Slot,
    player: Player,
    inventory: Inventory,
}

impl Position {
    fn new(stacks: &Vector<CellStack>, inventories: &PlayerMap<Inventory>) -> Self {
        Self {
            cells: stacks
                .iter()
                .map(|stack| top(stack).map(|circle| (circle.owner, circle.size)))
                .collect(),
            inventories: inventories.clone(),
        }
    }

    fn owner(&self, cell: usize) -> Option<Player> {
        self.cells[cell].map(|(owner, _)| owner)
    }

    /// Legal moves in canonical order: size ascending, then cell ascending.
    fn moves(&self, player: Player) -> MoveList {
        let mut moves = MoveList::new();
        for size in self.inventories[player].available() {
            for (cell, &slot) in self.cells.iter().enumerate() {
                if fits(slot, size) {
                    moves.push(CircleMove { cell, size });
                }
            }
        }
        moves
    }

    fn has_move(&self, player: Player) -> bool {
        self.inventories[player]
            .available()
            .any(|size| self.cells.iter().any(|&slot| fits(slot, size)))
    }

    fn make(&mut self, mv: CircleMove, player: Player) -> Result<Undo, EngineError> {
        let inventory = self.inventories[player];
        self.inventories[player] = inventory.take(mv.size)?;
        let previous = std::mem::replace(&mut self.cells[mv.cell], Some((player, mv.size)));
        Ok(Undo {
            cell: mv.cell,
            previous,
            player,
            inventory,
        })
    }

    fn unmake(&mut self, undo: Undo) {
        self.cells[undo.cell] = undo.previous;
        self.inventories[undo.player] = undo.inventory;
    }
}

fn fits(slot: Slot, size: CircleSize) -> bool {
    slot.map_or(true, |(_, covered)| size.covers(covered))
}

/// Key code of a cell: 0 when empty, else 1-6 by owner and size.
fn slot_code(slot: Slot) -> u64 {
    slot.map_or(0, |(owner, size)| {
        1 + owner.index() as u64 * 3 + u64::from(size.value()) - 1
    })
}

/// Circles solver with its per-call memo and statistics.
pub struct Solver {
    grid_size: usize,
    win_length: usize,
    max_depth: Option<u32>,
    lines: Vec<Vec<usize>>,
    /// Indices into `lines` of the lines through each cell.
    lines_through: Vec<SmallVec<[usize; 8]>>,
    /// Cell permutations of the eight board symmetries.
    symmetries: Vec<Vec<usize>>,
    tt: TranspositionTable,
    stats: SolverStats,
    /// Side the search maximizes for.
    bot: Player,
}

impl Solver {
    #[must_use]
    pub fn new(grid_size: usize, win_length: usize, config: &SolverConfig) -> Self {
        let lines = win_lines(grid_size, win_length);
        let mut lines_through = vec![SmallVec::new(); grid_size * grid_size];
        for (index, line) in lines.iter().enumerate() {
            for &cell in line {
                lines_through[cell].push(index);
            }
        }

        Self {
            grid_size,
            win_length,
            max_depth: config.depth_for_grid(grid_size),
            lines,
            lines_through,
            symmetries: symmetries(grid_size),
            tt: TranspositionTable::new(),
            stats: SolverStats::default(),
            bot: Player::X,
        }
    }

    /// Statistics from the last call to [`Solver::best_move`].
    #[must_use]
    pub fn stats(&self) -> &SolverStats {
        &self.stats
    }

    /// Search the position and return the best move for `to_move`.
    ///
    /// Moves are tried in canonical order at the root; a later move replaces
    /// the current best only with a strictly higher score.
    #[instrument(skip_all, fields(player = %to_move, grid = self.grid_size, win = self.win_length))]
    pub fn best_move(
        &mut self,
        stacks: &Vector<CellStack>,
        inventories: &PlayerMap<Inventory>,
        to_move: Player,
    ) -> Option<CircleMove> {
        let start = Instant::now();
        self.stats.reset();
        self.tt.clear();
        self.bot = to_move;

        let mut pos = Position::new(stacks, inventories);
        if pos.cells.len() != self.lines_through.len() {
            tracing::warn!(cells = pos.cells.len(), "board does not match solver grid");
            return None;
        }
        let moves = pos.moves(to_move);

        // Nothing beats winning on this ply; the first such move is the answer.
        if let Some(&mv) = moves.iter().find(|mv| self.wins_with(&pos, mv.cell, to_move)) {
            self.stats.time_us = start.elapsed().as_micros() as u64;
            tracing::debug!(best = ?mv, "immediate win");
            return Some(mv);
        }

        let mut best: Option<CircleMove> = None;
        let mut best_score = -INF;
        for mv in moves {
            let Ok(undo) = pos.make(mv, to_move) else {
                continue;
            };
            let score = self.search(&mut pos, 1, best_score, INF, to_move.other());
            pos.unmake(undo);

            if best.is_none() || score > best_score {
                best = Some(mv);
                best_score = score;
            }
        }

        self.stats.time_us = start.elapsed().as_micros() as u64;
        tracing::debug!(
            best = ?best,
            score = best_score,
            nodes = self.stats.nodes,
            tt_hits = self.stats.tt_hits,
            cutoffs = self.stats.cutoffs,
            time_us = self.stats.time_us,
            "solver finished"
        );
        best
    }

    /// Value of a position that no line has completed yet.
    fn search(
        &mut self,
        pos: &mut Position,
        ply: u32,
        mut alpha: i32,
        mut beta: i32,
        to_move: Player,
    ) -> i32 {
        self.stats.nodes += 1;
        self.stats.max_ply = self.stats.max_ply.max(ply);

        let moves = pos.moves(to_move);
        if moves.is_empty() {
            if !pos.has_move(to_move.other()) {
                return 0;
            }
            return self.search(pos, ply + 1, alpha, beta, to_move.other());
        }

        if moves.iter().any(|mv| self.wins_with(&*pos, mv.cell, to_move)) {
            let score = WIN_SCORE - (ply as i32 + 1);
            return if to_move == self.bot { score } else { -score };
        }

        // No line can complete before the ply after next.
        let ceiling = WIN_SCORE - (ply as i32 + 2);
        if alpha >= ceiling {
            return ceiling;
        }
        if beta <= -ceiling {
            return -ceiling;
        }

        if self.max_depth.is_some_and(|depth| ply >= depth) {
            return self.evaluate(pos);
        }

        let remaining = self.max_depth.map_or(u32::MAX, |depth| depth - ply);
        let key = self.key(pos, to_move);
        if let Some(score) = self.tt.probe(&key, remaining, ply, alpha, beta) {
            self.stats.tt_hits += 1;
            return score;
        }

        let (alpha_orig, beta_orig) = (alpha, beta);
        let maximizing = to_move == self.bot;
        let mut best = if maximizing { -INF } else { INF };

        for mv in order_by_capture(&pos.cells, &moves) {
            let Ok(undo) = pos.make(mv, to_move) else {
                continue;
            };
            let score = self.search(pos, ply + 1, alpha, beta, to_move.other());
            pos.unmake(undo);

            if maximizing {
                best = best.max(score);
                alpha = alpha.max(score);
            } else {
                best = best.min(score);
                beta = beta.min(score);
            }
            if alpha >= beta {
                self.stats.cutoffs += 1;
                break;
            }
        }

        let entry_type = if best <= alpha_orig {
            EntryType::UpperBound
        } else if best >= beta_orig {
            EntryType::LowerBound
        } else {
            EntryType::Exact
        };
        self.tt.store(key, remaining, ply, best, entry_type);
        best
    }

    /// Whether `player` completes a line by taking `cell`.
    fn wins_with(&self, pos: &Position, cell: usize, player: Player) -> bool {
        self.lines_through[cell].iter().any(|&line| {
            self.lines[line]
                .iter()
                .all(|&i| i == cell || pos.owner(i) == Some(player))
        })
    }

    /// Static evaluation from the bot's side at the depth horizon.
    fn evaluate(&self, pos: &Position) -> i32 {
        let opponent = self.bot.other();
        let inventory =
            pos.inventories[self.bot].total() as i32 - pos.inventories[opponent].total() as i32;

        let control: i32 = (0..pos.cells.len())
            .map(|cell| match pos.owner(cell) {
                Some(owner) if owner == self.bot => 1,
                Some(_) => -1,
                None => 0,
            })
            .sum();

        let center = if self.grid_size % 2 == 1 {
            match pos.owner(pos.cells.len() / 2) {
                Some(owner) if owner == self.bot => CENTER_WEIGHT,
                Some(_) => -CENTER_WEIGHT,
                None => 0,
            }
        } else {
            0
        };

        inventory * INVENTORY_WEIGHT + control * CONTROL_WEIGHT + center
    }

    /// Exact key shared by all symmetric copies of a position: the smallest
    /// packed board over the eight symmetries, then a word holding the mover
    /// and both inventories.
    fn key(&self, pos: &Position, to_move: Player) -> PositionKey {
        let mut best: Option<PositionKey> = None;
        for symmetry in &self.symmetries {
            let mut words = PositionKey::new();
            let mut word = 0u64;
            let mut used = 0;
            for &cell in symmetry {
                if used + CELL_BITS > u64::BITS {
                    words.push(word);
                    word = 0;
                    used = 0;
                }
                word |= slot_code(pos.cells[cell]) << used;
                used += CELL_BITS;
            }
            words.push(word);
            if best.as_ref().map_or(true, |b| words < *b) {
                best = Some(words);
            }
        }

        let mut header = to_move.index() as u64;
        for (i, count) in Player::ALL
            .iter()
            .flat_map(|&player| pos.inventories[player].counts())
            .enumerate()
        {
            header |= u64::from(count) << (8 * (i + 1));
        }

        let mut key = best.unwrap_or_default();
        key.push(header);
        key
    }
}

/// The eight rotations and reflections of an `n`×`n` board, as maps from
/// key position to board cell.
fn symmetries(n: usize) -> Vec<Vec<usize>> {
    (0..8u8)
        .map(|transform| {
            let mut map = Vec::with_capacity(n * n);
            for row in 0..n {
                for col in 0..n {
                    let (mut r, mut c) = (row, col);
                    if transform & 1 != 0 {
                        c = n - 1 - c;
                    }
                    if transform & 2 != 0 {
                        r = n - 1 - r;
                    }
                    if transform & 4 != 0 {
                        std::mem::swap(&mut r, &mut c);
                    }
                    map.push(r * n + c);
                }
            }
            map
        })
        .collect()
}

/// Largest captures first; ties keep canonical order.
fn order_by_capture(cells: &[Slot], moves: &[CircleMove]) -> MoveList {
    let captured = |mv: &CircleMove| cells[mv.cell].map_or(0, |(_, size)| size.value());
    let mut ordered = MoveList::new();
    for value in (0..=CircleSize::Large.value()).rev() {
        ordered.extend(moves.iter().copied().filter(|mv| captured(mv) == value));
    }
    ordered
}
