//! Easy and Normal bots for the circles ruleset.
//!
//! Normal runs a tactical cascade:
//!
//! 1. any move that wins now
//! 2. if the opponent threatens to win, block each threatened cell with the
//!    largest size that can be placed there, best heuristic score first
//! 3. otherwise the move with the highest heuristic score, after a 1-ply
//!    safety check
//!
//! Step 2 answers one threat per turn. When the opponent has two threatened
//! cells only one gets blocked, and the game can be lost on the next move.

use im::Vector;

use crate::core::{GameRng, Player, PlayerMap};
use crate::rules::circles::{
    can_place, derive_board, legal_circle_moves, place_circle, top, CellStack, CircleMove,
    Inventory,
};
use crate::rules::win::has_line;

const CAPTURE_WEIGHT: i32 = 30;
const SMALL_PREFERENCE: i32 = 5;
const CENTER_BONUS: i32 = 8;
const CORNER_BONUS: i32 = 4;
const CONTROL_WEIGHT: i32 = 2;
const SELF_COVER_BASE: i32 = 40;
const SELF_COVER_SIZE: i32 = 20;
const SELF_COVER_JUMP: i32 = 15;

/// Penalty for a move that lets the opponent win on the next ply.
pub const UNSAFE_PENALTY: i32 = -10_000;

/// Read-only view of a circles position.
#[derive(Clone, Copy, Debug)]
pub struct CircleView<'a> {
    pub stacks: &'a Vector<CellStack>,
    pub inventories: &'a PlayerMap<Inventory>,
    pub grid_size: usize,
    pub win_length: usize,
}

impl CircleView<'_> {
    /// Whether `player` completes a line by playing `mv`. Off-board moves
    /// never win.
    #[must_use]
    pub fn wins_with(&self, mv: CircleMove, player: Player) -> bool {
        let mut board = derive_board(self.stacks);
        let Some(cell) = board.get_mut(mv.cell) else {
            return false;
        };
        *cell = Some(player);
        has_line(&board, player, self.grid_size, self.win_length)
    }

    /// Cells where the opponent of `player` could win next ply, ascending.
    #[must_use]
    pub fn threatened_cells(&self, player: Player) -> Vec<usize> {
        let opponent = player.other();
        let mut cells: Vec<usize> = legal_circle_moves(self.stacks, &self.inventories[opponent])
            .into_iter()
            .filter(|&mv| self.wins_with(mv, opponent))
            .map(|mv| mv.cell)
            .collect();
        cells.sort_unstable();
        cells.dedup();
        cells
    }
}

/// Uniformly random legal move.
#[must_use]
pub fn random_move(view: &CircleView<'_>, player: Player, rng: &mut GameRng) -> Option<CircleMove> {
    let moves = legal_circle_moves(view.stacks, &view.inventories[player]);
    rng.choose(&moves).copied()
}

/// Normal-difficulty move for `player`.
#[must_use]
pub fn normal_move(view: &CircleView<'_>, player: Player) -> Option<CircleMove> {
    let moves = legal_circle_moves(view.stacks, &view.inventories[player]);
    if moves.is_empty() {
        return None;
    }

    if let Some(&mv) = moves.iter().find(|&&mv| view.wins_with(mv, player)) {
        tracing::trace!(?mv, "taking win");
        return Some(mv);
    }

    let threatened = view.threatened_cells(player);
    if !threatened.is_empty() {
        let blocks: Vec<CircleMove> = threatened
            .iter()
            .filter_map(|&cell| largest_block(view, player, cell))
            .collect();
        if let Some(mv) = best_by(&blocks, |&mv| score_or_min(view, mv, player)) {
            tracing::trace!(?mv, threats = threatened.len(), "blocking");
            return Some(mv);
        }
    }

    best_by(&moves, |&mv| {
        score_or_min(view, mv, player).saturating_add(safety(view, mv, player))
    })
}

fn score_or_min(view: &CircleView<'_>, mv: CircleMove, player: Player) -> i32 {
    score_move(view, mv, player).unwrap_or(i32::MIN)
}

/// Largest size `player` can place on `cell`.
fn largest_block(view: &CircleView<'_>, player: Player, cell: usize) -> Option<CircleMove> {
    let stack = &view.stacks[cell];
    view.inventories[player]
        .available()
        .filter(|&size| can_place(stack, size))
        .last()
        .map(|size| CircleMove { cell, size })
}

/// Highest-scoring move; the first one wins ties.
fn best_by(moves: &[CircleMove], score: impl Fn(&CircleMove) -> i32) -> Option<CircleMove> {
    let mut best: Option<(CircleMove, i32)> = None;
    for mv in moves {
        let s = score(mv);
        if best.map_or(true, |(_, b)| s > b) {
            best = Some((*mv, s));
        }
    }
    best.map(|(mv, _)| mv)
}

/// Positional score of `mv` for `player`, or `None` if the cell is off the
/// board. Pure.
#[must_use]
pub fn score_move(view: &CircleView<'_>, mv: CircleMove, player: Player) -> Option<i32> {
    let stack = view.stacks.get(mv.cell)?;
    let size = i32::from(mv.size.value());
    let mut score = SMALL_PREFERENCE * (4 - size);

    match top(stack) {
        Some(covered) if covered.owner != player => {
            score += CAPTURE_WEIGHT * i32::from(covered.size.value());
        }
        Some(covered) => {
            let jump = size - i32::from(covered.size.value());
            score -= SELF_COVER_BASE + SELF_COVER_SIZE * size + SELF_COVER_JUMP * jump;
        }
        None => {}
    }

    if view.grid_size == 3 {
        if mv.cell == 4 {
            score += CENTER_BONUS;
        } else if [0, 2, 6, 8].contains(&mv.cell) {
            score += CORNER_BONUS;
        }
    }

    let mut board = derive_board(view.stacks);
    board[mv.cell] = Some(player);
    let controlled = board.iter().filter(|&&cell| cell == Some(player)).count() as i32;
    Some(score + CONTROL_WEIGHT * controlled)
}

/// `UNSAFE_PENALTY` if some opponent reply to `mv` wins immediately.
fn safety(view: &CircleView<'_>, mv: CircleMove, player: Player) -> i32 {
    let Ok(placed) = place_circle(
        view.stacks,
        &view.inventories[player],
        mv.cell,
        mv.size,
        player,
        0,
    ) else {
        return UNSAFE_PENALTY;
    };
    let mut inventories = view.inventories.clone();
    inventories[player] = placed.inventory;

    let after = CircleView {
        stacks: &placed.stacks,
        inventories: &inventories,
        grid_size: view.grid_size,
        win_length: view.win_length,
    };
    if after.threatened_cells(player).is_empty() {
        0
    } else {
        UNSAFE_PENALTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::circles::{Circle, CircleSize};

    use CircleSize::*;

    fn stacks_from(cells: &[(usize, Player, CircleSize)]) -> Vector<CellStack> {
        let mut stacks: Vector<CellStack> = (0..9).map(|_| CellStack::new()).collect();
        for (i, &(cell, owner, size)) in cells.iter().enumerate() {
            let mut stack = stacks[cell].clone();
            stack.pop();
            stack.push(Circle { id: i as u32, owner, size });
            stacks.set(cell, stack);
        }
        stacks
    }

    fn view<'a>(stacks: &'a Vector<CellStack>, inventories: &'a PlayerMap<Inventory>) -> CircleView<'a> {
        CircleView {
            stacks,
            inventories,
            grid_size: 3,
            win_length: 3,
        }
    }

    #[test]
    fn test_takes_win() {
        let stacks = stacks_from(&[(0, Player::O, Small), (1, Player::O, Small), (4, Player::X, Small)]);
        let inventories = PlayerMap::with_value(Inventory::from_counts(0, 2, 2));
        let mv = normal_move(&view(&stacks, &inventories), Player::O).unwrap();
        assert_eq!(mv, CircleMove::new(2, Medium));
    }

    #[test]
    fn test_blocks_with_largest_size() {
        let stacks = stacks_from(&[(0, Player::X, Small), (1, Player::X, Small), (4, Player::O, Small)]);
        let inventories = PlayerMap::with_value(Inventory::from_counts(0, 2, 2));
        let mv = normal_move(&view(&stacks, &inventories), Player::O).unwrap();
        assert_eq!(mv, CircleMove::new(2, Large));
    }

    #[test]
    fn test_capture_scores_above_empty_cell() {
        let stacks = stacks_from(&[(3, Player::X, Small)]);
        let inventories = PlayerMap::with_value(Inventory::full());
        let v = view(&stacks, &inventories);

        let capture = score_move(&v, CircleMove::new(3, Medium), Player::O);
        let empty = score_move(&v, CircleMove::new(5, Medium), Player::O);
        assert!(capture > empty);
    }

    #[test]
    fn test_self_cover_penalized_by_jump() {
        let stacks = stacks_from(&[(4, Player::O, Small)]);
        let inventories = PlayerMap::with_value(Inventory::full());
        let v = view(&stacks, &inventories);

        let medium = score_move(&v, CircleMove::new(4, Medium), Player::O);
        let large = score_move(&v, CircleMove::new(4, Large), Player::O);
        let elsewhere = score_move(&v, CircleMove::new(1, Medium), Player::O);
        assert!(medium < elsewhere);
        assert!(large < medium);
    }

    #[test]
    fn test_off_board_move_is_not_scored() {
        let stacks = stacks_from(&[]);
        let inventories = PlayerMap::with_value(Inventory::full());
        let v = view(&stacks, &inventories);
        let mv = CircleMove::new(9, Small);

        assert_eq!(score_move(&v, mv, Player::X), None);
        assert!(!v.wins_with(mv, Player::X));
        assert!(score_move(&v, CircleMove::new(8, Small), Player::X).is_some());
    }

    #[test]
    fn test_score_is_pure() {
        let stacks = stacks_from(&[(0, Player::X, Medium), (8, Player::O, Small)]);
        let inventories = PlayerMap::with_value(Inventory::full());
        let v = view(&stacks, &inventories);
        let mv = CircleMove::new(0, Large);
        assert_eq!(score_move(&v, mv, Player::O), score_move(&v, mv, Player::O));
        assert_eq!(stacks, stacks_from(&[(0, Player::X, Medium), (8, Player::O, Small)]));
    }

    #[test]
    fn test_unblockable_threat_answered_by_capture() {
        // X threatens to capture O's medium on 2 and finish row 0. O has no
        // large circle to cover 2, so it must break the line instead.
        let stacks = stacks_from(&[
            (0, Player::X, Small),
            (1, Player::X, Small),
            (2, Player::O, Medium),
        ]);
        let inventories = PlayerMap::new(|p| match p {
            Player::X => Inventory::from_counts(0, 1, 2),
            Player::O => Inventory::from_counts(2, 1, 0),
        });
        let v = view(&stacks, &inventories);
        assert_eq!(v.threatened_cells(Player::O), vec![2]);

        assert_eq!(safety(&v, CircleMove::new(4, Small), Player::O), UNSAFE_PENALTY);
        assert_eq!(normal_move(&v, Player::O), Some(CircleMove::new(0, Medium)));
    }

    #[test]
    fn test_two_threats_only_one_blocked() {
        // X threatens 2 (row 0) and 6 (column 0); O can only answer one.
        let stacks = stacks_from(&[
            (0, Player::X, Large),
            (1, Player::X, Large),
            (3, Player::X, Medium),
            (4, Player::O, Small),
        ]);
        let inventories = PlayerMap::new(|p| match p {
            Player::X => Inventory::from_counts(2, 1, 0),
            Player::O => Inventory::from_counts(1, 2, 2),
        });
        let v = view(&stacks, &inventories);
        assert_eq!(v.threatened_cells(Player::O), vec![2, 6]);

        let mv = normal_move(&v, Player::O).unwrap();
        assert!(mv.cell == 2 || mv.cell == 6);
        assert_eq!(mv.size, Large);
    }

    #[test]
    fn test_random_move_is_legal() {
        let stacks = stacks_from(&[(4, Player::X, Large)]);
        let inventories = PlayerMap::with_value(Inventory::full());
        let v = view(&stacks, &inventories);
        let mut rng = GameRng::new(11);
        for _ in 0..20 {
            let mv = random_move(&v, Player::O, &mut rng).unwrap();
            assert_ne!(mv.cell, 4);
        }
    }

    #[test]
    fn test_no_moves_gives_none() {
        let stacks = stacks_from(&[]);
        let inventories = PlayerMap::with_value(Inventory::empty());
        assert_eq!(normal_move(&view(&stacks, &inventories), Player::X), None);
    }
}
