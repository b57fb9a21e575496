//! Bot for the mark-placing rulesets (classic and decay).
//!
//! Easy plays a uniformly random free cell. Normal and Hard run a fixed
//! cascade and take the first step that yields a cell:
//!
//! 1. complete a line
//! 2. block the opponent's line
//! 3. (Hard, 3×3) anti-fork: holding the centre against two opposite
//!    corners, play an edge
//! 4. the centre (3×3)
//! 5. a random free corner (3×3)
//! 6. a random free cell

use crate::core::{Cell, Difficulty, GameRng, Player};
use crate::rules::win::winning_cells_for;

const CENTER: usize = 4;
const CORNERS: [usize; 4] = [0, 2, 6, 8];
const EDGES: [usize; 4] = [1, 3, 5, 7];
const OPPOSITE_CORNERS: [(usize, usize); 2] = [(0, 8), (2, 6)];

/// Pick a cell for `player`, or `None` on a full board.
#[must_use]
pub fn choose_cell(
    board: &[Cell],
    player: Player,
    difficulty: Difficulty,
    grid_size: usize,
    win_length: usize,
    rng: &mut GameRng,
) -> Option<usize> {
    let free: Vec<usize> = free_cells(board);
    if free.is_empty() {
        return None;
    }

    if difficulty == Difficulty::Easy {
        return rng.choose(&free).copied();
    }

    let opponent = player.other();
    if let Some(&cell) = winning_cells_for(board, player, grid_size, win_length).first() {
        tracing::trace!(cell, "taking win");
        return Some(cell);
    }
    if let Some(&cell) = winning_cells_for(board, opponent, grid_size, win_length).first() {
        tracing::trace!(cell, "blocking");
        return Some(cell);
    }

    if grid_size == 3 {
        if difficulty == Difficulty::Hard {
            if let Some(cell) = anti_fork(board, player) {
                tracing::trace!(cell, "anti-fork edge");
                return Some(cell);
            }
        }
        if board[CENTER].is_none() {
            return Some(CENTER);
        }
        let corners: Vec<usize> = CORNERS.into_iter().filter(|&c| board[c].is_none()).collect();
        if let Some(&cell) = rng.choose(&corners) {
            return Some(cell);
        }
    }

    rng.choose(&free).copied()
}

/// First free edge when `player` holds the centre and the opponent holds
/// both ends of a diagonal.
fn anti_fork(board: &[Cell], player: Player) -> Option<usize> {
    if board[CENTER] != Some(player) {
        return None;
    }
    let opponent = Some(player.other());
    let forked = OPPOSITE_CORNERS
        .iter()
        .any(|&(a, b)| board[a] == opponent && board[b] == opponent);
    if !forked {
        return None;
    }
    EDGES.into_iter().find(|&e| board[e].is_none())
}

fn free_cells(board: &[Cell]) -> Vec<usize> {
    board
        .iter()
        .enumerate()
        .filter(|(_, cell)| cell.is_none())
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const X: Cell = Some(Player::X);
    const O: Cell = Some(Player::O);
    const E: Cell = None;

    fn pick(board: &[Cell], difficulty: Difficulty) -> Option<usize> {
        choose_cell(board, Player::O, difficulty, 3, 3, &mut GameRng::new(1))
    }

    #[test]
    fn test_full_board_gives_none() {
        let board = [X, O, X, X, O, O, O, X, X];
        assert_eq!(pick(&board, Difficulty::Hard), None);
        assert_eq!(pick(&board, Difficulty::Easy), None);
    }

    #[test]
    fn test_win_preferred_over_block() {
        // O can finish column 1; X threatens row 0.
        let board = [X, O, X, E, O, E, E, E, X];
        assert_eq!(pick(&board, Difficulty::Normal), Some(7));
    }

    #[test]
    fn test_blocks_opponent() {
        let board = [X, X, E, E, O, E, E, E, E];
        assert_eq!(pick(&board, Difficulty::Normal), Some(2));
    }

    #[test]
    fn test_takes_centre_then_corner() {
        let board = [X, E, E, E, E, E, E, E, E];
        assert_eq!(pick(&board, Difficulty::Normal), Some(4));

        let board = [E, E, E, E, X, E, E, E, E];
        let cell = pick(&board, Difficulty::Normal).unwrap();
        assert!(CORNERS.contains(&cell));
    }

    #[test]
    fn test_hard_answers_diagonal_fork_with_edge() {
        // X on opposite corners, O in the centre.
        let board = [X, E, E, E, O, E, E, E, X];
        assert_eq!(pick(&board, Difficulty::Hard), Some(1));

        // Normal falls through to a corner and loses to the fork.
        let cell = pick(&board, Difficulty::Normal).unwrap();
        assert!(cell == 2 || cell == 6);
    }

    #[test]
    fn test_easy_plays_any_free_cell() {
        let board = [X, X, E, O, E, E, E, E, E];
        let mut rng = GameRng::new(3);
        for _ in 0..20 {
            let cell = choose_cell(&board, Player::O, Difficulty::Easy, 3, 3, &mut rng).unwrap();
            assert!(board[cell].is_none());
        }
    }

    #[test]
    fn test_larger_board_skips_positional_steps() {
        // 4x4, win 3: no threats, so a random free cell.
        let mut board = vec![E; 16];
        board[5] = X;
        let cell = choose_cell(&board, Player::O, Difficulty::Hard, 4, 3, &mut GameRng::new(9)).unwrap();
        assert!(board[cell].is_none());
    }
}
