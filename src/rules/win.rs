//! Win and draw detection for square boards of any size.
//!
//! Lines are scanned in a fixed order and the first complete one wins the
//! tie-break when a single move finishes several lines:
//!
//! 1. rows
//! 2. columns
//! 3. down-right diagonals
//! 4. down-left diagonals
//!
//! Within each family lines are ordered by start row, then start column.
//! Every function here is pure and works on speculative boards as well as
//! real ones.

use serde::{Deserialize, Serialize};

use crate::core::{Cell, Player};

/// Direction vectors in scan order: (row step, column step).
const DIRECTIONS: [(isize, isize); 4] = [
    (0, 1),  // Row
    (1, 0),  // Column
    (1, 1),  // Down-right
    (1, -1), // Down-left
];

/// A completed line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinLine {
    pub winner: Player,
    /// Cell indices from the line's start cell onward.
    pub line: Vec<usize>,
}

/// All candidate lines of `win_length` cells, in scan order.
///
/// ```
/// use rust_gridgame::rules::win::win_lines;
///
/// let lines = win_lines(3, 3);
/// assert_eq!(lines.len(), 8);
/// assert_eq!(lines[0], vec![0, 1, 2]);
/// assert_eq!(lines[7], vec![2, 4, 6]);
/// ```
#[must_use]
pub fn win_lines(grid_size: usize, win_length: usize) -> Vec<Vec<usize>> {
    let mut lines = Vec::new();
    if win_length == 0 || win_length > grid_size {
        return lines;
    }

    let n = grid_size as isize;
    let span = win_length as isize - 1;

    for &(dr, dc) in &DIRECTIONS {
        for row in 0..n {
            for col in 0..n {
                let end_row = row + dr * span;
                let end_col = col + dc * span;
                if end_row < 0 || end_row >= n || end_col < 0 || end_col >= n {
                    continue;
                }
                let line = (0..win_length as isize)
                    .map(|k| ((row + dr * k) * n + (col + dc * k)) as usize)
                    .collect();
                lines.push(line);
            }
        }
    }

    lines
}

/// First complete line on the board, if any.
#[must_use]
pub fn check_winner(board: &[Cell], grid_size: usize, win_length: usize) -> Option<WinLine> {
    scan(board, grid_size, win_length, None)
}

/// Whether `player` owns a complete line.
#[must_use]
pub fn has_line(board: &[Cell], player: Player, grid_size: usize, win_length: usize) -> bool {
    scan(board, grid_size, win_length, Some(player)).is_some()
}

/// Scan lines in order, optionally only those owned by `only`.
fn scan(
    board: &[Cell],
    grid_size: usize,
    win_length: usize,
    only: Option<Player>,
) -> Option<WinLine> {
    let n = grid_size as isize;
    if win_length == 0 || win_length > grid_size || board.len() != grid_size * grid_size {
        return None;
    }
    let span = win_length as isize - 1;

    for &(dr, dc) in &DIRECTIONS {
        for row in 0..n {
            for col in 0..n {
                let end_row = row + dr * span;
                let end_col = col + dc * span;
                if end_row < 0 || end_row >= n || end_col < 0 || end_col >= n {
                    continue;
                }

                let start = (row * n + col) as usize;
                let Some(owner) = board[start] else {
                    continue;
                };
                if only.is_some_and(|p| p != owner) {
                    continue;
                }

                let complete = (1..win_length as isize)
                    .all(|k| board[((row + dr * k) * n + (col + dc * k)) as usize] == Some(owner));
                if complete {
                    let line = (0..win_length as isize)
                        .map(|k| ((row + dr * k) * n + (col + dc * k)) as usize)
                        .collect();
                    return Some(WinLine { winner: owner, line });
                }
            }
        }
    }

    None
}

/// True iff no cell is empty.
#[must_use]
pub fn check_draw(board: &[Cell]) -> bool {
    board.iter().all(Option::is_some)
}

/// Empty cells where `player` would complete a line, in ascending order.
#[must_use]
pub fn winning_cells_for(
    board: &[Cell],
    player: Player,
    grid_size: usize,
    win_length: usize,
) -> Vec<usize> {
    let mut scratch = board.to_vec();
    let mut cells = Vec::new();

    for cell in 0..board.len() {
        if board[cell].is_some() {
            continue;
        }
        scratch[cell] = Some(player);
        if has_line(&scratch, player, grid_size, win_length) {
            cells.push(cell);
        }
        scratch[cell] = None;
    }

    cells
}
