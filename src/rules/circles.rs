//! Stacking-circles placement and capture rules.
//!
//! Each player owns two circles of each size. A circle may go on an empty
//! cell or on top of a strictly smaller circle, which it captures: the
//! covered circle leaves play for good and is never returned to an
//! inventory. Only the owner of each cell's top circle matters for winning.
//!
//! All functions are pure. `place_circle` returns fresh stacks and inventory
//! and leaves its inputs untouched on error.

use im::Vector;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{Cell, EngineError, Player, PlayerMap};

/// Circles of each size every player starts with.
pub const STARTING_COUNT: u8 = 2;

/// Circle size. Ordering follows size, so `Large > Medium > Small`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CircleSize {
    Small = 1,
    Medium = 2,
    Large = 3,
}

impl CircleSize {
    /// All sizes, smallest first.
    pub const ALL: [CircleSize; 3] = [CircleSize::Small, CircleSize::Medium, CircleSize::Large];

    /// Numeric size (1-3).
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Whether a circle of this size may cover `other`.
    #[must_use]
    pub fn covers(self, other: CircleSize) -> bool {
        self > other
    }

    /// Size from its numeric value.
    #[must_use]
    pub fn from_value(value: u8) -> Option<CircleSize> {
        match value {
            1 => Some(CircleSize::Small),
            2 => Some(CircleSize::Medium),
            3 => Some(CircleSize::Large),
            _ => None,
        }
    }
}

impl std::fmt::Display for CircleSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CircleSize::Small => "small",
            CircleSize::Medium => "medium",
            CircleSize::Large => "large",
        };
        f.write_str(name)
    }
}

/// A circle on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Circle {
    pub id: u32,
    pub owner: Player,
    pub size: CircleSize,
}

/// Circles on one cell, bottom first. The last element is visible.
pub type CellStack = SmallVec<[Circle; 3]>;

/// A circle placement request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CircleMove {
    pub cell: usize,
    pub size: CircleSize,
}

impl CircleMove {
    #[must_use]
    pub const fn new(cell: usize, size: CircleSize) -> Self {
        Self { cell, size }
    }
}

/// Remaining circles per size for one player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Inventory {
    counts: [u8; 3],
}

impl Inventory {
    /// Starting allotment: two of each size.
    #[must_use]
    pub const fn full() -> Self {
        Self {
            counts: [STARTING_COUNT; 3],
        }
    }

    /// Explicit counts (small, medium, large).
    #[must_use]
    pub const fn from_counts(small: u8, medium: u8, large: u8) -> Self {
        Self {
            counts: [small, medium, large],
        }
    }

    /// No circles left.
    #[must_use]
    pub const fn empty() -> Self {
        Self { counts: [0; 3] }
    }

    /// Remaining circles of `size`.
    #[must_use]
    pub fn count(&self, size: CircleSize) -> u8 {
        self.counts[size.value() as usize - 1]
    }

    /// Whether at least one circle of `size` remains.
    #[must_use]
    pub fn has(&self, size: CircleSize) -> bool {
        self.count(size) > 0
    }

    /// Total circles remaining.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.counts.iter().map(|&c| u32::from(c)).sum()
    }

    /// Sizes still available, smallest first.
    pub fn available(&self) -> impl Iterator<Item = CircleSize> + '_ {
        CircleSize::ALL.into_iter().filter(|&size| self.has(size))
    }

    /// Smallest size still available.
    #[must_use]
    pub fn smallest_available(&self) -> Option<CircleSize> {
        self.available().next()
    }

    /// Inventory with one circle of `size` removed.
    pub fn take(&self, size: CircleSize) -> Result<Inventory, EngineError> {
        if !self.has(size) {
            return Err(EngineError::InventoryExhausted { size });
        }
        let mut next = *self;
        next.counts[size.value() as usize - 1] -= 1;
        Ok(next)
    }

    /// Counts as (small, medium, large).
    #[must_use]
    pub const fn counts(&self) -> [u8; 3] {
        self.counts
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self::full()
    }
}

/// Result of a successful placement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placed {
    pub stacks: Vector<CellStack>,
    pub inventory: Inventory,
    /// The circle removed from play, if the target was occupied.
    pub captured: Option<Circle>,
}

/// Top circle of a stack.
#[must_use]
pub fn top(stack: &CellStack) -> Option<&Circle> {
    stack.last()
}

/// Whether `size` may be placed on `stack`.
#[must_use]
pub fn can_place(stack: &CellStack, size: CircleSize) -> bool {
    top(stack).map_or(true, |circle| size.covers(circle.size))
}

/// Place a circle, capturing the previous top if any.
///
/// The placement check runs before the inventory check, so an illegal cell
/// reports `InvalidPlacement` even when the size is also exhausted.
pub fn place_circle(
    stacks: &Vector<CellStack>,
    inventory: &Inventory,
    cell: usize,
    size: CircleSize,
    player: Player,
    id: u32,
) -> Result<Placed, EngineError> {
    let stack = stacks.get(cell).ok_or(EngineError::CellOutOfRange {
        cell,
        cells: stacks.len(),
    })?;
    if !can_place(stack, size) {
        return Err(EngineError::InvalidPlacement { cell, size });
    }
    let inventory = inventory.take(size)?;

    let mut stack = stack.clone();
    let captured = stack.pop();
    stack.push(Circle {
        id,
        owner: player,
        size,
    });

    let mut stacks = stacks.clone();
    stacks.set(cell, stack);

    Ok(Placed {
        stacks,
        inventory,
        captured,
    })
}

/// Every legal move for a player, sizes ascending then cells ascending.
#[must_use]
pub fn legal_circle_moves(stacks: &Vector<CellStack>, inventory: &Inventory) -> Vec<CircleMove> {
    let mut moves = Vec::new();
    for size in inventory.available() {
        for (cell, stack) in stacks.iter().enumerate() {
            if can_place(stack, size) {
                moves.push(CircleMove { cell, size });
            }
        }
    }
    moves
}

/// Whether a player has any legal move.
#[must_use]
pub fn has_legal_move(stacks: &Vector<CellStack>, inventory: &Inventory) -> bool {
    inventory
        .available()
        .any(|size| stacks.iter().any(|stack| can_place(stack, size)))
}

/// Board of top-circle owners.
#[must_use]
pub fn derive_board(stacks: &Vector<CellStack>) -> Vec<Cell> {
    stacks
        .iter()
        .map(|stack| top(stack).map(|circle| circle.owner))
        .collect()
}

/// Draw: neither player can place anything.
#[must_use]
pub fn check_circles_draw(stacks: &Vector<CellStack>, inventories: &PlayerMap<Inventory>) -> bool {
    Player::ALL
        .into_iter()
        .all(|player| !has_legal_move(stacks, &inventories[player]))
}

/// Size to preselect for `player` after a move.
///
/// Keeps `current` if the player still holds it, otherwise falls back to
/// their smallest remaining size.
#[must_use]
pub fn reselect_size(current: Option<CircleSize>, inventory: &Inventory) -> Option<CircleSize> {
    match current {
        Some(size) if inventory.has(size) => Some(size),
        _ => inventory.smallest_available(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_stacks(cells: usize) -> Vector<CellStack> {
        (0..cells).map(|_| CellStack::new()).collect()
    }

    #[test]
    fn test_place_on_empty_cell() {
        let stacks = empty_stacks(9);
        let placed = place_circle(&stacks, &Inventory::full(), 4, CircleSize::Small, Player::X, 0).unwrap();

        assert_eq!(placed.captured, None);
        assert_eq!(placed.inventory.count(CircleSize::Small), 1);
        assert_eq!(top(&placed.stacks[4]).unwrap().owner, Player::X);
        assert!(stacks[4].is_empty());
    }

    #[test]
    fn test_larger_captures_smaller() {
        let stacks = empty_stacks(9);
        let first = place_circle(&stacks, &Inventory::full(), 0, CircleSize::Small, Player::X, 0).unwrap();
        let second = place_circle(&first.stacks, &Inventory::full(), 0, CircleSize::Medium, Player::O, 1).unwrap();

        let captured = second.captured.unwrap();
        assert_eq!(captured.owner, Player::X);
        assert_eq!(captured.size, CircleSize::Small);
        assert_eq!(second.stacks[0].len(), 1);
        assert_eq!(top(&second.stacks[0]).unwrap().size, CircleSize::Medium);
    }

    #[test]
    fn test_equal_or_smaller_is_invalid() {
        let stacks = empty_stacks(9);
        let first = place_circle(&stacks, &Inventory::full(), 0, CircleSize::Medium, Player::X, 0).unwrap();

        for size in [CircleSize::Small, CircleSize::Medium] {
            let err = place_circle(&first.stacks, &Inventory::full(), 0, size, Player::O, 1).unwrap_err();
            assert_eq!(err, EngineError::InvalidPlacement { cell: 0, size });
        }
    }

    #[test]
    fn test_exhausted_inventory() {
        let stacks = empty_stacks(9);
        let inventory = Inventory::from_counts(0, 2, 2);
        let err = place_circle(&stacks, &inventory, 0, CircleSize::Small, Player::X, 0).unwrap_err();
        assert_eq!(err, EngineError::InventoryExhausted { size: CircleSize::Small });
    }

    #[test]
    fn test_out_of_range() {
        let err = place_circle(&empty_stacks(9), &Inventory::full(), 9, CircleSize::Small, Player::X, 0)
            .unwrap_err();
        assert_eq!(err, EngineError::CellOutOfRange { cell: 9, cells: 9 });
    }

    #[test]
    fn test_legal_moves_order() {
        let stacks = empty_stacks(9);
        let inventory = Inventory::from_counts(1, 0, 1);
        let moves = legal_circle_moves(&stacks, &inventory);

        assert_eq!(moves.len(), 18);
        assert_eq!(moves[0], CircleMove::new(0, CircleSize::Small));
        assert_eq!(moves[9], CircleMove::new(0, CircleSize::Large));
    }

    #[test]
    fn test_large_tops_block_everything() {
        let mut stacks = empty_stacks(9);
        for (i, stack) in stacks.iter_mut().enumerate() {
            stack.push(Circle { id: i as u32, owner: Player::X, size: CircleSize::Large });
        }
        assert!(!has_legal_move(&stacks, &Inventory::full()));
    }

    #[test]
    fn test_draw_with_empty_inventories() {
        let stacks = empty_stacks(9);
        let inventories = PlayerMap::with_value(Inventory::empty());
        assert!(check_circles_draw(&stacks, &inventories));
    }

    #[test]
    fn test_not_draw_if_one_player_can_move() {
        let stacks = empty_stacks(9);
        let inventories = PlayerMap::new(|p| match p {
            Player::X => Inventory::empty(),
            Player::O => Inventory::from_counts(1, 0, 0),
        });
        assert!(!check_circles_draw(&stacks, &inventories));
    }

    #[test]
    fn test_reselect_size() {
        let inventory = Inventory::from_counts(0, 1, 2);
        assert_eq!(reselect_size(Some(CircleSize::Large), &inventory), Some(CircleSize::Large));
        assert_eq!(reselect_size(Some(CircleSize::Small), &inventory), Some(CircleSize::Medium));
        assert_eq!(reselect_size(None, &inventory), Some(CircleSize::Medium));
        assert_eq!(reselect_size(Some(CircleSize::Small), &Inventory::empty()), None);
    }

    #[test]
    fn test_size_display_and_value() {
        assert_eq!(CircleSize::Large.to_string(), "large");
        assert_eq!(CircleSize::from_value(2), Some(CircleSize::Medium));
        assert_eq!(CircleSize::from_value(4), None);
        assert!(CircleSize::Large.covers(CircleSize::Medium));
        assert!(!CircleSize::Small.covers(CircleSize::Small));
    }
}
