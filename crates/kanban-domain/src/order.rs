//! Sparse integer ordering shared by columns (within a board) and cards
//! (within a column).
//!
//! Orders leave gaps on purpose. A moved item takes a value between its new
//! neighbours and nothing else changes. Only when no integer fits between
//! the neighbours is the whole sibling sequence renumbered to `1..=N`.

use crate::card::Card;
use crate::column::Column;

/// Anything positioned among siblings by an integer order.
pub trait Ordered {
    fn order(&self) -> i32;
    fn set_order(&mut self, order: i32);
}

impl Ordered for Card {
    fn order(&self) -> i32 {
        self.order
    }

    fn set_order(&mut self, order: i32) {
        self.order = order;
    }
}

impl Ordered for Column {
    fn order(&self) -> i32 {
        self.order
    }

    fn set_order(&mut self, order: i32) {
        self.order = order;
    }
}

/// Result of looking for room at an insertion point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// A free value strictly between the neighbours.
    Gap(i32),
    /// The neighbours are adjacent; the sequence must be renumbered.
    Exhausted,
}

/// Order assigned to the moved item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Allocation {
    pub order: i32,
    /// Every sibling's order was rewritten, not only the moved item's.
    pub renumbered: bool,
}

/// Find an order for the item sitting at `index` of `siblings`.
///
/// `siblings` already contains the moved item at `index`; its own current
/// order is ignored and only the neighbours at `index - 1` and `index + 1`
/// are consulted.
pub fn compute_order<T: Ordered>(siblings: &[T], index: usize) -> Placement {
    let prev = index
        .checked_sub(1)
        .and_then(|i| siblings.get(i))
        .map(Ordered::order);
    let next = siblings.get(index + 1).map(Ordered::order);

    match (prev, next) {
        (None, None) => Placement::Gap(1),
        (Some(prev), None) => prev.checked_add(1).map_or(Placement::Exhausted, Placement::Gap),
        (None, Some(next)) => {
            let order = next.saturating_sub(1).max(1);
            if order < next {
                Placement::Gap(order)
            } else {
                Placement::Exhausted
            }
        }
        (Some(prev), Some(next)) => {
            let mid = (i64::from(prev) + i64::from(next)).div_euclid(2) as i32;
            if mid > prev && mid < next {
                Placement::Gap(mid)
            } else {
                Placement::Exhausted
            }
        }
    }
}

/// Rewrite every order to consecutive integers starting at 1, keeping the
/// current sequence.
pub fn renumber<T: Ordered>(siblings: &mut [T]) {
    for (i, item) in siblings.iter_mut().enumerate() {
        item.set_order(i as i32 + 1);
    }
}

/// Give the item at `index` its new order, renumbering the sequence when no
/// gap is left. Returns `None` when `index` is out of range.
pub fn assign_order<T: Ordered>(siblings: &mut [T], index: usize) -> Option<Allocation> {
    let item_count = siblings.len();
    if index >= item_count {
        return None;
    }

    match compute_order(siblings, index) {
        Placement::Gap(order) => {
            siblings[index].set_order(order);
            Some(Allocation {
                order,
                renumbered: false,
            })
        }
        Placement::Exhausted => {
            tracing::debug!(
                "No order gap at index {} of {} siblings, renumbering",
                index,
                item_count
            );
            renumber(siblings);
            Some(Allocation {
                order: index as i32 + 1,
                renumbered: true,
            })
        }
    }
}
