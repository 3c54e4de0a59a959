//! Drag-and-drop move resolution.
//!
//! A completed drag gesture becomes a [`MoveIntent`]. [`resolve_move`] turns
//! it into the board as it should look afterwards plus the remote updates
//! that make the server agree. It never touches the caller's state and does
//! no I/O.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::board::BoardId;
use crate::card::{CardId, CardStatus};
use crate::column::{Column, ColumnId};
use crate::order::{assign_order, Allocation, Ordered};
use crate::patch::{CardPatch, ColumnPatch};
use crate::snapshot::BoardSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Card,
    Column,
}

/// A slot in a container: a column's card list, or a board's column list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub container: i64,
    pub index: usize,
}

impl Location {
    pub fn new(container: i64, index: usize) -> Self {
        Self { container, index }
    }
}

/// Source and destination of one drag gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveIntent {
    pub kind: ItemKind,
    pub item_id: i64,
    pub source: Location,
    pub destination: Location,
}

impl MoveIntent {
    pub fn card(card_id: CardId, source: Location, destination: Location) -> Self {
        Self {
            kind: ItemKind::Card,
            item_id: card_id,
            source,
            destination,
        }
    }

    pub fn column(column_id: ColumnId, board_id: BoardId, from: usize, to: usize) -> Self {
        Self {
            kind: ItemKind::Column,
            item_id: column_id,
            source: Location::new(board_id, from),
            destination: Location::new(board_id, to),
        }
    }

    /// Dropped back where it started.
    pub fn is_noop(&self) -> bool {
        self.source == self.destination
    }
}

/// One PATCH the server must receive for local and remote order to agree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RemoteUpdate {
    Card { id: CardId, patch: CardPatch },
    Column { id: ColumnId, patch: ColumnPatch },
}

impl RemoteUpdate {
    pub fn item_id(&self) -> i64 {
        match self {
            Self::Card { id, .. } | Self::Column { id, .. } => *id,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MoveEffects {
    /// The card arrived in the production column and became done.
    pub status_changed: bool,
    /// The destination sequence was renumbered to `1..=N`.
    pub renumbered: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMove {
    pub intent: MoveIntent,
    /// The board after the move.
    pub state: BoardSnapshot,
    /// Moved item first, then any renumbered siblings in sequence order.
    pub updates: Vec<RemoteUpdate>,
    pub effects: MoveEffects,
    pub order: i32,
}

/// Why an intent no longer matches the board it was computed against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaleReason {
    UnknownContainer(i64),
    ItemNotAtSource { item_id: i64, index: usize },
    DestinationOutOfRange { index: usize, len: usize },
}

impl fmt::Display for StaleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownContainer(id) => write!(f, "container {} is not on this board", id),
            Self::ItemNotAtSource { item_id, index } => {
                write!(f, "item {} is not at source index {}", item_id, index)
            }
            Self::DestinationOutOfRange { index, len } => {
                write!(f, "destination index {} exceeds length {}", index, len)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Same container, same index.
    Unchanged,
    /// The gesture refers to a sequence that has since changed; drop it.
    Stale(StaleReason),
    Moved(ResolvedMove),
}

/// Board-specific rules applied while resolving moves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRules {
    production_column: String,
}

impl MoveRules {
    pub fn new(production_column: impl Into<String>) -> Self {
        Self {
            production_column: production_column.into(),
        }
    }

    pub fn is_production(&self, column: &Column) -> bool {
        column.is_named(&self.production_column)
    }
}

impl Default for MoveRules {
    fn default() -> Self {
        Self::new(kanban_core::config::DEFAULT_PRODUCTION_COLUMN)
    }
}

pub fn resolve_move(intent: &MoveIntent, state: &BoardSnapshot, rules: &MoveRules) -> Resolution {
    if intent.is_noop() {
        return Resolution::Unchanged;
    }
    let resolved = match intent.kind {
        ItemKind::Card => resolve_card_move(intent, state, rules),
        ItemKind::Column => resolve_column_move(intent, state),
    };
    match resolved {
        Ok(moved) => Resolution::Moved(moved),
        Err(reason) => Resolution::Stale(reason),
    }
}

fn resolve_card_move(
    intent: &MoveIntent,
    state: &BoardSnapshot,
    rules: &MoveRules,
) -> Result<ResolvedMove, StaleReason> {
    let source_idx = state
        .column_index(intent.source.container)
        .ok_or(StaleReason::UnknownContainer(intent.source.container))?;
    let dest_idx = state
        .column_index(intent.destination.container)
        .ok_or(StaleReason::UnknownContainer(intent.destination.container))?;

    let mut next = state.clone();

    let source_cards = &mut next.columns[source_idx].cards;
    ensure_item_at(source_cards.as_slice(), intent, |c| c.id)?;
    let mut card = source_cards.remove(intent.source.index);

    let dest = &mut next.columns[dest_idx];
    ensure_insertable(dest.cards.len(), intent.destination.index)?;

    let status_changed = rules.is_production(dest) && !card.status.is_done();
    if status_changed {
        card.update_status(CardStatus::Done);
    }
    card.column = dest.id;
    dest.cards.insert(intent.destination.index, card);

    let allocation = allocate(&mut dest.cards, intent.destination.index)?;
    let dest_id = dest.id;

    let mut updates = vec![RemoteUpdate::Card {
        id: intent.item_id,
        patch: CardPatch {
            column: Some(dest_id),
            order: Some(allocation.order),
            status: status_changed.then_some(CardStatus::Done),
            ..Default::default()
        },
    }];
    if allocation.renumbered {
        updates.extend(
            dest.cards
                .iter()
                .filter(|c| c.id != intent.item_id)
                .map(|c| RemoteUpdate::Card {
                    id: c.id,
                    patch: CardPatch::order(c.order),
                }),
        );
    }

    Ok(ResolvedMove {
        intent: *intent,
        state: next,
        updates,
        effects: MoveEffects {
            status_changed,
            renumbered: allocation.renumbered,
        },
        order: allocation.order,
    })
}

fn resolve_column_move(
    intent: &MoveIntent,
    state: &BoardSnapshot,
) -> Result<ResolvedMove, StaleReason> {
    for container in [intent.source.container, intent.destination.container] {
        if container != state.board_id {
            return Err(StaleReason::UnknownContainer(container));
        }
    }

    let mut next = state.clone();
    ensure_item_at(next.columns.as_slice(), intent, |c| c.id)?;
    let column = next.columns.remove(intent.source.index);
    ensure_insertable(next.columns.len(), intent.destination.index)?;
    next.columns.insert(intent.destination.index, column);

    let allocation = allocate(&mut next.columns, intent.destination.index)?;

    let mut updates = vec![RemoteUpdate::Column {
        id: intent.item_id,
        patch: ColumnPatch::order(allocation.order),
    }];
    if allocation.renumbered {
        updates.extend(
            next.columns
                .iter()
                .filter(|c| c.id != intent.item_id)
                .map(|c| RemoteUpdate::Column {
                    id: c.id,
                    patch: ColumnPatch::order(c.order),
                }),
        );
    }

    Ok(ResolvedMove {
        intent: *intent,
        state: next,
        updates,
        effects: MoveEffects {
            status_changed: false,
            renumbered: allocation.renumbered,
        },
        order: allocation.order,
    })
}

fn ensure_item_at<T>(
    items: &[T],
    intent: &MoveIntent,
    id_of: impl Fn(&T) -> i64,
) -> Result<(), StaleReason> {
    match items.get(intent.source.index) {
        Some(item) if id_of(item) == intent.item_id => Ok(()),
        _ => Err(StaleReason::ItemNotAtSource {
            item_id: intent.item_id,
            index: intent.source.index,
        }),
    }
}

fn ensure_insertable(len: usize, index: usize) -> Result<(), StaleReason> {
    if index > len {
        Err(StaleReason::DestinationOutOfRange { index, len })
    } else {
        Ok(())
    }
}

fn allocate<T: Ordered>(siblings: &mut [T], index: usize) -> Result<Allocation, StaleReason> {
    let len = siblings.len();
    assign_order(siblings, index).ok_or(StaleReason::DestinationOutOfRange { index, len })
}
