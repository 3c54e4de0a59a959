//! In-memory copy of one open board: its columns, each with its cards.
//!
//! Columns are kept sorted by `order` and each column's cards are kept
//! sorted by `order`, so sequence index and display position agree. The
//! move resolver relies on that when it interprets drag indices.

use serde::{Deserialize, Serialize};

use crate::board::BoardId;
use crate::card::{Card, CardId};
use crate::column::{Column, ColumnId};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub board_id: BoardId,
    #[serde(default)]
    pub columns: Vec<Column>,
}

impl BoardSnapshot {
    pub fn new(board_id: BoardId) -> Self {
        Self {
            board_id,
            columns: Vec::new(),
        }
    }

    /// Assemble a snapshot from the server's column list.
    ///
    /// Sorting is stable, so siblings sharing an order keep the server's
    /// sequence. Columns that belong to another board are dropped.
    pub fn from_columns(board_id: BoardId, columns: Vec<Column>) -> Self {
        let mut columns: Vec<Column> = columns
            .into_iter()
            .filter(|column| {
                let belongs = column.board == board_id;
                if !belongs {
                    tracing::warn!(
                        "Dropping column {} of board {} from snapshot of board {}",
                        column.id,
                        column.board,
                        board_id
                    );
                }
                belongs
            })
            .collect();

        columns.sort_by_key(|c| c.order);
        for column in &mut columns {
            column.sort_cards();
        }

        Self { board_id, columns }
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn card_count(&self) -> usize {
        self.columns.iter().map(|c| c.cards.len()).sum()
    }

    pub fn column(&self, id: ColumnId) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == id)
    }

    pub fn column_mut(&mut self, id: ColumnId) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.id == id)
    }

    pub fn column_index(&self, id: ColumnId) -> Option<usize> {
        self.columns.iter().position(|c| c.id == id)
    }

    /// Column id and index within that column for a card.
    pub fn locate_card(&self, card_id: CardId) -> Option<(ColumnId, usize)> {
        self.columns
            .iter()
            .find_map(|column| column.card_index(card_id).map(|index| (column.id, index)))
    }

    pub fn card(&self, card_id: CardId) -> Option<&Card> {
        self.columns
            .iter()
            .flat_map(|c| c.cards.iter())
            .find(|card| card.id == card_id)
    }

    pub fn card_mut(&mut self, card_id: CardId) -> Option<&mut Card> {
        self.columns
            .iter_mut()
            .flat_map(|c| c.cards.iter_mut())
            .find(|card| card.id == card_id)
    }

    pub fn remove_card(&mut self, card_id: CardId) -> Option<Card> {
        let (column_id, index) = self.locate_card(card_id)?;
        self.column_mut(column_id).map(|column| column.cards.remove(index))
    }

    /// Order for a column appended at the right edge of the board.
    pub fn next_column_order(&self) -> i32 {
        self.columns
            .iter()
            .map(|c| c.order)
            .max()
            .map_or(1, |max| max + 1)
    }
}
