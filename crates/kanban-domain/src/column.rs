use serde::{Deserialize, Serialize};

use crate::board::BoardId;
use crate::card::{Card, CardId};

pub type ColumnId = i64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    pub board: BoardId,
    pub name: String,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub cards: Vec<Card>,
}

impl Column {
    pub fn new(id: ColumnId, board: BoardId, name: impl Into<String>, order: i32) -> Self {
        Self {
            id,
            board,
            name: name.into(),
            order,
            cards: Vec::new(),
        }
    }

    pub fn with_cards(mut self, cards: Vec<Card>) -> Self {
        self.cards = cards;
        self
    }

    /// Case-insensitive name match, used to recognise the production column.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.trim().to_lowercase() == name.trim().to_lowercase()
    }

    pub fn card_index(&self, card_id: CardId) -> Option<usize> {
        self.cards.iter().position(|c| c.id == card_id)
    }

    /// Order for a card appended at the bottom of this column.
    pub fn next_card_order(&self) -> i32 {
        self.cards.iter().map(|c| c.order).max().map_or(1, |max| max + 1)
    }

    pub fn sort_cards(&mut self) {
        self.cards.sort_by_key(|c| c.order);
    }
}

/// Body for creating a column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewColumn {
    pub board: BoardId,
    pub name: String,
    pub order: i32,
}
