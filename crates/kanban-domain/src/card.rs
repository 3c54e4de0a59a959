use chrono::{DateTime, Utc};
use kanban_core::{KanbanError, KanbanResult};
use serde::{Deserialize, Serialize};

use crate::board::UserId;
use crate::column::ColumnId;
use crate::delivery_date;

pub type CardId = i64;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardStatus {
    #[default]
    Pending,
    OnTime,
    Late,
    Done,
    /// Any status string this client does not know about.
    #[serde(other)]
    Unknown,
}

impl CardStatus {
    pub fn is_done(self) -> bool {
        self == CardStatus::Done
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub column: ColumnId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub delivery_date: String,
    #[serde(default)]
    pub status: CardStatus,
    #[serde(default)]
    pub assignee: Option<UserId>,
    #[serde(default)]
    pub assignee_email: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub order: i32,
}

impl Card {
    pub fn new(id: CardId, column: ColumnId, title: impl Into<String>, order: i32) -> Self {
        Self {
            id,
            column,
            title: title.into(),
            delivery_date: String::new(),
            status: CardStatus::Pending,
            assignee: None,
            assignee_email: None,
            created_at: None,
            order,
        }
    }

    pub fn update_status(&mut self, status: CardStatus) {
        self.status = status;
    }
}

/// User-entered card fields, validated before anything is sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardDraft {
    pub title: String,
    pub delivery_date: String,
}

impl CardDraft {
    pub fn new(title: impl Into<String>, delivery_date: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            delivery_date: delivery_date.into(),
        }
    }

    /// Returns the trimmed title and the delivery date in `dd/mm/yyyy` form.
    pub fn validate(&self) -> KanbanResult<(String, String)> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(KanbanError::Validation("title is required".to_string()));
        }
        if self.delivery_date.trim().is_empty() {
            return Err(KanbanError::Validation(
                "delivery date is required".to_string(),
            ));
        }
        let date = delivery_date::normalize(&self.delivery_date)?;
        Ok((title.to_string(), date))
    }
}

/// Body for creating a card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewCard {
    pub title: String,
    pub column: ColumnId,
    pub delivery_date: String,
    pub order: i32,
}

impl NewCard {
    pub fn from_draft(draft: &CardDraft, column: ColumnId, order: i32) -> KanbanResult<Self> {
        let (title, delivery_date) = draft.validate()?;
        Ok(Self {
            title,
            column,
            delivery_date,
            order,
        })
    }
}
