use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type BoardId = i64;
pub type UserId = i64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub id: BoardId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub owner: Option<UserId>,
    #[serde(default)]
    pub owner_email: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Board {
    pub fn new(id: BoardId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            created_at: None,
            owner: None,
            owner_email: None,
            active: true,
        }
    }

    /// Soft delete: the board stays listed but can no longer be opened.
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn is_openable(&self) -> bool {
        self.active
    }
}

/// Body for creating a board.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewBoard {
    pub name: String,
}

impl NewBoard {
    pub fn new(name: &str) -> kanban_core::KanbanResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(kanban_core::KanbanError::Validation(
                "board name is required".to_string(),
            ));
        }
        Ok(Self {
            name: name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deactivate_keeps_board() {
        let mut board = Board::new(1, "Roadmap");
        assert!(board.is_openable());

        board.deactivate();
        assert!(!board.active);
        assert!(!board.is_openable());
        assert_eq!(board.name, "Roadmap");
    }

    #[test]
    fn test_deserialize_server_board() {
        let json = r#"{
            "id": 3,
            "name": "Ops",
            "description": "",
            "created_at": "2024-05-01T12:00:00Z",
            "owner": 9,
            "owner_email": "owner@example.com",
            "active": false,
            "columns": []
        }"#;
        let board: Board = serde_json::from_str(json).unwrap();
        assert_eq!(board.id, 3);
        assert_eq!(board.owner, Some(9));
        assert!(!board.active);
    }

    #[test]
    fn test_missing_active_defaults_true() {
        let board: Board = serde_json::from_str(r#"{"id": 1, "name": "B"}"#).unwrap();
        assert!(board.active);
    }

    #[test]
    fn test_new_board_trims_and_validates() {
        assert_eq!(NewBoard::new("  Sprint  ").unwrap().name, "Sprint");
        assert!(NewBoard::new("   ").is_err());
    }
}
