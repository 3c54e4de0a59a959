use async_trait::async_trait;
use kanban_core::KanbanResult;
use kanban_domain::{
    Board, BoardId, CardId, CardPatch, Column, ColumnId, ColumnPatch, NewBoard, NewCard,
    NewColumn,
};

/// Remote CRUD contract of the board service.
///
/// Implementations report non-2xx answers as `KanbanError::Rejected` (or
/// `Unauthenticated` for 401) and connection failures as
/// `KanbanError::Transport`.
#[async_trait]
pub trait KanbanApi: Send + Sync {
    async fn list_boards(&self) -> KanbanResult<Vec<Board>>;

    async fn create_board(&self, board: &NewBoard) -> KanbanResult<Board>;

    /// The service soft-deletes: the board comes back with `active = false`.
    async fn deactivate_board(&self, id: BoardId) -> KanbanResult<()>;

    /// All columns of a board, each with its cards.
    async fn fetch_columns(&self, board: BoardId) -> KanbanResult<Vec<Column>>;

    async fn create_column(&self, column: &NewColumn) -> KanbanResult<()>;

    async fn update_column(&self, id: ColumnId, patch: &ColumnPatch) -> KanbanResult<()>;

    async fn create_card(&self, card: &NewCard) -> KanbanResult<()>;

    async fn update_card(&self, id: CardId, patch: &CardPatch) -> KanbanResult<()>;

    async fn delete_card(&self, id: CardId) -> KanbanResult<()>;
}
