use async_trait::async_trait;
use kanban_api::KanbanApi;
use kanban_core::KanbanResult;
use kanban_domain::{
    Board, BoardId, CardId, CardPatch, Column, ColumnId, ColumnPatch, NewBoard, NewCard,
    NewColumn,
};
use mockall::mock;

mock! {
    pub Api {}

    #[async_trait]
    impl KanbanApi for Api {
        async fn list_boards(&self) -> KanbanResult<Vec<Board>>;
        async fn create_board(&self, board: &NewBoard) -> KanbanResult<Board>;
        async fn deactivate_board(&self, id: BoardId) -> KanbanResult<()>;
        async fn fetch_columns(&self, board: BoardId) -> KanbanResult<Vec<Column>>;
        async fn create_column(&self, column: &NewColumn) -> KanbanResult<()>;
        async fn update_column(&self, id: ColumnId, patch: &ColumnPatch) -> KanbanResult<()>;
        async fn create_card(&self, card: &NewCard) -> KanbanResult<()>;
        async fn update_card(&self, id: CardId, patch: &CardPatch) -> KanbanResult<()>;
        async fn delete_card(&self, id: CardId) -> KanbanResult<()>;
    }
}
