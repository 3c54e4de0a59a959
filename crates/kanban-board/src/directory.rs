use kanban_api::KanbanApi;
use kanban_core::{KanbanError, KanbanResult};
use kanban_domain::{Board, BoardId, NewBoard};
use std::sync::Arc;

use crate::notify::{Notice, Notifier};

/// The signed-in user's boards.
pub struct BoardDirectory<A: KanbanApi> {
    api: Arc<A>,
    notifier: Arc<dyn Notifier>,
    boards: Vec<Board>,
}

impl<A: KanbanApi> BoardDirectory<A> {
    pub fn new(api: Arc<A>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            notifier,
            boards: Vec::new(),
        }
    }

    pub fn boards(&self) -> &[Board] {
        &self.boards
    }

    pub fn get(&self, id: BoardId) -> Option<&Board> {
        self.boards.iter().find(|b| b.id == id)
    }

    pub async fn refresh(&mut self) -> KanbanResult<()> {
        match self.api.list_boards().await {
            Ok(boards) => {
                tracing::debug!("Listed {} boards", boards.len());
                self.boards = boards;
                Ok(())
            }
            Err(e) => {
                self.notifier.notify(Notice::BoardListFailed(e.user_message()));
                Err(e)
            }
        }
    }

    pub async fn create(&mut self, name: &str) -> KanbanResult<Board> {
        let new_board = NewBoard::new(name)?;
        match self.api.create_board(&new_board).await {
            Ok(board) => {
                tracing::info!("Created board {} ({})", board.id, board.name);
                self.boards.push(board.clone());
                self.notifier.notify(Notice::BoardCreated);
                Ok(board)
            }
            Err(e) => {
                self.notifier.notify(Notice::BoardSaveFailed(e.user_message()));
                Err(e)
            }
        }
    }

    /// Soft delete. The board stays listed with `active = false`.
    pub async fn deactivate(&mut self, id: BoardId) -> KanbanResult<()> {
        let board = self
            .get(id)
            .ok_or_else(|| KanbanError::NotFound(format!("board {}", id)))?;
        if !board.is_openable() {
            return Err(KanbanError::Validation(format!(
                "board {} is already inactive",
                id
            )));
        }

        if let Err(e) = self.api.deactivate_board(id).await {
            self.notifier.notify(Notice::BoardSaveFailed(e.user_message()));
            return Err(e);
        }
        if let Some(board) = self.boards.iter_mut().find(|b| b.id == id) {
            board.deactivate();
        }
        tracing::info!("Deactivated board {}", id);
        self.notifier.notify(Notice::BoardDeactivated);
        Ok(())
    }
}
