//! Optimistic board state and its reconciliation with the server.
//!
//! [`BoardSync`] owns the one mutable copy of the open board. Moves are
//! applied locally first and persisted afterwards through the outbox. Every
//! snapshot load bumps a generation counter; async results tagged with an
//! older generation are discarded instead of overwriting newer state.

use kanban_api::KanbanApi;
use kanban_core::{KanbanError, KanbanResult};
use kanban_domain::{
    resolve_move, BoardId, BoardSnapshot, CardDraft, CardId, CardPatch, Column, ColumnId,
    ColumnPatch, ItemKind, MoveIntent, MoveRules, NewCard, NewColumn, Resolution,
};
use std::sync::Arc;

use crate::notify::{Notice, Notifier};
use crate::outbox::{persist, MoveReport, MoveStatus, Outbox, PendingMove};

#[derive(Debug, Clone, Default, PartialEq)]
pub enum BoardView {
    #[default]
    Empty,
    Loading,
    Ready(BoardSnapshot),
    /// The last load failed; nothing is shown.
    Failed,
}

impl BoardView {
    pub fn snapshot(&self) -> Option<&BoardSnapshot> {
        match self {
            Self::Ready(snapshot) => Some(snapshot),
            _ => None,
        }
    }
}

/// Handle for one in-progress snapshot load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    pub board_id: BoardId,
    pub generation: u64,
    /// A refresh keeps showing the current board when it fails.
    pub keep_view_on_error: bool,
}

pub struct BoardSync<A: KanbanApi> {
    api: Arc<A>,
    notifier: Arc<dyn Notifier>,
    rules: MoveRules,
    board_id: Option<BoardId>,
    view: BoardView,
    generation: u64,
    next_ticket: u64,
    outbox: Outbox,
    resync_requested: bool,
    /// Reports for queued moves that were dropped before being sent.
    dropped: Vec<MoveReport>,
}

impl<A: KanbanApi> BoardSync<A> {
    pub fn new(api: Arc<A>, notifier: Arc<dyn Notifier>, rules: MoveRules) -> Self {
        Self {
            api,
            notifier,
            rules,
            board_id: None,
            view: BoardView::Empty,
            generation: 0,
            next_ticket: 1,
            outbox: Outbox::new(),
            resync_requested: false,
            dropped: Vec::new(),
        }
    }

    pub fn view(&self) -> &BoardView {
        &self.view
    }

    pub fn snapshot(&self) -> Option<&BoardSnapshot> {
        self.view.snapshot()
    }

    pub fn board_id(&self) -> Option<BoardId> {
        self.board_id
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn pending_moves(&self) -> usize {
        self.outbox.len()
    }

    /// A canonical re-fetch is owed once the outbox drains.
    pub fn resync_requested(&self) -> bool {
        self.resync_requested
    }

    // ---- snapshot loading ----

    /// Start loading `board_id`. Moves still queued against the old state
    /// are dropped; one already in flight will be reported as superseded.
    pub fn begin_load(&mut self, board_id: BoardId, keep_view_on_error: bool) -> LoadTicket {
        self.generation += 1;
        if self.board_id != Some(board_id) {
            self.view = BoardView::Empty;
        }
        self.board_id = Some(board_id);
        let dropped = self.outbox.discard_queued();
        if !dropped.is_empty() {
            tracing::debug!("Dropped {} queued moves on reload", dropped.len());
            self.record_dropped(&dropped);
        }
        if !keep_view_on_error {
            self.view = BoardView::Loading;
        }
        tracing::debug!(
            "Loading board {} (generation {})",
            board_id,
            self.generation
        );
        LoadTicket {
            board_id,
            generation: self.generation,
            keep_view_on_error,
        }
    }

    /// Apply a load result. Returns `Ok(false)` when a newer load has
    /// started since `ticket` was issued and the result was discarded.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: KanbanResult<Vec<Column>>,
    ) -> KanbanResult<bool> {
        if ticket.generation != self.generation {
            tracing::debug!(
                "Discarding load of board {} from generation {} (current {})",
                ticket.board_id,
                ticket.generation,
                self.generation
            );
            return Ok(false);
        }

        match result {
            Ok(columns) => {
                let snapshot = BoardSnapshot::from_columns(ticket.board_id, columns);
                tracing::info!(
                    "Loaded board {}: {} columns, {} cards",
                    ticket.board_id,
                    snapshot.columns.len(),
                    snapshot.card_count()
                );
                self.view = BoardView::Ready(snapshot);
                Ok(true)
            }
            Err(e) => {
                tracing::error!("Failed to load board {}: {}", ticket.board_id, e);
                if ticket.keep_view_on_error && self.view.snapshot().is_some() {
                    self.notifier
                        .notify(Notice::BoardRefreshFailed(e.user_message()));
                } else {
                    self.view = BoardView::Failed;
                    self.notifier.notify(Notice::BoardLoadFailed(e.user_message()));
                }
                Err(e)
            }
        }
    }

    /// Fetch every column (with its cards) of `board_id` and show it.
    pub async fn load_board(&mut self, board_id: BoardId) -> KanbanResult<()> {
        let ticket = self.begin_load(board_id, false);
        let result = self.api.fetch_columns(board_id).await;
        self.finish_load(ticket, result).map(|_| ())
    }

    /// Re-fetch the open board. Deferred while moves are still pending, so
    /// the server's answer cannot predate them.
    pub async fn refresh(&mut self) -> KanbanResult<bool> {
        let board_id = self.require_board()?;
        if !self.outbox.is_idle() {
            tracing::debug!("Deferring refresh of board {} until moves settle", board_id);
            self.resync_requested = true;
            return Ok(false);
        }
        self.resync_requested = false;
        let ticket = self.begin_load(board_id, true);
        let result = self.api.fetch_columns(board_id).await;
        self.finish_load(ticket, result)
    }

    // ---- moves ----

    /// Resolve a drag gesture against the current board and apply it
    /// locally. Returns the ticket of the queued remote persistence, or
    /// `None` when there was nothing to do.
    pub fn begin_move(&mut self, intent: MoveIntent) -> Option<u64> {
        let current = match &self.view {
            BoardView::Ready(snapshot) => snapshot,
            _ => {
                tracing::debug!("Ignoring move of {}: no board is shown", intent.item_id);
                return None;
            }
        };

        let resolved = match resolve_move(&intent, current, &self.rules) {
            Resolution::Unchanged => return None,
            Resolution::Stale(reason) => {
                tracing::debug!("Dropping stale move of {}: {}", intent.item_id, reason);
                return None;
            }
            Resolution::Moved(resolved) => resolved,
        };

        let ticket = self.next_ticket;
        self.next_ticket += 1;
        tracing::debug!(
            "Move {} of {:?} {} resolved to order {} (renumbered: {})",
            ticket,
            intent.kind,
            intent.item_id,
            resolved.order,
            resolved.effects.renumbered
        );

        let before = current.clone();
        self.view = BoardView::Ready(resolved.state);
        self.outbox.push(PendingMove {
            ticket,
            generation: self.generation,
            intent,
            updates: resolved.updates,
            effects: resolved.effects,
            before,
        });
        Some(ticket)
    }

    /// Take the next move to persist. `None` while one is in flight.
    pub fn next_pending(&mut self) -> Option<PendingMove> {
        self.outbox.take_next()
    }

    /// Settle a move whose remote phase has finished.
    ///
    /// Success keeps the optimistic state. Failure rolls back to the board as
    /// it was before the move, drops the moves queued on top of it and asks
    /// for a canonical re-fetch.
    pub fn complete_move(&mut self, pending: &PendingMove, result: KanbanResult<()>) -> MoveReport {
        self.outbox.finish(pending.ticket);
        let status = if result.is_ok() {
            MoveStatus::RemoteOk
        } else {
            MoveStatus::RemoteFailed
        };

        if pending.generation != self.generation {
            tracing::debug!(
                "Move {} settled as {:?} after the board was reloaded; ignoring",
                pending.ticket,
                status
            );
            // The reload may have read the board before this move landed.
            if self.board_id == Some(pending.before.board_id) {
                self.resync_requested = true;
            }
            return MoveReport::superseded(pending, status);
        }

        match result {
            Ok(()) => {
                tracing::debug!("Move {} -> REMOTE_OK", pending.ticket);
                if pending.effects.renumbered {
                    self.resync_requested = true;
                }
                self.notifier.notify(success_notice(pending));
                MoveReport::settled(pending, status, None)
            }
            Err(e) => {
                tracing::warn!("Move {} -> REMOTE_FAILED: {}", pending.ticket, e);
                self.view = BoardView::Ready(pending.before.clone());
                let dropped = self.outbox.discard_queued();
                if !dropped.is_empty() {
                    tracing::debug!(
                        "Rolled back move {} and {} moves queued after it",
                        pending.ticket,
                        dropped.len()
                    );
                    self.record_dropped(&dropped);
                }
                self.resync_requested = true;
                let reason = e.user_message();
                self.notifier.notify(match pending.intent.kind {
                    ItemKind::Card => Notice::CardMoveFailed(reason.clone()),
                    ItemKind::Column => Notice::ColumnMoveFailed(reason.clone()),
                });
                MoveReport::settled(pending, status, Some(reason))
            }
        }
    }

    /// Persist every queued move in order, then run any owed re-fetch.
    pub async fn flush(&mut self) -> Vec<MoveReport> {
        let mut reports = Vec::new();
        while let Some(pending) = self.outbox.take_next() {
            let result = persist(self.api.as_ref(), &pending).await;
            let failed = result.is_err();
            reports.push(self.complete_move(&pending, result));
            if failed {
                // Queued moves were discarded with the rollback.
                break;
            }
        }

        if self.resync_requested && self.outbox.is_idle() {
            if let Err(e) = self.refresh().await {
                tracing::warn!("Re-sync after moves failed, keeping local state: {}", e);
            }
        }
        reports.append(&mut self.dropped);
        reports
    }

    fn record_dropped(&mut self, dropped: &[PendingMove]) {
        self.dropped.extend(
            dropped
                .iter()
                .map(|pending| MoveReport::superseded(pending, MoveStatus::Pending)),
        );
    }

    /// Apply one drag gesture and persist it. `None` when the gesture was a
    /// no-op or no longer matches the board.
    pub async fn perform_move(&mut self, intent: MoveIntent) -> Option<MoveReport> {
        let ticket = self.begin_move(intent)?;
        self.flush()
            .await
            .into_iter()
            .find(|report| report.ticket == ticket)
    }

    // ---- card and column edits ----

    /// Create a card at the bottom of `column_id`, then re-fetch the board.
    pub async fn create_card(&mut self, column_id: ColumnId, draft: &CardDraft) -> KanbanResult<()> {
        self.flush().await;
        let column = self.require_column(column_id)?;
        let card = NewCard::from_draft(draft, column_id, column.next_card_order())?;

        if let Err(e) = self.api.create_card(&card).await {
            self.notifier.notify(Notice::CardSaveFailed(e.user_message()));
            return Err(e);
        }
        tracing::info!("Created card {:?} in column {}", card.title, column_id);
        self.notifier.notify(Notice::CardCreated);
        self.refresh_after_edit().await;
        Ok(())
    }

    pub async fn edit_card(&mut self, card_id: CardId, draft: &CardDraft) -> KanbanResult<()> {
        self.flush().await;
        self.require_card(card_id)?;
        let (title, delivery_date) = draft.validate()?;
        let patch = CardPatch {
            title: Some(title.clone()),
            delivery_date: Some(delivery_date.clone()),
            ..Default::default()
        };

        if let Err(e) = self.api.update_card(card_id, &patch).await {
            self.notifier.notify(Notice::CardSaveFailed(e.user_message()));
            return Err(e);
        }
        if let Some(card) = self.snapshot_mut().and_then(|s| s.card_mut(card_id)) {
            card.title = title;
            card.delivery_date = delivery_date;
        }
        self.notifier.notify(Notice::CardUpdated);
        Ok(())
    }

    /// Delete a card. It disappears locally only once the server agrees.
    pub async fn delete_card(&mut self, card_id: CardId) -> KanbanResult<()> {
        self.flush().await;
        self.require_card(card_id)?;

        if let Err(e) = self.api.delete_card(card_id).await {
            self.notifier.notify(Notice::CardDeleteFailed(e.user_message()));
            return Err(e);
        }
        if let Some(snapshot) = self.snapshot_mut() {
            snapshot.remove_card(card_id);
        }
        tracing::info!("Deleted card {}", card_id);
        self.notifier.notify(Notice::CardDeleted);
        Ok(())
    }

    /// Append a column at the right edge of the board, then re-fetch.
    pub async fn create_column(&mut self, name: &str) -> KanbanResult<()> {
        self.flush().await;
        let board_id = self.require_board()?;
        let name = validate_column_name(name)?;
        let order = self.require_snapshot()?.next_column_order();
        let column = NewColumn {
            board: board_id,
            name,
            order,
        };

        if let Err(e) = self.api.create_column(&column).await {
            self.notifier.notify(Notice::ColumnSaveFailed(e.user_message()));
            return Err(e);
        }
        tracing::info!("Created column {:?} on board {}", column.name, board_id);
        self.notifier.notify(Notice::ColumnCreated);
        self.refresh_after_edit().await;
        Ok(())
    }

    pub async fn rename_column(&mut self, column_id: ColumnId, name: &str) -> KanbanResult<()> {
        self.flush().await;
        self.require_column(column_id)?;
        let name = validate_column_name(name)?;
        let patch = ColumnPatch {
            name: Some(name.clone()),
            ..Default::default()
        };

        if let Err(e) = self.api.update_column(column_id, &patch).await {
            self.notifier.notify(Notice::ColumnSaveFailed(e.user_message()));
            return Err(e);
        }
        if let Some(column) = self.snapshot_mut().and_then(|s| s.column_mut(column_id)) {
            column.name = name;
        }
        self.notifier.notify(Notice::ColumnRenamed);
        Ok(())
    }

    // ---- helpers ----

    async fn refresh_after_edit(&mut self) {
        if let Err(e) = self.refresh().await {
            tracing::warn!("Refresh after edit failed: {}", e);
        }
    }

    fn snapshot_mut(&mut self) -> Option<&mut BoardSnapshot> {
        match &mut self.view {
            BoardView::Ready(snapshot) => Some(snapshot),
            _ => None,
        }
    }

    fn require_board(&self) -> KanbanResult<BoardId> {
        self.board_id
            .ok_or_else(|| KanbanError::NotFound("no board is open".to_string()))
    }

    fn require_snapshot(&self) -> KanbanResult<&BoardSnapshot> {
        self.view
            .snapshot()
            .ok_or_else(|| KanbanError::NotFound("board is not loaded".to_string()))
    }

    fn require_column(&self, column_id: ColumnId) -> KanbanResult<&Column> {
        self.require_snapshot()?
            .column(column_id)
            .ok_or_else(|| KanbanError::NotFound(format!("column {}", column_id)))
    }

    fn require_card(&self, card_id: CardId) -> KanbanResult<()> {
        self.require_snapshot()?
            .card(card_id)
            .map(|_| ())
            .ok_or_else(|| KanbanError::NotFound(format!("card {}", card_id)))
    }
}

fn success_notice(pending: &PendingMove) -> Notice {
    match pending.intent.kind {
        ItemKind::Column => Notice::ColumnMoved,
        ItemKind::Card if pending.effects.status_changed => Notice::StatusUpdated,
        ItemKind::Card => Notice::CardMoved,
    }
}

fn validate_column_name(name: &str) -> KanbanResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(KanbanError::Validation("column name is required".to_string()));
    }
    Ok(name.to_string())
}
