//! Serialized remote persistence of optimistic moves.
//!
//! Moves are persisted strictly in the order the user made them, one at a
//! time. A move is only sent once the previous one has completed.

use kanban_api::KanbanApi;
use kanban_core::KanbanResult;
use kanban_domain::{BoardSnapshot, ItemKind, MoveEffects, MoveIntent, RemoteUpdate};
use std::collections::VecDeque;

/// A move that is already applied locally and still has to reach the server.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingMove {
    pub ticket: u64,
    /// Load generation the move was resolved against.
    pub generation: u64,
    pub intent: MoveIntent,
    pub updates: Vec<RemoteUpdate>,
    pub effects: MoveEffects,
    /// Board as it was right before this move was applied.
    pub before: BoardSnapshot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveStatus {
    /// Never sent; dropped from the queue by a rollback or a reload.
    Pending,
    RemoteOk,
    RemoteFailed,
}

/// Outcome of one move once its remote phase is over.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveReport {
    pub ticket: u64,
    pub kind: ItemKind,
    pub status: MoveStatus,
    pub effects: MoveEffects,
    /// The board was reloaded or rolled back before this move settled, so
    /// its result was not applied.
    pub superseded: bool,
    pub error: Option<String>,
}

impl MoveReport {
    pub(crate) fn settled(pending: &PendingMove, status: MoveStatus, error: Option<String>) -> Self {
        Self {
            ticket: pending.ticket,
            kind: pending.intent.kind,
            status,
            effects: pending.effects,
            superseded: false,
            error,
        }
    }

    pub(crate) fn superseded(pending: &PendingMove, status: MoveStatus) -> Self {
        Self {
            ticket: pending.ticket,
            kind: pending.intent.kind,
            status,
            effects: pending.effects,
            superseded: true,
            error: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == MoveStatus::RemoteOk && !self.superseded
    }
}

/// FIFO of pending moves with at most one in flight.
#[derive(Debug, Default)]
pub struct Outbox {
    queue: VecDeque<PendingMove>,
    in_flight: Option<PendingMove>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, pending: PendingMove) {
        tracing::debug!(
            "Queued move {} ({} remote updates)",
            pending.ticket,
            pending.updates.len()
        );
        self.queue.push_back(pending);
    }

    /// Next move to send, or `None` while another one is still in flight.
    pub fn take_next(&mut self) -> Option<PendingMove> {
        if self.in_flight.is_some() {
            return None;
        }
        let next = self.queue.pop_front()?;
        self.in_flight = Some(next.clone());
        Some(next)
    }

    /// Release the in-flight slot for `ticket`.
    pub fn finish(&mut self, ticket: u64) -> Option<PendingMove> {
        match &self.in_flight {
            Some(pending) if pending.ticket == ticket => self.in_flight.take(),
            _ => None,
        }
    }

    /// Drop every queued move that has not been sent yet.
    pub fn discard_queued(&mut self) -> Vec<PendingMove> {
        self.queue.drain(..).collect()
    }

    pub fn is_idle(&self) -> bool {
        self.in_flight.is_none() && self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len() + usize::from(self.in_flight.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Send a move's updates in sequence, stopping at the first failure.
pub async fn persist<A: KanbanApi + ?Sized>(api: &A, pending: &PendingMove) -> KanbanResult<()> {
    for update in &pending.updates {
        match update {
            RemoteUpdate::Card { id, patch } => api.update_card(*id, patch).await?,
            RemoteUpdate::Column { id, patch } => api.update_column(*id, patch).await?,
        }
    }
    Ok(())
}
