pub mod auth;
pub mod board;
pub mod card;
pub mod column;

use kanban_board::{MoveReport, MoveStatus};
use kanban_domain::BoardSnapshot;
use serde::Serialize;

/// What a `move` command prints on success.
#[derive(Serialize)]
pub struct MoveOutput<'a> {
    pub moved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_changed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renumbered: Option<bool>,
    pub board: Option<&'a BoardSnapshot>,
}

impl<'a> MoveOutput<'a> {
    pub fn new(report: Option<&MoveReport>, board: Option<&'a BoardSnapshot>) -> Self {
        Self {
            moved: report.is_some_and(MoveReport::is_ok),
            status_changed: report.map(|r| r.effects.status_changed),
            renumbered: report.map(|r| r.effects.renumbered),
            board,
        }
    }
}

/// Error for a move the server refused, after the board was reconciled.
pub fn move_failure(report: &MoveReport) -> Option<anyhow::Error> {
    if report.status != MoveStatus::RemoteFailed {
        return None;
    }
    let reason = report
        .error
        .clone()
        .unwrap_or_else(|| "move was rejected".to_string());
    Some(anyhow::anyhow!(reason))
}
