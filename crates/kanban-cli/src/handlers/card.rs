use crate::cli::CardAction;
use crate::context::CliContext;
use crate::handlers::{move_failure, MoveOutput};
use crate::output;
use kanban_core::KanbanError;
use kanban_domain::{CardDraft, Location, MoveIntent};

pub async fn handle(ctx: &CliContext, action: CardAction) -> anyhow::Result<()> {
    match action {
        CardAction::Create {
            board_id,
            column_id,
            title,
            delivery_date,
        } => {
            let mut sync = ctx.open_board(board_id).await?;
            sync.create_card(column_id, &CardDraft::new(title, delivery_date))
                .await?;
            let column = sync.snapshot().and_then(|s| s.column(column_id));
            output::output_success(column, &ctx.take_notices())?;
        }
        CardAction::Edit {
            board_id,
            id,
            title,
            delivery_date,
        } => {
            let mut sync = ctx.open_board(board_id).await?;
            let current = sync
                .snapshot()
                .and_then(|s| s.card(id))
                .ok_or_else(|| KanbanError::NotFound(format!("card {}", id)))?;
            let draft = CardDraft::new(
                title.unwrap_or_else(|| current.title.clone()),
                delivery_date.unwrap_or_else(|| current.delivery_date.clone()),
            );

            sync.edit_card(id, &draft).await?;
            let card = sync.snapshot().and_then(|s| s.card(id));
            output::output_success(card, &ctx.take_notices())?;
        }
        CardAction::Delete { board_id, id } => {
            let mut sync = ctx.open_board(board_id).await?;
            sync.delete_card(id).await?;
            output::output_success(serde_json::json!({"deleted": id}), &ctx.take_notices())?;
        }
        CardAction::Move {
            board_id,
            id,
            to_column,
            index,
        } => {
            let mut sync = ctx.open_board(board_id).await?;
            let intent = {
                let snapshot = sync
                    .snapshot()
                    .ok_or_else(|| KanbanError::NotFound(format!("board {}", board_id)))?;
                let (from_column, from_index) = snapshot
                    .locate_card(id)
                    .ok_or_else(|| KanbanError::NotFound(format!("card {}", id)))?;
                let target = snapshot
                    .column(to_column)
                    .ok_or_else(|| KanbanError::NotFound(format!("column {}", to_column)))?;
                // The bottom slot excludes the card itself when it stays put.
                let bottom = if from_column == to_column {
                    target.cards.len().saturating_sub(1)
                } else {
                    target.cards.len()
                };
                MoveIntent::card(
                    id,
                    Location::new(from_column, from_index),
                    Location::new(to_column, index.unwrap_or(bottom)),
                )
            };

            let report = sync.perform_move(intent).await;
            if let Some(err) = report.as_ref().and_then(move_failure) {
                return Err(err);
            }
            output::output_success(
                MoveOutput::new(report.as_ref(), sync.snapshot()),
                &ctx.take_notices(),
            )?;
        }
    }
    Ok(())
}
