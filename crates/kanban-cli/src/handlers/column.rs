use crate::cli::ColumnAction;
use crate::context::CliContext;
use crate::handlers::{move_failure, MoveOutput};
use crate::output;
use kanban_core::KanbanError;
use kanban_domain::MoveIntent;

pub async fn handle(ctx: &CliContext, action: ColumnAction) -> anyhow::Result<()> {
    match action {
        ColumnAction::Create { board_id, name } => {
            let mut sync = ctx.open_board(board_id).await?;
            sync.create_column(&name).await?;
            output::output_success(sync.snapshot(), &ctx.take_notices())?;
        }
        ColumnAction::Rename { board_id, id, name } => {
            let mut sync = ctx.open_board(board_id).await?;
            sync.rename_column(id, &name).await?;
            let column = sync.snapshot().and_then(|s| s.column(id));
            output::output_success(column, &ctx.take_notices())?;
        }
        ColumnAction::Move {
            board_id,
            id,
            index,
        } => {
            let mut sync = ctx.open_board(board_id).await?;
            let from = sync
                .snapshot()
                .and_then(|s| s.column_index(id))
                .ok_or_else(|| KanbanError::NotFound(format!("column {}", id)))?;

            let report = sync
                .perform_move(MoveIntent::column(id, board_id, from, index))
                .await;
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
