use crate::cli::BoardAction;
use crate::context::CliContext;
use crate::output;
use kanban_core::KanbanError;

pub async fn handle(ctx: &CliContext, action: BoardAction) -> anyhow::Result<()> {
    match action {
        BoardAction::List => {
            let directory = ctx.directory().await?;
            output::output_list(directory.boards().to_vec(), &ctx.take_notices())?;
        }
        BoardAction::Create { name } => {
            let mut directory = ctx.directory().await?;
            let board = directory.create(&name).await?;
            output::output_success(&board, &ctx.take_notices())?;
        }
        BoardAction::Delete { id } => {
            let mut directory = ctx.directory().await?;
            directory.deactivate(id).await?;
            output::output_success(&directory.get(id), &ctx.take_notices())?;
        }
        BoardAction::Show { id } => {
            let directory = ctx.directory().await?;
            match directory.get(id) {
                None => return Err(KanbanError::NotFound(format!("board {}", id)).into()),
                Some(board) if !board.is_openable() => {
                    return Err(
                        KanbanError::Validation(format!("board {} is inactive", id)).into(),
                    )
                }
                Some(_) => {}
            }
            let sync = ctx.open_board(id).await?;
            output::output_success(sync.snapshot(), &ctx.take_notices())?;
        }
    }
    Ok(())
}
