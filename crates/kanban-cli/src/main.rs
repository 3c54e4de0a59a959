mod cli;
mod context;
mod handlers;
mod output;

use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};
use context::CliContext;
use kanban_core::KanbanError;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Ok(log_path) = std::env::var("KANBAN_DEBUG_LOG") {
        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        tracing_subscriber::fmt()
            .with_writer(log_file)
            .with_max_level(tracing::Level::DEBUG)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_max_level(tracing::Level::WARN)
            .init();
    }

    let cli = Cli::parse();

    if let Commands::Completions { shell } = &cli.command {
        clap_complete::generate(*shell, &mut Cli::command(), "kanban", &mut std::io::stdout());
        return Ok(());
    }

    let ctx = CliContext::load(&cli);
    if let Err(e) = run(&ctx, cli.command).await {
        let message = match e.downcast_ref::<KanbanError>() {
            Some(err) => err.user_message(),
            None => format!("{:#}", e),
        };
        tracing::debug!("Command failed: {:?}", e);
        output::output_error(&message, &ctx.take_notices());
    }

    Ok(())
}

async fn run(ctx: &CliContext, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Login { username, password } => {
            handlers::auth::login(ctx, &username, &password).await?;
        }
        Commands::Logout => handlers::auth::logout(ctx).await?,
        Commands::Board(board_cmd) => {
            handlers::board::handle(ctx, board_cmd.action).await?;
        }
        Commands::Column(column_cmd) => {
            handlers::column::handle(ctx, column_cmd.action).await?;
        }
        Commands::Card(card_cmd) => {
            handlers::card::handle(ctx, card_cmd.action).await?;
        }
        Commands::Completions { .. } => {}
    }
    Ok(())
}
