use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "kanban")]
#[command(about = "Command-line client for a remote kanban board", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Base URL of the board service (or set KANBAN_API_URL)
    #[arg(long, global = true, value_name = "URL", env = "KANBAN_API_URL")]
    pub api_url: Option<String>,

    /// File holding the login session (or set KANBAN_SESSION_FILE)
    #[arg(long, global = true, value_name = "FILE", env = "KANBAN_SESSION_FILE")]
    pub session: Option<PathBuf>,

    /// Use this token instead of the stored session
    #[arg(long, global = true, env = "KANBAN_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and store the session token
    Login {
        #[arg(long)]
        username: String,
        #[arg(long, env = "KANBAN_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Board operations
    Board(BoardCommand),
    /// Column operations
    Column(ColumnCommand),
    /// Card operations
    Card(CardCommand),
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// Board commands
#[derive(Args)]
pub struct BoardCommand {
    #[command(subcommand)]
    pub action: BoardAction,
}

#[derive(Subcommand)]
pub enum BoardAction {
    /// List your boards
    List,
    /// Create a new board
    Create {
        #[arg(long)]
        name: String,
    },
    /// Deactivate a board (it stays listed but can no longer be opened)
    Delete {
        #[arg(long)]
        id: i64,
    },
    /// Show a board with its columns and cards
    Show {
        #[arg(long)]
        id: i64,
    },
}

// Column commands
#[derive(Args)]
pub struct ColumnCommand {
    #[command(subcommand)]
    pub action: ColumnAction,
}

#[derive(Subcommand)]
pub enum ColumnAction {
    /// Append a column to a board
    Create {
        #[arg(long)]
        board_id: i64,
        #[arg(long)]
        name: String,
    },
    /// Rename a column
    Rename {
        #[arg(long)]
        board_id: i64,
        #[arg(long)]
        id: i64,
        #[arg(long)]
        name: String,
    },
    /// Move a column to another position on its board
    Move {
        #[arg(long)]
        board_id: i64,
        #[arg(long)]
        id: i64,
        /// Zero-based destination position
        #[arg(long)]
        index: usize,
    },
}

// Card commands
#[derive(Args)]
pub struct CardCommand {
    #[command(subcommand)]
    pub action: CardAction,
}

#[derive(Subcommand)]
pub enum CardAction {
    /// Add a card at the bottom of a column
    Create {
        #[arg(long)]
        board_id: i64,
        #[arg(long)]
        column_id: i64,
        #[arg(long)]
        title: String,
        /// dd/mm/yyyy or yyyy-mm-dd
        #[arg(long)]
        delivery_date: String,
    },
    /// Change a card's title or delivery date
    Edit {
        #[arg(long)]
        board_id: i64,
        #[arg(long)]
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        delivery_date: Option<String>,
    },
    /// Delete a card
    Delete {
        #[arg(long)]
        board_id: i64,
        #[arg(long)]
        id: i64,
    },
    /// Move a card to a column and position
    Move {
        #[arg(long)]
        board_id: i64,
        #[arg(long)]
        id: i64,
        #[arg(long)]
        to_column: i64,
        /// Zero-based destination position; defaults to the bottom
        #[arg(long)]
        index: Option<usize>,
    },
}
