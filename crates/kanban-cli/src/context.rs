use kanban_api::{HttpKanbanApi, Session, SessionStore};
use kanban_board::{BoardDirectory, BoardSync, Notice, Notifier, RecordingNotifier};
use kanban_core::{AppConfig, KanbanError, KanbanResult};
use kanban_domain::{BoardId, MoveRules};
use std::path::PathBuf;
use std::sync::Arc;

use crate::cli::Cli;

/// Configuration, session and notices shared by every command handler.
pub struct CliContext {
    pub config: AppConfig,
    token: Option<String>,
    notifier: Arc<RecordingNotifier>,
}

impl CliContext {
    /// Config file, then environment, then command-line flags.
    pub fn load(cli: &Cli) -> Self {
        let mut config = AppConfig::load().with_env_overrides(|key| std::env::var(key).ok());
        if let Some(url) = &cli.api_url {
            config.api_url = Some(url.clone());
        }
        if let Some(path) = &cli.session {
            config.session_file = Some(path.clone());
        }
        tracing::debug!("Using board service at {}", config.effective_api_url());

        Self {
            config,
            token: cli.token.clone().filter(|t| !t.trim().is_empty()),
            notifier: Arc::new(RecordingNotifier::new()),
        }
    }

    pub fn session_store(&self) -> KanbanResult<SessionStore> {
        let path: PathBuf = self.config.effective_session_file().ok_or_else(|| {
            KanbanError::Config("no session file location; pass --session".to_string())
        })?;
        Ok(SessionStore::new(path))
    }

    /// An explicit token wins over the stored session.
    pub async fn session(&self) -> KanbanResult<Option<Session>> {
        if let Some(token) = &self.token {
            return Ok(Some(Session::new(token.trim())));
        }
        self.session_store()?.load().await
    }

    /// Client without credentials, for logging in.
    pub fn anonymous_api(&self) -> KanbanResult<HttpKanbanApi> {
        HttpKanbanApi::from_config(&self.config, None)
    }

    pub async fn api(&self) -> KanbanResult<Arc<HttpKanbanApi>> {
        let session = self.session().await?.ok_or_else(|| {
            KanbanError::Unauthenticated("not logged in; run `kanban login` first".to_string())
        })?;
        Ok(Arc::new(HttpKanbanApi::from_config(
            &self.config,
            Some(&session),
        )?))
    }

    pub fn notifier(&self) -> Arc<dyn Notifier> {
        self.notifier.clone()
    }

    pub fn take_notices(&self) -> Vec<Notice> {
        self.notifier.take()
    }

    pub async fn directory(&self) -> KanbanResult<BoardDirectory<HttpKanbanApi>> {
        let mut directory = BoardDirectory::new(self.api().await?, self.notifier());
        directory.refresh().await?;
        Ok(directory)
    }

    /// Synchronizer with `board_id` already loaded.
    pub async fn open_board(&self, board_id: BoardId) -> KanbanResult<BoardSync<HttpKanbanApi>> {
        let rules = MoveRules::new(self.config.effective_production_column());
        let mut sync = BoardSync::new(self.api().await?, self.notifier(), rules);
        sync.load_board(board_id).await?;
        Ok(sync)
    }
}
