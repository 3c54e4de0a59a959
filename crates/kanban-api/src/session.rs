//! Token storage between invocations.

use kanban_core::{KanbanError, KanbanResult};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::fs;

/// What the login endpoint hands back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    #[serde(default)]
    pub image: Option<String>,
}

impl Session {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            image: None,
        }
    }
}

/// JSON session file, replaced atomically on every save.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `None` when nobody is logged in.
    ///
    /// A file holding a bare token rather than a JSON session is accepted.
    pub async fn load(&self) -> KanbanResult<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path).await?;
        let session = match serde_json::from_str::<Session>(&content) {
            Ok(session) => session,
            Err(_) => Session::new(content.trim()),
        };
        if session.token.is_empty() {
            return Ok(None);
        }
        tracing::debug!("Loaded session from {}", self.path.display());
        Ok(Some(session))
    }

    pub async fn save(&self, session: &Session) -> KanbanResult<()> {
        let bytes = serde_json::to_vec_pretty(session)
            .map_err(|e| KanbanError::Serialization(e.to_string()))?;
        write_atomic(&self.path, &bytes).await?;
        tracing::info!("Saved session to {}", self.path.display());
        Ok(())
    }

    /// Remove the stored session. Succeeds when there is none.
    pub async fn clear(&self) -> KanbanResult<()> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Temp file in the target directory, then rename over the target. The temp
/// file is created owner-only, so the token never sits world-readable.
async fn write_atomic(path: &Path, data: &[u8]) -> KanbanResult<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent).await?;

    let target = path.to_path_buf();
    let data = data.to_vec();
    tokio::task::spawn_blocking(move || -> KanbanResult<()> {
        let mut temp = tempfile::NamedTempFile::new_in(&parent)?;
        temp.write_all(&data)?;
        temp.as_file().sync_all()?;
        temp.persist(&target).map_err(|e| KanbanError::Io(e.error))?;
        Ok(())
    })
    .await
    .map_err(|e| KanbanError::Internal(format!("session write task failed: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, SessionStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("nested").join("session.json"));
        (dir, store)
    }

    #[tokio::test]
    async fn test_missing_file_is_no_session() {
        let (_dir, store) = temp_store();
        assert_eq!(store.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let (_dir, store) = temp_store();
        let session = Session {
            token: "tok".to_string(),
            image: Some("/media/me.png".to_string()),
        };

        store.save(&session).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(session));
    }

    #[tokio::test]
    async fn test_save_overwrites() {
        let (_dir, store) = temp_store();
        store.save(&Session::new("first")).await.unwrap();
        store.save(&Session::new("second")).await.unwrap();

        assert_eq!(store.load().await.unwrap().unwrap().token, "second");
    }

    #[tokio::test]
    async fn test_bare_token_file() {
        let (_dir, store) = temp_store();
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), "raw-token\n").unwrap();

        assert_eq!(store.load().await.unwrap().unwrap().token, "raw-token");
    }

    #[tokio::test]
    async fn test_clear() {
        let (_dir, store) = temp_store();
        store.save(&Session::new("tok")).await.unwrap();

        store.clear().await.unwrap();
        assert_eq!(store.load().await.unwrap(), None);
        store.clear().await.unwrap();
    }
}
