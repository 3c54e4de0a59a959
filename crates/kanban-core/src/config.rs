use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_AUTH_SCHEME: &str = "Token";
pub const DEFAULT_PRODUCTION_COLUMN: &str = "producao";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default)]
    pub auth_scheme: Option<String>,
    #[serde(default)]
    pub production_column: Option<String>,
    #[serde(default)]
    pub session_file: Option<PathBuf>,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl AppConfig {
    pub fn config_dir() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            dirs::home_dir().map(|home| home.join(".config/kanban"))
        }
        #[cfg(any(target_os = "linux", target_os = "windows"))]
        {
            dirs::config_dir().map(|config| config.join("kanban"))
        }
        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            None
        }
    }

    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Load from the platform config file, falling back to defaults when the
    /// file is missing or unreadable, then apply environment overrides.
    pub fn load() -> Self {
        let config = Self::config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default();
        config.with_env_overrides(|key| std::env::var(key).ok())
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Ignoring malformed config {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Could not read config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Apply `KANBAN_*` overrides. The lookup is injected so tests do not
    /// have to touch the process environment.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("KANBAN_API_URL") {
            self.api_url = Some(url);
        }
        if let Some(scheme) = lookup("KANBAN_AUTH_SCHEME") {
            self.auth_scheme = Some(scheme);
        }
        if let Some(name) = lookup("KANBAN_PRODUCTION_COLUMN") {
            self.production_column = Some(name);
        }
        if let Some(path) = lookup("KANBAN_SESSION_FILE") {
            self.session_file = Some(PathBuf::from(path));
        }
        if let Some(secs) = lookup("KANBAN_TIMEOUT_SECS").and_then(|s| s.parse().ok()) {
            self.request_timeout_secs = Some(secs);
        }
        self
    }

    pub fn effective_api_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }

    pub fn effective_auth_scheme(&self) -> &str {
        self.auth_scheme.as_deref().unwrap_or(DEFAULT_AUTH_SCHEME)
    }

    pub fn effective_production_column(&self) -> &str {
        self.production_column
            .as_deref()
            .unwrap_or(DEFAULT_PRODUCTION_COLUMN)
    }

    pub fn effective_timeout_secs(&self) -> u64 {
        self.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)
    }

    pub fn effective_session_file(&self) -> Option<PathBuf> {
        self.session_file
            .clone()
            .or_else(|| Self::config_dir().map(|dir| dir.join("session.json")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.effective_api_url(), "http://localhost:8000");
        assert_eq!(config.effective_auth_scheme(), "Token");
        assert_eq!(config.effective_production_column(), "producao");
        assert_eq!(config.effective_timeout_secs(), 30);
    }

    #[test]
    fn test_load_from_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "api_url = \"https://boards.example.com\"\nproduction_column = \"shipped\"\n",
        )
        .unwrap();

        let config = AppConfig::load_from(&path);
        assert_eq!(config.effective_api_url(), "https://boards.example.com");
        assert_eq!(config.effective_production_column(), "shipped");
        assert_eq!(config.effective_auth_scheme(), "Token");
    }

    #[test]
    fn test_malformed_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "api_url = [not valid").unwrap();

        assert_eq!(AppConfig::load_from(&path), AppConfig::default());
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("absent.toml"));
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_env_overrides_win() {
        let env: HashMap<&str, &str> = [
            ("KANBAN_API_URL", "http://127.0.0.1:9000"),
            ("KANBAN_SESSION_FILE", "/tmp/session.json"),
            ("KANBAN_TIMEOUT_SECS", "5"),
        ]
        .into_iter()
        .collect();

        let config = AppConfig {
            api_url: Some("http://file-value".to_string()),
            ..Default::default()
        }
        .with_env_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.effective_api_url(), "http://127.0.0.1:9000");
        assert_eq!(
            config.effective_session_file(),
            Some(PathBuf::from("/tmp/session.json"))
        );
        assert_eq!(config.effective_timeout_secs(), 5);
    }

    #[test]
    fn test_unparseable_timeout_is_ignored() {
        let config = AppConfig::default().with_env_overrides(|key| {
            (key == "KANBAN_TIMEOUT_SECS").then(|| "soon".to_string())
        });
        assert_eq!(config.effective_timeout_secs(), 30);
    }
}
