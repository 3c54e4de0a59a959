use thiserror::Error;

#[derive(Error, Debug)]
pub enum KanbanError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Request rejected ({status}): {detail}")]
    Rejected { status: u16, detail: String },

    #[error("Not authenticated: {0}")]
    Unauthenticated(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type KanbanResult<T> = Result<T, KanbanError>;

impl KanbanError {
    /// Message suitable for a user-facing notification.
    ///
    /// Prefers the server's `detail` text when the request was rejected with one.
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected { detail, .. } if !detail.is_empty() => detail.clone(),
            Self::Rejected { status, .. } => format!("server responded with status {}", status),
            Self::Transport(_) => "could not reach the server".to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_detail() {
        let err = KanbanError::Rejected {
            status: 400,
            detail: "Column is locked".into(),
        };
        assert_eq!(err.user_message(), "Column is locked");

        let err = KanbanError::Rejected {
            status: 502,
            detail: String::new(),
        };
        assert_eq!(err.user_message(), "server responded with status 502");
    }
}
