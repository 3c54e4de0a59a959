//! User-facing notifications (toasts in a UI, stderr or JSON in the CLI).

use parking_lot::Mutex;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// Every message the board layer can surface. Failure variants carry the
/// reason, which is the server's `detail` text when it sent one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    CardMoved,
    StatusUpdated,
    ColumnMoved,
    CardMoveFailed(String),
    ColumnMoveFailed(String),
    BoardLoadFailed(String),
    BoardRefreshFailed(String),
    CardCreated,
    CardUpdated,
    CardSaveFailed(String),
    CardDeleted,
    CardDeleteFailed(String),
    ColumnCreated,
    ColumnRenamed,
    ColumnSaveFailed(String),
    BoardCreated,
    BoardDeactivated,
    BoardListFailed(String),
    BoardSaveFailed(String),
}

impl Notice {
    pub fn severity(&self) -> Severity {
        match self {
            Self::CardMoved
            | Self::StatusUpdated
            | Self::ColumnMoved
            | Self::CardCreated
            | Self::CardUpdated
            | Self::CardDeleted
            | Self::ColumnCreated
            | Self::ColumnRenamed
            | Self::BoardCreated
            | Self::BoardDeactivated => Severity::Success,
            _ => Severity::Error,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }

    pub fn message(&self) -> String {
        match self {
            Self::CardMoved => "Card moved".to_string(),
            Self::StatusUpdated => "Card moved to production and marked as done".to_string(),
            Self::ColumnMoved => "Column moved".to_string(),
            Self::CardMoveFailed(reason) => format!("Error moving card: {}", reason),
            Self::ColumnMoveFailed(reason) => format!("Error moving column: {}", reason),
            Self::BoardLoadFailed(reason) => format!("Error loading board: {}", reason),
            Self::BoardRefreshFailed(reason) => format!("Error refreshing board: {}", reason),
            Self::CardCreated => "Card created".to_string(),
            Self::CardUpdated => "Card updated".to_string(),
            Self::CardSaveFailed(reason) => format!("Error saving card: {}", reason),
            Self::CardDeleted => "Card deleted".to_string(),
            Self::CardDeleteFailed(reason) => format!("Error deleting card: {}", reason),
            Self::ColumnCreated => "Column created".to_string(),
            Self::ColumnRenamed => "Column renamed".to_string(),
            Self::ColumnSaveFailed(reason) => format!("Error saving column: {}", reason),
            Self::BoardCreated => "Board created".to_string(),
            Self::BoardDeactivated => "Board deactivated".to_string(),
            Self::BoardListFailed(reason) => format!("Error listing boards: {}", reason),
            Self::BoardSaveFailed(reason) => format!("Error saving board: {}", reason),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Sends notices to the log when nothing else is listening.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice.severity() {
            Severity::Success => tracing::info!("{}", notice),
            Severity::Error => tracing::error!("{}", notice),
        }
    }
}

/// Keeps every notice so a caller can show or inspect them afterwards.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().clone()
    }

    pub fn take(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.notices.lock())
    }

    pub fn has_errors(&self) -> bool {
        self.notices.lock().iter().any(Notice::is_error)
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        tracing::debug!("Notice: {}", notice);
        self.notices.lock().push(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_messages_are_distinct() {
        let messages = [
            Notice::CardMoved.message(),
            Notice::StatusUpdated.message(),
            Notice::ColumnMoved.message(),
            Notice::CardMoveFailed("x".into()).message(),
            Notice::ColumnMoveFailed("x".into()).message(),
        ];
        for (i, a) in messages.iter().enumerate() {
            for b in &messages[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_failure_carries_reason() {
        let notice = Notice::CardMoveFailed("Column is locked".into());
        assert!(notice.is_error());
        assert_eq!(notice.to_string(), "Error moving card: Column is locked");
    }

    #[test]
    fn test_recording_notifier() {
        let notifier = RecordingNotifier::new();
        notifier.notify(Notice::CardMoved);
        assert!(!notifier.has_errors());

        notifier.notify(Notice::BoardLoadFailed("offline".into()));
        assert!(notifier.has_errors());
        assert_eq!(notifier.take().len(), 2);
        assert!(notifier.notices().is_empty());
    }
}
