pub mod directory;
pub mod notify;
pub mod outbox;
pub mod sync;

#[cfg(test)]
mod testing;

pub use directory::BoardDirectory;
pub use notify::{Notice, Notifier, RecordingNotifier, Severity, TracingNotifier};
pub use outbox::{persist, MoveReport, MoveStatus, Outbox, PendingMove};
pub use sync::{BoardSync, BoardView, LoadTicket};
