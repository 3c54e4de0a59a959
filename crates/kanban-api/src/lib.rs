pub mod endpoints;
pub mod http;
pub mod session;
pub mod traits;

pub use http::HttpKanbanApi;
pub use session::{Session, SessionStore};
pub use traits::KanbanApi;
