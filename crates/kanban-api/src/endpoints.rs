//! Paths on the board service, relative to the configured base URL.

pub const API_INDEX: &str = "api/v1";

pub const LOGIN: &str = "api/v1/rest-auth/login/";
pub const BOARDS: &str = "api/v1/boards/";
pub const COLUMNS: &str = "api/v1/columns/";
pub const CARDS: &str = "api/v1/cards/";

pub fn board(id: i64) -> String {
    format!("{}{}/", BOARDS, id)
}

pub fn column(id: i64) -> String {
    format!("{}{}/", COLUMNS, id)
}

pub fn card(id: i64) -> String {
    format!("{}{}/", CARDS, id)
}
