//! Delivery dates travel as `dd/mm/yyyy` text; date pickers produce ISO dates.

use chrono::NaiveDate;
use kanban_core::{KanbanError, KanbanResult};

pub const DISPLAY_FORMAT: &str = "%d/%m/%Y";
pub const INPUT_FORMAT: &str = "%Y-%m-%d";

/// Accept either `dd/mm/yyyy` or `yyyy-mm-dd` and return `dd/mm/yyyy`.
pub fn normalize(input: &str) -> KanbanResult<String> {
    let input = input.trim();
    parse(input)
        .map(|date| date.format(DISPLAY_FORMAT).to_string())
        .ok_or_else(|| KanbanError::Validation(format!("invalid delivery date: {}", input)))
}

pub fn parse(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    NaiveDate::parse_from_str(input, DISPLAY_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(input, INPUT_FORMAT))
        .ok()
}
