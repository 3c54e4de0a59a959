pub mod board;
pub mod card;
pub mod column;
pub mod delivery_date;
pub mod moves;
pub mod order;
pub mod patch;
pub mod snapshot;

pub use board::{Board, BoardId, NewBoard, UserId};
pub use card::{Card, CardDraft, CardId, CardStatus, NewCard};
pub use column::{Column, ColumnId, NewColumn};
pub use moves::{
    resolve_move, ItemKind, Location, MoveEffects, MoveIntent, MoveRules, RemoteUpdate,
    Resolution, ResolvedMove, StaleReason,
};
pub use order::{assign_order, compute_order, renumber, Allocation, Ordered, Placement};
pub use patch::{CardPatch, ColumnPatch};
pub use snapshot::BoardSnapshot;
