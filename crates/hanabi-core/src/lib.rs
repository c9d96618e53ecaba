#![deny(warnings)]
pub mod belief;
pub mod clue_result;
pub mod error;
pub mod game;
pub mod model;
pub mod update_turn;

pub use error::{ActionError, SnapshotError};
pub use game::{Game, GameState, StateSnapshot, TableConfig};
