use crate::model::identity::Identity;
use thiserror::Error;

/// Reasons an action cannot be applied to the current game.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ActionError {
    #[error("player index {index} out of range for {num_players} players")]
    PlayerOutOfRange { index: usize, num_players: usize },
    #[error("card {order} is not in player {player_index}'s hand")]
    OrderNotInHand { player_index: usize, order: usize },
    #[error("card {0} has not been drawn")]
    UnknownOrder(usize),
    #[error("drawn card {order} out of sequence (expected {expected})")]
    OrderOutOfSequence { order: usize, expected: usize },
    #[error("no clue tokens remaining")]
    NoClueTokens,
    #[error("identity {0} is not part of this variant")]
    UnknownIdentity(Identity),
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("deck entry {index} has order {order}")]
    DeckOrder { index: usize, order: usize },
    #[error("failed to encode or decode snapshot: {0}")]
    Json(#[from] serde_json::Error),
}
