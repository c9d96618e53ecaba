use crate::model::clue::CardClue;
use crate::model::identity::Identity;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Ground truth for one card order, as far as the state's holder can see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActualCard {
    pub order: usize,
    #[serde(default)]
    pub identity: Option<Identity>,
    #[serde(default)]
    pub clued: bool,
    #[serde(default)]
    pub newly_clued: bool,
    #[serde(default)]
    pub drawn_turn: usize,
    #[serde(default)]
    pub clues: Vec<CardClue>,
}

impl ActualCard {
    pub fn new(order: usize, identity: Option<Identity>, drawn_turn: usize) -> Self {
        Self {
            order,
            identity,
            clued: false,
            newly_clued: false,
            drawn_turn,
            clues: Vec::new(),
        }
    }

    pub fn identity(&self) -> Option<Identity> {
        self.identity
    }

    /// Whether the card is known to be `identity`. Hidden cards never match.
    pub fn matches(&self, identity: impl Into<Option<Identity>>) -> bool {
        match (self.identity, identity.into()) {
            (Some(ours), Some(theirs)) => ours == theirs,
            _ => false,
        }
    }
}

impl fmt::Display for ActualCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.identity {
            Some(id) => write!(f, "{id}"),
            None => f.write_str("xx"),
        }
    }
}
