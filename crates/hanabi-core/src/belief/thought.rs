use crate::model::identity::Identity;
use crate::model::identity_set::IdentitySet;
use serde::{Deserialize, Serialize};

/// Convention-level status of a card, as one viewpoint sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardStatus {
    #[default]
    None,
    Clued,
    CalledToDiscard,
    ChopMoved,
    BlindPlaying,
}

/// Epistemic record for one card order from one viewpoint.
///
/// `inferred` is always a subset of `possible`. `old_inferred` is the snapshot
/// taken when the first inference chain on this card was established.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thought {
    pub order: usize,
    pub base: Option<Identity>,
    pub possible: IdentitySet,
    pub inferred: IdentitySet,
    pub old_inferred: Option<IdentitySet>,
    pub status: CardStatus,
    pub reset: bool,
}

impl Thought {
    pub fn new(order: usize, base: Option<Identity>, possible: IdentitySet) -> Self {
        Self {
            order,
            base,
            possible,
            inferred: possible,
            old_inferred: None,
            status: CardStatus::None,
            reset: false,
        }
    }

    /// The identity this viewpoint can name for the card, if any.
    ///
    /// A single possibility always wins, then a visible identity, then (with
    /// `infer`) a single inference.
    pub fn identity(&self, infer: bool) -> Option<Identity> {
        if let Some(id) = self.possible.only() {
            return Some(id);
        }
        if self.base.is_some() {
            return self.base;
        }
        if infer {
            return self.inferred.only();
        }
        None
    }

    pub fn matches(&self, identity: impl Into<Option<Identity>>, infer: bool) -> bool {
        match (self.identity(infer), identity.into()) {
            (Some(ours), Some(theirs)) => ours == theirs,
            _ => false,
        }
    }

    pub fn blind_playing(&self) -> bool {
        self.status == CardStatus::BlindPlaying
    }

    pub fn chop_moved(&self) -> bool {
        self.status == CardStatus::ChopMoved
    }

    pub fn called_to_discard(&self) -> bool {
        self.status == CardStatus::CalledToDiscard
    }

    /// Narrows `possible`, keeping `inferred` inside it. An emptied inference
    /// falls back to the new possible set.
    pub fn narrow_possible(&mut self, possible: IdentitySet) {
        self.possible = possible;
        self.inferred = self.inferred.intersect(possible);
        if self.inferred.is_empty() {
            self.reset_inferences();
        }
    }

    /// Replaces the inference, clipped to `possible`.
    pub fn set_inferred(&mut self, inferred: IdentitySet) {
        self.inferred = inferred.intersect(self.possible);
    }

    pub fn reset_inferences(&mut self) {
        self.inferred = self.possible;
        self.reset = true;
    }
}
