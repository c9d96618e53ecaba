//! Variant rules: suit list, copy counts and which cards a clue touches.

use super::clue::{BaseClue, ClueKind};
use super::identity::{Identity, MAX_RANK};
use super::identity_set::IdentitySet;
use serde::{Deserialize, Serialize};

const STANDARD_SUITS: [&str; 6] = ["Red", "Yellow", "Green", "Blue", "Purple", "Teal"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    pub name: String,
    pub suits: Vec<String>,
}

/// Touch behaviour of a suit, derived from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SuitKind {
    pub all_colours: bool,
    pub no_colours: bool,
    pub all_ranks: bool,
    pub no_ranks: bool,
    pub dark: bool,
}

impl SuitKind {
    pub fn from_name(name: &str) -> Self {
        let has = |keys: &[&str]| keys.iter().any(|key| name.contains(key));
        Self {
            all_colours: has(&["Rainbow", "Omni"]),
            no_colours: has(&["White", "Gray", "Light", "Null"]),
            all_ranks: has(&["Pink", "Omni"]),
            no_ranks: has(&["Brown", "Muddy", "Cocoa", "Null"]),
            dark: has(&["Black", "Dark", "Gray", "Cocoa"]),
        }
    }

    /// Whether a colour clue can name this suit directly.
    pub fn colourable(self) -> bool {
        !self.all_colours && !self.no_colours
    }
}

impl Variant {
    pub fn new(name: impl Into<String>, suits: Vec<String>) -> Self {
        Self {
            name: name.into(),
            suits,
        }
    }

    /// The plain variant with the first `num_suits` standard colours.
    pub fn no_variant(num_suits: usize) -> Self {
        let count = num_suits.min(STANDARD_SUITS.len());
        let name = match count {
            5 => "No Variant".to_string(),
            n => format!("{n} Suits"),
        };
        let suits = STANDARD_SUITS[..count].iter().map(|s| s.to_string()).collect();
        Self::new(name, suits)
    }

    pub fn num_suits(&self) -> usize {
        self.suits.len()
    }

    pub fn suit_kind(&self, suit_index: usize) -> SuitKind {
        self.suits
            .get(suit_index)
            .map(|name| SuitKind::from_name(name))
            .unwrap_or_default()
    }

    pub fn includes(&self, mut predicate: impl FnMut(&str) -> bool) -> bool {
        self.suits.iter().any(|suit| predicate(suit))
    }

    /// Suit indices that colour clues can name, in clue-value order.
    pub fn colourable_suits(&self) -> Vec<usize> {
        (0..self.suits.len())
            .filter(|&i| self.suit_kind(i).colourable())
            .collect()
    }

    pub fn all_ids(&self) -> IdentitySet {
        IdentitySet::all(self.num_suits())
    }

    pub fn card_count(&self, identity: Identity) -> usize {
        if self.suit_kind(identity.suit_index).dark {
            return 1;
        }
        match identity.rank {
            1 => 3,
            MAX_RANK => 1,
            _ => 2,
        }
    }

    /// Whether `clue` touches a card of the given identity.
    pub fn card_touched(&self, identity: Identity, clue: BaseClue) -> bool {
        let kind = self.suit_kind(identity.suit_index);
        match clue.kind {
            ClueKind::Colour => {
                if kind.no_colours {
                    return false;
                }
                if kind.all_colours {
                    return true;
                }
                self.colourable_suits().get(clue.value) == Some(&identity.suit_index)
            }
            ClueKind::Rank => {
                if kind.no_ranks {
                    return false;
                }
                kind.all_ranks || identity.rank == clue.value
            }
        }
    }

    /// Every identity the clue could touch.
    pub fn touch_possibilities(&self, clue: BaseClue) -> IdentitySet {
        self.all_ids().filter(|id| self.card_touched(id, clue))
    }
}
