use core::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClueKind {
    Colour,
    Rank,
}

/// A clue independent of its receiver. Colour values index the variant's colourable suits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BaseClue {
    pub kind: ClueKind,
    pub value: usize,
}

impl BaseClue {
    pub const fn colour(value: usize) -> Self {
        Self {
            kind: ClueKind::Colour,
            value,
        }
    }

    pub const fn rank(value: usize) -> Self {
        Self {
            kind: ClueKind::Rank,
            value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Clue {
    #[serde(flatten)]
    pub base: BaseClue,
    pub target: usize,
}

impl Clue {
    pub const fn new(base: BaseClue, target: usize) -> Self {
        Self { base, target }
    }
}

/// A clue as recorded on the card it touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardClue {
    #[serde(flatten)]
    pub base: BaseClue,
    pub giver: usize,
    pub turn: usize,
}

impl fmt::Display for BaseClue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ClueKind::Colour => write!(f, "colour {}", self.value),
            ClueKind::Rank => write!(f, "rank {}", self.value),
        }
    }
}
