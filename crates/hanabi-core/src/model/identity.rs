use core::fmt;
use serde::{Deserialize, Serialize};

pub const MAX_RANK: usize = 5;

/// A card type: suit index (0-based) and rank (1..=5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Identity {
    pub suit_index: usize,
    pub rank: usize,
}

impl Identity {
    pub const fn new(suit_index: usize, rank: usize) -> Self {
        Self { suit_index, rank }
    }

    /// Dense index into a suits × ranks table.
    pub const fn to_index(self) -> usize {
        self.suit_index * MAX_RANK + (self.rank - 1)
    }

    pub const fn from_index(index: usize) -> Self {
        Self {
            suit_index: index / MAX_RANK,
            rank: index % MAX_RANK + 1,
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const LETTERS: &[u8] = b"rygbpmtkwn";
        let letter = LETTERS
            .get(self.suit_index)
            .map(|b| *b as char)
            .unwrap_or('?');
        write!(f, "{letter}{}", self.rank)
    }
}
