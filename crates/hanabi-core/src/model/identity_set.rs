//! Immutable set over the finite identity space.

use super::identity::{Identity, MAX_RANK};
use core::fmt;
use serde::{Deserialize, Serialize};

/// Bit set over `suit * 5 + (rank - 1)`. Every operation returns a new value.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentitySet(u64);

impl IdentitySet {
    pub const EMPTY: Self = Self(0);
    pub const MAX_SUITS: usize = 12;

    /// Every identity of a variant with `num_suits` suits.
    pub fn all(num_suits: usize) -> Self {
        let bits = num_suits.min(Self::MAX_SUITS) * MAX_RANK;
        if bits == 0 {
            return Self::EMPTY;
        }
        Self(u64::MAX >> (64 - bits))
    }

    pub fn single(identity: Identity) -> Self {
        Self(1 << identity.to_index())
    }

    pub fn has(self, identity: Identity) -> bool {
        identity.rank >= 1
            && identity.rank <= MAX_RANK
            && identity.suit_index < Self::MAX_SUITS
            && self.0 & (1 << identity.to_index()) != 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn subtract(self, other: impl Into<IdentitySet>) -> Self {
        Self(self.0 & !other.into().0)
    }

    pub fn intersect(self, other: impl Into<IdentitySet>) -> Self {
        Self(self.0 & other.into().0)
    }

    pub fn union(self, other: impl Into<IdentitySet>) -> Self {
        Self(self.0 | other.into().0)
    }

    pub fn is_subset_of(self, other: IdentitySet) -> bool {
        self.0 & !other.0 == 0
    }

    pub fn filter(self, mut keep: impl FnMut(Identity) -> bool) -> Self {
        self.iter().filter(|id| keep(*id)).collect()
    }

    pub fn every(self, mut pred: impl FnMut(Identity) -> bool) -> bool {
        self.iter().all(|id| pred(id))
    }

    pub fn some(self, mut pred: impl FnMut(Identity) -> bool) -> bool {
        self.iter().any(|id| pred(id))
    }

    /// The sole member, if the set has exactly one.
    pub fn only(self) -> Option<Identity> {
        (self.len() == 1).then(|| Identity::from_index(self.0.trailing_zeros() as usize))
    }

    pub fn iter(self) -> impl Iterator<Item = Identity> {
        let bits = self.0;
        (0..64usize)
            .filter(move |i| bits & (1 << i) != 0)
            .map(Identity::from_index)
    }
}

impl From<Identity> for IdentitySet {
    fn from(identity: Identity) -> Self {
        Self::single(identity)
    }
}

impl FromIterator<Identity> for IdentitySet {
    fn from_iter<T: IntoIterator<Item = Identity>>(iter: T) -> Self {
        let mut bits = 0u64;
        for id in iter {
            bits |= 1 << id.to_index();
        }
        Self(bits)
    }
}

impl fmt::Debug for IdentitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().map(|id| id.to_string())).finish()
    }
}

impl fmt::Display for IdentitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ids: Vec<String> = self.iter().map(|id| id.to_string()).collect();
        write!(f, "[{}]", ids.join(","))
    }
}
