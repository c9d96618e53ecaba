use super::thought::{CardStatus, Thought};
use crate::game::state::GameState;
use crate::model::identity::Identity;
use crate::model::identity_set::IdentitySet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Orders known to jointly hold a shared set of identities
/// (e.g. "one of these two is the r3").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub orders: Vec<usize>,
    pub identities: Vec<Identity>,
    pub promised: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionKind {
    Known,
    Playable,
    Prompt,
    Finesse,
}

/// One expected reveal in a chain: `reacting` should play `order` as one of `identities`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub kind: ConnectionKind,
    pub reacting: usize,
    pub order: usize,
    pub identities: Vec<Identity>,
}

/// A pending multi-turn inference: `focus` is `inference` if every
/// connection resolves as expected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitingConnection {
    pub connections: Vec<Connection>,
    pub conn_index: usize,
    pub focus: usize,
    pub inference: Identity,
    pub giver: usize,
    pub target: usize,
    pub turn: usize,
}

impl WaitingConnection {
    pub fn current(&self) -> Option<&Connection> {
        self.connections.get(self.conn_index)
    }
}

/// One epistemic perspective: a real player's knowledge or the common view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    /// `None` for the common-knowledge view.
    pub player_index: Option<usize>,
    pub thoughts: Vec<Thought>,
    pub all_possible: IdentitySet,
    pub hypo_stacks: Vec<usize>,
    pub hypo_plays: BTreeSet<usize>,
    pub unknown_plays: BTreeSet<usize>,
    pub links: Vec<Link>,
    pub waiting_connections: Vec<WaitingConnection>,
}

impl Player {
    pub fn new(player_index: Option<usize>, all_possible: IdentitySet, num_suits: usize) -> Self {
        Self {
            player_index,
            thoughts: Vec::new(),
            all_possible,
            hypo_stacks: vec![0; num_suits],
            hypo_plays: BTreeSet::new(),
            unknown_plays: BTreeSet::new(),
            links: Vec::new(),
            waiting_connections: Vec::new(),
        }
    }

    pub fn common(all_possible: IdentitySet, num_suits: usize) -> Self {
        Self::new(None, all_possible, num_suits)
    }

    pub fn is_common(&self) -> bool {
        self.player_index.is_none()
    }

    pub fn thought(&self, order: usize) -> &Thought {
        &self.thoughts[order]
    }

    pub fn update_thoughts(&mut self, order: usize, update: impl FnOnce(&mut Thought)) {
        update(&mut self.thoughts[order]);
    }

    /// Clued, or assumed to be blind-playing.
    pub fn is_touched(&self, state: &GameState, order: usize) -> bool {
        state.card(order).clued
            || matches!(
                self.thoughts[order].status,
                CardStatus::Clued | CardStatus::BlindPlaying
            )
    }

    /// Whether `identity` is trash for the card at `order`: basic trash, or
    /// already held on another touched card.
    pub fn is_trash(&self, state: &GameState, identity: Identity, order: usize, infer: bool) -> bool {
        state.is_basic_trash(identity)
            || state.orders_in_hands().any(|o| {
                o != order
                    && self.is_touched(state, o)
                    && self.thoughts[o].matches(identity, infer)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::{Player, WaitingConnection};
    use crate::model::identity::Identity;
    use crate::model::identity_set::IdentitySet;

    #[test]
    fn common_view_has_no_index() {
        let common = Player::common(IdentitySet::all(5), 5);
        assert!(common.is_common());
        assert_eq!(common.hypo_stacks, vec![0; 5]);
        let alice = Player::new(Some(0), IdentitySet::all(5), 5);
        assert!(!alice.is_common());
    }

    #[test]
    fn waiting_connection_current_link() {
        let wc = WaitingConnection {
            connections: Vec::new(),
            conn_index: 0,
            focus: 3,
            inference: Identity::new(0, 3),
            giver: 0,
            target: 1,
            turn: 2,
        };
        assert!(wc.current().is_none());
    }
}
