//! Belief elimination passes run on a single view after every action.

use super::player::{Link, Player};
use crate::game::state::GameState;
use crate::model::identity::Identity;
use crate::model::identity_set::IdentitySet;

impl Player {
    /// Removes identities whose every copy is already accounted for from the
    /// possible sets of all other cards in hands. Runs to a fixed point.
    pub fn card_elim(&mut self, state: &GameState) {
        let orders: Vec<usize> = state.orders_in_hands().collect();

        loop {
            let mut changed = false;

            for id in state.variant().all_ids().iter() {
                let certain: Vec<usize> = orders
                    .iter()
                    .copied()
                    .filter(|&o| self.thoughts[o].identity(false) == Some(id))
                    .collect();

                if state.base_count(id) + certain.len() < state.card_count(id) {
                    continue;
                }

                for &order in &orders {
                    if certain.contains(&order) || !self.thoughts[order].possible.has(id) {
                        continue;
                    }
                    let next = self.thoughts[order].possible.subtract(id);
                    if next.is_empty() {
                        continue;
                    }
                    self.thoughts[order].narrow_possible(next);
                    changed = true;
                }
            }

            if !changed {
                break;
            }
        }
    }

    /// Good touch: touched cards are assumed useful and not duplicates of
    /// other touched cards. Never empties an inferred set; runs to a fixed point.
    pub fn good_touch_elim(&mut self, state: &GameState) {
        loop {
            let touched: Vec<usize> = state
                .orders_in_hands()
                .filter(|&o| self.is_touched(state, o))
                .collect();
            let mut changed = false;

            for &order in &touched {
                let thought = &self.thoughts[order];
                if thought.identity(false).is_some() {
                    continue;
                }
                let useful = thought.inferred.filter(|id| !state.is_basic_trash(id));
                if !useful.is_empty() && useful != thought.inferred {
                    self.thoughts[order].set_inferred(useful);
                    changed = true;
                }
            }

            for &source in &touched {
                let Some(id) = self.thoughts[source].identity(true) else {
                    continue;
                };
                if state.is_basic_trash(id) {
                    continue;
                }

                for &order in &touched {
                    let thought = &self.thoughts[order];
                    if order == source
                        || thought.identity(true).is_some()
                        || !thought.inferred.has(id)
                    {
                        continue;
                    }
                    let next = thought.inferred.subtract(id);
                    if next.is_empty() {
                        continue;
                    }
                    self.thoughts[order].set_inferred(next);
                    changed = true;
                }
            }

            if !changed {
                break;
            }
        }
    }

    /// Rebuilds links: touched, undetermined cards in one hand that share an
    /// inferred set with fewer identities than cards.
    pub fn refresh_links(&mut self, state: &GameState) {
        let mut links = Vec::new();

        for hand in &state.hands {
            let mut seen: Vec<usize> = Vec::new();

            for &order in hand {
                let thought = &self.thoughts[order];
                if seen.contains(&order)
                    || !self.is_touched(state, order)
                    || thought.identity(false).is_some()
                    || thought.inferred.is_empty()
                {
                    continue;
                }

                let inferred = thought.inferred;
                let group: Vec<usize> = hand
                    .iter()
                    .copied()
                    .filter(|&o| {
                        self.is_touched(state, o)
                            && self.thoughts[o].identity(false).is_none()
                            && self.thoughts[o].inferred == inferred
                    })
                    .collect();
                seen.extend(group.iter().copied());

                if group.len() > inferred.len() {
                    links.push(Link {
                        orders: group,
                        identities: inferred.iter().collect(),
                        promised: false,
                    });
                }
            }
        }

        self.links = links;
    }

    /// Recomputes hypothetical stacks and the set of orders this view expects
    /// to be played, starting from the real play stacks.
    pub fn update_hypo_stacks(&mut self, state: &GameState) {
        let mut hypo_stacks = state.play_stacks.clone();
        self.hypo_plays.clear();
        self.unknown_plays.clear();

        let orders: Vec<usize> = state.orders_in_hands().collect();
        let mut found_new = true;

        while found_new {
            found_new = false;

            for &order in &orders {
                if self.hypo_plays.contains(&order) || !self.is_touched(state, order) {
                    continue;
                }
                let thought = &self.thoughts[order];
                if thought.called_to_discard() {
                    continue;
                }

                let ids = match thought.identity(true) {
                    Some(id) => IdentitySet::single(id),
                    None => thought.inferred,
                };
                let playable = |id: Identity| {
                    id.rank == hypo_stacks[id.suit_index] + 1 && id.rank <= state.max_ranks[id.suit_index]
                };
                if ids.is_empty() || !ids.every(playable) {
                    continue;
                }

                self.hypo_plays.insert(order);
                found_new = true;
                match ids.only() {
                    Some(id) => hypo_stacks[id.suit_index] = id.rank,
                    None => {
                        self.unknown_plays.insert(order);
                    }
                }
            }
        }

        self.hypo_stacks = hypo_stacks;
    }
}
