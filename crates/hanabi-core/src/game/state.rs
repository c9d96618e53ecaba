use crate::belief::thought::Thought;
use crate::model::action::Action;
use crate::model::card::ActualCard;
use crate::model::clue::{BaseClue, Clue};
use crate::model::identity::{Identity, MAX_RANK};
use crate::model::variant::Variant;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const MAX_CLUE_TOKENS: usize = 8;
pub const MAX_STRIKES: usize = 3;

/// Cards per hand, indexed by player count.
const HAND_SIZE: [usize; 7] = [0, 0, 5, 5, 4, 4, 3];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TableOptions {
    #[serde(default)]
    pub one_less_card: bool,
    #[serde(default)]
    pub one_extra_card: bool,
}

/// Static table configuration. Never mutated once a game starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    pub player_names: Vec<String>,
    pub our_player_index: usize,
    pub variant: Variant,
    #[serde(default)]
    pub options: TableOptions,
}

#[derive(Debug)]
struct Table {
    config: TableConfig,
    card_counts: Vec<[usize; MAX_RANK]>,
}

/// Authoritative shared facts of one game (or one hypothetical branch of it).
///
/// The deck and action log sit behind copy-on-write `Arc`s: a shallow copy
/// shares them until either side writes.
#[derive(Debug, Clone)]
pub struct GameState {
    table: Arc<Table>,
    pub turn_count: usize,
    pub clue_tokens: usize,
    pub strikes: usize,
    pub early_game: bool,
    pub hands: Vec<Vec<usize>>,
    deck: Arc<Vec<ActualCard>>,
    action_list: Arc<Vec<Vec<Action>>>,
    pub play_stacks: Vec<usize>,
    pub discard_stacks: Vec<[usize; MAX_RANK]>,
    pub max_ranks: Vec<usize>,
    pub cards_left: usize,
    pub current_player_index: usize,
    /// Order of the most recently drawn card.
    pub card_order: Option<usize>,
    pub endgame_turns: Option<usize>,
}

impl GameState {
    pub fn new(config: TableConfig) -> Self {
        let num_suits = config.variant.num_suits();
        let card_counts: Vec<[usize; MAX_RANK]> = (0..num_suits)
            .map(|suit_index| {
                std::array::from_fn(|r| config.variant.card_count(Identity::new(suit_index, r + 1)))
            })
            .collect();
        let cards_left: usize = card_counts.iter().flatten().sum();
        let num_players = config.player_names.len();

        Self {
            table: Arc::new(Table {
                config,
                card_counts,
            }),
            turn_count: 0,
            clue_tokens: MAX_CLUE_TOKENS,
            strikes: 0,
            early_game: true,
            hands: vec![Vec::new(); num_players],
            deck: Arc::new(Vec::new()),
            action_list: Arc::new(Vec::new()),
            play_stacks: vec![0; num_suits],
            discard_stacks: vec![[0; MAX_RANK]; num_suits],
            max_ranks: vec![MAX_RANK; num_suits],
            cards_left,
            current_player_index: 0,
            card_order: None,
            endgame_turns: None,
        }
    }

    /// A fresh state for the same table, as if the game had restarted.
    pub fn create_blank(&self) -> Self {
        let mut blank = Self::new(self.table.config.clone());
        blank.table = Arc::clone(&self.table);
        blank
    }

    /// Copies every top-level field. The deck and action log stay shared
    /// until one side mutates them.
    pub fn shallow_copy(&self) -> Self {
        self.clone()
    }

    /// Independent copy of everything turn processing mutates; only the
    /// table configuration is shared.
    pub fn minimal_copy(&self) -> Self {
        Self {
            table: Arc::clone(&self.table),
            turn_count: self.turn_count,
            clue_tokens: self.clue_tokens,
            strikes: self.strikes,
            early_game: self.early_game,
            hands: self.hands.iter().map(|hand| hand.to_vec()).collect(),
            deck: Arc::new(self.deck.iter().cloned().collect()),
            action_list: Arc::new(self.action_list.iter().map(|turn| turn.to_vec()).collect()),
            play_stacks: self.play_stacks.clone(),
            discard_stacks: self.discard_stacks.clone(),
            max_ranks: self.max_ranks.clone(),
            cards_left: self.cards_left,
            current_player_index: self.current_player_index,
            card_order: self.card_order,
            endgame_turns: self.endgame_turns,
        }
    }

    pub fn config(&self) -> &TableConfig {
        &self.table.config
    }

    pub fn variant(&self) -> &Variant {
        &self.table.config.variant
    }

    pub fn player_names(&self) -> &[String] {
        &self.table.config.player_names
    }

    pub fn num_players(&self) -> usize {
        self.table.config.player_names.len()
    }

    pub fn num_suits(&self) -> usize {
        self.table.card_counts.len()
    }

    pub fn our_player_index(&self) -> usize {
        self.table.config.our_player_index
    }

    pub fn our_hand(&self) -> &[usize] {
        &self.hands[self.our_player_index()]
    }

    pub fn hand_size(&self) -> usize {
        let base = HAND_SIZE
            .get(self.num_players())
            .copied()
            .unwrap_or(HAND_SIZE[6]);
        let options = self.table.config.options;
        if options.one_less_card {
            base.saturating_sub(1)
        } else if options.one_extra_card {
            base + 1
        } else {
            base
        }
    }

    pub fn deck(&self) -> &[ActualCard] {
        &self.deck
    }

    pub fn card(&self, order: usize) -> &ActualCard {
        &self.deck[order]
    }

    pub fn deck_mut(&mut self) -> &mut Vec<ActualCard> {
        Arc::make_mut(&mut self.deck)
    }

    pub fn action_list(&self) -> &[Vec<Action>] {
        &self.action_list
    }

    /// Appends an action to the log of the current turn.
    pub fn record_action(&mut self, action: Action) {
        let turn = self.turn_count;
        let list = Arc::make_mut(&mut self.action_list);
        if list.len() <= turn {
            list.resize_with(turn + 1, Vec::new);
        }
        list[turn].push(action);
    }

    pub(crate) fn replace_deck(&mut self, deck: Vec<ActualCard>) {
        self.deck = Arc::new(deck);
    }

    pub(crate) fn replace_action_list(&mut self, action_list: Vec<Vec<Action>>) {
        self.action_list = Arc::new(action_list);
    }

    #[cfg(test)]
    pub(crate) fn shares_deck_with(&self, other: &GameState) -> bool {
        Arc::ptr_eq(&self.deck, &other.deck)
    }

    /// The player holding `order`, if it is still in a hand.
    pub fn holder_of(&self, order: usize) -> Option<usize> {
        self.hands.iter().position(|hand| hand.contains(&order))
    }

    pub fn orders_in_hands(&self) -> impl Iterator<Item = usize> + '_ {
        self.hands.iter().flatten().copied()
    }

    pub fn score(&self) -> usize {
        self.play_stacks.iter().sum()
    }

    pub fn max_score(&self) -> usize {
        self.max_ranks.iter().sum()
    }

    /// Current score + cards left + number of players − max score.
    pub fn pace(&self) -> isize {
        (self.score() + self.cards_left + self.num_players()) as isize - self.max_score() as isize
    }

    pub fn ended(&self) -> bool {
        self.endgame_turns == Some(0)
    }

    pub fn in_endgame(&self) -> bool {
        self.pace() < self.num_players() as isize
    }

    pub fn next_player_index(&self, player_index: usize) -> usize {
        (player_index + 1) % self.num_players()
    }

    pub fn last_player_index(&self, player_index: usize) -> usize {
        (player_index + self.num_players() - 1) % self.num_players()
    }

    /// Copies of the identity already on the play stacks or discard pile.
    pub fn base_count(&self, identity: impl Into<Option<Identity>>) -> usize {
        let Some(Identity { suit_index, rank }) = identity.into() else {
            return 0;
        };
        let played = usize::from(self.play_stacks[suit_index] >= rank);
        played + self.discard_stacks[suit_index][rank - 1]
    }

    pub fn card_count(&self, identity: impl Into<Option<Identity>>) -> usize {
        match identity.into() {
            Some(Identity { suit_index, rank }) => self.table.card_counts[suit_index][rank - 1],
            None => 4,
        }
    }

    /// Already played, or can never be played.
    pub fn is_basic_trash(&self, identity: impl Into<Option<Identity>>) -> bool {
        let Some(Identity { suit_index, rank }) = identity.into() else {
            return false;
        };
        rank <= self.play_stacks[suit_index] || rank > self.max_ranks[suit_index]
    }

    /// Not trash, and every other copy is already discarded.
    pub fn is_critical(&self, identity: impl Into<Option<Identity>>) -> bool {
        let Some(id) = identity.into() else {
            return false;
        };
        !self.is_basic_trash(id)
            && self.discard_stacks[id.suit_index][id.rank - 1] == self.card_count(id) - 1
    }

    /// How many plays away the identity is. 0 means playable now.
    pub fn playable_away(&self, identity: impl Into<Option<Identity>>) -> isize {
        match identity.into() {
            Some(Identity { suit_index, rank }) => {
                rank as isize - (self.play_stacks[suit_index] as isize + 1)
            }
            None => MAX_RANK as isize,
        }
    }

    pub fn is_playable(&self, identity: impl Into<Option<Identity>>) -> bool {
        self.playable_away(identity) == 0
    }

    pub fn in_starting_hand(&self, order: usize) -> bool {
        order < self.num_players() * self.hand_size()
    }

    /// One or more inferences match the true identity (vacuously true when the
    /// card is unknown or fully determined).
    pub fn has_consistent_inferences(&self, thought: &Thought) -> bool {
        match self.deck.get(thought.order).and_then(ActualCard::identity) {
            None => true,
            Some(actual) => thought.possible.len() == 1 || thought.inferred.has(actual),
        }
    }

    pub fn includes_variant(&self, predicate: impl FnMut(&str) -> bool) -> bool {
        self.variant().includes(predicate)
    }

    /// Orders (in the given order) whose known identity the clue touches.
    pub fn clue_touched(&self, orders: &[usize], clue: BaseClue) -> Vec<usize> {
        orders
            .iter()
            .copied()
            .filter(|&order| {
                self.deck
                    .get(order)
                    .and_then(ActualCard::identity)
                    .is_some_and(|id| self.variant().card_touched(id, clue))
            })
            .collect()
    }

    /// Every rank and colour clue that touches at least one card of `target`.
    pub fn all_valid_clues(&self, target: usize) -> Vec<Clue> {
        let ranks = (1..=MAX_RANK).map(BaseClue::rank);
        let colours = (0..self.variant().colourable_suits().len()).map(BaseClue::colour);

        ranks
            .chain(colours)
            .filter(|&clue| !self.clue_touched(&self.hands[target], clue).is_empty())
            .map(|clue| Clue::new(clue, target))
            .collect()
    }
}
