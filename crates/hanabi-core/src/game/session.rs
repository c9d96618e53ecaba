use crate::belief::player::{ConnectionKind, Player, WaitingConnection};
use crate::belief::team::team_elim;
use crate::belief::thought::{CardStatus, Thought};
use crate::error::ActionError;
use crate::game::state::{GameState, MAX_CLUE_TOKENS, MAX_STRIKES, TableConfig};
use crate::model::action::{Action, ClueAction, DiscardAction, DrawAction, PlayAction, TurnAction};
use crate::model::card::ActualCard;
use crate::model::clue::CardClue;
use crate::model::identity::{Identity, MAX_RANK};
use crate::model::identity_set::IdentitySet;
use crate::update_turn::{TurnReport, update_turn};
use tracing::{Level, event};

/// What applying an action produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Applied,
    TurnAdvanced(TurnReport),
}

/// A game as seen from our seat: the shared state, one view per player and
/// the common-knowledge view.
#[derive(Debug, Clone)]
pub struct Game {
    pub state: GameState,
    pub players: Vec<Player>,
    pub common: Player,
    /// Most recent play, discard or clue of each player.
    pub last_actions: Vec<Option<Action>>,
}

impl Game {
    pub fn new(config: TableConfig) -> Self {
        let state = GameState::new(config);
        let all_possible = state.variant().all_ids();
        let num_suits = state.num_suits();
        let num_players = state.num_players();

        Self {
            players: (0..num_players)
                .map(|index| Player::new(Some(index), all_possible, num_suits))
                .collect(),
            common: Player::common(all_possible, num_suits),
            last_actions: vec![None; num_players],
            state,
        }
    }

    /// Our own view.
    pub fn me(&self) -> &Player {
        &self.players[self.state.our_player_index()]
    }

    fn views_mut(&mut self) -> impl Iterator<Item = &mut Player> {
        self.players
            .iter_mut()
            .chain(std::iter::once(&mut self.common))
    }

    /// Validates and applies one action, recording it in the action log.
    pub fn handle_action(&mut self, action: &Action) -> Result<ActionOutcome, ActionError> {
        self.validate(action)?;
        self.state.record_action(action.clone());

        if tracing::enabled!(Level::DEBUG) {
            event!(
                target: "hanabi_core::game",
                Level::DEBUG,
                turn = self.state.turn_count,
                kind = action.kind(),
                actor = ?action.actor(),
            );
        }

        match action {
            Action::Clue(clue) => self.on_clue(clue),
            Action::Play(play) => self.on_play(play),
            Action::Discard(discard) => self.on_discard(discard),
            Action::Draw(draw) => self.on_draw(draw),
            Action::Turn(turn) => return Ok(ActionOutcome::TurnAdvanced(self.on_turn(turn))),
        }
        Ok(ActionOutcome::Applied)
    }

    fn validate(&self, action: &Action) -> Result<(), ActionError> {
        let num_players = self.state.num_players();
        let check_player = |index: usize| {
            if index < num_players {
                Ok(())
            } else {
                Err(ActionError::PlayerOutOfRange { index, num_players })
            }
        };
        let check_in_hand = |player_index: usize, order: usize| -> Result<(), ActionError> {
            check_player(player_index)?;
            if order >= self.state.deck().len() {
                return Err(ActionError::UnknownOrder(order));
            }
            if self.state.hands[player_index].contains(&order) {
                Ok(())
            } else {
                Err(ActionError::OrderNotInHand {
                    player_index,
                    order,
                })
            }
        };

        match action {
            Action::Clue(clue) => {
                check_player(clue.giver)?;
                check_player(clue.target)?;
                if self.state.clue_tokens == 0 {
                    return Err(ActionError::NoClueTokens);
                }
                clue.list
                    .iter()
                    .try_for_each(|&order| check_in_hand(clue.target, order))
            }
            Action::Play(play) => check_in_hand(play.player_index, play.order),
            Action::Discard(discard) => check_in_hand(discard.player_index, discard.order),
            Action::Draw(draw) => {
                check_player(draw.player_index)?;
                let expected = self.state.deck().len();
                if draw.order == expected {
                    Ok(())
                } else {
                    Err(ActionError::OrderOutOfSequence {
                        order: draw.order,
                        expected,
                    })
                }
            }
            Action::Turn(turn) => check_player(turn.current_player_index),
        }
    }

    fn on_clue(&mut self, action: &ClueAction) {
        self.apply_clue(action);
        self.state.clue_tokens = self.state.clue_tokens.saturating_sub(1);
        self.last_actions[action.giver] = Some(Action::Clue(action.clone()));
        self.elim();
    }

    fn apply_clue(&mut self, action: &ClueAction) {
        let touch = self.state.variant().touch_possibilities(action.clue);
        let turn = self.state.turn_count;
        let hand = self.state.hands[action.target].clone();

        for &order in &action.list {
            let card = &mut self.state.deck_mut()[order];
            if !card.clued {
                card.clued = true;
                card.newly_clued = true;
            }
            card.clues.push(CardClue {
                base: action.clue,
                giver: action.giver,
                turn,
            });
        }

        for view in self.views_mut() {
            for &order in &hand {
                let touched = action.list.contains(&order);
                view.update_thoughts(order, |thought| {
                    let possible = if touched {
                        thought.possible.intersect(touch)
                    } else {
                        thought.possible.subtract(touch)
                    };
                    if !possible.is_empty() {
                        thought.narrow_possible(possible);
                    }
                    if touched && matches!(thought.status, CardStatus::None | CardStatus::ChopMoved) {
                        thought.status = CardStatus::Clued;
                    }
                });
            }
        }
    }

    fn on_play(&mut self, action: &PlayAction) {
        self.remove_from_hand(action.player_index, action.order);

        if let Some(id) = self.reveal(action.order, action.identity) {
            self.state.play_stacks[id.suit_index] = id.rank;
            if id.rank == MAX_RANK {
                self.state.clue_tokens = (self.state.clue_tokens + 1).min(MAX_CLUE_TOKENS);
            }
        }

        self.last_actions[action.player_index] = Some(Action::Play(*action));
        self.elim();
    }

    fn on_discard(&mut self, action: &DiscardAction) {
        self.remove_from_hand(action.player_index, action.order);

        if let Some(id) = self.reveal(action.order, action.identity) {
            let total = self.state.card_count(id);
            let discarded = &mut self.state.discard_stacks[id.suit_index][id.rank - 1];
            *discarded += 1;
            if *discarded >= total {
                let max_rank = &mut self.state.max_ranks[id.suit_index];
                *max_rank = (*max_rank).min(id.rank - 1);
            }
        }

        if action.failed {
            self.state.strikes = (self.state.strikes + 1).min(MAX_STRIKES);
        } else {
            self.state.clue_tokens = (self.state.clue_tokens + 1).min(MAX_CLUE_TOKENS);
            self.state.early_game = false;
        }

        self.last_actions[action.player_index] = Some(Action::Discard(*action));
        self.elim();
    }

    fn on_draw(&mut self, action: &DrawAction) {
        let DrawAction {
            player_index,
            order,
            identity,
        } = *action;
        let turn = self.state.turn_count;

        self.state.hands[player_index].insert(0, order);
        self.state
            .deck_mut()
            .push(ActualCard::new(order, identity, turn));
        self.state.card_order = Some(order);

        for view in self.views_mut() {
            let base = match view.player_index {
                Some(viewer) if viewer != player_index => identity,
                _ => None,
            };
            let thought = Thought::new(order, base, view.all_possible);
            view.thoughts.push(thought);
        }

        self.state.cards_left = self.state.cards_left.saturating_sub(1);
        if self.state.cards_left == 0 && self.state.endgame_turns.is_none() {
            self.state.endgame_turns = Some(self.state.num_players());
        }

        self.elim();
    }

    fn on_turn(&mut self, action: &TurnAction) -> TurnReport {
        self.state.turn_count = action.num + 1;
        self.state.current_player_index = action.current_player_index;
        if let Some(remaining) = self.state.endgame_turns {
            self.state.endgame_turns = Some(remaining.saturating_sub(1));
        }

        let report = update_turn(self, action);

        if self.state.deck().iter().any(|card| card.newly_clued) {
            for card in self.state.deck_mut() {
                card.newly_clued = false;
            }
        }
        report
    }

    fn remove_from_hand(&mut self, player_index: usize, order: usize) {
        self.state.hands[player_index].retain(|&o| o != order);
    }

    /// Writes a revealed identity into the deck and collapses every view's
    /// thoughts on it.
    fn reveal(&mut self, order: usize, identity: Option<Identity>) -> Option<Identity> {
        let id = identity.or(self.state.card(order).identity)?;
        self.state.deck_mut()[order].identity = Some(id);

        let single = IdentitySet::single(id);
        for view in self.views_mut() {
            view.update_thoughts(order, |thought| {
                thought.base = Some(id);
                thought.possible = single;
                thought.inferred = single;
            });
        }
        Some(id)
    }

    /// Elimination in the common view, then propagation to every player.
    pub fn elim(&mut self) {
        self.common.card_elim(&self.state);
        self.common.good_touch_elim(&self.state);
        team_elim(self);
    }

    /// A fork of the game with the clue applied. The original is untouched.
    pub fn simulate_clue(&self, action: &ClueAction) -> Game {
        let mut hypo = Game {
            state: self.state.minimal_copy(),
            players: self.players.clone(),
            common: self.common.clone(),
            last_actions: self.last_actions.clone(),
        };
        hypo.apply_clue(action);
        hypo.state.clue_tokens = hypo.state.clue_tokens.saturating_sub(1);
        hypo.elim();
        hypo
    }

    /// Queues a multi-turn inference on the focus card in the common view.
    ///
    /// The focus keeps the snapshot of its inference from before its first
    /// pending chain, and is narrowed to the union of every pending chain's
    /// inference. Finesse links are marked as blind plays.
    pub fn add_waiting_connection(&mut self, waiting: WaitingConnection) -> Result<(), ActionError> {
        let focus = waiting.focus;
        if focus >= self.common.thoughts.len() {
            return Err(ActionError::UnknownOrder(focus));
        }
        if let Some(conn) = waiting
            .connections
            .iter()
            .find(|conn| conn.order >= self.common.thoughts.len())
        {
            return Err(ActionError::UnknownOrder(conn.order));
        }
        let num_players = self.state.num_players();
        if let Some(conn) = waiting
            .connections
            .iter()
            .find(|conn| conn.reacting >= num_players)
        {
            return Err(ActionError::PlayerOutOfRange {
                index: conn.reacting,
                num_players,
            });
        }
        let all_ids = self.state.variant().all_ids();
        if let Some(&id) = std::iter::once(&waiting.inference)
            .chain(waiting.connections.iter().flat_map(|conn| &conn.identities))
            .find(|&&id| !all_ids.has(id))
        {
            return Err(ActionError::UnknownIdentity(id));
        }

        let finesses: Vec<(usize, IdentitySet)> = waiting
            .connections
            .iter()
            .filter(|conn| conn.kind == ConnectionKind::Finesse)
            .map(|conn| (conn.order, conn.identities.iter().copied().collect()))
            .collect();

        self.common.waiting_connections.push(waiting);
        let pending: IdentitySet = self
            .common
            .waiting_connections
            .iter()
            .filter(|wc| wc.focus == focus)
            .map(|wc| wc.inference)
            .collect();

        self.common.update_thoughts(focus, |thought| {
            if thought.old_inferred.is_none() {
                thought.old_inferred = Some(thought.inferred);
            }
            let inferred = pending.intersect(thought.possible);
            if !inferred.is_empty() {
                thought.inferred = inferred;
            }
        });

        for (order, identities) in finesses {
            self.common.update_thoughts(order, |thought| {
                thought.status = CardStatus::BlindPlaying;
                let inferred = identities.intersect(thought.possible);
                if !inferred.is_empty() {
                    thought.inferred = inferred;
                }
            });
        }

        team_elim(self);
        Ok(())
    }
}
