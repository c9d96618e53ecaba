use super::state::{GameState, TableConfig};
use crate::error::SnapshotError;
use crate::model::action::Action;
use crate::model::card::ActualCard;
use crate::model::identity::MAX_RANK;
use serde::{Deserialize, Serialize};

/// Serialized form of a [`GameState`]. Every dynamic field is optional:
/// fields missing from the JSON keep the values of a blank state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StateSnapshot {
    pub config: TableConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turn_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clue_tokens: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strikes: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub early_game: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hands: Option<Vec<Vec<usize>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deck: Option<Vec<ActualCard>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_list: Option<Vec<Vec<Action>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub play_stacks: Option<Vec<usize>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discard_stacks: Option<Vec<[usize; MAX_RANK]>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_ranks: Option<Vec<usize>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cards_left: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_player_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_order: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endgame_turns: Option<usize>,
}

impl StateSnapshot {
    pub fn capture(state: &GameState) -> Self {
        StateSnapshot {
            config: state.config().clone(),
            turn_count: Some(state.turn_count),
            clue_tokens: Some(state.clue_tokens),
            strikes: Some(state.strikes),
            early_game: Some(state.early_game),
            hands: Some(state.hands.clone()),
            deck: Some(state.deck().to_vec()),
            action_list: Some(state.action_list().to_vec()),
            play_stacks: Some(state.play_stacks.clone()),
            discard_stacks: Some(state.discard_stacks.clone()),
            max_ranks: Some(state.max_ranks.clone()),
            cards_left: Some(state.cards_left),
            current_player_index: Some(state.current_player_index),
            card_order: state.card_order,
            endgame_turns: state.endgame_turns,
        }
    }

    pub fn restore(self) -> Result<GameState, SnapshotError> {
        let mut state = GameState::new(self.config);

        if let Some(deck) = self.deck {
            if let Some((index, card)) = deck
                .iter()
                .enumerate()
                .find(|(index, card)| card.order != *index)
            {
                return Err(SnapshotError::DeckOrder {
                    index,
                    order: card.order,
                });
            }
            state.replace_deck(deck);
        }
        if let Some(action_list) = self.action_list {
            state.replace_action_list(action_list);
        }

        if let Some(turn_count) = self.turn_count {
            state.turn_count = turn_count;
        }
        if let Some(clue_tokens) = self.clue_tokens {
            state.clue_tokens = clue_tokens;
        }
        if let Some(strikes) = self.strikes {
            state.strikes = strikes;
        }
        if let Some(early_game) = self.early_game {
            state.early_game = early_game;
        }
        if let Some(hands) = self.hands {
            state.hands = hands;
        }
        if let Some(play_stacks) = self.play_stacks {
            state.play_stacks = play_stacks;
        }
        if let Some(discard_stacks) = self.discard_stacks {
            state.discard_stacks = discard_stacks;
        }
        if let Some(max_ranks) = self.max_ranks {
            state.max_ranks = max_ranks;
        }
        if let Some(cards_left) = self.cards_left {
            state.cards_left = cards_left;
        }
        if let Some(current_player_index) = self.current_player_index {
            state.current_player_index = current_player_index;
        }
        state.card_order = self.card_order.or(state.card_order);
        state.endgame_turns = self.endgame_turns.or(state.endgame_turns);

        Ok(state)
    }

    pub fn to_json(state: &GameState) -> serde_json::Result<String> {
        let snapshot = Self::capture(state);
        serde_json::to_string_pretty(&snapshot)
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::StateSnapshot;
    use crate::error::SnapshotError;
    use crate::game::state::GameState;
    use crate::game::state::tests::config;
    use crate::model::card::ActualCard;
    use crate::model::identity::Identity;

    fn sample_state() -> GameState {
        let mut state = GameState::new(config(3));
        for order in 0..3 {
            state
                .deck_mut()
                .push(ActualCard::new(order, Some(Identity::new(order, 1)), 0));
            state.hands[order].push(order);
        }
        state.deck_mut()[1].clued = true;
        state.turn_count = 4;
        state.clue_tokens = 5;
        state.play_stacks[2] = 1;
        state.discard_stacks[0][0] = 1;
        state.endgame_turns = Some(2);
        state
    }

    #[test]
    fn snapshot_serializes_to_json() {
        let json = StateSnapshot::to_json(&sample_state()).unwrap();
        assert!(json.contains("\"turn_count\": 4"));
        assert!(json.contains("\"clue_tokens\": 5"));
        assert!(json.contains("\"player_names\""));
        assert!(!json.contains("\"card_order\""));
    }

    #[test]
    fn snapshot_roundtrip_restores_state() {
        let state = sample_state();
        let snapshot = StateSnapshot::capture(&state);
        let restored = StateSnapshot::from_json(&serde_json::to_string(&snapshot).unwrap())
            .unwrap()
            .restore()
            .unwrap();
        assert_eq!(restored.turn_count, 4);
        assert_eq!(restored.play_stacks, state.play_stacks);
        assert_eq!(restored.discard_stacks, state.discard_stacks);
        assert_eq!(restored.deck(), state.deck());
        assert_eq!(restored.hands, state.hands);
        assert_eq!(restored.endgame_turns, Some(2));
        assert!(restored.card(1).clued);
    }

    #[test]
    fn absent_fields_keep_blank_defaults() {
        let partial = r#"{
            "config": {
                "player_names": ["Alice", "Bob"],
                "our_player_index": 1,
                "variant": { "name": "No Variant", "suits": ["Red", "Yellow", "Green", "Blue", "Purple"] }
            },
            "clue_tokens": 3
        }"#;

        let state = StateSnapshot::from_json(partial).unwrap().restore().unwrap();
        assert_eq!(state.clue_tokens, 3);
        assert_eq!(state.our_player_index(), 1);
        assert_eq!(state.turn_count, 0);
        assert_eq!(state.cards_left, 50);
        assert_eq!(state.max_ranks, vec![5; 5]);
        assert!(state.early_game);
        assert!(state.deck().is_empty());
    }

    #[test]
    fn out_of_order_deck_is_rejected() {
        let mut snapshot = StateSnapshot::capture(&sample_state());
        if let Some(deck) = snapshot.deck.as_mut() {
            deck.swap(0, 2);
        }
        let err = snapshot.restore().unwrap_err();
        assert!(matches!(err, SnapshotError::DeckOrder { index: 0, order: 2 }));
    }
}
