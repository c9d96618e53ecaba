use hanabi_core::game::{ActionOutcome, Game, StateSnapshot, TableConfig, TableOptions};
use hanabi_core::model::{Action, Identity, Variant};

const LOG: &str = r#"[
    {"type": "draw", "player_index": 0, "order": 0},
    {"type": "draw", "player_index": 0, "order": 1},
    {"type": "draw", "player_index": 1, "order": 2, "identity": {"suit_index": 0, "rank": 1}},
    {"type": "draw", "player_index": 1, "order": 3, "identity": {"suit_index": 3, "rank": 4}},
    {"type": "clue", "giver": 0, "target": 1, "list": [2], "clue": {"kind": "rank", "value": 1}},
    {"type": "turn", "num": 0, "current_player_index": 1},
    {"type": "play", "player_index": 1, "order": 2, "identity": {"suit_index": 0, "rank": 1}},
    {"type": "draw", "player_index": 1, "order": 4, "identity": {"suit_index": 2, "rank": 2}},
    {"type": "turn", "num": 1, "current_player_index": 0}
]"#;

fn config() -> TableConfig {
    TableConfig {
        player_names: vec!["Alice".into(), "Bob".into()],
        our_player_index: 0,
        variant: Variant::no_variant(5),
        options: TableOptions::default(),
    }
}

fn replay() -> Game {
    let actions: Vec<Action> = serde_json::from_str(LOG).expect("action log decodes");
    let mut game = Game::new(config());
    for action in &actions {
        let outcome = game.handle_action(action).expect("action applies");
        if matches!(action, Action::Turn(_)) {
            assert!(matches!(outcome, ActionOutcome::TurnAdvanced(_)));
        }
    }
    game
}

#[test]
fn action_log_drives_the_game() {
    let game = replay();
    let state = &game.state;

    assert_eq!(state.turn_count, 2);
    assert_eq!(state.current_player_index, 0);
    assert_eq!(state.play_stacks, vec![1, 0, 0, 0, 0]);
    assert_eq!(state.clue_tokens, 7);
    assert_eq!(state.cards_left, 45);
    assert_eq!(state.hands[1], vec![4, 3]);
    assert_eq!(state.action_list().len(), 2);
    assert_eq!(state.card(2).identity, Some(Identity::new(0, 1)));

    let bob_card = game.common.thought(3);
    assert!(bob_card.possible.every(|id| id.rank != 1));
    assert!(!state.card(3).newly_clued);
}

#[test]
fn replayed_state_survives_a_snapshot() {
    let game = replay();
    let json = StateSnapshot::to_json(&game.state).expect("snapshot encodes");
    let restored = StateSnapshot::from_json(&json)
        .expect("snapshot decodes")
        .restore()
        .expect("snapshot restores");

    assert_eq!(restored.deck(), game.state.deck());
    assert_eq!(restored.action_list(), game.state.action_list());
    assert_eq!(restored.hands, game.state.hands);
    assert_eq!(restored.score(), 1);
    assert_eq!(restored.pace(), game.state.pace());
}
