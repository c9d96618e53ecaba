//! Information effect of a clue, measured by comparing views before and
//! after it. Every function here is read-only.

use crate::belief::player::Player;
use crate::belief::thought::CardStatus;
use crate::game::session::Game;
use crate::game::state::GameState;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ElimResult {
    /// Orders touched for the first time by the clue.
    pub new_touched: Vec<usize>,
    /// Re-touched cards that gained information.
    pub fill: usize,
    /// Previously clued, untouched cards that gained information.
    pub elim: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BadTouchResult {
    pub bad_touch: Vec<usize>,
    pub cm_dupe: Vec<usize>,
    pub trash: Vec<usize>,
    /// How much more duplication the giver causes than the best-placed
    /// potential giver would have.
    pub avoidable_dupe: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Playable {
    pub player_index: Option<usize>,
    pub order: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlayablesResult {
    pub finesses: Vec<Playable>,
    pub playables: Vec<Playable>,
}

/// Classifies the cards of `hand` whose possibilities shrank. `state` is the
/// state after the clue; `player` and `hypo_player` are the same view before
/// and after it.
pub fn elim_result(
    state: &GameState,
    player: &Player,
    hypo_player: &Player,
    hand: &[usize],
    list: &[usize],
) -> ElimResult {
    let mut result = ElimResult::default();

    for &order in hand {
        let card = state.card(order);
        let old = player.thought(order);
        let hypo = hypo_player.thought(order);

        if !card.clued || hypo.called_to_discard() || hypo.possible.len() >= old.possible.len() {
            continue;
        }

        if card.newly_clued && !old.blind_playing() {
            result.new_touched.push(order);
        } else if list.contains(&order) && state.has_consistent_inferences(hypo) {
            result.fill += 1;
        } else if state.has_consistent_inferences(hypo) {
            result.elim += 1;
        }
    }
    result
}

/// Finds newly clued cards in `target`'s hand that are wasted: known trash,
/// basic trash, duplicates of a chop-moved card, or duplicates of another
/// touched card.
pub fn bad_touch_result(
    game: &Game,
    hypo_game: &Game,
    hypo_player: &Player,
    giver: usize,
    target: usize,
) -> BadTouchResult {
    let state = &hypo_game.state;
    let target_hand = &state.hands[target];

    let dupe_scores: Vec<usize> = game
        .players
        .iter()
        .enumerate()
        .map(|(player_index, player)| {
            if player_index == target {
                return usize::MAX;
            }
            target_hand
                .iter()
                .filter_map(|&order| {
                    let card = state.card(order);
                    card.identity()
                        .filter(|&id| card.newly_clued && !state.is_basic_trash(id))
                })
                .map(|id| {
                    state.hands[player_index]
                        .iter()
                        .filter(|&&o| {
                            let thought = player.thought(o);
                            game.state.card(o).clued
                                && thought.inferred.len() > 1
                                && thought.inferred.has(id)
                        })
                        .count()
                })
                .sum()
        })
        .collect();

    let min_dupe = dupe_scores.iter().copied().min().unwrap_or(0);
    let avoidable_dupe = dupe_scores
        .get(giver)
        .map_or(0, |score| score.saturating_sub(min_dupe));

    let mut result = BadTouchResult {
        avoidable_dupe,
        ..BadTouchResult::default()
    };

    for &order in target_hand {
        let card = state.card(order);
        if !card.newly_clued {
            continue;
        }

        let known_trash = hypo_player
            .thought(order)
            .possible
            .every(|id| hypo_player.is_trash(state, id, order, true));
        if known_trash {
            result.trash.push(order);
            continue;
        }

        if state.is_basic_trash(card.identity()) {
            result.bad_touch.push(order);
            continue;
        }

        let cm_dupe = state.orders_in_hands().any(|o| {
            o != order
                && hypo_player.thought(o).status == CardStatus::ChopMoved
                && !state.card(o).clued
                && state.card(o).matches(card.identity())
        });
        if cm_dupe {
            result.cm_dupe.push(order);
        }
    }

    let before = game.me();
    let after = hypo_game.me();

    for &order in target_hand {
        let card = state.card(order);
        if !card.newly_clued
            || result.bad_touch.contains(&order)
            || result.trash.contains(&order)
            || result.cm_dupe.contains(&order)
        {
            continue;
        }

        let duplicated = state.hands.iter().enumerate().any(|(holder, hand)| {
            hand.iter().any(|&o| {
                (before.is_touched(&game.state, o) || after.is_touched(state, o))
                    && after.thought(o).matches(card.identity(), true)
                    && (holder != target || o < order)
            })
        });
        if duplicated {
            result.bad_touch.push(order);
        }
    }

    result
}

/// Cards `hypo_player` expects to be played that were not already playing
/// from `me`'s point of view (defaults to `player`).
pub fn playables_result(
    state: &GameState,
    player: &Player,
    hypo_player: &Player,
    me: Option<&Player>,
) -> PlayablesResult {
    let me = me.unwrap_or(player);
    let mut result = PlayablesResult::default();

    for &order in &hypo_player.hypo_plays {
        let card = state.card(order);
        let already_playing = me.hypo_plays.contains(&order)
            || me
                .hypo_plays
                .iter()
                .any(|&o| state.card(o).matches(card.identity()))
            || me.links.iter().any(|link| {
                link.identities.iter().all(|&id| card.matches(id))
                    && link.orders.iter().all(|o| me.hypo_plays.contains(o))
            });
        if already_playing {
            continue;
        }

        let playable = Playable {
            player_index: state.holder_of(order),
            order,
        };
        if hypo_player.thought(order).blind_playing() && !player.thought(order).blind_playing() {
            result.finesses.push(playable);
        }
        result.playables.push(playable);
    }
    result
}

/// Orders in `hand` that the clue chop-moved.
pub fn cm_result(player: &Player, hypo_player: &Player, hand: &[usize]) -> Vec<usize> {
    hand.iter()
        .copied()
        .filter(|&o| hypo_player.thought(o).chop_moved() && !player.thought(o).chop_moved())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{Playable, bad_touch_result, cm_result, elim_result, playables_result};
    use crate::belief::player::{Connection, ConnectionKind, WaitingConnection};
    use crate::belief::thought::CardStatus;
    use crate::game::session::Game;
    use crate::game::session::tests::{clue, draw, game, turn};
    use crate::model::action::ClueAction;
    use crate::model::clue::BaseClue;
    use crate::model::identity::Identity;

    const R1: Identity = Identity::new(0, 1);
    const R2: Identity = Identity::new(0, 2);
    const R3: Identity = Identity::new(0, 3);
    const G2: Identity = Identity::new(2, 2);
    const B3: Identity = Identity::new(3, 3);
    const B4: Identity = Identity::new(3, 4);

    fn deal(num_players: usize, hands: &[(usize, Identity)]) -> Game {
        let mut game = game(num_players);
        for (order, &(player_index, id)) in hands.iter().enumerate() {
            draw(&mut game, player_index, order, Some(id));
        }
        game
    }

    fn red_to(game: &Game, target: usize, list: &[usize]) -> (Game, ClueAction) {
        let action = ClueAction {
            giver: 0,
            target,
            list: list.to_vec(),
            clue: BaseClue::colour(0),
        };
        (game.simulate_clue(&action), action)
    }

    #[test]
    fn first_touch_counts_as_new() {
        let game = deal(2, &[(1, R1), (1, R2), (1, B3)]);
        let (hypo, action) = red_to(&game, 1, &[0, 1]);
        let result = elim_result(
            &hypo.state,
            &game.common,
            &hypo.common,
            &game.state.hands[1],
            &action.list,
        );
        assert_eq!(result.new_touched, vec![1, 0]);
        assert_eq!(result.fill, 0);
        assert_eq!(result.elim, 0);
    }

    #[test]
    fn retouch_fills_and_negative_information_eliminates() {
        let mut game = deal(2, &[(1, R1), (1, R2), (1, B3)]);
        clue(&mut game, 0, 1, &[0], BaseClue::rank(1));
        clue(&mut game, 0, 1, &[2], BaseClue::rank(3));
        turn(&mut game, 0);

        let (hypo, action) = red_to(&game, 1, &[0, 1]);
        let result = elim_result(
            &hypo.state,
            &game.common,
            &hypo.common,
            &game.state.hands[1],
            &action.list,
        );
        assert_eq!(result.new_touched, vec![1]);
        assert_eq!(result.fill, 1);
        assert_eq!(result.elim, 1);
    }

    #[test]
    fn already_played_card_is_bad_touch() {
        let mut game = game(2);
        game.state.play_stacks[0] = 1;
        draw(&mut game, 1, 0, Some(R1));
        draw(&mut game, 1, 1, Some(G2));

        let (hypo, _) = red_to(&game, 1, &[0]);
        let result = bad_touch_result(&game, &hypo, &hypo.common, 0, 1);
        assert_eq!(result.bad_touch, vec![0]);
        assert!(result.trash.is_empty());
    }

    #[test]
    fn card_known_to_be_trash_is_not_bad_touch() {
        let mut game = game(2);
        game.state.play_stacks = vec![1; 5];
        draw(&mut game, 1, 0, Some(R1));

        let hypo = game.simulate_clue(&ClueAction {
            giver: 0,
            target: 1,
            list: vec![0],
            clue: BaseClue::rank(1),
        });
        let result = bad_touch_result(&game, &hypo, &hypo.common, 0, 1);
        assert_eq!(result.trash, vec![0]);
        assert!(result.bad_touch.is_empty());
    }

    #[test]
    fn duplicating_a_touched_card_is_bad_touch() {
        let mut game = deal(3, &[(1, R2), (2, R2)]);
        clue(&mut game, 0, 2, &[1], BaseClue::colour(0));
        turn(&mut game, 0);

        let (hypo, _) = red_to(&game, 1, &[0]);
        let result = bad_touch_result(&game, &hypo, &hypo.common, 0, 1);
        assert_eq!(result.bad_touch, vec![0]);

        // Cathy holds a clued red card that could be the r2 herself.
        let from_cathy = bad_touch_result(&game, &hypo, &hypo.common, 2, 1);
        assert_eq!(from_cathy.avoidable_dupe, 1);
        assert_eq!(result.avoidable_dupe, 0);
    }

    #[test]
    fn same_hand_duplicate_blames_the_later_order() {
        let game = deal(2, &[(1, R2), (1, R2), (1, B3)]);
        let hand = game.state.hands[1].clone();
        assert_eq!(hand, vec![2, 1, 0]);

        let (hypo, _) = red_to(&game, 1, &[1, 0]);
        let result = bad_touch_result(&game, &hypo, &hypo.common, 0, 1);
        assert_eq!(result.bad_touch, vec![1]);
        assert!(result.trash.is_empty());
        assert!(result.cm_dupe.is_empty());
        assert_eq!(result.avoidable_dupe, 0);
    }

    #[test]
    fn card_touched_only_before_the_clue_still_counts_as_duplicate() {
        let mut game = deal(3, &[(1, R2), (2, R2)]);
        game.players[0].update_thoughts(1, |t| t.status = CardStatus::BlindPlaying);
        assert!(game.me().is_touched(&game.state, 1));

        let (hypo, _) = red_to(&game, 1, &[0]);
        assert!(!hypo.me().is_touched(&hypo.state, 1));

        let result = bad_touch_result(&game, &hypo, &hypo.common, 0, 1);
        assert_eq!(result.bad_touch, vec![0]);
    }

    #[test]
    fn duplicating_a_chop_moved_card_is_cm_dupe() {
        let game = deal(3, &[(1, R3), (2, R3)]);
        let (mut hypo, _) = red_to(&game, 1, &[0]);
        hypo.common
            .update_thoughts(1, |t| t.status = CardStatus::ChopMoved);

        let result = bad_touch_result(&game, &hypo, &hypo.common, 0, 1);
        assert_eq!(result.cm_dupe, vec![0]);
        assert!(result.bad_touch.is_empty());
    }

    #[test]
    fn new_plays_are_playables() {
        let game = deal(2, &[(1, R1), (1, B4)]);
        let hypo = game.simulate_clue(&ClueAction {
            giver: 0,
            target: 1,
            list: vec![0],
            clue: BaseClue::rank(1),
        });

        let result = playables_result(&hypo.state, &game.common, &hypo.common, Some(game.me()));
        assert_eq!(
            result.playables,
            vec![Playable {
                player_index: Some(1),
                order: 0
            }]
        );
        assert!(result.finesses.is_empty());

        let already = playables_result(&hypo.state, &game.common, &hypo.common, Some(hypo.me()));
        assert!(already.playables.is_empty());
    }

    #[test]
    fn blind_plays_are_finesses() {
        let game = deal(3, &[(1, R2), (2, R1)]);
        let (mut hypo, _) = red_to(&game, 1, &[0]);
        hypo.add_waiting_connection(WaitingConnection {
            connections: vec![Connection {
                kind: ConnectionKind::Finesse,
                reacting: 2,
                order: 1,
                identities: vec![R1],
            }],
            conn_index: 0,
            focus: 0,
            inference: R2,
            giver: 0,
            target: 1,
            turn: 0,
        })
        .expect("add");

        let result = playables_result(&hypo.state, &game.common, &hypo.common, None);
        let cathy = Playable {
            player_index: Some(2),
            order: 1,
        };
        let bob = Playable {
            player_index: Some(1),
            order: 0,
        };
        assert_eq!(result.finesses, vec![cathy]);
        assert_eq!(result.playables, vec![bob, cathy]);
    }

    #[test]
    fn chop_moves_are_reported_once() {
        let game = deal(2, &[(1, R3), (1, G2)]);
        let mut hypo = game.clone();
        hypo.common
            .update_thoughts(0, |t| t.status = CardStatus::ChopMoved);

        let hand = game.state.hands[1].clone();
        assert_eq!(cm_result(&game.common, &hypo.common, &hand), vec![0]);
        assert!(cm_result(&hypo.common, &hypo.common, &hand).is_empty());
    }
}
