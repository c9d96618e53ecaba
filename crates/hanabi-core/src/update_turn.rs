//! Resolution of waiting connections once the player they wait on has acted.

use crate::belief::team::team_elim;
use crate::game::session::Game;
use crate::model::action::{Action, TurnAction};
use crate::model::identity::Identity;
use serde::Serialize;
use tracing::{Level, event};

/// Which waiting connections moved, and how, during one turn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TurnReport {
    /// Focus orders whose connection was disproven by the played card.
    pub invalidated: Vec<usize>,
    /// Focus orders whose connection advanced to a later link.
    pub advanced: Vec<usize>,
    /// Focus orders whose connection ran out of links and was dropped.
    pub exhausted: Vec<usize>,
    /// Focus orders left with no consistent inference after retraction.
    pub contradictions: Vec<usize>,
}

/// Advances or retracts every waiting connection of the common view, then
/// re-runs elimination once.
pub fn update_turn(game: &mut Game, action: &TurnAction) -> TurnReport {
    let mut report = TurnReport::default();
    let mut to_remove = Vec::new();

    for index in 0..game.common.waiting_connections.len() {
        let waiting = &game.common.waiting_connections[index];
        let (focus, inference, conn_index) = (waiting.focus, waiting.inference, waiting.conn_index);
        let Some(conn) = waiting.current() else {
            to_remove.push(index);
            report.exhausted.push(focus);
            continue;
        };

        event!(
            target: "hanabi_core::update_turn",
            Level::INFO,
            turn = action.num,
            focus,
            inference = %inference,
            order = conn.order,
            reacting = %game.state.player_names()[conn.reacting],
            message = "waiting for connecting card"
        );

        let Some(Action::Play(played)) = &game.last_actions[conn.reacting] else {
            continue;
        };
        if game.state.hands[conn.reacting].contains(&conn.order) {
            continue;
        }

        let revealed = game.state.card(played.order);
        if !conn.identities.iter().any(|&id| revealed.matches(id)) {
            event!(
                target: "hanabi_core::update_turn",
                Level::INFO,
                focus,
                inference = %inference,
                played = %revealed,
                message = "card revealed to not match, removing connection"
            );
            to_remove.push(index);
            report.invalidated.push(focus);
            if retract(game, focus, inference) {
                report.contradictions.push(focus);
            }
            continue;
        }

        let connections = &game.common.waiting_connections[index].connections;
        let next = connections
            .iter()
            .enumerate()
            .skip(conn_index + 1)
            .find(|(_, conn)| game.state.hands[conn.reacting].contains(&conn.order))
            .map(|(i, _)| i);

        match next {
            Some(next) => {
                game.common.waiting_connections[index].conn_index = next;
                report.advanced.push(focus);
            }
            None => {
                to_remove.push(index);
                report.exhausted.push(focus);
            }
        }
    }

    let mut index = 0;
    game.common.waiting_connections.retain(|_| {
        let keep = !to_remove.contains(&index);
        index += 1;
        keep
    });

    game.common.update_hypo_stacks(&game.state);
    game.common.good_touch_elim(&game.state);
    team_elim(game);

    report
}

/// Removes `inference` from the focus card's inferences, restoring the
/// pre-chain snapshot if nothing would remain. Returns whether the card was
/// left contradictory.
fn retract(game: &mut Game, focus: usize, inference: Identity) -> bool {
    let mut contradiction = false;

    game.common.update_thoughts(focus, |thought| {
        let remaining = thought.inferred.subtract(inference);
        if !remaining.is_empty() {
            thought.inferred = remaining;
            return;
        }

        let restored = thought
            .old_inferred
            .take()
            .map(|old| old.intersect(thought.possible))
            .unwrap_or_default();
        if restored.is_empty() {
            contradiction = true;
            thought.reset_inferences();
        } else {
            thought.inferred = restored;
        }
    });

    if contradiction {
        tracing::error!(
            target: "hanabi_core::update_turn",
            focus,
            inference = %inference,
            message = "no inference left after retracting connection"
        );
    }
    contradiction
}
