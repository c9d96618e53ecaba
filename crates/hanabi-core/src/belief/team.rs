use crate::game::session::Game;

/// Propagates the common view into every player's view and re-runs each
/// player's own elimination. Running it twice with no action in between
/// leaves every view unchanged.
pub fn team_elim(game: &mut Game) {
    let Game {
        state,
        players,
        common,
        ..
    } = game;

    common.refresh_links(state);
    common.update_hypo_stacks(state);

    for player in players.iter_mut() {
        for (order, shared) in common.thoughts.iter().enumerate() {
            let Some(thought) = player.thoughts.get_mut(order) else {
                break;
            };

            let possible = thought.possible.intersect(shared.possible);
            if !possible.is_empty() {
                thought.possible = possible;
            }
            let inferred = shared.inferred.intersect(thought.possible);
            thought.inferred = if inferred.is_empty() {
                thought.possible
            } else {
                inferred
            };
            thought.old_inferred = shared.old_inferred;
            thought.status = shared.status;
            thought.reset = shared.reset;
        }
        player.waiting_connections = common.waiting_connections.clone();

        player.card_elim(state);
        player.good_touch_elim(state);
        player.refresh_links(state);
        player.update_hypo_stacks(state);
    }
}
