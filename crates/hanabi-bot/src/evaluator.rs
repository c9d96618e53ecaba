use crate::features::EvalFeatures;
use hanabi_core::clue_result::{
    BadTouchResult, ElimResult, PlayablesResult, bad_touch_result, cm_result, elim_result,
    playables_result,
};
use hanabi_core::game::Game;
use hanabi_core::model::{Clue, ClueAction};
use serde::Serialize;
use tracing::{Level, event};

/// Measured effect of one candidate clue. No score is attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClueReport {
    pub turn: usize,
    pub giver: usize,
    pub clue: Clue,
    pub list: Vec<usize>,
    pub elim: ElimResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bad_touch: Option<BadTouchResult>,
    pub playables: PlayablesResult,
    pub chop_moved: Vec<usize>,
}

/// Simulates every valid clue a player could give and reports what each
/// would change.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClueEvaluator {
    features: EvalFeatures,
}

impl ClueEvaluator {
    pub const fn new(features: EvalFeatures) -> Self {
        Self { features }
    }

    pub fn from_env() -> Self {
        Self::new(EvalFeatures::from_env())
    }

    pub const fn features(&self) -> EvalFeatures {
        self.features
    }

    pub fn evaluate(&self, game: &Game, giver: usize) -> Vec<ClueReport> {
        let state = &game.state;
        let mut reports = Vec::new();

        for target in (0..state.num_players()).filter(|&target| target != giver) {
            for clue in state.all_valid_clues(target) {
                let report = self.evaluate_clue(game, giver, clue);
                self.log_report(&report);
                reports.push(report);
            }
        }
        reports
    }

    pub fn evaluate_clue(&self, game: &Game, giver: usize, clue: Clue) -> ClueReport {
        let state = &game.state;
        let hand = &state.hands[clue.target];
        let list = state.clue_touched(hand, clue.base);
        let action = ClueAction {
            giver,
            target: clue.target,
            list: list.clone(),
            clue: clue.base,
        };
        let hypo = game.simulate_clue(&action);

        let elim = elim_result(&hypo.state, &game.common, &hypo.common, hand, &list);
        let bad_touch = (!self.features.skip_bad_touch())
            .then(|| bad_touch_result(game, &hypo, &hypo.common, giver, clue.target));
        let me = (giver == state.our_player_index()).then(|| game.me());
        let playables = playables_result(&hypo.state, &game.common, &hypo.common, me);
        let chop_moved = cm_result(&game.common, &hypo.common, hand);

        ClueReport {
            turn: state.turn_count,
            giver,
            clue,
            list,
            elim,
            bad_touch,
            playables,
            chop_moved,
        }
    }

    fn log_report(&self, report: &ClueReport) {
        if !self.features.log_reports() || !tracing::enabled!(Level::INFO) {
            return;
        }

        let bad_touch = report
            .bad_touch
            .as_ref()
            .map_or(0, |result| result.bad_touch.len());

        event!(
            target: "hanabi_bot::clue_eval",
            Level::INFO,
            turn = report.turn,
            giver = report.giver,
            target = report.clue.target,
            clue = %report.clue.base,
            touched = report.list.len(),
            new_touched = report.elim.new_touched.len(),
            fill = report.elim.fill,
            elim = report.elim.elim,
            bad_touch,
            playables = report.playables.playables.len(),
            finesses = report.playables.finesses.len(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::ClueEvaluator;
    use crate::features::EvalFeatures;
    use hanabi_core::game::{Game, TableConfig, TableOptions};
    use hanabi_core::model::{Action, BaseClue, ClueKind, DrawAction, Identity, Variant};

    fn game_with(bob: &[Identity]) -> Game {
        let mut game = Game::new(TableConfig {
            player_names: vec!["Alice".into(), "Bob".into()],
            our_player_index: 0,
            variant: Variant::no_variant(5),
            options: TableOptions::default(),
        });
        for (order, &id) in bob.iter().enumerate() {
            game.handle_action(&Action::Draw(DrawAction {
                player_index: 1,
                order,
                identity: Some(id),
            }))
            .expect("draw");
        }
        game
    }

    #[test]
    fn evaluates_every_valid_clue() {
        let game = game_with(&[Identity::new(0, 1), Identity::new(3, 4)]);
        let reports = ClueEvaluator::default().evaluate(&game, 0);

        let clues: Vec<BaseClue> = reports.iter().map(|r| r.clue.base).collect();
        assert_eq!(
            clues,
            vec![
                BaseClue::rank(1),
                BaseClue::rank(4),
                BaseClue::colour(0),
                BaseClue::colour(3),
            ]
        );
        assert!(reports.iter().all(|r| r.clue.target == 1 && r.giver == 0));
        assert!(reports.iter().all(|r| r.bad_touch.is_some()));
    }

    #[test]
    fn rank_one_clue_creates_a_playable() {
        let game = game_with(&[Identity::new(0, 1), Identity::new(3, 4)]);
        let reports = ClueEvaluator::default().evaluate(&game, 0);
        let ones = reports
            .iter()
            .find(|r| r.clue.base.kind == ClueKind::Rank && r.clue.base.value == 1)
            .expect("rank 1 clue");

        assert_eq!(ones.list, vec![0]);
        assert_eq!(ones.elim.new_touched, vec![0]);
        assert_eq!(ones.playables.playables.len(), 1);
        assert_eq!(ones.playables.playables[0].order, 0);
        assert!(ones.chop_moved.is_empty());
    }

    #[test]
    fn evaluation_leaves_game_untouched() {
        let game = game_with(&[Identity::new(1, 2)]);
        let before = game.common.clone();
        let tokens = game.state.clue_tokens;
        let _ = ClueEvaluator::default().evaluate(&game, 0);
        assert_eq!(game.common, before);
        assert_eq!(game.state.clue_tokens, tokens);
        assert!(!game.state.card(0).clued);
    }

    #[test]
    fn bad_touch_can_be_skipped() {
        let game = game_with(&[Identity::new(1, 2)]);
        let evaluator = ClueEvaluator::new(EvalFeatures::new(true, false));
        let reports = evaluator.evaluate(&game, 0);
        assert!(!reports.is_empty());
        assert!(reports.iter().all(|r| r.bad_touch.is_none()));
    }
}
