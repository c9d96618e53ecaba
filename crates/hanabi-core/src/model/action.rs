use crate::model::clue::BaseClue;
use crate::model::identity::Identity;
use serde::{Deserialize, Serialize};

/// One entry of the action stream driving the game forward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    Clue(ClueAction),
    Play(PlayAction),
    Discard(DiscardAction),
    Draw(DrawAction),
    Turn(TurnAction),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClueAction {
    pub giver: usize,
    pub target: usize,
    pub list: Vec<usize>,
    pub clue: BaseClue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayAction {
    pub player_index: usize,
    pub order: usize,
    #[serde(default)]
    pub identity: Option<Identity>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscardAction {
    pub player_index: usize,
    pub order: usize,
    #[serde(default)]
    pub identity: Option<Identity>,
    #[serde(default)]
    pub failed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawAction {
    pub player_index: usize,
    pub order: usize,
    #[serde(default)]
    pub identity: Option<Identity>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnAction {
    pub num: usize,
    pub current_player_index: usize,
}

impl Action {
    /// The player who performed the action, if it has one.
    pub fn actor(&self) -> Option<usize> {
        match self {
            Action::Clue(clue) => Some(clue.giver),
            Action::Play(play) => Some(play.player_index),
            Action::Discard(discard) => Some(discard.player_index),
            Action::Draw(_) | Action::Turn(_) => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Action::Clue(_) => "clue",
            Action::Play(_) => "play",
            Action::Discard(_) => "discard",
            Action::Draw(_) => "draw",
            Action::Turn(_) => "turn",
        }
    }
}
