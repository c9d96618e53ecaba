pub mod action;
pub mod card;
pub mod clue;
pub mod identity;
pub mod identity_set;
pub mod variant;

pub use action::{Action, ClueAction, DiscardAction, DrawAction, PlayAction, TurnAction};
pub use card::ActualCard;
pub use clue::{BaseClue, CardClue, Clue, ClueKind};
pub use identity::Identity;
pub use identity_set::IdentitySet;
pub use variant::{SuitKind, Variant};
