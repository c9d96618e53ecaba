pub mod elim;
pub mod player;
pub mod team;
pub mod thought;

pub use player::{Connection, ConnectionKind, Link, Player, WaitingConnection};
pub use team::team_elim;
pub use thought::{CardStatus, Thought};
