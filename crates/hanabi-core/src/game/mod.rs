pub mod serialization;
pub mod session;
pub mod state;

pub use serialization::StateSnapshot;
pub use session::{ActionOutcome, Game};
pub use state::{GameState, MAX_CLUE_TOKENS, MAX_STRIKES, TableConfig, TableOptions};
