pub mod evaluator;
pub mod features;

pub use evaluator::{ClueEvaluator, ClueReport};
pub use features::EvalFeatures;
