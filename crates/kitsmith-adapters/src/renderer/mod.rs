//! Expression evaluator adapters.

mod tera_evaluator;

pub use tera_evaluator::TeraEvaluator;
