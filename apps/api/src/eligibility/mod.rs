pub mod criteria;
pub mod evaluator;
pub mod handlers;
pub mod match_score;
