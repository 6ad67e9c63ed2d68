pub mod handlers;
pub mod prediction;
pub mod scoring;
