//! Student- and admin-facing views built on the eligibility engine.

pub mod apply;
pub mod board;
pub mod handlers;
pub mod query;
pub mod review;
pub mod students;
