// library crate for ifday
// exposes the evaluator and renderer to integration tests and embedders

pub mod cli;
pub mod clock;
pub mod conditions;
pub mod config;
pub mod template;
