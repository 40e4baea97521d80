pub mod ai;
pub mod assistant;
pub mod catalog;
pub mod guardrail;
pub mod prompt;
