pub mod filter;
pub mod generator;
pub mod transition;
