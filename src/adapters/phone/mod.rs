//! Phone validation adapters.

mod heuristic;

pub use heuristic::HeuristicPhoneValidator;
