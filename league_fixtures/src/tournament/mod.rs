//! Competition configuration and whole-competition generation.

pub mod config;
pub mod planner;

pub use config::TournamentConfig;
pub use planner::{TournamentPlan, TournamentPlanner};
