//! League and group tables derived from completed fixtures.

pub mod calculator;
pub mod models;

pub use calculator::StandingsCalculator;
pub use models::StandingRow;
