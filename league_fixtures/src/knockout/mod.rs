//! Single-elimination brackets.
//!
//! [`BracketBuilder`] seeds the first round from a team list, a league table
//! or group tables and lays out placeholder rounds behind it.
//! [`BracketProgressor`] fills each following stage once every match of the
//! current stage has a winner.

pub mod bracket;
pub mod builder;
pub mod models;
pub mod progressor;

pub use bracket::Bracket;
pub use builder::{BRACKET_SIZES, BracketBuilder, choose_bracket_size};
pub use models::{
    BracketMatch, KnockoutFormat, KnockoutStage, PairingMethod, SeedingPolicy, Slot,
};
pub use progressor::BracketProgressor;
