//! Teams, fixtures and round views.

pub mod calendar;
pub mod models;
pub mod rounds;

pub use calendar::RoundCalendar;
pub use models::{
    CompetitionId, Fixture, FixtureStatus, GroupLabel, Leg, MatchOutcome, Team, TeamId, TeamRef,
};
pub use rounds::{RoundSummary, rounds, team_fixtures};
