//! # League Fixtures
//!
//! A fixture scheduling engine for round-robin leagues, group stages and
//! single-elimination brackets.
//!
//! The engine is synchronous and performs no I/O: it takes a roster of teams
//! (and, later, completed results) and returns fixtures, tables and brackets
//! for the caller to persist. The only randomness is injected by the caller
//! as an [`rand::Rng`], so runs are reproducible with a seeded generator.
//!
//! ## Pipeline
//!
//! - **Scheduling**: circle-method round robins with running home/away
//!   balance, mirrored second legs and group partitioning
//! - **Standings**: ranked tables recomputed from completed fixtures
//! - **Brackets**: bracket sizing, seeding from teams or group tables,
//!   placeholder rounds and stage-by-stage progression
//!
//! ## Core Modules
//!
//! - [`schedule`]: round robins, leg mirroring and groups
//! - [`standings`]: league and group tables
//! - [`knockout`]: bracket building and progression
//! - [`tournament`]: configuration and whole-competition planning
//!
//! ## Example
//!
//! ```
//! use league_fixtures::{Team, TournamentConfig, TournamentPlanner};
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let teams: Vec<Team> = ["Albion", "Borough", "City", "Dynamo"]
//!     .iter()
//!     .enumerate()
//!     .map(|(i, name)| Team::new(format!("t{i}"), *name))
//!     .collect();
//!
//! let config = TournamentConfig::league("s1_league", "Premier");
//! let mut rng = StdRng::seed_from_u64(42);
//! let plan = TournamentPlanner::generate(&config, &teams, &mut rng).unwrap();
//!
//! assert_eq!(plan.rounds, 3);
//! assert_eq!(plan.fixtures.len(), 6);
//! ```

/// Scheduling errors.
pub mod errors;
pub use errors::{ScheduleError, ScheduleResult};

/// Teams, fixtures, round views and calendars.
pub mod fixture;
pub use fixture::{
    Fixture, FixtureStatus, Leg, MatchOutcome, RoundCalendar, RoundSummary, Team, TeamRef,
};

/// Round-robin and group-stage scheduling.
pub mod schedule;
pub use schedule::{
    GroupAssignmentMode, GroupPartitioner, HomeAwayBalance, RoundRobinScheduler, mirror_leg,
};

/// League and group tables.
pub mod standings;
pub use standings::{StandingRow, StandingsCalculator};

/// Knockout brackets.
pub mod knockout;
pub use knockout::{
    Bracket, BracketBuilder, BracketMatch, BracketProgressor, KnockoutFormat, KnockoutStage,
    PairingMethod, SeedingPolicy, choose_bracket_size,
};

/// Competition configuration and planning.
pub mod tournament;
pub use tournament::{TournamentConfig, TournamentPlan, TournamentPlanner};
