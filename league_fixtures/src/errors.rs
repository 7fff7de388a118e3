//! Scheduling error types.

use thiserror::Error;

use crate::fixture::TeamId;
use crate::knockout::KnockoutStage;

/// Errors raised while generating or progressing a competition calendar.
///
/// Every variant is a configuration error: nothing is retried and no
/// partial fixture set is ever returned alongside one.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    /// Fewer than two real teams were supplied
    #[error("Insufficient teams: need at least {needed}, have {available}")]
    InsufficientTeams { needed: usize, available: usize },

    /// Manual group mode was requested but some teams carry no group label
    #[error("Missing group assignment for team(s): {}", teams.join(", "))]
    MissingGroupAssignment { teams: Vec<String> },

    /// No power-of-two bracket size fits the entrant count
    #[error("Invalid bracket size: no bracket of 2 to 32 slots fits {entrants} entrant(s)")]
    InvalidBracketSize { entrants: usize },

    /// Progression was requested before every match in the stage had a winner
    #[error("Stage {stage} is not complete: {unresolved} match(es) without a winner")]
    IncompleteStageForProgression {
        stage: KnockoutStage,
        unresolved: usize,
    },

    /// No league, group or knockout stage was selected
    #[error("No competition stage enabled: select a league, group or knockout format")]
    NoCompetitionStageEnabled,

    /// The final (or third-place playoff) has no following stage
    #[error("Cannot progress beyond {0}")]
    NoStageAfterFinal(KnockoutStage),

    /// Progression was requested for a stage the bracket does not contain
    #[error("Stage {0} is not part of this bracket")]
    StageNotInBracket(KnockoutStage),

    /// Rejected by configuration validation
    #[error("Invalid configuration for {field}: {reason}")]
    InvalidConfiguration { field: String, reason: String },

    /// A result or seeding refers to a team that is not in the input
    #[error("Unknown team: {0}")]
    UnknownTeam(TeamId),

    /// Configuration could not be decoded
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ScheduleError {
    /// Message shown to the administrator who triggered generation.
    ///
    /// Configuration errors are surfaced verbatim; decoding errors are
    /// shortened so that raw parser output does not leak into the UI.
    pub fn client_message(&self) -> String {
        match self {
            ScheduleError::Serialization(_) => "Invalid tournament configuration".to_string(),
            _ => self.to_string(),
        }
    }
}

impl From<serde_json::Error> for ScheduleError {
    fn from(err: serde_json::Error) -> Self {
        ScheduleError::Serialization(err.to_string())
    }
}

/// Result type for scheduling operations
pub type ScheduleResult<T> = Result<T, ScheduleError>;
