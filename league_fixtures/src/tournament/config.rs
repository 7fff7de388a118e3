//! Competition configuration models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::{ScheduleError, ScheduleResult};
use crate::fixture::{CompetitionId, RoundCalendar};
use crate::knockout::{KnockoutFormat, PairingMethod, SeedingPolicy};
use crate::schedule::GroupAssignmentMode;

/// Competition configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TournamentConfig {
    /// Competition ID, used as the fixture ID prefix
    pub competition_id: CompetitionId,

    /// Display name
    pub name: String,

    /// Everyone plays everyone in one table
    pub has_league_stage: bool,

    /// Round robin inside groups
    pub has_group_stage: bool,

    /// Single-elimination bracket (after the league or group stage, or on its own)
    pub has_knockout_stage: bool,

    /// League and group stages play home and away
    pub is_two_legged: bool,

    /// Auto or manual group assignment
    pub group_assignment_mode: GroupAssignmentMode,

    /// Number of groups in auto mode (default: 4)
    pub number_of_groups: usize,

    /// Teams advancing from each group (default: 2)
    pub teams_advancing_per_group: usize,

    /// Bracket entrants after a league stage or in a knockout-only competition (default: 4)
    pub playoff_teams: usize,

    /// First-round pairing for group qualifiers
    pub pairing_method: PairingMethod,

    /// Single or two-legged knockout ties
    pub knockout_format: KnockoutFormat,

    /// Play a third-place match between the losing semi-finalists
    pub third_place_playoff: bool,

    /// Seeding of knockout-only entrants
    pub seeding: SeedingPolicy,

    /// Date of round 1 (no dates are assigned without it)
    pub start_date: Option<NaiveDate>,

    /// Days between rounds (default: 7)
    pub days_between_rounds: u32,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            competition_id: "competition".to_string(),
            name: "Competition".to_string(),
            has_league_stage: false,
            has_group_stage: false,
            has_knockout_stage: false,
            is_two_legged: false,
            group_assignment_mode: GroupAssignmentMode::Auto,
            number_of_groups: 4,
            teams_advancing_per_group: 2,
            playoff_teams: 4,
            pairing_method: PairingMethod::CrossGroup,
            knockout_format: KnockoutFormat::SingleLeg,
            third_place_playoff: false,
            seeding: SeedingPolicy::Shuffled,
            start_date: None,
            days_between_rounds: 7,
        }
    }
}

impl TournamentConfig {
    /// Round-robin league
    pub fn league(competition_id: impl Into<CompetitionId>, name: impl Into<String>) -> Self {
        Self {
            competition_id: competition_id.into(),
            name: name.into(),
            has_league_stage: true,
            ..Self::default()
        }
    }

    /// Knockout-only cup
    pub fn knockout(
        competition_id: impl Into<CompetitionId>,
        name: impl Into<String>,
        playoff_teams: usize,
    ) -> Self {
        Self {
            competition_id: competition_id.into(),
            name: name.into(),
            has_knockout_stage: true,
            playoff_teams,
            ..Self::default()
        }
    }

    /// Group stage followed by a knockout bracket
    pub fn group_and_knockout(
        competition_id: impl Into<CompetitionId>,
        name: impl Into<String>,
        number_of_groups: usize,
        teams_advancing_per_group: usize,
    ) -> Self {
        Self {
            competition_id: competition_id.into(),
            name: name.into(),
            has_group_stage: true,
            has_knockout_stage: true,
            number_of_groups,
            teams_advancing_per_group,
            ..Self::default()
        }
    }

    /// Play league and group stages home and away
    pub fn with_two_legs(mut self) -> Self {
        self.is_two_legged = true;
        self
    }

    /// Date rounds from `start_date`
    pub fn with_start_date(mut self, start_date: NaiveDate, days_between_rounds: u32) -> Self {
        self.start_date = Some(start_date);
        self.days_between_rounds = days_between_rounds;
        self
    }

    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> ScheduleResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> ScheduleResult<()> {
        if !self.has_league_stage && !self.has_group_stage && !self.has_knockout_stage {
            return Err(ScheduleError::NoCompetitionStageEnabled);
        }

        if self.has_league_stage && self.has_group_stage {
            return Err(invalid(
                "has_group_stage",
                "A competition has either a league stage or a group stage, not both",
            ));
        }

        if self.competition_id.trim().is_empty() {
            return Err(invalid("competition_id", "Must not be empty"));
        }

        if self.has_group_stage
            && self.group_assignment_mode == GroupAssignmentMode::Auto
            && self.number_of_groups == 0
        {
            return Err(invalid("number_of_groups", "Must be at least 1"));
        }

        if self.has_group_stage && self.has_knockout_stage && self.teams_advancing_per_group == 0 {
            return Err(invalid("teams_advancing_per_group", "Must be at least 1"));
        }

        if self.has_knockout_stage && !self.has_group_stage && self.playoff_teams < 2 {
            return Err(invalid("playoff_teams", "Must be at least 2"));
        }

        if self.days_between_rounds == 0 {
            return Err(invalid("days_between_rounds", "Must be at least 1"));
        }

        Ok(())
    }

    /// Calendar for the first stage, if a start date is set
    pub fn calendar(&self) -> Option<RoundCalendar> {
        self.start_date
            .map(|start| RoundCalendar::new(start, self.days_between_rounds))
    }
}

fn invalid(field: &str, reason: &str) -> ScheduleError {
    ScheduleError::InvalidConfiguration {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
