//! Team and fixture data models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::knockout::KnockoutStage;

/// Team identifier (owned by the roster service)
pub type TeamId = String;

/// Competition identifier
pub type CompetitionId = String;

/// Group label such as `"A"`
pub type GroupLabel = String;

/// A team as supplied by the roster collaborator
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Team {
    /// Team ID
    pub id: TeamId,
    /// Display name
    pub name: String,
    /// Group label for manual group assignment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<GroupLabel>,
}

impl Team {
    /// Create a team without a group label
    pub fn new(id: impl Into<TeamId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            group: None,
        }
    }

    /// Attach a group label
    pub fn with_group(mut self, group: impl Into<GroupLabel>) -> Self {
        self.group = Some(group.into());
        self
    }
}

/// Reference to a team stored on a fixture
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TeamRef {
    pub id: TeamId,
    pub name: String,
}

impl From<&Team> for TeamRef {
    fn from(team: &Team) -> Self {
        Self {
            id: team.id.clone(),
            name: team.name.clone(),
        }
    }
}

/// Leg tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Leg {
    First,
    Second,
    Knockout,
}

impl std::fmt::Display for Leg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Leg::First => write!(f, "first"),
            Leg::Second => write!(f, "second"),
            Leg::Knockout => write!(f, "knockout"),
        }
    }
}

/// Fixture lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixtureStatus {
    /// Both teams known, not yet played
    Scheduled,
    InProgress,
    /// Result recorded
    Completed,
    Postponed,
    Cancelled,
    /// Waiting for a feeding round to resolve its teams
    Pending,
}

/// Result of a completed fixture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOutcome {
    HomeWin,
    AwayWin,
    Draw,
}

impl MatchOutcome {
    /// Derive the outcome from a final score
    pub fn from_score(home_score: u32, away_score: u32) -> Self {
        match home_score.cmp(&away_score) {
            std::cmp::Ordering::Greater => MatchOutcome::HomeWin,
            std::cmp::Ordering::Less => MatchOutcome::AwayWin,
            std::cmp::Ordering::Equal => MatchOutcome::Draw,
        }
    }
}

/// A single scheduled meeting between two teams
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    /// Deterministic fixture ID
    pub id: String,
    /// Competition ID
    pub competition_id: CompetitionId,
    /// Round number (1-indexed, contiguous per leg/stage)
    pub round_number: u32,
    /// Match number within round + competition + group (1-indexed)
    pub match_number: u32,
    pub home: TeamRef,
    pub away: TeamRef,
    pub leg: Leg,
    /// Group label for group-stage fixtures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<GroupLabel>,
    /// Knockout stage for bracket fixtures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knockout_stage: Option<KnockoutStage>,
    /// Leg within a two-legged knockout tie (1 or 2)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tie_leg: Option<u8>,
    pub status: FixtureStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<NaiveDate>,
    #[serde(default)]
    pub home_score: Option<u32>,
    #[serde(default)]
    pub away_score: Option<u32>,
    #[serde(default)]
    pub outcome: Option<MatchOutcome>,
}

impl Fixture {
    /// Create a scheduled league or group fixture
    pub fn new(
        competition_id: &str,
        group: Option<&str>,
        leg: Leg,
        round_number: u32,
        match_number: u32,
        home: TeamRef,
        away: TeamRef,
    ) -> Self {
        Self {
            id: Self::compose_id(competition_id, group, leg, round_number, match_number),
            competition_id: competition_id.to_string(),
            round_number,
            match_number,
            home,
            away,
            leg,
            group: group.map(str::to_string),
            knockout_stage: None,
            tie_leg: None,
            status: FixtureStatus::Scheduled,
            scheduled_date: None,
            home_score: None,
            away_score: None,
            outcome: None,
        }
    }

    /// Build the deterministic fixture ID
    ///
    /// Format: `{competition}[_g{group}]_leg{1|2}_r{round}_m{match}`, knockout
    /// fixtures use `{competition}_ko_r{round}_m{match}`.
    pub fn compose_id(
        competition_id: &str,
        group: Option<&str>,
        leg: Leg,
        round_number: u32,
        match_number: u32,
    ) -> String {
        let group_part = group.map(|g| format!("_g{g}")).unwrap_or_default();
        let leg_part = match leg {
            Leg::First => "leg1",
            Leg::Second => "leg2",
            Leg::Knockout => "ko",
        };
        format!("{competition_id}{group_part}_{leg_part}_r{round_number}_m{match_number}")
    }

    /// Record a final score and mark the fixture completed
    pub fn record_result(&mut self, home_score: u32, away_score: u32) {
        self.home_score = Some(home_score);
        self.away_score = Some(away_score);
        self.outcome = Some(MatchOutcome::from_score(home_score, away_score));
        self.status = FixtureStatus::Completed;
    }

    /// Completed with a recorded score
    pub fn is_completed(&self) -> bool {
        self.status == FixtureStatus::Completed
            && self.home_score.is_some()
            && self.away_score.is_some()
    }

    /// Whether the given team plays in this fixture
    pub fn involves(&self, team_id: &str) -> bool {
        self.home.id == team_id || self.away.id == team_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_fixture() -> Fixture {
        Fixture::new(
            "s16",
            None,
            Leg::First,
            3,
            2,
            TeamRef::from(&Team::new("t1", "Rovers")),
            TeamRef::from(&Team::new("t2", "United")),
        )
    }

    #[test]
    fn test_compose_id_league() {
        assert_eq!(
            Fixture::compose_id("s16", None, Leg::First, 3, 2),
            "s16_leg1_r3_m2"
        );
        assert_eq!(
            Fixture::compose_id("s16", None, Leg::Second, 10, 1),
            "s16_leg2_r10_m1"
        );
    }

    #[test]
    fn test_compose_id_group_and_knockout() {
        assert_eq!(
            Fixture::compose_id("cup", Some("B"), Leg::First, 1, 1),
            "cup_gB_leg1_r1_m1"
        );
        assert_eq!(
            Fixture::compose_id("cup", None, Leg::Knockout, 2, 4),
            "cup_ko_r2_m4"
        );
    }

    #[test]
    fn test_new_fixture_is_scheduled() {
        let fixture = sample_fixture();
        assert_eq!(fixture.status, FixtureStatus::Scheduled);
        assert!(!fixture.is_completed());
        assert!(fixture.involves("t1"));
        assert!(fixture.involves("t2"));
        assert!(!fixture.involves("t3"));
    }

    #[test]
    fn test_record_result() {
        let mut fixture = sample_fixture();
        fixture.record_result(2, 2);
        assert!(fixture.is_completed());
        assert_eq!(fixture.outcome, Some(MatchOutcome::Draw));

        fixture.record_result(0, 1);
        assert_eq!(fixture.outcome, Some(MatchOutcome::AwayWin));
    }

    #[test]
    fn test_outcome_from_score() {
        assert_eq!(MatchOutcome::from_score(3, 1), MatchOutcome::HomeWin);
        assert_eq!(MatchOutcome::from_score(1, 3), MatchOutcome::AwayWin);
        assert_eq!(MatchOutcome::from_score(0, 0), MatchOutcome::Draw);
    }

    #[test]
    fn test_team_deserializes_without_group() {
        let team: Team = serde_json::from_str(r#"{"id":"t9","name":"City"}"#).unwrap();
        assert_eq!(team.group, None);

        let grouped: Team =
            serde_json::from_str(r#"{"id":"t9","name":"City","group":"C"}"#).unwrap();
        assert_eq!(grouped.group.as_deref(), Some("C"));
    }
}
