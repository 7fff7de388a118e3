//! Knockout bracket data models.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{ScheduleError, ScheduleResult};
use crate::fixture::{FixtureStatus, MatchOutcome, TeamRef};

/// Bracket stage, derived from the number of teams left in the bracket
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KnockoutStage {
    #[serde(rename = "round_of_32")]
    RoundOf32,
    #[serde(rename = "round_of_16")]
    RoundOf16,
    QuarterFinal,
    SemiFinal,
    Final,
    /// Playoff between the two losing semi-finalists
    ThirdPlace,
}

impl KnockoutStage {
    /// Stage played by `size` remaining teams (32, 16, 8, 4 or 2)
    pub fn from_bracket_size(size: usize) -> Option<Self> {
        match size {
            32 => Some(KnockoutStage::RoundOf32),
            16 => Some(KnockoutStage::RoundOf16),
            8 => Some(KnockoutStage::QuarterFinal),
            4 => Some(KnockoutStage::SemiFinal),
            2 => Some(KnockoutStage::Final),
            _ => None,
        }
    }

    /// Stage that the winners of this stage play in
    pub fn next(self) -> Option<Self> {
        match self {
            KnockoutStage::RoundOf32 => Some(KnockoutStage::RoundOf16),
            KnockoutStage::RoundOf16 => Some(KnockoutStage::QuarterFinal),
            KnockoutStage::QuarterFinal => Some(KnockoutStage::SemiFinal),
            KnockoutStage::SemiFinal => Some(KnockoutStage::Final),
            KnockoutStage::Final | KnockoutStage::ThirdPlace => None,
        }
    }

    /// Final and third-place playoff feed nothing
    pub fn is_terminal(self) -> bool {
        self.next().is_none()
    }

    /// Human-readable name
    pub fn display_name(self) -> &'static str {
        match self {
            KnockoutStage::RoundOf32 => "Round of 32",
            KnockoutStage::RoundOf16 => "Round of 16",
            KnockoutStage::QuarterFinal => "Quarter Finals",
            KnockoutStage::SemiFinal => "Semi Finals",
            KnockoutStage::Final => "Final",
            KnockoutStage::ThirdPlace => "Third Place Playoff",
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            KnockoutStage::RoundOf32 => "round_of_32",
            KnockoutStage::RoundOf16 => "round_of_16",
            KnockoutStage::QuarterFinal => "quarter_final",
            KnockoutStage::SemiFinal => "semi_final",
            KnockoutStage::Final => "final",
            KnockoutStage::ThirdPlace => "third_place",
        }
    }
}

impl fmt::Display for KnockoutStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for KnockoutStage {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            KnockoutStage::RoundOf32,
            KnockoutStage::RoundOf16,
            KnockoutStage::QuarterFinal,
            KnockoutStage::SemiFinal,
            KnockoutStage::Final,
            KnockoutStage::ThirdPlace,
        ]
        .into_iter()
        .find(|stage| stage.as_str() == s)
        .ok_or_else(|| ScheduleError::InvalidConfiguration {
            field: "stage".to_string(),
            reason: format!("unknown knockout stage '{s}'"),
        })
    }
}

/// How group qualifiers are paired in the first knockout round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairingMethod {
    /// Each group winner meets a runner-up from another group
    #[default]
    CrossGroup,
    /// Four groups: A1-B2, C1-D2, B1-A2, D1-C2
    Uefa,
    /// Winners in group order against runners-up in reverse group order
    Mirrored,
    /// Ordered by rank then group label, paired in order
    Sequential,
}

/// Number of matches per knockout tie
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KnockoutFormat {
    #[default]
    SingleLeg,
    /// Home and away ties decided on aggregate; the final stays single-leg
    TwoLeg,
}

/// Order of direct-entry teams before they are paired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedingPolicy {
    /// Keep the caller's order
    AsGiven,
    /// Shuffle with the injected random source
    #[default]
    Shuffled,
}

/// One side of a bracket match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Slot {
    /// Resolved team
    Team(TeamRef),
    /// Filled by the winner of an earlier match
    Winner { round: u32, match_number: u32 },
    /// No opponent; the other side goes through
    Bye,
}

impl Slot {
    pub fn team(&self) -> Option<&TeamRef> {
        match self {
            Slot::Team(team) => Some(team),
            _ => None,
        }
    }

    pub fn is_bye(&self) -> bool {
        matches!(self, Slot::Bye)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Team(team) => write!(f, "{}", team.name),
            Slot::Winner {
                round,
                match_number,
            } => write!(f, "Winner R{round}M{match_number}"),
            Slot::Bye => write!(f, "BYE"),
        }
    }
}

/// A single knockout tie
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketMatch {
    pub stage: KnockoutStage,
    /// Bracket round (1 = first stage)
    pub round: u32,
    /// Match number within the stage (1-indexed)
    pub match_number: u32,
    pub home: Slot,
    pub away: Slot,
    pub status: FixtureStatus,
    /// Score, or aggregate score of a two-legged tie, from the home side's view
    #[serde(default)]
    pub home_score: Option<u32>,
    #[serde(default)]
    pub away_score: Option<u32>,
    #[serde(default)]
    pub winner: Option<TeamRef>,
}

impl BracketMatch {
    /// Match between two known teams
    pub fn scheduled(
        stage: KnockoutStage,
        round: u32,
        match_number: u32,
        home: TeamRef,
        away: TeamRef,
    ) -> Self {
        Self {
            stage,
            round,
            match_number,
            home: Slot::Team(home),
            away: Slot::Team(away),
            status: FixtureStatus::Scheduled,
            home_score: None,
            away_score: None,
            winner: None,
        }
    }

    /// Lone team that goes through without playing
    pub fn bye(stage: KnockoutStage, round: u32, match_number: u32, team: TeamRef) -> Self {
        Self {
            stage,
            round,
            match_number,
            home: Slot::Team(team.clone()),
            away: Slot::Bye,
            status: FixtureStatus::Completed,
            home_score: None,
            away_score: None,
            winner: Some(team),
        }
    }

    /// Later-round match fed by matches `2m-1` and `2m` of the previous round
    pub fn placeholder(stage: KnockoutStage, round: u32, match_number: u32) -> Self {
        let feeder_round = round.saturating_sub(1);
        Self {
            stage,
            round,
            match_number,
            home: Slot::Winner {
                round: feeder_round,
                match_number: match_number * 2 - 1,
            },
            away: Slot::Winner {
                round: feeder_round,
                match_number: match_number * 2,
            },
            status: FixtureStatus::Pending,
            home_score: None,
            away_score: None,
            winner: None,
        }
    }

    /// Both sides hold real teams
    pub fn is_resolved(&self) -> bool {
        self.home.team().is_some() && self.away.team().is_some()
    }

    pub fn is_bye(&self) -> bool {
        self.home.is_bye() || self.away.is_bye()
    }

    /// The team that did not win, once a winner is known
    pub fn loser(&self) -> Option<&TeamRef> {
        let winner = self.winner.as_ref()?;
        [&self.home, &self.away]
            .into_iter()
            .filter_map(Slot::team)
            .find(|team| team.id != winner.id)
    }

    /// Record the final (or aggregate) score.
    ///
    /// A decisive score sets the winner; a level score completes the match
    /// and leaves the winner open for [`BracketMatch::decide_by_shootout`].
    pub fn record_result(&mut self, home_score: u32, away_score: u32) -> ScheduleResult<()> {
        let (Some(home), Some(away)) = (self.home.team(), self.away.team()) else {
            return Err(self.unresolved_error());
        };
        self.winner = match MatchOutcome::from_score(home_score, away_score) {
            MatchOutcome::HomeWin => Some(home.clone()),
            MatchOutcome::AwayWin => Some(away.clone()),
            MatchOutcome::Draw => None,
        };
        self.home_score = Some(home_score);
        self.away_score = Some(away_score);
        self.status = FixtureStatus::Completed;
        Ok(())
    }

    /// Settle a level match by penalty shoot-out
    pub fn decide_by_shootout(&mut self, winner_id: &str) -> ScheduleResult<()> {
        if self.status != FixtureStatus::Completed || self.home_score != self.away_score {
            return Err(ScheduleError::InvalidConfiguration {
                field: "shootout".to_string(),
                reason: format!(
                    "{} match {} is not a completed draw",
                    self.stage, self.match_number
                ),
            });
        }
        let winner = [&self.home, &self.away]
            .into_iter()
            .filter_map(Slot::team)
            .find(|team| team.id == winner_id)
            .cloned()
            .ok_or_else(|| ScheduleError::UnknownTeam(winner_id.to_string()))?;
        self.winner = Some(winner);
        Ok(())
    }

    fn unresolved_error(&self) -> ScheduleError {
        ScheduleError::InvalidConfiguration {
            field: "result".to_string(),
            reason: format!(
                "{} match {} has unresolved teams ({} vs {})",
                self.stage, self.match_number, self.home, self.away
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::Team;

    fn team(id: &str) -> TeamRef {
        TeamRef::from(&Team::new(id, id.to_uppercase()))
    }

    #[test]
    fn test_stage_from_bracket_size() {
        assert_eq!(
            KnockoutStage::from_bracket_size(32),
            Some(KnockoutStage::RoundOf32)
        );
        assert_eq!(
            KnockoutStage::from_bracket_size(16),
            Some(KnockoutStage::RoundOf16)
        );
        assert_eq!(
            KnockoutStage::from_bracket_size(8),
            Some(KnockoutStage::QuarterFinal)
        );
        assert_eq!(
            KnockoutStage::from_bracket_size(4),
            Some(KnockoutStage::SemiFinal)
        );
        assert_eq!(
            KnockoutStage::from_bracket_size(2),
            Some(KnockoutStage::Final)
        );
        assert_eq!(KnockoutStage::from_bracket_size(6), None);
    }

    #[test]
    fn test_stage_order_ends_at_final() {
        let mut stage = KnockoutStage::RoundOf32;
        let mut seen = vec![stage];
        while let Some(next) = stage.next() {
            seen.push(next);
            stage = next;
        }
        assert_eq!(seen.len(), 5);
        assert_eq!(stage, KnockoutStage::Final);
        assert!(KnockoutStage::ThirdPlace.is_terminal());
    }

    #[test]
    fn test_stage_names_round_trip() {
        let stage: KnockoutStage = "quarter_final".parse().unwrap();
        assert_eq!(stage, KnockoutStage::QuarterFinal);
        assert_eq!(stage.to_string(), "quarter_final");
        assert_eq!(stage.display_name(), "Quarter Finals");
        assert_eq!(
            serde_json::to_string(&KnockoutStage::RoundOf16).unwrap(),
            "\"round_of_16\""
        );
        assert!("group".parse::<KnockoutStage>().is_err());
    }

    #[test]
    fn test_placeholder_labels() {
        let m = BracketMatch::placeholder(KnockoutStage::SemiFinal, 2, 2);
        assert_eq!(m.home.to_string(), "Winner R1M3");
        assert_eq!(m.away.to_string(), "Winner R1M4");
        assert_eq!(m.status, FixtureStatus::Pending);
        assert!(!m.is_resolved());
    }

    #[test]
    fn test_record_result_sets_winner() {
        let mut m = BracketMatch::scheduled(KnockoutStage::Final, 1, 1, team("a"), team("b"));
        m.record_result(1, 2).unwrap();
        assert_eq!(m.winner.as_ref().map(|t| t.id.as_str()), Some("b"));
        assert_eq!(m.loser().map(|t| t.id.as_str()), Some("a"));
        assert_eq!(m.status, FixtureStatus::Completed);
    }

    #[test]
    fn test_draw_needs_shootout() {
        let mut m = BracketMatch::scheduled(KnockoutStage::Final, 1, 1, team("a"), team("b"));
        m.record_result(1, 1).unwrap();
        assert_eq!(m.winner, None);

        assert_eq!(
            m.decide_by_shootout("zzz"),
            Err(ScheduleError::UnknownTeam("zzz".to_string()))
        );
        m.decide_by_shootout("a").unwrap();
        assert_eq!(m.winner.as_ref().map(|t| t.id.as_str()), Some("a"));
    }

    #[test]
    fn test_shootout_rejected_for_decisive_match() {
        let mut m = BracketMatch::scheduled(KnockoutStage::Final, 1, 1, team("a"), team("b"));
        m.record_result(2, 0).unwrap();
        assert!(m.decide_by_shootout("b").is_err());
    }

    #[test]
    fn test_result_rejected_on_placeholder() {
        let mut m = BracketMatch::placeholder(KnockoutStage::Final, 2, 1);
        assert!(m.record_result(1, 0).is_err());
    }

    #[test]
    fn test_bye_is_completed() {
        let m = BracketMatch::bye(KnockoutStage::QuarterFinal, 1, 4, team("a"));
        assert!(m.is_bye());
        assert_eq!(m.status, FixtureStatus::Completed);
        assert_eq!(m.winner.as_ref().map(|t| t.id.as_str()), Some("a"));
        assert_eq!(m.loser(), None);
    }

    #[test]
    fn test_slot_serialization() {
        let json = serde_json::to_string(&Slot::Winner {
            round: 1,
            match_number: 2,
        })
        .unwrap();
        assert_eq!(json, r#"{"kind":"winner","round":1,"match_number":2}"#);
        let slot: Slot = serde_json::from_str(r#"{"kind":"team","id":"x","name":"X"}"#).unwrap();
        assert_eq!(slot.team().map(|t| t.id.as_str()), Some("x"));
    }
}
