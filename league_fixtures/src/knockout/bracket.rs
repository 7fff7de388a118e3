//! Bracket container, slot resolution and fixture expansion.

use log::debug;
use serde::{Deserialize, Serialize};

use super::models::{BracketMatch, KnockoutFormat, KnockoutStage, Slot};
use crate::errors::ScheduleResult;
use crate::fixture::{CompetitionId, Fixture, FixtureStatus, Leg, TeamRef};

/// A single-elimination bracket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bracket {
    pub competition_id: CompetitionId,
    /// Number of first-round slots (power of two)
    pub size: usize,
    #[serde(default)]
    pub format: KnockoutFormat,
    /// Create a third-place match when the semi-finals complete
    #[serde(default)]
    pub third_place_playoff: bool,
    /// Every match of every round, ordered by round then match number
    pub matches: Vec<BracketMatch>,
}

impl Bracket {
    /// Stages present in the bracket, first stage first
    pub fn stages(&self) -> Vec<KnockoutStage> {
        let mut stages: Vec<KnockoutStage> = self.matches.iter().map(|m| m.stage).collect();
        stages.sort();
        stages.dedup();
        stages
    }

    pub fn contains_stage(&self, stage: KnockoutStage) -> bool {
        self.matches.iter().any(|m| m.stage == stage)
    }

    /// Matches of one stage in match-number order
    pub fn stage_matches(&self, stage: KnockoutStage) -> Vec<&BracketMatch> {
        let mut matches: Vec<&BracketMatch> =
            self.matches.iter().filter(|m| m.stage == stage).collect();
        matches.sort_by_key(|m| m.match_number);
        matches
    }

    /// Main-bracket match by round and match number
    pub fn find(&self, round: u32, match_number: u32) -> Option<&BracketMatch> {
        self.matches
            .iter()
            .find(|m| is_main_match(m, round, match_number))
    }

    pub fn find_mut(&mut self, round: u32, match_number: u32) -> Option<&mut BracketMatch> {
        self.matches
            .iter_mut()
            .find(|m| is_main_match(m, round, match_number))
    }

    /// Winner of the final, once decided
    pub fn champion(&self) -> Option<&TeamRef> {
        self.matches
            .iter()
            .find(|m| m.stage == KnockoutStage::Final)
            .and_then(|m| m.winner.as_ref())
    }

    /// Put `winner` into every slot waiting on match `round`/`match_number`.
    ///
    /// Matches whose two sides are now known move from pending to scheduled.
    /// Returns the number of slots filled.
    pub fn advance(&mut self, round: u32, match_number: u32, winner: &TeamRef) -> usize {
        let mut filled = 0;
        for m in self.matches.iter_mut() {
            for slot in [&mut m.home, &mut m.away] {
                let waiting = matches!(
                    *slot,
                    Slot::Winner { round: r, match_number: n } if r == round && n == match_number
                );
                if waiting {
                    *slot = Slot::Team(winner.clone());
                    filled += 1;
                }
            }
            if m.status == FixtureStatus::Pending && m.is_resolved() {
                m.status = FixtureStatus::Scheduled;
                debug!(
                    "{} match {} resolved: {} vs {}",
                    m.stage, m.match_number, m.home, m.away
                );
            }
        }
        filled
    }

    /// Fixtures for every playable match.
    ///
    /// Byes and unresolved matches produce nothing. Two-legged ties become
    /// two fixtures with venues swapped in the second; the final is always a
    /// single match.
    pub fn to_fixtures(&self) -> Vec<Fixture> {
        let mut fixtures = Vec::new();
        for m in &self.matches {
            let (Some(home), Some(away)) = (m.home.team(), m.away.team()) else {
                continue;
            };
            if self.is_two_legged(m.stage) {
                fixtures.push(knockout_fixture(&self.competition_id, m, Some(1), home, away));
                fixtures.push(knockout_fixture(&self.competition_id, m, Some(2), away, home));
            } else {
                fixtures.push(knockout_fixture(&self.competition_id, m, None, home, away));
            }
        }
        fixtures
    }

    /// Copy results of completed knockout fixtures onto their matches.
    ///
    /// A single-leg match takes its fixture's score. A two-legged tie is
    /// settled once both legs are completed, on aggregate from the first-leg
    /// home side's view. Matches that already hold a result are left alone.
    /// Returns the number of matches updated.
    pub fn apply_results(&mut self, fixtures: &[Fixture]) -> ScheduleResult<usize> {
        let two_legged: Vec<bool> = self
            .matches
            .iter()
            .map(|m| self.is_two_legged(m.stage))
            .collect();

        let mut updated = 0;
        for (m, two_legged) in self.matches.iter_mut().zip(two_legged) {
            if m.status == FixtureStatus::Completed || !m.is_resolved() {
                continue;
            }
            let legs: Vec<&Fixture> = fixtures
                .iter()
                .filter(|f| {
                    f.knockout_stage == Some(m.stage)
                        && f.round_number == m.round
                        && f.match_number == m.match_number
                        && f.is_completed()
                })
                .collect();

            let expected = if two_legged { 2 } else { 1 };
            if legs.len() < expected {
                continue;
            }
            let Some((home_total, away_total)) = aggregate(m, &legs) else {
                continue;
            };
            m.record_result(home_total, away_total)?;
            updated += 1;
        }
        Ok(updated)
    }

    fn is_two_legged(&self, stage: KnockoutStage) -> bool {
        self.format == KnockoutFormat::TwoLeg
            && stage != KnockoutStage::Final
            && stage != KnockoutStage::ThirdPlace
    }
}

fn is_main_match(m: &BracketMatch, round: u32, match_number: u32) -> bool {
    m.round == round && m.match_number == match_number && m.stage != KnockoutStage::ThirdPlace
}

/// Goals per side of `m` summed over the given legs
fn aggregate(m: &BracketMatch, legs: &[&Fixture]) -> Option<(u32, u32)> {
    let home_id = &m.home.team()?.id;
    let mut totals = (0, 0);
    for leg in legs {
        let (Some(h), Some(a)) = (leg.home_score, leg.away_score) else {
            return None;
        };
        if &leg.home.id == home_id {
            totals.0 += h;
            totals.1 += a;
        } else {
            totals.0 += a;
            totals.1 += h;
        }
    }
    Some(totals)
}

fn knockout_fixture(
    competition_id: &str,
    m: &BracketMatch,
    tie_leg: Option<u8>,
    home: &TeamRef,
    away: &TeamRef,
) -> Fixture {
    let mut fixture = Fixture::new(
        competition_id,
        None,
        Leg::Knockout,
        m.round,
        m.match_number,
        home.clone(),
        away.clone(),
    );
    if let Some(n) = tie_leg {
        fixture.id = format!("{}_leg{n}", fixture.id);
    }
    fixture.knockout_stage = Some(m.stage);
    fixture.tie_leg = tie_leg;
    fixture.status = FixtureStatus::Scheduled;
    fixture
}
