//! Whole-competition generation.

use log::{info, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::config::TournamentConfig;
use crate::errors::{ScheduleError, ScheduleResult};
use crate::fixture::{CompetitionId, Fixture, RoundCalendar, Team};
use crate::knockout::{Bracket, BracketBuilder, KnockoutFormat};
use crate::schedule::{Group, GroupPartitioner, RoundRobinScheduler};
use crate::standings::StandingsCalculator;

/// Output of one generation run, ready to be persisted as a unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentPlan {
    pub competition_id: CompetitionId,
    /// Groups of a group stage (empty otherwise)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<Group>,
    /// Fixtures created by this run
    pub fixtures: Vec<Fixture>,
    /// Rounds in the league or group stage (0 for a knockout-only plan)
    pub rounds: u32,
    /// Bracket, for knockout-only competitions or once a stage has been turned into one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bracket: Option<Bracket>,
}

/// Dispatches a configuration onto the schedulers and bracket builder
#[derive(Debug, Clone, Copy, Default)]
pub struct TournamentPlanner;

impl TournamentPlanner {
    /// Generate the opening stage of a competition.
    ///
    /// A league or group stage is scheduled in full; its knockout bracket is
    /// built later with [`TournamentPlanner::knockout_stage`] once results
    /// exist. A knockout-only competition gets its bracket straight away.
    pub fn generate<R: Rng + ?Sized>(
        config: &TournamentConfig,
        teams: &[Team],
        rng: &mut R,
    ) -> ScheduleResult<TournamentPlan> {
        config.validate()?;
        let competition_id = config.competition_id.as_str();

        let mut plan = if config.has_league_stage {
            let leg = RoundRobinScheduler::new(competition_id).schedule_legs(
                teams,
                config.is_two_legged,
                rng,
            )?;
            TournamentPlan {
                competition_id: config.competition_id.clone(),
                groups: Vec::new(),
                fixtures: leg.fixtures,
                rounds: leg.rounds,
                bracket: None,
            }
        } else if config.has_group_stage {
            let stage = GroupPartitioner::new(config.group_assignment_mode, config.number_of_groups)
                .schedule(teams, competition_id, config.is_two_legged, rng)?;
            TournamentPlan {
                competition_id: config.competition_id.clone(),
                groups: stage.groups,
                fixtures: stage.fixtures,
                rounds: stage.rounds,
                bracket: None,
            }
        } else {
            let bracket = bracket_builder(config).direct_entry(
                teams,
                config.playoff_teams,
                config.seeding,
                rng,
            )?;
            let mut fixtures = bracket.to_fixtures();
            if let Some(calendar) = config.calendar() {
                calendar.assign_knockout(&mut fixtures, is_two_legged_knockout(config));
            }
            TournamentPlan {
                competition_id: config.competition_id.clone(),
                groups: Vec::new(),
                fixtures,
                rounds: 0,
                bracket: Some(bracket),
            }
        };

        if plan.bracket.is_none() {
            if let Some(calendar) = config.calendar() {
                calendar.assign(&mut plan.fixtures);
            }
        }

        info!(
            "Generated {} ({}): {} fixtures, {} rounds",
            config.name,
            config.competition_id,
            plan.fixtures.len(),
            plan.rounds
        );
        Ok(plan)
    }

    /// Build the knockout bracket that follows a league or group stage.
    ///
    /// Standings are recomputed from `stage_fixtures`; the returned plan holds
    /// the bracket and the fixtures of its playable first-round matches, dated
    /// after the last stage round.
    ///
    /// # Errors
    ///
    /// * `InvalidConfiguration` - no knockout stage follows a league or group stage
    pub fn knockout_stage(
        config: &TournamentConfig,
        stage_fixtures: &[Fixture],
    ) -> ScheduleResult<TournamentPlan> {
        config.validate()?;
        if !config.has_knockout_stage || !(config.has_group_stage || config.has_league_stage) {
            return Err(ScheduleError::InvalidConfiguration {
                field: "has_knockout_stage".to_string(),
                reason: "No knockout stage follows a league or group stage".to_string(),
            });
        }

        let stage_fixtures: Vec<Fixture> = stage_fixtures
            .iter()
            .filter(|f| f.knockout_stage.is_none())
            .cloned()
            .collect();
        let pending = stage_fixtures.iter().filter(|f| !f.is_completed()).count();
        if pending > 0 {
            warn!(
                "Building knockout for {} with {} stage fixture(s) still unplayed",
                config.competition_id, pending
            );
        }

        let bracket = if config.has_group_stage {
            Self::knockout_from_groups(config, &stage_fixtures)?
        } else {
            Self::knockout_from_league(config, &stage_fixtures)?
        };

        let stage_rounds = stage_fixtures
            .iter()
            .map(|f| f.round_number)
            .max()
            .unwrap_or(0);
        let mut fixtures = bracket.to_fixtures();
        if let Some(calendar) = knockout_calendar(config, stage_rounds) {
            calendar.assign_knockout(&mut fixtures, is_two_legged_knockout(config));
        }

        Ok(TournamentPlan {
            competition_id: config.competition_id.clone(),
            groups: Vec::new(),
            fixtures,
            rounds: 0,
            bracket: Some(bracket),
        })
    }

    /// Bracket from group tables
    pub fn knockout_from_groups(
        config: &TournamentConfig,
        group_fixtures: &[Fixture],
    ) -> ScheduleResult<Bracket> {
        let standings = StandingsCalculator::by_group(group_fixtures);
        bracket_builder(config).from_groups(
            &standings,
            config.teams_advancing_per_group,
            config.pairing_method,
        )
    }

    /// Playoff bracket from the league table
    pub fn knockout_from_league(
        config: &TournamentConfig,
        league_fixtures: &[Fixture],
    ) -> ScheduleResult<Bracket> {
        let table = StandingsCalculator::league(league_fixtures);
        bracket_builder(config).from_table(&table, config.playoff_teams)
    }
}

fn bracket_builder(config: &TournamentConfig) -> BracketBuilder<'_> {
    BracketBuilder::new(&config.competition_id)
        .with_format(config.knockout_format)
        .with_third_place_playoff(config.third_place_playoff)
}

fn is_two_legged_knockout(config: &TournamentConfig) -> bool {
    config.knockout_format == KnockoutFormat::TwoLeg
}

/// Calendar for knockout rounds, starting one interval after round `stage_rounds`
fn knockout_calendar(config: &TournamentConfig, stage_rounds: u32) -> Option<RoundCalendar> {
    let calendar = config.calendar()?;
    let start = calendar.date_for_round(stage_rounds + 1)?;
    Some(RoundCalendar::new(start, config.days_between_rounds))
}
