//! Subcommand implementations.
//!
//! Every command reads JSON files, runs the engine once and writes a single
//! JSON document; nothing is written when the engine rejects the input.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Error, anyhow};
use league_fixtures::{
    Bracket, BracketProgressor, Fixture, KnockoutStage, ScheduleError, StandingRow,
    StandingsCalculator, Team, TournamentConfig, TournamentPlan, TournamentPlanner,
    fixture::{GroupLabel, TeamId},
};
use log::info;
use serde::{Deserialize, Serialize};

use crate::config::CliConfig;

/// Fixture input: a bare list or a previously written plan
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FixtureInput {
    Fixtures(Vec<Fixture>),
    Plan(TournamentPlan),
}

impl FixtureInput {
    fn into_fixtures(self) -> Vec<Fixture> {
        match self {
            FixtureInput::Fixtures(fixtures) => fixtures,
            FixtureInput::Plan(plan) => plan.fixtures,
        }
    }
}

/// Bracket input: a bare bracket, a progression result or a plan holding one
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BracketInput {
    Bracket(Bracket),
    Progress(ProgressReport),
    Plan(TournamentPlan),
}

impl BracketInput {
    fn into_bracket(self) -> Option<Bracket> {
        match self {
            BracketInput::Bracket(bracket) => Some(bracket),
            BracketInput::Progress(report) => Some(report.bracket),
            BracketInput::Plan(plan) => plan.bracket,
        }
    }
}

#[derive(Debug, Serialize)]
struct StandingsReport {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    league: Vec<StandingRow>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    groups: BTreeMap<GroupLabel, Vec<StandingRow>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ProgressReport {
    bracket: Bracket,
    /// Fixtures of the newly filled stage
    fixtures: Vec<Fixture>,
}

/// Shoot-out winner of a level tie, written `ROUND:MATCH=TEAM_ID`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shootout {
    pub round: u32,
    pub match_number: u32,
    pub winner: TeamId,
}

impl FromStr for Shootout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || format!("Expected ROUND:MATCH=TEAM_ID, got '{s}'");
        let (tie, winner) = s.split_once('=').ok_or_else(malformed)?;
        let (round, match_number) = tie.split_once(':').ok_or_else(malformed)?;
        let winner = winner.trim();
        if winner.is_empty() {
            return Err(malformed());
        }
        Ok(Shootout {
            round: round.trim().parse().map_err(|_| malformed())?,
            match_number: match_number.trim().parse().map_err(|_| malformed())?,
            winner: winner.to_string(),
        })
    }
}

/// `generate`: schedule the opening stage of a competition
pub fn generate(cli: &CliConfig, config_path: &Path, roster_path: &Path) -> Result<(), Error> {
    let config = TournamentConfig::from_json(&read(config_path)?).map_err(engine_error)?;
    let teams: Vec<Team> = serde_json::from_str(&read(roster_path)?)
        .with_context(|| format!("Invalid roster in {}", roster_path.display()))?;

    let mut rng = cli.rng();
    let plan = TournamentPlanner::generate(&config, &teams, &mut rng).map_err(engine_error)?;
    info!(
        "Generated {} fixture(s) for {}",
        plan.fixtures.len(),
        plan.competition_id
    );
    write(cli, &plan)
}

/// `standings`: league or group tables from recorded results
pub fn standings(cli: &CliConfig, fixtures_path: &Path) -> Result<(), Error> {
    let fixtures = read_fixtures(fixtures_path)?;
    let grouped = fixtures.iter().any(|f| f.group.is_some());

    let report = if grouped {
        StandingsReport {
            league: Vec::new(),
            groups: StandingsCalculator::by_group(&fixtures),
        }
    } else {
        StandingsReport {
            league: StandingsCalculator::league(&fixtures),
            groups: BTreeMap::new(),
        }
    };
    write(cli, &report)
}

/// `advance`: build the knockout bracket after a league or group stage
pub fn advance(cli: &CliConfig, config_path: &Path, fixtures_path: &Path) -> Result<(), Error> {
    let config = TournamentConfig::from_json(&read(config_path)?).map_err(engine_error)?;
    let fixtures = read_fixtures(fixtures_path)?;

    let plan = TournamentPlanner::knockout_stage(&config, &fixtures).map_err(engine_error)?;
    write(cli, &plan)
}

/// `progress`: fill the stage after `stage` from its winners.
///
/// Results are applied first, then shoot-outs settle any level ties.
pub fn progress(
    cli: &CliConfig,
    bracket_path: &Path,
    stage: &str,
    results_path: Option<&Path>,
    shootouts: &[Shootout],
) -> Result<(), Error> {
    let stage: KnockoutStage = stage.parse().map_err(engine_error)?;
    let input: BracketInput = serde_json::from_str(&read(bracket_path)?)
        .with_context(|| format!("Invalid bracket in {}", bracket_path.display()))?;
    let mut bracket = input
        .into_bracket()
        .ok_or_else(|| anyhow!("{} holds no bracket", bracket_path.display()))?;

    if let Some(path) = results_path {
        let results = read_fixtures(path)?;
        let applied = bracket.apply_results(&results).map_err(engine_error)?;
        info!("Applied {} result(s) from {}", applied, path.display());
    }

    for shootout in shootouts {
        bracket
            .find_mut(shootout.round, shootout.match_number)
            .ok_or_else(|| {
                anyhow!(
                    "No match {}:{} in the bracket",
                    shootout.round,
                    shootout.match_number
                )
            })?
            .decide_by_shootout(&shootout.winner)
            .map_err(engine_error)?;
    }

    let created = BracketProgressor::progress(&mut bracket, stage).map_err(engine_error)?;
    let fixtures = bracket
        .to_fixtures()
        .into_iter()
        .filter(|f| {
            created.iter().any(|m| {
                Some(m.stage) == f.knockout_stage
                    && m.round == f.round_number
                    && m.match_number == f.match_number
            })
        })
        .collect();

    write(cli, &ProgressReport { bracket, fixtures })
}

fn engine_error(err: ScheduleError) -> Error {
    anyhow!(err.client_message())
}

fn read(path: &Path) -> Result<String, Error> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn read_fixtures(path: &Path) -> Result<Vec<Fixture>, Error> {
    let input: FixtureInput = serde_json::from_str(&read(path)?)
        .with_context(|| format!("Invalid fixtures in {}", path.display()))?;
    Ok(input.into_fixtures())
}

fn write<T: Serialize>(cli: &CliConfig, value: &T) -> Result<(), Error> {
    let json = if cli.pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };

    match &cli.output {
        Some(path) => {
            fs::write(path, json + "\n")
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
