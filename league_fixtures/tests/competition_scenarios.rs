//! End-to-end competition scenarios.
//!
//! These drive the public API the way a host application does: generate a
//! stage, record results, rebuild tables and move through the bracket.

use std::collections::{BTreeMap, HashMap, HashSet};

use league_fixtures::{
    BracketProgressor, FixtureStatus, KnockoutFormat, KnockoutStage, ScheduleError,
    StandingsCalculator, Team, TournamentConfig, TournamentPlanner,
    fixture::{rounds, team_fixtures},
    schedule::GroupAssignmentMode,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn roster(names: &[&str]) -> Vec<Team> {
    names
        .iter()
        .map(|name| Team::new(name.to_lowercase(), *name))
        .collect()
}

#[test]
fn test_four_team_single_leg_league() {
    let teams = roster(&["A", "B", "C", "D"]);
    let config = TournamentConfig::league("s1", "Four");

    for seed in 0..16 {
        let mut rng = StdRng::seed_from_u64(seed);
        let plan = TournamentPlanner::generate(&config, &teams, &mut rng).unwrap();

        assert_eq!(plan.rounds, 3);
        assert_eq!(plan.fixtures.len(), 6);

        let summaries = rounds(&plan.fixtures);
        assert_eq!(summaries.len(), 3);
        assert!(summaries.iter().all(|r| r.total_matches == 2));

        for team in &teams {
            let own = team_fixtures(&plan.fixtures, &team.id);
            assert_eq!(own.len(), 3, "{} plays every other team once", team.name);
            let home = own.iter().filter(|f| f.home.id == team.id).count() as i32;
            let away = own.len() as i32 - home;
            assert!((home - away).abs() <= 1);
        }
    }
}

#[test]
fn test_groups_to_champion() {
    let teams = roster(&["Ajax", "Benfica", "Celtic", "Dortmund", "Everton", "Fulham", "Genk", "Hajduk"]);
    let mut config = TournamentConfig::group_and_knockout("cup", "Cup", 2, 2);
    config.third_place_playoff = true;
    let mut rng = StdRng::seed_from_u64(21);

    let mut groups = TournamentPlanner::generate(&config, &teams, &mut rng).unwrap();
    assert_eq!(groups.groups.len(), 2);
    let team_group: HashMap<String, String> = groups
        .groups
        .iter()
        .flat_map(|g| g.teams.iter().map(|t| (t.id.clone(), g.label.clone())))
        .collect();

    // home side always wins 1-0
    for fixture in groups.fixtures.iter_mut() {
        fixture.record_result(1, 0);
    }
    let tables = StandingsCalculator::by_group(&groups.fixtures);
    assert_eq!(tables.len(), 2);
    assert!(tables.values().all(|t| t.len() == 4 && t[0].position == 1));

    let knockout = TournamentPlanner::knockout_stage(&config, &groups.fixtures).unwrap();
    let mut bracket = knockout.bracket.unwrap();
    let semis = bracket.stage_matches(KnockoutStage::SemiFinal);
    assert_eq!(semis.len(), 2);
    for semi in &semis {
        let home = semi.home.team().unwrap();
        let away = semi.away.team().unwrap();
        assert_ne!(team_group[&home.id], team_group[&away.id]);
    }

    let mut fixtures = bracket.to_fixtures();
    fixtures[0].record_result(2, 1);
    fixtures[1].record_result(0, 0);
    assert_eq!(bracket.apply_results(&fixtures).unwrap(), 2);

    // a level semi-final blocks progression until the shoot-out
    assert!(matches!(
        BracketProgressor::progress(&mut bracket, KnockoutStage::SemiFinal),
        Err(ScheduleError::IncompleteStageForProgression { unresolved: 1, .. })
    ));
    let away_id = fixtures[1].away.id.clone();
    bracket
        .find_mut(1, 2)
        .unwrap()
        .decide_by_shootout(&away_id)
        .unwrap();

    let next = BracketProgressor::progress(&mut bracket, KnockoutStage::SemiFinal).unwrap();
    let stages: Vec<KnockoutStage> = next.iter().map(|m| m.stage).collect();
    assert_eq!(stages, vec![KnockoutStage::Final, KnockoutStage::ThirdPlace]);
    assert_eq!(next[0].away.team().map(|t| t.id.clone()), Some(away_id));

    let final_fixtures: Vec<_> = bracket
        .to_fixtures()
        .into_iter()
        .filter(|f| f.knockout_stage == Some(KnockoutStage::Final))
        .collect();
    assert_eq!(final_fixtures.len(), 1);
    let mut played = final_fixtures;
    played[0].record_result(3, 0);
    bracket.apply_results(&played).unwrap();
    assert_eq!(
        bracket.champion().map(|t| t.id.clone()),
        Some(played[0].home.id.clone())
    );
    assert_eq!(
        BracketProgressor::progress(&mut bracket, KnockoutStage::Final),
        Err(ScheduleError::NoStageAfterFinal(KnockoutStage::Final))
    );
}

#[test]
fn test_manual_groups_two_legged() {
    let mut teams = roster(&["North", "South", "East", "West", "Central"]);
    for (team, label) in teams.iter_mut().zip(["X", "Y", "X", "Y", "X"]) {
        team.group = Some(label.to_string());
    }
    let mut config = TournamentConfig::group_and_knockout("reg", "Regional", 2, 1).with_two_legs();
    config.group_assignment_mode = GroupAssignmentMode::Manual;
    let mut rng = StdRng::seed_from_u64(4);

    let plan = TournamentPlanner::generate(&config, &teams, &mut rng).unwrap();
    let labels: Vec<&str> = plan.groups.iter().map(|g| g.label.as_str()).collect();
    assert_eq!(labels, vec!["X", "Y"]);

    // group X: 3 teams, 3 rounds per leg; group Y: 2 teams, 1 round per leg
    let x: Vec<_> = plan.fixtures.iter().filter(|f| f.group.as_deref() == Some("X")).collect();
    let y: Vec<_> = plan.fixtures.iter().filter(|f| f.group.as_deref() == Some("Y")).collect();
    assert_eq!(x.len(), 6);
    assert_eq!(y.len(), 2);
    assert_eq!(y.iter().map(|f| f.round_number).collect::<Vec<_>>(), vec![1, 2]);

    let mut pairs: BTreeMap<(String, String), usize> = BTreeMap::new();
    for f in &x {
        *pairs.entry((f.home.id.clone(), f.away.id.clone())).or_default() += 1;
    }
    assert_eq!(pairs.len(), 6, "each ordered pair hosts exactly once");
}

#[test]
fn test_manual_groups_missing_label() {
    let mut teams = roster(&["North", "South", "East"]);
    teams[0].group = Some("X".to_string());
    let mut config = TournamentConfig::group_and_knockout("reg", "Regional", 2, 1);
    config.group_assignment_mode = GroupAssignmentMode::Manual;
    let mut rng = StdRng::seed_from_u64(4);

    let err = TournamentPlanner::generate(&config, &teams, &mut rng).unwrap_err();
    assert_eq!(
        err,
        ScheduleError::MissingGroupAssignment {
            teams: vec!["South".to_string(), "East".to_string()]
        }
    );
    assert!(err.client_message().contains("South, East"));
}

#[test]
fn test_two_legged_knockout_cup() {
    let teams = roster(&["A", "B", "C", "D"]);
    let mut config = TournamentConfig::knockout("ko", "Cup", 4);
    config.knockout_format = KnockoutFormat::TwoLeg;
    config.start_date = chrono::NaiveDate::from_ymd_opt(2025, 10, 1);
    let mut rng = StdRng::seed_from_u64(77);

    let plan = TournamentPlanner::generate(&config, &teams, &mut rng).unwrap();
    assert_eq!(plan.fixtures.len(), 4);
    assert!(plan.fixtures.iter().all(|f| f.tie_leg.is_some()));
    let dates: HashSet<_> = plan.fixtures.iter().map(|f| f.scheduled_date).collect();
    assert_eq!(dates.len(), 2);

    let mut bracket = plan.bracket.unwrap();
    let mut fixtures = plan.fixtures;
    for f in fixtures.iter_mut() {
        f.record_result(2, 1);
    }
    // every tie ends 3-3 on aggregate
    assert_eq!(bracket.apply_results(&fixtures).unwrap(), 2);
    assert!(bracket.matches.iter().filter(|m| m.round == 1).all(|m| m.winner.is_none()));
    assert!(
        bracket
            .matches
            .iter()
            .filter(|m| m.round == 1)
            .all(|m| m.status == FixtureStatus::Completed)
    );
}

#[test]
fn test_knockout_only_rejects_single_team() {
    let config = TournamentConfig::knockout("ko", "Cup", 4);
    let mut rng = StdRng::seed_from_u64(0);
    let err = TournamentPlanner::generate(&config, &roster(&["Solo"]), &mut rng).unwrap_err();
    assert_eq!(
        err,
        ScheduleError::InsufficientTeams {
            needed: 2,
            available: 1
        }
    );
}
