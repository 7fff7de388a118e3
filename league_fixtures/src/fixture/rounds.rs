//! Round-level views over a fixture list.

use std::collections::BTreeMap;

use serde::Serialize;

use super::models::{Fixture, FixtureStatus, Leg};

/// All fixtures sharing one round number
#[derive(Debug, Clone, Serialize)]
pub struct RoundSummary {
    pub round_number: u32,
    /// Leg of the first fixture in the round
    pub leg: Leg,
    pub completed_matches: usize,
    pub total_matches: usize,
    pub fixtures: Vec<Fixture>,
}

impl RoundSummary {
    /// Every fixture in the round has been completed
    pub fn is_complete(&self) -> bool {
        self.completed_matches == self.total_matches
    }
}

/// Group fixtures by round number, ordered by round then group then match number
pub fn rounds(fixtures: &[Fixture]) -> Vec<RoundSummary> {
    let mut by_round: BTreeMap<u32, Vec<Fixture>> = BTreeMap::new();
    for fixture in fixtures {
        by_round
            .entry(fixture.round_number)
            .or_default()
            .push(fixture.clone());
    }

    by_round
        .into_iter()
        .filter_map(|(round_number, mut matches)| {
            matches.sort_by(|a, b| {
                a.group
                    .cmp(&b.group)
                    .then(a.match_number.cmp(&b.match_number))
            });
            let leg = matches.first()?.leg;
            let completed_matches = matches
                .iter()
                .filter(|m| m.status == FixtureStatus::Completed)
                .count();
            Some(RoundSummary {
                round_number,
                leg,
                completed_matches,
                total_matches: matches.len(),
                fixtures: matches,
            })
        })
        .collect()
}

/// All fixtures of one team, in calendar order
pub fn team_fixtures(fixtures: &[Fixture], team_id: &str) -> Vec<Fixture> {
    let mut matches: Vec<Fixture> = fixtures
        .iter()
        .filter(|f| f.involves(team_id))
        .cloned()
        .collect();
    matches.sort_by_key(|f| (f.round_number, f.match_number));
    matches
}
