//! Standings aggregation and ranking.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use log::debug;

use super::models::StandingRow;
use crate::fixture::{Fixture, GroupLabel};

/// Builds ranked tables from fixtures.
///
/// Every call rebuilds the table from scratch; nothing is cached between
/// calls. Only completed fixtures with a recorded score count, but every
/// team that appears in any given fixture gets a row.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandingsCalculator;

impl StandingsCalculator {
    /// Table for one competition or group.
    ///
    /// Rows are sorted by points, goal difference and goals for (all
    /// descending), then by team name and team ID.
    pub fn table(group: Option<&str>, fixtures: &[Fixture]) -> Vec<StandingRow> {
        let mut rows: Vec<StandingRow> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();

        for fixture in fixtures {
            for team in [&fixture.home, &fixture.away] {
                index.entry(team.id.as_str()).or_insert_with(|| {
                    rows.push(StandingRow::new(group.map(str::to_string), team.clone()));
                    rows.len() - 1
                });
            }

            if !fixture.is_completed() {
                continue;
            }
            let (Some(home_score), Some(away_score)) = (fixture.home_score, fixture.away_score)
            else {
                continue;
            };
            if let Some(&i) = index.get(fixture.home.id.as_str()) {
                rows[i].add_result(home_score, away_score);
            }
            if let Some(&i) = index.get(fixture.away.id.as_str()) {
                rows[i].add_result(away_score, home_score);
            }
        }

        rank(&mut rows);
        rows
    }

    /// League table over every non-knockout fixture
    pub fn league(fixtures: &[Fixture]) -> Vec<StandingRow> {
        let league: Vec<Fixture> = fixtures
            .iter()
            .filter(|f| f.knockout_stage.is_none())
            .cloned()
            .collect();
        Self::table(None, &league)
    }

    /// One table per group label, in label order.
    ///
    /// Fixtures without a group label are ignored.
    pub fn by_group(fixtures: &[Fixture]) -> BTreeMap<GroupLabel, Vec<StandingRow>> {
        let mut buckets: BTreeMap<GroupLabel, Vec<Fixture>> = BTreeMap::new();
        for fixture in fixtures {
            if let Some(label) = &fixture.group {
                buckets
                    .entry(label.clone())
                    .or_default()
                    .push(fixture.clone());
            }
        }

        buckets
            .into_iter()
            .map(|(label, group_fixtures)| {
                let table = Self::table(Some(&label), &group_fixtures);
                debug!("Group {} table: {} rows", label, table.len());
                (label, table)
            })
            .collect()
    }
}

fn compare_rows(a: &StandingRow, b: &StandingRow) -> Ordering {
    b.points
        .cmp(&a.points)
        .then_with(|| b.goal_difference.cmp(&a.goal_difference))
        .then_with(|| b.goals_for.cmp(&a.goals_for))
        .then_with(|| a.team.name.cmp(&b.team.name))
        .then_with(|| a.team.id.cmp(&b.team.id))
}

fn rank(rows: &mut [StandingRow]) {
    rows.sort_by(compare_rows);
    for (i, row) in rows.iter_mut().enumerate() {
        row.position = i as u32 + 1;
    }
}
