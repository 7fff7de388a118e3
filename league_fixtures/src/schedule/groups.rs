//! Group-stage partitioning and scheduling.

use std::collections::BTreeMap;

use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::round_robin::RoundRobinScheduler;
use crate::errors::{ScheduleError, ScheduleResult};
use crate::fixture::{Fixture, GroupLabel, Team, TeamId};

/// How teams are assigned to groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupAssignmentMode {
    /// Contiguous buckets in input order, labelled A, B, C, ...
    #[default]
    Auto,
    /// Every team already carries its group label
    Manual,
}

/// One group and its members, in input order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub label: GroupLabel,
    pub teams: Vec<Team>,
}

/// Scheduled group stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupStage {
    pub groups: Vec<Group>,
    /// Fixtures of every group, group by group
    pub fixtures: Vec<Fixture>,
    /// Largest round number used by any group
    pub rounds: u32,
}

impl GroupStage {
    /// Team to group lookup for the whole stage
    pub fn team_groups(&self) -> BTreeMap<TeamId, GroupLabel> {
        team_groups(&self.groups)
    }

    /// Fixtures of one group
    pub fn fixtures_for(&self, label: &str) -> Vec<&Fixture> {
        self.fixtures
            .iter()
            .filter(|f| f.group.as_deref() == Some(label))
            .collect()
    }
}

/// Build a team to group lookup from a partition
pub fn team_groups(groups: &[Group]) -> BTreeMap<TeamId, GroupLabel> {
    groups
        .iter()
        .flat_map(|g| g.teams.iter().map(|t| (t.id.clone(), g.label.clone())))
        .collect()
}

/// Splits a roster into groups and schedules each group as its own round robin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupPartitioner {
    mode: GroupAssignmentMode,
    number_of_groups: usize,
}

impl GroupPartitioner {
    /// Auto-distribute into `number_of_groups` groups
    pub fn auto(number_of_groups: usize) -> Self {
        Self {
            mode: GroupAssignmentMode::Auto,
            number_of_groups,
        }
    }

    /// Use the group labels carried by the teams
    pub fn manual() -> Self {
        Self {
            mode: GroupAssignmentMode::Manual,
            number_of_groups: 0,
        }
    }

    pub fn new(mode: GroupAssignmentMode, number_of_groups: usize) -> Self {
        Self {
            mode,
            number_of_groups,
        }
    }

    /// Split the roster into groups.
    ///
    /// Auto mode keeps input order and fills contiguous buckets; the first
    /// `count % groups` buckets take one extra team so every group holds
    /// either `floor(count / groups)` or `ceil(count / groups)` teams.
    /// Manual mode buckets by label, ordered lexicographically.
    ///
    /// # Errors
    ///
    /// * `InvalidConfiguration` - zero groups requested in auto mode
    /// * `InsufficientTeams` - a group would hold fewer than two teams
    /// * `MissingGroupAssignment` - manual mode with unlabelled teams
    pub fn partition(&self, teams: &[Team]) -> ScheduleResult<Vec<Group>> {
        let groups = match self.mode {
            GroupAssignmentMode::Auto => self.partition_auto(teams)?,
            GroupAssignmentMode::Manual => partition_manual(teams)?,
        };

        let needed = groups.len() * 2;
        if groups.is_empty() || groups.iter().any(|g| g.teams.len() < 2) {
            return Err(ScheduleError::InsufficientTeams {
                needed: needed.max(2),
                available: teams.len(),
            });
        }
        Ok(groups)
    }

    /// Partition and schedule every group.
    ///
    /// Each group gets fresh balance counters and its own rounds starting at
    /// 1, so round `k` means the same matchday in every group. A two-legged
    /// stage mirrors each group after its own first leg.
    pub fn schedule<R: Rng + ?Sized>(
        &self,
        teams: &[Team],
        competition_id: &str,
        two_legged: bool,
        rng: &mut R,
    ) -> ScheduleResult<GroupStage> {
        let groups = self.partition(teams)?;

        let mut fixtures = Vec::new();
        let mut rounds = 0;
        for group in &groups {
            let leg = RoundRobinScheduler::new(competition_id)
                .in_group(&group.label)
                .schedule_legs(&group.teams, two_legged, rng)?;
            debug!(
                "Group {}: {} teams, {} fixtures",
                group.label,
                group.teams.len(),
                leg.fixtures.len()
            );
            rounds = rounds.max(leg.rounds);
            fixtures.extend(leg.fixtures);
        }

        info!(
            "Group stage for {}: {} groups, {} fixtures, {} rounds",
            competition_id,
            groups.len(),
            fixtures.len(),
            rounds
        );

        Ok(GroupStage {
            groups,
            fixtures,
            rounds,
        })
    }

    fn partition_auto(&self, teams: &[Team]) -> ScheduleResult<Vec<Group>> {
        if self.number_of_groups == 0 {
            return Err(ScheduleError::InvalidConfiguration {
                field: "number_of_groups".to_string(),
                reason: "Must be at least 1".to_string(),
            });
        }

        let base = teams.len() / self.number_of_groups;
        let extra = teams.len() % self.number_of_groups;
        let mut remaining = teams;
        let mut groups = Vec::with_capacity(self.number_of_groups);
        for index in 0..self.number_of_groups {
            let size = base + usize::from(index < extra);
            let (members, rest) = remaining.split_at(size);
            groups.push(Group {
                label: group_label(index),
                teams: members.to_vec(),
            });
            remaining = rest;
        }
        Ok(groups)
    }
}

fn partition_manual(teams: &[Team]) -> ScheduleResult<Vec<Group>> {
    let unlabelled: Vec<String> = teams
        .iter()
        .filter(|t| t.group.as_deref().is_none_or(str::is_empty))
        .map(|t| t.name.clone())
        .collect();
    if !unlabelled.is_empty() {
        return Err(ScheduleError::MissingGroupAssignment { teams: unlabelled });
    }

    let mut buckets: BTreeMap<GroupLabel, Vec<Team>> = BTreeMap::new();
    for team in teams {
        if let Some(label) = &team.group {
            buckets.entry(label.clone()).or_default().push(team.clone());
        }
    }
    Ok(buckets
        .into_iter()
        .map(|(label, teams)| Group { label, teams })
        .collect())
}

/// Spreadsheet-style label: 0 -> A, 25 -> Z, 26 -> AA
pub fn group_label(index: usize) -> GroupLabel {
    let mut label = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        label.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    label.reverse();
    String::from_utf8_lossy(&label).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn teams(n: usize) -> Vec<Team> {
        (0..n)
            .map(|i| Team::new(format!("t{i:02}"), format!("Team {i:02}")))
            .collect()
    }

    #[test]
    fn test_group_labels() {
        assert_eq!(group_label(0), "A");
        assert_eq!(group_label(3), "D");
        assert_eq!(group_label(25), "Z");
        assert_eq!(group_label(26), "AA");
    }

    #[test]
    fn test_auto_partition_even_split() {
        let groups = GroupPartitioner::auto(4).partition(&teams(16)).unwrap();
        assert_eq!(groups.len(), 4);
        assert!(groups.iter().all(|g| g.teams.len() == 4));
        assert_eq!(groups[0].label, "A");
        assert_eq!(groups[0].teams[0].id, "t00");
        assert_eq!(groups[1].teams[0].id, "t04");
    }

    #[test]
    fn test_auto_partition_uneven_split() {
        let groups = GroupPartitioner::auto(4).partition(&teams(10)).unwrap();
        let sizes: Vec<usize> = groups.iter().map(|g| g.teams.len()).collect();
        assert_eq!(sizes, vec![3, 3, 2, 2]);
    }

    #[test]
    fn test_auto_partition_too_many_groups() {
        let err = GroupPartitioner::auto(4).partition(&teams(6)).unwrap_err();
        assert_eq!(
            err,
            ScheduleError::InsufficientTeams {
                needed: 8,
                available: 6
            }
        );
    }

    #[test]
    fn test_auto_partition_zero_groups() {
        let err = GroupPartitioner::auto(0).partition(&teams(6)).unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_manual_partition_orders_labels() {
        let roster = vec![
            Team::new("1", "One").with_group("B"),
            Team::new("2", "Two").with_group("A"),
            Team::new("3", "Three").with_group("B"),
            Team::new("4", "Four").with_group("A"),
        ];
        let groups = GroupPartitioner::manual().partition(&roster).unwrap();
        assert_eq!(groups[0].label, "A");
        assert_eq!(groups[0].teams[0].id, "2");
        assert_eq!(groups[1].label, "B");
        assert_eq!(groups[1].teams[1].id, "3");
    }

    #[test]
    fn test_manual_partition_missing_label() {
        let roster = vec![
            Team::new("1", "One").with_group("A"),
            Team::new("2", "Two"),
            Team::new("3", "Three").with_group(""),
        ];
        let err = GroupPartitioner::manual().partition(&roster).unwrap_err();
        assert_eq!(
            err,
            ScheduleError::MissingGroupAssignment {
                teams: vec!["Two".to_string(), "Three".to_string()]
            }
        );
    }

    #[test]
    fn test_groups_play_in_lockstep() {
        let mut rng = StdRng::seed_from_u64(11);
        let stage = GroupPartitioner::auto(2)
            .schedule(&teams(8), "cup", false, &mut rng)
            .unwrap();
        assert_eq!(stage.rounds, 3);
        assert_eq!(stage.fixtures.len(), 12);
        for label in ["A", "B"] {
            let rounds: Vec<u32> = stage
                .fixtures_for(label)
                .iter()
                .map(|f| f.round_number)
                .collect();
            assert_eq!(rounds, vec![1, 1, 2, 2, 3, 3]);
        }
    }

    #[test]
    fn test_two_legged_groups_continue_per_group() {
        let mut rng = StdRng::seed_from_u64(2);
        let stage = GroupPartitioner::auto(2)
            .schedule(&teams(7), "cup", true, &mut rng)
            .unwrap();
        // A has 4 teams (3 rounds per leg), B has 3 teams (3 rounds per leg with a bye)
        let max_round_a = stage.fixtures_for("A").iter().map(|f| f.round_number).max();
        let max_round_b = stage.fixtures_for("B").iter().map(|f| f.round_number).max();
        assert_eq!(max_round_a, Some(6));
        assert_eq!(max_round_b, Some(6));
        assert_eq!(stage.fixtures_for("B").len(), 6);
    }

    #[test]
    fn test_team_groups_lookup() {
        let mut rng = StdRng::seed_from_u64(0);
        let stage = GroupPartitioner::auto(2)
            .schedule(&teams(4), "cup", false, &mut rng)
            .unwrap();
        let lookup = stage.team_groups();
        assert_eq!(lookup.get("t00").map(String::as_str), Some("A"));
        assert_eq!(lookup.get("t03").map(String::as_str), Some("B"));
    }
}
