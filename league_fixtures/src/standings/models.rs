//! Standings data models.

use serde::{Deserialize, Serialize};

use crate::fixture::{GroupLabel, TeamRef};

/// Points for a win
pub const POINTS_PER_WIN: u32 = 3;

/// Points for a draw
pub const POINTS_PER_DRAW: u32 = 1;

/// One team's line in a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingRow {
    /// Group label, `None` for a league table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<GroupLabel>,
    pub team: TeamRef,
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_difference: i32,
    pub points: u32,
    /// Rank in the table (1-indexed)
    pub position: u32,
}

impl StandingRow {
    /// Empty row for a team that has not completed a fixture yet
    pub fn new(group: Option<GroupLabel>, team: TeamRef) -> Self {
        Self {
            group,
            team,
            played: 0,
            wins: 0,
            draws: 0,
            losses: 0,
            goals_for: 0,
            goals_against: 0,
            goal_difference: 0,
            points: 0,
            position: 0,
        }
    }

    /// Add one completed result from this team's point of view
    pub fn add_result(&mut self, scored: u32, conceded: u32) {
        self.played += 1;
        self.goals_for += scored;
        self.goals_against += conceded;
        match scored.cmp(&conceded) {
            std::cmp::Ordering::Greater => self.wins += 1,
            std::cmp::Ordering::Equal => self.draws += 1,
            std::cmp::Ordering::Less => self.losses += 1,
        }
        self.goal_difference = self.goals_for as i32 - self.goals_against as i32;
        self.points = POINTS_PER_WIN * self.wins + POINTS_PER_DRAW * self.draws;
    }
}
