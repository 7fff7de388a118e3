//! Running home/away balance per team.

use std::collections::BTreeMap;

use crate::fixture::{Team, TeamId};

/// Home appearances minus away appearances, per team.
///
/// Passed explicitly into the scheduler so that separate groups (or separate
/// legs, if a caller wants it) can use fresh or shared counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HomeAwayBalance {
    counts: BTreeMap<TeamId, i32>,
}

impl HomeAwayBalance {
    /// Create an empty balance (every team at 0)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a balance with every given team at 0
    pub fn for_teams(teams: &[Team]) -> Self {
        Self {
            counts: teams.iter().map(|t| (t.id.clone(), 0)).collect(),
        }
    }

    /// Current balance of a team (0 if never seen)
    pub fn get(&self, team_id: &str) -> i32 {
        self.counts.get(team_id).copied().unwrap_or(0)
    }

    /// Decide home and away for a pairing and record it.
    ///
    /// The team with the lower balance hosts. On an exact tie `a` hosts when
    /// `tie_prefers_a` is set, otherwise `b`.
    pub fn orient<'t>(
        &mut self,
        a: &'t Team,
        b: &'t Team,
        tie_prefers_a: bool,
    ) -> (&'t Team, &'t Team) {
        let (home, away) = match self.get(&a.id).cmp(&self.get(&b.id)) {
            std::cmp::Ordering::Less => (a, b),
            std::cmp::Ordering::Greater => (b, a),
            std::cmp::Ordering::Equal if tie_prefers_a => (a, b),
            std::cmp::Ordering::Equal => (b, a),
        };
        self.record(&home.id, &away.id);
        (home, away)
    }

    fn record(&mut self, home: &str, away: &str) {
        *self.counts.entry(home.to_string()).or_insert(0) += 1;
        *self.counts.entry(away.to_string()).or_insert(0) -= 1;
    }
}
