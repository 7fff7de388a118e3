//! Bracket construction from a team list or from group standings.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use log::{debug, info, warn};
use rand::Rng;
use rand::seq::SliceRandom;

use super::bracket::Bracket;
use super::models::{BracketMatch, KnockoutFormat, KnockoutStage, PairingMethod, SeedingPolicy};
use crate::errors::{ScheduleError, ScheduleResult};
use crate::fixture::{GroupLabel, Team, TeamRef};
use crate::standings::StandingRow;

/// Supported bracket sizes, smallest first
pub const BRACKET_SIZES: [usize; 5] = [2, 4, 8, 16, 32];

type RoundOne = Vec<(TeamRef, Option<TeamRef>)>;

/// Smallest supported bracket that holds `min(requested, available)` teams
///
/// # Errors
///
/// * `InvalidBracketSize` - more than 32 entrants would be needed
pub fn choose_bracket_size(requested: usize, available: usize) -> ScheduleResult<usize> {
    let entrants = requested.min(available);
    BRACKET_SIZES
        .into_iter()
        .find(|&size| size >= entrants)
        .ok_or(ScheduleError::InvalidBracketSize { entrants })
}

/// Split seeded entrants into bye recipients and teams that play round one.
///
/// A bracket of `size` slots with fewer entrants leaves `size - len` byes;
/// they go to the first (highest-seeded) entrants.
fn split_byes(seeded: &[TeamRef], size: usize) -> (&[TeamRef], &[TeamRef]) {
    let byes = size.saturating_sub(seeded.len()).min(seeded.len());
    seeded.split_at(byes)
}

/// Pair entrants in order: 1 v 2, 3 v 4, ...
fn pair_in_order(teams: &[TeamRef]) -> Vec<(TeamRef, TeamRef)> {
    teams
        .chunks(2)
        .filter_map(|pair| match pair {
            [home, away] => Some((home.clone(), away.clone())),
            _ => None,
        })
        .collect()
}

/// Pair ranked entrants best against worst: 1 v N, 2 v N-1, ...
fn pair_best_against_worst(ranked: &[TeamRef]) -> Vec<(TeamRef, TeamRef)> {
    let half = ranked.len() / 2;
    ranked[..half]
        .iter()
        .zip(ranked[half..].iter().rev())
        .map(|(home, away)| (home.clone(), away.clone()))
        .collect()
}

/// Lay out first-round slots.
///
/// Each bye sits next to a real match so that the bye recipient meets that
/// match's winner in round two. The first bye (top seed) gets the last
/// match; matches without a bye neighbour keep their order at the end.
fn with_byes(byes: &[TeamRef], matches: Vec<(TeamRef, TeamRef)>) -> RoundOne {
    let mut matches = matches;
    let shared = byes.len().min(matches.len());
    let against_byes = matches.split_off(matches.len() - shared);
    let mut against_byes = against_byes.into_iter().rev();

    let mut round_one = Vec::with_capacity(byes.len() + matches.len() + shared);
    for team in byes {
        round_one.push((team.clone(), None));
        if let Some((home, away)) = against_byes.next() {
            round_one.push((home, Some(away)));
        }
    }
    round_one.extend(matches.into_iter().map(|(home, away)| (home, Some(away))));
    round_one
}

#[derive(Debug, Clone)]
struct Qualifier {
    group: GroupLabel,
    position: u32,
    team: TeamRef,
    points: u32,
    goal_difference: i32,
    goals_for: u32,
}

impl Qualifier {
    /// Cross-group ranking: points, goal difference, goals for, then group label
    fn compare(&self, other: &Qualifier) -> Ordering {
        other
            .points
            .cmp(&self.points)
            .then_with(|| other.goal_difference.cmp(&self.goal_difference))
            .then_with(|| other.goals_for.cmp(&self.goals_for))
            .then_with(|| self.group.cmp(&other.group))
    }

    fn is(&self, other: &Qualifier) -> bool {
        self.group == other.group && self.position == other.position
    }
}

/// Builds first-round pairings and the placeholder rounds behind them
#[derive(Debug, Clone, Copy)]
pub struct BracketBuilder<'a> {
    competition_id: &'a str,
    format: KnockoutFormat,
    third_place_playoff: bool,
}

impl<'a> BracketBuilder<'a> {
    pub fn new(competition_id: &'a str) -> Self {
        Self {
            competition_id,
            format: KnockoutFormat::SingleLeg,
            third_place_playoff: false,
        }
    }

    pub fn with_format(mut self, format: KnockoutFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_third_place_playoff(mut self, enabled: bool) -> Self {
        self.third_place_playoff = enabled;
        self
    }

    /// Knockout-only competition from a flat team list.
    ///
    /// Teams beyond the bracket size are dropped after seeding. When fewer
    /// teams than slots remain, the leading entrants receive byes and the
    /// rest are paired in order.
    ///
    /// # Errors
    ///
    /// * `InsufficientTeams` - fewer than two teams
    /// * `InvalidBracketSize` - no supported size fits
    pub fn direct_entry<R: Rng + ?Sized>(
        &self,
        teams: &[Team],
        requested: usize,
        seeding: SeedingPolicy,
        rng: &mut R,
    ) -> ScheduleResult<Bracket> {
        if teams.len() < 2 {
            return Err(ScheduleError::InsufficientTeams {
                needed: 2,
                available: teams.len(),
            });
        }
        let size = choose_bracket_size(requested, teams.len())?;

        let mut entrants: Vec<TeamRef> = teams.iter().map(TeamRef::from).collect();
        if seeding == SeedingPolicy::Shuffled {
            entrants.shuffle(rng);
        }
        if entrants.len() > size {
            warn!(
                "Bracket for {} holds {} teams, dropping {}",
                self.competition_id,
                size,
                entrants.len() - size
            );
            entrants.truncate(size);
        }

        let (byes, playing) = split_byes(&entrants, size);
        Ok(self.build(&with_byes(byes, pair_in_order(playing)), size))
    }

    /// Playoff bracket from a league table.
    ///
    /// Byes go to the top of the table; the remaining teams are paired best
    /// against worst (1 v N, 2 v N-1, ...).
    pub fn from_table(&self, table: &[StandingRow], requested: usize) -> ScheduleResult<Bracket> {
        if table.len() < 2 {
            return Err(ScheduleError::InsufficientTeams {
                needed: 2,
                available: table.len(),
            });
        }
        let size = choose_bracket_size(requested, table.len())?;

        let mut ranked: Vec<&StandingRow> = table.iter().collect();
        ranked.sort_by_key(|row| row.position);
        ranked.truncate(size);
        let seeded: Vec<TeamRef> = ranked.into_iter().map(|row| row.team.clone()).collect();

        let (byes, playing) = split_byes(&seeded, size);
        Ok(self.build(&with_byes(byes, pair_best_against_worst(playing)), size))
    }

    /// Knockout stage from group tables.
    ///
    /// The top `advancing_per_group` rows of each table qualify. Cross-group
    /// pairing needs exactly two qualifiers from every group and at least
    /// four in total; when the total is not a bracket size, the best group
    /// winners take the byes. Uefa and mirrored pairing also need the total
    /// to fill the bracket exactly. Otherwise qualifiers are ordered by
    /// position then group label, the leaders take any byes and the rest are
    /// paired in order.
    ///
    /// # Errors
    ///
    /// * `InvalidConfiguration` - zero teams advancing per group
    /// * `InsufficientTeams` - fewer than two qualifiers
    /// * `InvalidBracketSize` - more than 32 qualifiers
    pub fn from_groups(
        &self,
        standings: &BTreeMap<GroupLabel, Vec<StandingRow>>,
        advancing_per_group: usize,
        method: PairingMethod,
    ) -> ScheduleResult<Bracket> {
        if advancing_per_group == 0 {
            return Err(ScheduleError::InvalidConfiguration {
                field: "teams_advancing_per_group".to_string(),
                reason: "Must be at least 1".to_string(),
            });
        }

        let mut qualifiers = Vec::new();
        for (label, table) in standings {
            let mut ranked: Vec<&StandingRow> = table.iter().collect();
            ranked.sort_by_key(|row| row.position);
            qualifiers.extend(ranked.into_iter().take(advancing_per_group).enumerate().map(
                |(i, row)| Qualifier {
                    group: label.clone(),
                    position: i as u32 + 1,
                    team: row.team.clone(),
                    points: row.points,
                    goal_difference: row.goal_difference,
                    goals_for: row.goals_for,
                },
            ));
        }

        if qualifiers.len() < 2 {
            return Err(ScheduleError::InsufficientTeams {
                needed: 2,
                available: qualifiers.len(),
            });
        }
        let size = choose_bracket_size(qualifiers.len(), qualifiers.len())?;

        let paired = if advancing_per_group == 2 && two_per_group(&qualifiers) {
            let (winners, runners_up): (Vec<&Qualifier>, Vec<&Qualifier>) =
                qualifiers.iter().partition(|q| q.position == 1);
            let fills_bracket = qualifiers.len() == size;
            match method {
                PairingMethod::CrossGroup => {
                    Some(cross_group(&winners, &runners_up, size - qualifiers.len()))
                }
                PairingMethod::Uefa if fills_bracket => uefa(&winners, &runners_up),
                PairingMethod::Mirrored if fills_bracket => mirrored(&winners, &runners_up),
                _ => None,
            }
        } else {
            None
        };

        let round_one = match paired {
            Some(round_one) => round_one,
            None => {
                if method != PairingMethod::Sequential {
                    debug!(
                        "{:?} pairing not applicable to {} qualifiers, pairing sequentially",
                        method,
                        qualifiers.len()
                    );
                }
                qualifiers.sort_by(|a, b| {
                    a.position
                        .cmp(&b.position)
                        .then_with(|| a.group.cmp(&b.group))
                });
                let seeded: Vec<TeamRef> = qualifiers.into_iter().map(|q| q.team).collect();
                let (byes, playing) = split_byes(&seeded, size);
                with_byes(byes, pair_in_order(playing))
            }
        };

        Ok(self.build(&round_one, size))
    }

    /// Lay out every round. Byes are advanced immediately so that a
    /// second-round match fed by two byes is already playable.
    fn build(&self, round_one: &[(TeamRef, Option<TeamRef>)], size: usize) -> Bracket {
        let mut matches = Vec::with_capacity(size);
        let first_stage = stage_for(size);
        let mut byes = Vec::new();
        for (i, (home, away)) in round_one.iter().enumerate() {
            let match_number = i as u32 + 1;
            match away {
                Some(away) => matches.push(BracketMatch::scheduled(
                    first_stage,
                    1,
                    match_number,
                    home.clone(),
                    away.clone(),
                )),
                None => {
                    byes.push((match_number, home.clone()));
                    matches.push(BracketMatch::bye(first_stage, 1, match_number, home.clone()));
                }
            }
        }

        let mut round = 2;
        let mut remaining = size / 2;
        while remaining >= 2 {
            let stage = stage_for(remaining);
            for match_number in 1..=(remaining / 2) as u32 {
                matches.push(BracketMatch::placeholder(stage, round, match_number));
            }
            remaining /= 2;
            round += 1;
        }

        let mut bracket = Bracket {
            competition_id: self.competition_id.to_string(),
            size,
            format: self.format,
            third_place_playoff: self.third_place_playoff,
            matches,
        };
        if !byes.is_empty() {
            warn!(
                "{} of {} first-round slots in {} are byes",
                byes.len(),
                size / 2,
                self.competition_id
            );
        }
        for (match_number, team) in byes {
            bracket.advance(1, match_number, &team);
        }

        info!(
            "Built {}-team bracket for {}: {} rounds starting at {}",
            size,
            self.competition_id,
            round - 1,
            first_stage.display_name()
        );
        bracket
    }
}

/// Bracket sizes are always supported sizes here; anything else is the final
fn stage_for(size: usize) -> KnockoutStage {
    KnockoutStage::from_bracket_size(size).unwrap_or(KnockoutStage::Final)
}

/// Every group sent a winner and a runner-up, at least four teams in all
fn two_per_group(qualifiers: &[Qualifier]) -> bool {
    let mut per_group: BTreeMap<&str, usize> = BTreeMap::new();
    for q in qualifiers {
        *per_group.entry(q.group.as_str()).or_default() += 1;
    }
    per_group.values().all(|&n| n == 2) && qualifiers.len() >= 4
}

/// Each winner meets the next unused runner-up from a different group.
///
/// With `byes` to hand out, the best winners (then the best runners-up)
/// go straight through; runners-up left over once every remaining winner
/// is paired meet each other.
fn cross_group(winners: &[&Qualifier], runners_up: &[&Qualifier], byes: usize) -> RoundOne {
    let mut ranked_winners = winners.to_vec();
    ranked_winners.sort_by(|a, b| a.compare(b));
    let mut ranked_runners_up = runners_up.to_vec();
    ranked_runners_up.sort_by(|a, b| a.compare(b));
    let bye_recipients: Vec<&Qualifier> = ranked_winners
        .into_iter()
        .chain(ranked_runners_up)
        .take(byes)
        .collect();

    let has_bye = |q: &Qualifier| bye_recipients.iter().any(|b| b.is(q));
    let winners: Vec<&Qualifier> = winners.iter().copied().filter(|q| !has_bye(*q)).collect();
    let runners_up: Vec<&Qualifier> = runners_up.iter().copied().filter(|q| !has_bye(*q)).collect();

    let n = runners_up.len();
    let mut used = vec![false; n];
    let mut pairs = Vec::with_capacity(winners.len() + n / 2);
    for (i, winner) in winners.iter().enumerate() {
        let candidates = (0..n).map(|offset| (i + offset) % n).filter(|&j| !used[j]);
        let pick = candidates
            .clone()
            .find(|&j| runners_up[j].group != winner.group)
            .or_else(|| candidates.clone().next());
        if let Some(j) = pick {
            used[j] = true;
            pairs.push((winner.team.clone(), runners_up[j].team.clone()));
        }
    }
    // one runner-up per group, so these never share a group
    let leftover: Vec<TeamRef> = runners_up
        .iter()
        .zip(&used)
        .filter(|(_, used)| !**used)
        .map(|(q, _)| q.team.clone())
        .collect();
    pairs.extend(pair_in_order(&leftover));

    let byes: Vec<TeamRef> = bye_recipients.into_iter().map(|q| q.team.clone()).collect();
    with_byes(&byes, pairs)
}

/// A1-B2, C1-D2, B1-A2, D1-C2 for exactly four groups
fn uefa(winners: &[&Qualifier], runners_up: &[&Qualifier]) -> Option<RoundOne> {
    if winners.len() != 4 || runners_up.len() != 4 {
        return None;
    }
    Some(
        [(0, 1), (2, 3), (1, 0), (3, 2)]
            .into_iter()
            .map(|(w, r)| (winners[w].team.clone(), Some(runners_up[r].team.clone())))
            .collect(),
    )
}

/// Winner `i` meets runner-up `n-1-i`; unusable when that is the same group
fn mirrored(winners: &[&Qualifier], runners_up: &[&Qualifier]) -> Option<RoundOne> {
    let n = runners_up.len();
    let pairs: Vec<(&Qualifier, &Qualifier)> = winners
        .iter()
        .enumerate()
        .map(|(i, w)| (*w, runners_up[n - 1 - i]))
        .collect();
    if pairs.iter().any(|(w, r)| w.group == r.group) {
        return None;
    }
    Some(
        pairs
            .into_iter()
            .map(|(w, r)| (w.team.clone(), Some(r.team.clone())))
            .collect(),
    )
}
