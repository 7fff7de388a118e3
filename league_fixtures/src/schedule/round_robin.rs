//! Single round-robin generation using the circle method.

use std::collections::HashSet;

use log::debug;
use rand::Rng;

use super::balance::HomeAwayBalance;
use super::mirror::mirror_leg;
use crate::errors::{ScheduleError, ScheduleResult};
use crate::fixture::{Fixture, Leg, Team, TeamRef};

/// One leg of a round robin together with its round count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegSchedule {
    pub fixtures: Vec<Fixture>,
    /// Number of rounds in the leg (including rounds where a team has a bye)
    pub rounds: u32,
}

impl LegSchedule {
    /// The reverse leg: venues swapped, rounds continuing after this leg
    pub fn mirrored(&self) -> LegSchedule {
        LegSchedule {
            fixtures: mirror_leg(&self.fixtures, self.rounds),
            rounds: self.rounds,
        }
    }
}

/// Circle-method round-robin scheduler.
///
/// Team 0 stays fixed while the remaining positions rotate. An odd roster
/// gets a synthetic bye slot; pairings against it are dropped. Venues come
/// from the running [`HomeAwayBalance`], so the input order of a pairing does
/// not decide who hosts.
#[derive(Debug, Clone, Copy)]
pub struct RoundRobinScheduler<'a> {
    competition_id: &'a str,
    group: Option<&'a str>,
    leg: Leg,
}

impl<'a> RoundRobinScheduler<'a> {
    /// Scheduler for a plain league leg
    pub fn new(competition_id: &'a str) -> Self {
        Self {
            competition_id,
            group: None,
            leg: Leg::First,
        }
    }

    /// Label every fixture with a group
    pub fn in_group(mut self, group: &'a str) -> Self {
        self.group = Some(group);
        self
    }

    /// Override the leg tag written onto fixtures
    pub fn with_leg(mut self, leg: Leg) -> Self {
        self.leg = leg;
        self
    }

    /// Generate one leg.
    ///
    /// Exact balance ties are settled by the parity of round and pairing
    /// position, flipped by one fair coin per leg. Every tie therefore goes
    /// either way with equal probability while the parity pattern keeps each
    /// team's home/away difference within one over the leg.
    ///
    /// # Errors
    ///
    /// * `InsufficientTeams` - fewer than two teams
    /// * `InvalidConfiguration` - the same team ID appears twice
    pub fn schedule<R: Rng + ?Sized>(
        &self,
        teams: &[Team],
        balance: &mut HomeAwayBalance,
        rng: &mut R,
    ) -> ScheduleResult<LegSchedule> {
        if teams.len() < 2 {
            return Err(ScheduleError::InsufficientTeams {
                needed: 2,
                available: teams.len(),
            });
        }
        ensure_unique_ids(teams)?;

        let mut slots: Vec<Option<&Team>> = teams.iter().map(Some).collect();
        if slots.len() % 2 == 1 {
            slots.push(None);
        }
        let size = slots.len();
        let rounds = size - 1;
        let leg_coin = rng.random_bool(0.5);

        let mut fixtures = Vec::with_capacity(teams.len() * (teams.len() - 1) / 2);
        for round in 0..rounds {
            let mut match_number = 0;
            for (position, (x, y)) in circle_pairs(size, round).enumerate() {
                let (Some(a), Some(b)) = (slots[x], slots[y]) else {
                    continue;
                };
                let tie_prefers_a = ((round + position) % 2 == 0) ^ leg_coin;
                let (home, away) = balance.orient(a, b, tie_prefers_a);
                match_number += 1;
                fixtures.push(Fixture::new(
                    self.competition_id,
                    self.group,
                    self.leg,
                    round as u32 + 1,
                    match_number,
                    TeamRef::from(home),
                    TeamRef::from(away),
                ));
            }
        }

        debug!(
            "Scheduled {} fixtures over {} rounds for {}{}",
            fixtures.len(),
            rounds,
            self.competition_id,
            self.group.map(|g| format!(" group {g}")).unwrap_or_default()
        );

        Ok(LegSchedule {
            fixtures,
            rounds: rounds as u32,
        })
    }

    /// Generate the first leg and, when `two_legged`, its mirrored second leg
    pub fn schedule_legs<R: Rng + ?Sized>(
        &self,
        teams: &[Team],
        two_legged: bool,
        rng: &mut R,
    ) -> ScheduleResult<LegSchedule> {
        let mut balance = HomeAwayBalance::for_teams(teams);
        let first = self.schedule(teams, &mut balance, rng)?;
        if !two_legged {
            return Ok(first);
        }

        let second = first.mirrored();
        let mut fixtures = first.fixtures;
        fixtures.extend(second.fixtures);
        Ok(LegSchedule {
            fixtures,
            rounds: first.rounds * 2,
        })
    }
}

/// Index pairs for one round of the circle method over `size` slots (even)
fn circle_pairs(size: usize, round: usize) -> impl Iterator<Item = (usize, usize)> {
    let rotating = size - 1;
    std::iter::once((0, round + 1)).chain((1..size / 2).map(move |k| {
        (
            (round + k) % rotating + 1,
            (round + rotating - k) % rotating + 1,
        )
    }))
}

fn ensure_unique_ids(teams: &[Team]) -> ScheduleResult<()> {
    let mut seen = HashSet::with_capacity(teams.len());
    for team in teams {
        if !seen.insert(team.id.as_str()) {
            return Err(ScheduleError::InvalidConfiguration {
                field: "teams".to_string(),
                reason: format!("duplicate team id {}", team.id),
            });
        }
    }
    Ok(())
}
