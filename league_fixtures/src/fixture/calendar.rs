//! Calendar dates for rounds.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use super::models::Fixture;

/// Maps round numbers onto match dates at a fixed interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundCalendar {
    /// Date of round 1
    pub start: NaiveDate,
    /// Days between consecutive rounds
    pub days_between_rounds: u32,
}

impl RoundCalendar {
    pub fn new(start: NaiveDate, days_between_rounds: u32) -> Self {
        Self {
            start,
            days_between_rounds,
        }
    }

    /// Date of a 1-indexed round, `None` on calendar overflow
    pub fn date_for_round(&self, round_number: u32) -> Option<NaiveDate> {
        let offset = u64::from(round_number.saturating_sub(1)) * u64::from(self.days_between_rounds);
        self.start.checked_add_days(Days::new(offset))
    }

    /// Stamp every fixture with the date of its round
    pub fn assign(&self, fixtures: &mut [Fixture]) {
        for fixture in fixtures.iter_mut() {
            fixture.scheduled_date = self.date_for_round(fixture.round_number);
        }
    }

    /// Stamp knockout fixtures.
    ///
    /// With two-legged ties every bracket round takes two calendar slots and
    /// the second leg is played one interval after the first; a single-leg
    /// match (the final) takes the first slot of its round.
    pub fn assign_knockout(&self, fixtures: &mut [Fixture], two_legged: bool) {
        for fixture in fixtures.iter_mut() {
            let slot = if two_legged {
                let leg = u32::from(fixture.tie_leg.unwrap_or(1));
                2 * fixture.round_number.saturating_sub(1) + leg
            } else {
                fixture.round_number
            };
            fixture.scheduled_date = self.date_for_round(slot);
        }
    }
}
