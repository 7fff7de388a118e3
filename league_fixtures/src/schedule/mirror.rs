//! Reverse-leg generation for two-legged formats.

use crate::fixture::{Fixture, Leg};

/// Produce the second leg of a completed first leg.
///
/// Venues are swapped and every round is shifted by `first_leg_rounds`;
/// match numbers and group labels are carried over unchanged. No balance is
/// consulted: across both legs each pair meets once at each venue.
pub fn mirror_leg(first_leg: &[Fixture], first_leg_rounds: u32) -> Vec<Fixture> {
    first_leg
        .iter()
        .map(|fixture| {
            Fixture::new(
                &fixture.competition_id,
                fixture.group.as_deref(),
                Leg::Second,
                fixture.round_number + first_leg_rounds,
                fixture.match_number,
                fixture.away.clone(),
                fixture.home.clone(),
            )
        })
        .collect()
}
