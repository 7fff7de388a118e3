//! Stage-to-stage bracket progression.

use log::info;

use super::bracket::Bracket;
use super::models::{BracketMatch, KnockoutStage};
use crate::errors::{ScheduleError, ScheduleResult};

/// Moves the winners of a finished stage into the next stage
#[derive(Debug, Clone, Copy, Default)]
pub struct BracketProgressor;

impl BracketProgressor {
    /// Fill the next stage from the winners of `stage`.
    ///
    /// Winners of matches `2i-1` and `2i` meet in match `i` of the next
    /// stage. When the bracket carries a third-place playoff, progressing
    /// the semi-finals also creates the match between the two losers.
    /// Returns the matches of the next stage (and the third-place match).
    ///
    /// # Errors
    ///
    /// * `NoStageAfterFinal` - `stage` is the final or third-place playoff
    /// * `StageNotInBracket` - the bracket has no match in `stage`
    /// * `IncompleteStageForProgression` - a match of `stage` has no winner
    pub fn progress(
        bracket: &mut Bracket,
        stage: KnockoutStage,
    ) -> ScheduleResult<Vec<BracketMatch>> {
        let next = stage.next().ok_or(ScheduleError::NoStageAfterFinal(stage))?;

        let current: Vec<BracketMatch> = bracket
            .stage_matches(stage)
            .into_iter()
            .cloned()
            .collect();
        if current.is_empty() {
            return Err(ScheduleError::StageNotInBracket(stage));
        }
        let unresolved = current.iter().filter(|m| m.winner.is_none()).count();
        if unresolved > 0 {
            return Err(ScheduleError::IncompleteStageForProgression { stage, unresolved });
        }

        let next_round = current[0].round + 1;
        for pair in current.chunks(2) {
            let [first, second] = pair else {
                continue;
            };
            let (Some(first_winner), Some(second_winner)) = (&first.winner, &second.winner) else {
                continue;
            };
            bracket.advance(first.round, first.match_number, first_winner);
            bracket.advance(second.round, second.match_number, second_winner);

            // brackets built elsewhere may lack the placeholder
            let match_number = second.match_number / 2;
            if bracket.find(next_round, match_number).is_none() {
                bracket.matches.push(BracketMatch::scheduled(
                    next,
                    next_round,
                    match_number,
                    first_winner.clone(),
                    second_winner.clone(),
                ));
            }
        }

        if stage == KnockoutStage::SemiFinal && bracket.third_place_playoff {
            add_third_place(bracket, &current, next_round);
        }

        let mut created: Vec<BracketMatch> = bracket
            .matches
            .iter()
            .filter(|m| m.round == next_round)
            .cloned()
            .collect();
        created.sort_by_key(|m| (m.stage, m.match_number));

        info!(
            "{}: {} progressed to {} ({} match(es))",
            bracket.competition_id,
            stage.display_name(),
            next.display_name(),
            created.len()
        );
        Ok(created)
    }
}

fn add_third_place(bracket: &mut Bracket, semis: &[BracketMatch], round: u32) {
    if bracket.contains_stage(KnockoutStage::ThirdPlace) {
        return;
    }
    let losers: Vec<_> = semis.iter().filter_map(BracketMatch::loser).collect();
    if let [home, away] = losers.as_slice() {
        bracket.matches.push(BracketMatch::scheduled(
            KnockoutStage::ThirdPlace,
            round,
            2,
            (*home).clone(),
            (*away).clone(),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{FixtureStatus, Team};
    use crate::knockout::builder::BracketBuilder;
    use crate::knockout::models::SeedingPolicy;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn bracket(n: usize, third_place: bool) -> Bracket {
        let teams: Vec<Team> = (0..n)
            .map(|i| Team::new(format!("t{i}"), format!("T{i}")))
            .collect();
        let mut rng = StdRng::seed_from_u64(0);
        BracketBuilder::new("cup")
            .with_third_place_playoff(third_place)
            .direct_entry(&teams, n, SeedingPolicy::AsGiven, &mut rng)
            .unwrap()
    }

    fn home_wins_round(bracket: &mut Bracket, round: u32) {
        for m in bracket.matches.iter_mut().filter(|m| m.round == round) {
            if m.winner.is_none() {
                m.record_result(1, 0).unwrap();
            }
        }
    }

    #[test]
    fn test_progress_quarter_finals() {
        let mut b = bracket(8, false);
        home_wins_round(&mut b, 1);
        let semis = BracketProgressor::progress(&mut b, KnockoutStage::QuarterFinal).unwrap();
        assert_eq!(semis.len(), 2);
        assert!(semis.iter().all(|m| m.stage == KnockoutStage::SemiFinal));
        assert_eq!(semis[0].home.to_string(), "T0");
        assert_eq!(semis[0].away.to_string(), "T2");
        assert_eq!(semis[1].home.to_string(), "T4");
        assert_eq!(semis[1].away.to_string(), "T6");
        assert!(semis.iter().all(|m| m.status == FixtureStatus::Scheduled));
    }

    #[test]
    fn test_incomplete_stage_rejected() {
        let mut b = bracket(8, false);
        b.find_mut(1, 1).unwrap().record_result(2, 1).unwrap();
        b.find_mut(1, 2).unwrap().record_result(1, 1).unwrap();

        let err = BracketProgressor::progress(&mut b, KnockoutStage::QuarterFinal).unwrap_err();
        assert_eq!(
            err,
            ScheduleError::IncompleteStageForProgression {
                stage: KnockoutStage::QuarterFinal,
                unresolved: 3
            }
        );
        // nothing was advanced
        assert_eq!(b.find(2, 1).unwrap().home.to_string(), "Winner R1M1");
    }

    #[test]
    fn test_no_stage_after_final() {
        let mut b = bracket(2, false);
        home_wins_round(&mut b, 1);
        assert_eq!(
            BracketProgressor::progress(&mut b, KnockoutStage::Final),
            Err(ScheduleError::NoStageAfterFinal(KnockoutStage::Final))
        );
        assert_eq!(b.champion().map(|t| t.id.as_str()), Some("t0"));
    }

    #[test]
    fn test_stage_not_in_bracket() {
        let mut b = bracket(4, false);
        assert_eq!(
            BracketProgressor::progress(&mut b, KnockoutStage::RoundOf16),
            Err(ScheduleError::StageNotInBracket(KnockoutStage::RoundOf16))
        );
    }

    #[test]
    fn test_third_place_created_from_semi_losers() {
        let mut b = bracket(4, true);
        home_wins_round(&mut b, 1);
        let next = BracketProgressor::progress(&mut b, KnockoutStage::SemiFinal).unwrap();
        assert_eq!(next.len(), 2);
        assert_eq!(next[0].stage, KnockoutStage::Final);
        assert_eq!(next[0].home.to_string(), "T0");
        assert_eq!(next[0].away.to_string(), "T2");
        assert_eq!(next[1].stage, KnockoutStage::ThirdPlace);
        assert_eq!(next[1].home.to_string(), "T1");
        assert_eq!(next[1].away.to_string(), "T3");

        // progressing again is harmless
        let again = BracketProgressor::progress(&mut b, KnockoutStage::SemiFinal).unwrap();
        assert_eq!(again, next);
        assert_eq!(
            BracketProgressor::progress(&mut b, KnockoutStage::ThirdPlace),
            Err(ScheduleError::NoStageAfterFinal(KnockoutStage::ThirdPlace))
        );
    }

    #[test]
    fn test_full_run_to_champion() {
        let mut b = bracket(16, false);
        let mut stage = KnockoutStage::RoundOf16;
        let mut round = 1;
        while let Some(next) = stage.next() {
            home_wins_round(&mut b, round);
            BracketProgressor::progress(&mut b, stage).unwrap();
            stage = next;
            round += 1;
        }
        home_wins_round(&mut b, round);
        assert_eq!(b.champion().map(|t| t.id.as_str()), Some("t0"));
    }

    #[test]
    fn test_byes_progress_with_real_winners() {
        let teams: Vec<Team> = (0..5)
            .map(|i| Team::new(format!("t{i}"), format!("T{i}")))
            .collect();
        let mut rng = StdRng::seed_from_u64(0);
        let mut b = BracketBuilder::new("cup")
            .direct_entry(&teams, 5, SeedingPolicy::AsGiven, &mut rng)
            .unwrap();
        // the top three seeds sit out; T3 v T4 is the one real quarter-final
        assert!(b.find(1, 1).unwrap().is_bye());
        b.find_mut(1, 2).unwrap().record_result(0, 3).unwrap();
        let semis = BracketProgressor::progress(&mut b, KnockoutStage::QuarterFinal).unwrap();
        assert_eq!(semis[0].home.to_string(), "T0");
        assert_eq!(semis[0].away.to_string(), "T4");
        assert_eq!(semis[1].home.to_string(), "T1");
        assert_eq!(semis[1].away.to_string(), "T2");
    }
}
