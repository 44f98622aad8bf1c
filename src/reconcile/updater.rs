use super::matcher::SideAlignment;
use crate::error::{AppResult, ReconcileError};
use crate::feed::GameResult;
use crate::schedule::{Fixture, ScheduleStore};

/// A final result expressed in the local fixture's terms: scores in local
/// home/away order, winner as the local side name so grading compares
/// names from the same namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedResult {
    pub home_score: i32,
    pub away_score: i32,
    pub winner_side: String,
}

#[derive(Debug, Clone)]
pub enum UpdateOutcome {
    /// The fixture was completed by this call; the returned copy carries
    /// the final result for grading.
    Updated(Fixture),
    /// Already completed with the identical result, or another writer got
    /// there first. Nothing to grade.
    Unchanged,
}

/// Decide the winner from an external final record.
///
/// A tied final score has no winner to declare; it is rejected as a
/// data-quality error and the fixture stays incomplete.
pub fn resolve_result(
    fixture: &Fixture,
    game: &GameResult,
    alignment: SideAlignment,
) -> Result<ResolvedResult, ReconcileError> {
    let (home_score, away_score) = match alignment {
        SideAlignment::Parallel => (game.home_score, game.away_score),
        SideAlignment::Crossed => (game.away_score, game.home_score),
    };

    if home_score == away_score {
        return Err(ReconcileError::TiedFinalScore {
            home: fixture.home_side.clone(),
            away: fixture.away_side.clone(),
            score: home_score,
        });
    }

    let winner_side = if home_score > away_score {
        fixture.home_side.clone()
    } else {
        fixture.away_side.clone()
    };

    Ok(ResolvedResult {
        home_score,
        away_score,
        winner_side,
    })
}

/// Persist a matched final result onto its fixture.
///
/// Completed fixtures are immutable: the identical result is a no-op, a
/// different one is a conflict error, and neither writes anything.
pub async fn apply_result(
    store: &dyn ScheduleStore,
    fixture: &Fixture,
    game: &GameResult,
    alignment: SideAlignment,
) -> AppResult<UpdateOutcome> {
    let resolved = resolve_result(fixture, game, alignment)?;

    if fixture.completed {
        if fixture.has_result(resolved.home_score, resolved.away_score, &resolved.winner_side) {
            return Ok(UpdateOutcome::Unchanged);
        }
        return Err(ReconcileError::ResultConflict {
            fixture_id: fixture.id,
        }
        .into());
    }

    let wrote = store
        .set_fixture_result(
            fixture.id,
            resolved.home_score,
            resolved.away_score,
            &resolved.winner_side,
        )
        .await?;

    if !wrote {
        return Ok(UpdateOutcome::Unchanged);
    }

    let mut completed = fixture.clone();
    completed.completed = true;
    completed.home_score = Some(resolved.home_score);
    completed.away_score = Some(resolved.away_score);
    completed.winner_side = Some(resolved.winner_side);
    Ok(UpdateOutcome::Updated(completed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::GameStatus;
    use uuid::Uuid;

    fn fixture() -> Fixture {
        Fixture {
            id: Uuid::new_v4(),
            round: 1,
            home_side: "Washington".to_string(),
            away_side: "NY Giants".to_string(),
            kickoff: None,
            completed: false,
            home_score: None,
            away_score: None,
            winner_side: None,
        }
    }

    fn game(home_score: i32, away_score: i32) -> GameResult {
        GameResult {
            home_side: "Washington Commanders".to_string(),
            away_side: "New York Giants".to_string(),
            home_score,
            away_score,
            status: GameStatus::Final,
        }
    }

    #[test]
    fn test_winner_is_local_side_name() {
        let resolved = resolve_result(&fixture(), &game(21, 6), SideAlignment::Parallel).unwrap();
        assert_eq!(resolved.winner_side, "Washington");
        assert_eq!((resolved.home_score, resolved.away_score), (21, 6));
    }

    #[test]
    fn test_crossed_alignment_swaps_scores() {
        // Feed reported the local away side as its home side.
        let mut g = game(21, 6);
        std::mem::swap(&mut g.home_side, &mut g.away_side);
        let resolved = resolve_result(&fixture(), &g, SideAlignment::Crossed).unwrap();
        assert_eq!((resolved.home_score, resolved.away_score), (6, 21));
        assert_eq!(resolved.winner_side, "NY Giants");
    }

    #[test]
    fn test_tie_is_rejected() {
        let err = resolve_result(&fixture(), &game(17, 17), SideAlignment::Parallel).unwrap_err();
        assert!(matches!(err, ReconcileError::TiedFinalScore { score: 17, .. }));
    }
}
