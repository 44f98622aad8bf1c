use uuid::Uuid;

use crate::picks::Pick;
use crate::schedule::Fixture;

/// One pick graded against its completed fixture. Consumed by the
/// eligibility ledger; carries everything needed for usage accounting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradedPick {
    pub participant_id: Uuid,
    pub username: String,
    pub pick_id: Uuid,
    pub fixture_id: Uuid,
    pub round: i32,
    pub chosen_side: String,
    pub opposing_side: String,
    pub correct: bool,
    pub points: i32,
}

/// Grade every pick on a completed fixture.
///
/// Pure: correctness and points are derived from the fixture's declared
/// winner each time, never accumulated, so re-grading is harmless.
/// Incomplete fixtures and picks naming a side the fixture doesn't have
/// grade to nothing.
pub fn grade_fixture(fixture: &Fixture, picks: &[Pick]) -> Vec<GradedPick> {
    let winner = match (&fixture.winner_side, fixture.completed) {
        (Some(winner), true) => winner.as_str(),
        _ => return Vec::new(),
    };

    picks
        .iter()
        .filter_map(|pick| {
            let opposing_side = fixture.opposing_side(&pick.chosen_side)?;
            let correct = pick.chosen_side == winner;
            Some(GradedPick {
                participant_id: pick.participant_id,
                username: pick.username.clone(),
                pick_id: pick.id,
                fixture_id: fixture.id,
                round: fixture.round,
                chosen_side: pick.chosen_side.clone(),
                opposing_side: opposing_side.to_string(),
                correct,
                points: if correct { 1 } else { 0 },
            })
        })
        .collect()
}
