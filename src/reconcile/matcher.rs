use uuid::Uuid;

use crate::feed::GameResult;
use crate::schedule::Fixture;

/// How the external record's sides line up with the local fixture's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideAlignment {
    /// External home is the local home side.
    Parallel,
    /// External home is the local away side.
    Crossed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    Matched {
        fixture_id: Uuid,
        alignment: SideAlignment,
    },
    /// More than one incomplete fixture satisfied fuzzy matching; the
    /// record is reported rather than guessed at.
    Ambiguous { candidates: usize },
    NotFound,
}

/// Map an external game record onto one of the round's local fixtures.
///
/// Exact pair equality is tried first, in either orientation, against every
/// fixture. Fuzzy matching then considers only fixtures not yet completed
/// locally; completed fixtures are stable and never re-matched loosely.
pub fn match_fixture(game: &GameResult, fixtures: &[Fixture]) -> MatchOutcome {
    for fixture in fixtures {
        if fixture.home_side == game.home_side && fixture.away_side == game.away_side {
            return MatchOutcome::Matched {
                fixture_id: fixture.id,
                alignment: SideAlignment::Parallel,
            };
        }
        if fixture.home_side == game.away_side && fixture.away_side == game.home_side {
            return MatchOutcome::Matched {
                fixture_id: fixture.id,
                alignment: SideAlignment::Crossed,
            };
        }
    }

    let mut candidates: Vec<(Uuid, SideAlignment)> = Vec::new();
    for fixture in fixtures.iter().filter(|f| !f.completed) {
        if sides_match(&fixture.home_side, &game.home_side)
            && sides_match(&fixture.away_side, &game.away_side)
        {
            candidates.push((fixture.id, SideAlignment::Parallel));
        } else if sides_match(&fixture.home_side, &game.away_side)
            && sides_match(&fixture.away_side, &game.home_side)
        {
            candidates.push((fixture.id, SideAlignment::Crossed));
        }
    }

    match candidates.len() {
        0 => MatchOutcome::NotFound,
        1 => {
            let (fixture_id, alignment) = candidates[0];
            MatchOutcome::Matched {
                fixture_id,
                alignment,
            }
        }
        n => MatchOutcome::Ambiguous { candidates: n },
    }
}

/// Loose side-name equivalence across feed/local naming drift.
///
/// Either name containing the other covers "Washington" vs "Washington
/// Commanders"; equal trailing tokens cover abbreviated city forms like
/// "NY Giants" vs "New York Giants", where neither contains the other.
fn sides_match(local: &str, external: &str) -> bool {
    let local = local.trim().to_lowercase();
    let external = external.trim().to_lowercase();
    if local.is_empty() || external.is_empty() {
        return false;
    }
    if local.contains(&external) || external.contains(&local) {
        return true;
    }
    match (nickname(&local), nickname(&external)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

fn nickname(name: &str) -> Option<&str> {
    name.split_whitespace().last()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::GameStatus;

    fn fixture(home: &str, away: &str, completed: bool) -> Fixture {
        Fixture {
            id: Uuid::new_v4(),
            round: 1,
            home_side: home.to_string(),
            away_side: away.to_string(),
            kickoff: None,
            completed,
            home_score: None,
            away_score: None,
            winner_side: None,
        }
    }

    fn final_game(home: &str, away: &str) -> GameResult {
        GameResult {
            home_side: home.to_string(),
            away_side: away.to_string(),
            home_score: 21,
            away_score: 6,
            status: GameStatus::Final,
        }
    }

    #[test]
    fn test_exact_match_parallel() {
        let fixtures = vec![fixture("Washington", "NY Giants", false)];
        let outcome = match_fixture(&final_game("Washington", "NY Giants"), &fixtures);
        assert_eq!(
            outcome,
            MatchOutcome::Matched {
                fixture_id: fixtures[0].id,
                alignment: SideAlignment::Parallel,
            }
        );
    }

    #[test]
    fn test_exact_match_crossed_orientation() {
        let fixtures = vec![fixture("Washington", "NY Giants", false)];
        let outcome = match_fixture(&final_game("NY Giants", "Washington"), &fixtures);
        assert_eq!(
            outcome,
            MatchOutcome::Matched {
                fixture_id: fixtures[0].id,
                alignment: SideAlignment::Crossed,
            }
        );
    }

    #[test]
    fn test_fuzzy_match_tolerates_name_drift() {
        // Local schedule uses short names, the feed uses full franchise names.
        let fixtures = vec![
            fixture("Washington", "NY Giants", false),
            fixture("Dallas Cowboys", "Philadelphia Eagles", false),
        ];
        let outcome = match_fixture(
            &final_game("Washington Commanders", "New York Giants"),
            &fixtures,
        );
        assert_eq!(
            outcome,
            MatchOutcome::Matched {
                fixture_id: fixtures[0].id,
                alignment: SideAlignment::Parallel,
            }
        );
    }

    #[test]
    fn test_fuzzy_skips_completed_fixtures() {
        let fixtures = vec![fixture("Washington", "NY Giants", true)];
        let outcome = match_fixture(
            &final_game("Washington Commanders", "New York Giants"),
            &fixtures,
        );
        assert_eq!(outcome, MatchOutcome::NotFound);
    }

    #[test]
    fn test_exact_match_still_hits_completed_fixtures() {
        let fixtures = vec![fixture("Washington", "NY Giants", true)];
        let outcome = match_fixture(&final_game("Washington", "NY Giants"), &fixtures);
        assert!(matches!(outcome, MatchOutcome::Matched { .. }));
    }

    #[test]
    fn test_ambiguous_is_reported_not_guessed() {
        let fixtures = vec![
            fixture("New York Giants", "Dallas Cowboys", false),
            fixture("New York Jets", "Dallas Cowboys", false),
        ];
        // "New York" matches both local New York sides by containment.
        let outcome = match_fixture(&final_game("New York", "Dallas Cowboys"), &fixtures);
        assert_eq!(outcome, MatchOutcome::Ambiguous { candidates: 2 });
    }

    #[test]
    fn test_unknown_pairing_is_not_found() {
        let fixtures = vec![fixture("Washington", "NY Giants", false)];
        let outcome = match_fixture(&final_game("Chicago Bears", "Green Bay Packers"), &fixtures);
        assert_eq!(outcome, MatchOutcome::NotFound);
    }

    #[test]
    fn test_sides_match_rules() {
        assert!(sides_match("Washington", "Washington Commanders"));
        assert!(sides_match("NY Giants", "New York Giants"));
        assert!(sides_match("washington", "WASHINGTON"));
        assert!(!sides_match("NY Giants", "New York Jets"));
        assert!(!sides_match("", "New York Giants"));
    }
}
