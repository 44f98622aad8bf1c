use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

/// A single scheduled contest between two sides.
///
/// Invariant: once `completed` is true, `winner_side` and both scores are
/// non-null and never change again. The repository's guarded write enforces
/// this; re-applying the identical final result is a no-op.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Fixture {
    pub id: Uuid,
    pub round: i32,
    pub home_side: String,
    pub away_side: String,
    pub kickoff: Option<DateTime<Utc>>,
    pub completed: bool,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
    pub winner_side: Option<String>,
}

impl Fixture {
    /// The side a pick implicitly spends as its loser-pick.
    ///
    /// Returns `None` if `chosen` is neither side of this fixture.
    pub fn opposing_side(&self, chosen: &str) -> Option<&str> {
        if chosen == self.home_side {
            Some(&self.away_side)
        } else if chosen == self.away_side {
            Some(&self.home_side)
        } else {
            None
        }
    }

    pub fn has_result(&self, home_score: i32, away_score: i32, winner_side: &str) -> bool {
        self.completed
            && self.home_score == Some(home_score)
            && self.away_score == Some(away_score)
            && self.winner_side.as_deref() == Some(winner_side)
    }

    /// Away-at-home display form used in logs.
    pub fn label(&self) -> String {
        format!("{} @ {}", self.away_side, self.home_side)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn test_opposing_side() {
        let f = fixture();
        assert_eq!(f.opposing_side("Washington"), Some("NY Giants"));
        assert_eq!(f.opposing_side("NY Giants"), Some("Washington"));
        assert_eq!(f.opposing_side("Dallas"), None);
    }

    #[test]
    fn test_has_result_requires_completion() {
        let mut f = fixture();
        assert!(!f.has_result(21, 6, "Washington"));

        f.completed = true;
        f.home_score = Some(21);
        f.away_score = Some(6);
        f.winner_side = Some("Washington".to_string());
        assert!(f.has_result(21, 6, "Washington"));
        assert!(!f.has_result(21, 6, "NY Giants"));
        assert!(!f.has_result(6, 21, "Washington"));
    }
}
