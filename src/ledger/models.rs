use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use sqlx::Type;
use std::fmt;
use uuid::Uuid;

/// Which scarce resource an elimination exhausts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type)]
#[sqlx(type_name = "elimination_kind", rename_all = "lowercase")]
pub enum EliminationKind {
    Winner,
    Loser,
}

impl EliminationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EliminationKind::Winner => "winner",
            EliminationKind::Loser => "loser",
        }
    }
}

impl fmt::Display for EliminationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Winner-usage counter for one (participant, team) pair.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WinnerUsage {
    pub participant_id: Uuid,
    pub team: String,
    pub usage_count: i32,
}

/// Loser-spend marker. Existence alone is terminal for the team.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LoserUsage {
    pub participant_id: Uuid,
    pub team: String,
    pub round: i32,
    pub fixture_id: Uuid,
}

/// Append-only elimination fact; at most one per (participant, team, kind).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Elimination {
    pub participant_id: Uuid,
    pub team: String,
    pub kind: EliminationKind,
    pub created_at: DateTime<Utc>,
}

/// Outcome of a winner-usage increment attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageIncrement {
    /// Whether this call actually applied an increment (false when the
    /// fixture was already counted).
    pub applied: bool,
    /// Usage count after the call.
    pub count: i32,
}
