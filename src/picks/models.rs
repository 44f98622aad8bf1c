use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Participant {
    pub id: Uuid,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// A participant's declared projected-winner choice for one fixture.
///
/// `username` is joined in for log and report output.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Pick {
    pub id: Uuid,
    pub participant_id: Uuid,
    pub username: String,
    pub fixture_id: Uuid,
    pub chosen_side: String,
}
