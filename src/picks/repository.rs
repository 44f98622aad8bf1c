use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::models::{Participant, Pick};
use super::PickStore;
use crate::error::AppResult;

/// Postgres-backed pick store.
pub struct PickRepository {
    pool: PgPool,
}

impl PickRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PickStore for PickRepository {
    async fn list_picks_for_fixture(&self, fixture_id: Uuid) -> AppResult<Vec<Pick>> {
        let picks = sqlx::query_as::<_, Pick>(
            r#"
            SELECT p.id, p.participant_id, u.username, p.fixture_id, p.chosen_side
            FROM picks p
            JOIN participants u ON u.id = p.participant_id
            WHERE p.fixture_id = $1
            ORDER BY u.username
            "#,
        )
        .bind(fixture_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(picks)
    }

    async fn list_participants(&self) -> AppResult<Vec<Participant>> {
        let participants = sqlx::query_as::<_, Participant>(
            r#"
            SELECT id, username, created_at
            FROM participants
            ORDER BY username
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(participants)
    }
}
