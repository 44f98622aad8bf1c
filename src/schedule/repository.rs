use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::models::Fixture;
use super::ScheduleStore;
use crate::error::AppResult;

/// Postgres-backed schedule store.
pub struct ScheduleRepository {
    pool: PgPool,
}

impl ScheduleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ScheduleStore for ScheduleRepository {
    async fn list_fixtures(&self, round: i32) -> AppResult<Vec<Fixture>> {
        let fixtures = sqlx::query_as::<_, Fixture>(
            r#"
            SELECT id, round, home_side, away_side, kickoff,
                   completed, home_score, away_score, winner_side
            FROM fixtures
            WHERE round = $1
            ORDER BY kickoff NULLS LAST, home_side
            "#,
        )
        .bind(round)
        .fetch_all(&self.pool)
        .await?;

        Ok(fixtures)
    }

    async fn list_incomplete_rounds(&self, max_round: i32) -> AppResult<Vec<i32>> {
        let rounds: Vec<(i32,)> = sqlx::query_as(
            r#"
            SELECT DISTINCT round
            FROM fixtures
            WHERE completed = FALSE AND round <= $1
            ORDER BY round
            "#,
        )
        .bind(max_round)
        .fetch_all(&self.pool)
        .await?;

        Ok(rounds.into_iter().map(|(round,)| round).collect())
    }

    async fn set_fixture_result(
        &self,
        fixture_id: Uuid,
        home_score: i32,
        away_score: i32,
        winner_side: &str,
    ) -> AppResult<bool> {
        // Guarded on the completion flag so a concurrent or repeated apply
        // cannot mutate an already-final fixture.
        let result = sqlx::query(
            r#"
            UPDATE fixtures
            SET completed = TRUE, home_score = $2, away_score = $3, winner_side = $4
            WHERE id = $1 AND completed = FALSE
            "#,
        )
        .bind(fixture_id)
        .bind(home_score)
        .bind(away_score)
        .bind(winner_side)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
