use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::models::{Elimination, EliminationKind, LoserUsage, UsageIncrement, WinnerUsage};
use super::LedgerStore;
use crate::error::AppResult;

/// Postgres-backed ledger store.
pub struct LedgerRepository {
    pool: PgPool,
}

impl LedgerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LedgerStore for LedgerRepository {
    async fn get_winner_usage(&self, participant_id: Uuid, team: &str) -> AppResult<i32> {
        let count: Option<i32> = sqlx::query_scalar(
            r#"
            SELECT usage_count FROM winner_usage
            WHERE participant_id = $1 AND team = $2
            "#,
        )
        .bind(participant_id)
        .bind(team)
        .fetch_optional(&self.pool)
        .await?;

        Ok(count.unwrap_or(0))
    }

    async fn increment_winner_usage(
        &self,
        participant_id: Uuid,
        team: &str,
        fixture_id: Uuid,
    ) -> AppResult<UsageIncrement> {
        let mut tx = self.pool.begin().await?;

        // The attribution marker decides whether this fixture has been
        // counted; marker insert and counter bump commit or roll back as one.
        let marked = sqlx::query(
            r#"
            INSERT INTO winner_usage_marks (participant_id, fixture_id, team)
            VALUES ($1, $2, $3)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(participant_id)
        .bind(fixture_id)
        .bind(team)
        .execute(&mut *tx)
        .await?
        .rows_affected()
            > 0;

        let count: i32 = if marked {
            sqlx::query_scalar(
                r#"
                INSERT INTO winner_usage (participant_id, team, usage_count)
                VALUES ($1, $2, 1)
                ON CONFLICT (participant_id, team)
                DO UPDATE SET usage_count = winner_usage.usage_count + 1
                RETURNING usage_count
                "#,
            )
            .bind(participant_id)
            .bind(team)
            .fetch_one(&mut *tx)
            .await?
        } else {
            sqlx::query_scalar(
                r#"
                SELECT usage_count FROM winner_usage
                WHERE participant_id = $1 AND team = $2
                "#,
            )
            .bind(participant_id)
            .bind(team)
            .fetch_optional(&mut *tx)
            .await?
            .unwrap_or(0)
        };

        tx.commit().await?;

        Ok(UsageIncrement {
            applied: marked,
            count,
        })
    }

    async fn record_loser_usage(
        &self,
        participant_id: Uuid,
        team: &str,
        round: i32,
        fixture_id: Uuid,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO loser_usage (participant_id, team, round, fixture_id)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(participant_id)
        .bind(team)
        .bind(round)
        .bind(fixture_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn record_elimination(
        &self,
        participant_id: Uuid,
        team: &str,
        kind: EliminationKind,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO eliminations (participant_id, team, kind)
            VALUES ($1, $2, $3)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(participant_id)
        .bind(team)
        .bind(kind)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_eliminations(&self, participant_id: Uuid) -> AppResult<Vec<Elimination>> {
        let eliminations = sqlx::query_as::<_, Elimination>(
            r#"
            SELECT participant_id, team, kind, created_at
            FROM eliminations
            WHERE participant_id = $1
            ORDER BY created_at, team
            "#,
        )
        .bind(participant_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(eliminations)
    }

    async fn list_winner_usage(&self, participant_id: Uuid) -> AppResult<Vec<WinnerUsage>> {
        let usage = sqlx::query_as::<_, WinnerUsage>(
            r#"
            SELECT participant_id, team, usage_count
            FROM winner_usage
            WHERE participant_id = $1
            ORDER BY team
            "#,
        )
        .bind(participant_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(usage)
    }

    async fn list_loser_usage(&self, participant_id: Uuid) -> AppResult<Vec<LoserUsage>> {
        let usage = sqlx::query_as::<_, LoserUsage>(
            r#"
            SELECT participant_id, team, round, fixture_id
            FROM loser_usage
            WHERE participant_id = $1
            ORDER BY round, team
            "#,
        )
        .bind(participant_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(usage)
    }
}
