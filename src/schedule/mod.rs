pub mod models;
pub mod repository;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppResult;
pub use models::Fixture;
pub use repository::ScheduleRepository;

/// Read/write access to locally scheduled fixtures.
///
/// The reconciliation core is the only writer; fixtures are created by the
/// schedule-import tooling, which is outside this service.
#[async_trait]
pub trait ScheduleStore: Send + Sync {
    /// All fixtures scheduled for a round, completed ones included.
    async fn list_fixtures(&self, round: i32) -> AppResult<Vec<Fixture>>;

    /// Rounds up to `max_round` that still have at least one incomplete fixture.
    async fn list_incomplete_rounds(&self, max_round: i32) -> AppResult<Vec<i32>>;

    /// Persist a final result in a single atomic write.
    ///
    /// Guarded on the completion flag: returns `true` if the fixture was
    /// completed by this call, `false` if it was already completed (the
    /// caller decides whether that is a benign re-apply or a conflict).
    async fn set_fixture_result(
        &self,
        fixture_id: Uuid,
        home_score: i32,
        away_score: i32,
        winner_side: &str,
    ) -> AppResult<bool>;
}
