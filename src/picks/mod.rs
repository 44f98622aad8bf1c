pub mod models;
pub mod repository;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppResult;
pub use models::{Participant, Pick};
pub use repository::PickRepository;

/// Read-only access to submitted picks.
///
/// Picks are created by the submission layer before kickoff; the
/// reconciliation core never mutates them.
#[async_trait]
pub trait PickStore: Send + Sync {
    async fn list_picks_for_fixture(&self, fixture_id: Uuid) -> AppResult<Vec<Pick>>;

    async fn list_participants(&self) -> AppResult<Vec<Participant>>;
}
