pub mod client;
pub mod models;

use async_trait::async_trait;

use crate::error::AppResult;
pub use client::ScoreboardClient;
pub use models::{GameResult, GameStatus};

/// External provider of authoritative game outcomes.
///
/// Implementations must bound every request; a hung provider call would
/// stall the whole reconciliation tick.
#[async_trait]
pub trait ResultsProvider: Send + Sync {
    /// All games the provider knows for a round, final or not. Callers
    /// filter on [`GameResult::is_final`] before matching.
    async fn fetch_round_results(&self, round: i32, season: i32) -> AppResult<Vec<GameResult>>;
}
