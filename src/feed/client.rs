use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use reqwest::Client;
use tracing::{info, warn};

use super::models::{GameResult, RawScoreboard};
use super::ResultsProvider;
use crate::error::{AppResult, FeedError};

/// How long a fetched round stays good for. Season-wide sweeps hit many
/// rounds back to back; the cache keeps re-runs from hammering the feed.
const CACHE_TTL_SECS: i64 = 60;

/// HTTP results provider speaking the scoreboard API dialect.
pub struct ScoreboardClient {
    client: Client,
    base_url: String,
    cache: RwLock<HashMap<(i32, i32), (Vec<GameResult>, DateTime<Utc>)>>,
}

impl ScoreboardClient {
    pub fn new(base_url: String, timeout_secs: u64) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(FeedError::from)?;

        Ok(Self {
            client,
            base_url,
            cache: RwLock::new(HashMap::new()),
        })
    }

    fn cached(&self, round: i32, season: i32) -> Option<Vec<GameResult>> {
        let cache = self.cache.read();
        let (results, fetched_at) = cache.get(&(season, round))?;
        let age = Utc::now().signed_duration_since(*fetched_at);
        if age.num_seconds() < CACHE_TTL_SECS {
            Some(results.clone())
        } else {
            None
        }
    }
}

#[async_trait]
impl ResultsProvider for ScoreboardClient {
    async fn fetch_round_results(&self, round: i32, season: i32) -> AppResult<Vec<GameResult>> {
        if let Some(results) = self.cached(round, season) {
            return Ok(results);
        }

        let url = format!("{}/scoreboard", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("seasontype", "2".to_string()),
                ("week", round.to_string()),
                ("year", season.to_string()),
            ])
            .send()
            .await
            .map_err(FeedError::from)?;

        if !response.status().is_success() {
            return Err(FeedError::Status(response.status().as_u16()).into());
        }

        let scoreboard: RawScoreboard = response.json().await.map_err(FeedError::from)?;

        let mut results = Vec::with_capacity(scoreboard.events.len());
        for event in scoreboard.events {
            match GameResult::from_event(event) {
                Ok(game) => results.push(game),
                // One bad record must not sink the round; skip it here at
                // the boundary.
                Err(reason) => warn!("Skipping malformed feed event for round {}: {}", round, reason),
            }
        }

        info!(
            "Fetched {} game records for round {} ({})",
            results.len(),
            round,
            season
        );

        self.cache
            .write()
            .insert((season, round), (results.clone(), Utc::now()));

        Ok(results)
    }
}
