use std::sync::Arc;
use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::info;

use crate::config::Config;
use crate::error::AppResult;
use crate::feed::{ResultsProvider, ScoreboardClient};
use crate::ledger::{EligibilityLedger, LedgerRepository, LedgerStore};
use crate::picks::{PickRepository, PickStore};
use crate::reconcile::ReconcileOrchestrator;
use crate::schedule::{ScheduleRepository, ScheduleStore};

pub struct AppContext {
    pub orchestrator: Arc<ReconcileOrchestrator>,
    pub picks: Arc<dyn PickStore>,
    pub ledger: Arc<dyn LedgerStore>,
}

pub async fn initialize(config: &Config) -> AppResult<AppContext> {
    info!("Initializing application components ...");

    let pool = initialize_database(&config.database_url).await?;

    let schedule: Arc<dyn ScheduleStore> = Arc::new(ScheduleRepository::new(pool.clone()));
    let picks: Arc<dyn PickStore> = Arc::new(PickRepository::new(pool.clone()));
    let ledger: Arc<dyn LedgerStore> = Arc::new(LedgerRepository::new(pool));

    let provider: Arc<dyn ResultsProvider> = Arc::new(ScoreboardClient::new(
        config.feed_base_url.clone(),
        config.feed_timeout_secs,
    )?);
    info!("Results provider initialized: {}", config.feed_base_url);

    let orchestrator = Arc::new(ReconcileOrchestrator::new(
        schedule,
        picks.clone(),
        EligibilityLedger::new(ledger.clone()),
        provider,
        config.season,
    ));

    Ok(AppContext {
        orchestrator,
        picks,
        ledger,
    })
}

async fn initialize_database(database_url: &str) -> AppResult<PgPool> {
    info!("Connecting to database...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(30))
        .connect(database_url)
        .await?;

    info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;

    info!("Database initialized");
    Ok(pool)
}
