use sqlx::migrate::MigrateError;
use thiserror::Error;

/// Top-level error type for the entire application
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Results feed error: {0}")]
    Feed(#[from] FeedError),

    #[error("Reconciliation error: {0}")]
    Reconcile(#[from] ReconcileError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Errors from the external results provider boundary.
///
/// Everything here is transient from the orchestrator's point of view: the
/// round is left unreconciled and retried on the next scheduled tick.
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Request failed: {0}")]
    Http(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Provider returned status {0}")]
    Status(u16),

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),
}

/// Per-record reconciliation errors. These never abort a round; the
/// offending record is skipped and reported in the round summary.
#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("No local fixture matches {away} @ {home} in round {round}")]
    NoMatch {
        round: i32,
        home: String,
        away: String,
    },

    #[error("{candidates} fixtures match {away} @ {home} in round {round}, refusing to guess")]
    AmbiguousMatch {
        round: i32,
        home: String,
        away: String,
        candidates: usize,
    },

    #[error("Tied final score {score}-{score} for {away} @ {home}, winner not determinable")]
    TiedFinalScore {
        home: String,
        away: String,
        score: i32,
    },

    #[error("Fixture {fixture_id} already completed with a different result")]
    ResultConflict { fixture_id: uuid::Uuid },
}

impl From<reqwest::Error> for FeedError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            FeedError::Timeout
        } else if error.is_decode() {
            FeedError::MalformedPayload(error.to_string())
        } else {
            FeedError::Http(error.to_string())
        }
    }
}

impl From<MigrateError> for AppError {
    fn from(error: MigrateError) -> Self {
        AppError::Internal(format!("Migration error: {:?}", error))
    }
}

/// Result type alias for the application
pub type AppResult<T> = Result<T, AppError>;
