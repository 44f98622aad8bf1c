use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database_url: String,
    pub feed_base_url: String,
    /// Bound on every results-provider request, in seconds.
    pub feed_timeout_secs: u64,
    pub season: SeasonConfig,
    pub scheduler: SchedulerConfig,
}

/// Season calendar parameters used to derive the active round.
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct SeasonConfig {
    pub year: i32,
    pub start: NaiveDate,
    pub total_rounds: i32,
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct SchedulerConfig {
    /// Interval between current-round reconciliations, in seconds.
    pub current_interval_secs: u64,
    /// UTC hour for the daily all-incomplete-rounds sweep (0-23).
    pub sweep_hour: u32,
    /// Pause after a failed tick before resuming the cadence, in seconds.
    pub error_backoff_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let start_raw = std::env::var("SEASON_START").unwrap_or_else(|_| "2025-09-04".to_string());
        let start = NaiveDate::parse_from_str(&start_raw, "%Y-%m-%d").map_err(|e| {
            config::ConfigError::Message(format!("SEASON_START '{}' is not a date: {}", start_raw, e))
        })?;

        Ok(Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgresql://localhost/pickem".to_string()),
            feed_base_url: std::env::var("FEED_BASE_URL").unwrap_or_else(|_| {
                "https://site.api.espn.com/apis/site/v2/sports/football/nfl".to_string()
            }),
            feed_timeout_secs: env_parse("FEED_TIMEOUT_SECS", 30)?,
            season: SeasonConfig {
                year: env_parse("SEASON_YEAR", 2025)?,
                start,
                total_rounds: env_parse("SEASON_TOTAL_ROUNDS", 18)?,
            },
            scheduler: SchedulerConfig {
                current_interval_secs: env_parse("VALIDATE_INTERVAL_SECS", 30 * 60)?,
                sweep_hour: env_parse("SWEEP_HOUR_UTC", 2)?,
                error_backoff_secs: env_parse("ERROR_BACKOFF_SECS", 5 * 60)?,
            },
        })
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> Result<T, config::ConfigError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| config::ConfigError::Message(format!("{} '{}' invalid: {}", key, raw, e))),
        Err(_) => Ok(default),
    }
}
