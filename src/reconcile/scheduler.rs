use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, sleep, Duration, MissedTickBehavior};
use tracing::{error, info, warn};

use super::orchestrator::ReconcileOrchestrator;
use crate::config::SchedulerConfig;

/// Background validation loop.
///
/// One spawned task owns the whole cadence, so reconciliation runs are
/// serialized by construction: a slow sweep simply delays the next
/// current-round tick, it never overlaps it. Failed ticks are logged and
/// backed off; nothing escapes the loop.
pub struct ValidationScheduler {
    orchestrator: Arc<ReconcileOrchestrator>,
    config: SchedulerConfig,
}

impl ValidationScheduler {
    pub fn new(orchestrator: Arc<ReconcileOrchestrator>, config: SchedulerConfig) -> Self {
        Self {
            orchestrator,
            config,
        }
    }

    /// Start the scheduler (runs in background until `shutdown` fires).
    pub fn start(&self, shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        let orchestrator = self.orchestrator.clone();
        let config = self.config;

        tokio::spawn(async move {
            Self::run_loop(config, orchestrator, shutdown).await;
        })
    }

    async fn run_loop(
        config: SchedulerConfig,
        orchestrator: Arc<ReconcileOrchestrator>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        info!(
            "Validation scheduler started: current round every {}s, full sweep daily at {:02}:00 UTC",
            config.current_interval_secs, config.sweep_hour
        );

        let mut tick = interval(Duration::from_secs(config.current_interval_secs));
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            let now = Utc::now();
            let next_sweep = Self::calculate_next_sweep(now, config.sweep_hour);
            let until_sweep = next_sweep.signed_duration_since(now).num_seconds().max(0) as u64;

            tokio::select! {
                _ = tick.tick() => {
                    match orchestrator.reconcile_current_round().await {
                        Ok(Some(summary)) if !summary.is_clean() => {
                            warn!(
                                "Current-round reconciliation finished with {} errors",
                                summary.errors.len()
                            );
                        }
                        Ok(_) => {}
                        Err(e) => {
                            error!("Current-round reconciliation failed: {}", e);
                            sleep(Duration::from_secs(config.error_backoff_secs)).await;
                        }
                    }
                }
                _ = sleep(Duration::from_secs(until_sweep)) => {
                    info!("Starting daily sweep of incomplete rounds");
                    match orchestrator.reconcile_all_incomplete_rounds().await {
                        Ok(season) if !season.success => {
                            warn!("Daily sweep finished with failures");
                        }
                        Ok(season) => {
                            info!("Daily sweep completed: {} fixtures updated", season.fixtures_updated());
                        }
                        Err(e) => {
                            error!("Daily sweep failed: {}", e);
                            sleep(Duration::from_secs(config.error_backoff_secs)).await;
                        }
                    }
                }
                _ = shutdown.changed() => {
                    info!("Validation scheduler shutting down");
                    break;
                }
            }
        }
    }

    /// Next daily sweep instant at the configured UTC hour.
    fn calculate_next_sweep(now: DateTime<Utc>, sweep_hour: u32) -> DateTime<Utc> {
        let today = now.date_naive().and_hms_opt(sweep_hour, 0, 0).unwrap();
        let today_dt = Utc.from_utc_datetime(&today);

        // If the sweep time has passed today, schedule for tomorrow.
        if today_dt <= now {
            let tomorrow = (now.date_naive() + chrono::Duration::days(1))
                .and_hms_opt(sweep_hour, 0, 0)
                .unwrap();
            Utc.from_utc_datetime(&tomorrow)
        } else {
            today_dt
        }
    }
}
