use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use super::grader;
use super::matcher::{self, MatchOutcome};
use super::updater::{self, UpdateOutcome};
use crate::config::SeasonConfig;
use crate::error::{AppResult, ReconcileError};
use crate::feed::ResultsProvider;
use crate::ledger::{EligibilityLedger, LedgerSummary};
use crate::picks::PickStore;
use crate::schedule::{Fixture, ScheduleStore};

/// Outcome of one round's reconciliation. Per-record problems land in
/// `errors`; they never abort the rest of the round.
#[derive(Debug, Clone)]
pub struct RoundSummary {
    pub round: i32,
    pub fixtures_updated: usize,
    pub graded_picks: usize,
    pub ledger: LedgerSummary,
    pub errors: Vec<String>,
}

impl RoundSummary {
    fn new(round: i32) -> Self {
        Self {
            round,
            fixtures_updated: 0,
            graded_picks: 0,
            ledger: LedgerSummary::default(),
            errors: Vec::new(),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Aggregate of a season-wide sweep. `success` is false if any round
/// failed outright or finished with per-record errors.
#[derive(Debug, Clone, Default)]
pub struct SeasonSummary {
    pub rounds: Vec<RoundSummary>,
    pub success: bool,
}

impl SeasonSummary {
    pub fn fixtures_updated(&self) -> usize {
        self.rounds.iter().map(|r| r.fixtures_updated).sum()
    }
}

/// The round a given instant falls in, `None` before the season starts.
/// Rounds are week-long and clamp to the season's final round.
pub fn current_round(now: DateTime<Utc>, season: &SeasonConfig) -> Option<i32> {
    let days = (now.date_naive() - season.start).num_days();
    if days < 0 {
        return None;
    }
    let round = days / 7 + 1;
    Some(round.min(season.total_rounds as i64).max(1) as i32)
}

/// Drives one reconciliation pass end to end: fetch external results,
/// match them to local fixtures, persist newly-final outcomes, then grade
/// picks and feed the eligibility ledger for whatever newly completed.
pub struct ReconcileOrchestrator {
    schedule: Arc<dyn ScheduleStore>,
    picks: Arc<dyn PickStore>,
    ledger: EligibilityLedger,
    provider: Arc<dyn ResultsProvider>,
    season: SeasonConfig,
}

impl ReconcileOrchestrator {
    pub fn new(
        schedule: Arc<dyn ScheduleStore>,
        picks: Arc<dyn PickStore>,
        ledger: EligibilityLedger,
        provider: Arc<dyn ResultsProvider>,
        season: SeasonConfig,
    ) -> Self {
        Self {
            schedule,
            picks,
            ledger,
            provider,
            season,
        }
    }

    pub async fn reconcile_round(&self, round: i32) -> AppResult<RoundSummary> {
        info!("Reconciling round {}", round);

        let results = self.provider.fetch_round_results(round, self.season.year).await?;
        let fixtures = self.schedule.list_fixtures(round).await?;

        let mut summary = RoundSummary::new(round);
        let mut newly_completed: Vec<Fixture> = Vec::new();

        for game in results.iter().filter(|g| g.is_final()) {
            match matcher::match_fixture(game, &fixtures) {
                MatchOutcome::Matched {
                    fixture_id,
                    alignment,
                } => {
                    let Some(fixture) = fixtures.iter().find(|f| f.id == fixture_id) else {
                        continue;
                    };
                    match updater::apply_result(self.schedule.as_ref(), fixture, game, alignment)
                        .await
                    {
                        Ok(UpdateOutcome::Updated(completed)) => {
                            let home = completed.home_score.unwrap_or(0);
                            let away = completed.away_score.unwrap_or(0);
                            info!(
                                "Updated {}: {} {} - {}",
                                completed.label(),
                                completed.winner_side.as_deref().unwrap_or(""),
                                home.max(away),
                                home.min(away),
                            );
                            summary.fixtures_updated += 1;
                            newly_completed.push(completed);
                        }
                        Ok(UpdateOutcome::Unchanged) => {}
                        // Fixture-level isolation: one bad write or tied
                        // score leaves the rest of the batch running.
                        Err(e) => {
                            warn!("Skipping {} in round {}: {}", fixture.label(), round, e);
                            summary.errors.push(e.to_string());
                        }
                    }
                }
                MatchOutcome::Ambiguous { candidates } => {
                    let e = ReconcileError::AmbiguousMatch {
                        round,
                        home: game.home_side.clone(),
                        away: game.away_side.clone(),
                        candidates,
                    };
                    warn!("{}", e);
                    summary.errors.push(e.to_string());
                }
                MatchOutcome::NotFound => {
                    let e = ReconcileError::NoMatch {
                        round,
                        home: game.home_side.clone(),
                        away: game.away_side.clone(),
                    };
                    warn!("{}", e);
                    summary.errors.push(e.to_string());
                }
            }
        }

        for fixture in &newly_completed {
            match self.grade_and_apply(fixture).await {
                Ok((graded, ledger)) => {
                    summary.graded_picks += graded;
                    summary.ledger.loser_spends += ledger.loser_spends;
                    summary.ledger.winner_increments += ledger.winner_increments;
                    summary.ledger.eliminations += ledger.eliminations;
                }
                Err(e) => {
                    warn!("Grading failed for {}: {}", fixture.label(), e);
                    summary.errors.push(e.to_string());
                }
            }
        }

        if summary.fixtures_updated > 0 {
            info!(
                "Round {} reconciled: {} fixtures updated, {} picks graded, {} eliminations",
                round, summary.fixtures_updated, summary.graded_picks, summary.ledger.eliminations
            );
        } else {
            info!("No new completed games found for round {}", round);
        }

        Ok(summary)
    }

    /// Reconcile the round the wall clock currently falls in, or do
    /// nothing before the season starts.
    pub async fn reconcile_current_round(&self) -> AppResult<Option<RoundSummary>> {
        match current_round(Utc::now(), &self.season) {
            Some(round) => Ok(Some(self.reconcile_round(round).await?)),
            None => {
                info!("Season has not started yet, nothing to reconcile");
                Ok(None)
            }
        }
    }

    /// Sweep every round that still has incomplete fixtures. A failed
    /// round is logged and skipped; the sweep continues.
    pub async fn reconcile_all_incomplete_rounds(&self) -> AppResult<SeasonSummary> {
        let rounds = self
            .schedule
            .list_incomplete_rounds(self.season.total_rounds)
            .await?;

        let mut season = SeasonSummary {
            rounds: Vec::new(),
            success: true,
        };

        for round in rounds {
            match self.reconcile_round(round).await {
                Ok(summary) => {
                    if !summary.is_clean() {
                        season.success = false;
                    }
                    season.rounds.push(summary);
                }
                Err(e) => {
                    error!("Round {} reconciliation failed: {}", round, e);
                    season.success = false;
                }
            }
        }

        Ok(season)
    }

    async fn grade_and_apply(&self, fixture: &Fixture) -> AppResult<(usize, LedgerSummary)> {
        let picks = self.picks.list_picks_for_fixture(fixture.id).await?;
        let graded = grader::grade_fixture(fixture, &picks);

        if graded.len() != picks.len() {
            warn!(
                "{} of {} picks on {} name a side the fixture does not have",
                picks.len() - graded.len(),
                picks.len(),
                fixture.label()
            );
        }

        for pick in &graded {
            info!(
                "{}: {} -> {} ({} points)",
                pick.username,
                pick.chosen_side,
                if pick.correct { "correct" } else { "incorrect" },
                pick.points
            );
        }

        let ledger = self.ledger.apply(&graded).await?;
        Ok((graded.len(), ledger))
    }
}
