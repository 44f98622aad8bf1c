pub mod models;
pub mod repository;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use crate::error::AppResult;
use crate::reconcile::grader::GradedPick;
pub use models::{Elimination, EliminationKind, LoserUsage, UsageIncrement, WinnerUsage};
pub use repository::LedgerRepository;

/// A team may be chosen as projected winner at most this many times.
pub const WINNER_USAGE_LIMIT: i32 = 2;

/// Transactional access to the usage/elimination ledger.
///
/// THE source of truth for eligibility state. Every write is
/// insert-if-absent or marker-guarded, so each call is individually
/// idempotent and safe under re-reconciliation.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn get_winner_usage(&self, participant_id: Uuid, team: &str) -> AppResult<i32>;

    /// Increment the winner-usage counter, attributed to `fixture_id`.
    ///
    /// No-op if an increment was already applied for that fixture; the
    /// returned count is current either way.
    async fn increment_winner_usage(
        &self,
        participant_id: Uuid,
        team: &str,
        fixture_id: Uuid,
    ) -> AppResult<UsageIncrement>;

    /// Record a loser-spend. Returns `false` if it already existed.
    async fn record_loser_usage(
        &self,
        participant_id: Uuid,
        team: &str,
        round: i32,
        fixture_id: Uuid,
    ) -> AppResult<bool>;

    /// Insert-if-absent elimination fact. Returns `false` if it already existed.
    async fn record_elimination(
        &self,
        participant_id: Uuid,
        team: &str,
        kind: EliminationKind,
    ) -> AppResult<bool>;

    async fn list_eliminations(&self, participant_id: Uuid) -> AppResult<Vec<Elimination>>;

    async fn list_winner_usage(&self, participant_id: Uuid) -> AppResult<Vec<WinnerUsage>>;

    async fn list_loser_usage(&self, participant_id: Uuid) -> AppResult<Vec<LoserUsage>>;
}

/// Totals for one ledger application pass. Only newly created state is
/// counted, so a re-run over the same grading output reports all zeros.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LedgerSummary {
    pub loser_spends: usize,
    pub winner_increments: usize,
    pub eliminations: usize,
}

/// Applies grading output to the usage ledgers and derives eliminations.
///
/// Eliminations are choice-based: every pick spends the opposing side as a
/// loser-pick and counts one winner-use of the chosen side, no matter how
/// the game actually ended. Results affect points only.
pub struct EligibilityLedger {
    store: Arc<dyn LedgerStore>,
}

impl EligibilityLedger {
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store }
    }

    pub async fn apply(&self, graded: &[GradedPick]) -> AppResult<LedgerSummary> {
        let mut summary = LedgerSummary::default();

        for pick in graded {
            // Loser-spend: the opposing side is discarded regardless of the
            // pick's correctness, and a single spend is terminal.
            let spent = self
                .store
                .record_loser_usage(
                    pick.participant_id,
                    &pick.opposing_side,
                    pick.round,
                    pick.fixture_id,
                )
                .await?;
            if spent {
                summary.loser_spends += 1;
            }

            if self
                .store
                .record_elimination(pick.participant_id, &pick.opposing_side, EliminationKind::Loser)
                .await?
            {
                info!(
                    "Eliminated {} as loser for {}",
                    pick.opposing_side, pick.username
                );
                summary.eliminations += 1;
            }

            // Winner-usage: at most one increment per fixture, capped at the
            // usage limit across the season.
            let usage = self
                .store
                .increment_winner_usage(pick.participant_id, &pick.chosen_side, pick.fixture_id)
                .await?;
            if usage.applied {
                summary.winner_increments += 1;
            }

            if usage.count >= WINNER_USAGE_LIMIT
                && self
                    .store
                    .record_elimination(pick.participant_id, &pick.chosen_side, EliminationKind::Winner)
                    .await?
            {
                info!(
                    "Eliminated {} as winner for {} ({}x usage limit)",
                    pick.chosen_side, pick.username, WINNER_USAGE_LIMIT
                );
                summary.eliminations += 1;
            }
        }

        Ok(summary)
    }
}

/// In-memory ledger store used by the module tests and the orchestrator
/// tests; mirrors the repository's insert-if-absent semantics.
#[cfg(test)]
pub mod testing {
    use std::collections::{HashMap, HashSet};

    use async_trait::async_trait;
    use chrono::Utc;
    use parking_lot::Mutex;
    use uuid::Uuid;

    use super::models::{Elimination, EliminationKind, LoserUsage, UsageIncrement, WinnerUsage};
    use super::LedgerStore;
    use crate::error::AppResult;

    #[derive(Default)]
    pub struct MemLedgerStore {
        usage: Mutex<HashMap<(Uuid, String), i32>>,
        marks: Mutex<HashSet<(Uuid, Uuid)>>,
        losers: Mutex<HashSet<(Uuid, String, i32)>>,
        eliminations: Mutex<Vec<(Uuid, String, EliminationKind)>>,
    }

    #[async_trait]
    impl LedgerStore for MemLedgerStore {
        async fn get_winner_usage(&self, participant_id: Uuid, team: &str) -> AppResult<i32> {
            Ok(*self
                .usage
                .lock()
                .get(&(participant_id, team.to_string()))
                .unwrap_or(&0))
        }

        async fn increment_winner_usage(
            &self,
            participant_id: Uuid,
            team: &str,
            fixture_id: Uuid,
        ) -> AppResult<UsageIncrement> {
            let applied = self.marks.lock().insert((participant_id, fixture_id));
            let mut usage = self.usage.lock();
            let count = usage.entry((participant_id, team.to_string())).or_insert(0);
            if applied {
                *count += 1;
            }
            Ok(UsageIncrement {
                applied,
                count: *count,
            })
        }

        async fn record_loser_usage(
            &self,
            participant_id: Uuid,
            team: &str,
            round: i32,
            _fixture_id: Uuid,
        ) -> AppResult<bool> {
            Ok(self
                .losers
                .lock()
                .insert((participant_id, team.to_string(), round)))
        }

        async fn record_elimination(
            &self,
            participant_id: Uuid,
            team: &str,
            kind: EliminationKind,
        ) -> AppResult<bool> {
            let mut eliminations = self.eliminations.lock();
            let key = (participant_id, team.to_string(), kind);
            if eliminations.contains(&key) {
                return Ok(false);
            }
            eliminations.push(key);
            Ok(true)
        }

        async fn list_eliminations(&self, participant_id: Uuid) -> AppResult<Vec<Elimination>> {
            Ok(self
                .eliminations
                .lock()
                .iter()
                .filter(|(p, _, _)| *p == participant_id)
                .map(|(p, team, kind)| Elimination {
                    participant_id: *p,
                    team: team.clone(),
                    kind: *kind,
                    created_at: Utc::now(),
                })
                .collect())
        }

        async fn list_winner_usage(&self, participant_id: Uuid) -> AppResult<Vec<WinnerUsage>> {
            Ok(self
                .usage
                .lock()
                .iter()
                .filter(|((p, _), _)| *p == participant_id)
                .map(|((p, team), count)| WinnerUsage {
                    participant_id: *p,
                    team: team.clone(),
                    usage_count: *count,
                })
                .collect())
        }

        async fn list_loser_usage(&self, participant_id: Uuid) -> AppResult<Vec<LoserUsage>> {
            Ok(self
                .losers
                .lock()
                .iter()
                .filter(|(p, _, _)| *p == participant_id)
                .map(|(p, team, round)| LoserUsage {
                    participant_id: *p,
                    team: team.clone(),
                    round: *round,
                    fixture_id: Uuid::nil(),
                })
                .collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::MemLedgerStore;
    use super::*;

    fn graded(participant_id: Uuid, fixture_id: Uuid, round: i32, chosen: &str, opposing: &str) -> GradedPick {
        GradedPick {
            participant_id,
            username: "alice".to_string(),
            pick_id: Uuid::new_v4(),
            fixture_id,
            round,
            chosen_side: chosen.to_string(),
            opposing_side: opposing.to_string(),
            correct: true,
            points: 1,
        }
    }

    #[tokio::test]
    async fn test_one_pick_spends_exactly_one_loser_and_one_winner_use() {
        let store = Arc::new(MemLedgerStore::default());
        let ledger = EligibilityLedger::new(store.clone());
        let alice = Uuid::new_v4();
        let fixture = Uuid::new_v4();

        let summary = ledger
            .apply(&[graded(alice, fixture, 1, "Washington", "NY Giants")])
            .await
            .unwrap();

        assert_eq!(summary.winner_increments, 1);
        assert_eq!(summary.loser_spends, 1);
        assert_eq!(summary.eliminations, 1);

        // Chosen side accrues winner-usage only, opposing side loser state only.
        assert_eq!(store.get_winner_usage(alice, "Washington").await.unwrap(), 1);
        assert_eq!(store.get_winner_usage(alice, "NY Giants").await.unwrap(), 0);
        let eliminations = store.list_eliminations(alice).await.unwrap();
        assert_eq!(eliminations.len(), 1);
        assert_eq!(eliminations[0].team, "NY Giants");
        assert_eq!(eliminations[0].kind, EliminationKind::Loser);
    }

    #[tokio::test]
    async fn test_reapplying_the_same_grading_changes_nothing() {
        let store = Arc::new(MemLedgerStore::default());
        let ledger = EligibilityLedger::new(store.clone());
        let alice = Uuid::new_v4();
        let fixture = Uuid::new_v4();
        let picks = [graded(alice, fixture, 1, "Washington", "NY Giants")];

        ledger.apply(&picks).await.unwrap();
        let second = ledger.apply(&picks).await.unwrap();

        assert_eq!(second, LedgerSummary::default());
        assert_eq!(store.get_winner_usage(alice, "Washington").await.unwrap(), 1);
        assert_eq!(store.list_eliminations(alice).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_second_use_caps_the_winner() {
        let store = Arc::new(MemLedgerStore::default());
        let ledger = EligibilityLedger::new(store.clone());
        let alice = Uuid::new_v4();

        ledger
            .apply(&[graded(alice, Uuid::new_v4(), 1, "Washington", "NY Giants")])
            .await
            .unwrap();
        let summary = ledger
            .apply(&[graded(alice, Uuid::new_v4(), 2, "Washington", "Dallas Cowboys")])
            .await
            .unwrap();

        assert_eq!(store.get_winner_usage(alice, "Washington").await.unwrap(), 2);
        // Second round: loser elimination for Dallas plus the winner cap.
        assert_eq!(summary.eliminations, 2);
        let eliminations = store.list_eliminations(alice).await.unwrap();
        assert!(eliminations
            .iter()
            .any(|e| e.team == "Washington" && e.kind == EliminationKind::Winner));
    }

    #[tokio::test]
    async fn test_usage_is_monotonic_per_fixture() {
        let store = Arc::new(MemLedgerStore::default());
        let ledger = EligibilityLedger::new(store.clone());
        let alice = Uuid::new_v4();
        let fixture = Uuid::new_v4();

        // Same fixture applied three times: a single increment.
        for _ in 0..3 {
            ledger
                .apply(&[graded(alice, fixture, 1, "Washington", "NY Giants")])
                .await
                .unwrap();
        }
        assert_eq!(store.get_winner_usage(alice, "Washington").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_team_can_reach_both_terminal_states() {
        let store = Arc::new(MemLedgerStore::default());
        let ledger = EligibilityLedger::new(store.clone());
        let alice = Uuid::new_v4();

        // Washington chosen twice, then spent as a loser in a third pick.
        ledger
            .apply(&[graded(alice, Uuid::new_v4(), 1, "Washington", "NY Giants")])
            .await
            .unwrap();
        ledger
            .apply(&[graded(alice, Uuid::new_v4(), 2, "Washington", "Dallas Cowboys")])
            .await
            .unwrap();
        ledger
            .apply(&[graded(alice, Uuid::new_v4(), 3, "Chicago Bears", "Washington")])
            .await
            .unwrap();

        let kinds: Vec<EliminationKind> = store
            .list_eliminations(alice)
            .await
            .unwrap()
            .iter()
            .filter(|e| e.team == "Washington")
            .map(|e| e.kind)
            .collect();
        assert!(kinds.contains(&EliminationKind::Winner));
        assert!(kinds.contains(&EliminationKind::Loser));
        assert_eq!(kinds.len(), 2);
    }
}
