//! The progression engine: grants daily streak/XP credit.
//!
//! The engine is invoked once per save of a day's checklist. It reads the
//! completed count for the day from the ledger and the stored progression
//! record, applies the transition in [`Progression::advance`], and persists
//! the result when credit was granted.
//!
//! A storage failure on either side aborts the call; nothing partial is
//! ever persisted.

use std::sync::Mutex;

use chrono::NaiveDate;
use serde::Serialize;

use crate::core::{badges_for, DayCredit, Progression};
use crate::error::Result;
use crate::storage::{CompletionLedger, ProgressStore};

/// Result of one engine invocation.
#[derive(Debug, Clone, Serialize)]
pub struct AdvanceOutcome {
    /// The progression record after the call.
    pub progression: Progression,
    /// Whether and how credit was granted.
    pub credit: DayCredit,
}

impl AdvanceOutcome {
    /// Badges earned by the current streak.
    pub fn badges(&self) -> Vec<&'static str> {
        badges_for(self.progression.current_streak)
    }
}

/// Progression engine bound to one profile's ledger and progression store.
pub struct ProgressionEngine<L, P> {
    ledger: L,
    progress: P,
    /// Serializes advance calls so the read-modify-write cannot interleave
    /// for the same profile.
    guard: Mutex<()>,
}

impl<L: CompletionLedger, P: ProgressStore> ProgressionEngine<L, P> {
    /// Create an engine over a profile's stores.
    pub fn new(ledger: L, progress: P) -> Self {
        Self {
            ledger,
            progress,
            guard: Mutex::new(()),
        }
    }

    /// Grant credit for `today` if it is due.
    ///
    /// `today` is the caller's local calendar date; streak continuity is
    /// defined in the user's local calendar. Repeated calls for the same
    /// date are no-ops after the first grant, so the caller may invoke this
    /// after every checklist save.
    pub fn advance(&self, today: NaiveDate) -> Result<AdvanceOutcome> {
        let _guard = self.guard.lock().unwrap();

        let stored = self.progress.load()?;
        let completed = self.ledger.completed_count_on(today)?;

        let (next, credit) = stored.advance(completed, today);

        if credit.is_granted() {
            self.progress.save(&next)?;
            tracing::debug!(
                date = %today,
                completed,
                xp = next.xp,
                streak = next.current_streak,
                "credit granted"
            );
        }

        Ok(AdvanceOutcome {
            progression: next,
            credit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CompletionEntry;
    use crate::storage::{MemoryLedger, MemoryProgressStore};
    use std::sync::Arc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn setup() -> (Arc<MemoryLedger>, Arc<MemoryProgressStore>) {
        (
            Arc::new(MemoryLedger::new()),
            Arc::new(MemoryProgressStore::new()),
        )
    }

    fn complete(ledger: &MemoryLedger, habit: &str, on: NaiveDate) {
        ledger.record(&CompletionEntry::new(habit, on, true)).unwrap();
    }

    #[test]
    fn test_advance_creates_default_record() {
        let (ledger, progress) = setup();
        let engine = ProgressionEngine::new(Arc::clone(&ledger), Arc::clone(&progress));
        let today = date(2024, 3, 15);

        complete(&ledger, "run", today);

        let outcome = engine.advance(today).unwrap();

        assert_eq!(outcome.progression.xp, 10);
        assert_eq!(outcome.progression.current_streak, 1);
        assert!(outcome.credit.is_granted());

        // Persisted
        assert_eq!(progress.load().unwrap(), outcome.progression);
    }

    #[test]
    fn test_advance_zero_completions_persists_nothing() {
        let (ledger, progress) = setup();
        let engine = ProgressionEngine::new(Arc::clone(&ledger), Arc::clone(&progress));

        let outcome = engine.advance(date(2024, 3, 15)).unwrap();

        assert_eq!(outcome.credit, DayCredit::NothingCompleted);
        assert_eq!(outcome.progression, Progression::new());
        assert_eq!(progress.load().unwrap(), Progression::new());
    }

    #[test]
    fn test_advance_is_idempotent_for_a_day() {
        let (ledger, progress) = setup();
        let engine = ProgressionEngine::new(Arc::clone(&ledger), Arc::clone(&progress));
        let today = date(2024, 3, 15);

        complete(&ledger, "run", today);
        complete(&ledger, "read", today);

        let first = engine.advance(today).unwrap();
        let second = engine.advance(today).unwrap();

        assert_eq!(first.progression, second.progression);
        assert_eq!(second.credit, DayCredit::AlreadyCredited);
    }

    #[test]
    fn test_first_grant_wins_over_later_ledger_changes() {
        let (ledger, progress) = setup();
        let engine = ProgressionEngine::new(Arc::clone(&ledger), Arc::clone(&progress));
        let today = date(2024, 3, 15);

        complete(&ledger, "a", today);
        complete(&ledger, "b", today);
        complete(&ledger, "c", today);

        let first = engine.advance(today).unwrap();
        assert_eq!(first.progression.xp, 30);

        // Two more habits completed the same day, after the grant
        complete(&ledger, "d", today);
        complete(&ledger, "e", today);

        let second = engine.advance(today).unwrap();
        assert_eq!(second.credit, DayCredit::AlreadyCredited);
        assert_eq!(second.progression.xp, 30);
        assert_eq!(progress.load().unwrap().xp, 30);
    }

    #[test]
    fn test_streak_across_engine_calls() {
        let (ledger, progress) = setup();
        let engine = ProgressionEngine::new(Arc::clone(&ledger), Arc::clone(&progress));

        // Day 1: 2 completions
        complete(&ledger, "run", date(2024, 3, 1));
        complete(&ledger, "read", date(2024, 3, 1));
        let d1 = engine.advance(date(2024, 3, 1)).unwrap().progression;
        assert_eq!((d1.current_streak, d1.best_streak, d1.xp), (1, 1, 20));

        // Day 2: 1 completion
        complete(&ledger, "run", date(2024, 3, 2));
        let d2 = engine.advance(date(2024, 3, 2)).unwrap().progression;
        assert_eq!((d2.current_streak, d2.best_streak, d2.xp), (2, 2, 30));

        // Day 4 (gap): 3 completions
        complete(&ledger, "run", date(2024, 3, 4));
        complete(&ledger, "read", date(2024, 3, 4));
        complete(&ledger, "stretch", date(2024, 3, 4));
        let d4 = engine.advance(date(2024, 3, 4)).unwrap().progression;
        assert_eq!((d4.current_streak, d4.best_streak, d4.xp), (1, 2, 60));
        assert_eq!(d4.level(), 1);
    }

    #[test]
    fn test_outcome_badges() {
        let (ledger, progress) = setup();
        let engine = ProgressionEngine::new(Arc::clone(&ledger), Arc::clone(&progress));

        progress
            .save(&Progression {
                xp: 60,
                current_streak: 6,
                best_streak: 6,
                last_active_date: Some(date(2024, 3, 14)),
            })
            .unwrap();

        complete(&ledger, "run", date(2024, 3, 15));
        let outcome = engine.advance(date(2024, 3, 15)).unwrap();

        assert_eq!(outcome.progression.current_streak, 7);
        assert_eq!(outcome.badges(), vec!["Bronze Streak (7 days)"]);
    }

    #[test]
    fn test_incomplete_entries_grant_nothing() {
        let (ledger, progress) = setup();
        let engine = ProgressionEngine::new(Arc::clone(&ledger), Arc::clone(&progress));
        let today = date(2024, 3, 15);

        // Checked off, then unchecked before the engine ran
        ledger
            .record(&CompletionEntry::new("run", today, false))
            .unwrap();

        let outcome = engine.advance(today).unwrap();
        assert_eq!(outcome.credit, DayCredit::NothingCompleted);
    }

    mod failing_store {
        use super::*;
        use crate::error::EmberError;

        /// Progression store whose save always fails.
        struct SaveFails;

        impl ProgressStore for SaveFails {
            fn load(&self) -> crate::error::Result<Progression> {
                Ok(Progression::new())
            }

            fn save(&self, _progression: &Progression) -> crate::error::Result<()> {
                Err(EmberError::storage(
                    "/nowhere/progress.json",
                    std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
                ))
            }
        }

        /// Progression store whose load always fails.
        struct LoadFails;

        impl ProgressStore for LoadFails {
            fn load(&self) -> crate::error::Result<Progression> {
                Err(EmberError::serde("corrupt progression record"))
            }

            fn save(&self, _progression: &Progression) -> crate::error::Result<()> {
                Ok(())
            }
        }

        #[test]
        fn test_save_failure_fails_the_call() {
            let ledger = Arc::new(MemoryLedger::new());
            complete(&ledger, "run", date(2024, 3, 15));

            let engine = ProgressionEngine::new(Arc::clone(&ledger), SaveFails);

            assert!(engine.advance(date(2024, 3, 15)).is_err());
        }

        #[test]
        fn test_load_failure_fails_the_call() {
            let ledger = Arc::new(MemoryLedger::new());
            complete(&ledger, "run", date(2024, 3, 15));

            let engine = ProgressionEngine::new(Arc::clone(&ledger), LoadFails);

            assert!(engine.advance(date(2024, 3, 15)).is_err());
        }
    }

    #[test]
    fn test_concurrent_advance_grants_once() {
        use std::thread;

        let (ledger, progress) = setup();
        let today = date(2024, 3, 15);
        complete(&ledger, "run", today);
        complete(&ledger, "read", today);

        let engine = Arc::new(ProgressionEngine::new(
            Arc::clone(&ledger),
            Arc::clone(&progress),
        ));

        let mut handles = vec![];
        for _ in 0..8 {
            let engine = Arc::clone(&engine);
            handles.push(thread::spawn(move || engine.advance(today).unwrap()));
        }

        let mut granted = 0;
        for handle in handles {
            if handle.join().unwrap().credit.is_granted() {
                granted += 1;
            }
        }

        assert_eq!(granted, 1);
        assert_eq!(progress.load().unwrap().xp, 20);
    }
}
