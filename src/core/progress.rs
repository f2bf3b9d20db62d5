//! Progression state for Ember: streaks, XP and level.
//!
//! One `Progression` exists per profile. It is only ever mutated by the
//! engine's transition function, which grants credit for a calendar date
//! at most once. Level is derived from XP and never stored, so the two
//! cannot diverge.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// XP accounting constants.
pub mod xp {
    /// XP granted per completed habit on the day credit is granted.
    pub const PER_HABIT: u64 = 10;
    /// XP span of one level.
    pub const PER_LEVEL: u64 = 100;
}

/// Per-profile progression record.
///
/// Invariants, preserved by [`Progression::advance`]:
/// - `xp` never decreases.
/// - `best_streak >= current_streak`, and `best_streak` never decreases.
/// - `last_active_date`, once set, only advances forward.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Progression {
    /// Accumulated experience points.
    pub xp: u64,
    /// Consecutive credited days ending at `last_active_date`.
    pub current_streak: u32,
    /// Highest value `current_streak` has ever reached.
    pub best_streak: u32,
    /// Most recent date credit was granted, if any.
    pub last_active_date: Option<NaiveDate>,
}

impl Progression {
    /// Create a fresh progression record (xp 0, level 1, no activity).
    pub fn new() -> Self {
        Self::default()
    }

    /// The level derived from XP: `xp / 100 + 1`.
    pub fn level(&self) -> u64 {
        self.xp / xp::PER_LEVEL + 1
    }

    /// Apply one day's activity and return the resulting record.
    ///
    /// This is a total function of `(self, completed_today, today)`:
    ///
    /// - `completed_today == 0`: no credit, the record is unchanged. A zero
    ///   day does not break the streak here; the break surfaces when a later
    ///   active day is processed.
    /// - `last_active_date == today`: credit was already granted, the record
    ///   is unchanged. The first grant fixes the day's XP even if more
    ///   habits are completed afterwards.
    /// - Otherwise the streak continues only when the last active date is
    ///   exactly yesterday; any other history (none, a gap of two or more
    ///   days, or a future date from clock skew) resets it to 1.
    pub fn advance(&self, completed_today: u32, today: NaiveDate) -> (Self, DayCredit) {
        if completed_today == 0 {
            return (self.clone(), DayCredit::NothingCompleted);
        }

        if self.last_active_date == Some(today) {
            return (self.clone(), DayCredit::AlreadyCredited);
        }

        let mut next = self.clone();

        next.current_streak = match self.last_active_date {
            Some(last) if today.pred_opt() == Some(last) => {
                self.current_streak.saturating_add(1)
            }
            _ => 1,
        };
        next.last_active_date = Some(today);
        next.best_streak = next.best_streak.max(next.current_streak);

        let gained = u64::from(completed_today).saturating_mul(xp::PER_HABIT);
        next.xp = next.xp.saturating_add(gained);

        let credit = DayCredit::Granted {
            gained_xp: gained,
            completed: completed_today,
        };
        (next, credit)
    }
}

/// Outcome of one [`Progression::advance`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum DayCredit {
    /// Credit was granted for the day.
    Granted {
        /// XP added by this grant.
        gained_xp: u64,
        /// Completed habit count at the moment of the grant.
        completed: u32,
    },
    /// Credit for the day had already been granted earlier.
    AlreadyCredited,
    /// No habit was completed, so there was nothing to credit.
    NothingCompleted,
}

impl DayCredit {
    /// Whether this outcome changed the progression record.
    pub fn is_granted(&self) -> bool {
        matches!(self, DayCredit::Granted { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_defaults() {
        let p = Progression::new();

        assert_eq!(p.xp, 0);
        assert_eq!(p.level(), 1);
        assert_eq!(p.current_streak, 0);
        assert_eq!(p.best_streak, 0);
        assert!(p.last_active_date.is_none());
    }

    #[test]
    fn test_zero_completions_is_a_no_op() {
        let stored = Progression {
            xp: 250,
            current_streak: 4,
            best_streak: 9,
            last_active_date: Some(date(2024, 3, 10)),
        };

        let (next, credit) = stored.advance(0, date(2024, 3, 15));

        assert_eq!(next, stored);
        assert_eq!(credit, DayCredit::NothingCompleted);
    }

    #[test]
    fn test_same_day_is_idempotent() {
        let fresh = Progression::new();
        let today = date(2024, 3, 15);

        let (first, credit) = fresh.advance(2, today);
        assert!(credit.is_granted());

        let (second, credit) = first.advance(2, today);
        assert_eq!(second, first);
        assert_eq!(credit, DayCredit::AlreadyCredited);
    }

    #[test]
    fn test_first_grant_wins() {
        // Credit granted at 3 completions; later calls see a bigger ledger
        // count but the day's XP stays fixed at 3 * 10.
        let fresh = Progression::new();
        let today = date(2024, 3, 15);

        let (after_first, _) = fresh.advance(3, today);
        assert_eq!(after_first.xp, 30);

        let (after_second, credit) = after_first.advance(5, today);
        assert_eq!(after_second.xp, 30);
        assert_eq!(credit, DayCredit::AlreadyCredited);
    }

    #[test]
    fn test_streak_continues_from_yesterday() {
        let stored = Progression {
            xp: 70,
            current_streak: 7,
            best_streak: 7,
            last_active_date: Some(date(2024, 3, 14)),
        };

        let (next, _) = stored.advance(1, date(2024, 3, 15));

        assert_eq!(next.current_streak, 8);
        assert_eq!(next.best_streak, 8);
        assert_eq!(next.last_active_date, Some(date(2024, 3, 15)));
    }

    #[test]
    fn test_streak_resets_after_gap() {
        let stored = Progression {
            xp: 70,
            current_streak: 7,
            best_streak: 7,
            last_active_date: Some(date(2024, 3, 13)),
        };

        let (next, _) = stored.advance(1, date(2024, 3, 15));

        assert_eq!(next.current_streak, 1);
        assert_eq!(next.best_streak, 7);
    }

    #[test]
    fn test_streak_starts_at_one_with_no_history() {
        let (next, credit) = Progression::new().advance(2, date(2024, 3, 15));

        assert_eq!(next.current_streak, 1);
        assert_eq!(next.best_streak, 1);
        assert_eq!(next.xp, 20);
        assert_eq!(
            credit,
            DayCredit::Granted {
                gained_xp: 20,
                completed: 2
            }
        );
    }

    #[test]
    fn test_future_last_active_resets_streak() {
        // Clock skew: last active is after today. Treated as a reset, the
        // same as any other non-yesterday history.
        let stored = Progression {
            xp: 50,
            current_streak: 5,
            best_streak: 5,
            last_active_date: Some(date(2024, 3, 20)),
        };

        let (next, credit) = stored.advance(1, date(2024, 3, 15));

        assert!(credit.is_granted());
        assert_eq!(next.current_streak, 1);
        assert_eq!(next.best_streak, 5);
        assert_eq!(next.last_active_date, Some(date(2024, 3, 15)));
    }

    #[test]
    fn test_level_thresholds() {
        let mut p = Progression::new();

        assert_eq!(p.level(), 1);
        p.xp = 99;
        assert_eq!(p.level(), 1);
        p.xp = 100;
        assert_eq!(p.level(), 2);
        p.xp = 250;
        assert_eq!(p.level(), 3);
        p.xp = 1000;
        assert_eq!(p.level(), 11);
    }

    #[test]
    fn test_fresh_user_three_day_scenario() {
        // Day 1: 2 completions.
        let (p, _) = Progression::new().advance(2, date(2024, 3, 1));
        assert_eq!(p.current_streak, 1);
        assert_eq!(p.best_streak, 1);
        assert_eq!(p.xp, 20);
        assert_eq!(p.level(), 1);

        // Day 2 (consecutive): 1 completion.
        let (p, _) = p.advance(1, date(2024, 3, 2));
        assert_eq!(p.current_streak, 2);
        assert_eq!(p.best_streak, 2);
        assert_eq!(p.xp, 30);
        assert_eq!(p.level(), 1);

        // Day 4 (day 3 skipped): 3 completions.
        let (p, _) = p.advance(3, date(2024, 3, 4));
        assert_eq!(p.current_streak, 1);
        assert_eq!(p.best_streak, 2);
        assert_eq!(p.xp, 60);
        assert_eq!(p.level(), 1);
    }

    #[test]
    fn test_month_boundary_continues_streak() {
        let stored = Progression {
            xp: 10,
            current_streak: 1,
            best_streak: 1,
            last_active_date: Some(date(2024, 2, 29)),
        };

        let (next, _) = stored.advance(1, date(2024, 3, 1));

        assert_eq!(next.current_streak, 2);
    }

    #[test]
    fn test_serialization_roundtrip() {
        let p = Progression {
            xp: 340,
            current_streak: 3,
            best_streak: 12,
            last_active_date: Some(date(2024, 3, 15)),
        };

        let json = serde_json::to_string(&p).unwrap();
        let deserialized: Progression = serde_json::from_str(&json).unwrap();

        assert_eq!(p, deserialized);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        /// Days are generated as offsets from a fixed origin so sequences
        /// include same-day repeats, consecutive days, gaps and backwards
        /// jumps.
        fn origin() -> NaiveDate {
            date(2024, 1, 1)
        }

        proptest! {
            // Property: xp and best_streak never decrease, and the streak
            // invariant holds, across arbitrary call sequences.
            #[test]
            fn prop_monotone_under_any_sequence(
                steps in proptest::collection::vec((0i64..400, 0u32..8), 1..60)
            ) {
                let mut p = Progression::new();

                for (offset, completed) in steps {
                    let today = origin() + chrono::Duration::days(offset);
                    let (next, _) = p.advance(completed, today);

                    prop_assert!(next.xp >= p.xp);
                    prop_assert!(next.best_streak >= p.best_streak);
                    prop_assert!(next.best_streak >= next.current_streak);
                    p = next;
                }
            }

            // Property: level is always derived as xp / 100 + 1.
            #[test]
            fn prop_level_derives_from_xp(
                steps in proptest::collection::vec((0i64..400, 0u32..8), 1..60)
            ) {
                let mut p = Progression::new();

                for (offset, completed) in steps {
                    let today = origin() + chrono::Duration::days(offset);
                    let (next, _) = p.advance(completed, today);
                    prop_assert_eq!(next.level(), next.xp / xp::PER_LEVEL + 1);
                    p = next;
                }
            }

            // Property: only a grant touches last_active_date, and a grant
            // stamps it to the processed day.
            #[test]
            fn prop_last_active_stamped_only_by_grants(
                steps in proptest::collection::vec((0i64..400, 0u32..8), 1..60)
            ) {
                let mut p = Progression::new();

                for (offset, completed) in steps {
                    let today = origin() + chrono::Duration::days(offset);
                    let (next, credit) = p.advance(completed, today);

                    if credit.is_granted() {
                        prop_assert_eq!(next.last_active_date, Some(today));
                    } else {
                        prop_assert_eq!(next.last_active_date, p.last_active_date);
                    }
                    p = next;
                }
            }

            // Property: with a forward-moving clock, last_active_date never
            // regresses.
            #[test]
            fn prop_last_active_monotone_in_calendar_order(
                mut offsets in proptest::collection::vec(0i64..400, 1..60),
                counts in proptest::collection::vec(0u32..8, 60),
            ) {
                offsets.sort_unstable();
                let mut p = Progression::new();

                for (offset, completed) in offsets.iter().zip(counts.iter()) {
                    let today = origin() + chrono::Duration::days(*offset);
                    let (next, _) = p.advance(*completed, today);

                    if let (Some(before), Some(after)) =
                        (p.last_active_date, next.last_active_date)
                    {
                        prop_assert!(after >= before);
                    }
                    p = next;
                }
            }

            // Property: advancing twice for the same date with the same
            // (or any) count leaves the second result identical to the first.
            #[test]
            fn prop_same_day_idempotent(
                first in 1u32..10,
                second in 0u32..10,
                offset in 0i64..400,
            ) {
                let today = origin() + chrono::Duration::days(offset);
                let (after_first, _) = Progression::new().advance(first, today);
                let (after_second, _) = after_first.advance(second, today);

                prop_assert_eq!(after_first, after_second);
            }
        }
    }
}
