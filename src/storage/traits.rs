//! Storage traits for Ember.
//!
//! Each store is bound to one profile at construction time, so the traits
//! carry no user parameter. The three concerns are kept separate: the habit
//! catalog, the completion ledger, and the progression record.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::core::{CompletionEntry, Habit, Progression};
use crate::error::Result;

/// Storage for a profile's habit catalog.
pub trait HabitStore: Send + Sync {
    /// Add a habit.
    ///
    /// Fails with `InvalidHabit` when a habit with the same id exists.
    fn add(&self, habit: &Habit) -> Result<()>;

    /// Retrieve a habit by id.
    ///
    /// Returns `Ok(None)` if the habit doesn't exist.
    fn get(&self, id: &str) -> Result<Option<Habit>>;

    /// List all habits, oldest first.
    fn list(&self) -> Result<Vec<Habit>>;

    /// Update an existing habit (rename).
    ///
    /// Fails with `UnknownHabit` when the id doesn't exist.
    fn update(&self, habit: &Habit) -> Result<()>;

    /// Remove a habit.
    ///
    /// Returns `Ok(())` even if the habit doesn't exist. Ledger entries are
    /// purged separately via [`CompletionLedger::clear_habit`].
    fn remove(&self, id: &str) -> Result<()>;

    /// Number of habits in the catalog.
    fn count(&self) -> Result<u32> {
        Ok(self.list()?.len() as u32)
    }

    /// Resolve a user-supplied name to a habit.
    ///
    /// Matches the id exactly first, then the display name
    /// case-insensitively.
    fn find(&self, name: &str) -> Result<Option<Habit>> {
        let habits = self.list()?;

        if let Some(habit) = habits.iter().find(|h| h.id == name) {
            return Ok(Some(habit.clone()));
        }

        let lower = name.to_lowercase();
        Ok(habits
            .into_iter()
            .find(|h| h.name.to_lowercase() == lower))
    }
}

/// Storage for a profile's completion ledger.
///
/// Entries are unique per (habit_id, date); recording again overwrites the
/// flag. The engine never deletes entries.
pub trait CompletionLedger: Send + Sync {
    /// Idempotent upsert keyed by (habit_id, date).
    fn record(&self, entry: &CompletionEntry) -> Result<()>;

    /// The recorded flag for one (habit_id, date) pair, if any.
    fn flag_on(&self, habit_id: &str, date: NaiveDate) -> Result<Option<bool>>;

    /// Number of distinct habits with a completed entry on `date`.
    fn completed_count_on(&self, date: NaiveDate) -> Result<u32> {
        let counts = self.completed_counts_between(date, date)?;
        Ok(counts.get(&date).copied().unwrap_or(0))
    }

    /// Completed counts per date over an inclusive range.
    ///
    /// Dates without completions are absent from the map.
    fn completed_counts_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<HashMap<NaiveDate, u32>>;

    /// Total completed entries across all dates.
    fn total_completed(&self) -> Result<u32>;

    /// Purge every entry belonging to a habit (used on habit deletion).
    fn clear_habit(&self, habit_id: &str) -> Result<()>;
}

/// Storage for a profile's progression record.
pub trait ProgressStore: Send + Sync {
    /// Load the progression record.
    ///
    /// Returns an explicit default record when none has been saved yet;
    /// a missing record is not an error.
    fn load(&self) -> Result<Progression>;

    /// Save the progression record, replacing any previous one.
    fn save(&self, progression: &Progression) -> Result<()>;
}

/// Blanket implementation of HabitStore for Arc-wrapped stores.
///
/// This allows using `Arc<T>` where `T: HabitStore` is expected, which is
/// useful for sharing stores between tests and commands.
impl<T: HabitStore + ?Sized> HabitStore for Arc<T> {
    fn add(&self, habit: &Habit) -> Result<()> {
        (**self).add(habit)
    }

    fn get(&self, id: &str) -> Result<Option<Habit>> {
        (**self).get(id)
    }

    fn list(&self) -> Result<Vec<Habit>> {
        (**self).list()
    }

    fn update(&self, habit: &Habit) -> Result<()> {
        (**self).update(habit)
    }

    fn remove(&self, id: &str) -> Result<()> {
        (**self).remove(id)
    }
}

/// Blanket implementation of CompletionLedger for Arc-wrapped stores.
impl<T: CompletionLedger + ?Sized> CompletionLedger for Arc<T> {
    fn record(&self, entry: &CompletionEntry) -> Result<()> {
        (**self).record(entry)
    }

    fn flag_on(&self, habit_id: &str, date: NaiveDate) -> Result<Option<bool>> {
        (**self).flag_on(habit_id, date)
    }

    fn completed_counts_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<HashMap<NaiveDate, u32>> {
        (**self).completed_counts_between(start, end)
    }

    fn total_completed(&self) -> Result<u32> {
        (**self).total_completed()
    }

    fn clear_habit(&self, habit_id: &str) -> Result<()> {
        (**self).clear_habit(habit_id)
    }
}

/// Blanket implementation of ProgressStore for Arc-wrapped stores.
impl<T: ProgressStore + ?Sized> ProgressStore for Arc<T> {
    fn load(&self) -> Result<Progression> {
        (**self).load()
    }

    fn save(&self, progression: &Progression) -> Result<()> {
        (**self).save(progression)
    }
}
