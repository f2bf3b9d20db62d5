//! In-memory stores for testing.
//!
//! Thread-safe implementations of the storage traits backed by
//! `RwLock<HashMap>`, primarily for use in unit tests. All data is lost
//! when the store is dropped.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::NaiveDate;

use crate::core::{CompletionEntry, Habit, Progression};
use crate::error::{EmberError, Result};
use crate::storage::{CompletionLedger, HabitStore, ProgressStore};

/// In-memory habit catalog for testing.
#[derive(Debug, Default)]
pub struct MemoryHabitStore {
    habits: RwLock<HashMap<String, Habit>>,
}

impl MemoryHabitStore {
    /// Create a new empty in-memory catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of habits in the catalog.
    pub fn len(&self) -> usize {
        self.habits.read().unwrap().len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.habits.read().unwrap().is_empty()
    }
}

impl HabitStore for MemoryHabitStore {
    fn add(&self, habit: &Habit) -> Result<()> {
        let mut habits = self.habits.write().unwrap();
        if habits.contains_key(&habit.id) {
            return Err(EmberError::invalid_habit(format!(
                "a habit named '{}' already exists",
                habit.name
            )));
        }
        habits.insert(habit.id.clone(), habit.clone());
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Option<Habit>> {
        let habits = self.habits.read().unwrap();
        Ok(habits.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<Habit>> {
        let habits = self.habits.read().unwrap();
        let mut result: Vec<Habit> = habits.values().cloned().collect();

        // Oldest first, id as a tie-breaker for stable output
        result.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        Ok(result)
    }

    fn update(&self, habit: &Habit) -> Result<()> {
        let mut habits = self.habits.write().unwrap();
        if !habits.contains_key(&habit.id) {
            return Err(EmberError::unknown_habit(&habit.id));
        }
        habits.insert(habit.id.clone(), habit.clone());
        Ok(())
    }

    fn remove(&self, id: &str) -> Result<()> {
        let mut habits = self.habits.write().unwrap();
        habits.remove(id);
        Ok(())
    }
}

/// In-memory completion ledger for testing.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    entries: RwLock<HashMap<(String, NaiveDate), bool>>,
}

impl MemoryLedger {
    /// Create a new empty in-memory ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries in the ledger.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    /// Check if the ledger is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.read().unwrap().is_empty()
    }
}

impl CompletionLedger for MemoryLedger {
    fn record(&self, entry: &CompletionEntry) -> Result<()> {
        let mut entries = self.entries.write().unwrap();
        entries.insert((entry.habit_id.clone(), entry.date), entry.completed);
        Ok(())
    }

    fn flag_on(&self, habit_id: &str, date: NaiveDate) -> Result<Option<bool>> {
        let entries = self.entries.read().unwrap();
        Ok(entries.get(&(habit_id.to_string(), date)).copied())
    }

    fn completed_counts_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<HashMap<NaiveDate, u32>> {
        let entries = self.entries.read().unwrap();
        let mut counts = HashMap::new();

        for ((_, date), completed) in entries.iter() {
            if *completed && *date >= start && *date <= end {
                *counts.entry(*date).or_insert(0) += 1;
            }
        }

        Ok(counts)
    }

    fn total_completed(&self) -> Result<u32> {
        let entries = self.entries.read().unwrap();
        Ok(entries.values().filter(|completed| **completed).count() as u32)
    }

    fn clear_habit(&self, habit_id: &str) -> Result<()> {
        let mut entries = self.entries.write().unwrap();
        entries.retain(|(id, _), _| id != habit_id);
        Ok(())
    }
}

/// In-memory progression store for testing.
#[derive(Debug, Default)]
pub struct MemoryProgressStore {
    progression: RwLock<Option<Progression>>,
}

impl MemoryProgressStore {
    /// Create a new empty in-memory progression store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressStore for MemoryProgressStore {
    fn load(&self) -> Result<Progression> {
        let progression = self.progression.read().unwrap();
        Ok(progression.clone().unwrap_or_default())
    }

    fn save(&self, progression: &Progression) -> Result<()> {
        let mut stored = self.progression.write().unwrap();
        *stored = Some(progression.clone());
        Ok(())
    }
}
