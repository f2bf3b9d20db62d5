//! File-based profile storage for Ember.
//!
//! Each profile owns one directory (`~/.ember/profiles/<name>/`) holding
//! `habits.json`, `ledger.json` and `progress.json`. Atomic writes are
//! achieved via temp file + rename pattern.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::profile_dir;
use crate::core::{CompletionEntry, Habit, Progression};
use crate::error::{EmberError, Result};
use crate::storage::{CompletionLedger, HabitStore, ProgressStore};

const HABITS_FILE: &str = "habits.json";
const LEDGER_FILE: &str = "ledger.json";
const PROGRESS_FILE: &str = "progress.json";

/// File-based storage for one profile.
///
/// Implements all three storage traits over JSON files in the profile
/// directory. A missing file reads as the empty/default value; a corrupt
/// file is an error, never silently replaced.
#[derive(Debug, Clone)]
pub struct FileProfileStore {
    /// Directory holding the profile's data files.
    dir: PathBuf,
}

impl FileProfileStore {
    /// Open the store for a named profile under the default Ember home.
    pub fn open(profile: &str) -> Result<Self> {
        let dir = profile_dir(profile).ok_or_else(|| {
            EmberError::config("Could not determine profile directory (no home directory)")
        })?;
        Self::with_dir(dir)
    }

    /// Open a store over a custom directory.
    pub fn with_dir(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();

        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|e| EmberError::storage(&dir, e))?;
        }

        Ok(Self { dir })
    }

    fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    fn temp_path(&self, file: &str) -> PathBuf {
        self.dir.join(format!(".{}.tmp", file))
    }

    /// Read a JSON file, returning the default value when it doesn't exist.
    fn read_json<T: DeserializeOwned + Default>(&self, file: &str) -> Result<T> {
        let path = self.path(file);

        if !path.exists() {
            return Ok(T::default());
        }

        let content = fs::read_to_string(&path).map_err(|e| EmberError::storage(&path, e))?;
        let value = serde_json::from_str(&content)?;

        Ok(value)
    }

    /// Write a JSON file atomically using temp file + rename.
    fn atomic_write<T: Serialize>(&self, file: &str, value: &T) -> Result<()> {
        let final_path = self.path(file);
        let temp_path = self.temp_path(file);

        let json = serde_json::to_string_pretty(value)?;

        {
            let mut f =
                fs::File::create(&temp_path).map_err(|e| EmberError::storage(&temp_path, e))?;
            f.write_all(json.as_bytes())
                .map_err(|e| EmberError::storage(&temp_path, e))?;
            f.sync_all()
                .map_err(|e| EmberError::storage(&temp_path, e))?;
        }

        // Rename temp file to final path (atomic on POSIX)
        fs::rename(&temp_path, &final_path).map_err(|e| EmberError::storage(&final_path, e))?;

        Ok(())
    }
}

impl HabitStore for FileProfileStore {
    fn add(&self, habit: &Habit) -> Result<()> {
        let mut habits: Vec<Habit> = self.read_json(HABITS_FILE)?;

        if habits.iter().any(|h| h.id == habit.id) {
            return Err(EmberError::invalid_habit(format!(
                "a habit named '{}' already exists",
                habit.name
            )));
        }

        habits.push(habit.clone());
        self.atomic_write(HABITS_FILE, &habits)
    }

    fn get(&self, id: &str) -> Result<Option<Habit>> {
        let habits: Vec<Habit> = self.read_json(HABITS_FILE)?;
        Ok(habits.into_iter().find(|h| h.id == id))
    }

    fn list(&self) -> Result<Vec<Habit>> {
        let mut habits: Vec<Habit> = self.read_json(HABITS_FILE)?;
        habits.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(habits)
    }

    fn update(&self, habit: &Habit) -> Result<()> {
        let mut habits: Vec<Habit> = self.read_json(HABITS_FILE)?;

        match habits.iter_mut().find(|h| h.id == habit.id) {
            Some(existing) => *existing = habit.clone(),
            None => return Err(EmberError::unknown_habit(&habit.id)),
        }

        self.atomic_write(HABITS_FILE, &habits)
    }

    fn remove(&self, id: &str) -> Result<()> {
        let mut habits: Vec<Habit> = self.read_json(HABITS_FILE)?;
        habits.retain(|h| h.id != id);
        self.atomic_write(HABITS_FILE, &habits)
    }
}

impl CompletionLedger for FileProfileStore {
    fn record(&self, entry: &CompletionEntry) -> Result<()> {
        let mut entries: Vec<CompletionEntry> = self.read_json(LEDGER_FILE)?;

        match entries
            .iter_mut()
            .find(|e| e.habit_id == entry.habit_id && e.date == entry.date)
        {
            Some(existing) => existing.completed = entry.completed,
            None => entries.push(entry.clone()),
        }

        self.atomic_write(LEDGER_FILE, &entries)
    }

    fn flag_on(&self, habit_id: &str, date: NaiveDate) -> Result<Option<bool>> {
        let entries: Vec<CompletionEntry> = self.read_json(LEDGER_FILE)?;
        Ok(entries
            .iter()
            .find(|e| e.habit_id == habit_id && e.date == date)
            .map(|e| e.completed))
    }

    fn completed_counts_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<std::collections::HashMap<NaiveDate, u32>> {
        let entries: Vec<CompletionEntry> = self.read_json(LEDGER_FILE)?;
        let mut counts = std::collections::HashMap::new();

        for entry in &entries {
            if entry.completed && entry.date >= start && entry.date <= end {
                *counts.entry(entry.date).or_insert(0) += 1;
            }
        }

        Ok(counts)
    }

    fn total_completed(&self) -> Result<u32> {
        let entries: Vec<CompletionEntry> = self.read_json(LEDGER_FILE)?;
        Ok(entries.iter().filter(|e| e.completed).count() as u32)
    }

    fn clear_habit(&self, habit_id: &str) -> Result<()> {
        let mut entries: Vec<CompletionEntry> = self.read_json(LEDGER_FILE)?;
        entries.retain(|e| e.habit_id != habit_id);
        self.atomic_write(LEDGER_FILE, &entries)
    }
}

impl ProgressStore for FileProfileStore {
    fn load(&self) -> Result<Progression> {
        // Explicit default when no record has been saved yet
        self.read_json(PROGRESS_FILE)
    }

    fn save(&self, progression: &Progression) -> Result<()> {
        self.atomic_write(PROGRESS_FILE, progression)
    }
}
