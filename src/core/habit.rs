//! Habit and completion ledger entry types for Ember.
//!
//! A habit is a recurring activity tracked per calendar day. The ledger
//! records, for each (habit, date) pair, whether the habit was completed.
//! Ledger entries are the source of truth for every derived statistic.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EmberError, Result};

/// Maximum length of a habit display name, in characters.
pub const MAX_NAME_LEN: usize = 100;

/// A user-defined recurring activity tracked per calendar day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Habit {
    /// Stable identifier, a slug derived from the name at creation time.
    /// Renaming a habit does not change its id, so ledger history survives.
    pub id: String,
    /// Display name shown in listings.
    pub name: String,
    /// When the habit was created.
    pub created_at: DateTime<Utc>,
}

impl Habit {
    /// Create a new habit from a display name.
    ///
    /// The name is trimmed and validated; the id is its slug.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into().trim().to_string();
        validate_name(&name)?;

        Ok(Self {
            id: slugify(&name),
            name,
            created_at: Utc::now(),
        })
    }

    /// Rename the habit, keeping its id.
    pub fn rename(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into().trim().to_string();
        validate_name(&name)?;
        self.name = name;
        Ok(())
    }
}

/// Validate a habit display name.
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(EmberError::invalid_habit("name cannot be empty"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(EmberError::invalid_habit(format!(
            "name exceeds {} characters",
            MAX_NAME_LEN
        )));
    }
    if slugify(name).is_empty() {
        return Err(EmberError::invalid_habit(
            "name must contain at least one letter or digit",
        ));
    }
    Ok(())
}

/// Derive a slug id from a habit name.
///
/// Lowercases, maps runs of non-alphanumeric characters to single dashes,
/// and trims leading/trailing dashes.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for c in name.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            for lower in c.to_lowercase() {
                slug.push(lower);
            }
        } else {
            pending_dash = true;
        }
    }

    slug
}

/// A completion ledger entry: one (habit, date) pair and its flag.
///
/// Unique per (habit_id, date); recording again for the same pair
/// overwrites the flag rather than creating a duplicate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompletionEntry {
    /// The habit this entry belongs to.
    pub habit_id: String,
    /// The calendar date, in the user's local calendar.
    pub date: NaiveDate,
    /// Whether the habit was completed on that date.
    pub completed: bool,
}

impl CompletionEntry {
    /// Create a new ledger entry.
    pub fn new(habit_id: impl Into<String>, date: NaiveDate, completed: bool) -> Self {
        Self {
            habit_id: habit_id.into(),
            date,
            completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_habit_new() {
        let habit = Habit::new("Morning run").unwrap();

        assert_eq!(habit.id, "morning-run");
        assert_eq!(habit.name, "Morning run");
    }

    #[test]
    fn test_habit_new_trims_whitespace() {
        let habit = Habit::new("  read 10 pages  ").unwrap();

        assert_eq!(habit.name, "read 10 pages");
        assert_eq!(habit.id, "read-10-pages");
    }

    #[test]
    fn test_habit_new_rejects_empty_name() {
        assert!(Habit::new("").is_err());
        assert!(Habit::new("   ").is_err());
    }

    #[test]
    fn test_habit_new_rejects_long_name() {
        let name = "x".repeat(MAX_NAME_LEN + 1);
        let err = Habit::new(name).unwrap_err();
        assert!(err.to_string().contains("exceeds"));
    }

    #[test]
    fn test_habit_new_accepts_max_length_name() {
        let name = "x".repeat(MAX_NAME_LEN);
        assert!(Habit::new(name).is_ok());
    }

    #[test]
    fn test_habit_new_rejects_punctuation_only_name() {
        let err = Habit::new("!!!").unwrap_err();
        assert!(err.to_string().contains("letter or digit"));
    }

    #[test]
    fn test_habit_rename_keeps_id() {
        let mut habit = Habit::new("Stretch").unwrap();
        habit.rename("Evening stretch").unwrap();

        assert_eq!(habit.id, "stretch");
        assert_eq!(habit.name, "Evening stretch");
    }

    #[test]
    fn test_habit_rename_rejects_empty() {
        let mut habit = Habit::new("Stretch").unwrap();
        assert!(habit.rename("  ").is_err());
        assert_eq!(habit.name, "Stretch");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Morning run"), "morning-run");
        assert_eq!(slugify("Drink  water!"), "drink-water");
        assert_eq!(slugify("  8 glasses / day  "), "8-glasses-day");
        assert_eq!(slugify("UPPER"), "upper");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn test_slugify_unicode() {
        assert_eq!(slugify("Café break"), "café-break");
        assert_eq!(slugify("日本語"), "日本語");
    }

    #[test]
    fn test_completion_entry_new() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let entry = CompletionEntry::new("morning-run", date, true);

        assert_eq!(entry.habit_id, "morning-run");
        assert_eq!(entry.date, date);
        assert!(entry.completed);
    }

    #[test]
    fn test_habit_serialization_roundtrip() {
        let habit = Habit::new("Journal").unwrap();

        let json = serde_json::to_string(&habit).unwrap();
        let deserialized: Habit = serde_json::from_str(&json).unwrap();

        assert_eq!(habit, deserialized);
    }

    #[test]
    fn test_completion_entry_serialization_roundtrip() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let entry = CompletionEntry::new("journal", date, false);

        let json = serde_json::to_string(&entry).unwrap();
        let deserialized: CompletionEntry = serde_json::from_str(&json).unwrap();

        assert_eq!(entry, deserialized);
    }
}
