//! Check command for Ember.
//!
//! Records a habit's completion flag for a date, then runs the progression
//! engine for that date. The engine call is idempotent per day, so checking
//! several habits in a row only grants credit once; the first grant fixes
//! the day's XP.

use chrono::NaiveDate;
use serde::Serialize;

use crate::core::{DayCredit, ProgressionEngine};
use crate::error::EmberError;
use crate::storage::{CompletionLedger, HabitStore, ProgressStore};

/// Options for the check command.
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the check command.
#[derive(Debug, Clone, Serialize)]
pub struct CheckOutput {
    /// Whether the check-off was recorded.
    pub success: bool,
    /// Display name of the habit.
    pub habit: String,
    /// The date the flag was recorded for.
    pub date: NaiveDate,
    /// The recorded flag.
    pub completed: bool,
    /// Engine outcome for the date, if the engine ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit: Option<DayCredit>,
    /// XP after the call.
    pub xp: u64,
    /// Level after the call.
    pub level: u64,
    /// Current streak after the call.
    pub current_streak: u32,
    /// Badges earned by the current streak.
    pub badges: Vec<String>,
    /// Error message if the check-off failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CheckOutput {
    /// Create a failed output.
    pub fn failure(habit: impl Into<String>, date: NaiveDate, error: impl Into<String>) -> Self {
        Self {
            success: false,
            habit: habit.into(),
            date,
            completed: false,
            credit: None,
            xp: 0,
            level: 1,
            current_streak: 0,
            badges: Vec::new(),
            error: Some(error.into()),
        }
    }
}

/// The check command implementation.
pub struct CheckCommand<S, L, P>
where
    S: HabitStore,
    L: CompletionLedger,
    P: ProgressStore,
{
    habits: S,
    ledger: L,
    engine: ProgressionEngine<L, P>,
}

impl<S, L, P> CheckCommand<S, L, P>
where
    S: HabitStore,
    L: CompletionLedger + Clone,
    P: ProgressStore,
{
    /// Create a new check command.
    ///
    /// The engine shares the ledger so the advance sees the flag recorded
    /// by this command.
    pub fn new(habits: S, ledger: L, progress: P) -> Self {
        let engine = ProgressionEngine::new(ledger.clone(), progress);
        Self {
            habits,
            ledger,
            engine,
        }
    }

    /// Record the flag for a habit on a date, then advance progression.
    ///
    /// `completed` is false for an undo; the engine still runs, since other
    /// habits completed the same day may be due credit.
    pub fn run(
        &self,
        name: &str,
        date: NaiveDate,
        completed: bool,
        _options: &CheckOptions,
    ) -> CheckOutput {
        let habit = match self.habits.find(name) {
            Ok(Some(habit)) => habit,
            Ok(None) => {
                return CheckOutput::failure(
                    name,
                    date,
                    EmberError::unknown_habit(name).to_string(),
                )
            }
            Err(e) => return CheckOutput::failure(name, date, e.to_string()),
        };

        let entry = crate::core::CompletionEntry::new(&habit.id, date, completed);
        if let Err(e) = self.ledger.record(&entry) {
            return CheckOutput::failure(&habit.name, date, e.to_string());
        }

        let outcome = match self.engine.advance(date) {
            Ok(outcome) => outcome,
            Err(e) => return CheckOutput::failure(&habit.name, date, e.to_string()),
        };

        CheckOutput {
            success: true,
            habit: habit.name,
            date,
            completed,
            credit: Some(outcome.credit),
            xp: outcome.progression.xp,
            level: outcome.progression.level(),
            current_streak: outcome.progression.current_streak,
            badges: outcome.badges().iter().map(|b| b.to_string()).collect(),
            error: None,
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &CheckOutput, options: &CheckOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            return serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string());
        }

        if !output.success {
            return format!(
                "Could not check off habit: {}",
                output.error.as_deref().unwrap_or("unknown error")
            );
        }

        let mut lines = Vec::new();
        if output.completed {
            lines.push(format!("Checked off '{}' for {}.", output.habit, output.date));
        } else {
            lines.push(format!("Unchecked '{}' for {}.", output.habit, output.date));
        }

        match output.credit {
            Some(DayCredit::Granted { gained_xp, .. }) => {
                lines.push(format!(
                    "+{} XP (total {}, level {}), streak {}.",
                    gained_xp, output.xp, output.level, output.current_streak
                ));
            }
            Some(DayCredit::AlreadyCredited) => {
                lines.push(format!(
                    "Credit for {} already granted. XP {}, level {}, streak {}.",
                    output.date, output.xp, output.level, output.current_streak
                ));
            }
            Some(DayCredit::NothingCompleted) | None => {}
        }

        if !output.badges.is_empty() {
            lines.push(format!("Badges: {}", output.badges.join(", ")));
        }

        lines.join("\n")
    }
}
