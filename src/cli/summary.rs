//! Summary command for Ember.
//!
//! Lifetime totals for the profile: habit count, total completions, and
//! the progression record with badges.

use serde::Serialize;

use crate::core::badges_for;
use crate::storage::{CompletionLedger, HabitStore, ProgressStore};

/// Options for the summary command.
#[derive(Debug, Clone, Default)]
pub struct SummaryOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the summary command.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryOutput {
    /// Whether the totals were gathered.
    pub success: bool,
    /// Habits currently in the catalog.
    pub total_habits: u32,
    /// Completed ledger entries across all time.
    pub total_completions: u32,
    /// Accumulated XP.
    pub xp: u64,
    /// Level derived from XP.
    pub level: u64,
    /// Current streak.
    pub current_streak: u32,
    /// Best streak ever reached.
    pub best_streak: u32,
    /// Badges earned by the current streak.
    pub badges: Vec<String>,
    /// Error message if gathering failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SummaryOutput {
    fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            total_habits: 0,
            total_completions: 0,
            xp: 0,
            level: 1,
            current_streak: 0,
            best_streak: 0,
            badges: Vec::new(),
            error: Some(error.into()),
        }
    }
}

/// The summary command implementation.
pub struct SummaryCommand<S, L, P>
where
    S: HabitStore,
    L: CompletionLedger,
    P: ProgressStore,
{
    habits: S,
    ledger: L,
    progress: P,
}

impl<S, L, P> SummaryCommand<S, L, P>
where
    S: HabitStore,
    L: CompletionLedger,
    P: ProgressStore,
{
    /// Create a new summary command.
    pub fn new(habits: S, ledger: L, progress: P) -> Self {
        Self {
            habits,
            ledger,
            progress,
        }
    }

    /// Gather the profile's lifetime totals.
    pub fn run(&self, _options: &SummaryOptions) -> SummaryOutput {
        let total_habits = match self.habits.count() {
            Ok(count) => count,
            Err(e) => return SummaryOutput::failure(e.to_string()),
        };

        let total_completions = match self.ledger.total_completed() {
            Ok(count) => count,
            Err(e) => return SummaryOutput::failure(e.to_string()),
        };

        let progression = match self.progress.load() {
            Ok(progression) => progression,
            Err(e) => return SummaryOutput::failure(e.to_string()),
        };

        SummaryOutput {
            success: true,
            total_habits,
            total_completions,
            xp: progression.xp,
            level: progression.level(),
            current_streak: progression.current_streak,
            best_streak: progression.best_streak,
            badges: badges_for(progression.current_streak)
                .iter()
                .map(|b| b.to_string())
                .collect(),
            error: None,
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &SummaryOutput, options: &SummaryOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            return serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string());
        }

        if !output.success {
            return format!(
                "Could not gather summary: {}",
                output.error.as_deref().unwrap_or("unknown error")
            );
        }

        let mut lines = vec![
            format!("Habits: {}", output.total_habits),
            format!("Total completions: {}", output.total_completions),
            format!("Level {} ({} XP)", output.level, output.xp),
            format!(
                "Streak: {} (best {})",
                output.current_streak, output.best_streak
            ),
        ];
        if !output.badges.is_empty() {
            lines.push(format!("Badges: {}", output.badges.join(", ")));
        }
        lines.join("\n")
    }
}
