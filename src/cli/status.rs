//! Status command for Ember.
//!
//! The dashboard view: today's checklist, the completed/remaining split,
//! and the profile's progression with badges.

use chrono::NaiveDate;
use serde::Serialize;

use crate::core::{badges_for, today_summary, TodaySummary};
use crate::storage::{CompletionLedger, HabitStore, ProgressStore};

/// Options for the status command.
#[derive(Debug, Clone, Default)]
pub struct StatusOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// One checklist row.
#[derive(Debug, Clone, Serialize)]
pub struct ChecklistRow {
    /// Habit id.
    pub id: String,
    /// Habit display name.
    pub name: String,
    /// Whether the habit is completed today.
    pub completed: bool,
}

/// Output format for the status command.
#[derive(Debug, Clone, Serialize)]
pub struct StatusOutput {
    /// Whether the status was gathered.
    pub success: bool,
    /// The date the view refers to.
    pub date: NaiveDate,
    /// Today's checklist, oldest habit first.
    pub checklist: Vec<ChecklistRow>,
    /// Completed/remaining/total counts for the day.
    pub summary: TodaySummary,
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

impl StatusOutput {
    fn failure(date: NaiveDate, error: impl Into<String>) -> Self {
        Self {
            success: false,
            date,
            checklist: Vec::new(),
            summary: TodaySummary {
                completed: 0,
                remaining: 0,
                total: 0,
            },
            xp: 0,
            level: 1,
            current_streak: 0,
            best_streak: 0,
            badges: Vec::new(),
            error: Some(error.into()),
        }
    }
}

/// The status command implementation.
pub struct StatusCommand<S, L, P>
where
    S: HabitStore,
    L: CompletionLedger,
    P: ProgressStore,
{
    habits: S,
    ledger: L,
    progress: P,
}

impl<S, L, P> StatusCommand<S, L, P>
where
    S: HabitStore,
    L: CompletionLedger,
    P: ProgressStore,
{
    /// Create a new status command.
    pub fn new(habits: S, ledger: L, progress: P) -> Self {
        Self {
            habits,
            ledger,
            progress,
        }
    }

    /// Gather the dashboard view for the given date.
    pub fn run(&self, today: NaiveDate, _options: &StatusOptions) -> StatusOutput {
        let habits = match self.habits.list() {
            Ok(habits) => habits,
            Err(e) => return StatusOutput::failure(today, e.to_string()),
        };

        let mut checklist = Vec::with_capacity(habits.len());
        for habit in &habits {
            let completed = match self.ledger.flag_on(&habit.id, today) {
                Ok(flag) => flag.unwrap_or(false),
                Err(e) => return StatusOutput::failure(today, e.to_string()),
            };
            checklist.push(ChecklistRow {
                id: habit.id.clone(),
                name: habit.name.clone(),
                completed,
            });
        }

        let summary = match today_summary(&self.ledger, habits.len() as u32, today) {
            Ok(summary) => summary,
            Err(e) => return StatusOutput::failure(today, e.to_string()),
        };

        let progression = match self.progress.load() {
            Ok(progression) => progression,
            Err(e) => return StatusOutput::failure(today, e.to_string()),
        };

        StatusOutput {
            success: true,
            date: today,
            checklist,
            summary,
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
    pub fn format_output(&self, output: &StatusOutput, options: &StatusOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            return serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string());
        }

        if !output.success {
            return format!(
                "Could not gather status: {}",
                output.error.as_deref().unwrap_or("unknown error")
            );
        }

        let mut lines = Vec::new();
        lines.push(format!("Status for {}", output.date));
        lines.push(format!(
            "Level {} ({} XP) | streak {} (best {})",
            output.level, output.xp, output.current_streak, output.best_streak
        ));
        if !output.badges.is_empty() {
            lines.push(format!("Badges: {}", output.badges.join(", ")));
        }
        lines.push(format!(
            "Today: {}/{} done, {} remaining",
            output.summary.completed, output.summary.total, output.summary.remaining
        ));

        if output.checklist.is_empty() {
            lines.push("No habits yet. Add one with 'ember add <name>'.".to_string());
        } else {
            for row in &output.checklist {
                let mark = if row.completed { "x" } else { " " };
                lines.push(format!("  [{}] {}", mark, row.name));
            }
        }

        lines.join("\n")
    }
}
