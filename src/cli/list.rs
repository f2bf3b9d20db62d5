//! List command for Ember.
//!
//! Lists the profile's habits together with today's check state.

use chrono::NaiveDate;
use serde::Serialize;

use crate::storage::{CompletionLedger, HabitStore};

/// Options for the list command.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// One listed habit with its check state for the day.
#[derive(Debug, Clone, Serialize)]
pub struct HabitRow {
    /// Habit id.
    pub id: String,
    /// Habit display name.
    pub name: String,
    /// Whether the habit is completed on the listed date.
    pub completed: bool,
}

/// Output format for the list command.
#[derive(Debug, Clone, Serialize)]
pub struct ListOutput {
    /// Whether the listing succeeded.
    pub success: bool,
    /// The date the check state refers to.
    pub date: NaiveDate,
    /// The listed habits, oldest first.
    pub habits: Vec<HabitRow>,
    /// Error message if listing failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The list command implementation.
pub struct ListCommand<S: HabitStore, L: CompletionLedger> {
    habits: S,
    ledger: L,
}

impl<S: HabitStore, L: CompletionLedger> ListCommand<S, L> {
    /// Create a new list command.
    pub fn new(habits: S, ledger: L) -> Self {
        Self { habits, ledger }
    }

    /// Run the list command for the given date.
    pub fn run(&self, today: NaiveDate, _options: &ListOptions) -> ListOutput {
        let habits = match self.habits.list() {
            Ok(habits) => habits,
            Err(e) => {
                return ListOutput {
                    success: false,
                    date: today,
                    habits: Vec::new(),
                    error: Some(e.to_string()),
                }
            }
        };

        let mut rows = Vec::with_capacity(habits.len());
        for habit in habits {
            let completed = match self.ledger.flag_on(&habit.id, today) {
                Ok(flag) => flag.unwrap_or(false),
                Err(e) => {
                    return ListOutput {
                        success: false,
                        date: today,
                        habits: Vec::new(),
                        error: Some(e.to_string()),
                    }
                }
            };
            rows.push(HabitRow {
                id: habit.id,
                name: habit.name,
                completed,
            });
        }

        ListOutput {
            success: true,
            date: today,
            habits: rows,
            error: None,
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &ListOutput, options: &ListOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            return serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string());
        }

        if !output.success {
            return format!(
                "Could not list habits: {}",
                output.error.as_deref().unwrap_or("unknown error")
            );
        }

        if output.habits.is_empty() {
            return "No habits yet. Add one with 'ember add <name>'.".to_string();
        }

        let mut lines = Vec::with_capacity(output.habits.len() + 1);
        lines.push(format!("Habits for {}:", output.date));
        for row in &output.habits {
            let mark = if row.completed { "x" } else { " " };
            lines.push(format!("  [{}] {} ({})", mark, row.name, row.id));
        }
        lines.join("\n")
    }
}
