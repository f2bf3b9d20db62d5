//! Remove command for Ember.
//!
//! Deletes a habit and purges its ledger history. Progression is untouched:
//! credit already granted stays granted.

use serde::Serialize;

use crate::error::EmberError;
use crate::storage::{CompletionLedger, HabitStore};

/// Options for the remove command.
#[derive(Debug, Clone, Default)]
pub struct RemoveOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the remove command.
#[derive(Debug, Clone, Serialize)]
pub struct RemoveOutput {
    /// Whether the habit was removed.
    pub success: bool,
    /// The removed habit's id.
    pub id: String,
    /// The removed habit's display name.
    pub name: String,
    /// Error message if removal failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RemoveOutput {
    /// Create a failed output.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            id: String::new(),
            name: String::new(),
            error: Some(error.into()),
        }
    }
}

/// The remove command implementation.
pub struct RemoveCommand<S: HabitStore, L: CompletionLedger> {
    habits: S,
    ledger: L,
}

impl<S: HabitStore, L: CompletionLedger> RemoveCommand<S, L> {
    /// Create a new remove command.
    pub fn new(habits: S, ledger: L) -> Self {
        Self { habits, ledger }
    }

    /// Remove the habit matching `name`.
    pub fn run(&self, name: &str, _options: &RemoveOptions) -> RemoveOutput {
        let habit = match self.habits.find(name) {
            Ok(Some(habit)) => habit,
            Ok(None) => {
                return RemoveOutput::failure(EmberError::unknown_habit(name).to_string())
            }
            Err(e) => return RemoveOutput::failure(e.to_string()),
        };

        if let Err(e) = self.habits.remove(&habit.id) {
            return RemoveOutput::failure(e.to_string());
        }

        // Cascade: the habit's ledger history goes with it
        if let Err(e) = self.ledger.clear_habit(&habit.id) {
            return RemoveOutput::failure(e.to_string());
        }

        RemoveOutput {
            success: true,
            id: habit.id,
            name: habit.name,
            error: None,
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &RemoveOutput, options: &RemoveOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else if output.success {
            format!("Removed habit '{}' and its history.", output.name)
        } else {
            format!(
                "Could not remove habit: {}",
                output.error.as_deref().unwrap_or("unknown error")
            )
        }
    }
}
