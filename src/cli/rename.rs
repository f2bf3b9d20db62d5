//! Rename command for Ember.
//!
//! Changes a habit's display name. The id, and with it the ledger history,
//! stays the same.

use serde::Serialize;

use crate::error::EmberError;
use crate::storage::HabitStore;

/// Options for the rename command.
#[derive(Debug, Clone, Default)]
pub struct RenameOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the rename command.
#[derive(Debug, Clone, Serialize)]
pub struct RenameOutput {
    /// Whether the habit was renamed.
    pub success: bool,
    /// The habit's id.
    pub id: String,
    /// The previous display name.
    pub old_name: String,
    /// The new display name.
    pub new_name: String,
    /// Error message if the rename failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RenameOutput {
    /// Create a failed output.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            id: String::new(),
            old_name: String::new(),
            new_name: String::new(),
            error: Some(error.into()),
        }
    }
}

/// The rename command implementation.
pub struct RenameCommand<S: HabitStore> {
    habits: S,
}

impl<S: HabitStore> RenameCommand<S> {
    /// Create a new rename command.
    pub fn new(habits: S) -> Self {
        Self { habits }
    }

    /// Rename the habit matching `name` to `new_name`.
    pub fn run(&self, name: &str, new_name: &str, _options: &RenameOptions) -> RenameOutput {
        let mut habit = match self.habits.find(name) {
            Ok(Some(habit)) => habit,
            Ok(None) => {
                return RenameOutput::failure(EmberError::unknown_habit(name).to_string())
            }
            Err(e) => return RenameOutput::failure(e.to_string()),
        };

        let old_name = habit.name.clone();
        if let Err(e) = habit.rename(new_name) {
            return RenameOutput::failure(e.to_string());
        }

        if let Err(e) = self.habits.update(&habit) {
            return RenameOutput::failure(e.to_string());
        }

        RenameOutput {
            success: true,
            id: habit.id,
            old_name,
            new_name: habit.name,
            error: None,
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &RenameOutput, options: &RenameOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else if output.success {
            format!("Renamed '{}' to '{}'.", output.old_name, output.new_name)
        } else {
            format!(
                "Could not rename habit: {}",
                output.error.as_deref().unwrap_or("unknown error")
            )
        }
    }
}
