//! Add command for Ember.
//!
//! Creates a new habit in the profile's catalog.

use serde::Serialize;

use crate::core::Habit;
use crate::storage::HabitStore;

/// Options for the add command.
#[derive(Debug, Clone, Default)]
pub struct AddOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the add command.
#[derive(Debug, Clone, Serialize)]
pub struct AddOutput {
    /// Whether the habit was created.
    pub success: bool,
    /// The new habit's id.
    pub id: String,
    /// The new habit's display name.
    pub name: String,
    /// Error message if creation failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AddOutput {
    /// Create a successful output.
    pub fn success(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            success: true,
            id: id.into(),
            name: name.into(),
            error: None,
        }
    }

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

/// The add command implementation.
pub struct AddCommand<S: HabitStore> {
    habits: S,
}

impl<S: HabitStore> AddCommand<S> {
    /// Create a new add command.
    pub fn new(habits: S) -> Self {
        Self { habits }
    }

    /// Run the add command with the given habit name.
    pub fn run(&self, name: &str, _options: &AddOptions) -> AddOutput {
        let habit = match Habit::new(name) {
            Ok(habit) => habit,
            Err(e) => return AddOutput::failure(e.to_string()),
        };

        match self.habits.add(&habit) {
            Ok(()) => AddOutput::success(habit.id, habit.name),
            Err(e) => AddOutput::failure(e.to_string()),
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &AddOutput, options: &AddOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else if output.success {
            format!("Added habit '{}' ({})", output.name, output.id)
        } else {
            format!(
                "Could not add habit: {}",
                output.error.as_deref().unwrap_or("unknown error")
            )
        }
    }
}
