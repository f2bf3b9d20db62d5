//! Week command for Ember.
//!
//! Completed counts for the trailing seven days, as a small text bar chart.

use chrono::NaiveDate;
use serde::Serialize;

use crate::core::{trailing_week, DayCount};
use crate::storage::CompletionLedger;

/// Options for the week command.
#[derive(Debug, Clone, Default)]
pub struct WeekOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the week command.
#[derive(Debug, Clone, Serialize)]
pub struct WeekOutput {
    /// Whether the counts were gathered.
    pub success: bool,
    /// The seven days, oldest first.
    pub days: Vec<DayCount>,
    /// Error message if gathering failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The week command implementation.
pub struct WeekCommand<L: CompletionLedger> {
    ledger: L,
}

impl<L: CompletionLedger> WeekCommand<L> {
    /// Create a new week command.
    pub fn new(ledger: L) -> Self {
        Self { ledger }
    }

    /// Gather the trailing week ending at `today`.
    pub fn run(&self, today: NaiveDate, _options: &WeekOptions) -> WeekOutput {
        match trailing_week(&self.ledger, today) {
            Ok(days) => WeekOutput {
                success: true,
                days,
                error: None,
            },
            Err(e) => WeekOutput {
                success: false,
                days: Vec::new(),
                error: Some(e.to_string()),
            },
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &WeekOutput, options: &WeekOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            return serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string());
        }

        if !output.success {
            return format!(
                "Could not gather weekly counts: {}",
                output.error.as_deref().unwrap_or("unknown error")
            );
        }

        let mut lines = Vec::with_capacity(output.days.len() + 1);
        lines.push("Completed habits, last 7 days:".to_string());
        for day in &output.days {
            let bar = "█".repeat(day.count as usize);
            lines.push(format!("  {} {:>2} {}", day.label, day.count, bar));
        }
        lines.join("\n")
    }
}
