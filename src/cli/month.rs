//! Month command for Ember.
//!
//! Completed counts per day of a calendar month, the data behind the
//! original monthly progress chart.

use serde::Serialize;

use crate::core::monthly_counts;
use crate::storage::CompletionLedger;

/// Options for the month command.
#[derive(Debug, Clone, Default)]
pub struct MonthOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the month command.
#[derive(Debug, Clone, Serialize)]
pub struct MonthOutput {
    /// Whether the counts were gathered.
    pub success: bool,
    /// The year.
    pub year: i32,
    /// The month (1-12).
    pub month: u32,
    /// Completed counts per day; index 0 is the first of the month.
    pub daily_counts: Vec<u32>,
    /// Error message if gathering failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The month command implementation.
pub struct MonthCommand<L: CompletionLedger> {
    ledger: L,
}

impl<L: CompletionLedger> MonthCommand<L> {
    /// Create a new month command.
    pub fn new(ledger: L) -> Self {
        Self { ledger }
    }

    /// Gather daily counts for the given month.
    pub fn run(&self, year: i32, month: u32, _options: &MonthOptions) -> MonthOutput {
        match monthly_counts(&self.ledger, year, month) {
            Ok(daily_counts) => MonthOutput {
                success: true,
                year,
                month,
                daily_counts,
                error: None,
            },
            Err(e) => MonthOutput {
                success: false,
                year,
                month,
                daily_counts: Vec::new(),
                error: Some(e.to_string()),
            },
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &MonthOutput, options: &MonthOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            return serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string());
        }

        if !output.success {
            return format!(
                "Could not gather monthly counts: {}",
                output.error.as_deref().unwrap_or("unknown error")
            );
        }

        let mut lines = Vec::with_capacity(output.daily_counts.len() + 1);
        lines.push(format!(
            "Completed habits, {}-{:02}:",
            output.year, output.month
        ));
        for (index, count) in output.daily_counts.iter().enumerate() {
            let bar = "█".repeat(*count as usize);
            lines.push(format!("  {:>2} {:>2} {}", index + 1, count, bar));
        }
        lines.join("\n")
    }
}
