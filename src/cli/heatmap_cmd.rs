//! Heatmap command for Ember.
//!
//! Renders the trailing completion heatmap as a weekday-by-week text grid.
//! JSON output carries the full cells, band names and hex colors included,
//! for anything that wants to render it properly.

use chrono::NaiveDate;
use serde::Serialize;

use crate::core::{heatmap_window, HeatmapCell};
use crate::storage::{CompletionLedger, HabitStore};

/// Options for the heatmap command.
#[derive(Debug, Clone, Default)]
pub struct HeatmapOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the heatmap command.
#[derive(Debug, Clone, Serialize)]
pub struct HeatmapOutput {
    /// Whether the heatmap was built.
    pub success: bool,
    /// Last date of the window.
    pub end: NaiveDate,
    /// Window length in days.
    pub days: u32,
    /// Habit total the intensities were computed against.
    pub total_habits: u32,
    /// One cell per day, oldest first.
    pub cells: Vec<HeatmapCell>,
    /// Error message if building failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The heatmap command implementation.
pub struct HeatmapCommand<S: HabitStore, L: CompletionLedger> {
    habits: S,
    ledger: L,
}

impl<S: HabitStore, L: CompletionLedger> HeatmapCommand<S, L> {
    /// Create a new heatmap command.
    pub fn new(habits: S, ledger: L) -> Self {
        Self { habits, ledger }
    }

    /// Build the heatmap for the window of `days` days ending at `today`.
    pub fn run(&self, today: NaiveDate, days: u32, _options: &HeatmapOptions) -> HeatmapOutput {
        let total_habits = match self.habits.count() {
            Ok(count) => count,
            Err(e) => {
                return HeatmapOutput {
                    success: false,
                    end: today,
                    days,
                    total_habits: 0,
                    cells: Vec::new(),
                    error: Some(e.to_string()),
                }
            }
        };

        match heatmap_window(&self.ledger, total_habits, today, days) {
            Ok(cells) => HeatmapOutput {
                success: true,
                end: today,
                days,
                total_habits,
                cells,
                error: None,
            },
            Err(e) => HeatmapOutput {
                success: false,
                end: today,
                days,
                total_habits,
                cells: Vec::new(),
                error: Some(e.to_string()),
            },
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &HeatmapOutput, options: &HeatmapOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            return serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string());
        }

        if !output.success {
            return format!(
                "Could not build heatmap: {}",
                output.error.as_deref().unwrap_or("unknown error")
            );
        }

        format_grid(&output.cells, output.days)
    }
}

const WEEKDAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Render cells as a weekday-by-week grid, one glyph per day.
fn format_grid(cells: &[HeatmapCell], days: u32) -> String {
    if cells.is_empty() {
        return String::new();
    }

    // Column = calendar week; the first cell's weekday offsets the layout.
    let lead = cells[0].weekday as usize;
    let columns = (lead + cells.len()).div_ceil(7);

    let mut grid = vec![vec![' '; columns]; 7];
    for (index, cell) in cells.iter().enumerate() {
        let position = lead + index;
        grid[position % 7][position / 7] = cell.band.glyph();
    }

    let mut lines = Vec::with_capacity(9);
    lines.push(format!("Last {} days:", days));
    for (row, label) in grid.iter().zip(WEEKDAY_LABELS.iter()) {
        let glyphs: String = row.iter().collect();
        lines.push(format!("  {} {}", label, glyphs));
    }
    lines.push("  less · ░ ▒ ▓ █ more".to_string());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CompletionEntry, Habit, IntensityBand};
    use crate::storage::{MemoryHabitStore, MemoryLedger};
    use std::sync::Arc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn setup() -> (Arc<MemoryHabitStore>, Arc<MemoryLedger>) {
        (
            Arc::new(MemoryHabitStore::new()),
            Arc::new(MemoryLedger::new()),
        )
    }

    #[test]
    fn test_heatmap_window_size() {
        let (habits, ledger) = setup();
        let cmd = HeatmapCommand::new(habits, ledger);

        let output = cmd.run(date(2024, 3, 15), 30, &HeatmapOptions::default());

        assert!(output.success);
        assert_eq!(output.cells.len(), 30);
        assert_eq!(output.cells[29].date, date(2024, 3, 15));
    }

    #[test]
    fn test_heatmap_bands_reflect_completions() {
        let (habits, ledger) = setup();
        let today = date(2024, 3, 15);

        habits.add(&Habit::new("Run").unwrap()).unwrap();
        habits.add(&Habit::new("Read").unwrap()).unwrap();
        ledger
            .record(&CompletionEntry::new("run", today, true))
            .unwrap();
        ledger
            .record(&CompletionEntry::new("read", today, true))
            .unwrap();

        let cmd = HeatmapCommand::new(Arc::clone(&habits), Arc::clone(&ledger));
        let output = cmd.run(today, 7, &HeatmapOptions::default());

        assert_eq!(output.total_habits, 2);
        assert_eq!(output.cells[6].band, IntensityBand::Full);
        assert_eq!(output.cells[5].band, IntensityBand::Empty);
    }

    #[test]
    fn test_heatmap_empty_catalog_all_empty_bands() {
        let (habits, ledger) = setup();
        let today = date(2024, 3, 15);

        // Completions exist but no habits remain; ratio is defined as 0
        ledger
            .record(&CompletionEntry::new("gone", today, true))
            .unwrap();

        let cmd = HeatmapCommand::new(habits, ledger);
        let output = cmd.run(today, 7, &HeatmapOptions::default());

        assert_eq!(output.total_habits, 0);
        assert!(output
            .cells
            .iter()
            .all(|c| c.band == IntensityBand::Empty));
    }

    #[test]
    fn test_format_grid_layout() {
        let (habits, ledger) = setup();
        habits.add(&Habit::new("Run").unwrap()).unwrap();
        // 2024-03-15 is a Friday
        ledger
            .record(&CompletionEntry::new("run", date(2024, 3, 15), true))
            .unwrap();

        let cmd = HeatmapCommand::new(Arc::clone(&habits), Arc::clone(&ledger));
        let output = cmd.run(date(2024, 3, 15), 7, &HeatmapOptions::default());
        let formatted = cmd.format_output(&output, &HeatmapOptions::default());

        assert!(formatted.contains("Last 7 days:"));
        assert!(formatted.contains("Mon"));
        assert!(formatted.contains("Sun"));
        // The Friday row carries the single full glyph
        let friday_row = formatted
            .lines()
            .find(|l| l.trim_start().starts_with("Fri"))
            .unwrap();
        assert!(friday_row.contains('█'));
    }

    #[test]
    fn test_format_output_json_includes_colors() {
        let (habits, ledger) = setup();
        let cmd = HeatmapCommand::new(habits, ledger);

        let output = cmd.run(date(2024, 3, 15), 7, &HeatmapOptions::default());
        let options = HeatmapOptions {
            json: true,
            ..Default::default()
        };

        let formatted = cmd.format_output(&output, &options);
        assert!(formatted.contains("\"band\": \"empty\""));
        assert!(formatted.contains("\"color\": \"#161b22\""));
        assert!(formatted.contains("\"week\""));
    }
}
