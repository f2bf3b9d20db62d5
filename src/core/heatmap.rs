//! Calendar heatmap intensity mapping.
//!
//! Each day maps to one of five discrete intensity bands from the ratio of
//! completed habits to total habits. Band colors are the familiar
//! contribution-graph greens.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// One of the five discrete heatmap intensity bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IntensityBand {
    /// No completions.
    Empty,
    /// Up to a quarter of habits completed.
    Low,
    /// Up to half of habits completed.
    Medium,
    /// Up to three quarters of habits completed.
    High,
    /// More than three quarters of habits completed.
    Full,
}

impl IntensityBand {
    /// Map a completion ratio to a band, with inclusive upper bounds.
    ///
    /// Ratios above 1.0 (possible after deleting habits whose completions
    /// remain in older ledger entries) clamp to `Full`.
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio <= 0.0 {
            IntensityBand::Empty
        } else if ratio <= 0.25 {
            IntensityBand::Low
        } else if ratio <= 0.5 {
            IntensityBand::Medium
        } else if ratio <= 0.75 {
            IntensityBand::High
        } else {
            IntensityBand::Full
        }
    }

    /// Map a completed count against a habit total to a band.
    ///
    /// The ratio is 0 when `total` is 0.
    pub fn from_counts(completed: u32, total: u32) -> Self {
        if total == 0 {
            return IntensityBand::Empty;
        }
        Self::from_ratio(f64::from(completed) / f64::from(total))
    }

    /// Hex color for the band.
    pub fn hex(&self) -> &'static str {
        match self {
            IntensityBand::Empty => "#161b22",
            IntensityBand::Low => "#0e4429",
            IntensityBand::Medium => "#006d32",
            IntensityBand::High => "#26a641",
            IntensityBand::Full => "#39d353",
        }
    }

    /// Single display glyph for terminal rendering.
    pub fn glyph(&self) -> char {
        match self {
            IntensityBand::Empty => '·',
            IntensityBand::Low => '░',
            IntensityBand::Medium => '▒',
            IntensityBand::High => '▓',
            IntensityBand::Full => '█',
        }
    }
}

/// One rendered heatmap day.
#[derive(Debug, Clone, Serialize)]
pub struct HeatmapCell {
    /// The calendar date of the cell.
    pub date: NaiveDate,
    /// Weekday index, Monday = 0.
    pub weekday: u32,
    /// ISO week number.
    pub week: u32,
    /// Abbreviated month name, e.g. "Mar".
    pub month: String,
    /// Completed habit count on the date.
    pub completed: u32,
    /// The intensity band for the date.
    pub band: IntensityBand,
    /// The band's hex color, for renderers that take colors directly.
    pub color: &'static str,
}

impl HeatmapCell {
    /// Build a cell for one date from its completed count and the profile's
    /// habit total.
    pub fn new(date: NaiveDate, completed: u32, total_habits: u32) -> Self {
        let band = IntensityBand::from_counts(completed, total_habits);
        Self {
            date,
            weekday: date.weekday().num_days_from_monday(),
            week: date.iso_week().week(),
            month: date.format("%b").to_string(),
            completed,
            band,
            color: band.hex(),
        }
    }
}
