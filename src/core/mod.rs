//! Core types and logic for Ember.
//!
//! This module contains the habit and ledger entry types, the progression
//! state machine, badge and heatmap derivation, and the engine that ties
//! them to storage.

pub mod analytics;
pub mod badges;
pub mod engine;
pub mod habit;
pub mod heatmap;
pub mod progress;

pub use analytics::{
    days_in_month, heatmap_window, monthly_counts, today_summary, trailing_week, DayCount,
    TodaySummary,
};
pub use badges::{badges_for, BADGES};
pub use engine::{AdvanceOutcome, ProgressionEngine};
pub use habit::{slugify, validate_name, CompletionEntry, Habit, MAX_NAME_LEN};
pub use heatmap::{HeatmapCell, IntensityBand};
pub use progress::{xp, DayCredit, Progression};
