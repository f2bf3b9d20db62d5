//! Derived statistics over the completion ledger.
//!
//! Everything here is recomputed from ledger entries on demand; nothing is
//! cached or persisted. These queries feed the status, week, month and
//! heatmap views.

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::core::heatmap::HeatmapCell;
use crate::error::{EmberError, Result};
use crate::storage::CompletionLedger;

/// Today's checklist position: completed vs remaining habits.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct TodaySummary {
    /// Habits completed today.
    pub completed: u32,
    /// Habits not yet completed today.
    pub remaining: u32,
    /// Total habits in the catalog.
    pub total: u32,
}

/// Compute today's summary for a profile with `total_habits` habits.
///
/// `remaining` never goes negative even when completions outnumber the
/// current catalog (habits deleted after being checked off).
pub fn today_summary(
    ledger: &impl CompletionLedger,
    total_habits: u32,
    today: NaiveDate,
) -> Result<TodaySummary> {
    let completed = ledger.completed_count_on(today)?;

    Ok(TodaySummary {
        completed,
        remaining: total_habits.saturating_sub(completed),
        total: total_habits,
    })
}

/// One day's completed count with a weekday label.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DayCount {
    /// The calendar date.
    pub date: NaiveDate,
    /// Abbreviated weekday name, e.g. "Mon".
    pub label: String,
    /// Completed habit count on the date.
    pub count: u32,
}

/// Completed counts for the trailing seven days, oldest first.
pub fn trailing_week(
    ledger: &impl CompletionLedger,
    today: NaiveDate,
) -> Result<Vec<DayCount>> {
    let start = today - Duration::days(6);
    let counts = ledger.completed_counts_between(start, today)?;

    let mut days = Vec::with_capacity(7);
    for offset in 0..7 {
        let date = start + Duration::days(offset);
        days.push(DayCount {
            date,
            label: date.format("%a").to_string(),
            count: counts.get(&date).copied().unwrap_or(0),
        });
    }

    Ok(days)
}

/// First day of a calendar month, if the month is valid.
pub fn month_start(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Number of days in a calendar month, if the month is valid.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let start = month_start(year, month)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((next - start).num_days() as u32)
}

/// Completed counts per day of a calendar month.
///
/// Index 0 is the first of the month; the vector covers every day of the
/// month whether or not anything was completed.
pub fn monthly_counts(
    ledger: &impl CompletionLedger,
    year: i32,
    month: u32,
) -> Result<Vec<u32>> {
    let start = month_start(year, month)
        .ok_or_else(|| EmberError::config(format!("invalid month: {}-{}", year, month)))?;
    let days = days_in_month(year, month)
        .ok_or_else(|| EmberError::config(format!("invalid month: {}-{}", year, month)))?;

    let end = start + Duration::days(i64::from(days) - 1);
    let counts = ledger.completed_counts_between(start, end)?;

    let mut daily = vec![0u32; days as usize];
    for (date, count) in counts {
        daily[(date.day() - 1) as usize] = count;
    }

    Ok(daily)
}

/// Heatmap cells for the trailing window of `days` days ending today,
/// oldest first.
pub fn heatmap_window(
    ledger: &impl CompletionLedger,
    total_habits: u32,
    today: NaiveDate,
    days: u32,
) -> Result<Vec<HeatmapCell>> {
    let start = today - Duration::days(i64::from(days) - 1);
    let counts = ledger.completed_counts_between(start, today)?;

    let mut cells = Vec::with_capacity(days as usize);
    let mut current = start;
    while current <= today {
        let completed = counts.get(&current).copied().unwrap_or(0);
        cells.push(HeatmapCell::new(current, completed, total_habits));
        current += Duration::days(1);
    }

    Ok(cells)
}
