//! Ember - Daily habit tracker with streaks, XP and levels
//!
//! CLI entry point.

use std::process::ExitCode;

use chrono::{Datelike, Local, NaiveDate};
use clap::{Parser, Subcommand};

use ember::config::Config;
use ember::storage::FileProfileStore;

// =============================================================================
// CLI Definition
// =============================================================================

/// Ember - Daily habit tracker with streaks, XP and levels
#[derive(Parser)]
#[command(name = "ember")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Profile to operate on (defaults to config, then "default")
    #[arg(long, global = true)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new habit
    Add {
        /// Display name of the habit
        name: String,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// List habits with today's check state
    List {
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Check a habit off (or undo it) and update progression
    Check {
        /// Habit name or id
        name: String,
        /// Date to record for (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Record the habit as not completed
        #[arg(long)]
        undo: bool,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Remove a habit and its history
    Remove {
        /// Habit name or id
        name: String,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Rename a habit
    Rename {
        /// Habit name or id
        name: String,
        /// New display name
        new_name: String,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Show today's checklist and progression
    Status {
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Completed counts for the last 7 days
    Week {
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Completed counts per day of a month
    Month {
        /// Year (defaults to the current year)
        #[arg(long)]
        year: Option<i32>,
        /// Month 1-12 (defaults to the current month)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Completion heatmap for the trailing window
    Heatmap {
        /// Window length in days (defaults to config)
        #[arg(long)]
        days: Option<u32>,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Lifetime totals for the profile
    Summary {
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },
}

// =============================================================================
// Main Entry Point
// =============================================================================

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("ember error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Convert a success boolean to an exit code.
fn success_to_exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Today in the user's local calendar.
///
/// Streak continuity is defined in the user's local calendar, so the local
/// date is the right "today", not UTC.
fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Resolve the profile: command line, then config (which already folds in
/// the EMBER_PROFILE environment variable).
fn resolve_profile(flag: Option<String>, config: &Config) -> String {
    flag.unwrap_or_else(|| config.profile.name.clone())
}

/// Run the CLI and return the exit code.
fn run() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = Config::load();
    let profile = resolve_profile(cli.profile, &config);
    let store = FileProfileStore::open(&profile)?;

    match cli.command {
        Commands::Add { name, json, quiet } => run_add(store, &name, json, quiet),
        Commands::List { json, quiet } => run_list(store, json, quiet),
        Commands::Check {
            name,
            date,
            undo,
            json,
            quiet,
        } => run_check(store, &name, date, undo, json, quiet),
        Commands::Remove { name, json, quiet } => run_remove(store, &name, json, quiet),
        Commands::Rename {
            name,
            new_name,
            json,
            quiet,
        } => run_rename(store, &name, &new_name, json, quiet),
        Commands::Status { json, quiet } => run_status(store, json, quiet),
        Commands::Week { json, quiet } => run_week(store, json, quiet),
        Commands::Month {
            year,
            month,
            json,
            quiet,
        } => run_month(store, year, month, json, quiet),
        Commands::Heatmap { days, json, quiet } => {
            run_heatmap(store, days.unwrap_or(config.heatmap.days), json, quiet)
        }
        Commands::Summary { json, quiet } => run_summary(store, json, quiet),
    }
}

// =============================================================================
// Command Implementations
// =============================================================================

fn run_add(
    store: FileProfileStore,
    name: &str,
    json: bool,
    quiet: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    use ember::cli::add::{AddCommand, AddOptions};

    let cmd = AddCommand::new(store);
    let options = AddOptions { json, quiet };

    let output = cmd.run(name, &options);
    let formatted = cmd.format_output(&output, &options);

    if !formatted.is_empty() {
        println!("{}", formatted);
    }

    Ok(success_to_exit_code(output.success))
}

fn run_list(
    store: FileProfileStore,
    json: bool,
    quiet: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    use ember::cli::list::{ListCommand, ListOptions};

    let cmd = ListCommand::new(store.clone(), store);
    let options = ListOptions { json, quiet };

    let output = cmd.run(local_today(), &options);
    let formatted = cmd.format_output(&output, &options);

    if !formatted.is_empty() {
        println!("{}", formatted);
    }

    Ok(success_to_exit_code(output.success))
}

fn run_check(
    store: FileProfileStore,
    name: &str,
    date: Option<NaiveDate>,
    undo: bool,
    json: bool,
    quiet: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    use ember::cli::check::{CheckCommand, CheckOptions};

    let cmd = CheckCommand::new(store.clone(), store.clone(), store);
    let options = CheckOptions { json, quiet };

    let output = cmd.run(name, date.unwrap_or_else(local_today), !undo, &options);
    let formatted = cmd.format_output(&output, &options);

    if !formatted.is_empty() {
        println!("{}", formatted);
    }

    Ok(success_to_exit_code(output.success))
}

fn run_remove(
    store: FileProfileStore,
    name: &str,
    json: bool,
    quiet: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    use ember::cli::remove::{RemoveCommand, RemoveOptions};

    let cmd = RemoveCommand::new(store.clone(), store);
    let options = RemoveOptions { json, quiet };

    let output = cmd.run(name, &options);
    let formatted = cmd.format_output(&output, &options);

    if !formatted.is_empty() {
        println!("{}", formatted);
    }

    Ok(success_to_exit_code(output.success))
}

fn run_rename(
    store: FileProfileStore,
    name: &str,
    new_name: &str,
    json: bool,
    quiet: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    use ember::cli::rename::{RenameCommand, RenameOptions};

    let cmd = RenameCommand::new(store);
    let options = RenameOptions { json, quiet };

    let output = cmd.run(name, new_name, &options);
    let formatted = cmd.format_output(&output, &options);

    if !formatted.is_empty() {
        println!("{}", formatted);
    }

    Ok(success_to_exit_code(output.success))
}

fn run_status(
    store: FileProfileStore,
    json: bool,
    quiet: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    use ember::cli::status::{StatusCommand, StatusOptions};

    let cmd = StatusCommand::new(store.clone(), store.clone(), store);
    let options = StatusOptions { json, quiet };

    let output = cmd.run(local_today(), &options);
    let formatted = cmd.format_output(&output, &options);

    if !formatted.is_empty() {
        println!("{}", formatted);
    }

    Ok(success_to_exit_code(output.success))
}

fn run_week(
    store: FileProfileStore,
    json: bool,
    quiet: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    use ember::cli::week::{WeekCommand, WeekOptions};

    let cmd = WeekCommand::new(store);
    let options = WeekOptions { json, quiet };

    let output = cmd.run(local_today(), &options);
    let formatted = cmd.format_output(&output, &options);

    if !formatted.is_empty() {
        println!("{}", formatted);
    }

    Ok(success_to_exit_code(output.success))
}

fn run_month(
    store: FileProfileStore,
    year: Option<i32>,
    month: Option<u32>,
    json: bool,
    quiet: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    use ember::cli::month::{MonthCommand, MonthOptions};

    let today = local_today();
    let cmd = MonthCommand::new(store);
    let options = MonthOptions { json, quiet };

    let output = cmd.run(
        year.unwrap_or_else(|| today.year()),
        month.unwrap_or_else(|| today.month()),
        &options,
    );
    let formatted = cmd.format_output(&output, &options);

    if !formatted.is_empty() {
        println!("{}", formatted);
    }

    Ok(success_to_exit_code(output.success))
}

fn run_heatmap(
    store: FileProfileStore,
    days: u32,
    json: bool,
    quiet: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    use ember::cli::heatmap_cmd::{HeatmapCommand, HeatmapOptions};

    let cmd = HeatmapCommand::new(store.clone(), store);
    let options = HeatmapOptions { json, quiet };

    let output = cmd.run(local_today(), days, &options);
    let formatted = cmd.format_output(&output, &options);

    if !formatted.is_empty() {
        println!("{}", formatted);
    }

    Ok(success_to_exit_code(output.success))
}

fn run_summary(
    store: FileProfileStore,
    json: bool,
    quiet: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    use ember::cli::summary::{SummaryCommand, SummaryOptions};

    let cmd = SummaryCommand::new(store.clone(), store.clone(), store);
    let options = SummaryOptions { json, quiet };

    let output = cmd.run(&options);
    let formatted = cmd.format_output(&output, &options);

    if !formatted.is_empty() {
        println!("{}", formatted);
    }

    Ok(success_to_exit_code(output.success))
}

// =============================================================================
// Tests
// =============================================================================
