use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use habit_streaks::{Friend, UserId};

/// Longest window, in days, accepted for trends and leaderboard rates
const MAX_WINDOW_DAYS: i64 = 3660;

/// Command line arguments for the habit streak tracker
#[derive(Parser, Debug)]
#[command(name = "habit-streaks", author, version, about, long_about = None)]
pub struct Args {
    /// Path to the SQLite database file
    /// If not provided, uses a default location in the user's home directory
    #[arg(long, env = "HABIT_STREAKS_DB", global = true)]
    pub database: Option<PathBuf>,

    /// Who is using the tracker
    #[arg(short, long, env = "HABIT_STREAKS_USER", default_value = UserId::DEFAULT, global = true)]
    pub user: String,

    /// Leaderboard member, as `id` or `id=Display Name` (repeatable)
    #[arg(long = "friend", env = "HABIT_STREAKS_FRIENDS", value_delimiter = ',', global = true)]
    pub friends: Vec<Friend>,

    /// Trailing days used for leaderboard completion rates
    #[arg(long, default_value_t = 7, global = true, value_parser = clap::value_parser!(u32).range(1..=MAX_WINDOW_DAYS))]
    pub window_days: u32,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Enable verbose output (implies debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Overview of today, streaks and recent completion
    Dashboard,
    /// Create a new habit
    Add {
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// List habits
    Habits {
        /// Include deleted habits
        #[arg(long)]
        all: bool,
    },
    /// Rename or re-describe a habit
    Edit {
        /// Habit ID or unique prefix
        habit: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, conflicts_with = "clear_description")]
        description: Option<String>,
        #[arg(long)]
        clear_description: bool,
    },
    /// Delete a habit, keeping its history
    Remove { habit: String },
    /// Delete a habit and its history for good
    Purge {
        habit: String,
        /// Confirm permanent deletion
        #[arg(long)]
        yes: bool,
    },
    /// Mark a habit done (or not done) for a day
    Log {
        habit: String,
        /// Day to log (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Mark as not done
        #[arg(long)]
        undo: bool,
    },
    /// Habits and note for one day
    Day {
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Monday-to-Sunday overview
    Week {
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Another user's day and week
    Friend {
        user: String,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Current and longest streak per habit
    Streak {
        /// Only this habit
        habit: Option<String>,
    },
    /// Daily completion of one habit over recent days
    Trend {
        habit: String,
        #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u32).range(1..=MAX_WINDOW_DAYS))]
        days: u32,
    },
    /// Completion percentage per week
    Weekly {
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
    },
    /// Totals for a calendar month
    Month {
        #[arg(long)]
        month: Option<u32>,
        #[arg(long)]
        year: Option<i32>,
    },
    /// Your completion rate, today's status and joint streak
    Stats {
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
    },
    /// Friends ranked by streak, then completion rate
    Leaderboard,
    /// Show, set or clear the note for a day
    Note {
        /// New text; an empty string clears the note
        text: Option<String>,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Patterns worth knowing about
    Insights,
}
