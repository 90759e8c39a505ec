/// Storage layer for persisting habit data
///
/// This module handles all database operations using SQLite. It hands the
/// metrics engine read-only snapshots of habits and logs scoped to one user.

pub mod sqlite;
pub mod migrations;

// Re-export the main storage types
pub use sqlite::*;

use thiserror::Error;
use chrono::NaiveDate;
use crate::domain::{DailyNote, Habit, HabitId, LogEntry, UserId};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Habit not found: {habit_id}")]
    HabitNotFound { habit_id: String },

    #[error("Invalid stored data: {0}")]
    InvalidData(String),

    #[error("Migration error: {0}")]
    Migration(String),
}

/// Inclusive date range for log queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }
}

/// Trait defining the storage interface for habits
///
/// This trait allows us to potentially swap out SQLite for other databases
/// in the future while keeping the same interface.
pub trait HabitStorage {
    /// Create a new habit
    fn create_habit(&self, habit: &Habit) -> Result<(), StorageError>;

    /// Get a habit by ID, active or not
    fn get_habit(&self, habit_id: &HabitId) -> Result<Habit, StorageError>;

    /// Persist a habit's name and description
    fn update_habit(&self, habit: &Habit) -> Result<(), StorageError>;

    /// Delete a habit (soft delete - mark as inactive)
    fn delete_habit(&self, habit_id: &HabitId) -> Result<(), StorageError>;

    /// Remove a habit and all of its logs for good
    fn hard_delete_habit(&self, habit_id: &HabitId) -> Result<(), StorageError>;

    /// A user's habits, oldest first
    fn list_habits(&self, user_id: &UserId, active_only: bool) -> Result<Vec<Habit>, StorageError>;

    /// Every user owning at least one active habit
    fn list_users(&self) -> Result<Vec<UserId>, StorageError>;

    /// Insert or replace the entry for (habit, date)
    fn log_habit(&self, entry: &LogEntry) -> Result<(), StorageError>;

    /// One entry per active habit of the user for `date`; unlogged habits
    /// come back as not completed
    fn get_logs_for_date(&self, user_id: &UserId, date: NaiveDate) -> Result<Vec<LogEntry>, StorageError>;

    /// Logs of one habit, newest first
    fn get_habit_logs(
        &self,
        habit_id: &HabitId,
        range: Option<DateRange>,
    ) -> Result<Vec<LogEntry>, StorageError>;

    /// Logs of all of a user's active habits, newest first
    fn get_all_logs(
        &self,
        user_id: &UserId,
        range: Option<DateRange>,
    ) -> Result<Vec<LogEntry>, StorageError>;

    /// Insert or replace the note for (user, date)
    fn save_daily_note(&self, note: &DailyNote) -> Result<(), StorageError>;

    fn get_daily_note(&self, user_id: &UserId, date: NaiveDate) -> Result<Option<DailyNote>, StorageError>;

    fn delete_daily_note(&self, user_id: &UserId, date: NaiveDate) -> Result<(), StorageError>;
}
