/// Domain module containing core business logic and data types
///
/// This module defines the core entities (Habit, LogEntry, DailyNote) and the
/// per-habit streak calculation. These types are what the storage layer hands
/// to the metrics engine.

pub mod habit;
pub mod entry;
pub mod note;
pub mod streak;
pub mod types;

// Re-export public types for easy access
pub use habit::*;
pub use entry::*;
pub use note::*;
pub use streak::*;
pub use types::*;

use thiserror::Error;

/// Errors that can occur during domain operations
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid habit name: {0}")]
    InvalidHabitName(String),

    #[error("Invalid habit ID: {0}")]
    InvalidHabitId(String),

    #[error("Invalid user: {0}")]
    InvalidUser(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),
}
