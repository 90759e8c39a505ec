/// LogEntry entity for tracking habit completions
///
/// One entry records whether a habit was done on one calendar day.

use serde::{Deserialize, Serialize};
use chrono::NaiveDate;
use crate::domain::HabitId;

/// Completion state of one habit on one day
///
/// Storage keeps at most one entry per (habit, date). A missing entry means
/// the same thing as `completed == false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Which habit this entry is for
    pub habit_id: HabitId,
    /// Which day the entry is for
    pub date: NaiveDate,
    /// Whether the habit was done that day
    pub completed: bool,
}

impl LogEntry {
    pub fn new(habit_id: HabitId, date: NaiveDate, completed: bool) -> Self {
        Self {
            habit_id,
            date,
            completed,
        }
    }

    /// Shorthand for a completed entry
    pub fn done(habit_id: HabitId, date: NaiveDate) -> Self {
        Self::new(habit_id, date, true)
    }
}

/// Replace the entry for the same (habit, date) or append a new one
///
/// In-memory counterpart of the storage upsert.
pub fn upsert_entry(entries: &mut Vec<LogEntry>, entry: LogEntry) {
    match entries
        .iter_mut()
        .find(|e| e.habit_id == entry.habit_id && e.date == entry.date)
    {
        Some(existing) => existing.completed = entry.completed,
        None => entries.push(entry),
    }
}
