/// SQLite implementation of the habit storage interface
///
/// This module provides the concrete SQLite implementation for storing
/// and retrieving habit data. It handles all SQL queries and data conversion.

use std::path::PathBuf;
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::domain::{DailyNote, Habit, HabitId, LogEntry, UserId};
use crate::storage::{migrations, DateRange, HabitStorage, StorageError};

const HABIT_COLUMNS: &str = "id, user_id, name, description, created_on, is_active";

/// SQLite-based storage implementation
///
/// This struct holds a connection to the SQLite database and implements
/// all the storage operations defined in the HabitStorage trait.
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Create a new SQLite storage instance
    ///
    /// This opens the database file and runs any necessary migrations
    /// to ensure the schema is up to date.
    pub fn new(db_path: PathBuf) -> Result<Self, StorageError> {
        let conn = Connection::open(&db_path)
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;

        let storage = Self::with_connection(conn)?;
        tracing::info!("SQLite storage initialized at: {:?}", db_path);
        Ok(storage)
    }

    /// Throwaway database, mostly for tests
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self, StorageError> {
        conn.execute("PRAGMA foreign_keys = ON", [])
            .map_err(|e| StorageError::Connection(format!("Failed to enable foreign keys: {}", e)))?;

        migrations::initialize_database(&conn)?;

        Ok(Self { conn })
    }

    fn habit_from_row(row: &Row<'_>) -> rusqlite::Result<Habit> {
        let id_str: String = row.get(0)?;
        let id = HabitId::from_string(&id_str).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })?;

        let user_str: String = row.get(1)?;
        let user_id = UserId::new(user_str).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
        })?;

        Ok(Habit::from_existing(
            id,
            user_id,
            row.get(2)?, // name
            row.get(3)?, // description
            row.get(4)?, // created_on
            row.get(5)?, // is_active
        ))
    }

    fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<LogEntry> {
        let id_str: String = row.get(0)?;
        let habit_id = HabitId::from_string(&id_str).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })?;

        Ok(LogEntry::new(habit_id, row.get(1)?, row.get(2)?))
    }

    fn query_entries(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<LogEntry>, StorageError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, Self::entry_from_row)?;

        let mut entries = Vec::new();
        for entry in rows {
            entries.push(entry?);
        }
        Ok(entries)
    }
}

impl HabitStorage for SqliteStorage {
    fn create_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO habits (id, user_id, name, description, created_on, is_active)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                habit.id.to_string(),
                habit.user_id.as_str(),
                habit.name,
                habit.description,
                habit.created_on,
                habit.is_active
            ],
        )?;

        tracing::debug!("Created habit: {} ({}) for {}", habit.name, habit.id, habit.user_id);
        Ok(())
    }

    fn get_habit(&self, habit_id: &HabitId) -> Result<Habit, StorageError> {
        let sql = format!("SELECT {} FROM habits WHERE id = ?1", HABIT_COLUMNS);
        self.conn
            .query_row(&sql, params![habit_id.to_string()], Self::habit_from_row)
            .optional()?
            .ok_or_else(|| StorageError::HabitNotFound {
                habit_id: habit_id.to_string(),
            })
    }

    fn update_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        let rows_affected = self.conn.execute(
            "UPDATE habits SET name = ?2, description = ?3, is_active = ?4 WHERE id = ?1",
            params![
                habit.id.to_string(),
                habit.name,
                habit.description,
                habit.is_active
            ],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::HabitNotFound {
                habit_id: habit.id.to_string(),
            });
        }

        tracing::debug!("Updated habit: {} ({})", habit.name, habit.id);
        Ok(())
    }

    fn delete_habit(&self, habit_id: &HabitId) -> Result<(), StorageError> {
        let rows_affected = self.conn.execute(
            "UPDATE habits SET is_active = 0 WHERE id = ?1",
            params![habit_id.to_string()],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::HabitNotFound {
                habit_id: habit_id.to_string(),
            });
        }

        tracing::debug!("Soft deleted habit: {}", habit_id);
        Ok(())
    }

    fn hard_delete_habit(&self, habit_id: &HabitId) -> Result<(), StorageError> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "DELETE FROM habit_logs WHERE habit_id = ?1",
            params![habit_id.to_string()],
        )?;
        let rows_affected = tx.execute(
            "DELETE FROM habits WHERE id = ?1",
            params![habit_id.to_string()],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::HabitNotFound {
                habit_id: habit_id.to_string(),
            });
        }
        tx.commit()?;

        tracing::info!("Permanently deleted habit: {}", habit_id);
        Ok(())
    }

    fn list_habits(&self, user_id: &UserId, active_only: bool) -> Result<Vec<Habit>, StorageError> {
        let mut sql = format!("SELECT {} FROM habits WHERE user_id = ?1", HABIT_COLUMNS);
        if active_only {
            sql.push_str(" AND is_active = 1");
        }
        sql.push_str(" ORDER BY created_on, rowid");

        let mut stmt = self.conn.prepare(&sql)?;
        let habit_iter = stmt.query_map(params![user_id.as_str()], Self::habit_from_row)?;

        let mut habits = Vec::new();
        for habit in habit_iter {
            habits.push(habit?);
        }

        Ok(habits)
    }

    fn list_users(&self) -> Result<Vec<UserId>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT user_id FROM habits WHERE is_active = 1 ORDER BY user_id"
        )?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut users = Vec::new();
        for user in rows {
            let user = UserId::new(user?)
                .map_err(|e| StorageError::InvalidData(e.to_string()))?;
            users.push(user);
        }

        Ok(users)
    }

    fn log_habit(&self, entry: &LogEntry) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO habit_logs (habit_id, log_date, completed)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (habit_id, log_date) DO UPDATE SET completed = excluded.completed",
            params![entry.habit_id.to_string(), entry.date, entry.completed],
        )?;

        tracing::debug!(
            "Logged habit {} on {}: completed={}",
            entry.habit_id, entry.date, entry.completed
        );
        Ok(())
    }

    fn get_logs_for_date(&self, user_id: &UserId, date: NaiveDate) -> Result<Vec<LogEntry>, StorageError> {
        self.query_entries(
            "SELECT h.id, ?1, COALESCE(hl.completed, 0)
             FROM habits h
             LEFT JOIN habit_logs hl ON h.id = hl.habit_id AND hl.log_date = ?1
             WHERE h.is_active = 1 AND h.user_id = ?2
             ORDER BY h.created_on, h.rowid",
            params![date, user_id.as_str()],
        )
    }

    fn get_habit_logs(
        &self,
        habit_id: &HabitId,
        range: Option<DateRange>,
    ) -> Result<Vec<LogEntry>, StorageError> {
        match range {
            Some(range) => self.query_entries(
                "SELECT habit_id, log_date, completed FROM habit_logs
                 WHERE habit_id = ?1 AND log_date BETWEEN ?2 AND ?3
                 ORDER BY log_date DESC",
                params![habit_id.to_string(), range.start, range.end],
            ),
            None => self.query_entries(
                "SELECT habit_id, log_date, completed FROM habit_logs
                 WHERE habit_id = ?1
                 ORDER BY log_date DESC",
                params![habit_id.to_string()],
            ),
        }
    }

    fn get_all_logs(
        &self,
        user_id: &UserId,
        range: Option<DateRange>,
    ) -> Result<Vec<LogEntry>, StorageError> {
        match range {
            Some(range) => self.query_entries(
                "SELECT hl.habit_id, hl.log_date, hl.completed
                 FROM habit_logs hl
                 JOIN habits h ON hl.habit_id = h.id
                 WHERE h.is_active = 1 AND h.user_id = ?1 AND hl.log_date BETWEEN ?2 AND ?3
                 ORDER BY hl.log_date DESC, h.name",
                params![user_id.as_str(), range.start, range.end],
            ),
            None => self.query_entries(
                "SELECT hl.habit_id, hl.log_date, hl.completed
                 FROM habit_logs hl
                 JOIN habits h ON hl.habit_id = h.id
                 WHERE h.is_active = 1 AND h.user_id = ?1
                 ORDER BY hl.log_date DESC, h.name",
                params![user_id.as_str()],
            ),
        }
    }

    fn save_daily_note(&self, note: &DailyNote) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO daily_notes (user_id, note_date, note)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (user_id, note_date) DO UPDATE SET note = excluded.note",
            params![note.user_id.as_str(), note.date, note.text],
        )?;

        tracing::debug!("Saved note for {} on {}", note.user_id, note.date);
        Ok(())
    }

    fn get_daily_note(&self, user_id: &UserId, date: NaiveDate) -> Result<Option<DailyNote>, StorageError> {
        let text: Option<String> = self
            .conn
            .query_row(
                "SELECT note FROM daily_notes WHERE user_id = ?1 AND note_date = ?2",
                params![user_id.as_str(), date],
                |row| row.get(0),
            )
            .optional()?;

        Ok(text.map(|text| DailyNote {
            user_id: user_id.clone(),
            date,
            text,
        }))
    }

    fn delete_daily_note(&self, user_id: &UserId, date: NaiveDate) -> Result<(), StorageError> {
        self.conn.execute(
            "DELETE FROM daily_notes WHERE user_id = ?1 AND note_date = ?2",
            params![user_id.as_str(), date],
        )?;
        Ok(())
    }
}
