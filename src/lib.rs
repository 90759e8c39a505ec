/// Public library interface for the habit streak tracker
///
/// This module exports the tracker service and the public types that the
/// command line binary and tests use. The metrics engine lives in
/// `analytics` and only ever sees snapshots handed over by the tracker.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use thiserror::Error;

// Internal modules
mod domain;
mod storage;
mod analytics;
mod config;
mod session;
mod views;

// Re-export public modules and types
pub use domain::*;
pub use storage::{DateRange, HabitStorage, SqliteStorage, StorageError};
pub use analytics::*;
pub use config::{default_database_path, Friend, TrackerConfig};
pub use session::Session;
pub use views::{Dashboard, DayHabit, DayView, HabitStreak};

/// Errors that can occur while serving a tracker request
#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Database error: {0}")]
    Database(#[from] storage::StorageError),

    #[error("Domain validation error: {0}")]
    Domain(#[from] domain::DomainError),
}

/// Habit tracker service
///
/// Owns the storage connection and the streak cache. Every operation takes
/// the caller's `Session`; a user can only touch their own habits.
pub struct HabitTracker {
    storage: SqliteStorage,
    cache: StreakCache,
    config: TrackerConfig,
}

impl HabitTracker {
    /// Open (or create) the database named in the config
    pub fn new(config: TrackerConfig) -> Result<Self, TrackerError> {
        tracing::info!("Initializing habit tracker with database: {:?}", config.database_path);
        let storage = SqliteStorage::new(config.database_path.clone())?;
        Ok(Self::with_storage(storage, config))
    }

    pub fn with_storage(storage: SqliteStorage, config: TrackerConfig) -> Self {
        Self {
            storage,
            cache: StreakCache::new(),
            config,
        }
    }

    /// Get a reference to the storage layer (useful for testing)
    pub fn storage(&self) -> &SqliteStorage {
        &self.storage
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn cache(&self) -> &StreakCache {
        &self.cache
    }

    // Habit management

    pub fn add_habit(
        &mut self,
        session: &Session,
        name: String,
        description: Option<String>,
    ) -> Result<Habit, TrackerError> {
        let habit = Habit::new(session.user_id.clone(), name, description, session.today)?;
        self.storage.create_habit(&habit)?;
        self.cache.seed(&session.user_id, &habit.id, &[]);

        tracing::info!("{} added habit {} ({})", session.user_id, habit.name, habit.id.short());
        Ok(habit)
    }

    pub fn habits(&self, session: &Session, include_inactive: bool) -> Result<Vec<Habit>, TrackerError> {
        Ok(self.storage.list_habits(&session.user_id, !include_inactive)?)
    }

    /// Look up a habit by full ID or unique prefix among the user's habits
    pub fn find_habit(&self, session: &Session, id: &str) -> Result<Habit, TrackerError> {
        if let Ok(habit_id) = HabitId::from_string(id) {
            return self.owned_habit(session, &habit_id);
        }

        let prefix = id.trim().to_lowercase().replace('-', "");
        let matches: Vec<Habit> = if prefix.is_empty() {
            Vec::new()
        } else {
            self.storage
                .list_habits(&session.user_id, false)?
                .into_iter()
                .filter(|h| h.id.0.simple().to_string().starts_with(&prefix))
                .collect()
        };

        match <[Habit; 1]>::try_from(matches) {
            Ok([habit]) => Ok(habit),
            Err(matches) if matches.is_empty() => Err(StorageError::HabitNotFound {
                habit_id: id.to_string(),
            }
            .into()),
            Err(_) => Err(DomainError::InvalidHabitId(format!("'{}' matches more than one habit", id)).into()),
        }
    }

    pub fn edit_habit(
        &mut self,
        session: &Session,
        habit_id: &HabitId,
        name: Option<String>,
        description: Option<Option<String>>,
    ) -> Result<Habit, TrackerError> {
        let mut habit = self.owned_habit(session, habit_id)?;
        habit.update(name, description)?;
        self.storage.update_habit(&habit)?;
        Ok(habit)
    }

    /// Soft delete; history stays in storage
    pub fn remove_habit(&mut self, session: &Session, habit_id: &HabitId) -> Result<(), TrackerError> {
        self.owned_habit(session, habit_id)?;
        self.storage.delete_habit(habit_id)?;
        self.cache.forget(&session.user_id, habit_id);

        tracing::info!("{} removed habit {}", session.user_id, habit_id.short());
        Ok(())
    }

    /// Delete a habit and its logs permanently
    pub fn purge_habit(&mut self, session: &Session, habit_id: &HabitId) -> Result<(), TrackerError> {
        self.owned_habit(session, habit_id)?;
        self.storage.hard_delete_habit(habit_id)?;
        self.cache.forget(&session.user_id, habit_id);

        tracing::warn!("{} purged habit {} and its history", session.user_id, habit_id.short());
        Ok(())
    }

    // Logging

    /// Record whether a habit was done on `date` and return its new streak
    pub fn log(
        &mut self,
        session: &Session,
        habit_id: &HabitId,
        date: NaiveDate,
        completed: bool,
    ) -> Result<StreakResult, TrackerError> {
        let habit = self.owned_habit(session, habit_id)?;
        if !habit.is_active {
            return Err(DomainError::Validation {
                message: format!("Habit '{}' has been deleted", habit.name),
            }
            .into());
        }
        if date > session.today {
            return Err(DomainError::InvalidDate("Cannot log habits for future dates".to_string()).into());
        }

        self.storage.log_habit(&LogEntry::new(habit_id.clone(), date, completed))?;
        self.cache.record(&session.user_id, habit_id, date, completed);

        self.habit_streak(session, habit_id)
    }

    pub fn set_note(
        &mut self,
        session: &Session,
        date: NaiveDate,
        text: String,
    ) -> Result<Option<DailyNote>, TrackerError> {
        let note = DailyNote::new(session.user_id.clone(), date, text.trim().to_string())?;
        if note.is_blank() {
            self.storage.delete_daily_note(&session.user_id, date)?;
            return Ok(None);
        }

        self.storage.save_daily_note(&note)?;
        Ok(Some(note))
    }

    pub fn note(&self, session: &Session, date: NaiveDate) -> Result<Option<DailyNote>, TrackerError> {
        Ok(self.storage.get_daily_note(&session.user_id, date)?)
    }

    // Metrics

    /// Current and longest streak of one habit as of the session's today
    pub fn habit_streak(&mut self, session: &Session, habit_id: &HabitId) -> Result<StreakResult, TrackerError> {
        if !self.cache.contains(&session.user_id, habit_id) {
            self.owned_habit(session, habit_id)?;
            let logs = self.storage.get_habit_logs(habit_id, None)?;
            self.cache.seed(&session.user_id, habit_id, &logs);
        }

        Ok(self
            .cache
            .streak(&session.user_id, habit_id, session.today)
            .unwrap_or_default())
    }

    /// Streaks of every active habit
    pub fn streaks(&mut self, session: &Session) -> Result<Vec<HabitStreak>, TrackerError> {
        let habits = self.storage.list_habits(&session.user_id, true)?;

        let mut streaks = Vec::with_capacity(habits.len());
        for habit in habits {
            let streak = self.habit_streak(session, &habit.id)?;
            streaks.push(HabitStreak::new(habit.id, habit.name, streak));
        }
        Ok(streaks)
    }

    pub fn day(&self, session: &Session, date: NaiveDate) -> Result<DayView, TrackerError> {
        let habits = self.storage.list_habits(&session.user_id, true)?;
        let logs = self.storage.get_logs_for_date(&session.user_id, date)?;
        let note = self.storage.get_daily_note(&session.user_id, date)?;

        let day_habits: Vec<DayHabit> = habits
            .into_iter()
            .map(|habit| DayHabit {
                completed: logs.iter().any(|e| e.habit_id == habit.id && e.completed),
                habit_id: habit.id,
                name: habit.name,
                description: habit.description,
            })
            .collect();

        Ok(DayView {
            date,
            completed_count: day_habits.iter().filter(|h| h.completed).count(),
            total_count: day_habits.len(),
            completion_rate: daily_completion(&logs),
            habits: day_habits,
            note: note.map(|n| n.text),
        })
    }

    /// Monday-to-Sunday day views for the week containing `date`
    pub fn week(&self, session: &Session, date: NaiveDate) -> Result<Vec<DayView>, TrackerError> {
        week_start(date)
            .iter_days()
            .take(7)
            .map(|day| self.day(session, day))
            .collect()
    }

    pub fn dashboard(&mut self, session: &Session) -> Result<Dashboard, TrackerError> {
        let today = self.day(session, session.today)?;

        let last_week = DateRange::new(window_start(session.today, 7), session.today);
        let week_logs = self.storage.get_all_logs(&session.user_id, Some(last_week))?;

        let month_start = session.today.with_day(1).unwrap_or(session.today);
        let month = DateRange::new(month_start, session.today);
        let month_logs = self.storage.get_all_logs(&session.user_id, Some(month))?;

        let non_empty = |logs: &[LogEntry]| (!logs.is_empty()).then(|| daily_completion(logs));

        Ok(Dashboard {
            today,
            seven_day_average: non_empty(&week_logs),
            month_to_date: non_empty(&month_logs),
            stats: self.user_stats(session, None, None)?,
            streaks: self.streaks(session)?,
        })
    }

    /// Day-by-day completion of one habit over the trailing `days`
    pub fn trend(&self, session: &Session, habit_id: &HabitId, days: u32) -> Result<Vec<TrendPoint>, TrackerError> {
        self.owned_habit(session, habit_id)?;
        let range = DateRange::new(window_start(session.today, days), session.today);
        let logs = self.storage.get_habit_logs(habit_id, Some(range))?;
        Ok(completion_trend(&logs, days, session.today))
    }

    /// Completed days over the trailing `days`, as a percentage
    pub fn consistency(&self, session: &Session, habit_id: &HabitId, days: u32) -> Result<f64, TrackerError> {
        self.owned_habit(session, habit_id)?;
        let range = DateRange::new(window_start(session.today, days), session.today);
        let logs = self.storage.get_habit_logs(habit_id, Some(range))?;
        Ok(consistency(&logs, days))
    }

    pub fn weekly(
        &self,
        session: &Session,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<BTreeMap<NaiveDate, f64>, TrackerError> {
        let logs = self.storage.get_all_logs(&session.user_id, Some(DateRange::new(start, end)))?;
        Ok(weekly_aggregate(&logs, start, end))
    }

    pub fn month(&self, session: &Session, month: u32, year: i32) -> Result<MonthlySummary, TrackerError> {
        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
            DomainError::InvalidDate(format!("No such month: {}-{:02}", year, month))
        })?;
        let last = first
            .checked_add_months(chrono::Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(first);

        let logs = self.storage.get_all_logs(&session.user_id, Some(DateRange::new(first, last)))?;
        Ok(monthly_summary(&logs, month, year))
    }

    pub fn user_stats(
        &self,
        session: &Session,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<UserStats, TrackerError> {
        let habits = self.storage.list_habits(&session.user_id, true)?;
        if habits.is_empty() {
            return Ok(UserStats::default());
        }

        let logs = self.storage.get_all_logs(&session.user_id, None)?;
        Ok(UserStats::calculate(&habits, &logs, session.today, start, end))
    }

    /// Ranked stats for the configured roster, or every user with a habit
    pub fn leaderboard(&self, session: &Session) -> Result<Vec<RankedEntry>, TrackerError> {
        let users: Vec<UserId> = if self.config.roster.is_empty() {
            self.storage.list_users()?
        } else {
            self.config.roster.iter().map(|f| f.user_id.clone()).collect()
        };

        let start = window_start(session.today, self.config.window_days);
        let mut entries = Vec::with_capacity(users.len());
        for user_id in users {
            let stats = self.user_stats(&session.as_user(user_id.clone()), Some(start), None)?;
            let display_name = self.config.display_name(&user_id);
            entries.push(LeaderboardEntry::from_stats(user_id, display_name, &stats));
        }

        tracing::debug!("Ranking {} leaderboard entries", entries.len());
        Ok(rank(entries))
    }

    pub fn insights(&self, session: &Session) -> Result<Vec<Insight>, TrackerError> {
        let habits = self.storage.list_habits(&session.user_id, true)?;
        let logs = self.storage.get_all_logs(&session.user_id, None)?;
        Ok(generate_insights(&habits, &logs, session.today))
    }

    /// Fetch a habit, hiding other users' habits as not found
    fn owned_habit(&self, session: &Session, habit_id: &HabitId) -> Result<Habit, TrackerError> {
        let habit = self.storage.get_habit(habit_id)?;
        if habit.user_id != session.user_id {
            return Err(StorageError::HabitNotFound {
                habit_id: habit_id.to_string(),
            }
            .into());
        }
        Ok(habit)
    }
}
