/// Runtime configuration
///
/// Built by the binary from command line flags and environment variables.
/// Nothing here is global; the tracker receives a `TrackerConfig` value.

use std::path::PathBuf;
use std::str::FromStr;

use crate::analytics::DEFAULT_WINDOW_DAYS;
use crate::domain::{DomainError, UserId};

/// A user shown on the leaderboard, with an optional display name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Friend {
    pub user_id: UserId,
    pub display_name: String,
}

impl FromStr for Friend {
    type Err = DomainError;

    /// Accepts `alice` or `alice=Alice Liddell`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, name) = match s.split_once('=') {
            Some((id, name)) if !name.trim().is_empty() => (id, name.trim()),
            Some((id, _)) => (id, id.trim()),
            None => (s, s.trim()),
        };

        Ok(Self {
            user_id: UserId::new(id)?,
            display_name: name.to_string(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct TrackerConfig {
    pub database_path: PathBuf,
    /// Acting user
    pub user_id: UserId,
    /// Trailing window for leaderboard completion rates
    pub window_days: u32,
    /// Leaderboard members; when empty every user with an active habit is listed
    pub roster: Vec<Friend>,
}

impl TrackerConfig {
    pub fn new(database_path: PathBuf, user_id: UserId) -> Self {
        Self {
            database_path,
            user_id,
            window_days: DEFAULT_WINDOW_DAYS,
            roster: Vec::new(),
        }
    }

    pub fn with_window_days(mut self, window_days: u32) -> Self {
        self.window_days = window_days.max(1);
        self
    }

    pub fn with_roster(mut self, roster: Vec<Friend>) -> Self {
        self.roster = roster;
        self
    }

    /// Display name from the roster, falling back to the user ID
    pub fn display_name(&self, user_id: &UserId) -> String {
        self.roster
            .iter()
            .find(|f| &f.user_id == user_id)
            .map(|f| f.display_name.clone())
            .unwrap_or_else(|| user_id.to_string())
    }
}

/// Get the default database path with robust fallback strategy
///
/// Picks the first candidate directory that can be created and written to.
pub fn default_database_path() -> std::io::Result<PathBuf> {
    let potential_paths = [
        // 1. User's home directory (preferred)
        dirs::home_dir().map(|p| p.join(".habit_streaks")),
        // 2. User's data directory (platform-specific)
        dirs::data_dir().map(|p| p.join("habit_streaks")),
        // 3. User's config directory
        dirs::config_dir().map(|p| p.join("habit_streaks")),
        // 4. Current working directory (last resort)
        std::env::current_dir().ok().map(|p| p.join(".habit_streaks")),
    ];

    for potential_path in potential_paths.iter().flatten() {
        if std::fs::create_dir_all(potential_path).is_ok() {
            let test_file = potential_path.join(".test_write");
            if std::fs::write(&test_file, "test").is_ok() {
                let _ = std::fs::remove_file(&test_file);
                return Ok(potential_path.join("habits.db"));
            }
        }
    }

    // Ultimate fallback: use a temporary directory
    let temp_path = std::env::temp_dir().join("habit_streaks");
    std::fs::create_dir_all(&temp_path)?;

    tracing::warn!("Using temporary directory for database: {}", temp_path.display());
    Ok(temp_path.join("habits.db"))
}
