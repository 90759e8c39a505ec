/// Per-user statistics and the friends leaderboard
///
/// Unlike the per-habit streak, everything here is joint across all of a
/// user's active habits: a day only counts when every active habit was done.

use std::collections::{HashMap, HashSet};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::analytics::metrics::window_start;
use crate::domain::{active_habits, Habit, HabitId, LogEntry, UserId};

/// Hard bound on the backward walk for the joint streak
pub const STREAK_SCAN_LIMIT: u32 = 365;

/// Default trailing window, in days, for the leaderboard completion rate
pub const DEFAULT_WINDOW_DAYS: u32 = 7;

/// Headline numbers for one user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    /// Active habits only
    pub total_habits: usize,
    /// Percentage over the window, rounded to one decimal place
    pub completion_rate: f64,
    /// True only when every active habit is done today
    pub completed_today: bool,
    /// Consecutive days, ending today, on which every active habit was done
    pub current_streak: u32,
}

impl UserStats {
    /// Compute a user's stats from their habits and logs
    ///
    /// `start` defaults to six days before `today` and `end` to `today`, each
    /// independently. Logs for soft-deleted habits are ignored.
    pub fn calculate(
        habits: &[Habit],
        logs: &[LogEntry],
        today: NaiveDate,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Self {
        let active: HashSet<&HabitId> = active_habits(habits).map(|h| &h.id).collect();
        let total_habits = active.len();
        if total_habits == 0 {
            return Self::default();
        }

        let start = start.unwrap_or_else(|| window_start(today, DEFAULT_WINDOW_DAYS));
        let end = end.unwrap_or(today);

        let completed: Vec<&LogEntry> = logs
            .iter()
            .filter(|e| e.completed && active.contains(&e.habit_id))
            .collect();

        let completed_in_window = completed
            .iter()
            .filter(|e| e.date >= start && e.date <= end)
            .count();
        let window_days = (end - start).num_days() + 1;
        let completion_rate = if window_days > 0 {
            let possible = total_habits as f64 * window_days as f64;
            round_to_tenth(completed_in_window as f64 / possible * 100.0)
        } else {
            0.0
        };

        let mut done_by_day: HashMap<NaiveDate, HashSet<&HabitId>> = HashMap::new();
        for entry in &completed {
            done_by_day.entry(entry.date).or_default().insert(&entry.habit_id);
        }
        let all_done = |day: NaiveDate| {
            done_by_day.get(&day).map_or(0, |done| done.len()) == total_habits
        };

        let mut current_streak = 0;
        let mut day = today;
        while current_streak < STREAK_SCAN_LIMIT && all_done(day) {
            current_streak += 1;
            match day.pred_opt() {
                Some(previous) => day = previous,
                None => break,
            }
        }

        Self {
            total_habits,
            completion_rate,
            completed_today: all_done(today),
            current_streak,
        }
    }
}

/// One decimal place, exact halves going to the even digit
fn round_to_tenth(value: f64) -> f64 {
    format!("{:.1}", value).parse().unwrap_or(value)
}

/// One row of the leaderboard before ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub user_id: UserId,
    pub display_name: String,
    pub total_habits: usize,
    pub completion_rate: f64,
    pub completed_today: bool,
    pub current_streak: u32,
}

impl LeaderboardEntry {
    pub fn from_stats(user_id: UserId, display_name: impl Into<String>, stats: &UserStats) -> Self {
        Self {
            user_id,
            display_name: display_name.into(),
            total_habits: stats.total_habits,
            completion_rate: stats.completion_rate,
            completed_today: stats.completed_today,
            current_streak: stats.current_streak,
        }
    }
}

/// Decoration for the top three places
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
}

impl Medal {
    /// Medal for a 1-based position; users without a streak never get one
    pub fn for_position(position: usize, current_streak: u32) -> Option<Self> {
        if current_streak == 0 {
            return None;
        }
        match position {
            1 => Some(Medal::Gold),
            2 => Some(Medal::Silver),
            3 => Some(Medal::Bronze),
            _ => None,
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Medal::Gold => "🥇",
            Medal::Silver => "🥈",
            Medal::Bronze => "🥉",
        }
    }
}

/// A leaderboard row with its place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    /// 1-based
    pub position: usize,
    pub medal: Option<Medal>,
    #[serde(flatten)]
    pub entry: LeaderboardEntry,
}

/// Order by streak, then completion rate, both descending
///
/// The sort is stable, so exact ties keep their input order.
pub fn rank(mut entries: Vec<LeaderboardEntry>) -> Vec<RankedEntry> {
    entries.sort_by(|a, b| {
        b.current_streak
            .cmp(&a.current_streak)
            .then_with(|| b.completion_rate.total_cmp(&a.completion_rate))
    });

    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            let position = index + 1;
            RankedEntry {
                position,
                medal: Medal::for_position(position, entry.current_streak),
                entry,
            }
        })
        .collect()
}
