/// Read models assembled by the tracker for display
///
/// These are plain serializable values; the binary prints them as text or
/// JSON.

use chrono::NaiveDate;
use serde::Serialize;

use crate::analytics::UserStats;
use crate::domain::{Badge, HabitId, StreakResult};

/// One habit's state on a given day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayHabit {
    pub habit_id: HabitId,
    pub name: String,
    pub description: Option<String>,
    pub completed: bool,
}

/// Everything a user has on one date
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayView {
    pub date: NaiveDate,
    pub habits: Vec<DayHabit>,
    pub completed_count: usize,
    pub total_count: usize,
    pub completion_rate: f64,
    pub note: Option<String>,
}

/// A habit's streaks with its badge
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HabitStreak {
    pub habit_id: HabitId,
    pub name: String,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub badge: Badge,
}

impl HabitStreak {
    pub fn new(habit_id: HabitId, name: String, streak: StreakResult) -> Self {
        Self {
            habit_id,
            name,
            current_streak: streak.current_streak,
            longest_streak: streak.longest_streak,
            badge: streak.badge(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub today: DayView,
    /// None when nothing was logged in the last seven days
    pub seven_day_average: Option<f64>,
    /// None when nothing was logged this month
    pub month_to_date: Option<f64>,
    pub stats: UserStats,
    pub streaks: Vec<HabitStreak>,
}
