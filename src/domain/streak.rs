/// Streak calculation for a single habit
///
/// This module defines the StreakResult struct and the recompute-from-history
/// calculation that every other streak path (including the cache) is checked
/// against.

use serde::{Deserialize, Serialize};
use chrono::NaiveDate;
use crate::domain::LogEntry;

/// Current and longest streak of one habit
///
/// Derived on demand from the habit's full log history; never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakResult {
    /// Consecutive completed days ending at the reference date
    pub current_streak: u32,
    /// Best run of consecutive completed days, never below `current_streak`
    pub longest_streak: u32,
}

impl StreakResult {
    /// Calculate both streaks from a habit's logs as of `as_of`
    ///
    /// Only completed entries are considered. The current streak walks back
    /// from `as_of` one day at a time and stops at the first missing day.
    /// Entries dated after `as_of` are passed over by that walk but still
    /// take part in the longest-run scan.
    pub fn calculate(habit_logs: &[LogEntry], as_of: NaiveDate) -> Self {
        let mut completed: Vec<NaiveDate> = habit_logs
            .iter()
            .filter(|e| e.completed)
            .map(|e| e.date)
            .collect();

        if completed.is_empty() {
            return Self::default();
        }

        // Newest first
        completed.sort_unstable_by(|a, b| b.cmp(a));

        let current_streak = Self::current_from_sorted(&completed, as_of);
        let longest_run = Self::longest_from_sorted(&completed);

        Self {
            current_streak,
            longest_streak: longest_run.max(current_streak),
        }
    }

    /// Walk newest-first dates, counting while each matches the expected day
    fn current_from_sorted(newest_first: &[NaiveDate], as_of: NaiveDate) -> u32 {
        let mut streak = 0;
        let mut expected = as_of;

        for &date in newest_first {
            if date == expected {
                streak += 1;
                match expected.pred_opt() {
                    Some(previous) => expected = previous,
                    None => break,
                }
            } else if date < expected {
                break;
            }
        }

        streak
    }

    /// Longest run of dates exactly one day apart, scanning oldest first
    fn longest_from_sorted(newest_first: &[NaiveDate]) -> u32 {
        let mut longest = 0;
        let mut run = 0;
        let mut previous: Option<NaiveDate> = None;

        for &date in newest_first.iter().rev() {
            run = match previous {
                Some(prev) if (date - prev).num_days() == 1 => run + 1,
                _ => 1,
            };
            longest = longest.max(run);
            previous = Some(date);
        }

        longest
    }

    /// Badge earned by the current streak
    pub fn badge(&self) -> Badge {
        Badge::for_streak(self.current_streak)
    }
}

/// Milestone label shown next to a habit's streak
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Badge {
    Beginner,
    GettingStarted,
    WeekWarrior,
    FireStreak,
    CenturyClub,
}

impl Badge {
    pub fn for_streak(streak: u32) -> Self {
        match streak {
            100.. => Badge::CenturyClub,
            30..=99 => Badge::FireStreak,
            7..=29 => Badge::WeekWarrior,
            3..=6 => Badge::GettingStarted,
            _ => Badge::Beginner,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Badge::Beginner => "🌱 Beginner",
            Badge::GettingStarted => "💪 Getting Started",
            Badge::WeekWarrior => "⭐ Week Warrior",
            Badge::FireStreak => "🔥 Fire Streak",
            Badge::CenturyClub => "🏆 Century Club",
        }
    }
}
