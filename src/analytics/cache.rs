/// Incremental per-habit streak cache
///
/// Keeps the set of completed days for each (user, habit) that has been
/// seeded, so streak reads don't have to reload and re-sort the full log
/// history. Results must always equal `StreakResult::calculate` over the same
/// history.

use std::collections::{BTreeSet, HashMap};
use chrono::NaiveDate;

use crate::domain::{HabitId, LogEntry, StreakResult, UserId};

#[derive(Debug, Default)]
struct CompletedDays {
    days: BTreeSet<NaiveDate>,
    /// None after a removal until the next read rescans
    longest_run: Option<u32>,
}

impl CompletedDays {
    fn from_logs(logs: &[LogEntry]) -> Self {
        Self {
            days: logs.iter().filter(|e| e.completed).map(|e| e.date).collect(),
            longest_run: None,
        }
    }

    fn insert(&mut self, date: NaiveDate) {
        if !self.days.insert(date) {
            return;
        }
        if let Some(longest) = self.longest_run {
            self.longest_run = Some(longest.max(self.run_through(date)));
        }
    }

    fn remove(&mut self, date: NaiveDate) {
        if self.days.remove(&date) {
            self.longest_run = None;
        }
    }

    /// Length of the run of consecutive days containing `date`
    fn run_through(&self, date: NaiveDate) -> u32 {
        let mut run = 1;

        let mut day = date;
        while let Some(previous) = day.pred_opt().filter(|d| self.days.contains(d)) {
            run += 1;
            day = previous;
        }

        let mut day = date;
        while let Some(next) = day.succ_opt().filter(|d| self.days.contains(d)) {
            run += 1;
            day = next;
        }

        run
    }

    fn longest(&mut self) -> u32 {
        if let Some(longest) = self.longest_run {
            return longest;
        }

        let mut longest = 0;
        let mut run = 0;
        let mut previous: Option<NaiveDate> = None;
        for &day in &self.days {
            run = match previous {
                Some(prev) if prev.succ_opt() == Some(day) => run + 1,
                _ => 1,
            };
            longest = longest.max(run);
            previous = Some(day);
        }

        self.longest_run = Some(longest);
        longest
    }

    fn current(&self, as_of: NaiveDate) -> u32 {
        let mut streak = 0;
        let mut day = Some(as_of);
        while let Some(d) = day.filter(|d| self.days.contains(d)) {
            streak += 1;
            day = d.pred_opt();
        }
        streak
    }
}

/// Streak state for every seeded (user, habit)
#[derive(Debug, Default)]
pub struct StreakCache {
    habits: HashMap<(UserId, HabitId), CompletedDays>,
}

impl StreakCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load (or reload) a habit's full log history
    pub fn seed(&mut self, user_id: &UserId, habit_id: &HabitId, logs: &[LogEntry]) {
        tracing::debug!("Seeding streak cache for habit {} of {}", habit_id, user_id);
        self.habits.insert(
            (user_id.clone(), habit_id.clone()),
            CompletedDays::from_logs(logs),
        );
    }

    /// Apply one log write; returns false when the habit was never seeded
    ///
    /// Unseeded habits are left alone since the cache can't know the rest of
    /// their history.
    pub fn record(
        &mut self,
        user_id: &UserId,
        habit_id: &HabitId,
        date: NaiveDate,
        completed: bool,
    ) -> bool {
        let Some(days) = self.habits.get_mut(&(user_id.clone(), habit_id.clone())) else {
            return false;
        };

        if completed {
            days.insert(date);
        } else {
            days.remove(date);
        }
        true
    }

    pub fn forget(&mut self, user_id: &UserId, habit_id: &HabitId) {
        self.habits.remove(&(user_id.clone(), habit_id.clone()));
    }

    pub fn contains(&self, user_id: &UserId, habit_id: &HabitId) -> bool {
        self.habits.contains_key(&(user_id.clone(), habit_id.clone()))
    }

    /// Streak as of `as_of`, or None when the habit hasn't been seeded
    pub fn streak(
        &mut self,
        user_id: &UserId,
        habit_id: &HabitId,
        as_of: NaiveDate,
    ) -> Option<StreakResult> {
        let days = self.habits.get_mut(&(user_id.clone(), habit_id.clone()))?;
        let current_streak = days.current(as_of);

        Some(StreakResult {
            current_streak,
            longest_streak: days.longest().max(current_streak),
        })
    }

    pub fn len(&self) -> usize {
        self.habits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.habits.is_empty()
    }
}
