/// Completion metrics over a user's log history
///
/// Every function here is a pure transform of the log snapshot it is given.
/// Percentages are on a 0-100 scale and empty inputs yield zeros rather than
/// errors.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::{HabitId, LogEntry};

/// `100 * part / whole`, or zero when there is nothing to divide by
pub(crate) fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Percentage of the given entries that are completed
///
/// Intended for the entries of a single day, possibly across several habits.
pub fn daily_completion(logs: &[LogEntry]) -> f64 {
    let completed = logs.iter().filter(|e| e.completed).count();
    percentage(completed, logs.len())
}

/// Completed entries as a percentage of `window_days`
///
/// The caller is expected to have already restricted `habit_logs` to the
/// window; no date filtering happens here.
pub fn consistency(habit_logs: &[LogEntry], window_days: u32) -> f64 {
    let completed = habit_logs.iter().filter(|e| e.completed).count();
    percentage(completed, window_days as usize)
}

/// First day of the `days`-long window ending on `end`
///
/// A zero-day window is treated as one day. Windows reaching back past the
/// earliest representable date start at `NaiveDate::MIN`.
pub fn window_start(end: NaiveDate, days: u32) -> NaiveDate {
    end.checked_sub_signed(Duration::days(days.max(1) as i64 - 1))
        .unwrap_or(NaiveDate::MIN)
}

/// Monday of the ISO week containing `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date.checked_sub_signed(Duration::days(date.weekday().num_days_from_monday() as i64))
        .unwrap_or(NaiveDate::MIN)
}

/// Completion percentage per Monday-anchored week across `[start, end]`
///
/// Only days that have at least one entry feed a week's totals, so an
/// unlogged day does not count as a 0% day. Weeks with no entries at all
/// still appear, at 0.0.
pub fn weekly_aggregate(
    all_logs: &[LogEntry],
    start: NaiveDate,
    end: NaiveDate,
) -> BTreeMap<NaiveDate, f64> {
    let mut by_day: BTreeMap<NaiveDate, (usize, usize)> = BTreeMap::new();
    for entry in all_logs {
        if entry.date < start || entry.date > end {
            continue;
        }
        let (total, completed) = by_day.entry(entry.date).or_default();
        *total += 1;
        if entry.completed {
            *completed += 1;
        }
    }

    let mut weeks: BTreeMap<NaiveDate, (usize, usize)> = BTreeMap::new();
    for date in start.iter_days().take_while(|d| *d <= end) {
        let week = weeks.entry(week_start(date)).or_default();
        if let Some((total, completed)) = by_day.get(&date) {
            week.0 += total;
            week.1 += completed;
        }
    }

    weeks
        .into_iter()
        .map(|(week, (total, completed))| (week, percentage(completed, total)))
        .collect()
}

/// One day of a completion trend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub completed: bool,
}

/// Day-by-day completion for the `window_days` ending on `today`, oldest first
pub fn completion_trend(
    habit_logs: &[LogEntry],
    window_days: u32,
    today: NaiveDate,
) -> Vec<TrendPoint> {
    if window_days == 0 {
        return Vec::new();
    }

    window_start(today, window_days)
        .iter_days()
        .take_while(|date| *date <= today)
        .map(|date| TrendPoint {
            date,
            completed: habit_logs
                .iter()
                .find(|e| e.date == date)
                .map(|e| e.completed)
                .unwrap_or(false),
        })
        .collect()
}

/// Totals for one calendar month
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    /// Distinct habits with at least one entry that month
    pub total_habits: usize,
    pub total_completions: usize,
    /// Completions over logged entries, not over calendar days
    pub completion_rate: f64,
    /// Distinct dates with at least one entry
    pub days_tracked: usize,
}

pub fn monthly_summary(all_logs: &[LogEntry], month: u32, year: i32) -> MonthlySummary {
    let month_logs: Vec<&LogEntry> = all_logs
        .iter()
        .filter(|e| e.date.month() == month && e.date.year() == year)
        .collect();

    if month_logs.is_empty() {
        return MonthlySummary::default();
    }

    let habits: HashSet<&HabitId> = month_logs.iter().map(|e| &e.habit_id).collect();
    let dates: BTreeSet<NaiveDate> = month_logs.iter().map(|e| e.date).collect();
    let total_completions = month_logs.iter().filter(|e| e.completed).count();

    MonthlySummary {
        total_habits: habits.len(),
        total_completions,
        completion_rate: percentage(total_completions, month_logs.len()),
        days_tracked: dates.len(),
    }
}
