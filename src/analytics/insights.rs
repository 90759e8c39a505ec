/// Short observations about a user's habits
///
/// Looks for the weekday the user is most reliable on and for habits whose
/// last week fell well below the week before.

use std::collections::HashSet;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::analytics::metrics::{consistency, percentage, window_start};
use crate::domain::{active_habits, Habit, HabitId, LogEntry};

/// Drop, in percentage points, that marks a habit as declining
const DECLINE_THRESHOLD: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    GetStarted,
    StartLogging,
    BestDay,
    Declining,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub habit_id: Option<HabitId>,
}

impl Insight {
    fn new(kind: InsightKind, message: String) -> Self {
        Self { kind, message, habit_id: None }
    }
}

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

pub fn generate_insights(habits: &[Habit], logs: &[LogEntry], today: NaiveDate) -> Vec<Insight> {
    let active: Vec<&Habit> = active_habits(habits).collect();
    if active.is_empty() {
        return vec![Insight::new(
            InsightKind::GetStarted,
            "Start by creating your first habit to track!".to_string(),
        )];
    }

    let active_ids: HashSet<&HabitId> = active.iter().map(|h| &h.id).collect();
    let logs: Vec<&LogEntry> = logs
        .iter()
        .filter(|e| active_ids.contains(&e.habit_id))
        .collect();
    if logs.is_empty() {
        return vec![Insight::new(
            InsightKind::StartLogging,
            "Great job creating habits! Now start logging your progress.".to_string(),
        )];
    }

    let mut insights = Vec::new();
    if let Some(best) = best_weekday(&logs) {
        insights.push(best);
    }
    for habit in active {
        if let Some(decline) = declining(habit, &logs, today) {
            insights.push(decline);
        }
    }
    insights
}

/// Weekday with the best completed/logged ratio; earlier weekdays win ties
fn best_weekday(logs: &[&LogEntry]) -> Option<Insight> {
    let mut best: Option<(Weekday, f64)> = None;

    for day in WEEK {
        let on_day: Vec<&&LogEntry> = logs.iter().filter(|e| e.date.weekday() == day).collect();
        if on_day.is_empty() {
            continue;
        }
        let completed = on_day.iter().filter(|e| e.completed).count();
        let rate = percentage(completed, on_day.len());
        if best.map_or(true, |(_, top)| rate > top) {
            best = Some((day, rate));
        }
    }

    best.filter(|(_, rate)| *rate > 0.0).map(|(day, rate)| {
        Insight::new(
            InsightKind::BestDay,
            format!("You're most consistent on {}s ({:.0}% done).", weekday_name(day), rate),
        )
    })
}

fn declining(habit: &Habit, logs: &[&LogEntry], today: NaiveDate) -> Option<Insight> {
    let window = |newest: NaiveDate| -> Vec<LogEntry> {
        let oldest = window_start(newest, 7);
        logs.iter()
            .filter(|e| e.habit_id == habit.id && e.date >= oldest && e.date <= newest)
            .map(|e| (*e).clone())
            .collect()
    };

    let recent = consistency(&window(today), 7);
    let prior = match today.checked_sub_signed(Duration::days(7)) {
        Some(newest) => consistency(&window(newest), 7),
        None => 0.0,
    };

    if prior - recent > DECLINE_THRESHOLD {
        Some(Insight {
            kind: InsightKind::Declining,
            message: format!(
                "⚠️ {} is slipping: {:.0}% this week vs {:.0}% the week before. Need a boost?",
                habit.name, recent, prior
            ),
            habit_id: Some(habit.id.clone()),
        })
    } else {
        None
    }
}
