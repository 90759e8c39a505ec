/// Main entry point for the habit streak tracker
///
/// This file sets up logging, parses command line arguments, opens the
/// tracker and renders the result of one command as text or JSON.

mod cli;

use chrono::Datelike;
use clap::Parser;
use serde::Serialize;
use tracing::info;

use cli::{Args, Command};
use habit_streaks::{
    default_database_path, window_start, DayView, HabitTracker, Session, TrackerConfig, UserId,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Set up logging based on command line flags
    let log_level = if args.verbose {
        "debug"
    } else if args.debug {
        "info"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(format!("habit_streaks={}", log_level))
        .with_writer(std::io::stderr) // Keep stdout for command output
        .init();

    let db_path = match args.database {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            path
        }
        None => default_database_path()?,
    };
    info!("Using database at: {}", db_path.display());

    let user_id = UserId::new(args.user)?;
    let config = TrackerConfig::new(db_path, user_id.clone())
        .with_window_days(args.window_days)
        .with_roster(args.friends);

    let mut tracker = HabitTracker::new(config)?;
    let session = Session::new(user_id);
    let json = args.json;

    match args.command {
        Command::Dashboard => {
            let dashboard = tracker.dashboard(&session)?;
            emit(json, &dashboard, |d| {
                let mut out = render_day(&d.today);
                out.push_str(&format!(
                    "\n7-day average: {}\nThis month: {}\nActive habits: {}\nAll-habit streak: {} days\n",
                    percent_or_na(d.seven_day_average),
                    percent_or_na(d.month_to_date),
                    d.stats.total_habits,
                    d.stats.current_streak,
                ));
                for s in &d.streaks {
                    out.push_str(&format!(
                        "🔥 {}: {} (best {}) {}\n",
                        s.name, s.current_streak, s.longest_streak, s.badge.label()
                    ));
                }
                out
            })?;
        }
        Command::Add { name, description } => {
            let habit = tracker.add_habit(&session, name, description)?;
            emit(json, &habit, |h| format!("✅ Created habit '{}'\nHabit ID: {}", h.name, h.id))?;
        }
        Command::Habits { all } => {
            let habits = tracker.habits(&session, all)?;
            emit(json, &habits, |habits| {
                if habits.is_empty() {
                    return "No habits found. Create your first habit to get started!".to_string();
                }
                habits
                    .iter()
                    .map(|h| {
                        format!(
                            "{}  {}{}{}",
                            h.id.short(),
                            h.name,
                            h.description.as_deref().map(|d| format!(" - {}", d)).unwrap_or_default(),
                            if h.is_active { "" } else { " (deleted)" }
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            })?;
        }
        Command::Edit { habit, name, description, clear_description } => {
            let habit = tracker.find_habit(&session, &habit)?;
            let description = if clear_description { Some(None) } else { description.map(Some) };
            let habit = tracker.edit_habit(&session, &habit.id, name, description)?;
            emit(json, &habit, |h| format!("✏️ Updated habit '{}'", h.name))?;
        }
        Command::Remove { habit } => {
            let habit = tracker.find_habit(&session, &habit)?;
            tracker.remove_habit(&session, &habit.id)?;
            emit(json, &habit.id, |_| format!("🗑️ Deleted habit '{}' (history kept)", habit.name))?;
        }
        Command::Purge { habit, yes } => {
            let habit = tracker.find_habit(&session, &habit)?;
            if !yes {
                return Err(format!(
                    "Refusing to permanently delete '{}' without --yes",
                    habit.name
                )
                .into());
            }
            tracker.purge_habit(&session, &habit.id)?;
            emit(json, &habit.id, |_| format!("Permanently deleted '{}'", habit.name))?;
        }
        Command::Log { habit, date, undo } => {
            let habit = tracker.find_habit(&session, &habit)?;
            let date = date.unwrap_or(session.today);
            let streak = tracker.log(&session, &habit.id, date, !undo)?;
            emit(json, &streak, |s| {
                format!(
                    "{} {} on {}. Current streak: {} day{}",
                    if undo { "⬜ Unmarked" } else { "🔥 Logged" },
                    habit.name,
                    date,
                    s.current_streak,
                    if s.current_streak == 1 { "" } else { "s" }
                )
            })?;
        }
        Command::Day { date } => {
            let day = tracker.day(&session, date.unwrap_or(session.today))?;
            emit(json, &day, render_day)?;
        }
        Command::Week { date } => {
            let week = tracker.week(&session, date.unwrap_or(session.today))?;
            emit(json, &week, |days| render_week(days))?;
        }
        Command::Friend { user, date } => {
            let friend = session.as_user(UserId::new(user)?);
            let date = date.unwrap_or(session.today);
            let day = tracker.day(&friend, date)?;
            let week = tracker.week(&friend, date)?;
            let stats = tracker.user_stats(&friend, None, None)?;
            let name = tracker.config().display_name(&friend.user_id);

            #[derive(Serialize)]
            struct FriendView<'a> {
                name: &'a str,
                current_streak: u32,
                day: &'a DayView,
                week: &'a [DayView],
            }
            let view = FriendView { name: &name, current_streak: stats.current_streak, day: &day, week: &week };
            emit(json, &view, |v| {
                format!(
                    "{}'s activity (streak {} days)\n{}\n{}",
                    v.name,
                    v.current_streak,
                    render_day(v.day),
                    render_week(v.week)
                )
            })?;
        }
        Command::Streak { habit } => {
            let streaks = match habit {
                Some(habit) => {
                    let habit = tracker.find_habit(&session, &habit)?;
                    let streak = tracker.habit_streak(&session, &habit.id)?;
                    vec![habit_streaks::HabitStreak::new(habit.id, habit.name, streak)]
                }
                None => tracker.streaks(&session)?,
            };
            emit(json, &streaks, |streaks| {
                streaks
                    .iter()
                    .map(|s| {
                        format!(
                            "🎯 {}\n   Current streak: {} days | Best: {} days | {}",
                            s.name, s.current_streak, s.longest_streak, s.badge.label()
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n\n")
            })?;
        }
        Command::Trend { habit, days } => {
            let habit = tracker.find_habit(&session, &habit)?;
            let trend = tracker.trend(&session, &habit.id, days)?;
            let consistency = tracker.consistency(&session, &habit.id, days)?;
            emit(json, &trend, |points| {
                let marks: String = points
                    .iter()
                    .map(|p| if p.completed { '■' } else { '·' })
                    .collect();
                format!("{} over {} days ({:.0}%)\n{}", habit.name, days, consistency, marks)
            })?;
        }
        Command::Weekly { from, to } => {
            let to = to.unwrap_or(session.today);
            let from = from.unwrap_or_else(|| window_start(to, 28));
            let weeks = tracker.weekly(&session, from, to)?;
            emit(json, &weeks, |weeks| {
                weeks
                    .iter()
                    .map(|(week, pct)| format!("Week of {}: {:.0}%", week, pct))
                    .collect::<Vec<_>>()
                    .join("\n")
            })?;
        }
        Command::Month { month, year } => {
            let month = month.unwrap_or(session.today.month());
            let year = year.unwrap_or(session.today.year());
            let summary = tracker.month(&session, month, year)?;
            emit(json, &summary, |s| {
                format!(
                    "{}-{:02}: {} habits, {} completions, {:.1}% done, {} days tracked",
                    year, month, s.total_habits, s.total_completions, s.completion_rate, s.days_tracked
                )
            })?;
        }
        Command::Stats { from, to } => {
            let stats = tracker.user_stats(&session, from, to)?;
            emit(json, &stats, |s| {
                format!(
                    "Habits: {}\nCompletion rate: {:.1}%\nAll done today: {}\nStreak: {} days",
                    s.total_habits,
                    s.completion_rate,
                    if s.completed_today { "yes" } else { "no" },
                    s.current_streak
                )
            })?;
        }
        Command::Leaderboard => {
            let ranked = tracker.leaderboard(&session)?;
            emit(json, &ranked, |ranked| {
                if ranked.is_empty() {
                    return "No friends yet! Ask them to sign up.".to_string();
                }
                ranked
                    .iter()
                    .map(|r| {
                        let medal = r.medal.map(|m| format!("{} ", m.emoji())).unwrap_or_default();
                        let status = if r.entry.completed_today { "✅" } else { "⬜" };
                        let streak = if r.entry.current_streak > 0 {
                            format!(" 🔥 {}d", r.entry.current_streak)
                        } else {
                            String::new()
                        };
                        let me = if r.entry.user_id == session.user_id { " (you)" } else { "" };
                        format!(
                            "{}. {}{} {}{}{} - {:.1}%",
                            r.position, medal, status, r.entry.display_name, me, streak,
                            r.entry.completion_rate
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            })?;
        }
        Command::Note { text, date } => {
            let date = date.unwrap_or(session.today);
            let note = match text {
                Some(text) => tracker.set_note(&session, date, text)?,
                None => tracker.note(&session, date)?,
            };
            emit(json, &note, |n| match n {
                Some(n) => format!("📝 {}: {}", n.date, n.text),
                None => format!("No note for {}", date),
            })?;
        }
        Command::Insights => {
            let insights = tracker.insights(&session)?;
            emit(json, &insights, |insights| {
                insights
                    .iter()
                    .map(|i| format!("💡 {}", i.message))
                    .collect::<Vec<_>>()
                    .join("\n")
            })?;
        }
    }

    Ok(())
}

/// Print `value` as JSON, or the text produced by `render`
fn emit<T: Serialize + ?Sized>(
    json: bool,
    value: &T,
    render: impl FnOnce(&T) -> String,
) -> Result<(), serde_json::Error> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", render(value));
    }
    Ok(())
}

fn percent_or_na(value: Option<f64>) -> String {
    value.map(|v| format!("{:.0}%", v)).unwrap_or_else(|| "N/A".to_string())
}

fn render_day(day: &DayView) -> String {
    if day.habits.is_empty() {
        return "📝 No habits created yet. Add one with `habit-streaks add <name>`.".to_string();
    }

    let mut out = format!(
        "{}: {}/{} done ({:.0}%)\n",
        day.date.format("%A, %B %d"),
        day.completed_count,
        day.total_count,
        day.completion_rate
    );
    for habit in &day.habits {
        out.push_str(&format!(
            "  {} {} [{}]\n",
            if habit.completed { "✅" } else { "⬜" },
            habit.name,
            habit.habit_id.short()
        ));
    }
    if let Some(note) = &day.note {
        out.push_str(&format!("  📝 {}\n", note));
    }
    out
}

fn render_week(days: &[DayView]) -> String {
    days.iter()
        .map(|d| {
            format!(
                "{} {:>2}  {}/{}{}",
                d.date.format("%a"),
                d.date.day(),
                d.completed_count,
                d.total_count,
                if d.note.is_some() { " 📝" } else { "" }
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
