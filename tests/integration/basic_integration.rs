/// Integration tests for the tracker service against a SQLite file
use chrono::{Duration, NaiveDate};
use habit_streaks::*;
use tempfile::NamedTempFile;

#[cfg(test)]
mod basic_integration_tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 12).unwrap()
    }

    fn alice() -> Session {
        Session::at(UserId::new("alice").unwrap(), today())
    }

    fn open(temp_file: &NamedTempFile) -> HabitTracker {
        let config = TrackerConfig::new(temp_file.path().to_path_buf(), UserId::new("alice").unwrap());
        HabitTracker::new(config).expect("Failed to open tracker")
    }

    #[test]
    fn test_log_updates_streak() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let mut tracker = open(&temp_file);
        let session = alice();

        let habit = tracker.add_habit(&session, "Meditate".to_string(), None).unwrap();
        assert_eq!(tracker.habit_streak(&session, &habit.id).unwrap(), StreakResult::default());

        for n in (0..3).rev() {
            tracker.log(&session, &habit.id, today() - Duration::days(n), true).unwrap();
        }
        let streak = tracker.habit_streak(&session, &habit.id).unwrap();
        assert_eq!(streak, StreakResult { current_streak: 3, longest_streak: 3 });

        // Unmarking the middle day splits the run
        let streak = tracker.log(&session, &habit.id, today() - Duration::days(1), false).unwrap();
        assert_eq!(streak, StreakResult { current_streak: 1, longest_streak: 1 });

        // Logging the same day twice keeps a single entry
        tracker.log(&session, &habit.id, today(), true).unwrap();
        let logs = tracker.storage().get_habit_logs(&habit.id, None).unwrap();
        assert_eq!(logs.len(), 3);
    }

    #[test]
    fn test_cache_agrees_after_reopen() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let session = alice();

        let (habit_id, cached) = {
            let mut tracker = open(&temp_file);
            let habit = tracker.add_habit(&session, "Stretch".to_string(), None).unwrap();
            for n in [0, 1, 2, 5, 6, 7, 8] {
                tracker.log(&session, &habit.id, today() - Duration::days(n), true).unwrap();
            }
            (habit.id.clone(), tracker.habit_streak(&session, &habit.id).unwrap())
        };

        let mut reopened = open(&temp_file);
        assert!(reopened.cache().is_empty());
        let fresh = reopened.habit_streak(&session, &habit_id).unwrap();

        assert_eq!(cached, fresh);
        assert_eq!(fresh, StreakResult { current_streak: 3, longest_streak: 4 });
    }

    #[test]
    fn test_rejects_future_and_deleted() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let mut tracker = open(&temp_file);
        let session = alice();

        let habit = tracker.add_habit(&session, "Journal".to_string(), None).unwrap();
        let result = tracker.log(&session, &habit.id, today() + Duration::days(1), true);
        assert!(matches!(result, Err(TrackerError::Domain(DomainError::InvalidDate(_)))));

        tracker.remove_habit(&session, &habit.id).unwrap();
        let result = tracker.log(&session, &habit.id, today(), true);
        assert!(matches!(result, Err(TrackerError::Domain(DomainError::Validation { .. }))));
    }

    #[test]
    fn test_soft_delete_keeps_history() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let mut tracker = open(&temp_file);
        let session = alice();

        let habit = tracker.add_habit(&session, "Floss".to_string(), None).unwrap();
        tracker.log(&session, &habit.id, today(), true).unwrap();
        tracker.remove_habit(&session, &habit.id).unwrap();

        assert!(tracker.habits(&session, false).unwrap().is_empty());
        let all = tracker.habits(&session, true).unwrap();
        assert_eq!(all.len(), 1);
        assert!(!all[0].is_active);

        let logs = tracker.storage().get_habit_logs(&habit.id, None).unwrap();
        assert_eq!(logs, vec![LogEntry::done(habit.id.clone(), today())]);

        // Deleted habits drop out of stats
        assert_eq!(tracker.user_stats(&session, None, None).unwrap(), UserStats::default());
    }

    #[test]
    fn test_purge_removes_everything() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let mut tracker = open(&temp_file);
        let session = alice();

        let habit = tracker.add_habit(&session, "Sketch".to_string(), None).unwrap();
        tracker.log(&session, &habit.id, today(), true).unwrap();
        tracker.purge_habit(&session, &habit.id).unwrap();

        assert!(tracker.habits(&session, true).unwrap().is_empty());
        assert!(tracker.storage().get_habit_logs(&habit.id, None).unwrap().is_empty());
        assert!(matches!(
            tracker.habit_streak(&session, &habit.id),
            Err(TrackerError::Database(StorageError::HabitNotFound { .. }))
        ));
    }

    #[test]
    fn test_habits_are_private() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let mut tracker = open(&temp_file);
        let session = alice();
        let bob = session.as_user(UserId::new("bob").unwrap());

        let habit = tracker.add_habit(&session, "Swim".to_string(), None).unwrap();

        assert!(tracker.habits(&bob, true).unwrap().is_empty());
        assert!(tracker.find_habit(&bob, &habit.id.to_string()).is_err());
        assert!(tracker.log(&bob, &habit.id, today(), true).is_err());
        assert!(tracker.remove_habit(&bob, &habit.id).is_err());
    }

    #[test]
    fn test_find_and_edit_habit() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let mut tracker = open(&temp_file);
        let session = alice();

        let habit = tracker
            .add_habit(&session, "Read".to_string(), Some("20 pages".to_string()))
            .unwrap();

        let found = tracker.find_habit(&session, &habit.id.short()).unwrap();
        assert_eq!(found.id, habit.id);
        assert!(tracker.find_habit(&session, "").is_err());

        let edited = tracker
            .edit_habit(&session, &habit.id, Some("Read fiction".to_string()), Some(None))
            .unwrap();
        assert_eq!(edited.name, "Read fiction");
        assert_eq!(edited.description, None);
        assert_eq!(tracker.find_habit(&session, &habit.id.to_string()).unwrap(), edited);
    }

    #[test]
    fn test_daily_notes() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let mut tracker = open(&temp_file);
        let session = alice();

        assert_eq!(tracker.note(&session, today()).unwrap(), None);

        tracker.set_note(&session, today(), "Rainy day".to_string()).unwrap();
        let note = tracker.set_note(&session, today(), "Sunny after all".to_string()).unwrap();
        assert_eq!(note.map(|n| n.text), Some("Sunny after all".to_string()));
        assert_eq!(tracker.day(&session, today()).unwrap().note.as_deref(), Some("Sunny after all"));

        assert_eq!(tracker.set_note(&session, today(), "   ".to_string()).unwrap(), None);
        assert_eq!(tracker.note(&session, today()).unwrap(), None);
    }

    #[test]
    fn test_day_week_and_dashboard() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let mut tracker = open(&temp_file);
        let session = alice();

        let read = tracker.add_habit(&session, "Read".to_string(), None).unwrap();
        tracker.add_habit(&session, "Run".to_string(), None).unwrap();
        tracker.log(&session, &read.id, today(), true).unwrap();

        let day = tracker.day(&session, today()).unwrap();
        assert_eq!(day.total_count, 2);
        assert_eq!(day.completed_count, 1);
        // Unlogged habits count as not done
        assert_eq!(day.completion_rate, 50.0);

        let week = tracker.week(&session, today()).unwrap();
        assert_eq!(week.len(), 7);
        assert_eq!(week[0].date, week_start(today()));
        assert!(week.iter().any(|d| d.date == today() && d.completed_count == 1));

        let dashboard = tracker.dashboard(&session).unwrap();
        assert_eq!(dashboard.streaks.len(), 2);
        assert_eq!(dashboard.stats.total_habits, 2);
        assert!(!dashboard.stats.completed_today);
        assert_eq!(dashboard.seven_day_average, Some(100.0));
    }

    #[test]
    fn test_windows_reaching_before_earliest_date() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let mut tracker = open(&temp_file);
        let habit = tracker.add_habit(&alice(), "Plank".to_string(), None).unwrap();

        let early = Session::at(UserId::new("alice").unwrap(), NaiveDate::MIN + Duration::days(2));
        let trend = tracker.trend(&early, &habit.id, 1_000).unwrap();
        assert_eq!(trend.len(), 3);
        assert_eq!(trend[0].date, NaiveDate::MIN);
        assert_eq!(tracker.consistency(&early, &habit.id, u32::MAX).unwrap(), 0.0);
    }

    #[test]
    fn test_month_and_weekly() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let mut tracker = open(&temp_file);
        let session = alice();

        let habit = tracker.add_habit(&session, "Walk".to_string(), None).unwrap();
        tracker.log(&session, &habit.id, today(), true).unwrap();
        tracker.log(&session, &habit.id, today() - Duration::days(1), false).unwrap();

        let june = tracker.month(&session, 6, 2024).unwrap();
        assert_eq!(june.total_completions, 1);
        assert_eq!(june.completion_rate, 50.0);
        assert_eq!(june.days_tracked, 2);
        assert!(tracker.month(&session, 13, 2024).is_err());

        let weeks = tracker.weekly(&session, today() - Duration::days(13), today()).unwrap();
        assert_eq!(weeks.values().copied().fold(0.0, f64::max), 50.0);
    }
}
