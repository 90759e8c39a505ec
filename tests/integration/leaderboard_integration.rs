/// Leaderboard across several users sharing one database
use chrono::{Duration, NaiveDate};
use habit_streaks::*;
use tempfile::NamedTempFile;

#[cfg(test)]
mod leaderboard_integration_tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, 20).unwrap()
    }

    fn session(user: &str) -> Session {
        Session::at(UserId::new(user).unwrap(), today())
    }

    /// Add one habit for `user` and mark it done on the given days back from today
    fn habit_done(tracker: &mut HabitTracker, user: &str, days_back: &[i64]) -> HabitId {
        let session = session(user);
        let habit = tracker.add_habit(&session, format!("{} habit", user), None).unwrap();
        for n in days_back {
            tracker.log(&session, &habit.id, today() - Duration::days(*n), true).unwrap();
        }
        habit.id
    }

    fn tracker_with(temp_file: &NamedTempFile, roster: &[&str]) -> HabitTracker {
        let roster: Vec<Friend> = roster.iter().map(|f| f.parse().unwrap()).collect();
        let config = TrackerConfig::new(temp_file.path().to_path_buf(), UserId::new("alice").unwrap())
            .with_roster(roster);
        HabitTracker::new(config).expect("Failed to open tracker")
    }

    #[test]
    fn test_leaderboard_ranks_all_users() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let mut tracker = tracker_with(&temp_file, &[]);

        habit_done(&mut tracker, "alice", &[0, 1, 2]);
        habit_done(&mut tracker, "bob", &[0, 1, 2, 3, 4]);
        habit_done(&mut tracker, "carol", &[2, 3]);

        let ranked = tracker.leaderboard(&session("alice")).unwrap();
        let order: Vec<&str> = ranked.iter().map(|r| r.entry.user_id.as_str()).collect();
        assert_eq!(order, vec!["bob", "alice", "carol"]);

        assert_eq!(ranked[0].medal, Some(Medal::Gold));
        assert_eq!(ranked[0].entry.current_streak, 5);
        assert_eq!(ranked[0].entry.completion_rate, 71.4);
        assert!(ranked[0].entry.completed_today);

        assert_eq!(ranked[1].medal, Some(Medal::Silver));
        // Carol missed today and yesterday
        assert_eq!(ranked[2].entry.current_streak, 0);
        assert_eq!(ranked[2].medal, None);
        assert_eq!(ranked[2].position, 3);
    }

    #[test]
    fn test_roster_sets_members_and_names() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let mut tracker = tracker_with(&temp_file, &["alice=Alice", "dave=Dave"]);

        habit_done(&mut tracker, "alice", &[0]);
        habit_done(&mut tracker, "bob", &[0, 1]);

        let ranked = tracker.leaderboard(&session("alice")).unwrap();
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].entry.display_name, "Alice");
        assert_eq!(ranked[0].medal, Some(Medal::Gold));

        // Dave has no habits yet
        assert_eq!(ranked[1].entry.display_name, "Dave");
        assert_eq!(ranked[1].entry.total_habits, 0);
        assert_eq!(ranked[1].entry.completion_rate, 0.0);
        assert_eq!(ranked[1].medal, None);
    }

    #[test]
    fn test_joint_streak_needs_every_habit() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let mut tracker = tracker_with(&temp_file, &[]);
        let alice = session("alice");

        habit_done(&mut tracker, "alice", &[0, 1, 2, 3]);
        let second = habit_done(&mut tracker, "alice", &[0, 1]);

        let stats = tracker.user_stats(&alice, None, None).unwrap();
        assert_eq!(stats.current_streak, 2);
        assert!(stats.completed_today);

        // Removing the lagging habit restores the longer joint streak
        tracker.remove_habit(&alice, &second).unwrap();
        let stats = tracker.user_stats(&alice, None, None).unwrap();
        assert_eq!(stats.total_habits, 1);
        assert_eq!(stats.current_streak, 4);
    }

    #[test]
    fn test_window_days_changes_rate() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let config = TrackerConfig::new(temp_file.path().to_path_buf(), UserId::new("alice").unwrap())
            .with_window_days(2);
        let mut tracker = HabitTracker::new(config).unwrap();

        habit_done(&mut tracker, "alice", &[0, 5]);

        let ranked = tracker.leaderboard(&session("alice")).unwrap();
        assert_eq!(ranked[0].entry.completion_rate, 50.0);
    }

    #[test]
    fn test_huge_window_is_clamped() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let config = TrackerConfig::new(temp_file.path().to_path_buf(), UserId::new("alice").unwrap())
            .with_window_days(u32::MAX);
        let mut tracker = HabitTracker::new(config).unwrap();

        habit_done(&mut tracker, "alice", &[0]);

        let ranked = tracker.leaderboard(&session("alice")).unwrap();
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].entry.current_streak, 1);
        assert_eq!(ranked[0].entry.completion_rate, 0.0);
    }

    #[test]
    fn test_friend_views_use_their_data() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let mut tracker = tracker_with(&temp_file, &[]);
        habit_done(&mut tracker, "bob", &[0]);

        let bob = session("alice").as_user(UserId::new("bob").unwrap());
        let day = tracker.day(&bob, today()).unwrap();
        assert_eq!(day.completed_count, 1);
        assert!(tracker.day(&session("alice"), today()).unwrap().habits.is_empty());
    }
}
