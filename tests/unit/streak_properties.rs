/// Property tests: the incremental streak cache must agree with the full recompute
use chrono::{Duration, NaiveDate};
use habit_streaks::*;
use proptest::prelude::*;

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn writes() -> impl Strategy<Value = Vec<(i64, bool)>> {
    prop::collection::vec((0i64..40, prop::bool::weighted(0.8)), 0..60)
}

#[cfg(test)]
mod streak_property_tests {
    use super::*;

    proptest! {
        #[test]
        fn test_cache_matches_recompute(ops in writes(), as_of_offset in -5i64..45) {
            let user = UserId::new("alice").unwrap();
            let habit = HabitId::new();
            let as_of = base_date() + Duration::days(as_of_offset);

            let mut logs: Vec<LogEntry> = Vec::new();
            let mut cache = StreakCache::new();
            cache.seed(&user, &habit, &[]);

            for (offset, completed) in ops {
                let date = base_date() + Duration::days(offset);
                upsert_entry(&mut logs, LogEntry::new(habit.clone(), date, completed));
                prop_assert!(cache.record(&user, &habit, date, completed));

                let cached = cache.streak(&user, &habit, as_of).unwrap();
                prop_assert_eq!(cached, StreakResult::calculate(&logs, as_of));
            }
        }

        #[test]
        fn test_seeded_cache_matches_recompute(ops in writes(), as_of_offset in -5i64..45) {
            let user = UserId::new("bob").unwrap();
            let habit = HabitId::new();
            let as_of = base_date() + Duration::days(as_of_offset);

            let mut logs: Vec<LogEntry> = Vec::new();
            for (offset, completed) in ops {
                upsert_entry(&mut logs, LogEntry::new(habit.clone(), base_date() + Duration::days(offset), completed));
            }

            let mut cache = StreakCache::new();
            cache.seed(&user, &habit, &logs);

            prop_assert_eq!(
                cache.streak(&user, &habit, as_of).unwrap(),
                StreakResult::calculate(&logs, as_of)
            );
        }

        #[test]
        fn test_longest_never_below_current(ops in writes(), as_of_offset in -5i64..45) {
            let habit = HabitId::new();
            let as_of = base_date() + Duration::days(as_of_offset);
            let logs: Vec<LogEntry> = ops
                .into_iter()
                .map(|(offset, completed)| LogEntry::new(habit.clone(), base_date() + Duration::days(offset), completed))
                .collect();

            let result = StreakResult::calculate(&logs, as_of);
            prop_assert!(result.longest_streak >= result.current_streak);
            prop_assert_eq!(result, StreakResult::calculate(&logs, as_of));
        }

        #[test]
        fn test_order_does_not_matter(ops in writes(), as_of_offset in 0i64..45) {
            let habit = HabitId::new();
            let as_of = base_date() + Duration::days(as_of_offset);

            let mut logs: Vec<LogEntry> = Vec::new();
            for (offset, completed) in ops {
                upsert_entry(&mut logs, LogEntry::new(habit.clone(), base_date() + Duration::days(offset), completed));
            }
            let mut reversed = logs.clone();
            reversed.reverse();

            prop_assert_eq!(
                StreakResult::calculate(&logs, as_of),
                StreakResult::calculate(&reversed, as_of)
            );
        }
    }
}
