/// Analytics over habit logs
///
/// This module holds the metrics engine (completion rates, weekly and
/// monthly roll-ups, trends), the leaderboard ranker, the incremental streak
/// cache and insight generation. Nothing here touches storage.

pub mod cache;
pub mod insights;
pub mod leaderboard;
pub mod metrics;

pub use cache::StreakCache;
pub use insights::{generate_insights, Insight, InsightKind};
pub use leaderboard::{
    rank, LeaderboardEntry, Medal, RankedEntry, UserStats, DEFAULT_WINDOW_DAYS, STREAK_SCAN_LIMIT,
};
pub use metrics::{
    completion_trend, consistency, daily_completion, monthly_summary, week_start,
    weekly_aggregate, window_start, MonthlySummary, TrendPoint,
};
