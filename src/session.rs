/// Explicit per-request context
///
/// Every tracker call receives the acting user and the date treated as
/// "today", instead of reading them from process-wide state.

use chrono::{Local, NaiveDate};
use crate::domain::UserId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: UserId,
    pub today: NaiveDate,
}

impl Session {
    /// Session for `user_id` on the local calendar date
    pub fn new(user_id: UserId) -> Self {
        Self::at(user_id, Local::now().date_naive())
    }

    /// Session pinned to a given date
    pub fn at(user_id: UserId, today: NaiveDate) -> Self {
        Self { user_id, today }
    }

    /// Same day, seen as another user (friend views, leaderboard rows)
    pub fn as_user(&self, user_id: UserId) -> Self {
        Self::at(user_id, self.today)
    }
}
