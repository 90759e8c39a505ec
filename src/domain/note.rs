/// Free-text note a user attaches to a day

use serde::{Deserialize, Serialize};
use chrono::NaiveDate;
use crate::domain::{UserId, DomainError};

/// One note per (user, date); writing again replaces the text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyNote {
    pub user_id: UserId,
    pub date: NaiveDate,
    pub text: String,
}

impl DailyNote {
    pub const MAX_LEN: usize = 2000;

    pub fn new(user_id: UserId, date: NaiveDate, text: String) -> Result<Self, DomainError> {
        if text.chars().count() > Self::MAX_LEN {
            return Err(DomainError::Validation {
                message: format!("Notes cannot be longer than {} characters", Self::MAX_LEN),
            });
        }

        Ok(Self { user_id, date, text })
    }

    /// A note holding only whitespace is treated as cleared
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}
