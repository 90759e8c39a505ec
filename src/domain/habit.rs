/// Habit entity and related functionality
///
/// This module defines the core Habit struct that represents something a user
/// wants to do every day, along with its validation rules.

use serde::{Deserialize, Serialize};
use chrono::NaiveDate;
use crate::domain::{HabitId, UserId, DomainError};

/// A habit represents something the user wants to do daily
///
/// Habits are never physically removed by normal use: deleting one clears
/// `is_active` and leaves its log history in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    /// Unique identifier for this habit
    pub id: HabitId,
    /// Who owns this habit
    pub user_id: UserId,
    /// Display name (e.g., "Morning Run", "Read for 30min")
    pub name: String,
    /// Optional detailed description
    pub description: Option<String>,
    /// Day this habit was created
    pub created_on: NaiveDate,
    /// False once the habit has been soft-deleted
    pub is_active: bool,
}

impl Habit {
    /// Create a new habit with validation
    ///
    /// This is the main constructor that validates all fields and returns
    /// an error if any validation fails.
    pub fn new(
        user_id: UserId,
        name: String,
        description: Option<String>,
        created_on: NaiveDate,
    ) -> Result<Self, DomainError> {
        let name = Self::validate_name(&name)?;
        let description = Self::validate_description(description)?;

        Ok(Self {
            id: HabitId::new(),
            user_id,
            name,
            description,
            created_on,
            is_active: true,
        })
    }

    /// Create a habit from existing data (used when loading from database)
    pub fn from_existing(
        id: HabitId,
        user_id: UserId,
        name: String,
        description: Option<String>,
        created_on: NaiveDate,
        is_active: bool,
    ) -> Self {
        Self {
            id,
            user_id,
            name,
            description,
            created_on,
            is_active,
        }
    }

    /// Rename and/or re-describe the habit
    ///
    /// `description` uses `Some(None)` to clear the description.
    pub fn update(
        &mut self,
        name: Option<String>,
        description: Option<Option<String>>,
    ) -> Result<(), DomainError> {
        let name = name.map(|n| Self::validate_name(&n)).transpose()?;
        let description = description
            .map(Self::validate_description)
            .transpose()?;

        if let Some(new_name) = name {
            self.name = new_name;
        }
        if let Some(new_description) = description {
            self.description = new_description;
        }

        Ok(())
    }

    /// Soft delete: the habit stops counting but its logs stay queryable
    pub fn deactivate(&mut self) {
        self.is_active = false;
    }

    // Validation helper methods

    /// Validate habit name according to business rules
    fn validate_name(name: &str) -> Result<String, DomainError> {
        let trimmed = name.trim();

        if trimmed.is_empty() {
            return Err(DomainError::InvalidHabitName(
                "Habit name cannot be empty".to_string()
            ));
        }

        if trimmed.chars().count() > 100 {
            return Err(DomainError::InvalidHabitName(
                "Habit name cannot be longer than 100 characters".to_string()
            ));
        }

        Ok(trimmed.to_string())
    }

    /// Blank descriptions are stored as none
    fn validate_description(description: Option<String>) -> Result<Option<String>, DomainError> {
        match description {
            Some(desc) if desc.trim().is_empty() => Ok(None),
            Some(desc) if desc.chars().count() > 500 => Err(DomainError::Validation {
                message: "Description cannot be longer than 500 characters".to_string()
            }),
            other => Ok(other),
        }
    }
}

/// Keep only habits that still count towards stats
pub fn active_habits(habits: &[Habit]) -> impl Iterator<Item = &Habit> {
    habits.iter().filter(|h| h.is_active)
}
