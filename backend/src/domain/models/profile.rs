use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use shared::Gender;
use uuid::Uuid;

pub const MAX_NAME_LENGTH: usize = 100;

/// The single baby profile kept by the application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BabyProfile {
    pub id: Uuid,
    pub name: String,
    pub birth_date: NaiveDate,
    pub gender: Gender,
    pub birth_weight_kg: Option<f64>,
    pub birth_height_cm: Option<f64>,
    pub photo_ref: Option<String>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProfileValidationError {
    #[error("Baby name cannot be empty")]
    EmptyName,
    #[error("Baby name cannot exceed 100 characters (got {0})")]
    NameTooLong(usize),
    #[error("Birth date {0} is in the future")]
    BirthDateInFuture(NaiveDate),
    #[error("Invalid birth date: {0}")]
    InvalidBirthDate(String),
    #[error("{0} must be a positive number")]
    NonPositiveMeasurement(&'static str),
}

/// Returned when an operation needs a profile and none has been created
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("No baby profile exists")]
pub struct ProfileNotFound;

impl BabyProfile {
    /// Check the profile against `today`. Names are trimmed before the length check.
    pub fn validate(&self, today: NaiveDate) -> Result<(), ProfileValidationError> {
        let name_length = self.name.trim().chars().count();
        if name_length == 0 {
            return Err(ProfileValidationError::EmptyName);
        }
        if name_length > MAX_NAME_LENGTH {
            return Err(ProfileValidationError::NameTooLong(name_length));
        }
        if self.birth_date > today {
            return Err(ProfileValidationError::BirthDateInFuture(self.birth_date));
        }
        if matches!(self.birth_weight_kg, Some(w) if w <= 0.0) {
            return Err(ProfileValidationError::NonPositiveMeasurement("Birth weight"));
        }
        if matches!(self.birth_height_cm, Some(h) if h <= 0.0) {
            return Err(ProfileValidationError::NonPositiveMeasurement("Birth height"));
        }
        Ok(())
    }

    pub fn age_in_days(&self, today: NaiveDate) -> i64 {
        (today - self.birth_date).num_days().max(0)
    }

    /// Whole months since birth as of `today`
    pub fn age_in_months(&self, today: NaiveDate) -> u32 {
        if today <= self.birth_date {
            return 0;
        }
        let mut months = (today.year() - self.birth_date.year()) * 12 + today.month() as i32
            - self.birth_date.month() as i32;
        if today.day() < self.birth_date.day() {
            months -= 1;
        }
        months.max(0) as u32
    }

    /// Compact age such as "1y 2m", "3m 4d", "12d" or "newborn"
    pub fn age_description(&self, today: NaiveDate) -> String {
        let months = self.age_in_months(today);
        let days = self
            .birth_date
            .checked_add_months(Months::new(months))
            .map(|anchor| (today - anchor).num_days().max(0))
            .unwrap_or(0);

        let (years, months) = (months / 12, months % 12);
        if years > 0 {
            format!("{}y {}m", years, months)
        } else if months > 0 {
            format!("{}m {}d", months, days)
        } else if days > 0 {
            format!("{}d", days)
        } else {
            "newborn".to_string()
        }
    }
}
