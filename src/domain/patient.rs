//! Patient profile for the measured child.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Female,
    Male,
}

/// A registered patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    /// Patient identifier (UUID v4)
    pub id: String,

    /// Full name. Never logged.
    pub name: String,

    pub birth_date: NaiveDate,

    pub sex: Option<Sex>,

    /// Timestamp of registration
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Patient {
    /// Create a new patient with a fresh identifier.
    #[must_use]
    pub fn new(name: impl Into<String>, birth_date: NaiveDate) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            birth_date,
            sex: None,
            created_at: chrono::Utc::now(),
        }
    }

    #[must_use]
    pub fn with_sex(mut self, sex: Sex) -> Self {
        self.sex = Some(sex);
        self
    }

    /// Validate the profile fields.
    ///
    /// # Errors
    /// Returns `ValidationError::EmptyName` for a blank name.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        Ok(())
    }

    /// Completed months of age on `on`, or `None` before birth.
    #[must_use]
    pub fn age_in_months(&self, on: NaiveDate) -> Option<u32> {
        if on < self.birth_date {
            return None;
        }
        let born = self.birth_date;
        let mut months = (on.year() - born.year()) * 12 + on.month() as i32 - born.month() as i32;
        if on.day() < born.day() {
            months -= 1;
        }
        u32::try_from(months).ok()
    }

    /// Check that a measurement date is not before birth.
    ///
    /// # Errors
    /// Returns `ValidationError::BeforeBirth` otherwise.
    pub fn check_measurement_date(&self, measured: NaiveDate) -> Result<(), ValidationError> {
        if measured < self.birth_date {
            return Err(ValidationError::BeforeBirth {
                measured,
                born: self.birth_date,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("Valid date")
    }

    #[test]
    fn test_age_in_months() {
        let patient = Patient::new("Ana", ymd(2024, 1, 15));
        assert_eq!(patient.age_in_months(ymd(2024, 1, 15)), Some(0));
        assert_eq!(patient.age_in_months(ymd(2024, 2, 14)), Some(0));
        assert_eq!(patient.age_in_months(ymd(2024, 2, 15)), Some(1));
        assert_eq!(patient.age_in_months(ymd(2025, 3, 20)), Some(14));
        assert_eq!(patient.age_in_months(ymd(2023, 12, 31)), None);
    }

    #[test]
    fn test_validation() {
        assert!(Patient::new("Ana", ymd(2024, 1, 15)).validate().is_ok());
        assert_eq!(
            Patient::new("   ", ymd(2024, 1, 15)).validate(),
            Err(ValidationError::EmptyName)
        );
    }

    #[test]
    fn test_measurement_before_birth_rejected() {
        let patient = Patient::new("Ana", ymd(2024, 1, 15));
        assert!(patient.check_measurement_date(ymd(2024, 1, 15)).is_ok());
        assert!(matches!(
            patient.check_measurement_date(ymd(2023, 6, 1)),
            Err(ValidationError::BeforeBirth { .. })
        ));
    }

    #[test]
    fn test_sex_round_trips_through_json() {
        let patient = Patient::new("Ana", ymd(2024, 1, 15)).with_sex(Sex::Female);
        let json = serde_json::to_value(&patient).expect("Should serialize");
        assert_eq!(json["sex"], "female");
        assert_eq!(json["birthDate"], "2024-01-15");

        let decoded: Patient = serde_json::from_value(json).expect("Should deserialize");
        assert_eq!(decoded, patient);
        assert_eq!(Patient::new("Bia", ymd(2024, 1, 15)).sex, None);
    }

    #[test]
    fn test_ids_are_unique() {
        let a = Patient::new("Ana", ymd(2024, 1, 15));
        let b = Patient::new("Ana", ymd(2024, 1, 15));
        assert_ne!(a.id, b.id);
        assert_eq!(a.id.len(), 36);
    }
}
