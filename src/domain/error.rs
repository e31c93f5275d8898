//! Input validation errors.

use chrono::NaiveDate;

/// A rejected input value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must be a finite number")]
    NonFinite { field: &'static str },

    #[error("{field} must be greater than zero, got {value}")]
    NonPositive { field: &'static str, value: f64 },

    #[error("{field} {value} out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Patient name must not be empty")]
    EmptyName,

    #[error("Measurement date {measured} is before birth date {born}")]
    BeforeBirth { measured: NaiveDate, born: NaiveDate },
}
