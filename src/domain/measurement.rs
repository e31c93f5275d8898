//! Raw caliper measurements as entered by the clinician.
//!
//! All lengths are in millimeters.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Plausible range for skull length, width and diagonals (mm).
const MIN_CALIPER_MM: f64 = 10.0;
const MAX_CALIPER_MM: f64 = 400.0;

/// Plausible range for head circumference (mm).
const MIN_CIRCUMFERENCE_MM: f64 = 100.0;
const MAX_CIRCUMFERENCE_MM: f64 = 800.0;

/// One set of skull measurements.
///
/// Fields are optional because a clinician may save a partially entered
/// form; derived indices are simply absent until the inputs they need
/// are present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    /// Anteroposterior length (glabella to opisthocranion)
    pub length: Option<f64>,

    /// Biparietal width
    pub width: Option<f64>,

    /// Right oblique diagonal
    pub right_diagonal: Option<f64>,

    /// Left oblique diagonal
    pub left_diagonal: Option<f64>,

    /// Occipitofrontal head circumference
    pub head_circumference: Option<f64>,

    /// Date the measurement was taken
    pub measurement_date: NaiveDate,
}

impl Measurement {
    /// Create a complete measurement (no circumference).
    #[must_use]
    pub fn new(
        length: f64,
        width: f64,
        right_diagonal: f64,
        left_diagonal: f64,
        measurement_date: NaiveDate,
    ) -> Self {
        Self {
            length: Some(length),
            width: Some(width),
            right_diagonal: Some(right_diagonal),
            left_diagonal: Some(left_diagonal),
            head_circumference: None,
            measurement_date,
        }
    }

    /// Create an empty measurement for the given date.
    #[must_use]
    pub fn empty(measurement_date: NaiveDate) -> Self {
        Self {
            length: None,
            width: None,
            right_diagonal: None,
            left_diagonal: None,
            head_circumference: None,
            measurement_date,
        }
    }

    #[must_use]
    pub fn with_head_circumference(mut self, head_circumference: f64) -> Self {
        self.head_circumference = Some(head_circumference);
        self
    }

    /// Named view of the fields, used by validation and error messages.
    fn fields(&self) -> [(&'static str, Option<f64>, f64, f64); 5] {
        [
            ("length", self.length, MIN_CALIPER_MM, MAX_CALIPER_MM),
            ("width", self.width, MIN_CALIPER_MM, MAX_CALIPER_MM),
            ("rightDiagonal", self.right_diagonal, MIN_CALIPER_MM, MAX_CALIPER_MM),
            ("leftDiagonal", self.left_diagonal, MIN_CALIPER_MM, MAX_CALIPER_MM),
            (
                "headCircumference",
                self.head_circumference,
                MIN_CIRCUMFERENCE_MM,
                MAX_CIRCUMFERENCE_MM,
            ),
        ]
    }

    /// Validate every present field.
    ///
    /// Absent fields are not errors. Present ones must be finite, positive
    /// and within a physiologically plausible range.
    ///
    /// # Errors
    /// Returns all violations found, in field order.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        for (field, value, min, max) in self.fields() {
            let Some(value) = value else { continue };
            if !value.is_finite() {
                errors.push(ValidationError::NonFinite { field });
            } else if value <= 0.0 {
                errors.push(ValidationError::NonPositive { field, value });
            } else if value < min || value > max {
                errors.push(ValidationError::OutOfRange {
                    field,
                    value,
                    min,
                    max,
                });
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Whether every input needed for both indices is present.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.length.is_some()
            && self.width.is_some()
            && self.right_diagonal.is_some()
            && self.left_diagonal.is_some()
    }
}
