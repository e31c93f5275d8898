//! Derived cranial indices.

use serde::{Deserialize, Serialize};

use super::Measurement;

/// Indices derived from a [`Measurement`].
///
/// Each index is `None` while the inputs it needs are missing or unusable
/// (absent, zero, negative, non-finite). "Not yet computable" is a valid
/// state, distinct from an abnormal value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedIndices {
    /// width / length × 100, rounded to one decimal
    pub cranial_index: Option<f64>,

    /// |right − left| in millimeters
    pub diagonal_difference: Option<f64>,

    /// (longer − shorter) / shorter × 100, rounded to one decimal
    pub cvai: Option<f64>,
}

impl DerivedIndices {
    #[must_use]
    pub fn from_measurement(measurement: &Measurement) -> Self {
        compute_indices(
            measurement.length,
            measurement.width,
            measurement.right_diagonal,
            measurement.left_diagonal,
        )
    }

    /// Both indices required for a diagnosis, if available.
    #[must_use]
    pub fn diagnosable(&self) -> Option<(f64, f64)> {
        Some((self.cranial_index?, self.cvai?))
    }
}

/// Round to one decimal place (half away from zero).
#[must_use]
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn usable(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

/// Rounded percentage, or `None` when the ratio overflows.
fn percentage(numerator: f64, denominator: f64) -> Option<f64> {
    Some(round1(numerator / denominator * 100.0)).filter(|v| v.is_finite())
}

/// Compute the derived indices from raw caliper readings.
#[must_use]
pub fn compute_indices(
    length: Option<f64>,
    width: Option<f64>,
    right_diagonal: Option<f64>,
    left_diagonal: Option<f64>,
) -> DerivedIndices {
    let cranial_index = match (usable(length), usable(width)) {
        (Some(length), Some(width)) => percentage(width, length),
        _ => None,
    };

    let (diagonal_difference, cvai) = match (usable(right_diagonal), usable(left_diagonal)) {
        (Some(right), Some(left)) => {
            let longer = right.max(left);
            let shorter = right.min(left);
            match percentage(longer - shorter, shorter) {
                Some(cvai) => (Some((right - left).abs()), Some(cvai)),
                None => (None, None),
            }
        }
        _ => (None, None),
    };

    DerivedIndices {
        cranial_index,
        diagonal_difference,
        cvai,
    }
}
