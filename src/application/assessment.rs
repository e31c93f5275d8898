//! Assessment service: classification and measurement recording.
//!
//! This service coordinates:
//! - Input validation
//! - Index computation
//! - Diagnosis resolution
//! - Storage persistence of inputs and indices

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::{
    generate_diagnosis, ChoaLevel, CranialDiagnosis, DerivedIndices, Measurement, Patient,
};
use crate::ports::{MeasurementRecord, MeasurementStore};
use crate::CraniotrackError;

/// Result of assessing one measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub cranial_index: Option<f64>,
    pub diagonal_difference: Option<f64>,
    pub cvai: Option<f64>,

    /// Present once both indices are computable
    pub diagnosis: Option<CranialDiagnosis>,

    /// Present once CVAI is computable
    pub choa_level: Option<ChoaLevel>,
}

impl Assessment {
    /// Build an assessment from already derived indices.
    #[must_use]
    pub fn from_indices(indices: &DerivedIndices) -> Self {
        Self {
            cranial_index: indices.cranial_index,
            diagonal_difference: indices.diagonal_difference,
            cvai: indices.cvai,
            diagnosis: indices
                .diagnosable()
                .map(|(ci, cvai)| generate_diagnosis(ci, cvai)),
            choa_level: indices.cvai.map(ChoaLevel::from_cvai),
        }
    }

    /// Pretty JSON for export.
    ///
    /// # Errors
    /// Returns `CraniotrackError::Serialization` if encoding fails.
    pub fn to_json(&self) -> Result<String, CraniotrackError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Service for assessing and recording measurements.
pub struct AssessmentService<S>
where
    S: MeasurementStore,
{
    storage: Arc<S>,
}

impl<S> AssessmentService<S>
where
    S: MeasurementStore,
    S::Error: Into<crate::adapters::StoreError>,
{
    /// Create a new assessment service.
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }

    /// Assess a measurement without persisting it.
    ///
    /// # Errors
    /// Returns `CraniotrackError::Validation` for malformed inputs.
    pub fn assess(&self, measurement: &Measurement) -> Result<Assessment, CraniotrackError> {
        validate(measurement)?;

        let indices = DerivedIndices::from_measurement(measurement);
        let assessment = Assessment::from_indices(&indices);

        match &assessment.diagnosis {
            Some(diagnosis) => tracing::debug!(
                "Assessment: ci={:?} cvai={:?} diagnosis={}",
                assessment.cranial_index,
                assessment.cvai,
                diagnosis.diagnosis_text
            ),
            None => tracing::debug!("Assessment incomplete: indices not yet computable"),
        }

        Ok(assessment)
    }

    /// Register a new patient.
    ///
    /// # Errors
    /// Returns error if validation or storage fails.
    pub fn register_patient(&self, patient: Patient) -> Result<Patient, CraniotrackError> {
        patient.validate()?;
        self.storage
            .save_patient(&patient)
            .map_err(|e| CraniotrackError::Store(e.into()))?;
        tracing::info!("Registered patient {}", patient.id);
        Ok(patient)
    }

    /// Validate and persist a measurement for an existing patient.
    ///
    /// # Errors
    /// Returns error if the patient is unknown, the measurement is invalid
    /// or dated before birth, or storage fails.
    pub fn record_measurement(
        &self,
        patient_id: &str,
        measurement: Measurement,
    ) -> Result<MeasurementRecord, CraniotrackError> {
        let patient = self
            .storage
            .load_patient(patient_id)
            .map_err(|e| CraniotrackError::Store(e.into()))?
            .ok_or_else(|| CraniotrackError::NotFound(format!("patient {patient_id}")))?;

        validate(&measurement)?;
        patient.check_measurement_date(measurement.measurement_date)?;

        let record = MeasurementRecord::new(patient_id, measurement);
        self.storage
            .save_measurement(&record)
            .map_err(|e| CraniotrackError::Store(e.into()))?;

        tracing::info!(
            "Recorded measurement {} for patient {} (ci={:?}, cvai={:?})",
            record.id,
            patient_id,
            record.indices.cranial_index,
            record.indices.cvai
        );
        Ok(record)
    }
}

fn validate(measurement: &Measurement) -> Result<(), CraniotrackError> {
    measurement.validate().map_err(|mut errors| {
        tracing::warn!("Rejected measurement with {} invalid field(s)", errors.len());
        CraniotrackError::Validation(errors.remove(0))
    })
}
