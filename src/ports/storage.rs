//! Storage port: Trait for the external measurement store.
//!
//! The store keeps patients, measurement inputs and the indices derived
//! from them. Diagnoses are never persisted; callers recompute them from
//! the indices.

use serde::{Deserialize, Serialize};

use crate::domain::{DerivedIndices, Measurement, Patient};

/// A persisted measurement with its derived indices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementRecord {
    /// Unique identifier
    pub id: String,

    /// Owning patient
    pub patient_id: String,

    pub measurement: Measurement,

    /// Indices computed from `measurement` at write time
    pub indices: DerivedIndices,

    /// When the record was saved
    pub recorded_at: chrono::DateTime<chrono::Utc>,
}

impl MeasurementRecord {
    /// Create a record for a patient, deriving the indices.
    #[must_use]
    pub fn new(patient_id: impl Into<String>, measurement: Measurement) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            patient_id: patient_id.into(),
            indices: DerivedIndices::from_measurement(&measurement),
            measurement,
            recorded_at: chrono::Utc::now(),
        }
    }
}

/// A page of measurement records with pagination metadata.
#[derive(Debug, Clone)]
pub struct MeasurementPage {
    /// Records in this page, oldest first
    pub items: Vec<MeasurementRecord>,
    /// Total count of the patient's records
    pub total_count: usize,
    /// Current page offset
    pub offset: usize,
    /// Page size limit
    pub limit: usize,
    /// Whether there are more pages
    pub has_more: bool,
}

impl MeasurementPage {
    #[must_use]
    pub fn new(items: Vec<MeasurementRecord>, total_count: usize, offset: usize, limit: usize) -> Self {
        let has_more = offset + items.len() < total_count;
        Self {
            items,
            total_count,
            offset,
            limit,
            has_more,
        }
    }

    /// Get the next page offset.
    #[must_use]
    pub fn next_offset(&self) -> Option<usize> {
        if self.has_more {
            Some(self.offset + self.limit)
        } else {
            None
        }
    }

    /// Get the previous page offset.
    #[must_use]
    pub fn prev_offset(&self) -> Option<usize> {
        if self.offset > 0 {
            Some(self.offset.saturating_sub(self.limit))
        } else {
            None
        }
    }
}

/// Trait for measurement persistence.
pub trait MeasurementStore: Send + Sync {
    /// Error type for storage operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Insert or replace a patient.
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    fn save_patient(&self, patient: &Patient) -> Result<(), Self::Error>;

    /// Load a patient by ID.
    ///
    /// # Returns
    /// `None` if no such patient exists.
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    fn load_patient(&self, id: &str) -> Result<Option<Patient>, Self::Error>;

    /// List all patients ordered by name.
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    fn list_patients(&self) -> Result<Vec<Patient>, Self::Error>;

    /// Save a measurement record. The owning patient must exist.
    ///
    /// # Errors
    /// Returns error if the patient is unknown or storage fails.
    fn save_measurement(&self, record: &MeasurementRecord) -> Result<(), Self::Error>;

    /// Load a patient's records, oldest measurement date first.
    ///
    /// Records sharing a date keep insertion order.
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    fn load_measurements(&self, patient_id: &str) -> Result<Vec<MeasurementRecord>, Self::Error>;

    /// Load a patient's records with pagination.
    ///
    /// # Arguments
    /// * `offset` - Starting position (0-indexed)
    /// * `limit` - Maximum number of items to return
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    fn load_measurements_paginated(
        &self,
        patient_id: &str,
        offset: usize,
        limit: usize,
    ) -> Result<MeasurementPage, Self::Error>;

    /// Count a patient's records.
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    fn count_measurements(&self, patient_id: &str) -> Result<usize, Self::Error>;

    /// Delete a measurement record by ID.
    ///
    /// # Errors
    /// Returns error if the record does not exist or storage fails.
    fn delete_measurement(&self, id: &str) -> Result<(), Self::Error>;

    /// Delete a patient and all of its records.
    ///
    /// # Errors
    /// Returns error if the patient does not exist or storage fails.
    fn delete_patient(&self, id: &str) -> Result<(), Self::Error>;

    /// Clear all data.
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    fn clear_all(&self) -> Result<(), Self::Error>;
}
