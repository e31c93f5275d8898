//! In-memory adapter: Implementation of `MeasurementStore`.
//!
//! Keeps patients and measurement records in process memory behind a
//! `Mutex`. Used by the CLI and tests; a relational backend implements the
//! same port in the hosted application.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::domain::Patient;
use crate::ports::{MeasurementPage, MeasurementRecord, MeasurementStore};

/// Error type for storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unknown patient: {0}")]
    UnknownPatient(String),

    #[error("Store lock poisoned")]
    LockPoisoned,
}

#[derive(Default)]
struct Tables {
    patients: HashMap<String, Patient>,
    /// Insertion order
    records: Vec<MeasurementRecord>,
}

impl Tables {
    fn records_for(&self, patient_id: &str) -> Vec<MeasurementRecord> {
        let mut records: Vec<MeasurementRecord> = self
            .records
            .iter()
            .filter(|r| r.patient_id == patient_id)
            .cloned()
            .collect();
        // Stable: same-day records stay in insertion order.
        records.sort_by_key(|r| r.measurement.measurement_date);
        records
    }
}

/// In-memory storage adapter.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        self.tables.lock().map_err(|_| StoreError::LockPoisoned)
    }
}

impl MeasurementStore for MemoryStore {
    type Error = StoreError;

    fn save_patient(&self, patient: &Patient) -> Result<(), Self::Error> {
        let mut tables = self.lock()?;
        tables.patients.insert(patient.id.clone(), patient.clone());
        tracing::debug!("Saved patient {} to storage", patient.id);
        Ok(())
    }

    fn load_patient(&self, id: &str) -> Result<Option<Patient>, Self::Error> {
        let tables = self.lock()?;
        Ok(tables.patients.get(id).cloned())
    }

    fn list_patients(&self) -> Result<Vec<Patient>, Self::Error> {
        let tables = self.lock()?;
        let mut patients: Vec<Patient> = tables.patients.values().cloned().collect();
        patients.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(patients)
    }

    fn save_measurement(&self, record: &MeasurementRecord) -> Result<(), Self::Error> {
        let mut tables = self.lock()?;
        if !tables.patients.contains_key(&record.patient_id) {
            return Err(StoreError::UnknownPatient(record.patient_id.clone()));
        }

        match tables.records.iter().position(|r| r.id == record.id) {
            Some(pos) => tables.records[pos] = record.clone(),
            None => tables.records.push(record.clone()),
        }

        tracing::debug!("Saved measurement {} to storage", record.id);
        Ok(())
    }

    fn load_measurements(&self, patient_id: &str) -> Result<Vec<MeasurementRecord>, Self::Error> {
        let tables = self.lock()?;
        Ok(tables.records_for(patient_id))
    }

    fn load_measurements_paginated(
        &self,
        patient_id: &str,
        offset: usize,
        limit: usize,
    ) -> Result<MeasurementPage, Self::Error> {
        let tables = self.lock()?;
        let records = tables.records_for(patient_id);
        let total_count = records.len();
        let items = records.into_iter().skip(offset).take(limit).collect();
        Ok(MeasurementPage::new(items, total_count, offset, limit))
    }

    fn count_measurements(&self, patient_id: &str) -> Result<usize, Self::Error> {
        let tables = self.lock()?;
        Ok(tables
            .records
            .iter()
            .filter(|r| r.patient_id == patient_id)
            .count())
    }

    fn delete_measurement(&self, id: &str) -> Result<(), Self::Error> {
        let mut tables = self.lock()?;
        let before = tables.records.len();
        tables.records.retain(|r| r.id != id);
        if tables.records.len() == before {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }

    fn delete_patient(&self, id: &str) -> Result<(), Self::Error> {
        let mut tables = self.lock()?;
        if tables.patients.remove(id).is_none() {
            return Err(StoreError::NotFound(id.to_string()));
        }
        tables.records.retain(|r| r.patient_id != id);
        tracing::info!("Deleted patient {} and its measurements", id);
        Ok(())
    }

    fn clear_all(&self) -> Result<(), Self::Error> {
        let mut tables = self.lock()?;
        tables.patients.clear();
        tables.records.clear();
        tracing::warn!("Cleared all data from storage");
        Ok(())
    }
}
