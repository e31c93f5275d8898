//! History service: measurement timelines and evolution.
//!
//! Produces the rows behind trend charts and report exports. Diagnoses
//! are recomputed from stored indices on every read.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{generate_diagnosis, CranialDiagnosis, DerivedIndices};
use crate::ports::{MeasurementPage, MeasurementStore};
use crate::CraniotrackError;

/// CVAI change (percentage points) treated as measurement noise.
pub const CVAI_TREND_TOLERANCE: f64 = 0.5;

/// One point on a patient's timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    pub record_id: String,
    pub measurement_date: NaiveDate,
    /// Completed months of age at the measurement date
    pub age_months: Option<u32>,
    pub head_circumference: Option<f64>,
    pub indices: DerivedIndices,
    pub diagnosis: Option<CranialDiagnosis>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    Stable,
    Worsening,
}

/// Comparison between the first and the latest diagnosable measurements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evolution {
    pub first: TimelineEntry,
    pub latest: TimelineEntry,
    /// latest − first
    pub cranial_index_delta: f64,
    /// latest − first
    pub cvai_delta: f64,
    pub trend: Trend,
}

impl Evolution {
    fn between(first: TimelineEntry, latest: TimelineEntry) -> Option<Self> {
        let (first_ci, first_cvai) = first.indices.diagnosable()?;
        let (latest_ci, latest_cvai) = latest.indices.diagnosable()?;
        let first_severity = first.diagnosis.as_ref()?.severity;
        let latest_severity = latest.diagnosis.as_ref()?.severity;

        let cvai_delta = latest_cvai - first_cvai;
        let trend = match latest_severity.cmp(&first_severity) {
            std::cmp::Ordering::Less => Trend::Improving,
            std::cmp::Ordering::Greater => Trend::Worsening,
            std::cmp::Ordering::Equal if cvai_delta < -CVAI_TREND_TOLERANCE => Trend::Improving,
            std::cmp::Ordering::Equal if cvai_delta > CVAI_TREND_TOLERANCE => Trend::Worsening,
            std::cmp::Ordering::Equal => Trend::Stable,
        };

        Some(Self {
            first,
            latest,
            cranial_index_delta: latest_ci - first_ci,
            cvai_delta,
            trend,
        })
    }
}

/// Service for patient measurement history.
pub struct HistoryService<S>
where
    S: MeasurementStore,
{
    storage: Arc<S>,
    page_size: usize,
}

impl<S> HistoryService<S>
where
    S: MeasurementStore,
    S::Error: Into<crate::adapters::StoreError>,
{
    /// Create a new history service with a default page size.
    pub fn new(storage: Arc<S>, page_size: usize) -> Self {
        Self {
            storage,
            page_size: page_size.max(1),
        }
    }

    /// All measurements of a patient, oldest first.
    ///
    /// # Errors
    /// Returns `NotFound` for an unknown patient, or a storage error.
    pub fn timeline(&self, patient_id: &str) -> Result<Vec<TimelineEntry>, CraniotrackError> {
        let patient = self
            .storage
            .load_patient(patient_id)
            .map_err(|e| CraniotrackError::Store(e.into()))?
            .ok_or_else(|| CraniotrackError::NotFound(format!("patient {patient_id}")))?;

        let records = self
            .storage
            .load_measurements(patient_id)
            .map_err(|e| CraniotrackError::Store(e.into()))?;

        let entries: Vec<TimelineEntry> = records
            .into_iter()
            .map(|record| TimelineEntry {
                age_months: patient.age_in_months(record.measurement.measurement_date),
                measurement_date: record.measurement.measurement_date,
                head_circumference: record.measurement.head_circumference,
                diagnosis: record
                    .indices
                    .diagnosable()
                    .map(|(ci, cvai)| generate_diagnosis(ci, cvai)),
                indices: record.indices,
                record_id: record.id,
            })
            .collect();

        tracing::debug!("Built timeline with {} entries", entries.len());
        Ok(entries)
    }

    /// Evolution between the first and latest diagnosable measurements.
    ///
    /// # Returns
    /// `None` with fewer than two diagnosable measurements.
    ///
    /// # Errors
    /// Returns `NotFound` for an unknown patient, or a storage error.
    pub fn evolution(&self, patient_id: &str) -> Result<Option<Evolution>, CraniotrackError> {
        let mut diagnosable = self
            .timeline(patient_id)?
            .into_iter()
            .filter(|entry| entry.diagnosis.is_some());

        let Some(first) = diagnosable.next() else {
            return Ok(None);
        };
        let Some(latest) = diagnosable.last() else {
            return Ok(None);
        };

        let evolution = Evolution::between(first, latest);
        if let Some(evolution) = &evolution {
            tracing::info!(
                "Evolution: Δci={:+.1} Δcvai={:+.1} trend={:?}",
                evolution.cranial_index_delta,
                evolution.cvai_delta,
                evolution.trend
            );
        }
        Ok(evolution)
    }

    /// A page of stored records; `limit` defaults to the configured size.
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    pub fn page(
        &self,
        patient_id: &str,
        offset: usize,
        limit: Option<usize>,
    ) -> Result<MeasurementPage, CraniotrackError> {
        self.storage
            .load_measurements_paginated(patient_id, offset, limit.unwrap_or(self.page_size))
            .map_err(|e| CraniotrackError::Store(e.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryStore;
    use crate::application::AssessmentService;
    use crate::domain::{Measurement, Patient, SeverityLevel};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("Valid date")
    }

    fn setup() -> (AssessmentService<MemoryStore>, HistoryService<MemoryStore>, Patient) {
        let storage = Arc::new(MemoryStore::new());
        let assessment = AssessmentService::new(Arc::clone(&storage));
        let history = HistoryService::new(storage, 2);
        let patient = assessment
            .register_patient(Patient::new("Davi", ymd(2024, 1, 10)))
            .expect("Should register");
        (assessment, history, patient)
    }

    #[test]
    fn test_timeline_ages_and_diagnoses() {
        let (assessment, history, patient) = setup();
        assessment
            .record_measurement(
                &patient.id,
                Measurement::new(143.0, 135.0, 145.0, 138.0, ymd(2024, 4, 12)),
            )
            .expect("Should record");
        let mut partial = Measurement::empty(ymd(2024, 3, 10));
        partial.length = Some(140.0);
        assessment
            .record_measurement(&patient.id, partial)
            .expect("Should record");

        let timeline = history.timeline(&patient.id).expect("Should build");
        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline[0].age_months, Some(2));
        assert!(timeline[0].diagnosis.is_none());
        assert_eq!(timeline[1].age_months, Some(3));
        assert_eq!(
            timeline[1].diagnosis.as_ref().map(|d| d.diagnosis_text.as_str()),
            Some("Misto Moderado")
        );
    }

    #[test]
    fn test_timeline_unknown_patient() {
        let (_, history, _) = setup();
        assert!(matches!(
            history.timeline("missing"),
            Err(CraniotrackError::NotFound(_))
        ));
    }

    #[test]
    fn test_evolution_improving() {
        let (assessment, history, patient) = setup();
        // cvai 10.0: plagiocephaly severe
        assessment
            .record_measurement(
                &patient.id,
                Measurement::new(140.0, 112.0, 132.0, 120.0, ymd(2024, 3, 1)),
            )
            .expect("Should record");
        // cvai 4.0: plagiocephaly mild
        assessment
            .record_measurement(
                &patient.id,
                Measurement::new(150.0, 120.0, 130.0, 125.0, ymd(2024, 7, 1)),
            )
            .expect("Should record");

        let evolution = history
            .evolution(&patient.id)
            .expect("Should compute")
            .expect("Two diagnosable measurements");
        assert_eq!(evolution.trend, Trend::Improving);
        assert_eq!(
            evolution.first.diagnosis.as_ref().map(|d| d.severity),
            Some(SeverityLevel::Severe)
        );
        assert!((evolution.cvai_delta - -6.0).abs() < 1e-9);
        assert!(evolution.cranial_index_delta.abs() < 1e-9);
    }

    #[test]
    fn test_evolution_stable_within_tolerance() {
        let (assessment, history, patient) = setup();
        for (month, right) in [(3, 100.0), (5, 100.3)] {
            assessment
                .record_measurement(
                    &patient.id,
                    Measurement::new(100.0, 80.0, right, 100.0, ymd(2024, month, 1)),
                )
                .expect("Should record");
        }

        let evolution = history
            .evolution(&patient.id)
            .expect("Should compute")
            .expect("Two diagnosable measurements");
        assert_eq!(evolution.trend, Trend::Stable);
    }

    #[test]
    fn test_evolution_needs_two_measurements() {
        let (assessment, history, patient) = setup();
        assert!(history.evolution(&patient.id).expect("Should compute").is_none());

        assessment
            .record_measurement(
                &patient.id,
                Measurement::new(100.0, 80.0, 100.0, 100.0, ymd(2024, 3, 1)),
            )
            .expect("Should record");
        assert!(history.evolution(&patient.id).expect("Should compute").is_none());
    }

    #[test]
    fn test_page_uses_default_size() {
        let (assessment, history, patient) = setup();
        for month in 2..=4 {
            assessment
                .record_measurement(&patient.id, Measurement::empty(ymd(2024, month, 15)))
                .expect("Should record");
        }

        let page = history.page(&patient.id, 0, None).expect("Should page");
        assert_eq!(page.items.len(), 2);
        assert!(page.has_more);

        let rest = history.page(&patient.id, 2, Some(10)).expect("Should page");
        assert_eq!(rest.items.len(), 1);
        assert!(!rest.has_more);
    }
}
