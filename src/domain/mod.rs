//! Domain layer: Core business types and logic.
//!
//! Pure value types and the classification pipeline
//! (measurement → indices → per-condition severity → diagnosis).
//! Nothing here performs I/O or logs.

mod choa;
mod diagnosis;
mod error;
mod indices;
mod measurement;
mod patient;
mod severity;

pub use choa::ChoaLevel;
pub use diagnosis::{generate_diagnosis, CranialDiagnosis, DiagnosisType};
pub use error::ValidationError;
pub use indices::{compute_indices, round1, DerivedIndices};
pub use measurement::Measurement;
pub use patient::{Patient, Sex};
pub use severity::{
    classify_all, classify_brachycephaly, classify_dolichocephaly, classify_plagiocephaly,
    Condition, ConditionClassification, SeverityLevel,
};
