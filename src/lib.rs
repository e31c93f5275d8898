//! # Craniotrack
#![allow(non_snake_case)]
//!
//! Pediatric cranial measurement tracking.
//!
//! This crate provides:
//! - Cranial Index and CVAI computation from caliper readings
//! - Plagiocephaly, brachycephaly and dolichocephaly grading
//! - Diagnosis resolution with "most severe wins" for mixed presentations
//! - The CHOA five-level plagiocephaly scale
//! - Measurement history and evolution for trend charts and reports
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core business types and the classification pipeline
//! - `ports`: Trait definitions for external operations
//! - `adapters`: Concrete implementations (in-memory store, log sanitizer)
//! - `application`: Use cases orchestrating domain and ports
//! - `config`: Environment-driven settings

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

pub use application::{Assessment, AssessmentService, HistoryService};
pub use domain::{
    compute_indices, generate_diagnosis, CranialDiagnosis, DiagnosisType, Measurement,
    SeverityLevel,
};

/// Result type for Craniotrack operations
pub type Result<T> = std::result::Result<T, CraniotrackError>;

/// Main error type for Craniotrack
#[derive(Debug, thiserror::Error)]
pub enum CraniotrackError {
    #[error("Invalid input: {0}")]
    Validation(#[from] domain::ValidationError),

    #[error("Storage operation failed: {0}")]
    Store(#[from] adapters::StoreError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
