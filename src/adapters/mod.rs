//! Adapters layer: Concrete implementations of ports.
//!
//! - `memory`: in-process `MeasurementStore`
//! - `sanitize`: PII filtering for logs

pub mod memory;
pub mod sanitize;

// Re-export store error for lib.rs
pub use memory::StoreError;
