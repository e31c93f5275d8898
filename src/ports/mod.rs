//! Ports layer: Trait definitions for external operations.
//!
//! Following Hexagonal Architecture, these traits define the boundary
//! between the application and the external relational store.

mod storage;

pub use storage::{MeasurementPage, MeasurementRecord, MeasurementStore};
