//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with ports to implement
//! the core use cases of the application.

mod assessment;
mod history;

pub use assessment::{Assessment, AssessmentService};
pub use history::{Evolution, HistoryService, TimelineEntry, Trend, CVAI_TREND_TOLERANCE};
