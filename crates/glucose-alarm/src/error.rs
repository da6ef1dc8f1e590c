//! Error types for alarm delivery.

use thiserror::Error;

/// Errors a notification sink can report.
///
/// Evaluation itself never fails; only delivery can, and the evaluator
/// logs and drops those failures.
#[derive(Debug, Error)]
pub enum AlarmError {
    /// Handing the notification to the outward channel failed.
    #[error("delivery failed: {0}")]
    Delivery(String),
}
