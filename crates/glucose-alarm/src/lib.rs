//! Out-of-range blood glucose detection and alarm notification dispatch.
//!
//! This crate provides the [`AlarmEvaluator`] type which classifies freshly
//! stored readings against the safe range and pushes at most one
//! [`AlarmNotification`] per account, day, and time slot into a pluggable
//! [`NotificationSink`].
//!
//! # Architecture
//!
//! ```text
//! Saved reading (from the log service)
//!          ↓
//! ┌─────────────────────────────────────────────────────┐
//! │                 ALARM EVALUATOR                     │
//! │                                                     │
//! │  1. Classify value against mmol/L thresholds        │
//! │     (fasting bound for "Pre" slots)                 │
//! │         ↓                                           │
//! │  2. In range, or no value, or no account name?      │
//! │     → done, nothing to deliver                      │
//! │         ↓                                           │
//! │  3. Already fired for (account, date, slot)?        │
//! │     → done, one alarm per slot per day              │
//! │         ↓                                           │
//! │  4. Hand the notification to the sink               │
//! │     (best effort; failures are logged and dropped)  │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! All values are mmol/L; screens that collect mg/dL convert at the
//! boundary with [`units`].

mod error;
mod evaluator;
mod sink;
pub mod units;

pub use error::AlarmError;
pub use evaluator::{
    classify, AlarmEvaluator, GlucoseRange, FASTING_HIGH_THRESHOLD, LOW_THRESHOLD,
    POST_MEAL_HIGH_THRESHOLD,
};
pub use sink::{AlarmNotification, LoggingSink, MemorySink, NoOpSink, NotificationSink};
