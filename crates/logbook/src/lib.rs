//! Service layer coordinating the logbook stores and glucose alarms.
//!
//! This crate provides the [`LogbookService`] type which sits between the
//! presentation screens and the persistence/alarm layers. Screens collect
//! field values and call the service; everything else (layout, painting,
//! navigation, input masking) lives entirely in that outer layer.
//!
//! # Architecture
//!
//! ```text
//! Screen save (field values from the UI)
//!          ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     LOGBOOK SERVICE                         │
//! │                                                             │
//! │  1. Validate input (specific failure values for the UI)     │
//! │         ↓                                                   │
//! │  2. Write through the store:                                │
//! │     • accounts → user table (unique email)                  │
//! │     • readings → logentry table (one row per                │
//! │       account/date/slot, conflict-handling upsert)          │
//! │         ↓                                                   │
//! │  3. Run alarm evaluation on the stored reading              │
//! │     (best effort; can never fail the save)                  │
//! │         ↓                                                   │
//! │  4. Out-of-range and not yet fired today? → notification    │
//! │     sink (doctor contact attached as escalation target)     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use database::models::{NewAccount, NewLogEntry, TimeSlot};
//! use glucose_alarm::LoggingSink;
//! use logbook::LogbookService;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let service = LogbookService::open("sqlite:logbook.db?mode=rwc", LoggingSink).await?;
//!
//!     let account = service
//!         .create_account(NewAccount {
//!             name: "Jane Doe".to_string(),
//!             email: "jane@example.com".to_string(),
//!             password: "hunter2".to_string(),
//!             ..Default::default()
//!         })
//!         .await?;
//!
//!     let mut reading = NewLogEntry::for_slot(
//!         account.id,
//!         chrono::Local::now().date_naive(),
//!         TimeSlot::BreakfastPre,
//!     );
//!     reading.blood_sugar = Some(5.6);
//!     service.record_reading(reading, &account).await?;
//!
//!     Ok(())
//! }
//! ```

mod error;
mod service;

// Public exports
pub use error::ServiceError;
pub use service::{LogbookService, DATABASE_URL_VAR, DEFAULT_DATABASE_URL};

// Re-export commonly used types from dependencies
pub use database::models::{Account, LogEntry, LogbookStyle, NewAccount, NewLogEntry, TimeSlot};
pub use database::{Database, DatabaseError, ValidationError};
pub use glucose_alarm::{
    AlarmEvaluator, AlarmNotification, GlucoseRange, LoggingSink, MemorySink, NoOpSink,
    NotificationSink,
};
