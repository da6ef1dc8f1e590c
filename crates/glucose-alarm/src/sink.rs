//! Notification sink trait and implementations.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::warn;

use database::models::TimeSlot;

use crate::error::AlarmError;
use crate::evaluator::GlucoseRange;

/// One out-of-range reading, addressed to whoever can act on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlarmNotification {
    pub account_name: String,
    pub time_slot: TimeSlot,
    pub date: NaiveDate,
    /// Measured value, mmol/L.
    pub value: f64,
    /// Which side of the safe range the value fell on.
    pub range: GlucoseRange,
    /// Escalation target; `None` when the profile has no doctor on file.
    pub doctor_email: Option<String>,
}

/// Trait for delivering glucose alarms.
///
/// Abstracted to support different channels (log output, an in-app banner
/// queue, a future email/SMS integration, tests). The evaluator decides
/// *whether* and *once*; the sink owns actual delivery.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Deliver one alarm. Called at most once per account, day, and slot.
    async fn notify(&self, alert: &AlarmNotification) -> Result<(), AlarmError>;
}

/// A no-op sink that discards all alarms.
#[derive(Debug, Clone, Default)]
pub struct NoOpSink;

#[async_trait]
impl NotificationSink for NoOpSink {
    async fn notify(&self, _alert: &AlarmNotification) -> Result<(), AlarmError> {
        Ok(())
    }
}

/// A logging sink standing in for an email/SMS integration.
#[derive(Debug, Clone, Default)]
pub struct LoggingSink;

#[async_trait]
impl NotificationSink for LoggingSink {
    async fn notify(&self, alert: &AlarmNotification) -> Result<(), AlarmError> {
        match alert.doctor_email.as_deref() {
            Some(doctor) => warn!(
                "glucose alarm: {} read {:.1} mmol/L ({:?}) at {} on {}; escalation contact {}",
                alert.account_name,
                alert.value,
                alert.range,
                alert.time_slot.as_str(),
                alert.date,
                doctor
            ),
            None => warn!(
                "glucose alarm: {} read {:.1} mmol/L ({:?}) at {} on {}; no doctor on file",
                alert.account_name,
                alert.value,
                alert.range,
                alert.time_slot.as_str(),
                alert.date
            ),
        }
        Ok(())
    }
}

/// A sink that buffers alarms in memory for the UI to drain (alarm banners,
/// the range indicator widget) and for tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    alerts: Mutex<Vec<AlarmNotification>>,
}

impl MemorySink {
    /// Create a new empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take all buffered alarms, oldest first, leaving the buffer empty.
    pub async fn drain(&self) -> Vec<AlarmNotification> {
        std::mem::take(&mut *self.alerts.lock().await)
    }

    /// Number of buffered alarms.
    pub async fn len(&self) -> usize {
        self.alerts.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.alerts.lock().await.is_empty()
    }
}

#[async_trait]
impl NotificationSink for MemorySink {
    async fn notify(&self, alert: &AlarmNotification) -> Result<(), AlarmError> {
        self.alerts.lock().await.push(alert.clone());
        Ok(())
    }
}
