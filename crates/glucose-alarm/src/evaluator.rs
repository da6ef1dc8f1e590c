//! Alarm evaluation for freshly saved readings.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use database::models::{Account, LogEntry, TimeSlot};

use crate::sink::{AlarmNotification, NotificationSink};

/// Safe-range low bound, mmol/L.
pub const LOW_THRESHOLD: f64 = 3.9;

/// High bound for fasting (pre-meal) readings, mmol/L.
pub const FASTING_HIGH_THRESHOLD: f64 = 7.0;

/// High bound for post-meal and bedtime readings, mmol/L.
pub const POST_MEAL_HIGH_THRESHOLD: f64 = 11.0;

/// Classification of a blood-glucose value against the safe range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GlucoseRange {
    InRange,
    Low,
    High,
}

/// Classify a mmol/L value for the given slot.
///
/// Pre-meal slots are held to the fasting bound; post-meal and bedtime
/// readings to the higher post-meal bound. Strictly below the low bound is
/// Low, strictly above the applicable high bound is High.
pub fn classify(value: f64, slot: TimeSlot) -> GlucoseRange {
    let high = if slot.is_pre_meal() {
        FASTING_HIGH_THRESHOLD
    } else {
        POST_MEAL_HIGH_THRESHOLD
    };

    if value < LOW_THRESHOLD {
        GlucoseRange::Low
    } else if value > high {
        GlucoseRange::High
    } else {
        GlucoseRange::InRange
    }
}

/// Decides, for a freshly saved reading, whether to raise a glucose alarm.
///
/// Holds the set of already-fired (account, date, slot) keys, so each
/// combination alarms at most once until [`reset`](AlarmEvaluator::reset).
/// An explicit constructed object: build one per process at the
/// composition root, or a fresh one per test.
pub struct AlarmEvaluator<S: NotificationSink> {
    sink: S,
    /// Keys of combinations already notified.
    notified: RwLock<HashSet<String>>,
}

impl<S: NotificationSink> AlarmEvaluator<S> {
    /// Create an evaluator with an empty fired set.
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            notified: RwLock::new(HashSet::new()),
        }
    }

    /// Access the sink (e.g. to drain a buffering
    /// [`MemorySink`](crate::MemorySink)).
    pub fn sink(&self) -> &S {
        &self.sink
    }

    fn dedup_key(account: &Account, entry: &LogEntry) -> String {
        format!(
            "{}_{}_{}",
            account.name,
            entry.date,
            entry.time_slot.as_str()
        )
    }

    /// Evaluate a stored reading against the safe range.
    ///
    /// Side effect only: notifies the sink at most once per account, day,
    /// and slot. Never fails; delivery problems are logged and dropped so
    /// a save can never be rolled back by its alarm.
    pub async fn evaluate(&self, entry: &LogEntry, account: &Account) {
        let value = match entry.blood_sugar {
            Some(v) => v,
            None => return,
        };

        let range = classify(value, entry.time_slot);
        if range == GlucoseRange::InRange {
            return;
        }

        // Without a name there is no one to notify under; skip rather
        // than record a key for a blank identity.
        if account.name.trim().is_empty() {
            debug!(
                "out-of-range reading for unnamed account {}; skipping alarm",
                account.id
            );
            return;
        }

        let key = Self::dedup_key(account, entry);
        if !self.notified.write().await.insert(key) {
            debug!(
                "alarm already raised for {} at {} on {}",
                account.name,
                entry.time_slot.as_str(),
                entry.date
            );
            return;
        }

        let alert = AlarmNotification {
            account_name: account.name.clone(),
            time_slot: entry.time_slot,
            date: entry.date,
            value,
            range,
            doctor_email: account.doctor_email.clone(),
        };

        if let Err(err) = self.sink.notify(&alert).await {
            warn!(
                "failed to deliver glucose alarm for {}: {}",
                account.name, err
            );
        }
    }

    /// Forget all fired alarms, re-arming every slot.
    pub async fn reset(&self) {
        self.notified.write().await.clear();
    }

    /// Number of distinct alarms fired since construction or the last
    /// reset.
    pub async fn fired_count(&self) -> usize {
        self.notified.read().await.len()
    }
}
