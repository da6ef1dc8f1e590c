//! The log service the presentation screens call.

use std::env;

use chrono::NaiveDate;
use tracing::info;

use database::models::{Account, LogEntry, NewAccount, NewLogEntry};
use database::{account, log_entry, validation, Database, ValidationError};
use glucose_alarm::{AlarmEvaluator, NotificationSink};

use crate::error::ServiceError;

/// Environment variable naming the SQLite database location.
pub const DATABASE_URL_VAR: &str = "LOGBOOK_DATABASE_URL";

/// Fallback database URL when the environment does not name one.
pub const DEFAULT_DATABASE_URL: &str = "sqlite:logbook.db?mode=rwc";

/// Orchestrates the stores and the glucose alarm behind the UI screens.
///
/// The service owns the storage handle and the alarm evaluator; screens
/// hold a reference and call the entry points below. Writes validate
/// before touching storage; alarm evaluation runs after every stored
/// reading and is best effort.
pub struct LogbookService<S: NotificationSink> {
    db: Database,
    alarm: AlarmEvaluator<S>,
}

impl<S: NotificationSink> LogbookService<S> {
    /// Wire a service from an already connected database and evaluator.
    pub fn new(db: Database, alarm: AlarmEvaluator<S>) -> Self {
        Self { db, alarm }
    }

    /// Connect to `url`, run migrations, verify liveness, and wire the
    /// service with a fresh evaluator around `sink`.
    pub async fn open(url: &str, sink: S) -> Result<Self, ServiceError> {
        let db = Database::connect(url).await?;
        db.migrate().await?;
        db.ping().await?;
        Ok(Self::new(db, AlarmEvaluator::new(sink)))
    }

    /// Like [`open`](Self::open), with the URL taken from
    /// `LOGBOOK_DATABASE_URL` (default `sqlite:logbook.db?mode=rwc`).
    pub async fn from_env(sink: S) -> Result<Self, ServiceError> {
        let url = env::var(DATABASE_URL_VAR).unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        Self::open(&url, sink).await
    }

    /// The underlying storage handle.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// The alarm evaluator (e.g. to drain a buffering sink).
    pub fn alarm(&self) -> &AlarmEvaluator<S> {
        &self.alarm
    }

    fn validate_profile(
        name: &str,
        email: &str,
        phone: Option<&str>,
        doctor_email: Option<&str>,
    ) -> Result<(), ValidationError> {
        validation::validate_required("name", name, validation::MAX_NAME_LENGTH)?;
        validation::validate_email(email)?;
        if let Some(phone) = phone {
            validation::validate_phone(phone)?;
        }
        if let Some(doctor_email) = doctor_email {
            validation::validate_email(doctor_email)?;
        }
        Ok(())
    }

    /// Register a new account.
    ///
    /// Name, email, and password are required; phone and doctor email are
    /// validated when present. A duplicate email is a distinguishable
    /// failure (see [`ServiceError::is_duplicate_email`]).
    pub async fn create_account(&self, draft: NewAccount) -> Result<Account, ServiceError> {
        Self::validate_profile(
            &draft.name,
            &draft.email,
            draft.phone.as_deref(),
            draft.doctor_email.as_deref(),
        )?;
        validation::validate_password(&draft.password)?;

        let created = account::create_account(self.db.pool(), &draft).await?;
        info!("registered account {} ({})", created.id, created.email);
        Ok(created)
    }

    /// Look up an account by email. Zero matches is `Ok(None)`.
    pub async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, ServiceError> {
        Ok(account::find_by_email(self.db.pool(), email).await?)
    }

    /// Update an account's profile, re-validating the mutable fields.
    ///
    /// An id with no matching row stays a logged no-op.
    pub async fn update_account(&self, account: &Account) -> Result<(), ServiceError> {
        Self::validate_profile(
            &account.name,
            &account.email,
            account.phone.as_deref(),
            account.doctor_email.as_deref(),
        )?;
        validation::validate_password(&account.password)?;

        account::update_account(self.db.pool(), account).await?;
        Ok(())
    }

    /// Store a reading, then run alarm evaluation on the stored row.
    ///
    /// Storage failures propagate; alarm evaluation is best effort and can
    /// never fail the save.
    pub async fn record_reading(
        &self,
        reading: NewLogEntry,
        account: &Account,
    ) -> Result<LogEntry, ServiceError> {
        let stored = log_entry::upsert_entry(self.db.pool(), &reading).await?;
        self.alarm.evaluate(&stored, account).await;
        Ok(stored)
    }

    /// All readings for one calendar day, in slot-label order.
    pub async fn entries_for_date(
        &self,
        account_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<LogEntry>, ServiceError> {
        Ok(log_entry::entries_for_date(self.db.pool(), account_id, date).await?)
    }

    /// All readings between `from` and `to` inclusive, for the calendar
    /// and trend-graph views.
    pub async fn entries_for_range(
        &self,
        account_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<LogEntry>, ServiceError> {
        Ok(log_entry::entries_for_range(self.db.pool(), account_id, from, to).await?)
    }

    /// Re-arm every fired alarm slot.
    pub async fn reset_alarms(&self) {
        self.alarm.reset().await;
    }
}
