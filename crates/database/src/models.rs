//! Database models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

/// Fixed daily time slot for a reading.
///
/// The labels match the logbook screens. "Bedtime" has no Pre/Post split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeSlot {
    #[serde(rename = "Breakfast Pre")]
    BreakfastPre,
    #[serde(rename = "Breakfast Post")]
    BreakfastPost,
    #[serde(rename = "Lunch Pre")]
    LunchPre,
    #[serde(rename = "Lunch Post")]
    LunchPost,
    #[serde(rename = "Dinner Pre")]
    DinnerPre,
    #[serde(rename = "Dinner Post")]
    DinnerPost,
    #[serde(rename = "Bedtime")]
    Bedtime,
}

impl TimeSlot {
    /// All slots in meal order (storage order is label order, see
    /// [`crate::log_entry::entries_for_date`]).
    pub const ALL: [TimeSlot; 7] = [
        TimeSlot::BreakfastPre,
        TimeSlot::BreakfastPost,
        TimeSlot::LunchPre,
        TimeSlot::LunchPost,
        TimeSlot::DinnerPre,
        TimeSlot::DinnerPost,
        TimeSlot::Bedtime,
    ];

    /// The label stored in the `timeOfDay` column.
    pub fn as_str(self) -> &'static str {
        match self {
            TimeSlot::BreakfastPre => "Breakfast Pre",
            TimeSlot::BreakfastPost => "Breakfast Post",
            TimeSlot::LunchPre => "Lunch Pre",
            TimeSlot::LunchPost => "Lunch Post",
            TimeSlot::DinnerPre => "Dinner Pre",
            TimeSlot::DinnerPost => "Dinner Post",
            TimeSlot::Bedtime => "Bedtime",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Breakfast Pre" => Some(TimeSlot::BreakfastPre),
            "Breakfast Post" => Some(TimeSlot::BreakfastPost),
            "Lunch Pre" => Some(TimeSlot::LunchPre),
            "Lunch Post" => Some(TimeSlot::LunchPost),
            "Dinner Pre" => Some(TimeSlot::DinnerPre),
            "Dinner Post" => Some(TimeSlot::DinnerPost),
            "Bedtime" => Some(TimeSlot::Bedtime),
            _ => None,
        }
    }

    /// Pre-meal slots are held to the fasting glucose threshold.
    pub fn is_pre_meal(self) -> bool {
        matches!(
            self,
            TimeSlot::BreakfastPre | TimeSlot::LunchPre | TimeSlot::DinnerPre
        )
    }
}

/// Logbook style preference for an account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogbookStyle {
    #[default]
    Simple,
    Comprehensive,
    Intensive,
}

impl LogbookStyle {
    /// The value stored in the `logbookType` column.
    pub fn as_str(self) -> &'static str {
        match self {
            LogbookStyle::Simple => "Simple",
            LogbookStyle::Comprehensive => "Comprehensive",
            LogbookStyle::Intensive => "Intensive",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Simple" => Some(LogbookStyle::Simple),
            "Comprehensive" => Some(LogbookStyle::Comprehensive),
            "Intensive" => Some(LogbookStyle::Intensive),
            _ => None,
        }
    }
}

/// A registered user with their doctor's contact details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Generated identifier, immutable once assigned.
    pub id: i64,
    /// Display name. Required at registration; also part of the alarm
    /// de-duplication key.
    pub name: String,
    /// Diabetes type as free text (e.g. "Type 1").
    pub diabetes_type: Option<String>,
    /// Insulin type as free text.
    pub insulin_type: Option<String>,
    /// Insulin administration method as free text.
    pub insulin_admin: Option<String>,
    /// Unique login email.
    pub email: String,
    pub phone: Option<String>,
    pub doctor_name: Option<String>,
    /// Escalation target for glucose alarms.
    pub doctor_email: Option<String>,
    pub doctor_address: Option<String>,
    pub doctor_emergency_phone: Option<String>,
    pub logbook_style: LogbookStyle,
    /// Stored as given. See DESIGN.md for the hashing caveat.
    pub password: String,
}

/// Draft for [`Account`] creation, before an id is assigned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAccount {
    pub name: String,
    pub diabetes_type: Option<String>,
    pub insulin_type: Option<String>,
    pub insulin_admin: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub doctor_name: Option<String>,
    pub doctor_email: Option<String>,
    pub doctor_address: Option<String>,
    pub doctor_emergency_phone: Option<String>,
    pub logbook_style: LogbookStyle,
    pub password: String,
}

impl NewAccount {
    /// Promote the draft to a stored [`Account`] with its generated id.
    pub fn with_id(self, id: i64) -> Account {
        Account {
            id,
            name: self.name,
            diabetes_type: self.diabetes_type,
            insulin_type: self.insulin_type,
            insulin_admin: self.insulin_admin,
            email: self.email,
            phone: self.phone,
            doctor_name: self.doctor_name,
            doctor_email: self.doctor_email,
            doctor_address: self.doctor_address,
            doctor_emergency_phone: self.doctor_emergency_phone,
            logbook_style: self.logbook_style,
            password: self.password,
        }
    }
}

impl<'r> FromRow<'r, SqliteRow> for Account {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let style: Option<String> = row.try_get("logbookType")?;
        let logbook_style = match style {
            Some(ref s) => LogbookStyle::from_str(s).ok_or_else(|| decode_error("logbookType", s))?,
            None => LogbookStyle::default(),
        };

        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get::<Option<String>, _>("name")?.unwrap_or_default(),
            diabetes_type: row.try_get("diabetesType")?,
            insulin_type: row.try_get("insulinType")?,
            insulin_admin: row.try_get("insulinAdmin")?,
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
            doctor_name: row.try_get("doctorName")?,
            doctor_email: row.try_get("doctorEmail")?,
            doctor_address: row.try_get("doctorAddress")?,
            doctor_emergency_phone: row.try_get("doctorEmergencyPhone")?,
            logbook_style,
            password: row.try_get("password")?,
        })
    }
}

/// One measurement set for an account, calendar date, and time slot.
///
/// At most one row exists per (user_id, date, time_slot); saving again for
/// the same triple updates in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: i64,
    pub user_id: i64,
    pub date: NaiveDate,
    pub time_slot: TimeSlot,
    /// Blood glucose in mmol/L.
    pub blood_sugar: Option<f64>,
    /// Carbohydrates eaten, grams.
    pub carbs_eaten: Option<f64>,
    /// Hours since the last meal; meaningful for pre-meal slots only.
    pub hours_since_meal: Option<i64>,
    pub food_details: Option<String>,
    pub exercise_type: Option<String>,
    /// Exercise duration, minutes.
    pub exercise_duration: Option<i64>,
    /// Insulin dose, units.
    pub insulin_dose: Option<f64>,
    pub other_medications: Option<String>,
}

/// Draft for a [`LogEntry`] upsert, before an id is known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLogEntry {
    pub user_id: i64,
    pub date: NaiveDate,
    pub time_slot: TimeSlot,
    pub blood_sugar: Option<f64>,
    pub carbs_eaten: Option<f64>,
    pub hours_since_meal: Option<i64>,
    pub food_details: Option<String>,
    pub exercise_type: Option<String>,
    pub exercise_duration: Option<i64>,
    pub insulin_dose: Option<f64>,
    pub other_medications: Option<String>,
}

impl NewLogEntry {
    /// An empty draft for the given slot; fill in whichever measurements
    /// the screen collected.
    pub fn for_slot(user_id: i64, date: NaiveDate, time_slot: TimeSlot) -> Self {
        Self {
            user_id,
            date,
            time_slot,
            blood_sugar: None,
            carbs_eaten: None,
            hours_since_meal: None,
            food_details: None,
            exercise_type: None,
            exercise_duration: None,
            insulin_dose: None,
            other_medications: None,
        }
    }
}

impl<'r> FromRow<'r, SqliteRow> for LogEntry {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let slot: String = row.try_get("timeOfDay")?;
        let time_slot =
            TimeSlot::from_str(&slot).ok_or_else(|| decode_error("timeOfDay", &slot))?;

        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("userId")?,
            date: row.try_get("date")?,
            time_slot,
            blood_sugar: row.try_get("bloodSugar")?,
            carbs_eaten: row.try_get("carbsEaten")?,
            hours_since_meal: row.try_get("hoursSinceMeal")?,
            food_details: row.try_get("foodDetails")?,
            exercise_type: row.try_get("exerciseType")?,
            exercise_duration: row.try_get("exerciseDuration")?,
            insulin_dose: row.try_get("insulinDose")?,
            other_medications: row.try_get("otherMedications")?,
        })
    }
}

fn decode_error(column: &str, value: &str) -> sqlx::Error {
    sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: format!("unrecognized value '{value}'").into(),
    }
}
