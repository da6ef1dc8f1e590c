//! Log-entry store over the `logentry` table.

use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::{LogEntry, NewLogEntry, TimeSlot};

const ENTRY_COLUMNS: &str = "id, userId, date, timeOfDay, bloodSugar, carbsEaten, hoursSinceMeal, \
     foodDetails, exerciseType, exerciseDuration, insulinDose, otherMedications";

/// Insert or update the reading for (user, date, slot), returning the
/// stored row.
///
/// A second save for the same triple replaces every measurement field in
/// place and keeps the original id. The write is a single statement, so
/// there is no window in which two rows for one triple can exist.
pub async fn upsert_entry(pool: &SqlitePool, entry: &NewLogEntry) -> Result<LogEntry> {
    sqlx::query(
        r#"
        INSERT INTO logentry (userId, date, timeOfDay, bloodSugar, carbsEaten, hoursSinceMeal,
                              foodDetails, exerciseType, exerciseDuration, insulinDose,
                              otherMedications)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(userId, date, timeOfDay) DO UPDATE SET
            bloodSugar = excluded.bloodSugar,
            carbsEaten = excluded.carbsEaten,
            hoursSinceMeal = excluded.hoursSinceMeal,
            foodDetails = excluded.foodDetails,
            exerciseType = excluded.exerciseType,
            exerciseDuration = excluded.exerciseDuration,
            insulinDose = excluded.insulinDose,
            otherMedications = excluded.otherMedications
        "#,
    )
    .bind(entry.user_id)
    .bind(entry.date)
    .bind(entry.time_slot.as_str())
    .bind(entry.blood_sugar)
    .bind(entry.carbs_eaten)
    .bind(entry.hours_since_meal)
    .bind(&entry.food_details)
    .bind(&entry.exercise_type)
    .bind(entry.exercise_duration)
    .bind(entry.insulin_dose)
    .bind(&entry.other_medications)
    .execute(pool)
    .await?;

    get_entry(pool, entry.user_id, entry.date, entry.time_slot)
        .await?
        .ok_or_else(|| DatabaseError::NotFound {
            entity: "LogEntry",
            id: format!("{}/{}/{}", entry.user_id, entry.date, entry.time_slot.as_str()),
        })
}

/// Look up the reading for (user, date, slot), if any.
pub async fn get_entry(
    pool: &SqlitePool,
    user_id: i64,
    date: NaiveDate,
    time_slot: TimeSlot,
) -> Result<Option<LogEntry>> {
    let entry = sqlx::query_as::<_, LogEntry>(&format!(
        "SELECT {ENTRY_COLUMNS} FROM logentry WHERE userId = ? AND date = ? AND timeOfDay = ?"
    ))
    .bind(user_id)
    .bind(date)
    .bind(time_slot.as_str())
    .fetch_optional(pool)
    .await?;

    Ok(entry)
}

/// All readings for one calendar day.
///
/// Ordered by the stored slot label under BINARY collation, so "Bedtime"
/// sorts before "Breakfast Pre" and "Post" before "Pre" within a meal.
/// The day view relies on this exact order.
pub async fn entries_for_date(
    pool: &SqlitePool,
    user_id: i64,
    date: NaiveDate,
) -> Result<Vec<LogEntry>> {
    let entries = sqlx::query_as::<_, LogEntry>(&format!(
        "SELECT {ENTRY_COLUMNS} FROM logentry WHERE userId = ? AND date = ? ORDER BY timeOfDay ASC"
    ))
    .bind(user_id)
    .bind(date)
    .fetch_all(pool)
    .await?;

    Ok(entries)
}

/// All readings between `from` and `to` inclusive, for the calendar and
/// trend-graph views. Ordered by date, then slot label.
pub async fn entries_for_range(
    pool: &SqlitePool,
    user_id: i64,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<LogEntry>> {
    let entries = sqlx::query_as::<_, LogEntry>(&format!(
        "SELECT {ENTRY_COLUMNS} FROM logentry \
         WHERE userId = ? AND date >= ? AND date <= ? \
         ORDER BY date ASC, timeOfDay ASC"
    ))
    .bind(user_id)
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account;
    use crate::models::NewAccount;
    use crate::Database;

    async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    async fn test_account(db: &Database) -> i64 {
        let account = account::create_account(
            db.pool(),
            &NewAccount {
                name: "John Doe".to_string(),
                email: "john@example.com".to_string(),
                password: "hunter2".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        account.id
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_upsert_inserts_then_updates_in_place() {
        let db = test_db().await;
        let user_id = test_account(&db).await;
        let day = date(2024, 3, 11);

        let mut draft = NewLogEntry::for_slot(user_id, day, TimeSlot::BreakfastPre);
        draft.blood_sugar = Some(5.6);
        draft.hours_since_meal = Some(9);
        let first = upsert_entry(db.pool(), &draft).await.unwrap();

        draft.blood_sugar = Some(6.2);
        draft.food_details = Some("toast".to_string());
        let second = upsert_entry(db.pool(), &draft).await.unwrap();

        assert_eq!(second.id, first.id);
        assert_eq!(second.blood_sugar, Some(6.2));
        assert_eq!(second.food_details.as_deref(), Some("toast"));

        let stored = entries_for_date(db.pool(), user_id, day).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0], second);
    }

    #[tokio::test]
    async fn test_entries_for_date_label_order() {
        let db = test_db().await;
        let user_id = test_account(&db).await;
        let day = date(2024, 3, 11);

        for slot in [TimeSlot::BreakfastPre, TimeSlot::Bedtime, TimeSlot::LunchPost] {
            let mut draft = NewLogEntry::for_slot(user_id, day, slot);
            draft.blood_sugar = Some(5.0);
            upsert_entry(db.pool(), &draft).await.unwrap();
        }

        let stored = entries_for_date(db.pool(), user_id, day).await.unwrap();
        let slots: Vec<TimeSlot> = stored.iter().map(|e| e.time_slot).collect();
        assert_eq!(
            slots,
            vec![TimeSlot::Bedtime, TimeSlot::BreakfastPre, TimeSlot::LunchPost]
        );
    }

    #[tokio::test]
    async fn test_entries_for_date_other_days_excluded() {
        let db = test_db().await;
        let user_id = test_account(&db).await;

        let mut draft = NewLogEntry::for_slot(user_id, date(2024, 3, 11), TimeSlot::DinnerPre);
        draft.blood_sugar = Some(4.8);
        upsert_entry(db.pool(), &draft).await.unwrap();

        let stored = entries_for_date(db.pool(), user_id, date(2024, 3, 12))
            .await
            .unwrap();
        assert!(stored.is_empty());
    }

    #[tokio::test]
    async fn test_entries_for_range_spans_days_in_order() {
        let db = test_db().await;
        let user_id = test_account(&db).await;

        for (day, slot) in [
            (date(2024, 3, 12), TimeSlot::BreakfastPre),
            (date(2024, 3, 10), TimeSlot::Bedtime),
            (date(2024, 3, 11), TimeSlot::LunchPre),
            (date(2024, 3, 20), TimeSlot::DinnerPre),
        ] {
            let mut draft = NewLogEntry::for_slot(user_id, day, slot);
            draft.blood_sugar = Some(5.5);
            upsert_entry(db.pool(), &draft).await.unwrap();
        }

        let stored = entries_for_range(db.pool(), user_id, date(2024, 3, 10), date(2024, 3, 12))
            .await
            .unwrap();
        let days: Vec<NaiveDate> = stored.iter().map(|e| e.date).collect();
        assert_eq!(
            days,
            vec![date(2024, 3, 10), date(2024, 3, 11), date(2024, 3, 12)]
        );
    }

    #[tokio::test]
    async fn test_get_entry_missing_is_none() {
        let db = test_db().await;
        let user_id = test_account(&db).await;

        let entry = get_entry(db.pool(), user_id, date(2024, 3, 11), TimeSlot::Bedtime)
            .await
            .unwrap();
        assert!(entry.is_none());
    }

    #[tokio::test]
    async fn test_deleting_account_cascades_to_entries() {
        let db = test_db().await;
        let user_id = test_account(&db).await;
        let day = date(2024, 3, 11);

        let mut draft = NewLogEntry::for_slot(user_id, day, TimeSlot::BreakfastPost);
        draft.blood_sugar = Some(9.1);
        upsert_entry(db.pool(), &draft).await.unwrap();

        account::delete_account(db.pool(), user_id).await.unwrap();

        let stored = entries_for_date(db.pool(), user_id, day).await.unwrap();
        assert!(stored.is_empty());
    }
}
