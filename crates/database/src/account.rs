//! Account store over the `user` table.

use sqlx::SqlitePool;
use tracing::warn;

use crate::error::{DatabaseError, Result};
use crate::models::{Account, NewAccount};

const ACCOUNT_COLUMNS: &str = "id, name, diabetesType, insulinType, insulinAdmin, email, phone, \
     doctorName, doctorEmail, doctorAddress, doctorEmergencyPhone, logbookType, password";

/// Create a new account and return it with its generated id.
///
/// Fails with [`DatabaseError::AlreadyExists`] when the email is already
/// registered; the UNIQUE column makes the check and the insert one
/// operation.
pub async fn create_account(pool: &SqlitePool, account: &NewAccount) -> Result<Account> {
    let result = sqlx::query(
        r#"
        INSERT INTO user (name, diabetesType, insulinType, insulinAdmin, email, phone,
                          doctorName, doctorEmail, doctorAddress, doctorEmergencyPhone,
                          logbookType, password)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&account.name)
    .bind(&account.diabetes_type)
    .bind(&account.insulin_type)
    .bind(&account.insulin_admin)
    .bind(&account.email)
    .bind(&account.phone)
    .bind(&account.doctor_name)
    .bind(&account.doctor_email)
    .bind(&account.doctor_address)
    .bind(&account.doctor_emergency_phone)
    .bind(account.logbook_style.as_str())
    .bind(&account.password)
    .execute(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return DatabaseError::AlreadyExists {
                    entity: "Account",
                    id: account.email.clone(),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })?;

    Ok(account.clone().with_id(result.last_insert_rowid()))
}

/// Look up an account by email. Zero matches is `Ok(None)`.
pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<Account>> {
    let account = sqlx::query_as::<_, Account>(&format!(
        "SELECT {ACCOUNT_COLUMNS} FROM user WHERE email = ?"
    ))
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(account)
}

/// Get an account by id.
pub async fn get_account(pool: &SqlitePool, id: i64) -> Result<Account> {
    sqlx::query_as::<_, Account>(&format!("SELECT {ACCOUNT_COLUMNS} FROM user WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound {
            entity: "Account",
            id: id.to_string(),
        })
}

/// Replace all mutable fields of the account identified by `account.id`.
///
/// An id with no matching row is logged and treated as a no-op; callers
/// must not assume the row changed.
pub async fn update_account(pool: &SqlitePool, account: &Account) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE user
        SET name = ?, diabetesType = ?, insulinType = ?, insulinAdmin = ?, email = ?,
            phone = ?, doctorName = ?, doctorEmail = ?, doctorAddress = ?,
            doctorEmergencyPhone = ?, logbookType = ?, password = ?
        WHERE id = ?
        "#,
    )
    .bind(&account.name)
    .bind(&account.diabetes_type)
    .bind(&account.insulin_type)
    .bind(&account.insulin_admin)
    .bind(&account.email)
    .bind(&account.phone)
    .bind(&account.doctor_name)
    .bind(&account.doctor_email)
    .bind(&account.doctor_address)
    .bind(&account.doctor_emergency_phone)
    .bind(account.logbook_style.as_str())
    .bind(&account.password)
    .bind(account.id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        warn!("update for account {} matched no rows", account.id);
    }

    Ok(())
}

/// Delete an account. Its log entries go with it (ON DELETE CASCADE).
pub async fn delete_account(pool: &SqlitePool, id: i64) -> Result<()> {
    let result = sqlx::query("DELETE FROM user WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Account",
            id: id.to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LogbookStyle;
    use crate::Database;

    async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    fn sample_account(email: &str) -> NewAccount {
        NewAccount {
            name: "John Doe".to_string(),
            diabetes_type: Some("Type 1".to_string()),
            insulin_type: Some("Rapid-acting".to_string()),
            insulin_admin: Some("Pen".to_string()),
            email: email.to_string(),
            phone: Some("+1 555 0100".to_string()),
            doctor_name: Some("Dr. Patel".to_string()),
            doctor_email: Some("dr.patel@example.com".to_string()),
            doctor_address: Some("12 Clinic Road".to_string()),
            doctor_emergency_phone: Some("+1 555 0199".to_string()),
            logbook_style: LogbookStyle::Comprehensive,
            password: "hunter2".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_ids() {
        let db = test_db().await;

        let a = create_account(db.pool(), &sample_account("a@example.com"))
            .await
            .unwrap();
        let b = create_account(db.pool(), &sample_account("b@example.com"))
            .await
            .unwrap();

        assert!(a.id > 0);
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let db = test_db().await;

        create_account(db.pool(), &sample_account("a@example.com"))
            .await
            .unwrap();

        let mut duplicate = sample_account("a@example.com");
        duplicate.name = "Impostor".to_string();
        let result = create_account(db.pool(), &duplicate).await;
        assert!(matches!(
            result,
            Err(DatabaseError::AlreadyExists { entity: "Account", .. })
        ));

        // The stored record is untouched.
        let stored = find_by_email(db.pool(), "a@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.name, "John Doe");
    }

    #[tokio::test]
    async fn test_find_by_email_round_trips_all_fields() {
        let db = test_db().await;

        let draft = sample_account("jane@example.com");
        let created = create_account(db.pool(), &draft).await.unwrap();
        let fetched = find_by_email(db.pool(), "jane@example.com")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(fetched, created);
        assert_eq!(fetched, draft.with_id(created.id));
    }

    #[tokio::test]
    async fn test_find_by_email_missing_is_none() {
        let db = test_db().await;
        let found = find_by_email(db.pool(), "nobody@example.com").await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_update_replaces_fields() {
        let db = test_db().await;

        let mut account = create_account(db.pool(), &sample_account("a@example.com"))
            .await
            .unwrap();
        account.phone = Some("+1 555 0177".to_string());
        account.logbook_style = LogbookStyle::Intensive;
        update_account(db.pool(), &account).await.unwrap();

        let fetched = get_account(db.pool(), account.id).await.unwrap();
        assert_eq!(fetched, account);
    }

    #[tokio::test]
    async fn test_update_missing_id_is_noop() {
        let db = test_db().await;

        let phantom = sample_account("ghost@example.com").with_id(4242);
        update_account(db.pool(), &phantom).await.unwrap();

        assert!(find_by_email(db.pool(), "ghost@example.com")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_delete_account() {
        let db = test_db().await;

        let account = create_account(db.pool(), &sample_account("a@example.com"))
            .await
            .unwrap();
        delete_account(db.pool(), account.id).await.unwrap();

        let result = get_account(db.pool(), account.id).await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));

        let result = delete_account(db.pool(), account.id).await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }
}
