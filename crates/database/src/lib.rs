//! SQLite persistence layer for the diabetes logbook.
//!
//! This crate provides async store operations for accounts and log entries
//! using SQLx with SQLite. One reading is kept per account, calendar date,
//! and time slot; saving again for the same triple updates in place.
//!
//! # Example
//!
//! ```no_run
//! use database::{account, models::NewAccount, Database};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:logbook.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     // Register an account
//!     let account = account::create_account(
//!         db.pool(),
//!         &NewAccount {
//!             name: "Jane Doe".to_string(),
//!             email: "jane@example.com".to_string(),
//!             password: "hunter2".to_string(),
//!             ..Default::default()
//!         },
//!     )
//!     .await?;
//!     println!("created account {}", account.id);
//!
//!     Ok(())
//! }
//! ```

pub mod account;
pub mod error;
pub mod log_entry;
pub mod models;
pub mod validation;

pub use error::{DatabaseError, Result};
pub use models::{Account, LogEntry, LogbookStyle, NewAccount, NewLogEntry, TimeSlot};
pub use validation::ValidationError;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Database connection wrapper.
///
/// Owned by the application's composition root and passed by reference to
/// the stores; initialization and migration are explicit calls, not
/// first-access side effects.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Default pool size for database connections.
    /// A single-user desktop logbook needs only a handful of connections.
    const DEFAULT_POOL_SIZE: u32 = 4;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `?mode=rwc` to create the database file if it doesn't exist.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example() -> database::Result<()> {
    /// // File database
    /// let db = database::Database::connect("sqlite:data/logbook.db?mode=rwc").await?;
    ///
    /// // In-memory database (for testing)
    /// let db = database::Database::connect("sqlite::memory:").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!("Connected to database: {} (pool size: {})", url, pool_size);

        Ok(Self { pool })
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is
    /// up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Cheap liveness check, for startup health verification.
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
