//! End-to-end logbook demo.
//!
//! This example registers (or re-uses) an account, saves a day's readings,
//! and prints the stored day back — the same calls a screen would make.
//!
//! Run with: cargo run -p logbook --example logbook_demo
//!
//! Configuration via .env file or environment variables:
//!   LOGBOOK_DATABASE_URL - SQLite URL (default: sqlite:logbook.db?mode=rwc)

use chrono::Local;
use logbook::{LogbookService, LoggingSink, NewAccount, NewLogEntry, TimeSlot};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("logbook=info".parse().unwrap())
                .add_directive("glucose_alarm=debug".parse().unwrap())
                .add_directive("database=info".parse().unwrap()),
        )
        .init();

    let url = std::env::var(logbook::DATABASE_URL_VAR)
        .unwrap_or_else(|_| logbook::DEFAULT_DATABASE_URL.to_string());
    let service = LogbookService::from_env(LoggingSink).await?;
    println!("Logbook ready at {url}");

    // Register on the first run, pick up the profile afterwards.
    let account = match service.find_account_by_email("jane@example.com").await? {
        Some(existing) => {
            info!("found existing account {}", existing.id);
            existing
        }
        None => {
            service
                .create_account(NewAccount {
                    name: "Jane Doe".to_string(),
                    diabetes_type: Some("Type 1".to_string()),
                    email: "jane@example.com".to_string(),
                    phone: Some("+1 555 0100".to_string()),
                    doctor_name: Some("Dr. Patel".to_string()),
                    doctor_email: Some("dr.patel@example.com".to_string()),
                    password: "hunter2".to_string(),
                    ..Default::default()
                })
                .await?
        }
    };
    println!("Account #{}: {}", account.id, account.name);

    let today = Local::now().date_naive();

    // A fasting reading well below the safe range: raises the alarm once.
    let mut breakfast = NewLogEntry::for_slot(account.id, today, TimeSlot::BreakfastPre);
    breakfast.blood_sugar = Some(3.4);
    breakfast.hours_since_meal = Some(9);
    service.record_reading(breakfast, &account).await?;

    // A post-lunch reading in range: stored quietly.
    let mut lunch = NewLogEntry::for_slot(account.id, today, TimeSlot::LunchPost);
    lunch.blood_sugar = Some(6.8);
    lunch.carbs_eaten = Some(45.0);
    lunch.food_details = Some("pasta salad".to_string());
    lunch.insulin_dose = Some(4.0);
    service.record_reading(lunch, &account).await?;

    println!("\nReadings for {today}:");
    for entry in service.entries_for_date(account.id, today).await? {
        println!(
            "  {:<15} glucose {:>5} mmol/L  carbs {:>5} g  insulin {:>4} U",
            entry.time_slot.as_str(),
            entry
                .blood_sugar
                .map(|v| format!("{v:.1}"))
                .unwrap_or_else(|| "-".to_string()),
            entry
                .carbs_eaten
                .map(|v| format!("{v:.0}"))
                .unwrap_or_else(|| "-".to_string()),
            entry
                .insulin_dose
                .map(|v| format!("{v:.1}"))
                .unwrap_or_else(|| "-".to_string()),
        );
    }

    Ok(())
}
