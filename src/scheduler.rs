//! Daily batch scheduler.
//!
//! Once a day, at the configured hour, the daemon materializes the
//! transactions due from recurring definitions and sweeps rows past
//! their retention window. Per-definition failures stay contained in
//! the generator and surface through its summary; database errors abort
//! the loop so the daemon restarts as a whole.

use anyhow::Result;
use chrono::{Duration, NaiveTime, Utc};
use sea_orm::DatabaseConnection;
use tracing::{info, warn};

use crate::config::Settings;

/// Runs the daily batch loop until the process is stopped.
pub async fn run(db: &DatabaseConnection, settings: &Settings) -> Result<()> {
    info!(hour = settings.scheduler_hour, "Scheduler started");

    loop {
        let pause = until_next_run(settings.scheduler_hour);
        info!(seconds = pause.as_secs(), "Next batch scheduled");
        tokio::time::sleep(pause).await;
        run_batch(db, settings).await?;
    }
}

/// One scheduled batch: recurring generation first, then the purge.
pub async fn run_batch(db: &DatabaseConnection, settings: &Settings) -> Result<()> {
    let today = Utc::now().date_naive();
    let generated = engine::recurring::generate_due(db, today).await?;
    info!("{}", generated);
    for failure in &generated.failures {
        warn!(
            "Definition {} failed: {}",
            failure.definition_id, failure.message
        );
    }

    let cutoff = Utc::now() - Duration::days(settings.retention_days);
    let purged = engine::purge::purge(db, cutoff).await?;
    info!("{}", purged);

    Ok(())
}

/// Time left until the next run at `hour` (UTC). A run scheduled for
/// this exact instant counts as already taken and waits a full day.
fn until_next_run(hour: u32) -> std::time::Duration {
    let now = Utc::now();
    let at = NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or(NaiveTime::MIN);
    let mut next = now.date_naive().and_time(at).and_utc();
    if next <= now {
        next += Duration::days(1);
    }
    (next - now).to_std().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::time::Duration as StdDuration;

    use chrono::{Datelike, NaiveDate};
    use migration::{Migrator, MigratorTrait};
    use model::entities::transaction::TransactionKind;
    use model::entities::{account, currency, recurring_transaction, transaction};
    use rust_decimal::Decimal;
    use sea_orm::{ActiveModelTrait, ConnectionTrait, Database, EntityTrait, Set};

    use super::*;

    fn test_settings() -> Settings {
        Settings {
            database_url: "sqlite::memory:".to_string(),
            worker_count: 1,
            poll_interval: StdDuration::from_secs(1),
            stale_after: StdDuration::from_secs(600),
            scheduler_hour: 0,
            retention_days: 90,
        }
    }

    async fn setup_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.execute_unprepared("PRAGMA foreign_keys = ON;")
            .await
            .unwrap();
        Migrator::up(&db, None).await.unwrap();
        db
    }

    #[test]
    fn test_until_next_run_stays_within_a_day() {
        for hour in [0, 12, 23] {
            let pause = until_next_run(hour);
            assert!(pause <= StdDuration::from_secs(24 * 3600));
        }
    }

    #[tokio::test]
    async fn test_batch_generates_due_recurring_transactions() {
        let db = setup_db().await;
        let currency = currency::ActiveModel {
            code: Set("USD".to_string()),
            name: Set("US Dollar".to_string()),
            decimal_places: Set(2),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();
        let account = account::ActiveModel {
            name: Set("Checking".to_string()),
            group_id: Set(None),
            currency_id: Set(currency.id),
            is_asset: Set(false),
            is_archived: Set(false),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();

        // Monthly definition anchored long enough ago that at least one
        // occurrence is due whatever today happens to be.
        let today = Utc::now().date_naive();
        let start = NaiveDate::from_ymd_opt(today.year() - 1, 1, 1).unwrap();
        recurring_transaction::ActiveModel {
            account_id: Set(account.id),
            kind: Set(TransactionKind::Expense),
            amount: Set(Decimal::new(1000, 2)),
            description: Set("Rent".to_string()),
            notes: Set(None),
            category_id: Set(None),
            reference_date: Set(None),
            start_date: Set(start),
            end_date: Set(None),
            recurrence_unit: Set(recurring_transaction::RecurrenceUnit::Month),
            recurrence_interval: Set(1),
            max_occurrences: Set(Some(3)),
            is_paused: Set(false),
            last_generated_date: Set(None),
            add_description_to_transaction: Set(true),
            add_notes_to_transaction: Set(true),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();

        run_batch(&db, &test_settings()).await.unwrap();

        let generated = transaction::Entity::find().all(&db).await.unwrap();
        assert_eq!(generated.len(), 3);
        assert!(generated.iter().all(|tx| tx.description == "Rent"));

        // A second batch on the same day creates nothing new, and the
        // purge leaves fresh rows alone.
        run_batch(&db, &test_settings()).await.unwrap();
        assert_eq!(transaction::Entity::find().all(&db).await.unwrap().len(), 3);
    }
}
