use std::time::Duration;

use anyhow::Result;
use sea_orm::{Database, DatabaseConnection};

/// Runtime settings drawn from the environment.
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    /// How many queue workers the daemon runs concurrently.
    pub worker_count: usize,
    /// How long a worker sleeps when the queue is empty.
    pub poll_interval: Duration,
    /// Age after which a running claim counts as abandoned.
    pub stale_after: Duration,
    /// Hour of day (UTC) the daily generation and purge batch runs at.
    pub scheduler_hour: u32,
    /// How many days soft-deleted transactions and finished events are
    /// kept before the purge removes them.
    pub retention_days: i64,
}

impl Settings {
    /// Loads settings from the environment, with `.env` support.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://finflow.db".to_string()),
            worker_count: env_u64("WORKER_COUNT", 2).max(1) as usize,
            poll_interval: Duration::from_secs(env_u64("WORKER_POLL_SECONDS", 5)),
            stale_after: Duration::from_secs(env_u64("WORKER_STALE_SECONDS", 600)),
            scheduler_hour: env_u64("SCHEDULER_HOUR", 0).min(23) as u32,
            retention_days: env_u64("RETENTION_DAYS", 90) as i64,
        }
    }
}

fn env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

/// Connects to the configured database.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection> {
    tracing::info!("Connecting to database: {}", database_url);
    let db = Database::connect(database_url).await?;
    Ok(db)
}
