//! Queue worker pool.
//!
//! Each worker claims one event at a time, runs it through the rule
//! engine, and settles it: done on success, dropped when its transaction
//! no longer exists, or pushed back with a delay on failure. A sweep
//! returns claims abandoned by crashed workers to the queue before each
//! poll. Claims go through a guarded status update, so cloned connections
//! into the same pool never run one event twice.

use anyhow::Result;
use chrono::{Duration, Utc};
use sea_orm::DatabaseConnection;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use engine::{queue, rules, EngineError};
use model::entities::queued_event;

use crate::config::Settings;

/// Runs `settings.worker_count` workers until the process is stopped.
/// The first database error takes the whole pool down.
pub async fn run(db: &DatabaseConnection, settings: &Settings) -> Result<()> {
    let mut workers = JoinSet::new();
    for worker_id in 0..settings.worker_count {
        let db = db.clone();
        let settings = settings.clone();
        workers.spawn(async move { run_one(worker_id, &db, &settings).await });
    }

    while let Some(outcome) = workers.join_next().await {
        outcome??;
    }
    Ok(())
}

async fn run_one(worker_id: usize, db: &DatabaseConnection, settings: &Settings) -> Result<()> {
    let stale_after = Duration::from_std(settings.stale_after)?;
    info!(worker_id, "Worker started");

    loop {
        let now = Utc::now();
        let released = queue::release_stale(db, now, stale_after).await?;
        if released > 0 {
            warn!(worker_id, released, "Returned stale claims to the queue");
        }

        match queue::claim_next(db, now).await? {
            Some(event) => settle(db, event).await?,
            None => tokio::time::sleep(settings.poll_interval).await,
        }
    }
}

/// Claims and settles everything currently due, then returns how many
/// events were handled.
pub async fn drain(db: &DatabaseConnection) -> Result<usize> {
    let mut processed = 0;
    while let Some(event) = queue::claim_next(db, Utc::now()).await? {
        settle(db, event).await?;
        processed += 1;
    }
    Ok(processed)
}

async fn settle(db: &DatabaseConnection, event: queued_event::Model) -> Result<()> {
    match rules::process_event(db, &event).await {
        Ok(()) => {
            debug!(event_id = event.id, "Event processed");
            queue::complete(db, event).await?;
        }
        Err(EngineError::NotFound(reason)) => {
            // The transaction is gone; retrying can never succeed.
            warn!(event_id = event.id, %reason, "Dropping event");
            queue::complete(db, event).await?;
        }
        Err(error) => {
            warn!(event_id = event.id, %error, "Event failed, scheduling retry");
            queue::retry_later(db, event, Utc::now(), &error.to_string()).await?;
        }
    }
    Ok(())
}
