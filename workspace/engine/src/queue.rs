//! At-least-once work queue for transaction events.
//!
//! The external write path appends one event per create or update; worker
//! processes claim events with an optimistic status flip, so several
//! workers can share the table without double-processing. A claim that is
//! never completed is returned to the pool by the stale sweep, which is
//! where the at-least-once part comes from: consumers must tolerate
//! re-delivery.

use chrono::{DateTime, Duration, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::{debug, instrument, warn};

use common::Snapshot;
use model::entities::queued_event::{self, EventKind, EventStatus};

use crate::error::{EngineError, Result};

/// Delivery attempts after which an event is parked as failed instead of
/// rescheduled.
pub const MAX_ATTEMPTS: i32 = 5;

const BASE_RETRY_SECONDS: i64 = 30;
const MAX_RETRY_SECONDS: i64 = 3600;

/// Delay before the next delivery attempt: doubles per attempt, capped at
/// an hour.
fn backoff_delay(attempts: i32) -> Duration {
    let exponent = attempts.saturating_sub(1).clamp(0, 31) as u32;
    let seconds = BASE_RETRY_SECONDS
        .saturating_mul(1_i64 << exponent)
        .min(MAX_RETRY_SECONDS);
    Duration::seconds(seconds)
}

/// Appends a pending event carrying the transaction's snapshot at write
/// time. Runs on the caller's connection, so inside a database transaction
/// the event becomes visible only if the write commits.
pub async fn enqueue<C: ConnectionTrait>(
    db: &C,
    kind: EventKind,
    transaction_id: i32,
    snapshot: &Snapshot,
) -> Result<queued_event::Model> {
    let now = Utc::now();
    let payload = serde_json::to_value(snapshot)
        .map_err(|e| EngineError::Validation(format!("snapshot not serializable: {}", e)))?;

    let event = queued_event::ActiveModel {
        kind: Set(kind),
        transaction_id: Set(transaction_id),
        snapshot: Set(payload),
        status: Set(EventStatus::Pending),
        attempts: Set(0),
        available_at: Set(now),
        created_at: Set(now),
        last_error: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await?;

    debug!(event_id = event.id, transaction_id, "enqueued transaction event");
    Ok(event)
}

/// Claims the oldest pending event available at `now`, if any.
///
/// The claim is an optimistic update filtered on the pending status;
/// losing the race to another worker just moves on to the next candidate.
/// `available_at` is reset to the claim instant so it doubles as the claim
/// timestamp for [`release_stale`].
#[instrument(skip(db))]
pub async fn claim_next<C: ConnectionTrait>(
    db: &C,
    now: DateTime<Utc>,
) -> Result<Option<queued_event::Model>> {
    loop {
        let candidate = queued_event::Entity::find()
            .filter(queued_event::Column::Status.eq(EventStatus::Pending))
            .filter(queued_event::Column::AvailableAt.lte(now))
            .order_by_asc(queued_event::Column::Id)
            .one(db)
            .await?;

        let Some(candidate) = candidate else {
            return Ok(None);
        };

        let claimed = queued_event::Entity::update_many()
            .set(queued_event::ActiveModel {
                status: Set(EventStatus::Running),
                available_at: Set(now),
                ..Default::default()
            })
            .col_expr(
                queued_event::Column::Attempts,
                Expr::col(queued_event::Column::Attempts).add(1),
            )
            .filter(queued_event::Column::Id.eq(candidate.id))
            .filter(queued_event::Column::Status.eq(EventStatus::Pending))
            .exec(db)
            .await?;

        if claimed.rows_affected == 1 {
            if let Some(event) = queued_event::Entity::find_by_id(candidate.id).one(db).await? {
                debug!(event_id = event.id, attempts = event.attempts, "claimed event");
                return Ok(Some(event));
            }
        }
        // Another worker took this one; try the next candidate.
    }
}

/// Marks a claimed event as processed.
pub async fn complete<C: ConnectionTrait>(db: &C, event: queued_event::Model) -> Result<()> {
    let mut active: queued_event::ActiveModel = event.into();
    active.status = Set(EventStatus::Done);
    active.update(db).await?;
    Ok(())
}

/// Reschedules a claimed event after a failed attempt, or parks it as
/// failed once the attempt budget is spent. Returns the status the event
/// ended up in.
pub async fn retry_later<C: ConnectionTrait>(
    db: &C,
    event: queued_event::Model,
    now: DateTime<Utc>,
    error: &str,
) -> Result<EventStatus> {
    let status = if event.attempts >= MAX_ATTEMPTS {
        EventStatus::Failed
    } else {
        EventStatus::Pending
    };

    let event_id = event.id;
    let attempts = event.attempts;
    let mut active: queued_event::ActiveModel = event.into();
    active.status = Set(status);
    active.last_error = Set(Some(error.to_string()));
    if status == EventStatus::Pending {
        active.available_at = Set(now + backoff_delay(attempts));
    }
    active.update(db).await?;

    if status == EventStatus::Failed {
        warn!(event_id, attempts, error, "event failed permanently");
    } else {
        debug!(event_id, attempts, error, "event rescheduled");
    }
    Ok(status)
}

/// Returns events stuck in the running state to the pending pool, covering
/// workers that died mid-claim. Returns how many were released.
pub async fn release_stale<C: ConnectionTrait>(
    db: &C,
    now: DateTime<Utc>,
    stale_after: Duration,
) -> Result<u64> {
    let released = queued_event::Entity::update_many()
        .set(queued_event::ActiveModel {
            status: Set(EventStatus::Pending),
            ..Default::default()
        })
        .filter(queued_event::Column::Status.eq(EventStatus::Running))
        .filter(queued_event::Column::AvailableAt.lte(now - stale_after))
        .exec(db)
        .await?;

    if released.rows_affected > 0 {
        warn!(count = released.rows_affected, "released stale running events");
    }
    Ok(released.rows_affected)
}
