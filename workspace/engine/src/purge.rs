//! Retention sweep.
//!
//! Soft-deleted transactions and terminal queue events accumulate until
//! this job removes the ones older than the caller's cutoff. Live
//! transactions and unfinished events are never touched.

use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use tracing::{info, instrument};

use common::PurgeRunSummary;
use model::entities::queued_event::{self, EventStatus};
use model::entities::transaction;

use crate::error::Result;

/// Hard-deletes transactions soft-deleted before `cutoff` and queue
/// events that reached a terminal status before it.
#[instrument(skip(db))]
pub async fn purge<C: ConnectionTrait>(db: &C, cutoff: DateTime<Utc>) -> Result<PurgeRunSummary> {
    let transactions_purged = transaction::Entity::delete_many()
        .filter(transaction::Column::Deleted.eq(true))
        .filter(transaction::Column::DeletedAt.lt(cutoff))
        .exec(db)
        .await?
        .rows_affected;

    let events_purged = queued_event::Entity::delete_many()
        .filter(queued_event::Column::Status.is_in([EventStatus::Done, EventStatus::Failed]))
        .filter(queued_event::Column::CreatedAt.lt(cutoff))
        .exec(db)
        .await?
        .rows_affected;

    let summary = PurgeRunSummary {
        cutoff,
        transactions_purged,
        events_purged,
    };
    info!(%summary, "purge finished");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use sea_orm::{ActiveModelTrait, IntoActiveModel, Set};

    use super::*;
    use crate::testing::*;
    use crate::writer;

    #[tokio::test]
    async fn test_only_old_soft_deleted_transactions_are_reaped() {
        let db = setup_db().await.unwrap();
        let currency = new_currency(&db, 2).await.unwrap();
        let account = new_account(&db, &currency).await.unwrap();

        let old = new_transaction(&db, &account, 1000, "Old and deleted").await.unwrap();
        let old = writer::soft_delete(&db, old).await.unwrap();
        let recent = new_transaction(&db, &account, 2000, "Recently deleted").await.unwrap();
        let recent = writer::soft_delete(&db, recent).await.unwrap();
        let live = new_transaction(&db, &account, 3000, "Still live").await.unwrap();

        let now = Utc::now();
        let mut active = old.into_active_model();
        active.deleted_at = Set(Some(now - Duration::days(60)));
        active.update(&db).await.unwrap();

        let summary = purge(&db, now - Duration::days(30)).await.unwrap();
        assert_eq!(summary.transactions_purged, 1);

        let remaining = transaction::Entity::find().all(&db).await.unwrap();
        let remaining_ids: Vec<i32> = remaining.iter().map(|tx| tx.id).collect();
        assert!(remaining_ids.contains(&recent.id));
        assert!(remaining_ids.contains(&live.id));
        assert_eq!(remaining.len(), 2);
    }

    #[tokio::test]
    async fn test_live_transactions_survive_any_cutoff() {
        let db = setup_db().await.unwrap();
        let currency = new_currency(&db, 2).await.unwrap();
        let account = new_account(&db, &currency).await.unwrap();
        new_transaction(&db, &account, 1000, "Ancient but live").await.unwrap();

        let summary = purge(&db, Utc::now() + Duration::days(3650)).await.unwrap();
        assert_eq!(summary.transactions_purged, 0);
        assert_eq!(transaction::Entity::find().all(&db).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_terminal_events_are_swept_and_pending_ones_kept() {
        let db = setup_db().await.unwrap();
        let currency = new_currency(&db, 2).await.unwrap();
        let account = new_account(&db, &currency).await.unwrap();
        let tx = new_transaction(&db, &account, 1000, "Queued").await.unwrap();
        let snapshot = crate::snapshot::snapshot_transaction(&db, &tx).await.unwrap();

        let now = Utc::now();
        let done = crate::queue::enqueue(
            &db,
            queued_event::EventKind::Created,
            tx.id,
            &snapshot,
        )
        .await
        .unwrap();
        let mut active = done.into_active_model();
        active.status = Set(EventStatus::Done);
        active.created_at = Set(now - Duration::days(90));
        active.update(&db).await.unwrap();

        let failed = crate::queue::enqueue(
            &db,
            queued_event::EventKind::Updated,
            tx.id,
            &snapshot,
        )
        .await
        .unwrap();
        let mut active = failed.into_active_model();
        active.status = Set(EventStatus::Failed);
        active.created_at = Set(now - Duration::days(90));
        active.update(&db).await.unwrap();

        // Pending, even if ancient, stays claimable.
        let pending = crate::queue::enqueue(
            &db,
            queued_event::EventKind::Updated,
            tx.id,
            &snapshot,
        )
        .await
        .unwrap();
        let mut active = pending.into_active_model();
        active.created_at = Set(now - Duration::days(90));
        active.update(&db).await.unwrap();

        let summary = purge(&db, now - Duration::days(30)).await.unwrap();
        assert_eq!(summary.events_purged, 2);

        let remaining = queued_event::Entity::find().all(&db).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].status, EventStatus::Pending);
    }
}
