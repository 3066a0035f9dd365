//! Transaction write path.
//!
//! Two entry points with one deliberate difference: external writes (user
//! actions, the recurring generator, the installment splitter) enqueue a
//! transaction event for the rule worker, internal writes performed by
//! rule actions do not. The queue is the only re-entrancy boundary, which
//! is what keeps rule-induced mutations from spawning further rule passes.
//!
//! Every write normalizes the row the same way: amounts are non-negative
//! and truncated to the account currency's precision, and the reference
//! date is clamped to the first day of its month.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::{debug, instrument};

use model::entities::queued_event::EventKind;
use model::entities::transaction::TransactionKind;
use model::entities::{
    account, currency, entity, tag, transaction, transaction_entity, transaction_tag,
};

use crate::error::{EngineError, Result};
use crate::queue;
use crate::snapshot::snapshot_transaction;

/// Field bundle accepted by the write path. Relation sets are given as id
/// lists and replace whatever the row currently carries.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    pub account_id: i32,
    pub kind: TransactionKind,
    pub is_paid: bool,
    pub date: NaiveDate,
    /// Month bucket; `None` derives it from `date`. Clamped to the first
    /// day of its month either way.
    pub reference_date: Option<NaiveDate>,
    pub amount: Decimal,
    pub description: String,
    pub notes: Option<String>,
    pub category_id: Option<i32>,
    pub installment_plan_id: Option<i32>,
    pub installment_number: Option<i32>,
    pub recurring_transaction_id: Option<i32>,
    pub internal_note: Option<String>,
    pub internal_id: Option<String>,
    pub tag_ids: Vec<i32>,
    pub entity_ids: Vec<i32>,
}

impl TransactionDraft {
    pub fn new(
        account_id: i32,
        kind: TransactionKind,
        date: NaiveDate,
        amount: Decimal,
        description: impl Into<String>,
    ) -> Self {
        Self {
            account_id,
            kind,
            is_paid: true,
            date,
            reference_date: None,
            amount,
            description: description.into(),
            notes: None,
            category_id: None,
            installment_plan_id: None,
            installment_number: None,
            recurring_transaction_id: None,
            internal_note: None,
            internal_id: None,
            tag_ids: Vec::new(),
            entity_ids: Vec::new(),
        }
    }

    /// Rebuilds the draft an existing row would have been written from,
    /// relation sets included. This is what rule actions mutate before
    /// persisting through [`update_internal`].
    pub async fn from_transaction<C: ConnectionTrait>(
        db: &C,
        tx: &transaction::Model,
    ) -> Result<Self> {
        let tag_ids = tx
            .find_related(tag::Entity)
            .order_by_asc(tag::Column::Id)
            .all(db)
            .await?
            .into_iter()
            .map(|tag| tag.id)
            .collect();
        let entity_ids = tx
            .find_related(entity::Entity)
            .order_by_asc(entity::Column::Id)
            .all(db)
            .await?
            .into_iter()
            .map(|entity| entity.id)
            .collect();

        Ok(Self {
            account_id: tx.account_id,
            kind: tx.kind,
            is_paid: tx.is_paid,
            date: tx.date,
            reference_date: Some(tx.reference_date),
            amount: tx.amount,
            description: tx.description.clone(),
            notes: tx.notes.clone(),
            category_id: tx.category_id,
            installment_plan_id: tx.installment_plan_id,
            installment_number: tx.installment_number,
            recurring_transaction_id: tx.recurring_transaction_id,
            internal_note: tx.internal_note.clone(),
            internal_id: tx.internal_id.clone(),
            tag_ids,
            entity_ids,
        })
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap()
}

fn resolved_reference_date(draft: &TransactionDraft) -> NaiveDate {
    first_of_month(draft.reference_date.unwrap_or(draft.date))
}

/// Validates the draft's account reference and returns the amount
/// truncated to the account currency's precision.
async fn normalized_amount<C: ConnectionTrait>(
    db: &C,
    draft: &TransactionDraft,
) -> Result<Decimal> {
    if draft.amount < Decimal::ZERO {
        return Err(EngineError::Validation(format!(
            "amount must not be negative, got {}",
            draft.amount
        )));
    }

    let account = account::Entity::find_by_id(draft.account_id)
        .one(db)
        .await?
        .ok_or_else(|| {
            EngineError::Validation(format!("account {} does not exist", draft.account_id))
        })?;
    let currency = currency::Entity::find_by_id(account.currency_id)
        .one(db)
        .await?
        .ok_or_else(|| {
            EngineError::NotFound(format!("currency {} does not exist", account.currency_id))
        })?;

    Ok(currency.truncate(draft.amount))
}

async fn set_tags<C: ConnectionTrait>(db: &C, transaction_id: i32, tag_ids: &[i32]) -> Result<()> {
    transaction_tag::Entity::delete_many()
        .filter(transaction_tag::Column::TransactionId.eq(transaction_id))
        .exec(db)
        .await?;
    // The join table's composite key makes this a set; duplicates collapse.
    for tag_id in tag_ids.iter().copied().collect::<BTreeSet<_>>() {
        transaction_tag::ActiveModel {
            transaction_id: Set(transaction_id),
            tag_id: Set(tag_id),
        }
        .insert(db)
        .await?;
    }
    Ok(())
}

async fn set_entities<C: ConnectionTrait>(
    db: &C,
    transaction_id: i32,
    entity_ids: &[i32],
) -> Result<()> {
    transaction_entity::Entity::delete_many()
        .filter(transaction_entity::Column::TransactionId.eq(transaction_id))
        .exec(db)
        .await?;
    for entity_id in entity_ids.iter().copied().collect::<BTreeSet<_>>() {
        transaction_entity::ActiveModel {
            transaction_id: Set(transaction_id),
            entity_id: Set(entity_id),
        }
        .insert(db)
        .await?;
    }
    Ok(())
}

/// Inserts a transaction without queueing an event. Rule actions create
/// through here; everything else goes through [`create`].
pub(crate) async fn create_internal<C: ConnectionTrait>(
    db: &C,
    draft: TransactionDraft,
) -> Result<transaction::Model> {
    let amount = normalized_amount(db, &draft).await?;
    let reference_date = resolved_reference_date(&draft);
    let TransactionDraft {
        account_id,
        kind,
        is_paid,
        date,
        reference_date: _,
        amount: _,
        description,
        notes,
        category_id,
        installment_plan_id,
        installment_number,
        recurring_transaction_id,
        internal_note,
        internal_id,
        tag_ids,
        entity_ids,
    } = draft;

    let created = transaction::ActiveModel {
        account_id: Set(account_id),
        kind: Set(kind),
        is_paid: Set(is_paid),
        date: Set(date),
        reference_date: Set(reference_date),
        amount: Set(amount),
        description: Set(description),
        notes: Set(notes),
        category_id: Set(category_id),
        installment_plan_id: Set(installment_plan_id),
        installment_number: Set(installment_number),
        recurring_transaction_id: Set(recurring_transaction_id),
        internal_note: Set(internal_note),
        internal_id: Set(internal_id),
        deleted: Set(false),
        deleted_at: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await?;

    set_tags(db, created.id, &tag_ids).await?;
    set_entities(db, created.id, &entity_ids).await?;
    debug!(transaction_id = created.id, "created transaction");
    Ok(created)
}

/// Rewrites a transaction's user-editable fields from the draft without
/// queueing an event.
pub(crate) async fn update_internal<C: ConnectionTrait>(
    db: &C,
    tx: &transaction::Model,
    draft: TransactionDraft,
) -> Result<transaction::Model> {
    let amount = normalized_amount(db, &draft).await?;
    let reference_date = resolved_reference_date(&draft);

    let mut active: transaction::ActiveModel = tx.clone().into();
    active.account_id = Set(draft.account_id);
    active.kind = Set(draft.kind);
    active.is_paid = Set(draft.is_paid);
    active.date = Set(draft.date);
    active.reference_date = Set(reference_date);
    active.amount = Set(amount);
    active.description = Set(draft.description.clone());
    active.notes = Set(draft.notes.clone());
    active.category_id = Set(draft.category_id);
    active.internal_note = Set(draft.internal_note.clone());
    active.internal_id = Set(draft.internal_id.clone());
    let updated = active.update(db).await?;

    set_tags(db, updated.id, &draft.tag_ids).await?;
    set_entities(db, updated.id, &draft.entity_ids).await?;
    debug!(transaction_id = updated.id, "updated transaction");
    Ok(updated)
}

/// Creates a transaction and queues its created event, atomically.
#[instrument(skip(db, draft))]
pub async fn create<C>(db: &C, draft: TransactionDraft) -> Result<transaction::Model>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;
    let created = create_internal(&txn, draft).await?;
    let snapshot = snapshot_transaction(&txn, &created).await?;
    queue::enqueue(&txn, EventKind::Created, created.id, &snapshot).await?;
    txn.commit().await?;
    Ok(created)
}

/// Updates a transaction and queues its updated event, atomically.
#[instrument(skip(db, tx, draft))]
pub async fn update<C>(
    db: &C,
    tx: &transaction::Model,
    draft: TransactionDraft,
) -> Result<transaction::Model>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;
    let updated = update_internal(&txn, tx, draft).await?;
    let snapshot = snapshot_transaction(&txn, &updated).await?;
    queue::enqueue(&txn, EventKind::Updated, updated.id, &snapshot).await?;
    txn.commit().await?;
    Ok(updated)
}

/// Flags a transaction as deleted and queues an updated event whose
/// snapshot carries the deleted flag. The row itself stays until the purge
/// job reaps it. Already-deleted rows are left untouched.
#[instrument(skip(db, tx))]
pub async fn soft_delete<C>(db: &C, tx: transaction::Model) -> Result<transaction::Model>
where
    C: ConnectionTrait + TransactionTrait,
{
    if tx.deleted {
        return Ok(tx);
    }

    let txn = db.begin().await?;
    let mut active: transaction::ActiveModel = tx.into();
    active.deleted = Set(true);
    active.deleted_at = Set(Some(Utc::now()));
    let deleted = active.update(&txn).await?;
    let snapshot = snapshot_transaction(&txn, &deleted).await?;
    queue::enqueue(&txn, EventKind::Updated, deleted.id, &snapshot).await?;
    txn.commit().await?;

    debug!(transaction_id = deleted.id, "soft-deleted transaction");
    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use common::Snapshot;
    use model::entities::queued_event;
    use std::str::FromStr;

    async fn all_events(db: &sea_orm::DatabaseConnection) -> Vec<queued_event::Model> {
        queued_event::Entity::find()
            .order_by_asc(queued_event::Column::Id)
            .all(db)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_normalizes_and_enqueues() {
        let db = setup_db().await.unwrap();
        let currency = new_currency(&db, 2).await.unwrap();
        let account = new_account(&db, &currency).await.unwrap();

        let draft = TransactionDraft::new(
            account.id,
            TransactionKind::Expense,
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            Decimal::from_str("10.999").unwrap(),
            "Groceries",
        );
        let created = create(&db, draft).await.unwrap();

        // Truncated, not rounded, and bucketed to the month start.
        assert_eq!(created.amount, Decimal::from_str("10.99").unwrap());
        assert_eq!(
            created.reference_date,
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );

        let events = all_events(&db).await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EventKind::Created);
        assert_eq!(events[0].transaction_id, created.id);
        let snapshot: Snapshot = serde_json::from_value(events[0].snapshot.clone()).unwrap();
        assert_eq!(
            snapshot.get("description").and_then(|v| v.as_str()),
            Some("Groceries")
        );
    }

    #[tokio::test]
    async fn test_internal_writes_do_not_enqueue() {
        let db = setup_db().await.unwrap();
        let currency = new_currency(&db, 2).await.unwrap();
        let account = new_account(&db, &currency).await.unwrap();

        let draft = TransactionDraft::new(
            account.id,
            TransactionKind::Expense,
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            Decimal::from_str("5.00").unwrap(),
            "Rule-created",
        );
        let created = create_internal(&db, draft).await.unwrap();

        let mut edit = TransactionDraft::from_transaction(&db, &created).await.unwrap();
        edit.description = "Rule-edited".to_string();
        update_internal(&db, &created, edit).await.unwrap();

        assert!(all_events(&db).await.is_empty());
    }

    #[tokio::test]
    async fn test_negative_amount_is_rejected() {
        let db = setup_db().await.unwrap();
        let currency = new_currency(&db, 2).await.unwrap();
        let account = new_account(&db, &currency).await.unwrap();

        let draft = TransactionDraft::new(
            account.id,
            TransactionKind::Expense,
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            Decimal::from_str("-1.00").unwrap(),
            "Bad",
        );
        let err = create(&db, draft).await.unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)), "{err}");
        assert!(all_events(&db).await.is_empty());
    }

    #[tokio::test]
    async fn test_update_replaces_relation_sets() {
        let db = setup_db().await.unwrap();
        let currency = new_currency(&db, 2).await.unwrap();
        let account = new_account(&db, &currency).await.unwrap();
        let media = new_tag(&db, "media").await.unwrap();
        let home = new_tag(&db, "home").await.unwrap();

        let mut draft = TransactionDraft::new(
            account.id,
            TransactionKind::Expense,
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            Decimal::from_str("9.99").unwrap(),
            "Netflix Monthly",
        );
        draft.tag_ids = vec![media.id];
        let created = create(&db, draft).await.unwrap();

        let mut edit = TransactionDraft::from_transaction(&db, &created).await.unwrap();
        assert_eq!(edit.tag_ids, vec![media.id]);
        edit.tag_ids = vec![home.id];
        let updated = update(&db, &created, edit).await.unwrap();

        let tags = updated.find_related(tag::Entity).all(&db).await.unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].id, home.id);

        let events = all_events(&db).await;
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].kind, EventKind::Updated);
    }

    #[tokio::test]
    async fn test_soft_delete_flags_row_and_enqueues_once() {
        let db = setup_db().await.unwrap();
        let currency = new_currency(&db, 2).await.unwrap();
        let account = new_account(&db, &currency).await.unwrap();

        let draft = TransactionDraft::new(
            account.id,
            TransactionKind::Expense,
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            Decimal::from_str("4.50").unwrap(),
            "Coffee",
        );
        let created = create(&db, draft).await.unwrap();

        let deleted = soft_delete(&db, created).await.unwrap();
        assert!(deleted.deleted);
        assert!(deleted.deleted_at.is_some());

        let events = all_events(&db).await;
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].kind, EventKind::Updated);
        let snapshot: Snapshot = serde_json::from_value(events[1].snapshot.clone()).unwrap();
        assert_eq!(snapshot.get("deleted").and_then(|v| v.as_bool()), Some(true));

        // Deleting again is a no-op.
        soft_delete(&db, deleted).await.unwrap();
        assert_eq!(all_events(&db).await.len(), 2);
    }
}
