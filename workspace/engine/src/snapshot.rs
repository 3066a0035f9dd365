use common::{Snapshot, Value};
use model::entities::prelude::*;
use model::entities::{account, category, entity, tag, transaction};
use sea_orm::{ConnectionTrait, EntityTrait, ModelTrait, QueryOrder};

use crate::error::{EngineError, Result};

/// Projects a transaction and its joined relations into the flat field
/// map rules evaluate against. The same map is serialized into queued
/// events, so rule logic only ever sees values frozen at projection
/// time.
///
/// Relation lists are ordered by id so repeated projections of the same
/// state produce identical snapshots.
pub async fn snapshot_transaction<C: ConnectionTrait>(
    db: &C,
    tx: &transaction::Model,
) -> Result<Snapshot> {
    let account = Account::find_by_id(tx.account_id)
        .one(db)
        .await?
        .ok_or_else(|| {
            EngineError::NotFound(format!(
                "transaction {} references missing account {}",
                tx.id, tx.account_id
            ))
        })?;

    let group = match account.group_id {
        Some(group_id) => AccountGroup::find_by_id(group_id).one(db).await?,
        None => None,
    };

    let category = match tx.category_id {
        Some(category_id) => Category::find_by_id(category_id).one(db).await?,
        None => None,
    };

    let tags: Vec<tag::Model> = tx
        .find_related(Tag)
        .order_by_asc(tag::Column::Id)
        .all(db)
        .await?;

    let entities: Vec<entity::Model> = tx
        .find_related(Counterparty)
        .order_by_asc(entity::Column::Id)
        .all(db)
        .await?;

    Ok(build(tx, &account, group.as_ref(), category.as_ref(), &tags, &entities))
}

fn build(
    tx: &transaction::Model,
    account: &account::Model,
    group: Option<&model::entities::account_group::Model>,
    category: Option<&category::Model>,
    tags: &[tag::Model],
    entities: &[entity::Model],
) -> Snapshot {
    let mut snapshot = Snapshot::new();

    snapshot.set("id", tx.id);
    snapshot.set("account_id", account.id);
    snapshot.set("account_name", account.name.as_str());
    snapshot.set("account_group_id", group.map(|g| g.id));
    snapshot.set("account_group_name", group.map(|g| g.name.as_str()));
    snapshot.set("is_asset_account", account.is_asset);
    snapshot.set("is_archived_account", account.is_archived);

    snapshot.set("kind", tx.kind.as_str());
    snapshot.set("is_expense", tx.kind == transaction::TransactionKind::Expense);
    snapshot.set("is_income", tx.kind == transaction::TransactionKind::Income);
    snapshot.set("is_paid", tx.is_paid);

    snapshot.set("category_id", category.map(|c| c.id));
    snapshot.set("category_name", category.map(|c| c.name.as_str()));
    snapshot.set("category_muted", category.map(|c| c.mute).unwrap_or(false));

    snapshot.set("date", tx.date);
    snapshot.set("reference_date", tx.reference_date);
    snapshot.set("amount", tx.amount);
    snapshot.set("description", tx.description.as_str());
    snapshot.set("notes", tx.notes.as_deref());

    snapshot.set(
        "tag_ids",
        Value::List(tags.iter().map(|t| Value::from(t.id)).collect()),
    );
    snapshot.set(
        "tag_names",
        Value::List(tags.iter().map(|t| Value::from(t.name.as_str())).collect()),
    );
    snapshot.set(
        "entity_ids",
        Value::List(entities.iter().map(|e| Value::from(e.id)).collect()),
    );
    snapshot.set(
        "entity_names",
        Value::List(entities.iter().map(|e| Value::from(e.name.as_str())).collect()),
    );

    snapshot.set("internal_note", tx.internal_note.as_deref());
    snapshot.set("internal_id", tx.internal_id.as_deref());
    snapshot.set("deleted", tx.deleted);

    snapshot
}
