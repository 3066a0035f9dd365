//! Field assignment actions.
//!
//! The action's value expression is evaluated against the snapshot and the
//! result coerced into the target field. Reference fields accept an id or
//! a name, and both must name an existing row; the tag and entity sets
//! accept a list (or a single scalar) and replace the whole set.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};

use common::{Snapshot, Value};
use model::entities::rule_set_field_action::{self, TargetField};
use model::entities::transaction::TransactionKind;
use model::entities::{account, category, entity, tag, transaction};

use crate::error::{EngineError, Result};
use crate::expr;
use crate::writer::{self, TransactionDraft};

/// Applies one assignment action to the transaction by rewriting it
/// through the internal write path. Runs on the rule's database
/// transaction, so a later failing action takes this write down with it.
pub(super) async fn apply<C: ConnectionTrait>(
    db: &C,
    action: &rule_set_field_action::Model,
    snapshot: &Snapshot,
    tx: &transaction::Model,
) -> Result<transaction::Model> {
    let value = expr::evaluate(&action.value, snapshot)?;
    let mut draft = TransactionDraft::from_transaction(db, tx).await?;
    assign(db, action.field, value, &mut draft).await?;
    writer::update_internal(db, tx, draft).await
}

/// Coerces `value` into the draft field named by `field`.
pub(super) async fn assign<C: ConnectionTrait>(
    db: &C,
    field: TargetField,
    value: Value,
    draft: &mut TransactionDraft,
) -> Result<()> {
    match field {
        TargetField::Account => draft.account_id = resolve_account(db, &value).await?,
        TargetField::Kind => draft.kind = coerce_kind(&value)?,
        TargetField::IsPaid => draft.is_paid = coerce_bool(&value)?,
        TargetField::Date => draft.date = coerce_date(&value)?,
        TargetField::ReferenceDate => draft.reference_date = Some(coerce_date(&value)?),
        TargetField::Amount => draft.amount = coerce_amount(&value)?,
        TargetField::Description => draft.description = coerce_text(&value, "description")?,
        TargetField::Notes => draft.notes = coerce_optional_text(&value, "notes")?,
        TargetField::Category => draft.category_id = resolve_category(db, &value).await?,
        TargetField::Tags => draft.tag_ids = resolve_tags(db, &value).await?,
        TargetField::Entities => draft.entity_ids = resolve_entities(db, &value).await?,
        TargetField::InternalNote => {
            draft.internal_note = coerce_optional_text(&value, "internal_note")?
        }
        TargetField::InternalId => {
            draft.internal_id = coerce_optional_text(&value, "internal_id")?
        }
    }
    Ok(())
}

fn coerce_id(value: i64, what: &str) -> Result<i32> {
    i32::try_from(value)
        .map_err(|_| EngineError::Validation(format!("{} id {} is out of range", what, value)))
}

pub(super) fn coerce_kind(value: &Value) -> Result<TransactionKind> {
    let text = value.as_str().ok_or_else(|| {
        EngineError::Validation(format!(
            "expected a transaction kind, got {}",
            value.type_name()
        ))
    })?;
    TransactionKind::parse(text)
        .ok_or_else(|| EngineError::Validation(format!("'{}' is not a transaction kind", text)))
}

pub(super) fn coerce_bool(value: &Value) -> Result<bool> {
    value.as_bool().ok_or_else(|| {
        EngineError::Validation(format!("expected a boolean, got {}", value.type_name()))
    })
}

pub(super) fn coerce_date(value: &Value) -> Result<NaiveDate> {
    match value {
        Value::Date(date) => Ok(*date),
        Value::Str(text) => text
            .parse()
            .map_err(|_| EngineError::Validation(format!("'{}' is not a calendar date", text))),
        other => Err(EngineError::Validation(format!(
            "expected a date, got {}",
            other.type_name()
        ))),
    }
}

pub(super) fn coerce_amount(value: &Value) -> Result<Decimal> {
    value.as_decimal().ok_or_else(|| {
        EngineError::Validation(format!(
            "expected a number for amount, got {}",
            value.type_name()
        ))
    })
}

fn coerce_text(value: &Value, field: &str) -> Result<String> {
    match value {
        Value::Null | Value::List(_) => Err(EngineError::Validation(format!(
            "cannot use {} as {}",
            value.type_name(),
            field
        ))),
        other => Ok(other.to_string()),
    }
}

fn coerce_optional_text(value: &Value, field: &str) -> Result<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::List(_) => Err(EngineError::Validation(format!(
            "cannot use a list as {}",
            field
        ))),
        other => Ok(Some(other.to_string())),
    }
}

/// Account names are not unique, so a name lookup must match exactly one.
pub(super) async fn resolve_account<C: ConnectionTrait>(db: &C, value: &Value) -> Result<i32> {
    match value {
        Value::Int(id) => {
            let id = coerce_id(*id, "account")?;
            account::Entity::find_by_id(id)
                .one(db)
                .await?
                .map(|account| account.id)
                .ok_or_else(|| {
                    EngineError::Validation(format!("account {} does not exist", id))
                })
        }
        Value::Str(name) => {
            let matches = account::Entity::find()
                .filter(account::Column::Name.eq(name.as_str()))
                .all(db)
                .await?;
            match matches.len() {
                0 => Err(EngineError::Validation(format!(
                    "account '{}' does not exist",
                    name
                ))),
                1 => Ok(matches[0].id),
                _ => Err(EngineError::Validation(format!(
                    "account name '{}' is ambiguous",
                    name
                ))),
            }
        }
        other => Err(EngineError::Validation(format!(
            "expected an account id or name, got {}",
            other.type_name()
        ))),
    }
}

pub(super) async fn resolve_category<C: ConnectionTrait>(
    db: &C,
    value: &Value,
) -> Result<Option<i32>> {
    match value {
        Value::Null => Ok(None),
        Value::Int(id) => {
            let id = coerce_id(*id, "category")?;
            category::Entity::find_by_id(id)
                .one(db)
                .await?
                .map(|category| Some(category.id))
                .ok_or_else(|| {
                    EngineError::Validation(format!("category {} does not exist", id))
                })
        }
        Value::Str(name) => category::Entity::find()
            .filter(category::Column::Name.eq(name.as_str()))
            .one(db)
            .await?
            .map(|category| Some(category.id))
            .ok_or_else(|| {
                EngineError::Validation(format!("category '{}' does not exist", name))
            }),
        other => Err(EngineError::Validation(format!(
            "expected a category id or name, got {}",
            other.type_name()
        ))),
    }
}

pub(super) async fn resolve_tag_id<C: ConnectionTrait>(db: &C, item: &Value) -> Result<i32> {
    match item {
        Value::Int(id) => {
            let id = coerce_id(*id, "tag")?;
            tag::Entity::find_by_id(id)
                .one(db)
                .await?
                .map(|tag| tag.id)
                .ok_or_else(|| EngineError::Validation(format!("tag {} does not exist", id)))
        }
        Value::Str(name) => tag::Entity::find()
            .filter(tag::Column::Name.eq(name.as_str()))
            .one(db)
            .await?
            .map(|tag| tag.id)
            .ok_or_else(|| EngineError::Validation(format!("tag '{}' does not exist", name))),
        other => Err(EngineError::Validation(format!(
            "expected a tag id or name, got {}",
            other.type_name()
        ))),
    }
}

pub(super) async fn resolve_entity_id<C: ConnectionTrait>(db: &C, item: &Value) -> Result<i32> {
    match item {
        Value::Int(id) => {
            let id = coerce_id(*id, "entity")?;
            entity::Entity::find_by_id(id)
                .one(db)
                .await?
                .map(|entity| entity.id)
                .ok_or_else(|| EngineError::Validation(format!("entity {} does not exist", id)))
        }
        Value::Str(name) => entity::Entity::find()
            .filter(entity::Column::Name.eq(name.as_str()))
            .one(db)
            .await?
            .map(|entity| entity.id)
            .ok_or_else(|| {
                EngineError::Validation(format!("entity '{}' does not exist", name))
            }),
        other => Err(EngineError::Validation(format!(
            "expected an entity id or name, got {}",
            other.type_name()
        ))),
    }
}

/// A list replaces the whole set; a single scalar is a one-element list;
/// null clears it.
async fn resolve_tags<C: ConnectionTrait>(db: &C, value: &Value) -> Result<Vec<i32>> {
    let items: Vec<&Value> = match value {
        Value::Null => return Ok(Vec::new()),
        Value::List(items) => items.iter().collect(),
        single => vec![single],
    };
    let mut ids = Vec::with_capacity(items.len());
    for item in items {
        ids.push(resolve_tag_id(db, item).await?);
    }
    Ok(ids)
}

async fn resolve_entities<C: ConnectionTrait>(db: &C, value: &Value) -> Result<Vec<i32>> {
    let items: Vec<&Value> = match value {
        Value::Null => return Ok(Vec::new()),
        Value::List(items) => items.iter().collect(),
        single => vec![single],
    };
    let mut ids = Vec::with_capacity(items.len());
    for item in items {
        ids.push(resolve_entity_id(db, item).await?);
    }
    Ok(ids)
}
