//! Update-or-create actions.
//!
//! The guard expression gates the action (an empty guard always passes).
//! The filter terms are ANDed into a search over live transactions:
//! finding one row updates it, finding none creates one from the
//! assignments, finding two is a configuration error surfaced to the rule
//! owner. Searching before writing is what makes event re-delivery
//! converge on the row created by the first delivery instead of
//! duplicating it.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::sea_query::{Query, SimpleExpr};
use sea_orm::{ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter, QuerySelect};
use tracing::debug;

use common::{Snapshot, Value};
use model::entities::rule_set_field_action::TargetField;
use model::entities::rule_upsert_action::{self, FieldAssignment, FilterTerm, SearchOperator};
use model::entities::transaction::TransactionKind;
use model::entities::{transaction, transaction_entity, transaction_tag};

use super::set_field;
use crate::error::{EngineError, Result};
use crate::expr;
use crate::writer::{self, TransactionDraft};

/// What an upsert action did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum UpsertOutcome {
    /// The guard evaluated to false.
    Skipped,
    Updated(i32),
    Created(i32),
}

const REQUIRED_ON_CREATE: [TargetField; 4] = [
    TargetField::Account,
    TargetField::Date,
    TargetField::Amount,
    TargetField::Description,
];

pub(super) async fn apply<C: ConnectionTrait>(
    db: &C,
    action: &rule_upsert_action::Model,
    snapshot: &Snapshot,
) -> Result<UpsertOutcome> {
    if !guard_passes(&action.guard, snapshot)? {
        return Ok(UpsertOutcome::Skipped);
    }
    if action.filter.0.is_empty() {
        return Err(EngineError::Validation(format!(
            "upsert action {} has an empty filter",
            action.id
        )));
    }

    let condition = build_filter(db, &action.filter.0, snapshot).await?;
    let matches = transaction::Entity::find()
        .filter(transaction::Column::Deleted.eq(false))
        .filter(condition)
        .limit(2)
        .all(db)
        .await?;

    match matches.as_slice() {
        [] => {
            let draft = draft_from_assignments(db, &action.set_values.0, snapshot).await?;
            let created = writer::create_internal(db, draft).await?;
            debug!(action_id = action.id, transaction_id = created.id, "upsert created");
            Ok(UpsertOutcome::Created(created.id))
        }
        [target] => {
            let mut draft = TransactionDraft::from_transaction(db, target).await?;
            for assignment in &action.set_values.0 {
                let value = expr::evaluate(&assignment.value, snapshot)?;
                set_field::assign(db, assignment.field, value, &mut draft).await?;
            }
            let updated = writer::update_internal(db, target, draft).await?;
            debug!(action_id = action.id, transaction_id = updated.id, "upsert updated");
            Ok(UpsertOutcome::Updated(updated.id))
        }
        _ => Err(EngineError::AmbiguousMatch(format!(
            "filter of upsert action {} matches more than one transaction",
            action.id
        ))),
    }
}

fn guard_passes(guard: &str, snapshot: &Snapshot) -> Result<bool> {
    if guard.trim().is_empty() {
        return Ok(true);
    }
    expr::evaluate_bool(guard, snapshot)
}

/// Evaluates every term's value expression against the snapshot, then ANDs
/// the terms into one condition over the transactions table.
async fn build_filter<C: ConnectionTrait>(
    db: &C,
    terms: &[FilterTerm],
    snapshot: &Snapshot,
) -> Result<Condition> {
    let mut condition = Condition::all();
    for term in terms {
        let value = expr::evaluate(&term.value, snapshot)?;
        condition = condition.add(term_condition(db, term, &value).await?);
    }
    Ok(condition)
}

async fn term_condition<C: ConnectionTrait>(
    db: &C,
    term: &FilterTerm,
    value: &Value,
) -> Result<Condition> {
    let condition = match term.field {
        TargetField::Description => Condition::all().add(text_expr(
            transaction::Column::Description,
            term.operator,
            value,
        )?),
        TargetField::Notes => {
            Condition::all().add(text_expr(transaction::Column::Notes, term.operator, value)?)
        }
        TargetField::InternalNote => Condition::all().add(text_expr(
            transaction::Column::InternalNote,
            term.operator,
            value,
        )?),
        TargetField::InternalId => Condition::all().add(text_expr(
            transaction::Column::InternalId,
            term.operator,
            value,
        )?),
        TargetField::Amount => Condition::all().add(amount_expr(term.operator, value)?),
        TargetField::Date => {
            Condition::all().add(date_expr(transaction::Column::Date, term.operator, value)?)
        }
        TargetField::ReferenceDate => Condition::all().add(date_expr(
            transaction::Column::ReferenceDate,
            term.operator,
            value,
        )?),
        TargetField::Account => {
            require_eq(term.field, term.operator)?;
            let account_id = set_field::resolve_account(db, value).await?;
            Condition::all().add(transaction::Column::AccountId.eq(account_id))
        }
        TargetField::Category => {
            require_eq(term.field, term.operator)?;
            match set_field::resolve_category(db, value).await? {
                Some(id) => Condition::all().add(transaction::Column::CategoryId.eq(id)),
                None => Condition::all().add(transaction::Column::CategoryId.is_null()),
            }
        }
        TargetField::Kind => {
            require_eq(term.field, term.operator)?;
            Condition::all().add(transaction::Column::Kind.eq(set_field::coerce_kind(value)?))
        }
        TargetField::IsPaid => {
            require_eq(term.field, term.operator)?;
            Condition::all().add(transaction::Column::IsPaid.eq(set_field::coerce_bool(value)?))
        }
        TargetField::Tags => tag_condition(db, term.operator, value).await?,
        TargetField::Entities => entity_condition(db, term.operator, value).await?,
    };
    Ok(condition)
}

fn require_eq(field: TargetField, operator: SearchOperator) -> Result<()> {
    if operator == SearchOperator::Eq {
        Ok(())
    } else {
        Err(EngineError::Validation(format!(
            "operator {:?} is not supported for {:?}",
            operator, field
        )))
    }
}

fn text_expr(
    column: transaction::Column,
    operator: SearchOperator,
    value: &Value,
) -> Result<SimpleExpr> {
    let text = match value {
        Value::Null | Value::List(_) => {
            return Err(EngineError::Validation(format!(
                "expected text for a {:?} filter, got {}",
                column,
                value.type_name()
            )));
        }
        other => other.to_string(),
    };
    Ok(match operator {
        SearchOperator::Eq => column.eq(text),
        SearchOperator::Contains => column.contains(text),
        SearchOperator::StartsWith => column.starts_with(text),
        SearchOperator::EndsWith => column.ends_with(text),
        SearchOperator::Gt => column.gt(text),
        SearchOperator::Lt => column.lt(text),
        SearchOperator::Gte => column.gte(text),
        SearchOperator::Lte => column.lte(text),
    })
}

fn amount_expr(operator: SearchOperator, value: &Value) -> Result<SimpleExpr> {
    let amount = set_field::coerce_amount(value)?;
    let column = transaction::Column::Amount;
    Ok(match operator {
        SearchOperator::Eq => column.eq(amount),
        SearchOperator::Gt => column.gt(amount),
        SearchOperator::Lt => column.lt(amount),
        SearchOperator::Gte => column.gte(amount),
        SearchOperator::Lte => column.lte(amount),
        other => {
            return Err(EngineError::Validation(format!(
                "operator {:?} is not supported for Amount",
                other
            )));
        }
    })
}

fn date_expr(
    column: transaction::Column,
    operator: SearchOperator,
    value: &Value,
) -> Result<SimpleExpr> {
    let date = set_field::coerce_date(value)?;
    Ok(match operator {
        SearchOperator::Eq => column.eq(date),
        SearchOperator::Gt => column.gt(date),
        SearchOperator::Lt => column.lt(date),
        SearchOperator::Gte => column.gte(date),
        SearchOperator::Lte => column.lte(date),
        other => {
            return Err(EngineError::Validation(format!(
                "operator {:?} is not supported for {:?}",
                other, column
            )));
        }
    })
}

/// Matching on tags means "carries every listed tag". Null places no
/// constraint.
async fn tag_condition<C: ConnectionTrait>(
    db: &C,
    operator: SearchOperator,
    value: &Value,
) -> Result<Condition> {
    require_eq(TargetField::Tags, operator)?;
    let items: Vec<&Value> = match value {
        Value::Null => return Ok(Condition::all()),
        Value::List(items) => items.iter().collect(),
        single => vec![single],
    };
    let mut condition = Condition::all();
    for item in items {
        let tag_id = set_field::resolve_tag_id(db, item).await?;
        condition = condition.add(
            transaction::Column::Id.in_subquery(
                Query::select()
                    .column(transaction_tag::Column::TransactionId)
                    .from(transaction_tag::Entity)
                    .and_where(transaction_tag::Column::TagId.eq(tag_id))
                    .to_owned(),
            ),
        );
    }
    Ok(condition)
}

async fn entity_condition<C: ConnectionTrait>(
    db: &C,
    operator: SearchOperator,
    value: &Value,
) -> Result<Condition> {
    require_eq(TargetField::Entities, operator)?;
    let items: Vec<&Value> = match value {
        Value::Null => return Ok(Condition::all()),
        Value::List(items) => items.iter().collect(),
        single => vec![single],
    };
    let mut condition = Condition::all();
    for item in items {
        let entity_id = set_field::resolve_entity_id(db, item).await?;
        condition = condition.add(
            transaction::Column::Id.in_subquery(
                Query::select()
                    .column(transaction_entity::Column::TransactionId)
                    .from(transaction_entity::Entity)
                    .and_where(transaction_entity::Column::EntityId.eq(entity_id))
                    .to_owned(),
            ),
        );
    }
    Ok(condition)
}

/// Builds the draft for the create path. Fields the assignments leave out
/// keep write-path defaults: a paid expense with no relations.
async fn draft_from_assignments<C: ConnectionTrait>(
    db: &C,
    assignments: &[FieldAssignment],
    snapshot: &Snapshot,
) -> Result<TransactionDraft> {
    let mut draft = TransactionDraft::new(
        0,
        TransactionKind::Expense,
        NaiveDate::from_ymd_opt(1970, 1, 1).unwrap(),
        Decimal::ZERO,
        "",
    );
    let mut assigned = Vec::with_capacity(assignments.len());
    for assignment in assignments {
        let value = expr::evaluate(&assignment.value, snapshot)?;
        set_field::assign(db, assignment.field, value, &mut draft).await?;
        assigned.push(assignment.field);
    }
    for required in REQUIRED_ON_CREATE {
        if !assigned.contains(&required) {
            return Err(EngineError::Validation(format!(
                "upsert create needs a value for {:?}",
                required
            )));
        }
    }
    Ok(draft)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::snapshot_transaction;
    use crate::testing::*;

    fn mirror_assignments(account_id: i32) -> Vec<FieldAssignment> {
        vec![
            FieldAssignment {
                field: TargetField::Account,
                value: account_id.to_string(),
            },
            FieldAssignment {
                field: TargetField::Date,
                value: "date".to_string(),
            },
            FieldAssignment {
                field: TargetField::Amount,
                value: "amount".to_string(),
            },
            FieldAssignment {
                field: TargetField::Description,
                value: "'Mirror of ' + description".to_string(),
            },
            FieldAssignment {
                field: TargetField::InternalId,
                value: "'mirror-' + description".to_string(),
            },
        ]
    }

    fn mirror_filter() -> Vec<FilterTerm> {
        vec![FilterTerm {
            field: TargetField::InternalId,
            operator: SearchOperator::Eq,
            value: "'mirror-' + description".to_string(),
        }]
    }

    #[tokio::test]
    async fn test_guard_false_is_a_noop() {
        let db = setup_db().await.unwrap();
        let currency = new_currency(&db, 2).await.unwrap();
        let account = new_account(&db, &currency).await.unwrap();
        let tx = new_transaction(&db, &account, 999, "Netflix Monthly").await.unwrap();
        let snapshot = snapshot_transaction(&db, &tx).await.unwrap();

        let rule = new_rule(&db, "true", true, false).await.unwrap();
        let action = new_upsert_action(
            &db,
            &rule,
            0,
            "amount > 100",
            mirror_filter(),
            mirror_assignments(account.id),
        )
        .await
        .unwrap();

        let outcome = apply(&db, &action, &snapshot).await.unwrap();
        assert_eq!(outcome, UpsertOutcome::Skipped);
        assert_eq!(
            transaction::Entity::find().all(&db).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn test_redelivery_converges_instead_of_duplicating() {
        let db = setup_db().await.unwrap();
        let currency = new_currency(&db, 2).await.unwrap();
        let account = new_account(&db, &currency).await.unwrap();
        let tx = new_transaction(&db, &account, 999, "Netflix Monthly").await.unwrap();
        let snapshot = snapshot_transaction(&db, &tx).await.unwrap();

        let rule = new_rule(&db, "true", true, false).await.unwrap();
        let action = new_upsert_action(
            &db,
            &rule,
            0,
            "",
            mirror_filter(),
            mirror_assignments(account.id),
        )
        .await
        .unwrap();

        let first = apply(&db, &action, &snapshot).await.unwrap();
        let UpsertOutcome::Created(created_id) = first else {
            panic!("expected a create, got {:?}", first);
        };

        // Same snapshot again, as an at-least-once queue would deliver it.
        let second = apply(&db, &action, &snapshot).await.unwrap();
        assert_eq!(second, UpsertOutcome::Updated(created_id));

        let mirrors = transaction::Entity::find()
            .filter(transaction::Column::InternalId.eq("mirror-Netflix Monthly"))
            .all(&db)
            .await
            .unwrap();
        assert_eq!(mirrors.len(), 1);
        assert_eq!(mirrors[0].description, "Mirror of Netflix Monthly");
        assert_eq!(mirrors[0].amount, tx.amount);
        assert_eq!(mirrors[0].date, tx.date);
    }

    #[tokio::test]
    async fn test_matching_two_rows_is_ambiguous() {
        let db = setup_db().await.unwrap();
        let currency = new_currency(&db, 2).await.unwrap();
        let account = new_account(&db, &currency).await.unwrap();
        new_transaction(&db, &account, 100, "Duplicate").await.unwrap();
        new_transaction(&db, &account, 200, "Duplicate").await.unwrap();
        let trigger = new_transaction(&db, &account, 999, "Trigger").await.unwrap();
        let snapshot = snapshot_transaction(&db, &trigger).await.unwrap();

        let rule = new_rule(&db, "true", true, false).await.unwrap();
        let action = new_upsert_action(
            &db,
            &rule,
            0,
            "",
            vec![FilterTerm {
                field: TargetField::Description,
                operator: SearchOperator::Eq,
                value: "'Duplicate'".to_string(),
            }],
            vec![FieldAssignment {
                field: TargetField::Notes,
                value: "'touched'".to_string(),
            }],
        )
        .await
        .unwrap();

        let err = apply(&db, &action, &snapshot).await.unwrap_err();
        assert!(matches!(err, EngineError::AmbiguousMatch(_)), "{err}");
    }

    #[tokio::test]
    async fn test_update_path_applies_assignments() {
        let db = setup_db().await.unwrap();
        let currency = new_currency(&db, 2).await.unwrap();
        let account = new_account(&db, &currency).await.unwrap();
        let target = new_transaction(&db, &account, 100, "Salary deposit").await.unwrap();
        let trigger = new_transaction(&db, &account, 999, "Trigger").await.unwrap();
        let snapshot = snapshot_transaction(&db, &trigger).await.unwrap();

        let rule = new_rule(&db, "true", true, false).await.unwrap();
        let action = new_upsert_action(
            &db,
            &rule,
            0,
            "",
            vec![FilterTerm {
                field: TargetField::Description,
                operator: SearchOperator::StartsWith,
                value: "'Salary'".to_string(),
            }],
            vec![FieldAssignment {
                field: TargetField::Notes,
                value: "'matched by rule'".to_string(),
            }],
        )
        .await
        .unwrap();

        let outcome = apply(&db, &action, &snapshot).await.unwrap();
        assert_eq!(outcome, UpsertOutcome::Updated(target.id));

        let stored = transaction::Entity::find_by_id(target.id)
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.notes.as_deref(), Some("matched by rule"));
    }

    #[tokio::test]
    async fn test_create_path_requires_core_fields() {
        let db = setup_db().await.unwrap();
        let currency = new_currency(&db, 2).await.unwrap();
        let account = new_account(&db, &currency).await.unwrap();
        let tx = new_transaction(&db, &account, 999, "Trigger").await.unwrap();
        let snapshot = snapshot_transaction(&db, &tx).await.unwrap();

        let rule = new_rule(&db, "true", true, false).await.unwrap();
        let action = new_upsert_action(
            &db,
            &rule,
            0,
            "",
            vec![FilterTerm {
                field: TargetField::InternalId,
                operator: SearchOperator::Eq,
                value: "'nothing-matches-this'".to_string(),
            }],
            vec![FieldAssignment {
                field: TargetField::Description,
                value: "'Incomplete'".to_string(),
            }],
        )
        .await
        .unwrap();

        let err = apply(&db, &action, &snapshot).await.unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)), "{err}");
        assert_eq!(
            transaction::Entity::find().all(&db).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn test_tag_filter_matches_per_item() {
        let db = setup_db().await.unwrap();
        let currency = new_currency(&db, 2).await.unwrap();
        let account = new_account(&db, &currency).await.unwrap();
        let media = new_tag(&db, "media").await.unwrap();
        let tagged = new_transaction(&db, &account, 100, "Tagged").await.unwrap();
        link_tag(&db, &tagged, &media).await.unwrap();
        new_transaction(&db, &account, 200, "Untagged").await.unwrap();
        let trigger = new_transaction(&db, &account, 999, "Trigger").await.unwrap();
        let snapshot = snapshot_transaction(&db, &trigger).await.unwrap();

        let rule = new_rule(&db, "true", true, false).await.unwrap();
        let action = new_upsert_action(
            &db,
            &rule,
            0,
            "",
            vec![FilterTerm {
                field: TargetField::Tags,
                operator: SearchOperator::Eq,
                value: "'media'".to_string(),
            }],
            vec![FieldAssignment {
                field: TargetField::Notes,
                value: "'has the media tag'".to_string(),
            }],
        )
        .await
        .unwrap();

        let outcome = apply(&db, &action, &snapshot).await.unwrap();
        assert_eq!(outcome, UpsertOutcome::Updated(tagged.id));
    }
}
