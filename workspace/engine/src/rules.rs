//! Rule evaluation against queued transaction events.
//!
//! One event is processed by walking every matching rule in id order.
//! Each rule sees the transaction as the previous rule left it, and a
//! rule's actions run inside one database transaction so a failing
//! action takes the rule's earlier actions down with it without
//! touching what other rules did. Rule writes go through the internal
//! write path and therefore queue no further events.

use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use tracing::{debug, instrument, warn};

use model::entities::queued_event;
use model::entities::{rule_set_field_action, rule_upsert_action, transaction, transaction_rule};

use crate::error::{EngineError, Result};
use crate::snapshot::snapshot_transaction;
use crate::{dca, expr};

mod set_field;
mod upsert;

/// Runs one queued event through the rule set.
///
/// Returns `NotFound` when the event's transaction no longer exists;
/// the worker drops such events instead of retrying them. Database
/// errors bubble up so the event can be retried.
#[instrument(skip(db, event), fields(event_id = event.id, kind = ?event.kind))]
pub async fn process_event<C>(db: &C, event: &queued_event::Model) -> Result<()>
where
    C: ConnectionTrait + TransactionTrait,
{
    let Some(tx) = transaction::Entity::find_by_id(event.transaction_id)
        .one(db)
        .await?
    else {
        return Err(EngineError::NotFound(format!(
            "transaction {} no longer exists",
            event.transaction_id
        )));
    };

    // Mirror rows in averaging strategies follow their source amounts
    // before any rule gets to look at the transaction.
    dca::sync_transaction(db, &tx).await?;

    for rule in select_rules(db, event.kind).await? {
        // Re-read so this rule sees the writes of the previous one.
        let Some(current) = transaction::Entity::find_by_id(tx.id).one(db).await? else {
            return Err(EngineError::NotFound(format!(
                "transaction {} vanished while rules were running",
                tx.id
            )));
        };
        let snapshot = snapshot_transaction(db, &current).await?;

        let fired = match expr::evaluate_bool(&rule.trigger, &snapshot) {
            Ok(fired) => fired,
            Err(error) => {
                warn!(rule_id = rule.id, %error, "trigger evaluation failed, rule not fired");
                false
            }
        };
        if !fired {
            continue;
        }

        debug!(rule_id = rule.id, transaction_id = current.id, "rule fired");
        if let Err(error) = apply_rule(db, &rule, &current).await {
            if error.is_retryable() {
                return Err(error);
            }
            warn!(rule_id = rule.id, %error, "rule actions failed, skipping rule");
        }
    }

    Ok(())
}

/// Active rules matching the event kind, oldest first. Rule order is
/// part of the observable behavior, so it is always id order.
async fn select_rules<C: ConnectionTrait>(
    db: &C,
    kind: queued_event::EventKind,
) -> Result<Vec<transaction_rule::Model>> {
    let rules = transaction_rule::Entity::find()
        .filter(transaction_rule::Column::Active.eq(true))
        .order_by_asc(transaction_rule::Column::Id)
        .all(db)
        .await?;
    Ok(rules.into_iter().filter(|rule| rule.fires_on(kind)).collect())
}

/// A rule's actions merged across both action tables.
enum RuleAction {
    SetField(rule_set_field_action::Model),
    Upsert(rule_upsert_action::Model),
}

impl RuleAction {
    /// Position first, creation order as the tie-breaker.
    fn order_key(&self) -> (i32, i32) {
        match self {
            RuleAction::SetField(action) => (action.position, action.id),
            RuleAction::Upsert(action) => (action.position, action.id),
        }
    }
}

async fn load_actions<C: ConnectionTrait>(db: &C, rule_id: i32) -> Result<Vec<RuleAction>> {
    let mut actions = Vec::new();
    for action in rule_set_field_action::Entity::find()
        .filter(rule_set_field_action::Column::RuleId.eq(rule_id))
        .all(db)
        .await?
    {
        actions.push(RuleAction::SetField(action));
    }
    for action in rule_upsert_action::Entity::find()
        .filter(rule_upsert_action::Column::RuleId.eq(rule_id))
        .all(db)
        .await?
    {
        actions.push(RuleAction::Upsert(action));
    }
    actions.sort_by_key(RuleAction::order_key);
    Ok(actions)
}

/// Runs all of one rule's actions inside a single database transaction.
/// Every action re-snapshots, so expressions in later actions observe
/// the writes of earlier ones.
async fn apply_rule<C>(
    db: &C,
    rule: &transaction_rule::Model,
    tx: &transaction::Model,
) -> Result<()>
where
    C: ConnectionTrait + TransactionTrait,
{
    let actions = load_actions(db, rule.id).await?;
    if actions.is_empty() {
        return Ok(());
    }

    let txn = db.begin().await?;
    let mut current = tx.clone();
    for action in &actions {
        let snapshot = snapshot_transaction(&txn, &current).await?;
        match action {
            RuleAction::SetField(action) => {
                current = set_field::apply(&txn, action, &snapshot, &current).await?;
            }
            RuleAction::Upsert(action) => {
                upsert::apply(&txn, action, &snapshot).await?;
            }
        }
    }
    txn.commit().await?;
    Ok(())
}
