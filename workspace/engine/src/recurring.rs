//! Daily materialization of recurring definitions.
//!
//! Each definition owns a checkpoint, `last_generated_date`, holding the
//! due date of its most recent occurrence. A run walks the due dates
//! after the checkpoint up to the run's "today" and creates one
//! transaction per date, advancing the checkpoint under a compare-and-set
//! inside the same database transaction as the creation. Re-running a
//! caught-up definition is a no-op, and two overlapping runs cannot
//! double-create an occurrence.

use chrono::NaiveDate;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};
use tracing::{info, instrument, warn};

use common::RecurringRunSummary;
use model::entities::recurring_transaction;
use model::entities::{entity, tag};

use crate::error::{EngineError, Result};
use crate::schedule::occurrence_date;
use crate::writer::{self, TransactionDraft};

/// Generates every occurrence due on or before `today`, across all
/// definitions that are not paused. A failing definition is recorded in
/// the summary and does not stop the rest of the batch.
#[instrument(skip(db))]
pub async fn generate_due<C>(db: &C, today: NaiveDate) -> Result<RecurringRunSummary>
where
    C: ConnectionTrait + TransactionTrait,
{
    let definitions = recurring_transaction::Entity::find()
        .filter(recurring_transaction::Column::IsPaused.eq(false))
        .order_by_asc(recurring_transaction::Column::Id)
        .all(db)
        .await?;

    let mut summary = RecurringRunSummary::new(today);
    for definition in definitions {
        summary.definitions_seen += 1;
        match generate_for_definition(db, &definition, today).await {
            Ok(created) => summary.transactions_created += created,
            Err(error) => {
                warn!(definition_id = definition.id, %error, "definition skipped");
                summary.record_failure(definition.id, error.to_string());
            }
        }
    }

    info!(%summary, "recurring generation finished");
    Ok(summary)
}

async fn generate_for_definition<C>(
    db: &C,
    definition: &recurring_transaction::Model,
    today: NaiveDate,
) -> Result<usize>
where
    C: ConnectionTrait + TransactionTrait,
{
    if definition.recurrence_interval < 1 {
        return Err(EngineError::Validation(format!(
            "definition {} has a recurrence interval of {}",
            definition.id, definition.recurrence_interval
        )));
    }

    let tag_ids: Vec<i32> = definition
        .find_related(tag::Entity)
        .all(db)
        .await?
        .into_iter()
        .map(|tag| tag.id)
        .collect();
    let entity_ids: Vec<i32> = definition
        .find_related(entity::Entity)
        .all(db)
        .await?
        .into_iter()
        .map(|entity| entity.id)
        .collect();

    let mut checkpoint = definition.last_generated_date;
    let mut k = next_occurrence_index(definition, checkpoint);
    let mut created = 0usize;

    loop {
        if let Some(max) = definition.max_occurrences {
            if k >= max {
                break;
            }
        }
        let due = due_date(definition, k);
        if due > today {
            break;
        }
        if definition.end_date.is_some_and(|end| due > end) {
            break;
        }

        // Creation and checkpoint advance commit together. Losing the
        // compare-and-set means another run already generated this due
        // date, so the rollback discards our copy.
        let txn = db.begin().await?;
        writer::create(&txn, occurrence_draft(definition, k, due, &tag_ids, &entity_ids)).await?;
        if !advance_checkpoint(&txn, definition.id, checkpoint, due).await? {
            txn.rollback().await?;
            warn!(
                definition_id = definition.id,
                "checkpoint moved concurrently, stopping"
            );
            break;
        }
        txn.commit().await?;

        checkpoint = Some(due);
        created += 1;
        k += 1;
    }

    Ok(created)
}

fn due_date(definition: &recurring_transaction::Model, k: i32) -> NaiveDate {
    occurrence_date(
        definition.start_date,
        definition.recurrence_unit,
        definition.recurrence_interval,
        k,
    )
}

/// The index of the first occurrence strictly after the checkpoint.
/// Indices are counted from the definition's own start date, so due
/// dates stay anchored to it no matter how often the generator runs.
fn next_occurrence_index(
    definition: &recurring_transaction::Model,
    checkpoint: Option<NaiveDate>,
) -> i32 {
    let Some(checkpoint) = checkpoint else {
        return 0;
    };
    let mut k = 0;
    while due_date(definition, k) <= checkpoint {
        k += 1;
    }
    k
}

fn occurrence_draft(
    definition: &recurring_transaction::Model,
    k: i32,
    due: NaiveDate,
    tag_ids: &[i32],
    entity_ids: &[i32],
) -> TransactionDraft {
    let description = if definition.add_description_to_transaction {
        definition.description.clone()
    } else {
        String::new()
    };
    let mut draft = TransactionDraft::new(
        definition.account_id,
        definition.kind,
        due,
        definition.amount,
        description,
    );
    // Generated obligations start out unpaid.
    draft.is_paid = false;
    draft.notes = if definition.add_notes_to_transaction {
        definition.notes.clone()
    } else {
        None
    };
    draft.category_id = definition.category_id;
    draft.recurring_transaction_id = Some(definition.id);
    draft.reference_date = definition.reference_date.map(|anchor| {
        occurrence_date(
            anchor,
            definition.recurrence_unit,
            definition.recurrence_interval,
            k,
        )
    });
    draft.tag_ids = tag_ids.to_vec();
    draft.entity_ids = entity_ids.to_vec();
    draft
}

/// Moves the checkpoint to `due`, but only if it still holds `expected`.
async fn advance_checkpoint<C: ConnectionTrait>(
    db: &C,
    definition_id: i32,
    expected: Option<NaiveDate>,
    due: NaiveDate,
) -> Result<bool> {
    let guard = match expected {
        Some(date) => recurring_transaction::Column::LastGeneratedDate.eq(date),
        None => recurring_transaction::Column::LastGeneratedDate.is_null(),
    };
    let result = recurring_transaction::Entity::update_many()
        .col_expr(
            recurring_transaction::Column::LastGeneratedDate,
            Expr::value(due),
        )
        .filter(recurring_transaction::Column::Id.eq(definition_id))
        .filter(guard)
        .exec(db)
        .await?;
    Ok(result.rows_affected == 1)
}
