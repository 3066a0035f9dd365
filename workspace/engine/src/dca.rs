//! Keeps DCA entries numerically consistent with the transactions they
//! reference. This runs on every transaction event, before rule dispatch.

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use tracing::debug;

use model::entities::{dca_entry, transaction};

use crate::error::Result;

/// Mirrors the transaction's amount into every DCA entry that links it:
/// the expense leg into `amount_paid`, the income leg into
/// `amount_received`. Entries already in sync are left alone. Returns the
/// number of entries touched.
pub async fn sync_transaction<C: ConnectionTrait>(db: &C, tx: &transaction::Model) -> Result<u64> {
    let paid = dca_entry::Entity::update_many()
        .set(dca_entry::ActiveModel {
            amount_paid: Set(tx.amount),
            ..Default::default()
        })
        .filter(dca_entry::Column::ExpenseTransactionId.eq(tx.id))
        .filter(dca_entry::Column::AmountPaid.ne(tx.amount))
        .exec(db)
        .await?;

    let received = dca_entry::Entity::update_many()
        .set(dca_entry::ActiveModel {
            amount_received: Set(tx.amount),
            ..Default::default()
        })
        .filter(dca_entry::Column::IncomeTransactionId.eq(tx.id))
        .filter(dca_entry::Column::AmountReceived.ne(tx.amount))
        .exec(db)
        .await?;

    let touched = paid.rows_affected + received.rows_affected;
    if touched > 0 {
        debug!(transaction_id = tx.id, entries = touched, "synced dca entries");
    }
    Ok(touched)
}
