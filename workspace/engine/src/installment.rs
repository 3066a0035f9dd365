//! Splitting a plan's total into installment transactions.
//!
//! The split happens at the account currency's minor unit: every
//! installment gets the truncated base share and the remainder is dealt
//! out one minor unit at a time starting from the first installment, so
//! the generated amounts always add up to the plan total exactly.
//! Expanding a plan replaces whatever it generated before, in one
//! database transaction.

use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, QueryFilter, TransactionTrait};
use tracing::{info, instrument};

use common::InstallmentRunSummary;
use model::entities::{account, currency, entity, installment_plan, tag, transaction};

use crate::error::{EngineError, Result};
use crate::schedule::occurrence_date;
use crate::writer::{self, TransactionDraft};

/// Splits `total` into `count` amounts at the currency's precision.
///
/// The first amounts absorb the remainder: 100.00 over 3 becomes
/// 33.34, 33.33, 33.33.
pub fn split_amount(
    total: Decimal,
    count: i32,
    currency: &currency::Model,
) -> Result<Vec<Decimal>> {
    if count < 1 {
        return Err(EngineError::Validation(format!(
            "cannot split into {count} installments"
        )));
    }
    if total < Decimal::ZERO {
        return Err(EngineError::Validation(format!(
            "cannot split a negative total of {total}"
        )));
    }

    let step = currency.minor_unit();
    let total = currency.truncate(total);
    let count_decimal = Decimal::from(count);
    let base = currency.truncate(total / count_decimal);
    let mut leftover = total - base * count_decimal;

    let mut amounts = vec![base; count as usize];
    for amount in amounts.iter_mut() {
        if leftover < step {
            break;
        }
        *amount += step;
        leftover -= step;
    }
    Ok(amounts)
}

/// Materializes a plan into its installment transactions, replacing any
/// previously generated set.
#[instrument(skip(db))]
pub async fn expand_plan<C>(db: &C, plan_id: i32) -> Result<InstallmentRunSummary>
where
    C: ConnectionTrait + TransactionTrait,
{
    let plan = installment_plan::Entity::find_by_id(plan_id)
        .one(db)
        .await?
        .ok_or_else(|| {
            EngineError::NotFound(format!("installment plan {plan_id} does not exist"))
        })?;
    if plan.recurrence_interval < 1 {
        return Err(EngineError::Validation(format!(
            "plan {} has a recurrence interval of {}",
            plan.id, plan.recurrence_interval
        )));
    }

    let account = account::Entity::find_by_id(plan.account_id)
        .one(db)
        .await?
        .ok_or_else(|| {
            EngineError::Validation(format!("account {} does not exist", plan.account_id))
        })?;
    let account_currency = account
        .find_related(currency::Entity)
        .one(db)
        .await?
        .ok_or_else(|| {
            EngineError::NotFound(format!("currency {} does not exist", account.currency_id))
        })?;

    let amounts = split_amount(plan.total_amount, plan.number_of_installments, &account_currency)?;
    let tag_ids: Vec<i32> = plan
        .find_related(tag::Entity)
        .all(db)
        .await?
        .into_iter()
        .map(|tag| tag.id)
        .collect();
    let entity_ids: Vec<i32> = plan
        .find_related(entity::Entity)
        .all(db)
        .await?
        .into_iter()
        .map(|entity| entity.id)
        .collect();

    let txn = db.begin().await?;
    let replaced = transaction::Entity::delete_many()
        .filter(transaction::Column::InstallmentPlanId.eq(plan.id))
        .exec(&txn)
        .await?
        .rows_affected;

    for (k, amount) in amounts.iter().copied().enumerate() {
        let draft = installment_draft(&plan, k as i32, amount, &tag_ids, &entity_ids);
        writer::create(&txn, draft).await?;
    }
    txn.commit().await?;

    let summary = InstallmentRunSummary {
        plan_id: plan.id,
        installments_created: amounts.len(),
        replaced: replaced as usize,
    };
    info!(%summary, "installment plan expanded");
    Ok(summary)
}

fn installment_draft(
    plan: &installment_plan::Model,
    k: i32,
    amount: Decimal,
    tag_ids: &[i32],
    entity_ids: &[i32],
) -> TransactionDraft {
    let number = plan.installment_start + k;
    let counter = format!("({}/{})", number, plan.series_total());
    let description = if plan.add_description_to_transaction {
        format!("{} {}", plan.description, counter)
    } else {
        counter
    };

    let due = occurrence_date(
        plan.start_date,
        plan.recurrence_unit,
        plan.recurrence_interval,
        k,
    );
    let mut draft = TransactionDraft::new(plan.account_id, plan.kind, due, amount, description);
    draft.is_paid = false;
    draft.notes = if plan.add_notes_to_transaction {
        plan.notes.clone()
    } else {
        None
    };
    draft.category_id = plan.category_id;
    draft.installment_plan_id = Some(plan.id);
    draft.installment_number = Some(number);
    draft.reference_date = plan.reference_date.map(|anchor| {
        occurrence_date(anchor, plan.recurrence_unit, plan.recurrence_interval, k)
    });
    draft.tag_ids = tag_ids.to_vec();
    draft.entity_ids = entity_ids.to_vec();
    draft
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use sea_orm::{ActiveModelTrait, QueryOrder, Set};

    use model::entities::queued_event;

    use super::*;
    use crate::testing::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn dec(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    async fn installments_of(
        db: &sea_orm::DatabaseConnection,
        plan_id: i32,
    ) -> Vec<transaction::Model> {
        transaction::Entity::find()
            .filter(transaction::Column::InstallmentPlanId.eq(plan_id))
            .order_by_asc(transaction::Column::Date)
            .all(db)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_split_deals_remainder_to_the_first_installments() {
        let db = setup_db().await.unwrap();
        let cents = new_currency(&db, 2).await.unwrap();

        let amounts = split_amount(dec("100.00"), 3, &cents).unwrap();
        assert_eq!(amounts, vec![dec("33.34"), dec("33.33"), dec("33.33")]);
        assert_eq!(amounts.iter().sum::<Decimal>(), dec("100.00"));

        let amounts = split_amount(dec("0.05"), 3, &cents).unwrap();
        assert_eq!(amounts, vec![dec("0.02"), dec("0.02"), dec("0.01")]);

        let amounts = split_amount(dec("10.00"), 4, &cents).unwrap();
        assert_eq!(amounts, vec![dec("2.50"); 4]);
    }

    #[tokio::test]
    async fn test_split_respects_zero_decimal_currencies() {
        let db = setup_db().await.unwrap();
        let whole = new_currency(&db, 0).await.unwrap();

        let amounts = split_amount(dec("100"), 3, &whole).unwrap();
        assert_eq!(amounts, vec![dec("34"), dec("33"), dec("33")]);
        assert_eq!(amounts.iter().sum::<Decimal>(), dec("100"));
    }

    #[tokio::test]
    async fn test_split_rejects_invalid_input() {
        let db = setup_db().await.unwrap();
        let cents = new_currency(&db, 2).await.unwrap();

        assert!(matches!(
            split_amount(dec("10.00"), 0, &cents),
            Err(EngineError::Validation(_))
        ));
        assert!(matches!(
            split_amount(dec("-10.00"), 2, &cents),
            Err(EngineError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_expand_generates_a_numbered_monthly_sequence() {
        let db = setup_db().await.unwrap();
        let currency = new_currency(&db, 2).await.unwrap();
        let account = new_account(&db, &currency).await.unwrap();
        let plan = new_plan(&db, &account, dec("100.00"), 3, date(2024, 1, 15))
            .await
            .unwrap();

        let summary = expand_plan(&db, plan.id).await.unwrap();
        assert_eq!(summary.installments_created, 3);
        assert_eq!(summary.replaced, 0);

        let installments = installments_of(&db, plan.id).await;
        assert_eq!(installments.len(), 3);

        let dates: Vec<NaiveDate> = installments.iter().map(|tx| tx.date).collect();
        assert_eq!(
            dates,
            vec![date(2024, 1, 15), date(2024, 2, 15), date(2024, 3, 15)]
        );
        let amounts: Vec<Decimal> = installments.iter().map(|tx| tx.amount).collect();
        assert_eq!(amounts, vec![dec("33.34"), dec("33.33"), dec("33.33")]);
        assert_eq!(installments[0].description, "Installment purchase (1/3)");
        assert_eq!(installments[2].description, "Installment purchase (3/3)");
        assert_eq!(installments[0].installment_number, Some(1));
        assert_eq!(installments[2].installment_number, Some(3));
        assert!(installments.iter().all(|tx| !tx.is_paid));

        // One created event per installment.
        assert_eq!(
            queued_event::Entity::find().all(&db).await.unwrap().len(),
            3
        );
    }

    #[tokio::test]
    async fn test_regeneration_replaces_the_previous_set() {
        let db = setup_db().await.unwrap();
        let currency = new_currency(&db, 2).await.unwrap();
        let account = new_account(&db, &currency).await.unwrap();
        let plan = new_plan(&db, &account, dec("100.00"), 3, date(2024, 1, 15))
            .await
            .unwrap();

        expand_plan(&db, plan.id).await.unwrap();

        let mut active: installment_plan::ActiveModel = plan.into();
        active.total_amount = Set(dec("120.00"));
        let plan = active.update(&db).await.unwrap();

        let summary = expand_plan(&db, plan.id).await.unwrap();
        assert_eq!(summary.replaced, 3);
        assert_eq!(summary.installments_created, 3);

        let installments = installments_of(&db, plan.id).await;
        assert_eq!(installments.len(), 3);
        assert!(installments.iter().all(|tx| tx.amount == dec("40.00")));
    }

    #[tokio::test]
    async fn test_numbering_honors_the_series_offset() {
        let db = setup_db().await.unwrap();
        let currency = new_currency(&db, 2).await.unwrap();
        let account = new_account(&db, &currency).await.unwrap();

        let plan = new_plan(&db, &account, dec("30.00"), 3, date(2024, 1, 15))
            .await
            .unwrap();
        let mut active: installment_plan::ActiveModel = plan.into();
        active.installment_start = Set(4);
        let plan = active.update(&db).await.unwrap();

        expand_plan(&db, plan.id).await.unwrap();

        let installments = installments_of(&db, plan.id).await;
        let numbers: Vec<Option<i32>> =
            installments.iter().map(|tx| tx.installment_number).collect();
        assert_eq!(numbers, vec![Some(4), Some(5), Some(6)]);
        assert_eq!(installments[0].description, "Installment purchase (4/6)");
    }

    #[tokio::test]
    async fn test_missing_plan_is_not_found() {
        let db = setup_db().await.unwrap();
        let err = expand_plan(&db, 4242).await.unwrap_err();
        assert!(matches!(err, EngineError::NotFound(_)), "{err}");
    }
}
