use std::sync::atomic::AtomicU64;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, Set};

use model::entities::recurring_transaction::RecurrenceUnit;
use model::entities::rule_set_field_action::TargetField;
use model::entities::transaction::TransactionKind;
use model::entities::{
    account, category, currency, entity, installment_plan, recurring_transaction,
    rule_set_field_action, rule_upsert_action, tag, transaction, transaction_entity,
    transaction_rule, transaction_tag,
};

pub type Result<T> = std::result::Result<T, DbErr>;

pub async fn new_currency(db: &DatabaseConnection, decimal_places: i16) -> Result<currency::Model> {
    static CURRENCY_ID: AtomicU64 = AtomicU64::new(0);

    let current_id = CURRENCY_ID.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    currency::ActiveModel {
        code: Set(format!("CUR{}", current_id)),
        name: Set(format!("Test currency {}", current_id)),
        decimal_places: Set(decimal_places),
        prefix: Set(None),
        suffix: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn new_account(
    db: &DatabaseConnection,
    currency: &currency::Model,
) -> Result<account::Model> {
    static ACCOUNT_ID: AtomicU64 = AtomicU64::new(0);

    let current_id = ACCOUNT_ID.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    account::ActiveModel {
        name: Set(format!("Test account {}", current_id)),
        group_id: Set(None),
        currency_id: Set(currency.id),
        is_asset: Set(false),
        is_archived: Set(false),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn new_category(db: &DatabaseConnection, name: &str) -> Result<category::Model> {
    category::ActiveModel {
        name: Set(name.to_string()),
        mute: Set(false),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn new_tag(db: &DatabaseConnection, name: &str) -> Result<tag::Model> {
    tag::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn new_entity(db: &DatabaseConnection, name: &str) -> Result<entity::Model> {
    entity::ActiveModel {
        name: Set(name.to_string()),
        active: Set(true),
        ..Default::default()
    }
    .insert(db)
    .await
}

/// Inserts a paid expense dated 2024-03-15 with the amount given in
/// cents, bypassing the write path. Tests exercising the write path call
/// into `writer` directly instead.
pub async fn new_transaction(
    db: &DatabaseConnection,
    account: &account::Model,
    amount_cents: i64,
    description: &str,
) -> Result<transaction::Model> {
    transaction::ActiveModel {
        account_id: Set(account.id),
        kind: Set(TransactionKind::Expense),
        is_paid: Set(true),
        date: Set(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()),
        reference_date: Set(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()),
        amount: Set(Decimal::new(amount_cents, 2)),
        description: Set(description.to_string()),
        notes: Set(None),
        category_id: Set(None),
        deleted: Set(false),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn link_tag(
    db: &DatabaseConnection,
    tx: &transaction::Model,
    tag: &tag::Model,
) -> Result<transaction_tag::Model> {
    transaction_tag::ActiveModel {
        transaction_id: Set(tx.id),
        tag_id: Set(tag.id),
    }
    .insert(db)
    .await
}

pub async fn link_entity(
    db: &DatabaseConnection,
    tx: &transaction::Model,
    entity: &entity::Model,
) -> Result<transaction_entity::Model> {
    transaction_entity::ActiveModel {
        transaction_id: Set(tx.id),
        entity_id: Set(entity.id),
    }
    .insert(db)
    .await
}

pub async fn new_rule(
    db: &DatabaseConnection,
    trigger: &str,
    on_create: bool,
    on_update: bool,
) -> Result<transaction_rule::Model> {
    static RULE_ID: AtomicU64 = AtomicU64::new(0);

    let current_id = RULE_ID.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    transaction_rule::ActiveModel {
        name: Set(format!("Test rule {}", current_id)),
        description: Set(None),
        active: Set(true),
        on_create: Set(on_create),
        on_update: Set(on_update),
        trigger: Set(trigger.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn new_set_field_action(
    db: &DatabaseConnection,
    rule: &transaction_rule::Model,
    position: i32,
    field: TargetField,
    value: &str,
) -> Result<rule_set_field_action::Model> {
    rule_set_field_action::ActiveModel {
        rule_id: Set(rule.id),
        position: Set(position),
        field: Set(field),
        value: Set(value.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn new_upsert_action(
    db: &DatabaseConnection,
    rule: &transaction_rule::Model,
    position: i32,
    guard: &str,
    filter: Vec<rule_upsert_action::FilterTerm>,
    set_values: Vec<rule_upsert_action::FieldAssignment>,
) -> Result<rule_upsert_action::Model> {
    rule_upsert_action::ActiveModel {
        rule_id: Set(rule.id),
        position: Set(position),
        guard: Set(guard.to_string()),
        filter: Set(rule_upsert_action::FilterList(filter)),
        set_values: Set(rule_upsert_action::AssignmentList(set_values)),
        ..Default::default()
    }
    .insert(db)
    .await
}

/// A monthly 10.00 expense definition starting at the given date, with
/// no end conditions.
pub async fn new_recurring(
    db: &DatabaseConnection,
    account: &account::Model,
    start_date: NaiveDate,
) -> Result<recurring_transaction::Model> {
    recurring_transaction::ActiveModel {
        account_id: Set(account.id),
        kind: Set(TransactionKind::Expense),
        amount: Set(Decimal::new(1000, 2)),
        description: Set("Recurring expense".to_string()),
        notes: Set(None),
        category_id: Set(None),
        reference_date: Set(None),
        start_date: Set(start_date),
        end_date: Set(None),
        recurrence_unit: Set(RecurrenceUnit::Month),
        recurrence_interval: Set(1),
        max_occurrences: Set(None),
        is_paused: Set(false),
        last_generated_date: Set(None),
        add_description_to_transaction: Set(true),
        add_notes_to_transaction: Set(true),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn new_plan(
    db: &DatabaseConnection,
    account: &account::Model,
    total_amount: Decimal,
    number_of_installments: i32,
    start_date: NaiveDate,
) -> Result<installment_plan::Model> {
    installment_plan::ActiveModel {
        account_id: Set(account.id),
        kind: Set(TransactionKind::Expense),
        description: Set("Installment purchase".to_string()),
        notes: Set(None),
        total_amount: Set(total_amount),
        number_of_installments: Set(number_of_installments),
        installment_start: Set(1),
        start_date: Set(start_date),
        reference_date: Set(None),
        recurrence_unit: Set(RecurrenceUnit::Month),
        recurrence_interval: Set(1),
        category_id: Set(None),
        add_description_to_transaction: Set(true),
        add_notes_to_transaction: Set(true),
        ..Default::default()
    }
    .insert(db)
    .await
}
