use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

use super::{account, category, entity, tag, transaction::TransactionKind};

/// Calendar unit a recurrence steps by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(1))")]
pub enum RecurrenceUnit {
    #[sea_orm(string_value = "D")]
    Day,
    #[sea_orm(string_value = "W")]
    Week,
    #[sea_orm(string_value = "M")]
    Month,
    #[sea_orm(string_value = "Y")]
    Year,
}

/// A schedule definition the generator materializes transactions from.
///
/// `last_generated_date` is the checkpoint: the due date of the most
/// recently generated occurrence. It only ever moves forward; each due
/// date yields exactly one transaction.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "recurring_transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub account_id: i32,
    pub kind: TransactionKind,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub amount: Decimal,
    pub description: String,
    pub notes: Option<String>,
    pub category_id: Option<i32>,
    /// Month bucket override for the first occurrence; later occurrences
    /// step it by the same recurrence. When null each occurrence uses its
    /// own due month.
    pub reference_date: Option<NaiveDate>,
    /// The first due date.
    pub start_date: NaiveDate,
    /// Last date occurrences may fall on. Null repeats indefinitely.
    pub end_date: Option<NaiveDate>,
    pub recurrence_unit: RecurrenceUnit,
    /// Number of units between occurrences, at least 1.
    #[sea_orm(default_value = "1")]
    pub recurrence_interval: i32,
    /// Cap on the total number of generated occurrences. Null is unlimited.
    pub max_occurrences: Option<i32>,
    /// Paused definitions are skipped by the generator without advancing
    /// their checkpoint.
    #[sea_orm(default_value = "false")]
    pub is_paused: bool,
    pub last_generated_date: Option<NaiveDate>,
    #[sea_orm(default_value = "true")]
    pub add_description_to_transaction: bool,
    #[sea_orm(default_value = "true")]
    pub add_notes_to_transaction: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "account::Entity",
        from = "Column::AccountId",
        to = "account::Column::Id",
        on_delete = "Cascade"
    )]
    Account,
    #[sea_orm(
        belongs_to = "category::Entity",
        from = "Column::CategoryId",
        to = "category::Column::Id",
        on_delete = "SetNull"
    )]
    Category,
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transaction,
    #[sea_orm(has_many = "super::recurring_transaction_tag::Entity")]
    RecurringTransactionTag,
    #[sea_orm(has_many = "super::recurring_transaction_entity::Entity")]
    RecurringTransactionEntity,
}

impl Related<account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transaction.def()
    }
}

impl Related<tag::Entity> for Entity {
    fn to() -> RelationDef {
        super::recurring_transaction_tag::Relation::Tag.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::recurring_transaction_tag::Relation::RecurringTransaction.def().rev())
    }
}

impl Related<entity::Entity> for Entity {
    fn to() -> RelationDef {
        super::recurring_transaction_entity::Relation::Counterparty.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::recurring_transaction_entity::Relation::RecurringTransaction.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
